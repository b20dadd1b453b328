use super::values::Reduction;
use std::collections::HashMap;
use std::fmt;

/// What the automaton does in a state on a lookahead terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Consume the token and move to the given state
    Shift(usize),
    /// Reduce by the given production
    Reduce(usize),
    Accept,
}

/// A compiled grammar rule.
#[derive(Clone)]
pub struct Production {
    pub(crate) lhs: usize,
    pub(crate) len: usize,
    pub(crate) action: Option<Reduction>,
    pub(crate) text: String,
}

impl Production {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `Lhs → a b c`
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Debug for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Production({})", self.text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

/// An ambiguity the precedence table did not settle, and how it was settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub state: usize,
    pub token: String,
    pub kind: ConflictKind,
    /// Description of the action that won
    pub chosen: String,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ConflictKind::ShiftReduce => "shift/reduce",
            ConflictKind::ReduceReduce => "reduce/reduce",
        };
        write!(f, "state {}: {} on `{}`, chose {}", self.state, kind, self.token, self.chosen)
    }
}

/// The compiled LALR(1) automaton. Immutable once built.
#[derive(Debug, Clone)]
pub struct ParseTable {
    pub(crate) symbols: Vec<String>,
    pub(crate) terminals: HashMap<String, usize>,
    pub(crate) productions: Vec<Production>,
    pub(crate) actions: Vec<HashMap<usize, Step>>,
    pub(crate) gotos: Vec<HashMap<usize, usize>>,
    pub(crate) conflicts: Vec<Conflict>,
}

/// Symbol id of the end-of-input terminal.
pub const END: usize = 0;

impl ParseTable {
    pub fn state_count(&self) -> usize {
        self.actions.len()
    }

    pub fn production_count(&self) -> usize {
        self.productions.len()
    }

    /// Number of terminals, end of input included.
    pub fn terminal_count(&self) -> usize {
        self.terminals.len()
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn terminal(&self, tag: &str) -> Option<usize> {
        self.terminals.get(tag).copied()
    }

    pub fn action(&self, state: usize, terminal: usize) -> Option<Step> {
        self.actions.get(state)?.get(&terminal).copied()
    }

    pub fn goto(&self, state: usize, nonterminal: usize) -> Option<usize> {
        self.gotos.get(state)?.get(&nonterminal).copied()
    }

    pub fn production(&self, index: usize) -> Option<&Production> {
        self.productions.get(index)
    }

    pub fn symbol_name(&self, id: usize) -> &str {
        self.symbols.get(id).map(String::as_str).unwrap_or("?")
    }

    /// Terminals with an action in `state`, sorted by name.
    pub fn expected(&self, state: usize) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .actions
            .get(state)
            .map(|row| row.keys().map(|&id| self.symbol_name(id)).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }
}
