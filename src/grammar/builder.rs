//! LALR(1) parse-table construction.
//!
//! The builder follows the classic recipe: LR(0) item sets first, then
//! lookaheads found by closing each kernel item over a probe symbol and
//! propagating until nothing changes, then one action row per state with
//! conflicts settled by operator precedence.

use super::table::{Conflict, ConflictKind, END, ParseTable, Production, Step};
use super::values::Reduction;
use crate::error::GrammarError;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Operator associativity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
    NonAssoc,
}

/// One right-hand side of a nonterminal and what to build when it matches.
#[derive(Clone)]
pub struct Alternative {
    pattern: String,
    action: Option<Reduction>,
    prec: Option<String>,
}

impl Alternative {
    /// `pattern` is a space-separated list of symbols; empty matches nothing.
    pub fn new(pattern: impl Into<String>, action: Reduction) -> Self {
        Alternative {
            pattern: pattern.into(),
            action: Some(action),
            prec: None,
        }
    }

    /// A renaming rule: its value is the value of its first symbol.
    pub fn passthrough(pattern: impl Into<String>) -> Self {
        Alternative {
            pattern: pattern.into(),
            action: None,
            prec: None,
        }
    }

    /// Rank this rule like the operator `tag` instead of its last operator.
    pub fn prec(mut self, tag: impl Into<String>) -> Self {
        self.prec = Some(tag.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Precedence {
    level: usize,
    assoc: Assoc,
}

/// Collects a grammar and compiles it into a [`ParseTable`].
///
/// # Examples
/// ```
/// use kettle_lang::grammar::{Alternative, Assoc, GrammarBuilder};
///
/// let table = GrammarBuilder::new("Sum")
///     .rule("Sum", vec![
///         Alternative::passthrough("Sum + Sum"),
///         Alternative::passthrough("NUMBER"),
///     ])
///     .operators(&[(Assoc::Left, &["+"])])
///     .build()
///     .unwrap();
/// assert!(table.conflicts().is_empty());
/// ```
#[derive(Clone)]
pub struct GrammarBuilder {
    start: String,
    rules: Vec<(String, Vec<Alternative>)>,
    operators: Vec<(Assoc, Vec<String>)>,
    strict: bool,
}

impl GrammarBuilder {
    pub fn new(start: impl Into<String>) -> Self {
        GrammarBuilder {
            start: start.into(),
            rules: Vec::new(),
            operators: Vec::new(),
            strict: false,
        }
    }

    /// Add a nonterminal with its alternatives, in priority order.
    pub fn rule(mut self, nonterminal: impl Into<String>, alternatives: Vec<Alternative>) -> Self {
        self.rules.push((nonterminal.into(), alternatives));
        self
    }

    /// Operator precedence, lowest first.
    pub fn operators(mut self, table: &[(Assoc, &[&str])]) -> Self {
        self.operators = table
            .iter()
            .map(|(assoc, names)| (*assoc, names.iter().map(|name| name.to_string()).collect()))
            .collect();
        self
    }

    /// Treat every conflict the precedence table does not settle as an error
    /// instead of falling back to shift (or to the earlier rule).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn build(&self) -> Result<ParseTable, GrammarError> {
        let mut symbols = Symbols::default();
        symbols.intern("$end", true);
        symbols.intern("$accept", false);
        for (name, alternatives) in &self.rules {
            if alternatives.is_empty() {
                return Err(GrammarError::EmptyRule {
                    nonterminal: name.clone(),
                });
            }
            symbols.intern(name, false);
        }
        let start = match symbols.ids.get(&self.start) {
            Some(&id) if !symbols.terminal[id] => id,
            _ => return Err(GrammarError::UnknownStart(self.start.clone())),
        };

        let precedence = self.precedence_levels();

        let mut rules = vec![Rule {
            lhs: 1,
            rhs: vec![start],
            prec: None,
            action: None,
        }];
        for (name, alternatives) in &self.rules {
            let lhs = symbols.ids[name.as_str()];
            for alternative in alternatives {
                let rhs: Vec<usize> = alternative
                    .pattern
                    .split_whitespace()
                    .map(|symbol| symbols.intern(symbol, true))
                    .collect();
                let prec = match &alternative.prec {
                    Some(tag) => Some(*precedence.get(tag).ok_or_else(|| {
                        GrammarError::UnknownPrecedence {
                            tag: tag.clone(),
                            rule: format!("{} → {}", name, alternative.pattern),
                        }
                    })?),
                    None => rhs
                        .iter()
                        .rev()
                        .filter(|&&sym| symbols.terminal[sym])
                        .find_map(|&sym| precedence.get(&symbols.names[sym]).copied()),
                };
                rules.push(Rule {
                    lhs,
                    rhs,
                    prec,
                    action: alternative.action,
                });
            }
        }

        let lalr = Lalr::new(&symbols, &rules);
        let (kernels, transitions) = lalr.states();
        let lookaheads = lalr.lookaheads(&kernels, &transitions);

        let productions: Vec<Production> = rules
            .iter()
            .map(|rule| Production {
                lhs: rule.lhs,
                len: rule.rhs.len(),
                action: rule.action,
                text: symbols.describe(rule),
            })
            .collect();

        let mut resolver = Resolver {
            symbols: &symbols,
            rules: &rules,
            precedence: &precedence,
            strict: self.strict,
            conflicts: Vec::new(),
        };

        let mut actions = Vec::with_capacity(kernels.len());
        let mut gotos = Vec::with_capacity(kernels.len());
        for (state, kernel) in kernels.iter().enumerate() {
            let seeds = kernel
                .iter()
                .copied()
                .zip(lookaheads[state].iter().cloned())
                .collect();
            let mut shifts: BTreeMap<usize, usize> = BTreeMap::new();
            let mut reductions: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
            let mut row = HashMap::new();

            for (item, follow) in lalr.closure_with_lookaheads(seeds) {
                match lalr.next_symbol(item) {
                    Some(sym) if symbols.terminal[sym] => {
                        if let Some(&target) = transitions[state].get(&sym) {
                            shifts.insert(sym, target);
                        }
                    }
                    Some(_) => {}
                    None if item.rule == 0 => {
                        row.insert(END, Step::Accept);
                    }
                    None => {
                        for token in follow {
                            reductions.entry(token).or_default().push(item.rule);
                        }
                    }
                }
            }

            let tokens: BTreeSet<usize> = shifts.keys().chain(reductions.keys()).copied().collect();
            for token in tokens {
                let candidates = reductions.remove(&token).unwrap_or_default();
                if let Some(step) = resolver.resolve(state, token, shifts.get(&token).copied(), candidates)? {
                    row.insert(token, step);
                }
            }
            actions.push(row);

            gotos.push(
                transitions[state]
                    .iter()
                    .filter(|&(&sym, _)| !symbols.terminal[sym])
                    .map(|(&sym, &target)| (sym, target))
                    .collect(),
            );
        }

        let terminals = symbols
            .names
            .iter()
            .enumerate()
            .filter(|&(id, _)| symbols.terminal[id])
            .map(|(id, name)| (name.clone(), id))
            .collect();

        Ok(ParseTable {
            symbols: symbols.names.clone(),
            terminals,
            productions,
            actions,
            gotos,
            conflicts: resolver.conflicts,
        })
    }

    /// Levels from the lowest-first table: reversed so the tightest binding
    /// operators come first and get the largest level.
    fn precedence_levels(&self) -> HashMap<String, Precedence> {
        let count = self.operators.len();
        let mut levels = HashMap::new();
        for (rank, (assoc, names)) in self.operators.iter().rev().enumerate() {
            for name in names {
                levels.insert(
                    name.clone(),
                    Precedence {
                        level: count - rank,
                        assoc: *assoc,
                    },
                );
            }
        }
        levels
    }
}

struct Rule {
    lhs: usize,
    rhs: Vec<usize>,
    prec: Option<Precedence>,
    action: Option<Reduction>,
}

#[derive(Default)]
struct Symbols {
    names: Vec<String>,
    ids: HashMap<String, usize>,
    terminal: Vec<bool>,
}

impl Symbols {
    fn intern(&mut self, name: &str, terminal: bool) -> usize {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len();
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        self.terminal.push(terminal);
        id
    }

    fn describe(&self, rule: &Rule) -> String {
        let rhs: Vec<&str> = rule.rhs.iter().map(|&sym| self.names[sym].as_str()).collect();
        if rhs.is_empty() {
            format!("{} → ε", self.names[rule.lhs])
        } else {
            format!("{} → {}", self.names[rule.lhs], rhs.join(" "))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Item {
    rule: usize,
    dot: usize,
}

struct Lalr<'g> {
    rules: &'g [Rule],
    by_lhs: Vec<Vec<usize>>,
    nullable: Vec<bool>,
    first: Vec<BTreeSet<usize>>,
    /// Placeholder lookahead used to detect propagation
    probe: usize,
}

impl<'g> Lalr<'g> {
    fn new(symbols: &Symbols, rules: &'g [Rule]) -> Self {
        let count = symbols.names.len();
        let mut by_lhs = vec![Vec::new(); count];
        for (idx, rule) in rules.iter().enumerate() {
            by_lhs[rule.lhs].push(idx);
        }

        let mut nullable = vec![false; count];
        let mut first: Vec<BTreeSet<usize>> = (0..count)
            .map(|sym| {
                if symbols.terminal[sym] {
                    BTreeSet::from([sym])
                } else {
                    BTreeSet::new()
                }
            })
            .collect();

        loop {
            let mut changed = false;
            for rule in rules {
                if !nullable[rule.lhs] && rule.rhs.iter().all(|&sym| nullable[sym]) {
                    nullable[rule.lhs] = true;
                    changed = true;
                }
                let mut gained = BTreeSet::new();
                for &sym in &rule.rhs {
                    gained.extend(first[sym].iter().copied());
                    if !nullable[sym] {
                        break;
                    }
                }
                let before = first[rule.lhs].len();
                first[rule.lhs].extend(gained);
                changed |= first[rule.lhs].len() != before;
            }
            if !changed {
                break;
            }
        }

        Lalr {
            rules,
            by_lhs,
            nullable,
            first,
            probe: count,
        }
    }

    fn next_symbol(&self, item: Item) -> Option<usize> {
        self.rules[item.rule].rhs.get(item.dot).copied()
    }

    fn first_of(&self, symbols: &[usize]) -> (BTreeSet<usize>, bool) {
        let mut out = BTreeSet::new();
        for &sym in symbols {
            out.extend(self.first[sym].iter().copied());
            if !self.nullable[sym] {
                return (out, false);
            }
        }
        (out, true)
    }

    fn closure(&self, kernel: &[Item]) -> Vec<Item> {
        let mut items = kernel.to_vec();
        let mut seen: HashSet<Item> = kernel.iter().copied().collect();
        let mut cursor = 0;
        while cursor < items.len() {
            let item = items[cursor];
            cursor += 1;
            if let Some(sym) = self.next_symbol(item) {
                for &rule in &self.by_lhs[sym] {
                    let fresh = Item { rule, dot: 0 };
                    if seen.insert(fresh) {
                        items.push(fresh);
                    }
                }
            }
        }
        items
    }

    /// LR(1) closure: every item reachable from the seeds, with lookaheads.
    fn closure_with_lookaheads(&self, seeds: Vec<(Item, BTreeSet<usize>)>) -> BTreeMap<Item, BTreeSet<usize>> {
        let mut items: BTreeMap<Item, BTreeSet<usize>> = BTreeMap::new();
        let mut work = Vec::new();
        for (item, follow) in seeds {
            items.entry(item).or_default().extend(follow);
            work.push(item);
        }

        while let Some(item) = work.pop() {
            let Some(sym) = self.next_symbol(item) else {
                continue;
            };
            if self.by_lhs[sym].is_empty() {
                continue;
            }
            let rest = &self.rules[item.rule].rhs[item.dot + 1..];
            let (mut follow, nullable) = self.first_of(rest);
            if nullable {
                if let Some(inherited) = items.get(&item) {
                    follow.extend(inherited.iter().copied());
                }
            }
            for &rule in &self.by_lhs[sym] {
                let child = Item { rule, dot: 0 };
                let existed = items.contains_key(&child);
                let set = items.entry(child).or_default();
                let before = set.len();
                set.extend(follow.iter().copied());
                if !existed || set.len() != before {
                    work.push(child);
                }
            }
        }
        items
    }

    /// LR(0) item sets as sorted kernels, plus the transition rows.
    fn states(&self) -> (Vec<Vec<Item>>, Vec<BTreeMap<usize, usize>>) {
        let start = vec![Item { rule: 0, dot: 0 }];
        let mut index: HashMap<Vec<Item>, usize> = HashMap::from([(start.clone(), 0)]);
        let mut kernels = vec![start];
        let mut transitions = Vec::new();

        let mut cursor = 0;
        while cursor < kernels.len() {
            let mut moves: BTreeMap<usize, Vec<Item>> = BTreeMap::new();
            for item in self.closure(&kernels[cursor]) {
                if let Some(sym) = self.next_symbol(item) {
                    moves.entry(sym).or_default().push(Item {
                        rule: item.rule,
                        dot: item.dot + 1,
                    });
                }
            }

            let mut row = BTreeMap::new();
            for (sym, mut kernel) in moves {
                kernel.sort();
                kernel.dedup();
                let target = match index.get(&kernel) {
                    Some(&target) => target,
                    None => {
                        let target = kernels.len();
                        index.insert(kernel.clone(), target);
                        kernels.push(kernel);
                        target
                    }
                };
                row.insert(sym, target);
            }
            transitions.push(row);
            cursor += 1;
        }
        (kernels, transitions)
    }

    /// Lookahead sets for every kernel item, found by spontaneous generation
    /// and propagation.
    fn lookaheads(&self, kernels: &[Vec<Item>], transitions: &[BTreeMap<usize, usize>]) -> Vec<Vec<BTreeSet<usize>>> {
        let mut sets: Vec<Vec<BTreeSet<usize>>> = kernels
            .iter()
            .map(|kernel| vec![BTreeSet::new(); kernel.len()])
            .collect();
        sets[0][0].insert(END);

        let mut links: BTreeSet<((usize, usize), (usize, usize))> = BTreeSet::new();
        for (state, kernel) in kernels.iter().enumerate() {
            for (slot, &item) in kernel.iter().enumerate() {
                let probe = BTreeSet::from([self.probe]);
                for (inner, follow) in self.closure_with_lookaheads(vec![(item, probe)]) {
                    let Some(sym) = self.next_symbol(inner) else {
                        continue;
                    };
                    let Some(&target) = transitions[state].get(&sym) else {
                        continue;
                    };
                    let advanced = Item {
                        rule: inner.rule,
                        dot: inner.dot + 1,
                    };
                    let Ok(target_slot) = kernels[target].binary_search(&advanced) else {
                        continue;
                    };
                    for token in follow {
                        if token == self.probe {
                            links.insert(((state, slot), (target, target_slot)));
                        } else {
                            sets[target][target_slot].insert(token);
                        }
                    }
                }
            }
        }

        loop {
            let mut changed = false;
            for &((from, from_slot), (to, to_slot)) in &links {
                if (from, from_slot) == (to, to_slot) {
                    continue;
                }
                let incoming: Vec<usize> = sets[from][from_slot].iter().copied().collect();
                let target = &mut sets[to][to_slot];
                let before = target.len();
                target.extend(incoming);
                changed |= target.len() != before;
            }
            if !changed {
                break;
            }
        }
        sets
    }
}

struct Resolver<'g> {
    symbols: &'g Symbols,
    rules: &'g [Rule],
    precedence: &'g HashMap<String, Precedence>,
    strict: bool,
    conflicts: Vec<Conflict>,
}

impl Resolver<'_> {
    fn resolve(
        &mut self,
        state: usize,
        token: usize,
        shift: Option<usize>,
        candidates: Vec<usize>,
    ) -> Result<Option<Step>, GrammarError> {
        let reduce = match candidates.len() {
            0 => None,
            1 => Some(candidates[0]),
            _ => Some(self.pick_reduction(state, token, &candidates)?),
        };

        let (target, rule) = match (shift, reduce) {
            (None, None) => return Ok(None),
            (Some(target), None) => return Ok(Some(Step::Shift(target))),
            (None, Some(rule)) => return Ok(Some(Step::Reduce(rule))),
            (Some(target), Some(rule)) => (target, rule),
        };

        let name = &self.symbols.names[token];
        match (self.rules[rule].prec, self.precedence.get(name)) {
            (Some(ranked), Some(incoming)) if incoming.level > ranked.level => Ok(Some(Step::Shift(target))),
            (Some(ranked), Some(incoming)) if incoming.level < ranked.level => Ok(Some(Step::Reduce(rule))),
            (Some(_), Some(incoming)) => match incoming.assoc {
                Assoc::Left => Ok(Some(Step::Reduce(rule))),
                Assoc::Right => Ok(Some(Step::Shift(target))),
                Assoc::NonAssoc => Err(GrammarError::NonAssociative {
                    token: name.clone(),
                    rule: self.symbols.describe(&self.rules[rule]),
                }),
            },
            _ => {
                let chosen = format!("shift over {}", self.symbols.describe(&self.rules[rule]));
                self.default_resolution(state, token, ConflictKind::ShiftReduce, chosen)?;
                Ok(Some(Step::Shift(target)))
            }
        }
    }

    /// Several rules can reduce: the highest-ranked wins, else the earliest.
    fn pick_reduction(&mut self, state: usize, token: usize, candidates: &[usize]) -> Result<usize, GrammarError> {
        let levels: Vec<Option<usize>> = candidates
            .iter()
            .map(|&rule| self.rules[rule].prec.map(|prec| prec.level))
            .collect();
        if levels.iter().all(Option::is_some) {
            let best = levels.iter().flatten().copied().max();
            let winners: Vec<usize> = candidates
                .iter()
                .zip(&levels)
                .filter(|&(_, level)| *level == best)
                .map(|(&rule, _)| rule)
                .collect();
            if let [winner] = winners.as_slice() {
                return Ok(*winner);
            }
        }

        let earliest = candidates.iter().copied().min().unwrap_or_default();
        let chosen = format!("reduce {}", self.symbols.describe(&self.rules[earliest]));
        self.default_resolution(state, token, ConflictKind::ReduceReduce, chosen)?;
        Ok(earliest)
    }

    fn default_resolution(
        &mut self,
        state: usize,
        token: usize,
        kind: ConflictKind,
        chosen: String,
    ) -> Result<(), GrammarError> {
        let token = self.symbols.names[token].clone();
        if self.strict {
            return Err(GrammarError::Unresolved {
                state,
                token,
                detail: chosen,
            });
        }
        self.conflicts.push(Conflict {
            state,
            token,
            kind,
            chosen,
        });
        Ok(())
    }
}
