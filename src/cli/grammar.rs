//! Inspect the compiled parse table

use super::CliError;
use crate::grammar::Conflict;
use std::fmt;

/// Size of the language's parse table and the conflicts settled by default
#[derive(Debug, Clone)]
pub struct GrammarReport {
    pub states: usize,
    pub productions: usize,
    pub terminals: usize,
    pub conflicts: Vec<Conflict>,
    /// Include each conflict when displayed
    pub verbose: bool,
}

impl fmt::Display for GrammarReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "states:      {}", self.states)?;
        writeln!(f, "productions: {}", self.productions)?;
        writeln!(f, "terminals:   {}", self.terminals)?;
        writeln!(f, "conflicts:   {}", self.conflicts.len())?;
        if self.verbose {
            for conflict in &self.conflicts {
                writeln!(f, "  {}", conflict)?;
            }
        }
        Ok(())
    }
}

/// Build (or reuse) the shared parser and describe its table
pub fn execute_grammar(verbose: bool) -> Result<GrammarReport, CliError> {
    let table = crate::parser::shared()?.table();
    Ok(GrammarReport {
        states: table.state_count(),
        productions: table.production_count(),
        terminals: table.terminal_count(),
        conflicts: table.conflicts().to_vec(),
        verbose,
    })
}
