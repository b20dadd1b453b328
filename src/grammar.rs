//! # Kettle - Grammar
//!
//! A declarative rule table compiled into an LALR(1) parse table.
//!
//! ## Organization
//!
//! - **[builder]** - `GrammarBuilder`: rules and precedence in, `ParseTable` out
//! - **[table]** - the compiled automaton the parser driver runs
//! - **[rules]** - the language's rule table and reduction actions
//! - **[values]** - what reduction actions receive and return
//!
//! ## Writing rules
//!
//! A rule is a nonterminal and its alternatives. Each alternative is a
//! whitespace-separated pattern; any symbol that is not a nonterminal is a
//! terminal tag. An alternative without an action passes its first value
//! through unchanged.
//!
//! ```
//! use kettle_lang::grammar::{Alternative, Assoc, GrammarBuilder};
//!
//! let table = GrammarBuilder::new("E")
//!     .rule("E", vec![
//!         Alternative::passthrough("NUMBER"),
//!         Alternative::passthrough("E + E"),
//!         Alternative::passthrough("E * E"),
//!         Alternative::passthrough("- E").prec("UMINUS"),
//!     ])
//!     .operators(&[
//!         (Assoc::Left, &["+", "-"]),
//!         (Assoc::Left, &["*"]),
//!         (Assoc::NonAssoc, &["UMINUS"]),
//!     ])
//!     .build()
//!     .unwrap();
//! assert!(table.conflicts().is_empty());
//! assert!(table.terminal("UMINUS").is_none());
//! ```
//!
//! ## Precedence
//!
//! Operators are declared lowest first. A rule takes the precedence of its
//! explicit tag, or of its rightmost ranked terminal. Shift/reduce conflicts
//! between ranked sides are settled by level and then associativity; anything
//! else falls back to shifting (or to the earlier rule) and is recorded on the
//! table so grammar authors can review it.

pub mod builder;
pub mod rules;
pub mod table;
pub mod values;

pub use builder::{Alternative, Assoc, GrammarBuilder};
pub use rules::{grammar, OPERATORS};
pub use table::{Conflict, ConflictKind, ParseTable, Production, Step, END};
pub use values::{Args, Reduction, StackValue};
