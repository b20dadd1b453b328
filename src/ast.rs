//! # Kettle - Abstract Syntax Tree
//!
//! The parser's reduction actions build this tree; the code generator walks
//! it. It is a closed sum type, [`Node`], with one variant per construct and
//! one payload struct per variant.
//!
//! ## Organization
//!
//! - **[nodes]** - the `Node` enum, payload structs and construction helpers
//! - **[predicates]** - statement/expression classification used by lowering
//! - **[traverse]** - child enumeration, tree walks and the outline printer
//! - **[returns]** - return injection for the last expression of a body
//!
//! ## Statements and expressions
//!
//! The target language distinguishes statements from expressions; the source
//! language does not. Every node answers four questions:
//!
//! - `is_statement` - does it lower to a statement?
//! - `is_pure_statement` - is it a control transfer (`return`, `break`,
//!   `continue`) whose meaning depends on where it sits?
//! - `is_top_sensitive` - does it lower differently at the top of a body?
//! - `is_operation_sensitive` - does it care about being an operator operand?
//!
//! A statement used where a value is needed gets wrapped in an immediately
//! invoked closure, unless a pure statement sits anywhere inside it:
//!
//! ```text
//! y = (try risky() catch e then fallback)
//! ```
//!
//! becomes
//!
//! ```text
//! y = (function() {
//!   try { ... } catch (e) { ... }
//! }).call(this);
//! ```
//!
//! ## Two walks
//!
//! `contains_pure_statement` stops at function literals, since a `return`
//! inside a nested function does not affect the enclosing code. `traverse`
//! enters function bodies; it is for inspection and printing.

pub mod nodes;
pub mod predicates;
pub mod returns;
pub mod traverse;

pub use nodes::{
    Accessor, Array, Assign, AssignContext, Call, Callee, Class, Code, Comment, Existence,
    Expressions, Extends, For, ForSource, If, Index, Literal, Node, Object, Op, Parenthetical,
    Range, Return, Slice, Splat, SplatParam, Throw, Try, Value, While,
};
