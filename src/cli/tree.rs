//! Print the syntax tree of a token stream

use super::{CliError, read_tokens};

/// Parse the input and render the tree as an indented outline
pub fn execute_tree(input: Option<&str>) -> Result<String, CliError> {
    let tokens = read_tokens(input)?;
    let root = crate::parse(&tokens)?;
    Ok(root.to_tree_string())
}
