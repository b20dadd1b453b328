// tests/integration_tests.rs
//
// The full pipeline: a JSON token stream in, JavaScript or a tree out.

use kettle_lang::cli::{self, CliError, CompileCommand};
use kettle_lang::{compile, tokens_from_json, CompileError, CompileOptions, ParseError};

const SQUARE: &str = r#"[
    ["IDENTIFIER", "square", 1], ["ASSIGN", "=", 1],
    ["PARAM_START", "(", 1], ["PARAM", "x", 1], ["PARAM_END", ")", 1],
    ["->", "->", 1], ["INDENT", "2", 1],
    ["IDENTIFIER", "x", 2], ["*", "*", 2], ["IDENTIFIER", "x", 2],
    ["OUTDENT", "2", 2], ["TERMINATOR", "\n", 2],
    ["IDENTIFIER", "print", 3], ["CALL_START", "(", 3],
    ["IDENTIFIER", "square", 3], ["CALL_START", "(", 3], ["NUMBER", "4", 3], ["CALL_END", ")", 3],
    ["CALL_END", ")", 3], ["TERMINATOR", "\n", 3]
]"#;

fn command(input: &str) -> CompileCommand {
    CompileCommand {
        input: Some(input.to_string()),
        ..Default::default()
    }
}

// ============================================================================
// Library pipeline
// ============================================================================

#[test]
fn test_program_from_json() {
    let tokens = tokens_from_json(SQUARE).unwrap();
    let js = compile(&tokens, &CompileOptions::default()).unwrap();

    assert_eq!(
        js,
        "(function(){\n  var square;\n  square = function square(x) {\n    return x * x;\n  };\n  \
         print(square(4));\n})();\n"
    );
}

#[test]
fn test_output_has_no_trailing_whitespace() {
    let tokens = tokens_from_json(SQUARE).unwrap();
    let js = compile(&tokens, &CompileOptions::default()).unwrap();
    assert!(js.lines().all(|line| line == line.trim_end()));
}

#[test]
fn test_record_tokens() {
    let json = r#"[
        {"tag": "IDENTIFIER", "value": "done"}, {"tag": "ASSIGN", "value": "="},
        {"tag": "TRUE"}
    ]"#;
    let tokens = tokens_from_json(json).unwrap();
    let options = CompileOptions {
        no_wrap: true,
        ..Default::default()
    };
    assert_eq!(compile(&tokens, &options).unwrap(), "var done;\ndone = true;");
}

#[test]
fn test_parse_error_reports_line() {
    let json = r#"[["IDENTIFIER", "a", 4], ["ASSIGN", "=", 4], ["OUTDENT", "", 5]]"#;
    let tokens = tokens_from_json(json).unwrap();
    let err = compile(&tokens, &CompileOptions::default()).unwrap_err();

    assert!(matches!(
        err,
        CompileError::Parse(ParseError::UnexpectedToken { line: 5, position: 2, .. })
    ));
    assert!(err.to_string().contains("line 5"));
}

// ============================================================================
// CLI commands
// ============================================================================

#[test]
fn test_compile_command_options() {
    let mut bare = command(SQUARE);
    bare.bare = true;
    let js = cli::execute_compile(&bare).unwrap();
    assert!(js.starts_with("var square;\nsquare = function square(x) {"));

    let mut globals = command(SQUARE);
    globals.bare = true;
    globals.globals = true;
    let js = cli::execute_compile(&globals).unwrap();
    assert!(js.starts_with("square = function square(x) {"));

    let mut returning = command(SQUARE);
    returning.request_return = true;
    let js = cli::execute_compile(&returning).unwrap();
    assert!(js.contains("  return print(square(4));\n"));
}

#[test]
fn test_compile_command_errors() {
    assert!(matches!(
        cli::execute_compile(&CompileCommand::default()),
        Err(CliError::NoInput)
    ));
    let err = cli::execute_compile(&command(r#"[["ASSIGN", "="]]"#)).unwrap_err();
    assert!(matches!(err, CliError::Compile(CompileError::Parse(_))));
    assert!(err.to_string().contains("ASSIGN"));
}

#[test]
fn test_tree_command() {
    let tree = cli::execute_tree(Some(r#"[["IDENTIFIER", "a"], ["?"]]"#)).unwrap();
    assert_eq!(tree, "Expressions\n  Existence\n    Value\n      Literal \"a\"\n");
}

#[test]
fn test_grammar_command() {
    let report = cli::execute_grammar(false).unwrap();
    assert!(report.states > 0);
    assert!(report.productions > 0 && report.terminals > 0);

    let text = report.to_string();
    assert!(text.starts_with("states:"));
    assert!(text.contains("conflicts:"));
}
