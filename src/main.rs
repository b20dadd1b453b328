use clap::{Parser as ClapParser, Subcommand};
use kettle_lang::cli::{self, CliError, CompileCommand};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "kettle")]
#[command(about = "Kettle - Compile a lexed token stream to JavaScript")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a JSON token stream to JavaScript
    Compile {
        /// JSON token stream (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Omit the top-level function wrapper
        #[arg(short, long)]
        bare: bool,

        /// Leave top-level variables undeclared
        #[arg(long)]
        globals: bool,

        /// Return the value of the last expression from the program
        #[arg(long = "return")]
        request_return: bool,
    },

    /// Print the syntax tree of a JSON token stream
    Tree {
        /// JSON token stream (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,
    },

    /// Show parse table statistics
    Grammar {
        /// List every conflict resolved by default
        #[arg(long)]
        conflicts: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile {
            input,
            bare,
            globals,
            request_return,
        } => run_compile(input, bare, globals, request_return),
        Commands::Tree { input } => read_input(input).and_then(|input| {
            print!("{}", cli::execute_tree(input.as_deref())?);
            Ok(())
        }),
        Commands::Grammar { conflicts } => cli::execute_grammar(conflicts).map(|report| {
            print!("{}", report);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_compile(
    input: Option<String>,
    bare: bool,
    globals: bool,
    request_return: bool,
) -> Result<(), CliError> {
    let command = CompileCommand {
        input: read_input(input)?,
        bare,
        globals,
        request_return,
    };
    let js = cli::execute_compile(&command)?;
    if js.ends_with('\n') {
        print!("{}", js);
    } else {
        println!("{}", js);
    }
    Ok(())
}

/// The `--input` flag, or all of stdin when it is piped.
fn read_input(input: Option<String>) -> Result<Option<String>, CliError> {
    match input {
        Some(s) => Ok(Some(s)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}
