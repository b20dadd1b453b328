// tests/common/mod.rs
//
// A compact notation for token streams, so tests read close to source text.
//
// Words are separated by whitespace:
//   - `name`, `Dog`           IDENTIFIER (PARAM between PARAM_START and PARAM_END)
//   - `42`, `"hi"`            NUMBER, STRING
//   - `IF`, `INDENT`, ...     any all-caps word is that tag, with an empty value
//   - `=` and `:`             ASSIGN
//   - `;`                     TERMINATOR
//   - `.name` `::name` `?.name` `@name`   accesses and `this` properties
//   - `f(` ... `)`            a call; a bare `(` is a parenthetical
//   - `a[` ... `]`            an index; a bare `[` opens an array or range
//   - anything else           a tag equal to its own text (`+`, `->`, `,`, ...)

#![allow(dead_code)]

use kettle_lang::{CompileOptions, Node, Token};

#[derive(Clone, Copy, PartialEq)]
enum Open {
    Call,
    Paren,
    Index,
    Bracket,
}

struct Reader {
    tokens: Vec<Token>,
    open: Vec<Open>,
    in_params: bool,
}

impl Reader {
    fn emit(&mut self, tag: &str, value: &str) {
        self.tokens.push(Token::new(tag, value));
    }

    fn word(&mut self, word: &str) {
        if word.len() > 1 && (word.ends_with('(') || word.ends_with('[')) {
            let (head, last) = word.split_at(word.len() - 1);
            self.word(head);
            if last == "(" {
                self.open.push(Open::Call);
                self.emit("CALL_START", "(");
            } else {
                self.open.push(Open::Index);
                self.emit("INDEX_START", "[");
            }
            return;
        }

        match word {
            "(" => {
                self.open.push(Open::Paren);
                self.emit("(", "(");
            }
            "[" => {
                self.open.push(Open::Bracket);
                self.emit("[", "[");
            }
            ")" => match self.open.pop() {
                Some(Open::Call) => self.emit("CALL_END", ")"),
                _ => self.emit(")", ")"),
            },
            "]" => match self.open.pop() {
                Some(Open::Index) => self.emit("INDEX_END", "]"),
                _ => self.emit("]", "]"),
            },
            "=" | ":" => self.emit("ASSIGN", word),
            ";" => self.emit("TERMINATOR", "\n"),
            "@" => self.emit("@", "@"),
            "PARAM_START" => {
                self.in_params = true;
                self.emit("PARAM_START", "(");
            }
            "PARAM_END" => {
                self.in_params = false;
                self.emit("PARAM_END", ")");
            }
            _ => self.atom(word),
        }
    }

    fn atom(&mut self, word: &str) {
        if let Some(name) = word.strip_prefix("?.").filter(|name| !name.is_empty()) {
            self.emit("SOAK_ACCESS", "?.");
            self.emit("IDENTIFIER", name);
        } else if let Some(name) = word.strip_prefix("::").filter(|name| !name.is_empty()) {
            self.emit("PROTOTYPE_ACCESS", "::");
            self.emit("IDENTIFIER", name);
        } else if let Some(name) = word
            .strip_prefix('.')
            .filter(|name| name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_'))
        {
            self.emit("PROPERTY_ACCESS", ".");
            self.emit("IDENTIFIER", name);
        } else if let Some(name) = word.strip_prefix('@').filter(|name| !name.is_empty()) {
            self.emit("@", "@");
            self.emit("IDENTIFIER", name);
        } else if word.starts_with(|c: char| c.is_ascii_digit()) {
            self.emit("NUMBER", word);
        } else if word.starts_with('"') || word.starts_with('\'') {
            self.emit("STRING", word);
        } else if is_tag(word) {
            self.emit(word, "");
        } else if is_identifier(word) {
            let tag = if self.in_params { "PARAM" } else { "IDENTIFIER" };
            self.emit(tag, word);
        } else {
            self.emit(word, word);
        }
    }
}

fn is_tag(word: &str) -> bool {
    word.len() > 1 && word.chars().all(|c| c.is_ascii_uppercase() || c == '_')
}

fn is_identifier(word: &str) -> bool {
    word.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && word.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Read a token stream written in the compact notation.
pub fn tokens(source: &str) -> Vec<Token> {
    let mut reader = Reader {
        tokens: Vec::new(),
        open: Vec::new(),
        in_params: false,
    };
    for word in source.split_whitespace() {
        reader.word(word);
    }
    reader.tokens
}

pub fn parse(source: &str) -> Node {
    kettle_lang::parse(&tokens(source)).unwrap()
}

/// Compile without the top-level wrapper.
pub fn bare(source: &str) -> String {
    let options = CompileOptions {
        no_wrap: true,
        ..Default::default()
    };
    kettle_lang::compile(&tokens(source), &options).unwrap()
}

pub fn compile(source: &str, options: &CompileOptions) -> String {
    kettle_lang::compile(&tokens(source), options).unwrap()
}

/// The first line of a program body, for tests about a single statement.
pub fn only_line(root: &Node) -> &Node {
    match root {
        Node::Expressions(block) if block.expressions.len() == 1 => &block.expressions[0],
        other => panic!("expected a single line, got {:?}", other),
    }
}
