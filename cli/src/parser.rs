//! Statement splitter for SQL scripts
//!
//! Splits script text on `;` while respecting string literals, quoted
//! identifiers and comments, so a `;` inside `'a;b'` never ends a statement.

use crate::error::{CLIError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Scan {
    Code,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment,
}

/// Split a script into trimmed, non-empty statements without their
/// terminating `;`.
pub fn split_statements(script: &str) -> Result<Vec<String>> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut scan = Scan::Code;
    let mut chars = script.chars().peekable();

    while let Some(c) = chars.next() {
        match scan {
            Scan::Code => match c {
                ';' => {
                    push_statement(&mut statements, &mut current);
                    continue;
                },
                '\'' => scan = Scan::SingleQuoted,
                '"' => scan = Scan::DoubleQuoted,
                '-' if chars.peek() == Some(&'-') => {
                    chars.next();
                    scan = Scan::LineComment;
                    continue;
                },
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    scan = Scan::BlockComment;
                    continue;
                },
                _ => {},
            },
            // '' inside a literal is an escaped quote
            Scan::SingleQuoted if c == '\'' => {
                if chars.peek() == Some(&'\'') {
                    current.push(c);
                    chars.next();
                } else {
                    scan = Scan::Code;
                }
            },
            Scan::DoubleQuoted if c == '"' => {
                if chars.peek() == Some(&'"') {
                    current.push(c);
                    chars.next();
                } else {
                    scan = Scan::Code;
                }
            },
            Scan::LineComment => {
                if c == '\n' {
                    scan = Scan::Code;
                    current.push(c);
                }
                continue;
            },
            Scan::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    scan = Scan::Code;
                    current.push(' ');
                }
                continue;
            },
            Scan::SingleQuoted | Scan::DoubleQuoted => {},
        }
        current.push(c);
    }

    match scan {
        Scan::SingleQuoted => Err(CLIError::ParseError("unterminated string literal".into())),
        Scan::DoubleQuoted => Err(CLIError::ParseError("unterminated quoted identifier".into())),
        Scan::BlockComment => Err(CLIError::ParseError("unterminated block comment".into())),
        Scan::Code | Scan::LineComment => {
            push_statement(&mut statements, &mut current);
            Ok(statements)
        },
    }
}

fn push_statement(statements: &mut Vec<String>, current: &mut String) {
    let statement = current.trim();
    if !statement.is_empty() {
        statements.push(statement.to_string());
    }
    current.clear();
}
