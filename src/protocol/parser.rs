//! Command Line Tokenizer
//!
//! Splits a textual command such as
//!
//! ```text
//! SET greeting "hello world" EX 60
//! ```
//!
//! into its arguments. Unquoted tokens are separated by whitespace. Double
//! quotes allow spaces and backslash escapes (`\"`, `\\`, `\n`, `\t`); single
//! quotes take their content literally.

use thiserror::Error;

/// Errors that can occur while tokenizing a command line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A double-quoted token was never closed
    #[error("unmatched double quote")]
    UnmatchedDoubleQuote,

    /// A single-quoted token was never closed
    #[error("unmatched single quote")]
    UnmatchedSingleQuote,

    /// The line ended right after a backslash inside double quotes
    #[error("trailing backslash")]
    TrailingBackslash,
}

/// Tokenizes a command line into individual arguments.
///
/// # Example
///
/// ```
/// use kvmock::protocol::tokenize;
///
/// let args = tokenize(r#"HSET user name "Ada Lovelace""#).unwrap();
/// assert_eq!(args, vec!["HSET", "user", "name", "Ada Lovelace"]);
/// ```
pub fn tokenize(input: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
                chars.next();
            }
            '"' => {
                in_token = true;
                chars.next();
                loop {
                    match chars.next() {
                        None => return Err(ParseError::UnmatchedDoubleQuote),
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('n') => current.push('\n'),
                            Some('t') => current.push('\t'),
                            Some(escaped) => current.push(escaped),
                            None => return Err(ParseError::TrailingBackslash),
                        },
                        Some(c) => current.push(c),
                    }
                }
            }
            '\'' => {
                in_token = true;
                chars.next();
                loop {
                    match chars.next() {
                        None => return Err(ParseError::UnmatchedSingleQuote),
                        Some('\'') => break,
                        Some(c) => current.push(c),
                    }
                }
            }
            _ => {
                in_token = true;
                current.push(ch);
                chars.next();
            }
        }
    }

    if in_token {
        tokens.push(current);
    }

    Ok(tokens)
}
