//! Template compilation
//!
//! A template is literal text with `{name}` or `{name:arg1:arg2}` placeholders.
//!
//! - `{{` and `}}` produce a literal `{` and `}`.
//! - Inside a placeholder, `:` separates the name from its arguments. Arguments
//!   may be empty and cannot contain braces.
//! - The name must be non-empty. Names are not checked against the resolver set
//!   here; unknown names are handled at render time.
//!
//! Compiling is a single left-to-right scan and never allocates per record.
//! [`Template`]'s `Display` writes the canonical source form, so
//! `Template::compile(&t.to_string())` yields `t` again.

use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const PLACEHOLDER_OPEN: char = '{';
pub const PLACEHOLDER_CLOSE: char = '}';
pub const ARG_SEPARATOR: char = ':';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    Literal(String),
    Placeholder { name: String, args: Vec<String> },
}

impl Token {
    pub fn placeholder(name: impl Into<String>, args: Vec<String>) -> Self {
        Token::Placeholder {
            name: name.into(),
            args,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Token::Literal(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Literal(text) => {
                for ch in text.chars() {
                    match ch {
                        PLACEHOLDER_OPEN => f.write_str("{{")?,
                        PLACEHOLDER_CLOSE => f.write_str("}}")?,
                        other => write!(f, "{}", other)?,
                    }
                }
                Ok(())
            }
            Token::Placeholder { name, args } => {
                write!(f, "{{{}", name)?;
                for arg in args {
                    write!(f, "{}{}", ARG_SEPARATOR, arg)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// A compiled, immutable token sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    tokens: Vec<Token>,
}

impl Template {
    pub fn compile(source: &str) -> Result<Self> {
        let bytes = source.as_bytes();
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut run_start = 0;
        let mut pos = 0;

        while pos < bytes.len() {
            match bytes[pos] {
                b'{' if bytes.get(pos + 1) == Some(&b'{') => {
                    literal.push_str(&source[run_start..pos]);
                    literal.push(PLACEHOLDER_OPEN);
                    pos += 2;
                    run_start = pos;
                }
                b'}' if bytes.get(pos + 1) == Some(&b'}') => {
                    literal.push_str(&source[run_start..pos]);
                    literal.push(PLACEHOLDER_CLOSE);
                    pos += 2;
                    run_start = pos;
                }
                b'{' => {
                    literal.push_str(&source[run_start..pos]);
                    let close = Self::find_close(bytes, pos)?;
                    let placeholder = Self::parse_placeholder(&source[pos + 1..close], pos)?;

                    if !literal.is_empty() {
                        tokens.push(Token::Literal(std::mem::take(&mut literal)));
                    }
                    tokens.push(placeholder);

                    pos = close + 1;
                    run_start = pos;
                }
                b'}' => {
                    return Err(LoggerError::template_syntax(
                        pos,
                        "unmatched '}' (write '}}' for a literal brace)",
                    ));
                }
                _ => pos += 1,
            }
        }

        literal.push_str(&source[run_start..]);
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Ok(Self { tokens })
    }

    /// Byte index of the `}` closing the placeholder opened at `open`
    fn find_close(bytes: &[u8], open: usize) -> Result<usize> {
        for (offset, byte) in bytes[open + 1..].iter().enumerate() {
            match byte {
                b'}' => return Ok(open + 1 + offset),
                b'{' => {
                    return Err(LoggerError::template_syntax(
                        open + 1 + offset,
                        "'{' inside placeholder",
                    ))
                }
                _ => {}
            }
        }
        Err(LoggerError::template_syntax(open, "unterminated placeholder"))
    }

    fn parse_placeholder(body: &str, open: usize) -> Result<Token> {
        let mut parts = body.split(ARG_SEPARATOR);
        let name = parts.next().unwrap_or_default();
        if name.is_empty() {
            return Err(LoggerError::template_syntax(open + 1, "empty placeholder name"));
        }

        Ok(Token::placeholder(name, parts.map(str::to_string).collect()))
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Names of all placeholders, in template order (duplicates kept)
    pub fn placeholder_names(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|token| match token {
            Token::Placeholder { name, .. } => Some(name.as_str()),
            Token::Literal(_) => None,
        })
    }

    /// True when the template has no placeholders
    pub fn is_static(&self) -> bool {
        self.tokens.iter().all(Token::is_literal)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl FromStr for Template {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        Template::compile(s)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}
