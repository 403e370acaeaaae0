//! Rendering a compiled template against a record

use super::error::{LoggerError, Result};
use super::record::Record;
use super::resolver::TokenResolver;
use super::template::{Template, Token};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What rendering does with a placeholder no resolver knows
///
/// Has no `Default`; every configuration names one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedTokenPolicy {
    /// Rendering fails with `UnresolvedToken`
    Fail,
    /// The placeholder's own template text is inserted, e.g. `{nope:x}`
    Verbatim,
    /// The given marker text is inserted
    Marker(String),
}

impl fmt::Display for UnresolvedTokenPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedTokenPolicy::Fail => f.write_str("Fail"),
            UnresolvedTokenPolicy::Verbatim => f.write_str("Verbatim"),
            UnresolvedTokenPolicy::Marker(marker) => write!(f, "Marker({:?})", marker),
        }
    }
}

/// Output of a render pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    /// Placeholders replaced by the degraded-policy substitution
    pub unresolved: usize,
}

/// Stateless renderer bound to an unresolved-token policy
#[derive(Debug, Clone)]
pub struct Renderer {
    policy: UnresolvedTokenPolicy,
}

impl Renderer {
    pub fn new(policy: UnresolvedTokenPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &UnresolvedTokenPolicy {
        &self.policy
    }

    pub fn render(
        &self,
        template: &Template,
        record: &Record,
        resolver: &dyn TokenResolver,
    ) -> Result<String> {
        self.render_counted(template, record, resolver)
            .map(|rendered| rendered.text)
    }

    /// Render and report how many placeholders fell back to the policy
    pub fn render_counted(
        &self,
        template: &Template,
        record: &Record,
        resolver: &dyn TokenResolver,
    ) -> Result<Rendered> {
        let mut text = String::with_capacity(128);
        let mut unresolved = 0;

        for token in template.tokens() {
            match token {
                Token::Literal(literal) => text.push_str(literal),
                Token::Placeholder { name, args } => {
                    match resolver.resolve(name, args, record) {
                        Ok(value) => text.push_str(&value),
                        Err(LoggerError::UnresolvedToken { token: missing }) => {
                            match &self.policy {
                                UnresolvedTokenPolicy::Fail => {
                                    return Err(LoggerError::unresolved_token(missing));
                                }
                                UnresolvedTokenPolicy::Verbatim => {
                                    text.push_str(&token.to_string());
                                }
                                UnresolvedTokenPolicy::Marker(marker) => text.push_str(marker),
                            }
                            unresolved += 1;
                        }
                        Err(other) => return Err(other),
                    }
                }
            }
        }

        Ok(Rendered { text, unresolved })
    }
}
