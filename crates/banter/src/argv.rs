//! Argument tokenizer and typed argument parser.
//!
//! Commands declare an ordered [`ArgSpec`] describing how their positional
//! arguments are coerced. [`parse_arguments`] walks the token sequence with an
//! immutable cursor and produces one [`ArgValue`] per spec entry, then appends
//! any remaining tokens verbatim - a command may declare a fixed prefix of
//! typed arguments and still receive an open-ended trailing tail.
//!
//! # Quoted strings
//!
//! A `string` argument opening with `"` or `'` consumes tokens until one ends
//! with the same quote character (the opening token itself counts, so a
//! single-token quoted string is valid). The consumed span is re-joined with
//! the separator and both quote characters are stripped:
//!
//! ```
//! use banter::argv::{parse_arguments, ArgSpec, ArgValue};
//!
//! let tokens: Vec<String> = ["say", "\"hello", "world\""]
//!     .map(String::from)
//!     .to_vec();
//! let args = parse_arguments(&tokens, &[ArgSpec::Str], 1, " ").unwrap();
//! assert_eq!(args, [ArgValue::Str("hello world".into())]);
//! ```
//!
//! An unterminated quote is not an error: the opening token is taken alone
//! with its leading quote stripped.

use std::sync::Arc;

use crate::error::{ParseError, ParseResult};

/// A parsed argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// A string argument (or a verbatim trailing token).
    Str(String),
    /// A numeric argument.
    Num(f64),
}

impl ArgValue {
    /// Returns the string content, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Num(_) => None,
        }
    }

    /// Returns the numeric content, if this is a numeric value.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Self::Num(n) => Some(*n),
            Self::Str(_) => None,
        }
    }
}

impl std::fmt::Display for ArgValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s}"),
            Self::Num(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<f64> for ArgValue {
    fn from(n: f64) -> Self {
        Self::Num(n)
    }
}

/// A type-erased custom argument parser.
///
/// Returning `None` means the token could not be coerced and fails the whole
/// invocation with [`ParseError::Custom`].
pub type CustomParser = Arc<dyn Fn(&str) -> Option<ArgValue> + Send + Sync>;

/// One entry of a command's argument type spec.
///
/// The set of recognized coercions is closed: anything beyond `Str` and `Num`
/// is expressed as a `Custom` function, so a malformed spec cannot exist at
/// runtime.
#[derive(Clone)]
pub enum ArgSpec {
    /// Take the token as a string; supports quoted multi-token spans.
    Str,
    /// Parse the token as a floating-point number.
    Num,
    /// Coerce the token with a user-supplied function.
    Custom(CustomParser),
}

impl ArgSpec {
    /// Wraps a closure as a custom spec entry.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> Option<ArgValue> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }
}

impl std::fmt::Debug for ArgSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Str => write!(f, "Str"),
            Self::Num => write!(f, "Num"),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Splits message text into a token sequence by the configured separator.
///
/// Mirrors a plain string split: consecutive separators produce empty tokens,
/// and the prefix and command name are just the first two tokens.
pub fn split_tokens(text: &str, separator: &str) -> Vec<String> {
    text.split(separator).map(str::to_string).collect()
}

/// Coerces tokens to typed values according to `spec`.
///
/// Consumes tokens starting at `offset` (by convention 2, skipping the prefix
/// token and the command name). For each spec entry in order, one or more
/// tokens are consumed as described on [`ArgSpec`]; once the spec is
/// exhausted, any remaining tokens are appended verbatim as
/// [`ArgValue::Str`].
///
/// # Errors
///
/// - [`ParseError::ArgumentCount`] if the cursor runs past the available
///   tokens before the spec is satisfied
/// - [`ParseError::Custom`] if a custom parser declines its token
/// - [`ParseError::InvalidNumber`] if a `Num` token is not a valid float
pub fn parse_arguments(
    tokens: &[String],
    spec: &[ArgSpec],
    offset: usize,
    separator: &str,
) -> ParseResult<Vec<ArgValue>> {
    let mut parsed = Vec::with_capacity(spec.len());
    let mut cursor = offset;

    for entry in spec {
        if cursor >= tokens.len() {
            return Err(ParseError::ArgumentCount {
                expected: spec.len(),
                received: parsed.len(),
            });
        }
        let token = &tokens[cursor];

        match entry {
            ArgSpec::Custom(parser) => {
                let value = parser(token).ok_or_else(|| ParseError::Custom {
                    token: token.clone(),
                })?;
                parsed.push(value);
                cursor += 1;
            }
            ArgSpec::Str => match token.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    // Scan forward for a token closed by the same quote
                    // character; the opening token itself counts.
                    match (cursor..tokens.len()).find(|&j| tokens[j].ends_with(quote)) {
                        Some(close) => {
                            let joined = tokens[cursor..=close].join(separator);
                            parsed.push(ArgValue::Str(strip_quote_pair(&joined)));
                            cursor = close + 1;
                        }
                        None => {
                            // Unterminated quote: take the opening token alone,
                            // leading quote stripped. Not an error.
                            parsed.push(ArgValue::Str(token[1..].to_string()));
                            cursor += 1;
                        }
                    }
                }
                _ => {
                    parsed.push(ArgValue::Str(token.clone()));
                    cursor += 1;
                }
            },
            ArgSpec::Num => {
                let value: f64 = token.parse().map_err(|_| ParseError::InvalidNumber {
                    token: token.clone(),
                })?;
                parsed.push(ArgValue::Num(value));
                cursor += 1;
            }
        }
    }

    // Open-ended trailing tail, appended verbatim.
    for tail in &tokens[cursor..] {
        parsed.push(ArgValue::Str(tail.clone()));
    }

    Ok(parsed)
}

/// Strips one leading and one trailing quote character.
///
/// The caller guarantees both ends are single-byte quote characters; a span
/// shorter than two bytes (a lone quote token) collapses to the empty string.
fn strip_quote_pair(s: &str) -> String {
    if s.len() >= 2 {
        s[1..s.len() - 1].to_string()
    } else {
        String::new()
    }
}
