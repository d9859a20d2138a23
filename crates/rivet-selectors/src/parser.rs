//! Selector parser
//!
//! Hand-rolled scanner producing a compound-selector chain. The rightmost
//! compound is last; `combinators[i]` joins `compounds[i]` to
//! `compounds[i + 1]`.

use crate::SelectorError;

/// A parsed complex selector
#[derive(Debug, Clone)]
pub struct Selector {
    /// Original source text
    pub text: String,
    /// Compound selectors, leftmost first
    pub compounds: Vec<CompoundSelector>,
    /// Combinators between adjacent compounds (`compounds.len() - 1` entries)
    pub combinators: Vec<Combinator>,
}

/// Combinator between two compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: any ancestor
    Descendant,
    /// `>`: direct parent
    Child,
}

/// One compound selector (simple parts applying to a single element)
#[derive(Debug, Clone)]
pub struct CompoundSelector {
    pub parts: Vec<SimplePart>,
}

/// A simple selector part
#[derive(Debug, Clone, PartialEq)]
pub enum SimplePart {
    /// Universal selector *
    Universal,
    /// Type selector (tag name)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        match (&self.matcher, value) {
            (None, Some(_)) => true, // [attr] - just check existence
            (_, None) => false,
            (Some(matcher), Some(val)) => match matcher {
                AttributeMatcher::Exact(expected) => val == expected,
                AttributeMatcher::Contains(expected) => {
                    val.split_whitespace().any(|w| w == expected)
                }
                AttributeMatcher::DashMatch(expected) => {
                    val == expected || val.starts_with(&format!("{}-", expected))
                }
                AttributeMatcher::Prefix(expected) => val.starts_with(expected.as_str()),
                AttributeMatcher::Suffix(expected) => val.ends_with(expected.as_str()),
                AttributeMatcher::Substring(expected) => val.contains(expected.as_str()),
            },
        }
    }
}

impl Selector {
    /// Parse a selector string
    pub fn parse(input: &str) -> Result<Selector, SelectorError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(SelectorError::Empty);
        }

        let chars: Vec<char> = text.chars().collect();
        let mut compounds = Vec::new();
        let mut combinators = Vec::new();
        let mut i = 0;

        loop {
            let (compound, next) = parse_compound(&chars, i, text)?;
            compounds.push(compound);
            i = next;

            let mut saw_whitespace = false;
            while i < chars.len() && chars[i].is_whitespace() {
                saw_whitespace = true;
                i += 1;
            }
            if i >= chars.len() {
                break;
            }
            if chars[i] == '>' {
                i += 1;
                while i < chars.len() && chars[i].is_whitespace() {
                    i += 1;
                }
                if i >= chars.len() {
                    return Err(SelectorError::ExpectedIdentifier {
                        offset: i,
                        selector: text.to_string(),
                    });
                }
                combinators.push(Combinator::Child);
            } else if saw_whitespace {
                combinators.push(Combinator::Descendant);
            } else {
                return Err(SelectorError::UnexpectedChar {
                    ch: chars[i],
                    offset: i,
                    selector: text.to_string(),
                });
            }
        }

        Ok(Selector {
            text: text.to_string(),
            compounds,
            combinators,
        })
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}

fn read_ident(chars: &[char], mut i: usize) -> (String, usize) {
    let start = i;
    while i < chars.len() && is_ident_char(chars[i]) {
        i += 1;
    }
    (chars[start..i].iter().collect(), i)
}

fn parse_compound(
    chars: &[char],
    mut i: usize,
    text: &str,
) -> Result<(CompoundSelector, usize), SelectorError> {
    let mut parts = Vec::new();

    while i < chars.len() {
        match chars[i] {
            '*' => {
                parts.push(SimplePart::Universal);
                i += 1;
            }
            '#' => {
                let (ident, next) = read_ident(chars, i + 1);
                if ident.is_empty() {
                    return Err(SelectorError::ExpectedIdentifier {
                        offset: i + 1,
                        selector: text.to_string(),
                    });
                }
                parts.push(SimplePart::Id(ident));
                i = next;
            }
            '.' => {
                let (ident, next) = read_ident(chars, i + 1);
                if ident.is_empty() {
                    return Err(SelectorError::ExpectedIdentifier {
                        offset: i + 1,
                        selector: text.to_string(),
                    });
                }
                parts.push(SimplePart::Class(ident));
                i = next;
            }
            '[' => {
                let (attr, next) = parse_attribute(chars, i + 1, text)?;
                parts.push(SimplePart::Attribute(attr));
                i = next;
            }
            ch if is_ident_char(ch) => {
                let (ident, next) = read_ident(chars, i);
                parts.push(SimplePart::Type(ident.to_lowercase()));
                i = next;
            }
            _ => break,
        }
    }

    if parts.is_empty() {
        return Err(SelectorError::UnexpectedChar {
            ch: chars.get(i).copied().unwrap_or(' '),
            offset: i,
            selector: text.to_string(),
        });
    }
    Ok((CompoundSelector { parts }, i))
}

fn parse_attribute(
    chars: &[char],
    mut i: usize,
    text: &str,
) -> Result<(AttributeSelector, usize), SelectorError> {
    let (name, next) = read_ident(chars, i);
    if name.is_empty() {
        return Err(SelectorError::ExpectedIdentifier {
            offset: i,
            selector: text.to_string(),
        });
    }
    i = next;

    if i < chars.len() && chars[i] == ']' {
        return Ok((
            AttributeSelector {
                name,
                matcher: None,
            },
            i + 1,
        ));
    }

    // Operator: =, ~=, |=, ^=, $=, *=
    let op = match chars.get(i) {
        Some('=') => {
            i += 1;
            '='
        }
        Some(&ch @ ('~' | '|' | '^' | '$' | '*')) if chars.get(i + 1) == Some(&'=') => {
            i += 2;
            ch
        }
        None => {
            return Err(SelectorError::UnclosedAttribute {
                selector: text.to_string(),
            })
        }
        Some(&ch) => {
            return Err(SelectorError::UnexpectedChar {
                ch,
                offset: i,
                selector: text.to_string(),
            })
        }
    };

    // Value, optionally quoted
    let value = if let Some(&quote @ ('"' | '\'')) = chars.get(i) {
        i += 1;
        let start = i;
        while i < chars.len() && chars[i] != quote {
            i += 1;
        }
        if i >= chars.len() {
            return Err(SelectorError::UnclosedAttribute {
                selector: text.to_string(),
            });
        }
        let value: String = chars[start..i].iter().collect();
        i += 1;
        value
    } else {
        let start = i;
        while i < chars.len() && chars[i] != ']' {
            i += 1;
        }
        chars[start..i].iter().collect()
    };

    if chars.get(i) != Some(&']') {
        return Err(SelectorError::UnclosedAttribute {
            selector: text.to_string(),
        });
    }

    let matcher = match op {
        '=' => AttributeMatcher::Exact(value),
        '~' => AttributeMatcher::Contains(value),
        '|' => AttributeMatcher::DashMatch(value),
        '^' => AttributeMatcher::Prefix(value),
        '$' => AttributeMatcher::Suffix(value),
        _ => AttributeMatcher::Substring(value),
    };
    Ok((
        AttributeSelector {
            name,
            matcher: Some(matcher),
        },
        i + 1,
    ))
}
