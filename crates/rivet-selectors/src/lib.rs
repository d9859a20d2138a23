//! Rivet Selectors
//!
//! CSS selector parsing and matching against the rivet-dom tree. Covers the
//! structural subset used as event-dispatch keys: type/id/class/attribute
//! compounds joined by descendant and child combinators.

mod matching;
mod parser;

pub use matching::{closest, matches, query, query_all};
pub use parser::{
    AttributeMatcher, AttributeSelector, Combinator, CompoundSelector, Selector, SimplePart,
};

/// Selector parsing error
#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected character '{ch}' at offset {offset} in selector '{selector}'")]
    UnexpectedChar {
        ch: char,
        offset: usize,
        selector: String,
    },
    #[error("expected identifier at offset {offset} in selector '{selector}'")]
    ExpectedIdentifier { offset: usize, selector: String },
    #[error("unclosed attribute selector in '{selector}'")]
    UnclosedAttribute { selector: String },
}
