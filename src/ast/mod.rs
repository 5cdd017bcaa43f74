//! Abstract Syntax Tree (AST) definitions for the HLSL front end.
//!
//! The tree is built bottom-up by the parser and is immutable afterwards.
//! Every node carries a byte-offset `Span` into the source unit; declaration
//! order inside `Program` reflects source order, which later passes rely on.

mod declarations;
mod expressions;
mod program;
mod statements;
mod types;

pub use declarations::*;
pub use expressions::*;
pub use program::*;
pub use statements::*;
pub use types::*;

use serde::{Deserialize, Serialize};

/// Span information for source location tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}
