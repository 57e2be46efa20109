//! Per-question processing context.
//!
//! Wraps "which question of the booklet am I working on" for log
//! lines and the result report.

use crate::models::question::QuestionKind;
use std::fmt::Display;

#[derive(Debug, Clone)]
pub struct QuestionCtx {
    /// Number printed in the booklet, when the block carried one.
    pub number: Option<u32>,

    /// Position in the processing order (1-based, logs only).
    pub position: usize,

    pub kind: QuestionKind,
}

impl QuestionCtx {
    pub fn new(number: Option<u32>, position: usize, kind: QuestionKind) -> Self {
        Self {
            number,
            position,
            kind,
        }
    }

    /// Booklet number when known, processing position otherwise.
    pub fn label(&self) -> String {
        match self.number {
            Some(n) => format!("Q{}", n),
            None => format!("Q{}", self.position),
        }
    }
}

impl Display for QuestionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} {}]", self.kind.log_tag(), self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_falls_back_to_position_with_the_same_prefix() {
        let ctx = QuestionCtx::new(Some(7), 3, QuestionKind::Specialty);
        assert_eq!(ctx.label(), "Q7");
        let ctx = QuestionCtx::new(None, 3, QuestionKind::Specialty);
        assert_eq!(ctx.label(), "Q3");
    }
}
