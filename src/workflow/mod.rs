//! Workflow layer: the search flow of a single question.

pub mod code_finder;
pub mod question_ctx;

pub use code_finder::CodeFinder;
pub use question_ctx::QuestionCtx;
