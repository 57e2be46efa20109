pub mod catalog;
pub mod loaders;
pub mod question;

pub use catalog::{CandidateRecord, Confidence, MatchResult, RawRow};
pub use loaders::PageDump;
pub use question::{ParsedQuestion, QuestionKind};
