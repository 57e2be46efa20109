//! Domain services: booklet structure, question parsing, query
//! generation and candidate validation.

pub mod block_segmenter;
pub mod choice_extractor;
pub mod csv_writer;
pub mod match_validator;
pub mod query_builder;
pub mod question_parser;
pub mod section_locator;

pub use block_segmenter::split_blocks;
pub use match_validator::{MatchValidator, Validation};
pub use query_builder::{QueryBuilder, SearchQuery};
pub use question_parser::{ParsedBatch, QuestionParser};
pub use section_locator::{locate_question_range, PageRange};
