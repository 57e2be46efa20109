//! # pdf_to_codes
//!
//! Extracts the extra questions from a residency-course booklet dump
//! and resolves each one to its code in the question catalog.
//!
//! ## Architecture
//!
//! The system keeps a strict layering:
//!
//! ### ① Infrastructure
//! - `infrastructure/` - holds the scarce resource (the browser page)
//! - `PageDriver` - sole page owner, exposes navigation and eval()
//!
//! ### ② Services
//! - `services/` - capabilities over a single question or text
//! - `section_locator` / `block_segmenter` - booklet structure
//! - `question_parser` / `choice_extractor` - block → question
//! - `query_builder` - the search-query ladder
//! - `match_validator` - fuzzy acceptance and confidence tiers
//! - `csv_writer` - the result sink
//!
//! ### ③ Workflow
//! - `workflow/` - the full search flow of one question
//! - `QuestionCtx` - context wrapper (number + kind)
//! - `CodeFinder` - query ladder → pages → rows → validation
//!
//! ### ④ Orchestration
//! - `orchestrator/app` - lifecycle: browser, login wait, sinks
//! - `orchestrator/booklet_processor` - one booklet, all questions

pub mod browser;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// Re-exports of the commonly used types.
pub use browser::connect_to_browser_and_page;
pub use clients::{CatalogClient, SearchProvider};
pub use config::Config;
pub use error::{SkipReason, StructureError};
pub use infrastructure::PageDriver;
pub use models::loaders::PageDump;
pub use models::{CandidateRecord, Confidence, MatchResult, ParsedQuestion, QuestionKind};
pub use orchestrator::{process_booklet, App, RunReport};
pub use workflow::{CodeFinder, QuestionCtx};
