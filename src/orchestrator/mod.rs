//! Orchestration layer.
//!
//! `app` manages the lifecycle (browser, login, sinks);
//! `booklet_processor` drives one page dump through segmentation,
//! parsing and the per-question search flow.
//!
//! ```text
//! app (lifecycle)
//!     ↓
//! booklet_processor (one booklet)
//!     ↓
//! workflow::CodeFinder (one question)
//!     ↓
//! services (parsing / queries / validation)
//!     ↓
//! clients + infrastructure (catalog access)
//! ```

pub mod app;
pub mod booklet_processor;

pub use app::App;
pub use booklet_processor::{process_booklet, RunReport};
