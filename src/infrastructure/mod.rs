//! Infrastructure layer: raw browser-page access.

mod page_driver;

pub use page_driver::PageDriver;
