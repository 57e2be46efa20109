pub mod page_dump;

pub use page_dump::PageDump;
