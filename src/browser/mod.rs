//! Browser attachment over the DevTools protocol.

mod connection;

pub use connection::connect_to_browser_and_page;
