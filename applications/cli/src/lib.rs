//! Songtag command line front end
//!
//! Loads [`config::AppConfig`], wires the decoder registry, storage and
//! resolver together and renders resolved songs as JSON reports.

pub mod config;
pub mod report;

pub use config::AppConfig;
pub use report::SongReport;
