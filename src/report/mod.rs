//! Plain-text and JSON renderings of dialogue outcomes.

mod formatter;

pub use formatter::ReportFormatter;
