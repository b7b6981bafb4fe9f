//! Saving rendered reports to disk

mod writer;

pub use writer::ReportWriter;
