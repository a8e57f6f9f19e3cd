//! Core data models for the sheet feed
//!
//! This module contains the record types produced by the pipeline, plus the
//! CSV tokenizer, the row normalizer and the upstream table sources.

pub mod csv;
pub mod normalize;
pub mod source;

pub use csv::{to_csv, tokenize};
pub use normalize::normalize;
pub use source::{FileSource, HttpSource, TableSource, TransportError};

use serde::{Deserialize, Serialize};

/// Rows of fields exactly as the tokenizer produced them
pub type RawTable = Vec<Vec<String>>;

/// One normalized row of the sheet
///
/// Every field defaults to the empty string when the source row is short.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// School / program name; never empty in normalized output
    pub program: String,
    /// Conference the program plays in
    pub conference: String,
    /// Date column as written upstream (not parsed)
    pub date: String,
}

impl Record {
    /// Convenience constructor
    pub fn new(
        program: impl Into<String>,
        conference: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            conference: conference.into(),
            date: date.into(),
        }
    }
}

/// Shape handed to collaborators: `{ "data": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableResponse {
    /// Normalized records in upstream order
    pub data: Vec<Record>,
}

impl From<Vec<Record>> for TableResponse {
    fn from(data: Vec<Record>) -> Self {
        Self { data }
    }
}
