//! Input parsing, cell coercion and raw source data.

pub mod coerce;
mod parser;
mod source;

pub use parser::{Parser, ParserConfig};
pub use source::{content_hash, RawTable, SourceMetadata};
