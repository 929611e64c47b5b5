//! dsv-core: Core library for parsing delimiter-separated text into tables
//!
//! This library provides functionality to:
//! - Split a single line into fields, honoring quoted runs and doubled quotes
//! - Split a whole document into lines on a literal terminator
//! - Skip blank and comment lines, and check every row has the same width
//! - Take the header from the first row or synthesize `col_<i>` names
//! - Map header names and cell values into other types
//! - Project a table as a matrix or as a list of records

pub mod error;
pub mod options;
pub mod parser;
pub mod table;
pub mod tokenizer;

pub use error::{Error, ErrorKind, Result};
pub use options::{Dialect, ParseOptions};
pub use parser::{parse_str, parse_with, split_lines, Parser};
pub use table::{Record, Table};
pub use tokenizer::tokenize;
