pub mod api;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod report;
mod serialization;

pub use api::{parse, parse_bytes, parse_file, parse_lines, parse_value, parse_with_name, DecodedReport};
