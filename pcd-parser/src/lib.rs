pub mod error;
pub mod parser;

pub use error::ParseError;
pub use parser::{get_extension, merged_provider, provider_for, Extension, Parser, ParserProvider};
