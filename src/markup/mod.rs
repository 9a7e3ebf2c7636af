//! Markup parsing: raw page text to structured document trees.

mod document;
mod parser;
mod registry;

pub use document::{HeadingLevel, ListItem, Node, ParsedDocument};
pub use parser::{MarkupParser, ParseError, WikiMarkupParser};
pub use registry::{DEFAULT_PARSER, ParserFactory, ParserInstantiationError, ParserRegistry};
