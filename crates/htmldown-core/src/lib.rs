//! Option types and pure text transforms shared by the htmldown crates.
//!
//! Nothing in here knows about the DOM: the [`text`] module works on plain
//! strings and [`options`] holds the configuration snapshot the converter reads.

pub mod options;
pub mod text;

pub use options::{
    ConversionOptions, HeadingStyle, HighlightStyle, ListIndentType, NewlineStyle,
    ParserBackend, ParsingOptions, PreprocessingOptions, StrongEmSymbol, UnknownParser,
    WhitespaceMode,
};
