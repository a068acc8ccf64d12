//! # htmldown
//!
//! Convert HTML documents to Markdown.
//!
//! ## Design
//!
//! Input is parsed once into an arena-backed [`Document`] (html5ever via
//! `scraper` by default, or `tl`). A stack-based walker renders it bottom-up:
//! each element's children are converted first and the element's converter
//! receives their concatenated Markdown. Converters are looked up by tag name
//! in a registry built per conversion from [`ConversionOptions`].
//!
//! - **Deterministic**: the same input and options always give the same bytes
//! - **Streaming**: [`HtmldownService::convert_stream`] yields chunks whose
//!   concatenation equals [`HtmldownService::convert`]
//! - **Extensible**: converters can be replaced or added per tag
//!
//! ## Example
//!
//! ```rust
//! use htmldown::{convert, ConversionOptions};
//!
//! let markdown = convert("<ul><li>a</li><li>b</li></ul>", &ConversionOptions::default()).unwrap();
//! assert_eq!(markdown, "* a\n* b\n");
//! ```
//!
//! ## Example (custom converter)
//!
//! ```rust
//! use htmldown::{HtmldownService, Rule};
//!
//! let mut service = HtmldownService::new();
//! service.add_converter("span", Rule::new(|node, text, _inline| {
//!     match node.get_str("class") {
//!         Some("key") => format!("[{text}]"),
//!         _ => text.to_string(),
//!     }
//! }));
//!
//! let markdown = service.convert(r#"<p>Press <span class="key">Enter</span></p>"#).unwrap();
//! assert_eq!(markdown, "Press [Enter]\n\n");
//! ```

pub mod html;
pub mod metadata;
pub mod node;
mod rules;
mod service;
pub mod stream;
mod utilities;

pub use html::{available_parsers, decode_input, parse_html, parser_from_name};
pub use htmldown_core::{
    ConversionOptions, HeadingStyle, HighlightStyle, ListIndentType, NewlineStyle, ParserBackend,
    ParsingOptions, PreprocessingOptions, StrongEmSymbol, UnknownParser, WhitespaceMode,
};
pub use metadata::{extract_metadata, render_metadata};
pub use node::{Document, Element, NodeId, NodeKind, NodeRef, View};
pub use rules::{
    build_registry, language_from_class, ConvertFn, Hooks, LanguageResolver, Rule, Rules, TagFilter,
};
pub use service::HtmldownService;
pub use stream::{MarkdownStream, ProgressFn, StreamingOptions};
pub use utilities::*;

/// Error type for htmldown operations
#[derive(Debug, thiserror::Error)]
pub enum HtmldownError {
    #[error("The input HTML is empty.")]
    EmptyInput,

    #[error("Only one of 'strip' and 'convert' can be specified.")]
    ConflictingConfiguration,

    #[error("Invalid parser '{parser}'. Available parsers: {available}")]
    UnsupportedParser { parser: String, available: String },

    #[error("{dependency} is not installed. Enable the `{feature}` feature.")]
    MissingDependency {
        dependency: &'static str,
        feature: &'static str,
    },

    #[error("Cannot decode input as '{encoding}'")]
    InvalidEncoding { encoding: String },

    #[error("HTML parse error: {0}")]
    Parse(String),

    /// Raised by a caller-supplied converter
    #[error(transparent)]
    Converter(Box<dyn std::error::Error + Send + Sync>),
}

impl From<UnknownParser> for HtmldownError {
    fn from(err: UnknownParser) -> Self {
        HtmldownError::UnsupportedParser {
            parser: err.0,
            available: available_parsers().join(", "),
        }
    }
}

pub type Result<T> = std::result::Result<T, HtmldownError>;

/// Convert an HTML string with `options` and the default parser
pub fn convert(html: &str, options: &ConversionOptions) -> Result<String> {
    HtmldownService::with_options(options.clone()).convert(html)
}
