//! Configuration options for HTML to Markdown conversion

use std::fmt;
use std::str::FromStr;

/// Heading style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HeadingStyle {
    /// Setext headings (underlined with = or -).
    /// Only applies to h1 and h2, deeper levels fall back to ATX.
    #[default]
    Underlined,
    /// ATX headings (prefixed with #)
    Atx,
    /// ATX headings closed with a matching run of #
    AtxClosed,
}

/// How nested lists are indented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ListIndentType {
    #[default]
    Spaces,
    Tabs,
}

/// Delimiter used for strong and emphasized text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StrongEmSymbol {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "*"))]
    Asterisk,
    #[cfg_attr(feature = "serde", serde(rename = "_"))]
    Underscore,
}

impl StrongEmSymbol {
    pub fn as_str(self) -> &'static str {
        match self {
            StrongEmSymbol::Asterisk => "*",
            StrongEmSymbol::Underscore => "_",
        }
    }
}

/// Line break style for `<br>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NewlineStyle {
    /// Two trailing spaces
    #[default]
    Spaces,
    /// A trailing backslash
    Backslash,
}

/// Rendering of `<mark>` elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HighlightStyle {
    /// `==text==`
    #[default]
    DoubleEqual,
    /// `<mark>text</mark>`
    Html,
    /// `**text**`
    Bold,
}

/// Whitespace handling for text nodes outside `<pre>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WhitespaceMode {
    /// Collapse whitespace runs and drop formatting whitespace around blocks
    #[default]
    Normalized,
    /// Keep text exactly as the parser produced it
    Strict,
}

/// Options for HTML to Markdown conversion.
///
/// Defaults match the documented behaviour of the converter and are part of
/// its public contract.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConversionOptions {
    /// Heading style
    pub heading_style: HeadingStyle,

    /// Bullet markers, cycled by nesting depth
    pub bullets: String,

    /// Indentation unit for nested lists
    pub list_indent_type: ListIndentType,

    /// Spaces per nesting level (ignored for tabs)
    pub list_indent_width: usize,

    /// Delimiter for `<strong>`/`<em>` and friends
    pub strong_em_symbol: StrongEmSymbol,

    pub escape_asterisks: bool,
    pub escape_underscores: bool,
    /// Escape the remaining Markdown metacharacters
    pub escape_misc: bool,

    /// Render `<a href=x>x</a>` as `<x>`
    pub autolinks: bool,

    /// Use the href as link title when none is given
    pub default_title: bool,

    /// Line break style for `<br>`
    pub newline_style: NewlineStyle,

    /// Rendering of `<mark>`
    pub highlight_style: HighlightStyle,

    /// Default language for fenced code blocks
    pub code_language: String,

    /// Wrap paragraph text
    pub wrap: bool,
    pub wrap_width: usize,

    /// Only convert these tags (everything else unwraps)
    pub convert: Option<Vec<String>>,

    /// Never convert these tags
    pub strip: Option<Vec<String>>,

    pub whitespace_mode: WhitespaceMode,

    /// Parents in which inline-mode images keep their Markdown form
    pub keep_inline_images_in: Vec<String>,

    /// Render `<br>` inside table cells as `<br>`
    pub br_in_tables: bool,

    /// Markup around `<sub>` text, `<x>` becomes `<x>..</x>`
    pub sub_symbol: String,

    /// Markup around `<sup>` text, `<x>` becomes `<x>..</x>`
    pub sup_symbol: String,

    /// Prepend a comment block with `<head>` metadata
    pub extract_metadata: bool,

    /// Render everything as inline content
    pub convert_as_inline: bool,

    /// Replace newlines in the input with spaces before parsing
    pub strip_newlines: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Underlined,
            bullets: "*+-".to_string(),
            list_indent_type: ListIndentType::Spaces,
            list_indent_width: 4,
            strong_em_symbol: StrongEmSymbol::Asterisk,
            escape_asterisks: true,
            escape_underscores: true,
            escape_misc: true,
            autolinks: true,
            default_title: false,
            newline_style: NewlineStyle::Spaces,
            highlight_style: HighlightStyle::DoubleEqual,
            code_language: String::new(),
            wrap: false,
            wrap_width: 80,
            convert: None,
            strip: None,
            whitespace_mode: WhitespaceMode::Normalized,
            keep_inline_images_in: Vec::new(),
            br_in_tables: false,
            sub_symbol: String::new(),
            sup_symbol: String::new(),
            extract_metadata: true,
            convert_as_inline: false,
            strip_newlines: false,
        }
    }
}

impl ConversionOptions {
    /// One level of list indentation
    pub fn indent_unit(&self) -> String {
        match self.list_indent_type {
            ListIndentType::Tabs => "\t".to_string(),
            ListIndentType::Spaces => " ".repeat(self.list_indent_width),
        }
    }
}

/// HTML parser used to build the document tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ParserBackend {
    /// WHATWG-conformant html5ever tree builder (via scraper)
    #[default]
    Html5ever,
    /// The fast, non-validating `tl` parser
    Tl,
}

impl ParserBackend {
    /// Names accepted by [`FromStr`]
    pub const NAMES: &'static [&'static str] = &["html5ever", "scraper", "html.parser", "tl"];

    pub fn name(self) -> &'static str {
        match self {
            ParserBackend::Html5ever => "html5ever",
            ParserBackend::Tl => "tl",
        }
    }
}

impl fmt::Display for ParserBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a parser name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid parser '{0}'")]
pub struct UnknownParser(pub String);

impl FromStr for ParserBackend {
    type Err = UnknownParser;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html5ever" | "scraper" | "html.parser" => Ok(ParserBackend::Html5ever),
            "tl" => Ok(ParserBackend::Tl),
            _ => Err(UnknownParser(s.to_string())),
        }
    }
}

/// Options for decoding and parsing the input
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParsingOptions {
    /// Encoding label for byte input (WHATWG names, e.g. `utf-8`, `latin1`)
    pub encoding: String,
    pub parser: ParserBackend,
}

impl Default for ParsingOptions {
    fn default() -> Self {
        Self {
            encoding: "utf-8".to_string(),
            parser: ParserBackend::default(),
        }
    }
}

/// Content cleanup applied while walking the document
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PreprocessingOptions {
    pub enabled: bool,
    /// Skip `<nav>`, `role="navigation"` and nav/menu/breadcrumb classes
    pub remove_navigation: bool,
    /// Skip forms and form controls
    pub remove_forms: bool,
}

impl Default for PreprocessingOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            remove_navigation: true,
            remove_forms: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let options = ConversionOptions::default();
        assert_eq!(options.heading_style, HeadingStyle::Underlined);
        assert_eq!(options.bullets, "*+-");
        assert!(options.escape_asterisks && options.escape_underscores && options.escape_misc);
        assert!(options.autolinks);
        assert_eq!(options.whitespace_mode, WhitespaceMode::Normalized);
        assert_eq!(options.indent_unit(), "    ");
    }

    #[test]
    fn test_indent_unit_tabs() {
        let options = ConversionOptions {
            list_indent_type: ListIndentType::Tabs,
            list_indent_width: 2,
            ..Default::default()
        };
        assert_eq!(options.indent_unit(), "\t");
    }

    #[rstest]
    #[case("html5ever", ParserBackend::Html5ever)]
    #[case("html.parser", ParserBackend::Html5ever)]
    #[case(" Scraper ", ParserBackend::Html5ever)]
    #[case("tl", ParserBackend::Tl)]
    fn test_parser_names(#[case] name: &str, #[case] expected: ParserBackend) {
        assert_eq!(name.parse::<ParserBackend>(), Ok(expected));
    }

    #[test]
    fn test_unknown_parser() {
        let err = "lxml".parse::<ParserBackend>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid parser 'lxml'");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_partial_config() {
        let options: ConversionOptions = serde_json::from_str(
            r#"{"heading_style": "atx_closed", "highlight_style": "bold", "strong_em_symbol": "_"}"#,
        )
        .unwrap();
        assert_eq!(options.heading_style, HeadingStyle::AtxClosed);
        assert_eq!(options.highlight_style, HighlightStyle::Bold);
        assert_eq!(options.strong_em_symbol, StrongEmSymbol::Underscore);
        assert_eq!(options.bullets, "*+-");
    }
}
