//! Block converters: headings, paragraphs, quotes, code blocks and the
//! HTML5 sectioning and text-level semantics elements.

use once_cell::sync::Lazy;
use regex::Regex;

use htmldown_core::text::{fill, underline};
use htmldown_core::{ConversionOptions, HeadingStyle, HighlightStyle, NewlineStyle};

use super::raw::RawTag;
use crate::node::NodeRef;
use crate::utilities::{clean_attribute, heading_level, HEADINGS, TABLE_CELLS};

static LANGUAGE_CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:language|lang)-(\S+)$").expect("language class pattern"));

/// Content wrapped as a block: trimmed text followed by a blank line
fn block_text(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        String::new()
    } else {
        format!("{text}\n\n")
    }
}

pub fn heading(node: &NodeRef<'_>, text: &str, inline: bool, options: &ConversionOptions) -> String {
    if inline {
        return text.to_string();
    }
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    let level = node.tag_name().and_then(heading_level).unwrap_or(1);
    match options.heading_style {
        HeadingStyle::Underlined if level == 1 => underline(text, '='),
        HeadingStyle::Underlined if level == 2 => underline(text, '-'),
        HeadingStyle::AtxClosed => {
            let hashes = "#".repeat(level);
            format!("{hashes} {text} {hashes}\n\n")
        }
        _ => format!("{} {text}\n\n", "#".repeat(level)),
    }
}

pub fn paragraph(_node: &NodeRef<'_>, text: &str, inline: bool, options: &ConversionOptions) -> String {
    if inline {
        return text.to_string();
    }
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    if options.wrap {
        format!("{}\n\n", fill(text, options.wrap_width))
    } else {
        format!("{text}\n\n")
    }
}

pub fn blockquote(node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    if inline {
        return text.to_string();
    }
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    let quoted = text
        .lines()
        .map(|line| format!("> {line}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut result = format!("\n{quoted}\n\n");
    if let Some(cite) = clean_attribute(node.get_str("cite")) {
        result.push_str(&format!("— <{cite}>\n\n"));
    }
    result
}

pub fn line_break(node: &NodeRef<'_>, _text: &str, _inline: bool, options: &ConversionOptions) -> String {
    if node.has_ancestor(HEADINGS) {
        return " ".to_string();
    }
    if options.br_in_tables && node.has_ancestor(TABLE_CELLS) {
        return "<br>".to_string();
    }
    match options.newline_style {
        NewlineStyle::Backslash => "\\\n".to_string(),
        NewlineStyle::Spaces => "  \n".to_string(),
    }
}

pub fn rule(_node: &NodeRef<'_>, _text: &str, _inline: bool, _options: &ConversionOptions) -> String {
    "\n\n---\n\n".to_string()
}

/// Fenced code block; `language` has already been resolved by the caller
pub fn code_block(text: &str, language: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = text.strip_suffix('\n').unwrap_or(text);
    format!("\n```{language}\n{text}\n```\n")
}

/// Language named by a `language-*` or `lang-*` class on a `<pre>` or its
/// `<code>` child.
///
/// Plug it into the service with `with_code_language`:
///
/// ```rust
/// use std::sync::Arc;
/// use htmldown::{language_from_class, HtmldownService};
///
/// let mut service = HtmldownService::new();
/// service.with_code_language(Arc::new(language_from_class));
///
/// let markdown = service
///     .convert(r#"<pre><code class="language-rust">let x = 1;</code></pre>"#)
///     .unwrap();
/// assert_eq!(markdown, "\n```rust\nlet x = 1;\n```\n");
/// ```
pub fn language_from_class(node: &NodeRef<'_>) -> Option<String> {
    let from = |node: &NodeRef<'_>| {
        node.get_list("class").into_iter().find_map(|class| {
            LANGUAGE_CLASS_RE
                .captures(class)
                .map(|caps| caps[1].to_string())
        })
    };
    from(node).or_else(|| node.children().find(|child| child.is("code")).and_then(|code| from(&code)))
}

/// `article`, `section`, `div` and the other sectioning containers
pub fn container(_node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    if inline {
        return text.to_string();
    }
    block_text(text)
}

/// `hgroup` keeps its headings as they are
pub fn heading_group(_node: &NodeRef<'_>, text: &str, _inline: bool, _options: &ConversionOptions) -> String {
    text.to_string()
}

pub fn dialog(_node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    if inline {
        return text.to_string();
    }
    let text = text.trim_end_matches([' ', '\t']);
    if text.is_empty() || text.ends_with("\n\n") {
        text.to_string()
    } else {
        format!("{text}\n\n")
    }
}

pub fn details(_node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    if inline {
        return text.to_string();
    }
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    format!("{}\n\n", RawTag::new("details").wrap_lines(text))
}

pub fn summary(_node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    if inline {
        return text.to_string();
    }
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    format!("{}\n\n", RawTag::new("summary").wrap(text))
}

pub fn definition_list(_node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    if inline {
        return text.to_string();
    }
    if text.trim().is_empty() {
        return String::new();
    }
    format!("{text}\n")
}

pub fn definition_term(_node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    if inline {
        return text.to_string();
    }
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    format!("{text}\n")
}

pub fn definition(_node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    if inline {
        return text.to_string();
    }
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    format!(":   {text}\n\n")
}

pub fn figcaption(_node: &NodeRef<'_>, text: &str, _inline: bool, _options: &ConversionOptions) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    format!("\n\n{text}\n\n")
}

pub fn cite(_node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    if inline {
        return text.to_string();
    }
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    format!("*{text}*")
}

pub fn quote(_node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    if inline {
        return text.to_string();
    }
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    format!("\"{}\"", text.replace('"', "\\\""))
}

pub fn mark(_node: &NodeRef<'_>, text: &str, inline: bool, options: &ConversionOptions) -> String {
    if inline {
        return text.to_string();
    }
    match options.highlight_style {
        HighlightStyle::DoubleEqual => format!("=={text}=="),
        HighlightStyle::Html => RawTag::new("mark").wrap(text),
        HighlightStyle::Bold => {
            let symbol = options.strong_em_symbol.as_str().repeat(2);
            format!("{symbol}{text}{symbol}")
        }
    }
}

pub fn abbreviation(node: &NodeRef<'_>, text: &str, _inline: bool, _options: &ConversionOptions) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    match clean_attribute(node.get_str("title")) {
        Some(title) => format!("{text} ({title})"),
        None => text.to_string(),
    }
}

/// `<time datetime>` and `<data value>` keep their machine-readable attribute
pub fn machine_readable(node: &NodeRef<'_>, text: &str, _inline: bool, _options: &ConversionOptions) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    let (tag, attribute) = if node.is("data") {
        ("data", "value")
    } else {
        ("time", "datetime")
    };
    match clean_attribute(node.get_str(attribute)) {
        Some(value) => RawTag::new(tag).attr(attribute, Some(value)).wrap(text),
        None => text.to_string(),
    }
}

/// Elements that never produce output (`script`, `style`, `wbr`, ...)
pub fn nothing(_node: &NodeRef<'_>, _text: &str, _inline: bool, _options: &ConversionOptions) -> String {
    String::new()
}
