//! Inline converters: emphasis family, code spans, links and images.

use std::borrow::Cow;

use htmldown_core::text::{chomp, unescape};
use htmldown_core::ConversionOptions;

use crate::node::NodeRef;
use crate::utilities::{TABLE_CELLS, VERBATIM_ELEMENTS};

/// Wrap chomped `text` in `symbol`. A symbol shaped like `<x>` closes with
/// `</x>`. Inside `pre`/`code`/`kbd`/`samp` the text passes through.
pub fn markup(node: &NodeRef<'_>, text: &str, symbol: &str) -> String {
    if node.has_ancestor(VERBATIM_ELEMENTS) {
        return text.to_string();
    }
    if text.trim().is_empty() {
        return String::new();
    }
    let (prefix, suffix, text) = chomp(text);
    let closing = closing_symbol(symbol);
    format!("{prefix}{symbol}{text}{closing}{suffix}")
}

fn closing_symbol(symbol: &str) -> Cow<'_, str> {
    match symbol.strip_prefix('<') {
        Some(rest) if symbol.ends_with('>') && !rest.starts_with('/') => {
            Cow::Owned(format!("</{rest}"))
        }
        _ => Cow::Borrowed(symbol),
    }
}

fn title_part(title: &str) -> String {
    if title.is_empty() {
        String::new()
    } else {
        format!(" \"{}\"", title.replace('"', "\\\""))
    }
}

pub fn link(node: &NodeRef<'_>, text: &str, _inline: bool, options: &ConversionOptions) -> String {
    let (prefix, suffix, text) = chomp(text);
    if text.is_empty() {
        return String::new();
    }

    let href = node.get_str("href").unwrap_or_default();
    let title = node.get_str("title").unwrap_or_default();

    if options.autolinks && title.is_empty() && !options.default_title && unescape(text) == href {
        return format!("{prefix}<{href}>{suffix}");
    }
    if href.is_empty() {
        return format!("{prefix}{text}{suffix}");
    }

    let title = if options.default_title && title.is_empty() {
        href
    } else {
        title
    };
    format!("{prefix}[{text}]({href}{}){suffix}", title_part(title))
}

pub fn image(node: &NodeRef<'_>, _text: &str, inline: bool, options: &ConversionOptions) -> String {
    let alt = node.get_str("alt").unwrap_or_default();

    if inline {
        let keep = node.parent_name().is_some_and(|parent| {
            TABLE_CELLS.contains(&parent) || options.keep_inline_images_in.iter().any(|k| k == parent)
        });
        if !keep {
            return alt.to_string();
        }
    }

    let src = node.get_str("src").unwrap_or_default();
    let title = node.get_str("title").unwrap_or_default();
    let width = node.get_str("width");
    let height = node.get_str("height");

    if width.is_some() || height.is_some() {
        return format!(
            "<img src='{src}' alt='{alt}' title='{title}' width='{}' height='{}' />",
            width.unwrap_or_default(),
            height.unwrap_or_default()
        );
    }

    format!("![{alt}]({src}{})", title_part(title))
}
