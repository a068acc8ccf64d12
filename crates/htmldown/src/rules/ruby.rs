//! Ruby annotations, rendered as `base(reading)`.

use htmldown_core::ConversionOptions;

use crate::node::NodeRef;

/// The annotated run: base text followed by its readings
pub fn ruby(_node: &NodeRef<'_>, text: &str, _inline: bool, _options: &ConversionOptions) -> String {
    text.to_string()
}

/// `rb` and `rp` contribute their trimmed text
pub fn ruby_text(_node: &NodeRef<'_>, text: &str, _inline: bool, _options: &ConversionOptions) -> String {
    text.trim().to_string()
}

/// Reading in parentheses, unless an `<rp>` right before it supplies them
pub fn annotation(node: &NodeRef<'_>, text: &str, _inline: bool, _options: &ConversionOptions) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    if node.previous_sibling().is_some_and(|sibling| sibling.is("rp")) {
        text.to_string()
    } else {
        format!("({text})")
    }
}
