//! Tag classification shared by the tree walker and the converters.

use crate::node::Element;

/// Block-level HTML elements.
///
/// Whitespace next to these is formatting, not content.
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "canvas", "datalist", "dd",
    "details", "dialog", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "html", "legend",
    "li", "main", "menu", "nav", "noscript", "ol", "option", "p", "pre", "section",
    "summary", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Void (self-closing) HTML elements
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// List and table elements whose formatting whitespace is dropped
pub const STRUCTURAL_ELEMENTS: &[&str] = &[
    "ol", "ul", "menu", "li", "table", "thead", "tbody", "tfoot", "tr", "td", "th",
];

/// Elements whose text is emitted without Markdown escaping
pub const VERBATIM_ELEMENTS: &[&str] = &["pre", "code", "kbd", "samp"];

pub const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

pub const TABLE_CELLS: &[&str] = &["td", "th"];

pub const LISTS: &[&str] = &["ul", "ol", "menu"];

/// Form controls removed by preprocessing
pub const FORM_ELEMENTS: &[&str] = &[
    "form", "input", "button", "select", "textarea", "label", "fieldset", "legend",
    "option", "optgroup", "datalist", "output", "meter", "progress",
];

pub fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag)
}

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn is_structural(tag: &str) -> bool {
    STRUCTURAL_ELEMENTS.contains(&tag)
}

pub fn is_form_element(tag: &str) -> bool {
    FORM_ELEMENTS.contains(&tag)
}

/// Heading level for `h1`..`h6`
pub fn heading_level(tag: &str) -> Option<usize> {
    HEADINGS.iter().position(|&h| h == tag).map(|index| index + 1)
}

/// `<nav>`, `role="navigation"`, or a navigation/menu/breadcrumb class
pub fn is_navigation(element: &Element) -> bool {
    if element.name == "nav" {
        return true;
    }
    if element
        .attrs
        .get("role")
        .is_some_and(|role| role.eq_ignore_ascii_case("navigation"))
    {
        return true;
    }
    element.attrs.get("class").is_some_and(|class| {
        class.split_ascii_whitespace().any(|token| {
            let token = token.to_ascii_lowercase();
            token.starts_with("nav")
                || token.contains("navigation")
                || token.contains("breadcrumb")
                || token == "menu"
        })
    })
}

/// Trimmed attribute value, or `None` when missing or blank
pub fn clean_attribute(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
