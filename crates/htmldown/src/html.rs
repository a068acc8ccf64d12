//! HTML parsing support.
//!
//! Input decoding plus the parser adapters that turn `scraper` (html5ever) or
//! `tl` output into a [`Document`]. Entities are decoded here, once; the
//! converters never see raw entity text.

use std::borrow::Cow;

use encoding_rs::Encoding;
use htmldown_core::ParserBackend;
use log::debug;

use crate::node::Document;
use crate::{HtmldownError, Result};

/// Parse an HTML string into a [`Document`].
///
/// # Example
///
/// ```rust
/// use htmldown::{parse_html, HtmldownService, ParserBackend};
///
/// let doc = parse_html("<h1>Hello <em>World</em></h1>", ParserBackend::Html5ever).unwrap();
///
/// let service = HtmldownService::new();
/// let markdown = service.convert_document(&doc).unwrap();
/// assert_eq!(markdown, "Hello *World*\n=============\n\n");
/// ```
pub fn parse_html(html: &str, backend: ParserBackend) -> Result<Document> {
    let doc = match backend {
        ParserBackend::Html5ever => parse_with_html5ever(html)?,
        ParserBackend::Tl => parse_with_tl(html)?,
    };
    debug!(
        "parsed {} bytes with {} into {} nodes",
        html.len(),
        backend,
        doc.len()
    );
    Ok(doc)
}

/// Parser names usable in this build
pub fn available_parsers() -> Vec<&'static str> {
    ParserBackend::NAMES
        .iter()
        .copied()
        .filter(|name| name.parse::<ParserBackend>().is_ok_and(is_available))
        .collect()
}

/// Was the backend compiled in?
pub fn is_available(backend: ParserBackend) -> bool {
    match backend {
        ParserBackend::Html5ever => cfg!(feature = "html"),
        ParserBackend::Tl => cfg!(feature = "tl"),
    }
}

/// Resolve a parser name, checking that its backend is compiled in
pub fn parser_from_name(name: &str) -> Result<ParserBackend> {
    let backend = name.parse::<ParserBackend>()?;
    if is_available(backend) {
        Ok(backend)
    } else {
        Err(missing_dependency(backend))
    }
}

fn missing_dependency(backend: ParserBackend) -> HtmldownError {
    match backend {
        ParserBackend::Html5ever => HtmldownError::MissingDependency {
            dependency: "scraper",
            feature: "html",
        },
        ParserBackend::Tl => HtmldownError::MissingDependency {
            dependency: "tl",
            feature: "tl",
        },
    }
}

/// Decode `bytes` using the WHATWG encoding `label`.
///
/// A byte order mark overrides the label. Malformed input is an error rather
/// than being replaced with U+FFFD.
pub fn decode_input(bytes: &[u8], label: &str) -> Result<String> {
    let invalid = || HtmldownError::InvalidEncoding {
        encoding: label.to_string(),
    };
    let labelled = Encoding::for_label(label.trim().as_bytes()).ok_or_else(invalid)?;

    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_length)) => (encoding, &bytes[bom_length..]),
        None => (labelled, bytes),
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(Cow::into_owned)
        .ok_or_else(invalid)
}

#[cfg(feature = "html")]
fn parse_with_html5ever(html: &str) -> Result<Document> {
    let parsed = scraper::Html::parse_document(html);
    let mut doc = Document::new();

    // (parent in the arena, scraper node), children pushed in reverse so
    // they pop in document order
    let mut stack = vec![(doc.root(), *parsed.root_element())];
    while let Some((parent, node)) = stack.pop() {
        match node.value() {
            scraper::Node::Element(element) => {
                let id = doc.append_element(parent, element.name(), element.attrs());
                let children: Vec<_> = node.children().collect();
                stack.extend(children.into_iter().rev().map(|child| (id, child)));
            }
            scraper::Node::Text(text) => {
                doc.append_text(parent, &text.text);
            }
            scraper::Node::Comment(comment) => {
                doc.append_comment(parent, &comment.comment);
            }
            _ => {}
        }
    }
    Ok(doc)
}

#[cfg(not(feature = "html"))]
fn parse_with_html5ever(_html: &str) -> Result<Document> {
    Err(missing_dependency(ParserBackend::Html5ever))
}

#[cfg(feature = "tl")]
fn parse_with_tl(html: &str) -> Result<Document> {
    use crate::node::NodeId;
    use html_escape::decode_html_entities;

    let dom = tl::parse(html, tl::ParserOptions::default())
        .map_err(|err| HtmldownError::Parse(format!("{err:?}")))?;
    let parser = dom.parser();
    let mut doc = Document::new();

    let root = doc.root();
    let mut stack: Vec<(NodeId, tl::NodeHandle)> =
        dom.children().iter().rev().map(|&handle| (root, handle)).collect();
    while let Some((parent, handle)) = stack.pop() {
        let Some(node) = handle.get(parser) else {
            continue;
        };
        match node {
            tl::Node::Tag(tag) => {
                let name = tag.name().as_utf8_str();
                if let Some(doctype) = name.strip_prefix('!') {
                    doc.append_doctype(parent, doctype);
                    continue;
                }
                let attrs = tag.attributes().iter().map(|(key, value)| {
                    let value = value
                        .map(|v| decode_html_entities(&v).into_owned())
                        .unwrap_or_default();
                    (key.into_owned(), value)
                });
                let id = doc.append_element(parent, &name, attrs);
                let children: Vec<tl::NodeHandle> = tag.children().top().iter().copied().collect();
                stack.extend(children.into_iter().rev().map(|child| (id, child)));
            }
            tl::Node::Raw(bytes) => {
                doc.append_text(parent, &decode_html_entities(&bytes.as_utf8_str()));
            }
            tl::Node::Comment(bytes) => {
                doc.append_comment(parent, &bytes.as_utf8_str());
            }
        }
    }
    Ok(doc)
}

#[cfg(not(feature = "tl"))]
fn parse_with_tl(_html: &str) -> Result<Document> {
    Err(missing_dependency(ParserBackend::Tl))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    #[cfg(feature = "html")]
    #[test]
    fn test_html5ever_builds_full_document() {
        let doc = parse_html("<p class=\"x\">a &amp; b<!-- note --></p>", ParserBackend::Html5ever).unwrap();
        let body = doc.find_element("body").unwrap();
        let p = doc.node(body).find("p").unwrap();
        assert_eq!(p.get_str("class"), Some("x"));
        assert_eq!(p.text_content(), "a & b");
        assert!(doc
            .node(p.id())
            .descendants()
            .any(|n| matches!(n.kind(), NodeKind::Comment(c) if c == " note ")));
    }

    #[cfg(feature = "html")]
    #[test]
    fn test_html5ever_deep_nesting() {
        let depth = 5_000;
        let html = format!("{}x{}", "<div>".repeat(depth), "</div>".repeat(depth));
        let doc = parse_html(&html, ParserBackend::Html5ever).unwrap();
        let body = doc.node(doc.find_element("body").unwrap());
        assert_eq!(body.find_all(&["div"]).len(), depth);
        assert_eq!(body.text_content(), "x");
    }

    #[cfg(feature = "tl")]
    #[test]
    fn test_tl_decodes_entities() {
        let doc = parse_html("<div title=\"&lt;x&gt;\">&copy; 2024</div>", ParserBackend::Tl).unwrap();
        let div = doc.node(doc.find_element("div").unwrap());
        assert_eq!(div.get_str("title"), Some("<x>"));
        assert_eq!(div.text_content(), "© 2024");
    }

    #[cfg(not(feature = "tl"))]
    #[test]
    fn test_missing_backend() {
        let err = parse_html("<p>x</p>", ParserBackend::Tl).unwrap_err();
        assert_eq!(err.to_string(), "tl is not installed. Enable the `tl` feature.");
        assert!(!available_parsers().contains(&"tl"));
    }

    #[test]
    fn test_decode_input() {
        assert_eq!(decode_input(b"caf\xe9", "latin1").unwrap(), "café");
        assert_eq!(decode_input(b"\xef\xbb\xbfhi", "windows-1252").unwrap(), "hi");
        assert!(matches!(
            decode_input(b"caf\xe9", "utf-8"),
            Err(HtmldownError::InvalidEncoding { .. })
        ));
        assert!(matches!(
            decode_input(b"x", "klingon"),
            Err(HtmldownError::InvalidEncoding { encoding }) if encoding == "klingon"
        ));
    }

    #[test]
    fn test_unknown_parser_name() {
        let err = parser_from_name("lxml").unwrap_err();
        assert!(err.to_string().starts_with("Invalid parser 'lxml'. Available parsers: "));
    }
}
