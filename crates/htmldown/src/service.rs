//! HtmldownService - the main entry point for HTML to Markdown conversion.

use std::borrow::Cow;

use htmldown_core::text::{escape_at, last_chars, normalize_whitespace, trailing_newlines};
use htmldown_core::{ConversionOptions, ParsingOptions, PreprocessingOptions, WhitespaceMode};
use log::{debug, trace};

use crate::html::{decode_input, parse_html};
use crate::node::{Document, NodeId, NodeKind, NodeRef, View};
use crate::rules::{build_registry, Hooks, LanguageResolver, Rule, Rules};
use crate::stream::{MarkdownStream, StreamingOptions};
use crate::utilities::{heading_level, is_block, LISTS, TABLE_CELLS, VERBATIM_ELEMENTS};
use crate::{HtmldownError, Result};

/// Renderer over one document, view and registry.
///
/// The walk keeps its own stack of open elements, so nesting depth is
/// limited by memory rather than by the call stack.
pub(crate) struct Walker<'a> {
    pub doc: &'a Document,
    pub view: &'a View,
    pub rules: &'a Rules,
    pub options: &'a ConversionOptions,
}

/// An element (or the document) whose children are being rendered
struct Frame<'a> {
    node: NodeRef<'a>,
    inline: bool,
    children_inline: bool,
    context_before: String,
    children: Vec<NodeId>,
    next: usize,
    text: String,
}

impl<'a> Walker<'a> {
    /// Render `id` and its subtree.
    ///
    /// `context_before` holds the last (up to) two characters emitted before
    /// this node; headings use it to start on a fresh paragraph.
    pub fn process_tag(&self, id: NodeId, inline: bool, context_before: &str) -> Result<String> {
        let node = self.doc.node_in(self.view, id);
        match node.kind() {
            NodeKind::Text(text) => return Ok(self.process_text(&node, text, context_before)),
            NodeKind::Comment(_) | NodeKind::Doctype(_) => return Ok(String::new()),
            NodeKind::Element(_) | NodeKind::Document => {}
        }

        let mut stack = vec![self.open(node, inline, context_before.to_string())];
        while let Some(top) = stack.last_mut() {
            if let Some(&child_id) = top.children.get(top.next) {
                top.next += 1;
                let child = self.doc.node_in(self.view, child_id);
                let context = trailing_context(&top.context_before, &top.text);
                match child.kind() {
                    NodeKind::Text(raw) => {
                        let text = self.process_text(&child, raw, &context);
                        top.text.push_str(&text);
                    }
                    NodeKind::Comment(_) | NodeKind::Doctype(_) => {}
                    NodeKind::Element(_) | NodeKind::Document => {
                        let children_inline = top.children_inline;
                        stack.push(self.open(child, children_inline, context));
                    }
                }
                continue;
            }

            let Some(frame) = stack.pop() else { break };
            let rendered = self.close(frame)?;
            match stack.last_mut() {
                Some(parent) => parent.text.push_str(&rendered),
                None => return Ok(rendered),
            }
        }
        Ok(String::new())
    }

    fn open(&self, node: NodeRef<'a>, inline: bool, context_before: String) -> Frame<'a> {
        let children_inline = match node.tag_name() {
            Some(name) => inline || heading_level(name).is_some() || TABLE_CELLS.contains(&name),
            None => inline,
        };
        Frame {
            node,
            inline,
            children_inline,
            context_before,
            children: node.children().map(|child| child.id()).collect(),
            next: 0,
            text: String::new(),
        }
    }

    /// Run the converter for a frame whose children are all rendered
    fn close(&self, frame: Frame<'a>) -> Result<String> {
        let Some(name) = frame.node.tag_name() else {
            return Ok(frame.text);
        };
        let Some(rule) = self.rules.for_tag(name) else {
            trace!("no converter for <{name}>, unwrapping");
            return Ok(frame.text);
        };
        let rendered = rule.apply(&frame.node, &frame.text, frame.inline)?;

        let context_before = frame.context_before.as_str();
        if heading_level(name).is_some() && !context_before.is_empty() && context_before != "\n" {
            let missing = 2usize.saturating_sub(trailing_newlines(context_before));
            if missing > 0 {
                return Ok(format!("{}{rendered}", "\n".repeat(missing)));
            }
        }
        Ok(rendered)
    }

    fn process_text(&self, node: &NodeRef<'_>, raw: &str, context_before: &str) -> String {
        let mut text = if self.options.whitespace_mode == WhitespaceMode::Normalized
            && !node.has_ancestor(&["pre"])
        {
            normalize_text(node, raw)
        } else {
            raw.to_string()
        };

        if !node.has_ancestor(VERBATIM_ELEMENTS) {
            text = escape_at(&text, self.options, starts_line(node, context_before));
        }

        let ends_item = node.parent_name() == Some("li")
            && node.next_sibling().map_or(true, |next| next.is_any(LISTS));
        if ends_item {
            text.truncate(text.trim_end().len());
        }
        text
    }
}

/// Does this text node begin a line of output?
fn starts_line(node: &NodeRef<'_>, context_before: &str) -> bool {
    context_before.is_empty()
        || context_before.ends_with('\n')
        || (node.previous_sibling().is_none() && is_block_boundary(None, node.parent(), true))
}

/// Collapse whitespace, then drop the spaces that only separate this text
/// from a neighbouring block
fn normalize_text(node: &NodeRef<'_>, raw: &str) -> String {
    let collapsed = normalize_whitespace(raw);
    let parent = node.parent();
    let mut text = collapsed.as_str();
    if is_block_boundary(node.previous_sibling(), parent, true) {
        text = text.strip_prefix(' ').unwrap_or(text);
    }
    if is_block_boundary(node.next_sibling(), parent, false) {
        text = text.strip_suffix(' ').unwrap_or(text);
    }
    text.to_string()
}

fn is_block_boundary(sibling: Option<NodeRef<'_>>, parent: Option<NodeRef<'_>>, leading: bool) -> bool {
    match sibling {
        Some(sibling) => sibling
            .tag_name()
            .is_some_and(|tag| is_block(tag) || (leading && tag == "br")),
        None => parent.map_or(true, |parent| match parent.kind() {
            NodeKind::Document => true,
            NodeKind::Element(element) => is_block(&element.name),
            _ => false,
        }),
    }
}

/// Last two characters of `context_before` followed by `text`
pub(crate) fn trailing_context(context_before: &str, text: &str) -> String {
    let tail = last_chars(text, 2);
    if tail.chars().count() == 2 {
        tail.to_string()
    } else {
        last_chars(&format!("{context_before}{text}"), 2).to_string()
    }
}

/// Top-level nodes of a conversion: the children of `<body>`, or of the
/// document when there is none
pub(crate) fn root_nodes(doc: &Document, view: &View) -> Vec<NodeId> {
    let start = doc.find_element("body").unwrap_or_else(|| doc.root());
    doc.node_in(view, start).children().map(|node| node.id()).collect()
}

/// The main service for converting HTML to Markdown.
///
/// ```rust
/// use htmldown::{ConversionOptions, HeadingStyle, HtmldownService};
///
/// let service = HtmldownService::with_options(ConversionOptions {
///     heading_style: HeadingStyle::Atx,
///     ..Default::default()
/// });
/// assert_eq!(service.convert("<h1>Hello</h1>").unwrap(), "# Hello\n\n");
/// ```
#[derive(Clone, Default)]
pub struct HtmldownService {
    options: ConversionOptions,
    parsing: ParsingOptions,
    preprocessing: PreprocessingOptions,
    hooks: Hooks,
}

impl HtmldownService {
    /// Create a service with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service with custom conversion options
    pub fn with_options(options: ConversionOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn set_parsing(&mut self, parsing: ParsingOptions) -> &mut Self {
        self.parsing = parsing;
        self
    }

    pub fn set_preprocessing(&mut self, preprocessing: PreprocessingOptions) -> &mut Self {
        self.preprocessing = preprocessing;
        self
    }

    /// Pick fence languages for `<pre>` blocks with `resolver`
    pub fn with_code_language(&mut self, resolver: LanguageResolver) -> &mut Self {
        self.hooks.code_language = Some(resolver);
        self
    }

    /// Replace the converter for `tag`, or add one for a tag without a
    /// built-in converter
    pub fn add_converter(&mut self, tag: &str, rule: Rule) -> &mut Self {
        self.hooks.overrides.insert(tag.to_ascii_lowercase(), rule);
        self
    }

    /// Get the current options
    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut ConversionOptions {
        &mut self.options
    }

    pub fn parsing(&self) -> &ParsingOptions {
        &self.parsing
    }

    pub fn preprocessing(&self) -> &PreprocessingOptions {
        &self.preprocessing
    }

    /// Convert an HTML string to Markdown
    pub fn convert(&self, html: &str) -> Result<String> {
        let markdown = self
            .convert_stream(html, StreamingOptions::default())?
            .collect::<Result<String>>()?;
        debug!("converted {} bytes of HTML into {} bytes of Markdown", html.len(), markdown.len());
        Ok(markdown)
    }

    /// Decode `bytes` with the configured encoding, then convert
    pub fn convert_bytes(&self, bytes: &[u8]) -> Result<String> {
        let html = decode_input(bytes, &self.parsing.encoding)?;
        self.convert(&html)
    }

    /// Convert an already parsed document
    pub fn convert_document(&self, doc: &Document) -> Result<String> {
        if doc.is_empty() {
            return Err(HtmldownError::EmptyInput);
        }
        let rules = build_registry(&self.options, &self.hooks)?;
        MarkdownStream::new(
            Cow::Borrowed(doc),
            rules,
            self.options.clone(),
            &self.preprocessing,
            StreamingOptions::default(),
        )
        .collect()
    }

    /// Convert lazily, yielding Markdown in chunks of roughly
    /// `streaming.chunk_size` bytes.
    ///
    /// Input and configuration errors are returned here, before any chunk.
    /// Concatenating the chunks gives exactly what [`convert`](Self::convert)
    /// returns.
    pub fn convert_stream(&self, html: &str, streaming: StreamingOptions) -> Result<MarkdownStream<'static>> {
        let html = self.prepare_input(html)?;
        let rules = build_registry(&self.options, &self.hooks)?;
        let doc = parse_html(&html, self.parsing.parser)?;
        Ok(MarkdownStream::new(
            Cow::Owned(doc),
            rules,
            self.options.clone(),
            &self.preprocessing,
            streaming,
        ))
    }

    fn prepare_input<'h>(&self, html: &'h str) -> Result<Cow<'h, str>> {
        let html = if self.options.strip_newlines {
            Cow::Owned(html.replace(['\r', '\n'], " "))
        } else {
            Cow::Borrowed(html)
        };
        if html.trim().is_empty() {
            return Err(HtmldownError::EmptyInput);
        }
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use htmldown_core::HeadingStyle;
    use pretty_assertions::assert_eq;

    fn atx() -> HtmldownService {
        HtmldownService::with_options(ConversionOptions {
            heading_style: HeadingStyle::Atx,
            ..Default::default()
        })
    }

    #[test]
    fn test_trailing_context() {
        assert_eq!(trailing_context("", ""), "");
        assert_eq!(trailing_context("ab", "c"), "bc");
        assert_eq!(trailing_context("a", "\n\n"), "\n\n");
        assert_eq!(trailing_context("x", ""), "x");
    }

    #[test]
    fn test_heading_after_inline_text_gets_blank_line() {
        let mut doc = Document::new();
        let root = doc.root();
        let span = doc.append_element(root, "span", Vec::<(&str, &str)>::new());
        doc.append_text(span, "intro");
        let h2 = doc.append_element(root, "h2", Vec::<(&str, &str)>::new());
        doc.append_text(h2, "Next");

        let markdown = atx().convert_document(&doc).unwrap();
        assert_eq!(markdown, "intro\n\n## Next\n\n");
    }

    #[test]
    fn test_text_at_block_boundaries() {
        let markdown = atx()
            .convert("<div>\n  <p>one <b>two</b> </p>\n  <p> three</p>\n</div>")
            .unwrap();
        assert_eq!(markdown, "one **two**\n\nthree\n\n");
    }

    #[test]
    fn test_strict_whitespace_keeps_runs() {
        let service = HtmldownService::with_options(ConversionOptions {
            whitespace_mode: WhitespaceMode::Strict,
            ..Default::default()
        });
        assert_eq!(service.convert("<p>a   b</p>").unwrap(), "a   b\n\n");
    }

    #[test]
    fn test_unknown_tags_unwrap() {
        assert_eq!(atx().convert("<p><span>x</span><custom>y</custom></p>").unwrap(), "xy\n\n");
    }

    #[test]
    fn test_strip_newlines_runs_before_empty_check() {
        let service = HtmldownService::with_options(ConversionOptions {
            strip_newlines: true,
            ..Default::default()
        });
        assert!(matches!(service.convert("\n\r\n"), Err(HtmldownError::EmptyInput)));
        assert_eq!(service.convert("<p>a\nb</p>").unwrap(), "a b\n\n");
    }

    #[test]
    fn test_empty_document() {
        let err = atx().convert_document(&Document::new()).unwrap_err();
        assert!(matches!(err, HtmldownError::EmptyInput));
    }

    #[test]
    fn test_service_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HtmldownService>();
    }
}
