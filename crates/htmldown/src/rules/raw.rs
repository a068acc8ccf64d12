//! Builder for tags that are emitted as raw HTML.

use html_escape::encode_double_quoted_attribute;

/// A tag with attributes in insertion order.
#[derive(Debug, Clone)]
pub struct RawTag {
    name: &'static str,
    attrs: Vec<String>,
}

impl RawTag {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attrs: Vec::new(),
        }
    }

    /// `key="value"`, skipped when the value is missing or blank
    pub fn attr(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.attrs
                .push(format!("{key}=\"{}\"", encode_double_quoted_attribute(value)));
        }
        self
    }

    /// Bare boolean attribute
    pub fn flag(mut self, key: &str, present: bool) -> Self {
        if present {
            self.attrs.push(key.to_string());
        }
        self
    }

    fn head(&self) -> String {
        if self.attrs.is_empty() {
            format!("<{}", self.name)
        } else {
            format!("<{} {}", self.name, self.attrs.join(" "))
        }
    }

    pub fn open(&self) -> String {
        format!("{}>", self.head())
    }

    pub fn close(&self) -> String {
        format!("</{}>", self.name)
    }

    /// Self-closing form
    pub fn empty(&self) -> String {
        format!("{} />", self.head())
    }

    /// `<tag ...>inner</tag>`
    pub fn wrap(&self, inner: &str) -> String {
        format!("{}{inner}{}", self.open(), self.close())
    }

    /// Like [`RawTag::wrap`] but with the content on its own lines
    pub fn wrap_lines(&self, inner: &str) -> String {
        format!("{}\n{inner}\n{}", self.open(), self.close())
    }
}
