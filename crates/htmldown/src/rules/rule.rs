//! Rule and TagFilter types.

use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use htmldown_core::ConversionOptions;

use crate::node::NodeRef;
use crate::{HtmldownError, Result};

/// Signature shared by built-in converters and caller overrides
pub type ConvertFn = dyn Fn(&NodeRef<'_>, &str, bool) -> Result<String> + Send + Sync;

/// Picks the fence language of a `<pre>` block; `None` or `""` falls back to
/// `code_language`
pub type LanguageResolver = Arc<dyn Fn(&NodeRef<'_>) -> Option<String> + Send + Sync>;

/// A converter for one tag: `(node, converted children, inline) -> markdown`
#[derive(Clone)]
pub struct Rule {
    convert: Arc<ConvertFn>,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").finish_non_exhaustive()
    }
}

fn shared<F>(convert: F) -> Arc<ConvertFn>
where
    F: Fn(&NodeRef<'_>, &str, bool) -> Result<String> + Send + Sync + 'static,
{
    Arc::new(convert)
}

impl Rule {
    /// Create a rule from an infallible converter
    pub fn new<F>(convert: F) -> Self
    where
        F: Fn(&NodeRef<'_>, &str, bool) -> String + Send + Sync + 'static,
    {
        Self {
            convert: shared(move |node: &NodeRef<'_>, text: &str, inline: bool| {
                Ok(convert(node, text, inline))
            }),
        }
    }

    /// Create a rule whose errors abort the conversion.
    ///
    /// Errors surface unchanged as [`HtmldownError::Converter`].
    pub fn fallible<F, E>(convert: F) -> Self
    where
        F: Fn(&NodeRef<'_>, &str, bool) -> std::result::Result<String, E> + Send + Sync + 'static,
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        Self {
            convert: shared(move |node: &NodeRef<'_>, text: &str, inline: bool| {
                convert(node, text, inline).map_err(|err| HtmldownError::Converter(err.into()))
            }),
        }
    }

    pub fn apply(&self, node: &NodeRef<'_>, text: &str, inline: bool) -> Result<String> {
        (self.convert)(node, text, inline)
    }
}

/// Which tags get converted; the rest unwrap to their children's output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TagFilter {
    #[default]
    All,
    Strip(HashSet<String>),
    Convert(HashSet<String>),
}

impl TagFilter {
    pub fn from_options(options: &ConversionOptions) -> Result<Self> {
        match (&options.strip, &options.convert) {
            (Some(_), Some(_)) => Err(HtmldownError::ConflictingConfiguration),
            (Some(strip), None) => Ok(TagFilter::Strip(tag_set(strip))),
            (None, Some(convert)) => Ok(TagFilter::Convert(tag_set(convert))),
            (None, None) => Ok(TagFilter::All),
        }
    }

    pub fn allows(&self, tag: &str) -> bool {
        match self {
            TagFilter::All => true,
            TagFilter::Strip(tags) => !tags.contains(tag),
            TagFilter::Convert(tags) => tags.contains(tag),
        }
    }
}

// Entries may themselves be comma-separated lists, as the CLI passes them
fn tag_set(entries: &[String]) -> HashSet<String> {
    entries
        .iter()
        .flat_map(|entry| entry.split(','))
        .map(|tag| tag.trim().to_ascii_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Document;

    #[test]
    fn test_filter_conflict() {
        let options = ConversionOptions {
            strip: Some(vec!["a".into()]),
            convert: Some(vec!["b".into()]),
            ..Default::default()
        };
        assert!(matches!(
            TagFilter::from_options(&options),
            Err(HtmldownError::ConflictingConfiguration)
        ));
    }

    #[test]
    fn test_filter_sets() {
        let options = ConversionOptions {
            strip: Some(vec!["A, em".into(), "b".into()]),
            ..Default::default()
        };
        let filter = TagFilter::from_options(&options).unwrap();
        assert!(!filter.allows("a"));
        assert!(!filter.allows("em"));
        assert!(filter.allows("p"));

        let options = ConversionOptions {
            convert: Some(vec!["p".into()]),
            ..Default::default()
        };
        let filter = TagFilter::from_options(&options).unwrap();
        assert!(filter.allows("p"));
        assert!(!filter.allows("a"));
    }

    #[test]
    fn test_fallible_rule_wraps_errors() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.append_element(root, "p", Vec::<(&str, &str)>::new());

        let rule = Rule::fallible(|_, _, _| Err::<String, _>("boom"));
        let err = rule.apply(&doc.node(p), "x", false).unwrap_err();
        assert!(matches!(err, HtmldownError::Converter(_)));
        assert_eq!(err.to_string(), "boom");

        let rule = Rule::new(|_, text, _| text.to_uppercase());
        assert_eq!(rule.apply(&doc.node(p), "x", false).unwrap(), "X");
    }
}
