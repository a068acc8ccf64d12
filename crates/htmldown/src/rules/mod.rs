//! Converter registry.
//!
//! A [`Rules`] value maps lowercase tag names to converters. It is built per
//! conversion from the current options, so converters capture their
//! configuration instead of receiving it on every call.

mod block;
mod form;
mod inline;
mod list;
mod media;
mod raw;
mod ruby;
mod rule;
mod table;

pub use block::language_from_class;
pub use rule::{ConvertFn, LanguageResolver, Rule, TagFilter};

use std::sync::Arc;

use htmldown_core::ConversionOptions;
use indexmap::IndexMap;

use crate::node::NodeRef;
use crate::Result;

type Converter = fn(&NodeRef<'_>, &str, bool, &ConversionOptions) -> String;

/// Caller-supplied callables that take part in building a registry
#[derive(Clone, Default)]
pub struct Hooks {
    /// Fence language for `<pre>` blocks
    pub code_language: Option<LanguageResolver>,
    /// Replace a built-in converter or add one for a new tag
    pub overrides: IndexMap<String, Rule>,
}

/// Tag name to converter map plus the strip/convert filter
#[derive(Debug, Clone)]
pub struct Rules {
    rules: IndexMap<String, Rule>,
    filter: TagFilter,
}

impl Rules {
    /// Register `rule` for `tag`, replacing any existing converter
    pub fn add(&mut self, tag: &str, rule: Rule) -> &mut Self {
        self.rules.insert(tag.to_ascii_lowercase(), rule);
        self
    }

    /// Converter for `tag`, unless the filter says the tag should unwrap
    pub fn for_tag(&self, tag: &str) -> Option<&Rule> {
        if !self.filter.allows(tag) {
            return None;
        }
        self.rules.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.rules.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn with_options(options: &Arc<ConversionOptions>, convert: Converter) -> Rule {
    let options = Arc::clone(options);
    Rule::new(move |node, text, inline| convert(node, text, inline, &options))
}

fn markup(symbol: impl Into<String>) -> Rule {
    let symbol = symbol.into();
    Rule::new(move |node, text, _| inline::markup(node, text, &symbol))
}

/// Build the registry for one conversion.
///
/// Fails with [`crate::HtmldownError::ConflictingConfiguration`] when both
/// `strip` and `convert` are set.
pub fn build_registry(options: &ConversionOptions, hooks: &Hooks) -> Result<Rules> {
    let filter = TagFilter::from_options(options)?;
    let shared = Arc::new(options.clone());
    let mut rules = Rules {
        rules: IndexMap::new(),
        filter,
    };

    let strong = options.strong_em_symbol.as_str();
    rules.add("b", markup(strong.repeat(2)));
    rules.add("strong", markup(strong.repeat(2)));
    rules.add("em", markup(strong));
    rules.add("i", markup(strong));
    for tag in ["dfn", "var"] {
        rules.add(tag, markup("*"));
    }
    for tag in ["del", "s", "strike"] {
        rules.add(tag, markup("~~"));
    }
    rules.add("ins", markup("=="));
    for tag in ["small", "u", "bdi", "bdo"] {
        rules.add(tag, markup(""));
    }
    rules.add("sub", markup(options.sub_symbol.as_str()));
    rules.add("sup", markup(options.sup_symbol.as_str()));
    for tag in ["code", "kbd", "samp"] {
        rules.add(tag, markup("`"));
    }

    rules.add("a", with_options(&shared, inline::link));
    rules.add("img", with_options(&shared, inline::image));

    for tag in crate::utilities::HEADINGS {
        rules.add(tag, with_options(&shared, block::heading));
    }
    rules.add("p", with_options(&shared, block::paragraph));
    rules.add("blockquote", with_options(&shared, block::blockquote));
    rules.add("br", with_options(&shared, block::line_break));
    rules.add("hr", with_options(&shared, block::rule));

    let resolver = hooks.code_language.clone();
    let default_language = options.code_language.clone();
    rules.add(
        "pre",
        Rule::new(move |node, text, _| {
            let language = resolver
                .as_ref()
                .and_then(|resolve| resolve(node))
                .filter(|language| !language.is_empty())
                .unwrap_or_else(|| default_language.clone());
            block::code_block(text, &language)
        }),
    );

    for tag in [
        "article", "aside", "div", "figure", "footer", "header", "main", "nav", "section",
    ] {
        rules.add(tag, with_options(&shared, block::container));
    }
    let text_level: [(&str, Converter); 12] = [
        ("details", block::details),
        ("summary", block::summary),
        ("dl", block::definition_list),
        ("dt", block::definition_term),
        ("dd", block::definition),
        ("figcaption", block::figcaption),
        ("cite", block::cite),
        ("q", block::quote),
        ("mark", block::mark),
        ("abbr", block::abbreviation),
        ("time", block::machine_readable),
        ("data", block::machine_readable),
    ];
    for (tag, convert) in text_level {
        rules.add(tag, with_options(&shared, convert));
    }
    for tag in [
        "wbr", "script", "style", "head", "template", "noscript", "colgroup", "col",
    ] {
        rules.add(tag, with_options(&shared, block::nothing));
    }

    rules.add("hgroup", with_options(&shared, block::heading_group));
    rules.add("dialog", with_options(&shared, block::dialog));

    rules.add("ruby", with_options(&shared, ruby::ruby));
    rules.add("rtc", with_options(&shared, ruby::ruby));
    for tag in ["rb", "rp"] {
        rules.add(tag, with_options(&shared, ruby::ruby_text));
    }
    rules.add("rt", with_options(&shared, ruby::annotation));

    rules.add("li", with_options(&shared, list::list_item));
    for tag in ["ul", "ol", "menu"] {
        rules.add(tag, with_options(&shared, list::list));
    }

    rules.add("table", with_options(&shared, table::table));
    rules.add("caption", with_options(&shared, table::caption));
    rules.add("tr", with_options(&shared, table::row));
    rules.add("td", with_options(&shared, table::cell));
    rules.add("th", with_options(&shared, table::cell));

    let embedded: [(&str, Converter); 6] = [
        ("audio", media::audio),
        ("video", media::video),
        ("iframe", media::iframe),
        ("picture", media::picture),
        ("svg", media::svg),
        ("math", media::math),
    ];
    let controls: [(&str, Converter); 14] = [
        ("form", form::form),
        ("fieldset", form::fieldset),
        ("legend", form::legend),
        ("label", form::label),
        ("input", form::input),
        ("textarea", form::textarea),
        ("select", form::select),
        ("option", form::option),
        ("optgroup", form::optgroup),
        ("button", form::button),
        ("progress", form::progress),
        ("meter", form::meter),
        ("output", form::output),
        ("datalist", form::datalist),
    ];
    for (tag, convert) in embedded.into_iter().chain(controls) {
        rules.add(tag, with_options(&shared, convert));
    }

    for (tag, rule) in &hooks.overrides {
        rules.add(tag, rule.clone());
    }

    Ok(rules)
}
