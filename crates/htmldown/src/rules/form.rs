//! Form controls, kept as raw HTML so documentation of a form survives.

use htmldown_core::ConversionOptions;

use super::raw::RawTag;
use crate::node::NodeRef;
use crate::utilities::clean_attribute;

/// Shared shape: inline -> text, blank -> nothing, otherwise `render(text)`
fn block_control(text: &str, inline: bool, render: impl FnOnce(&str) -> String) -> String {
    if inline {
        return text.to_string();
    }
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    render(text)
}

pub fn form(node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    block_control(text, inline, |text| {
        let tag = RawTag::new("form")
            .attr("action", clean_attribute(node.get_str("action")))
            .attr("method", clean_attribute(node.get_str("method")));
        format!("{}\n\n", tag.wrap_lines(text))
    })
}

pub fn fieldset(_node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    block_control(text, inline, |text| {
        format!("{}\n\n", RawTag::new("fieldset").wrap_lines(text))
    })
}

pub fn legend(_node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    block_control(text, inline, |text| format!("{}\n\n", RawTag::new("legend").wrap(text)))
}

pub fn label(node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    block_control(text, inline, |text| {
        let tag = RawTag::new("label").attr("for", clean_attribute(node.get_str("for")));
        format!("{}\n\n", tag.wrap(text))
    })
}

/// Inputs inside list items are left to the task-list marker
pub fn input(node: &NodeRef<'_>, _text: &str, inline: bool, _options: &ConversionOptions) -> String {
    if node.has_ancestor(&["li"]) {
        return String::new();
    }

    let tag = RawTag::new("input")
        .attr("type", Some(node.get_str("type").unwrap_or("text")))
        .attr("id", node.get_str("id"))
        .attr("name", node.get_str("name"))
        .attr("value", node.get_str("value"))
        .attr("placeholder", node.get_str("placeholder"))
        .attr("accept", node.get_str("accept"))
        .flag("required", node.has_attr("required"))
        .flag("disabled", node.has_attr("disabled"))
        .flag("readonly", node.has_attr("readonly"))
        .flag("checked", node.has_attr("checked"));

    if inline {
        tag.empty()
    } else {
        format!("{}\n\n", tag.empty())
    }
}

pub fn textarea(node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    block_control(text, inline, |text| {
        let tag = RawTag::new("textarea")
            .attr("name", node.get_str("name"))
            .attr("placeholder", node.get_str("placeholder"))
            .attr("rows", node.get_str("rows"))
            .attr("cols", node.get_str("cols"))
            .flag("required", node.has_attr("required"));
        format!("{}\n\n", tag.wrap(text))
    })
}

pub fn select(node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    block_control(text, inline, |text| {
        let tag = RawTag::new("select")
            .attr("id", node.get_str("id"))
            .attr("name", node.get_str("name"))
            .flag("multiple", node.has_attr("multiple"))
            .flag("required", node.has_attr("required"));
        format!("{}\n\n", tag.wrap_lines(text))
    })
}

pub fn option(node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    block_control(text, inline, |text| {
        let tag = RawTag::new("option")
            .attr("value", node.get_str("value"))
            .flag("selected", node.has_attr("selected"));
        format!("{}\n", tag.wrap(text))
    })
}

pub fn optgroup(node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    block_control(text, inline, |text| {
        let tag = RawTag::new("optgroup").attr("label", node.get_str("label"));
        format!("{}\n", tag.wrap_lines(text))
    })
}

pub fn button(node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    block_control(text, inline, |text| {
        let tag = RawTag::new("button")
            .attr("type", node.get_str("type"))
            .attr("name", node.get_str("name"))
            .attr("value", node.get_str("value"))
            .flag("disabled", node.has_attr("disabled"));
        format!("{}\n\n", tag.wrap(text))
    })
}

pub fn progress(node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    block_control(text, inline, |text| {
        let tag = RawTag::new("progress")
            .attr("value", node.get_str("value"))
            .attr("max", node.get_str("max"));
        format!("{}\n\n", tag.wrap(text))
    })
}

pub fn meter(node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    block_control(text, inline, |text| {
        let tag = ["value", "min", "max", "low", "high", "optimum"]
            .into_iter()
            .fold(RawTag::new("meter"), |tag, key| tag.attr(key, node.get_str(key)));
        format!("{}\n\n", tag.wrap(text))
    })
}

pub fn output(node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    block_control(text, inline, |text| {
        let tag = RawTag::new("output")
            .attr("for", node.get_str("for"))
            .attr("name", node.get_str("name"));
        format!("{}\n\n", tag.wrap(text))
    })
}

pub fn datalist(node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    block_control(text, inline, |text| {
        let tag = RawTag::new("datalist").attr("id", node.get_str("id"));
        format!("{}\n\n", tag.wrap_lines(text))
    })
}
