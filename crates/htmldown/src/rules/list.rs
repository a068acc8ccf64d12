//! List items and list containers.
//!
//! Nesting is never threaded through the walker: every call looks at the
//! item's ancestors to find its depth and its parent's numbering.

use htmldown_core::text::indent;
use htmldown_core::ConversionOptions;

use crate::node::NodeRef;
use crate::utilities::LISTS;

pub fn list_item(node: &NodeRef<'_>, text: &str, _inline: bool, options: &ConversionOptions) -> String {
    let text = text.trim();

    let checkbox = node.descendants().find(|descendant| {
        descendant.is("input")
            && descendant
                .get_str("type")
                .is_some_and(|t| t.eq_ignore_ascii_case("checkbox"))
    });
    if let Some(checkbox) = checkbox {
        let mark = if checkbox.has_attr("checked") { 'x' } else { ' ' };
        return format!("- [{mark}] {text}\n");
    }

    format!("{} {text}\n", marker(node, options))
}

fn marker(node: &NodeRef<'_>, options: &ConversionOptions) -> String {
    let parent = node.parent();
    if let Some(list) = parent.filter(|p| p.is("ol")) {
        let start = list
            .get_str("start")
            .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|s| s.parse::<usize>().ok())
            .map_or(1, |n| n.max(1));
        let position = node.preceding_siblings().filter(|s| s.is("li")).count();
        return format!("{}.", start + position);
    }

    if parent.is_some_and(|p| p.is("menu")) {
        return "-".to_string();
    }

    let depth = node
        .ancestors()
        .filter(|ancestor| ancestor.is("ul"))
        .count()
        .saturating_sub(1);
    let bullet = options.bullets.chars().cycle().nth(depth).unwrap_or('*');
    bullet.to_string()
}

pub fn list(node: &NodeRef<'_>, text: &str, _inline: bool, options: &ConversionOptions) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    if node.has_ancestor(&["li"]) {
        let nested = indent(text, &options.indent_unit());
        return format!("\n{}", nested.trim_end());
    }

    let followed_by_content = node
        .next_sibling()
        .is_some_and(|next| !next.is_any(LISTS));
    if followed_by_content {
        format!("{text}\n")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Document, NodeId};

    fn ordered(start: Option<&str>, items: usize) -> (Document, Vec<NodeId>) {
        let mut doc = Document::new();
        let root = doc.root();
        let attrs: Vec<(&str, &str)> = start.map(|s| ("start", s)).into_iter().collect();
        let ol = doc.append_element(root, "ol", attrs);
        let ids = (0..items)
            .map(|_| doc.append_element(ol, "li", Vec::<(&str, &str)>::new()))
            .collect();
        (doc, ids)
    }

    #[test]
    fn test_ordered_numbering() {
        let options = ConversionOptions::default();
        let (doc, items) = ordered(Some("3"), 2);
        assert_eq!(list_item(&doc.node(items[1]), "b", false, &options), "4. b\n");

        let (doc, items) = ordered(Some("-2"), 1);
        assert_eq!(list_item(&doc.node(items[0]), "a", false, &options), "1. a\n");

        let (doc, items) = ordered(Some("0"), 1);
        assert_eq!(list_item(&doc.node(items[0]), "a", false, &options), "1. a\n");
    }

    #[test]
    fn test_bullets_cycle_with_depth() {
        let mut doc = Document::new();
        let mut parent = doc.root();
        let mut items = Vec::new();
        for _ in 0..4 {
            let ul = doc.append_element(parent, "ul", Vec::<(&str, &str)>::new());
            parent = doc.append_element(ul, "li", Vec::<(&str, &str)>::new());
            items.push(parent);
        }

        let options = ConversionOptions::default();
        let markers: Vec<String> = items
            .iter()
            .map(|&id| list_item(&doc.node(id), "x", false, &options))
            .collect();
        assert_eq!(markers, ["* x\n", "+ x\n", "- x\n", "* x\n"]);
    }

    #[test]
    fn test_menu_items_use_dash() {
        let mut doc = Document::new();
        let root = doc.root();
        let ul = doc.append_element(root, "ul", Vec::<(&str, &str)>::new());
        let li = doc.append_element(ul, "li", Vec::<(&str, &str)>::new());
        let menu = doc.append_element(li, "menu", Vec::<(&str, &str)>::new());
        let item = doc.append_element(menu, "li", Vec::<(&str, &str)>::new());

        let options = ConversionOptions::default();
        assert_eq!(list_item(&doc.node(item), "Copy", false, &options), "- Copy\n");
        assert_eq!(list(&doc.node(menu), "- Copy\n", false, &options), "\n    - Copy");
    }

    #[test]
    fn test_task_items() {
        let mut doc = Document::new();
        let root = doc.root();
        let ul = doc.append_element(root, "ul", Vec::<(&str, &str)>::new());
        let done = doc.append_element(ul, "li", Vec::<(&str, &str)>::new());
        doc.append_element(done, "input", [("type", "checkbox"), ("checked", "")]);
        let open = doc.append_element(ul, "li", Vec::<(&str, &str)>::new());
        doc.append_element(open, "input", [("type", "CHECKBOX")]);

        let options = ConversionOptions::default();
        assert_eq!(list_item(&doc.node(done), " Ship it", false, &options), "- [x] Ship it\n");
        assert_eq!(list_item(&doc.node(open), "Test", false, &options), "- [ ] Test\n");
    }

    #[test]
    fn test_nested_list_indent() {
        let mut doc = Document::new();
        let root = doc.root();
        let li = doc.append_element(root, "li", Vec::<(&str, &str)>::new());
        let ul = doc.append_element(li, "ul", Vec::<(&str, &str)>::new());

        let options = ConversionOptions::default();
        assert_eq!(list(&doc.node(ul), "+ a\n+ b\n", false, &options), "\n    + a\n    + b");
    }
}
