//! Table reconstruction.
//!
//! Each row decides on its own whether it is the header row, using only its
//! position among siblings and the table's shape. Rowspan is not expanded.

use htmldown_core::ConversionOptions;

use crate::node::NodeRef;
use crate::utilities::TABLE_CELLS;

/// Columns a cell spans; non-numeric or zero `colspan` counts as one
fn colspan(cell: &NodeRef<'_>) -> usize {
    cell.get_str("colspan")
        .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(1)
}

pub fn cell(node: &NodeRef<'_>, text: &str, _inline: bool, _options: &ConversionOptions) -> String {
    format!(" {}{}", text.trim().replace('\n', " "), " |".repeat(colspan(node)))
}

fn separator(columns: usize) -> String {
    format!("| {} |\n", vec!["---"; columns].join(" | "))
}

pub fn row(node: &NodeRef<'_>, text: &str, _inline: bool, _options: &ConversionOptions) -> String {
    let cells = node.find_all(TABLE_CELLS);
    let first = node.previous_sibling().is_none();
    let parent = node.parent();
    let in_tbody = parent.is_some_and(|p| p.is("tbody"));

    let table_has_head = || {
        parent
            .and_then(|tbody| tbody.parent())
            .is_some_and(|table| table.find("thead").is_some())
    };
    let is_head_row = (!cells.is_empty() && cells.iter().all(|c| c.is("th")))
        || (first && !in_tbody)
        || (first && in_tbody && !table_has_head());

    let mut overline = String::new();
    let mut underline = String::new();
    if is_head_row && first {
        let columns = cells.iter().map(colspan).sum();
        underline = separator(columns);
    } else if first {
        let opens_table = parent.is_some_and(|p| {
            p.is("table") || (p.is("tbody") && p.previous_sibling().is_none())
        });
        if opens_table {
            overline = format!("| {} |\n", vec![""; cells.len()].join(" | "));
            overline.push_str(&separator(cells.len()));
        }
    }

    format!("{overline}|{text}\n{underline}")
}

pub fn table(_node: &NodeRef<'_>, text: &str, _inline: bool, _options: &ConversionOptions) -> String {
    format!("\n\n{text}\n")
}

pub fn caption(_node: &NodeRef<'_>, text: &str, _inline: bool, _options: &ConversionOptions) -> String {
    let text = text.trim();
    if text.is_empty() {
        String::new()
    } else {
        format!("{text}\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Document, NodeId};
    use pretty_assertions::assert_eq;

    fn no_attrs() -> Vec<(&'static str, &'static str)> {
        Vec::new()
    }

    #[test]
    fn test_cell_colspan() {
        let mut doc = Document::new();
        let root = doc.root();
        let wide = doc.append_element(root, "td", [("colspan", "2")]);
        let zero = doc.append_element(root, "td", [("colspan", "0")]);
        let junk = doc.append_element(root, "td", [("colspan", "x")]);

        let options = ConversionOptions::default();
        assert_eq!(cell(&doc.node(wide), " a\nb ", false, &options), " a b | |");
        assert_eq!(cell(&doc.node(zero), "", false, &options), "  |");
        assert_eq!(cell(&doc.node(junk), "c", false, &options), " c |");
    }

    fn table_with_body(head: bool) -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let table = doc.append_element(root, "table", no_attrs());
        if head {
            let thead = doc.append_element(table, "thead", no_attrs());
            let tr = doc.append_element(thead, "tr", no_attrs());
            doc.append_element(tr, "th", no_attrs());
        }
        let tbody = doc.append_element(table, "tbody", no_attrs());
        let first = doc.append_element(tbody, "tr", no_attrs());
        doc.append_element(first, "td", no_attrs());
        doc.append_element(first, "td", no_attrs());
        let second = doc.append_element(tbody, "tr", no_attrs());
        doc.append_element(second, "td", no_attrs());
        (doc, first, second)
    }

    #[test]
    fn test_first_body_row_without_thead_is_header() {
        let (doc, first, second) = table_with_body(false);
        let options = ConversionOptions::default();
        assert_eq!(
            row(&doc.node(first), " a | b |", false, &options),
            "| a | b |\n| --- | --- |\n"
        );
        assert_eq!(row(&doc.node(second), " c |", false, &options), "| c |\n");
    }

    #[test]
    fn test_body_row_after_thead_is_data() {
        let (doc, first, _) = table_with_body(true);
        let options = ConversionOptions::default();
        assert_eq!(row(&doc.node(first), " a | b |", false, &options), "| a | b |\n");
    }

    #[test]
    fn test_colspan_widens_separator() {
        let mut doc = Document::new();
        let root = doc.root();
        let table = doc.append_element(root, "table", no_attrs());
        let tr = doc.append_element(table, "tr", no_attrs());
        doc.append_element(tr, "th", [("colspan", "3")]);

        let options = ConversionOptions::default();
        assert_eq!(
            row(&doc.node(tr), " H | | |", false, &options),
            "| H | | |\n| --- | --- | --- |\n"
        );
    }

    #[test]
    fn test_caption() {
        let mut doc = Document::new();
        let root = doc.root();
        let caption_id = doc.append_element(root, "caption", no_attrs());
        let options = ConversionOptions::default();
        assert_eq!(caption(&doc.node(caption_id), " Totals ", false, &options), "Totals\n\n");
        assert_eq!(caption(&doc.node(caption_id), " ", false, &options), "");
    }
}
