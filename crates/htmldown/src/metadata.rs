//! `<head>` metadata extraction.

use std::collections::BTreeMap;

use crate::node::Document;

/// Link relations copied as `link-<rel>`
const LINK_RELATIONS: &[&str] = &["author", "license", "alternate"];

/// Collect title, `<meta>`, `<base>` and selected `<link>` data from the
/// document's first `<head>`.
///
/// Keys are `title`, `base-href`, `canonical`, `meta-*` and `link-*`. For
/// `<meta>` later duplicates win, for `<link>` and `<base>` the first one does.
pub fn extract_metadata(doc: &Document) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    let Some(head) = doc.find_element("head") else {
        return metadata;
    };
    let head = doc.node(head);

    if let Some(title) = head.find("title") {
        let title = title.text_content();
        let title = title.trim();
        if !title.is_empty() {
            metadata.insert("title".to_string(), title.to_string());
        }
    }

    if let Some(href) = head.find("base").and_then(|base| base.get_str("href")) {
        metadata.insert("base-href".to_string(), href.to_string());
    }

    for meta in head.descendants().filter(|node| node.is("meta")) {
        let Some(content) = meta.get_str("content") else {
            continue;
        };
        let key = if let Some(name) = meta.get_str("name") {
            name.to_lowercase()
        } else if let Some(property) = meta.get_str("property") {
            property.to_lowercase().replace(':', "-")
        } else if let Some(equiv) = meta.get_str("http-equiv") {
            equiv.to_lowercase()
        } else {
            continue;
        };
        metadata.insert(format!("meta-{key}"), content.to_string());
    }

    for link in head.descendants().filter(|node| node.is("link")) {
        let Some(href) = link.get_str("href") else {
            continue;
        };
        for rel in link.get_list("rel") {
            let rel = rel.to_ascii_lowercase();
            let key = if rel == "canonical" {
                "canonical".to_string()
            } else if LINK_RELATIONS.contains(&rel.as_str()) {
                format!("link-{rel}")
            } else {
                continue;
            };
            metadata.entry(key).or_insert_with(|| href.to_string());
        }
    }

    metadata
}

/// Render the bag as a comment block; an empty bag renders nothing
pub fn render_metadata(metadata: &BTreeMap<String, String>) -> String {
    if metadata.is_empty() {
        return String::new();
    }
    let mut block = String::from("<!--\n");
    for (key, value) in metadata {
        block.push_str(&format!("{key}: {}\n", value.replace("-->", "--&gt;")));
    }
    block.push_str("-->\n\n");
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn head_document() -> Document {
        let mut doc = Document::new();
        let root = doc.root();
        let html = doc.append_element(root, "html", Vec::<(&str, &str)>::new());
        let head = doc.append_element(html, "head", Vec::<(&str, &str)>::new());
        let title = doc.append_element(head, "title", Vec::<(&str, &str)>::new());
        doc.append_text(title, "  Page  ");
        doc.append_element(head, "meta", [("name", "Description"), ("content", "first")]);
        doc.append_element(head, "meta", [("name", "description"), ("content", "second")]);
        doc.append_element(head, "meta", [("property", "og:title"), ("content", "OG")]);
        doc.append_element(head, "meta", [("charset", "utf-8")]);
        doc.append_element(head, "link", [("rel", "canonical"), ("href", "https://x.com/a")]);
        doc.append_element(head, "link", [("rel", "canonical"), ("href", "https://x.com/b")]);
        doc.append_element(head, "link", [("rel", "author license"), ("href", "/humans.txt")]);
        doc.append_element(head, "base", [("href", "https://x.com/")]);
        let body = doc.append_element(html, "body", Vec::<(&str, &str)>::new());
        doc.append_element(body, "meta", [("name", "ignored"), ("content", "x")]);
        doc
    }

    #[test]
    fn test_extract_metadata() {
        let metadata = extract_metadata(&head_document());
        let pairs: Vec<(&str, &str)> = metadata
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            [
                ("base-href", "https://x.com/"),
                ("canonical", "https://x.com/a"),
                ("link-author", "/humans.txt"),
                ("link-license", "/humans.txt"),
                ("meta-description", "second"),
                ("meta-og-title", "OG"),
                ("title", "Page"),
            ]
        );
    }

    #[test]
    fn test_render_metadata() {
        let mut metadata = BTreeMap::new();
        metadata.insert("title".to_string(), "a --> b".to_string());
        metadata.insert("meta-author".to_string(), "Jane".to_string());
        assert_eq!(
            render_metadata(&metadata),
            "<!--\nmeta-author: Jane\ntitle: a --&gt; b\n-->\n\n"
        );
        assert_eq!(render_metadata(&BTreeMap::new()), "");
    }

    #[test]
    fn test_document_without_head() {
        assert!(extract_metadata(&Document::new()).is_empty());
    }
}
