//! Embedded media, kept as raw HTML, plus inline SVG and MathML.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use htmldown_core::ConversionOptions;

use super::raw::RawTag;
use crate::node::NodeRef;

/// `src`, falling back to the first `<source src>` inside the element
fn media_source<'a>(node: &NodeRef<'a>) -> Option<&'a str> {
    node.get_str("src")
        .filter(|src| !src.is_empty())
        .or_else(|| node.find("source").and_then(|source| source.get_str("src")))
}

fn with_fallback(tag: &RawTag, text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        format!("{}\n\n", tag.empty())
    } else {
        format!("{}\n\n", tag.wrap_lines(text))
    }
}

pub fn audio(node: &NodeRef<'_>, text: &str, _inline: bool, _options: &ConversionOptions) -> String {
    let tag = RawTag::new("audio")
        .attr("src", media_source(node))
        .flag("controls", node.has_attr("controls"))
        .flag("autoplay", node.has_attr("autoplay"))
        .flag("loop", node.has_attr("loop"))
        .flag("muted", node.has_attr("muted"))
        .attr("preload", node.get_str("preload"));
    with_fallback(&tag, text)
}

pub fn video(node: &NodeRef<'_>, text: &str, _inline: bool, _options: &ConversionOptions) -> String {
    let tag = RawTag::new("video")
        .attr("src", media_source(node))
        .attr("width", node.get_str("width"))
        .attr("height", node.get_str("height"))
        .attr("poster", node.get_str("poster"))
        .flag("controls", node.has_attr("controls"))
        .flag("autoplay", node.has_attr("autoplay"))
        .flag("loop", node.has_attr("loop"))
        .flag("muted", node.has_attr("muted"))
        .attr("preload", node.get_str("preload"));
    with_fallback(&tag, text)
}

pub fn iframe(node: &NodeRef<'_>, _text: &str, _inline: bool, _options: &ConversionOptions) -> String {
    let sandbox = node.get_str("sandbox");
    let tag = RawTag::new("iframe")
        .attr("src", node.get_str("src"))
        .attr("width", node.get_str("width"))
        .attr("height", node.get_str("height"))
        .attr("title", node.get_str("title"))
        .attr("allow", node.get_str("allow"))
        .attr("sandbox", sandbox)
        .flag("sandbox", sandbox.is_some_and(|s| s.trim().is_empty()))
        .attr("loading", node.get_str("loading"));
    format!("{}\n\n", tag.wrap(""))
}

/// Rendered `<img>` content, else the first `<source srcset>` candidate
pub fn picture(node: &NodeRef<'_>, text: &str, _inline: bool, _options: &ConversionOptions) -> String {
    if !text.trim().is_empty() {
        return text.to_string();
    }
    node.descendants()
        .filter(|descendant| descendant.is("source"))
        .find_map(|source| source.get_str("srcset"))
        .and_then(|srcset| srcset.split(',').next())
        .and_then(|candidate| candidate.split_whitespace().next())
        .map(|src| format!("![]({src})"))
        .unwrap_or_default()
}

/// Image with the serialized SVG as a data URI, titled by its `<title>`
pub fn svg(node: &NodeRef<'_>, _text: &str, inline: bool, _options: &ConversionOptions) -> String {
    let title = node
        .children()
        .find(|child| child.is("title"))
        .map(|title| title.text_content().trim().to_string())
        .unwrap_or_else(|| "SVG Image".to_string());
    if inline {
        return title;
    }
    let encoded = STANDARD.encode(node.outer_html().as_bytes());
    format!("![{title}](data:image/svg+xml;base64,{encoded})")
}

/// MathML source kept in a comment, followed by its text
pub fn math(node: &NodeRef<'_>, text: &str, inline: bool, _options: &ConversionOptions) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    let rendered = format!("<!-- MathML: {} --> {text}", node.outer_html());
    let display_block = node.get_str("display") == Some("block");
    if display_block && !inline && !node.has_ancestor(&["p"]) {
        format!("\n\n{rendered}\n\n")
    } else {
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Document;

    #[test]
    fn test_video_source_fallback() {
        let mut doc = Document::new();
        let root = doc.root();
        let video_id = doc.append_element(root, "video", [("controls", ""), ("width", "640")]);
        doc.append_element(video_id, "source", [("src", "movie.mp4")]);

        let options = ConversionOptions::default();
        assert_eq!(
            video(&doc.node(video_id), "", false, &options),
            "<video src=\"movie.mp4\" width=\"640\" controls />\n\n"
        );
        assert_eq!(
            video(&doc.node(video_id), " Your browser does not support video. ", false, &options),
            "<video src=\"movie.mp4\" width=\"640\" controls>\nYour browser does not support video.\n</video>\n\n"
        );
    }

    #[test]
    fn test_audio_without_attributes() {
        let mut doc = Document::new();
        let root = doc.root();
        let audio_id = doc.append_element(root, "audio", Vec::<(&str, &str)>::new());
        let options = ConversionOptions::default();
        assert_eq!(audio(&doc.node(audio_id), "", false, &options), "<audio />\n\n");
    }

    #[test]
    fn test_iframe_sandbox() {
        let mut doc = Document::new();
        let root = doc.root();
        let bare = doc.append_element(root, "iframe", [("src", "https://x.com"), ("sandbox", "")]);
        let scoped = doc.append_element(root, "iframe", [("sandbox", "allow-scripts")]);

        let options = ConversionOptions::default();
        assert_eq!(
            iframe(&doc.node(bare), "", false, &options),
            "<iframe src=\"https://x.com\" sandbox></iframe>\n\n"
        );
        assert_eq!(
            iframe(&doc.node(scoped), "", false, &options),
            "<iframe sandbox=\"allow-scripts\"></iframe>\n\n"
        );
    }

    #[test]
    fn test_picture_srcset_fallback() {
        let mut doc = Document::new();
        let root = doc.root();
        let picture_id = doc.append_element(root, "picture", Vec::<(&str, &str)>::new());
        doc.append_element(picture_id, "source", [("srcset", "wide.webp 2x, narrow.webp 1x")]);

        let options = ConversionOptions::default();
        assert_eq!(picture(&doc.node(picture_id), "", false, &options), "![](wide.webp)");
        assert_eq!(picture(&doc.node(picture_id), "![a](a.png)", false, &options), "![a](a.png)");
    }

    #[test]
    fn test_svg_data_uri() {
        let mut doc = Document::new();
        let root = doc.root();
        let svg_id = doc.append_element(root, "svg", [("width", "10")]);
        let title = doc.append_element(svg_id, "title", Vec::<(&str, &str)>::new());
        doc.append_text(title, " Chart ");
        let bare = doc.append_element(root, "svg", Vec::<(&str, &str)>::new());

        let options = ConversionOptions::default();
        let expected = STANDARD.encode(r#"<svg width="10"><title> Chart </title></svg>"#);
        assert_eq!(
            svg(&doc.node(svg_id), "", false, &options),
            format!("![Chart](data:image/svg+xml;base64,{expected})")
        );
        assert_eq!(svg(&doc.node(svg_id), "", true, &options), "Chart");
        assert!(svg(&doc.node(bare), "", false, &options).starts_with("![SVG Image](data:image/svg+xml;base64,"));
    }

    #[test]
    fn test_math_comment() {
        let mut doc = Document::new();
        let root = doc.root();
        let inline_math = doc.append_element(root, "math", Vec::<(&str, &str)>::new());
        let mn = doc.append_element(inline_math, "mn", Vec::<(&str, &str)>::new());
        doc.append_text(mn, "42");
        let block_math = doc.append_element(root, "math", [("display", "block")]);

        let options = ConversionOptions::default();
        assert_eq!(
            math(&doc.node(inline_math), "42", false, &options),
            "<!-- MathML: <math><mn>42</mn></math> --> 42"
        );
        assert_eq!(
            math(&doc.node(block_math), "12", false, &options),
            "\n\n<!-- MathML: <math display=\"block\"></math> --> 12\n\n"
        );
        assert_eq!(
            math(&doc.node(block_math), "12", true, &options),
            "<!-- MathML: <math display=\"block\"></math> --> 12"
        );
        assert_eq!(math(&doc.node(inline_math), "  ", false, &options), "");
    }
}
