//! Text transforms applied to text nodes and converter output.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::options::ConversionOptions;

static LINE_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(\s*)([#=+-])").expect("line marker pattern"));

static ORDERED_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(\s*\d{1,9})([.)])").expect("ordered marker pattern"));

static STRIKETHROUGH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"~{2,}").expect("strikethrough pattern"));

static ESCAPED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\([!-/:-@\[-`{-~])").expect("escaped punctuation pattern"));

/// HTML whitespace plus the Unicode space separators (category Zs).
pub fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{0B}'
            | '\u{0C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

/// Collapse every whitespace run into a single ASCII space.
pub fn normalize_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_run = false;

    for c in text.chars() {
        if is_whitespace(c) {
            if !in_run {
                result.push(' ');
                in_run = true;
            }
        } else {
            result.push(c);
            in_run = false;
        }
    }

    result
}

/// Escape characters that Markdown would otherwise interpret.
///
/// The three toggles on `options` are independent: `escape_misc` covers
/// backslashes, backticks, brackets, pipes, angle brackets, ampersands,
/// `~~` runs and line-leading block markers.
pub fn escape(text: &str, options: &ConversionOptions) -> String {
    escape_at(text, options, true)
}

/// Like [`escape`], for text that may continue an output line.
///
/// When `line_start` is false the text up to its first newline follows other
/// content, so block markers there are left alone.
pub fn escape_at(text: &str, options: &ConversionOptions, line_start: bool) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut result = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        let needs_escape = match c {
            '\\' | '`' | '[' | ']' | '|' | '<' | '>' | '&' => options.escape_misc,
            '*' => options.escape_asterisks,
            '_' => options.escape_underscores,
            _ => false,
        };
        if needs_escape {
            result.push('\\');
        }
        result.push(c);
    }

    if options.escape_misc {
        result = STRIKETHROUGH_RE
            .replace_all(&result, |caps: &Captures| caps[0].replace('~', "\\~"))
            .into_owned();
        let split = if line_start {
            0
        } else {
            result.find('\n').map_or(result.len(), |newline| newline + 1)
        };
        let (head, lines) = result.split_at(split);
        let lines = LINE_MARKER_RE.replace_all(lines, "$1\\$2");
        let lines = ORDERED_MARKER_RE.replace_all(&lines, "$1\\$2");
        result = format!("{head}{lines}");
    }

    result
}

/// Drop backslashes in front of ASCII punctuation.
pub fn unescape(text: &str) -> String {
    ESCAPED_RE.replace_all(text, "$1").into_owned()
}

/// Split boundary whitespace off `text`.
///
/// Returns `(prefix, suffix, trimmed)` where prefix and suffix are a single
/// space when the text started or ended with whitespace.
pub fn chomp(text: &str) -> (&'static str, &'static str, &str) {
    let prefix = if text.starts_with(char::is_whitespace) { " " } else { "" };
    let suffix = if text.ends_with(char::is_whitespace) { " " } else { "" };
    (prefix, suffix, text.trim())
}

/// Prefix every non-empty line with `unit`.
pub fn indent(text: &str, unit: &str) -> String {
    let mut result = String::with_capacity(text.len() + unit.len() * 4);
    for line in text.split_inclusive('\n') {
        if line != "\n" {
            result.push_str(unit);
        }
        result.push_str(line);
    }
    result
}

/// Setext underline: `text\n===\n\n`, sized to the text's character count.
pub fn underline(text: &str, pad: char) -> String {
    let text = text.trim_end();
    if text.is_empty() {
        return String::new();
    }
    let rule: String = std::iter::repeat(pad).take(text.chars().count()).collect();
    format!("{text}\n{rule}\n\n")
}

/// Greedy word wrap.
///
/// Hard breaks (existing newlines, including two-space breaks) are kept and
/// words are never split, so a single long word may exceed `width`.
pub fn fill(text: &str, width: usize) -> String {
    text.split('\n')
        .map(|line| fill_line(line, width))
        .collect::<Vec<_>>()
        .join("\n")
}

fn fill_line(line: &str, width: usize) -> String {
    let (body, hard_break) = match line.strip_suffix("  ") {
        Some(body) => (body, "  "),
        None => (line, ""),
    };

    let mut result = String::with_capacity(line.len());
    let mut column = 0;
    for word in body.split_whitespace() {
        let len = word.chars().count();
        if column > 0 && column + 1 + len > width {
            result.push('\n');
            column = 0;
        } else if column > 0 {
            result.push(' ');
            column += 1;
        }
        result.push_str(word);
        column += len;
    }
    result.push_str(hard_break);
    result
}

/// Number of `\n` characters at the end of `text`.
pub fn trailing_newlines(text: &str) -> usize {
    text.len() - text.trim_end_matches('\n').len()
}

/// The last `n` characters of `text` (all of it when shorter).
pub fn last_chars(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    text.char_indices()
        .rev()
        .nth(n - 1)
        .map_or(text, |(i, _)| &text[i..])
}
