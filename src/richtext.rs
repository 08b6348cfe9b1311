//! Inline rich-text model used by every editable text field.
//!
//! A value is a run-length list of spans, each carrying its bold / italic /
//! underline marks. The stored form is a small HTML subset:
//! `<b>`/`<strong>`, `<i>`/`<em>`, `<u>` and `<br>`. Anything else is dropped
//! on parse, which also makes [`RichText::to_markup`] the sanitizer for
//! rendered output.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Bold,
    Italic,
    Underline,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Marks {
    pub fn has(&self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Underline => self.underline,
        }
    }

    pub fn set(&mut self, mark: Mark, on: bool) {
        match mark {
            Mark::Bold => self.bold = on,
            Mark::Italic => self.italic = on,
            Mark::Underline => self.underline = on,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    pub marks: Marks,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Marks::default(),
        }
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    spans: Vec<Span>,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_spans(spans: Vec<Span>) -> Self {
        let mut doc = Self { spans };
        doc.normalize();
        doc
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.spans.iter().map(Span::char_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Marks in effect at character `offset` (the character before it)
    pub fn marks_at(&self, offset: usize) -> Marks {
        let mut pos = 0;
        let mut last = Marks::default();
        for span in &self.spans {
            let len = span.char_len();
            if offset > pos && offset <= pos + len {
                return span.marks;
            }
            if offset == 0 && pos == 0 {
                return span.marks;
            }
            pos += len;
            last = span.marks;
        }
        last
    }

    /// True when every character in `range` carries `mark`
    pub fn has_mark(&self, range: Range<usize>, mark: Mark) -> bool {
        let range = self.clamp(range);
        if range.is_empty() {
            return false;
        }
        let mut pos = 0;
        for span in &self.spans {
            let len = span.char_len();
            let overlaps = pos < range.end && pos + len > range.start;
            if overlaps && !span.marks.has(mark) {
                return false;
            }
            pos += len;
        }
        true
    }

    /// Toggle `mark` over `range`: removed if the whole range already has it,
    /// added otherwise. Empty ranges are a no-op.
    pub fn apply_format(&mut self, range: Range<usize>, mark: Mark) {
        let range = self.clamp(range);
        if range.is_empty() {
            return;
        }
        let on = !self.has_mark(range.clone(), mark);
        let start = self.split_at(range.start);
        let end = self.split_at(range.end);
        for span in &mut self.spans[start..end] {
            span.marks.set(mark, on);
        }
        self.normalize();
    }

    /// Insert plain text at `at`, inheriting the marks of the preceding character
    pub fn insert_text(&mut self, at: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let at = at.min(self.len());
        let marks = self.marks_at(at);
        let idx = self.split_at(at);
        self.spans.insert(
            idx,
            Span {
                text: text.to_string(),
                marks,
            },
        );
        self.normalize();
    }

    pub fn delete_range(&mut self, range: Range<usize>) {
        let range = self.clamp(range);
        if range.is_empty() {
            return;
        }
        let start = self.split_at(range.start);
        let end = self.split_at(range.end);
        self.spans.drain(start..end);
        self.normalize();
    }

    fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let len = self.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        start..end
    }

    /// Ensure a span boundary at character `at`; returns the index of the
    /// span starting there (or `spans.len()` at the end).
    fn split_at(&mut self, at: usize) -> usize {
        let mut pos = 0;
        for i in 0..self.spans.len() {
            if pos == at {
                return i;
            }
            let len = self.spans[i].char_len();
            if at < pos + len {
                let byte = self.spans[i]
                    .text
                    .char_indices()
                    .nth(at - pos)
                    .map(|(b, _)| b)
                    .unwrap_or(self.spans[i].text.len());
                let tail = self.spans[i].text.split_off(byte);
                let marks = self.spans[i].marks;
                self.spans.insert(i + 1, Span { text: tail, marks });
                return i + 1;
            }
            pos += len;
        }
        self.spans.len()
    }

    /// Drop empty spans and merge neighbours with identical marks
    fn normalize(&mut self) {
        let mut merged: Vec<Span> = Vec::with_capacity(self.spans.len());
        for span in self.spans.drain(..) {
            if span.text.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(prev) if prev.marks == span.marks => prev.text.push_str(&span.text),
                _ => merged.push(span),
            }
        }
        self.spans = merged;
    }

    /// Parse the markup subset. Unknown tags are dropped, their text kept.
    pub fn parse_markup(markup: &str) -> Self {
        static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
        let re = TAG_REGEX
            .get_or_init(|| Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)\b[^<>]*?(/?)>").unwrap());

        let mut spans = Vec::new();
        let (mut bold, mut italic, mut underline) = (0usize, 0usize, 0usize);
        let mut last = 0;
        let mut seen_text = false;

        fn push(spans: &mut Vec<Span>, text: String, b: usize, i: usize, u: usize) {
            if !text.is_empty() {
                spans.push(Span {
                    text,
                    marks: Marks {
                        bold: b > 0,
                        italic: i > 0,
                        underline: u > 0,
                    },
                });
            }
        }

        for caps in re.captures_iter(markup) {
            let Some(whole) = caps.get(0) else { continue };
            let text = unescape_html(&markup[last..whole.start()]);
            seen_text |= !text.is_empty();
            push(&mut spans, text, bold, italic, underline);
            last = whole.end();

            let closing = &caps[1] == "/";
            let tag = caps[2].to_lowercase();
            let counter = match tag.as_str() {
                "b" | "strong" => Some(&mut bold),
                "i" | "em" => Some(&mut italic),
                "u" => Some(&mut underline),
                _ => None,
            };
            if let Some(counter) = counter {
                if closing {
                    *counter = counter.saturating_sub(1);
                } else {
                    *counter += 1;
                }
                continue;
            }
            match tag.as_str() {
                "br" => {
                    push(&mut spans, "\n".to_string(), bold, italic, underline);
                    seen_text = true;
                }
                "div" | "p" if !closing && seen_text => {
                    let ends_with_newline = spans
                        .last()
                        .map(|s: &Span| s.text.ends_with('\n'))
                        .unwrap_or(true);
                    if !ends_with_newline {
                        push(&mut spans, "\n".to_string(), bold, italic, underline);
                    }
                }
                _ => {}
            }
        }
        let tail = unescape_html(&markup[last..]);
        push(&mut spans, tail, bold, italic, underline);

        Self::from_spans(spans)
    }

    /// Serialize to the markup subset; text is always escaped
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            let m = span.marks;
            if m.bold {
                out.push_str("<b>");
            }
            if m.italic {
                out.push_str("<i>");
            }
            if m.underline {
                out.push_str("<u>");
            }
            out.push_str(&escape_html(&span.text).replace('\n', "<br>"));
            if m.underline {
                out.push_str("</u>");
            }
            if m.italic {
                out.push_str("</i>");
            }
            if m.bold {
                out.push_str("</b>");
            }
        }
        out
    }
}

/// Normalise a markup value through the model (drops disallowed tags)
pub fn sanitize_markup(markup: &str) -> String {
    RichText::parse_markup(markup).to_markup()
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Single pass over named and numeric character references
fn unescape_html(s: &str) -> String {
    static ENTITY_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = ENTITY_REGEX
        .get_or_init(|| Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|([a-zA-Z]+));").unwrap());
    re.replace_all(s, |caps: &regex::Captures| {
        let code = if let Some(dec) = caps.get(1) {
            dec.as_str().parse::<u32>().ok()
        } else if let Some(hex) = caps.get(2) {
            u32::from_str_radix(hex.as_str(), 16).ok()
        } else {
            let decoded = match &caps[3] {
                "amp" => "&",
                "lt" => "<",
                "gt" => ">",
                "quot" => "\"",
                "apos" => "'",
                "nbsp" => "\u{a0}",
                _ => return caps[0].to_string(),
            };
            return decoded.to_string();
        };
        code.filter(|&c| c != 0)
            .and_then(char::from_u32)
            .unwrap_or('\u{fffd}')
            .to_string()
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_text() {
        let doc = RichText::parse_markup("Hello world");
        assert_eq!(doc.spans(), &[Span::plain("Hello world")]);
    }

    #[test]
    fn test_parse_nested_marks() {
        let doc = RichText::parse_markup("a<strong>b<em>c</em></strong>");
        assert_eq!(doc.spans().len(), 3);
        assert!(doc.spans()[1].marks.bold);
        assert!(doc.spans()[2].marks.bold && doc.spans()[2].marks.italic);
        assert_eq!(doc.to_markup(), "a<b>b</b><b><i>c</i></b>");
    }

    #[test]
    fn test_unknown_tags_dropped() {
        let doc = RichText::parse_markup("<script>alert(1)</script><span class=\"x\">hi</span>");
        assert_eq!(doc.plain_text(), "alert(1)hi");
        assert_eq!(doc.to_markup(), "alert(1)hi");
    }

    #[test]
    fn test_entities_and_breaks() {
        let doc = RichText::parse_markup("a &amp; b<br/>c &lt;d&gt;");
        assert_eq!(doc.plain_text(), "a & b\nc <d>");
        assert_eq!(doc.to_markup(), "a &amp; b<br>c &lt;d&gt;");
    }

    #[test]
    fn test_numeric_references_decoded() {
        let doc = RichText::parse_markup("it&#x27;s &#60;3 &#39;ok&#39; &amp;lt;");
        assert_eq!(doc.plain_text(), "it's <3 'ok' &lt;");
        assert_eq!(doc.to_markup(), "it's &lt;3 'ok' &amp;lt;");
        assert_eq!(RichText::parse_markup("&#0;&copy;").plain_text(), "\u{fffd}&copy;");
    }

    #[test]
    fn test_apply_bold_to_middle() {
        let mut doc = RichText::parse_markup("Hello world");
        doc.apply_format(6..11, Mark::Bold);
        assert_eq!(doc.to_markup(), "Hello <b>world</b>");
    }

    #[test]
    fn test_toggle_removes_when_fully_marked() {
        let mut doc = RichText::parse_markup("<b>Hello</b> world");
        doc.apply_format(0..5, Mark::Bold);
        assert_eq!(doc.to_markup(), "Hello world");
    }

    #[test]
    fn test_partially_marked_range_gets_marked() {
        let mut doc = RichText::parse_markup("<b>Hel</b>lo");
        doc.apply_format(0..5, Mark::Bold);
        assert_eq!(doc.to_markup(), "<b>Hello</b>");
    }

    #[test]
    fn test_empty_range_is_noop() {
        let mut doc = RichText::parse_markup("Hello");
        doc.apply_format(2..2, Mark::Italic);
        doc.apply_format(9..12, Mark::Italic);
        assert_eq!(doc.to_markup(), "Hello");
    }

    #[test]
    fn test_multibyte_split() {
        let mut doc = RichText::parse_markup("héllo wörld");
        doc.apply_format(6..11, Mark::Underline);
        assert_eq!(doc.to_markup(), "héllo <u>wörld</u>");
    }

    #[test]
    fn test_insert_inherits_previous_marks() {
        let mut doc = RichText::parse_markup("<i>ab</i>cd");
        doc.insert_text(2, "X");
        assert_eq!(doc.to_markup(), "<i>abX</i>cd");
        doc.insert_text(0, "Y");
        assert_eq!(doc.to_markup(), "<i>YabX</i>cd");
    }

    #[test]
    fn test_delete_range_merges_neighbours() {
        let mut doc = RichText::parse_markup("ab<b>cd</b>ef");
        doc.delete_range(2..4);
        assert_eq!(doc.spans(), &[Span::plain("abef")]);
    }

    #[test]
    fn test_contenteditable_divs_become_breaks() {
        let doc = RichText::parse_markup("line one<div>line two</div>");
        assert_eq!(doc.plain_text(), "line one\nline two");
    }
}
