use std::fmt::Write;
use std::ops::Range;

use crate::content::TextAlign;
use crate::richtext::{escape_html, Mark, RichText};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarCommand {
    Bold,
    Italic,
    Underline,
    Align(TextAlign),
}

/// A value the surface asks its owner to commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceChange {
    Markup(String),
    Align(TextAlign),
}

/// In-place editor for one short formatted-text value.
///
/// While focused the surface owns its draft: external value changes are held
/// back until blur so an in-progress edit (and the caret) is never clobbered.
#[derive(Debug, Clone)]
pub struct RichTextSurface {
    value: String,
    draft: RichText,
    placeholder: String,
    align: TextAlign,
    read_only: bool,
    focused: bool,
    dirty: bool,
    selection: Range<usize>,
}

impl RichTextSurface {
    pub fn new(value: impl Into<String>, placeholder: impl Into<String>, align: TextAlign) -> Self {
        let value = value.into();
        Self {
            draft: RichText::parse_markup(&value),
            value,
            placeholder: placeholder.into(),
            align,
            read_only: false,
            focused: false,
            dirty: false,
            selection: 0..0,
        }
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn toolbar_visible(&self) -> bool {
        self.focused && !self.read_only
    }

    pub fn is_empty(&self) -> bool {
        self.draft.is_empty()
    }

    pub fn align(&self) -> TextAlign {
        self.align
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Last value committed to or received from the owner
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Current markup of the draft
    pub fn markup(&self) -> String {
        self.draft.to_markup()
    }

    pub fn focus(&mut self) {
        if self.read_only {
            return;
        }
        self.focused = true;
        let end = self.draft.len();
        self.selection = end..end;
    }

    pub fn select(&mut self, range: Range<usize>) {
        let len = self.draft.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        self.selection = start..end;
    }

    /// Replace the selection with `text` and place the caret after it
    pub fn type_text(&mut self, text: &str) {
        if !self.focused {
            return;
        }
        let start = self.selection.start;
        self.draft.delete_range(self.selection.clone());
        self.draft.insert_text(start, text);
        let caret = start + text.chars().count();
        self.selection = caret..caret;
        self.dirty = true;
    }

    pub fn delete_selection(&mut self) {
        if !self.focused || self.selection.is_empty() {
            return;
        }
        let start = self.selection.start;
        self.draft.delete_range(self.selection.clone());
        self.selection = start..start;
        self.dirty = true;
    }

    /// Apply a toolbar command. The resulting change is returned for immediate
    /// propagation; `None` when unfocused or read-only.
    pub fn command(&mut self, command: ToolbarCommand) -> Option<SurfaceChange> {
        if !self.toolbar_visible() {
            return None;
        }
        let mark = match command {
            ToolbarCommand::Bold => Mark::Bold,
            ToolbarCommand::Italic => Mark::Italic,
            ToolbarCommand::Underline => Mark::Underline,
            ToolbarCommand::Align(align) => {
                self.align = align;
                return Some(SurfaceChange::Align(align));
            }
        };
        self.draft.apply_format(self.selection.clone(), mark);
        let markup = self.draft.to_markup();
        self.value = markup.clone();
        self.dirty = false;
        Some(SurfaceChange::Markup(markup))
    }

    /// Leave the surface. Returns the final markup once per focus session.
    pub fn blur(&mut self) -> Option<String> {
        if !self.focused {
            return None;
        }
        self.focused = false;
        self.selection = 0..0;
        let markup = self.draft.to_markup();
        self.value = markup.clone();
        self.dirty = false;
        Some(markup)
    }

    /// A new value arrived from outside. Ignored while focused.
    pub fn set_external_value(&mut self, value: &str) -> bool {
        if self.focused {
            return false;
        }
        self.value = value.to_string();
        self.draft = RichText::parse_markup(value);
        true
    }

    pub fn set_external_align(&mut self, align: TextAlign) {
        self.align = align;
    }

    /// True when the draft has edits not yet propagated
    pub fn has_pending_edits(&self) -> bool {
        self.dirty
    }

    pub fn render_html(&self, field: &str) -> String {
        let mut out = String::new();
        let align = self.align.as_css();
        if self.read_only {
            let _ = write!(
                out,
                "<div class=\"pc-rich\" style=\"text-align:{};\">{}</div>",
                align,
                self.draft.to_markup()
            );
            return out;
        }
        let empty_class = if self.is_empty() { " pc-empty" } else { "" };
        let _ = write!(
            out,
            "<div class=\"pc-rich pc-editable{}\" contenteditable=\"true\" data-field=\"{}\" data-placeholder=\"{}\" style=\"text-align:{};\">{}</div>",
            empty_class,
            escape_html(field),
            escape_html(&self.placeholder),
            align,
            self.draft.to_markup()
        );
        if self.toolbar_visible() {
            out.push_str(&toolbar_html(self.align));
        }
        out
    }
}

fn toolbar_html(active: TextAlign) -> String {
    let mut out = String::from("<div class=\"pc-toolbar\" role=\"toolbar\">");
    for (cmd, label) in [("bold", "B"), ("italic", "I"), ("underline", "U")] {
        let _ = write!(
            out,
            "<button type=\"button\" data-command=\"{}\">{}</button>",
            cmd, label
        );
    }
    for align in [TextAlign::Left, TextAlign::Center, TextAlign::Right] {
        let pressed = if align == active { "true" } else { "false" };
        let _ = write!(
            out,
            "<button type=\"button\" data-command=\"align-{}\" aria-pressed=\"{}\">{}</button>",
            align.as_css(),
            pressed,
            align.as_css()
        );
    }
    out.push_str("</div>");
    out
}
