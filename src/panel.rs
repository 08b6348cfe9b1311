//! Properties panel: the form shown beside the canvas.
//!
//! With nothing selected it edits page settings; otherwise it lists the
//! fields of the selected block's own type and writes changes straight back
//! through the editor session.

use serde_json::{json, Map, Value};
use std::fmt::Write;

use crate::block::{BlockContent, BlockType};
use crate::editor::EditorSession;
use crate::error::{DesignerError, DesignerResult};
use crate::ids::BlockId;
use crate::page::PageStatus;
use crate::richtext::escape_html;

const CODE_LANGUAGES: &[&str] = &[
    "javascript", "typescript", "python", "rust", "java", "html", "css", "json", "bash", "sql",
    "plaintext",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Options,
    Steps,
    ListItems,
    Cards,
    Hotspots,
}

impl ItemKind {
    fn add_label(&self) -> &'static str {
        match self {
            ItemKind::Options => "Add option",
            ItemKind::Steps => "Add step",
            ItemKind::ListItems => "Add item",
            ItemKind::Cards => "Add card",
            ItemKind::Hotspots => "Add hotspot",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: Value,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldControl {
    Text,
    TextArea,
    Url,
    Number { min: f64, max: f64 },
    Slider { min: f64, max: f64, step: f64 },
    Select(Vec<SelectOption>),
    Color,
    Items(ItemKind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelField {
    /// Content key this field is bound to
    pub key: String,
    pub label: String,
    pub control: FieldControl,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelForm {
    Page {
        title: String,
        slug: String,
        status: PageStatus,
        background_color: String,
        swatches: Vec<String>,
        canvas_width: u32,
        block_count: usize,
    },
    Block {
        block_id: BlockId,
        block_type: BlockType,
        fields: Vec<PanelField>,
    },
}

fn select(options: &[(Value, &str)]) -> FieldControl {
    FieldControl::Select(
        options
            .iter()
            .map(|(value, label)| SelectOption {
                value: value.clone(),
                label: label.to_string(),
            })
            .collect(),
    )
}

fn align_control() -> FieldControl {
    select(&[
        (json!("left"), "Left"),
        (json!("center"), "Center"),
        (json!("right"), "Right"),
    ])
}

/// Field layout per block type, without values
fn field_specs(block_type: BlockType) -> Vec<(&'static str, &'static str, FieldControl)> {
    match block_type {
        BlockType::Heading => vec![
            (
                "level",
                "Level",
                select(&[
                    (json!(1), "H1"),
                    (json!(2), "H2"),
                    (json!(3), "H3"),
                    (json!(4), "H4"),
                    (json!(5), "H5"),
                    (json!(6), "H6"),
                ]),
            ),
            ("align", "Alignment", align_control()),
        ],
        BlockType::Text => vec![("align", "Alignment", align_control())],
        BlockType::Image => vec![
            ("url", "Image URL", FieldControl::Url),
            ("altText", "Alt text", FieldControl::Text),
            ("width", "Width", FieldControl::Number { min: 50.0, max: 4000.0 }),
            ("height", "Height", FieldControl::Number { min: 50.0, max: 4000.0 }),
        ],
        BlockType::Video => vec![("url", "Video URL", FieldControl::Url)],
        BlockType::Button => vec![
            ("url", "Link URL", FieldControl::Url),
            (
                "style",
                "Style",
                select(&[
                    (json!("solid"), "Solid"),
                    (json!("outline"), "Outline"),
                    (json!("ghost"), "Ghost"),
                ]),
            ),
            ("align", "Alignment", align_control()),
        ],
        BlockType::Icon => vec![
            ("iconName", "Icon", FieldControl::Text),
            ("color", "Color", FieldControl::Color),
            (
                "size",
                "Size",
                FieldControl::Slider { min: 8.0, max: 512.0, step: 1.0 },
            ),
            ("align", "Alignment", align_control()),
        ],
        BlockType::Mcq => vec![
            ("options", "Options", FieldControl::Items(ItemKind::Options)),
            ("feedback", "Feedback", FieldControl::TextArea),
        ],
        BlockType::Process => vec![("steps", "Steps", FieldControl::Items(ItemKind::Steps))],
        BlockType::Code => {
            let languages: Vec<(Value, &str)> =
                CODE_LANGUAGES.iter().map(|l| (json!(l), *l)).collect();
            vec![
                ("language", "Language", select(&languages)),
                ("code", "Code", FieldControl::TextArea),
            ]
        }
        BlockType::Embed => vec![
            ("url", "Embed URL", FieldControl::Url),
            ("height", "Height", FieldControl::Number { min: 100.0, max: 2000.0 }),
        ],
        BlockType::Banner => vec![
            ("url", "Background image", FieldControl::Url),
            ("height", "Height", FieldControl::Number { min: 50.0, max: 2000.0 }),
            (
                "overlayOpacity",
                "Overlay opacity",
                FieldControl::Slider { min: 0.0, max: 1.0, step: 0.05 },
            ),
        ],
        BlockType::List => vec![
            (
                "style",
                "List style",
                select(&[(json!("bullet"), "Bullets"), (json!("numbered"), "Numbers")]),
            ),
            ("items", "Items", FieldControl::Items(ItemKind::ListItems)),
        ],
        BlockType::Flashcard => vec![("cards", "Cards", FieldControl::Items(ItemKind::Cards))],
        BlockType::Hotspot => vec![
            ("url", "Image URL", FieldControl::Url),
            ("hotspots", "Hotspots", FieldControl::Items(ItemKind::Hotspots)),
        ],
    }
}

pub fn block_fields(content: &BlockContent) -> Vec<PanelField> {
    let values = content.to_map();
    field_specs(content.block_type())
        .into_iter()
        .map(|(key, label, control)| PanelField {
            key: key.to_string(),
            label: label.to_string(),
            control,
            value: values.get(key).cloned().unwrap_or(Value::Null),
        })
        .collect()
}

/// Form for the current selection, or page settings when nothing is selected
pub fn properties_panel(session: &EditorSession) -> PanelForm {
    match session.selected_block() {
        Some(block) => PanelForm::Block {
            block_id: block.id.clone(),
            block_type: block.block_type(),
            fields: block_fields(&block.content),
        },
        None => {
            let page = session.page();
            PanelForm::Page {
                title: page.title.clone(),
                slug: page.slug.clone(),
                status: page.status,
                background_color: page.background_color.clone(),
                swatches: session.config().background_swatches.clone(),
                canvas_width: session.config().canvas_width,
                block_count: page.blocks.len(),
            }
        }
    }
}

fn out_of_range(key: &str, value: &Value, range: String) -> DesignerError {
    DesignerError::ValueOutOfRange {
        property: key.to_string(),
        value: value.to_string(),
        range,
    }
}

fn check_control(key: &str, control: &FieldControl, value: &Value) -> DesignerResult<()> {
    match control {
        FieldControl::Number { min, max } | FieldControl::Slider { min, max, .. } => {
            let range = format!("{} to {}", min, max);
            match value.as_f64() {
                Some(n) if n >= *min && n <= *max => {}
                _ => return Err(out_of_range(key, value, range)),
            }
        }
        FieldControl::Select(options) => {
            if !options.iter().any(|o| &o.value == value) {
                let allowed: Vec<String> = options.iter().map(|o| o.value.to_string()).collect();
                return Err(out_of_range(key, value, allowed.join(", ")));
            }
        }
        _ => {}
    }
    Ok(())
}

fn expect_str<'a>(key: &str, value: &'a Value) -> DesignerResult<&'a str> {
    value.as_str().ok_or_else(|| {
        DesignerError::ValidationError(format!("'{}' expects a string, got {}", key, value))
    })
}

/// Write one panel field back. Page fields apply when nothing is selected;
/// block fields are shallow-merged into the selected block's content.
pub fn apply_field(session: &mut EditorSession, key: &str, value: Value) -> DesignerResult<()> {
    let selected = session
        .selected_block()
        .map(|b| (b.id.clone(), b.block_type()));
    let Some((block_id, block_type)) = selected else {
        return match key {
            "title" => session.set_title(expect_str(key, &value)?),
            "slug" => session.set_slug(expect_str(key, &value)?),
            "backgroundColor" => session.set_page_background(expect_str(key, &value)?),
            "status" => {
                let status: PageStatus = serde_json::from_value(value.clone())
                    .map_err(|_| out_of_range(key, &value, "Draft, Published".to_string()))?;
                session.set_status(status)
            }
            other => Err(DesignerError::UnknownField {
                block_type: "page".to_string(),
                field: other.to_string(),
            }),
        };
    };

    let specs = field_specs(block_type);
    let Some((_, _, control)) = specs.iter().find(|(k, _, _)| *k == key) else {
        return Err(DesignerError::UnknownField {
            block_type: block_type.to_string(),
            field: key.to_string(),
        });
    };
    check_control(key, control, &value)?;

    let mut partial = Map::new();
    partial.insert(key.to_string(), value);
    session.update_block_content(&block_id, &partial)
}

fn item_summary(kind: ItemKind, item: &Value) -> String {
    let text = |k: &str| item.get(k).and_then(Value::as_str).unwrap_or("").to_string();
    match kind {
        ItemKind::Options => text("text"),
        ItemKind::Steps => text("title"),
        ItemKind::ListItems => item.as_str().unwrap_or("").to_string(),
        ItemKind::Cards => text("front"),
        ItemKind::Hotspots => text("content"),
    }
}

fn value_attr(value: &Value) -> String {
    match value {
        Value::String(s) => escape_html(s),
        Value::Null => String::new(),
        other => escape_html(&other.to_string()),
    }
}

impl PanelField {
    fn write_html(&self, out: &mut String) {
        let key = escape_html(&self.key);
        let _ = write!(
            out,
            "<div class=\"pc-field\"><label for=\"pc-field-{}\">{}</label>",
            key,
            escape_html(&self.label)
        );
        match &self.control {
            FieldControl::Text => {
                let _ = write!(
                    out,
                    "<input id=\"pc-field-{0}\" type=\"text\" name=\"{0}\" value=\"{1}\">",
                    key,
                    value_attr(&self.value)
                );
            }
            FieldControl::Url => {
                let _ = write!(
                    out,
                    "<input id=\"pc-field-{0}\" type=\"url\" name=\"{0}\" value=\"{1}\">",
                    key,
                    value_attr(&self.value)
                );
            }
            FieldControl::Color => {
                let _ = write!(
                    out,
                    "<input id=\"pc-field-{0}\" type=\"color\" name=\"{0}\" value=\"{1}\">",
                    key,
                    value_attr(&self.value)
                );
            }
            FieldControl::TextArea => {
                let _ = write!(
                    out,
                    "<textarea id=\"pc-field-{0}\" name=\"{0}\">{1}</textarea>",
                    key,
                    value_attr(&self.value)
                );
            }
            FieldControl::Number { min, max } => {
                let _ = write!(
                    out,
                    "<input id=\"pc-field-{0}\" type=\"number\" name=\"{0}\" min=\"{1}\" max=\"{2}\" value=\"{3}\">",
                    key,
                    min,
                    max,
                    value_attr(&self.value)
                );
            }
            FieldControl::Slider { min, max, step } => {
                let _ = write!(
                    out,
                    "<input id=\"pc-field-{0}\" type=\"range\" name=\"{0}\" min=\"{1}\" max=\"{2}\" step=\"{3}\" value=\"{4}\">",
                    key,
                    min,
                    max,
                    step,
                    value_attr(&self.value)
                );
            }
            FieldControl::Select(options) => {
                let _ = write!(out, "<select id=\"pc-field-{0}\" name=\"{0}\">", key);
                for option in options {
                    let selected = if option.value == self.value { " selected" } else { "" };
                    let _ = write!(
                        out,
                        "<option value=\"{}\"{}>{}</option>",
                        value_attr(&option.value),
                        selected,
                        escape_html(&option.label)
                    );
                }
                out.push_str("</select>");
            }
            FieldControl::Items(kind) => {
                let _ = write!(out, "<ul id=\"pc-field-{}\" class=\"pc-items\">", key);
                if let Some(items) = self.value.as_array() {
                    for (index, item) in items.iter().enumerate() {
                        let _ = write!(
                            out,
                            "<li data-index=\"{}\">{}<button type=\"button\" data-action=\"remove-item\">Remove</button></li>",
                            index,
                            escape_html(&item_summary(*kind, item))
                        );
                    }
                }
                let _ = write!(
                    out,
                    "</ul><button type=\"button\" data-action=\"add-item\">{}</button>",
                    kind.add_label()
                );
            }
        }
        out.push_str("</div>");
    }
}

impl PanelForm {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        match self {
            PanelForm::Page {
                title,
                slug,
                status,
                background_color,
                swatches,
                canvas_width,
                block_count,
            } => {
                out.push_str("<form class=\"pc-panel pc-panel-page\"><h3>Page settings</h3>");
                PanelField {
                    key: "title".to_string(),
                    label: "Title".to_string(),
                    control: FieldControl::Text,
                    value: Value::String(title.clone()),
                }
                .write_html(&mut out);
                PanelField {
                    key: "slug".to_string(),
                    label: "Slug".to_string(),
                    control: FieldControl::Text,
                    value: Value::String(slug.clone()),
                }
                .write_html(&mut out);
                PanelField {
                    key: "status".to_string(),
                    label: "Status".to_string(),
                    control: select(&[(json!("Draft"), "Draft"), (json!("Published"), "Published")]),
                    value: serde_json::to_value(status).unwrap_or(Value::Null),
                }
                .write_html(&mut out);
                out.push_str("<div class=\"pc-field\"><label>Background</label><div class=\"pc-swatches\">");
                for swatch in swatches {
                    let pressed = if swatch.eq_ignore_ascii_case(background_color) { "true" } else { "false" };
                    let _ = write!(
                        out,
                        "<button type=\"button\" class=\"pc-swatch\" data-color=\"{0}\" aria-pressed=\"{1}\" style=\"background:{0};\"></button>",
                        escape_html(swatch),
                        pressed
                    );
                }
                let _ = write!(
                    out,
                    "</div><input type=\"color\" name=\"backgroundColor\" value=\"{}\"></div>",
                    escape_html(background_color)
                );
                let _ = write!(
                    out,
                    "<p class=\"pc-canvas-info\">Canvas {}px wide, {} block{}</p></form>",
                    canvas_width,
                    block_count,
                    if *block_count == 1 { "" } else { "s" }
                );
            }
            PanelForm::Block {
                block_id,
                block_type,
                fields,
            } => {
                let _ = write!(
                    out,
                    "<form class=\"pc-panel pc-panel-block\" data-block-id=\"{}\"><h3>{}</h3>",
                    escape_html(block_id.as_str()),
                    block_type.label()
                );
                for field in fields {
                    field.write_html(&mut out);
                }
                out.push_str("</form>");
            }
        }
        out
    }
}
