use serde::{Deserialize, Serialize};

/// Horizontal alignment shared by text-like blocks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_css(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    #[default]
    Solid,
    Outline,
    Ghost,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    #[default]
    Bullet,
    Numbered,
}

/// Heading block - `text` is rich-text markup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct HeadingContent {
    pub text: String,
    /// 1 through 6, maps to h1..h6
    pub level: u8,
    pub align: TextAlign,
}

impl Default for HeadingContent {
    fn default() -> Self {
        Self {
            text: "Heading".to_string(),
            level: 2,
            align: TextAlign::Left,
        }
    }
}

/// Paragraph block - `text` is rich-text markup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TextContent {
    pub text: String,
    pub align: TextAlign,
}

impl Default for TextContent {
    fn default() -> Self {
        Self {
            text: "Write your content here.".to_string(),
            align: TextAlign::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ImageContent {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt_text: String,
}

impl Default for ImageContent {
    fn default() -> Self {
        Self {
            url: String::new(),
            width: 600,
            height: 400,
            alt_text: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct VideoContent {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ButtonContent {
    /// Label markup
    pub text: String,
    pub url: String,
    pub style: ButtonStyle,
    pub align: TextAlign,
}

impl Default for ButtonContent {
    fn default() -> Self {
        Self {
            text: "Click me".to_string(),
            url: "#".to_string(),
            style: ButtonStyle::Solid,
            align: TextAlign::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct IconContent {
    pub icon_name: String,
    pub color: String,
    pub size: u32,
    pub align: TextAlign,
}

impl Default for IconContent {
    fn default() -> Self {
        Self {
            icon_name: "star".to_string(),
            color: "#4f46e5".to_string(),
            size: 48,
            align: TextAlign::Center,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct McqOption {
    pub id: String,
    pub text: String,
}

/// Multiple-choice question with a single correct answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct McqContent {
    pub question: String,
    pub options: Vec<McqOption>,
    pub correct_option_id: Option<String>,
    pub feedback: String,
}

impl Default for McqContent {
    fn default() -> Self {
        let options: Vec<McqOption> = (1..=3)
            .map(|n| McqOption {
                id: format!("opt-{}", n),
                text: format!("Option {}", n),
            })
            .collect();
        Self {
            question: "What is the correct answer?".to_string(),
            correct_option_id: Some(options[0].id.clone()),
            options,
            feedback: String::new(),
        }
    }
}

impl McqContent {
    pub fn option(&self, id: &str) -> Option<&McqOption> {
        self.options.iter().find(|o| o.id == id)
    }

    pub fn is_correct(&self, id: &str) -> bool {
        self.correct_option_id.as_deref() == Some(id)
    }

    /// Marks `id` as the single correct answer; returns false when no such option exists.
    pub fn mark_correct(&mut self, id: &str) -> bool {
        if self.option(id).is_none() {
            return false;
        }
        self.correct_option_id = Some(id.to_string());
        true
    }

    /// Removes an option. If it was the correct one, the first remaining option
    /// becomes correct so exactly one answer stays marked.
    pub fn remove_option(&mut self, id: &str) -> Option<McqOption> {
        let idx = self.options.iter().position(|o| o.id == id)?;
        let removed = self.options.remove(idx);
        if self.is_correct(id) {
            self.correct_option_id = self.options.first().map(|o| o.id.clone());
        }
        Some(removed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProcessStep {
    pub id: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ProcessContent {
    pub steps: Vec<ProcessStep>,
}

impl Default for ProcessContent {
    fn default() -> Self {
        Self {
            steps: (1..=3)
                .map(|n| ProcessStep {
                    id: format!("step-{}", n),
                    title: format!("Step {}", n),
                    description: "Describe this step.".to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CodeContent {
    pub language: String,
    pub code: String,
}

impl Default for CodeContent {
    fn default() -> Self {
        Self {
            language: "javascript".to_string(),
            code: "console.log('Hello, world!');".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct EmbedContent {
    pub url: String,
    pub height: u32,
}

impl Default for EmbedContent {
    fn default() -> Self {
        Self {
            url: String::new(),
            height: 400,
        }
    }
}

/// Full-bleed banner with a background image and an overlay title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct BannerContent {
    pub url: String,
    pub height: u32,
    /// Overlay title markup
    pub text: String,
    /// 0.0 (transparent) to 1.0 (opaque)
    pub overlay_opacity: f64,
}

impl Default for BannerContent {
    fn default() -> Self {
        Self {
            url: String::new(),
            height: 300,
            text: "Banner title".to_string(),
            overlay_opacity: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ListContent {
    pub style: ListStyle,
    pub items: Vec<String>,
}

impl Default for ListContent {
    fn default() -> Self {
        Self {
            style: ListStyle::Bullet,
            items: vec![
                "First item".to_string(),
                "Second item".to_string(),
                "Third item".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Flashcard {
    pub id: String,
    pub front: String,
    pub back: String,
    pub image: String,
}

impl Default for Flashcard {
    fn default() -> Self {
        Self {
            id: "card-1".to_string(),
            front: "Term".to_string(),
            back: "Definition".to_string(),
            image: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FlashcardContent {
    pub cards: Vec<Flashcard>,
}

impl Default for FlashcardContent {
    fn default() -> Self {
        Self {
            cards: vec![Flashcard::default()],
        }
    }
}

/// A marker placed on a hotspot image; `x` and `y` are percentages of the image size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Hotspot {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct HotspotContent {
    pub url: String,
    pub hotspots: Vec<Hotspot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mcq_mark_correct_replaces_previous() {
        let mut mcq = McqContent::default();
        assert!(mcq.is_correct("opt-1"));
        assert!(mcq.mark_correct("opt-3"));
        assert!(mcq.is_correct("opt-3"));
        assert!(!mcq.is_correct("opt-1"));
        assert!(!mcq.mark_correct("missing"));
        assert!(mcq.is_correct("opt-3"));
    }

    #[test]
    fn test_mcq_remove_correct_option_moves_answer() {
        let mut mcq = McqContent::default();
        mcq.remove_option("opt-1");
        assert_eq!(mcq.correct_option_id.as_deref(), Some("opt-2"));
        assert_eq!(mcq.options.len(), 2);
    }

    #[test]
    fn test_content_rejects_foreign_fields() {
        let result: Result<HeadingContent, _> =
            serde_json::from_str(r#"{"text":"Hi","url":"https://example.com"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let image: ImageContent = serde_json::from_str(r#"{"url":"a.png"}"#).unwrap();
        assert_eq!(image.url, "a.png");
        assert_eq!(image.width, 600);
        assert_eq!(image.height, 400);
    }
}
