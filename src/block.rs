use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::content::*;
use crate::error::{DesignerError, DesignerResult};
use crate::ids::BlockId;
use crate::resize::Dimensions;

/// The closed set of block types a page can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Heading,
    Text,
    Image,
    Video,
    Mcq,
    Process,
    Flashcard,
    Hotspot,
    List,
    Code,
    Button,
    Icon,
    Embed,
    Banner,
}

impl BlockType {
    pub const ALL: [BlockType; 14] = [
        BlockType::Heading,
        BlockType::Text,
        BlockType::Image,
        BlockType::Video,
        BlockType::Mcq,
        BlockType::Process,
        BlockType::Flashcard,
        BlockType::Hotspot,
        BlockType::List,
        BlockType::Code,
        BlockType::Button,
        BlockType::Icon,
        BlockType::Embed,
        BlockType::Banner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Heading => "heading",
            BlockType::Text => "text",
            BlockType::Image => "image",
            BlockType::Video => "video",
            BlockType::Mcq => "mcq",
            BlockType::Process => "process",
            BlockType::Flashcard => "flashcard",
            BlockType::Hotspot => "hotspot",
            BlockType::List => "list",
            BlockType::Code => "code",
            BlockType::Button => "button",
            BlockType::Icon => "icon",
            BlockType::Embed => "embed",
            BlockType::Banner => "banner",
        }
    }

    /// Human readable name used by the element picker and properties panel
    pub fn label(&self) -> &'static str {
        match self {
            BlockType::Heading => "Heading",
            BlockType::Text => "Text",
            BlockType::Image => "Image",
            BlockType::Video => "Video",
            BlockType::Mcq => "Multiple Choice",
            BlockType::Process => "Process",
            BlockType::Flashcard => "Flashcards",
            BlockType::Hotspot => "Hotspot Image",
            BlockType::List => "List",
            BlockType::Code => "Code",
            BlockType::Button => "Button",
            BlockType::Icon => "Icon",
            BlockType::Embed => "Embed",
            BlockType::Banner => "Banner",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = DesignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DesignerError::InvalidBlockType {
                value: s.to_string(),
                expected: BlockType::ALL
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Type-specific block configuration. Serializes as the bare content record;
/// the type tag lives on [`Block`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BlockContent {
    Heading(HeadingContent),
    Text(TextContent),
    Image(ImageContent),
    Video(VideoContent),
    Mcq(McqContent),
    Process(ProcessContent),
    Flashcard(FlashcardContent),
    Hotspot(HotspotContent),
    List(ListContent),
    Code(CodeContent),
    Button(ButtonContent),
    Icon(IconContent),
    Embed(EmbedContent),
    Banner(BannerContent),
}

/// Default content for a freshly added block of `block_type`
pub fn create_default_content(block_type: BlockType) -> BlockContent {
    match block_type {
        BlockType::Heading => BlockContent::Heading(HeadingContent::default()),
        BlockType::Text => BlockContent::Text(TextContent::default()),
        BlockType::Image => BlockContent::Image(ImageContent::default()),
        BlockType::Video => BlockContent::Video(VideoContent::default()),
        BlockType::Mcq => BlockContent::Mcq(McqContent::default()),
        BlockType::Process => BlockContent::Process(ProcessContent::default()),
        BlockType::Flashcard => BlockContent::Flashcard(FlashcardContent::default()),
        BlockType::Hotspot => BlockContent::Hotspot(HotspotContent::default()),
        BlockType::List => BlockContent::List(ListContent::default()),
        BlockType::Code => BlockContent::Code(CodeContent::default()),
        BlockType::Button => BlockContent::Button(ButtonContent::default()),
        BlockType::Icon => BlockContent::Icon(IconContent::default()),
        BlockType::Embed => BlockContent::Embed(EmbedContent::default()),
        BlockType::Banner => BlockContent::Banner(BannerContent::default()),
    }
}

fn invalid_content(block_type: BlockType, err: impl fmt::Display) -> DesignerError {
    DesignerError::InvalidContent {
        block_type: block_type.to_string(),
        reason: err.to_string(),
    }
}

impl BlockContent {
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockContent::Heading(_) => BlockType::Heading,
            BlockContent::Text(_) => BlockType::Text,
            BlockContent::Image(_) => BlockType::Image,
            BlockContent::Video(_) => BlockType::Video,
            BlockContent::Mcq(_) => BlockType::Mcq,
            BlockContent::Process(_) => BlockType::Process,
            BlockContent::Flashcard(_) => BlockType::Flashcard,
            BlockContent::Hotspot(_) => BlockType::Hotspot,
            BlockContent::List(_) => BlockType::List,
            BlockContent::Code(_) => BlockType::Code,
            BlockContent::Button(_) => BlockType::Button,
            BlockContent::Icon(_) => BlockType::Icon,
            BlockContent::Embed(_) => BlockType::Embed,
            BlockContent::Banner(_) => BlockType::Banner,
        }
    }

    /// Build content of `block_type` from a plain JSON record. Missing fields
    /// take their defaults; fields the type does not define are rejected.
    pub fn from_value(block_type: BlockType, value: Value) -> DesignerResult<Self> {
        let map = match value {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(invalid_content(
                    block_type,
                    format!("expected an object, found {}", other),
                ))
            }
        };
        let known = create_default_content(block_type).field_names();
        if let Some(field) = map.keys().find(|k| !known.contains(k)) {
            return Err(DesignerError::UnknownField {
                block_type: block_type.to_string(),
                field: field.clone(),
            });
        }
        let value = Value::Object(map);
        let content = match block_type {
            BlockType::Heading => BlockContent::Heading(
                serde_json::from_value(value).map_err(|e| invalid_content(block_type, e))?,
            ),
            BlockType::Text => BlockContent::Text(
                serde_json::from_value(value).map_err(|e| invalid_content(block_type, e))?,
            ),
            BlockType::Image => BlockContent::Image(
                serde_json::from_value(value).map_err(|e| invalid_content(block_type, e))?,
            ),
            BlockType::Video => BlockContent::Video(
                serde_json::from_value(value).map_err(|e| invalid_content(block_type, e))?,
            ),
            BlockType::Mcq => BlockContent::Mcq(
                serde_json::from_value(value).map_err(|e| invalid_content(block_type, e))?,
            ),
            BlockType::Process => BlockContent::Process(
                serde_json::from_value(value).map_err(|e| invalid_content(block_type, e))?,
            ),
            BlockType::Flashcard => BlockContent::Flashcard(
                serde_json::from_value(value).map_err(|e| invalid_content(block_type, e))?,
            ),
            BlockType::Hotspot => BlockContent::Hotspot(
                serde_json::from_value(value).map_err(|e| invalid_content(block_type, e))?,
            ),
            BlockType::List => BlockContent::List(
                serde_json::from_value(value).map_err(|e| invalid_content(block_type, e))?,
            ),
            BlockType::Code => BlockContent::Code(
                serde_json::from_value(value).map_err(|e| invalid_content(block_type, e))?,
            ),
            BlockType::Button => BlockContent::Button(
                serde_json::from_value(value).map_err(|e| invalid_content(block_type, e))?,
            ),
            BlockType::Icon => BlockContent::Icon(
                serde_json::from_value(value).map_err(|e| invalid_content(block_type, e))?,
            ),
            BlockType::Embed => BlockContent::Embed(
                serde_json::from_value(value).map_err(|e| invalid_content(block_type, e))?,
            ),
            BlockType::Banner => BlockContent::Banner(
                serde_json::from_value(value).map_err(|e| invalid_content(block_type, e))?,
            ),
        };
        Ok(content)
    }

    /// Plain JSON record of this content (every field present)
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Field names defined for this content's type
    pub fn field_names(&self) -> Vec<String> {
        self.to_map().keys().cloned().collect()
    }

    /// Shallow merge: top-level keys in `partial` replace the current values.
    /// Returns the merged content without touching `self`.
    pub fn merged(&self, partial: &Map<String, Value>) -> DesignerResult<Self> {
        let block_type = self.block_type();
        let mut map = self.to_map();
        for (key, value) in partial {
            if !map.contains_key(key) {
                return Err(DesignerError::UnknownField {
                    block_type: block_type.to_string(),
                    field: key.clone(),
                });
            }
            map.insert(key.clone(), value.clone());
        }
        BlockContent::from_value(block_type, Value::Object(map))
    }

    /// Current width/height for resizable blocks
    pub fn size(&self) -> Option<Dimensions> {
        match self {
            BlockContent::Image(img) => Some(Dimensions {
                width: Some(img.width),
                height: img.height,
            }),
            BlockContent::Banner(b) => Some(Dimensions {
                width: None,
                height: b.height,
            }),
            _ => None,
        }
    }

    pub fn set_size(&mut self, dims: Dimensions) {
        match self {
            BlockContent::Image(img) => {
                if let Some(w) = dims.width {
                    img.width = w;
                }
                img.height = dims.height;
            }
            BlockContent::Banner(b) => b.height = dims.height,
            _ => {}
        }
    }

    pub fn is_resizable(&self) -> bool {
        self.size().is_some()
    }

    pub fn align(&self) -> Option<TextAlign> {
        match self {
            BlockContent::Heading(c) => Some(c.align),
            BlockContent::Text(c) => Some(c.align),
            BlockContent::Button(c) => Some(c.align),
            BlockContent::Icon(c) => Some(c.align),
            _ => None,
        }
    }

    pub fn align_mut(&mut self) -> Option<&mut TextAlign> {
        match self {
            BlockContent::Heading(c) => Some(&mut c.align),
            BlockContent::Text(c) => Some(&mut c.align),
            BlockContent::Button(c) => Some(&mut c.align),
            BlockContent::Icon(c) => Some(&mut c.align),
            _ => None,
        }
    }

    /// Rich-text value bound to `field`, if the type defines it
    pub fn text_field(&self, field: &TextField) -> Option<&String> {
        match (self, field) {
            (BlockContent::Heading(c), TextField::Heading) => Some(&c.text),
            (BlockContent::Text(c), TextField::Paragraph) => Some(&c.text),
            (BlockContent::Button(c), TextField::ButtonLabel) => Some(&c.text),
            (BlockContent::Banner(c), TextField::BannerTitle) => Some(&c.text),
            (BlockContent::Mcq(c), TextField::Question) => Some(&c.question),
            (BlockContent::Mcq(c), TextField::Option(id)) => {
                c.options.iter().find(|o| &o.id == id).map(|o| &o.text)
            }
            (BlockContent::Process(c), TextField::StepTitle(id)) => {
                c.steps.iter().find(|s| &s.id == id).map(|s| &s.title)
            }
            (BlockContent::Process(c), TextField::StepDescription(id)) => {
                c.steps.iter().find(|s| &s.id == id).map(|s| &s.description)
            }
            _ => None,
        }
    }

    pub fn text_field_mut(&mut self, field: &TextField) -> Option<&mut String> {
        match (self, field) {
            (BlockContent::Heading(c), TextField::Heading) => Some(&mut c.text),
            (BlockContent::Text(c), TextField::Paragraph) => Some(&mut c.text),
            (BlockContent::Button(c), TextField::ButtonLabel) => Some(&mut c.text),
            (BlockContent::Banner(c), TextField::BannerTitle) => Some(&mut c.text),
            (BlockContent::Mcq(c), TextField::Question) => Some(&mut c.question),
            (BlockContent::Mcq(c), TextField::Option(id)) => c
                .options
                .iter_mut()
                .find(|o| &o.id == id)
                .map(|o| &mut o.text),
            (BlockContent::Process(c), TextField::StepTitle(id)) => c
                .steps
                .iter_mut()
                .find(|s| &s.id == id)
                .map(|s| &mut s.title),
            (BlockContent::Process(c), TextField::StepDescription(id)) => c
                .steps
                .iter_mut()
                .find(|s| &s.id == id)
                .map(|s| &mut s.description),
            _ => None,
        }
    }
}

/// A rich-text field inside a block that an editing surface can bind to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextField {
    Heading,
    Paragraph,
    ButtonLabel,
    BannerTitle,
    Question,
    Option(String),
    StepTitle(String),
    StepDescription(String),
}

impl TextField {
    /// Value used for the `data-field` attribute in edit mode
    pub fn key(&self) -> String {
        match self {
            TextField::Heading | TextField::Paragraph | TextField::ButtonLabel => {
                "text".to_string()
            }
            TextField::BannerTitle => "text".to_string(),
            TextField::Question => "question".to_string(),
            TextField::Option(id) => format!("options.{}", id),
            TextField::StepTitle(id) => format!("steps.{}.title", id),
            TextField::StepDescription(id) => format!("steps.{}.description", id),
        }
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// One content unit of a page
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub content: BlockContent,
}

impl Block {
    pub fn new(id: BlockId, content: BlockContent) -> Self {
        Self { id, content }
    }

    pub fn block_type(&self) -> BlockType {
        self.content.block_type()
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Block", 3)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", &self.block_type())?;
        state.serialize_field("content", &self.content)?;
        state.end()
    }
}

/// Wire shape shared by blocks and template blueprints
#[derive(Deserialize)]
pub(crate) struct RawBlock {
    #[serde(default)]
    pub id: Option<BlockId>,
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub content: Value,
}

impl RawBlock {
    pub(crate) fn into_content(self) -> DesignerResult<BlockContent> {
        let block_type: BlockType = self.block_type.parse()?;
        BlockContent::from_value(block_type, self.content)
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut raw = RawBlock::deserialize(deserializer)?;
        let id = raw
            .id
            .take()
            .ok_or_else(|| D::Error::missing_field("id"))?;
        let content = raw.into_content().map_err(D::Error::custom)?;
        Ok(Block { id, content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_block_type() {
        assert_eq!("mcq".parse::<BlockType>().unwrap(), BlockType::Mcq);
        assert!(matches!(
            "carousel".parse::<BlockType>(),
            Err(DesignerError::InvalidBlockType { .. })
        ));
    }

    #[test]
    fn test_every_type_has_matching_default() {
        for t in BlockType::ALL {
            assert_eq!(create_default_content(t).block_type(), t);
        }
    }

    #[test]
    fn test_merge_is_shallow() {
        let content = create_default_content(BlockType::Heading);
        let partial = json!({ "text": "Hello" });
        let merged = content.merged(partial.as_object().unwrap()).unwrap();
        match merged {
            BlockContent::Heading(h) => {
                assert_eq!(h.text, "Hello");
                assert_eq!(h.level, 2);
            }
            other => panic!("Expected heading, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_rejects_field_of_other_type() {
        let content = create_default_content(BlockType::Heading);
        let partial = json!({ "url": "https://example.com" });
        assert!(matches!(
            content.merged(partial.as_object().unwrap()),
            Err(DesignerError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_merge_rejects_wrong_value_type() {
        let content = create_default_content(BlockType::Image);
        let partial = json!({ "width": "wide" });
        assert!(matches!(
            content.merged(partial.as_object().unwrap()),
            Err(DesignerError::InvalidContent { .. })
        ));
    }

    #[test]
    fn test_block_json_shape() {
        let block = Block::new(BlockId::from("b1"), create_default_content(BlockType::Video));
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value, json!({ "id": "b1", "type": "video", "content": { "url": "" } }));
        let back: Block = serde_json::from_value(value).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn test_deserialize_unknown_type_fails() {
        let result: Result<Block, _> =
            serde_json::from_value(json!({ "id": "b1", "type": "carousel" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_text_field_only_on_owning_type() {
        let heading = create_default_content(BlockType::Heading);
        assert!(heading.text_field(&TextField::Heading).is_some());
        assert!(heading.text_field(&TextField::ButtonLabel).is_none());

        let mcq = create_default_content(BlockType::Mcq);
        assert!(mcq.text_field(&TextField::Option("opt-2".into())).is_some());
        assert!(mcq.text_field(&TextField::Option("opt-9".into())).is_none());
    }
}
