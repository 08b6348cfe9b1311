use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::block::{create_default_content, Block, BlockContent, BlockType, RawBlock};
use crate::content::HeadingContent;
use crate::error::{DesignerError, DesignerResult};
use crate::ids::{BlockId, PageId};
use crate::validator::validate_page;

pub const DEFAULT_BACKGROUND: &str = "#ffffff";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageStatus {
    #[default]
    Draft,
    Published,
}

/// An editable document: an ordered sequence of blocks plus page settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub status: PageStatus,
    #[serde(default = "default_background")]
    pub background_color: String,
    /// Render order; the only ordering mechanism
    #[serde(default)]
    pub blocks: Vec<Block>,
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

impl Page {
    /// Empty draft page with a slug derived from the title
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: PageId::random(),
            slug: slugify(&title),
            title,
            status: PageStatus::Draft,
            background_color: default_background(),
            blocks: Vec::new(),
        }
    }

    /// Draft page seeded with a single heading carrying the title
    pub fn with_default_heading(title: impl Into<String>) -> Self {
        let mut page = Self::new(title);
        let heading = BlockContent::Heading(HeadingContent {
            text: page.title.clone(),
            level: 1,
            ..HeadingContent::default()
        });
        let id = page.fresh_block_id();
        page.blocks.push(Block::new(id, heading));
        page
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    pub fn block_mut(&mut self, id: &BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| &b.id == id)
    }

    pub fn index_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| &b.id == id)
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.index_of(id).is_some()
    }

    /// Block id not used by any block on this page
    pub fn fresh_block_id(&self) -> BlockId {
        BlockId::fresh(|candidate| self.contains(candidate))
    }

    /// Append a block of `block_type` with default content; returns its id
    pub fn push_default(&mut self, block_type: BlockType) -> BlockId {
        let id = self.fresh_block_id();
        self.blocks
            .push(Block::new(id.clone(), create_default_content(block_type)));
        id
    }

    pub fn is_published(&self) -> bool {
        self.status == PageStatus::Published
    }

    pub fn to_json(&self) -> DesignerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Block-level failures keep their own error variants
    pub fn from_json(json: &str) -> DesignerResult<Self> {
        let raw: RawPage = serde_json::from_str(json)?;
        raw.into_page()
    }
}

/// Page wire shape with blocks left untyped until conversion
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPage {
    id: PageId,
    title: String,
    slug: String,
    #[serde(default)]
    status: PageStatus,
    #[serde(default = "default_background")]
    background_color: String,
    #[serde(default)]
    blocks: Vec<RawBlock>,
}

impl RawPage {
    fn into_page(self) -> DesignerResult<Page> {
        let blocks = self
            .blocks
            .into_iter()
            .enumerate()
            .map(|(index, mut raw)| {
                let id = raw.id.take().ok_or_else(|| {
                    DesignerError::DeserializationError(format!(
                        "block {} is missing field `id`",
                        index
                    ))
                })?;
                Ok(Block::new(id, raw.into_content()?))
            })
            .collect::<DesignerResult<Vec<_>>>()?;
        Ok(Page {
            id: self.id,
            title: self.title,
            slug: self.slug,
            status: self.status,
            background_color: self.background_color,
            blocks,
        })
    }
}

/// Deserialize a page and run structural validation on it
pub fn parse_page(json: &str) -> DesignerResult<Page> {
    let page = Page::from_json(json)?;
    validate_page(&page)?;
    Ok(page)
}

/// URL-safe slug for a title: lowercase ascii alphanumerics separated by single dashes
pub fn slugify(title: &str) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9]+").unwrap());
    let lower = title.to_lowercase();
    let slug = re.replace_all(&lower, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug.to_string()
    }
}

pub fn validate_slug(slug: &str) -> DesignerResult<()> {
    static SLUG_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = SLUG_REGEX.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap());
    if re.is_match(slug) {
        Ok(())
    } else {
        Err(DesignerError::InvalidSlug {
            slug: slug.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_keeps_block_errors_typed() {
        let json = r#"{"id":"p","title":"T","slug":"t","blocks":[{"id":"b1","type":"carousel"}]}"#;
        assert!(matches!(
            Page::from_json(json),
            Err(DesignerError::InvalidBlockType { .. })
        ));

        let json = r#"{"id":"p","title":"T","slug":"t","blocks":[{"type":"heading"}]}"#;
        match Page::from_json(json) {
            Err(DesignerError::DeserializationError(msg)) => assert!(msg.contains("id")),
            other => panic!("Expected deserialization error, got {:?}", other),
        }

        assert!(matches!(
            Page::from_json("{not json"),
            Err(DesignerError::DeserializationError(_))
        ));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Intro to Rust!"), "intro-to-rust");
        assert_eq!(slugify("  Lab 3: Ownership  "), "lab-3-ownership");
        assert_eq!(slugify("???"), "untitled");
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("intro-to-rust").is_ok());
        assert!(validate_slug("Intro").is_err());
        assert!(validate_slug("double--dash").is_err());
        assert!(validate_slug("-leading").is_err());
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn test_default_heading_page() {
        let page = Page::with_default_heading("New Page");
        assert_eq!(page.blocks.len(), 1);
        assert_eq!(page.blocks[0].block_type(), BlockType::Heading);
        assert_eq!(page.slug, "new-page");
        assert_eq!(page.status, PageStatus::Draft);
    }

    #[test]
    fn test_json_field_names() {
        let page = Page::new("Shape");
        let value: serde_json::Value = serde_json::from_str(&page.to_json().unwrap()).unwrap();
        assert!(value.get("backgroundColor").is_some());
        assert_eq!(value["status"], "Draft");
    }
}
