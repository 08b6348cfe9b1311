use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::block::{Block, BlockContent};
use crate::error::{DesignerError, DesignerResult};
use crate::page::{validate_slug, Page};

const MAX_BLOCKS: usize = 500;

/// Validate a whole page: slug, background, unique block ids, per-block content
pub fn validate_page(page: &Page) -> DesignerResult<()> {
    validate_slug(&page.slug)?;
    validate_color(&page.background_color, "backgroundColor")?;

    if page.blocks.len() > MAX_BLOCKS {
        return Err(DesignerError::ValueOutOfRange {
            property: "blocks".to_string(),
            value: page.blocks.len().to_string(),
            range: format!("0 to {}", MAX_BLOCKS),
        });
    }

    validate_block_id_uniqueness(&page.blocks)?;
    for block in &page.blocks {
        validate_block(block)?;
    }
    Ok(())
}

pub fn validate_block_id_uniqueness(blocks: &[Block]) -> DesignerResult<()> {
    let mut seen = HashSet::new();
    for block in blocks {
        if !seen.insert(block.id.as_str()) {
            return Err(DesignerError::DuplicateBlockId {
                id: block.id.to_string(),
            });
        }
    }
    Ok(())
}

/// Validate value ranges and cross-field references inside one block
pub fn validate_block(block: &Block) -> DesignerResult<()> {
    validate_content(&block.content)
}

pub fn validate_content(content: &BlockContent) -> DesignerResult<()> {
    match content {
        BlockContent::Heading(h) => {
            validate_range(h.level as f64, 1.0, 6.0, "heading.level")?;
        }
        BlockContent::Text(_) | BlockContent::Video(_) | BlockContent::Code(_) => {}
        BlockContent::Image(img) => {
            validate_url(&img.url, "image.url")?;
        }
        BlockContent::Button(b) => {
            validate_url(&b.url, "button.url")?;
        }
        BlockContent::Icon(icon) => {
            validate_color(&icon.color, "icon.color")?;
            validate_range(icon.size as f64, 8.0, 512.0, "icon.size")?;
            if icon.icon_name.trim().is_empty() {
                return Err(DesignerError::InvalidContent {
                    block_type: "icon".to_string(),
                    reason: "iconName must not be empty".to_string(),
                });
            }
        }
        BlockContent::Mcq(mcq) => {
            validate_item_ids(mcq.options.iter().map(|o| o.id.as_str()), "mcq", "option")?;
            match mcq.correct_option_id {
                Some(ref correct) if mcq.option(correct).is_none() => {
                    return Err(DesignerError::InvalidContent {
                        block_type: "mcq".to_string(),
                        reason: format!("correctOptionId '{}' does not match any option", correct),
                    });
                }
                None if !mcq.options.is_empty() => {
                    return Err(DesignerError::InvalidContent {
                        block_type: "mcq".to_string(),
                        reason: "one option must be marked correct".to_string(),
                    });
                }
                _ => {}
            }
        }
        BlockContent::Process(p) => {
            validate_item_ids(p.steps.iter().map(|s| s.id.as_str()), "process", "step")?;
        }
        BlockContent::Flashcard(f) => {
            validate_item_ids(f.cards.iter().map(|c| c.id.as_str()), "flashcard", "card")?;
        }
        BlockContent::Hotspot(h) => {
            validate_url(&h.url, "hotspot.url")?;
            validate_item_ids(h.hotspots.iter().map(|s| s.id.as_str()), "hotspot", "hotspot")?;
            for spot in &h.hotspots {
                validate_range(spot.x, 0.0, 100.0, "hotspot.x")?;
                validate_range(spot.y, 0.0, 100.0, "hotspot.y")?;
            }
        }
        BlockContent::List(_) => {}
        BlockContent::Embed(e) => {
            validate_url(&e.url, "embed.url")?;
        }
        BlockContent::Banner(b) => {
            validate_url(&b.url, "banner.url")?;
            validate_range(b.overlay_opacity, 0.0, 1.0, "banner.overlayOpacity")?;
        }
    }
    Ok(())
}

fn validate_item_ids<'a>(
    ids: impl Iterator<Item = &'a str>,
    block_type: &str,
    kind: &str,
) -> DesignerResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.is_empty() || !seen.insert(id) {
            return Err(DesignerError::InvalidContent {
                block_type: block_type.to_string(),
                reason: format!("{} ids must be non-empty and unique, found '{}'", kind, id),
            });
        }
    }
    Ok(())
}

/// Hex (#rgb / #rrggbb) or a small set of named colors
pub fn validate_color(color: &str, _property: &str) -> DesignerResult<()> {
    static HEX_COLOR_REGEX: OnceLock<Regex> = OnceLock::new();
    let hex_regex = HEX_COLOR_REGEX
        .get_or_init(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap());

    const NAMED_COLORS: &[&str] = &[
        "red", "blue", "green", "white", "black", "transparent", "yellow", "orange", "purple",
        "pink", "gray", "grey",
    ];

    if hex_regex.is_match(color) || NAMED_COLORS.contains(&color) {
        Ok(())
    } else {
        Err(DesignerError::InvalidColor {
            value: color.to_string(),
            reason: format!(
                "must be a valid hex color (e.g., #ff0000) or named color ({})",
                NAMED_COLORS.join(", ")
            ),
        })
    }
}

/// Empty, relative, http(s), blob: and data:image URLs are allowed
pub fn validate_url(url: &str, property: &str) -> DesignerResult<()> {
    if is_safe_url(url) {
        Ok(())
    } else {
        Err(DesignerError::InvalidContent {
            block_type: property.split('.').next().unwrap_or(property).to_string(),
            reason: format!("'{}' is not an allowed URL for {}", url, property),
        })
    }
}

/// Browsers drop ASCII tab/CR/LF anywhere in a URL and C0 controls or spaces
/// at either end before reading the scheme
fn normalize_url(url: &str) -> String {
    url.trim()
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect::<String>()
        .trim_matches(|c: char| c <= ' ')
        .to_string()
}

pub fn is_safe_url(url: &str) -> bool {
    static SCHEME_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = SCHEME_REGEX.get_or_init(|| Regex::new(r"^([a-zA-Z][a-zA-Z0-9+.\-]*):").unwrap());
    let trimmed = normalize_url(url);
    if trimmed.chars().any(char::is_control) {
        return false;
    }
    match re.captures(&trimmed) {
        None => true,
        Some(caps) => {
            let scheme = caps[1].to_lowercase();
            match scheme.as_str() {
                "http" | "https" | "blob" | "mailto" => true,
                "data" => trimmed.to_lowercase().starts_with("data:image/"),
                _ => false,
            }
        }
    }
}

fn validate_range(value: f64, min: f64, max: f64, property: &str) -> DesignerResult<()> {
    if value < min || value > max || value.is_nan() {
        Err(DesignerError::ValueOutOfRange {
            property: property.to_string(),
            value: value.to_string(),
            range: format!("{} to {}", min, max),
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{create_default_content, BlockType};
    use crate::content::*;
    use crate::ids::BlockId;

    fn block(id: &str, content: BlockContent) -> Block {
        Block::new(BlockId::from(id), content)
    }

    #[test]
    fn test_valid_colors() {
        for color in ["#000", "#ffffff", "#4F46E5", "white", "transparent"] {
            assert!(validate_color(color, "c").is_ok(), "Failed for color: {}", color);
        }
    }

    #[test]
    fn test_invalid_colors() {
        for color in ["#12345", "#gggggg", "123456", "rgb(0,0,0)"] {
            assert!(
                matches!(validate_color(color, "c"), Err(DesignerError::InvalidColor { .. })),
                "Should fail for color: {}",
                color
            );
        }
    }

    #[test]
    fn test_duplicate_block_ids() {
        let mut page = Page::new("Dup");
        page.blocks.push(block("a", create_default_content(BlockType::Text)));
        page.blocks.push(block("a", create_default_content(BlockType::Heading)));
        assert!(matches!(
            validate_page(&page),
            Err(DesignerError::DuplicateBlockId { .. })
        ));
    }

    #[test]
    fn test_heading_level_out_of_range() {
        let content = BlockContent::Heading(HeadingContent {
            level: 7,
            ..HeadingContent::default()
        });
        assert!(matches!(
            validate_content(&content),
            Err(DesignerError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_mcq_dangling_correct_option() {
        let content = BlockContent::Mcq(McqContent {
            correct_option_id: Some("nope".to_string()),
            ..McqContent::default()
        });
        assert!(validate_content(&content).is_err());
    }

    #[test]
    fn test_mcq_requires_correct_answer_when_options_exist() {
        let content = BlockContent::Mcq(McqContent {
            correct_option_id: None,
            ..McqContent::default()
        });
        assert!(matches!(
            validate_content(&content),
            Err(DesignerError::InvalidContent { .. })
        ));

        let empty = BlockContent::Mcq(McqContent {
            options: Vec::new(),
            correct_option_id: None,
            ..McqContent::default()
        });
        assert!(validate_content(&empty).is_ok());
    }

    #[test]
    fn test_banner_opacity_range() {
        let content = BlockContent::Banner(BannerContent {
            overlay_opacity: 1.5,
            ..BannerContent::default()
        });
        assert!(validate_content(&content).is_err());
    }

    #[test]
    fn test_script_urls_rejected() {
        assert!(!is_safe_url("javascript:alert(1)"));
        assert!(!is_safe_url("  JavaScript:alert(1)"));
        assert!(!is_safe_url("data:text/html,hi"));
        assert!(!is_safe_url("java\nscript:alert(1)"));
        assert!(!is_safe_url("java\tscript:alert(1)"));
        assert!(!is_safe_url("java\r\nscript:alert(1)"));
        assert!(!is_safe_url("\u{1}javascript:alert(1)"));
        assert!(!is_safe_url(" \u{1f}javascript:alert(1)\u{0}"));
        assert!(!is_safe_url("/a\u{0}b"));
        assert!(is_safe_url("https://example.com/a.png"));
        assert!(is_safe_url("blob:session/abc"));
        assert!(is_safe_url("/assets/a.png"));
        assert!(is_safe_url(""));
    }
}
