//! # Pagecraft
//!
//! Block-based page designer for interactive LMS activities.
//!
//! ## Features
//! - Typed block model with per-type defaults and JSON round-tripping
//! - Built-in template catalog with category and search filtering
//! - Rich-text editing surface with bold, italic, underline and alignment
//! - Pointer-drag resize controller for images and banners
//! - HTML renderer for edit and preview modes
//! - Editor session with a validated mutation API and a properties panel
//!
//! ## Example
//! ```ignore
//! use pagecraft::{BlockType, EditorSession, Page, RenderMode, TemplateCatalog};
//!
//! let mut session = EditorSession::new(Page::new("Intro to Rust"));
//! session.add_block(BlockType::Heading, None)?;
//! session.apply_template_by_id(TemplateCatalog::builtin(), "quiz-check")?;
//!
//! let html = pagecraft::render_page(session.page(), RenderMode::Preview, None);
//! ```

pub mod asset;
pub mod block;
pub mod config;
pub mod content;
pub mod editor;
pub mod error;
pub mod ids;
pub mod page;
pub mod panel;
pub mod publish;
pub mod render;
pub mod resize;
pub mod richtext;
pub mod store;
pub mod surface;
pub mod template;
pub mod validator;

// --- Core types ---
pub use block::{create_default_content, Block, BlockContent, BlockType, TextField};
pub use config::DesignerConfig;
pub use editor::{EditorSession, MoveDirection};
pub use error::{DesignerError, DesignerResult};
pub use ids::{BlockId, PageId};
pub use page::{Page, PageStatus};

// --- Designer components ---
pub use asset::{AssetFile, AssetUploader, BlobUploader, UploadError};
pub use panel::{apply_field, properties_panel, FieldControl, PanelField, PanelForm};
pub use render::{render_block, render_document, render_page, BrowserFrame, DocumentOptions, RenderContext, RenderMode};
pub use resize::{Dimensions, Point, ResizeController, ResizeHandle, ResizeState};
pub use richtext::{Mark, RichText};
pub use store::{MemoryPageStore, PageStore};
pub use surface::{RichTextSurface, SurfaceChange, ToolbarCommand};
pub use template::{CategoryFilter, Template, TemplateCatalog, TemplateCategory, TemplateFilter};

/// Parse a page from JSON and validate it
pub fn parse_page(json: &str) -> DesignerResult<Page> {
    page::parse_page(json)
}

/// Parse a template catalog from YAML
pub fn parse_catalog(yaml: &str) -> DesignerResult<TemplateCatalog> {
    TemplateCatalog::from_yaml(yaml)
}
