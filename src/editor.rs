//! Editor session: the single owner of an open page.
//!
//! Every mutation goes through [`EditorSession`]. Operations work on a copy of
//! the affected content and only write it back once it validates, so a failed
//! call leaves the page exactly as it was.

use serde_json::{Map, Value};

use crate::asset::{AssetFile, AssetUploader};
use crate::block::{create_default_content, Block, BlockContent, BlockType, TextField};
use crate::config::DesignerConfig;
use crate::content::{Flashcard, Hotspot, McqOption, ProcessStep, TextAlign};
use crate::error::{DesignerError, DesignerResult};
use crate::ids::{item_id, BlockId};
use crate::page::{validate_slug, Page, PageStatus};
use crate::render::RenderMode;
use crate::resize::{Dimensions, Point, ResizeController, ResizeHandle, ResizeState};
use crate::richtext::sanitize_markup;
use crate::store::PageStore;
use crate::surface::SurfaceChange;
use crate::template::{Template, TemplateCatalog};
use crate::validator::{validate_color, validate_content, validate_page};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

fn wrong_type(content: &BlockContent, field: &str) -> DesignerError {
    DesignerError::UnknownField {
        block_type: content.block_type().to_string(),
        field: field.to_string(),
    }
}

fn item_not_found(block_id: &BlockId, kind: &str, id: &str) -> DesignerError {
    DesignerError::ItemNotFound {
        block_id: block_id.to_string(),
        kind: kind.to_string(),
        id: id.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct EditorSession {
    page: Page,
    selected: Option<BlockId>,
    resize: ResizeController,
    mode: RenderMode,
    config: DesignerConfig,
}

impl EditorSession {
    pub fn new(page: Page) -> Self {
        Self::with_config(page, DesignerConfig::default())
    }

    pub fn with_config(page: Page, config: DesignerConfig) -> Self {
        Self {
            page,
            selected: None,
            resize: ResizeController::new(config.min_dimension),
            mode: RenderMode::Edit,
            config,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn into_page(self) -> Page {
        self.page
    }

    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Switching to preview drops the selection and any drag in progress
    pub fn set_mode(&mut self, mode: RenderMode) {
        if mode == RenderMode::Preview {
            self.cancel_resize();
            self.selected = None;
        }
        self.mode = mode;
    }

    pub fn resize_state(&self) -> &ResizeState {
        self.resize.state()
    }

    fn ensure_editable(&self) -> DesignerResult<()> {
        match self.mode {
            RenderMode::Edit => Ok(()),
            RenderMode::Preview => Err(DesignerError::PreviewMode),
        }
    }

    fn block_not_found(id: &BlockId) -> DesignerError {
        tracing::warn!(block = %id, "operation on missing block");
        DesignerError::BlockNotFound { id: id.to_string() }
    }

    // --- Selection ---

    pub fn selected_id(&self) -> Option<&BlockId> {
        self.selected.as_ref()
    }

    pub fn selected_block(&self) -> Option<&Block> {
        self.selected.as_ref().and_then(|id| self.page.block(id))
    }

    pub fn select(&mut self, id: &BlockId) -> DesignerResult<()> {
        if !self.page.contains(id) {
            return Err(Self::block_not_found(id));
        }
        self.selected = Some(id.clone());
        Ok(())
    }

    /// Click on empty canvas: back to page settings
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    // --- Block mutations ---

    /// Append a block with default content merged with `overrides` and select it
    pub fn add_block(
        &mut self,
        block_type: BlockType,
        overrides: Option<&Map<String, Value>>,
    ) -> DesignerResult<BlockId> {
        self.ensure_editable()?;
        let defaults = create_default_content(block_type);
        let content = match overrides {
            Some(partial) => defaults.merged(partial)?,
            None => defaults,
        };
        validate_content(&content)?;
        let id = self.page.fresh_block_id();
        self.page.blocks.push(Block::new(id.clone(), content));
        self.selected = Some(id.clone());
        tracing::debug!(block = %id, block_type = %block_type, "added block");
        Ok(id)
    }

    /// Same as [`add_block`](Self::add_block) with the type given by name
    pub fn add_block_named(
        &mut self,
        block_type: &str,
        overrides: Option<&Map<String, Value>>,
    ) -> DesignerResult<BlockId> {
        let block_type: BlockType = block_type.parse()?;
        self.add_block(block_type, overrides)
    }

    /// Shallow-merge `partial` into the block's content
    pub fn update_block_content(
        &mut self,
        id: &BlockId,
        partial: &Map<String, Value>,
    ) -> DesignerResult<()> {
        self.with_content(id, |content| {
            *content = content.merged(partial)?;
            Ok(())
        })
    }

    /// Swap the block at `index` with its neighbour. Returns false at the
    /// sequence boundaries and for out-of-range indices.
    pub fn move_block(&mut self, index: usize, direction: MoveDirection) -> bool {
        if self.ensure_editable().is_err() || index >= self.page.blocks.len() {
            return false;
        }
        let target = match direction {
            MoveDirection::Up if index > 0 => index - 1,
            MoveDirection::Down if index + 1 < self.page.blocks.len() => index + 1,
            _ => return false,
        };
        self.page.blocks.swap(index, target);
        tracing::debug!(from = index, to = target, "moved block");
        true
    }

    pub fn delete_block(&mut self, id: &BlockId) -> DesignerResult<Block> {
        self.ensure_editable()?;
        let idx = self
            .page
            .index_of(id)
            .ok_or_else(|| Self::block_not_found(id))?;
        if self.resize.session().map(|s| &s.block_id) == Some(id) {
            self.resize.cancel();
        }
        let removed = self.page.blocks.remove(idx);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        tracing::debug!(block = %id, "deleted block");
        Ok(removed)
    }

    // --- Page settings ---

    pub fn set_page_background(&mut self, color: &str) -> DesignerResult<()> {
        self.ensure_editable()?;
        validate_color(color, "backgroundColor")?;
        self.page.background_color = color.to_string();
        Ok(())
    }

    pub fn set_title(&mut self, title: &str) -> DesignerResult<()> {
        self.ensure_editable()?;
        if title.trim().is_empty() {
            return Err(DesignerError::ValidationError(
                "page title must not be empty".to_string(),
            ));
        }
        self.page.title = title.to_string();
        Ok(())
    }

    pub fn set_slug(&mut self, slug: &str) -> DesignerResult<()> {
        self.ensure_editable()?;
        validate_slug(slug)?;
        self.page.slug = slug.to_string();
        Ok(())
    }

    pub fn set_status(&mut self, status: PageStatus) -> DesignerResult<()> {
        self.ensure_editable()?;
        self.page.status = status;
        Ok(())
    }

    // --- Templates ---

    /// Append the template's blocks; returns the new ids in order
    pub fn apply_template(&mut self, template: &Template) -> DesignerResult<Vec<BlockId>> {
        self.ensure_editable()?;
        let before = self.page.blocks.len();
        self.page = template.instantiate(&self.page);
        let added: Vec<BlockId> = self.page.blocks[before..]
            .iter()
            .map(|b| b.id.clone())
            .collect();
        tracing::debug!(template = %template.id, added = added.len(), "applied template");
        Ok(added)
    }

    pub fn apply_template_by_id(
        &mut self,
        catalog: &TemplateCatalog,
        template_id: &str,
    ) -> DesignerResult<Vec<BlockId>> {
        let template = catalog.get(template_id).inspect_err(|_| {
            tracing::warn!(template = template_id, "template not found");
        })?;
        self.apply_template(template)
    }

    // --- Persistence ---

    /// Validate and upsert the page into `store`
    pub fn save(&self, store: &mut dyn PageStore) -> DesignerResult<()> {
        validate_page(&self.page)?;
        store.upsert(self.page.clone())?;
        tracing::debug!(page = %self.page.id, slug = %self.page.slug, "saved page");
        Ok(())
    }

    // --- Rich text bridge ---

    /// Write the markup produced by a rich-text surface into `field`
    pub fn commit_text(
        &mut self,
        id: &BlockId,
        field: &TextField,
        markup: &str,
    ) -> DesignerResult<()> {
        let clean = sanitize_markup(markup);
        let block_id = id.clone();
        self.with_content(id, |content| {
            if content.text_field(field).is_none() {
                return Err(match field {
                    TextField::Option(item) if content.block_type() == BlockType::Mcq => {
                        item_not_found(&block_id, "option", item)
                    }
                    TextField::StepTitle(item) | TextField::StepDescription(item)
                        if content.block_type() == BlockType::Process =>
                    {
                        item_not_found(&block_id, "step", item)
                    }
                    _ => wrong_type(content, &field.key()),
                });
            }
            if let Some(slot) = content.text_field_mut(field) {
                *slot = clean;
            }
            Ok(())
        })
    }

    pub fn set_align(&mut self, id: &BlockId, align: TextAlign) -> DesignerResult<()> {
        self.with_content(id, |content| match content.align_mut() {
            Some(slot) => {
                *slot = align;
                Ok(())
            }
            None => Err(wrong_type(content, "align")),
        })
    }

    pub fn apply_surface_change(
        &mut self,
        id: &BlockId,
        field: &TextField,
        change: SurfaceChange,
    ) -> DesignerResult<()> {
        match change {
            SurfaceChange::Markup(markup) => self.commit_text(id, field, &markup),
            SurfaceChange::Align(align) => self.set_align(id, align),
        }
    }

    // --- Resize bridge ---

    /// Pointer-down on a resize handle. Only the selected block can be
    /// resized; returns `Ok(false)` when the gesture is ignored.
    pub fn begin_resize(
        &mut self,
        id: &BlockId,
        handle: ResizeHandle,
        pointer: Point,
    ) -> DesignerResult<bool> {
        self.ensure_editable()?;
        let block = self.page.block(id).ok_or_else(|| Self::block_not_found(id))?;
        if self.selected.as_ref() != Some(id) {
            return Ok(false);
        }
        self.resize.begin(block, handle, pointer)
    }

    /// Pointer moved while dragging; the new size is written immediately
    pub fn drag_resize(&mut self, pointer: Point) -> Option<Dimensions> {
        let dims = self.resize.update(pointer)?;
        let block_id = self.resize.session()?.block_id.clone();
        match self.page.block_mut(&block_id) {
            Some(block) => {
                block.content.set_size(dims);
                Some(dims)
            }
            None => {
                self.resize.cancel();
                None
            }
        }
    }

    /// Pointer released anywhere in the document
    pub fn end_resize(&mut self) -> Option<Dimensions> {
        let session = self.resize.end()?;
        Some(session.current)
    }

    /// Abort the drag and restore the size the block had when it started
    pub fn cancel_resize(&mut self) -> Option<Dimensions> {
        let session = self.resize.cancel()?;
        if let Some(block) = self.page.block_mut(&session.block_id) {
            block.content.set_size(session.start_size);
        }
        Some(session.start_size)
    }

    // --- Assets ---

    /// Upload `file` and point the block's image URL at it. On failure the
    /// block is left untouched and `AssetUploadFailure` is returned.
    pub fn upload_asset(
        &mut self,
        id: &BlockId,
        file: &AssetFile,
        uploader: &mut dyn AssetUploader,
    ) -> DesignerResult<String> {
        self.ensure_editable()?;
        let block = self.page.block(id).ok_or_else(|| Self::block_not_found(id))?;
        if !matches!(
            block.content,
            BlockContent::Image(_) | BlockContent::Banner(_) | BlockContent::Hotspot(_)
        ) {
            return Err(wrong_type(&block.content, "url"));
        }
        let url = uploader.upload(file).map_err(|e| {
            tracing::warn!(block = %id, file = %file.name, error = %e, "asset upload failed");
            DesignerError::AssetUploadFailure {
                reason: e.to_string(),
            }
        })?;
        let stored = url.clone();
        self.with_content(id, move |content| {
            match content {
                BlockContent::Image(c) => c.url = stored,
                BlockContent::Banner(c) => c.url = stored,
                BlockContent::Hotspot(c) => c.url = stored,
                other => return Err(wrong_type(other, "url")),
            }
            Ok(())
        })?;
        Ok(url)
    }

    // --- Multiple choice ---

    pub fn add_option(&mut self, id: &BlockId, text: &str) -> DesignerResult<String> {
        let option_id = item_id("opt");
        let new_id = option_id.clone();
        let text = sanitize_markup(text);
        self.with_content(id, move |content| match content {
            BlockContent::Mcq(mcq) => {
                mcq.options.push(McqOption { id: new_id, text });
                if mcq.correct_option_id.is_none() {
                    mcq.correct_option_id = mcq.options.first().map(|o| o.id.clone());
                }
                Ok(())
            }
            other => Err(wrong_type(other, "options")),
        })?;
        Ok(option_id)
    }

    /// Remove an option; the last remaining option cannot be removed
    pub fn remove_option(&mut self, id: &BlockId, option_id: &str) -> DesignerResult<()> {
        let block_id = id.clone();
        self.with_content(id, |content| match content {
            BlockContent::Mcq(mcq) => {
                if mcq.option(option_id).is_none() {
                    return Err(item_not_found(&block_id, "option", option_id));
                }
                if mcq.options.len() <= 1 {
                    return Err(DesignerError::LastItem {
                        block_id: block_id.to_string(),
                        kind: "option".to_string(),
                    });
                }
                mcq.remove_option(option_id);
                Ok(())
            }
            other => Err(wrong_type(other, "options")),
        })
    }

    /// Mark `option_id` as the single correct answer
    pub fn mark_correct(&mut self, id: &BlockId, option_id: &str) -> DesignerResult<()> {
        let block_id = id.clone();
        self.with_content(id, |content| match content {
            BlockContent::Mcq(mcq) => {
                if mcq.mark_correct(option_id) {
                    Ok(())
                } else {
                    Err(item_not_found(&block_id, "option", option_id))
                }
            }
            other => Err(wrong_type(other, "correctOptionId")),
        })
    }

    // --- Process ---

    pub fn add_step(&mut self, id: &BlockId) -> DesignerResult<String> {
        let step_id = item_id("step");
        let new_id = step_id.clone();
        self.with_content(id, move |content| match content {
            BlockContent::Process(p) => {
                let n = p.steps.len() + 1;
                p.steps.push(ProcessStep {
                    id: new_id,
                    title: format!("Step {}", n),
                    description: String::new(),
                });
                Ok(())
            }
            other => Err(wrong_type(other, "steps")),
        })?;
        Ok(step_id)
    }

    pub fn remove_step(&mut self, id: &BlockId, step_id: &str) -> DesignerResult<()> {
        let block_id = id.clone();
        self.with_content(id, |content| match content {
            BlockContent::Process(p) => {
                let idx = p
                    .steps
                    .iter()
                    .position(|s| s.id == step_id)
                    .ok_or_else(|| item_not_found(&block_id, "step", step_id))?;
                p.steps.remove(idx);
                Ok(())
            }
            other => Err(wrong_type(other, "steps")),
        })
    }

    // --- List ---

    pub fn add_list_item(&mut self, id: &BlockId, text: &str) -> DesignerResult<usize> {
        let text = text.to_string();
        self.with_content(id, move |content| match content {
            BlockContent::List(list) => {
                list.items.push(text);
                Ok(list.items.len() - 1)
            }
            other => Err(wrong_type(other, "items")),
        })
    }

    pub fn remove_list_item(&mut self, id: &BlockId, index: usize) -> DesignerResult<String> {
        let block_id = id.clone();
        self.with_content(id, |content| match content {
            BlockContent::List(list) => {
                if index >= list.items.len() {
                    return Err(item_not_found(&block_id, "item", &index.to_string()));
                }
                Ok(list.items.remove(index))
            }
            other => Err(wrong_type(other, "items")),
        })
    }

    // --- Flashcards ---

    pub fn add_card(&mut self, id: &BlockId, front: &str, back: &str) -> DesignerResult<String> {
        let card_id = item_id("card");
        let card = Flashcard {
            id: card_id.clone(),
            front: front.to_string(),
            back: back.to_string(),
            image: String::new(),
        };
        self.with_content(id, move |content| match content {
            BlockContent::Flashcard(deck) => {
                deck.cards.push(card);
                Ok(())
            }
            other => Err(wrong_type(other, "cards")),
        })?;
        Ok(card_id)
    }

    pub fn remove_card(&mut self, id: &BlockId, card_id: &str) -> DesignerResult<()> {
        let block_id = id.clone();
        self.with_content(id, |content| match content {
            BlockContent::Flashcard(deck) => {
                let idx = deck
                    .cards
                    .iter()
                    .position(|c| c.id == card_id)
                    .ok_or_else(|| item_not_found(&block_id, "card", card_id))?;
                deck.cards.remove(idx);
                Ok(())
            }
            other => Err(wrong_type(other, "cards")),
        })
    }

    // --- Hotspots ---

    /// Place a hotspot at a position given in percent of the image; clamped to 0..=100
    pub fn place_hotspot(
        &mut self,
        id: &BlockId,
        x: f64,
        y: f64,
        text: &str,
    ) -> DesignerResult<String> {
        let spot_id = item_id("spot");
        let spot = Hotspot {
            id: spot_id.clone(),
            x: clamp_percent(x),
            y: clamp_percent(y),
            content: text.to_string(),
        };
        self.with_content(id, move |content| match content {
            BlockContent::Hotspot(h) => {
                h.hotspots.push(spot);
                Ok(())
            }
            other => Err(wrong_type(other, "hotspots")),
        })?;
        Ok(spot_id)
    }

    pub fn remove_hotspot(&mut self, id: &BlockId, spot_id: &str) -> DesignerResult<()> {
        let block_id = id.clone();
        self.with_content(id, |content| match content {
            BlockContent::Hotspot(h) => {
                let idx = h
                    .hotspots
                    .iter()
                    .position(|s| s.id == spot_id)
                    .ok_or_else(|| item_not_found(&block_id, "hotspot", spot_id))?;
                h.hotspots.remove(idx);
                Ok(())
            }
            other => Err(wrong_type(other, "hotspots")),
        })
    }

    /// Run `f` on a copy of the block's content and store the result only if
    /// `f` succeeds and the content still validates.
    fn with_content<T>(
        &mut self,
        id: &BlockId,
        f: impl FnOnce(&mut BlockContent) -> DesignerResult<T>,
    ) -> DesignerResult<T> {
        self.ensure_editable()?;
        let block = self
            .page
            .block_mut(id)
            .ok_or_else(|| Self::block_not_found(id))?;
        let mut draft = block.content.clone();
        let out = f(&mut draft).inspect_err(|e| {
            tracing::warn!(block = %id, error = %e, "rejected block update");
        })?;
        validate_content(&draft)?;
        block.content = draft;
        tracing::debug!(block = %id, "updated block content");
        Ok(out)
    }
}

fn clamp_percent(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{BlobUploader, UploadError};
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap_or_default()
    }

    struct RejectingUploader;

    impl AssetUploader for RejectingUploader {
        fn upload(&mut self, _file: &AssetFile) -> Result<String, UploadError> {
            Err(UploadError("storage offline".to_string()))
        }
    }

    #[test]
    fn test_add_block_selects_it() {
        let mut s = EditorSession::new(Page::new("T"));
        let id = s.add_block(BlockType::Heading, Some(&obj(json!({ "text": "Hello" })))).unwrap();
        assert_eq!(s.selected_id(), Some(&id));
        match &s.page().blocks[0].content {
            BlockContent::Heading(h) => assert_eq!(h.text, "Hello"),
            other => panic!("Expected heading, got {:?}", other),
        }
    }

    #[test]
    fn test_add_block_bad_override_leaves_page_empty() {
        let mut s = EditorSession::new(Page::new("T"));
        assert!(s
            .add_block(BlockType::Heading, Some(&obj(json!({ "url": "x" }))))
            .is_err());
        assert!(s.page().blocks.is_empty());
        assert_eq!(s.selected_id(), None);
    }

    #[test]
    fn test_add_block_named_rejects_unknown_type() {
        let mut s = EditorSession::new(Page::new("T"));
        assert!(matches!(
            s.add_block_named("carousel", None),
            Err(DesignerError::InvalidBlockType { .. })
        ));
    }

    #[test]
    fn test_update_missing_block_reports_not_found() {
        let mut s = EditorSession::new(Page::new("T"));
        let err = s
            .update_block_content(&BlockId::from("ghost"), &obj(json!({ "text": "x" })))
            .unwrap_err();
        assert!(matches!(err, DesignerError::BlockNotFound { .. }));
    }

    #[test]
    fn test_invalid_update_is_not_partially_applied() {
        let mut s = EditorSession::new(Page::new("T"));
        let id = s.add_block(BlockType::Heading, None).unwrap();
        let before = s.page().clone();
        let result = s.update_block_content(&id, &obj(json!({ "text": "New", "level": 9 })));
        assert!(matches!(result, Err(DesignerError::ValueOutOfRange { .. })));
        assert_eq!(s.page(), &before);
    }

    #[test]
    fn test_remove_last_option_refused() {
        let mut s = EditorSession::new(Page::new("T"));
        let id = s.add_block(BlockType::Mcq, None).unwrap();
        s.remove_option(&id, "opt-1").unwrap();
        s.remove_option(&id, "opt-2").unwrap();
        assert!(matches!(
            s.remove_option(&id, "opt-3"),
            Err(DesignerError::LastItem { .. })
        ));
    }

    #[test]
    fn test_commit_text_sanitizes_and_checks_field() {
        let mut s = EditorSession::new(Page::new("T"));
        let id = s.add_block(BlockType::Button, None).unwrap();
        s.commit_text(&id, &TextField::ButtonLabel, "<b>Go</b><script>x</script>")
            .unwrap();
        match &s.page().blocks[0].content {
            BlockContent::Button(b) => assert_eq!(b.text, "<b>Go</b>x"),
            other => panic!("Expected button, got {:?}", other),
        }
        assert!(matches!(
            s.commit_text(&id, &TextField::Heading, "x"),
            Err(DesignerError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_commit_text_unknown_option() {
        let mut s = EditorSession::new(Page::new("T"));
        let id = s.add_block(BlockType::Mcq, None).unwrap();
        assert!(matches!(
            s.commit_text(&id, &TextField::Option("opt-9".into()), "x"),
            Err(DesignerError::ItemNotFound { .. })
        ));
    }

    #[test]
    fn test_upload_failure_leaves_block_unchanged() {
        let mut s = EditorSession::new(Page::new("T"));
        let id = s.add_block(BlockType::Image, None).unwrap();
        let before = s.page().clone();
        let file = AssetFile::new("a.png", "image/png", vec![1]);
        let err = s.upload_asset(&id, &file, &mut RejectingUploader).unwrap_err();
        assert!(matches!(err, DesignerError::AssetUploadFailure { .. }));
        assert_eq!(s.page(), &before);
    }

    #[test]
    fn test_upload_success_sets_url() {
        let mut s = EditorSession::new(Page::new("T"));
        let id = s.add_block(BlockType::Banner, None).unwrap();
        let mut uploader = BlobUploader::new();
        let url = s
            .upload_asset(&id, &AssetFile::new("b.jpg", "image/jpeg", vec![1, 2]), &mut uploader)
            .unwrap();
        match &s.page().blocks[0].content {
            BlockContent::Banner(b) => assert_eq!(b.url, url),
            other => panic!("Expected banner, got {:?}", other),
        }
    }

    #[test]
    fn test_upload_to_heading_rejected_before_upload() {
        let mut s = EditorSession::new(Page::new("T"));
        let id = s.add_block(BlockType::Heading, None).unwrap();
        let mut uploader = BlobUploader::new();
        let file = AssetFile::new("a.png", "image/png", vec![1]);
        assert!(s.upload_asset(&id, &file, &mut uploader).is_err());
        assert!(uploader.is_empty());
    }

    #[test]
    fn test_resize_requires_selection() {
        let mut s = EditorSession::new(Page::new("T"));
        let img = s.add_block(BlockType::Image, None).unwrap();
        s.add_block(BlockType::Text, None).unwrap();
        assert!(!s
            .begin_resize(&img, ResizeHandle::SouthEast, Point::new(0.0, 0.0))
            .unwrap());
        s.select(&img).unwrap();
        assert!(s
            .begin_resize(&img, ResizeHandle::SouthEast, Point::new(0.0, 0.0))
            .unwrap());
    }

    #[test]
    fn test_cancel_resize_restores_size() {
        let mut s = EditorSession::new(Page::new("T"));
        let img = s.add_block(BlockType::Image, None).unwrap();
        s.begin_resize(&img, ResizeHandle::SouthEast, Point::new(0.0, 0.0))
            .unwrap();
        s.drag_resize(Point::new(100.0, 100.0));
        assert_eq!(
            s.cancel_resize(),
            Some(Dimensions { width: Some(600), height: 400 })
        );
        match &s.page().blocks[0].content {
            BlockContent::Image(i) => assert_eq!((i.width, i.height), (600, 400)),
            other => panic!("Expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_preview_mode_blocks_edits() {
        let mut s = EditorSession::new(Page::new("T"));
        let id = s.add_block(BlockType::Text, None).unwrap();
        s.set_mode(RenderMode::Preview);
        assert_eq!(s.selected_id(), None);
        assert!(matches!(
            s.add_block(BlockType::Text, None),
            Err(DesignerError::PreviewMode)
        ));
        assert!(matches!(s.delete_block(&id), Err(DesignerError::PreviewMode)));
        assert!(!s.move_block(0, MoveDirection::Down));
        assert!(matches!(
            s.set_status(PageStatus::Published),
            Err(DesignerError::PreviewMode)
        ));
        assert_eq!(s.page().status, PageStatus::Draft);
    }

    #[test]
    fn test_clearing_correct_answer_rejected() {
        let mut s = EditorSession::new(Page::new("T"));
        let id = s.add_block(BlockType::Mcq, None).unwrap();
        let result = s.update_block_content(&id, &obj(json!({ "correctOptionId": null })));
        assert!(matches!(result, Err(DesignerError::InvalidContent { .. })));
        match &s.page().blocks[0].content {
            BlockContent::Mcq(mcq) => assert_eq!(mcq.correct_option_id.as_deref(), Some("opt-1")),
            other => panic!("Expected mcq, got {:?}", other),
        }
    }

    #[test]
    fn test_control_char_script_url_rejected() {
        let mut s = EditorSession::new(Page::new("T"));
        let id = s.add_block(BlockType::Button, None).unwrap();
        let before = s.page().blocks[0].clone();
        for url in ["\u{1}javascript:alert(1)", "java\nscript:alert(1)", "java\tscript:alert(1)"] {
            assert!(s.update_block_content(&id, &obj(json!({ "url": url }))).is_err());
        }
        assert_eq!(s.page().blocks[0], before);
    }

    #[test]
    fn test_hotspot_placement_is_clamped() {
        let mut s = EditorSession::new(Page::new("T"));
        let id = s.add_block(BlockType::Hotspot, None).unwrap();
        s.place_hotspot(&id, 140.0, -3.0, "Valve").unwrap();
        match &s.page().blocks[0].content {
            BlockContent::Hotspot(h) => {
                assert_eq!((h.hotspots[0].x, h.hotspots[0].y), (100.0, 0.0));
            }
            other => panic!("Expected hotspot, got {:?}", other),
        }
    }

    #[test]
    fn test_list_and_step_helpers() {
        let mut s = EditorSession::new(Page::new("T"));
        let list = s.add_block(BlockType::List, None).unwrap();
        assert_eq!(s.add_list_item(&list, "Fourth").unwrap(), 3);
        assert_eq!(s.remove_list_item(&list, 0).unwrap(), "First item");
        assert!(s.remove_list_item(&list, 10).is_err());

        let process = s.add_block(BlockType::Process, None).unwrap();
        let step = s.add_step(&process).unwrap();
        s.remove_step(&process, &step).unwrap();
        assert!(s.add_step(&list).is_err());
    }

    #[test]
    fn test_set_background_validates() {
        let mut s = EditorSession::new(Page::new("T"));
        s.set_page_background("#1e293b").unwrap();
        assert!(s.set_page_background("chartreuse-ish").is_err());
        assert_eq!(s.page().background_color, "#1e293b");
    }
}
