//! Pointer-drag resize state machine.
//!
//! The controller knows nothing about input events: callers feed it
//! `begin` / `update` / `end` with plain coordinates, so mouse, touch and
//! synthetic test events all drive it the same way. While dragging, every
//! `update` yields the dimensions to write into the block for live feedback.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::block::{Block, BlockType};
use crate::error::{DesignerError, DesignerResult};
use crate::ids::BlockId;

/// Smallest width/height a drag may produce
pub const DEFAULT_MIN_DIMENSION: u32 = 50;

/// Width is `None` for height-only blocks (banners)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: Option<u32>,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeHandle {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
    /// Bottom-center, height only
    Bottom,
}

impl ResizeHandle {
    pub const CORNERS: [ResizeHandle; 4] = [
        ResizeHandle::NorthWest,
        ResizeHandle::NorthEast,
        ResizeHandle::SouthWest,
        ResizeHandle::SouthEast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeHandle::NorthWest => "nw",
            ResizeHandle::NorthEast => "ne",
            ResizeHandle::SouthWest => "sw",
            ResizeHandle::SouthEast => "se",
            ResizeHandle::Bottom => "s",
        }
    }

    fn touches_west(&self) -> bool {
        matches!(self, ResizeHandle::NorthWest | ResizeHandle::SouthWest)
    }

    fn touches_north(&self) -> bool {
        matches!(self, ResizeHandle::NorthWest | ResizeHandle::NorthEast)
    }

    /// Handles offered for a block type; empty when the type is not resizable
    pub fn for_block_type(block_type: BlockType) -> &'static [ResizeHandle] {
        match block_type {
            BlockType::Image => &Self::CORNERS,
            BlockType::Banner => &[ResizeHandle::Bottom],
            _ => &[],
        }
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State captured when a drag starts
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub block_id: BlockId,
    pub handle: ResizeHandle,
    pub start: Point,
    pub start_size: Dimensions,
    pub current: Dimensions,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResizeState {
    #[default]
    Idle,
    Dragging(ResizeSession),
    /// Pointer released; the final size is being written back
    Committing(ResizeSession),
}

#[derive(Debug, Clone)]
pub struct ResizeController {
    state: ResizeState,
    min_dimension: u32,
}

impl Default for ResizeController {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DIMENSION)
    }
}

impl ResizeController {
    pub fn new(min_dimension: u32) -> Self {
        Self {
            state: ResizeState::Idle,
            min_dimension: min_dimension.max(1),
        }
    }

    pub fn state(&self) -> &ResizeState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, ResizeState::Dragging(_))
    }

    pub fn session(&self) -> Option<&ResizeSession> {
        match &self.state {
            ResizeState::Dragging(s) | ResizeState::Committing(s) => Some(s),
            ResizeState::Idle => None,
        }
    }

    pub fn min_dimension(&self) -> u32 {
        self.min_dimension
    }

    /// Start a drag on `block`. Returns `Ok(false)` and changes nothing when a
    /// drag is already in progress.
    pub fn begin(
        &mut self,
        block: &Block,
        handle: ResizeHandle,
        pointer: Point,
    ) -> DesignerResult<bool> {
        if !matches!(self.state, ResizeState::Idle) {
            tracing::debug!(block = %block.id, "resize already in progress, ignoring pointer-down");
            return Ok(false);
        }
        let block_type = block.block_type();
        let start_size = block.content.size().ok_or_else(|| DesignerError::NotResizable {
            block_type: block_type.to_string(),
        })?;
        if !ResizeHandle::for_block_type(block_type).contains(&handle) {
            return Err(DesignerError::InvalidHandle {
                handle: handle.to_string(),
                block_type: block_type.to_string(),
            });
        }
        self.state = ResizeState::Dragging(ResizeSession {
            block_id: block.id.clone(),
            handle,
            start: pointer,
            start_size,
            current: start_size,
        });
        Ok(true)
    }

    /// Pointer moved. Returns the clamped dimensions to write into the block,
    /// or `None` when no drag is active.
    pub fn update(&mut self, pointer: Point) -> Option<Dimensions> {
        let min = self.min_dimension;
        let ResizeState::Dragging(session) = &mut self.state else {
            return None;
        };
        let dx = pointer.x - session.start.x;
        let dy = pointer.y - session.start.y;
        let handle = session.handle;

        let width = match (session.start_size.width, handle) {
            (None, _) | (_, ResizeHandle::Bottom) => session.start_size.width,
            (Some(w), h) => {
                let delta = if h.touches_west() { -dx } else { dx };
                Some(clamp_dimension(w as f64 + delta, min))
            }
        };
        let height = {
            let delta = if handle.touches_north() { -dy } else { dy };
            clamp_dimension(session.start_size.height as f64 + delta, min)
        };

        session.current = Dimensions { width, height };
        Some(session.current)
    }

    /// Pointer released anywhere. Passes through `Committing` and returns to
    /// `Idle`, yielding the finished session.
    pub fn end(&mut self) -> Option<ResizeSession> {
        let ResizeState::Dragging(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        self.state = ResizeState::Committing(session.clone());
        tracing::debug!(
            block = %session.block_id,
            height = session.current.height,
            "resize committed"
        );
        self.state = ResizeState::Idle;
        Some(session)
    }

    /// Abort the drag; returns the session so callers can restore `start_size`
    pub fn cancel(&mut self) -> Option<ResizeSession> {
        match std::mem::take(&mut self.state) {
            ResizeState::Dragging(session) | ResizeState::Committing(session) => Some(session),
            ResizeState::Idle => None,
        }
    }
}

fn clamp_dimension(value: f64, min: u32) -> u32 {
    let rounded = value.round();
    if rounded.is_nan() || rounded < min as f64 {
        min
    } else if rounded > u32::MAX as f64 {
        u32::MAX
    } else {
        rounded as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{create_default_content, BlockContent};
    use crate::content::ImageContent;

    fn image(width: u32, height: u32) -> Block {
        Block::new(
            BlockId::from("img"),
            BlockContent::Image(ImageContent {
                width,
                height,
                ..ImageContent::default()
            }),
        )
    }

    #[test]
    fn test_southeast_grows_with_pointer() {
        let mut ctl = ResizeController::default();
        assert!(ctl.begin(&image(200, 100), ResizeHandle::SouthEast, Point::new(10.0, 10.0)).unwrap());
        let dims = ctl.update(Point::new(40.0, 30.0)).unwrap();
        assert_eq!(dims, Dimensions { width: Some(230), height: 120 });
    }

    #[test]
    fn test_west_edge_shrinks_when_moving_right() {
        let mut ctl = ResizeController::default();
        ctl.begin(&image(200, 100), ResizeHandle::NorthWest, Point::new(0.0, 0.0)).unwrap();
        let dims = ctl.update(Point::new(20.0, 10.0)).unwrap();
        assert_eq!(dims, Dimensions { width: Some(180), height: 90 });
    }

    #[test]
    fn test_floor_clamps_both_axes() {
        let mut ctl = ResizeController::default();
        ctl.begin(&image(200, 100), ResizeHandle::SouthEast, Point::new(0.0, 0.0)).unwrap();
        let dims = ctl.update(Point::new(-1000.0, -1000.0)).unwrap();
        assert_eq!(dims, Dimensions { width: Some(50), height: 50 });
    }

    #[test]
    fn test_bottom_handle_only_changes_height() {
        let banner = Block::new(BlockId::from("b"), create_default_content(BlockType::Banner));
        let mut ctl = ResizeController::default();
        ctl.begin(&banner, ResizeHandle::Bottom, Point::new(0.0, 0.0)).unwrap();
        let dims = ctl.update(Point::new(500.0, 40.0)).unwrap();
        assert_eq!(dims, Dimensions { width: None, height: 340 });
    }

    #[test]
    fn test_banner_rejects_corner_handles() {
        let banner = Block::new(BlockId::from("b"), create_default_content(BlockType::Banner));
        let mut ctl = ResizeController::default();
        assert!(matches!(
            ctl.begin(&banner, ResizeHandle::SouthEast, Point::new(0.0, 0.0)),
            Err(DesignerError::InvalidHandle { .. })
        ));
        assert_eq!(ctl.state(), &ResizeState::Idle);
    }

    #[test]
    fn test_text_block_not_resizable() {
        let text = Block::new(BlockId::from("t"), create_default_content(BlockType::Text));
        let mut ctl = ResizeController::default();
        assert!(matches!(
            ctl.begin(&text, ResizeHandle::SouthEast, Point::new(0.0, 0.0)),
            Err(DesignerError::NotResizable { .. })
        ));
    }

    #[test]
    fn test_second_begin_ignored_while_dragging() {
        let mut ctl = ResizeController::default();
        ctl.begin(&image(200, 100), ResizeHandle::SouthEast, Point::new(0.0, 0.0)).unwrap();
        let other = Block::new(BlockId::from("other"), create_default_content(BlockType::Image));
        assert!(!ctl.begin(&other, ResizeHandle::NorthWest, Point::new(5.0, 5.0)).unwrap());
        assert_eq!(ctl.session().unwrap().block_id, BlockId::from("img"));
    }

    #[test]
    fn test_end_returns_to_idle() {
        let mut ctl = ResizeController::default();
        ctl.begin(&image(200, 100), ResizeHandle::SouthEast, Point::new(0.0, 0.0)).unwrap();
        ctl.update(Point::new(10.0, 10.0));
        let session = ctl.end().unwrap();
        assert_eq!(session.current, Dimensions { width: Some(210), height: 110 });
        assert_eq!(ctl.state(), &ResizeState::Idle);
        assert!(ctl.update(Point::new(50.0, 50.0)).is_none());
        assert!(ctl.end().is_none());
    }
}
