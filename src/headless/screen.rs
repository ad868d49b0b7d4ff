//! Screen primitives that record what they were told to draw.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use crate::config::{LabelStyle, LineStyle};
use crate::constants::LABEL_LINE_COUNT;
use crate::disposal::Dispose;
use crate::error::ReleaseError;
use crate::host::{LabelPrimitive, LinePrimitive, ScreenHost, SharedLabel, SharedLine};
use crate::projection::LineGeometry;

/// Recorded state of one line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessLine {
    /// Last style applied.
    pub style: Option<LineStyle>,
    /// Last geometry applied.
    pub geometry: Option<LineGeometry>,
    /// Whether the line is shown.
    pub visible: bool,
    /// Whether the line has been released.
    pub removed: bool,
    /// Number of geometry updates received.
    pub updates: usize,
}

impl LinePrimitive for HeadlessLine {
    fn set_style(&mut self, style: &LineStyle) {
        self.style = Some(*style);
    }

    fn set_geometry(&mut self, geometry: LineGeometry) {
        self.geometry = Some(geometry);
        self.updates += 1;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl Dispose for HeadlessLine {
    fn dispose(&mut self) -> Result<(), ReleaseError> {
        if self.removed {
            return Err(ReleaseError::AlreadyReleased);
        }
        self.removed = true;
        self.visible = false;
        Ok(())
    }
}

/// Recorded state of one label block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessLabel {
    /// Last style applied.
    pub style: Option<LabelStyle>,
    /// First text line.
    pub name: String,
    /// Second text line.
    pub stats: String,
    /// Anchor position in pixels.
    pub position: Vec2,
    /// Whether the block is shown.
    pub visible: bool,
    /// Whether the block has been released.
    pub removed: bool,
}

impl LabelPrimitive for HeadlessLabel {
    fn set_style(&mut self, style: &LabelStyle) {
        self.style = Some(*style);
    }

    fn set_lines(&mut self, name: &str, stats: &str) {
        name.clone_into(&mut self.name);
        stats.clone_into(&mut self.stats);
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    #[expect(clippy::cast_precision_loss, reason = "line count is tiny")]
    fn rendered_height(&self) -> f32 {
        self.style.map_or(0.0, |style| style.font_size) * LABEL_LINE_COUNT as f32
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl Dispose for HeadlessLabel {
    fn dispose(&mut self) -> Result<(), ReleaseError> {
        if self.removed {
            return Err(ReleaseError::AlreadyReleased);
        }
        self.removed = true;
        self.visible = false;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ScreenState {
    lines: Vec<Rc<RefCell<HeadlessLine>>>,
    labels: Vec<Rc<RefCell<HeadlessLabel>>>,
}

/// Allocator that keeps every primitive it hands out for inspection.
///
/// Clones share the same allocation record.
#[derive(Debug, Clone, Default)]
pub struct HeadlessScreen {
    state: Rc<RefCell<ScreenState>>,
}

impl HeadlessScreen {
    /// Creates an empty screen.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines not yet released.
    #[must_use]
    pub fn live_lines(&self) -> usize {
        self.state
            .borrow()
            .lines
            .iter()
            .filter(|line| !line.borrow().removed)
            .count()
    }

    /// Labels not yet released.
    #[must_use]
    pub fn live_labels(&self) -> usize {
        self.state
            .borrow()
            .labels
            .iter()
            .filter(|label| !label.borrow().removed)
            .count()
    }

    /// Lines currently shown.
    #[must_use]
    pub fn visible_lines(&self) -> usize {
        self.state
            .borrow()
            .lines
            .iter()
            .filter(|line| line.borrow().visible)
            .count()
    }

    /// Snapshot of every label ever allocated, in allocation order.
    #[must_use]
    pub fn labels(&self) -> Vec<HeadlessLabel> {
        self.state
            .borrow()
            .labels
            .iter()
            .map(|label| label.borrow().clone())
            .collect()
    }

    /// Snapshot of every line ever allocated, in allocation order.
    #[must_use]
    pub fn lines(&self) -> Vec<HeadlessLine> {
        self.state
            .borrow()
            .lines
            .iter()
            .map(|line| line.borrow().clone())
            .collect()
    }
}

impl ScreenHost for HeadlessScreen {
    fn create_line(&mut self) -> SharedLine {
        let line = Rc::new(RefCell::new(HeadlessLine::default()));
        self.state.borrow_mut().lines.push(Rc::clone(&line));
        line
    }

    fn create_label(&mut self) -> SharedLabel {
        let label = Rc::new(RefCell::new(HeadlessLabel::default()));
        self.state.borrow_mut().labels.push(Rc::clone(&label));
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_line_reports_double_release() {
        let mut line = HeadlessLine::default();
        line.set_visible(true);
        assert_eq!(line.dispose(), Ok(()));
        assert!(!line.visible);
        assert_eq!(line.dispose(), Err(ReleaseError::AlreadyReleased));
    }

    #[test]
    fn label_height_scales_with_font_size() {
        let mut label = HeadlessLabel::default();
        assert!(label.rendered_height().abs() < f32::EPSILON);
        label.set_style(&LabelStyle {
            color: crate::config::Rgba::WHITE,
            font_size: 10.0,
        });
        assert!((label.rendered_height() - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn screen_tracks_live_primitives() {
        let mut screen = HeadlessScreen::new();
        let line = screen.create_line();
        let _label = screen.create_label();
        assert_eq!((screen.live_lines(), screen.live_labels()), (1, 1));

        line.borrow_mut().set_visible(true);
        assert_eq!(screen.visible_lines(), 1);

        assert_eq!(line.borrow_mut().dispose(), Ok(()));
        assert_eq!(screen.live_lines(), 0);
        assert_eq!(screen.lines().len(), 1);
    }
}
