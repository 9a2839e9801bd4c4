//! Frame description and draw surfaces
//!
//! Games never touch a canvas. Each tick they push draw commands into a
//! `Frame`, and the frame is replayed onto whatever `RenderSurface` the host
//! provides: the 2D canvas in the browser, a recorder in tests.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::entity::Color;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

/// Geometry, relative to the draw position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    /// Closed outline, rotated by `rotation` radians around the position
    Polygon { points: Vec<Vec2>, rotation: f32 },
    /// Axis-aligned rectangle with the position as its top-left corner
    Rect { size: Vec2 },
    /// Segment from the position to `to` (absolute)
    Line { to: Vec2 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub line_width: f32,
}

impl Style {
    pub fn fill(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            line_width: 1.0,
        }
    }

    pub fn stroke(color: Color, line_width: f32) -> Self {
        Self {
            fill: None,
            stroke: Some(color),
            line_width,
        }
    }

    pub fn with_stroke(mut self, color: Color, line_width: f32) -> Self {
        self.stroke = Some(color);
        self.line_width = line_width;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub color: Color,
    pub size_px: f32,
    pub align: TextAlign,
}

impl TextStyle {
    pub fn new(color: Color, size_px: f32, align: TextAlign) -> Self {
        Self {
            color,
            size_px,
            align,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Clear,
    Shape {
        shape: Shape,
        at: Vec2,
        style: Style,
    },
    Text {
        content: String,
        at: Vec2,
        style: TextStyle,
    },
}

/// The 2D drawing collaborator
pub trait RenderSurface {
    fn clear(&mut self);
    fn draw_shape(&mut self, shape: &Shape, at: Vec2, style: &Style);
    fn draw_text(&mut self, content: &str, at: Vec2, style: &TextStyle);
}

/// One tick's worth of draw commands, in paint order
#[derive(Debug, Clone, Default)]
pub struct Frame {
    commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    pub fn shape(&mut self, shape: Shape, at: Vec2, style: Style) {
        self.commands.push(DrawCommand::Shape { shape, at, style });
    }

    pub fn circle(&mut self, at: Vec2, radius: f32, style: Style) {
        self.shape(Shape::Circle { radius }, at, style);
    }

    pub fn rect(&mut self, at: Vec2, size: Vec2, style: Style) {
        self.shape(Shape::Rect { size }, at, style);
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        self.shape(Shape::Line { to }, from, Style::stroke(color, width));
    }

    pub fn text(&mut self, content: impl Into<String>, at: Vec2, style: TextStyle) {
        self.commands.push(DrawCommand::Text {
            content: content.into(),
            at,
            style,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Paint every command onto `surface`
    pub fn replay(&self, surface: &mut dyn RenderSurface) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear => surface.clear(),
                DrawCommand::Shape { shape, at, style } => surface.draw_shape(shape, *at, style),
                DrawCommand::Text { content, at, style } => surface.draw_text(content, *at, style),
            }
        }
    }
}

/// Surface that keeps what was drawn since the last clear (headless hosts, tests)
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    frames: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands since the last clear
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of clears seen
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// All text drawn since the last clear
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn shape_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Shape { .. }))
            .count()
    }
}

impl RenderSurface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.clear();
        self.frames += 1;
    }

    fn draw_shape(&mut self, shape: &Shape, at: Vec2, style: &Style) {
        self.commands.push(DrawCommand::Shape {
            shape: shape.clone(),
            at,
            style: *style,
        });
    }

    fn draw_text(&mut self, content: &str, at: Vec2, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            content: content.to_string(),
            at,
            style: *style,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_in_order() {
        let mut frame = Frame::new();
        frame.clear();
        frame.circle(Vec2::new(1.0, 2.0), 3.0, Style::fill(Color::WHITE));
        frame.text("Score: 1", Vec2::ZERO, TextStyle::new(Color::WHITE, 20.0, TextAlign::Left));

        let mut surface = RecordingSurface::new();
        frame.replay(&mut surface);
        assert_eq!(surface.frames(), 1);
        assert_eq!(surface.shape_count(), 1);
        assert_eq!(surface.texts(), vec!["Score: 1"]);
        assert_eq!(&surface.commands()[..], &frame.commands()[1..]);
    }

    #[test]
    fn test_clear_drops_previous_frame() {
        let mut surface = RecordingSurface::new();
        let mut frame = Frame::new();
        frame.clear();
        frame.rect(Vec2::ZERO, Vec2::splat(10.0), Style::fill(Color::BLACK));
        frame.replay(&mut surface);
        frame.replay(&mut surface);
        assert_eq!(surface.frames(), 2);
        assert_eq!(surface.shape_count(), 1);
    }
}
