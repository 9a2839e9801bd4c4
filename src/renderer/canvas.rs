//! HTML canvas 2D surface

use std::f64::consts::TAU;

use glam::Vec2;
use web_sys::CanvasRenderingContext2d;

use super::{RenderSurface, Shape, Style, TextAlign, TextStyle};
use crate::sim::entity::Color;

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64) -> Self {
        Self { ctx, width, height }
    }

    fn paint(&self, style: &Style) {
        if let Some(fill) = style.fill {
            self.ctx.set_fill_style_str(&css(fill));
            self.ctx.fill();
        }
        if let Some(stroke) = style.stroke {
            self.ctx.set_stroke_style_str(&css(stroke));
            self.ctx.set_line_width(style.line_width as f64);
            self.ctx.stroke();
        }
    }
}

fn css(color: Color) -> String {
    format!("rgba({}, {}, {}, {})", color.r, color.g, color.b, color.a)
}

impl RenderSurface for CanvasSurface {
    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn draw_shape(&mut self, shape: &Shape, at: Vec2, style: &Style) {
        let (x, y) = (at.x as f64, at.y as f64);
        match shape {
            Shape::Circle { radius } => {
                self.ctx.begin_path();
                let _ = self.ctx.arc(x, y, radius.max(0.0) as f64, 0.0, TAU);
                self.paint(style);
            }
            Shape::Polygon { points, rotation } => {
                let Some(first) = points.first() else {
                    return;
                };
                self.ctx.save();
                let _ = self.ctx.translate(x, y);
                let _ = self.ctx.rotate(*rotation as f64);
                self.ctx.begin_path();
                self.ctx.move_to(first.x as f64, first.y as f64);
                for p in &points[1..] {
                    self.ctx.line_to(p.x as f64, p.y as f64);
                }
                self.ctx.close_path();
                self.paint(style);
                self.ctx.restore();
            }
            Shape::Rect { size } => {
                let (w, h) = (size.x as f64, size.y as f64);
                if let Some(fill) = style.fill {
                    self.ctx.set_fill_style_str(&css(fill));
                    self.ctx.fill_rect(x, y, w, h);
                }
                if let Some(stroke) = style.stroke {
                    self.ctx.set_stroke_style_str(&css(stroke));
                    self.ctx.set_line_width(style.line_width as f64);
                    self.ctx.stroke_rect(x, y, w, h);
                }
            }
            Shape::Line { to } => {
                self.ctx.begin_path();
                self.ctx.move_to(x, y);
                self.ctx.line_to(to.x as f64, to.y as f64);
                self.paint(style);
            }
        }
    }

    fn draw_text(&mut self, content: &str, at: Vec2, style: &TextStyle) {
        self.ctx.set_fill_style_str(&css(style.color));
        self.ctx.set_font(&format!("{}px Arial", style.size_px));
        self.ctx.set_text_align(match style.align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        });
        let _ = self.ctx.fill_text(content, at.x as f64, at.y as f64);
    }
}
