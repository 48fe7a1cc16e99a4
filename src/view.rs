//! Flat draw list
//!
//! Scenes describe a frame as coloured rectangles and text lines; the platform driver
//! paints them (2D canvas on the web, log summary natively).

use glam::Vec2;

use crate::physics::Aabb;

/// RGBA colour, components 0.0 - 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Opaque colour from `0xRRGGBB`
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as f32 / 255.0,
            g: ((rgb >> 8) & 0xff) as f32 / 255.0,
            b: (rgb & 0xff) as f32 / 255.0,
            a: 1.0,
        }
    }

    pub const fn with_alpha(mut self, a: f32) -> Self {
        self.a = a;
        self
    }

    /// CSS `rgba()` string for canvas fill styles
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            self.a
        )
    }
}

pub mod palette {
    use super::Color;

    pub const SKY: Color = Color::hex(0x9bd4f5);
    pub const GRASS: Color = Color::hex(0x4c9a2a);
    pub const FOX: Color = Color::hex(0xe87a2c);
    pub const FOX_HIT: Color = Color::hex(0xff0000);
    pub const STAR: Color = Color::hex(0xffd23f);
    pub const BOMB: Color = Color::hex(0x222222);
    pub const SCORE_TEXT: Color = Color::hex(0x000000);
    pub const TITLE_TEXT: Color = Color::hex(0x3386ff);
    pub const BEST_TEXT: Color = Color::hex(0xffb533);
    pub const BUTTON_TEXT: Color = Color::hex(0xffffff);
    pub const OVERLAY: Color = Color::hex(0x000000).with_alpha(0.8);
}

/// Text anchoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        rect: Aabb,
        color: Color,
    },
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: Color,
        anchor: Anchor,
    },
}

/// Shapes in paint order
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    shapes: Vec<Shape>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn rect(&mut self, rect: Aabb, color: Color) {
        self.shapes.push(Shape::Rect { rect, color });
    }

    pub fn text(&mut self, pos: Vec2, text: impl Into<String>, size: f32, color: Color) {
        self.shapes.push(Shape::Text {
            pos,
            text: text.into(),
            size,
            color,
            anchor: Anchor::TopLeft,
        });
    }

    pub fn centered_text(&mut self, pos: Vec2, text: impl Into<String>, size: f32, color: Color) {
        self.shapes.push(Shape::Text {
            pos,
            text: text.into(),
            size,
            color,
            anchor: Anchor::Center,
        });
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// All text lines, in paint order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Text { text, .. } => Some(text.as_str()),
            Shape::Rect { .. } => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        let c = Color::hex(0x3386ff);
        assert_eq!(c.to_css(), "rgba(51, 134, 255, 1)");
        assert_eq!(palette::OVERLAY.a, 0.8);
    }

    #[test]
    fn test_draw_list_texts() {
        let mut list = DrawList::new();
        list.rect(Aabb::from_corner_size(0.0, 0.0, 1.0, 1.0), palette::GRASS);
        list.text(Vec2::new(16.0, 16.0), "Score: 10", 32.0, palette::SCORE_TEXT);

        assert_eq!(list.len(), 2);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["Score: 10"]);
        assert!(list.contains_text("Score"));

        list.clear();
        assert!(list.is_empty());
    }
}
