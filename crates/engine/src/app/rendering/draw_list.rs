use super::text::text_extent;
use crate::app::{Rect, Vec2};

pub type Rgba = [u8; 4];

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sprite {
        key: &'static str,
        dest: Rect,
        placeholder: Rgba,
    },
    Fill { rect: Rect, color: Rgba },
    Text {
        text: String,
        origin: Vec2,
        scale: u32,
        color: Rgba,
    },
}

#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn sprite(&mut self, key: &'static str, dest: Rect, placeholder: Rgba) {
        self.commands.push(DrawCommand::Sprite {
            key,
            dest,
            placeholder,
        });
    }

    pub fn fill(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::Fill { rect, color });
    }

    pub fn text(&mut self, text: impl Into<String>, origin: Vec2, scale: u32, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            origin,
            scale,
            color,
        });
    }

    pub fn text_centered(&mut self, text: &str, center: Vec2, scale: u32, color: Rgba) {
        let (width, height) = text_extent(text, scale);
        let origin = Vec2 {
            x: center.x - width as f32 / 2.0,
            y: center.y - height as f32 / 2.0,
        };
        self.text(text, origin, scale, color);
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
}
