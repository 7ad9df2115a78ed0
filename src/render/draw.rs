//! Draw commands and the surface they are emitted into.

use crate::models::settings::NoteShape;
use crate::models::skin::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rect of size `w` x `h` centred on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self::new(cx - w / 2.0, cy - h / 2.0, w, h)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Chart background image, covered by a black layer of `dim` opacity.
    Background { file: Option<String>, dim: f32 },
    Rect { rect: Rect, color: Color },
    /// Rectangle outline.
    Frame { rect: Rect, color: Color, thickness: f32 },
    /// Note or receptor shape inscribed in `rect`.
    Shape {
        shape: NoteShape,
        rect: Rect,
        color: Color,
        outline: bool,
    },
    /// Skin bundle image.
    Image {
        key: &'static str,
        rect: Rect,
        alpha: f32,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        color: Color,
        align: TextAlign,
    },
    /// Pie slice from 12 o'clock, clockwise, covering `progress` of the circle.
    Arc {
        cx: f32,
        cy: f32,
        radius: f32,
        progress: f32,
        color: Color,
    },
}

/// Render target. Implemented by GPU hosts and by `DrawList`.
pub trait Surface {
    /// Width and height in pixels.
    fn viewport(&self) -> (f32, f32);
    fn draw(&mut self, command: DrawCommand);
}

/// Surface that records commands in order.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
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

    /// Keeps the size and capacity for the next frame.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for DrawList {
    fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}
