//! Draw list recording.
//!
//! Nodes paint into a [`DrawList`] in tree pre-order. The list is plain data:
//! a backend replays it into anything implementing [`Renderer`], or walks the
//! commands itself.

use lumen_shared::{Rect, Vec2, Vec4};

use crate::values::{FontRef, TextureRef};

/// A recorded draw operation. Colors use the `0..=255` range.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Clip every following command to this rect.
    SetClip(Rect),
    /// Filled rectangle.
    FillRect {
        /// Bounds.
        rect: Rect,
        /// Fill color.
        color: Vec4,
    },
    /// Rectangle outline.
    StrokeRect {
        /// Border box the stroke follows.
        rect: Rect,
        /// Stroke color.
        color: Vec4,
        /// Line width in pixels.
        width: f32,
        /// Stroke inside `rect` (true) or outside it.
        inner: bool,
    },
    /// Text run.
    Text {
        /// Text content.
        text: String,
        /// Top-left of the text block.
        position: Vec2,
        /// Font handle.
        font: FontRef,
        /// Pixel size.
        size: f32,
        /// Text color.
        color: Vec4,
    },
    /// Textured quad.
    Texture {
        /// Bounds.
        rect: Rect,
        /// Texture handle.
        texture: TextureRef,
        /// Tint color.
        tint: Vec4,
    },
    /// Triangle list.
    Polygon {
        /// Vertices, three per triangle.
        vertices: Vec<UiVertex>,
        /// Optional texture sampled with the vertex UVs.
        texture: Option<TextureRef>,
    },
}

/// Backend that consumes draw commands.
pub trait Renderer {
    /// Sets the clip rect.
    fn set_clip(&mut self, rect: Rect);
    /// Sets the color used by the next fill or stroke.
    fn set_draw_color(&mut self, color: Vec4);
    /// Fills a rect with the current draw color.
    fn fill_rect(&mut self, rect: Rect);
    /// Strokes a rect with the current draw color.
    fn stroke_rect(&mut self, rect: Rect, width: f32, inner: bool);
    /// Draws text.
    fn draw_text(&mut self, text: &str, position: Vec2, font: &FontRef, size: f32, color: Vec4);
    /// Blits a texture with a tint.
    fn blit_texture(&mut self, texture: &TextureRef, rect: Rect, tint: Vec4);
    /// Emits a triangle list.
    fn polygon(&mut self, vertices: &[UiVertex], texture: Option<&TextureRef>);
}

/// Commands of one committed frame.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<RenderCommand>,
    clip: Option<Rect>,
}

impl DrawList {
    /// Creates a new draw list.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Creates a draw list with room for `capacity` commands.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
            clip: None,
        }
    }

    /// Begins a new frame.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.clip = None;
    }

    /// Sets the clip rect. Emits nothing when the clip is unchanged.
    pub fn set_clip(&mut self, rect: Rect) {
        if self.clip != Some(rect) {
            self.clip = Some(rect);
            self.commands.push(RenderCommand::SetClip(rect));
        }
    }

    /// Returns the current clip rect.
    #[must_use]
    pub fn current_clip(&self) -> Option<Rect> {
        self.clip
    }

    /// Adds a filled rect.
    pub fn fill_rect(&mut self, rect: Rect, color: Vec4) {
        self.commands.push(RenderCommand::FillRect { rect, color });
    }

    /// Adds a rect outline.
    pub fn stroke_rect(&mut self, rect: Rect, color: Vec4, width: f32, inner: bool) {
        self.commands.push(RenderCommand::StrokeRect {
            rect,
            color,
            width,
            inner,
        });
    }

    /// Adds a text run.
    pub fn text(&mut self, text: &str, position: Vec2, font: &FontRef, size: f32, color: Vec4) {
        self.commands.push(RenderCommand::Text {
            text: text.to_owned(),
            position,
            font: font.clone(),
            size,
            color,
        });
    }

    /// Adds a textured quad.
    pub fn texture(&mut self, rect: Rect, texture: &TextureRef, tint: Vec4) {
        self.commands.push(RenderCommand::Texture {
            rect,
            texture: texture.clone(),
            tint,
        });
    }

    /// Adds a triangle list. Trailing vertices that do not form a whole
    /// triangle are dropped.
    pub fn polygon(&mut self, vertices: &[UiVertex], texture: Option<&TextureRef>) {
        let whole = vertices.len() - vertices.len() % 3;
        if whole == 0 {
            return;
        }
        self.commands.push(RenderCommand::Polygon {
            vertices: vertices[..whole].to_vec(),
            texture: texture.cloned(),
        });
    }

    /// Recorded commands in paint order.
    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Returns the total command count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Plays every command into `renderer`, in order.
    pub fn replay(&self, renderer: &mut impl Renderer) {
        for command in &self.commands {
            match command {
                RenderCommand::SetClip(rect) => renderer.set_clip(*rect),
                RenderCommand::FillRect { rect, color } => {
                    renderer.set_draw_color(*color);
                    renderer.fill_rect(*rect);
                }
                RenderCommand::StrokeRect {
                    rect,
                    color,
                    width,
                    inner,
                } => {
                    renderer.set_draw_color(*color);
                    renderer.stroke_rect(*rect, *width, *inner);
                }
                RenderCommand::Text {
                    text,
                    position,
                    font,
                    size,
                    color,
                } => renderer.draw_text(text, *position, font, *size, *color),
                RenderCommand::Texture {
                    rect,
                    texture,
                    tint,
                } => renderer.blit_texture(texture, *rect, *tint),
                RenderCommand::Polygon { vertices, texture } => {
                    renderer.polygon(vertices, texture.as_ref());
                }
            }
        }
    }
}

/// Vertex for UI polygons.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UiVertex {
    /// Position (x, y).
    pub position: [f32; 2],
    /// UV coordinates.
    pub uv: [f32; 2],
    /// Color (RGBA, `0..=255`).
    pub color: [f32; 4],
}

impl UiVertex {
    /// Creates a new vertex.
    #[must_use]
    pub const fn new(x: f32, y: f32, u: f32, v: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
            color,
        }
    }
}
