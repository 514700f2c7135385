//! # Value Registry
//!
//! Four append-only indirection pools (colors, fonts, textures, numbers).
//! Styles reference entries by id so one `update_*` call restyles every
//! node that points at the entry.
//!
//! The process-wide instance lives behind a readers-writer lock: UI frames
//! read, set-up code writes. Ids are stable once issued.

use std::fmt;
use std::sync::{Arc, OnceLock};

use lumen_shared::{Vec2, Vec4};
use parking_lot::RwLock;

use crate::error::{diagnose, UiError, UiResult};
use crate::property::{FromValue, ValueData};

macro_rules! value_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Reserved invalid id.
            pub const INVALID: Self = Self(u32::MAX);

            /// Returns false for [`Self::INVALID`].
            #[inline]
            #[must_use]
            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }

            #[inline]
            const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }
    };
}

value_id!(
    /// Id of a shared color.
    ColorId
);
value_id!(
    /// Id of a shared font.
    FontId
);
value_id!(
    /// Id of a shared texture.
    TextureId
);
value_id!(
    /// Id of a shared number.
    NumberId
);

/// Names one of the four pools, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuePool {
    /// Color pool.
    Color,
    /// Font pool.
    Font,
    /// Texture pool.
    Texture,
    /// Number pool.
    Number,
}

/// Description of a loaded texture. Owned by the texture loader.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureInfo {
    /// Asset name.
    pub name: String,
    /// Pixel size.
    pub size: Vec2,
}

/// Shared handle to a texture; empty means "no texture".
///
/// Equality is handle identity. The last clone dropped releases the texture.
#[derive(Clone, Default)]
pub struct TextureRef(Option<Arc<TextureInfo>>);

impl TextureRef {
    /// Wraps a texture description in a new handle.
    #[must_use]
    pub fn new(info: TextureInfo) -> Self {
        Self(Some(Arc::new(info)))
    }

    /// The empty handle.
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }

    /// Returns true if the handle points at a texture.
    #[must_use]
    pub fn is_some(&self) -> bool {
        self.0.is_some()
    }

    /// Returns the texture description.
    #[must_use]
    pub fn info(&self) -> Option<&TextureInfo> {
        self.0.as_deref()
    }

    /// Number of live handles to the same texture (0 for the empty handle).
    #[must_use]
    pub fn strong_count(&self) -> usize {
        self.0.as_ref().map_or(0, Arc::strong_count)
    }
}

impl PartialEq for TextureRef {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for TextureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(info) => write!(f, "TextureRef({:?})", info.name),
            None => f.write_str("TextureRef(none)"),
        }
    }
}

/// Description of a loaded font. Owned by the font atlas.
#[derive(Debug, Clone, PartialEq)]
pub struct FontInfo {
    /// Family name.
    pub name: String,
    /// Glyph advance as a fraction of the text size.
    pub advance_ratio: f32,
    /// Line height as a fraction of the text size.
    pub line_height_ratio: f32,
}

impl FontInfo {
    /// A monospace font with the usual terminal proportions.
    #[must_use]
    pub fn monospace(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            advance_ratio: 0.6,
            line_height_ratio: 1.25,
        }
    }
}

/// Shared handle to a font; empty means "the default font".
#[derive(Clone, Default)]
pub struct FontRef(Option<Arc<FontInfo>>);

impl FontRef {
    /// Wraps a font description in a new handle.
    #[must_use]
    pub fn new(info: FontInfo) -> Self {
        Self(Some(Arc::new(info)))
    }

    /// The empty handle.
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }

    /// Returns true if the handle points at a font.
    #[must_use]
    pub fn is_some(&self) -> bool {
        self.0.is_some()
    }

    /// Returns the font description.
    #[must_use]
    pub fn info(&self) -> Option<&FontInfo> {
        self.0.as_deref()
    }
}

impl PartialEq for FontRef {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for FontRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(info) => write!(f, "FontRef({:?})", info.name),
            None => f.write_str("FontRef(default)"),
        }
    }
}

/// The four shared value pools.
#[derive(Debug, Default)]
pub struct ValueRegistry {
    colors: Vec<Vec4>,
    fonts: Vec<FontRef>,
    textures: Vec<TextureRef>,
    numbers: Vec<f64>,
}

/// Next id for a pool of `len` entries, or `INVALID` when the id space is spent.
fn next_raw(len: usize, pool: ValuePool) -> u32 {
    match u32::try_from(len) {
        Ok(raw) if raw != u32::MAX => raw,
        _ => {
            diagnose(&UiError::UnknownValue { pool, id: u32::MAX });
            u32::MAX
        }
    }
}

impl ValueRegistry {
    /// Creates empty pools.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every entry. Previously issued ids become unknown.
    pub fn clear(&mut self) {
        self.colors.clear();
        self.fonts.clear();
        self.textures.clear();
        self.numbers.clear();
    }

    /// Adds a color and returns its id.
    pub fn register_color(&mut self, color: Vec4) -> ColorId {
        let id = ColorId(next_raw(self.colors.len(), ValuePool::Color));
        if id.is_valid() {
            self.colors.push(color);
        }
        id
    }

    /// Replaces a color in place.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownValue`] if the id was never issued.
    pub fn update_color(&mut self, id: ColorId, color: Vec4) -> UiResult<()> {
        let slot = self
            .colors
            .get_mut(id.index())
            .ok_or(UiError::UnknownValue { pool: ValuePool::Color, id: id.0 })?;
        *slot = color;
        Ok(())
    }

    /// Looks up a color.
    #[must_use]
    pub fn try_get_color(&self, id: ColorId) -> Option<Vec4> {
        self.colors.get(id.index()).copied()
    }

    /// Adds a font and returns its id.
    pub fn register_font(&mut self, font: FontRef) -> FontId {
        let id = FontId(next_raw(self.fonts.len(), ValuePool::Font));
        if id.is_valid() {
            self.fonts.push(font);
        }
        id
    }

    /// Replaces a font in place.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownValue`] if the id was never issued.
    pub fn update_font(&mut self, id: FontId, font: FontRef) -> UiResult<()> {
        let slot = self
            .fonts
            .get_mut(id.index())
            .ok_or(UiError::UnknownValue { pool: ValuePool::Font, id: id.0 })?;
        *slot = font;
        Ok(())
    }

    /// Looks up a font.
    #[must_use]
    pub fn try_get_font(&self, id: FontId) -> Option<&FontRef> {
        self.fonts.get(id.index())
    }

    /// Adds a texture and returns its id.
    pub fn register_texture(&mut self, texture: TextureRef) -> TextureId {
        let id = TextureId(next_raw(self.textures.len(), ValuePool::Texture));
        if id.is_valid() {
            self.textures.push(texture);
        }
        id
    }

    /// Replaces a texture in place.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownValue`] if the id was never issued.
    pub fn update_texture(&mut self, id: TextureId, texture: TextureRef) -> UiResult<()> {
        let slot = self
            .textures
            .get_mut(id.index())
            .ok_or(UiError::UnknownValue { pool: ValuePool::Texture, id: id.0 })?;
        *slot = texture;
        Ok(())
    }

    /// Looks up a texture.
    #[must_use]
    pub fn try_get_texture(&self, id: TextureId) -> Option<&TextureRef> {
        self.textures.get(id.index())
    }

    /// Adds a number and returns its id.
    pub fn register_number(&mut self, number: f64) -> NumberId {
        let id = NumberId(next_raw(self.numbers.len(), ValuePool::Number));
        if id.is_valid() {
            self.numbers.push(number);
        }
        id
    }

    /// Replaces a number in place.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::UnknownValue`] if the id was never issued.
    pub fn update_number(&mut self, id: NumberId, number: f64) -> UiResult<()> {
        let slot = self
            .numbers
            .get_mut(id.index())
            .ok_or(UiError::UnknownValue { pool: ValuePool::Number, id: id.0 })?;
        *slot = number;
        Ok(())
    }

    /// Looks up a number.
    #[must_use]
    pub fn try_get_number(&self, id: NumberId) -> Option<f64> {
        self.numbers.get(id.index()).copied()
    }

    /// Resolves a stored value to `T`, following id references with
    /// class-aware coercion (`ColorId -> Vec4`, `NumberId -> scalar or
    /// broadcast vector`, `TextureId -> TextureRef`, `FontId -> FontRef`).
    #[must_use]
    pub fn try_resolve<T: FromValue>(&self, data: &ValueData) -> Option<T> {
        T::from_value(data, self)
    }
}

static GLOBAL_VALUES: OnceLock<RwLock<ValueRegistry>> = OnceLock::new();

/// The process-wide value registry.
pub fn value_registry() -> &'static RwLock<ValueRegistry> {
    GLOBAL_VALUES.get_or_init(|| RwLock::new(ValueRegistry::new()))
}
