//! # LUMEN Shared
//!
//! Math primitives used by the UI engine and by whatever renderer sits
//! behind it.
//!
//! Colors travel as [`Vec4`] with components in the `0..=255` range.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod math;
pub mod rect;

pub use math::{Vec2, Vec4};
pub use rect::Rect;
