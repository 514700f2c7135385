//! # UI Error Types
//!
//! Every error the engine can report. None of them is fatal: per-frame code
//! reports through [`diagnose`] and continues with a fallback, while set-up
//! code gets a [`UiResult`] back.

use thiserror::Error;

use crate::key::Key;
use crate::property::{PropertyId, ValueClass};
use crate::values::ValuePool;
use crate::window::WindowId;

/// Broad classification of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller drove the API in an invalid shape.
    CallerShape,
    /// A required external input was missing or invalid.
    MissingInput,
    /// A numeric boundary was hit and clamped.
    Arithmetic,
}

/// Errors that can occur in the UI engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UiError {
    /// `end_frame` was called with no frame open.
    #[error("end_frame called with no open frame")]
    UnpairedEndFrame,

    /// A new frame started while earlier frames were still open.
    #[error("{open} frame(s) left open when the next frame started")]
    UnclosedFrame {
        /// Frames that were still open.
        open: usize,
    },

    /// A node was added while no frame was open to hold it.
    #[error("node {0} added outside of any open frame")]
    NoOpenFrame(Key),

    /// Two siblings used the same key in one frame.
    #[error("duplicate sibling key {key} at ordinal {position}")]
    DuplicateKey {
        /// The repeated key.
        key: Key,
        /// Ordinal of the second occurrence.
        position: usize,
    },

    /// A composite property was set with the wrong number of values.
    #[error("composite property {property} expects {expected} values, got {got}")]
    CompositeArity {
        /// The composite property.
        property: PropertyId,
        /// Number of sub-properties.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },

    /// A value of the wrong class was assigned to a property.
    #[error("property {property} holds {expected:?} values, got {got:?}")]
    ClassMismatch {
        /// The property being assigned.
        property: PropertyId,
        /// Class declared by the descriptor.
        expected: ValueClass,
        /// Class of the supplied value.
        got: ValueClass,
    },

    /// A stored value could not be read as the requested type.
    #[error("cannot read {got:?} value as {expected}")]
    TypeMismatch {
        /// The requested Rust type.
        expected: &'static str,
        /// Class of the stored value.
        got: ValueClass,
    },

    /// Interpolation was asked to blend values of different classes.
    #[error("cannot interpolate {from:?} into {to:?}")]
    InterpolationMismatch {
        /// Start class.
        from: ValueClass,
        /// End class.
        to: ValueClass,
    },

    /// The property id is not registered.
    #[error("unknown property id {0}")]
    UnknownProperty(PropertyId),

    /// The value id is not present in its pool.
    #[error("unknown {pool:?} id {id}")]
    UnknownValue {
        /// The pool that was queried.
        pool: ValuePool,
        /// The raw id.
        id: u32,
    },

    /// The window id does not name a live window.
    #[error("invalid window id {0:?}")]
    InvalidWindow(WindowId),

    /// A size or duration was NaN, infinite or negative and got clamped.
    #[error("non-finite or negative {what} clamped to zero")]
    Clamped {
        /// What was clamped.
        what: &'static str,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl UiError {
    /// Returns the broad kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidWindow(_) | Self::InvalidConfig(_) => ErrorKind::MissingInput,
            Self::Clamped { .. } => ErrorKind::Arithmetic,
            _ => ErrorKind::CallerShape,
        }
    }
}

/// Result type for UI operations.
pub type UiResult<T> = Result<T, UiError>;

/// Reports a recoverable error.
///
/// Debug builds log every occurrence; release builds stay silent. The caller
/// always continues with its fallback.
pub fn diagnose(error: &UiError) {
    if cfg!(debug_assertions) {
        tracing::warn!(kind = ?error.kind(), "{error}");
    }
}
