//! # LUMEN UI
//!
//! Immediate-mode calls in, retained tree out. Every frame the caller
//! describes the tree it wants with `begin_frame` / `add_*` / `end_frame`;
//! the [`Context`] reconciles those calls against the nodes it kept from
//! the previous frame, so identity, transitions and capture survive
//! re-renders.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     FRAME PIPELINE                       │
//! ├──────────────────────────────────────────────────────────┤
//! │  Frame calls → Reconcile → Styles → Transitions → Layout │
//! │       ↓            ↓          ↓          ↓          ↓    │
//! │  Keys/ordinals   Arena     Cascade  Interpolate  Events  │
//! │                                                     ↓    │
//! │                                 Renderer ← Draw list     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Shared state
//!
//! The [`PropertyRegistry`] and [`ValueRegistry`] are process-wide and sit
//! behind `parking_lot` read-write locks. Set-up code writes, frames read.
//! A context takes one shared guard on the value registry per commit.
//!
//! ## Example
//!
//! ```
//! use lumen_ui::{Context, Style, UiConfig};
//! use lumen_shared::Vec4;
//!
//! let mut button = Style::new("button");
//! button.size(200.0, 40.0).background_color(Vec4::rgb(40.0, 40.0, 48.0));
//!
//! let mut ui = Context::new(UiConfig::default());
//! ui.begin_frame("root", &[]);
//! ui.add_frame("ok", &[&button]);
//! ui.add_text("label", "OK", &[]);
//! let root_events = ui.end_frame();
//!
//! assert!(!root_events.is_clicked);
//! assert_eq!(ui.stats().live_nodes, 3);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod animation;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod input;
pub mod key;
pub mod layout;
pub mod node;
pub mod property;
pub mod render;
pub mod style;
pub mod text;
pub mod tree;
pub mod values;
pub mod window;

pub use animation::{Easing, TimeUnit};
pub use config::UiConfig;
pub use context::{Context, FrameStats};
pub use error::{ErrorKind, UiError, UiResult};
pub use event::{Captures, EventRecord};
pub use input::{InputSnapshot, InputSource, InputState, MouseButton};
pub use key::Key;
pub use layout::{Alignment, LayoutDirection, PositionType, UnitType};
pub use node::{Node, NodeKind};
pub use property::{property_registry, props, PropertyId, PropertyRegistry, PropertyValue};
pub use render::{DrawList, RenderCommand, Renderer, UiVertex};
pub use style::{Style, StyleState, VisualState};
pub use text::{MonospaceMetrics, TextMetrics};
pub use tree::NodeId;
pub use values::{value_registry, FontRef, TextureRef, ValueRegistry};
pub use window::{HeadlessWindows, WindowHost, WindowId, WindowMetrics};

/// Restores both global registries to their start-up state: the property
/// registry holds only the base set and every value pool is empty.
///
/// Meant for tests. Ids issued before the reset must not be used after it.
pub fn reset_registries() {
    property_registry().write().reset();
    value_registry().write().clear();
    tracing::info!("global registries reset");
}
