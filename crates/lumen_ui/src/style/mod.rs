//! Styles: per-state property maps and the builder callers fill in.

mod sheet;
mod state;

pub use sheet::Style;
pub use state::StyleState;

/// Visual state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisualState {
    /// Idle.
    #[default]
    Normal,
    /// Pointer over the node.
    Hover,
    /// Node holds the press capture.
    Pressed,
    /// Node is disabled.
    Disabled,
    /// Node holds the focus capture.
    Focused,
}

impl VisualState {
    /// Number of visual states.
    pub const COUNT: usize = 5;

    /// Every state, in layer order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Normal,
        Self::Hover,
        Self::Pressed,
        Self::Disabled,
        Self::Focused,
    ];

    /// Layer index of this state.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Normal => 0,
            Self::Hover => 1,
            Self::Pressed => 2,
            Self::Disabled => 3,
            Self::Focused => 4,
        }
    }
}
