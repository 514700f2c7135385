//! Per-node transitions between two style snapshots.

use super::{Node, NodeParams};
use crate::style::StyleState;
use crate::values::ValueRegistry;

impl Node {
    /// Advances the running transition by `dt_ms`, then retargets if the
    /// composed target changed. Returns true when the rendered style
    /// changed.
    ///
    /// The first call assigns the target immediately. A new target restarts
    /// the clock from the current rendered style, so a transition that is
    /// interrupted mid-flight continues from where it visibly was.
    pub(crate) fn update_transition(&mut self, values: &ValueRegistry, dt_ms: f32) -> bool {
        let mut changed = false;

        if self.clock.is_running() {
            let t = self.clock.advance(dt_ms);
            self.rendered = if self.clock.is_running() {
                StyleState::interpolate(
                    &self.transition_from,
                    &self.transition_to,
                    t,
                    self.clock.easing(),
                    values,
                )
            } else {
                self.transition_to.clone()
            };
            changed = true;
        }

        if !self.style_dirty && self.composed_state == Some(self.resolved_state) {
            return changed;
        }
        self.style_dirty = false;
        self.composed_state = Some(self.resolved_state);

        let target = self.compose_target();
        if self.rendered_once && target == self.transition_to {
            return changed;
        }

        if !self.rendered_once {
            self.rendered_once = true;
            self.transition_from = target.clone();
            self.rendered = target.clone();
            self.transition_to = target;
            self.clock.finish();
            return true;
        }

        let timing = NodeParams::read(&target, values, &self.kind);
        self.transition_from = std::mem::take(&mut self.rendered);
        self.transition_to = target;
        self.clock.restart(timing.transition_duration_ms, timing.transition_easing);
        self.rendered = if self.clock.is_running() {
            self.transition_from.clone()
        } else {
            self.transition_to.clone()
        };
        true
    }
}
