pub mod audio;
pub mod hud;

use crate::driver::TimelineState;

/// A per-frame consumer of the published timeline snapshot. Features may
/// keep their own derived state but never write back into the timeline.
pub trait Feature {
    fn name(&self) -> &'static str;
    fn update(&mut self, dt: f32, state: &TimelineState);
}
