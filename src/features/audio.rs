use super::Feature;
use crate::driver::TimelineState;
use crate::motion::anim::smoothstep;

/// Accepts the sequence's overall progress once per frame. What the
/// implementation does with it is entirely its own business.
pub trait Evolve {
    fn evolve(&mut self, progress: f32);
}

const MIN_CUTOFF_HZ: f32 = 120.0;
const MAX_CUTOFF_HZ: f32 = 9000.0;
const FADE_START: f32 = 0.92;

/// Control values for a generative pad: a low-pass that opens
/// exponentially as the zoom widens, and a master fade over the closing
/// stretch.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSweep {
    cutoff_hz: f32,
    gain: f32,
}

impl FilterSweep {
    pub fn new() -> Self {
        Self {
            cutoff_hz: MIN_CUTOFF_HZ,
            gain: 1.0,
        }
    }

    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }
}

impl Default for FilterSweep {
    fn default() -> Self {
        Self::new()
    }
}

impl Evolve for FilterSweep {
    fn evolve(&mut self, progress: f32) {
        let p = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        self.cutoff_hz = MIN_CUTOFF_HZ * (MAX_CUTOFF_HZ / MIN_CUTOFF_HZ).powf(p);
        self.gain = if p < FADE_START {
            1.0
        } else {
            1.0 - smoothstep((p - FADE_START) / (1.0 - FADE_START))
        };
    }
}

impl Feature for FilterSweep {
    fn name(&self) -> &'static str {
        "audio"
    }

    fn update(&mut self, _dt: f32, state: &TimelineState) {
        self.evolve(state.progress());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_endpoints() {
        let mut sweep = FilterSweep::new();
        sweep.evolve(0.0);
        assert!((sweep.cutoff_hz() - MIN_CUTOFF_HZ).abs() < 1e-3);
        assert_eq!(sweep.gain(), 1.0);
        sweep.evolve(1.0);
        assert!((sweep.cutoff_hz() - MAX_CUTOFF_HZ).abs() < 1.0);
        assert_eq!(sweep.gain(), 0.0);
    }

    #[test]
    fn cutoff_rises_and_gain_only_falls_at_the_end() {
        let mut sweep = FilterSweep::new();
        let mut last_cutoff = 0.0;
        let mut last_gain = 1.0;
        for i in 0..=100 {
            let p = i as f32 / 100.0;
            sweep.evolve(p);
            assert!(sweep.cutoff_hz() > last_cutoff);
            assert!(sweep.gain() <= last_gain);
            if p < FADE_START {
                assert_eq!(sweep.gain(), 1.0);
            }
            last_cutoff = sweep.cutoff_hz();
            last_gain = sweep.gain();
        }
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        let mut sweep = FilterSweep::new();
        sweep.evolve(-3.0);
        let low = sweep.clone();
        sweep.evolve(0.0);
        assert_eq!(sweep, low);
        sweep.evolve(f32::NAN);
        assert_eq!(sweep, low);
    }
}
