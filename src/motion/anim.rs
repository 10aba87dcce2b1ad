pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

/// Hermite smoothstep `x²(3 − 2x)` on an input already clamped to [0, 1].
pub fn smoothstep(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    x * x * (3.0 - 2.0 * x)
}

/// `1 − (1 − t)⁴`: fast start, long settle into the end keyframe.
pub fn ease_out_quart(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv * inv
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// One-shot transition clock: started at some `now`, fed the current time
/// every frame, reports how far through its duration it is.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub start_time: f32,
    pub duration: f32,
    pub current_time: f32,
}

impl Timeline {
    pub fn new(duration: f32) -> Self {
        Self {
            start_time: 0.0,
            duration,
            current_time: 0.0,
        }
    }

    pub fn start(&mut self, now: f32) {
        self.start_time = now;
        self.current_time = now;
    }

    pub fn update(&mut self, now: f32) {
        self.current_time = now;
    }

    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        let elapsed = self.current_time - self.start_time;
        (elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }

    pub fn eased_progress(&self) -> f32 {
        ease_in_out(self.progress())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep_endpoints_and_symmetry() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
        for i in 0..=20 {
            let x = i as f32 / 20.0;
            assert!((smoothstep(x) + smoothstep(1.0 - x) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn smoothstep_clamps_outside_unit_interval() {
        assert_eq!(smoothstep(-0.5), 0.0);
        assert_eq!(smoothstep(1.5), 1.0);
    }

    #[test]
    fn ease_out_quart_is_front_loaded() {
        assert_eq!(ease_out_quart(0.0), 0.0);
        assert_eq!(ease_out_quart(1.0), 1.0);
        assert!(ease_out_quart(0.5) > 0.9);
    }

    #[test]
    fn timeline_progress_clamps() {
        let mut tl = Timeline::new(2.0);
        tl.start(10.0);
        assert_eq!(tl.progress(), 0.0);
        tl.update(11.0);
        assert!((tl.progress() - 0.5).abs() < 1e-6);
        assert!(!tl.is_complete());
        tl.update(20.0);
        assert_eq!(tl.progress(), 1.0);
        assert!(tl.is_complete());
    }

    #[test]
    fn zero_length_timeline_is_complete() {
        let tl = Timeline::new(0.0);
        assert!(tl.is_complete());
    }
}
