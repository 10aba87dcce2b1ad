// Exponential smoothing, `lerp(current, target, 1 - e^(-rate * dt))`, with
// `dt` capped at `MAX_FRAME_DT`.

use super::math::Vec3;
use crate::timeline::camera::CameraPose;

/// Longest frame the smoother will integrate in one step, in seconds.
pub const MAX_FRAME_DT: f32 = 0.1;

/// Multipliers on the blended chapter rate. Target damps faster than
/// position, fov fastest.
pub const POSITION_RATE_SCALE: f32 = 1.0;
pub const TARGET_RATE_SCALE: f32 = 1.6;
pub const FOV_RATE_SCALE: f32 = 2.4;

pub fn cap_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    }
}

/// Blend factor for one frame: `1 - e^(-rate·dt)` with `dt` capped.
pub fn damp_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate.max(0.0) * cap_dt(dt)).exp()
}

pub trait Lerp: Copy {
    fn lerp_to(self, other: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp_to(self, other: f32, t: f32) -> f32 {
        super::anim::lerp(self, other, t)
    }
}

impl Lerp for f64 {
    fn lerp_to(self, other: f64, t: f32) -> f64 {
        self + (other - self) * t as f64
    }
}

impl Lerp for Vec3 {
    fn lerp_to(self, other: Vec3, t: f32) -> Vec3 {
        self.lerp(other, t)
    }
}

pub fn damp<T: Lerp>(current: T, target: T, rate: f32, dt: f32) -> T {
    current.lerp_to(target, damp_factor(rate, dt))
}

#[derive(Debug, Clone, PartialEq)]
pub struct DampedValue<T> {
    value: T,
    rate: f32,
}

impl<T: Lerp> DampedValue<T> {
    pub fn new(value: T, rate: f32) -> Self {
        Self { value, rate }
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate;
    }

    pub fn update(&mut self, target: T, dt: f32) -> T {
        self.value = damp(self.value, target, self.rate, dt);
        self.value
    }

    pub fn snap(&mut self, value: T) {
        self.value = value;
    }
}

/// Smooths position, look target, and field of view independently, each at
/// a fixed multiple of the blended chapter damping rate.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSmoother {
    position: DampedValue<Vec3>,
    target: DampedValue<Vec3>,
    fov: DampedValue<f32>,
}

impl CameraSmoother {
    pub fn new(pose: CameraPose) -> Self {
        Self {
            position: DampedValue::new(pose.position, 0.0),
            target: DampedValue::new(pose.target, 0.0),
            fov: DampedValue::new(pose.fov, 0.0),
        }
    }

    pub fn update(&mut self, goal: &CameraPose, damping_rate: f32, dt: f32) -> CameraPose {
        self.position.set_rate(damping_rate * POSITION_RATE_SCALE);
        self.target.set_rate(damping_rate * TARGET_RATE_SCALE);
        self.fov.set_rate(damping_rate * FOV_RATE_SCALE);

        self.position.update(goal.position, dt);
        self.target.update(goal.target, dt);
        self.fov.update(goal.fov, dt);
        self.pose()
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position.value(),
            target: self.target.value(),
            fov: self.fov.value(),
        }
    }

    pub fn snap(&mut self, pose: CameraPose) {
        *self = Self::new(pose);
    }

    pub fn is_settled(&self, goal: &CameraPose, epsilon: f32) -> bool {
        self.position.value().distance(goal.position) <= epsilon
            && self.target.value().distance(goal.target) <= epsilon
            && (self.fov.value() - goal.fov).abs() <= epsilon
    }
}
