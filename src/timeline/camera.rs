// Blended camera goal. Velocity is only continuous after `CameraSmoother`;
// the raw goal jumps in speed where a new path begins.

use super::weights::ChapterMix;
use crate::motion::anim::{ease_out_quart, lerp};
use crate::motion::math::Vec3;
use anyhow::{ensure, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
}

impl CameraPose {
    pub const fn new(position: Vec3, target: Vec3, fov: f32) -> Self {
        Self {
            position,
            target,
            fov,
        }
    }

    pub fn lerp(self, other: CameraPose, t: f32) -> CameraPose {
        CameraPose {
            position: self.position.lerp(other.position, t),
            target: self.target.lerp(other.target, t),
            fov: lerp(self.fov, other.fov, t),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.target.is_finite() && self.fov.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPath {
    pub from: CameraPose,
    pub to: CameraPose,
    pub damping_rate: f32,
    pub micro_motion: f32,
}

impl CameraPath {
    pub fn sample(&self, progress: f32) -> CameraPose {
        self.from.lerp(self.to, ease_out_quart(progress))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraTable {
    paths: Vec<CameraPath>,
}

impl CameraTable {
    pub fn new(paths: Vec<CameraPath>, chapter_count: usize) -> Result<Self> {
        ensure!(
            paths.len() == chapter_count,
            "camera table has {} paths for {} chapters",
            paths.len(),
            chapter_count
        );
        for (i, path) in paths.iter().enumerate() {
            let id = i + 1;
            ensure!(
                path.from.is_finite() && path.to.is_finite(),
                "camera path {} has a non-finite keyframe",
                id
            );
            ensure!(
                path.damping_rate.is_finite() && path.damping_rate > 0.0,
                "camera path {} has non-positive damping rate {}",
                id,
                path.damping_rate
            );
            ensure!(
                path.micro_motion.is_finite() && path.micro_motion >= 0.0,
                "camera path {} has negative micro-motion amplitude {}",
                id,
                path.micro_motion
            );
        }
        Ok(Self { paths })
    }

    pub fn paths(&self) -> &[CameraPath] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn opening_pose(&self) -> CameraPose {
        self.paths[0].from
    }
}

/// Where the camera wants to be this frame, and how hard to chase it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraGoal {
    pub pose: CameraPose,
    pub damping_rate: f32,
    pub micro_motion: f32,
}

pub fn blend_camera(table: &CameraTable, mix: &ChapterMix) -> CameraGoal {
    let mut position = Vec3::ZERO;
    let mut target = Vec3::ZERO;
    let mut fov = 0.0;
    let mut damping_rate = 0.0;
    let mut micro_motion = 0.0;
    let mut total = 0.0;

    for (index, weight, progress) in mix.contributors() {
        let path = &table.paths[index];
        let pose = path.sample(progress);
        position += pose.position * weight;
        target += pose.target * weight;
        fov += pose.fov * weight;
        damping_rate += path.damping_rate * weight;
        micro_motion += path.micro_motion * weight;
        total += weight;
    }

    if total <= 0.0 {
        let first = &table.paths[0];
        return CameraGoal {
            pose: first.from,
            damping_rate: first.damping_rate,
            micro_motion: first.micro_motion,
        };
    }

    let inv = 1.0 / total;
    CameraGoal {
        pose: CameraPose {
            position: position * inv,
            target: target * inv,
            fov: fov * inv,
        },
        damping_rate: damping_rate * inv,
        micro_motion: micro_motion * inv,
    }
}

/// Slow per-axis sinusoidal sway with phases drawn once per session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MicroMotion {
    phase: [f32; 3],
}

impl MicroMotion {
    /// Cycles per second for x, y, z.
    const FREQUENCIES: [f32; 3] = [0.131, 0.173, 0.097];
    const AXIS_GAIN: [f32; 3] = [1.0, 0.6, 0.8];

    pub fn from_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self {
            phase: [
                rng.gen_range(0.0..TAU),
                rng.gen_range(0.0..TAU),
                rng.gen_range(0.0..TAU),
            ],
        }
    }

    /// Offset at `clock` seconds of playback; magnitude per axis never
    /// exceeds `amplitude`.
    pub fn offset(&self, clock: f32, amplitude: f32) -> Vec3 {
        let axis = |i: usize| {
            (clock * Self::FREQUENCIES[i] * TAU + self.phase[i]).sin()
                * Self::AXIS_GAIN[i]
                * amplitude
        };
        Vec3::new(axis(0), axis(1), axis(2))
    }
}
