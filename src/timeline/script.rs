use super::camera::{CameraPath, CameraPose, CameraTable};
use super::chapters::{ChapterSpec, ChapterTable};
use super::narrative::{CueSpec, NarrativeTable};
use crate::motion::math::Vec3;
use anyhow::Result;

pub const CHAPTERS: [ChapterSpec; 10] = [
    ChapterSpec {
        name: "The Atom",
        duration: 4.0,
        scale_start: 1.0e-10,
        scale_end: 1.0e-9,
    },
    ChapterSpec {
        name: "Molecules",
        duration: 6.0,
        scale_start: 1.0e-9,
        scale_end: 1.0e-6,
    },
    ChapterSpec {
        name: "The Cell",
        duration: 6.0,
        scale_start: 1.0e-6,
        scale_end: 1.0e-3,
    },
    ChapterSpec {
        name: "Living Things",
        duration: 6.0,
        scale_start: 1.0e-3,
        scale_end: 1.0e1,
    },
    ChapterSpec {
        name: "Earth",
        duration: 7.5,
        scale_start: 1.0e1,
        scale_end: 1.3e7,
    },
    ChapterSpec {
        name: "The Solar System",
        duration: 5.0,
        scale_start: 1.3e7,
        scale_end: 9.0e12,
    },
    ChapterSpec {
        name: "Interstellar Space",
        duration: 7.5,
        scale_start: 9.0e12,
        scale_end: 1.0e17,
    },
    ChapterSpec {
        name: "The Milky Way",
        duration: 8.0,
        scale_start: 1.0e17,
        scale_end: 1.0e21,
    },
    ChapterSpec {
        name: "The Cosmic Web",
        duration: 8.0,
        scale_start: 1.0e21,
        scale_end: 1.0e25,
    },
    ChapterSpec {
        name: "The Observable Universe",
        duration: 6.0,
        scale_start: 1.0e25,
        scale_end: 8.8e26,
    },
];

pub const CUES: [CueSpec; 14] = [
    CueSpec {
        time: 0.0,
        text: "Everything you have ever touched is made of this.",
    },
    CueSpec {
        time: 2.2,
        text: "A nucleus, and a haze of probability around it.",
    },
    CueSpec {
        time: 4.5,
        text: "Atoms bind, and chemistry begins.",
    },
    CueSpec {
        time: 10.5,
        text: "Inside every cell, a machine older than memory.",
    },
    CueSpec {
        time: 16.5,
        text: "Cells gather into something that can see.",
    },
    CueSpec {
        time: 22.5,
        text: "Step back, and a living world comes into view.",
    },
    CueSpec {
        time: 26.0,
        text: "Thin air, thin water, one fragile shell.",
    },
    CueSpec {
        time: 30.0,
        text: "One planet of eight, circling an ordinary star.",
    },
    CueSpec {
        time: 35.5,
        text: "Past the last planet, the dark gets very wide.",
    },
    CueSpec {
        time: 40.0,
        text: "Light itself takes years to cross these gaps.",
    },
    CueSpec {
        time: 43.5,
        text: "Four hundred billion suns, turning slowly.",
    },
    CueSpec {
        time: 51.5,
        text: "Galaxies string along filaments of dark matter.",
    },
    CueSpec {
        time: 57.0,
        text: "This is as far as light has had time to reach.",
    },
    CueSpec {
        time: 60.5,
        text: "And every point of it began as one.",
    },
];

fn pose(position: [f32; 3], target: [f32; 3], fov: f32) -> CameraPose {
    CameraPose::new(
        Vec3::new(position[0], position[1], position[2]),
        Vec3::new(target[0], target[1], target[2]),
        fov,
    )
}

fn path(from: CameraPose, to: CameraPose, damping_rate: f32, micro_motion: f32) -> CameraPath {
    CameraPath {
        from,
        to,
        damping_rate,
        micro_motion,
    }
}

pub fn camera_paths() -> Vec<CameraPath> {
    vec![
        path(
            pose([0.0, 0.0, 4.0], [0.0, 0.0, 0.0], 55.0),
            pose([0.0, 0.5, 9.0], [0.0, 0.0, 0.0], 50.0),
            2.4,
            0.04,
        ),
        path(
            pose([0.0, 0.5, 9.0], [0.0, 0.0, 0.0], 50.0),
            pose([3.0, 1.5, 14.0], [0.0, 0.0, 0.0], 48.0),
            2.2,
            0.05,
        ),
        path(
            pose([3.0, 1.5, 14.0], [0.0, 0.0, 0.0], 48.0),
            pose([-2.0, 3.0, 18.0], [0.0, 0.5, 0.0], 45.0),
            2.0,
            0.06,
        ),
        path(
            pose([-2.0, 3.0, 18.0], [0.0, 0.5, 0.0], 45.0),
            pose([0.0, 6.0, 22.0], [0.0, 1.0, 0.0], 42.0),
            1.8,
            0.08,
        ),
        path(
            pose([0.0, 6.0, 22.0], [0.0, 1.0, 0.0], 42.0),
            pose([4.0, 8.0, 28.0], [0.0, 0.0, 0.0], 38.0),
            1.6,
            0.10,
        ),
        path(
            pose([4.0, 8.0, 28.0], [0.0, 0.0, 0.0], 38.0),
            pose([0.0, 14.0, 30.0], [0.0, 0.0, 0.0], 45.0),
            1.5,
            0.08,
        ),
        path(
            pose([0.0, 14.0, 30.0], [0.0, 0.0, 0.0], 45.0),
            pose([-6.0, 10.0, 36.0], [0.0, 0.0, -4.0], 50.0),
            1.4,
            0.06,
        ),
        path(
            pose([-6.0, 10.0, 36.0], [0.0, 0.0, -4.0], 50.0),
            pose([0.0, 22.0, 34.0], [0.0, 0.0, 0.0], 55.0),
            1.2,
            0.05,
        ),
        path(
            pose([0.0, 22.0, 34.0], [0.0, 0.0, 0.0], 55.0),
            pose([8.0, 16.0, 42.0], [0.0, 2.0, 0.0], 60.0),
            1.1,
            0.04,
        ),
        path(
            pose([8.0, 16.0, 42.0], [0.0, 2.0, 0.0], 60.0),
            pose([0.0, 10.0, 48.0], [0.0, 0.0, 0.0], 65.0),
            1.0,
            0.02,
        ),
    ]
}

pub fn standard_chapters() -> Result<ChapterTable> {
    ChapterTable::new(&CHAPTERS)
}

pub fn standard_narrative(total_duration: f32) -> Result<NarrativeTable> {
    NarrativeTable::new(&CUES, total_duration)
}

pub fn standard_camera(chapter_count: usize) -> Result<CameraTable> {
    CameraTable::new(camera_paths(), chapter_count)
}

/// All three static tables, validated against each other.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub chapters: ChapterTable,
    pub narrative: NarrativeTable,
    pub camera: CameraTable,
}

impl Script {
    pub fn new(chapters: ChapterTable, cues: &[CueSpec], paths: Vec<CameraPath>) -> Result<Self> {
        let narrative = NarrativeTable::new(cues, chapters.total_duration())?;
        let camera = CameraTable::new(paths, chapters.len())?;
        Ok(Self {
            chapters,
            narrative,
            camera,
        })
    }

    pub fn standard() -> Result<Self> {
        Self::new(standard_chapters()?, &CUES, camera_paths())
    }

    pub fn total_duration(&self) -> f32 {
        self.chapters.total_duration()
    }
}
