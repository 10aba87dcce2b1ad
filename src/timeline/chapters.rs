use anyhow::{ensure, Result};

/// Authoring form of a chapter, before start/end offsets are derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChapterSpec {
    pub name: &'static str,
    pub duration: f32,
    pub scale_start: f64,
    pub scale_end: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    pub id: u32,
    pub name: String,
    pub duration: f32,
    pub start: f32,
    pub end: f32,
    pub scale_start: f64,
    pub scale_end: f64,
}

impl Chapter {
    /// 0 before the chapter, 1 once past its end, linear in between.
    pub fn local_progress(&self, global_time: f32) -> f32 {
        if global_time < self.start {
            0.0
        } else if global_time >= self.end {
            1.0
        } else {
            ((global_time - self.start) / self.duration).clamp(0.0, 1.0)
        }
    }

    /// log10 of the chapter's scale at `progress`, interpolated in log space.
    pub fn log_scale_at(&self, progress: f32) -> f64 {
        let a = self.scale_start.log10();
        let b = self.scale_end.log10();
        a + (b - a) * progress.clamp(0.0, 1.0) as f64
    }

    pub fn scale_at(&self, progress: f32) -> f64 {
        10f64.powf(self.log_scale_at(progress))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChapterTable {
    chapters: Vec<Chapter>,
    total_duration: f32,
}

impl ChapterTable {
    pub fn new(specs: &[ChapterSpec]) -> Result<Self> {
        ensure!(!specs.is_empty(), "chapter table must contain at least one chapter");

        let mut chapters = Vec::with_capacity(specs.len());
        let mut cursor = 0.0_f32;
        for (i, spec) in specs.iter().enumerate() {
            let id = i as u32 + 1;
            ensure!(
                spec.duration.is_finite() && spec.duration > 0.0,
                "chapter {} ({}) has invalid duration {}",
                id,
                spec.name,
                spec.duration
            );
            ensure!(
                spec.scale_start.is_finite() && spec.scale_start > 0.0,
                "chapter {} ({}) has non-positive scale_start {}",
                id,
                spec.name,
                spec.scale_start
            );
            ensure!(
                spec.scale_end.is_finite() && spec.scale_end > 0.0,
                "chapter {} ({}) has non-positive scale_end {}",
                id,
                spec.name,
                spec.scale_end
            );

            let start = cursor;
            let end = start + spec.duration;
            chapters.push(Chapter {
                id,
                name: spec.name.to_string(),
                duration: spec.duration,
                start,
                end,
                scale_start: spec.scale_start,
                scale_end: spec.scale_end,
            });
            cursor = end;
        }

        Ok(Self {
            chapters,
            total_duration: cursor,
        })
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chapter> {
        self.chapters.iter()
    }

    pub fn get(&self, id: u32) -> Option<&Chapter> {
        id.checked_sub(1)
            .and_then(|index| self.chapters.get(index as usize))
    }

    pub fn first(&self) -> &Chapter {
        &self.chapters[0]
    }

    pub fn last(&self) -> &Chapter {
        &self.chapters[self.chapters.len() - 1]
    }

    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }

    pub fn clamp_time(&self, global_time: f32) -> f32 {
        if global_time.is_nan() {
            return 0.0;
        }
        global_time.clamp(0.0, self.total_duration)
    }
}
