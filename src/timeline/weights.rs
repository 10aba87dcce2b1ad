// Per-chapter blend weights. A chapter fades out over the last `BLEND_WINDOW`
// of its duration while its successor fades in by the mirrored amount.

use super::chapters::ChapterTable;
use crate::motion::anim::smoothstep;

/// Fraction of a chapter's duration spent fading into its successor.
pub const BLEND_WINDOW: f32 = 0.18;

/// Weights at or below this are ignored by the blenders.
pub const NEGLIGIBLE_WEIGHT: f32 = 0.001;

#[derive(Debug, Clone, PartialEq)]
pub struct ChapterMix {
    weights: Vec<f32>,
    progress: Vec<f32>,
}

impl ChapterMix {
    /// All-zero mix for `len` chapters: the degenerate frame the blenders
    /// fall back from.
    pub fn zeroed(len: usize) -> Self {
        Self {
            weights: vec![0.0; len],
            progress: vec![0.0; len],
        }
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn progress(&self) -> &[f32] {
        &self.progress
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Weight of chapter `id` (1-based); 0 for unknown ids.
    pub fn weight(&self, id: u32) -> f32 {
        lookup(&self.weights, id)
    }

    pub fn local_progress(&self, id: u32) -> f32 {
        lookup(&self.progress, id)
    }

    pub fn total_weight(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// Id of the heaviest chapter; ties go to the earlier chapter.
    pub fn dominant(&self) -> u32 {
        let mut best = 0;
        for (i, &w) in self.weights.iter().enumerate() {
            if w > self.weights[best] {
                best = i;
            }
        }
        best as u32 + 1
    }

    /// `(index, weight, local_progress)` for every non-negligible chapter.
    pub fn contributors(&self) -> impl Iterator<Item = (usize, f32, f32)> + '_ {
        self.weights
            .iter()
            .zip(self.progress.iter())
            .enumerate()
            .filter(|&(_, (&w, _))| w > NEGLIGIBLE_WEIGHT)
            .map(|(i, (&w, &p))| (i, w, p))
    }
}

fn lookup(values: &[f32], id: u32) -> f32 {
    id.checked_sub(1)
        .and_then(|i| values.get(i as usize))
        .copied()
        .unwrap_or(0.0)
}

/// Fade-out envelope over local progress: 1 until `1 - BLEND_WINDOW`, then
/// a mirrored smoothstep down to 0 at `p = 1`.
pub fn ramp_out(progress: f32) -> f32 {
    if progress >= 1.0 {
        0.0
    } else if progress > 1.0 - BLEND_WINDOW {
        smoothstep((1.0 - progress) / BLEND_WINDOW)
    } else {
        1.0
    }
}

/// Pure and side-effect free; safe to call any number of times per frame.
pub fn chapter_mix(table: &ChapterTable, global_time: f32) -> ChapterMix {
    let chapters = table.chapters();
    let last = chapters.len() - 1;

    let progress: Vec<f32> = chapters
        .iter()
        .map(|c| c.local_progress(global_time))
        .collect();

    let mut weights = vec![0.0_f32; chapters.len()];

    if global_time >= chapters[last].start {
        weights[last] = 1.0;
    } else {
        for (i, chapter) in chapters.iter().enumerate() {
            weights[i] = if global_time < chapter.start {
                if i == 0 {
                    1.0
                } else {
                    // Lead-in mirrors the predecessor's fade-out exactly.
                    let prev = progress[i - 1];
                    if prev > 1.0 - BLEND_WINDOW {
                        1.0 - ramp_out(prev)
                    } else {
                        0.0
                    }
                }
            } else if global_time >= chapter.end {
                0.0
            } else {
                ramp_out(progress[i])
            };
        }
    }

    let sum: f32 = weights.iter().sum();
    if sum > 0.0 {
        for w in &mut weights {
            *w /= sum;
        }
    }

    ChapterMix { weights, progress }
}
