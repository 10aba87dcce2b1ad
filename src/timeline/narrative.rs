use anyhow::{ensure, Result};

/// Seconds before the end at which narration is forced off.
pub const CLEAR_LEAD: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueSpec {
    pub time: f32,
    pub text: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeCue {
    pub time: f32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeTable {
    cues: Vec<NarrativeCue>,
    clear_at: f32,
}

impl NarrativeTable {
    pub fn new(specs: &[CueSpec], total_duration: f32) -> Result<Self> {
        let mut previous = f32::NEG_INFINITY;
        for (i, spec) in specs.iter().enumerate() {
            ensure!(
                spec.time.is_finite() && (0.0..=total_duration).contains(&spec.time),
                "cue {} at {}s lies outside [0, {}]",
                i,
                spec.time,
                total_duration
            );
            ensure!(
                spec.time >= previous,
                "cue {} at {}s is earlier than the cue before it ({}s)",
                i,
                spec.time,
                previous
            );
            previous = spec.time;
        }

        Ok(Self {
            cues: specs
                .iter()
                .map(|s| NarrativeCue {
                    time: s.time,
                    text: s.text.to_string(),
                })
                .collect(),
            clear_at: (total_duration - CLEAR_LEAD).max(0.0),
        })
    }

    pub fn cues(&self) -> &[NarrativeCue] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn clear_at(&self) -> f32 {
        self.clear_at
    }

    /// Index of the latest cue with `time <= global_time`; `None` before the
    /// first cue and once past the clear point.
    pub fn active_cue(&self, global_time: f32) -> Option<usize> {
        if global_time > self.clear_at {
            return None;
        }
        self.cues.iter().rposition(|cue| cue.time <= global_time)
    }

    pub fn text(&self, index: Option<usize>) -> &str {
        index
            .and_then(|i| self.cues.get(i))
            .map(|cue| cue.text.as_str())
            .unwrap_or("")
    }

    pub fn text_at(&self, global_time: f32) -> &str {
        self.text(self.active_cue(global_time))
    }
}
