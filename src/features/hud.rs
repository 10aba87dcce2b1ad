use super::Feature;
use crate::config::HudConfig;
use crate::driver::TimelineState;
use crate::motion::anim::Timeline;
use crate::motion::smooth::{cap_dt, DampedValue};

const ASTRONOMICAL_UNIT: f64 = 1.495_978_707e11;
const LIGHT_YEAR: f64 = 9.460_730_472_580_8e15;

// Largest unit first; a value uses the first unit it is at least one of.
const SI_UNITS: [(f64, &str); 7] = [
    (1.0e3, "km"),
    (1.0, "m"),
    (1.0e-3, "mm"),
    (1.0e-6, "µm"),
    (1.0e-9, "nm"),
    (1.0e-12, "pm"),
    (1.0e-15, "fm"),
];

fn three_sig(value: f64) -> String {
    if value >= 100.0 {
        format!("{:.0}", value)
    } else if value >= 10.0 {
        format!("{:.1}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Human-readable size label: SI lengths up to kilometres, then
/// astronomical units and light-years, then plain scientific notation.
pub fn format_scale(meters: f64) -> String {
    if !(meters.is_finite() && meters > 0.0) {
        return "-".to_string();
    }
    if meters >= 1.0e23 || meters < 1.0e-15 {
        return format!("{:.1e} m", meters);
    }
    if meters >= 1.0e15 {
        return format!("{} ly", three_sig(meters / LIGHT_YEAR));
    }
    if meters >= 1.0e10 {
        return format!("{} AU", three_sig(meters / ASTRONOMICAL_UNIT));
    }
    for (unit, suffix) in SI_UNITS {
        if meters >= unit {
            return format!("{} {}", three_sig(meters / unit), suffix);
        }
    }
    format!("{:.1e} m", meters)
}

/// Display-side readouts. Progress and scale are damped so the numbers
/// don't flicker; the caption fades in whenever the driver reports a new cue.
pub struct Hud {
    progress: DampedValue<f32>,
    log_scale: DampedValue<f64>,
    caption: String,
    caption_fade: Timeline,
    seen_revision: u64,
    clock: f32,
}

impl Hud {
    pub fn new(config: &HudConfig, state: &TimelineState) -> Self {
        let mut caption_fade = Timeline::new(config.caption_fade);
        caption_fade.start(0.0);
        Self {
            progress: DampedValue::new(state.progress(), config.progress_rate),
            log_scale: DampedValue::new(state.blended_scale.log10(), config.scale_rate),
            caption: state.narrative_text.clone(),
            caption_fade,
            seen_revision: state.narrative_revision,
            clock: 0.0,
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn scale(&self) -> f64 {
        10f64.powf(self.log_scale.value())
    }

    pub fn scale_label(&self) -> String {
        format_scale(self.scale())
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn caption_opacity(&self) -> f32 {
        self.caption_fade.eased_progress()
    }
}

impl Feature for Hud {
    fn name(&self) -> &'static str {
        "hud"
    }

    fn update(&mut self, dt: f32, state: &TimelineState) {
        self.clock += cap_dt(dt);
        self.progress.update(state.progress(), dt);
        self.log_scale.update(state.blended_scale.log10(), dt);

        if state.narrative_revision != self.seen_revision {
            self.seen_revision = state.narrative_revision;
            self.caption = state.narrative_text.clone();
            self.caption_fade.start(self.clock);
        }
        self.caption_fade.update(self.clock);
    }
}
