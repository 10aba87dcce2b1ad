// Scales are blended on log10, never in raw meters.

use super::chapters::ChapterTable;
use super::weights::ChapterMix;

/// Weighted log10 mean of the contributing chapters' scales, or `None`
/// when nothing contributes.
pub fn blended_log_scale(table: &ChapterTable, mix: &ChapterMix) -> Option<f64> {
    let chapters = table.chapters();
    let mut weighted = 0.0_f64;
    let mut total = 0.0_f64;
    for (index, weight, progress) in mix.contributors() {
        let weight = weight as f64;
        weighted += weight * chapters[index].log_scale_at(progress);
        total += weight;
    }
    if total > 0.0 {
        Some(weighted / total)
    } else {
        None
    }
}

/// Blended scale in meters. Keeps `previous` on a zero-weight frame.
pub fn blend_scale(table: &ChapterTable, mix: &ChapterMix, previous: f64) -> f64 {
    match blended_log_scale(table, mix) {
        Some(log_scale) => 10f64.powf(log_scale),
        None => previous,
    }
}
