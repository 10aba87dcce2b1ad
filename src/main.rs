use anyhow::Result;
use log::{debug, info, warn};
use std::time::{Duration, Instant};
use tenfold::features::{audio::FilterSweep, hud::Hud, Feature};
use tenfold::{Config, TimelineDriver};

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Could not load config ({}), using defaults", e);
        Config::default()
    });

    let mut driver = TimelineDriver::new(&config)?;
    if let Some(id) = config.start_chapter {
        driver.skip_to_chapter(id)?;
    }
    // Nothing can unpause a headless run.
    if !driver.snapshot().is_playing {
        info!("autoplay is off, starting playback anyway");
        driver.set_playing(true);
    }

    let mut hud = Hud::new(&config.hud, driver.snapshot());
    let mut audio = FilterSweep::new();

    let frame_budget = Duration::from_secs_f32(1.0 / config.fps_cap.max(1) as f32);
    let mut last_frame = Instant::now();
    let mut last_caption = hud.caption().to_string();
    let mut next_report = 0.0_f32;

    info!("Starting frame loop at {} fps", config.fps_cap);
    loop {
        let frame_start = Instant::now();
        let dt = frame_start.duration_since(last_frame).as_secs_f32();
        last_frame = frame_start;

        driver.tick(dt);
        let state = driver.snapshot();

        let features: [&mut dyn Feature; 2] = [&mut hud, &mut audio];
        for feature in features {
            feature.update(dt, state);
        }

        if hud.caption() != last_caption {
            last_caption = hud.caption().to_string();
            if !last_caption.is_empty() {
                println!("[{:>5.1}s] {}", state.global_time, last_caption);
            }
        }

        if state.global_time >= next_report {
            next_report = state.global_time + config.report_interval.max(0.1);
            let chapter = driver.script().chapters.get(state.dominant_chapter());
            debug!(
                "t={:.2}s chapter={} scale={} fov={:.1} cutoff={:.0}Hz gain={:.2}",
                state.global_time,
                chapter.map(|c| c.name.as_str()).unwrap_or("?"),
                hud.scale_label(),
                state.camera.fov,
                audio.cutoff_hz(),
                audio.gain(),
            );
        }

        if state.is_finished() && driver.is_settled(0.05) {
            info!("Sequence complete, final scale {}", hud.scale_label());
            break;
        }

        // Sleep off the rest of the frame to honor the fps cap
        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            std::thread::sleep(frame_budget - elapsed);
        }
    }

    Ok(())
}
