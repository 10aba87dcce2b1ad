// Timeline Driver: owns global time and play state, and publishes one
// `TimelineState` per frame.

use crate::config::Config;
use crate::motion::smooth::{cap_dt, CameraSmoother};
use crate::timeline::camera::{blend_camera, CameraGoal, CameraPose, MicroMotion};
use crate::timeline::scale::blend_scale;
use crate::timeline::weights::{chapter_mix, ChapterMix};
use crate::timeline::Script;
use anyhow::{anyhow, Result};
use log::info;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    SetPlaying(bool),
    TogglePlaying,
    Reset,
    SkipToChapter(u32),
    SkipToEnd,
    SetGlobalTime(f32),
    SetProgress(f32),
}

/// Read-only view of one frame, indexed by chapter position (`id - 1`).
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineState {
    pub global_time: f32,
    pub total_duration: f32,
    pub is_playing: bool,
    pub chapter_weights: Vec<f32>,
    pub chapter_local_progress: Vec<f32>,
    pub blended_scale: f64,
    pub camera: CameraPose,
    pub narrative_text: String,
    pub narrative_cue: Option<usize>,
    pub narrative_revision: u64,
}

impl TimelineState {
    /// Global time as a fraction of the whole sequence.
    pub fn progress(&self) -> f32 {
        if self.total_duration > 0.0 {
            (self.global_time / self.total_duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn weight(&self, id: u32) -> f32 {
        id.checked_sub(1)
            .and_then(|i| self.chapter_weights.get(i as usize))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn local_progress(&self, id: u32) -> f32 {
        id.checked_sub(1)
            .and_then(|i| self.chapter_local_progress.get(i as usize))
            .copied()
            .unwrap_or(0.0)
    }

    /// Heaviest chapter id; ties go to the earlier chapter.
    pub fn dominant_chapter(&self) -> u32 {
        let mut best = 0;
        for (i, &w) in self.chapter_weights.iter().enumerate() {
            if w > self.chapter_weights[best] {
                best = i;
            }
        }
        best as u32 + 1
    }

    pub fn is_finished(&self) -> bool {
        self.global_time >= self.total_duration
    }
}

pub struct TimelineDriver {
    script: Script,
    state: TimelineState,
    smoother: CameraSmoother,
    goal: CameraGoal,
    micro: MicroMotion,
    micro_enabled: bool,
    motion_clock: f32,
}

impl TimelineDriver {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_script(Script::standard()?, config))
    }

    pub fn with_script(script: Script, config: &Config) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let micro = MicroMotion::from_seed(seed);
        let (state, goal) = Self::opening_frame(&script, config.autoplay);
        info!(
            "Timeline ready: {} chapters, {:.1}s, micro-motion seed {}",
            script.chapters.len(),
            script.total_duration(),
            seed
        );
        Self {
            smoother: CameraSmoother::new(goal.pose),
            script,
            state,
            goal,
            micro,
            micro_enabled: config.micro_motion,
            motion_clock: 0.0,
        }
    }

    fn opening_frame(script: &Script, is_playing: bool) -> (TimelineState, CameraGoal) {
        let mix = chapter_mix(&script.chapters, 0.0);
        let scale = blend_scale(&script.chapters, &mix, script.chapters.first().scale_start);
        let cue = script.narrative.active_cue(0.0);
        let goal = blend_camera(&script.camera, &mix);
        let state = TimelineState {
            global_time: 0.0,
            total_duration: script.total_duration(),
            is_playing,
            chapter_weights: mix.weights().to_vec(),
            chapter_local_progress: mix.progress().to_vec(),
            blended_scale: scale,
            camera: goal.pose,
            narrative_text: script.narrative.text(cue).to_string(),
            narrative_cue: cue,
            narrative_revision: 0,
        };
        (state, goal)
    }

    pub fn snapshot(&self) -> &TimelineState {
        &self.state
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Unsmoothed blended camera goal for the current frame, micro-motion
    /// included.
    pub fn camera_goal(&self) -> &CameraGoal {
        &self.goal
    }

    pub fn is_settled(&self, epsilon: f32) -> bool {
        self.smoother.is_settled(&self.goal.pose, epsilon)
    }

    /// Advance one frame. Does nothing while paused.
    pub fn tick(&mut self, dt: f32) {
        if !self.state.is_playing {
            return;
        }
        let dt = cap_dt(dt);
        let was_finished = self.state.is_finished();
        let next_time = self
            .script
            .chapters
            .clamp_time(self.state.global_time + dt);
        self.motion_clock += dt;
        self.advance(next_time, dt);

        if !was_finished && self.state.is_finished() {
            info!("Reached end of sequence at {:.2}s", self.state.global_time);
        }
    }

    fn advance(&mut self, global_time: f32, dt: f32) {
        let chapters = &self.script.chapters;
        let mix: ChapterMix = chapter_mix(chapters, global_time);
        let blended_scale = blend_scale(chapters, &mix, self.state.blended_scale);
        let cue = self.script.narrative.active_cue(global_time);

        let mut goal = blend_camera(&self.script.camera, &mix);
        if self.micro_enabled && self.state.is_playing {
            goal.pose.position += self.micro.offset(self.motion_clock, goal.micro_motion);
        }

        let camera = if self.state.is_playing {
            self.smoother.update(&goal.pose, goal.damping_rate, dt)
        } else {
            // Scrubbing while paused previews the exact authored pose.
            self.smoother.snap(goal.pose);
            goal.pose
        };

        let mut narrative_revision = self.state.narrative_revision;
        let mut narrative_text = self.state.narrative_text.clone();
        if cue != self.state.narrative_cue {
            narrative_revision += 1;
            narrative_text = self.script.narrative.text(cue).to_string();
            match cue {
                Some(index) => info!("Narrative cue {}: {}", index, narrative_text),
                None => info!("Narrative cleared at {:.2}s", global_time),
            }
        }

        let dominant = mix.dominant();
        if dominant != self.state.dominant_chapter() {
            if let Some(chapter) = chapters.get(dominant) {
                info!("Chapter {} ({}) now dominant", chapter.id, chapter.name);
            }
        }

        self.goal = goal;
        self.state = TimelineState {
            global_time,
            total_duration: chapters.total_duration(),
            is_playing: self.state.is_playing,
            chapter_weights: mix.weights().to_vec(),
            chapter_local_progress: mix.progress().to_vec(),
            blended_scale,
            camera,
            narrative_text,
            narrative_cue: cue,
            narrative_revision,
        };
    }

    pub fn set_playing(&mut self, playing: bool) {
        if self.state.is_playing != playing {
            info!(
                "{} at {:.2}s",
                if playing { "Playing" } else { "Paused" },
                self.state.global_time
            );
        }
        self.state.is_playing = playing;
    }

    pub fn toggle_playing(&mut self) {
        self.set_playing(!self.state.is_playing);
    }

    /// Back to t = 0 and playing, indistinguishable from a fresh session
    /// with the same seed.
    pub fn reset(&mut self) {
        info!("Resetting timeline");
        let (state, goal) = Self::opening_frame(&self.script, true);
        self.smoother.snap(goal.pose);
        self.state = state;
        self.goal = goal;
        self.motion_clock = 0.0;
    }

    pub fn set_global_time(&mut self, seconds: f32) {
        let target = self.script.chapters.clamp_time(seconds);
        self.advance(target, 0.0);
    }

    pub fn set_progress(&mut self, progress: f32) {
        let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        self.set_global_time(progress * self.script.total_duration());
    }

    pub fn skip_to_chapter(&mut self, id: u32) -> Result<()> {
        let start = self
            .script
            .chapters
            .get(id)
            .map(|c| c.start)
            .ok_or_else(|| anyhow!("No chapter with id {}", id))?;
        info!("Skipping to chapter {} at {:.2}s", id, start);
        self.set_global_time(start);
        Ok(())
    }

    pub fn skip_to_end(&mut self) {
        info!("Skipping to end");
        self.set_global_time(self.script.total_duration());
    }

    pub fn handle_command(&mut self, command: Command) -> Result<()> {
        match command {
            Command::SetPlaying(playing) => self.set_playing(playing),
            Command::TogglePlaying => self.toggle_playing(),
            Command::Reset => self.reset(),
            Command::SkipToChapter(id) => self.skip_to_chapter(id)?,
            Command::SkipToEnd => self.skip_to_end(),
            Command::SetGlobalTime(seconds) => self.set_global_time(seconds),
            Command::SetProgress(progress) => self.set_progress(progress),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            seed: Some(42),
            ..Config::default()
        }
    }

    fn driver() -> TimelineDriver {
        TimelineDriver::new(&config()).unwrap()
    }

    fn run(driver: &mut TimelineDriver, seconds: f32, dt: f32) {
        let frames = (seconds / dt).round() as usize;
        for _ in 0..frames {
            driver.tick(dt);
        }
    }

    #[test]
    fn opening_frame() {
        let driver = driver();
        let state = driver.snapshot();
        assert_eq!(state.global_time, 0.0);
        assert!(state.is_playing);
        assert_eq!(state.weight(1), 1.0);
        assert_eq!(state.chapter_weights.iter().sum::<f32>(), 1.0);
        let first = &driver.script().narrative.cues()[0];
        assert_eq!(first.time, 0.0);
        assert_eq!(state.narrative_text, first.text);
        assert_eq!(state.camera, driver.script().camera.opening_pose());
    }

    #[test]
    fn ticks_advance_and_clamp() {
        let mut driver = driver();
        run(&mut driver, 1.0, 1.0 / 60.0);
        assert!((driver.snapshot().global_time - 1.0).abs() < 1e-3);
        run(&mut driver, 80.0, 1.0 / 30.0);
        let state = driver.snapshot();
        assert_eq!(state.global_time, state.total_duration);
        assert!(state.is_finished());
        assert_eq!(state.weight(10), 1.0);
        assert_eq!(state.narrative_text, "");
    }

    #[test]
    fn long_frames_are_capped() {
        let mut driver = driver();
        driver.tick(5.0);
        assert!((driver.snapshot().global_time - 0.1).abs() < 1e-6);
    }

    #[test]
    fn paused_driver_is_frozen() {
        let mut driver = driver();
        run(&mut driver, 2.0, 1.0 / 60.0);
        driver.set_playing(false);
        let before = driver.snapshot().clone();
        run(&mut driver, 3.0, 1.0 / 60.0);
        assert_eq!(driver.snapshot(), &before);
        driver.set_playing(true);
        driver.tick(1.0 / 60.0);
        assert!(driver.snapshot().global_time > before.global_time);
    }

    #[test]
    fn reset_matches_fresh_instance() {
        let mut used = driver();
        run(&mut used, 20.0, 1.0 / 60.0);
        used.skip_to_chapter(7).unwrap();
        used.set_playing(false);
        used.reset();
        let fresh = driver();
        assert_eq!(used.snapshot(), fresh.snapshot());
        assert_eq!(used.camera_goal(), fresh.camera_goal());

        // Identical futures, too.
        let mut fresh = fresh;
        run(&mut used, 3.0, 1.0 / 60.0);
        run(&mut fresh, 3.0, 1.0 / 60.0);
        assert_eq!(used.snapshot(), fresh.snapshot());
    }

    #[test]
    fn skips_land_on_boundaries_and_keep_play_state() {
        let mut driver = driver();
        driver.set_playing(false);
        driver.skip_to_chapter(4).unwrap();
        let start = driver.script().chapters.get(4).unwrap().start;
        assert_eq!(driver.snapshot().global_time, start);
        assert!(!driver.snapshot().is_playing);
        assert_eq!(driver.snapshot().dominant_chapter(), 4);

        driver.set_playing(true);
        driver.skip_to_end();
        assert!(driver.snapshot().is_playing);
        assert!(driver.snapshot().is_finished());
    }

    #[test]
    fn unknown_chapter_is_rejected() {
        let mut driver = driver();
        run(&mut driver, 1.0, 1.0 / 60.0);
        let before = driver.snapshot().clone();
        assert!(driver.skip_to_chapter(0).is_err());
        assert!(driver.skip_to_chapter(11).is_err());
        assert_eq!(driver.snapshot(), &before);
    }

    #[test]
    fn setters_clamp() {
        let mut driver = driver();
        driver.set_global_time(-5.0);
        assert_eq!(driver.snapshot().global_time, 0.0);
        driver.set_global_time(1000.0);
        assert_eq!(driver.snapshot().global_time, 64.0);
        driver.set_progress(0.5);
        assert_eq!(driver.snapshot().global_time, 32.0);
        driver.set_progress(2.0);
        assert_eq!(driver.snapshot().progress(), 1.0);
        driver.set_progress(f32::NAN);
        assert_eq!(driver.snapshot().global_time, 0.0);
    }

    #[test]
    fn narrative_is_edge_triggered() {
        let mut driver = driver();
        let mut revisions = vec![driver.snapshot().narrative_revision];
        let mut cues = vec![driver.snapshot().narrative_cue];
        for _ in 0..(70 * 60) {
            driver.tick(1.0 / 60.0);
            let state = driver.snapshot();
            if state.narrative_revision != *revisions.last().unwrap() {
                revisions.push(state.narrative_revision);
                cues.push(state.narrative_cue);
            } else {
                assert_eq!(state.narrative_cue, *cues.last().unwrap());
            }
        }
        let cue_count = driver.script().narrative.len();
        // Every cue after the first, plus the final clear.
        assert_eq!(revisions.len(), cue_count + 1);
        assert_eq!(*cues.last().unwrap(), None);
    }

    #[test]
    fn camera_is_smoothed_not_snapped() {
        let mut driver = driver();
        driver.skip_to_chapter(9).unwrap();
        let goal = driver.camera_goal().pose;
        let shown = driver.snapshot().camera;
        assert_ne!(shown.position, goal.position);
        driver.tick(1.0 / 60.0);
        let after = driver.snapshot().camera;
        assert!(after.position.distance(goal.position) < shown.position.distance(goal.position));
    }

    #[test]
    fn paused_scrub_shows_authored_pose() {
        let mut driver = driver();
        driver.set_playing(false);
        driver.set_global_time(30.0);
        assert_eq!(driver.snapshot().camera, driver.camera_goal().pose);
    }

    #[test]
    fn micro_motion_only_moves_the_goal_while_playing() {
        let mut driver = driver();
        run(&mut driver, 10.0, 1.0 / 60.0);
        let t = driver.snapshot().global_time;
        let authored = |driver: &TimelineDriver, t: f32| {
            let script = driver.script();
            blend_camera(&script.camera, &chapter_mix(&script.chapters, t)).pose
        };
        assert_ne!(driver.camera_goal().pose, authored(&driver, t));

        driver.set_playing(false);
        driver.set_global_time(t);
        assert_eq!(driver.camera_goal().pose, authored(&driver, t));
        assert_eq!(driver.snapshot().camera, authored(&driver, t));
    }

    #[test]
    fn disabled_micro_motion_follows_the_authored_path() {
        let still = Config {
            micro_motion: false,
            ..config()
        };
        let mut swaying = driver();
        let mut steady = TimelineDriver::new(&still).unwrap();
        run(&mut swaying, 10.0, 1.0 / 60.0);
        run(&mut steady, 10.0, 1.0 / 60.0);
        assert_ne!(swaying.camera_goal().pose.position, steady.camera_goal().pose.position);
        assert_eq!(swaying.camera_goal().pose.target, steady.camera_goal().pose.target);
        let script = steady.script();
        let t = steady.snapshot().global_time;
        let authored = blend_camera(&script.camera, &chapter_mix(&script.chapters, t)).pose;
        assert_eq!(steady.camera_goal().pose, authored);
    }

    #[test]
    fn paused_start_plays_through_once_started() {
        let paused = Config {
            autoplay: false,
            ..config()
        };
        let mut driver = TimelineDriver::new(&paused).unwrap();
        assert!(!driver.snapshot().is_playing);
        driver.tick(1.0 / 60.0);
        assert_eq!(driver.snapshot().global_time, 0.0);
        driver.set_playing(true);
        run(&mut driver, 70.0, 1.0 / 30.0);
        assert!(driver.snapshot().is_finished());
        assert!(driver.snapshot().is_playing);
    }

    #[test]
    fn shown_camera_speed_is_continuous_across_chapters() {
        let still = Config {
            micro_motion: false,
            ..config()
        };
        let mut driver = TimelineDriver::new(&still).unwrap();
        let dt = 1.0 / 120.0;
        let mut position = driver.snapshot().camera.position;
        let mut speed = 0.0;
        while !driver.snapshot().is_finished() {
            driver.tick(dt);
            let now = driver.snapshot().camera.position;
            let next_speed = now.distance(position) / dt;
            assert!(
                (next_speed - speed).abs() < 0.5,
                "speed jump {} -> {} at t = {}",
                speed,
                next_speed,
                driver.snapshot().global_time
            );
            position = now;
            speed = next_speed;
        }
    }

    #[test]
    fn commands_dispatch() {
        let mut driver = driver();
        driver.handle_command(Command::TogglePlaying).unwrap();
        assert!(!driver.snapshot().is_playing);
        driver.handle_command(Command::SetProgress(0.25)).unwrap();
        assert_eq!(driver.snapshot().global_time, 16.0);
        driver.handle_command(Command::SkipToChapter(2)).unwrap();
        assert_eq!(driver.snapshot().global_time, 4.0);
        assert!(driver.handle_command(Command::SkipToChapter(99)).is_err());
        driver.handle_command(Command::Reset).unwrap();
        assert!(driver.snapshot().is_playing);
        assert_eq!(driver.snapshot().global_time, 0.0);
    }

    #[test]
    fn settles_at_the_end() {
        let mut driver = driver();
        driver.skip_to_end();
        run(&mut driver, 30.0, 1.0 / 60.0);
        assert!(driver.is_settled(0.35));
    }
}
