use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,

    /// Micro-motion phase seed. Drawn from entropy per session when unset.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_micro_motion")]
    pub micro_motion: bool,

    #[serde(default = "default_fps_cap")]
    pub fps_cap: u32,

    #[serde(default)]
    pub start_chapter: Option<u32>,

    /// Seconds of playback between summary log lines in the headless runner.
    #[serde(default = "default_report_interval")]
    pub report_interval: f32,

    #[serde(default)]
    pub hud: HudConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudConfig {
    #[serde(default = "default_progress_rate")]
    pub progress_rate: f32,

    #[serde(default = "default_scale_rate")]
    pub scale_rate: f32,

    #[serde(default = "default_caption_fade")]
    pub caption_fade: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            autoplay: default_autoplay(),
            seed: None,
            micro_motion: default_micro_motion(),
            fps_cap: default_fps_cap(),
            start_chapter: None,
            report_interval: default_report_interval(),
            hud: HudConfig::default(),
        }
    }
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            progress_rate: default_progress_rate(),
            scale_rate: default_scale_rate(),
            caption_fade: default_caption_fade(),
        }
    }
}

fn default_autoplay() -> bool {
    true
}

fn default_micro_motion() -> bool {
    true
}

fn default_fps_cap() -> u32 {
    60
}

fn default_report_interval() -> f32 {
    1.0
}

fn default_progress_rate() -> f32 {
    6.0
}

fn default_scale_rate() -> f32 {
    4.0
}

fn default_caption_fade() -> f32 {
    0.6
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        let config_path = config_dir.join("tenfold").join("config.toml");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&contents)
        } else {
            Ok(Config::default())
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        let config_dir = config_dir.join("tenfold");
        std::fs::create_dir_all(&config_dir)?;

        let config_path = config_dir.join("config.toml");
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, contents)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
            seed = 1234
            start_chapter = 5

            [hud]
            caption_fade = 1.5
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(1234));
        assert_eq!(config.start_chapter, Some(5));
        assert!(config.autoplay);
        assert_eq!(config.fps_cap, 60);
        assert_eq!(config.hud.caption_fade, 1.5);
        assert_eq!(config.hud.progress_rate, 6.0);
    }

    #[test]
    fn pretty_output_parses_back() {
        let config = Config {
            seed: Some(9),
            micro_motion: false,
            ..Config::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(Config::from_toml("fps_cap = \"fast\"").is_err());
    }
}
