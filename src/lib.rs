pub mod config;
pub mod driver;
pub mod features;
pub mod motion;
pub mod timeline;

pub use config::Config;
pub use driver::{Command, TimelineDriver, TimelineState};
