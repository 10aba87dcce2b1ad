pub mod camera;
pub mod chapters;
pub mod narrative;
pub mod scale;
pub mod script;
pub mod weights;

pub use camera::{CameraGoal, CameraPose};
pub use chapters::{Chapter, ChapterTable};
pub use script::Script;
pub use weights::{chapter_mix, ChapterMix};
