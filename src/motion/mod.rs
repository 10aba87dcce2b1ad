pub mod anim;
pub mod math;
pub mod smooth;
