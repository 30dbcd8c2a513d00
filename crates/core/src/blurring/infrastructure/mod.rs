pub mod stack_blur;
pub mod stack_blurrer;
