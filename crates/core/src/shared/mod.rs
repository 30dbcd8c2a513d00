pub mod confidence_mask;
pub mod config;
pub mod constants;
pub mod error;
pub mod frame;
