//! Background-blur (bokeh) compositing for camera frames.
//!
//! A frame and a foreground confidence mask from an external segmentation
//! model go in; a frame with a blurred background and a sharp subject comes
//! out. See [`compositing::bokeh_compositor::BokehCompositor`].

pub mod blurring;
pub mod compositing;
pub mod exposure;
pub mod imaging;
pub mod masking;
pub mod pipeline;
pub mod segmentation;
pub mod shared;

pub use compositing::bokeh_compositor::{composite, BokehCompositor};
pub use compositing::intensity::{BlurParameters, BokehIntensity};
pub use shared::confidence_mask::ConfidenceMask;
pub use shared::error::BokehError;
pub use shared::frame::Frame;
