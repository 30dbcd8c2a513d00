pub mod bokeh_settings;
pub mod frame_processor;
pub mod infrastructure;
pub mod pipeline_logger;
