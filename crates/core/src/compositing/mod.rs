pub mod blend;
pub mod bokeh_compositor;
pub mod intensity;
