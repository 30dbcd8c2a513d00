pub mod mask_processor;
pub mod scaled_mask;
