use thiserror::Error;

#[derive(Debug, Error)]
pub enum PickError {
    #[error("image dimensions cannot be zero")]
    ZeroDimension,

    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    DimensionMismatch {
        len: usize,
        width: usize,
        height: usize,
    },

    #[error("color count must be at least 1, got {0}")]
    InvalidColorCount(u32),

    #[error("reduction bits must be between 1 and 8, got {0}")]
    InvalidReductionBits(u8),

    #[error("container dimensions cannot be zero, got {width}x{height}")]
    EmptyContainer { width: usize, height: usize },
}
