use thiserror::Error;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    #[error("Invalid version range: min {min}, max {max}")]
    InvalidVersionRange { min: u8, max: u8 },

    #[error("Invalid masking pattern: {0}")]
    InvalidMaskingPattern(u8),

    #[error("ECI assignment value out of range: {0}")]
    EciOutOfRange(u32),

    #[error("Data length = {required} bits, max capacity = {capacity} bits")]
    CapacityOverflow { required: usize, capacity: usize },

    #[error("Data too long")]
    DataTooLong,
}

pub type QRResult<T> = Result<T, QRError>;
