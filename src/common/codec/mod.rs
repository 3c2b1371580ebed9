pub mod encoder;
pub mod segment;
pub mod types;

pub use encoder::*;
pub use segment::*;
pub use types::*;

// Global constants
//------------------------------------------------------------------------------

pub static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];
