mod block;
mod galois;

pub(crate) use block::*;
pub use galois::*;
