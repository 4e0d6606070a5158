//! I/O operations module
//!
//! Contains the timed I/O primitives and the scratch file they target.

pub mod primitives;
pub mod scratch;

pub use primitives::{FileIo, IoPrimitives};
pub use scratch::ScratchFile;
