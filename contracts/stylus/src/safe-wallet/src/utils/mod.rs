//! Small deterministic helpers shared by the engine and the Stylus entrypoint.

pub mod bytes;
pub mod crypto;
