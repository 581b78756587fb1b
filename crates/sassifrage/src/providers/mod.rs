//! Built-in compiler providers.

pub mod dart_sass;
#[cfg(feature = "grass-compiler")]
pub mod grass;
