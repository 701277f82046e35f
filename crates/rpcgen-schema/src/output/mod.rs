//! Output backends for code generation.
//!
//! Each backend implements [`Generator`](crate::traits::Generator).

// Go (structs + Fiber wiring)
#[cfg(feature = "backend-go")]
pub mod go;

#[cfg(feature = "backend-go")]
pub mod gofmt;

#[cfg(feature = "backend-go")]
pub use go::{GO_GENERATOR, GoGenerator, generate_go};
