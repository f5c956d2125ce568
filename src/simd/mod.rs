//! Architecture-specific kernels.
//!
//! Modules here are compiled only when `build.rs` detected the matching CPU features
//! on the build host. Callers still confirm support at runtime before entering them.

#[cfg(all(avx2, target_arch = "x86_64"))]
pub mod avx2;
