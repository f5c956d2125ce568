//! AVX2 kernels for 256-bit double-precision reductions.
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: Intel Haswell (2013+) or AMD Excavator (2015+)
//! - **Instruction Sets**: AVX, AVX2 and FMA
//! - **Compilation**: Functions carry `#[target_feature(enable = "avx2,fma")]`, so no
//!   global `-C target-feature` flag is needed
//! - **Runtime Detection**: [`crate::PairwiseKernel::detect`] checks the CPU before any
//!   kernel here is called
//!
//! # Performance Characteristics
//!
//! - **Vector Width**: 256 bits (4 × f64)
//! - **Memory Alignment**: Unaligned loads; normalized rows are plain `Vec<f64>` slices
//! - **Latency Hiding**: Four independent FMA chains cover the 4-cycle FMA latency on
//!   both ports of a Skylake-class core

pub mod dot;
