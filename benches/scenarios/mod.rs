//! Rack-level benchmarks.
//!
//! These run the host modules with their jacks patched the way a player
//! would, and the complete demo patch from the binary.

mod rack;

pub use rack::{bench_demo_rack, bench_modules};
