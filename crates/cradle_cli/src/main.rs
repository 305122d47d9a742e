//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `cradle_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Tiny probe to validate core crate wiring independently from the
    // Flutter/FFI runtime setup.
    println!("cradle_core ping={}", cradle_core::ping());
    println!("cradle_core version={}", cradle_core::core_version());
}
