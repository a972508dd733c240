//! # Voxel Client Entry Point
//!
//! This is the main entry point for the native client.
//! It simply calls into the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

fn main() {
    voxel_client::run();
}
