//! # Fire Sparks
//!
//! A GPU-resident fire-spark particle simulator built with Rust.
//!
//! ## Features
//!
//! - **Stream-out Simulation**: Each particle yields zero or more particles per frame,
//!   appended to a bounded output stream with no host-side bookkeeping
//! - **Single Primitive**: The emitter is itself a particle living in the stream
//! - **Ballistic Flares**: Exact constant-acceleration integration with lifetime culling
//! - **Line Rendering**: Flares expand into velocity-aligned streaks sampled from a texture array
//! - **Dual Backends**: A parallel CPU path (rayon) and a wgpu compute/indirect-draw path
//!
//! ## Architecture Design
//!
//! A frame is `simulate → barrier → swap → render`:
//! - **Simulate**: [`particles::stream_out`] applies [`particles::SimulationRule`] to every
//!   particle of the current stream and appends the results to the next stream
//! - **Swap**: [`particles::StreamBuffers`] exchanges read and write roles
//! - **Render**: [`render::LineExpansion`] turns the current stream into line segments
//!
//! ### Example
//!
//! ```
//! use fire_sparks::config::SparkConfig;
//! use fire_sparks::particles::{FrameParams, SparkSystem};
//!
//! let config = SparkConfig::default();
//! let mut system = SparkSystem::from_config(&config.simulation).unwrap();
//! let mut frame = FrameParams::from_config(&config.simulation);
//!
//! for _ in 0..10 {
//!     frame.advance(1.0 / 60.0);
//!     system.simulate(&frame);
//! }
//! let segments = system.render(&frame);
//! assert_eq!(segments.len(), system.stats().flares);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Error types, logging and macros
//! - [`config`]: TOML/JSON configuration with environment overrides
//! - [`particles`]: Particle records, simulation rule and stream-out
//! - [`render`]: Line expansion, streak atlas and the wgpu backend

/// Core infrastructure: errors, logging and macros
pub mod core;
/// Configuration system
pub mod config;
/// Particle simulation (CPU reference path)
pub mod particles;
/// Line rendering and the GPU backend
pub mod render;
