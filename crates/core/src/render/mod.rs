//! WebGL2 rendering backend.
//!
//! Only available with the `render` feature. The GPU path evaluates the same
//! superposition as the CPU views, one fragment per pixel.
//!
//! - [`context`] wraps the GL context and checks uniform limits.
//! - [`shader`] compiles and links programs.
//! - [`program`] holds the fixed wave and gain shaders and their uniform uploads.

pub mod context;
pub mod program;
pub mod shader;

pub use context::GpuContext;
pub use program::{check_source_count, ProgramKind, WaveProgram, MAX_SOURCES};
pub use shader::{annotate_source, build_program, compile_shader, ShaderError, ShaderStage};
