//! Shader compilation and linking for the WebGL2 wave programs.
//!
//! Compile and link failures carry the driver log annotated with the
//! numbered GLSL source. They convert into `WaveError::BackendInit`, which
//! is fatal for the view that owns the program.

use std::fmt;

use thiserror::Error;

use crate::error::WaveError;

/// Programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Errors from building a GPU program.
#[derive(Debug, Clone, Error)]
pub enum ShaderError {
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("program failed to link:\n{0}")]
    Link(String),
}

impl From<ShaderError> for WaveError {
    fn from(err: ShaderError) -> Self {
        WaveError::BackendInit(err.to_string())
    }
}

/// Numbers each GLSL line and appends the driver log.
///
/// Driver logs cite line numbers, so the numbered listing lets the two be
/// read side by side. Either input may be empty.
pub fn annotate_source(source: &str, log: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let digits = lines.len().max(1).to_string().len();

    let mut out = lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>digits$}: {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    if !log.is_empty() {
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str(log);
    }
    out
}

/// Compiles one shader stage, deleting the shader on failure.
#[allow(unsafe_code)]
pub fn compile_shader(
    gl: &glow::Context,
    stage: ShaderStage,
    source: &str,
) -> Result<glow::Shader, ShaderError> {
    use glow::HasContext;

    // SAFETY: glow exposes raw GL as unsafe. The stage enum maps to a valid
    // shader type and the handle is deleted on every failure path.
    unsafe {
        let shader = gl
            .create_shader(stage.gl_enum())
            .map_err(|log| ShaderError::Compile { stage, log })?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if gl.get_shader_compile_status(shader) {
            return Ok(shader);
        }
        let log = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);
        Err(ShaderError::Compile {
            stage,
            log: annotate_source(source, &log),
        })
    }
}

/// Compiles both stages and links them into a program.
///
/// The intermediate shader objects are released whatever the outcome.
#[allow(unsafe_code)]
pub fn build_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<glow::Program, ShaderError> {
    use glow::HasContext;

    let vertex = compile_shader(gl, ShaderStage::Vertex, vertex_src)?;
    let fragment = match compile_shader(gl, ShaderStage::Fragment, fragment_src) {
        Ok(shader) => shader,
        Err(err) => {
            // SAFETY: `vertex` came from a successful compile above.
            unsafe { gl.delete_shader(vertex) };
            return Err(err);
        }
    };

    // SAFETY: both shader handles are live; the program keeps its own copy
    // of the linked binary, so the shaders can be detached and deleted.
    let result = unsafe {
        match gl.create_program() {
            Ok(program) => {
                gl.attach_shader(program, vertex);
                gl.attach_shader(program, fragment);
                gl.link_program(program);
                gl.detach_shader(program, vertex);
                gl.detach_shader(program, fragment);

                if gl.get_program_link_status(program) {
                    Ok(program)
                } else {
                    let log = gl.get_program_info_log(program);
                    gl.delete_program(program);
                    Err(ShaderError::Link(log))
                }
            }
            Err(log) => Err(ShaderError::Link(log)),
        }
    };

    // SAFETY: see above.
    unsafe {
        gl.delete_shader(vertex);
        gl.delete_shader(fragment);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotate_source_numbers_lines_then_appends_log() {
        let out = annotate_source("#version 300 es\nvoid main() {}", "0:2: oops");
        assert_eq!(out, "1: #version 300 es\n2: void main() {}\n\n0:2: oops");
    }

    #[test]
    fn annotate_source_pads_line_numbers_to_widest() {
        let source = (1..=10).map(|i| format!("l{i}")).collect::<Vec<_>>().join("\n");
        let out = annotate_source(&source, "");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], " 1: l1");
        assert_eq!(lines[9], "10: l10");
    }

    #[test]
    fn annotate_source_with_only_log_returns_log() {
        assert_eq!(annotate_source("", "driver said no"), "driver said no");
    }

    #[test]
    fn annotate_source_with_nothing_is_empty() {
        assert!(annotate_source("", "").is_empty());
    }

    #[test]
    fn compile_error_names_the_stage() {
        let err = ShaderError::Compile {
            stage: ShaderStage::Fragment,
            log: "'u_k' undeclared".into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("fragment shader"), "got: {msg}");
        assert!(msg.contains("'u_k' undeclared"), "got: {msg}");
    }

    #[test]
    fn shader_error_becomes_backend_init() {
        let err: WaveError = ShaderError::Link("varying mismatch".into()).into();
        match err {
            WaveError::BackendInit(msg) => assert!(msg.contains("varying mismatch")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    #[ignore = "requires GL context"]
    fn build_program_links_wave_shaders() {
        // Would test: build_program(gl, VERTEX_SHADER, WAVE_FRAGMENT_SHADER) is Ok.
    }
}
