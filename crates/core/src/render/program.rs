//! WebGL2 programs for the animated wavefront and the steady-state gain map.
//!
//! Both fragment shaders are fixed GLSL. All inputs, including the source
//! list, arrive as uniforms each frame; nothing is spliced into the program
//! text. Both skip terms closer than
//! [`SINGULARITY_RADIUS`](crate::evaluator::SINGULARITY_RADIUS), like the
//! CPU evaluator.

use crate::color::GainColorScale;
use crate::error::WaveError;
use crate::simulation::FrameUniforms;

use super::shader::build_program;

/// Number of source slots in the fragment-shader uniform array.
pub const MAX_SOURCES: usize = 64;

/// Fullscreen triangle generated from `gl_VertexID`; draw 3 vertices with
/// an empty vertex array bound.
pub const VERTEX_SHADER: &str = r#"#version 300 es
void main() {
    vec2 corner = vec2((gl_VertexID << 1) & 2, gl_VertexID & 2);
    gl_Position = vec4(corner * 2.0 - 1.0, 0.0, 1.0);
}
"#;

/// Instantaneous superposition mapped to grayscale around mid-gray.
pub const WAVE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

uniform vec3 u_sources[64];
uniform int u_source_count;
uniform float u_view_width;
uniform float u_canvas_width;
uniform float u_canvas_height;
uniform float u_t;
uniform float u_a;
uniform float u_k;
uniform float u_omega;

out vec4 frag_color;

void main() {
    // gl_FragCoord starts at the bottom-left pixel center
    float px = gl_FragCoord.x - 0.5;
    float py = u_canvas_height - gl_FragCoord.y - 0.5;
    vec2 p = vec2(px, u_canvas_height * 0.5 - py) / u_canvas_width * u_view_width;

    float sum = 0.0;
    for (int i = 0; i < 64; ++i) {
        if (i >= u_source_count) {
            break;
        }
        vec3 s = u_sources[i];
        float d = distance(p, s.xy);
        if (d <= 1e-9) {
            continue;
        }
        float phase = u_omega * u_t - u_k * d + s.z;
        if (phase < 0.0) {
            continue;
        }
        sum += u_a / d * cos(phase);
    }

    float v = clamp(sum * 0.5 + 0.5, 0.0, 1.0);
    frag_color = vec4(v, v, v, 1.0);
}
"#;

/// Steady-state magnitude in decibels on the red/blue gain scale.
pub const GAIN_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

uniform vec3 u_sources[64];
uniform int u_source_count;
uniform float u_view_width;
uniform float u_canvas_width;
uniform float u_canvas_height;
uniform float u_a;
uniform float u_k;
uniform vec2 u_gain_range;
uniform vec2 u_red;
uniform vec2 u_blue;
uniform float u_green;

out vec4 frag_color;

void main() {
    float px = gl_FragCoord.x - 0.5;
    float py = u_canvas_height - gl_FragCoord.y - 0.5;
    vec2 p = vec2(px, u_canvas_height * 0.5 - py) / u_canvas_width * u_view_width;

    vec2 sum = vec2(0.0);
    for (int i = 0; i < 64; ++i) {
        if (i >= u_source_count) {
            break;
        }
        vec3 s = u_sources[i];
        float d = distance(p, s.xy);
        if (d <= 1e-9) {
            continue;
        }
        float phase = -u_k * d + s.z;
        sum += u_a / d * vec2(cos(phase), sin(phase));
    }

    float magnitude = max(length(sum), 1e-30);
    float db = clamp(20.0 * log(magnitude) / log(10.0), u_gain_range.x, u_gain_range.y);
    float ratio = (db - u_gain_range.x) / max(u_gain_range.y - u_gain_range.x, 1e-6);
    frag_color = vec4(
        mix(u_red.x, u_red.y, ratio),
        u_green,
        mix(u_blue.x, u_blue.y, ratio),
        1.0);
}
"#;

/// Which of the two programs to build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgramKind {
    Wave,
    Gain(GainColorScale),
}

impl ProgramKind {
    pub fn fragment_source(&self) -> &'static str {
        match self {
            ProgramKind::Wave => WAVE_FRAGMENT_SHADER,
            ProgramKind::Gain(_) => GAIN_FRAGMENT_SHADER,
        }
    }
}

/// Rejects source lists that do not fit the uniform array.
pub fn check_source_count(count: usize) -> Result<(), WaveError> {
    if count > MAX_SOURCES {
        return Err(WaveError::invalid_parameter(
            "count",
            format!("the GPU programs hold at most {MAX_SOURCES} sources, got {count}"),
        ));
    }
    Ok(())
}

struct UniformLocations {
    sources: Option<glow::UniformLocation>,
    source_count: Option<glow::UniformLocation>,
    view_width: Option<glow::UniformLocation>,
    canvas_width: Option<glow::UniformLocation>,
    canvas_height: Option<glow::UniformLocation>,
    t: Option<glow::UniformLocation>,
    a: Option<glow::UniformLocation>,
    k: Option<glow::UniformLocation>,
    omega: Option<glow::UniformLocation>,
    gain_range: Option<glow::UniformLocation>,
    red: Option<glow::UniformLocation>,
    blue: Option<glow::UniformLocation>,
    green: Option<glow::UniformLocation>,
}

impl UniformLocations {
    #[allow(unsafe_code)]
    fn lookup(gl: &glow::Context, program: glow::Program) -> Self {
        use glow::HasContext;

        // SAFETY: `program` is a freshly linked program. Names the driver
        // optimized away come back as None and their uploads are skipped.
        let find = |name: &str| unsafe { gl.get_uniform_location(program, name) };
        Self {
            sources: find("u_sources"),
            source_count: find("u_source_count"),
            view_width: find("u_view_width"),
            canvas_width: find("u_canvas_width"),
            canvas_height: find("u_canvas_height"),
            t: find("u_t"),
            a: find("u_a"),
            k: find("u_k"),
            omega: find("u_omega"),
            gain_range: find("u_gain_range"),
            red: find("u_red"),
            blue: find("u_blue"),
            green: find("u_green"),
        }
    }
}

/// A linked wave or gain program plus the empty vertex array it draws with.
pub struct WaveProgram {
    kind: ProgramKind,
    program: glow::Program,
    vertex_array: glow::VertexArray,
    locations: UniformLocations,
}

impl WaveProgram {
    /// Compiles and links the program for `kind`.
    ///
    /// # Errors
    ///
    /// `WaveError::BackendInit` on compile, link, or allocation failure.
    #[allow(unsafe_code)]
    pub fn new(gl: &glow::Context, kind: ProgramKind) -> Result<Self, WaveError> {
        use glow::HasContext;

        let program = build_program(gl, VERTEX_SHADER, kind.fragment_source())?;

        // SAFETY: creating a vertex array has no preconditions; the program
        // is released if it fails.
        let vertex_array = match unsafe { gl.create_vertex_array() } {
            Ok(vao) => vao,
            Err(msg) => {
                unsafe { gl.delete_program(program) };
                return Err(WaveError::BackendInit(msg));
            }
        };

        let locations = UniformLocations::lookup(gl, program);
        tracing::debug!(?kind, "wave program linked");
        Ok(Self {
            kind,
            program,
            vertex_array,
            locations,
        })
    }

    pub fn kind(&self) -> ProgramKind {
        self.kind
    }

    /// Uploads `uniforms` and draws one frame into the bound framebuffer.
    ///
    /// # Errors
    ///
    /// `WaveError::InvalidParameter` if there are more than [`MAX_SOURCES`]
    /// sources; nothing is drawn in that case.
    #[allow(unsafe_code)]
    pub fn draw(&self, gl: &glow::Context, uniforms: &FrameUniforms) -> Result<(), WaveError> {
        use glow::HasContext;

        check_source_count(uniforms.source_count)?;
        let loc = &self.locations;

        // SAFETY: the program and vertex array are live handles owned by
        // self, and every upload matches the declared GLSL type.
        unsafe {
            gl.use_program(Some(self.program));
            gl.viewport(
                0,
                0,
                uniforms.canvas_width as i32,
                uniforms.canvas_height as i32,
            );

            if uniforms.source_count > 0 {
                gl.uniform_3_f32_slice(loc.sources.as_ref(), &uniforms.sources);
            }
            gl.uniform_1_i32(loc.source_count.as_ref(), uniforms.source_count as i32);
            gl.uniform_1_f32(loc.view_width.as_ref(), uniforms.view_width);
            gl.uniform_1_f32(loc.canvas_width.as_ref(), uniforms.canvas_width);
            gl.uniform_1_f32(loc.canvas_height.as_ref(), uniforms.canvas_height);
            gl.uniform_1_f32(loc.a.as_ref(), uniforms.amplitude);
            gl.uniform_1_f32(loc.k.as_ref(), uniforms.wavenumber);

            match self.kind {
                ProgramKind::Wave => {
                    gl.uniform_1_f32(loc.t.as_ref(), uniforms.time);
                    gl.uniform_1_f32(loc.omega.as_ref(), uniforms.angular_frequency);
                }
                ProgramKind::Gain(scale) => {
                    gl.uniform_2_f32(
                        loc.gain_range.as_ref(),
                        scale.min_gain_db as f32,
                        scale.max_gain_db as f32,
                    );
                    gl.uniform_2_f32(
                        loc.red.as_ref(),
                        unit(scale.min_red),
                        unit(scale.max_red),
                    );
                    gl.uniform_2_f32(
                        loc.blue.as_ref(),
                        unit(scale.min_blue),
                        unit(scale.max_blue),
                    );
                    gl.uniform_1_f32(loc.green.as_ref(), unit(scale.green));
                }
            }

            gl.bind_vertex_array(Some(self.vertex_array));
            gl.draw_arrays(glow::TRIANGLES, 0, 3);
            gl.bind_vertex_array(None);
        }

        tracing::trace!(kind = ?self.kind, time = uniforms.time, "frame drawn");
        Ok(())
    }

    /// Releases the GL objects.
    #[allow(unsafe_code)]
    pub fn delete(self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: both handles are owned by self and not used afterwards.
        unsafe {
            gl.delete_vertex_array(self.vertex_array);
            gl.delete_program(self.program);
        }
    }
}

fn unit(channel: u8) -> f32 {
    channel as f32 / 255.0
}
