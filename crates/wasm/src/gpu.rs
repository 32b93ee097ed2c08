//! A canvas drawn by one of the WebGL2 wave programs.

use wavefront_core::render::{GpuContext, ProgramKind, WaveProgram};
use wavefront_core::{FrameUniforms, WaveError};

pub struct GpuCanvas {
    ctx: GpuContext,
    program: Option<WaveProgram>,
}

impl GpuCanvas {
    pub fn new(gl: glow::Context, kind: ProgramKind) -> Result<Self, WaveError> {
        let ctx = GpuContext::new(gl)?;
        let program = WaveProgram::new(ctx.gl(), kind)?;
        Ok(Self {
            ctx,
            program: Some(program),
        })
    }

    pub fn draw(&self, uniforms: &FrameUniforms) -> Result<(), WaveError> {
        match &self.program {
            Some(program) => program.draw(self.ctx.gl(), uniforms),
            None => Err(WaveError::BackendInit("program already released".into())),
        }
    }
}

impl Drop for GpuCanvas {
    fn drop(&mut self) {
        if let Some(program) = self.program.take() {
            program.delete(self.ctx.gl());
        }
    }
}
