//! The `View` trait that every rendered view of the simulation implements.
//!
//! The trait is object-safe so the animated wavefront view and the gain map
//! can be held as `dyn View` and switched at runtime.

use crate::color::ColorMapper;
use crate::error::WaveError;
use crate::field::Field;
use crate::simulation::SimulationContext;

/// A view that evaluates the field over its whole pixel grid.
///
/// One call to [`View::render`] is one evaluation pass. On error the view
/// keeps the field from its last successful pass.
pub trait View {
    /// Short, stable identifier (`"wave"`, `"gain"`).
    fn name(&self) -> &'static str;

    /// Re-evaluates every pixel for the context's current sources and time.
    fn render(&mut self, ctx: &SimulationContext) -> Result<(), WaveError>;

    /// Display values from the last successful pass.
    fn field(&self) -> &Field;

    /// How display values become colors.
    fn mapper(&self) -> ColorMapper;

    /// Whether the output depends on simulation time.
    ///
    /// Time-independent views only need re-rendering after a restart.
    fn is_animated(&self) -> bool {
        true
    }
}
