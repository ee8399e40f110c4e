use crate::{
    error::{HybridError, Result},
    flds::field::VectorField,
    grid::{Direction, GridLayout},
    Float,
};

/// dB/dt = -curl E, explicit over one step of `dt`.
#[derive(Debug)]
pub struct Faraday<'a> {
    grid: &'a GridLayout,
    dt: Float,
}

impl<'a> Faraday<'a> {
    pub fn new(grid: &'a GridLayout, dt: Float) -> Self {
        Faraday { grid, dt }
    }

    /// Writes `b + dt * dB/dt` into `b_new`. `b` itself is left alone so the
    /// integrator can keep the start-of-step field.
    pub fn solve(&self, e: &VectorField, b: &VectorField, b_new: &mut VectorField) -> Result<()> {
        if self.grid.dimension() != 1 {
            return Err(HybridError::NotImplemented {
                what: "Faraday",
                dim: self.grid.dimension(),
            });
        }
        let x = Direction::X;
        let dt_dx = self.dt / self.grid.cell_size(x);

        // only cross derivatives drive Bx, none survive in 1D
        for ix in self.grid.primal_dom_start(x)..=self.grid.primal_dom_end(x) {
            b_new.x[ix] = b.x[ix];
        }

        for ix in self.grid.dual_dom_start(x)..=self.grid.dual_dom_end(x) {
            b_new.y[ix] = b.y[ix] + dt_dx * (e.z[ix + 1] - e.z[ix]);
            b_new.z[ix] = b.z[ix] - dt_dx * (e.y[ix + 1] - e.y[ix]);
        }
        Ok(())
    }
}
