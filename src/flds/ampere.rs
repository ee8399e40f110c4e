use crate::{
    error::{HybridError, Result},
    flds::field::VectorField,
    grid::{Direction, GridLayout},
};

/// J = curl B (mu0 = 1).
#[derive(Debug)]
pub struct Ampere<'a> {
    grid: &'a GridLayout,
}

impl<'a> Ampere<'a> {
    pub fn new(grid: &'a GridLayout) -> Self {
        Ampere { grid }
    }

    pub fn solve(&self, b: &VectorField, j: &mut VectorField) -> Result<()> {
        if self.grid.dimension() != 1 {
            return Err(HybridError::NotImplemented {
                what: "Ampere",
                dim: self.grid.dimension(),
            });
        }
        let x = Direction::X;
        let dx = self.grid.cell_size(x);

        for ix in self.grid.dual_dom_start(x)..=self.grid.dual_dom_end(x) {
            j.x[ix] = 0.0;
        }

        // By, Bz are dual so the difference of the two neighbours lands
        // on the primal node in between.
        for ix in self.grid.primal_dom_start(x)..=self.grid.primal_dom_end(x) {
            j.y[ix] = -(b.z[ix] - b.z[ix - 1]) / dx;
            j.z[ix] = (b.y[ix] - b.y[ix - 1]) / dx;
        }
        Ok(())
    }
}
