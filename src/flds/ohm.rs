use crate::{
    error::{HybridError, Result},
    flds::field::{Field, VectorField},
    grid::{Direction, GridLayout},
    Float,
};

/// Generalized Ohm's law for massless electrons:
///
/// E = -V x B + (J x B) / N + eta J
///
/// The ideal and Hall terms follow the ion bulk velocity and the current;
/// `eta` is a plain resistivity and defaults to zero. Electron pressure is
/// not modelled. Density must be strictly positive wherever E is
/// computed, the floor lives in the moments.
#[derive(Debug)]
pub struct Ohm<'a> {
    grid: &'a GridLayout,
    resistivity: Float,
}

impl<'a> Ohm<'a> {
    pub fn new(grid: &'a GridLayout) -> Self {
        Ohm {
            grid,
            resistivity: 0.0,
        }
    }

    pub fn with_resistivity(grid: &'a GridLayout, resistivity: Float) -> Self {
        Ohm { grid, resistivity }
    }

    pub fn solve(
        &self,
        b: &VectorField,
        j: &VectorField,
        n: &Field,
        v: &VectorField,
        e_new: &mut VectorField,
    ) -> Result<()> {
        if self.grid.dimension() != 1 {
            return Err(HybridError::NotImplemented {
                what: "Ohm",
                dim: self.grid.dimension(),
            });
        }
        let x = Direction::X;
        let eta = self.resistivity;

        // Ex is dual, moments and Jy, Jz are primal: average nodes ix, ix+1
        for ix in self.grid.dual_dom_start(x)..=self.grid.dual_dom_end(x) {
            let vy = 0.5 * (v.y[ix] + v.y[ix + 1]);
            let vz = 0.5 * (v.z[ix] + v.z[ix + 1]);
            let dens = 0.5 * (n[ix] + n[ix + 1]);
            let jy = 0.5 * (j.y[ix] + j.y[ix + 1]);
            let jz = 0.5 * (j.z[ix] + j.z[ix + 1]);

            let ideal = -(vy * b.z[ix] - vz * b.y[ix]);
            let hall = (jy * b.z[ix] - jz * b.y[ix]) / dens;

            e_new.x[ix] = ideal + hall + eta * j.x[ix];
        }

        // Ey, Ez are primal, Jx, By, Bz are dual: average nodes ix-1, ix
        for ix in self.grid.primal_dom_start(x)..=self.grid.primal_dom_end(x) {
            let jx = 0.5 * (j.x[ix - 1] + j.x[ix]);
            let by = 0.5 * (b.y[ix - 1] + b.y[ix]);
            let bz = 0.5 * (b.z[ix - 1] + b.z[ix]);
            let bx = b.x[ix];
            let dens = n[ix];

            let ideal_y = -(v.z[ix] * bx - v.x[ix] * bz);
            let hall_y = (j.z[ix] * bx - jx * bz) / dens;

            let ideal_z = -(v.x[ix] * by - v.y[ix] * bx);
            let hall_z = (jx * by - j.y[ix] * bx) / dens;

            e_new.y[ix] = ideal_y + hall_y + eta * j.y[ix];
            e_new.z[ix] = ideal_z + hall_z + eta * j.z[ix];
        }
        Ok(())
    }
}
