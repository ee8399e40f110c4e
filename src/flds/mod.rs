use crate::{error::Result, grid::GridLayout, grid::Quantity, Float};
use itertools::izip;

pub mod ampere;
pub mod faraday;
pub mod field;
pub mod ohm;

pub use crate::flds::ampere::Ampere;
pub use crate::flds::faraday::Faraday;
pub use crate::flds::field::{Field, VectorField};
pub use crate::flds::ohm::Ohm;

pub struct Flds {
    // The struct that holds all the fields.
    // First off is the state at the start of the step
    pub e: VectorField,
    pub b: VectorField,
    // then the predicted fields and their half-step averages
    pub e_new: VectorField,
    pub b_new: VectorField,
    pub e_avg: VectorField,
    pub b_avg: VectorField,
    // and what derives from them or from the particles
    pub j: VectorField,
    pub n: Field,
    pub v: VectorField,
}

impl Flds {
    pub fn new(grid: &GridLayout) -> Result<Flds> {
        Ok(Flds {
            e: VectorField::electric(grid)?,
            b: VectorField::magnetic(grid)?,
            e_new: VectorField::electric(grid)?,
            b_new: VectorField::magnetic(grid)?,
            e_avg: VectorField::electric(grid)?,
            b_avg: VectorField::magnetic(grid)?,
            j: VectorField::current(grid)?,
            n: Field::new(grid, Quantity::N)?,
            v: VectorField::velocity(grid)?,
        })
    }

    /// Makes the predicted fields the current ones. The previous buffers
    /// become scratch space for the next step.
    pub fn commit(&mut self) {
        std::mem::swap(&mut self.e, &mut self.e_new);
        std::mem::swap(&mut self.b, &mut self.b_new);
    }
}

#[inline(always)]
pub fn average_field(f1: &Field, f2: &Field, favg: &mut Field) {
    if !cfg!(feature = "unchecked") {
        assert_eq!(f1.len(), f2.len());
        assert_eq!(f1.len(), favg.len());
    }
    for (a, b, avg) in izip!(f1.iter(), f2.iter(), favg.iter_mut()) {
        *avg = 0.5 * (a + b);
    }
}

/// Component-wise half-sum over the whole buffer, ghosts included.
pub fn average(v1: &VectorField, v2: &VectorField, vavg: &mut VectorField) {
    average_field(&v1.x, &v2.x, &mut vavg.x);
    average_field(&v1.y, &v2.y, &mut vavg.y);
    average_field(&v1.z, &v2.z, &mut vavg.z);
}

/// Sets every node of `fld` along x, ghosts included, from its physical
/// coordinate.
pub fn set_from_profile<F>(grid: &GridLayout, fld: &mut Field, profile: F) -> Result<()>
where
    F: Fn(Float) -> Float,
{
    let qty = fld.quantity();
    for ix in 0..fld.len() {
        let x = grid.coordinate(crate::grid::Direction::X, qty, ix)?;
        fld[ix] = profile(x);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_test_grid, E_TOL};

    #[test]
    fn averaging() {
        let grid = build_test_grid();
        let mut e1 = VectorField::electric(&grid).unwrap();
        let mut e2 = VectorField::electric(&grid).unwrap();
        let mut avg = VectorField::electric(&grid).unwrap();
        for (i, (a, b)) in e1.y.iter_mut().zip(e2.y.iter_mut()).enumerate() {
            *a = i as Float;
            *b = 3.0 * i as Float;
        }
        e1.x.iter_mut().for_each(|x| *x = 1.0);
        average(&e1, &e2, &mut avg);
        for (i, v) in avg.y.iter().enumerate() {
            assert!((v - 2.0 * i as Float).abs() < E_TOL);
        }
        assert!(avg.x.iter().all(|&v| (v - 0.5).abs() < E_TOL));
        assert!(avg.z.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn commit_swaps_buffers() {
        let grid = build_test_grid();
        let mut flds = Flds::new(&grid).unwrap();
        flds.b_new.z.iter_mut().for_each(|x| *x = 4.0);
        flds.e_new.y.iter_mut().for_each(|x| *x = -1.0);
        flds.commit();
        assert!(flds.b.z.iter().all(|&v| v == 4.0));
        assert!(flds.e.y.iter().all(|&v| v == -1.0));
        assert!(flds.b_new.z.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn profile_uses_staggered_coordinates() {
        let grid = build_test_grid();
        let mut by = Field::new(&grid, Quantity::By).unwrap();
        let mut bx = Field::new(&grid, Quantity::Bx).unwrap();
        set_from_profile(&grid, &mut by, |x| x).unwrap();
        set_from_profile(&grid, &mut bx, |x| x).unwrap();
        // one ghost, unit cells
        assert!((by[1] - 0.5).abs() < E_TOL);
        assert!(bx[1].abs() < E_TOL);
    }
}
