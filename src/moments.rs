use crate::{
    flds::field::{Field, VectorField},
    prtls::Population,
    Float,
};
use itertools::izip;

/// Lower bound on the density used to turn flux into bulk velocity, so
/// empty cells give a zero velocity instead of a NaN.
pub const DENSITY_FLOOR: Float = 1e-12;

/// Sum of the species densities over the whole buffer.
pub fn total_density(populations: &[Population], n: &mut Field) {
    n.zero();
    for pop in populations.iter() {
        if !cfg!(feature = "unchecked") {
            assert_eq!(pop.density().len(), n.len());
        }
        for (tot, dens) in n.iter_mut().zip(pop.density().iter()) {
            *tot += dens;
        }
    }
}

/// Sum of the species fluxes divided by the floored total density `n`,
/// which must already be up to date.
pub fn bulk_velocity(populations: &[Population], n: &Field, v: &mut VectorField) {
    v.zero();
    for pop in populations.iter() {
        for (vel, flux) in v.components_mut().iter_mut().zip(pop.flux().components().iter()) {
            for (tot, f) in vel.iter_mut().zip(flux.iter()) {
                *tot += f;
            }
        }
    }
    for vel in v.components_mut().iter_mut() {
        for (vi, ni) in izip!(vel.iter_mut(), n.iter()) {
            *vi /= ni.max(DENSITY_FLOOR);
        }
    }
}

/// Refreshes `n` then `v` from the populations.
pub fn compute_moments(populations: &[Population], n: &mut Field, v: &mut VectorField) {
    total_density(populations, n);
    bulk_velocity(populations, n, v);
}
