use crate::{
    error::{HybridError, Result},
    flds::field::{Field, VectorField},
    grid::{Direction, GridLayout, Quantity},
    Float, PI,
};
use itertools::izip;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::Deserialize;

pub mod pusher;

pub use crate::prtls::pusher::{Boris, Push, Pusher, PusherKind};

/// One macro-particle. Only `position[0]` moves in 1D but the velocity is
/// always three dimensional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: [Float; 3],
    pub velocity: [Float; 3],
    pub weight: Float,
    pub mass: Float,
    pub charge: Float,
}

impl Particle {
    /// A unit proton at rest at `x`.
    pub fn at(x: Float) -> Particle {
        Particle {
            position: [x, 0.0, 0.0],
            velocity: [0.0; 3],
            weight: 1.0,
            mass: 1.0,
            charge: 1.0,
        }
    }
}

/// Number density of a species as a function of position along x.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DensityProfile {
    Uniform { n0: Float },
    /// `n0 * (1 + amplitude * cos(2 pi mode x / L))`
    Cosine {
        n0: Float,
        amplitude: Float,
        mode: u32,
    },
}

impl DensityProfile {
    pub fn density(&self, x: Float, dom_size: Float) -> Float {
        match *self {
            DensityProfile::Uniform { n0 } => n0,
            DensityProfile::Cosine { n0, amplitude, mode } => {
                let k = 2.0 * PI * mode as Float / dom_size;
                n0 * (1.0 + amplitude * (k * x).cos())
            }
        }
    }

    /// Smallest value the profile takes anywhere in the domain.
    pub fn min_density(&self) -> Float {
        match *self {
            DensityProfile::Uniform { n0 } => n0,
            DensityProfile::Cosine { n0, amplitude, .. } => n0 * (1.0 - amplitude.abs()),
        }
    }
}

/// A named ion species: its macro-particles and the moments they deposit.
pub struct Population<'a> {
    name: String,
    grid: &'a GridLayout,
    flux: VectorField,
    density: Field,
    particles: Vec<Particle>,
}

impl<'a> Population<'a> {
    pub fn new(name: &str, grid: &'a GridLayout) -> Result<Population<'a>> {
        Ok(Population {
            name: name.to_string(),
            grid,
            flux: VectorField::velocity(grid)?,
            density: Field::new(grid, Quantity::N)?,
            particles: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.particles
    }

    pub fn density(&self) -> &Field {
        &self.density
    }

    pub fn density_mut(&mut self) -> &mut Field {
        &mut self.density
    }

    pub fn flux(&self) -> &VectorField {
        &self.flux
    }

    pub fn flux_mut(&mut self) -> &mut VectorField {
        &mut self.flux
    }

    /// Fills every dual cell of the domain with `nppc` evenly spaced
    /// particles, weighted so they carry the profile density at the cell
    /// centre, with a drifting Maxwellian velocity.
    #[allow(clippy::too_many_arguments)]
    pub fn load_particles<R: Rng>(
        &mut self,
        nppc: usize,
        profile: &DensityProfile,
        vth: [Float; 3],
        drift: [Float; 3],
        mass: Float,
        charge: Float,
        rng: &mut R,
    ) -> Result<()> {
        if self.grid.dimension() != 1 {
            return Err(HybridError::NotImplemented {
                what: "particle loading",
                dim: self.grid.dimension(),
            });
        }
        let x = Direction::X;
        let dx = self.grid.cell_size(x);
        let dom_size = self.grid.dom_size(x);
        let first = self.grid.dual_dom_start(x);
        let last = self.grid.dual_dom_end(x);

        self.particles.reserve(nppc * self.grid.nbr_cells(x));
        for icell in first..=last {
            let left_edge = (icell - first) as Float * dx;
            let centre = self.grid.cell_coordinate(x, icell);
            let weight = profile.density(centre, dom_size) / nppc as Float;
            for k in 0..nppc {
                let offset = (2 * k + 1) as Float / (2 * nppc) as Float;
                let mut velocity = [0.0; 3];
                for (v, &u, &sigma) in izip!(velocity.iter_mut(), drift.iter(), vth.iter()) {
                    let r: Float = rng.sample(StandardNormal);
                    *v = u + sigma * r;
                }
                self.particles.push(Particle {
                    position: [left_edge + offset * dx, 0.0, 0.0],
                    velocity,
                    weight,
                    mass,
                    charge,
                });
            }
        }
        Ok(())
    }

    /// Linear (cloud in cell) deposit of density and flux. Both buffers are
    /// zeroed first, ghosts are left for the boundary fill.
    pub fn deposit(&mut self) -> Result<()> {
        if self.grid.dimension() != 1 {
            return Err(HybridError::NotImplemented {
                what: "deposit",
                dim: self.grid.dimension(),
            });
        }
        self.density.zero();
        self.flux.zero();

        let x = Direction::X;
        let dx = self.grid.cell_size(x);
        let dom_size = self.grid.dom_size(x);
        let first = self.grid.dual_dom_start(x);
        let last = self.grid.dual_dom_end(x);

        let density = &mut self.density;
        let flux = &mut self.flux;
        for prtl in self.particles.iter() {
            let mut pos = prtl.position[0].rem_euclid(dom_size);
            // rem_euclid can round up onto the domain size
            if pos >= dom_size {
                pos = 0.0;
            }
            let s = pos / dx;
            let i0 = s.floor();
            let w1 = s - i0;
            let w0 = 1.0 - w1;

            let left = i0 as usize + first;
            let right = if left + 1 > last { first } else { left + 1 };

            density[left] += prtl.weight * w0;
            density[right] += prtl.weight * w1;

            for (fld, &v) in flux.components_mut().iter_mut().zip(prtl.velocity.iter()) {
                fld[left] += prtl.weight * v * w0;
                fld[right] += prtl.weight * v * w1;
            }
        }
        Ok(())
    }
}
