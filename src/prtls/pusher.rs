use crate::{
    error::{HybridError, Result},
    flds::field::{Field, VectorField},
    grid::{Centering, Direction, GridLayout},
    prtls::Particle,
    Float,
};
use std::str::FromStr;

/// Advances particles over one step under given E and B.
pub trait Push {
    fn push(&self, particles: &mut [Particle], e: &VectorField, b: &VectorField) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PusherKind {
    Boris,
}

impl FromStr for PusherKind {
    type Err = HybridError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "boris" => Ok(PusherKind::Boris),
            _ => Err(HybridError::UnknownPusher(name.to_string())),
        }
    }
}

#[derive(Debug)]
pub enum Pusher<'a> {
    Boris(Boris<'a>),
}

impl<'a> Pusher<'a> {
    pub fn new(kind: PusherKind, grid: &'a GridLayout, dt: Float) -> Self {
        match kind {
            PusherKind::Boris => Pusher::Boris(Boris::new(grid, dt)),
        }
    }

    pub fn create(name: &str, grid: &'a GridLayout, dt: Float) -> Result<Self> {
        Ok(Pusher::new(name.parse()?, grid, dt))
    }

    pub fn kind(&self) -> PusherKind {
        match self {
            Pusher::Boris(_) => PusherKind::Boris,
        }
    }
}

impl Push for Pusher<'_> {
    fn push(&self, particles: &mut [Particle], e: &VectorField, b: &VectorField) -> Result<()> {
        match self {
            Pusher::Boris(boris) => boris.push(particles, e, b),
        }
    }
}

#[derive(Debug)]
pub struct Boris<'a> {
    grid: &'a GridLayout,
    dt: Float,
}

impl<'a> Boris<'a> {
    pub fn new(grid: &'a GridLayout, dt: Float) -> Self {
        Boris { grid, dt }
    }

    /// Linear interpolation of `fld` at fractional dual index `icell + r`.
    /// Primal nodes sit on integer indices, dual nodes half an index to the
    /// right, so dual values come from whichever pair brackets the point.
    #[inline(always)]
    fn interpolate(fld: &Field, icell: usize, r: Float, position: Float) -> Result<Float> {
        let at = |i: usize| {
            fld.as_slice()
                .get(i)
                .copied()
                .ok_or(HybridError::OutsideStencil { position })
        };
        match fld.centering(Direction::X) {
            Centering::Primal => Ok(at(icell)? * (1.0 - r) + at(icell + 1)? * r),
            Centering::Dual => {
                // weights follow the true node positions, (i - 1/2, i + 1/2)
                // in dual index space, rather than reusing the primal pair
                if r < 0.5 {
                    if icell == 0 {
                        return Err(HybridError::OutsideStencil { position });
                    }
                    Ok(at(icell - 1)? * (0.5 - r) + at(icell)? * (0.5 + r))
                } else {
                    Ok(at(icell)? * (1.5 - r) + at(icell + 1)? * (r - 0.5))
                }
            }
        }
    }
}

impl Push for Boris<'_> {
    fn push(&self, particles: &mut [Particle], e: &VectorField, b: &VectorField) -> Result<()> {
        if self.grid.dimension() != 1 {
            return Err(HybridError::NotImplemented {
                what: "Boris pusher",
                dim: self.grid.dimension(),
            });
        }
        let dt = self.dt;
        let dx = self.grid.cell_size(Direction::X);
        let first = self.grid.dual_dom_start(Direction::X) as Float;

        for prtl in particles.iter_mut() {
            let x_half = prtl.position[0] + 0.5 * dt * prtl.velocity[0];

            let icell_float = x_half / dx + first;
            if icell_float < 0.0 {
                return Err(HybridError::OutsideStencil { position: x_half });
            }
            let icell = icell_float.floor() as usize;
            let r = icell_float - icell_float.floor();

            let mut e_p = [0.0; 3];
            for (val, fld) in e_p.iter_mut().zip(e.components().iter()) {
                *val = Boris::interpolate(fld, icell, r, x_half)?;
            }
            let mut b_p = [0.0; 3];
            for (val, fld) in b_p.iter_mut().zip(b.components().iter()) {
                *val = Boris::interpolate(fld, icell, r, x_half)?;
            }

            let qdt_2m = prtl.charge * dt * 0.5 / prtl.mass;

            // first half electric kick
            let mut v_minus = prtl.velocity;
            for (v, ep) in v_minus.iter_mut().zip(e_p.iter()) {
                *v += qdt_2m * ep;
            }

            // rotation
            let t = [qdt_2m * b_p[0], qdt_2m * b_p[1], qdt_2m * b_p[2]];
            let t_sq = t[0] * t[0] + t[1] * t[1] + t[2] * t[2];
            let s = [
                2.0 * t[0] / (1.0 + t_sq),
                2.0 * t[1] / (1.0 + t_sq),
                2.0 * t[2] / (1.0 + t_sq),
            ];
            let v_prime = add(v_minus, cross(v_minus, t));
            let v_plus = add(v_minus, cross(v_prime, s));

            // second half electric kick
            for (v, (vp, ep)) in prtl
                .velocity
                .iter_mut()
                .zip(v_plus.iter().zip(e_p.iter()))
            {
                *v = vp + qdt_2m * ep;
            }

            prtl.position[0] = x_half + 0.5 * dt * prtl.velocity[0];
        }
        Ok(())
    }
}

#[inline(always)]
fn cross(a: [Float; 3], b: [Float; 3]) -> [Float; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline(always)]
fn add(a: [Float; 3], b: [Float; 3]) -> [Float; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}
