use crate::{
    error::{HybridError, Result},
    flds::field::{Field, VectorField},
    grid::{Direction, GridLayout, Quantity},
    prtls::Particle,
};
use std::str::FromStr;

/// What a boundary policy must be able to do: fill the ghost nodes of a
/// field from its domain values, and bring particles that left the
/// domain back into it.
pub trait Boundary {
    fn fill(&self, field: &mut Field) -> Result<()>;

    fn fill_vector(&self, vecfield: &mut VectorField) -> Result<()> {
        self.fill(&mut vecfield.x)?;
        self.fill(&mut vecfield.y)?;
        self.fill(&mut vecfield.z)
    }

    fn particles(&self, particles: &mut [Particle]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    Periodic,
}

impl FromStr for BoundaryKind {
    type Err = HybridError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "periodic" => Ok(BoundaryKind::Periodic),
            _ => Err(HybridError::UnknownBoundary(name.to_string())),
        }
    }
}

/// Closed set of boundary policies.
#[derive(Debug)]
pub enum BoundaryCondition<'a> {
    Periodic(Periodic<'a>),
}

impl<'a> BoundaryCondition<'a> {
    pub fn new(kind: BoundaryKind, grid: &'a GridLayout) -> Self {
        match kind {
            BoundaryKind::Periodic => BoundaryCondition::Periodic(Periodic { grid }),
        }
    }

    /// Factory keyed by the configuration name. Unknown names are fatal.
    pub fn create(name: &str, grid: &'a GridLayout) -> Result<Self> {
        Ok(BoundaryCondition::new(name.parse()?, grid))
    }

    pub fn kind(&self) -> BoundaryKind {
        match self {
            BoundaryCondition::Periodic(_) => BoundaryKind::Periodic,
        }
    }
}

impl Boundary for BoundaryCondition<'_> {
    fn fill(&self, field: &mut Field) -> Result<()> {
        match self {
            BoundaryCondition::Periodic(bc) => bc.fill(field),
        }
    }

    fn particles(&self, particles: &mut [Particle]) -> Result<()> {
        match self {
            BoundaryCondition::Periodic(bc) => bc.particles(particles),
        }
    }
}

#[derive(Debug)]
pub struct Periodic<'a> {
    grid: &'a GridLayout,
}

impl Periodic<'_> {
    /// Moments are deposited, so their ghost nodes hold contributions that
    /// belong to the other side of the domain.
    fn is_deposited(qty: Quantity) -> bool {
        matches!(
            qty,
            Quantity::N | Quantity::Vx | Quantity::Vy | Quantity::Vz
        )
    }

    fn check_dimension(&self) -> Result<()> {
        match self.grid.dimension() {
            1 => Ok(()),
            dim => Err(HybridError::NotImplemented {
                what: "periodic boundary",
                dim,
            }),
        }
    }

    /// Ghosts and the first domain node take the value `nbr_cells` away
    /// added in; the last primal node is then the first one again.
    fn deposit_ghosts(&self, field: &mut Field) -> Result<()> {
        let qty = field.quantity();
        let x = Direction::X;
        let gsi = self.grid.ghost_start(qty, x);
        let dsi = self.grid.dom_start(qty, x)?;
        let dei = self.grid.dom_end(qty, x)?;
        let gei = self.grid.ghost_end(qty, x)?;
        let nbr_nodes = self.grid.nbr_cells(x);

        for ix_left in gsi..=dsi {
            let ix_right = ix_left + nbr_nodes;
            field[ix_left] += field[ix_right];
        }
        for ix_right in (dei + 1..=gei).rev() {
            let ix_left = ix_right - nbr_nodes;
            field[ix_right] += field[ix_left];
        }
        field[dei] = field[dsi];
        Ok(())
    }

    fn update_ghosts(&self, field: &mut Field) -> Result<()> {
        let qty = field.quantity();
        let x = Direction::X;
        let gsi = self.grid.ghost_start(qty, x);
        let dsi = self.grid.dom_start(qty, x)?;
        let dei = self.grid.dom_end(qty, x)?;
        let gei = self.grid.ghost_end(qty, x)?;
        let nbr_nodes = self.grid.nbr_cells(x);

        for ix_left in gsi..dsi {
            field[ix_left] = field[ix_left + nbr_nodes];
        }
        for ix_right in (dei + 1..=gei).rev() {
            field[ix_right] = field[ix_right - nbr_nodes];
        }
        Ok(())
    }
}

impl Boundary for Periodic<'_> {
    fn fill(&self, field: &mut Field) -> Result<()> {
        self.check_dimension()?;
        if Periodic::is_deposited(field.quantity()) {
            self.deposit_ghosts(field)
        } else {
            self.update_ghosts(field)
        }
    }

    fn particles(&self, particles: &mut [Particle]) -> Result<()> {
        self.check_dimension()?;
        let dom_size = self.grid.dom_size(Direction::X);

        for prtl in particles.iter_mut() {
            let position_before = prtl.position[0];

            // left through the right border, comes back on the left, and
            // the other way round
            if position_before >= dom_size {
                prtl.position[0] -= dom_size;
            } else if position_before < 0.0 {
                prtl.position[0] += dom_size;
                // a tiny negative position rounds onto the right border
                if prtl.position[0] == dom_size {
                    prtl.position[0] = 0.0;
                }
            }

            if prtl.position[0] < 0.0 || prtl.position[0] >= dom_size {
                return Err(HybridError::ParticleOutOfDomain {
                    position: prtl.position[0],
                    position_before,
                    dom_size,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_test_grid, Float, E_TOL};

    fn periodic(grid: &GridLayout) -> BoundaryCondition<'_> {
        BoundaryCondition::create("periodic", grid).unwrap()
    }

    fn ramp(grid: &GridLayout, qty: Quantity) -> Field {
        let mut fld = Field::new(grid, qty).unwrap();
        for (i, v) in fld.iter_mut().enumerate() {
            *v = 1.0 + i as Float;
        }
        fld
    }

    #[test]
    fn factory() {
        let grid = build_test_grid();
        assert_eq!(periodic(&grid).kind(), BoundaryKind::Periodic);
        match BoundaryCondition::create("reflecting", &grid) {
            Err(HybridError::UnknownBoundary(name)) => assert_eq!(name, "reflecting"),
            other => panic!("expected unknown boundary, got {:?}", other),
        }
    }

    #[test]
    fn copy_wrap_dual() {
        // 10 cells, 1 ghost: dual nodes 0..=11, domain 1..=10
        let grid = build_test_grid();
        let bc = periodic(&grid);
        let mut fld = ramp(&grid, Quantity::Ex);
        bc.fill(&mut fld).unwrap();
        assert_eq!(fld[0], fld[10]);
        assert_eq!(fld[11], fld[1]);
        for i in 1..=10 {
            assert_eq!(fld[i], 1.0 + i as Float);
        }
    }

    #[test]
    fn copy_wrap_primal() {
        // primal nodes 0..=12, domain 1..=11
        let grid = build_test_grid();
        let bc = periodic(&grid);
        let mut fld = ramp(&grid, Quantity::Ey);
        bc.fill(&mut fld).unwrap();
        assert_eq!(fld[0], 11.0);
        assert_eq!(fld[12], 3.0);
        // domain untouched, including the duplicated edge node
        assert_eq!(fld[11], 12.0);
    }

    #[test]
    fn copy_wrap_is_idempotent() {
        let grid = GridLayout::new(vec![16], vec![0.25], 2).unwrap();
        let bc = periodic(&grid);
        for &qty in [Quantity::Ex, Quantity::Ey, Quantity::By, Quantity::Jz].iter() {
            let mut fld = ramp(&grid, qty);
            bc.fill(&mut fld).unwrap();
            let once: Vec<Float> = fld.iter().cloned().collect();
            bc.fill(&mut fld).unwrap();
            for (v, expected_v) in fld.iter().zip(once.iter()) {
                assert_eq!(v, expected_v);
            }
        }
    }

    #[test]
    fn additive_wrap() {
        let grid = build_test_grid();
        let bc = periodic(&grid);
        let mut fld = Field::new(&grid, Quantity::N).unwrap();
        // deposit only touches the dual domain range
        for i in 1..=10 {
            fld[i] = i as Float;
        }
        fld[11] = 0.5;
        bc.fill(&mut fld).unwrap();

        assert!((fld[0] - 10.0).abs() < E_TOL);
        // first node collects the contribution of its periodic twin
        assert!((fld[1] - 1.5).abs() < E_TOL);
        assert!((fld[11] - fld[1]).abs() < E_TOL);
        assert!((fld[12] - 2.0).abs() < E_TOL);
    }

    #[test]
    fn particle_wrap() {
        let grid = build_test_grid();
        let bc = periodic(&grid);
        let dom_size = grid.dom_size(Direction::X);
        let mut prtls = vec![
            Particle::at(dom_size + 0.3),
            Particle::at(-0.2),
            Particle::at(4.5),
        ];
        bc.particles(&mut prtls).unwrap();
        assert!((prtls[0].position[0] - 0.3).abs() < E_TOL);
        assert!((prtls[1].position[0] - (dom_size - 0.2)).abs() < E_TOL);
        assert!((prtls[2].position[0] - 4.5).abs() < E_TOL);
    }

    #[test]
    fn particle_wrap_needs_one_correction() {
        let grid = build_test_grid();
        let bc = periodic(&grid);
        let dom_size = grid.dom_size(Direction::X);
        let mut prtls = vec![Particle::at(2.0 * dom_size + 0.1)];
        match bc.particles(&mut prtls) {
            Err(HybridError::ParticleOutOfDomain { .. }) => {}
            other => panic!("expected out of domain, got {:?}", other),
        }
    }

    #[cfg(feature = "dprec")]
    #[test]
    fn particle_wrap_inside_the_last_cell() {
        // 3.4999999999999996 / 0.7 rounds up to the cell count but the
        // particle is still inside
        let grid = GridLayout::new(vec![5], vec![0.7], 1).unwrap();
        let bc = periodic(&grid);
        let dom_size = grid.dom_size(Direction::X);
        let inside = 3.4999999999999996;
        assert!(inside < dom_size);
        let mut prtls = vec![Particle::at(inside), Particle::at(dom_size)];
        bc.particles(&mut prtls).unwrap();
        assert_eq!(prtls[0].position[0], inside);
        assert_eq!(prtls[1].position[0], 0.0);
    }

    #[test]
    fn particle_wrap_just_below_zero() {
        let grid = build_test_grid();
        let bc = periodic(&grid);
        let mut prtls = vec![Particle::at(-1e-17), Particle::at(0.0)];
        bc.particles(&mut prtls).unwrap();
        for prtl in prtls.iter() {
            assert_eq!(prtl.position[0], 0.0);
        }
    }

    #[test]
    fn one_d_only() {
        let grid = GridLayout::new(vec![4, 4], vec![1.0, 1.0], 1).unwrap();
        let bc = periodic(&grid);
        let mut fld = Field::new(&grid, Quantity::Ex).unwrap();
        assert!(bc.fill(&mut fld).is_err());
    }
}
