use crate::{
    error::{HybridError, Result},
    Float,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    X = 0,
    Y = 1,
    Z = 2,
}

/// Physical quantities the layout knows how to stagger. The aggregate
/// tags `E`, `B` and `J` name vector fields and have no centering of
/// their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    E,
    Ex,
    Ey,
    Ez,
    B,
    Bx,
    By,
    Bz,
    J,
    Jx,
    Jy,
    Jz,
    N,
    V,
    Vx,
    Vy,
    Vz,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Centering {
    Dual = 0,
    Primal = 1,
}

use Centering::{Dual, Primal};

/// Immutable mesh geometry shared by every field, population, solver and
/// boundary policy. Built once, then only ever borrowed.
#[derive(Debug)]
pub struct GridLayout {
    nbr_cells: Vec<usize>,
    cell_size: Vec<Float>,
    nbr_ghosts: usize,
}

impl GridLayout {
    pub fn new(nbr_cells: Vec<usize>, cell_size: Vec<Float>, nbr_ghosts: usize) -> Result<Self> {
        if nbr_cells.is_empty() || nbr_cells.len() != cell_size.len() {
            return Err(HybridError::Config(format!(
                "nbr_cells ({}) and cell_size ({}) must have the same, non-zero length",
                nbr_cells.len(),
                cell_size.len()
            )));
        }
        if nbr_cells.iter().any(|&n| n == 0) {
            return Err(HybridError::Config(
                "every direction needs at least one cell".to_string(),
            ));
        }
        if cell_size.iter().any(|&dx| !(dx > 0.0)) {
            return Err(HybridError::Config(format!(
                "cell_size must be strictly positive, got {:?}",
                cell_size
            )));
        }
        if nbr_ghosts < 1 {
            return Err(HybridError::Config(
                "nbr_ghosts must be at least 1".to_string(),
            ));
        }
        Ok(GridLayout {
            nbr_cells,
            cell_size,
            nbr_ghosts,
        })
    }

    pub fn dimension(&self) -> usize {
        self.nbr_cells.len()
    }

    pub fn nbr_ghosts(&self) -> usize {
        self.nbr_ghosts
    }

    pub fn nbr_cells(&self, dir: Direction) -> usize {
        self.nbr_cells[dir as usize]
    }

    pub fn cell_size(&self, dir: Direction) -> Float {
        self.cell_size[dir as usize]
    }

    pub fn dom_size(&self, dir: Direction) -> Float {
        self.nbr_cells(dir) as Float * self.cell_size(dir)
    }

    /// Number of physical nodes of `qty` along `dir`: primal quantities
    /// carry one more node than there are cells.
    pub fn nbr_dom_nodes(&self, qty: Quantity, dir: Direction) -> Result<usize> {
        let centering = self.centerings(qty)?[dir as usize];
        Ok(self.nbr_cells(dir) + centering as usize)
    }

    pub fn dual_dom_start(&self, _dir: Direction) -> usize {
        self.nbr_ghosts
    }

    pub fn dual_dom_end(&self, dir: Direction) -> usize {
        self.dual_dom_start(dir) + self.nbr_cells(dir) - 1
    }

    pub fn primal_dom_start(&self, _dir: Direction) -> usize {
        self.nbr_ghosts
    }

    pub fn primal_dom_end(&self, dir: Direction) -> usize {
        self.primal_dom_start(dir) + self.nbr_cells(dir)
    }

    pub fn ghost_start(&self, _qty: Quantity, _dir: Direction) -> usize {
        0
    }

    pub fn ghost_end(&self, qty: Quantity, dir: Direction) -> Result<usize> {
        Ok(self.allocate(qty)?[dir as usize] - 1)
    }

    pub fn dom_start(&self, qty: Quantity, dir: Direction) -> Result<usize> {
        Ok(match self.centerings(qty)?[dir as usize] {
            Dual => self.dual_dom_start(dir),
            Primal => self.primal_dom_start(dir),
        })
    }

    pub fn dom_end(&self, qty: Quantity, dir: Direction) -> Result<usize> {
        Ok(match self.centerings(qty)?[dir as usize] {
            Dual => self.dual_dom_end(dir),
            Primal => self.primal_dom_end(dir),
        })
    }

    /// Physical position of node `index` of `qty` along `dir`. Index 0 is
    /// the first ghost node, so the origin sits at `nbr_ghosts` cells.
    pub fn coordinate(&self, dir: Direction, qty: Quantity, index: usize) -> Result<Float> {
        let dx = self.cell_size(dir);
        let xmin = -(self.nbr_ghosts as Float) * dx;
        let shift = match self.centerings(qty)?[dir as usize] {
            Dual => 0.5,
            Primal => 0.0,
        };
        Ok(xmin + index as Float * dx + shift * dx)
    }

    /// Centre of dual cell `index` along `dir`.
    pub fn cell_coordinate(&self, dir: Direction, index: usize) -> Float {
        let dx = self.cell_size(dir);
        let xmin = -(self.nbr_ghosts as Float) * dx;
        xmin + (index as Float + 0.5) * dx
    }

    /// Buffer shape (ghosts included) of `qty`, one entry per direction.
    pub fn allocate(&self, qty: Quantity) -> Result<Vec<usize>> {
        let centering = self.centerings(qty)?;
        Ok(self
            .nbr_cells
            .iter()
            .zip(centering.iter())
            .map(|(&n, &c)| n + 2 * self.nbr_ghosts + c as usize)
            .collect())
    }

    /// Yee-type staggering of each quantity, one entry per direction.
    pub fn centerings(&self, qty: Quantity) -> Result<Vec<Centering>> {
        let table: [Centering; 3] = match qty {
            Quantity::Ex | Quantity::Jx => [Dual, Primal, Primal],
            Quantity::Ey | Quantity::Jy => [Primal, Dual, Primal],
            Quantity::Ez | Quantity::Jz => [Primal, Primal, Dual],
            Quantity::Bx => [Primal, Dual, Dual],
            Quantity::By => [Dual, Primal, Dual],
            Quantity::Bz => [Dual, Dual, Primal],
            Quantity::N | Quantity::V | Quantity::Vx | Quantity::Vy | Quantity::Vz => {
                [Primal, Primal, Primal]
            }
            Quantity::E | Quantity::B | Quantity::J => {
                return Err(HybridError::UnknownQuantity(qty))
            }
        };
        match self.dimension() {
            d @ 1..=3 => Ok(table[..d].to_vec()),
            d => Err(HybridError::UnsupportedDimension(d)),
        }
    }
}
