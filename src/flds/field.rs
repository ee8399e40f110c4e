use crate::{
    error::Result,
    grid::{Centering, Direction, GridLayout, Quantity},
    Float,
};
use std::ops::{Index, IndexMut};

/// Flat, ghost-inclusive buffer for one staggered scalar quantity.
#[derive(Debug, Clone)]
pub struct Field {
    qty: Quantity,
    centering: Vec<Centering>,
    shape: Vec<usize>,
    data: Vec<Float>,
}

impl Field {
    pub fn new(grid: &GridLayout, qty: Quantity) -> Result<Field> {
        let shape = grid.allocate(qty)?;
        let centering = grid.centerings(qty)?;
        Ok(Field {
            qty,
            centering,
            data: vec![0.0; shape.iter().product()],
            shape,
        })
    }

    pub fn quantity(&self) -> Quantity {
        self.qty
    }

    pub fn centering(&self, dir: Direction) -> Centering {
        self.centering[dir as usize]
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn get_index(&self, idx: &[usize]) -> usize {
        // Row-major, the last direction is contiguous.
        //     [0] [1] [2]
        //     [3] [4] [5]
        // for a shape of [2, 3].
        if !cfg!(feature = "unchecked") {
            assert_eq!(idx.len(), self.shape.len());
            for (i, n) in idx.iter().zip(self.shape.iter()) {
                assert!(i < n);
            }
        }
        idx.iter()
            .zip(self.shape.iter())
            .fold(0, |flat, (&i, &n)| flat * n + i)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Float> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Float> {
        self.data.iter_mut()
    }

    pub fn as_slice(&self) -> &[Float] {
        &self.data
    }

    pub fn zero(&mut self) {
        for v in self.data.iter_mut() {
            *v = 0.0;
        }
    }
}

impl Index<usize> for Field {
    type Output = Float;
    #[inline(always)]
    fn index(&self, i: usize) -> &Float {
        &self.data[i]
    }
}

impl IndexMut<usize> for Field {
    #[inline(always)]
    fn index_mut(&mut self, i: usize) -> &mut Float {
        &mut self.data[i]
    }
}

impl Index<[usize; 2]> for Field {
    type Output = Float;
    fn index(&self, ij: [usize; 2]) -> &Float {
        &self.data[self.get_index(&ij)]
    }
}

impl IndexMut<[usize; 2]> for Field {
    fn index_mut(&mut self, ij: [usize; 2]) -> &mut Float {
        let flat = self.get_index(&ij);
        &mut self.data[flat]
    }
}

impl Index<[usize; 3]> for Field {
    type Output = Float;
    fn index(&self, ijk: [usize; 3]) -> &Float {
        &self.data[self.get_index(&ijk)]
    }
}

impl IndexMut<[usize; 3]> for Field {
    fn index_mut(&mut self, ijk: [usize; 3]) -> &mut Float {
        let flat = self.get_index(&ijk);
        &mut self.data[flat]
    }
}

/// Three independently staggered components of a vector quantity.
#[derive(Debug, Clone)]
pub struct VectorField {
    pub x: Field,
    pub y: Field,
    pub z: Field,
}

impl VectorField {
    pub fn new(grid: &GridLayout, quantities: [Quantity; 3]) -> Result<VectorField> {
        Ok(VectorField {
            x: Field::new(grid, quantities[0])?,
            y: Field::new(grid, quantities[1])?,
            z: Field::new(grid, quantities[2])?,
        })
    }

    pub fn electric(grid: &GridLayout) -> Result<VectorField> {
        VectorField::new(grid, [Quantity::Ex, Quantity::Ey, Quantity::Ez])
    }

    pub fn magnetic(grid: &GridLayout) -> Result<VectorField> {
        VectorField::new(grid, [Quantity::Bx, Quantity::By, Quantity::Bz])
    }

    pub fn current(grid: &GridLayout) -> Result<VectorField> {
        VectorField::new(grid, [Quantity::Jx, Quantity::Jy, Quantity::Jz])
    }

    pub fn velocity(grid: &GridLayout) -> Result<VectorField> {
        VectorField::new(grid, [Quantity::Vx, Quantity::Vy, Quantity::Vz])
    }

    pub fn components(&self) -> [&Field; 3] {
        [&self.x, &self.y, &self.z]
    }

    pub fn components_mut(&mut self) -> [&mut Field; 3] {
        [&mut self.x, &mut self.y, &mut self.z]
    }

    pub fn zero(&mut self) {
        for fld in self.components_mut().iter_mut() {
            fld.zero();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_test_grid;

    #[test]
    fn field_init() {
        // every component is allocated to its own staggered length and zeroed
        let grid = build_test_grid();
        let e = VectorField::electric(&grid).unwrap();
        let b = VectorField::magnetic(&grid).unwrap();
        let n_cells = grid.nbr_cells(Direction::X);
        let n_ghosts = grid.nbr_ghosts();
        assert_eq!(e.x.len(), n_cells + 2 * n_ghosts);
        assert_eq!(e.y.len(), n_cells + 2 * n_ghosts + 1);
        assert_eq!(b.x.len(), n_cells + 2 * n_ghosts + 1);
        assert_eq!(b.z.len(), n_cells + 2 * n_ghosts);
        for fld in e.components().iter().chain(b.components().iter()) {
            for v in fld.iter() {
                assert_eq!(*v, 0.0);
            }
        }
        assert_eq!(e.y.quantity(), Quantity::Ey);
        assert_eq!(b.y.centering(Direction::X), Centering::Dual);
    }

    #[test]
    fn row_major_order() {
        let grid = GridLayout::new(vec![3, 4], vec![1.0, 1.0], 1).unwrap();
        let mut fld = Field::new(&grid, Quantity::N).unwrap();
        assert_eq!(fld.shape(), &[6, 7]);

        let mut index = 0;
        for i in 0..6 {
            for j in 0..7 {
                assert_eq!(fld.get_index(&[i, j]), index);
                index += 1;
            }
        }
        fld[[2, 3]] = 1.5;
        assert_eq!(fld[2 * 7 + 3], 1.5);
    }

    #[test]
    fn zeroing() {
        let grid = build_test_grid();
        let mut v = VectorField::velocity(&grid).unwrap();
        for fld in v.components_mut().iter_mut() {
            for x in fld.iter_mut() {
                *x = 3.0;
            }
        }
        v.zero();
        for fld in v.components().iter() {
            assert!(fld.iter().all(|&x| x == 0.0));
        }
    }
}
