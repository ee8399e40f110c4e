use crate::{
    error::HybridError,
    flds::field::Field,
    grid::{Direction, GridLayout},
    prtls::Population,
    simulation::Sim,
    Float,
};
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Start from an empty output directory.
    Truncate,
    /// Keep whatever is already there and add new times.
    Append,
}

/// Fixed width, zero padded time used as a directory name.
pub fn time_string(t: Float) -> String {
    format!("{:016.10}", t)
}

/// Writes field and particle snapshots as `.npy` files under `outdir`.
pub struct Diagnostics {
    outdir: PathBuf,
    stride: usize,
}

impl Diagnostics {
    pub fn new<P: AsRef<Path>>(outdir: P, stride: usize, mode: WriteMode) -> Result<Diagnostics> {
        if stride == 0 {
            return Err(HybridError::Config("output stride must be at least 1".to_string()).into());
        }
        let outdir = outdir.as_ref().to_path_buf();
        if mode == WriteMode::Truncate && outdir.exists() {
            fs::remove_dir_all(&outdir)
                .with_context(|| format!("Unable to clear {}", outdir.display()))?;
        }
        fs::create_dir_all(&outdir).context("Unable to create output directory")?;
        Ok(Diagnostics { outdir, stride })
    }

    pub fn write(&mut self, sim: &Sim) -> Result<()> {
        let time = time_string(sim.time());
        debug!("saving snapshot at t = {}", time);

        let fld_dir = self.outdir.join("fields").join("t").join(&time);
        fs::create_dir_all(&fld_dir).context("Unable to create output directory")?;
        let flds = &sim.flds;
        for fld in &[
            &flds.b.x, &flds.b.y, &flds.b.z, &flds.e.x, &flds.e.y, &flds.e.z, &flds.v.x, &flds.v.y,
            &flds.v.z, &flds.n,
        ] {
            save_fld_spatial(sim.grid(), fld, &fld_dir)?;
        }

        for pop in sim.populations.iter() {
            self.save_prtls(pop, &time)?;
        }
        Ok(())
    }

    fn save_prtls(&self, pop: &Population, time: &str) -> Result<()> {
        let prtl_dir = self
            .outdir
            .join(format!("particles_{}", pop.name()))
            .join("t")
            .join(time);
        fs::create_dir_all(&prtl_dir).context("Unable to create output directory")?;

        let x: Vec<Float> = pop
            .particles()
            .iter()
            .step_by(self.stride)
            .map(|p| p.position[0])
            .collect();
        npy::to_file(prtl_dir.join("x.npy"), x).context("Could not save x data to file")?;

        for (dim, name) in ["vx", "vy", "vz"].iter().enumerate() {
            let v: Vec<Float> = pop
                .particles()
                .iter()
                .step_by(self.stride)
                .map(|p| p.velocity[dim])
                .collect();
            npy::to_file(prtl_dir.join(format!("{}.npy", name)), v)
                .with_context(|| format!("Could not save {} data to file", name))?;
        }
        Ok(())
    }
}

/// Saves the physical nodes of `fld`, ghosts stripped.
pub(crate) fn save_fld_spatial(grid: &GridLayout, fld: &Field, dir: &Path) -> Result<()> {
    let qty = fld.quantity();
    let start = grid.dom_start(qty, Direction::X)?;
    let end = grid.dom_end(qty, Direction::X)?;
    let out_vec: Vec<Float> = fld.as_slice()[start..=end].to_vec();

    npy::to_file(dir.join(format!("{:?}.npy", qty)), out_vec)
        .with_context(|| format!("Could not save {:?} data to file", qty))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_test_config;

    #[test]
    fn fixed_width_time() {
        assert_eq!(time_string(0.0), "00000.0000000000");
        assert_eq!(time_string(0.5), "00000.5000000000");
        assert_eq!(time_string(12.25), "00012.2500000000");
        assert_eq!(time_string(1.0).len(), time_string(1000.0).len());
    }

    #[test]
    fn snapshot_layout() {
        let outdir = std::env::temp_dir().join(format!("hybrid_rs_save_{}", std::process::id()));
        let mut cfg = build_test_config();
        cfg.populations[0].nppc = 2;
        let grid = cfg.grid_layout().unwrap();
        let mut sim = Sim::new(&cfg, &grid).unwrap();

        let mut diag = Diagnostics::new(&outdir, 4, WriteMode::Truncate).unwrap();
        diag.write(&sim).unwrap();
        let t0 = time_string(0.0);
        for name in ["Bx", "By", "Bz", "Ex", "Ey", "Ez", "Vx", "Vy", "Vz", "N"].iter() {
            assert!(outdir
                .join("fields/t")
                .join(&t0)
                .join(format!("{}.npy", name))
                .is_file());
        }
        for name in ["x", "vx", "vy", "vz"].iter() {
            assert!(outdir
                .join("particles_protons/t")
                .join(&t0)
                .join(format!("{}.npy", name))
                .is_file());
        }

        sim.step().unwrap();
        let mut diag = Diagnostics::new(&outdir, 4, WriteMode::Append).unwrap();
        diag.write(&sim).unwrap();
        assert!(outdir.join("fields/t").join(&t0).is_dir());
        assert!(outdir.join("fields/t").join(time_string(sim.time())).is_dir());

        // truncating clears earlier times
        let _ = Diagnostics::new(&outdir, 4, WriteMode::Truncate).unwrap();
        assert!(!outdir.join("fields").exists());
        fs::remove_dir_all(&outdir).unwrap();
    }

    #[test]
    fn zero_stride_is_rejected() {
        let outdir = std::env::temp_dir().join(format!("hybrid_rs_stride_{}", std::process::id()));
        let err = Diagnostics::new(&outdir, 0, WriteMode::Append)
            .err()
            .expect("a zero stride must fail");
        assert!(matches!(
            err.downcast_ref::<HybridError>(),
            Some(HybridError::Config(_))
        ));
        // nothing is created for a rejected configuration
        assert!(!outdir.exists());
    }
}
