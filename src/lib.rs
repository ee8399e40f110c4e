use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub mod boundary;
pub mod error;
pub mod flds;
pub mod grid;
pub mod moments;
pub mod prtls;
pub mod save;
pub mod simulation;

use crate::error::HybridError;
use crate::grid::GridLayout;
use crate::prtls::DensityProfile;
use crate::save::{Diagnostics, WriteMode};
use crate::simulation::Sim;

// We use a type alias for f64/Float to easily support
// double and single precision.
#[cfg(feature = "dprec")]
pub type Float = f64;

#[cfg(not(feature = "dprec"))]
pub type Float = f32;

pub const PI: Float = std::f64::consts::PI as Float;

#[cfg(all(test, feature = "dprec"))]
pub(crate) const E_TOL: Float = 1e-10;

#[cfg(all(test, not(feature = "dprec")))]
pub(crate) const E_TOL: Float = 1e-4;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub params: Params,
    pub setup: Setup,
    pub populations: Vec<PopulationConfig>,
    pub output: Output,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Params {
    pub nbr_cells: Vec<usize>,
    pub cell_size: Vec<Float>,
    pub nbr_ghosts: usize,
    pub dt: Float,
    #[serde(default = "default_boundary")]
    pub boundary: String,
    #[serde(default = "default_pusher")]
    pub pusher: String,
    #[serde(default)]
    pub resistivity: Float,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Setup {
    pub final_time: Float,
    pub b0: [Float; 3],
    #[serde(default)]
    pub perturbation: Option<Perturbation>,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Transverse wave added on top of `b0`: `By += A cos(kx)`, `Bz += A sin(kx)`.
#[derive(Deserialize, Debug, Clone, Copy)]
pub struct Perturbation {
    pub amplitude: Float,
    pub mode: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PopulationConfig {
    pub name: String,
    pub nppc: usize,
    #[serde(default = "default_one")]
    pub mass: Float,
    #[serde(default = "default_one")]
    pub charge: Float,
    pub vth: [Float; 3],
    #[serde(default)]
    pub drift: [Float; 3],
    pub density: DensityProfile,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Output {
    pub write_output: bool,
    pub output_interval: u32,
    pub stride: usize,
    #[serde(default = "default_outdir")]
    pub outdir: String,
}

fn default_boundary() -> String {
    "periodic".to_string()
}

fn default_pusher() -> String {
    "boris".to_string()
}

fn default_one() -> Float {
    1.0
}

fn default_outdir() -> String {
    "output".to_string()
}

impl Config {
    pub fn new() -> Result<Config> {
        Config::from_file("config.toml")
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Could not open the {} file", path.display()))?;
        toml::from_str(&contents).with_context(|| "Could not parse Config file")
    }

    /// Rejects values no simulation could be built from. Boundary and
    /// pusher names are checked by their own factories.
    pub fn validate(&self) -> error::Result<()> {
        let bad = |msg: String| Err(HybridError::Config(msg));
        let params = &self.params;

        if params.nbr_cells.is_empty() || params.nbr_cells.len() != params.cell_size.len() {
            return bad(format!(
                "nbr_cells ({}) and cell_size ({}) must have the same, non-zero length",
                params.nbr_cells.len(),
                params.cell_size.len()
            ));
        }
        if params.nbr_cells.iter().any(|&n| n == 0) {
            return bad("every direction needs at least one cell".to_string());
        }
        if params.cell_size.iter().any(|&dx| !(dx > 0.0)) {
            return bad(format!("cell_size must be > 0, got {:?}", params.cell_size));
        }
        if params.nbr_ghosts < 1 {
            return bad("nbr_ghosts must be at least 1".to_string());
        }
        if !(params.dt > 0.0) {
            return bad(format!("dt must be > 0, got {}", params.dt));
        }
        if !(self.setup.final_time >= 0.0) {
            return bad(format!(
                "final_time must be >= 0, got {}",
                self.setup.final_time
            ));
        }

        if self.populations.is_empty() {
            return bad("at least one population is needed".to_string());
        }
        let mut names = HashSet::new();
        for pop in self.populations.iter() {
            if !names.insert(pop.name.as_str()) {
                return bad(format!("population {} is defined twice", pop.name));
            }
            if pop.nppc == 0 {
                return bad(format!("population {} has nppc = 0", pop.name));
            }
            if !(pop.mass > 0.0) {
                return bad(format!("population {} needs a mass > 0", pop.name));
            }
            if pop.vth.iter().any(|&v| !(v >= 0.0)) {
                return bad(format!("population {} has a negative vth", pop.name));
            }
            if !(pop.density.min_density() >= 0.0) {
                return bad(format!(
                    "density profile of population {} goes negative",
                    pop.name
                ));
            }
        }

        if self.output.write_output && self.output.output_interval == 0 {
            return bad("output_interval must be > 0".to_string());
        }
        if self.output.stride == 0 {
            return bad("stride must be > 0".to_string());
        }
        Ok(())
    }

    pub fn grid_layout(&self) -> error::Result<GridLayout> {
        GridLayout::new(
            self.params.nbr_cells.clone(),
            self.params.cell_size.clone(),
            self.params.nbr_ghosts,
        )
    }
}

pub fn run(cfg: Config) -> Result<()> {
    cfg.validate()?;
    let grid = cfg.grid_layout()?;
    info!(
        "grid of {:?} cells of size {:?}, {} ghosts",
        cfg.params.nbr_cells, cfg.params.cell_size, cfg.params.nbr_ghosts
    );

    let mut sim = Sim::new(&cfg, &grid)?;

    let mut diagnostics = if cfg.output.write_output {
        Some(Diagnostics::new(
            &cfg.output.outdir,
            cfg.output.stride,
            WriteMode::Truncate,
        )?)
    } else {
        None
    };

    sim.run_to_end(diagnostics.as_mut(), cfg.output.output_interval)?;
    info!("reached t = {} after {} steps", sim.time(), sim.step_count());
    Ok(())
}

#[cfg(test)]
pub(crate) fn build_test_grid() -> GridLayout {
    // 10 unit cells with a single ghost on each side
    GridLayout::new(vec![10], vec![1.0], 1).unwrap()
}

#[cfg(test)]
pub(crate) fn build_test_config() -> Config {
    toml::from_str(
        r#"
        [params]
        nbr_cells = [32]
        cell_size = [0.5]
        nbr_ghosts = 1
        dt = 0.01

        [setup]
        final_time = 0.05
        b0 = [1.0, 0.0, 0.0]
        seed = 1234

        [[populations]]
        name = "protons"
        nppc = 20
        vth = [0.1, 0.1, 0.1]
        density = { kind = "uniform", n0 = 1.0 }

        [output]
        write_output = false
        output_interval = 1
        stride = 1
        "#,
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let cfg = build_test_config();
        assert_eq!(cfg.params.boundary, "periodic");
        assert_eq!(cfg.params.pusher, "boris");
        assert_eq!(cfg.params.resistivity, 0.0);
        assert_eq!(cfg.populations[0].mass, 1.0);
        assert_eq!(cfg.populations[0].drift, [0.0; 3]);
        assert_eq!(cfg.output.outdir, "output");
        assert!(cfg.setup.perturbation.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn cosine_profile_from_toml() {
        let pop: PopulationConfig = toml::from_str(
            r#"
            name = "alphas"
            nppc = 4
            mass = 4.0
            charge = 2.0
            vth = [0.0, 0.0, 0.0]
            density = { kind = "cosine", n0 = 1.0, amplitude = 0.1, mode = 2 }
            "#,
        )
        .unwrap();
        assert_eq!(
            pop.density,
            DensityProfile::Cosine {
                n0: 1.0,
                amplitude: 0.1,
                mode: 2
            }
        );
    }

    #[test]
    fn validation() {
        fn rejects(edit: impl Fn(&mut Config)) {
            let mut cfg = build_test_config();
            edit(&mut cfg);
            match cfg.validate() {
                Err(HybridError::Config(_)) => {}
                other => panic!("expected a config error, got {:?}", other),
            }
        }
        rejects(|c| c.params.cell_size = vec![0.0]);
        rejects(|c| c.params.cell_size = vec![1.0, 1.0]);
        rejects(|c| c.params.nbr_cells = vec![0]);
        rejects(|c| c.params.nbr_ghosts = 0);
        rejects(|c| c.params.dt = -0.1);
        rejects(|c| c.setup.final_time = -1.0);
        rejects(|c| c.populations.clear());
        rejects(|c| c.populations[0].nppc = 0);
        rejects(|c| c.populations[0].mass = 0.0);
        rejects(|c| c.populations[0].vth[1] = -0.1);
        rejects(|c| {
            let dup = c.populations[0].clone();
            c.populations.push(dup)
        });
        rejects(|c| {
            c.populations[0].density = DensityProfile::Cosine {
                n0: 1.0,
                amplitude: 1.5,
                mode: 1,
            }
        });
        rejects(|c| {
            c.output.write_output = true;
            c.output.output_interval = 0
        });
        rejects(|c| c.output.stride = 0);
    }

    #[test]
    fn missing_config_file() {
        assert!(Config::from_file("does/not/exist.toml").is_err());
    }
}
