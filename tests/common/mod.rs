use hybrid_rs::{prtls::DensityProfile, Config, Float, Output, Params, PopulationConfig, Setup};

#[cfg(feature = "dprec")]
#[allow(dead_code)]
pub const E_TOL: Float = 1e-10;

#[cfg(not(feature = "dprec"))]
#[allow(dead_code)]
pub const E_TOL: Float = 1e-4;

pub fn setup_config() -> Config {
    // This is a function that sets up a dummy small
    // simulation so that it can be used in testing;
    Config {
        output: Output {
            write_output: false,
            output_interval: 10,
            stride: 4,
            outdir: "output".to_string(),
        },
        setup: Setup {
            final_time: 0.1,
            b0: [1.0, 0.0, 0.0],
            perturbation: None,
            seed: Some(2020),
        },
        params: Params {
            nbr_cells: vec![24],
            cell_size: vec![0.25],
            nbr_ghosts: 1,
            dt: 0.01,
            boundary: "periodic".to_string(),
            pusher: "boris".to_string(),
            resistivity: 0.0,
        },
        populations: vec![PopulationConfig {
            name: "protons".to_string(),
            nppc: 16,
            mass: 1.0,
            charge: 1.0,
            vth: [0.05, 0.05, 0.05],
            drift: [0.0, 0.0, 0.0],
            density: DensityProfile::Uniform { n0: 1.0 },
        }],
    }
}
