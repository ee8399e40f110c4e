use crate::{
    boundary::{Boundary, BoundaryCondition},
    error::{HybridError, Result},
    flds::{average, set_from_profile, Ampere, Faraday, Flds, Ohm},
    grid::{Direction, GridLayout},
    moments::compute_moments,
    prtls::{Particle, Population, Push, Pusher},
    save::Diagnostics,
    Config, Float, PI,
};
use log::{debug, info, trace};
use rand::{rngs::StdRng, SeedableRng};

/// Which electric field drives Faraday in a predictor stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Predictor {
    First,
    Second,
}

/// Full simulation state: fields, species and the operators that advance
/// them, all sharing one grid.
pub struct Sim<'a> {
    grid: &'a GridLayout,
    pub flds: Flds,
    pub populations: Vec<Population<'a>>,
    boundary: BoundaryCondition<'a>,
    pusher: Pusher<'a>,
    faraday: Faraday<'a>,
    ampere: Ampere<'a>,
    ohm: Ohm<'a>,
    // particles at the start of the current step
    snapshot: Vec<Vec<Particle>>,
    dt: Float,
    final_time: Float,
    time: Float,
    step_count: u64,
}

impl<'a> Sim<'a> {
    /// Builds every component from `cfg`, loads the particles and brings
    /// fields and moments to a consistent state at t = 0.
    pub fn new(cfg: &Config, grid: &'a GridLayout) -> Result<Sim<'a>> {
        // factories first, a bad name must fail before any state is built
        let boundary = BoundaryCondition::create(&cfg.params.boundary, grid)?;
        let pusher = Pusher::create(&cfg.params.pusher, grid, cfg.params.dt)?;

        let mut rng = match cfg.setup.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut populations = Vec::with_capacity(cfg.populations.len());
        for pop_cfg in cfg.populations.iter() {
            let mut pop = Population::new(&pop_cfg.name, grid)?;
            pop.load_particles(
                pop_cfg.nppc,
                &pop_cfg.density,
                pop_cfg.vth,
                pop_cfg.drift,
                pop_cfg.mass,
                pop_cfg.charge,
                &mut rng,
            )?;
            info!(
                "loaded {} particles for population {}",
                pop.particles().len(),
                pop.name()
            );
            populations.push(pop);
        }

        let mut sim = Sim {
            grid,
            flds: Flds::new(grid)?,
            snapshot: vec![Vec::new(); populations.len()],
            populations,
            boundary,
            pusher,
            faraday: Faraday::new(grid, cfg.params.dt),
            ampere: Ampere::new(grid),
            ohm: Ohm::with_resistivity(grid, cfg.params.resistivity),
            dt: cfg.params.dt,
            final_time: cfg.setup.final_time,
            time: 0.0,
            step_count: 0,
        };
        sim.init_magnetic(cfg)?;
        sim.initialize()?;
        Ok(sim)
    }

    /// Uniform `b0` plus the optional transverse wave.
    fn init_magnetic(&mut self, cfg: &Config) -> Result<()> {
        let b0 = cfg.setup.b0;
        let (amplitude, k) = match cfg.setup.perturbation {
            Some(p) => (
                p.amplitude,
                2.0 * PI * p.mode as Float / self.grid.dom_size(Direction::X),
            ),
            None => (0.0, 0.0),
        };
        let b = &mut self.flds.b;
        set_from_profile(self.grid, &mut b.x, |_| b0[0])?;
        set_from_profile(self.grid, &mut b.y, |x| b0[1] + amplitude * (k * x).cos())?;
        set_from_profile(self.grid, &mut b.z, |x| b0[2] + amplitude * (k * x).sin())?;
        Ok(())
    }

    fn initialize(&mut self) -> Result<()> {
        let flds = &mut self.flds;
        self.boundary.fill_vector(&mut flds.b)?;
        self.ampere.solve(&flds.b, &mut flds.j)?;
        self.boundary.fill_vector(&mut flds.j)?;

        for pop in self.populations.iter_mut() {
            pop.deposit()?;
            self.boundary.fill_vector(pop.flux_mut())?;
            self.boundary.fill(pop.density_mut())?;
        }
        compute_moments(&self.populations, &mut flds.n, &mut flds.v);

        self.ohm
            .solve(&flds.b, &flds.j, &flds.n, &flds.v, &mut flds.e)?;
        self.boundary.fill_vector(&mut flds.e)?;
        info!("initial fields and moments computed");
        Ok(())
    }

    pub fn grid(&self) -> &GridLayout {
        self.grid
    }

    pub fn time(&self) -> Float {
        self.time
    }

    pub fn final_time(&self) -> Float {
        self.final_time
    }

    pub fn dt(&self) -> Float {
        self.dt
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Advances fields and particles from t to t + dt with two predictor
    /// stages and one corrector.
    pub fn step(&mut self) -> Result<()> {
        for (snap, pop) in self.snapshot.iter_mut().zip(self.populations.iter()) {
            snap.clear();
            snap.extend_from_slice(pop.particles());
        }

        self.predict(Predictor::First)?;
        trace!("step {}: first predictor done", self.step_count);
        self.predict(Predictor::Second)?;
        trace!("step {}: second predictor done", self.step_count);
        self.correct()?;
        trace!("step {}: corrector done", self.step_count);

        self.step_count += 1;
        self.time = self.step_count as Float * self.dt;
        debug!("step {} reached t = {}", self.step_count, self.time);
        Ok(())
    }

    /// Predicts B and E at t + dt, centres them at t + dt/2 and moves the
    /// particles from their start-of-step state with the centred fields.
    fn predict(&mut self, stage: Predictor) -> Result<()> {
        let flds = &mut self.flds;
        match stage {
            Predictor::First => self.faraday.solve(&flds.e, &flds.b, &mut flds.b_new)?,
            Predictor::Second => self.faraday.solve(&flds.e_avg, &flds.b, &mut flds.b_new)?,
        }
        self.update_e_and_j()?;

        let flds = &mut self.flds;
        average(&flds.e, &flds.e_new, &mut flds.e_avg);
        average(&flds.b, &flds.b_new, &mut flds.b_avg);

        for (pop, snap) in self.populations.iter_mut().zip(self.snapshot.iter()) {
            pop.particles_mut().clone_from(snap);
            self.pusher
                .push(pop.particles_mut(), &flds.e_avg, &flds.b_avg)?;
            self.boundary.particles(pop.particles_mut())?;
            pop.deposit()?;
            self.boundary.fill_vector(pop.flux_mut())?;
            self.boundary.fill(pop.density_mut())?;
        }
        compute_moments(&self.populations, &mut flds.n, &mut flds.v);
        Ok(())
    }

    fn correct(&mut self) -> Result<()> {
        let flds = &mut self.flds;
        self.faraday.solve(&flds.e_avg, &flds.b, &mut flds.b_new)?;
        self.update_e_and_j()?;
        self.flds.commit();
        Ok(())
    }

    /// Fills `b_new`, then derives J and `e_new` from it.
    fn update_e_and_j(&mut self) -> Result<()> {
        let flds = &mut self.flds;
        self.boundary.fill_vector(&mut flds.b_new)?;
        self.ampere.solve(&flds.b_new, &mut flds.j)?;
        self.boundary.fill_vector(&mut flds.j)?;
        self.ohm
            .solve(&flds.b_new, &flds.j, &flds.n, &flds.v, &mut flds.e_new)?;
        self.boundary.fill_vector(&mut flds.e_new)
    }

    /// Steps until `final_time`, writing a snapshot at t = 0 and then every
    /// `output_interval` steps.
    pub fn run_to_end(
        &mut self,
        mut diagnostics: Option<&mut Diagnostics>,
        output_interval: u32,
    ) -> anyhow::Result<()> {
        if let Some(diag) = &mut diagnostics {
            if output_interval == 0 {
                return Err(
                    HybridError::Config("output_interval must be at least 1".to_string()).into(),
                );
            }
            diag.write(self)?;
        }
        while self.time < self.final_time {
            self.step()?;
            if let Some(diag) = &mut diagnostics {
                if self.step_count % output_interval as u64 == 0 {
                    diag.write(self)?;
                }
            }
        }
        Ok(())
    }
}
