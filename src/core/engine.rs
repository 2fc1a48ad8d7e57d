//! Step orchestration.
//!
//! One step is P2G, grid force, grid velocity update, G2P (with deformation
//! update, plasticity and advection), then grid reset. Each pass reads what
//! the previous one wrote, so they run strictly in that order.

use bevy::log::{debug, error, info, warn};
use bevy::prelude::Resource;

use crate::config::SolverParams;
use crate::error::{MpmError, MpmResult};
use crate::geometry::LevelSet;
use crate::materials::{Material, MaterialType};
use crate::math::Matrix;
use crate::solver;
use crate::telemetry::{NoopProfiler, StepPhase, StepProfiler, timed};

use super::grid::Grid;
use super::kernel::{ParticleTransferCache, base_node, populate_transfer_cache};
use super::particle::{Particle, ParticleList};

/// Aggregate simulation state for the solver.
#[derive(Resource)]
pub struct Engine {
    params: SolverParams,
    material: Material,
    grid: Grid,
    particles: ParticleList,
    transfer_cache: Vec<ParticleTransferCache>,
    velocity_gradients: Vec<Matrix>,
    profiler: Box<dyn StepProfiler>,
    step: u64,
    halted: bool,
}

impl Engine {
    /// Validate the configuration, bake the boundary and ingest `particles`.
    pub fn new(
        params: SolverParams,
        particles: ParticleList,
        level_sets: &[LevelSet],
    ) -> MpmResult<Self> {
        params.validate()?;
        if particles.material() != params.material {
            return Err(MpmError::InvalidConfig(format!(
                "particle list is {} but the solver is configured for {}",
                particles.material(),
                params.material
            )));
        }

        let stable_dt = params.stable_time_step();
        if params.dt > stable_dt {
            warn!(
                "time step {} exceeds the elastic wave limit {:.3e}; expect blow-up",
                params.dt, stable_dt
            );
        }

        let mut grid = Grid::from_params(&params);
        grid.parse_level_sets(level_sets);

        let mut engine = Self {
            material: Material::from_params(&params),
            grid,
            particles: ParticleList::new(params.material),
            transfer_cache: Vec::new(),
            velocity_gradients: Vec::new(),
            profiler: Box::new(NoopProfiler),
            step: 0,
            halted: false,
            params,
        };
        for particle in particles.particles() {
            engine.add_particle(particle.clone())?;
        }

        info!(
            "engine ready: {} {} particles on a {} grid (h = {}, dt = {})",
            engine.particles.len(),
            engine.params.material,
            engine.params.grid_resolution,
            engine.params.spacing,
            engine.params.dt
        );
        Ok(engine)
    }

    pub fn with_profiler(mut self, profiler: impl StepProfiler + 'static) -> Self {
        self.profiler = Box::new(profiler);
        self
    }

    /// Check and append one particle; returns its index.
    pub fn add_particle(&mut self, mut particle: Particle) -> MpmResult<usize> {
        let index = self.particles.len();
        if let Some(reason) = particle.state_violation() {
            return Err(MpmError::InvalidParticle { index, reason });
        }
        if !self
            .grid
            .stencil_in_bounds(base_node(particle.position, self.grid.spacing()))
        {
            return Err(MpmError::ParticleOutOfDomain {
                index,
                position: particle.position,
            });
        }
        // A zero alpha means a fresh particle; a resumed one keeps its own.
        if self.params.material == MaterialType::Sand && particle.alpha == 0.0 {
            particle.alpha = self.params.sand.yield_alpha(particle.hardening_state);
        }
        Ok(self.particles.push(particle))
    }

    /// Re-bake the boundary after a level set moved or was added.
    pub fn set_level_sets(&mut self, level_sets: &[LevelSet]) {
        self.grid.parse_level_sets(level_sets);
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn particles(&self) -> &ParticleList {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Steps completed so far.
    pub fn step_count(&self) -> u64 {
        self.step
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn halt(&mut self) {
        self.halted = true;
    }

    /// Hand the run summary to the profiler.
    pub fn report_profile(&self) {
        self.profiler.report();
    }

    pub fn exec_one_step(&mut self) -> MpmResult<()> {
        self.exec_one_step_with(|_, _, _| Ok(()))
    }

    /// Run one step; `observer` sees the integrated grid and the advected
    /// particles before the grid is reset. Any error halts the engine.
    pub fn exec_one_step_with<F>(&mut self, observer: F) -> MpmResult<()>
    where
        F: FnOnce(&Grid, &ParticleList, u64) -> MpmResult<()>,
    {
        if self.halted {
            return Err(MpmError::InvalidConfig(
                "engine halted after an earlier failure".into(),
            ));
        }

        let result = self.run_step(observer);
        self.grid.reset();
        match &result {
            Ok(()) => {
                self.profiler.end_step(self.step);
                self.step += 1;
            }
            Err(err) => {
                error!("step {} failed: {}", self.step, err);
                self.profiler.abort_step(self.step);
                self.halted = true;
            }
        }
        result
    }

    fn run_step<F>(&mut self, observer: F) -> MpmResult<()>
    where
        F: FnOnce(&Grid, &ParticleList, u64) -> MpmResult<()>,
    {
        let Self {
            params,
            material,
            grid,
            particles,
            transfer_cache,
            velocity_gradients,
            profiler,
            step,
            ..
        } = self;
        let (dt, density, step) = (params.dt, params.density, *step);

        timed(&mut **profiler, StepPhase::P2gTransfer, || {
            refresh_transfer_cache(grid, particles, transfer_cache, velocity_gradients)?;
            solver::particle_to_grid(grid, particles.particles(), transfer_cache)
        })?;

        timed(&mut **profiler, StepPhase::ComputeGridForce, || {
            solver::particle_to_grid_forces(
                grid,
                particles.particles(),
                transfer_cache,
                material,
                density,
                step,
            )
        })?;

        timed(&mut **profiler, StepPhase::GridVelocityUpdate, || {
            solver::grid_update(grid, params)
        });

        timed(&mut **profiler, StepPhase::G2pTransfer, || {
            solver::grid_to_particle(
                grid,
                particles.particles_mut(),
                transfer_cache,
                velocity_gradients,
            )
        })?;

        timed(&mut **profiler, StepPhase::UpdateDeformGrad, || {
            solver::update_deformation_gradient(particles.particles_mut(), velocity_gradients, dt)
        });

        if params.material.is_plastic() {
            timed(&mut **profiler, StepPhase::PlasticityHardening, || {
                solver::plasticity_hardening(particles.particles_mut(), material)
            });
        }

        timed(&mut **profiler, StepPhase::G2pTransfer, || {
            solver::advect_particles(particles.particles_mut(), dt)
        });

        timed(&mut **profiler, StepPhase::SnapshotOutput, || {
            observer(grid, particles, step)
        })?;

        debug!(
            "step {} done: {} active nodes",
            step,
            grid.non_empty_blocks().len()
        );
        Ok(())
    }
}

/// Compute every particle's stencil for this step.
fn refresh_transfer_cache(
    grid: &Grid,
    particles: &ParticleList,
    transfer_cache: &mut Vec<ParticleTransferCache>,
    velocity_gradients: &mut Vec<Matrix>,
) -> MpmResult<()> {
    let count = particles.len();
    transfer_cache.resize(count, ParticleTransferCache::default());
    velocity_gradients.resize(count, Matrix::ZERO);

    let spacing = grid.spacing();
    for (index, (particle, cache)) in particles.iter().zip(transfer_cache.iter_mut()).enumerate() {
        if !grid.stencil_in_bounds(base_node(particle.position, spacing)) {
            return Err(MpmError::ParticleOutOfDomain {
                index,
                position: particle.position,
            });
        }
        populate_transfer_cache(particle.position, spacing, cache);
    }
    Ok(())
}
