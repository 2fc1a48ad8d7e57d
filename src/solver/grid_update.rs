use crate::config::SolverParams;
use crate::core::{Grid, GridUpdate};

/// Grid update stage (gravity, integration, speed bound, boundary collisions).
pub fn grid_update(grid: &mut Grid, params: &SolverParams) {
    grid.update_grid_vel(&GridUpdate::from_params(params));
}
