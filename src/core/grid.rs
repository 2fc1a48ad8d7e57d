//! Background grid for MPM simulation
//!
//! Dense `gx × gy × gz` lattice of nodes addressed by
//! `x + y·gx + z·gx·gy`. Only the nodes that received mass this step are
//! tracked in `non_empty_blocks`; force, velocity update and reset touch
//! nothing else.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;

use crate::config::{FAR_FIELD_DISTANCE, SolverParams};
use crate::error::{MpmError, MpmResult};
use crate::geometry::LevelSet;
use crate::materials::utils;
use crate::math::{GridCoord, GridSize, Point, Real, Vector};

use super::kernel::KERNEL_SIZE;

/// How grid nodes respond to level-set boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollisionPolicy {
    /// Coulomb friction; velocity inside the friction cone is zeroed.
    Sticky,
    /// Only the penetrating velocity is removed.
    Separating,
    /// Normal velocity is removed, tangential kept.
    Slipping,
}

impl CollisionPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sticky => "sticky",
            Self::Separating => "separating",
            Self::Slipping => "slipping",
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CollisionPolicy {
    type Err = MpmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sticky" => Ok(Self::Sticky),
            "separating" => Ok(Self::Separating),
            "slipping" => Ok(Self::Slipping),
            _ => Err(MpmError::UnknownCollisionPolicy(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridNode {
    pub mass: Real,
    /// Momentum during P2G, velocity afterwards.
    pub velocity: Vector,
    pub force: Vector,
    /// Baked signed distance to the closest boundary.
    pub sdf: Real,
    pub sdf_normal: Vector,
}

impl GridNode {
    #[inline(always)]
    pub fn zeroed() -> Self {
        Self {
            mass: 0.0,
            velocity: Vector::ZERO,
            force: Vector::ZERO,
            sdf: FAR_FIELD_DISTANCE,
            sdf_normal: Vector::ZERO,
        }
    }

    /// Clear the per-step fields; the baked boundary stays.
    #[inline(always)]
    pub fn zero(&mut self) {
        self.mass = 0.0;
        self.velocity = Vector::ZERO;
        self.force = Vector::ZERO;
    }

    #[inline(always)]
    pub fn momentum(&self) -> Vector {
        self.velocity * self.mass
    }
}

/// Time-step constants read by the grid velocity update.
#[derive(Clone, Copy, Debug)]
pub struct GridUpdate {
    pub dt: Real,
    pub gravity: Vector,
    pub max_speed: Real,
    pub policy: CollisionPolicy,
    pub friction: Real,
}

impl GridUpdate {
    pub fn from_params(params: &SolverParams) -> Self {
        Self {
            dt: params.dt,
            gravity: params.gravity,
            max_speed: params.max_node_speed(),
            policy: params.collision,
            friction: params.friction,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Grid {
    size: GridSize,
    spacing: Real,
    nodes: Vec<GridNode>,
    non_empty_blocks: IndexSet<usize>,
}

impl Grid {
    pub fn new(size: GridSize, spacing: Real) -> Self {
        let count = size.x as usize * size.y as usize * size.z as usize;
        Self {
            size,
            spacing,
            nodes: vec![GridNode::zeroed(); count],
            non_empty_blocks: IndexSet::new(),
        }
    }

    pub fn from_params(params: &SolverParams) -> Self {
        Self::new(params.grid_resolution, params.spacing)
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn spacing(&self) -> Real {
        self.spacing
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[GridNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&GridNode> {
        self.nodes.get(index)
    }

    pub fn node_at(&self, coord: GridCoord) -> MpmResult<&GridNode> {
        let index = self.linear_index(coord)?;
        Ok(&self.nodes[index])
    }

    /// Nodes holding mass this step, in first-touch order.
    pub fn non_empty_blocks(&self) -> &IndexSet<usize> {
        &self.non_empty_blocks
    }

    #[inline(always)]
    pub fn is_valid_coord(&self, coord: GridCoord) -> bool {
        coord.cmpge(GridCoord::ZERO).all() && coord.cmplt(self.size.as_ivec3()).all()
    }

    #[inline(always)]
    pub fn linear_index(&self, coord: GridCoord) -> MpmResult<usize> {
        if !self.is_valid_coord(coord) {
            return Err(MpmError::GridIndexOutOfBounds {
                index: coord,
                size: self.size,
            });
        }
        Ok(self.linear_index_unchecked(coord))
    }

    #[inline(always)]
    fn linear_index_unchecked(&self, coord: GridCoord) -> usize {
        let (gx, gy) = (self.size.x as usize, self.size.y as usize);
        coord.x as usize + coord.y as usize * gx + coord.z as usize * gx * gy
    }

    #[inline(always)]
    pub fn coord_of(&self, index: usize) -> GridCoord {
        let (gx, gy) = (self.size.x as usize, self.size.y as usize);
        GridCoord::new(
            (index % gx) as i32,
            ((index / gx) % gy) as i32,
            (index / (gx * gy)) as i32,
        )
    }

    /// World position of a node.
    #[inline(always)]
    pub fn node_position(&self, coord: GridCoord) -> Point {
        coord.as_vec3() * self.spacing
    }

    /// Whether the whole stencil starting at `base` lies in the grid.
    #[inline]
    pub fn stencil_in_bounds(&self, base: GridCoord) -> bool {
        self.is_valid_coord(base) && self.is_valid_coord(base + GridCoord::splat(KERNEL_SIZE as i32 - 1))
    }

    /// Scatter mass and momentum into a node.
    #[inline]
    pub fn accumulate(&mut self, coord: GridCoord, mass: Real, momentum: Vector) -> MpmResult<()> {
        let index = self.linear_index(coord)?;
        if mass != 0.0 {
            self.non_empty_blocks.insert(index);
        }
        let node = &mut self.nodes[index];
        node.mass += mass;
        node.velocity += momentum;
        Ok(())
    }

    #[inline]
    pub fn add_force(&mut self, coord: GridCoord, force: Vector) -> MpmResult<()> {
        let index = self.linear_index(coord)?;
        self.nodes[index].force += force;
        Ok(())
    }

    /// Momentum to velocity on every touched node.
    pub fn normalize_velocities(&mut self) {
        for &index in &self.non_empty_blocks {
            let node = &mut self.nodes[index];
            node.velocity *= utils::inv_exact(node.mass);
        }
    }

    /// First non-empty node whose force is NaN or infinite.
    pub fn first_non_finite_force(&self) -> Option<(usize, Vector)> {
        self.non_empty_blocks
            .iter()
            .map(|&index| (index, self.nodes[index].force))
            .find(|(_, force)| !force.is_finite())
    }

    /// Bake the closest level set into every node.
    pub fn parse_level_sets(&mut self, level_sets: &[LevelSet]) {
        let spacing = self.spacing;
        let (gx, gy) = (self.size.x as usize, self.size.y as usize);
        for (index, node) in self.nodes.iter_mut().enumerate() {
            let coord = GridCoord::new(
                (index % gx) as i32,
                ((index / gx) % gy) as i32,
                (index / (gx * gy)) as i32,
            );
            let position = coord.as_vec3() * spacing;
            node.sdf = FAR_FIELD_DISTANCE;
            node.sdf_normal = Vector::ZERO;
            for level_set in level_sets {
                let (distance, normal) = level_set.query(position);
                if distance < node.sdf {
                    node.sdf = distance;
                    node.sdf_normal = normal;
                }
            }
        }
    }

    /// Trilinear sample of the baked boundary at a point in index units,
    /// clamped to the grid.
    pub fn sample_boundary(&self, index_position: Vector) -> (Real, Vector) {
        let max = (self.size - 1).as_vec3();
        let local = index_position.clamp(Vector::ZERO, max);
        let base = local.floor().min(max - 1.0).max(Vector::ZERO);
        let t = local - base;
        let base = base.as_ivec3();

        let mut distance = 0.0;
        let mut normal = Vector::ZERO;
        for dz in 0..2 {
            for dy in 0..2 {
                for dx in 0..2 {
                    let wx = if dx == 0 { 1.0 - t.x } else { t.x };
                    let wy = if dy == 0 { 1.0 - t.y } else { t.y };
                    let wz = if dz == 0 { 1.0 - t.z } else { t.z };
                    let weight = wx * wy * wz;
                    let node = &self.nodes[self.linear_index_unchecked(base + GridCoord::new(dx, dy, dz))];
                    distance += weight * node.sdf;
                    normal += weight * node.sdf_normal;
                }
            }
        }
        (distance, normal.normalize_or_zero())
    }

    /// Apply gravity, integrate, bound the speed and resolve boundary
    /// collisions on every non-empty node.
    pub fn update_grid_vel(&mut self, update: &GridUpdate) {
        let dt = update.dt;
        for position in 0..self.non_empty_blocks.len() {
            let index = self.non_empty_blocks[position];
            let coord = self.coord_of(index);

            let (velocity, own_sdf) = {
                let node = &mut self.nodes[index];
                node.force += node.mass * update.gravity;
                node.velocity += node.force * dt * utils::inv_exact(node.mass);
                node.velocity = node
                    .velocity
                    .clamp(Vector::splat(-update.max_speed), Vector::splat(update.max_speed));
                (node.velocity, node.sdf)
            };

            let predicted = coord.as_vec3() + velocity * dt / self.spacing;
            let (predicted_sdf, normal) = self.sample_boundary(predicted);
            self.nodes[index].velocity = resolve_collision(
                velocity,
                predicted_sdf,
                own_sdf,
                normal,
                dt,
                update.policy,
                update.friction,
            );
        }
    }

    /// Zero the nodes touched this step and forget them.
    pub fn reset(&mut self) {
        for &index in &self.non_empty_blocks {
            self.nodes[index].zero();
        }
        self.non_empty_blocks.clear();
    }

    pub fn total_mass(&self) -> Real {
        self.non_empty_blocks
            .iter()
            .map(|&index| self.nodes[index].mass)
            .sum()
    }

    pub fn total_momentum(&self) -> Vector {
        self.non_empty_blocks
            .iter()
            .map(|&index| self.nodes[index].momentum())
            .sum()
    }
}

/// Node-level level-set collision.
///
/// `predicted_sdf` is the boundary distance at the node's predicted position
/// after this step, `own_sdf` the distance baked at the node itself.
pub fn resolve_collision(
    velocity: Vector,
    predicted_sdf: Real,
    own_sdf: Real,
    normal: Vector,
    dt: Real,
    policy: CollisionPolicy,
    friction: Real,
) -> Vector {
    let phi = predicted_sdf - own_sdf.min(0.0);
    let colliding = phi < 0.0 || (policy == CollisionPolicy::Slipping && own_sdf < 0.0);
    if !colliding {
        return velocity;
    }

    let delta_v = -phi.min(0.0) * normal / dt;
    let corrected = velocity + delta_v;
    let normal_part = corrected.dot(normal) * normal;
    let tangential = corrected - normal_part;

    match policy {
        CollisionPolicy::Sticky => {
            let tangential_speed = tangential.length();
            if tangential_speed <= friction * normal_part.length() {
                Vector::ZERO
            } else {
                let damping = tangential_speed.min(friction * delta_v.length());
                normal_part + tangential * (1.0 - damping / tangential_speed)
            }
        }
        CollisionPolicy::Separating => corrected,
        CollisionPolicy::Slipping => tangential,
    }
}
