//! Signed distance shapes used as collision boundaries.
//!
//! Distances are outward-positive: negative inside the solid, positive in free
//! space. A hollow box is a container, so its interior is free space.

use crate::error::{MpmError, MpmResult};
use crate::math::{GridSize, Point, Real, Vector};

/// Offset used for central-difference normals.
const NORMAL_EPSILON: Real = 1.0e-3;

#[derive(Clone, Debug, PartialEq)]
pub enum LevelSet {
    Sphere {
        center: Point,
        radius: Real,
    },
    /// Half-space below the plane through `point` with outward `normal`.
    Plane {
        point: Point,
        normal: Vector,
    },
    Box {
        center: Point,
        half_extents: Vector,
        hollow: bool,
    },
    Voxel(VoxelSdf),
}

impl LevelSet {
    pub fn sphere(center: Point, radius: Real) -> Self {
        Self::Sphere { center, radius }
    }

    pub fn plane(point: Point, normal: Vector) -> Self {
        Self::Plane {
            point,
            normal: normal.normalize_or(Vector::Y),
        }
    }

    pub fn solid_box(center: Point, half_extents: Vector) -> Self {
        Self::Box {
            center,
            half_extents,
            hollow: false,
        }
    }

    /// Box whose walls keep material inside.
    pub fn container(center: Point, half_extents: Vector) -> Self {
        Self::Box {
            center,
            half_extents,
            hollow: true,
        }
    }

    pub fn distance(&self, point: Point) -> Real {
        match self {
            Self::Sphere { center, radius } => (point - *center).length() - radius,
            Self::Plane { point: origin, normal } => (point - *origin).dot(*normal),
            Self::Box {
                center,
                half_extents,
                hollow,
            } => {
                let q = (point - *center).abs() - *half_extents;
                let solid = q.max(Vector::ZERO).length() + q.max_element().min(0.0);
                if *hollow { -solid } else { solid }
            }
            Self::Voxel(voxels) => voxels.sample(point),
        }
    }

    /// Signed distance and outward unit normal at `point`.
    pub fn query(&self, point: Point) -> (Real, Vector) {
        let distance = self.distance(point);
        let normal = match self {
            Self::Sphere { center, .. } => (point - *center).normalize_or(Vector::Y),
            Self::Plane { normal, .. } => *normal,
            Self::Box { .. } => self.gradient(point, NORMAL_EPSILON),
            Self::Voxel(voxels) => self.gradient(point, voxels.cell_size * 0.5),
        };
        (distance, normal)
    }

    fn gradient(&self, point: Point, epsilon: Real) -> Vector {
        let dx = Vector::X * epsilon;
        let dy = Vector::Y * epsilon;
        let dz = Vector::Z * epsilon;
        Vector::new(
            self.distance(point + dx) - self.distance(point - dx),
            self.distance(point + dy) - self.distance(point - dy),
            self.distance(point + dz) - self.distance(point - dz),
        )
        .normalize_or_zero()
    }
}

/// Dense signed-distance samples on a regular lattice.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelSdf {
    pub origin: Point,
    pub cell_size: Real,
    pub resolution: GridSize,
    values: Vec<Real>,
}

impl VoxelSdf {
    /// `values` are in x-fastest order, `resolution.x * resolution.y * resolution.z` of them.
    pub fn new(
        origin: Point,
        cell_size: Real,
        resolution: GridSize,
        values: Vec<Real>,
    ) -> MpmResult<Self> {
        let expected = resolution.x as usize * resolution.y as usize * resolution.z as usize;
        if resolution.min_element() < 2 {
            return Err(MpmError::InvalidConfig(format!(
                "voxel SDF needs at least 2 samples per axis, got {resolution}"
            )));
        }
        if values.len() != expected {
            return Err(MpmError::InvalidConfig(format!(
                "voxel SDF of resolution {resolution} needs {expected} samples, got {}",
                values.len()
            )));
        }
        if !(cell_size > 0.0) {
            return Err(MpmError::InvalidConfig(format!(
                "voxel SDF cell size must be positive, got {cell_size}"
            )));
        }
        Ok(Self {
            origin,
            cell_size,
            resolution,
            values,
        })
    }

    /// Sample an analytic level set onto a lattice.
    pub fn bake(
        source: &LevelSet,
        origin: Point,
        cell_size: Real,
        resolution: GridSize,
    ) -> MpmResult<Self> {
        let mut values = Vec::with_capacity(
            resolution.x as usize * resolution.y as usize * resolution.z as usize,
        );
        for z in 0..resolution.z {
            for y in 0..resolution.y {
                for x in 0..resolution.x {
                    let point = origin + Vector::new(x as Real, y as Real, z as Real) * cell_size;
                    values.push(source.distance(point));
                }
            }
        }
        Self::new(origin, cell_size, resolution, values)
    }

    #[inline]
    fn value(&self, x: u32, y: u32, z: u32) -> Real {
        let index = x as usize
            + y as usize * self.resolution.x as usize
            + z as usize * self.resolution.x as usize * self.resolution.y as usize;
        self.values[index]
    }

    /// Trilinear sample; points outside the lattice are clamped onto it.
    pub fn sample(&self, point: Point) -> Real {
        let max = (self.resolution - 1).as_vec3();
        let local = ((point - self.origin) / self.cell_size).clamp(Vector::ZERO, max);
        let base = local.floor().min(max - 1.0);
        let t = local - base;
        let (x0, y0, z0) = (base.x as u32, base.y as u32, base.z as u32);

        let mut result = 0.0;
        for dz in 0..2u32 {
            for dy in 0..2u32 {
                for dx in 0..2u32 {
                    let wx = if dx == 0 { 1.0 - t.x } else { t.x };
                    let wy = if dy == 0 { 1.0 - t.y } else { t.y };
                    let wz = if dz == 0 { 1.0 - t.z } else { t.z };
                    result += wx * wy * wz * self.value(x0 + dx, y0 + dy, z0 + dz);
                }
            }
        }
        result
    }
}
