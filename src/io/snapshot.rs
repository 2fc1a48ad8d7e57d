//! Little-endian snapshot files.
//!
//! Particles: `i32` count, then `3 × f32` position per particle.
//! Grid: `3 × i32` dimensions, `f32` spacing, then `3 × f32` velocity per node
//! in linear index order.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use bevy::log::debug;
use bevy::prelude::Resource;

use crate::core::{Grid, ParticleList};
use crate::error::{MpmError, MpmResult};
use crate::math::{GridSize, Real, Vector};

fn write_vector(writer: &mut impl Write, v: Vector) -> io::Result<()> {
    writer.write_all(&v.x.to_le_bytes())?;
    writer.write_all(&v.y.to_le_bytes())?;
    writer.write_all(&v.z.to_le_bytes())
}

fn read_i32(reader: &mut impl Read) -> io::Result<i32> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(i32::from_le_bytes(bytes))
}

fn read_f32(reader: &mut impl Read) -> io::Result<f32> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(f32::from_le_bytes(bytes))
}

fn read_vector(reader: &mut impl Read) -> io::Result<Vector> {
    Ok(Vector::new(
        read_f32(reader)?,
        read_f32(reader)?,
        read_f32(reader)?,
    ))
}

fn count_to_i32(count: usize) -> MpmResult<i32> {
    i32::try_from(count).map_err(|_| {
        MpmError::InvalidConfig(format!("{count} entries do not fit a snapshot header"))
    })
}

fn count_from_i32(count: i32) -> io::Result<usize> {
    usize::try_from(count).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("negative snapshot count {count}"),
        )
    })
}

pub fn write_particle_positions(writer: &mut impl Write, particles: &ParticleList) -> MpmResult<()> {
    writer.write_all(&count_to_i32(particles.len())?.to_le_bytes())?;
    for position in particles.positions() {
        write_vector(writer, position)?;
    }
    Ok(())
}

pub fn read_particle_positions(reader: &mut impl Read) -> MpmResult<Vec<Vector>> {
    let count = count_from_i32(read_i32(reader)?)?;
    let mut positions = Vec::with_capacity(count);
    for _ in 0..count {
        positions.push(read_vector(reader)?);
    }
    Ok(positions)
}

pub fn write_grid_velocities(writer: &mut impl Write, grid: &Grid) -> MpmResult<()> {
    let size = grid.size();
    for axis in [size.x, size.y, size.z] {
        writer.write_all(&count_to_i32(axis as usize)?.to_le_bytes())?;
    }
    writer.write_all(&grid.spacing().to_le_bytes())?;
    for node in grid.nodes() {
        write_vector(writer, node.velocity)?;
    }
    Ok(())
}

/// Decoded grid velocity file.
#[derive(Clone, Debug, PartialEq)]
pub struct GridVelocitySnapshot {
    pub size: GridSize,
    pub spacing: Real,
    pub velocities: Vec<Vector>,
}

pub fn read_grid_velocities(reader: &mut impl Read) -> MpmResult<GridVelocitySnapshot> {
    let mut axes = [0u32; 3];
    for axis in &mut axes {
        *axis = count_from_i32(read_i32(reader)?)? as u32;
    }
    let size = GridSize::from_array(axes);
    let spacing = read_f32(reader)?;
    let count = axes.iter().map(|&axis| axis as usize).product::<usize>();
    let mut velocities = Vec::with_capacity(count);
    for _ in 0..count {
        velocities.push(read_vector(reader)?);
    }
    Ok(GridVelocitySnapshot {
        size,
        spacing,
        velocities,
    })
}

/// Writes `particles_NNNN.bin` and `v_NNNN.bin` every `interval` steps.
#[derive(Resource, Clone, Debug)]
pub struct SnapshotWriter {
    pub directory: PathBuf,
    pub interval: u64,
    pub write_grid: bool,
}

impl SnapshotWriter {
    pub fn new(directory: impl Into<PathBuf>, interval: u64) -> Self {
        Self {
            directory: directory.into(),
            interval: interval.max(1),
            write_grid: true,
        }
    }

    pub fn particles_only(mut self) -> Self {
        self.write_grid = false;
        self
    }

    pub fn should_write(&self, step: u64) -> bool {
        step % self.interval == 0
    }

    pub fn particle_path(&self, step: u64) -> PathBuf {
        self.directory.join(format!("particles_{step:04}.bin"))
    }

    pub fn grid_path(&self, step: u64) -> PathBuf {
        self.directory.join(format!("v_{step:04}.bin"))
    }

    /// Write this step's files if it falls on the interval.
    pub fn write_step(&self, grid: &Grid, particles: &ParticleList, step: u64) -> MpmResult<()> {
        if !self.should_write(step) {
            return Ok(());
        }
        fs::create_dir_all(&self.directory)?;

        let particle_path = self.particle_path(step);
        write_file(&particle_path, |writer| write_particle_positions(writer, particles))?;
        if self.write_grid {
            write_file(&self.grid_path(step), |writer| write_grid_velocities(writer, grid))?;
        }
        debug!("snapshot {} written to {}", step, self.directory.display());
        Ok(())
    }
}

fn write_file(
    path: &Path,
    body: impl FnOnce(&mut BufWriter<File>) -> MpmResult<()>,
) -> MpmResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    body(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Read a particle file written by `SnapshotWriter`.
pub fn read_particle_file(path: &Path) -> MpmResult<Vec<Vector>> {
    read_particle_positions(&mut BufReader::new(File::open(path)?))
}
