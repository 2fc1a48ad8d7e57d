//! Material particles for MPM simulation
//!
//! Particles carry position, velocity, mass and the deformation history the
//! constitutive models read.

use crate::materials::MaterialType;
use crate::materials::utils::check;
use crate::math::{
    Matrix, Real, Vector, identity_matrix, matrix_determinant, matrix_is_finite, zero_matrix,
    zero_vector,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vector,
    /// Position at creation.
    pub original_position: Vector,
    pub mass: Real,
    pub velocity: Vector,
    /// APIC affine velocity matrix `Bp`.
    pub affine_momentum_matrix: Matrix,
    /// Elastic deformation gradient `Fe`.
    pub elastic_deformation: Matrix,
    /// Plastic deformation gradient `Fp`.
    pub plastic_deformation: Matrix,
    /// Drucker-Prager yield-surface size (sand only).
    pub alpha: Real,
    /// Accumulated plastic strain driving sand hardening.
    pub hardening_state: Real,
}

impl Particle {
    pub fn new(position: Vector, mass: Real) -> Self {
        Self {
            position,
            original_position: position,
            mass,
            velocity: zero_vector(),
            affine_momentum_matrix: zero_matrix(),
            elastic_deformation: identity_matrix(),
            plastic_deformation: identity_matrix(),
            alpha: 0.0,
            hardening_state: 0.0,
        }
    }

    pub fn with_velocity(mut self, velocity: Vector) -> Self {
        self.velocity = velocity;
        self
    }

    /// Resume from a full mid-simulation state.
    pub fn with_state(
        mut self,
        affine_momentum_matrix: Matrix,
        elastic_deformation: Matrix,
        plastic_deformation: Matrix,
        alpha: Real,
        hardening_state: Real,
    ) -> Self {
        self.affine_momentum_matrix = affine_momentum_matrix;
        self.elastic_deformation = elastic_deformation;
        self.plastic_deformation = plastic_deformation;
        self.alpha = alpha;
        self.hardening_state = hardening_state;
        self
    }

    #[inline(always)]
    pub fn volume(&self, density: Real) -> Real {
        self.mass / density
    }

    #[inline(always)]
    pub fn momentum(&self) -> Vector {
        self.velocity * self.mass
    }

    #[inline(always)]
    pub fn jacobian(&self) -> Real {
        matrix_determinant(&self.elastic_deformation)
    }

    #[inline(always)]
    pub fn plastic_jacobian(&self) -> Real {
        matrix_determinant(&self.plastic_deformation)
    }

    /// Total deformation gradient `F = Fe · Fp`.
    #[inline(always)]
    pub fn deformation_gradient(&self) -> Matrix {
        self.elastic_deformation * self.plastic_deformation
    }

    /// Reason the state is unusable, if any.
    pub fn state_violation(&self) -> Option<String> {
        if !(self.mass > 0.0 && self.mass.is_finite()) {
            return Some(format!("mass must be positive, got {}", self.mass));
        }
        if !self.position.is_finite() || !self.velocity.is_finite() {
            return Some("position and velocity must be finite".to_string());
        }
        if !matrix_is_finite(&self.affine_momentum_matrix)
            || !matrix_is_finite(&self.plastic_deformation)
        {
            return Some("affine and plastic matrices must be finite".to_string());
        }
        if !check::deformation_gradient_ok(self.jacobian()) {
            return Some(format!(
                "elastic deformation must be invertible with det > 0, got {}",
                self.jacobian()
            ));
        }
        None
    }
}

/// Material-homogeneous particle collection. Identity is the array position.
#[derive(Clone, Debug)]
pub struct ParticleList {
    particles: Vec<Particle>,
    material: MaterialType,
}

impl ParticleList {
    pub fn new(material: MaterialType) -> Self {
        Self {
            particles: Vec::new(),
            material,
        }
    }

    /// Build from initial `(position, mass)` pairs.
    pub fn from_positions(
        material: MaterialType,
        source: impl IntoIterator<Item = (Vector, Real)>,
    ) -> Self {
        Self {
            particles: source
                .into_iter()
                .map(|(position, mass)| Particle::new(position, mass))
                .collect(),
            material,
        }
    }

    pub fn from_particles(material: MaterialType, particles: Vec<Particle>) -> Self {
        Self {
            particles,
            material,
        }
    }

    pub fn material(&self) -> MaterialType {
        self.material
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn push(&mut self, particle: Particle) -> usize {
        let index = self.particles.len();
        self.particles.push(particle);
        index
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn positions(&self) -> impl Iterator<Item = Vector> + '_ {
        self.particles.iter().map(|particle| particle.position)
    }

    pub fn total_mass(&self) -> Real {
        self.particles.iter().map(|particle| particle.mass).sum()
    }

    pub fn total_momentum(&self) -> Vector {
        self.particles.iter().map(Particle::momentum).sum()
    }

    pub fn center_of_mass(&self) -> Vector {
        let total_mass = self.total_mass();
        if total_mass <= 0.0 {
            return zero_vector();
        }
        self.particles
            .iter()
            .map(|particle| particle.position * particle.mass)
            .sum::<Vector>()
            / total_mass
    }

    pub fn center_of_mass_velocity(&self) -> Vector {
        let total_mass = self.total_mass();
        if total_mass <= 0.0 {
            return zero_vector();
        }
        self.total_momentum() / total_mass
    }
}
