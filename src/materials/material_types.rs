//! Material types for simulation

use std::fmt;
use std::str::FromStr;

use crate::config::SolverParams;
use crate::core::Particle;
use crate::error::MpmError;
use crate::materials::granular::Sand;
use crate::materials::solids::{ElasticSolid, Snow};
use crate::math::Matrix;

/// Material family of a particle list. Chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialType {
    Snow,
    Sand,
    Elastic,
}

impl MaterialType {
    pub const ALL: [MaterialType; 3] = [Self::Snow, Self::Sand, Self::Elastic];

    pub fn material_name(&self) -> &'static str {
        match self {
            Self::Snow => "snow",
            Self::Sand => "sand",
            Self::Elastic => "elastic",
        }
    }

    /// Whether the material carries a plastic deformation that can change.
    pub fn is_plastic(&self) -> bool {
        match self {
            Self::Snow | Self::Sand => true,
            Self::Elastic => false,
        }
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.material_name())
    }
}

impl FromStr for MaterialType {
    type Err = MpmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snow" => Ok(Self::Snow),
            "sand" => Ok(Self::Sand),
            "elastic" => Ok(Self::Elastic),
            _ => Err(MpmError::UnknownMaterial(s.to_string())),
        }
    }
}

/// Constitutive behaviour of one material family.
pub trait MaterialModel {
    /// First Piola-Kirchhoff stress `P` of the particle's current state.
    fn first_piola_kirchhoff(&self, particle: &Particle) -> Matrix;

    /// Return mapping applied after `Fe` has been advanced by the grid
    /// velocity gradient.
    fn project_deformation(&self, particle: &mut Particle);
}

/// Constitutive model resolved from the run's parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    Snow(Snow),
    Sand(Sand),
    Elastic(ElasticSolid),
}

impl Material {
    pub fn from_params(params: &SolverParams) -> Self {
        let lame = params.lame();
        match params.material {
            MaterialType::Snow => Self::Snow(Snow {
                lame,
                params: params.snow,
            }),
            MaterialType::Sand => Self::Sand(Sand {
                lame,
                params: params.sand,
            }),
            MaterialType::Elastic => Self::Elastic(ElasticSolid { lame }),
        }
    }

    pub fn material_type(&self) -> MaterialType {
        match self {
            Self::Snow(_) => MaterialType::Snow,
            Self::Sand(_) => MaterialType::Sand,
            Self::Elastic(_) => MaterialType::Elastic,
        }
    }
}

impl MaterialModel for Material {
    fn first_piola_kirchhoff(&self, particle: &Particle) -> Matrix {
        match self {
            Self::Snow(model) => model.first_piola_kirchhoff(particle),
            Self::Sand(model) => model.first_piola_kirchhoff(particle),
            Self::Elastic(model) => model.first_piola_kirchhoff(particle),
        }
    }

    fn project_deformation(&self, particle: &mut Particle) {
        match self {
            Self::Snow(model) => model.project_deformation(particle),
            Self::Sand(model) => model.project_deformation(particle),
            Self::Elastic(model) => model.project_deformation(particle),
        }
    }
}
