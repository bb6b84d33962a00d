//! Particles: the entities patterns animate

use crate::behavior::Behavior;
use glam::{DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Render model of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Model {
    #[default]
    Arrow,
    Claw,
    Orb,
}

impl Model {
    /// Every model, in name-table order
    pub const ALL: [Model; 3] = [Model::Arrow, Model::Claw, Model::Orb];

    /// The name used in pattern source
    pub fn name(&self) -> &'static str {
        match self {
            Model::Arrow => "arrow",
            Model::Claw => "claw",
            Model::Orb => "orb",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scalar particle property that behaviors animate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    Speed,
    Opacity,
    Hue,
}

impl Property {
    /// The name used in pattern source
    pub fn name(&self) -> &'static str {
        match self {
            Property::Speed => "speed",
            Property::Opacity => "opacity",
            Property::Hue => "hue",
        }
    }
}

/// An operation to modify a numeric property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifyOp {
    /// Set to the value
    Set,
    /// Add the value
    Add,
    /// Multiply by the value
    Mul,
}

impl ModifyOp {
    /// Apply this operation to a current value
    pub fn apply(&self, current: f64, operand: f64) -> f64 {
        match self {
            ModifyOp::Set => operand,
            ModifyOp::Add => current + operand,
            ModifyOp::Mul => current * operand,
        }
    }
}

/// A live particle
#[derive(Debug)]
pub struct Particle {
    /// World position
    pub position: DVec3,
    /// Orientation; movement is expressed in this local frame
    pub rotation: DQuat,
    /// Forward speed in units per time unit
    pub speed: f64,
    pub opacity: f64,
    pub hue: f64,
    /// Raised by `close`, consumed by whoever owns the render side
    pub closed: bool,
    pub model: Model,
    /// Local clock, advanced by the field every update
    pub life_time: f64,
    pub(crate) behavior: Option<Box<dyn Behavior>>,
}

impl Particle {
    /// Create a particle at the origin driven by `behavior`
    pub fn new(behavior: Box<dyn Behavior>) -> Self {
        Self {
            behavior: Some(behavior),
            ..Self::default()
        }
    }

    /// The driving behavior
    pub fn behavior(&self) -> Option<&dyn Behavior> {
        self.behavior.as_deref()
    }

    /// Read a numeric property
    pub fn get(&self, property: Property) -> f64 {
        match property {
            Property::Speed => self.speed,
            Property::Opacity => self.opacity,
            Property::Hue => self.hue,
        }
    }

    /// Write a numeric property
    pub fn set(&mut self, property: Property, value: f64) {
        match property {
            Property::Speed => self.speed = value,
            Property::Opacity => self.opacity = value,
            Property::Hue => self.hue = value,
        }
    }

    /// Apply `op` to a numeric property
    pub fn modify(&mut self, property: Property, op: ModifyOp, operand: f64) {
        let current = self.get(property);
        self.set(property, op.apply(current, operand));
    }

    /// Move by an offset given in the particle's local frame
    pub fn translate(&mut self, x: f64, y: f64, z: f64) {
        self.position += self.rotation * DVec3::new(x, y, z);
    }

    /// Turn by Euler angles in degrees, composed in the local frame
    pub fn rotate(&mut self, xdeg: f64, ydeg: f64, zdeg: f64) {
        let turn = DQuat::from_euler(
            EulerRot::XYZ,
            xdeg.to_radians(),
            ydeg.to_radians(),
            zdeg.to_radians(),
        );
        self.rotation = (self.rotation * turn).normalize();
    }

    /// Create a child particle driven by `behavior`
    ///
    /// The child starts where the parent is, facing the same way, with the
    /// parent's speed, hue and model. Opacity starts from the default.
    pub fn spawn(&self, behavior: Box<dyn Behavior>) -> Particle {
        Particle {
            position: self.position,
            rotation: self.rotation,
            speed: self.speed,
            hue: self.hue,
            model: self.model,
            behavior: Some(behavior),
            ..Particle::default()
        }
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
            speed: 0.0,
            opacity: 1.0,
            hue: 0.0,
            closed: false,
            model: Model::default(),
            life_time: 0.0,
            behavior: None,
        }
    }
}
