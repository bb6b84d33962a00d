//! Leaf behaviors: timers, property animation, switches and motion

use super::{Behavior, Timing};
use crate::field::Field;
use crate::particle::{Model, ModifyOp, Particle, Property};
use glam::DVec3;

/// Does nothing; a pure timer
#[derive(Debug, Default)]
pub struct Nop {
    timing: Timing,
}

impl Nop {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Behavior for Nop {
    fn timing(&self) -> &Timing {
        &self.timing
    }

    fn timing_mut(&mut self) -> &mut Timing {
        &mut self.timing
    }

    fn update(&mut self, _field: &mut Field, _particle: &mut Particle, start: f64, end: f64) -> f64 {
        self.timing.begin(start, end);
        self.timing.finish(start, end)
    }
}

/// Animates one numeric property over the lifespan
///
/// - `Set` snapshots the property on the first window and interpolates from
///   the snapshot to the operand, so each window writes an absolute value.
/// - `Add` adds `operand * delta`; the slices sum to the operand.
/// - `Mul` multiplies by `operand ^ delta`; the slices telescope to the operand.
#[derive(Debug)]
pub struct Modify {
    timing: Timing,
    property: Property,
    op: ModifyOp,
    operand: f64,
    initial: f64,
}

impl Modify {
    pub fn new(property: Property, op: ModifyOp, operand: f64) -> Self {
        Self {
            timing: Timing::new(),
            property,
            op,
            operand,
            initial: 0.0,
        }
    }

    pub fn set(property: Property, target: f64) -> Self {
        Self::new(property, ModifyOp::Set, target)
    }

    pub fn add(property: Property, value: f64) -> Self {
        Self::new(property, ModifyOp::Add, value)
    }

    pub fn multiply(property: Property, scale: f64) -> Self {
        Self::new(property, ModifyOp::Mul, scale)
    }

    pub fn property(&self) -> Property {
        self.property
    }

    pub fn op(&self) -> ModifyOp {
        self.op
    }
}

impl Behavior for Modify {
    fn timing(&self) -> &Timing {
        &self.timing
    }

    fn timing_mut(&mut self) -> &mut Timing {
        &mut self.timing
    }

    fn update(&mut self, _field: &mut Field, particle: &mut Particle, start: f64, end: f64) -> f64 {
        let first = self.timing.begin(start, end);
        match self.op {
            ModifyOp::Set => {
                if first {
                    self.initial = particle.get(self.property);
                }
                let r = self.timing.at(end);
                particle.set(self.property, self.initial * (1.0 - r) + self.operand * r);
            }
            ModifyOp::Add => {
                let delta = self.timing.delta(start, end);
                particle.modify(self.property, ModifyOp::Add, self.operand * delta);
            }
            ModifyOp::Mul => {
                let delta = self.timing.delta(start, end);
                particle.modify(self.property, ModifyOp::Mul, self.operand.powf(delta));
            }
        }
        self.timing.finish(start, end)
    }
}

/// What a [`Switch`] does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchAction {
    /// Change the particle's model
    Model(Model),
    /// Raise the particle's `closed` flag
    Close,
}

/// Fires its action once, when the eased progress reaches 1
#[derive(Debug)]
pub struct Switch {
    timing: Timing,
    action: SwitchAction,
    done: bool,
}

impl Switch {
    pub fn new(action: SwitchAction) -> Self {
        Self {
            timing: Timing::new(),
            action,
            done: false,
        }
    }

    pub fn model(model: Model) -> Self {
        Self::new(SwitchAction::Model(model))
    }

    pub fn close() -> Self {
        Self::new(SwitchAction::Close)
    }
}

impl Behavior for Switch {
    fn timing(&self) -> &Timing {
        &self.timing
    }

    fn timing_mut(&mut self) -> &mut Timing {
        &mut self.timing
    }

    fn update(&mut self, _field: &mut Field, particle: &mut Particle, start: f64, end: f64) -> f64 {
        self.timing.begin(start, end);
        if !self.done && self.timing.at(end) >= 1.0 {
            match self.action {
                SwitchAction::Model(model) => particle.model = model,
                SwitchAction::Close => particle.closed = true,
            }
            self.done = true;
        }
        self.timing.finish(start, end)
    }
}

/// Moves the particle by an offset in its local frame, spread over the lifespan
#[derive(Debug)]
pub struct Translate {
    timing: Timing,
    offset: DVec3,
}

impl Translate {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            timing: Timing::new(),
            offset: DVec3::new(x, y, z),
        }
    }
}

impl Behavior for Translate {
    fn timing(&self) -> &Timing {
        &self.timing
    }

    fn timing_mut(&mut self) -> &mut Timing {
        &mut self.timing
    }

    fn update(&mut self, _field: &mut Field, particle: &mut Particle, start: f64, end: f64) -> f64 {
        self.timing.begin(start, end);
        let step = self.offset * self.timing.delta(start, end);
        particle.translate(step.x, step.y, step.z);
        self.timing.finish(start, end)
    }
}

/// Turns the particle by Euler angles in degrees, spread over the lifespan
#[derive(Debug)]
pub struct Rotate {
    timing: Timing,
    degrees: DVec3,
}

impl Rotate {
    pub fn new(xdeg: f64, ydeg: f64, zdeg: f64) -> Self {
        Self {
            timing: Timing::new(),
            degrees: DVec3::new(xdeg, ydeg, zdeg),
        }
    }
}

impl Behavior for Rotate {
    fn timing(&self) -> &Timing {
        &self.timing
    }

    fn timing_mut(&mut self) -> &mut Timing {
        &mut self.timing
    }

    fn update(&mut self, _field: &mut Field, particle: &mut Particle, start: f64, end: f64) -> f64 {
        self.timing.begin(start, end);
        let step = self.degrees * self.timing.delta(start, end);
        particle.rotate(step.x, step.y, step.z);
        self.timing.finish(start, end)
    }
}
