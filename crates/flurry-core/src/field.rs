//! The field: owner of every live particle

use crate::error::{Error, Result};
use crate::gen::{BehaviorGen, Sibling};
use crate::particle::Particle;
use crate::rng::PatternRng;
use serde::{Deserialize, Serialize};
use std::mem;

/// Field settings, loadable from RON
///
/// ```
/// use flurry_core::FieldConfig;
///
/// let config = FieldConfig::from_ron("(seed: 7)").unwrap();
/// assert_eq!(config.seed, 7);
/// assert_eq!(config.capacity, FieldConfig::default().capacity);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Seed of the RNG behind `random-*` choices
    pub seed: u64,
    /// Number of particles to reserve room for up front
    pub capacity: usize,
}

impl FieldConfig {
    /// Parse a configuration from RON text
    pub fn from_ron(text: &str) -> Result<Self> {
        let config: FieldConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<()> {
        if self.seed == 0 {
            return Err(Error::InvalidConfig("seed must be non-zero".to_string()));
        }
        Ok(())
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            capacity: 256,
        }
    }
}

/// An unordered bag of live particles
#[derive(Debug)]
pub struct Field {
    particles: Vec<Particle>,
    rng: PatternRng,
    config: FieldConfig,
}

impl Field {
    pub fn new(config: FieldConfig) -> Self {
        Self {
            particles: Vec::with_capacity(config.capacity),
            rng: PatternRng::new(config.seed),
            config,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Take ownership of a particle
    ///
    /// A particle added during [`Field::update`] is driven in the same call.
    pub fn add(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Instantiate a root behavior and add a particle at the origin for it
    pub fn spawn(&mut self, gen: &BehaviorGen) {
        let behavior = gen.generate(Sibling::SINGLE, &mut self.rng);
        self.add(Particle::new(behavior));
    }

    /// Remove every particle
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.particles.iter_mut()
    }

    pub fn rng_mut(&mut self) -> &mut PatternRng {
        &mut self.rng
    }

    /// Advance every particle by `dt`
    ///
    /// Each particle's behavior gets the window `[life_time, life_time + dt)`,
    /// then the particle moves forward by `speed * dt`. Particles whose
    /// behavior completed are removed by swapping in the last particle, which
    /// is then processed in its place.
    pub fn update(&mut self, dt: f64) {
        if dt.is_nan() || dt <= 0.0 {
            return;
        }

        let before = self.particles.len();
        let mut removed = 0;
        let mut i = 0;
        while i < self.particles.len() {
            let mut particle = mem::take(&mut self.particles[i]);
            let start = particle.life_time;
            let end = start + dt;

            let leftover = match particle.behavior.take() {
                Some(mut behavior) => {
                    let leftover = behavior.update(self, &mut particle, start, end);
                    particle.behavior = Some(behavior);
                    leftover
                }
                None => 0.0,
            };
            particle.life_time = end;
            particle.translate(0.0, 0.0, particle.speed * dt);

            if leftover >= 0.0 {
                self.particles.swap_remove(i);
                removed += 1;
            } else {
                self.particles[i] = particle;
                i += 1;
            }
        }

        tracing::trace!(
            dt,
            live = self.particles.len(),
            spawned = self.particles.len() + removed - before,
            removed,
            "field updated"
        );
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new(FieldConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{Behavior, Emit, Loop, Modify, Nop};
    use crate::gen::Gen;
    use crate::particle::Property;
    use glam::DVec3;

    fn timed(mut behavior: impl Behavior + 'static, lifespan: f64) -> Box<dyn Behavior> {
        behavior.set_lifespan(lifespan);
        Box::new(behavior)
    }

    #[test]
    fn test_non_positive_dt_is_ignored() {
        let mut field = Field::default();
        field.add(Particle {
            speed: 1.0,
            ..Particle::new(timed(Nop::new(), 5.0))
        });

        field.update(0.0);
        field.update(-1.0);
        field.update(f64::NAN);
        let particle = field.iter().next().map(|p| (p.life_time, p.position));
        assert_eq!(particle, Some((0.0, DVec3::ZERO)));
    }

    #[test]
    fn test_forward_motion_and_removal() {
        let mut field = Field::default();
        field.add(Particle {
            speed: 2.0,
            ..Particle::new(timed(Nop::new(), 1.0))
        });

        field.update(0.5);
        assert_eq!(field.len(), 1);
        let position = field.iter().next().map(|p| p.position);
        assert_eq!(position, Some(DVec3::new(0.0, 0.0, 1.0)));

        field.update(0.5);
        assert!(field.is_empty());
    }

    #[test]
    fn test_swapped_in_particle_still_updates() {
        let mut field = Field::default();
        field.add(Particle::new(timed(Nop::new(), 1.0)));
        field.add(Particle::new(timed(Modify::add(Property::Hue, 10.0), 10.0)));

        field.update(1.0);
        assert_eq!(field.len(), 1);
        let hue = field.iter().next().map(|p| (p.hue, p.life_time));
        assert_eq!(hue, Some((1.0, 1.0)));
    }

    #[test]
    fn test_spawned_particle_advances_same_tick() {
        let mut field = Field::default();
        let child = Gen::new(|_: Sibling, _: &mut PatternRng| timed(Nop::new(), 10.0));
        let mut emit = Emit::new(1, 1, 1, child);
        emit.set_lifespan(0.0);
        field.add(Particle::new(Box::new(emit)));

        field.update(0.25);
        assert_eq!(field.len(), 1);
        let life_time = field.iter().next().map(|p| p.life_time);
        assert_eq!(life_time, Some(0.25));
    }

    #[test]
    fn test_spawn_and_clear() {
        let mut field = Field::new(FieldConfig {
            seed: 99,
            capacity: 4,
        });
        let body = Gen::new(|_: Sibling, _: &mut PatternRng| timed(Nop::new(), 1.0));
        let root = Gen::new(move |sibling: Sibling, _: &mut PatternRng| {
            Box::new(Loop::new(body.clone(), sibling)) as Box<dyn Behavior>
        });

        field.spawn(&root);
        field.spawn(&root);
        field.update(3.5);
        assert_eq!(field.len(), 2);

        field.clear();
        assert!(field.is_empty());
        assert_eq!(field.config().seed, 99);
    }

    #[test]
    fn test_config_from_ron() {
        let config = FieldConfig::from_ron("(seed: 42, capacity: 16)").unwrap();
        assert_eq!(
            config,
            FieldConfig {
                seed: 42,
                capacity: 16
            }
        );

        assert!(matches!(
            FieldConfig::from_ron("(seed: 0)"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            FieldConfig::from_ron("(seed: \"x\")"),
            Err(Error::Config(_))
        ));
    }
}
