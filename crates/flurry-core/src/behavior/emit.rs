//! Emission of child particles in timed batches

use super::{Behavior, Timing};
use crate::field::Field;
use crate::gen::{BehaviorGen, Sibling};
use crate::particle::Particle;

/// Spawns `count * parallel` children in each of `times` evenly eased slots
///
/// Every child gets a distinct sibling index out of
/// `count * times * parallel`: slot `t`, member `n` and parallel copy `p`
/// map to `n + count * t + times * count * p`. A slot `i` (1-based) fires in
/// the window whose eased progress crosses `i / times`.
#[derive(Debug)]
pub struct Emit {
    timing: Timing,
    times: usize,
    body: BehaviorGen,
    slots: Vec<Vec<usize>>,
    total: usize,
}

impl Emit {
    pub fn new(count: usize, times: usize, parallel: usize, body: BehaviorGen) -> Self {
        let slots = (0..times)
            .map(|t| {
                (0..count)
                    .flat_map(|n| (0..parallel).map(move |p| n + count * t + times * count * p))
                    .collect()
            })
            .collect();
        Self {
            timing: Timing::new(),
            times,
            body,
            slots,
            total: count * times * parallel,
        }
    }

    /// Number of children spawned over the whole lifespan
    pub fn total(&self) -> usize {
        self.total
    }
}

impl Behavior for Emit {
    fn timing(&self) -> &Timing {
        &self.timing
    }

    fn timing_mut(&mut self) -> &mut Timing {
        &mut self.timing
    }

    fn update(&mut self, field: &mut Field, particle: &mut Particle, start: f64, end: f64) -> f64 {
        self.timing.begin(start, end);
        let times = self.times as f64;
        let l = self.timing.at(start) * times;
        let r = self.timing.at(end) * times;

        let first = l.floor() as usize + 1;
        let last = (r.floor() as usize).min(self.times);
        for slot in first..=last {
            for &index in &self.slots[slot - 1] {
                let behavior = self
                    .body
                    .generate(Sibling::new(index, self.total), field.rng_mut());
                field.add(particle.spawn(behavior));
            }
        }
        self.timing.finish(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::Nop;
    use crate::field::FieldConfig;
    use crate::gen::Gen;
    use crate::rng::PatternRng;

    /// Children whose lifespan records their sibling index
    fn indexed_body() -> BehaviorGen {
        Gen::new(|sibling: Sibling, _: &mut PatternRng| {
            let mut nop = Nop::new();
            nop.set_lifespan(sibling.index as f64 + 1000.0);
            Box::new(nop) as Box<dyn Behavior>
        })
    }

    fn spawned_indices(field: &Field) -> Vec<usize> {
        let mut indices: Vec<usize> = field
            .iter()
            .map(|p| p.behavior().map_or(0.0, |b| b.lifespan() - 1000.0) as usize)
            .collect();
        indices.sort_unstable();
        indices
    }

    #[test]
    fn test_single_slot_spawns_whole_batch() {
        let mut field = Field::new(FieldConfig::default());
        let mut particle = Particle::default();
        let mut emit = Emit::new(3, 1, 1, indexed_body());
        emit.set_lifespan(1.0);

        assert!(emit.update(&mut field, &mut particle, 0.0, 1.0) >= 0.0);
        assert_eq!(field.len(), 3);
        assert_eq!(spawned_indices(&field), vec![0, 1, 2]);
    }

    #[test]
    fn test_one_child_per_crossed_slot() {
        let mut field = Field::new(FieldConfig::default());
        let mut particle = Particle::default();
        let mut emit = Emit::new(1, 3, 1, indexed_body());
        emit.set_lifespan(3.0);

        assert!(emit.update(&mut field, &mut particle, 0.0, 0.5) < 0.0);
        assert_eq!(field.len(), 0);
        emit.update(&mut field, &mut particle, 0.5, 1.5);
        assert_eq!(field.len(), 1);
        emit.update(&mut field, &mut particle, 1.5, 2.5);
        assert_eq!(field.len(), 2);
        assert!(emit.update(&mut field, &mut particle, 2.5, 4.0) >= 0.0);
        assert_eq!(spawned_indices(&field), vec![0, 1, 2]);
    }

    #[test]
    fn test_parallel_copies_get_distinct_indices() {
        let mut field = Field::new(FieldConfig::default());
        let mut particle = Particle::default();
        let mut emit = Emit::new(2, 2, 2, indexed_body());
        assert_eq!(emit.total(), 8);

        // zero lifespan: every slot fires in the first window
        emit.update(&mut field, &mut particle, 0.0, 0.1);
        assert_eq!(spawned_indices(&field), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_children_inherit_parent_state() {
        let mut field = Field::new(FieldConfig::default());
        let mut particle = Particle {
            speed: 3.0,
            hue: 200.0,
            ..Particle::default()
        };
        let mut emit = Emit::new(1, 1, 1, indexed_body());
        emit.update(&mut field, &mut particle, 0.0, 1.0);
        let child = field.iter().next().map(|p| (p.speed, p.hue));
        assert_eq!(child, Some((3.0, 200.0)));
    }
}
