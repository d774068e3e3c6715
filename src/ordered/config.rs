//! Run-time configuration for treap containers.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Construction options for [`TreapMap`](super::TreapMap) and
/// [`TreapSet`](super::TreapSet).
///
/// By default priorities are drawn from a generator seeded by the operating
/// system, so two maps built from the same input generally have different
/// shapes. Supplying a seed makes the shape reproducible.
///
/// # Examples
///
/// ```rust
/// use ts_collections::ordered::{NaturalOrder, TreapConfig, TreapMap};
///
/// let config = TreapConfig::new().seed(7).capacity(128);
/// let mut map: TreapMap<u32, u32> = TreapMap::with_config(config, NaturalOrder);
/// map.insert(1, 10);
/// assert_eq!(map.get(&1), Some(&10));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreapConfig {
    seed: Option<u64>,
    capacity: usize,
}

impl TreapConfig {
    /// Creates the default configuration: OS-seeded priorities, no
    /// pre-allocated node storage.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            seed: None,
            capacity: 0,
        }
    }

    /// Seeds the priority generator.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Pre-allocates storage for `capacity` nodes.
    #[must_use]
    pub const fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// The configured seed, if any.
    #[must_use]
    pub const fn seed_value(&self) -> Option<u64> {
        self.seed
    }

    /// The configured node capacity.
    #[must_use]
    pub const fn capacity_value(&self) -> usize {
        self.capacity
    }

    pub(crate) fn priority_source(&self) -> PrioritySource {
        self.seed
            .map_or_else(PrioritySource::from_os, PrioritySource::seeded)
    }
}

/// Uniform source of node priorities.
#[derive(Clone, Debug)]
pub(crate) struct PrioritySource {
    generator: SmallRng,
}

impl PrioritySource {
    pub(crate) fn from_os() -> Self {
        Self {
            generator: SmallRng::from_os_rng(),
        }
    }

    pub(crate) fn seeded(seed: u64) -> Self {
        Self {
            generator: SmallRng::seed_from_u64(seed),
        }
    }

    /// Draws the priority for a freshly created node.
    pub(crate) fn draw(&mut self) -> u64 {
        self.generator.random()
    }

    /// Derives an independent generator for a tree split off this one.
    ///
    /// Deterministic: a seeded parent always forks the same child stream.
    pub(crate) fn fork(&mut self) -> Self {
        Self {
            generator: SmallRng::from_rng(&mut self.generator),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_default_config_has_no_seed() {
        let config = TreapConfig::default();
        assert_eq!(config.seed_value(), None);
        assert_eq!(config.capacity_value(), 0);
        assert_eq!(config, TreapConfig::new());
    }

    #[rstest]
    fn test_builder_sets_fields() {
        let config = TreapConfig::new().seed(42).capacity(16);
        assert_eq!(config.seed_value(), Some(42));
        assert_eq!(config.capacity_value(), 16);
    }

    #[rstest]
    fn test_seeded_sources_are_reproducible() {
        let mut first = TreapConfig::new().seed(9).priority_source();
        let mut second = TreapConfig::new().seed(9).priority_source();
        let drawn_first: Vec<u64> = (0..8).map(|_| first.draw()).collect();
        let drawn_second: Vec<u64> = (0..8).map(|_| second.draw()).collect();
        assert_eq!(drawn_first, drawn_second);
    }

    #[rstest]
    fn test_fork_is_deterministic_for_seeded_parent() {
        let mut first = PrioritySource::seeded(3);
        let mut second = PrioritySource::seeded(3);
        let mut child_first = first.fork();
        let mut child_second = second.fork();
        assert_eq!(child_first.draw(), child_second.draw());
        assert_eq!(first.draw(), second.draw());
    }
}
