//! Construction-time configuration.

use core::marker::PhantomData;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::error::Error;
use crate::level::LevelGenerator;
use crate::map::SkipMap;

/// Upper bound on how many levels an entry may be promoted above level 0.
pub const MAX_LEVEL: usize = 32;

/// Skip list configuration.
///
/// # Example
///
/// ```
/// use nexus_skiplist::Config;
///
/// let config = Config { max_level: 8, ..Config::default() };
/// assert!(config.validate().is_ok());
///
/// let config = Config { max_level: 64, ..Config::default() };
/// assert!(config.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Promotion cap. An entry occupies at most `max_level + 1` levels.
    pub max_level: usize,
    /// Seed for the promotion RNG. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Node slots to reserve up front.
    pub capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_level: MAX_LEVEL,
            seed: None,
            capacity: 0,
        }
    }
}

impl Config {
    /// Checks that every field is in range.
    pub fn validate(&self) -> Result<(), Error> {
        validate_max_level(self.max_level)
    }

    fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        }
    }
}

pub(crate) fn validate_max_level(max_level: usize) -> Result<(), Error> {
    if max_level > MAX_LEVEL {
        return Err(Error::InvalidArgument(format!(
            "max_level {max_level} exceeds the limit of {MAX_LEVEL}"
        )));
    }
    Ok(())
}

/// Builder for a [`SkipMap`] with the default RNG and storage.
///
/// # Example
///
/// ```
/// use nexus_skiplist::SkipMap;
///
/// let mut map = SkipMap::builder().max_level(12).seed(7).capacity(1024).build().unwrap();
/// map.set(1u64, "one");
/// assert_eq!(map.get(&1), Some(&"one"));
/// ```
#[derive(Debug, Clone)]
pub struct Builder<K, V> {
    config: Config,
    _marker: PhantomData<(K, V)>,
}

impl<K: Ord, V> Builder<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            config: Config::default(),
            _marker: PhantomData,
        }
    }

    /// Sets the promotion cap (0..=32).
    pub fn max_level(mut self, max_level: usize) -> Self {
        self.config.max_level = max_level;
        self
    }

    /// Seeds the promotion RNG for reproducible tower shapes.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Reserves node slots up front.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Validates the configuration and builds the map.
    pub fn build(self) -> Result<SkipMap<K, V>, Error> {
        self.config.validate()?;
        let levels = LevelGenerator::with_max_level(self.config.rng(), self.config.max_level)?;
        let mut map = SkipMap::from_parts(levels, slab::Slab::new());
        map.reserve(self.config.capacity);
        Ok(map)
    }
}
