//! Promotion height generator.

use rand_core::RngCore;

use crate::config::{MAX_LEVEL, validate_max_level};
use crate::error::Error;

/// Draws how many levels a new entry is promoted above level 0.
///
/// The count follows a geometric distribution with p = 1/2, capped at
/// `max_level`: `P(count = j) = 2^-(j+1)` for `j < max_level`. Expected
/// promotion count is 1.
///
/// The generator owns one RNG for its whole lifetime. Draws are never
/// reseeded, so successive promotions are independent.
#[derive(Debug, Clone)]
pub struct LevelGenerator<R> {
    rng: R,
    max_level: usize,
}

impl<R: RngCore> LevelGenerator<R> {
    /// Creates a generator capped at [`MAX_LEVEL`].
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            max_level: MAX_LEVEL,
        }
    }

    /// Creates a generator with a custom cap.
    ///
    /// Fails with [`Error::InvalidArgument`] if `max_level` exceeds [`MAX_LEVEL`].
    pub fn with_max_level(rng: R, max_level: usize) -> Result<Self, Error> {
        validate_max_level(max_level)?;
        Ok(Self { rng, max_level })
    }

    /// Returns the promotion cap.
    #[inline]
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Draws the next promotion count.
    ///
    /// Each trailing one bit of a uniform `u64` is a successful fair coin
    /// flip; the first zero bit is the failure that stops promotion.
    #[inline]
    pub fn next_level(&mut self) -> usize {
        let flips = self.rng.next_u64().trailing_ones() as usize;
        flips.min(self.max_level)
    }
}
