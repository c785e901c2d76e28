/*!
This module handles random generation of [`ShapeKind`]s.
*/

use rand::Rng;

use crate::{Piece, ShapeKind};

/// Uniformly random shape generator.
///
/// Every draw picks each of the seven kinds with equal probability, independently of all earlier
/// draws. To actually generate shapes, [`ShapeGenerator::with_rng`] yields a [`WithRng`] that
/// implements [`Iterator`].
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeGenerator;

impl ShapeGenerator {
    /// Method that allows `ShapeGenerator` to be used as [`Iterator`].
    pub fn with_rng<'a, R: Rng>(&self, rng: &'a mut R) -> WithRng<'a, R> {
        WithRng { rng }
    }

    /// Draws a single shape kind.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> ShapeKind {
        ShapeKind::VARIANTS[rng.random_range(0..ShapeKind::VARIANTS.len())]
    }

    /// Draws a shape kind and wraps it in a freshly spawned [`Piece`].
    pub fn spawn<R: Rng>(&self, rng: &mut R) -> Piece {
        Piece::new(self.draw(rng))
    }
}

/// Struct produced from [`ShapeGenerator::with_rng`] which implements [`Iterator`].
pub struct WithRng<'a, R: Rng> {
    /// Raw source of randomness.
    pub rng: &'a mut R,
}

impl<R: Rng> Iterator for WithRng<'_, R> {
    type Item = ShapeKind;

    fn next(&mut self) -> Option<Self::Item> {
        Some(ShapeGenerator.draw(&mut *self.rng))
    }
}
