/*!
This module handles creation / initialization / building of [`Engine`]s.
*/

use std::time::Duration;

use rand_chacha::rand_core::SeedableRng;

use super::*;
use crate::shape_generator::ShapeGenerator;

/// This builder exposes the ability to configure a new [`Engine`].
///
/// Generally speaking, when using `EngineBuilder`, you'll first call [`EngineBuilder::new`] or
/// [`Engine::builder`], then chain calls to methods to set each field, then call
/// [`EngineBuilder::build`].
/// The `EngineBuilder` is not used up and its configuration can be re-used to initialize more
/// [`Engine`]s.
#[derive(PartialEq, PartialOrd, Clone, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineBuilder {
    /// The configuration options that will be set for the engine.
    pub config: Configuration,
    /// The value to seed the engine's PRNG with.
    pub seed: Option<u64>,
    /// Settled cells the board holds whenever a round starts.
    pub initial_cells: Vec<Cell>,
}

impl EngineBuilder {
    /// Creates a blank new template representing a yet-to-be-started [`Engine`] ready for configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an [`Engine`] with the information specified by `self`.
    ///
    /// The engine is in [`Phase::Idle`]; call [`Engine::start`] to begin a round.
    pub fn build(&self) -> Engine {
        let seed = self.seed.unwrap_or_else(rand::random);
        let mut rng = EngineRng::seed_from_u64(seed);
        let active_piece = ShapeGenerator.spawn(&mut rng);
        let next_piece = ShapeGenerator.spawn(&mut rng);
        let settled = self.initial_cells.iter().copied().collect();

        Engine {
            config: self.config.clone(),
            seed,
            rng,
            initial_cells: self.initial_cells.clone(),
            time: Duration::ZERO,
            phase: Phase::Idle,
            board: Board::with_settled(settled, active_piece, next_piece),
            scheduler: Scheduler::default(),
            gravity_counter: 1,
            score: 0,
            level: 1,
            rows_cleared: 0,
            consecutive_tetris_count: 0,
            feedback_buffer: Vec::new(),
        }
    }

    /// Sets the [`Configuration`] that will be used by [`Engine`].
    pub fn config(&mut self, x: Configuration) -> &mut Self {
        self.config = x;
        self
    }

    /// The value to seed the engine's PRNG with.
    pub fn seed(&mut self, x: u64) -> &mut Self {
        self.seed = Some(x);
        self
    }

    /// How long after starting the render schedule first fires.
    pub fn render_delay(&mut self, x: Duration) -> &mut Self {
        self.config.render_delay = x;
        self
    }
    /// How often the render schedule fires.
    pub fn render_period(&mut self, x: Duration) -> &mut Self {
        self.config.render_period = x;
        self
    }
    /// How long after starting the gravity schedule first fires.
    pub fn gravity_delay(&mut self, x: Duration) -> &mut Self {
        self.config.gravity_delay = x;
        self
    }
    /// How often the gravity schedule fires.
    pub fn gravity_period(&mut self, x: Duration) -> &mut Self {
        self.config.gravity_period = x;
        self
    }
    /// The amount of feedback information that is to be generated.
    pub fn feedback_verbosity(&mut self, x: FeedbackVerbosity) -> &mut Self {
        self.config.feedback_verbosity = x;
        self
    }

    /// Settled cells to place on the board at the start of every round.
    ///
    /// Cells outside the well's columns or below its last row are discarded.
    pub fn initial_cells(&mut self, x: impl IntoIterator<Item = Cell>) -> &mut Self {
        self.initial_cells = x
            .into_iter()
            .filter(|cell| 0 <= cell.x && cell.x < Engine::WIDTH && cell.y < Engine::HEIGHT)
            .collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_engine_is_idle() {
        let engine = Engine::builder().seed(3).build();
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.seed(), 3);
        assert_eq!(engine.time(), Duration::ZERO);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.level(), 1);
        assert!(engine.board().settled().is_empty());
        assert_eq!(engine.active_piece().pivot, Engine::SPAWN);
        assert_eq!(engine.peek_next_update_time(), None);
    }

    #[test]
    fn builder_is_reusable_and_deterministic() {
        let mut builder = EngineBuilder::new();
        builder.seed(99).gravity_period(Duration::from_millis(50));
        let a = builder.build();
        let b = builder.build();
        assert_eq!(a.active_piece(), b.active_piece());
        assert_eq!(a.next_piece(), b.next_piece());
        assert_eq!(a.config.gravity_period, Duration::from_millis(50));
    }

    #[test]
    fn initial_cells_outside_well_are_dropped() {
        let engine = Engine::builder()
            .initial_cells([
                Cell::new(0, 19, Color::Red),
                Cell::new(10, 19, Color::Red),
                Cell::new(-1, 5, Color::Red),
                Cell::new(3, 20, Color::Red),
            ])
            .build();
        assert_eq!(engine.board().settled().len(), 1);
        assert!(engine.board().is_occupied(0, 19));
    }
}
