/*!
# Blockfall Engine

`blockfall_engine` is the rules engine of a falling-block puzzle game: a 10x20 well, seven
four-cell shapes with four rotation states each, collision against settled cells, row clearing,
scoring and level-dependent gravity.

The engine does no drawing and no I/O. A front-end feeds it time and already-resolved player
[`Command`]s, and reads back the [`Board`], the score and a stream of [`Feedback`] messages.

# Examples

```
use std::time::Duration;
use blockfall_engine::*;

// Building an engine - note that in-engine time starts at 0.0s.
let mut engine = Engine::builder()
    .seed(42)
    /* ...Further optional configuration possible... */
    .build();

// Start a round; the render and gravity schedules first fire one second later.
engine.start();

// Player input is applied immediately.
engine.apply(Command::MoveLeft);

// Advance the engine to second 3.0; due gravity ticks pull the active piece down.
let feedback = engine.update(Duration::from_secs(3)).unwrap();

// Read the most recent state; this is how a UI knows what to draw.
let board = engine.board();
let _cells = board.active_piece().cells();
assert!(!feedback.is_empty());
```
*/

#![warn(missing_docs)]

pub mod board;
mod engine_builder;
mod engine_update;
pub mod piece;
pub mod scheduler;
pub mod shape;
pub mod shape_generator;

use std::{fmt, time::Duration};

use rand_chacha::ChaCha12Rng;

pub use board::{Board, SettledCells};
pub use engine_builder::EngineBuilder;
pub use piece::Piece;
pub use scheduler::{Scheduler, TimerKind};
pub use shape::PivotBounds;

/// Coordinates of a cell: `(x, y)` with `(0, 0)` the top-left of the visible well and `y` growing
/// downwards. Negative `y` denotes rows above the visible well.
pub type Coord = (i32, i32);
/// Offsets that can be added to [`Coord`]inates.
pub type Offset = (i32, i32);

/// The type used to identify points in time in an engine's internal timeline.
pub type InGameTime = Duration;
/// The internal RNG used by an engine.
pub type EngineRng = ChaCha12Rng;

/// Convenient type alias to denote a [`Feedback`] associated with the [`InGameTime`] it occurred at.
pub type FeedbackMsg = (InGameTime, Feedback);
/// A chronological collection of [`FeedbackMsg`]s.
pub type FeedbackMessages = Vec<FeedbackMsg>;

/// Display color tag carried by every cell.
///
/// Each [`ShapeKind`] has one fixed color, see [`ShapeKind::color`].
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    /// Color of [`ShapeKind::L`].
    Green,
    /// Color of [`ShapeKind::J`].
    Orange,
    /// Color of [`ShapeKind::O`].
    Magenta,
    /// Color of [`ShapeKind::I`].
    Blue,
    /// Color of [`ShapeKind::T`].
    Yellow,
    /// Color of [`ShapeKind::Z`].
    Red,
    /// Color of [`ShapeKind::S`].
    Cyan,
}

/// A single occupied square, either part of a falling [`Piece`] or settled on the [`Board`].
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// Column, `0..=9` for any cell inside the well.
    pub x: i32,
    /// Row, at most `19`; negative while a piece still hangs above the well.
    pub y: i32,
    /// What color the cell is drawn in.
    pub color: Color,
}

/// Represents one of the seven four-cell shapes.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeKind {
    /// 'L'-shape; a column of three with a foot pointing right (when facing north).
    L = 0,
    /// 'J'-shape; a column of three with a foot pointing left (when facing north).
    J,
    /// 'O'-shape; a two by two square.
    O,
    /// 'I'-shape; a straight line of four.
    I,
    /// 'T'-shape; a row of three with a nub on top (when facing north).
    T,
    /// 'Z'-shape; snaking down to the right.
    Z,
    /// 'S'-shape; snaking down to the left.
    S,
}

/// Represents the orientation a piece can be in.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    /// North; the spawn orientation.
    #[default]
    North = 0,
    /// East.
    East,
    /// South.
    South,
    /// West.
    West,
}

/// An already-resolved player command.
///
/// Mapping raw keys to commands is the front-end's business; the engine only ever sees these.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// Moves the active piece one column to the left.
    MoveLeft,
    /// Moves the active piece one column to the right.
    MoveRight,
    /// Rotates the active piece by +90° around its pivot.
    RotateClockwise,
    /// Rotates the active piece by -90° around its pivot.
    RotateCounterClockwise,
    /// Moves the active piece one row down, settling it if it cannot move.
    Drop,
    /// Suspends or resumes gravity.
    TogglePause,
}

/// The lifecycle stage an [`Engine`] is in.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Built but never started.
    #[default]
    Idle,
    /// A round is running.
    Playing,
    /// A round is running but gravity is suspended and player moves are ignored.
    Paused,
    /// The round is over; only a new [`Engine::start`] leaves this phase.
    GameOver,
}

/// The amount of feedback information that is to be generated.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeedbackVerbosity {
    /// No feedback generated at all, not even render ticks.
    Silent,
    /// Render ticks and in-game events.
    #[default]
    Default,
    /// Everything, including a message for every gravity tick and rejected move.
    Debug,
}

/// Events reported by the engine, e.g. to be rendered as visual feedback to the player.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Feedback {
    /// The render schedule fired; the front-end should redraw.
    Render,
    /// A piece could not fall any further and its cells became part of the board.
    PieceSettled {
        /// The piece as it was when it settled.
        piece: Piece,
    },
    /// The settled piece completed one or more rows.
    RowsCleared {
        /// The rows removed, in ascending order.
        rows: Vec<i32>,
        /// Points awarded for this clear.
        score_bonus: u32,
        /// How many four-row clears happened back to back, this one included.
        tetris_streak: u32,
    },
    /// The level increased.
    LevelUp {
        /// The new level.
        level: u32,
    },
    /// Gravity was suspended.
    Paused,
    /// Gravity was resumed.
    Resumed,
    /// The round ended.
    GameEnded {
        /// Final score.
        score: u32,
        /// Final level.
        level: u32,
        /// Total rows cleared.
        rows_cleared: u32,
    },
    /// Internal event trace, only produced with [`FeedbackVerbosity::Debug`].
    Debug(String),
}

/// Configuration options of the engine's timeline.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Configuration {
    /// How long after [`Engine::start`] the render schedule first fires.
    pub render_delay: Duration,
    /// How often the render schedule fires.
    pub render_period: Duration,
    /// How long after [`Engine::start`] the gravity schedule first fires.
    pub gravity_delay: Duration,
    /// How often the gravity schedule fires. Pieces drop every `max(1, 20 - level)` gravity ticks.
    pub gravity_period: Duration,
    /// The amount of feedback information that is to be generated.
    pub feedback_verbosity: FeedbackVerbosity,
}

/// An error that can be returned by [`Engine::update`].
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
pub enum UpdateEngineError {
    /// The engine was updated before [`Engine::start`] was ever called.
    NotStarted,
    /// The requested update time lies before the engine's current time.
    TargetTimeInPast,
}

/// Main engine struct representing a game of blockfall.
#[derive(Debug)]
pub struct Engine {
    /// Timing and feedback options of the `Engine`.
    ///
    /// Changes to the schedule periods take effect at the next [`Engine::start`].
    pub config: Configuration,
    seed: u64,
    rng: EngineRng,
    initial_cells: Vec<Cell>,
    time: InGameTime,
    phase: Phase,
    board: Board,
    scheduler: Scheduler,
    gravity_counter: u32,
    score: u32,
    level: u32,
    rows_cleared: u32,
    consecutive_tetris_count: u32,
    feedback_buffer: FeedbackMessages,
}

impl Cell {
    /// Creates a new cell.
    pub const fn new(x: i32, y: i32, color: Color) -> Self {
        Self { x, y, color }
    }

    /// The `(x, y)` position of the cell.
    pub const fn coord(&self) -> Coord {
        (self.x, self.y)
    }
}

impl Rotation {
    /// All `Rotation` enum variants in clockwise order.
    ///
    /// Note that `Rotation::VARIANTS[r as usize] == r` always holds.
    pub const VARIANTS: [Self; 4] = {
        use Rotation::*;
        [North, East, South, West]
    };

    /// The next orientation when turning clockwise.
    pub const fn clockwise(&self) -> Self {
        self.turn(1)
    }

    /// The next orientation when turning counter-clockwise.
    pub const fn counter_clockwise(&self) -> Self {
        self.turn(-1)
    }

    /// Find a new orientation by turning clockwise some (possibly negative) number of times.
    pub const fn turn(&self, right_turns: i8) -> Self {
        Rotation::VARIANTS[(*self as i8 + right_turns).rem_euclid(4) as usize]
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            render_delay: Duration::from_millis(1000),
            render_period: Duration::from_millis(15),
            gravity_delay: Duration::from_millis(1000),
            gravity_period: Duration::from_millis(100),
            feedback_verbosity: FeedbackVerbosity::default(),
        }
    }
}

impl Engine {
    /// The well width.
    pub const WIDTH: i32 = 10;
    /// The visible well height.
    pub const HEIGHT: i32 = 20;
    /// Where every new piece's pivot appears.
    pub const SPAWN: Coord = (4, 0);
    /// Level-up happens every this many cleared rows.
    pub const ROWS_PER_LEVEL: u32 = 10;

    /// Creates a blank new template representing a yet-to-be-started [`Engine`] ready for configuration.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// The value the engine's PRNG was seeded with.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Current in-engine time.
    pub const fn time(&self) -> InGameTime {
        self.time
    }

    /// Read accessor for the current lifecycle phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Read accessor for the board: settled cells, active piece and next piece.
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The piece currently falling.
    pub const fn active_piece(&self) -> &Piece {
        self.board.active_piece()
    }

    /// The piece that will fall after the active one.
    pub const fn next_piece(&self) -> &Piece {
        self.board.next_piece()
    }

    /// Current total score.
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Current level, starting at `1`.
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Total number of rows cleared this round.
    pub const fn rows_cleared(&self) -> u32 {
        self.rows_cleared
    }

    /// How many four-row clears happened in direct succession most recently.
    pub const fn consecutive_tetris_count(&self) -> u32 {
        self.consecutive_tetris_count
    }

    /// Whether gravity is currently suspended.
    pub const fn is_paused(&self) -> bool {
        matches!(self.phase, Phase::Paused)
    }

    /// Whether the round has ended.
    pub const fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver)
    }

    /// Read accessor for the engine's schedules.
    pub const fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Retrieve when the next *autonomous* update (render or gravity tick) is scheduled.
    ///
    /// Returns `None` when no schedule is running.
    pub fn peek_next_update_time(&self) -> Option<InGameTime> {
        self.scheduler.next_due().map(|(time, _)| time)
    }
}

impl fmt::Display for UpdateEngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UpdateEngineError::NotStarted => "attempt to update engine before it was started",
            UpdateEngineError::TargetTimeInPast => {
                "attempt to update engine to timestamp it already passed"
            }
        };
        write!(f, "{s}")
    }
}

impl std::error::Error for UpdateEngineError {}

/// Adds an offset to a coordinate.
pub const fn add((x, y): Coord, (dx, dy): Offset) -> Coord {
    (x + dx, y + dy)
}

/// How many gravity ticks pass between two forced drops at a given level.
pub const fn gravity_factor(level: u32) -> u32 {
    let factor = 20u32.saturating_sub(level);
    if factor < 1 {
        1
    } else {
        factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_cycles_both_ways() {
        for rotation in Rotation::VARIANTS {
            assert_eq!(rotation.clockwise().counter_clockwise(), rotation);
            assert_eq!(rotation.turn(4), rotation);
            assert_eq!(rotation.turn(-4), rotation);
        }
        assert_eq!(Rotation::North.clockwise(), Rotation::East);
        assert_eq!(Rotation::West.clockwise(), Rotation::North);
        assert_eq!(Rotation::North.counter_clockwise(), Rotation::West);
    }

    #[test]
    fn gravity_factor_bottoms_out_at_one() {
        assert_eq!(gravity_factor(1), 19);
        assert_eq!(gravity_factor(10), 10);
        assert_eq!(gravity_factor(19), 1);
        assert_eq!(gravity_factor(20), 1);
        assert_eq!(gravity_factor(u32::MAX), 1);
    }

    #[test]
    fn update_error_messages() {
        assert_eq!(
            UpdateEngineError::TargetTimeInPast.to_string(),
            "attempt to update engine to timestamp it already passed"
        );
    }
}
