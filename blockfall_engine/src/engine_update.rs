/*!
This module handles what happens when a round is started, ended, or advanced with
[`Engine::update`], and how player [`Command`]s act on it.
*/

use std::collections::BTreeSet;

use super::*;
use crate::shape_generator::ShapeGenerator;

impl Engine {
    /// Begins a fresh round.
    ///
    /// Score, level, rows cleared and the tetris streak are reset, the board is set to its initial
    /// layout (empty unless configured otherwise) with a fresh active and next piece, and both
    /// schedules start relative to the current in-engine time.
    /// This may be called again at any point, e.g. after the game is over.
    pub fn start(&mut self) {
        self.score = 0;
        self.level = 1;
        self.rows_cleared = 0;
        self.consecutive_tetris_count = 0;
        self.gravity_counter = 1;
        let active_piece = self.generate_piece();
        let next_piece = self.generate_piece();
        let settled = self.initial_cells.iter().copied().collect();
        self.board = Board::with_settled(settled, active_piece, next_piece);
        self.phase = Phase::Playing;
        self.scheduler.start(self.time, &self.config);
        let seed = self.seed;
        self.debug(|| format!("round started (seed {seed})"));
    }

    /// Stops both schedules and ends the round.
    ///
    /// Calling this more than once, or before [`Engine::start`], has no further effect.
    pub fn end_game(&mut self) {
        self.scheduler.cancel();
        if matches!(self.phase, Phase::Playing | Phase::Paused) {
            self.phase = Phase::GameOver;
            self.emit(Feedback::GameEnded {
                score: self.score,
                level: self.level,
                rows_cleared: self.rows_cleared,
            });
        }
    }

    /// Applies an already-resolved player command; returns whether it changed anything.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::RotateClockwise => self.rotate_clockwise(),
            Command::RotateCounterClockwise => self.rotate_counter_clockwise(),
            Command::Drop => self.drop(),
            Command::TogglePause => self.toggle_pause(),
        }
    }

    /// Tries to move the active piece one column to the left.
    pub fn move_left(&mut self) -> bool {
        self.is_playing() && self.report_move("move left", Board::move_left)
    }

    /// Tries to move the active piece one column to the right.
    pub fn move_right(&mut self) -> bool {
        self.is_playing() && self.report_move("move right", Board::move_right)
    }

    /// Tries to rotate the active piece clockwise around its pivot.
    pub fn rotate_clockwise(&mut self) -> bool {
        self.is_playing() && self.report_move("rotate clockwise", Board::rotate_clockwise)
    }

    /// Tries to rotate the active piece counter-clockwise around its pivot.
    pub fn rotate_counter_clockwise(&mut self) -> bool {
        self.is_playing()
            && self.report_move("rotate counter-clockwise", Board::rotate_counter_clockwise)
    }

    /// Moves the active piece one row down, settling it if it cannot move.
    ///
    /// Returns whether the piece moved.
    pub fn drop(&mut self) -> bool {
        self.is_playing() && self.drop_active_piece()
    }

    /// Suspends gravity while playing, or resumes it while paused.
    ///
    /// Ignored before the round starts and after it is over. Returns whether the phase changed.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            Phase::Playing => {
                self.phase = Phase::Paused;
                self.emit(Feedback::Paused);
                true
            }
            Phase::Paused => {
                self.phase = Phase::Playing;
                self.emit(Feedback::Resumed);
                true
            }
            Phase::Idle | Phase::GameOver => false,
        }
    }

    /// The main function used to advance the engine.
    ///
    /// This fires, in chronological order, every scheduled tick up to and including
    /// `update_target_time` (gravity before render when both are due at once), and then moves the
    /// engine's time to `update_target_time`.
    ///
    /// Unless an error occurs, this function returns all [`FeedbackMessages`] generated since the
    /// previous `update` call, including those caused by player commands in between.
    /// Updating a finished round is fine and simply fires nothing.
    ///
    /// # Errors
    ///
    /// This function may error with:
    /// - [`UpdateEngineError::NotStarted`] if [`Engine::start`] was never called, or
    /// - [`UpdateEngineError::TargetTimeInPast`] if `update_target_time < engine.time()`.
    pub fn update(
        &mut self,
        update_target_time: InGameTime,
    ) -> Result<FeedbackMessages, UpdateEngineError> {
        if self.phase == Phase::Idle {
            return Err(UpdateEngineError::NotStarted);
        }
        if update_target_time < self.time {
            return Err(UpdateEngineError::TargetTimeInPast);
        }
        // We linearly process all ticks until we reach the targeted update time.
        while let Some((due_time, kind)) = self.scheduler.next_due() {
            if due_time > update_target_time {
                break;
            }
            self.time = due_time;
            self.scheduler.fire(kind);
            match kind {
                TimerKind::Gravity => self.on_gravity_tick(),
                TimerKind::Render => self.emit(Feedback::Render),
            }
        }
        self.time = update_target_time;
        Ok(std::mem::take(&mut self.feedback_buffer))
    }

    fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    fn report_move(&mut self, name: &str, try_move: fn(&mut Board) -> bool) -> bool {
        let moved = try_move(&mut self.board);
        if !moved {
            self.debug(|| format!("{name} rejected"));
        }
        moved
    }

    /// Generates a fresh piece at spawn from the engine's RNG.
    fn generate_piece(&mut self) -> Piece {
        ShapeGenerator.spawn(&mut self.rng)
    }

    fn on_gravity_tick(&mut self) {
        // Paused (or finished) rounds still receive ticks, which then do nothing.
        if !self.is_playing() {
            return;
        }
        let factor = gravity_factor(self.level);
        let due = self.gravity_counter % factor == 0;
        self.gravity_counter += 1;
        self.debug(|| format!("gravity tick (due: {due}, factor {factor})"));
        if due {
            self.gravity_counter = 1;
            self.drop_active_piece();
        }
    }

    fn drop_active_piece(&mut self) -> bool {
        let moved = self.board.drop();
        if !moved {
            self.settle_active_piece();
        }
        moved
    }

    /// Commits the active piece, clears rows, checks for game over and, if the round goes on,
    /// promotes the next piece.
    fn settle_active_piece(&mut self) {
        let piece = *self.board.active_piece();
        self.board.commit_settled_cells(piece.cells());
        self.emit(Feedback::PieceSettled { piece });
        self.clear_rows(&piece);
        if self.check_game_over(&piece) {
            return;
        }
        let upcoming = self.generate_piece();
        self.board.promote_next_piece(upcoming);
    }

    /// Removes the rows completed by `piece` and updates score, streak, rows cleared and level.
    ///
    /// Only rows the piece touches can have become complete, so only those are scanned.
    fn clear_rows(&mut self, piece: &Piece) {
        let touched: BTreeSet<i32> = piece.cells().iter().map(|cell| cell.y).collect();
        let rows: Vec<i32> = touched
            .into_iter()
            .filter(|&y| self.board.settled().is_row_complete(y))
            .collect();
        let n_rows = rows.len() as u32;

        let score_bonus = if n_rows == 4 {
            self.consecutive_tetris_count += 1;
            if self.consecutive_tetris_count > 1 {
                1600
            } else {
                800
            }
        } else {
            // Any other settle, including one that clears nothing, breaks the streak.
            self.consecutive_tetris_count = 0;
            n_rows * 100
        };
        self.score += score_bonus;
        self.rows_cleared += n_rows;

        if !rows.is_empty() {
            self.board.remove_rows(&rows);
            self.emit(Feedback::RowsCleared {
                rows,
                score_bonus,
                tetris_streak: self.consecutive_tetris_count,
            });
        }

        let level = self.rows_cleared / Engine::ROWS_PER_LEVEL + 1;
        if level != self.level {
            self.level = level;
            self.emit(Feedback::LevelUp { level });
        }
    }

    /// Ends the round if the settled piece has any cell above the visible well.
    fn check_game_over(&mut self, piece: &Piece) -> bool {
        let over = piece.cells().iter().any(|cell| cell.y < 0);
        if over {
            self.debug(|| format!("{:?} settled above the well", piece.kind));
            self.end_game();
        }
        over
    }

    fn emit(&mut self, feedback: Feedback) {
        let keep = match self.config.feedback_verbosity {
            FeedbackVerbosity::Silent => false,
            FeedbackVerbosity::Default => !matches!(feedback, Feedback::Debug(_)),
            FeedbackVerbosity::Debug => true,
        };
        if keep {
            self.feedback_buffer.push((self.time, feedback));
        }
    }

    fn debug(&mut self, message: impl FnOnce() -> String) {
        if self.config.feedback_verbosity == FeedbackVerbosity::Debug {
            let message = message();
            self.emit(Feedback::Debug(message));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn row_with_gap(y: i32, gap: i32) -> impl Iterator<Item = Cell> {
        (0..Engine::WIDTH)
            .filter(move |&x| x != gap)
            .map(move |x| Cell::new(x, y, Color::Red))
    }

    /// A started engine whose board is replaced by the given layout and an upright I at column 4
    /// reaching down to row 19.
    fn playing_with_i(engine: &mut Engine, rows: impl IntoIterator<Item = i32>) {
        let settled = rows.into_iter().flat_map(|y| row_with_gap(y, 4)).collect();
        let mut active = Piece::new(ShapeKind::I);
        active.pivot = (4, 17);
        engine.board = Board::with_settled(settled, active, Piece::new(ShapeKind::O));
    }

    fn started() -> Engine {
        let mut engine = Engine::builder().seed(0).build();
        engine.start();
        engine
    }

    fn drain(engine: &mut Engine) -> Vec<Feedback> {
        let now = engine.time();
        engine
            .update(now)
            .unwrap()
            .into_iter()
            .map(|(_, feedback)| feedback)
            .collect()
    }

    #[test]
    fn single_to_triple_clears_score_per_row() {
        for (rows, expected) in [(vec![19], 100), (vec![18, 19], 200), (vec![17, 18, 19], 300)] {
            let mut engine = started();
            playing_with_i(&mut engine, rows.clone());
            assert!(!engine.drop());
            assert_eq!(engine.score(), expected);
            assert_eq!(engine.rows_cleared(), rows.len() as u32);
            assert_eq!(engine.consecutive_tetris_count(), 0);
            // What is left of the I after its completed rows are gone.
            assert_eq!(engine.board().settled().len(), 4 - rows.len());
        }
    }

    #[test]
    fn back_to_back_tetrises_score_double() {
        let mut engine = started();
        playing_with_i(&mut engine, 16..20);
        engine.drop();
        assert_eq!(engine.score(), 800);
        assert_eq!(engine.consecutive_tetris_count(), 1);

        playing_with_i(&mut engine, 16..20);
        engine.drop();
        assert_eq!(engine.score(), 2400);
        assert_eq!(engine.consecutive_tetris_count(), 2);

        playing_with_i(&mut engine, [18, 19]);
        engine.drop();
        assert_eq!(engine.score(), 2600);
        assert_eq!(engine.consecutive_tetris_count(), 0);
        assert_eq!(engine.rows_cleared(), 10);
        assert_eq!(engine.level(), 2);
    }

    #[test]
    fn clearing_nothing_breaks_tetris_streak() {
        let mut engine = started();
        playing_with_i(&mut engine, 16..20);
        engine.drop();
        playing_with_i(&mut engine, std::iter::empty());
        engine.drop();
        assert_eq!(engine.consecutive_tetris_count(), 0);
        playing_with_i(&mut engine, 16..20);
        engine.drop();
        assert_eq!(engine.score(), 1600);
    }

    #[test]
    fn rows_cleared_feedback_lists_rows_ascending() {
        let mut engine = started();
        playing_with_i(&mut engine, [17, 19]);
        engine.drop();
        let feedback = drain(&mut engine);
        assert!(feedback.contains(&Feedback::RowsCleared {
            rows: vec![17, 19],
            score_bonus: 200,
            tetris_streak: 0,
        }));
        // The I's cells on rows 16 and 18 remain, shifted down by the rows removed below them.
        assert!(engine.board().is_occupied(4, 18));
        assert!(engine.board().is_occupied(4, 19));
        assert_eq!(engine.board().settled().len(), 2);
    }

    #[test]
    fn level_follows_rows_cleared() {
        let mut engine = started();
        engine.rows_cleared = 22;
        playing_with_i(&mut engine, [19]);
        engine.drop();
        assert_eq!(engine.rows_cleared(), 23);
        assert_eq!(engine.level(), 3);
        assert!(drain(&mut engine).contains(&Feedback::LevelUp { level: 3 }));
    }

    #[test]
    fn nine_cells_do_not_clear_a_row() {
        let mut engine = started();
        let settled = row_with_gap(19, 4).filter(|cell| cell.x != 0).collect();
        let mut active = Piece::new(ShapeKind::I);
        active.pivot = (4, 17);
        engine.board = Board::with_settled(settled, active, Piece::new(ShapeKind::O));
        engine.drop();
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.board().settled().row_len(19), 9);
        assert!(!engine.is_game_over());
    }

    #[test]
    fn settling_above_the_well_ends_the_round() {
        let mut engine = started();
        let next = *engine.next_piece();
        engine.board = Board::with_settled(
            [Cell::new(4, 1, Color::Red)].into_iter().collect(),
            Piece::new(ShapeKind::O),
            next,
        );
        assert!(!engine.drop());
        assert!(engine.is_game_over());
        assert_eq!(engine.phase(), Phase::GameOver);
        assert!(!engine.scheduler().is_active());
        assert_eq!(engine.peek_next_update_time(), None);
        // The round is over, so the next piece never became active.
        assert_eq!(engine.active_piece().kind, ShapeKind::O);
        assert_eq!(*engine.next_piece(), next);
        let feedback = drain(&mut engine);
        assert!(feedback.contains(&Feedback::GameEnded {
            score: 0,
            level: 1,
            rows_cleared: 0,
        }));
    }

    #[test]
    fn settling_inside_the_well_promotes_next_piece() {
        let mut engine = started();
        let next = *engine.next_piece();
        while engine.drop() {}
        assert!(!engine.is_game_over());
        assert_eq!(*engine.active_piece(), next);
        assert_eq!(engine.board().settled().len(), 4);
    }

    #[test]
    fn commands_ignored_unless_playing() {
        let mut engine = Engine::builder().seed(1).build();
        assert!(!engine.apply(Command::MoveLeft));
        assert!(!engine.apply(Command::TogglePause));
        engine.start();
        assert!(engine.apply(Command::TogglePause));
        assert!(engine.is_paused());
        let before = *engine.active_piece();
        assert!(!engine.apply(Command::MoveLeft));
        assert!(!engine.apply(Command::Drop));
        assert_eq!(*engine.active_piece(), before);
        assert!(engine.apply(Command::TogglePause));
        assert!(engine.apply(Command::MoveLeft));
        engine.end_game();
        assert!(!engine.apply(Command::MoveRight));
        assert!(!engine.apply(Command::TogglePause));
    }

    #[test]
    fn gravity_drops_every_nineteenth_tick_at_level_one() {
        let mut engine = started();
        // Ticks fire at 1000ms, 1100ms, ...; the 19th one is at 2800ms.
        engine.update(Duration::from_millis(2799)).unwrap();
        assert_eq!(engine.active_piece().pivot.1, 0);
        engine.update(Duration::from_millis(2800)).unwrap();
        assert_eq!(engine.active_piece().pivot.1, 1);
        // The counter restarts at 1, so the next drop is 19 ticks later.
        engine.update(Duration::from_millis(4699)).unwrap();
        assert_eq!(engine.active_piece().pivot.1, 1);
        engine.update(Duration::from_millis(4700)).unwrap();
        assert_eq!(engine.active_piece().pivot.1, 2);
    }

    #[test]
    fn gravity_drops_every_tick_at_high_levels() {
        let mut engine = started();
        engine.level = 19;
        engine.update(Duration::from_millis(1200)).unwrap();
        assert_eq!(engine.active_piece().pivot.1, 3);
    }

    #[test]
    fn paused_gravity_does_not_move_piece() {
        let mut engine = started();
        engine.toggle_pause();
        let before = *engine.active_piece();
        let feedback = engine.update(Duration::from_secs(10)).unwrap();
        assert_eq!(*engine.active_piece(), before);
        assert!(feedback.iter().any(|(_, f)| *f == Feedback::Render));
        assert_eq!(engine.gravity_counter, 1);
    }

    #[test]
    fn end_game_is_idempotent() {
        let mut engine = Engine::builder().seed(5).build();
        engine.end_game();
        engine.end_game();
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.update(Duration::ZERO), Err(UpdateEngineError::NotStarted));

        engine.start();
        engine.end_game();
        engine.end_game();
        let ended = drain(&mut engine)
            .into_iter()
            .filter(|f| matches!(f, Feedback::GameEnded { .. }))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn restart_after_game_over_resets_round() {
        let mut engine = started();
        playing_with_i(&mut engine, [19]);
        engine.drop();
        engine.end_game();
        engine.start();
        assert_eq!(engine.phase(), Phase::Playing);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.rows_cleared(), 0);
        assert!(engine.board().settled().is_empty());
        assert!(engine.scheduler().is_active());
    }

    #[test]
    fn feedback_verbosity_filters_messages() {
        let mut silent = Engine::builder()
            .seed(2)
            .feedback_verbosity(FeedbackVerbosity::Silent)
            .build();
        silent.start();
        assert!(silent.update(Duration::from_secs(3)).unwrap().is_empty());

        let mut default = Engine::builder().seed(2).build();
        default.start();
        default.apply(Command::TogglePause);
        let msgs = default.update(Duration::from_secs(3)).unwrap();
        assert!(!msgs.iter().any(|(_, f)| matches!(f, Feedback::Debug(_))));
        assert_eq!(msgs.first(), Some(&(Duration::ZERO, Feedback::Paused)));

        let mut debug = Engine::builder()
            .seed(2)
            .feedback_verbosity(FeedbackVerbosity::Debug)
            .build();
        debug.start();
        let msgs = debug.update(Duration::from_secs(3)).unwrap();
        assert!(msgs.iter().any(|(_, f)| matches!(f, Feedback::Debug(_))));
    }

    #[test]
    fn feedback_is_chronological() {
        let mut engine = started();
        let msgs = engine.update(Duration::from_secs(5)).unwrap();
        assert!(msgs.windows(2).all(|w| w[0].0 <= w[1].0));
        assert_eq!(engine.time(), Duration::from_secs(5));
        assert_eq!(
            engine.update(Duration::from_secs(4)),
            Err(UpdateEngineError::TargetTimeInPast)
        );
    }
}
