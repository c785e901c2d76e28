use std::time::Duration;

use blockfall_engine::{
    Cell, Color, Command, Engine, Feedback, FeedbackMessages, Phase, ShapeKind, UpdateEngineError,
};

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn rows_missing_first_column(rows: std::ops::RangeInclusive<i32>) -> Vec<Cell> {
    rows.flat_map(|y| (1..Engine::WIDTH).map(move |x| Cell::new(x, y, Color::Red)))
        .collect()
}

fn has_game_ended(msgs: &FeedbackMessages) -> bool {
    msgs.iter()
        .any(|(_, feedback)| matches!(feedback, Feedback::GameEnded { .. }))
}

#[test]
fn update_before_start_is_an_error() {
    let mut engine = Engine::builder().seed(0).build();
    assert_eq!(engine.update(ms(10)), Err(UpdateEngineError::NotStarted));
}

#[test]
fn first_ticks_fire_after_one_second() {
    let mut engine = Engine::builder().seed(0).build();
    engine.start();
    assert_eq!(engine.peek_next_update_time(), Some(ms(1000)));
    assert!(engine.update(ms(999)).unwrap().is_empty());
    let msgs = engine.update(ms(1000)).unwrap();
    assert_eq!(msgs, vec![(ms(1000), Feedback::Render)]);
    assert_eq!(engine.peek_next_update_time(), Some(ms(1015)));
}

#[test]
fn gravity_pulls_piece_down_over_time() {
    let mut engine = Engine::builder().seed(11).build();
    engine.start();
    let start = *engine.active_piece();
    engine.update(ms(1000 + 18 * 100)).unwrap();
    let piece = *engine.active_piece();
    assert_eq!(piece.pivot, (start.pivot.0, start.pivot.1 + 1));
    assert_eq!(piece.kind, start.kind);
}

#[test]
fn player_commands_move_piece_immediately() {
    let mut engine = Engine::builder().seed(3).build();
    engine.start();
    let (x, y) = engine.active_piece().pivot;
    assert!(engine.apply(Command::MoveLeft));
    assert!(engine.apply(Command::MoveLeft));
    assert!(engine.apply(Command::MoveRight));
    assert!(engine.apply(Command::Drop));
    assert_eq!(engine.active_piece().pivot, (x - 1, y + 1));
}

#[test]
fn same_seed_same_round() {
    let play = |seed| {
        let mut engine = Engine::builder().seed(seed).build();
        engine.start();
        let mut kinds = Vec::new();
        for _ in 0..5 {
            kinds.push(engine.active_piece().kind);
            while engine.drop() {}
        }
        (kinds, engine.board().settled().iter().collect::<Vec<_>>())
    };
    assert_eq!(play(2024), play(2024));
}

#[test]
fn stack_reaching_the_top_ends_the_round() {
    let mut engine = Engine::builder()
        .seed(8)
        .initial_cells(rows_missing_first_column(1..=19))
        .build();
    engine.start();
    assert_eq!(engine.board().settled().len(), 19 * 9);

    // Pieces that cannot enter the well settle in place; the first one with a cell above row 0
    // ends the round.
    let mut msgs = FeedbackMessages::new();
    for _ in 0..50 {
        if engine.is_game_over() {
            break;
        }
        engine.apply(Command::Drop);
        msgs.extend(engine.update(engine.time()).unwrap());
    }
    assert_eq!(engine.phase(), Phase::GameOver);
    assert!(has_game_ended(&msgs));
    assert_eq!(engine.peek_next_update_time(), None);

    // Nothing moves any more, and updating stays harmless.
    assert!(!engine.apply(Command::MoveLeft));
    assert!(engine.update(engine.time() + ms(5000)).unwrap().is_empty());
}

#[test]
fn filling_the_gap_clears_rows() {
    let mut engine = Engine::builder()
        .seed(0)
        .initial_cells(rows_missing_first_column(16..=19))
        .build();
    engine.start();

    // Restart until a round opens with an I, which fits upright into column 0.
    for _ in 0..200 {
        if engine.active_piece().kind == ShapeKind::I {
            break;
        }
        engine.end_game();
        engine.start();
    }
    assert_eq!(engine.active_piece().kind, ShapeKind::I);
    while engine.apply(Command::MoveLeft) {}
    while engine.apply(Command::Drop) {}

    assert_eq!(engine.rows_cleared(), 4);
    assert_eq!(engine.score(), 800);
    assert_eq!(engine.consecutive_tetris_count(), 1);
    assert!(engine.board().settled().is_empty());
    let msgs = engine.update(engine.time()).unwrap();
    assert!(msgs.iter().any(|(_, feedback)| matches!(
        feedback,
        Feedback::RowsCleared { rows, score_bonus: 800, tetris_streak: 1 } if *rows == [16, 17, 18, 19]
    )));
}

#[test]
fn pausing_freezes_gravity_but_not_rendering() {
    let mut engine = Engine::builder().seed(5).build();
    engine.start();
    engine.apply(Command::TogglePause);
    let before = *engine.active_piece();
    let msgs = engine.update(ms(10_000)).unwrap();
    assert_eq!(*engine.active_piece(), before);
    assert!(msgs.iter().any(|(_, feedback)| *feedback == Feedback::Render));

    engine.apply(Command::TogglePause);
    engine.update(ms(10_000 + 19 * 100)).unwrap();
    assert_eq!(engine.active_piece().pivot.1, before.pivot.1 + 1);
}
