use std::{
    io::{self, Write},
    sync::mpsc,
    time::{Duration, Instant},
};

use blockfall_engine::{Engine, Feedback};
use crossterm::{
    cursor::MoveTo,
    event::{
        Event, KeyCode, KeyEvent,
        KeyEventKind::{Press, Repeat},
        KeyModifiers,
    },
    terminal::{self, Clear, ClearType},
    ExecutableCommand,
};

use crate::{
    application::{Application, GameSummary, Menu, MenuUpdate},
    game_renderers::Renderer,
    live_input_handler::{self, LiveTermSignal},
};

impl<T: Write> Application<T> {
    pub(in crate::application) fn run_menu_play_game(
        &mut self,
        engine: &mut Engine,
        game_renderer: &mut impl Renderer,
    ) -> io::Result<MenuUpdate> {
        // Channel over which the input thread forwards resolved commands and other terminal events.
        let (input_sender, input_receiver) = mpsc::channel();
        let _input_handler =
            live_input_handler::spawn(input_sender, self.settings.keybinds().clone());

        let palette = self.settings.palette();
        let keybinds_legend = self.fmt_keybinds_legend();

        // In-engine time continues from wherever this session left off.
        let session_resumed = Instant::now();
        let time_resumed = engine.time();
        let game_time_now = || time_resumed + Instant::now().saturating_duration_since(session_resumed);

        let mut clean_screen = true;
        game_renderer.render(
            &mut self.term,
            engine,
            &palette,
            &keybinds_legend,
            clean_screen,
        )?;
        clean_screen = false;

        let menu_update = 'render: loop {
            // Exit if game ended.
            if engine.is_game_over() {
                break 'render MenuUpdate::Push(Menu::GameOver(Box::new(GameSummary::new(engine))));
            }

            let idle_remaining = engine
                .peek_next_update_time()
                .map_or(Duration::from_millis(100), |next_update| {
                    next_update.saturating_sub(game_time_now())
                });

            let mut new_feedback_msgs = Vec::new();
            let mut render_now = false;
            match input_receiver.recv_timeout(idle_remaining) {
                Ok(LiveTermSignal::RecognizedCommand(command)) => {
                    // Catch up with the timeline before the command acts on the board.
                    if let Ok(msgs) = engine.update(game_time_now()) {
                        new_feedback_msgs.extend(msgs);
                    }
                    engine.apply(command);
                    if let Ok(msgs) = engine.update(engine.time()) {
                        new_feedback_msgs.extend(msgs);
                    }
                    render_now = true;
                }
                Ok(LiveTermSignal::RawEvent(Event::Key(KeyEvent {
                    code: KeyCode::Char('c'),
                    modifiers: KeyModifiers::CONTROL,
                    kind: Press | Repeat,
                    ..
                }))) => {
                    break 'render MenuUpdate::Push(Menu::Quit("exited with ctrl-c".to_owned()));
                }
                Ok(LiveTermSignal::RawEvent(Event::Key(KeyEvent {
                    code: KeyCode::Esc,
                    kind: Press | Repeat,
                    ..
                }))) => {
                    engine.end_game();
                    if let Ok(msgs) = engine.update(game_time_now()) {
                        new_feedback_msgs.extend(msgs);
                    }
                }
                Ok(LiveTermSignal::RawEvent(Event::Resize(..))) => {
                    clean_screen = true;
                    render_now = true;
                }
                Ok(LiveTermSignal::RawEvent(_)) => {}
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    if let Ok(msgs) = engine.update(game_time_now()) {
                        new_feedback_msgs.extend(msgs);
                    }
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    // Input thread is gone; reentering this menu starts a new one.
                    break 'render MenuUpdate::Pop;
                }
            }

            render_now |= new_feedback_msgs
                .iter()
                .any(|(_time, feedback)| matches!(feedback, Feedback::Render));
            game_renderer.push_feedback_msgs(new_feedback_msgs);
            if render_now {
                game_renderer.render(
                    &mut self.term,
                    engine,
                    &palette,
                    &keybinds_legend,
                    clean_screen,
                )?;
                clean_screen = false;
            }
        };

        // Console epilogue: Wipe the well away bottom to top.
        if engine.is_game_over() {
            let h_console = terminal::size()?.1;
            for i in (0..h_console).rev() {
                self.term
                    .execute(MoveTo(0, i))?
                    .execute(Clear(ClearType::CurrentLine))?;
                std::thread::sleep(Duration::from_secs_f32(0.01));
            }
        }

        Ok(menu_update)
    }
}
