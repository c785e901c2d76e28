use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    event::{
        self, Event, KeyCode, KeyEvent,
        KeyEventKind::{Press, Repeat},
        KeyModifiers,
    },
    style::{Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
    QueueableCommand,
};

use crate::application::{Application, Menu, MenuUpdate};

impl<T: Write> Application<T> {
    pub(in crate::application) fn run_menu_top_scores(&mut self) -> io::Result<MenuUpdate> {
        loop {
            let w_main = Self::W_MAIN.into();
            let (x_main, y_main) = Self::fetch_main_xy();
            let y_selection = Self::H_MAIN / 5;
            self.term
                .queue(Clear(ClearType::All))?
                .queue(MoveTo(x_main, y_main + y_selection))?
                .queue(Print(format!("{:^w_main$}", "* Top Scores *")))?
                .queue(MoveTo(x_main, y_main + y_selection + 2))?
                .queue(Print(format!("{:^w_main$}", "──────────────────────────")))?;

            let entries = self.top_scores.entries();
            if entries.is_empty() {
                self.term
                    .queue(MoveTo(x_main, y_main + y_selection + 4))?
                    .queue(Print(format!("{:^w_main$}", "(No games finished yet.)")))?;
            }
            for (i, entry) in entries.iter().enumerate() {
                let line = format!(
                    "{:>2}. {:<16} {:>7} L{:<3} R{:<4} {}",
                    i + 1,
                    entry.name,
                    entry.score,
                    entry.level,
                    entry.rows_cleared,
                    entry.datetime
                );
                self.term
                    .queue(MoveTo(x_main, y_main + y_selection + 4 + i as u16))?
                    .queue(Print(format!("{line:^w_main$}")))?;
            }
            self.term
                .queue(MoveTo(
                    x_main,
                    y_main + y_selection + 4 + entries.len().max(1) as u16 + 2,
                ))?
                .queue(PrintStyledContent(
                    format!("{:^w_main$}", "(Controls: [Esc] / q)").italic(),
                ))?;
            self.term.flush()?;
            // Wait for new input.
            match event::read()? {
                // Quit menu.
                Event::Key(KeyEvent {
                    code: KeyCode::Char('c'),
                    modifiers: KeyModifiers::CONTROL,
                    kind: Press | Repeat,
                    state: _,
                }) => {
                    break Ok(MenuUpdate::Push(Menu::Quit(
                        "exited with ctrl-c".to_owned(),
                    )))
                }
                Event::Key(KeyEvent {
                    code:
                        KeyCode::Esc
                        | KeyCode::Char('q')
                        | KeyCode::Backspace
                        | KeyCode::Char('b')
                        | KeyCode::Enter
                        | KeyCode::Char('e'),
                    kind: Press,
                    ..
                }) => break Ok(MenuUpdate::Pop),
                // Other event: redraw in case of resize.
                _ => {}
            }
        }
    }
}
