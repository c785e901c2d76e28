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

use crate::{
    application::{Application, GameSummary, Menu, MenuUpdate},
    top_scores::ScoreEntry,
};

impl<T: Write> Application<T> {
    pub(in crate::application) fn run_menu_game_over(
        &mut self,
        game_summary: &mut GameSummary,
    ) -> io::Result<MenuUpdate> {
        // Offer the result to the top-score table once, even if this menu is revisited.
        if !game_summary.recorded {
            game_summary.recorded = true;
            if let Some(rank) = self.top_scores.rank(game_summary.score) {
                let Some(name) = self.enter_name(game_summary, rank)? else {
                    return Ok(MenuUpdate::Push(Menu::Quit(
                        "exited with ctrl-c".to_owned(),
                    )));
                };
                self.top_scores.insert(ScoreEntry::new(
                    &name,
                    game_summary.score,
                    game_summary.level,
                    game_summary.rows_cleared,
                ));
            }
        }

        let GameSummary {
            score,
            level,
            rows_cleared,
            seed,
            ..
        } = game_summary;
        let selection = vec![
            Menu::NewGame,
            Menu::TopScores,
            Menu::Quit("quit after game ended".to_owned()),
        ];
        let mut selected = 0usize;
        loop {
            let w_main = Self::W_MAIN.into();
            let (x_main, y_main) = Self::fetch_main_xy();
            let y_selection = Self::H_MAIN / 5;
            self.term
                .queue(Clear(ClearType::All))?
                .queue(MoveTo(x_main, y_main + y_selection))?
                .queue(Print(format!("{:^w_main$}", "-- Game Over --")))?
                .queue(MoveTo(x_main, y_main + y_selection + 2))?
                .queue(Print(format!("{:^w_main$}", "──────────────────────────")))?;

            let stats = [
                format!("Score: {score}"),
                format!("Level: {level}"),
                format!("Rows: {rows_cleared}"),
                format!("Seed: {seed}"),
            ];

            for (i, s) in stats.iter().enumerate() {
                self.term
                    .queue(MoveTo(x_main, y_main + y_selection + 3 + i as u16))?
                    .queue(Print(format!("{s:^w_main$}")))?;
            }

            self.term
                .queue(MoveTo(
                    x_main,
                    y_main + y_selection + 3 + stats.len() as u16,
                ))?
                .queue(Print(format!("{:^w_main$}", "──────────────────────────")))?;

            let names = selection
                .iter()
                .map(|menu| menu.to_string())
                .collect::<Vec<_>>();

            for (i, name) in names.into_iter().enumerate() {
                self.term
                    .queue(MoveTo(
                        x_main,
                        y_main + y_selection + 3 + (stats.len() + 2 + i) as u16,
                    ))?
                    .queue(Print(format!(
                        "{:^w_main$}",
                        if i == selected {
                            format!(">> {name} <<")
                        } else {
                            name
                        }
                    )))?;
            }
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
                        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace | KeyCode::Char('b'),
                    kind: Press,
                    ..
                }) => break Ok(MenuUpdate::Push(Menu::Title)),
                // Select next menu.
                Event::Key(KeyEvent {
                    code: KeyCode::Enter | KeyCode::Char('e'),
                    kind: Press,
                    ..
                }) => {
                    if let Some(menu) = selection.into_iter().nth(selected) {
                        break Ok(MenuUpdate::Push(menu));
                    }
                    break Ok(MenuUpdate::Push(Menu::Title));
                }
                // Move selector up.
                Event::Key(KeyEvent {
                    code: KeyCode::Up | KeyCode::Char('k'),
                    kind: Press | Repeat,
                    ..
                }) => {
                    selected += selection.len() - 1;
                }
                // Move selector down.
                Event::Key(KeyEvent {
                    code: KeyCode::Down | KeyCode::Char('j'),
                    kind: Press | Repeat,
                    ..
                }) => {
                    selected += 1;
                }
                // Other event: don't care.
                _ => {}
            }
            selected = selected.rem_euclid(selection.len());
        }
    }

    /// Asks for the name to put next to a new top score; `None` if the player quit instead.
    fn enter_name(&mut self, game_summary: &GameSummary, rank: usize) -> io::Result<Option<String>> {
        let mut name = String::new();
        loop {
            let w_main = Self::W_MAIN.into();
            let (x_main, y_main) = Self::fetch_main_xy();
            let y_selection = Self::H_MAIN / 5;
            self.term
                .queue(Clear(ClearType::All))?
                .queue(MoveTo(x_main, y_main + y_selection))?
                .queue(Print(format!(
                    "{:^w_main$}",
                    format!("++ New top score: #{} with {} ++", rank + 1, game_summary.score)
                )))?
                .queue(MoveTo(x_main, y_main + y_selection + 2))?
                .queue(Print(format!("{:^w_main$}", "──────────────────────────")))?
                .queue(MoveTo(x_main, y_main + y_selection + 4))?
                .queue(Print(format!("{:^w_main$}", format!("Name: {name}_"))))?
                .queue(MoveTo(x_main, y_main + y_selection + 6))?
                .queue(PrintStyledContent(
                    format!("{:^w_main$}", "(Type a name, confirm with [Enter])").italic(),
                ))?;
            self.term.flush()?;
            match event::read()? {
                Event::Key(KeyEvent {
                    code: KeyCode::Char('c'),
                    modifiers: KeyModifiers::CONTROL,
                    kind: Press | Repeat,
                    ..
                }) => break Ok(None),
                Event::Key(KeyEvent {
                    code: KeyCode::Enter | KeyCode::Esc,
                    kind: Press,
                    ..
                }) => break Ok(Some(name)),
                Event::Key(KeyEvent {
                    code: KeyCode::Backspace,
                    kind: Press | Repeat,
                    ..
                }) => {
                    name.pop();
                }
                Event::Key(KeyEvent {
                    code: KeyCode::Char(char),
                    modifiers,
                    kind: Press | Repeat,
                    ..
                }) if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                    if name.chars().count() < ScoreEntry::MAX_NAME_LEN {
                        name.push(char);
                    }
                }
                // Other event: don't care.
                _ => {}
            }
        }
    }
}
