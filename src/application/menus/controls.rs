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
    pub(in crate::application) fn run_menu_controls(&mut self) -> io::Result<MenuUpdate> {
        const N_OPTIONS: usize = 2;
        let mut selected = 0usize;
        loop {
            let w_main = Self::W_MAIN.into();
            let (x_main, y_main) = Self::fetch_main_xy();
            let y_selection = Self::H_MAIN / 5;
            self.term
                .queue(Clear(ClearType::All))?
                .queue(MoveTo(x_main, y_main + y_selection))?
                .queue(Print(format!("{:^w_main$}", "* Controls *")))?
                .queue(MoveTo(x_main, y_main + y_selection + 2))?
                .queue(Print(format!("{:^w_main$}", "──────────────────────────")))?;

            let options = [
                format!("Keybinds: {:?}", self.settings.keybinds_preset),
                format!("Palette: {:?}", self.settings.palette_preset),
            ];
            for (i, option) in options.into_iter().enumerate() {
                self.term
                    .queue(MoveTo(x_main, y_main + y_selection + 4 + i as u16))?
                    .queue(Print(format!(
                        "{:^w_main$}",
                        if i == selected {
                            format!(">> {option} <<")
                        } else {
                            option
                        }
                    )))?;
            }

            let legend = self.fmt_keybinds_legend();
            let w_legend = legend.iter().map(|line| line.chars().count()).max().unwrap_or(0);
            for (i, line) in legend.iter().enumerate() {
                self.term
                    .queue(MoveTo(
                        x_main,
                        y_main + y_selection + 4 + N_OPTIONS as u16 + 1 + i as u16,
                    ))?
                    .queue(Print(format!("{:^w_main$}", format!("{line:<w_legend$}"))))?;
            }
            self.term
                .queue(MoveTo(
                    x_main,
                    y_main + y_selection + 4 + (N_OPTIONS + 1 + legend.len() + 1) as u16,
                ))?
                .queue(PrintStyledContent(
                    format!("{:^w_main$}", "(Controls: [←|↓|↑|→] [Esc] / hjklq)").italic(),
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
                        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace | KeyCode::Char('b'),
                    kind: Press,
                    ..
                }) => break Ok(MenuUpdate::Pop),
                // Move selector up.
                Event::Key(KeyEvent {
                    code: KeyCode::Up | KeyCode::Char('k'),
                    kind: Press | Repeat,
                    ..
                }) => {
                    selected += N_OPTIONS - 1;
                }
                // Move selector down.
                Event::Key(KeyEvent {
                    code: KeyCode::Down | KeyCode::Char('j'),
                    kind: Press | Repeat,
                    ..
                }) => {
                    selected += 1;
                }
                // Cycle selected option.
                Event::Key(KeyEvent {
                    code: KeyCode::Left | KeyCode::Char('h'),
                    kind: Press | Repeat,
                    ..
                }) => self.cycle_controls_option(selected, -1),
                Event::Key(KeyEvent {
                    code: KeyCode::Right | KeyCode::Char('l'),
                    kind: Press | Repeat,
                    ..
                }) => self.cycle_controls_option(selected, 1),
                // Other event: don't care.
                _ => {}
            }
            selected = selected.rem_euclid(N_OPTIONS);
        }
    }

    fn cycle_controls_option(&mut self, option: usize, steps: isize) {
        if option == 0 {
            let preset = self.settings.keybinds_preset.cycle(steps);
            self.settings.set_keybinds_preset(preset);
        } else {
            self.settings.palette_preset = self.settings.palette_preset.cycle(steps);
        }
    }
}
