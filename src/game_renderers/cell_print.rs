use std::{
    collections::VecDeque,
    io::{self, Write},
};

use blockfall_engine::{Color as CellColor, Engine, Feedback, FeedbackMsg, Rotation};
use crossterm::{
    cursor::MoveTo,
    style::{Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
    QueueableCommand,
};

use crate::{application::Application, game_renderers::Renderer, palette_presets::Palette};

type Grid<const W: usize, const H: usize> = [[Option<CellColor>; W]; H];

#[derive(Clone, Default, Debug)]
pub struct CellPrintRenderer {
    feedback_texts: VecDeque<String>,
}

impl CellPrintRenderer {
    const MAX_FEEDBACK_TEXTS: usize = 4;
    const DX_WELL: u16 = 4;
    const DX_PANEL: u16 = Self::DX_WELL + 2 * Engine::WIDTH as u16 + 2 + 3;

    fn fmt_feedback(feedback: &Feedback) -> Option<String> {
        let text = match feedback {
            Feedback::Render | Feedback::PieceSettled { .. } => return None,
            Feedback::RowsCleared {
                rows,
                score_bonus,
                tetris_streak,
            } => {
                let clear_action = match rows.len() {
                    1 => "Single",
                    2 => "Double",
                    3 => "Triple",
                    _ => "Tetris",
                };
                if *tetris_streak > 1 {
                    format!("+{score_bonus} {clear_action} x{tetris_streak}")
                } else {
                    format!("+{score_bonus} {clear_action}")
                }
            }
            Feedback::LevelUp { level } => format!("Level {level}!"),
            Feedback::Paused => "Paused".to_owned(),
            Feedback::Resumed => "Resumed".to_owned(),
            Feedback::GameEnded { score, .. } => format!("Game over with {score} points"),
            Feedback::Debug(text) => text.clone(),
        };
        Some(text)
    }

    fn well_grid(engine: &Engine) -> Grid<{ Engine::WIDTH as usize }, { Engine::HEIGHT as usize }> {
        let mut grid = [[None; Engine::WIDTH as usize]; Engine::HEIGHT as usize];
        let board = engine.board();
        let active_cells = board.active_piece().cells();
        for cell in board.settled().iter().chain(active_cells) {
            // Cells above the well are not drawn.
            if let (Ok(x), Ok(y)) = (usize::try_from(cell.x), usize::try_from(cell.y)) {
                if let Some(slot) = grid.get_mut(y).and_then(|row| row.get_mut(x)) {
                    *slot = Some(cell.color);
                }
            }
        }
        grid
    }

    fn preview_grid(engine: &Engine) -> Grid<4, 4> {
        let mut grid = [[None; 4]; 4];
        let kind = engine.next_piece().kind;
        for cell in kind.cells_for((1, 1), Rotation::North) {
            if let (Ok(x), Ok(y)) = (usize::try_from(cell.x), usize::try_from(cell.y)) {
                if let Some(slot) = grid.get_mut(y).and_then(|row| row.get_mut(x)) {
                    *slot = Some(cell.color);
                }
            }
        }
        grid
    }

    fn queue_grid_row<T: Write>(
        term: &mut T,
        row: &[Option<CellColor>],
        palette: &Palette,
    ) -> io::Result<()> {
        for cell in row {
            match cell {
                None => term.queue(Print(" ."))?,
                Some(color) => match palette.get(color) {
                    Some(&term_color) => term.queue(PrintStyledContent("██".with(term_color)))?,
                    None => term.queue(Print("██"))?,
                },
            };
        }
        Ok(())
    }
}

impl Renderer for CellPrintRenderer {
    fn push_feedback_msgs(&mut self, feedback_msgs: impl IntoIterator<Item = FeedbackMsg>) {
        for (_time, feedback) in feedback_msgs {
            if let Some(text) = Self::fmt_feedback(&feedback) {
                self.feedback_texts.push_front(text);
            }
        }
        self.feedback_texts.truncate(Self::MAX_FEEDBACK_TEXTS);
    }

    fn render<T: Write>(
        &mut self,
        term: &mut T,
        engine: &Engine,
        palette: &Palette,
        keybinds_legend: &[String],
        screen_resized: bool,
    ) -> io::Result<()> {
        let (x_main, y_main) = Application::<T>::fetch_main_xy();
        let w_panel = usize::from(Application::<T>::W_MAIN - Self::DX_PANEL);
        let x_well = x_main + Self::DX_WELL;
        let x_panel = x_main + Self::DX_PANEL;

        if screen_resized {
            term.queue(Clear(ClearType::All))?;
        }

        // Well.
        let border = "══".repeat(Engine::WIDTH as usize);
        term.queue(MoveTo(x_well, y_main))?
            .queue(Print(format!("╔{border}╗")))?;
        for (dy, row) in Self::well_grid(engine).iter().enumerate() {
            let y = y_main + 1 + dy as u16;
            term.queue(MoveTo(x_well, y))?.queue(Print("║"))?;
            Self::queue_grid_row(term, row, palette)?;
            term.queue(Print("║"))?;
        }
        term.queue(MoveTo(x_well, y_main + 1 + Engine::HEIGHT as u16))?
            .queue(Print(format!("╚{border}╝")))?;

        // Next piece.
        term.queue(MoveTo(x_panel, y_main))?
            .queue(Print(format!("{:<w_panel$}", "Next:")))?;
        for (dy, row) in Self::preview_grid(engine).iter().enumerate() {
            term.queue(MoveTo(x_panel + 2, y_main + 1 + dy as u16))?;
            Self::queue_grid_row(term, row, palette)?;
        }

        // Stats and status.
        let status = if engine.is_game_over() {
            "** GAME OVER **"
        } else if engine.is_paused() {
            "** PAUSED **"
        } else {
            ""
        };
        let stats = [
            format!("Score:  {}", engine.score()),
            format!("Level:  {}", engine.level()),
            format!("Rows:   {}", engine.rows_cleared()),
            format!("Streak: {}", engine.consecutive_tetris_count()),
            String::new(),
            status.to_owned(),
        ];
        for (dy, line) in stats.iter().enumerate() {
            term.queue(MoveTo(x_panel, y_main + 6 + dy as u16))?
                .queue(Print(format!("{line:<w_panel$}")))?;
        }

        // Recent feedback.
        for dy in 0..Self::MAX_FEEDBACK_TEXTS {
            let text = self.feedback_texts.get(dy).map_or("", String::as_str);
            term.queue(MoveTo(x_panel, y_main + 12 + dy as u16))?
                .queue(PrintStyledContent(format!("{text:<w_panel$}").italic()))?;
        }

        // Controls.
        for (dy, line) in keybinds_legend.iter().enumerate() {
            term.queue(MoveTo(x_panel, y_main + 17 + dy as u16))?
                .queue(Print(format!("{line:<w_panel$}")))?;
        }

        term.flush()
    }
}
