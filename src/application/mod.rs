mod menus;

use std::{
    fs::File,
    io::{self, Read, Write},
    path::PathBuf,
};

use blockfall_engine::{Cell, Command, Engine, ShapeKind};
use crossterm::{cursor, style, terminal, ExecutableCommand};

use crate::{
    game_renderers::cell_print::CellPrintRenderer,
    keybinds_presets::{keybinds_legend, Keybinds, KeybindsPreset},
    palette_presets::{Palette, PalettePreset},
    top_scores::TopScores,
};

#[serde_with::serde_as]
#[derive(PartialEq, Eq, Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Settings {
    keybinds_preset: KeybindsPreset,
    #[serde_as(as = "Vec<(_, _)>")]
    keybinds: Keybinds,
    palette_preset: PalettePreset,
}

impl Default for Settings {
    fn default() -> Self {
        let keybinds_preset = KeybindsPreset::default();
        Self {
            keybinds_preset,
            keybinds: keybinds_preset.keybinds(),
            palette_preset: PalettePreset::default(),
        }
    }
}

impl Settings {
    pub fn keybinds(&self) -> &Keybinds {
        &self.keybinds
    }

    pub fn palette(&self) -> Palette {
        self.palette_preset.palette()
    }

    fn set_keybinds_preset(&mut self, preset: KeybindsPreset) {
        self.keybinds_preset = preset;
        self.keybinds = preset.keybinds();
    }
}

#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct NewGameSettings {
    custom_seed: Option<u64>,
    custom_board: Vec<Cell>,
}

impl NewGameSettings {
    /// Decodes a starting layout given as rows separated by `/`, the last row being the bottom of
    /// the well.
    ///
    /// `.` and spaces are empty cells, any other character is a filled cell.
    /// Rows are cut off after the well's width, and rows that would lie above the well are skipped.
    /// Example: `"#########./#########."` fills the two bottom rows except for the rightmost column.
    pub fn decode_board(board_str: &str) -> Vec<Cell> {
        let rows: Vec<&str> = board_str.split('/').collect();
        let mut cells = Vec::new();
        for (dy, row) in rows.iter().rev().enumerate() {
            let Ok(dy) = i32::try_from(dy) else {
                break;
            };
            let y = Engine::HEIGHT - 1 - dy;
            if y < 0 {
                break;
            }
            for (x, char) in (0..Engine::WIDTH).zip(row.chars()) {
                if !matches!(char, '.' | ' ') {
                    let kind = ShapeKind::VARIANTS[x.rem_euclid(7) as usize];
                    cells.push(Cell::new(x, y, kind.color()));
                }
            }
        }
        cells
    }
}

/// What a finished round leaves behind for the game-over screen.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct GameSummary {
    score: u32,
    level: u32,
    rows_cleared: u32,
    seed: u64,
    /// Whether the result was already offered to the top-score table.
    recorded: bool,
}

impl GameSummary {
    fn new(engine: &Engine) -> Self {
        Self {
            score: engine.score(),
            level: engine.level(),
            rows_cleared: engine.rows_cleared(),
            seed: engine.seed(),
            recorded: false,
        }
    }
}

#[derive(Debug)]
enum Menu {
    Title,
    NewGame,
    PlayGame {
        engine: Box<Engine>,
        game_renderer: Box<CellPrintRenderer>,
    },
    GameOver(Box<GameSummary>),
    TopScores,
    Controls,
    Quit(String),
}

impl std::fmt::Display for Menu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Menu::Title => "Title Screen",
            Menu::NewGame => "New Game",
            Menu::PlayGame { .. } => "Playing Game",
            Menu::GameOver(_) => "Game Over",
            Menu::TopScores => "Top Scores",
            Menu::Controls => "Controls",
            Menu::Quit(_) => "Quit",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug)]
enum MenuUpdate {
    Pop,
    Push(Menu),
}

#[derive(PartialEq, Clone, Debug)]
pub struct Application<T: Write> {
    term: T,
    settings: Settings,
    top_scores: TopScores,
    new_game: NewGameSettings,
    save_on_exit: bool,
}

impl<T: Write> Drop for Application<T> {
    fn drop(&mut self) {
        // (Try to) undo terminal setup.
        let _ = terminal::disable_raw_mode();
        let _ = self.term.execute(style::ResetColor);
        let _ = self.term.execute(cursor::Show);
        let _ = self.term.execute(terminal::LeaveAlternateScreen);

        if self.save_on_exit {
            // Failing to save is not worth bothering the player about on their way out.
            let _ = self.store_savefile(Self::savefile_path());
        }
    }
}

impl<T: Write> Application<T> {
    pub const W_MAIN: u16 = 62;
    pub const H_MAIN: u16 = 23;

    pub const SAVEFILE_NAME: &'static str = ".blockfall_savefile.json";

    pub fn new(
        mut term: T,
        custom_start_seed: Option<u64>,
        custom_start_board: Option<String>,
        keybinds_preset: Option<KeybindsPreset>,
        save_on_exit: bool,
    ) -> Self {
        // Console prologue: Initialization.
        let _ = term.execute(terminal::EnterAlternateScreen);
        let _ = term.execute(terminal::SetTitle("Blockfall"));
        let _ = term.execute(cursor::Hide);
        let _ = terminal::enable_raw_mode();
        let mut app = Self {
            term,
            settings: Settings::default(),
            top_scores: TopScores::default(),
            new_game: NewGameSettings::default(),
            save_on_exit,
        };

        // A missing or unreadable savefile just means starting from defaults.
        let _ = app.load_savefile(Self::savefile_path());

        // Now that the settings are loaded, we handle separate flags set for this session.
        if let Some(preset) = keybinds_preset {
            app.settings.set_keybinds_preset(preset);
        }
        app.new_game = NewGameSettings {
            custom_seed: custom_start_seed,
            custom_board: custom_start_board
                .as_deref()
                .map(NewGameSettings::decode_board)
                .unwrap_or_default(),
        };
        app
    }

    pub(crate) fn fetch_main_xy() -> (u16, u16) {
        let (w_console, h_console) = terminal::size().unwrap_or((0, 0));
        (
            w_console.saturating_sub(Self::W_MAIN) / 2,
            h_console.saturating_sub(Self::H_MAIN) / 2,
        )
    }

    fn fmt_keybinds_legend(&self) -> Vec<String> {
        keybinds_legend(self.settings.keybinds())
            .into_iter()
            .map(|(command, keys)| {
                let name = match command {
                    Command::MoveLeft => "Left",
                    Command::MoveRight => "Right",
                    Command::RotateClockwise => "Rotate cw",
                    Command::RotateCounterClockwise => "Rotate ccw",
                    Command::Drop => "Drop",
                    Command::TogglePause => "Pause",
                };
                format!("{name:<11}{}", keys.join(" "))
            })
            .collect()
    }

    fn savefile_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::SAVEFILE_NAME)
    }

    fn store_savefile(&mut self, path: PathBuf) -> io::Result<()> {
        let save_state = (&self.settings, &self.top_scores);
        let save_str = serde_json::to_string(&save_state)?;
        let mut file = File::create(path)?;
        file.write_all(save_str.as_bytes())
    }

    fn load_savefile(&mut self, path: PathBuf) -> io::Result<()> {
        let mut file = File::open(path)?;
        let mut save_str = String::new();
        file.read_to_string(&mut save_str)?;
        (self.settings, self.top_scores) = serde_json::from_str(&save_str)?;
        Ok(())
    }

    pub fn run(&mut self) -> io::Result<String> {
        let mut menu_stack = vec![Menu::Title];
        let exit_msg = loop {
            // Retrieve active menu, stop application if stack is empty.
            let Some(menu) = menu_stack.last_mut() else {
                break "all menus closed".to_owned();
            };
            // Open new menu screen, then store what it returns.
            let menu_update = match menu {
                Menu::Title => self.run_menu_title(),
                Menu::NewGame => self.run_menu_new_game(),
                Menu::PlayGame {
                    engine,
                    game_renderer,
                } => self.run_menu_play_game(engine, game_renderer.as_mut()),
                Menu::GameOver(game_summary) => self.run_menu_game_over(game_summary),
                Menu::TopScores => self.run_menu_top_scores(),
                Menu::Controls => self.run_menu_controls(),
                Menu::Quit(exit_msg) => break exit_msg.clone(),
            }?;

            // Change screen session depending on what response screen gave.
            match menu_update {
                MenuUpdate::Pop => {
                    if menu_stack.len() > 1 {
                        menu_stack.pop();
                    }
                }
                MenuUpdate::Push(menu) => {
                    if matches!(
                        menu,
                        Menu::Title | Menu::PlayGame { .. } | Menu::GameOver(_)
                    ) {
                        menu_stack.clear();
                    }
                    menu_stack.push(menu);
                }
            }
        };

        Ok(exit_msg)
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::Color;

    use super::*;

    #[test]
    fn board_rows_are_bottom_aligned() {
        let cells = NewGameSettings::decode_board("#########./#########.");
        assert_eq!(cells.len(), 18);
        assert!(cells.iter().all(|cell| cell.y == 18 || cell.y == 19));
        assert!(cells.iter().all(|cell| cell.x != 9));
    }

    #[test]
    fn board_cells_are_colored_by_column() {
        let cells = NewGameSettings::decode_board("##");
        assert_eq!(
            cells,
            [
                Cell::new(0, 19, ShapeKind::L.color()),
                Cell::new(1, 19, ShapeKind::J.color()),
            ]
        );
        assert_eq!(cells[1].color, Color::Orange);
    }

    #[test]
    fn board_ignores_overlong_rows_and_excess_rows() {
        let wide = NewGameSettings::decode_board("X X X X X X X X");
        assert!(wide.iter().all(|cell| cell.x < Engine::WIDTH));
        assert_eq!(wide.len(), 5);

        let tall = vec!["#"; 25].join("/");
        let cells = NewGameSettings::decode_board(&tall);
        assert_eq!(cells.len(), Engine::HEIGHT as usize);
        assert!(cells.iter().all(|cell| cell.y >= 0));
    }

    #[test]
    fn empty_board_string_gives_no_cells() {
        assert!(NewGameSettings::decode_board("").is_empty());
        assert!(NewGameSettings::decode_board("../ ..").is_empty());
    }

    #[test]
    fn settings_survive_savefile_format() {
        let mut settings = Settings::default();
        settings.set_keybinds_preset(KeybindsPreset::Vim);
        settings.palette_preset = PalettePreset::Fullcolor;
        let json = serde_json::to_string(&(&settings, &TopScores::default())).unwrap();
        let (restored, _): (Settings, TopScores) = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, settings);
    }
}
