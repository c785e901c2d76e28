use std::io::{self, Write};

use blockfall_engine::Engine;

use crate::application::{Application, Menu, MenuUpdate};

impl<T: Write> Application<T> {
    /// Sets up a fresh round from the session's seed and starting layout and goes straight to it.
    pub(in crate::application) fn run_menu_new_game(&mut self) -> io::Result<MenuUpdate> {
        let seed = self.new_game.custom_seed.unwrap_or_else(rand::random);
        let mut engine = Engine::builder()
            .seed(seed)
            .initial_cells(self.new_game.custom_board.iter().copied())
            .build();
        engine.start();
        Ok(MenuUpdate::Push(Menu::PlayGame {
            engine: Box::new(engine),
            game_renderer: Box::default(),
        }))
    }
}
