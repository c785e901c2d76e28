pub mod cell_print;

use std::io::{self, Write};

use blockfall_engine::{Engine, FeedbackMsg};

use crate::palette_presets::Palette;

pub trait Renderer {
    /// Hands the renderer feedback produced since the last call, to be shown on the next render.
    fn push_feedback_msgs(&mut self, feedback_msgs: impl IntoIterator<Item = FeedbackMsg>);

    fn render<T: Write>(
        &mut self,
        term: &mut T,
        engine: &Engine,
        palette: &Palette,
        keybinds_legend: &[String],
        screen_resized: bool,
    ) -> io::Result<()>;
}
