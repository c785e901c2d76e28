mod application;
mod game_renderers;
mod keybinds_presets;
mod live_input_handler;
mod palette_presets;
mod top_scores;

use std::io::{self, Write};

use clap::Parser;

use crate::keybinds_presets::KeybindsPreset;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Custom seed for new games, given as a 64-bit integer.
    /// This determines the sequence of pieces and makes it possible to replay
    /// a run with the same pieces if the same seed is entered.
    /// Example: `./blockfall --seed=42` or `./blockfall -s 42`.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Custom starting board for new games: 10-wide rows separated by '/', the last row being
    /// the bottom of the well. '.' or spaces are empty cells, anything else is a filled cell.
    /// Example: `./blockfall --board="#########./#########."` or `./blockfall -b "#########./#########."`.
    #[arg(short, long)]
    board: Option<String>,
    /// Keybind preset to play with, overriding the one remembered from the last session.
    #[arg(short, long, value_enum)]
    keybinds: Option<KeybindsPreset>,
    /// Do not write settings and top scores to the savefile on exit.
    #[arg(long)]
    no_save: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Read commandline arguments.
    let args = Args::parse();

    // Initialize application.
    let stdout = io::BufWriter::new(io::stdout());
    let mut app = application::Application::new(
        stdout,
        args.seed,
        args.board,
        args.keybinds,
        !args.no_save,
    );

    // Catch panics and write error to separate file, so it isn't lost due to app's terminal shenanigans.
    std::panic::set_hook(Box::new(|panic_info| {
        // Forcefully reset terminal state.
        let _ = crossterm::terminal::disable_raw_mode();
        let _ =
            crossterm::ExecutableCommand::execute(&mut io::stderr(), crossterm::style::ResetColor);
        let _ = crossterm::ExecutableCommand::execute(&mut io::stderr(), crossterm::cursor::Show);
        let _ = crossterm::ExecutableCommand::execute(
            &mut io::stderr(),
            crossterm::terminal::LeaveAlternateScreen,
        );

        let crash_file_name = format!(
            "blockfall_crash-msg_{}.txt",
            chrono::Utc::now().format("%Y-%m-%d_%Hh%Mm%Ss")
        );
        if let Ok(mut file) = std::fs::File::create(crash_file_name) {
            let _ = file.write_all(panic_info.to_string().as_bytes());
        }

        eprint!("{panic_info}\n\n");
    }));

    // Run main application.
    let exit_msg = app.run()?;
    drop(app);
    println!("{exit_msg}");

    Ok(())
}
