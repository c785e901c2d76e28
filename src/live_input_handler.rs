use std::{
    sync::mpsc::{SendError, Sender},
    thread::{self, JoinHandle},
};

use blockfall_engine::Command;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::keybinds_presets::{resolve, Keybinds};

pub enum LiveTermSignal {
    RecognizedCommand(Command),
    RawEvent(Event),
}

/// Spawns a thread that reads terminal events and forwards them, resolved through `keybinds`
/// where possible.
///
/// The thread stops after forwarding [Esc] or [Ctrl+C], or once the receiving end is gone.
pub fn spawn(input_sender: Sender<LiveTermSignal>, keybinds: Keybinds) -> JoinHandle<()> {
    thread::spawn(move || {
        'detect_events: loop {
            // Read event.
            let Ok(event) = event::read() else {
                continue;
            };

            let mut stop_thread = false;

            let signal = match event {
                Event::Key(KeyEvent {
                    code,
                    modifiers,
                    kind,
                    ..
                }) => {
                    let is_press_or_repeat =
                        matches!(kind, KeyEventKind::Press | KeyEventKind::Repeat);
                    let escape = matches!(code, KeyCode::Esc);
                    let ctrl_c = matches!(code, KeyCode::Char('c' | 'C'))
                        && modifiers.contains(KeyModifiers::CONTROL);

                    if is_press_or_repeat && (escape || ctrl_c) {
                        stop_thread = true;
                    }

                    match resolve(&keybinds, (code, modifiers)) {
                        // Commands happen on key down only.
                        Some(command) if is_press_or_repeat => {
                            LiveTermSignal::RecognizedCommand(command)
                        }
                        Some(_) => continue 'detect_events,
                        // No binding: Just transmit whatever the event was.
                        None => LiveTermSignal::RawEvent(event),
                    }
                }

                // Not a key event, just send directly.
                _ => LiveTermSignal::RawEvent(event),
            };

            // Send signal.
            if let Err(SendError(_signal_which_failed_to_transmit)) = input_sender.send(signal) {
                break 'detect_events;
            }

            if stop_thread {
                break 'detect_events;
            }
        }
    })
}
