use std::collections::HashMap;

use blockfall_engine::Command;
use crossterm::event::{KeyCode, KeyModifiers};

pub type Keybinds = HashMap<(KeyCode, KeyModifiers), Command>;

#[derive(
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Clone,
    Copy,
    Debug,
    Default,
    clap::ValueEnum,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum KeybindsPreset {
    #[default]
    Classic,
    Arrows,
    Vim,
}

impl KeybindsPreset {
    pub const VARIANTS: [Self; 3] = [Self::Classic, Self::Arrows, Self::Vim];

    pub fn keybinds(&self) -> Keybinds {
        match self {
            KeybindsPreset::Classic => classic_keybinds(),
            KeybindsPreset::Arrows => arrows_keybinds(),
            KeybindsPreset::Vim => vim_keybinds(),
        }
    }

    pub fn cycle(&self, steps: isize) -> Self {
        let n = Self::VARIANTS.len() as isize;
        Self::VARIANTS[(*self as isize + steps).rem_euclid(n) as usize]
    }
}

pub fn normalize((mut code, mut modifiers): (KeyCode, KeyModifiers)) -> (KeyCode, KeyModifiers) {
    match code {
        KeyCode::Modifier(_) => {
            // A modifier key pressed on its own also reports itself as active modifier.
            modifiers = KeyModifiers::NONE;
        }

        // Normalize character enum to store a lowercase `char`; Shift is then implied by the char.
        KeyCode::Char(ref mut char) => {
            *char = char.to_ascii_lowercase();
            modifiers.remove(KeyModifiers::SHIFT);
        }

        // No changes for other keycodes.
        _ => {}
    }

    (code, modifiers)
}

/// Looks up which command, if any, a key press is bound to.
pub fn resolve(keybinds: &Keybinds, key: (KeyCode, KeyModifiers)) -> Option<Command> {
    keybinds.get(&normalize(key)).copied()
}

pub fn classic_keybinds() -> Keybinds {
    let keybinds_classic: [((KeyCode, KeyModifiers), Command); 8] = [
        (KeyCode::Char('a'), Command::MoveLeft),
        (KeyCode::Char('d'), Command::MoveRight),
        (KeyCode::Char('s'), Command::Drop),
        (KeyCode::Char('.'), Command::RotateClockwise),
        (KeyCode::Char(']'), Command::RotateClockwise),
        (KeyCode::Char(','), Command::RotateCounterClockwise),
        (KeyCode::Char('['), Command::RotateCounterClockwise),
        (KeyCode::Char('p'), Command::TogglePause),
    ]
    .map(|(k, c)| ((k, KeyModifiers::NONE), c));
    HashMap::from(keybinds_classic)
}

pub fn arrows_keybinds() -> Keybinds {
    let keybinds_arrows: [((KeyCode, KeyModifiers), Command); 7] = [
        (KeyCode::Left, Command::MoveLeft),
        (KeyCode::Right, Command::MoveRight),
        (KeyCode::Down, Command::Drop),
        (KeyCode::Up, Command::RotateClockwise),
        (KeyCode::Char('x'), Command::RotateClockwise),
        (KeyCode::Char('z'), Command::RotateCounterClockwise),
        (KeyCode::Char('p'), Command::TogglePause),
    ]
    .map(|(k, c)| ((k, KeyModifiers::NONE), c));
    HashMap::from(keybinds_arrows)
}

pub fn vim_keybinds() -> Keybinds {
    let keybinds_vim: [((KeyCode, KeyModifiers), Command); 6] = [
        (KeyCode::Char('h'), Command::MoveLeft),
        (KeyCode::Char('l'), Command::MoveRight),
        (KeyCode::Char('j'), Command::Drop),
        (KeyCode::Char('k'), Command::RotateClockwise),
        (KeyCode::Char('u'), Command::RotateCounterClockwise),
        (KeyCode::Char('p'), Command::TogglePause),
    ]
    .map(|(k, c)| ((k, KeyModifiers::NONE), c));
    HashMap::from(keybinds_vim)
}

/// Lists which keys trigger each command, in a stable order.
pub fn keybinds_legend(keybinds: &Keybinds) -> Vec<(Command, Vec<String>)> {
    const COMMANDS: [Command; 6] = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::RotateClockwise,
        Command::RotateCounterClockwise,
        Command::Drop,
        Command::TogglePause,
    ];
    COMMANDS
        .iter()
        .map(|&command| {
            let mut keys: Vec<String> = keybinds
                .iter()
                .filter(|&(_, &c)| c == command)
                .map(|(&(code, modifiers), _)| fmt_key(code, modifiers))
                .collect();
            keys.sort();
            (command, keys)
        })
        .collect()
}

pub fn fmt_key(code: KeyCode, modifiers: KeyModifiers) -> String {
    let key = match code {
        KeyCode::Left => "←".to_owned(),
        KeyCode::Right => "→".to_owned(),
        KeyCode::Up => "↑".to_owned(),
        KeyCode::Down => "↓".to_owned(),
        KeyCode::Char(' ') => "Space".to_owned(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Esc => "Esc".to_owned(),
        KeyCode::Enter => "Enter".to_owned(),
        other => format!("{other:?}"),
    };
    let mut prefix = String::new();
    for (modifier, name) in [
        (KeyModifiers::CONTROL, "Ctrl+"),
        (KeyModifiers::ALT, "Alt+"),
        (KeyModifiers::SHIFT, "Shift+"),
    ] {
        if modifiers.contains(modifier) {
            prefix.push_str(name);
        }
    }
    prefix + &key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_preset_maps_letters_and_brackets() {
        let keybinds = classic_keybinds();
        let press = |c| (KeyCode::Char(c), KeyModifiers::NONE);
        assert_eq!(resolve(&keybinds, press('a')), Some(Command::MoveLeft));
        assert_eq!(resolve(&keybinds, press('d')), Some(Command::MoveRight));
        assert_eq!(resolve(&keybinds, press('s')), Some(Command::Drop));
        assert_eq!(resolve(&keybinds, press('.')), Some(Command::RotateClockwise));
        assert_eq!(resolve(&keybinds, press(']')), Some(Command::RotateClockwise));
        assert_eq!(resolve(&keybinds, press(',')), Some(Command::RotateCounterClockwise));
        assert_eq!(resolve(&keybinds, press('[')), Some(Command::RotateCounterClockwise));
        assert_eq!(resolve(&keybinds, press('p')), Some(Command::TogglePause));
        assert_eq!(resolve(&keybinds, press('w')), None);
    }

    #[test]
    fn capital_letters_resolve_like_lowercase() {
        let keybinds = classic_keybinds();
        assert_eq!(
            resolve(&keybinds, (KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(Command::MoveLeft)
        );
        // Control combinations are not plain presses.
        assert_eq!(
            resolve(&keybinds, (KeyCode::Char('a'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn every_preset_binds_every_command() {
        for preset in KeybindsPreset::VARIANTS {
            for (command, keys) in keybinds_legend(&preset.keybinds()) {
                assert!(!keys.is_empty(), "{preset:?} leaves {command:?} unbound");
            }
        }
    }

    #[test]
    fn presets_cycle_both_ways() {
        assert_eq!(KeybindsPreset::Classic.cycle(1), KeybindsPreset::Arrows);
        assert_eq!(KeybindsPreset::Classic.cycle(-1), KeybindsPreset::Vim);
        assert_eq!(KeybindsPreset::Vim.cycle(3), KeybindsPreset::Vim);
    }
}
