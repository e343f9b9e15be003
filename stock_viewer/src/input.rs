//! Key bindings.
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{Action, Screen};

/// Maps a key press to an action for the current screen.
///
/// Releases and repeats are ignored so a key is handled once on terminals
/// that report both.
pub fn key_action(key: KeyEvent, screen: &Screen) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(Action::Quit);
    }

    let in_detail = matches!(screen, Screen::Detail(_));
    let action = match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('r') if in_detail => Action::RefreshChart,
        KeyCode::Char('r') => Action::RefreshQuotes,
        KeyCode::Esc | KeyCode::Backspace if in_detail => Action::Back,
        KeyCode::Char('w') if in_detail => Action::CycleWindow,
        KeyCode::Left | KeyCode::Char('h') if !in_detail => Action::MoveLeft,
        KeyCode::Right | KeyCode::Char('l') if !in_detail => Action::MoveRight,
        KeyCode::Up | KeyCode::Char('k') if !in_detail => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') if !in_detail => Action::MoveDown,
        KeyCode::Enter if !in_detail => Action::Open,
        _ => return None,
    };
    Some(action)
}
