use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppMode, Intent};

/// Map a key event to an intent for the current mode.
pub fn key_to_intent(mode: &AppMode, key: KeyEvent) -> Option<Intent> {
    // crossterm also reports release/repeat events on some platforms.
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Intent::Quit);
    }

    match mode {
        AppMode::PendingConfirm { .. } => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Intent::ConfirmYes),
            KeyCode::Char('n') | KeyCode::Char('N') => Some(Intent::ConfirmNo),
            KeyCode::Esc => Some(Intent::Quit),
            _ => None,
        },
        AppMode::Normal => match key.code {
            KeyCode::Up => Some(Intent::MoveUp),
            KeyCode::Down => Some(Intent::MoveDown),
            KeyCode::Left => Some(Intent::GoParent),
            KeyCode::Right => Some(Intent::EnterChild),
            KeyCode::Enter => Some(Intent::SubmitLine),
            KeyCode::Home => Some(Intent::OpenInPlace),
            KeyCode::Backspace => Some(Intent::Backspace),
            KeyCode::Esc => Some(Intent::Quit),
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(Intent::TypeChar(c))
            }
            _ => None,
        },
    }
}
