use crossterm::event::{KeyCode, KeyEvent};

/// UI-agnostic input actions for a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleInput {
    Up,
    Down,
    Confirm, // Enter / Space
    Cancel,  // Esc
    Other,
}

impl From<KeyEvent> for BattleInput {
    fn from(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => BattleInput::Up,
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => BattleInput::Down,
            KeyCode::Enter | KeyCode::Char(' ') => BattleInput::Confirm,
            KeyCode::Esc => BattleInput::Cancel,
            _ => BattleInput::Other,
        }
    }
}
