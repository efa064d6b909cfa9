use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Represents the result of handling a key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Quit the application
    Quit,
    /// Keep the current photo and move on
    Skip,
    /// Mark the current photo for deletion
    Mark,
    /// Take the last mark back
    Undo,
    /// Open the trash view
    OpenTrash,
    /// Leave the trash view
    Back,
    /// Move the trash cursor down
    Next,
    /// Move the trash cursor up
    Previous,
    /// Toggle selection of the entry under the cursor
    ToggleSelect,
    /// Select everything, or nothing if everything is selected
    SelectAll,
    /// Delete the selected photos (asks first)
    Delete,
    /// Take the selected photos out of the trash
    Restore,
    /// Answer yes in a dialog
    Confirm,
    /// Answer no in a dialog
    Cancel,
    /// Toggle help overlay
    Help,
    /// No action
    None,
}

/// Maps keyboard events on the swipe screen to actions
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Quit: q or Ctrl+C
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Quit,

        // Mark: Right arrow or d
        (KeyCode::Right, KeyModifiers::NONE) => KeyAction::Mark,
        (KeyCode::Char('d'), KeyModifiers::NONE) => KeyAction::Mark,

        // Skip: Left arrow or s
        (KeyCode::Left, KeyModifiers::NONE) => KeyAction::Skip,
        (KeyCode::Char('s'), KeyModifiers::NONE) => KeyAction::Skip,

        // Undo: u or Ctrl+Z
        (KeyCode::Char('u'), KeyModifiers::NONE) => KeyAction::Undo,
        (KeyCode::Char('z'), KeyModifiers::CONTROL) => KeyAction::Undo,

        (KeyCode::Char('t'), KeyModifiers::NONE) => KeyAction::OpenTrash,
        (KeyCode::Char('?'), KeyModifiers::NONE) => KeyAction::Help,

        _ => KeyAction::None,
    }
}

/// Maps keyboard events in the trash view to actions
pub fn handle_trash_input(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Back,
        (KeyCode::Char('t'), KeyModifiers::NONE) => KeyAction::Back,

        (KeyCode::Down, KeyModifiers::NONE) => KeyAction::Next,
        (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::Next,
        (KeyCode::Up, KeyModifiers::NONE) => KeyAction::Previous,
        (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::Previous,

        (KeyCode::Char(' '), KeyModifiers::NONE) => KeyAction::ToggleSelect,
        (KeyCode::Char('a'), KeyModifiers::NONE) => KeyAction::SelectAll,
        (KeyCode::Char('x'), KeyModifiers::NONE) => KeyAction::Delete,
        (KeyCode::Delete, KeyModifiers::NONE) => KeyAction::Delete,
        (KeyCode::Char('r'), KeyModifiers::NONE) => KeyAction::Restore,
        (KeyCode::Char('?'), KeyModifiers::NONE) => KeyAction::Help,

        _ => KeyAction::None,
    }
}

/// Maps keyboard events to yes/no answers in dialogs
pub fn handle_confirm_input(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Confirm: y or Enter
        (KeyCode::Char('y'), KeyModifiers::NONE) => KeyAction::Confirm,
        (KeyCode::Char('Y'), KeyModifiers::SHIFT) => KeyAction::Confirm,
        (KeyCode::Char('Y'), KeyModifiers::NONE) => KeyAction::Confirm,
        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::Confirm,

        // Cancel: n or Esc
        (KeyCode::Char('n'), KeyModifiers::NONE) => KeyAction::Cancel,
        (KeyCode::Char('N'), KeyModifiers::SHIFT) => KeyAction::Cancel,
        (KeyCode::Char('N'), KeyModifiers::NONE) => KeyAction::Cancel,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Cancel,

        _ => KeyAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_quit() {
        assert_eq!(handle_key_event(key(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(handle_key_event(key(KeyCode::Esc)), KeyAction::Quit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn test_key_swipes() {
        assert_eq!(handle_key_event(key(KeyCode::Right)), KeyAction::Mark);
        assert_eq!(handle_key_event(key(KeyCode::Char('d'))), KeyAction::Mark);
        assert_eq!(handle_key_event(key(KeyCode::Left)), KeyAction::Skip);
        assert_eq!(handle_key_event(key(KeyCode::Char('s'))), KeyAction::Skip);
    }

    #[test]
    fn test_key_undo_and_trash() {
        assert_eq!(handle_key_event(key(KeyCode::Char('u'))), KeyAction::Undo);

        let ctrl_z = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(ctrl_z), KeyAction::Undo);

        assert_eq!(handle_key_event(key(KeyCode::Char('t'))), KeyAction::OpenTrash);
        assert_eq!(handle_key_event(key(KeyCode::Char('?'))), KeyAction::Help);
    }

    #[test]
    fn test_key_none() {
        assert_eq!(handle_key_event(key(KeyCode::Char('x'))), KeyAction::None);
        assert_eq!(handle_key_event(key(KeyCode::Char(' '))), KeyAction::None);
    }

    #[test]
    fn test_trash_keys() {
        assert_eq!(handle_trash_input(key(KeyCode::Esc)), KeyAction::Back);
        assert_eq!(handle_trash_input(key(KeyCode::Char('t'))), KeyAction::Back);
        assert_eq!(handle_trash_input(key(KeyCode::Down)), KeyAction::Next);
        assert_eq!(handle_trash_input(key(KeyCode::Char('k'))), KeyAction::Previous);
        assert_eq!(handle_trash_input(key(KeyCode::Char(' '))), KeyAction::ToggleSelect);
        assert_eq!(handle_trash_input(key(KeyCode::Char('a'))), KeyAction::SelectAll);
        assert_eq!(handle_trash_input(key(KeyCode::Char('x'))), KeyAction::Delete);
        assert_eq!(handle_trash_input(key(KeyCode::Delete)), KeyAction::Delete);
        assert_eq!(handle_trash_input(key(KeyCode::Char('r'))), KeyAction::Restore);
        assert_eq!(handle_trash_input(key(KeyCode::Right)), KeyAction::None);
    }

    #[test]
    fn test_confirm_keys() {
        assert_eq!(handle_confirm_input(key(KeyCode::Char('y'))), KeyAction::Confirm);
        assert_eq!(handle_confirm_input(key(KeyCode::Enter)), KeyAction::Confirm);

        let upper_y = KeyEvent::new(KeyCode::Char('Y'), KeyModifiers::SHIFT);
        assert_eq!(handle_confirm_input(upper_y), KeyAction::Confirm);
    }

    #[test]
    fn test_cancel_keys() {
        assert_eq!(handle_confirm_input(key(KeyCode::Char('n'))), KeyAction::Cancel);
        assert_eq!(handle_confirm_input(key(KeyCode::Esc)), KeyAction::Cancel);
    }

    #[test]
    fn test_confirm_input_none() {
        assert_eq!(handle_confirm_input(key(KeyCode::Char('x'))), KeyAction::None);
        assert_eq!(handle_confirm_input(key(KeyCode::Char('q'))), KeyAction::None);
    }
}
