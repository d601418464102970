use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// All logical actions the TUI can perform, independent of key binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Threads
    NewThread,
    DeleteThread,
    NextThread,
    PrevThread,

    // Scrolling
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    ScrollTop,
    ScrollBottom,

    // Input
    InputChar(char),
    InputNewline,
    InputBackspace,
    InputDelete,
    InputMoveCursorLeft,
    InputMoveCursorRight,
    InputMoveWordLeft,
    InputMoveWordRight,
    InputMoveLineStart,
    InputMoveLineEnd,
    InputDeleteToStart,
    Submit,

    // Display
    ToggleTheme,
    ToggleSidebar,
    StopReveal,
    CopyLastAnswer,

    // App
    Quit,
    Help,
}

impl Action {
    /// Actions that edit or send the input, refused while an answer is
    /// outstanding.
    pub fn edits_input(&self) -> bool {
        matches!(
            self,
            Action::InputChar(_)
                | Action::InputNewline
                | Action::InputBackspace
                | Action::InputDelete
                | Action::InputDeleteToStart
                | Action::Submit
        )
    }
}

/// Map a raw key event to an [`Action`].
///
/// `loading`: an answer is outstanding; the input box is disabled.
pub fn map_key(event: KeyEvent, loading: bool) -> Option<Action> {
    let action = map_any(event)?;
    if loading && action.edits_input() {
        return None;
    }
    Some(action)
}

fn map_any(event: KeyEvent) -> Option<Action> {
    let ctrl  = event.modifiers.contains(KeyModifiers::CONTROL);
    let alt   = event.modifiers.contains(KeyModifiers::ALT);
    let shift = event.modifiers.contains(KeyModifiers::SHIFT);
    // "plain" = no modifier that would make a char a control sequence
    let plain = !ctrl && !alt;

    match event.code {
        // ── Global bindings ───────────────────────────────────────────────────
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => Some(Action::Quit),
        KeyCode::Char('n') if ctrl => Some(Action::NewThread),
        KeyCode::Char('d') if ctrl => Some(Action::DeleteThread),
        KeyCode::Char('t') if ctrl => Some(Action::ToggleTheme),
        KeyCode::Char('b') if ctrl => Some(Action::ToggleSidebar),
        KeyCode::Char('y') if ctrl => Some(Action::CopyLastAnswer),
        KeyCode::Char('u') if ctrl => Some(Action::InputDeleteToStart),
        // Ctrl+J is what many terminals send for Shift+Enter.
        KeyCode::Char('j') if ctrl => Some(Action::InputNewline),
        KeyCode::F(1) => Some(Action::Help),
        KeyCode::Esc  => Some(Action::StopReveal),

        // ── Thread list ───────────────────────────────────────────────────────
        KeyCode::Tab               => Some(Action::NextThread),
        KeyCode::BackTab           => Some(Action::PrevThread),
        KeyCode::Down if ctrl      => Some(Action::NextThread),
        KeyCode::Up   if ctrl      => Some(Action::PrevThread),

        // ── Chat scrolling ────────────────────────────────────────────────────
        KeyCode::Up                => Some(Action::ScrollUp),
        KeyCode::Down              => Some(Action::ScrollDown),
        KeyCode::PageUp            => Some(Action::ScrollPageUp),
        KeyCode::PageDown          => Some(Action::ScrollPageDown),
        KeyCode::Home if ctrl      => Some(Action::ScrollTop),
        KeyCode::End  if ctrl      => Some(Action::ScrollBottom),

        // ── Input box ─────────────────────────────────────────────────────────
        KeyCode::Enter if shift || alt => Some(Action::InputNewline),
        KeyCode::Enter             => Some(Action::Submit),
        KeyCode::Backspace         => Some(Action::InputBackspace),
        KeyCode::Delete            => Some(Action::InputDelete),
        KeyCode::Left  if ctrl     => Some(Action::InputMoveWordLeft),
        KeyCode::Right if ctrl     => Some(Action::InputMoveWordRight),
        KeyCode::Left              => Some(Action::InputMoveCursorLeft),
        KeyCode::Right             => Some(Action::InputMoveCursorRight),
        KeyCode::Home              => Some(Action::InputMoveLineStart),
        KeyCode::End               => Some(Action::InputMoveLineEnd),
        // Printable characters, only without ctrl/alt
        KeyCode::Char(c) if plain  => Some(Action::InputChar(c)),

        _ => None,
    }
}

// ─── Unit tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

    use super::*;

    fn key(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: mods,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    fn plain_key(c: char) -> KeyEvent { key(KeyCode::Char(c), KeyModifiers::NONE) }
    fn ctrl_key(c: char)  -> KeyEvent { key(KeyCode::Char(c), KeyModifiers::CONTROL) }

    #[test]
    fn enter_submits_and_shift_enter_inserts_newline() {
        assert_eq!(map_key(key(KeyCode::Enter, KeyModifiers::NONE), false), Some(Action::Submit));
        assert_eq!(
            map_key(key(KeyCode::Enter, KeyModifiers::SHIFT), false),
            Some(Action::InputNewline)
        );
        assert_eq!(map_key(ctrl_key('j'), false), Some(Action::InputNewline));
    }

    #[test]
    fn plain_char_types() {
        assert_eq!(map_key(plain_key('h'), false), Some(Action::InputChar('h')));
        let upper = key(KeyCode::Char('H'), KeyModifiers::SHIFT);
        assert_eq!(map_key(upper, false), Some(Action::InputChar('H')));
    }

    #[test]
    fn ctrl_unbound_does_not_type() {
        assert_eq!(map_key(ctrl_key('x'), false), None);
    }

    #[test]
    fn alt_char_does_not_type() {
        let ev = key(KeyCode::Char('a'), KeyModifiers::ALT);
        assert_eq!(map_key(ev, false), None);
    }

    #[test]
    fn thread_bindings() {
        assert_eq!(map_key(ctrl_key('n'), false), Some(Action::NewThread));
        assert_eq!(map_key(ctrl_key('d'), false), Some(Action::DeleteThread));
        assert_eq!(map_key(key(KeyCode::Tab, KeyModifiers::NONE), false), Some(Action::NextThread));
        assert_eq!(map_key(key(KeyCode::BackTab, KeyModifiers::SHIFT), false), Some(Action::PrevThread));
        assert_eq!(map_key(key(KeyCode::Up, KeyModifiers::CONTROL), false), Some(Action::PrevThread));
        assert_eq!(map_key(key(KeyCode::Down, KeyModifiers::CONTROL), false), Some(Action::NextThread));
    }

    #[test]
    fn plain_arrows_scroll() {
        assert_eq!(map_key(key(KeyCode::Up, KeyModifiers::NONE), false), Some(Action::ScrollUp));
        assert_eq!(map_key(key(KeyCode::PageDown, KeyModifiers::NONE), false), Some(Action::ScrollPageDown));
    }

    #[test]
    fn ctrl_t_toggles_theme() {
        assert_eq!(map_key(ctrl_key('t'), false), Some(Action::ToggleTheme));
    }

    #[test]
    fn ctrl_y_copies_even_while_loading() {
        assert_eq!(map_key(ctrl_key('y'), false), Some(Action::CopyLastAnswer));
        assert_eq!(map_key(ctrl_key('y'), true), Some(Action::CopyLastAnswer));
    }

    #[test]
    fn ctrl_c_quits_even_while_loading() {
        assert_eq!(map_key(ctrl_key('c'), false), Some(Action::Quit));
        assert_eq!(map_key(ctrl_key('c'), true), Some(Action::Quit));
    }

    #[test]
    fn input_is_disabled_while_loading() {
        assert_eq!(map_key(plain_key('h'), true), None);
        assert_eq!(map_key(key(KeyCode::Enter, KeyModifiers::NONE), true), None);
        assert_eq!(map_key(key(KeyCode::Backspace, KeyModifiers::NONE), true), None);
    }

    #[test]
    fn navigation_still_works_while_loading() {
        assert_eq!(map_key(ctrl_key('n'), true), Some(Action::NewThread));
        assert_eq!(map_key(key(KeyCode::Tab, KeyModifiers::NONE), true), Some(Action::NextThread));
        assert_eq!(map_key(key(KeyCode::Esc, KeyModifiers::NONE), true), Some(Action::StopReveal));
    }
}
