use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, InputState, InputTarget, Mode, OptionsState};
use crate::util::unicode;

/// Terminals report Shift+letter inconsistently; normalize to an uppercase char.
pub(super) fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
        && c.is_ascii_lowercase()
    {
        key.code = KeyCode::Char(c.to_ascii_uppercase());
    }
    key
}

// ---------------------------------------------------------------------------
// Opening dialogs
// ---------------------------------------------------------------------------

pub(super) fn open_add_dialog(app: &mut App) {
    app.input = Some(InputState::new(InputTarget::Add, ""));
    app.mode = Mode::Input;
}

/// Edit dialog, pre-populated with the task's current text
pub(super) fn open_edit_dialog(app: &mut App) {
    let Some(task) = app.cursor_task() else {
        return;
    };
    app.input = Some(InputState::new(InputTarget::Edit(task.id), &task.text));
    app.mode = Mode::Input;
}

pub(super) fn open_options_dialog(app: &mut App) {
    let Some(task) = app.cursor_task() else {
        return;
    };
    app.options = Some(OptionsState {
        task_id: task.id,
        selected: 0,
    });
    app.mode = Mode::Options;
}

/// Quit, or ask first when confirmation is enabled
pub(super) fn request_exit(app: &mut App) {
    if app.confirm_exit {
        app.exit_selected = 0;
        app.mode = Mode::ConfirmExit;
    } else {
        app.should_quit = true;
    }
}

// ---------------------------------------------------------------------------
// Task actions shared by the list and the options dialog
// ---------------------------------------------------------------------------

pub(super) fn delete_cursor_task(app: &mut App) {
    let Some(id) = app.cursor_task().map(|t| t.id) else {
        return;
    };
    if let Some(Some(task)) = app.mutate(|s| s.remove(id)) {
        app.notify(format!("deleted \"{}\"", task.text));
    }
    app.clamp_cursor();
}

pub(super) fn toggle_cursor_task(app: &mut App) {
    let Some(id) = app.cursor_task().map(|t| t.id) else {
        return;
    };
    app.mutate(|s| s.toggle_completed(id));
}

pub(super) fn complete_cursor_task(app: &mut App) {
    let Some(id) = app.cursor_task().map(|t| t.id) else {
        return;
    };
    app.mutate(|s| s.mark_completed(id));
}

// ---------------------------------------------------------------------------
// Single-line text editing
// ---------------------------------------------------------------------------

/// Apply an editing key to the buffer. Returns false for keys it does not handle.
pub(super) fn edit_buffer(state: &mut InputState, key: KeyEvent) -> bool {
    let word = key.modifiers.contains(KeyModifiers::CONTROL)
        || key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.buffer.insert(state.cursor, c);
            state.cursor += c.len_utf8();
        }
        KeyCode::Char('u') => {
            state.buffer.drain(..state.cursor);
            state.cursor = 0;
        }
        KeyCode::Char('w') => {
            let start = unicode::word_boundary_left(&state.buffer, state.cursor);
            state.buffer.drain(start..state.cursor);
            state.cursor = start;
        }
        KeyCode::Backspace => {
            let start = if word {
                Some(unicode::word_boundary_left(&state.buffer, state.cursor))
            } else {
                unicode::prev_grapheme_boundary(&state.buffer, state.cursor)
            };
            if let Some(start) = start {
                state.buffer.drain(start..state.cursor);
                state.cursor = start;
            }
        }
        KeyCode::Delete => {
            if let Some(end) = unicode::next_grapheme_boundary(&state.buffer, state.cursor) {
                state.buffer.drain(state.cursor..end);
            }
        }
        KeyCode::Left if word => {
            state.cursor = unicode::word_boundary_left(&state.buffer, state.cursor);
        }
        KeyCode::Right if word => {
            state.cursor = unicode::word_boundary_right(&state.buffer, state.cursor);
        }
        KeyCode::Left => {
            if let Some(pos) = unicode::prev_grapheme_boundary(&state.buffer, state.cursor) {
                state.cursor = pos;
            }
        }
        KeyCode::Right => {
            if let Some(pos) = unicode::next_grapheme_boundary(&state.buffer, state.cursor) {
                state.cursor = pos;
            }
        }
        KeyCode::Home => state.cursor = 0,
        KeyCode::End => state.cursor = state.buffer.len(),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    fn state(text: &str) -> InputState {
        InputState::new(InputTarget::Add, text)
    }

    #[test]
    fn typing_inserts_at_cursor() {
        let mut s = state("ac");
        edit_buffer(&mut s, key(KeyCode::Left));
        edit_buffer(&mut s, key(KeyCode::Char('b')));
        assert_eq!(s.buffer, "abc");
        assert_eq!(s.cursor, 2);
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let mut s = state("cafe\u{301}");
        edit_buffer(&mut s, key(KeyCode::Backspace));
        assert_eq!(s.buffer, "caf");
    }

    #[test]
    fn delete_at_end_is_noop() {
        let mut s = state("abc");
        edit_buffer(&mut s, key(KeyCode::Delete));
        assert_eq!(s.buffer, "abc");
        edit_buffer(&mut s, key(KeyCode::Home));
        edit_buffer(&mut s, key(KeyCode::Delete));
        assert_eq!(s.buffer, "bc");
        assert_eq!(s.cursor, 0);
    }

    #[test]
    fn ctrl_w_deletes_previous_word() {
        let mut s = state("buy oat milk");
        edit_buffer(&mut s, ctrl(KeyCode::Char('w')));
        assert_eq!(s.buffer, "buy oat ");
    }

    #[test]
    fn ctrl_u_clears_to_start() {
        let mut s = state("buy milk");
        edit_buffer(&mut s, key(KeyCode::Left));
        edit_buffer(&mut s, ctrl(KeyCode::Char('u')));
        assert_eq!(s.buffer, "k");
        assert_eq!(s.cursor, 0);
    }

    #[test]
    fn word_movement() {
        let mut s = state("buy oat milk");
        edit_buffer(&mut s, ctrl(KeyCode::Left));
        assert_eq!(s.cursor, 8);
        edit_buffer(&mut s, key(KeyCode::Home));
        edit_buffer(&mut s, ctrl(KeyCode::Right));
        assert_eq!(s.cursor, 4);
    }

    #[test]
    fn unhandled_keys_report_false() {
        let mut s = state("x");
        assert!(!edit_buffer(&mut s, key(KeyCode::Enter)));
        assert!(!edit_buffer(&mut s, key(KeyCode::Esc)));
    }

    #[test]
    fn shift_letters_normalize_to_uppercase() {
        let k = normalize_key(KeyEvent::new(KeyCode::Char('g'), KeyModifiers::SHIFT));
        assert_eq!(k.code, KeyCode::Char('G'));
    }
}
