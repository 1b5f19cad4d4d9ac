use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::search::{compile_pattern, search_tasks};
use crate::tui::app::{App, Mode};

pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Cancel search
        (_, KeyCode::Esc) => {
            app.mode = Mode::Navigate;
            app.search_input.clear();
        }

        // Execute search
        (_, KeyCode::Enter) => {
            if !app.search_input.is_empty() {
                app.last_search = Some(std::mem::take(&mut app.search_input));
                execute_search_dir(app, 0);
            }
            app.mode = Mode::Navigate;
            app.search_input.clear();
        }

        (_, KeyCode::Backspace) => {
            if app.search_input.pop().is_none() {
                app.mode = Mode::Navigate;
            }
        }

        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            app.search_input.push(c);
        }

        _ => {}
    }
}

/// Move the cursor to a match of `last_search`.
/// direction: 0 = at or after cursor, +1 = strictly after, -1 = strictly before.
pub(super) fn execute_search_dir(app: &mut App, direction: i32) {
    let Some(re) = app.last_search.as_deref().and_then(compile_pattern) else {
        return;
    };
    let positions: Vec<usize> = search_tasks(app.store.tasks(), &re)
        .iter()
        .map(|hit| hit.index)
        .collect();

    match find_next_match_position(&positions, app.cursor, direction) {
        Some((idx, wrapped)) => {
            app.cursor = positions[idx];
            if wrapped {
                app.notify("search wrapped");
            }
        }
        None => app.notify_error(format!(
            "no match for /{}",
            app.last_search.as_deref().unwrap_or_default()
        )),
    }
}

/// Given a sorted list of list positions where matches occur,
/// find the next one relative to `current_cursor` in the given direction.
/// Returns (index into positions, wrapped) or None if empty.
pub(super) fn find_next_match_position(
    positions: &[usize],
    current_cursor: usize,
    direction: i32,
) -> Option<(usize, bool)> {
    if positions.is_empty() {
        return None;
    }
    match direction {
        0 => Some((
            positions
                .iter()
                .position(|&p| p >= current_cursor)
                .unwrap_or(0),
            false,
        )),
        1 => match positions.iter().position(|&p| p > current_cursor) {
            Some(idx) => Some((idx, false)),
            None => Some((0, true)),
        },
        _ => match positions.iter().rposition(|&p| p < current_cursor) {
            Some(idx) => Some((idx, false)),
            None => Some((positions.len() - 1, true)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Config;
    use crate::ops::TaskStore;
    use tempfile::TempDir;

    fn app_with(tmp: &TempDir, texts: &[&str]) -> App {
        let mut store = TaskStore::load(tmp.path().join("tasks.json")).unwrap();
        for t in texts {
            store.add(t).unwrap();
        }
        App::new(store, &Config::default())
    }

    fn press(app: &mut App, code: KeyCode) {
        crate::tui::input::handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn find_next_forward_and_wrap() {
        let positions = [1, 4, 7];
        assert_eq!(find_next_match_position(&positions, 4, 0), Some((1, false)));
        assert_eq!(find_next_match_position(&positions, 4, 1), Some((2, false)));
        assert_eq!(find_next_match_position(&positions, 7, 1), Some((0, true)));
        assert_eq!(find_next_match_position(&positions, 8, 0), Some((0, false)));
    }

    #[test]
    fn find_next_backward_and_wrap() {
        let positions = [1, 4, 7];
        assert_eq!(find_next_match_position(&positions, 4, -1), Some((0, false)));
        assert_eq!(find_next_match_position(&positions, 1, -1), Some((2, true)));
        assert_eq!(find_next_match_position(&[], 0, 1), None);
    }

    #[test]
    fn search_moves_cursor_to_match() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, &["Buy milk", "Call mom", "Oat MILK"]);

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, Mode::Search);
        for c in "mom".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.cursor, 1);
        assert_eq!(app.last_search.as_deref(), Some("mom"));
    }

    #[test]
    fn next_and_prev_match_are_case_insensitive() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, &["Buy milk", "Call mom", "Oat MILK"]);
        app.last_search = Some("milk".into());

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.cursor, 2);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.cursor, 0);
        assert_eq!(
            app.notification.as_ref().map(|n| n.text.as_str()),
            Some("search wrapped")
        );
        press(&mut app, KeyCode::Char('N'));
        assert_eq!(app.cursor, 2);
    }

    #[test]
    fn no_match_reports_error() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, &["Buy milk"]);
        app.last_search = Some("bread".into());
        press(&mut app, KeyCode::Char('n'));
        let n = app.notification.as_ref().unwrap();
        assert!(n.is_error);
        assert_eq!(n.text, "no match for /bread");
    }

    #[test]
    fn escape_cancels_without_searching() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, &["Buy milk"]);
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.search_input.is_empty());
        assert!(app.last_search.is_none());
    }
}
