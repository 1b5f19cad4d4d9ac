use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};

use super::*;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Quit
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Char('q')) => {
            request_exit(app)
        }
        (_, KeyCode::Esc) => {
            // Esc clears an active search before it asks to quit
            if app.last_search.is_some() {
                app.last_search = None;
            } else {
                request_exit(app);
            }
        }

        // Movement
        (_, KeyCode::Char('j') | KeyCode::Down) => move_cursor(app, 1),
        (_, KeyCode::Char('k') | KeyCode::Up) => move_cursor(app, -1),
        (_, KeyCode::PageDown) => move_cursor(app, 10),
        (_, KeyCode::PageUp) => move_cursor(app, -10),
        (_, KeyCode::Char('g') | KeyCode::Home) => app.cursor = 0,
        (_, KeyCode::Char('G') | KeyCode::End) => {
            app.cursor = app.store.len().saturating_sub(1);
        }

        // Task actions
        (_, KeyCode::Char('a')) => open_add_dialog(app),
        (_, KeyCode::Enter) => open_options_dialog(app),
        (_, KeyCode::Char('e')) => open_edit_dialog(app),
        (_, KeyCode::Char('d')) => delete_cursor_task(app),
        (_, KeyCode::Char('c')) => complete_cursor_task(app),
        (_, KeyCode::Char(' ')) => toggle_cursor_task(app),

        // Search
        (_, KeyCode::Char('/')) => {
            app.search_input.clear();
            app.mode = Mode::Search;
        }
        (_, KeyCode::Char('n')) => execute_search_dir(app, 1),
        (_, KeyCode::Char('N')) => execute_search_dir(app, -1),

        (_, KeyCode::Char('?')) => app.show_help = true,

        _ => {}
    }
}

fn move_cursor(app: &mut App, delta: isize) {
    let len = app.store.len();
    if len == 0 {
        return;
    }
    app.cursor = app.cursor.saturating_add_signed(delta).min(len - 1);
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
    fn cursor_movement_is_clamped() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, &["a", "b", "c"]);

        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.cursor, 0);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.cursor, 2);
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.cursor, 0);
        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.cursor, 2);
        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn actions_on_empty_list_are_noops() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, &[]);
        for code in [
            KeyCode::Enter,
            KeyCode::Char('e'),
            KeyCode::Char('d'),
            KeyCode::Char('c'),
            KeyCode::Char(' '),
            KeyCode::Char('j'),
        ] {
            press(&mut app, code);
        }
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.cursor, 0);
        assert!(app.notification.is_none());
    }

    #[test]
    fn space_toggles_and_c_only_completes() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, &["Buy milk"]);

        press(&mut app, KeyCode::Char(' '));
        assert!(app.store.tasks()[0].completed);
        press(&mut app, KeyCode::Char('c'));
        assert!(app.store.tasks()[0].completed);
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.store.tasks()[0].completed);
    }

    #[test]
    fn delete_last_task_moves_cursor_up() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, &["a", "b"]);
        press(&mut app, KeyCode::Char('G'));
        press(&mut app, KeyCode::Char('d'));

        assert_eq!(app.store.len(), 1);
        assert_eq!(app.cursor, 0);
        assert_eq!(
            app.notification.as_ref().map(|n| n.text.as_str()),
            Some("deleted \"b\"")
        );
    }

    #[test]
    fn esc_clears_search_before_exit() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, &[]);
        app.last_search = Some("milk".into());

        press(&mut app, KeyCode::Esc);
        assert!(app.last_search.is_none());
        assert_eq!(app.mode, Mode::Navigate);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::ConfirmExit);
    }

    #[test]
    fn help_overlay_swallows_next_key() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with(&tmp, &["a"]);
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('d'));
        assert!(!app.show_help);
        assert_eq!(app.store.len(), 1);
    }
}
