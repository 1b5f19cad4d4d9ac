use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::task::is_blank;
use crate::tui::app::{App, EXIT_BUTTONS, InputTarget, Mode, TaskAction};

use super::*;

// ---------------------------------------------------------------------------
// Add / Edit dialog
// ---------------------------------------------------------------------------

pub(super) fn handle_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => close_input(app),
        KeyCode::Enter => confirm_input(app),
        _ => {
            if let Some(state) = &mut app.input {
                edit_buffer(state, key);
            }
        }
    }
}

fn close_input(app: &mut App) {
    app.input = None;
    app.mode = Mode::Navigate;
}

/// OK button. Blank text or a failed save keeps the dialog open with a
/// notification.
fn confirm_input(app: &mut App) {
    let Some(state) = app.input.clone() else {
        close_input(app);
        return;
    };
    if is_blank(&state.buffer) {
        app.notify_error("Task cannot be empty");
        return;
    }

    let text = state.buffer;
    let result = match state.target {
        InputTarget::Add => app.mutate(|s| s.add(&text)),
        InputTarget::Edit(id) => app.mutate(|s| s.edit(id, &text)),
    };
    if let Some(id) = result {
        app.select_task(id);
        close_input(app);
    }
}

// ---------------------------------------------------------------------------
// Task options dialog
// ---------------------------------------------------------------------------

pub(super) fn handle_options(app: &mut App, key: KeyEvent) {
    let Some(selected) = app.options.as_ref().map(|o| o.selected) else {
        app.mode = Mode::Navigate;
        return;
    };
    let count = TaskAction::ALL.len();

    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => close_options(app),
        (_, KeyCode::Left) | (KeyModifiers::NONE, KeyCode::Char('h')) | (_, KeyCode::BackTab) => {
            set_option(app, (selected + count - 1) % count);
        }
        (_, KeyCode::Right) | (KeyModifiers::NONE, KeyCode::Char('l')) | (_, KeyCode::Tab) => {
            set_option(app, (selected + 1) % count);
        }
        (_, KeyCode::Enter) => run_option(app, TaskAction::ALL[selected]),
        (KeyModifiers::NONE, KeyCode::Char('d')) => run_option(app, TaskAction::Delete),
        (KeyModifiers::NONE, KeyCode::Char('e')) => run_option(app, TaskAction::Edit),
        (KeyModifiers::NONE, KeyCode::Char('c')) => run_option(app, TaskAction::ToggleCompleted),
        _ => {}
    }
}

fn set_option(app: &mut App, selected: usize) {
    if let Some(options) = &mut app.options {
        options.selected = selected;
    }
}

fn close_options(app: &mut App) {
    app.options = None;
    app.mode = Mode::Navigate;
}

fn run_option(app: &mut App, action: TaskAction) {
    let Some(task_id) = app.options.as_ref().map(|o| o.task_id) else {
        return;
    };
    close_options(app);
    app.select_task(task_id);
    match action {
        TaskAction::Delete => delete_cursor_task(app),
        TaskAction::Edit => open_edit_dialog(app),
        TaskAction::ToggleCompleted => toggle_cursor_task(app),
    }
}

// ---------------------------------------------------------------------------
// Exit confirmation
// ---------------------------------------------------------------------------

pub(super) fn handle_confirm_exit(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('y')) => app.should_quit = true,
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => {
            app.mode = Mode::Navigate;
        }
        (_, KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab)
        | (KeyModifiers::NONE, KeyCode::Char('h' | 'l')) => {
            app.exit_selected = (app.exit_selected + 1) % EXIT_BUTTONS.len();
        }
        (_, KeyCode::Enter) => {
            if EXIT_BUTTONS[app.exit_selected] == "EXIT" {
                app.should_quit = true;
            } else {
                app.mode = Mode::Navigate;
            }
        }
        _ => {}
    }
}
