mod common;
mod dialog;
mod navigate;
mod search;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, Mode};

// Submodules reach each other's helpers through `use super::*;`
#[allow(unused_imports)]
use common::*;
#[allow(unused_imports)]
use dialog::*;
#[allow(unused_imports)]
use navigate::*;
#[allow(unused_imports)]
use search::*;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Help overlay swallows the next key
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Notifications last until they expire or the next key
    app.notification = None;

    let key = normalize_key(key);
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Input => handle_input(app, key),
        Mode::Options => handle_options(app, key),
        Mode::ConfirmExit => handle_confirm_exit(app, key),
    }
}
