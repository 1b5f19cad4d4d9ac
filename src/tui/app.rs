use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;

use crate::io::config_io::Workspace;
use crate::io::lock::FileLock;
use crate::io::store_io::StoreError;
use crate::model::Config;
use crate::model::task::{Task, TaskId};
use crate::ops::TaskStore;
use crate::ops::search;

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Search,
    /// Add / Edit text dialog
    Input,
    /// Per-task options dialog
    Options,
    /// Exit confirmation dialog
    ConfirmExit,
}

/// What the input dialog's OK button does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    Add,
    Edit(TaskId),
}

/// State of the Add / Edit dialog
#[derive(Debug, Clone)]
pub struct InputState {
    pub target: InputTarget,
    pub buffer: String,
    /// Byte offset into `buffer`, always on a grapheme boundary
    pub cursor: usize,
}

impl InputState {
    pub fn new(target: InputTarget, text: &str) -> Self {
        InputState {
            target,
            buffer: text.to_string(),
            cursor: text.len(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.target {
            InputTarget::Add => "Add Task",
            InputTarget::Edit(_) => "Edit Task",
        }
    }
}

/// Buttons of the task options dialog, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    Delete,
    Edit,
    ToggleCompleted,
}

impl TaskAction {
    pub const ALL: [TaskAction; 3] = [TaskAction::Delete, TaskAction::Edit, TaskAction::ToggleCompleted];

    pub fn label(self, completed: bool) -> &'static str {
        match self {
            TaskAction::Delete => "DELETE",
            TaskAction::Edit => "EDIT",
            TaskAction::ToggleCompleted if completed => "MARK PENDING",
            TaskAction::ToggleCompleted => "MARK COMPLETED",
        }
    }
}

/// State of the task options dialog
#[derive(Debug, Clone)]
pub struct OptionsState {
    pub task_id: TaskId,
    /// Index into [`TaskAction::ALL`]
    pub selected: usize,
}

/// Buttons of the exit dialog
pub const EXIT_BUTTONS: [&str; 2] = ["CANCEL", "EXIT"];

/// A transient message in the status row
#[derive(Debug, Clone)]
pub struct Notification {
    pub text: String,
    pub is_error: bool,
    pub shown_at: Instant,
}

/// Main application state
pub struct App {
    pub store: TaskStore,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Index into the store's task list
    pub cursor: usize,
    /// First visible row of the list
    pub scroll_offset: usize,
    pub input: Option<InputState>,
    pub options: Option<OptionsState>,
    /// Selected button of the exit dialog
    pub exit_selected: usize,
    pub notification: Option<Notification>,
    pub notification_ttl: Duration,
    pub confirm_exit: bool,
    pub show_help: bool,
    /// Search mode: current query being typed
    pub search_input: String,
    /// Last executed search pattern
    pub last_search: Option<String>,
}

impl App {
    pub fn new(store: TaskStore, config: &Config) -> Self {
        App {
            store,
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::from_config(&config.ui),
            cursor: 0,
            scroll_offset: 0,
            input: None,
            options: None,
            exit_selected: 0,
            notification: None,
            notification_ttl: Duration::from_secs(config.ui.notification_secs),
            confirm_exit: config.ui.confirm_exit,
            show_help: false,
            search_input: String::new(),
            last_search: None,
        }
    }

    /// Task under the cursor
    pub fn cursor_task(&self) -> Option<&Task> {
        self.store.tasks().get(self.cursor)
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.store.len();
        self.cursor = if len == 0 { 0 } else { self.cursor.min(len - 1) };
    }

    /// Put the cursor on a task, if it exists
    pub fn select_task(&mut self, id: TaskId) {
        if let Some(index) = self.store.position(id) {
            self.cursor = index;
        }
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    pub fn notify(&mut self, text: impl Into<String>) {
        self.notification = Some(Notification {
            text: text.into(),
            is_error: false,
            shown_at: Instant::now(),
        });
    }

    pub fn notify_error(&mut self, text: impl Into<String>) {
        self.notification = Some(Notification {
            text: text.into(),
            is_error: true,
            shown_at: Instant::now(),
        });
    }

    /// Drop the notification once it has been visible for the configured time
    pub fn expire_notification(&mut self, now: Instant) {
        if self
            .notification
            .as_ref()
            .is_some_and(|n| now.duration_since(n.shown_at) >= self.notification_ttl)
        {
            self.notification = None;
        }
    }

    // -----------------------------------------------------------------------
    // Store access
    // -----------------------------------------------------------------------

    /// Run a store mutation under the write lock. The store is re-read first
    /// so writes from other processes are kept. Errors become an error
    /// notification and `None`.
    pub fn mutate<T>(
        &mut self,
        f: impl FnOnce(&mut TaskStore) -> Result<T, StoreError>,
    ) -> Option<T> {
        let dir = self.store.data_dir();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            self.notify_error(format!("could not create {}: {}", dir.display(), e));
            return None;
        }
        let _lock = match FileLock::acquire(&dir, Duration::from_secs(1)) {
            Ok(lock) => lock,
            Err(e) => {
                self.notify_error(e.to_string());
                return None;
            }
        };
        let selected = self.cursor_task().map(|t| t.id);
        if let Err(e) = self.store.reload() {
            self.notify_error(e.to_string());
            return None;
        }
        match selected {
            Some(id) if self.store.position(id).is_some() => self.select_task(id),
            _ => self.clamp_cursor(),
        }

        match f(&mut self.store) {
            Ok(value) => Some(value),
            Err(e) => {
                self.notify_error(e.to_string());
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// Active search regex for highlighting.
    /// In Search mode: compiles from current input. Otherwise from last_search.
    pub fn active_search_re(&self) -> Option<Regex> {
        match self.mode {
            Mode::Search => search::compile_pattern(&self.search_input),
            _ => search::compile_pattern(self.last_search.as_deref()?),
        }
    }
}

/// Restore cursor and search from the state file
pub fn restore_ui_state(app: &mut App) {
    use crate::io::state::read_ui_state;

    let Some(ui_state) = read_ui_state(&app.store.data_dir()) else {
        return;
    };
    if let Some(id) = ui_state.cursor_task {
        app.select_task(id);
    }
    app.scroll_offset = ui_state.scroll_offset;
    app.last_search = ui_state.last_search;
}

/// Save cursor and search to the state file
pub fn save_ui_state(app: &App) {
    use crate::io::state::{UiState, write_ui_state};

    let ui_state = UiState {
        cursor_task: app.cursor_task().map(|t| t.id),
        scroll_offset: app.scroll_offset,
        last_search: app.last_search.clone(),
    };
    let _ = write_ui_state(&app.store.data_dir(), &ui_state);
}

/// Run the TUI application
pub fn run(ws: &Workspace) -> Result<(), Box<dyn std::error::Error>> {
    // A malformed task file aborts here, before the terminal is touched
    let store = TaskStore::load(&ws.data_file)?;
    let mut app = App::new(store, &ws.config);
    restore_ui_state(&mut app);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    if app.store.data_dir().is_dir() {
        save_ui_state(&app);
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.expire_notification(Instant::now());
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
