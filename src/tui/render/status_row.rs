use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans: Vec<Span> = Vec::new();
    let hint = match app.mode {
        Mode::Search => {
            // Search prompt: /pattern▌
            spans.push(Span::styled(
                format!("/{}", app.search_input),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ));
            spans.push(Span::styled(
                "\u{258C}",
                Style::default().fg(app.theme.highlight).bg(bg),
            ));
            "Enter search  Esc cancel"
        }
        Mode::Input => "Enter OK  Esc cancel",
        Mode::Options => "\u{2190}\u{2192} choose  Enter select  Esc close",
        Mode::ConfirmExit => "y exit  n cancel",
        Mode::Navigate => {
            if let Some(pattern) = &app.last_search {
                spans.push(Span::styled(
                    format!("/{}", pattern),
                    Style::default().fg(app.theme.dim).bg(bg),
                ));
                "n/N next/prev  Esc clear"
            } else {
                "a add  Enter options  ? help"
            }
        }
    };

    // A notification replaces the left side until it expires
    if let Some(n) = &app.notification
        && app.mode != Mode::Search
    {
        spans.clear();
        let color = if n.is_error {
            app.theme.red
        } else {
            app.theme.green
        };
        spans.push(Span::styled(
            n.text.clone(),
            Style::default().fg(color).bg(bg),
        ));
    }

    let content_width: usize = spans.iter().map(|s| unicode::display_width(&s.content)).sum();
    let hint_width = unicode::display_width(hint);
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn status(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, app, area);
        })
    }

    #[test]
    fn navigate_shows_key_hints() {
        let (_tmp, app) = app_with_tasks(&[]);
        assert!(status(&app).ends_with("a add  Enter options  ? help"));
    }

    #[test]
    fn search_prompt_shows_query() {
        let (_tmp, mut app) = app_with_tasks(&[]);
        app.mode = Mode::Search;
        app.search_input = "milk".into();
        assert!(status(&app).starts_with("/milk\u{258C}"));
    }

    #[test]
    fn error_notification_replaces_left_side() {
        let (_tmp, mut app) = app_with_tasks(&[]);
        app.mode = Mode::Input;
        app.notify_error("Task cannot be empty");
        let out = status(&app);
        assert!(out.starts_with("Task cannot be empty"));
        assert!(out.ends_with("Enter OK  Esc cancel"));
    }

    #[test]
    fn active_search_is_shown_dimmed() {
        let (_tmp, mut app) = app_with_tasks(&[]);
        app.last_search = Some("milk".into());
        let out = status(&app);
        assert!(out.starts_with("/milk"));
        assert!(out.contains("n/N next/prev"));
    }
}
