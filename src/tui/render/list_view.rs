use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode;

use super::push_highlighted_spans;

/// Render the task list. Completed tasks are struck through and dimmed;
/// the stored text is never changed for display.
pub fn render_list_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;

    if app.store.is_empty() {
        let empty = Paragraph::new(" No tasks yet. Press a to add one.")
            .style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let search_re = app.active_search_re();
    let match_style = Style::default()
        .fg(app.theme.search_match_fg)
        .bg(app.theme.search_match_bg);
    let width = area.width as usize;
    let visible_height = area.height as usize;

    let mut lines: Vec<Line> = Vec::new();
    for (i, task) in app
        .store
        .tasks()
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(visible_height)
    {
        let is_cursor = i == app.cursor;
        let row_bg = if is_cursor { app.theme.selection_bg } else { bg };

        let mut spans: Vec<Span> = Vec::new();
        spans.push(Span::styled(
            if is_cursor { "\u{258E}" } else { " " },
            Style::default().fg(app.theme.highlight).bg(row_bg),
        ));

        let (check, check_color) = if task.completed {
            ("[x] ", app.theme.green)
        } else {
            ("[ ] ", app.theme.text)
        };
        spans.push(Span::styled(check, Style::default().fg(check_color).bg(row_bg)));

        let mut text_style = Style::default()
            .fg(app.theme.task_color(task.completed))
            .bg(row_bg);
        if task.completed {
            text_style = text_style.add_modifier(Modifier::CROSSED_OUT);
        }
        if is_cursor {
            text_style = text_style.add_modifier(Modifier::BOLD);
        }

        let prefix_width: usize = spans.iter().map(|s| unicode::display_width(&s.content)).sum();
        let text = unicode::truncate_to_width(&task.text, width.saturating_sub(prefix_width + 1));
        push_highlighted_spans(
            &mut spans,
            &text,
            text_style,
            match_style,
            search_re.as_ref(),
        );

        // Pad cursor line so the selection spans the full width
        if is_cursor {
            let content_width: usize =
                spans.iter().map(|s| unicode::display_width(&s.content)).sum();
            if content_width < width {
                spans.push(Span::styled(
                    " ".repeat(width - content_width),
                    Style::default().bg(row_bg),
                ));
            }
        }

        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
