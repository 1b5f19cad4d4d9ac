use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_segmentation::UnicodeSegmentation;

use crate::tui::app::{App, EXIT_BUTTONS, TaskAction};
use crate::tui::theme::Theme;
use crate::util::unicode;

use super::centered_rect_fixed;

const DIALOG_WIDTH: u16 = 56;

/// Add / Edit dialog: a single-line text field with OK and CANCEL keys
pub fn render_input_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let Some(input) = &app.input else {
        return;
    };
    let theme = &app.theme;
    let bg = theme.background;

    let popup = centered_rect_fixed(DIALOG_WIDTH, 6, area);
    let inner_w = popup.width.saturating_sub(4) as usize;

    // Keep the cursor visible by dropping text off the left edge
    let before = tail_to_width(&input.buffer[..input.cursor], inner_w.saturating_sub(1));
    let after = unicode::truncate_to_width(
        &input.buffer[input.cursor..],
        inner_w.saturating_sub(unicode::display_width(&before) + 1),
    );

    let text_style = Style::default().fg(theme.text_bright).bg(bg);
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(" ", text_style),
            Span::styled(before, text_style),
            Span::styled("\u{258C}", Style::default().fg(theme.highlight).bg(bg)),
            Span::styled(after, text_style),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Enter", Style::default().fg(theme.dim).bg(bg)),
            Span::styled(" OK   ", Style::default().fg(theme.text).bg(bg)),
            Span::styled("Esc", Style::default().fg(theme.dim).bg(bg)),
            Span::styled(" CANCEL", Style::default().fg(theme.text).bg(bg)),
        ]),
    ];

    render_popup(frame, theme, popup, input.title(), lines);
}

/// Per-task options: DELETE, EDIT, MARK COMPLETED
pub fn render_options_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let Some(options) = &app.options else {
        return;
    };
    let Some(task) = app.store.get(options.task_id) else {
        return;
    };
    let theme = &app.theme;
    let bg = theme.background;

    let popup = centered_rect_fixed(DIALOG_WIDTH, 6, area);
    let inner_w = popup.width.saturating_sub(4) as usize;

    let labels: Vec<&str> = TaskAction::ALL
        .iter()
        .map(|action| action.label(task.completed))
        .collect();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(" {}", unicode::truncate_to_width(&task.text, inner_w)),
            Style::default().fg(theme.task_color(task.completed)).bg(bg),
        )),
        Line::from(""),
        button_row(theme, &labels, options.selected),
    ];

    render_popup(frame, theme, popup, "Task", lines);
}

/// Exit confirmation: CANCEL or EXIT
pub fn render_exit_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let popup = centered_rect_fixed(40, 6, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Are you sure you want to exit?",
            Style::default().fg(theme.text_bright).bg(bg),
        )),
        Line::from(""),
        button_row(theme, &EXIT_BUTTONS, app.exit_selected),
    ];

    render_popup(frame, theme, popup, "Exit", lines);
}

fn button_row<'a>(theme: &Theme, labels: &[&'a str], selected: usize) -> Line<'a> {
    let mut spans = vec![Span::styled(" ", Style::default().bg(theme.background))];
    for (i, label) in labels.iter().enumerate() {
        let style = if i == selected {
            Style::default()
                .fg(theme.background)
                .bg(theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text).bg(theme.background)
        };
        spans.push(Span::styled(format!(" {} ", label), style));
        spans.push(Span::styled(" ", Style::default().bg(theme.background)));
    }
    Line::from(spans)
}

fn render_popup(frame: &mut Frame, theme: &Theme, popup: Rect, title: &str, lines: Vec<Line>) {
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(theme.highlight)
                .bg(theme.background)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(theme.highlight).bg(theme.background))
        .style(Style::default().bg(theme.background));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(theme.background));
    frame.render_widget(paragraph, popup);
}

/// The longest suffix of `s` that fits in `max_cells`
fn tail_to_width(s: &str, max_cells: usize) -> String {
    let mut width = 0;
    let mut start = s.len();
    for (i, g) in s.grapheme_indices(true).rev() {
        let gw = unicode::display_width(g);
        if width + gw > max_cells {
            break;
        }
        width += gw;
        start = i;
    }
    s[start..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::{InputState, InputTarget, Mode, OptionsState};
    use crate::tui::render::test_helpers::*;

    #[test]
    fn add_dialog_shows_title_and_text() {
        let (_tmp, mut app) = app_with_tasks(&[]);
        app.mode = Mode::Input;
        app.input = Some(InputState::new(InputTarget::Add, "Buy milk"));

        let output = render_app(&mut app);
        assert!(output.contains(" Add Task "));
        assert!(output.contains("Buy milk\u{258C}"));
        assert!(output.contains("OK"));
        assert!(output.contains("CANCEL"));
    }

    #[test]
    fn edit_dialog_title() {
        let (_tmp, mut app) = app_with_tasks(&[("Buy milk", false)]);
        let id = app.store.tasks()[0].id;
        app.mode = Mode::Input;
        app.input = Some(InputState::new(InputTarget::Edit(id), "Buy milk"));
        assert!(render_app(&mut app).contains(" Edit Task "));
    }

    #[test]
    fn options_dialog_labels_follow_completion() {
        let (_tmp, mut app) = app_with_tasks(&[("Buy milk", false), ("Call mom", true)]);
        app.mode = Mode::Options;
        app.options = Some(OptionsState {
            task_id: app.store.tasks()[0].id,
            selected: 0,
        });
        let output = render_app(&mut app);
        assert!(output.contains(" DELETE "));
        assert!(output.contains(" EDIT "));
        assert!(output.contains(" MARK COMPLETED "));

        app.options = Some(OptionsState {
            task_id: app.store.tasks()[1].id,
            selected: 0,
        });
        assert!(render_app(&mut app).contains(" MARK PENDING "));
    }

    #[test]
    fn exit_dialog_buttons() {
        let (_tmp, mut app) = app_with_tasks(&[]);
        app.mode = Mode::ConfirmExit;
        let output = render_app(&mut app);
        assert!(output.contains("Are you sure you want to exit?"));
        assert!(output.contains(" CANCEL "));
        assert!(output.contains(" EXIT "));
    }

    #[test]
    fn tail_keeps_end_of_text() {
        assert_eq!(tail_to_width("hello world", 5), "world");
        assert_eq!(tail_to_width("short", 10), "short");
        assert_eq!(tail_to_width("abc", 0), "");
    }
}
