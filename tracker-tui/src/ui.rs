//! UI rendering module.
//!
//! Draws the `ViewState` built by the app: summary stats, project cards,
//! the duration chart with its pagination bar, and the overlays (form,
//! confirmation, help, notifications). Nothing here mutates state.

use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, FormField, FormState, NotificationKind};
use crate::chart::DurationChart;
use crate::models::DATE_FORMAT;
use crate::theme::{badge_style, colors, styles};
use crate::view::{CardView, PaginationControls};

/// Width of the label column in form rows
const LABEL_WIDTH: u16 = 14;

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Fill background with theme color
    let bg_block = Block::default().style(Style::default().bg(colors::BG_DARK));
    frame.render_widget(bg_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Stats
            Constraint::Min(10),   // Cards + chart
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_stats(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Overlays
    if app.form_state.is_some() {
        render_form_modal(frame, app, area);
    }

    if app.confirm_dialog.is_some() {
        render_confirm_dialog(frame, app, area);
    }

    if app.show_help {
        render_help_overlay(frame, area);
    }

    render_notifications(frame, app, area);
}

/// Render the four summary counters
fn render_stats(frame: &mut Frame, app: &App, area: Rect) {
    let stats = &app.view.stats;
    let items = [
        ("Total Projects", stats.total.to_string(), colors::BLUE),
        ("In Progress", stats.in_progress.to_string(), colors::YELLOW),
        ("Completed", stats.completed.to_string(), colors::GREEN),
        (
            "Avg Duration",
            format!("{} days", stats.average_duration_days),
            colors::PURPLE,
        ),
    ];

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((label, value, color), chunk) in items.into_iter().zip(chunks.iter()) {
        let line = Line::from(vec![
            Span::styled(format!("{}: ", label), styles::text_dim()),
            Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ]);
        let widget = Paragraph::new(line).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::border_dim())
                .style(Style::default().bg(colors::BG_DARK)),
        );
        frame.render_widget(widget, *chunk);
    }
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_cards(frame, app, chunks[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(chunks[1]);

    if let Some(series) = app.view.chart.series() {
        frame.render_widget(DurationChart::new(series), right[0]);
    }
    render_pagination(frame, &app.view.pagination, right[1]);
}

/// Rows a card needs, borders included
fn card_height(card: &CardView, actions_open: bool) -> u16 {
    let tasks = u16::try_from(card.tasks.len().max(1)).unwrap_or(u16::MAX);
    // title + dates + "Tasks:" header + task lines + borders
    tasks
        .saturating_add(5)
        .saturating_add(u16::from(actions_open))
}

/// First card to draw so that `selected` is fully visible
fn first_visible(heights: &[u16], selected: usize, available: u16) -> usize {
    if heights.is_empty() {
        return 0;
    }
    let mut used = 0u16;
    let mut first = selected.min(heights.len() - 1);
    for index in (0..=first).rev() {
        used = used.saturating_add(heights[index]);
        if used > available {
            break;
        }
        first = index;
    }
    first
}

/// Render the card list, or the empty state
fn render_cards(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Projects ")
        .title_style(styles::title_accent())
        .borders(Borders::ALL)
        .border_style(styles::border())
        .style(Style::default().bg(colors::BG_DARK));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cards = app.view.cards.cards();
    if app.view.cards.is_empty() {
        render_empty_state(frame, inner, "No projects yet. Press 'a' to add one.");
        return;
    }

    let heights: Vec<u16> = cards
        .iter()
        .map(|c| card_height(c, app.view.actions_open_for(c.id)))
        .collect();
    let first = first_visible(&heights, app.selected, inner.height);

    let bottom = inner.y + inner.height;
    let mut y = inner.y;
    for (index, card) in cards.iter().enumerate().skip(first) {
        // Cards taller than the space left are clipped, not skipped
        let height = heights[index].min(bottom - y);
        if height == 0 {
            break;
        }
        let card_area = Rect::new(inner.x, y, inner.width, height);
        render_card(
            frame,
            card,
            index == app.selected,
            app.view.actions_open_for(card.id),
            card_area,
        );
        y += height;
    }
}

fn render_card(frame: &mut Frame, card: &CardView, selected: bool, actions_open: bool, area: Rect) {
    let title_style = if selected {
        styles::selected()
    } else {
        styles::title()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if selected {
            styles::border_focused()
        } else {
            styles::border_dim()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!(" {} ", card.name), title_style),
            Span::raw(" "),
            Span::styled(format!(" {} ", card.status), badge_style(card.badge)),
        ]),
        Line::from(vec![
            Span::styled(card.date_range.clone(), styles::text_dim()),
            Span::styled(format!("  ({} days)", card.duration_days), styles::text_hint()),
        ]),
        Line::from(Span::styled("Tasks:", styles::form_label())),
    ];

    if card.tasks.is_empty() {
        lines.push(Line::from(Span::styled("  (none)", styles::text_hint())));
    }
    for task in &card.tasks {
        lines.push(Line::from(vec![
            Span::styled("  • ", styles::text_hint()),
            Span::styled(task.clone(), styles::text()),
        ]));
    }

    if actions_open {
        lines.push(Line::from(vec![
            Span::styled(" [e] Edit ", styles::button_focused()),
            Span::raw(" "),
            Span::styled(" [d] Delete ", styles::button_danger()),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render Previous / page numbers / Next under the chart
fn render_pagination(frame: &mut Frame, controls: &PaginationControls, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_dim())
        .style(Style::default().bg(colors::BG_DARK));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if !controls.visible {
        return;
    }

    let enabled = |on: bool| if on { styles::info() } else { styles::text_hint() };

    let mut spans = vec![Span::styled("◀ Previous ", enabled(controls.prev_enabled))];
    for button in &controls.pages {
        let style = if button.active {
            styles::button_focused()
        } else {
            styles::button()
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {} ", button.number), style));
    }
    spans.push(Span::raw(" "));
    spans.push(Span::styled(" Next ▶", enabled(controls.next_enabled)));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        inner,
    );
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = Paragraph::new(app.status_text())
        .style(styles::text_dim().bg(colors::BG_MEDIUM));
    frame.render_widget(status, area);
}

/// Render empty state message
fn render_empty_state(frame: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(message)
        .style(styles::text_dim())
        .alignment(Alignment::Center);

    let y = area.y + area.height / 2;
    frame.render_widget(paragraph, Rect::new(area.x, y, area.width, 1));
}

/// Toasts stacked in the top-right corner
fn render_notifications(frame: &mut Frame, app: &App, area: Rect) {
    let width = 44.min(area.width);
    let mut y = area.y + 1;
    for notification in app.notifications.iter().rev() {
        if y + 3 > area.y + area.height {
            break;
        }
        let toast_area = Rect::new(area.x + area.width - width, y, width, 3);
        let color = match notification.kind {
            NotificationKind::Success => colors::GREEN,
            NotificationKind::Error => colors::RED,
        };

        frame.render_widget(Clear, toast_area);
        let toast = Paragraph::new(notification.message.as_str())
            .style(styles::text())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .style(Style::default().bg(colors::BG_MEDIUM)),
            );
        frame.render_widget(toast, toast_area);
        y += 3;
    }
}

/// Render the add-project form
fn render_form_modal(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = &app.form_state else {
        return;
    };

    // 4 fields + task rows at 3 rows each, add-task + spacer + buttons + error,
    // margin and borders
    let rows = 4 + form.tasks.len() as u16;
    let popup_height = rows * 3 + 4 + 4;
    let popup_area = centered_rect(64, popup_height, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" New Project ")
        .title_style(styles::title())
        .borders(Borders::ALL)
        .border_style(styles::border_focused())
        .style(Style::default().bg(colors::BG_MEDIUM));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    render_project_form(frame, form, inner);

    if let Some(ref error) = form.error {
        let error_area = Rect::new(inner.x, inner.y + inner.height.saturating_sub(1), inner.width, 1);
        let error_text = Paragraph::new(error.as_str())
            .style(styles::error())
            .alignment(Alignment::Center);
        frame.render_widget(error_text, error_area);
    }

    let focused = form.current_field();
    if focused.is_date_picker() {
        let date_str = match focused {
            FormField::StartDate => form.start_date.as_str(),
            FormField::EndDate => form.end_date.as_str(),
            FormField::TaskDate(i) => form.tasks.get(i).map(|t| t.date.as_str()).unwrap_or(""),
            _ => return,
        };
        render_mini_calendar(frame, date_str, area, popup_area);
    }
}

fn render_project_form(frame: &mut Frame, form: &FormState, area: Rect) {
    let focused = form.current_field();

    let mut constraints = vec![Constraint::Length(3); 4 + form.tasks.len()];
    constraints.extend([
        Constraint::Length(1), // Add task
        Constraint::Length(1), // Spacer
        Constraint::Length(1), // Buttons
        Constraint::Min(0),
    ]);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(area);

    render_text_field(
        frame,
        &field_label(FormField::Name),
        &form.name,
        focused == FormField::Name,
        chunks[0],
    );
    render_selector_field(
        frame,
        &field_label(FormField::Status),
        form.status.label(),
        focused == FormField::Status,
        chunks[1],
    );
    render_date_picker_field(
        frame,
        &field_label(FormField::StartDate),
        &form.start_date,
        focused == FormField::StartDate,
        chunks[2],
    );
    render_date_picker_field(
        frame,
        &field_label(FormField::EndDate),
        &form.end_date,
        focused == FormField::EndDate,
        chunks[3],
    );

    for (i, task) in form.tasks.iter().enumerate() {
        let row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(22)])
            .split(chunks[4 + i]);
        let label = field_label(FormField::TaskLabel(i));
        render_text_field(frame, &label, &task.label, focused == FormField::TaskLabel(i), row[0]);
        render_date_input(frame, &task.date, focused == FormField::TaskDate(i), row[1]);
    }

    let base = 4 + form.tasks.len();
    let add_style = if focused == FormField::AddTaskButton {
        styles::button_focused()
    } else {
        styles::button()
    };
    frame.render_widget(
        Paragraph::new(format!(" [ + {} ] ", FormField::AddTaskButton.label())).style(add_style).alignment(Alignment::Center),
        chunks[base],
    );

    render_form_buttons(
        frame,
        focused == FormField::SubmitButton,
        focused == FormField::CancelButton,
        chunks[base + 2],
    );
}

/// Label column text; task rows are numbered from 1
fn field_label(field: FormField) -> String {
    match field.task_row() {
        Some(row) => format!("{} {}:", field.label(), row + 1),
        None => format!("{}:", field.label()),
    }
}

fn input_block(is_focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            styles::border_focused()
        } else {
            styles::border_dim()
        })
}

fn input_style(is_focused: bool) -> Style {
    if is_focused {
        styles::form_input_focused()
    } else {
        styles::form_input()
    }
}

/// Label column on the left, returns the input area
fn render_label(frame: &mut Frame, label: &str, area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(LABEL_WIDTH), Constraint::Min(10)])
        .split(area);

    let label_text = Paragraph::new(label)
        .style(styles::form_label())
        .alignment(Alignment::Right);
    frame.render_widget(label_text, chunks[0]);
    chunks[1]
}

/// Render a text input field
fn render_text_field(frame: &mut Frame, label: &str, value: &str, is_focused: bool, area: Rect) {
    let input_area = render_label(frame, label, area);
    let cursor = if is_focused { "█" } else { "" };
    let input = Paragraph::new(format!(" {}{}", value, cursor))
        .style(input_style(is_focused))
        .block(input_block(is_focused));
    frame.render_widget(input, input_area);
}

/// Render a date picker field with navigation hints
fn render_date_picker_field(frame: &mut Frame, label: &str, value: &str, is_focused: bool, area: Rect) {
    let input_area = render_label(frame, label, area);
    let hint = if is_focused { "  ◀-7 ▲+1 ▼-1 +7▶" } else { "" };
    let input = Paragraph::new(format!(" {}{}", value, hint))
        .style(input_style(is_focused))
        .block(input_block(is_focused));
    frame.render_widget(input, input_area);
}

/// Bare date input used in task rows
fn render_date_input(frame: &mut Frame, value: &str, is_focused: bool, area: Rect) {
    let input = Paragraph::new(format!(" {}", value))
        .style(input_style(is_focused))
        .block(input_block(is_focused));
    frame.render_widget(input, area);
}

/// Render a selector/dropdown field
fn render_selector_field(frame: &mut Frame, label: &str, value: &str, is_focused: bool, area: Rect) {
    let input_area = render_label(frame, label, area);
    let arrows = if is_focused { " ▲▼" } else { " ▼" };
    let input = Paragraph::new(format!(" {}{}", value, arrows))
        .style(input_style(is_focused))
        .block(input_block(is_focused));
    frame.render_widget(input, input_area);
}

/// Render form buttons
fn render_form_buttons(frame: &mut Frame, save_focused: bool, cancel_focused: bool, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(12),
            Constraint::Length(2),
            Constraint::Length(12),
            Constraint::Percentage(30),
        ])
        .split(area);

    let save_style = if save_focused {
        styles::button_focused()
    } else {
        styles::button()
    };
    let save_btn = Paragraph::new(format!("  [ {} ]  ", FormField::SubmitButton.label()))
        .style(save_style)
        .alignment(Alignment::Center);
    frame.render_widget(save_btn, chunks[1]);

    let cancel_style = if cancel_focused {
        styles::button_danger()
    } else {
        styles::button()
    };
    let cancel_btn = Paragraph::new(format!(" [ {} ] ", FormField::CancelButton.label()))
        .style(cancel_style)
        .alignment(Alignment::Center);
    frame.render_widget(cancel_btn, chunks[3]);
}

/// Render confirmation dialog
fn render_confirm_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let Some(dialog) = &app.confirm_dialog else {
        return;
    };

    let popup_area = centered_rect(45, 10, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" {} ", dialog.title))
        .title_style(Style::default().fg(colors::RED).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::RED))
        .style(Style::default().bg(colors::BG_MEDIUM));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Message
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Buttons
        ])
        .margin(1)
        .split(inner);

    let message = Paragraph::new(dialog.message.as_str())
        .style(styles::text())
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);
    frame.render_widget(message, chunks[0]);

    let button_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(10),
            Constraint::Percentage(10),
            Constraint::Length(10),
            Constraint::Percentage(25),
        ])
        .split(chunks[2]);

    let no_style = if !dialog.yes_focused {
        styles::button_focused()
    } else {
        styles::button()
    };
    let no_btn = Paragraph::new("  [ No ]  ")
        .style(no_style)
        .alignment(Alignment::Center);
    frame.render_widget(no_btn, button_chunks[1]);

    let yes_style = if dialog.yes_focused {
        styles::button_danger()
    } else {
        styles::button()
    };
    let yes_btn = Paragraph::new(" [ Yes ]  ")
        .style(yes_style)
        .alignment(Alignment::Center);
    frame.render_widget(yes_btn, button_chunks[3]);
}

fn help_line(keys: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<16}", keys), Style::default().fg(colors::BLUE)),
        Span::raw(action),
    ])
}

fn help_section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default().fg(colors::PURPLE).add_modifier(Modifier::BOLD),
    ))
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 27, area);
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().fg(colors::BLUE).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        help_section("Projects"),
        help_line("j/k or Up/Down", "Select card"),
        help_line("Enter / m", "Open or close card actions"),
        help_line("e", "Edit (actions open)"),
        help_line("d / Delete", "Delete (actions open)"),
        help_line("a / n", "Add project"),
        Line::from(""),
        help_section("Chart"),
        help_line("h/l or [ ]", "Previous / next page"),
        help_line("1-9", "Jump to page"),
        Line::from(""),
        help_section("Form Editing"),
        help_line("Tab/Shift+Tab", "Move between fields"),
        help_line("Up/Down", "Change status / date (+/-1 day)"),
        help_line("Left/Right", "Date: +/-7 days"),
        help_line("Delete", "Remove focused task row"),
        help_line("Enter", "Next field / press button"),
        help_line("Esc", "Close form"),
        Line::from(""),
        help_section("General"),
        help_line("?", "Toggle help"),
        help_line("q/Ctrl+C", "Quit"),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .title_style(styles::title())
                .borders(Borders::ALL)
                .border_style(styles::border())
                .style(Style::default().bg(colors::BG_MEDIUM)),
        )
        .style(styles::text());

    frame.render_widget(paragraph, popup_area);
}

/// Helper to create a centered rectangle
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.and_then(|d| d.pred_opt()).map(|d| d.day()).unwrap_or(31)
}

/// Render a mini calendar popup next to the form
fn render_mini_calendar(frame: &mut Frame, date_str: &str, screen_area: Rect, form_area: Rect) {
    let date = NaiveDate::parse_from_str(date_str, DATE_FORMAT)
        .unwrap_or_else(|_| chrono::Local::now().date_naive());

    let cal_width = 24;
    let cal_height = 10;

    // Right of the form if there is room, otherwise left, otherwise centered
    let cal_x = if form_area.x + form_area.width + cal_width + 2 < screen_area.width {
        form_area.x + form_area.width + 1
    } else if form_area.x >= cal_width + 2 {
        form_area.x - cal_width - 1
    } else {
        (screen_area.width.saturating_sub(cal_width)) / 2
    };

    let cal_y = form_area.y + 2;
    let cal_area = Rect::new(
        cal_x,
        cal_y.min(screen_area.height.saturating_sub(cal_height)),
        cal_width.min(screen_area.width),
        cal_height.min(screen_area.height),
    );

    frame.render_widget(Clear, cal_area);

    let header = date.format("%B %Y").to_string();
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{:^22}", header),
            Style::default().fg(colors::BLUE).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(" Mo Tu We Th Fr ", styles::text_dim()),
            Span::styled("Sa ", Style::default().fg(colors::BLUE)),
            Span::styled("Su", Style::default().fg(colors::RED)),
        ]),
    ];

    let first_weekday = date
        .with_day(1)
        .map(|d| d.weekday().num_days_from_monday() as usize)
        .unwrap_or(0);
    let last_day = days_in_month(date.year(), date.month());
    let today = chrono::Local::now().date_naive();
    let today_day = (today.year() == date.year() && today.month() == date.month()).then(|| today.day());

    let mut day = 1u32;
    for week in 0..6 {
        if day > last_day {
            break;
        }
        let mut spans = vec![Span::raw(" ")];
        for weekday in 0..7 {
            if (week == 0 && weekday < first_weekday) || day > last_day {
                spans.push(Span::raw("   "));
                continue;
            }
            let style = if day == date.day() {
                Style::default()
                    .fg(colors::BG_DARK)
                    .bg(colors::BLUE)
                    .add_modifier(Modifier::BOLD)
            } else if today_day == Some(day) {
                Style::default().fg(colors::YELLOW).add_modifier(Modifier::BOLD)
            } else if weekday == 5 {
                Style::default().fg(colors::BLUE)
            } else if weekday == 6 {
                Style::default().fg(colors::RED)
            } else {
                styles::text()
            };
            spans.push(Span::styled(format!("{:2} ", day), style));
            day += 1;
        }
        lines.push(Line::from(spans));
    }

    let calendar = Paragraph::new(lines).block(
        Block::default()
            .title(" Calendar ")
            .title_style(styles::title())
            .borders(Borders::ALL)
            .border_style(styles::border_focused())
            .style(Style::default().bg(colors::BG_MEDIUM)),
    );

    frame.render_widget(calendar, cal_area);
}
