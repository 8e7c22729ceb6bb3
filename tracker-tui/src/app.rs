//! Application state and event handling.
//!
//! Follows the Elm Architecture: key events are turned into typed
//! `Command`s by `handle_key`, and `update` is the single place where a
//! command touches the store. Pure UI state (form focus, dialogs, card
//! cursor) is handled directly in `handle_key`.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use uuid::Uuid;

use crate::commands;
use crate::models::{NewProject, NewTask, ProjectStatus, DATE_FORMAT};
use crate::store::Store;
use crate::view::ViewState;

/// How long a notification stays on screen
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Maximum notifications kept at once
const MAX_NOTIFICATIONS: usize = 5;

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Browsing cards
    #[default]
    Normal,
    /// Add-project form is open
    Editing,
    /// Delete confirmation is open
    Confirming,
}

/// Data-changing actions produced by input handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddProject(NewProject),
    DeleteProject(Uuid),
    EditProject(Uuid),
    ChangePage(usize),
    ToggleActions(Uuid),
    CloseActions,
}

/// Fields of the add-project form, in focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Status,
    StartDate,
    EndDate,
    TaskLabel(usize),
    TaskDate(usize),
    AddTaskButton,
    SubmitButton,
    CancelButton,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Status => "Status",
            FormField::StartDate => "Start Date",
            FormField::EndDate => "End Date",
            FormField::TaskLabel(_) => "Task",
            FormField::TaskDate(_) => "Date",
            FormField::AddTaskButton => "Add Task",
            FormField::SubmitButton => "Save",
            FormField::CancelButton => "Cancel",
        }
    }

    pub fn is_date_picker(&self) -> bool {
        matches!(
            self,
            FormField::StartDate | FormField::EndDate | FormField::TaskDate(_)
        )
    }

    /// Task row this field belongs to
    pub fn task_row(&self) -> Option<usize> {
        match self {
            FormField::TaskLabel(i) | FormField::TaskDate(i) => Some(*i),
            _ => None,
        }
    }
}

/// State of the add-project form
#[derive(Debug, Clone)]
pub struct FormState {
    pub focused_field: usize,
    pub error: Option<String>,
    pub name: String,
    pub status: ProjectStatus,
    pub start_date: String,
    pub end_date: String,
    pub tasks: Vec<NewTask>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new_at(chrono::Local::now().date_naive())
    }
}

impl FormState {
    /// Empty form starting on `today`, ending 30 days later, with one task row
    pub fn new_at(today: NaiveDate) -> Self {
        let start = today.format(DATE_FORMAT).to_string();
        let end = (today + chrono::Duration::days(30))
            .format(DATE_FORMAT)
            .to_string();
        Self {
            focused_field: 0,
            error: None,
            name: String::new(),
            status: ProjectStatus::InProgress,
            tasks: vec![NewTask {
                label: String::new(),
                date: start.clone(),
            }],
            start_date: start,
            end_date: end,
        }
    }

    /// Current field list; grows with the task rows
    pub fn fields(&self) -> Vec<FormField> {
        let mut fields = vec![
            FormField::Name,
            FormField::Status,
            FormField::StartDate,
            FormField::EndDate,
        ];
        for i in 0..self.tasks.len() {
            fields.push(FormField::TaskLabel(i));
            fields.push(FormField::TaskDate(i));
        }
        fields.extend([
            FormField::AddTaskButton,
            FormField::SubmitButton,
            FormField::CancelButton,
        ]);
        fields
    }

    pub fn current_field(&self) -> FormField {
        let fields = self.fields();
        fields[self.focused_field.min(fields.len() - 1)]
    }

    pub fn next_field(&mut self) {
        self.focused_field = (self.focused_field + 1) % self.fields().len();
    }

    pub fn prev_field(&mut self) {
        let len = self.fields().len();
        self.focused_field = self.focused_field.checked_sub(1).unwrap_or(len - 1);
    }

    fn focus(&mut self, field: FormField) {
        if let Some(pos) = self.fields().iter().position(|f| *f == field) {
            self.focused_field = pos;
        }
    }

    fn current_text_mut(&mut self) -> Option<&mut String> {
        match self.current_field() {
            FormField::Name => Some(&mut self.name),
            FormField::TaskLabel(i) => self.tasks.get_mut(i).map(|t| &mut t.label),
            _ => None,
        }
    }

    fn current_date_mut(&mut self) -> Option<&mut String> {
        match self.current_field() {
            FormField::StartDate => Some(&mut self.start_date),
            FormField::EndDate => Some(&mut self.end_date),
            FormField::TaskDate(i) => self.tasks.get_mut(i).map(|t| &mut t.date),
            _ => None,
        }
    }

    pub fn handle_char(&mut self, c: char) {
        if let Some(text) = self.current_text_mut() {
            text.push(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(text) = self.current_text_mut() {
            text.pop();
        }
    }

    /// Shift the focused date field by `days`
    pub fn shift_date(&mut self, days: i64) {
        if let Some(date) = self.current_date_mut() {
            *date = add_days_to_date_string(date, days);
        }
    }

    /// Append a task row dated at the project start and focus it
    pub fn add_task_row(&mut self) {
        self.tasks.push(NewTask {
            label: String::new(),
            date: self.start_date.clone(),
        });
        self.focus(FormField::TaskLabel(self.tasks.len() - 1));
    }

    /// Remove a task row. The last remaining row cannot be removed.
    pub fn remove_task_row(&mut self, row: usize) -> Result<(), &'static str> {
        if self.tasks.len() <= 1 {
            return Err("At least one task is required");
        }
        if row < self.tasks.len() {
            self.tasks.remove(row);
            let last = self.fields().len() - 1;
            self.focused_field = self.focused_field.min(last);
        }
        Ok(())
    }

    pub fn build_new_project(&self) -> NewProject {
        NewProject {
            name: self.name.clone(),
            status: self.status.clone(),
            start: self.start_date.clone(),
            end: self.end_date.clone(),
            tasks: self.tasks.clone(),
        }
    }
}

/// Add days to a date string in YYYY-MM-DD format
fn add_days_to_date_string(date_str: &str, days: i64) -> String {
    NaiveDate::parse_from_str(date_str, DATE_FORMAT)
        .map(|d| (d + chrono::Duration::days(days)).format(DATE_FORMAT).to_string())
        .unwrap_or_else(|_| chrono::Local::now().date_naive().format(DATE_FORMAT).to_string())
}

/// Yes/no gate in front of a delete
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    pub title: String,
    pub message: String,
    pub project_id: Uuid,
    /// Whether "Yes" is focused (false = "No" is focused)
    pub yes_focused: bool,
}

impl ConfirmDialog {
    pub fn new_delete(project_id: Uuid, name: &str) -> Self {
        Self {
            title: "Delete Project".to_string(),
            message: format!("Are you sure you want to delete \"{}\"?", name),
            project_id,
            yes_focused: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient toast message
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub shown_at: Instant,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Success,
            shown_at: Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Error,
            shown_at: Instant::now(),
        }
    }

    fn expired(&self) -> bool {
        self.shown_at.elapsed() > NOTIFICATION_TTL
    }
}

/// Main application state
#[derive(Debug)]
pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub store: Store,
    pub view: ViewState,
    /// Card under the cursor
    pub selected: usize,
    pub form_state: Option<FormState>,
    pub confirm_dialog: Option<ConfirmDialog>,
    pub notifications: Vec<Notification>,
    pub show_help: bool,
}

impl App {
    pub fn new(store: Store, page_size: usize) -> Self {
        let mut view = ViewState::new(page_size);
        view.render_all(store.projects());
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            store,
            view,
            selected: 0,
            form_state: None,
            confirm_dialog: None,
            notifications: Vec::new(),
            show_help: false,
        }
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
        if self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
    }

    /// Id of the card under the cursor
    pub fn selected_id(&self) -> Option<Uuid> {
        self.view.cards.cards().get(self.selected).map(|c| c.id)
    }

    pub fn open_create_form(&mut self) {
        self.view.close_all_actions();
        self.form_state = Some(FormState::default());
        self.input_mode = InputMode::Editing;
    }

    pub fn close_form(&mut self) {
        self.form_state = None;
        self.input_mode = InputMode::Normal;
    }

    fn open_delete_confirm(&mut self, id: Uuid) {
        if let Some(project) = self.store.get(id) {
            self.confirm_dialog = Some(ConfirmDialog::new_delete(id, &project.name));
            self.input_mode = InputMode::Confirming;
        }
    }

    pub fn close_confirm(&mut self) {
        self.confirm_dialog = None;
        self.input_mode = InputMode::Normal;
    }

    /// Apply a command to the store and view
    pub fn update(&mut self, command: Command) {
        match command {
            Command::AddProject(input) => {
                match commands::add_project(&mut self.store, &mut self.view, &input) {
                    Ok(outcome) => {
                        self.close_form();
                        self.selected = self.store.len().saturating_sub(1);
                        self.report(outcome);
                    }
                    Err(error) => {
                        if let Some(form) = &mut self.form_state {
                            form.error = Some(error.to_string());
                        }
                        self.notify(Notification::error(error.to_string()));
                    }
                }
            }
            Command::DeleteProject(id) => {
                self.close_confirm();
                if let Some(outcome) = commands::delete_project(&mut self.store, &mut self.view, id) {
                    self.selected = self.selected.min(self.store.len().saturating_sub(1));
                    self.report(outcome);
                }
            }
            Command::EditProject(id) => {
                if let Some(message) = commands::edit_project(&self.store, &mut self.view, id) {
                    self.notify(Notification::success(message));
                }
            }
            Command::ChangePage(page) => {
                self.view.change_page(page, self.store.projects());
            }
            Command::ToggleActions(id) => self.view.toggle_actions(id),
            Command::CloseActions => self.view.close_all_actions(),
        }
    }

    fn report(&mut self, outcome: commands::CommandOutcome) {
        self.notify(Notification::success(outcome.notice));
        if let Some(error) = outcome.persist_error {
            self.notify(Notification::error(format!("Could not save projects: {}", error)));
        }
    }

    /// Handle key events and return an optional command
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter) {
                self.show_help = false;
            }
            return None;
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Editing => self.handle_editing_key(key),
            InputMode::Confirming => self.handle_confirming_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<Command> {
        let popover_open = self
            .selected_id()
            .is_some_and(|id| self.view.actions_open_for(id));

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                None
            }
            KeyCode::Char('a') | KeyCode::Char('n') => {
                self.open_create_form();
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let total = self.view.cards.cards().len();
                if total > 0 {
                    self.selected = (self.selected + 1) % total;
                }
                Some(Command::CloseActions)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let total = self.view.cards.cards().len();
                if total > 0 {
                    self.selected = self.selected.checked_sub(1).unwrap_or(total - 1);
                }
                Some(Command::CloseActions)
            }
            KeyCode::Enter | KeyCode::Char('m') => self.selected_id().map(Command::ToggleActions),
            KeyCode::Char('e') if popover_open => self.selected_id().map(Command::EditProject),
            KeyCode::Char('d') | KeyCode::Delete if popover_open => {
                if let Some(id) = self.selected_id() {
                    self.view.close_all_actions();
                    self.open_delete_confirm(id);
                }
                None
            }
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Char(']') => {
                Some(Command::ChangePage(self.view.pages.current_page() + 1))
            }
            KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('[') => {
                Some(Command::ChangePage(self.view.pages.current_page().saturating_sub(1)))
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                c.to_digit(10).map(|page| Command::ChangePage(page as usize))
            }
            // Any other key acts like a click outside the popovers
            _ => Some(Command::CloseActions),
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> Option<Command> {
        let Some(form) = &mut self.form_state else {
            self.input_mode = InputMode::Normal;
            return None;
        };

        match key.code {
            KeyCode::Esc => {
                self.close_form();
                None
            }
            KeyCode::Tab => {
                form.next_field();
                None
            }
            KeyCode::BackTab => {
                form.prev_field();
                None
            }
            KeyCode::Enter => self.handle_form_submit(),
            KeyCode::Backspace => {
                form.handle_backspace();
                None
            }
            KeyCode::Delete => {
                if let Some(row) = form.current_field().task_row() {
                    if let Err(message) = form.remove_task_row(row) {
                        self.notify(Notification::error(message));
                    }
                }
                None
            }
            KeyCode::Up => {
                let field = form.current_field();
                if field.is_date_picker() {
                    form.shift_date(1);
                } else if field == FormField::Status {
                    form.status = form.status.previous();
                }
                None
            }
            KeyCode::Down => {
                let field = form.current_field();
                if field.is_date_picker() {
                    form.shift_date(-1);
                } else if field == FormField::Status {
                    form.status = form.status.next();
                }
                None
            }
            KeyCode::Left => {
                if form.current_field().is_date_picker() {
                    form.shift_date(-7);
                }
                None
            }
            KeyCode::Right => {
                if form.current_field().is_date_picker() {
                    form.shift_date(7);
                }
                None
            }
            KeyCode::Char(c) => {
                form.handle_char(c);
                None
            }
            _ => None,
        }
    }

    fn handle_form_submit(&mut self) -> Option<Command> {
        let form = self.form_state.as_mut()?;

        match form.current_field() {
            FormField::CancelButton => {
                self.close_form();
                None
            }
            FormField::AddTaskButton => {
                form.add_task_row();
                None
            }
            FormField::SubmitButton => {
                form.error = None;
                Some(Command::AddProject(form.build_new_project()))
            }
            // Enter on inputs moves to the next field
            _ => {
                form.next_field();
                None
            }
        }
    }

    fn handle_confirming_key(&mut self, key: KeyEvent) -> Option<Command> {
        let Some(dialog) = &mut self.confirm_dialog else {
            self.input_mode = InputMode::Normal;
            return None;
        };

        match key.code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.close_confirm();
                None
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                dialog.yes_focused = !dialog.yes_focused;
                None
            }
            KeyCode::Enter => {
                if dialog.yes_focused {
                    Some(Command::DeleteProject(dialog.project_id))
                } else {
                    self.close_confirm();
                    None
                }
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Command::DeleteProject(dialog.project_id)),
            _ => None,
        }
    }

    /// Per-frame housekeeping
    pub fn tick(&mut self) {
        self.notifications.retain(|n| !n.expired());
    }

    /// Status bar text
    pub fn status_text(&self) -> String {
        format!(
            "{} projects | chart page {}/{} | a: Add | Enter: Actions | [ ]: Page | ?: Help | q: Quit",
            self.store.len(),
            self.view.pages.current_page(),
            self.view.pages.total_pages(self.store.len()).max(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySlot;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, code: KeyCode) {
        let event = key(code);
        assert_eq!(event.kind, KeyEventKind::Press);
        if let Some(cmd) = app.handle_key(event) {
            app.update(cmd);
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn empty_app() -> App {
        App::new(Store::new(Box::new(MemorySlot::default()), Vec::new()), 3)
    }

    fn focus(app: &mut App, field: FormField) {
        let form = app.form_state.as_mut().unwrap();
        form.focus(field);
    }

    fn add_via_form(app: &mut App, name: &str) {
        press(app, KeyCode::Char('a'));
        type_text(app, name);
        focus(app, FormField::TaskLabel(0));
        type_text(app, "task");
        focus(app, FormField::SubmitButton);
        press(app, KeyCode::Enter);
    }

    #[test]
    fn test_add_project_through_form() {
        let mut app = empty_app();
        add_via_form(&mut app, "Alpha");

        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.form_state.is_none());
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.projects()[0].name, "Alpha");
        assert_eq!(app.notifications.last().unwrap().message, "Project added successfully");
    }

    #[test]
    fn test_invalid_form_stays_open() {
        let mut app = empty_app();
        press(&mut app, KeyCode::Char('a'));
        focus(&mut app, FormField::SubmitButton);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::Editing);
        assert!(app.store.is_empty());
        let form = app.form_state.as_ref().unwrap();
        assert_eq!(form.error.as_deref(), Some("Project name is required"));
        assert_eq!(app.notifications.last().unwrap().kind, NotificationKind::Error);
    }

    #[test]
    fn test_last_task_row_cannot_be_removed() {
        let mut app = empty_app();
        press(&mut app, KeyCode::Char('a'));
        focus(&mut app, FormField::TaskLabel(0));
        press(&mut app, KeyCode::Delete);

        assert_eq!(app.form_state.as_ref().unwrap().tasks.len(), 1);
        assert_eq!(
            app.notifications.last().unwrap().message,
            "At least one task is required"
        );
    }

    #[test]
    fn test_task_rows_can_be_added_and_removed() {
        let mut form = FormState::new_at(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        form.focus(FormField::AddTaskButton);
        form.add_task_row();
        assert_eq!(form.tasks.len(), 2);
        assert_eq!(form.current_field(), FormField::TaskLabel(1));
        assert_eq!(form.tasks[1].date, "2024-05-01");

        assert!(form.remove_task_row(0).is_ok());
        assert_eq!(form.tasks.len(), 1);
    }

    #[test]
    fn test_date_picker_shifts() {
        let mut form = FormState::new_at(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(form.end_date, "2024-03-01");
        form.focus(FormField::StartDate);
        form.shift_date(1);
        assert_eq!(form.start_date, "2024-02-01");
        form.shift_date(-7);
        assert_eq!(form.start_date, "2024-01-25");
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = empty_app();
        add_via_form(&mut app, "Doomed");

        // Delete key without open actions only closes popovers
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.input_mode, InputMode::Normal);

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.input_mode, InputMode::Confirming);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.store.len(), 1);

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.store.is_empty());
        assert!(app.view.cards.is_empty());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_edit_is_notification_only() {
        let mut app = empty_app();
        add_via_form(&mut app, "Alpha");
        let before = app.store.projects().to_vec();

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.notifications.last().unwrap().message, "Edit project: Alpha");
        assert_eq!(app.view.open_actions, None);
        assert_eq!(app.store.projects(), before.as_slice());
    }

    #[test]
    fn test_other_keys_close_popovers() {
        let mut app = empty_app();
        add_via_form(&mut app, "Alpha");
        press(&mut app, KeyCode::Enter);
        assert!(app.view.open_actions.is_some());
        press(&mut app, KeyCode::Esc);
        assert!(app.view.open_actions.is_none());
    }

    #[test]
    fn test_page_keys() {
        let mut app = empty_app();
        for i in 0..4 {
            add_via_form(&mut app, &format!("P{}", i));
        }
        assert_eq!(app.view.pages.current_page(), 2);
        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.view.pages.current_page(), 1);
        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.view.pages.current_page(), 1);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.view.pages.current_page(), 2);
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.view.pages.current_page(), 2);
    }

    #[test]
    fn test_quit() {
        let mut app = empty_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
