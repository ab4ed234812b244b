use std::io;
use std::path::PathBuf;
use std::time::Duration as StdDuration;

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use crate::config::Config;
use crate::error::Result;
use crate::form::{ClearState, FormState};
use crate::model::{TaskField, incomplete_tasks};
use crate::output::truncate;
use crate::preview::{self, Theme};
use crate::settings::{FixedSettings, SettingKey, Variant};

const SECTION_COUNT: usize = 3;
const FIELD_COUNT: usize = TaskField::ALL.len();
const PREVIEW_SCROLL_STEP: usize = 8;
const LABEL_WIDTH: usize = 22;
const VALUE_WIDTH: usize = 60;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TuiSection {
    #[default]
    Tasks,
    Settings,
    Preview,
}

impl TuiSection {
    const ALL: [Self; SECTION_COUNT] = [Self::Tasks, Self::Settings, Self::Preview];

    fn index(self) -> usize {
        match self {
            Self::Tasks => 0,
            Self::Settings => 1,
            Self::Preview => 2,
        }
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % SECTION_COUNT]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + SECTION_COUNT - 1) % SECTION_COUNT]
    }
}

#[derive(Debug, Clone)]
struct EditorConfig {
    theme: Theme,
    show_preview: bool,
    output: PathBuf,
    tick_rate: StdDuration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            show_preview: true,
            output: Config::default().output_path(),
            tick_rate: StdDuration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputTarget {
    Field(usize, TaskField),
    SettingValue(SettingKey),
    ImportPath,
    ExportPath,
}

impl InputTarget {
    fn prompt(self) -> String {
        match self {
            Self::Field(index, field) => format!("Task {} {}", index + 1, field),
            Self::SettingValue(key) => key.to_string(),
            Self::ImportPath => "Import from".into(),
            Self::ExportPath => "Export to".into(),
        }
    }
}

#[derive(Debug, Clone)]
struct InputState {
    target: InputTarget,
    buffer: String,
}

struct EditorApp {
    form: FormState,
    focus: TuiSection,
    task_cursor: usize,
    setting_cursor: usize,
    theme: Theme,
    show_preview: bool,
    help_visible: bool,
    preview_scroll: usize,
    output: PathBuf,
    input: Option<InputState>,
    alert: Option<String>,
    status: Option<String>,
    tick_rate: StdDuration,
}

impl EditorApp {
    fn new(form: FormState, config: EditorConfig) -> Self {
        Self {
            form,
            focus: TuiSection::Tasks,
            task_cursor: 0,
            setting_cursor: 0,
            theme: config.theme,
            show_preview: config.show_preview,
            help_visible: false,
            preview_scroll: 0,
            output: config.output,
            input: None,
            alert: None,
            status: None,
            tick_rate: config.tick_rate,
        }
    }

    fn selected_task(&self) -> usize {
        self.task_cursor / FIELD_COUNT
    }

    fn selected_field(&self) -> TaskField {
        TaskField::ALL[self.task_cursor % FIELD_COUNT]
    }

    fn selected_setting(&self) -> SettingKey {
        SettingKey::ALL[self.setting_cursor]
    }

    fn normalize_selection(&mut self) {
        let rows = self.form.tasks().len() * FIELD_COUNT;
        if rows == 0 {
            self.task_cursor = 0;
        } else if self.task_cursor >= rows {
            self.task_cursor = rows - 1;
        }
        self.setting_cursor = self.setting_cursor.min(SettingKey::ALL.len() - 1);
    }

    fn report<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.alert = Some(err.to_string());
                None
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        if self.alert.is_some() {
            self.alert = None;
            return false;
        }

        if self.input.is_some() {
            self.handle_input_key(key);
            return false;
        }

        if self.form.clear_state() == ClearState::Pending {
            self.handle_confirm_key(key);
            return false;
        }

        self.status = None;
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('?') => self.help_visible = !self.help_visible,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::PageUp | KeyCode::Char('u') => {
                self.preview_scroll = self.preview_scroll.saturating_sub(PREVIEW_SCROLL_STEP);
            }
            KeyCode::PageDown | KeyCode::Char('d') => {
                self.preview_scroll = self.preview_scroll.saturating_add(PREVIEW_SCROLL_STEP);
            }
            KeyCode::Enter => self.start_edit(),
            KeyCode::Char(' ') if self.focus == TuiSection::Settings => {
                let result = self.form.toggle_setting(self.selected_setting());
                self.report(result);
            }
            KeyCode::Char('a') => {
                let index = self.form.add_task();
                self.task_cursor = index * FIELD_COUNT;
                self.focus = TuiSection::Tasks;
            }
            KeyCode::Char('x') => {
                let index = self.selected_task();
                let result = self.form.remove_task(index);
                if self.report(result).is_some() {
                    self.status = Some(format!("Removed task {}.", index + 1));
                }
            }
            KeyCode::Char('e') => {
                self.form.load_example();
                self.task_cursor = 0;
            }
            KeyCode::Char('C') => self.form.request_clear(),
            KeyCode::Char('i') => self.start_input(InputTarget::ImportPath, String::new()),
            KeyCode::Char('w') => {
                let path = self.output.display().to_string();
                self.start_input(InputTarget::ExportPath, path);
            }
            KeyCode::Char('p') => self.show_preview = !self.show_preview,
            KeyCode::Char('t') => self.theme = self.theme.toggled(),
            _ => {}
        }
        self.normalize_selection();
        false
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.input = None,
            KeyCode::Enter => self.commit_input(),
            KeyCode::Backspace => {
                if let Some(input) = &mut self.input {
                    input.buffer.pop();
                }
            }
            KeyCode::Char(ch) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT)
                    && let Some(input) = &mut self.input
                {
                    input.buffer.push(ch);
                }
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                if self.form.confirm_clear() {
                    self.task_cursor = 0;
                    self.preview_scroll = 0;
                    self.status = Some("Cleared all fields.".into());
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => self.form.cancel_clear(),
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        match self.focus {
            TuiSection::Tasks => {
                let rows = self.form.tasks().len() * FIELD_COUNT;
                self.task_cursor = step(self.task_cursor, delta, rows);
            }
            TuiSection::Settings => {
                self.setting_cursor = step(self.setting_cursor, delta, SettingKey::ALL.len());
            }
            TuiSection::Preview => {
                self.preview_scroll = if delta.is_negative() {
                    self.preview_scroll.saturating_sub(1)
                } else {
                    self.preview_scroll.saturating_add(1)
                };
            }
        }
    }

    fn start_edit(&mut self) {
        match self.focus {
            TuiSection::Tasks => {
                let index = self.selected_task();
                let field = self.selected_field();
                let current = match self.form.task(index) {
                    Ok(task) => task.field(field).to_string(),
                    Err(err) => {
                        self.alert = Some(err.to_string());
                        return;
                    }
                };
                self.start_input(InputTarget::Field(index, field), current);
            }
            TuiSection::Settings => {
                let key = self.selected_setting();
                if !self.form.is_configurable() || !key.has_value() {
                    return;
                }
                let current = self.form.settings().value(key).unwrap_or_default().to_string();
                self.start_input(InputTarget::SettingValue(key), current);
            }
            TuiSection::Preview => self.show_preview = !self.show_preview,
        }
    }

    fn start_input(&mut self, target: InputTarget, buffer: String) {
        self.input = Some(InputState { target, buffer });
    }

    fn commit_input(&mut self) {
        let Some(input) = self.input.take() else {
            return;
        };
        match input.target {
            InputTarget::Field(index, field) => {
                let result = self.form.update_field(index, field, &input.buffer);
                self.report(result);
            }
            InputTarget::SettingValue(key) => {
                let result = self.form.set_setting_value(key, &input.buffer);
                self.report(result);
            }
            InputTarget::ImportPath => {
                let path = PathBuf::from(input.buffer.trim());
                let result = self.form.import_file(&path);
                if let Some(count) = self.report(result) {
                    self.task_cursor = 0;
                    self.preview_scroll = 0;
                    self.status = Some(format!("Imported {count} task(s) from {}.", path.display()));
                }
            }
            InputTarget::ExportPath => {
                let path = PathBuf::from(input.buffer.trim());
                let result = self.form.write_export(&path);
                if self.report(result).is_some() {
                    self.status = Some(format!("JSON file written to {}.", path.display()));
                    self.output = path;
                }
            }
        }
        self.normalize_selection();
    }

    fn controls_line(&self) -> String {
        if let Some(input) = &self.input {
            return format!("{}: {}_", input.target.prompt(), input.buffer);
        }
        if let Some(status) = &self.status {
            return status.clone();
        }
        match self.focus {
            TuiSection::Tasks => "Enter edit  a add  x remove  e example  i import  w export  C clear  Tab section  ? help  q quit".into(),
            TuiSection::Settings => "Space toggle  Enter edit value  w export  Tab section  ? help  q quit".into(),
            TuiSection::Preview => "j/k scroll  p collapse  t theme  Tab section  ? help  q quit".into(),
        }
    }

    fn render(&self, frame: &mut Frame) {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let tasks = self.form.tasks();
        let summary = format!(
            "tasks={}  incomplete={}  variant={}  theme={}  output={}",
            tasks.len(),
            incomplete_tasks(tasks).len(),
            self.form.variant(),
            self.theme,
            self.output.display(),
        );
        frame.render_widget(
            Paragraph::new(summary)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("SharePoint migration JSON builder"),
                )
                .wrap(Wrap { trim: true }),
            outer[0],
        );

        let center = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(outer[1]);

        self.render_tasks(frame, center[0]);

        let preview_height = if self.show_preview {
            Constraint::Min(3)
        } else {
            Constraint::Length(3)
        };
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(SettingKey::ALL.len() as u16 + 2), preview_height])
            .split(center[1]);

        self.render_settings(frame, right[0]);
        self.render_preview(frame, right[1]);

        frame.render_widget(
            Paragraph::new(self.controls_line())
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(if self.input.is_some() { "Input" } else { "Controls" }),
                )
                .wrap(Wrap { trim: true }),
            outer[2],
        );

        if self.help_visible {
            self.render_popup(
                frame,
                "Help",
                "Tasks:\n\
                 - Up/Down, j/k: move between fields\n\
                 - Enter: edit field, Enter to keep, Esc to discard\n\
                 - a: add task, x: remove selected task\n\
                 - e: load the example task\n\n\
                 Settings:\n\
                 - Space: toggle, Enter: edit date or extension list\n\n\
                 Files:\n\
                 - i: import a JSON document (replaces all tasks)\n\
                 - w: export (every field of every task is required)\n\n\
                 Other:\n\
                 - C: clear everything (asks first)\n\
                 - p: show/hide preview, t: switch preview theme\n\
                 - PgUp/PgDn (or u/d): scroll preview\n\
                 - Tab / Shift+Tab: switch section\n\
                 - q: quit, ?: toggle this help",
                (70, 70),
            );
        }

        if self.form.clear_state() == ClearState::Pending {
            self.render_popup(
                frame,
                "Clear all",
                "Are you sure you want to clear everything?\n\n\
                 y / Enter: yes, clear all\n\
                 n / Esc: cancel",
                (50, 30),
            );
        }

        if let Some(alert) = &self.alert {
            self.render_popup(frame, "Error", &format!("{alert}\n\nPress any key."), (50, 30));
        }
    }

    fn render_tasks(&self, frame: &mut Frame, area: Rect) {
        let tasks = self.form.tasks();
        let title = format!("Tasks ({})", tasks.len());
        let block = section_block(title, self.focus == TuiSection::Tasks);

        if tasks.is_empty() {
            frame.render_widget(
                Paragraph::new("(no tasks, press a to add one)").block(block),
                area,
            );
            return;
        }

        let items = tasks
            .iter()
            .enumerate()
            .flat_map(|(index, task)| {
                TaskField::ALL.into_iter().map(move |field| {
                    let value = task.field(field);
                    let value_span = if value.trim().is_empty() {
                        Span::styled(
                            field.placeholder(),
                            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                        )
                    } else {
                        Span::raw(truncate(value, VALUE_WIDTH))
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("#{:<3}", index + 1),
                            Style::default().fg(Color::Cyan),
                        ),
                        Span::raw(format!("{:<width$} ", field.key(), width = LABEL_WIDTH)),
                        value_span,
                    ]))
                })
            })
            .collect::<Vec<_>>();

        let mut state = ListState::default();
        state.select(Some(self.task_cursor));

        frame.render_stateful_widget(
            List::new(items)
                .block(block)
                .highlight_style(highlight_style())
                .highlight_symbol("❯ "),
            area,
            &mut state,
        );
    }

    fn render_settings(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == TuiSection::Settings;

        if !self.form.is_configurable() {
            let fixed = serde_json::to_string(&FixedSettings::default()).unwrap_or_default();
            frame.render_widget(
                Paragraph::new(format!("Every task gets fixed settings:\n{fixed}"))
                    .block(section_block(format!("Settings ({})", Variant::Fixed), focused))
                    .wrap(Wrap { trim: true }),
                area,
            );
            return;
        }

        let settings = self.form.settings();
        let items = SettingKey::ALL
            .into_iter()
            .map(|key| {
                let mark = if settings.is_enabled(key) { "[x]" } else { "[ ]" };
                let row = match settings.value(key) {
                    Some(value) => format!("{mark} {key} = {value}"),
                    None => format!("{mark} {key}"),
                };
                ListItem::new(row)
            })
            .collect::<Vec<_>>();

        let mut state = ListState::default();
        state.select(focused.then_some(self.setting_cursor));

        frame.render_stateful_widget(
            List::new(items)
                .block(section_block("Optional settings".into(), focused))
                .highlight_style(highlight_style())
                .highlight_symbol("❯ "),
            area,
            &mut state,
        );
    }

    fn render_preview(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == TuiSection::Preview;
        if !self.show_preview {
            frame.render_widget(
                Paragraph::new("press p to show").block(section_block(
                    "► JSON preview".into(),
                    focused,
                )),
                area,
            );
            return;
        }

        let lines = match self.form.preview() {
            Ok(json) => preview::highlight_lines(&json, self.theme),
            Err(err) => vec![Line::from(err.to_string())],
        };
        let (r, g, b) = self.theme.background();

        frame.render_widget(
            Paragraph::new(lines)
                .style(Style::default().bg(Color::Rgb(r, g, b)))
                .block(section_block(format!("▼ JSON preview ({})", self.theme), focused))
                .scroll((self.preview_scroll.min(u16::MAX as usize) as u16, 0)),
            area,
        );
    }

    fn render_popup(&self, frame: &mut Frame, title: &str, body: &str, size: (u16, u16)) {
        let popup = centered_rect(size.0, size.1, frame.area());
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(body.to_string())
                .block(Block::default().borders(Borders::ALL).title(title.to_string()))
                .wrap(Wrap { trim: true }),
            popup,
        );
    }
}

/// Open the editor. A failed `--import` is shown as an alert and the form
/// starts empty.
pub fn run(
    config: &Config,
    variant: Option<Variant>,
    theme: Option<Theme>,
    import: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut form = FormState::with_defaults(
        variant.unwrap_or(config.variant),
        config.defaults.clone(),
    );
    let editor_config = EditorConfig {
        theme: theme.unwrap_or(config.theme),
        show_preview: config.show_preview,
        output: output.unwrap_or_else(|| config.output_path()),
        ..EditorConfig::default()
    };

    let import_result = import.as_deref().map(|path| form.import_file(path));
    let mut app = EditorApp::new(form, editor_config);
    if let Some(result) = import_result {
        app.report(result);
    }

    run_tui(&mut app)
}

fn run_tui(app: &mut EditorApp) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = run_loop(&mut terminal, app);

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

fn run_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut EditorApp) -> Result<()> {
    loop {
        app.normalize_selection();
        terminal
            .draw(|frame| app.render(frame))
            .map_err(|err| std::io::Error::other(err.to_string()))?;

        if event::poll(app.tick_rate)?
            && let Event::Key(key) = event::read()?
            && app.handle_key(key)
        {
            break;
        }
    }

    Ok(())
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    if delta.is_negative() {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta as usize).min(len - 1)
    }
}

fn highlight_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn section_block(title: String, focused: bool) -> Block<'static> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block.border_style(Style::default().fg(Color::Cyan))
    } else {
        block
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::Task;
    use crossterm::event::KeyEvent;
    use ratatui::backend::TestBackend;
    use tempfile::tempdir;

    fn app() -> EditorApp {
        EditorApp::new(FormState::default(), EditorConfig::default())
    }

    fn press(app: &mut EditorApp, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::from(code))
    }

    fn type_text(app: &mut EditorApp, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    #[test]
    fn section_navigation_wraps() {
        assert_eq!(TuiSection::Tasks.prev(), TuiSection::Preview);
        assert_eq!(TuiSection::Preview.next(), TuiSection::Tasks);
    }

    #[test]
    fn editing_a_field_updates_the_task() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "https://x");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);

        assert!(app.input.is_none());
        assert_eq!(app.form.tasks()[0].target_path, "https://");
    }

    #[test]
    fn escape_discards_edit() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "abc");
        press(&mut app, KeyCode::Esc);
        assert!(app.form.tasks()[0].source_path.is_empty());
    }

    #[test]
    fn add_moves_cursor_to_new_task() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.form.tasks().len(), 2);
        assert_eq!(app.selected_task(), 1);
        assert_eq!(app.selected_field(), TaskField::SourcePath);
    }

    #[test]
    fn removing_last_task_raises_alert() {
        let mut app = app();
        press(&mut app, KeyCode::Char('x'));
        assert!(app.alert.is_some());
        assert_eq!(app.form.tasks().len(), 1);

        press(&mut app, KeyCode::Char('x'));
        assert!(app.alert.is_none(), "first key only dismisses the alert");
        assert_eq!(app.form.tasks().len(), 1);
    }

    #[test]
    fn space_toggles_selected_setting() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.form.settings().is_enabled(SettingKey::MigrateItemsCreatedAfter));

        press(&mut app, KeyCode::Enter);
        for _ in 0.."2016-05-22".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "2019-07-01");
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.form.settings().value(SettingKey::MigrateItemsCreatedAfter),
            Some("2019-07-01")
        );
    }

    #[test]
    fn invalid_setting_value_alerts_and_keeps_value() {
        let mut app = app();
        app.focus = TuiSection::Settings;
        app.setting_cursor = 2;
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "x");
        press(&mut app, KeyCode::Enter);

        assert!(app.alert.is_some());
        assert_eq!(
            app.form.settings().value(SettingKey::MigrateItemsModifiedAfter),
            Some("2016-05-22")
        );
    }

    #[test]
    fn clear_requires_confirmation() {
        let mut app = app();
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Char('C'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.form.tasks(), &[Task::example()]);

        press(&mut app, KeyCode::Char('C'));
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.form.tasks().len(), 1, "other keys are ignored while confirming");
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.form.tasks(), &[Task::default()]);
        assert_eq!(app.status.as_deref(), Some("Cleared all fields."));
    }

    #[test]
    fn export_prompt_writes_file_only_when_valid() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out.json");
        let mut app = EditorApp::new(
            FormState::default(),
            EditorConfig {
                output: target.clone(),
                ..EditorConfig::default()
            },
        );

        press(&mut app, KeyCode::Char('w'));
        press(&mut app, KeyCode::Enter);
        assert!(app.alert.is_some());
        assert!(!target.exists());

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Char('w'));
        press(&mut app, KeyCode::Enter);
        assert!(app.alert.is_none());
        assert!(target.exists());
    }

    #[test]
    fn failed_import_keeps_tasks() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "not json").unwrap();

        let mut app = app();
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Char('i'));
        type_text(&mut app, &bad.display().to_string());
        press(&mut app, KeyCode::Enter);

        assert!(app.alert.is_some());
        assert_eq!(app.form.tasks(), &[Task::example()]);
    }

    #[test]
    fn quit_and_ctrl_c() {
        let mut app = app();
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn preview_and_theme_toggles() {
        let mut app = app();
        press(&mut app, KeyCode::Char('p'));
        assert!(!app.show_preview);
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.theme, Theme::Dark);
    }

    #[test]
    fn render_smoke() {
        let mut app = app();
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Char('a'));
        app.help_visible = true;
        let backend = TestBackend::new(140, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        let mut fixed = EditorApp::new(FormState::new(Variant::Fixed), EditorConfig::default());
        fixed.form.request_clear();
        terminal.draw(|frame| fixed.render(frame)).unwrap();
    }

    #[test]
    fn step_clamps() {
        assert_eq!(step(0, -1, 4), 0);
        assert_eq!(step(3, 1, 4), 3);
        assert_eq!(step(2, 1, 0), 0);
    }
}
