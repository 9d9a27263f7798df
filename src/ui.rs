use crate::app::App;
use crate::task::Priority;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::{io, time::Duration};

const TICK: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Deadline,
    Priority,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Self::Name => Self::Deadline,
            Self::Deadline => Self::Priority,
            Self::Priority => Self::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Name => Self::Priority,
            Self::Deadline => Self::Name,
            Self::Priority => Self::Deadline,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    Save,
    Clear,
    Quit,
}

impl Confirm {
    fn question(self) -> &'static str {
        match self {
            Self::Save => "Are you sure you want to save all tasks?",
            Self::Clear => "Are you sure you want to clear all tasks?",
            Self::Quit => "You have unsaved changes. Quit anyway?",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    List,
    Form,
    Confirm(Confirm),
    /// Blocking message; any key dismisses it.
    Notice { message: String, back_to_form: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub name: String,
    pub deadline: String,
    pub priority: Priority,
    pub focus: Field,
}

impl Default for Form {
    fn default() -> Self {
        Self {
            name: String::new(),
            deadline: String::new(),
            priority: Priority::Normal,
            focus: Field::Name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Everything the screen needs that is not task data.
#[derive(Debug)]
pub struct UiState {
    pub mode: Mode,
    pub form: Form,
    pub list: ListState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            mode: Mode::List,
            form: Form::default(),
            list: ListState::default(),
        }
    }
}

impl UiState {
    pub fn selected(&self) -> Option<usize> {
        self.list.selected()
    }

    /// Keeps the selection inside the list after it shrinks.
    fn clamp_selection(&mut self, len: usize) {
        match self.list.selected() {
            _ if len == 0 => self.list.select(None),
            Some(i) if i >= len => self.list.select(Some(len - 1)),
            _ => {}
        }
    }

    fn move_selection(&mut self, len: usize, down: bool) {
        if len == 0 {
            return;
        }
        let next = match (self.list.selected(), down) {
            (None, _) => 0,
            (Some(i), true) => (i + 1).min(len - 1),
            (Some(i), false) => i.saturating_sub(1),
        };
        self.list.select(Some(next));
    }

    fn notice(&mut self, message: impl Into<String>, back_to_form: bool) {
        self.mode = Mode::Notice {
            message: message.into(),
            back_to_form,
        };
    }
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let mut ui = UiState::default();
    loop {
        terminal.draw(|f| draw(f, app, &mut ui))?;

        // Poll so an expired status message disappears without a key press.
        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if handle_key(&mut ui, app, key) == Control::Quit {
                return Ok(());
            }
        }
    }
}

pub fn handle_key(ui: &mut UiState, app: &mut App, key: KeyEvent) -> Control {
    let control = match ui.mode.clone() {
        Mode::List => list_key(ui, app, key),
        Mode::Form => {
            form_key(ui, app, key);
            Control::Continue
        }
        Mode::Confirm(confirm) => confirm_key(ui, app, confirm, key),
        Mode::Notice { back_to_form, .. } => {
            ui.mode = if back_to_form { Mode::Form } else { Mode::List };
            Control::Continue
        }
    };
    ui.clamp_selection(app.store().len());
    control
}

fn list_key(ui: &mut UiState, app: &mut App, key: KeyEvent) -> Control {
    let len = app.store().len();
    match key.code {
        KeyCode::Char('q') if app.is_dirty() => ui.mode = Mode::Confirm(Confirm::Quit),
        KeyCode::Char('q') => return Control::Quit,
        KeyCode::Char('a') => ui.mode = Mode::Form,
        KeyCode::Up => ui.move_selection(len, false),
        KeyCode::Down => ui.move_selection(len, true),
        KeyCode::Enter | KeyCode::Char('d') => app.mark_selected_complete(ui.selected()),
        KeyCode::Char('s') => ui.mode = Mode::Confirm(Confirm::Save),
        KeyCode::Char('c') => ui.mode = Mode::Confirm(Confirm::Clear),
        KeyCode::Char('r') => {
            app.load_all();
            app.set_status("Tasks reloaded.");
        }
        _ => {}
    }
    Control::Continue
}

fn form_key(ui: &mut UiState, app: &mut App, key: KeyEvent) {
    let form = &mut ui.form;
    match key.code {
        KeyCode::Esc => ui.mode = Mode::List,
        KeyCode::Tab => form.focus = form.focus.next(),
        KeyCode::BackTab => form.focus = form.focus.prev(),
        KeyCode::Enter => {
            match app.add_task(&form.name, &form.deadline, form.priority.label()) {
                Ok(()) => {
                    *form = Form::default();
                    ui.mode = Mode::List;
                }
                Err(err) => {
                    tracing::debug!(%err, "rejected task input");
                    ui.mode = Mode::Notice {
                        message: err.to_string(),
                        back_to_form: true,
                    };
                }
            }
        }
        KeyCode::Left if form.focus == Field::Priority => form.priority = form.priority.prev(),
        KeyCode::Right if form.focus == Field::Priority => form.priority = form.priority.next(),
        KeyCode::Backspace => {
            if let Some(text) = focused_text(form) {
                text.pop();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(text) = focused_text(form) {
                text.push(c);
            }
        }
        _ => {}
    }
}

fn focused_text(form: &mut Form) -> Option<&mut String> {
    match form.focus {
        Field::Name => Some(&mut form.name),
        Field::Deadline => Some(&mut form.deadline),
        Field::Priority => None,
    }
}

fn confirm_key(ui: &mut UiState, app: &mut App, confirm: Confirm, key: KeyEvent) -> Control {
    let accepted = match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => true,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
        _ => return Control::Continue,
    };
    ui.mode = Mode::List;
    match (confirm, accepted) {
        (Confirm::Quit, true) => return Control::Quit,
        (Confirm::Save, true) => {
            if let Err(err) = app.save_all() {
                ui.notice(format!("Tasks could not be saved: {err}"), false);
            }
        }
        (Confirm::Save, false) => app.set_status("Tasks were not saved."),
        (Confirm::Clear, true) => app.clear_all(),
        (Confirm::Clear, false) | (Confirm::Quit, false) => {}
    }
    Control::Continue
}

pub fn draw(f: &mut Frame, app: &App, ui: &mut UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(5),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_form(f, ui, chunks[0]);
    draw_tasks(f, app, ui, chunks[1]);

    let footer = match (&ui.mode, app.status()) {
        (Mode::List, Some(status)) => Span::styled(status, Style::default().fg(Color::Green)),
        (Mode::List, None) => Span::raw(
            "a add | ↑/↓ select | enter done | s save | c clear | r reload | q quit",
        ),
        (Mode::Form, _) => Span::raw("tab next field | ←/→ priority | enter add | esc cancel"),
        _ => Span::raw(""),
    };
    f.render_widget(Paragraph::new(Line::from(footer)), chunks[2]);

    match &ui.mode {
        Mode::Confirm(confirm) => popup(f, "Confirm", &format!("{} (y/n)", confirm.question())),
        Mode::Notice { message, .. } => popup(f, "Notice", message),
        Mode::List | Mode::Form => {}
    }
}

fn draw_form(f: &mut Frame, ui: &UiState, area: Rect) {
    let editing = ui.mode == Mode::Form;
    let form = &ui.form;
    let field_style = |field: Field| {
        if editing && form.focus == field {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    };
    let lines = vec![
        Line::from(vec![
            Span::raw("Task:     "),
            Span::styled(form.name.as_str(), field_style(Field::Name)),
        ]),
        Line::from(vec![
            Span::raw("Deadline: "),
            Span::styled(form.deadline.as_str(), field_style(Field::Deadline)),
            Span::styled(" (YYYY-MM-DD)", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            Span::raw("Priority: "),
            Span::styled(
                format!("< {} >", form.priority),
                field_style(Field::Priority),
            ),
        ]),
    ];
    let block = Block::default()
        .title("New task")
        .borders(Borders::ALL)
        .border_style(if editing {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_tasks(f: &mut Frame, app: &App, ui: &mut UiState, area: Rect) {
    let rows = app.display_list();
    let mut items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", row.status)),
                Span::styled(row.name.as_str(), Style::default().fg(Color::White)),
                Span::raw(format!(" | {} | {}", row.deadline, row.priority)),
            ]))
        })
        .collect();
    if app.store().is_empty() {
        items.push(ListItem::new(Span::styled(
            "No tasks yet. Press 'a' to add one.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let title = if app.is_dirty() {
        format!("Tasks ({}) *", rows.len())
    } else {
        format!("Tasks ({})", rows.len())
    };
    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(if ui.mode == Mode::List {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                }),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut ui.list);
}

fn popup(f: &mut Frame, title: &str, message: &str) {
    let area = centered(f.area(), 60, 5);
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(message)
            .wrap(Wrap { trim: true })
            .block(Block::default().title(title).borders(Borders::ALL)),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
