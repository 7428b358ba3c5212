// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use funil_app::{
    AppCommand, AppEvent, AppState, CardSlot, DropDecision, InteractionFormInput, Lead,
    LeadFormInput, LeadId, LeadList, LeadStatus, Route, resolve_drop,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;

const STATUS_CLEAR_SECONDS: u64 = 4;
const CURSOR_MARK: &str = "> ";
const GRAB_MARK: &str = "* ";

/// Outcome of one background status PATCH, delivered over the internal
/// channel once the request settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusPatchEvent {
    Completed { request_id: u64 },
    Failed { request_id: u64, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    StatusPatch(StatusPatchEvent),
}

/// Seam between the views and whatever serves the data: the HTTP client in
/// normal operation, an in-memory pipeline in demo mode, a recording fake in
/// tests.
pub trait AppRuntime {
    fn load_leads(&mut self) -> Result<Vec<Lead>>;
    fn load_lead(&mut self, id: &LeadId) -> Result<Lead>;
    fn update_status(&mut self, id: &LeadId, status: LeadStatus) -> Result<()>;
    fn submit_interaction(&mut self, id: &LeadId, input: &InteractionFormInput) -> Result<()>;
    fn submit_lead(&mut self, input: &LeadFormInput) -> Result<Lead>;

    /// The write half of an optimistic status update. The local list already
    /// shows the new status by the time this runs; the default runs the
    /// request inline and reports the outcome over the channel.
    fn spawn_update_status(
        &mut self,
        request_id: u64,
        id: &LeadId,
        status: LeadStatus,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let event = match self.update_status(id, status) {
            Ok(()) => InternalEvent::StatusPatch(StatusPatchEvent::Completed { request_id }),
            Err(error) => InternalEvent::StatusPatch(StatusPatchEvent::Failed {
                request_id,
                error: error.to_string(),
            }),
        };
        tx.send(event)
            .map_err(|_| anyhow::anyhow!("status patch channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct KanbanUiState {
    column: usize,
    row: usize,
    grabbed: Option<CardSlot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct QueueUiState {
    row: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DetailPhase {
    #[default]
    Loading,
    Ready,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DetailFocus {
    #[default]
    Note,
    Status,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct DetailUiState {
    phase: DetailPhase,
    lead: Option<Lead>,
    note: String,
    status_choice: Option<LeadStatus>,
    focus: DetailFocus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FormField {
    #[default]
    Name,
    Email,
    Phone,
}

impl FormField {
    const fn next(self) -> Self {
        match self {
            Self::Name => Self::Email,
            Self::Email => Self::Phone,
            Self::Phone => Self::Name,
        }
    }

    const fn prev(self) -> Self {
        match self {
            Self::Name => Self::Phone,
            Self::Email => Self::Name,
            Self::Phone => Self::Email,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
struct FormUiState {
    input: LeadFormInput,
    field: FormField,
}

impl FormUiState {
    fn active_value_mut(&mut self) -> &mut String {
        match self.field {
            FormField::Name => &mut self.input.name,
            FormField::Email => &mut self.input.email,
            FormField::Phone => &mut self.input.phone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
struct ViewData {
    leads: LeadList,
    kanban: KanbanUiState,
    queue: QueueUiState,
    detail: DetailUiState,
    form: FormUiState,
    help_visible: bool,
    status_token: u64,
    next_patch_id: u64,
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    enter_route(state, runtime, &mut view_data, &internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::StatusPatch(StatusPatchEvent::Completed { .. }) => {}
            // The optimistic local change stays in place; the views keep
            // showing it until the next refetch.
            InternalEvent::StatusPatch(StatusPatchEvent::Failed { error, .. }) => {
                state.dispatch(AppCommand::ShowAlert(format!(
                    "status update failed: {error}"
                )));
            }
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(STATUS_CLEAR_SECONDS));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    // A raised alert blocks everything underneath until acknowledged.
    if state.alert.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            state.dispatch(AppCommand::DismissAlert);
        }
        return false;
    }

    if view_data.help_visible {
        view_data.help_visible = false;
        return false;
    }

    match state.route.clone() {
        Route::Kanban => handle_kanban_key(state, runtime, view_data, internal_tx, key),
        Route::Queue => handle_queue_key(state, runtime, view_data, internal_tx, key),
        Route::LeadDetail(_) => {
            handle_detail_key(state, runtime, view_data, internal_tx, key);
            false
        }
        Route::NewLead => {
            handle_form_key(state, runtime, view_data, internal_tx, key);
            false
        }
    }
}

fn handle_list_nav_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> Option<bool> {
    match key.code {
        KeyCode::Char('q') => Some(true),
        KeyCode::Char('?') => {
            view_data.help_visible = true;
            Some(false)
        }
        KeyCode::Char('1') => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::OpenKanban);
            Some(false)
        }
        KeyCode::Char('2') => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::OpenQueue);
            Some(false)
        }
        KeyCode::Char('n') => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::OpenNewLead);
            Some(false)
        }
        KeyCode::Char('r') => {
            enter_route(state, runtime, view_data, internal_tx);
            Some(false)
        }
        _ => None,
    }
}

fn handle_kanban_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if let Some(quit) = handle_list_nav_key(state, runtime, view_data, internal_tx, key) {
        return quit;
    }

    match key.code {
        KeyCode::Left | KeyCode::Char('h') => move_kanban_column(view_data, -1),
        KeyCode::Right | KeyCode::Char('l') => move_kanban_column(view_data, 1),
        KeyCode::Up | KeyCode::Char('k') => move_kanban_row(view_data, -1),
        KeyCode::Down | KeyCode::Char('j') => move_kanban_row(view_data, 1),
        KeyCode::Char(' ') => grab_or_drop(state, runtime, view_data, internal_tx),
        KeyCode::Enter => {
            if view_data.kanban.grabbed.is_some() {
                grab_or_drop(state, runtime, view_data, internal_tx);
            } else {
                let id = selected_kanban_lead(view_data).map(|lead| lead.id.clone());
                if let Some(id) = id {
                    dispatch_and_refresh(
                        state,
                        runtime,
                        view_data,
                        internal_tx,
                        AppCommand::OpenLead(id),
                    );
                }
            }
        }
        KeyCode::Esc => {
            // Cancelled gesture: same outcome as dropping outside the board.
            if view_data.kanban.grabbed.take().is_some() {
                emit_status(state, view_data, internal_tx, "move cancelled");
            }
        }
        _ => {}
    }
    false
}

fn handle_queue_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if let Some(quit) = handle_list_nav_key(state, runtime, view_data, internal_tx, key) {
        return quit;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            view_data.queue.row = view_data.queue.row.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let last = view_data.leads.len().saturating_sub(1);
            view_data.queue.row = (view_data.queue.row + 1).min(last);
        }
        KeyCode::Left | KeyCode::Char('h') => shift_queue_status(
            state,
            runtime,
            view_data,
            internal_tx,
            ShiftDirection::Prev,
        ),
        KeyCode::Right | KeyCode::Char('l') => shift_queue_status(
            state,
            runtime,
            view_data,
            internal_tx,
            ShiftDirection::Next,
        ),
        KeyCode::Enter => {
            let id = view_data
                .leads
                .leads()
                .get(view_data.queue.row)
                .map(|lead| lead.id.clone());
            if let Some(id) = id {
                dispatch_and_refresh(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    AppCommand::OpenLead(id),
                );
            }
        }
        _ => {}
    }
    false
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShiftDirection {
    Prev,
    Next,
}

fn shift_queue_status<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    direction: ShiftDirection,
) {
    let Some(lead) = view_data.leads.leads().get(view_data.queue.row) else {
        return;
    };
    let id = lead.id.clone();
    let name = lead.name.clone();
    let status = match direction {
        ShiftDirection::Prev => lead.status.prev(),
        ShiftDirection::Next => lead.status.next(),
    };
    request_status_update(state, runtime, view_data, internal_tx, &id, status);
    emit_status(
        state,
        view_data,
        internal_tx,
        format!("moved {name} to {}", status.label()),
    );
}

fn handle_detail_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if view_data.detail.phase != DetailPhase::Ready {
        return;
    }

    match key.code {
        KeyCode::Esc => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::OpenKanban);
        }
        KeyCode::Tab => {
            view_data.detail.focus = match view_data.detail.focus {
                DetailFocus::Note => DetailFocus::Status,
                DetailFocus::Status => DetailFocus::Note,
            };
        }
        KeyCode::Enter => submit_detail_note(state, runtime, view_data, internal_tx),
        KeyCode::Up if view_data.detail.focus == DetailFocus::Status => {
            cycle_detail_status(view_data, ShiftDirection::Prev);
        }
        KeyCode::Down if view_data.detail.focus == DetailFocus::Status => {
            cycle_detail_status(view_data, ShiftDirection::Next);
        }
        KeyCode::Backspace if view_data.detail.focus == DetailFocus::Note => {
            view_data.detail.note.pop();
        }
        KeyCode::Char(c)
            if view_data.detail.focus == DetailFocus::Note
                && !key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            view_data.detail.note.push(c);
        }
        _ => {}
    }
}

fn cycle_detail_status(view_data: &mut ViewData, direction: ShiftDirection) {
    let current = view_data
        .detail
        .status_choice
        .or_else(|| view_data.detail.lead.as_ref().map(|lead| lead.status));
    let Some(current) = current else {
        return;
    };
    view_data.detail.status_choice = Some(match direction {
        ShiftDirection::Prev => current.prev(),
        ShiftDirection::Next => current.next(),
    });
}

fn submit_detail_note<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(lead) = view_data.detail.lead.clone() else {
        return;
    };
    let input = InteractionFormInput {
        note: view_data.detail.note.clone(),
        status: view_data.detail.status_choice.unwrap_or(lead.status),
    };
    // An empty note is a complete no-op: nothing is sent, nothing changes.
    if !input.has_note() {
        return;
    }

    view_data.detail.phase = DetailPhase::Submitting;
    match runtime.submit_interaction(&lead.id, &input) {
        Ok(()) => {
            view_data.detail.note.clear();
            match runtime.load_lead(&lead.id) {
                Ok(fresh) => {
                    view_data.detail.status_choice = Some(fresh.status);
                    view_data.detail.lead = Some(fresh);
                    view_data.detail.phase = DetailPhase::Ready;
                    emit_status(state, view_data, internal_tx, "note saved");
                }
                Err(error) => {
                    state.dispatch(AppCommand::ShowAlert(format!(
                        "could not reload lead: {error:#}"
                    )));
                    dispatch_and_refresh(
                        state,
                        runtime,
                        view_data,
                        internal_tx,
                        AppCommand::OpenKanban,
                    );
                }
            }
        }
        Err(error) => {
            // Keep the draft so the note can be retried after the alert.
            view_data.detail.phase = DetailPhase::Ready;
            state.dispatch(AppCommand::ShowAlert(format!(
                "could not save note: {error:#}"
            )));
        }
    }
}

fn handle_form_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::OpenKanban);
        }
        KeyCode::Tab | KeyCode::Down => {
            view_data.form.field = view_data.form.field.next();
        }
        KeyCode::BackTab | KeyCode::Up => {
            view_data.form.field = view_data.form.field.prev();
        }
        KeyCode::Enter => submit_lead_form(state, runtime, view_data, internal_tx),
        KeyCode::Backspace => {
            view_data.form.active_value_mut().pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.form.active_value_mut().push(c);
        }
        _ => {}
    }
}

fn submit_lead_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let input = view_data.form.input.clone();
    if let Err(error) = input.validate() {
        emit_status(state, view_data, internal_tx, format!("{error:#}"));
        return;
    }

    match runtime.submit_lead(&input) {
        Ok(lead) => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::OpenKanban);
            // The confirmation blocks until dismissed.
            state.dispatch(AppCommand::ShowAlert(format!(
                "lead created: {}",
                lead.name
            )));
        }
        Err(error) => {
            // Input stays as typed; the server's reason is in the alert.
            state.dispatch(AppCommand::ShowAlert(format!(
                "could not create lead: {error:#}"
            )));
        }
    }
}

fn grab_or_drop<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    if let Some(source) = view_data.kanban.grabbed.take() {
        complete_drop(state, runtime, view_data, internal_tx, source);
    } else if let Some(lead) = selected_kanban_lead(view_data) {
        let name = lead.name.clone();
        view_data.kanban.grabbed = Some(CardSlot::new(
            kanban_status(view_data.kanban.column),
            view_data.kanban.row,
        ));
        emit_status(state, view_data, internal_tx, format!("picked up {name}"));
    }
}

fn complete_drop<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    source: CardSlot,
) {
    let destination = Some(CardSlot::new(
        kanban_status(view_data.kanban.column),
        view_data.kanban.row,
    ));
    match resolve_drop(source, destination) {
        DropDecision::Ignore => {}
        DropDecision::Move { status } => {
            let card = view_data
                .leads
                .card_at(source.status, source.index)
                .map(|lead| (lead.id.clone(), lead.name.clone()));
            let Some((id, name)) = card else {
                emit_status(state, view_data, internal_tx, "card is no longer present");
                return;
            };
            request_status_update(state, runtime, view_data, internal_tx, &id, status);
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("moved {name} to {}", status.label()),
            );
        }
    }
}

/// Optimistic status update: rewrite the local list first, then hand the
/// PATCH to the runtime. A failure later raises an alert without rolling the
/// local change back.
fn request_status_update<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    id: &LeadId,
    status: LeadStatus,
) {
    if !view_data.leads.set_status(id, status) {
        return;
    }
    clamp_kanban_cursor(view_data);

    view_data.next_patch_id = view_data.next_patch_id.saturating_add(1);
    let request_id = view_data.next_patch_id;
    if let Err(error) = runtime.spawn_update_status(request_id, id, status, internal_tx.clone()) {
        state.dispatch(AppCommand::ShowAlert(format!(
            "status update failed: {error:#}"
        )));
    }
}

fn dispatch_and_refresh<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::RouteChanged(_)))
    {
        enter_route(state, runtime, view_data, internal_tx);
    }
}

/// Route entry point. List routes always refetch; the detail route loads one
/// lead and falls back to the kanban on failure.
fn enter_route<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    match state.route.clone() {
        Route::Kanban | Route::Queue => load_lead_list(state, runtime, view_data, internal_tx),
        Route::NewLead => view_data.form = FormUiState::default(),
        Route::LeadDetail(id) => {
            view_data.detail = DetailUiState::default();
            match runtime.load_lead(&id) {
                Ok(lead) => {
                    view_data.detail.status_choice = Some(lead.status);
                    view_data.detail.lead = Some(lead);
                    view_data.detail.phase = DetailPhase::Ready;
                }
                Err(error) => {
                    state.dispatch(AppCommand::ShowAlert(format!(
                        "could not load lead: {error:#}"
                    )));
                    state.dispatch(AppCommand::OpenKanban);
                    load_lead_list(state, runtime, view_data, internal_tx);
                }
            }
        }
    }
}

fn load_lead_list<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    view_data.kanban.grabbed = None;
    match runtime.load_leads() {
        Ok(leads) => {
            view_data.leads.replace_all(leads);
            clamp_kanban_cursor(view_data);
            clamp_queue_cursor(view_data);
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("{} leads loaded", view_data.leads.len()),
            );
        }
        // Stale data stays on screen; a list-load failure is not modal.
        Err(error) => emit_status(
            state,
            view_data,
            internal_tx,
            format!("lead list load failed: {error:#}"),
        ),
    }
}

fn kanban_status(column: usize) -> LeadStatus {
    LeadStatus::ALL[column.min(LeadStatus::ALL.len() - 1)]
}

fn selected_kanban_lead(view_data: &ViewData) -> Option<&Lead> {
    view_data
        .leads
        .card_at(kanban_status(view_data.kanban.column), view_data.kanban.row)
}

fn move_kanban_column(view_data: &mut ViewData, delta: isize) {
    let last = LeadStatus::ALL.len() as isize - 1;
    let column = (view_data.kanban.column as isize + delta).clamp(0, last);
    view_data.kanban.column = column as usize;
    clamp_kanban_cursor(view_data);
}

fn move_kanban_row(view_data: &mut ViewData, delta: isize) {
    let len = view_data
        .leads
        .column_len(kanban_status(view_data.kanban.column));
    let last = len.saturating_sub(1) as isize;
    let row = (view_data.kanban.row as isize + delta).clamp(0, last);
    view_data.kanban.row = row as usize;
}

fn clamp_kanban_cursor(view_data: &mut ViewData) {
    let len = view_data
        .leads
        .column_len(kanban_status(view_data.kanban.column));
    view_data.kanban.row = view_data.kanban.row.min(len.saturating_sub(1));
}

fn clamp_queue_cursor(view_data: &mut ViewData) {
    view_data.queue.row = view_data.queue.row.min(view_data.leads.len().saturating_sub(1));
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    match &state.route {
        Route::LeadDetail(_) => {
            let breadcrumb = Paragraph::new(detail_breadcrumb_text(view_data))
                .block(Block::default().title("funil").borders(Borders::ALL));
            frame.render_widget(breadcrumb, layout[0]);
        }
        route => {
            let selected = match route {
                Route::Kanban => 0,
                Route::Queue => 1,
                _ => 2,
            };
            let tabs = Tabs::new(vec![
                "kanban".to_owned(),
                "queue".to_owned(),
                "new lead".to_owned(),
            ])
            .block(Block::default().title("funil").borders(Borders::ALL))
            .style(Style::default().fg(Color::White))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .select(selected);
            frame.render_widget(tabs, layout[0]);
        }
    }

    match &state.route {
        Route::Kanban => render_kanban(frame, layout[1], view_data),
        Route::Queue => render_queue(frame, layout[1], view_data),
        Route::LeadDetail(_) => {
            let body = Paragraph::new(render_detail_text(&view_data.detail))
                .block(Block::default().borders(Borders::ALL).title("lead"));
            frame.render_widget(body, layout[1]);
        }
        Route::NewLead => {
            let body = Paragraph::new(render_form_text(&view_data.form))
                .block(Block::default().borders(Borders::ALL).title("new lead"));
            frame.render_widget(body, layout[1]);
        }
    }

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if view_data.help_visible {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }

    if let Some(alert) = &state.alert {
        let area = centered_rect(60, 30, frame.area());
        frame.render_widget(Clear, area);
        let body = format!("{alert}\n\n[enter] dismiss");
        let widget = Paragraph::new(body).block(
            Block::default()
                .title("error")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Red)),
        );
        frame.render_widget(widget, area);
    }
}

fn render_kanban(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let widths = vec![Constraint::Percentage(20); LeadStatus::ALL.len()];
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);

    for (index, status) in LeadStatus::ALL.iter().enumerate() {
        let active = index == view_data.kanban.column;
        let border_style = if active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let body = Paragraph::new(kanban_column_text(view_data, index)).block(
            Block::default()
                .title(kanban_column_title(view_data, *status))
                .borders(Borders::ALL)
                .border_style(border_style),
        );
        frame.render_widget(body, columns[index]);
    }
}

fn kanban_column_title(view_data: &ViewData, status: LeadStatus) -> String {
    format!("{} ({})", status.label(), view_data.leads.column_len(status))
}

fn kanban_column_text(view_data: &ViewData, column: usize) -> String {
    let status = kanban_status(column);
    let mut lines = Vec::new();
    for (row, lead) in view_data.leads.column(status).into_iter().enumerate() {
        let slot = CardSlot::new(status, row);
        let marker = if view_data.kanban.grabbed == Some(slot) {
            GRAB_MARK
        } else if column == view_data.kanban.column && row == view_data.kanban.row {
            CURSOR_MARK
        } else {
            "  "
        };
        lines.push(format!("{marker}{}", lead.name));
        lines.push(format!("  {}", lead.email));
    }
    lines.join("\n")
}

fn render_queue(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let header = Row::new(
        ["name", "email", "phone", "status", "origin"].map(|label| {
            Cell::from(label).style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
        }),
    );

    let rows: Vec<Row<'_>> = if view_data.leads.is_empty() {
        vec![Row::new([Cell::from("no leads found")])]
    } else {
        view_data
            .leads
            .leads()
            .iter()
            .enumerate()
            .map(|(row_index, lead)| {
                let style = if row_index == view_data.queue.row {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Row::new([
                    Cell::from(lead.name.clone()),
                    Cell::from(lead.email.clone()),
                    Cell::from(lead.phone.clone()),
                    Cell::from(lead.status.label()),
                    Cell::from(lead.origin.clone().unwrap_or_default()),
                ])
                .style(style)
            })
            .collect()
    };

    let widths = vec![Constraint::Min(10); 5];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(format!("queue ({})", view_data.leads.len()))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn detail_breadcrumb_text(view_data: &ViewData) -> String {
    match &view_data.detail.lead {
        Some(lead) => format!("kanban / {}", lead.name),
        None => "kanban / loading".to_owned(),
    }
}

fn render_detail_text(detail: &DetailUiState) -> String {
    let Some(lead) = &detail.lead else {
        return "loading lead...".to_owned();
    };

    let mut lines = vec![
        format!("name:   {}", lead.name),
        format!("email:  {}", lead.email),
        format!("phone:  {}", lead.phone),
        format!(
            "origin: {}",
            lead.origin.clone().unwrap_or_else(|| "-".to_owned())
        ),
        format!("since:  {}", format_timestamp(lead.created_at)),
        format!("stage:  {}", lead.status.label()),
        String::new(),
        "history:".to_owned(),
    ];

    if lead.interactions.is_empty() {
        lines.push("  (no interactions yet)".to_owned());
    } else {
        for interaction in &lead.interactions {
            lines.push(format!(
                "  {}  {}",
                format_timestamp(interaction.created_at),
                interaction.content
            ));
        }
    }

    let note_marker = if detail.focus == DetailFocus::Note {
        CURSOR_MARK
    } else {
        "  "
    };
    let status_marker = if detail.focus == DetailFocus::Status {
        CURSOR_MARK
    } else {
        "  "
    };
    let status_choice = detail.status_choice.unwrap_or(lead.status);

    lines.push(String::new());
    lines.push(format!("{note_marker}note: {}", detail.note));
    lines.push(format!("{status_marker}move to: {}", status_choice.label()));
    lines.push(String::new());
    lines.push(match detail.phase {
        DetailPhase::Submitting => "saving...".to_owned(),
        _ => "[tab] switch field  [enter] save note  [esc] back".to_owned(),
    });
    lines.join("\n")
}

fn render_form_text(form: &FormUiState) -> String {
    let mut lines = Vec::new();
    for field in [FormField::Name, FormField::Email, FormField::Phone] {
        let marker = if field == form.field { CURSOR_MARK } else { "  " };
        let value = match field {
            FormField::Name => &form.input.name,
            FormField::Email => &form.input.email,
            FormField::Phone => &form.input.phone,
        };
        lines.push(format!("{marker}{}: {}", field.label(), value));
    }
    lines.push(String::new());
    lines.push("[tab] next field  [enter] create lead  [esc] back".to_owned());
    lines.join("\n")
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if let Some(status) = &state.status_line {
        return status.clone();
    }
    if view_data.help_visible {
        return "press any key to close help".to_owned();
    }
    route_hint(&state.route).to_owned()
}

fn route_hint(route: &Route) -> &'static str {
    match route {
        Route::Kanban => {
            "h/l column  j/k card  space grab/drop  enter open  n new  2 queue  r reload  ? help  q quit"
        }
        Route::Queue => {
            "j/k row  h/l change stage  enter open  n new  1 kanban  r reload  ? help  q quit"
        }
        Route::LeadDetail(_) => "tab switch field  enter save note  esc back",
        Route::NewLead => "tab next field  enter create  esc back",
    }
}

fn help_overlay_text() -> &'static str {
    "navigation\n\
     \x20 1        kanban board\n\
     \x20 2        queue\n\
     \x20 n        new lead form\n\
     \x20 r        reload from server\n\
     \x20 q        quit (ctrl-q anywhere)\n\
     \n\
     kanban\n\
     \x20 h/l j/k  move cursor\n\
     \x20 space    pick up / drop card\n\
     \x20 esc      cancel a pick-up\n\
     \x20 enter    open lead\n\
     \n\
     queue\n\
     \x20 h/l      move lead to previous/next stage\n\
     \x20 enter    open lead"
}

fn format_timestamp(value: Option<OffsetDateTime>) -> String {
    match value {
        Some(when) => format!("{} {:02}:{:02}", when.date(), when.hour(), when.minute()),
        None => "-".to_owned(),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
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
        .split(popup_layout[1])[1]
}
