// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::LeadId;

/// The four routes behind the persistent navigation shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Kanban,
    Queue,
    LeadDetail(LeadId),
    NewLead,
}

impl Route {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Kanban => "kanban",
            Self::Queue => "queue",
            Self::LeadDetail(_) => "lead",
            Self::NewLead => "new lead",
        }
    }

    /// List routes discard and refetch the lead list on every entry.
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::Kanban | Self::Queue)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub route: Route,
    pub status_line: Option<String>,
    pub alert: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            route: Route::Kanban,
            status_line: None,
            alert: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    OpenKanban,
    OpenQueue,
    OpenLead(LeadId),
    OpenNewLead,
    SetStatus(String),
    ClearStatus,
    ShowAlert(String),
    DismissAlert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    RouteChanged(Route),
    StatusUpdated(String),
    StatusCleared,
    AlertRaised(String),
    AlertDismissed,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::OpenKanban => self.navigate(Route::Kanban),
            AppCommand::OpenQueue => self.navigate(Route::Queue),
            AppCommand::OpenLead(id) => self.navigate(Route::LeadDetail(id)),
            AppCommand::OpenNewLead => self.navigate(Route::NewLead),
            AppCommand::SetStatus(message) => {
                self.status_line = Some(message.clone());
                vec![AppEvent::StatusUpdated(message)]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
            AppCommand::ShowAlert(message) => {
                self.alert = Some(message.clone());
                vec![AppEvent::AlertRaised(message)]
            }
            AppCommand::DismissAlert => {
                self.alert = None;
                vec![AppEvent::AlertDismissed]
            }
        }
    }

    // Navigation always emits, even when re-entering the current route, so
    // list views refetch on every visit.
    fn navigate(&mut self, route: Route) -> Vec<AppEvent> {
        self.route = route.clone();
        vec![AppEvent::RouteChanged(route)]
    }
}
