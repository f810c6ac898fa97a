// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use crate::{BbStatus, BbType, FilterState, TabKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Nav,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub filter: FilterState,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            filter: FilterState::default(),
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextTab,
    PrevTab,
    SetActiveTab(TabKind),
    EnterEditMode,
    ExitToNav,
    SetSearch(String),
    ClearSearch,
    ToggleActiveOnly,
    ToggleFollowUpOnly,
    SetStatusFilter(BTreeSet<BbStatus>),
    SetTypeFilter(BTreeSet<BbType>),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    TabChanged(TabKind),
    FilterChanged,
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextTab => self.rotate_tab(1),
            AppCommand::PrevTab => self.rotate_tab(-1),
            AppCommand::SetActiveTab(tab) => {
                self.filter.tab = tab;
                vec![AppEvent::TabChanged(tab), AppEvent::FilterChanged]
            }
            AppCommand::EnterEditMode => {
                self.mode = AppMode::Edit;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ExitToNav => {
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode), self.set_status("nav")]
            }
            AppCommand::SetSearch(term) => {
                self.filter.search = term;
                vec![AppEvent::FilterChanged]
            }
            AppCommand::ClearSearch => {
                self.filter.search.clear();
                vec![AppEvent::FilterChanged, self.set_status("search cleared")]
            }
            AppCommand::ToggleActiveOnly => {
                self.filter.active_only = !self.filter.active_only;
                let label = if self.filter.active_only {
                    "active only"
                } else {
                    "inactive shown"
                };
                vec![AppEvent::FilterChanged, self.set_status(label)]
            }
            AppCommand::ToggleFollowUpOnly => {
                self.filter.follow_up_only = !self.filter.follow_up_only;
                let label = if self.filter.follow_up_only {
                    "follow-up only"
                } else {
                    "follow-up filter off"
                };
                vec![AppEvent::FilterChanged, self.set_status(label)]
            }
            AppCommand::SetStatusFilter(statuses) => {
                self.filter.statuses = statuses;
                vec![AppEvent::FilterChanged]
            }
            AppCommand::SetTypeFilter(types) => {
                self.filter.types = types;
                vec![AppEvent::FilterChanged]
            }
            AppCommand::SetStatus(message) => {
                let event = self.set_status(&message);
                vec![event]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn rotate_tab(&mut self, delta: isize) -> Vec<AppEvent> {
        let tabs = TabKind::ALL;
        let current = tabs
            .iter()
            .position(|tab| *tab == self.filter.tab)
            .unwrap_or(0) as isize;
        let len = tabs.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.filter.tab = tabs[next];
        vec![AppEvent::TabChanged(self.filter.tab), AppEvent::FilterChanged]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
