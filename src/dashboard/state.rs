use std::sync::Arc;

use super::search;
use crate::models::{PoolSummary, Student, Vault};

pub const ROOT_FRAGMENT: &str = "#/";

/// Data loaded in one pass. Replaced wholesale on reload, never patched.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub students: Vec<Student>,
    pub vaults: Vec<Vault>,
    pub summary: PoolSummary,
}

impl Snapshot {
    pub fn vault(&self, student_id: &str) -> Option<&Vault> {
        self.vaults.iter().find(|v| v.student_id == student_id)
    }
}

/// User interactions the dashboard reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Search input changed.
    Input(String),
    /// Enter pressed in the search input.
    Submit,
    SelectSuggestion(String),
    OpenVault(String),
    ClosePanel,
    /// Click anywhere outside the search input and suggestion list.
    ClickOutside,
}

/// UI state over one snapshot.
#[derive(Debug, Clone)]
pub struct DashboardState {
    snapshot: Arc<Snapshot>,
    search_input: String,
    suggestions: Vec<Student>,
    typeahead_visible: bool,
    open_vault: Option<String>,
    location: Option<String>,
}

impl DashboardState {
    pub fn new(snapshot: Arc<Snapshot>) -> Self {
        Self {
            snapshot,
            search_input: String::new(),
            suggestions: Vec::new(),
            typeahead_visible: false,
            open_vault: None,
            location: None,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn suggestions(&self) -> &[Student] {
        &self.suggestions
    }

    pub fn typeahead_visible(&self) -> bool {
        self.typeahead_visible
    }

    /// Location fragment last written by opening or closing the panel.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn panel_visible(&self) -> bool {
        self.open_vault.is_some()
    }

    pub fn open_vault(&self) -> Option<&Vault> {
        self.open_vault
            .as_deref()
            .and_then(|id| self.snapshot.vault(id))
    }

    pub fn handle(&mut self, event: UiEvent) {
        match event {
            UiEvent::Input(value) => self.update_typeahead(value),
            UiEvent::Submit => self.submit_search(),
            UiEvent::SelectSuggestion(student_id) => self.select_suggestion(&student_id),
            UiEvent::OpenVault(student_id) => {
                self.open_panel(&student_id);
            }
            UiEvent::ClosePanel => self.close_panel(),
            UiEvent::ClickOutside => self.typeahead_visible = false,
        }
    }

    fn update_typeahead(&mut self, value: String) {
        self.suggestions = search::suggestions(&self.snapshot.students, &value)
            .into_iter()
            .cloned()
            .collect();
        self.typeahead_visible = !self.suggestions.is_empty();
        self.search_input = value;
    }

    fn submit_search(&mut self) {
        let hit = search::resolve(&self.snapshot.students, &self.search_input)
            .map(|s| s.student_id.clone());
        if let Some(student_id) = hit {
            self.open_panel(&student_id);
        }
        self.typeahead_visible = false;
    }

    fn select_suggestion(&mut self, student_id: &str) {
        if let Some(student) = self
            .snapshot
            .students
            .iter()
            .find(|s| s.student_id == student_id)
        {
            self.search_input = student.display_name.clone();
        }
        self.typeahead_visible = false;
        self.open_panel(student_id);
    }

    /// Opens the panel for `student_id`. Unknown ids leave everything as is.
    pub fn open_panel(&mut self, student_id: &str) -> bool {
        if self.snapshot.vault(student_id).is_none() {
            return false;
        }
        self.open_vault = Some(student_id.to_string());
        self.location = Some(format!("#/vault/{}", student_id));
        true
    }

    pub fn close_panel(&mut self) {
        self.open_vault = None;
        self.location = Some(ROOT_FRAGMENT.to_string());
    }
}
