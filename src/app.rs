use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use std::time::Instant;

use crate::api;
use crate::config::AppConfig;
use crate::leads::columns::{VisibleColumns, REGISTRY};
use crate::leads::filter::LeadFilter;
use crate::leads::selection::Selection;
use crate::leads::view::ViewSwitch;
use crate::leads::{self, demo, Lead};

/// Seconds a status message stays on screen.
const STATUS_MESSAGE_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
    Confirm,  // Bulk delete confirmation
    Form,     // Create/edit lead
    Columns,  // Column picker
}

/// Where lead records come from and where mutations go.
pub enum Backend {
    Api(api::Client),
    /// In-memory sample data, no network (--demo).
    Demo,
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
}

/// Field-at-a-time popup editor for creating or editing a lead.
#[derive(Debug, Clone)]
pub struct LeadForm {
    pub fields: Vec<FormField>,
    pub active: usize,
    /// Id of the lead being edited; None when creating.
    pub editing: Option<String>,
}

const FORM_NAME: usize = 0;
const FORM_COMPANY: usize = 1;
const FORM_EMAIL: usize = 2;
const FORM_PHONE: usize = 3;
const FORM_TITLE: usize = 4;
const FORM_SOURCE: usize = 5;
const FORM_VALUE: usize = 6;
const FORM_NOTES: usize = 7;

impl LeadForm {
    fn blank() -> Self {
        let fields = [
            "Name", "Company", "Email", "Phone", "Job title", "Source", "Est. value", "Notes",
        ]
        .iter()
        .map(|label| FormField {
            label,
            value: String::new(),
        })
        .collect();
        Self {
            fields,
            active: 0,
            editing: None,
        }
    }

    fn from_lead(lead: &Lead) -> Self {
        let mut form = Self::blank();
        form.editing = Some(lead.id.clone());
        form.fields[FORM_NAME].value = lead.name.clone();
        form.fields[FORM_COMPANY].value = lead.company.clone().unwrap_or_default();
        form.fields[FORM_EMAIL].value = lead.email.clone().unwrap_or_default();
        form.fields[FORM_PHONE].value = lead.phone.clone().unwrap_or_default();
        form.fields[FORM_TITLE].value = lead.job_title.clone().unwrap_or_default();
        form.fields[FORM_SOURCE].value = lead.source.clone();
        form.fields[FORM_VALUE].value = lead
            .estimated_value
            .map(|v| format!("{v}"))
            .unwrap_or_default();
        form.fields[FORM_NOTES].value = lead.notes.clone().unwrap_or_default();
        form
    }

    fn non_empty(value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Apply the form fields onto a lead record.
    fn write_into(&self, lead: &mut Lead) {
        lead.name = self.fields[FORM_NAME].value.trim().to_string();
        lead.company = Self::non_empty(&self.fields[FORM_COMPANY].value);
        lead.email = Self::non_empty(&self.fields[FORM_EMAIL].value);
        lead.phone = Self::non_empty(&self.fields[FORM_PHONE].value);
        lead.job_title = Self::non_empty(&self.fields[FORM_TITLE].value);
        lead.source = self.fields[FORM_SOURCE].value.trim().to_string();
        lead.estimated_value = self.fields[FORM_VALUE].value.trim().parse::<f64>().ok();
        lead.notes = Self::non_empty(&self.fields[FORM_NOTES].value);
    }
}

pub struct App {
    pub popup: Popup,

    // Data snapshot and derived view state
    pub leads: Vec<Lead>,
    pub filter: LeadFilter,
    pub selection: Selection,
    pub columns: VisibleColumns,
    pub view: ViewSwitch,

    /// Cursor position within the filtered list.
    pub cursor: usize,
    /// Cursor within the column picker popup.
    pub column_cursor: usize,

    /// Live free-text search input is active.
    pub searching: bool,

    pub form: Option<LeadForm>,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    pub config: AppConfig,
    backend: Backend,

    last_refresh: Instant,
    followups_notified: bool,
}

impl App {
    pub async fn new(config: AppConfig, backend: Backend, initial_width: u16) -> Result<Self> {
        let view = ViewSwitch::new(initial_width, config.narrow_width);
        let mut app = Self {
            popup: Popup::None,
            leads: Vec::new(),
            filter: LeadFilter::default(),
            selection: Selection::default(),
            columns: VisibleColumns::default(),
            view,
            cursor: 0,
            column_cursor: 0,
            searching: false,
            form: None,
            status_message: None,
            status_message_time: None,
            config,
            backend,
            last_refresh: Instant::now(),
            followups_notified: false,
        };
        app.reload().await;
        Ok(app)
    }

    /// Set a status message (auto-clears after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Whether the main loop may treat 'q' as quit.
    pub fn accepts_global_keys(&self) -> bool {
        self.popup == Popup::None && !self.searching
    }

    /// Ids of the currently filtered leads, in snapshot order.
    pub fn filtered_ids(&self) -> Vec<&str> {
        self.filter
            .cached()
            .iter()
            .map(|&i| self.leads[i].id.as_str())
            .collect()
    }

    pub fn filtered_leads(&self) -> Vec<&Lead> {
        self.filter.cached().iter().map(|&i| &self.leads[i]).collect()
    }

    pub fn cursor_lead(&self) -> Option<&Lead> {
        self.filter
            .cached()
            .get(self.cursor)
            .map(|&i| &self.leads[i])
    }

    /// Recompute the filtered set, reconcile the selection against it and
    /// clamp the cursor. Runs after every filter or snapshot change.
    fn refresh_filter(&mut self) {
        self.filter.apply(&self.leads);
        let ids: Vec<&str> = self
            .filter
            .cached()
            .iter()
            .map(|&i| self.leads[i].id.as_str())
            .collect();
        self.selection.retain(ids.iter().copied());

        let len = self.filter.cached().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    fn replace_snapshot(&mut self, leads: Vec<Lead>) {
        self.leads = leads;
        self.filter.invalidate();
        self.refresh_filter();
    }

    /// Fetch the latest snapshot. Always operates on whatever arrives last;
    /// there is no coordination against superseded requests.
    pub async fn reload(&mut self) {
        match &self.backend {
            Backend::Demo => {
                let leads = demo::sample_leads();
                let count = leads.len();
                self.replace_snapshot(leads);
                self.set_status(format!("Loaded {count} sample leads"));
            }
            Backend::Api(client) => match client.fetch_leads().await {
                Ok(leads) => {
                    let count = leads.len();
                    self.replace_snapshot(leads);
                    self.set_status(format!("Loaded {count} leads"));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "lead fetch failed");
                    self.set_status(format!("Load failed: {e} (R retries)"));
                }
            },
        }
        self.last_refresh = Instant::now();
    }

    pub fn on_resize(&mut self, width: u16) {
        self.view.on_resize(width);
    }

    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.searching {
            self.handle_search_key(key);
            return Ok(());
        }
        match self.popup {
            Popup::None => self.handle_normal_key(key).await,
            Popup::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc
                        | KeyCode::Char('?')
                        | KeyCode::Char('h')
                        | KeyCode::Enter
                        | KeyCode::Char('q')
                ) {
                    self.popup = Popup::None;
                }
                Ok(())
            }
            Popup::Confirm => self.handle_confirm_key(key).await,
            Popup::Columns => {
                self.handle_columns_key(key);
                Ok(())
            }
            Popup::Form => self.handle_form_key(key).await,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                // Esc abandons the query entirely.
                self.searching = false;
                self.filter.set_query(String::new());
                self.refresh_filter();
            }
            KeyCode::Enter => self.searching = false,
            KeyCode::Backspace => {
                let mut query = self.filter.query().to_string();
                query.pop();
                self.filter.set_query(query);
                self.refresh_filter();
            }
            KeyCode::Char(c) => {
                // Live filtering on every keystroke, no debounce.
                let mut query = self.filter.query().to_string();
                query.push(c);
                self.filter.set_query(query);
                self.refresh_filter();
            }
            _ => {}
        }
    }

    async fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            // Vertical navigation over the filtered list
            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),

            // Filters
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Char('s') => {
                self.filter.cycle_status();
                self.refresh_filter();
            }
            KeyCode::Char('p') => {
                self.filter.cycle_priority();
                self.refresh_filter();
            }
            KeyCode::Char('o') => {
                let sources = leads::distinct_sources(&self.leads);
                self.filter.cycle_source(&sources);
                self.refresh_filter();
            }
            KeyCode::Char('x') => {
                self.filter.reset();
                self.refresh_filter();
                self.set_status("Filters cleared");
            }

            // Selection
            KeyCode::Char(' ') => {
                if let Some(id) = self.cursor_lead().map(|l| l.id.clone()) {
                    self.selection.toggle(&id);
                }
            }
            KeyCode::Char('a') => {
                let ids: Vec<String> = self.filtered_ids().iter().map(|s| s.to_string()).collect();
                self.selection.toggle_all(ids.iter().map(String::as_str));
            }

            // View
            KeyCode::Char('v') => self.view.toggle(),
            KeyCode::Char('c') => {
                self.column_cursor = 0;
                self.popup = Popup::Columns;
            }

            // Lead actions
            KeyCode::Char('n') => {
                self.form = Some(LeadForm::blank());
                self.popup = Popup::Form;
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(lead) = self.cursor_lead() {
                    self.form = Some(LeadForm::from_lead(lead));
                    self.popup = Popup::Form;
                }
            }
            KeyCode::Char('>') => self.advance_cursor_status().await?,
            KeyCode::Char('d') | KeyCode::Delete => {
                if self.selection.is_empty() {
                    self.set_status("Nothing selected (Space marks rows)");
                } else {
                    self.set_status(format!("Delete {} lead(s)? (y/n)", self.selection.len()));
                    self.popup = Popup::Confirm;
                }
            }

            // Refresh
            KeyCode::Char('R') => self.reload().await,

            // Help (? or h)
            KeyCode::Char('?') | KeyCode::Char('h') => self.popup = Popup::Help,

            _ => {}
        }
        Ok(())
    }

    fn move_down(&mut self) {
        let len = self.filter.cached().len();
        if len > 0 {
            self.cursor = (self.cursor + 1) % len;
        }
    }

    fn move_up(&mut self) {
        let len = self.filter.cached().len();
        if len > 0 {
            self.cursor = self.cursor.checked_sub(1).unwrap_or(len - 1);
        }
    }

    fn handle_columns_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('c') | KeyCode::Char('q') => self.popup = Popup::None,
            KeyCode::Char('j') | KeyCode::Down => {
                self.column_cursor = (self.column_cursor + 1) % REGISTRY.len();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.column_cursor = self
                    .column_cursor
                    .checked_sub(1)
                    .unwrap_or(REGISTRY.len() - 1);
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let id = REGISTRY[self.column_cursor].id;
                if self.columns.contains(id) && self.columns.len() == 1 {
                    self.set_status("At least one column must stay visible");
                } else {
                    self.columns.toggle(id);
                }
            }
            KeyCode::Char('r') => {
                self.columns.reset();
                self.set_status("Columns reset to defaults");
            }
            _ => {}
        }
    }

    async fn handle_confirm_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.popup = Popup::None;
                self.delete_selected().await?;
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.popup = Popup::None;
                self.set_status("Cancelled");
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(form) = self.form.as_mut() else {
            self.popup = Popup::None;
            return Ok(());
        };
        match key.code {
            KeyCode::Esc => {
                self.form = None;
                self.popup = Popup::None;
            }
            KeyCode::Tab | KeyCode::Down | KeyCode::Enter => {
                form.active = (form.active + 1) % form.fields.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.active = form.active.checked_sub(1).unwrap_or(form.fields.len() - 1);
            }
            KeyCode::Backspace => {
                form.fields[form.active].value.pop();
            }
            KeyCode::F(2) => self.submit_form().await?,
            KeyCode::Char(c) => {
                form.fields[form.active].value.push(c);
            }
            _ => {}
        }
        Ok(())
    }

    async fn submit_form(&mut self) -> Result<()> {
        let Some(form) = self.form.clone() else {
            return Ok(());
        };
        if form.fields[FORM_NAME].value.trim().is_empty() {
            self.set_status("Name is required");
            return Ok(());
        }

        match &form.editing {
            Some(id) => {
                let Some(lead) = self.leads.iter().find(|l| &l.id == id).cloned() else {
                    self.set_status("Lead vanished from the snapshot");
                    self.form = None;
                    self.popup = Popup::None;
                    return Ok(());
                };
                let mut updated = lead;
                form.write_into(&mut updated);
                updated.last_activity = Some(Utc::now());
                self.persist_update(updated).await;
            }
            None => {
                let id = format!("lead-{}", Utc::now().timestamp_millis());
                let mut lead = Lead::blank(id);
                form.write_into(&mut lead);
                lead.owner = self.config.default_owner.clone();
                lead.last_activity = Some(Utc::now());
                self.persist_create(lead).await;
            }
        }

        self.form = None;
        self.popup = Popup::None;
        Ok(())
    }

    async fn persist_create(&mut self, lead: Lead) {
        let name = lead.name.clone();
        match &self.backend {
            Backend::Demo => {
                self.leads.push(lead);
                self.filter.invalidate();
                self.refresh_filter();
                self.set_status(format!("Created lead: {name}"));
            }
            Backend::Api(client) => match client.create_lead(&lead).await {
                Ok(()) => {
                    self.set_status(format!("Created lead: {name}"));
                    self.reload().await;
                }
                Err(e) => self.set_status(format!("Create failed: {e}")),
            },
        }
    }

    async fn persist_update(&mut self, lead: Lead) {
        let name = lead.name.clone();
        match &self.backend {
            Backend::Demo => {
                if let Some(existing) = self.leads.iter_mut().find(|l| l.id == lead.id) {
                    *existing = lead;
                }
                self.filter.invalidate();
                self.refresh_filter();
                self.set_status(format!("Updated {name}"));
            }
            Backend::Api(client) => match client.update_lead(&lead).await {
                Ok(()) => {
                    self.set_status(format!("Updated {name}"));
                    self.reload().await;
                }
                Err(e) => self.set_status(format!("Update failed: {e}")),
            },
        }
    }

    /// Move the cursor lead one stage forward in the pipeline.
    async fn advance_cursor_status(&mut self) -> Result<()> {
        let Some(lead) = self.cursor_lead().cloned() else {
            return Ok(());
        };
        let next = lead.status.advanced();
        if next == lead.status {
            self.set_status(format!("{} is already {}", lead.name, lead.status.label()));
            return Ok(());
        }
        let mut updated = lead;
        updated.status = next;
        updated.last_activity = Some(Utc::now());
        self.persist_update(updated).await;
        Ok(())
    }

    async fn delete_selected(&mut self) -> Result<()> {
        let ids: Vec<String> = self.selection.ids().map(String::from).collect();
        match &self.backend {
            Backend::Demo => {
                self.leads.retain(|l| !ids.contains(&l.id));
                self.selection.clear();
                self.filter.invalidate();
                self.refresh_filter();
                self.set_status(format!("Deleted {} lead(s)", ids.len()));
            }
            Backend::Api(client) => match client.delete_leads(&ids).await {
                Ok(()) => {
                    self.selection.clear();
                    self.set_status(format!("Deleted {} lead(s)", ids.len()));
                    self.reload().await;
                }
                Err(e) => {
                    self.set_status(format!("Delete failed: {e}"));
                    self.reload().await;
                }
            },
        }
        Ok(())
    }

    pub async fn tick(&mut self) -> Result<()> {
        // Clear status message after timeout
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_SECS {
                self.status_message = None;
                self.status_message_time = None;
            }
        }

        // Periodic background refresh (API mode only)
        if self.config.refresh_secs > 0
            && matches!(self.backend, Backend::Api(_))
            && self.last_refresh.elapsed().as_secs() >= self.config.refresh_secs
            && self.popup == Popup::None
        {
            self.reload().await;
        }

        // One-shot desktop notification for due follow-ups
        if self.config.notifications && !self.followups_notified {
            self.followups_notified = true;
            let now = Utc::now();
            let due = self.leads.iter().filter(|l| l.follow_up_due(now)).count();
            if due > 0 {
                let _ = notify_rust::Notification::new()
                    .summary("prospect")
                    .body(&format!("{due} lead follow-up(s) due"))
                    .icon("office-calendar")
                    .show();
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::LeadStatus;

    fn demo_app() -> App {
        // Build synchronously-shaped state without the async constructor.
        let mut app = App {
            popup: Popup::None,
            leads: Vec::new(),
            filter: LeadFilter::default(),
            selection: Selection::default(),
            columns: VisibleColumns::default(),
            view: ViewSwitch::new(120, 100),
            cursor: 0,
            column_cursor: 0,
            searching: false,
            form: None,
            status_message: None,
            status_message_time: None,
            config: AppConfig::default(),
            backend: Backend::Demo,
            last_refresh: Instant::now(),
            followups_notified: true,
        };
        app.replace_snapshot(demo::sample_leads());
        app
    }

    #[test]
    fn test_filter_change_reconciles_selection_and_cursor() {
        let mut app = demo_app();
        let all_ids: Vec<String> = app.filtered_ids().iter().map(|s| s.to_string()).collect();
        app.selection.toggle_all(all_ids.iter().map(String::as_str));
        assert_eq!(app.selection.len(), app.leads.len());
        app.cursor = app.leads.len() - 1;

        app.filter.set_status(Some(LeadStatus::Qualified));
        app.refresh_filter();

        let visible = app.filtered_ids();
        assert!(!visible.is_empty());
        assert_eq!(app.selection.len(), visible.len());
        for id in app.selection.ids() {
            assert!(visible.contains(&id));
        }
        assert!(app.cursor < visible.len());
    }

    #[test]
    fn test_form_round_trip_preserves_unedited_fields() {
        let app = demo_app();
        let original = app.leads[0].clone();
        let form = LeadForm::from_lead(&original);

        let mut updated = original.clone();
        form.write_into(&mut updated);

        assert_eq!(updated.name, original.name);
        assert_eq!(updated.email, original.email);
        assert_eq!(updated.estimated_value, original.estimated_value);
        // Fields the form does not carry stay untouched.
        assert_eq!(updated.status, original.status);
        assert_eq!(updated.lead_score, original.lead_score);
    }

    #[test]
    fn test_blank_form_parses_value_field() {
        let mut form = LeadForm::blank();
        form.fields[FORM_NAME].value = "New Co".to_string();
        form.fields[FORM_VALUE].value = "1500.5".to_string();
        let mut lead = Lead::blank("x".to_string());
        form.write_into(&mut lead);
        assert_eq!(lead.estimated_value, Some(1500.5));

        form.fields[FORM_VALUE].value = "not a number".to_string();
        form.write_into(&mut lead);
        assert_eq!(lead.estimated_value, None);
    }

    #[test]
    fn test_cursor_lead_follows_filter() {
        let mut app = demo_app();
        app.filter.set_query("acme");
        app.refresh_filter();
        let lead = app.cursor_lead().expect("one match expected");
        assert!(lead
            .company
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
            .contains("acme"));
    }
}
