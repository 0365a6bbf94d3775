pub mod columns;
pub mod demo;
pub mod filter;
pub mod selection;
pub mod view;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sales pipeline stage of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 7] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Proposal,
        LeadStatus::Negotiation,
        LeadStatus::ClosedWon,
        LeadStatus::ClosedLost,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Qualified => "Qualified",
            LeadStatus::Proposal => "Proposal",
            LeadStatus::Negotiation => "Negotiation",
            LeadStatus::ClosedWon => "Won",
            LeadStatus::ClosedLost => "Lost",
        }
    }

    /// Next stage in the pipeline, used by the status-transition action.
    pub fn advanced(&self) -> LeadStatus {
        match self {
            LeadStatus::New => LeadStatus::Contacted,
            LeadStatus::Contacted => LeadStatus::Qualified,
            LeadStatus::Qualified => LeadStatus::Proposal,
            LeadStatus::Proposal => LeadStatus::Negotiation,
            LeadStatus::Negotiation => LeadStatus::ClosedWon,
            LeadStatus::ClosedWon => LeadStatus::ClosedWon,
            LeadStatus::ClosedLost => LeadStatus::ClosedLost,
        }
    }
}

impl Default for LeadStatus {
    fn default() -> Self {
        LeadStatus::New
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// A prospective-customer record tracked through the sales pipeline.
///
/// Everything except id, name, status and priority is optional: records
/// arrive from a generic business-record API and may be sparse. Absent
/// fields display as empty and never match the text search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    /// Where the lead came from ("website", "referral", ...). Free-form
    /// string; the discrete source filter matches it exactly.
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_follow_up: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    // Postal address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    // Firmographics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub territory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_revenue: Option<f64>,
}

impl Lead {
    /// A mostly-empty lead, used by the create form.
    pub fn blank(id: String) -> Self {
        Lead {
            id,
            name: String::new(),
            email: None,
            phone: None,
            company: None,
            job_title: None,
            source: String::new(),
            status: LeadStatus::New,
            priority: Priority::Medium,
            estimated_value: None,
            last_activity: None,
            next_follow_up: None,
            owner: None,
            notes: None,
            street: None,
            city: None,
            state: None,
            postal_code: None,
            country: None,
            industry: None,
            territory: None,
            lead_score: None,
            website: None,
            employee_count: None,
            annual_revenue: None,
        }
    }

    pub fn follow_up_due(&self, now: DateTime<Utc>) -> bool {
        self.next_follow_up.map(|t| t <= now).unwrap_or(false)
    }
}

/// Distinct lead sources present in a snapshot, sorted, for cycling the
/// source filter. Empty sources are skipped.
pub fn distinct_sources(leads: &[Lead]) -> Vec<String> {
    let mut sources: Vec<String> = leads
        .iter()
        .filter(|l| !l.source.is_empty())
        .map(|l| l.source.clone())
        .collect();
    sources.sort();
    sources.dedup();
    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_tolerates_sparse_payload() {
        // Only id and name present; everything else defaults.
        let lead: Lead = serde_json::from_str(r#"{"id":"l1","name":"Acme Corp"}"#).unwrap();
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.priority, Priority::Medium);
        assert!(lead.email.is_none());
        assert!(lead.source.is_empty());
    }

    #[test]
    fn test_status_snake_case_wire_format() {
        let lead: Lead =
            serde_json::from_str(r#"{"id":"l1","name":"x","status":"closed_won"}"#).unwrap();
        assert_eq!(lead.status, LeadStatus::ClosedWon);
        let json = serde_json::to_string(&lead).unwrap();
        assert!(json.contains("\"closed_won\""));
    }

    #[test]
    fn test_distinct_sources_sorted_deduped() {
        let mut a = Lead::blank("a".into());
        a.source = "website".into();
        let mut b = Lead::blank("b".into());
        b.source = "referral".into();
        let mut c = Lead::blank("c".into());
        c.source = "website".into();
        let d = Lead::blank("d".into()); // empty source skipped

        let sources = distinct_sources(&[a, b, c, d]);
        assert_eq!(sources, vec!["referral".to_string(), "website".to_string()]);
    }

    #[test]
    fn test_advanced_stops_at_terminal_stages() {
        assert_eq!(LeadStatus::Negotiation.advanced(), LeadStatus::ClosedWon);
        assert_eq!(LeadStatus::ClosedWon.advanced(), LeadStatus::ClosedWon);
        assert_eq!(LeadStatus::ClosedLost.advanced(), LeadStatus::ClosedLost);
    }
}
