//! Bundled sample leads for `--demo` mode, so the dashboard runs with no
//! backend configured.

use chrono::{Duration, Utc};

use super::{Lead, LeadStatus, Priority};

pub fn sample_leads() -> Vec<Lead> {
    let now = Utc::now();
    let mut leads = Vec::new();

    let mut l = Lead::blank("lead-1001".to_string());
    l.name = "Dana Whitfield".to_string();
    l.email = Some("dana@acmecorp.example".to_string());
    l.phone = Some("+1-555-0142".to_string());
    l.company = Some("Acme Corp".to_string());
    l.job_title = Some("VP Operations".to_string());
    l.source = "website".to_string();
    l.status = LeadStatus::Qualified;
    l.priority = Priority::High;
    l.estimated_value = Some(48_000.0);
    l.last_activity = Some(now - Duration::days(2));
    l.next_follow_up = Some(now - Duration::hours(3)); // overdue
    l.owner = Some("sam".to_string());
    l.industry = Some("Manufacturing".to_string());
    l.lead_score = Some(82);
    leads.push(l);

    let mut l = Lead::blank("lead-1002".to_string());
    l.name = "Marcus Oyelaran".to_string();
    l.email = Some("m.oyelaran@globex.example".to_string());
    l.company = Some("Globex".to_string());
    l.source = "referral".to_string();
    l.status = LeadStatus::Proposal;
    l.priority = Priority::High;
    l.estimated_value = Some(125_000.0);
    l.last_activity = Some(now - Duration::days(1));
    l.next_follow_up = Some(now + Duration::days(2));
    l.owner = Some("riley".to_string());
    l.lead_score = Some(91);
    leads.push(l);

    let mut l = Lead::blank("lead-1003".to_string());
    l.name = "Priya Natarajan".to_string();
    l.phone = Some("+44 20 5550 8812".to_string());
    l.company = Some("Initech Ltd".to_string());
    l.source = "cold_call".to_string();
    l.status = LeadStatus::Contacted;
    l.priority = Priority::Medium;
    l.estimated_value = Some(12_500.0);
    l.territory = Some("EMEA".to_string());
    leads.push(l);

    let mut l = Lead::blank("lead-1004".to_string());
    l.name = "Jonas Eriksen".to_string();
    l.email = Some("jonas@umbrella.example".to_string());
    l.company = Some("Umbrella Logistics".to_string());
    l.source = "trade_show".to_string();
    l.status = LeadStatus::New;
    l.priority = Priority::Low;
    l.city = Some("Oslo".to_string());
    l.country = Some("Norway".to_string());
    leads.push(l);

    let mut l = Lead::blank("lead-1005".to_string());
    l.name = "Helena Ruiz".to_string();
    l.email = Some("h.ruiz@vandelay.example".to_string());
    l.company = Some("Vandelay Industries".to_string());
    l.source = "website".to_string();
    l.status = LeadStatus::Negotiation;
    l.priority = Priority::High;
    l.estimated_value = Some(67_400.0);
    l.next_follow_up = Some(now + Duration::days(1));
    l.owner = Some("sam".to_string());
    l.lead_score = Some(77);
    leads.push(l);

    let mut l = Lead::blank("lead-1006".to_string());
    l.name = "Theo Brandt".to_string();
    l.company = Some("Wayne Retail".to_string());
    l.source = "email_campaign".to_string();
    l.status = LeadStatus::ClosedWon;
    l.priority = Priority::Medium;
    l.estimated_value = Some(23_000.0);
    l.last_activity = Some(now - Duration::days(12));
    leads.push(l);

    let mut l = Lead::blank("lead-1007".to_string());
    l.name = "Aiko Tanaka".to_string();
    l.email = Some("a.tanaka@soylent.example".to_string());
    l.company = Some("Soylent Foods".to_string());
    l.source = "referral".to_string();
    l.status = LeadStatus::ClosedLost;
    l.priority = Priority::Low;
    l.notes = Some("Went with incumbent vendor; revisit next fiscal year.".to_string());
    leads.push(l);

    let mut l = Lead::blank("lead-1008".to_string());
    l.name = "Samir Haddad".to_string();
    l.phone = Some("+971 4 555 0033".to_string());
    l.company = Some("Stark Distribution".to_string());
    l.source = "website".to_string();
    l.status = LeadStatus::Qualified;
    l.priority = Priority::Medium;
    l.estimated_value = Some(39_900.0);
    l.territory = Some("MENA".to_string());
    l.employee_count = Some(220);
    leads.push(l);

    leads
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_ids_are_unique() {
        let leads = sample_leads();
        let mut ids: Vec<&str> = leads.iter().map(|l| l.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), leads.len());
    }

    #[test]
    fn test_sample_covers_all_pipeline_stages_used_by_filters() {
        let leads = sample_leads();
        assert!(leads.iter().any(|l| l.status == LeadStatus::Qualified));
        assert!(leads.iter().any(|l| l.status == LeadStatus::ClosedWon));
        assert!(leads.iter().any(|l| l.follow_up_due(Utc::now())));
        assert!(crate::leads::distinct_sources(&leads).len() >= 3);
    }
}
