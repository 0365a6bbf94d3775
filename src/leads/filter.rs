//! Filter/search predicate engine for the leads list.
//!
//! Four independent inputs (free-text query, status, priority, source) are
//! combined with logical AND. Discrete filters use `None` as the "all"
//! sentinel. The filtered index list is cached and recomputed only when an
//! input changes or the snapshot is replaced.

use super::{Lead, LeadStatus, Priority};

pub struct LeadFilter {
    query: String,
    status: Option<LeadStatus>,
    priority: Option<Priority>,
    source: Option<String>,

    // Cached indices into the snapshot this filter was last applied to.
    cache: Vec<usize>,
    dirty: bool,
}

impl Default for LeadFilter {
    fn default() -> Self {
        Self {
            query: String::new(),
            status: None,
            priority: None,
            source: None,
            cache: Vec::new(),
            dirty: true,
        }
    }
}

impl LeadFilter {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn status(&self) -> Option<LeadStatus> {
        self.status
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.query.is_empty()
            && self.status.is_none()
            && self.priority.is_none()
            && self.source.is_none()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.query {
            self.query = query;
            self.dirty = true;
        }
    }

    pub fn set_status(&mut self, status: Option<LeadStatus>) {
        if status != self.status {
            self.status = status;
            self.dirty = true;
        }
    }

    pub fn set_priority(&mut self, priority: Option<Priority>) {
        if priority != self.priority {
            self.priority = priority;
            self.dirty = true;
        }
    }

    pub fn set_source(&mut self, source: Option<String>) {
        if source != self.source {
            self.source = source;
            self.dirty = true;
        }
    }

    /// Cycle the status filter: all -> New -> ... -> Lost -> all.
    pub fn cycle_status(&mut self) {
        let next = match self.status {
            None => Some(LeadStatus::ALL[0]),
            Some(s) => {
                let idx = LeadStatus::ALL.iter().position(|&v| v == s).unwrap_or(0);
                LeadStatus::ALL.get(idx + 1).copied()
            }
        };
        self.set_status(next);
    }

    pub fn cycle_priority(&mut self) {
        let next = match self.priority {
            None => Some(Priority::ALL[0]),
            Some(p) => {
                let idx = Priority::ALL.iter().position(|&v| v == p).unwrap_or(0);
                Priority::ALL.get(idx + 1).copied()
            }
        };
        self.set_priority(next);
    }

    /// Cycle the source filter through the distinct sources of the current
    /// snapshot, then back to the all sentinel.
    pub fn cycle_source(&mut self, sources: &[String]) {
        let next = match &self.source {
            None => sources.first().cloned(),
            Some(s) => {
                let idx = sources.iter().position(|v| v == s);
                match idx {
                    Some(i) => sources.get(i + 1).cloned(),
                    None => None, // Stale value (snapshot changed); reset.
                }
            }
        };
        self.set_source(next);
    }

    pub fn reset(&mut self) {
        self.set_query(String::new());
        self.set_status(None);
        self.set_priority(None);
        self.set_source(None);
    }

    /// Force recomputation on next apply. Call when the snapshot changes.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Whether a single lead passes all four predicates.
    pub fn matches(&self, lead: &Lead) -> bool {
        if let Some(status) = self.status {
            if lead.status != status {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if lead.priority != priority {
                return false;
            }
        }
        if let Some(source) = &self.source {
            if &lead.source != source {
                return false;
            }
        }
        if self.query.is_empty() {
            return true;
        }

        let needle = self.query.to_lowercase();
        let text_match = lead.name.to_lowercase().contains(&needle)
            || lead
                .email
                .as_ref()
                .map(|e| e.to_lowercase().contains(&needle))
                .unwrap_or(false)
            || lead
                .company
                .as_ref()
                .map(|c| c.to_lowercase().contains(&needle))
                .unwrap_or(false)
            // Phone is matched verbatim, no normalization of separators.
            || lead
                .phone
                .as_ref()
                .map(|p| p.contains(&self.query))
                .unwrap_or(false);
        text_match
    }

    /// Last computed filtered indices. Only meaningful after [`apply`];
    /// the app recomputes eagerly after every input change so rendering
    /// can stay on a shared borrow.
    ///
    /// [`apply`]: LeadFilter::apply
    pub fn cached(&self) -> &[usize] {
        &self.cache
    }

    /// Indices of leads passing the filter, in snapshot order. Recomputes
    /// only when an input changed since the last call.
    pub fn apply<'a>(&'a mut self, leads: &[Lead]) -> &'a [usize] {
        if self.dirty {
            self.cache = leads
                .iter()
                .enumerate()
                .filter(|(_, lead)| self.matches(lead))
                .map(|(i, _)| i)
                .collect();
            self.dirty = false;
            tracing::trace!(
                matched = self.cache.len(),
                total = leads.len(),
                "recomputed lead filter"
            );
        }
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::Lead;

    fn lead(id: &str, name: &str, email: Option<&str>) -> Lead {
        let mut l = Lead::blank(id.to_string());
        l.name = name.to_string();
        l.email = email.map(String::from);
        l
    }

    #[test]
    fn test_unconstrained_filter_is_identity() {
        let leads = vec![
            lead("1", "Acme Corp", Some("x@x.com")),
            lead("2", "Other", Some("acme@y.com")),
            lead("3", "Third", None),
        ];
        let mut filter = LeadFilter::default();
        assert!(filter.is_unconstrained());
        let matched = filter.apply(&leads);
        assert_eq!(matched, &[0, 1, 2]);
    }

    #[test]
    fn test_result_is_subset_of_input() {
        let leads = vec![
            lead("1", "Acme Corp", None),
            lead("2", "Beta LLC", None),
        ];
        let mut filter = LeadFilter::default();
        filter.set_query("zzz-no-match");
        filter.set_status(Some(LeadStatus::Qualified));
        let matched = filter.apply(&leads).to_vec();
        assert!(matched.iter().all(|&i| i < leads.len()));
        assert!(matched.len() <= leads.len());
    }

    #[test]
    fn test_query_matches_name_or_email() {
        // "acme" hits the first lead by name and the second by email.
        let leads = vec![
            lead("1", "Acme Corp", Some("x@x.com")),
            lead("2", "Other", Some("acme@y.com")),
        ];
        let mut filter = LeadFilter::default();
        filter.set_query("acme");
        assert_eq!(filter.apply(&leads), &[0, 1]);
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let leads = vec![lead("1", "ACME Corp", None)];
        let mut filter = LeadFilter::default();
        filter.set_query("aCmE");
        assert_eq!(filter.apply(&leads).len(), 1);
    }

    #[test]
    fn test_query_matches_company_and_phone() {
        let mut a = lead("1", "Contact A", None);
        a.company = Some("Globex".to_string());
        let mut b = lead("2", "Contact B", None);
        b.phone = Some("+1-555-0199".to_string());

        let leads = vec![a, b];
        let mut filter = LeadFilter::default();
        filter.set_query("globex");
        assert_eq!(filter.apply(&leads), &[0]);

        filter.set_query("555-01");
        assert_eq!(filter.apply(&leads), &[1]);
    }

    #[test]
    fn test_absent_fields_do_not_match_or_panic() {
        let leads = vec![lead("1", "No Contact Info", None)];
        let mut filter = LeadFilter::default();
        filter.set_query("@");
        assert!(filter.apply(&leads).is_empty());
    }

    #[test]
    fn test_status_filter_exact_match() {
        let mut leads: Vec<Lead> = (0..10)
            .map(|i| lead(&i.to_string(), &format!("Lead {i}"), None))
            .collect();
        leads[1].status = LeadStatus::Qualified;
        leads[4].status = LeadStatus::Qualified;
        leads[7].status = LeadStatus::Qualified;

        let mut filter = LeadFilter::default();
        filter.set_status(Some(LeadStatus::Qualified));
        assert_eq!(filter.apply(&leads).len(), 3);
    }

    #[test]
    fn test_predicates_combine_with_and() {
        let mut a = lead("1", "Acme Corp", None);
        a.status = LeadStatus::Qualified;
        a.priority = Priority::High;
        let mut b = lead("2", "Acme West", None);
        b.status = LeadStatus::Qualified;
        b.priority = Priority::Low;

        let leads = vec![a, b];
        let mut filter = LeadFilter::default();
        filter.set_query("acme");
        filter.set_status(Some(LeadStatus::Qualified));
        filter.set_priority(Some(Priority::High));
        assert_eq!(filter.apply(&leads), &[0]);
    }

    #[test]
    fn test_source_filter_and_cycling() {
        let mut a = lead("1", "A", None);
        a.source = "website".to_string();
        let mut b = lead("2", "B", None);
        b.source = "referral".to_string();
        let leads = vec![a, b];
        let sources = crate::leads::distinct_sources(&leads);

        let mut filter = LeadFilter::default();
        filter.cycle_source(&sources);
        assert_eq!(filter.source(), Some("referral"));
        assert_eq!(filter.apply(&leads), &[1]);

        filter.cycle_source(&sources);
        assert_eq!(filter.source(), Some("website"));
        filter.cycle_source(&sources);
        assert_eq!(filter.source(), None);
    }

    #[test]
    fn test_cache_recomputes_after_invalidate() {
        let mut leads = vec![lead("1", "Acme", None)];
        let mut filter = LeadFilter::default();
        assert_eq!(filter.apply(&leads).len(), 1);

        leads.push(lead("2", "Beta", None));
        // Without invalidation the cache is stale by design.
        filter.invalidate();
        assert_eq!(filter.apply(&leads).len(), 2);
    }
}
