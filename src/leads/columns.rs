//! Column registry and visibility selection for the leads table.
//!
//! The registry is a fixed, ordered catalog of displayable lead attributes.
//! Users toggle a subset on and off; rendering always follows registry
//! order, not toggle order, so columns keep a stable left-to-right layout.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnId {
    Name,
    Company,
    Email,
    Phone,
    Status,
    Priority,
    Source,
    Value,
    Owner,
    LastActivity,
    FollowUp,
    Score,
}

#[derive(Debug)]
pub struct ColumnSpec {
    pub id: ColumnId,
    pub label: &'static str,
    /// Width hint in terminal cells.
    pub width: u16,
    pub sortable: bool,
}

pub const REGISTRY: &[ColumnSpec] = &[
    ColumnSpec { id: ColumnId::Name, label: "Name", width: 22, sortable: true },
    ColumnSpec { id: ColumnId::Company, label: "Company", width: 18, sortable: true },
    ColumnSpec { id: ColumnId::Email, label: "Email", width: 24, sortable: false },
    ColumnSpec { id: ColumnId::Phone, label: "Phone", width: 15, sortable: false },
    ColumnSpec { id: ColumnId::Status, label: "Status", width: 12, sortable: true },
    ColumnSpec { id: ColumnId::Priority, label: "Priority", width: 9, sortable: true },
    ColumnSpec { id: ColumnId::Source, label: "Source", width: 12, sortable: true },
    ColumnSpec { id: ColumnId::Value, label: "Value", width: 10, sortable: true },
    ColumnSpec { id: ColumnId::Owner, label: "Owner", width: 14, sortable: true },
    ColumnSpec { id: ColumnId::LastActivity, label: "Activity", width: 11, sortable: true },
    ColumnSpec { id: ColumnId::FollowUp, label: "Follow-up", width: 11, sortable: true },
    ColumnSpec { id: ColumnId::Score, label: "Score", width: 6, sortable: true },
];

const DEFAULT_VISIBLE: &[ColumnId] = &[
    ColumnId::Name,
    ColumnId::Company,
    ColumnId::Status,
    ColumnId::Priority,
    ColumnId::Value,
    ColumnId::FollowUp,
];

/// The user-selected subset of the registry. Session-only; not persisted.
#[derive(Debug, Clone)]
pub struct VisibleColumns {
    visible: Vec<ColumnId>,
}

impl Default for VisibleColumns {
    fn default() -> Self {
        Self {
            visible: DEFAULT_VISIBLE.to_vec(),
        }
    }
}

impl VisibleColumns {
    pub fn contains(&self, id: ColumnId) -> bool {
        self.visible.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    /// Toggle a column on or off. Removing the sole remaining visible
    /// column is rejected as a no-op, so the set is never empty.
    pub fn toggle(&mut self, id: ColumnId) {
        if let Some(pos) = self.visible.iter().position(|&v| v == id) {
            if self.visible.len() > 1 {
                self.visible.remove(pos);
            }
        } else {
            self.visible.push(id);
        }
    }

    pub fn reset(&mut self) {
        self.visible = DEFAULT_VISIBLE.to_vec();
    }

    /// Visible column specs in registry order, regardless of toggle order.
    pub fn render(&self) -> Vec<&'static ColumnSpec> {
        REGISTRY
            .iter()
            .filter(|spec| self.contains(spec.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_and_removes() {
        let mut cols = VisibleColumns::default();
        assert!(!cols.contains(ColumnId::Phone));
        cols.toggle(ColumnId::Phone);
        assert!(cols.contains(ColumnId::Phone));
        cols.toggle(ColumnId::Phone);
        assert!(!cols.contains(ColumnId::Phone));
    }

    #[test]
    fn test_never_below_one_visible_column() {
        let mut cols = VisibleColumns::default();
        // Toggle everything off, in registry order, twice over.
        for _ in 0..2 {
            for spec in REGISTRY {
                cols.toggle(spec.id);
            }
        }
        assert!(cols.len() >= 1);
        // And explicitly: toggling the last survivor is a no-op.
        let last = cols.render()[0].id;
        cols.toggle(last);
        assert!(cols.contains(last));
    }

    #[test]
    fn test_render_preserves_registry_order() {
        let mut cols = VisibleColumns::default();
        cols.reset();
        // Toggle in an order unrelated to the registry.
        cols.toggle(ColumnId::Score);
        cols.toggle(ColumnId::Email);

        let rendered: Vec<ColumnId> = cols.render().iter().map(|s| s.id).collect();
        let registry_order: Vec<ColumnId> = REGISTRY
            .iter()
            .filter(|s| rendered.contains(&s.id))
            .map(|s| s.id)
            .collect();
        assert_eq!(rendered, registry_order);
        // Email sits before Score even though it was toggled after.
        let email_pos = rendered.iter().position(|&i| i == ColumnId::Email).unwrap();
        let score_pos = rendered.iter().position(|&i| i == ColumnId::Score).unwrap();
        assert!(email_pos < score_pos);
    }

    #[test]
    fn test_reset_restores_default_subset() {
        let mut cols = VisibleColumns::default();
        cols.toggle(ColumnId::Name);
        cols.toggle(ColumnId::Score);
        cols.reset();
        assert_eq!(cols.len(), 6);
        assert!(cols.contains(ColumnId::Name));
        assert!(!cols.contains(ColumnId::Score));
    }
}
