//! Table/cards view switching tied to terminal width.
//!
//! Narrowing below the threshold while in table mode forces cards, since a
//! wide table is unreadable there. Widening never forces table back: once a
//! user is in cards (by choice or by a narrow start) the mode is theirs to
//! change. Manual toggling is always allowed.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Table,
    Cards,
}

#[derive(Debug)]
pub struct ViewSwitch {
    mode: ViewMode,
    narrow_width: u16,
}

impl ViewSwitch {
    pub fn new(initial_width: u16, narrow_width: u16) -> Self {
        let mode = if initial_width < narrow_width {
            ViewMode::Cards
        } else {
            ViewMode::Table
        };
        Self { mode, narrow_width }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Re-evaluate on resize. Only ever forces table -> cards.
    pub fn on_resize(&mut self, width: u16) {
        if width < self.narrow_width && self.mode == ViewMode::Table {
            tracing::debug!(width, "narrow terminal, switching to card view");
            self.mode = ViewMode::Cards;
        }
    }

    pub fn toggle(&mut self) {
        self.mode = match self.mode {
            ViewMode::Table => ViewMode::Cards,
            ViewMode::Cards => ViewMode::Table,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_mode_depends_on_width() {
        assert_eq!(ViewSwitch::new(120, 100).mode(), ViewMode::Table);
        assert_eq!(ViewSwitch::new(80, 100).mode(), ViewMode::Cards);
    }

    #[test]
    fn test_narrowing_forces_cards_widening_does_not_force_table() {
        let mut view = ViewSwitch::new(120, 100);
        assert_eq!(view.mode(), ViewMode::Table);

        view.on_resize(60);
        assert_eq!(view.mode(), ViewMode::Cards);

        // Widening back respects the current (now cards) mode.
        view.on_resize(120);
        assert_eq!(view.mode(), ViewMode::Cards);
    }

    #[test]
    fn test_manual_choice_survives_widening() {
        let mut view = ViewSwitch::new(120, 100);
        view.toggle();
        assert_eq!(view.mode(), ViewMode::Cards);
        view.on_resize(200);
        assert_eq!(view.mode(), ViewMode::Cards);
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut view = ViewSwitch::new(120, 100);
        view.on_resize(60);
        view.on_resize(60);
        assert_eq!(view.mode(), ViewMode::Cards);
        view.toggle();
        assert_eq!(view.mode(), ViewMode::Table);
        // Still wide of the threshold: no forced switch.
        view.on_resize(120);
        assert_eq!(view.mode(), ViewMode::Table);
    }
}
