// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::LeadStatus;

/// Column and card index of a card at the start or end of a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardSlot {
    pub status: LeadStatus,
    pub index: usize,
}

impl CardSlot {
    pub const fn new(status: LeadStatus, index: usize) -> Self {
        Self { status, index }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropDecision {
    /// Dropped outside any column, or back onto its own slot.
    Ignore,
    /// The destination column's status becomes the lead's new status. A move
    /// within one column still updates, with the status unchanged.
    Move { status: LeadStatus },
}

/// Resolve a completed drag gesture into a status-update decision.
pub fn resolve_drop(source: CardSlot, destination: Option<CardSlot>) -> DropDecision {
    let Some(destination) = destination else {
        return DropDecision::Ignore;
    };
    if destination == source {
        return DropDecision::Ignore;
    }
    DropDecision::Move {
        status: destination.status,
    }
}

#[cfg(test)]
mod tests {
    use super::{CardSlot, DropDecision, resolve_drop};
    use crate::LeadStatus;

    #[test]
    fn drop_outside_any_column_is_ignored() {
        let source = CardSlot::new(LeadStatus::Novo, 0);
        assert_eq!(resolve_drop(source, None), DropDecision::Ignore);
    }

    #[test]
    fn drop_onto_own_slot_is_ignored() {
        let source = CardSlot::new(LeadStatus::Proposta, 2);
        assert_eq!(resolve_drop(source, Some(source)), DropDecision::Ignore);
    }

    #[test]
    fn drop_into_another_column_moves_to_that_status() {
        let source = CardSlot::new(LeadStatus::Novo, 1);
        let destination = CardSlot::new(LeadStatus::Ganho, 0);
        assert_eq!(
            resolve_drop(source, Some(destination)),
            DropDecision::Move {
                status: LeadStatus::Ganho
            }
        );
    }

    #[test]
    fn reorder_within_a_column_still_updates_with_unchanged_status() {
        let source = CardSlot::new(LeadStatus::Novo, 0);
        let destination = CardSlot::new(LeadStatus::Novo, 2);
        assert_eq!(
            resolve_drop(source, Some(destination)),
            DropDecision::Move {
                status: LeadStatus::Novo
            }
        );
    }
}
