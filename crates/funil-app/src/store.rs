// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Lead, LeadId, LeadStatus};

/// The in-memory lead collection owned by the list views. Replaced wholesale
/// on every navigation into the kanban or queue route; mutated in place by
/// the local phase of a status update.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LeadList {
    leads: Vec<Lead>,
}

impl LeadList {
    pub fn new(leads: Vec<Lead>) -> Self {
        Self { leads }
    }

    pub fn replace_all(&mut self, leads: Vec<Lead>) {
        self.leads = leads;
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    pub fn get(&self, id: &LeadId) -> Option<&Lead> {
        self.leads.iter().find(|lead| &lead.id == id)
    }

    /// Local phase of a status update: rewrite the matching lead's status
    /// before any network round trip. Returns false when the id is unknown.
    pub fn set_status(&mut self, id: &LeadId, status: LeadStatus) -> bool {
        match self.leads.iter_mut().find(|lead| &lead.id == id) {
            Some(lead) => {
                lead.status = status;
                true
            }
            None => false,
        }
    }

    /// Leads in one kanban column, preserving list order.
    pub fn column(&self, status: LeadStatus) -> Vec<&Lead> {
        self.leads
            .iter()
            .filter(|lead| lead.status == status)
            .collect()
    }

    pub fn column_len(&self, status: LeadStatus) -> usize {
        self.leads
            .iter()
            .filter(|lead| lead.status == status)
            .count()
    }

    /// Lead at a given position within a column, counting in list order.
    pub fn card_at(&self, status: LeadStatus, index: usize) -> Option<&Lead> {
        self.column(status).into_iter().nth(index)
    }
}

#[cfg(test)]
mod tests {
    use super::LeadList;
    use crate::{Lead, LeadId, LeadStatus};

    fn lead(id: &str, name: &str, status: LeadStatus) -> Lead {
        Lead {
            id: LeadId::from(id),
            name: name.to_owned(),
            email: format!("{}@example.com", id),
            phone: String::new(),
            status,
            origin: None,
            created_at: None,
            interactions: Vec::new(),
        }
    }

    fn sample_list() -> LeadList {
        LeadList::new(vec![
            lead("1", "Ana", LeadStatus::Novo),
            lead("2", "Bruno", LeadStatus::Proposta),
            lead("3", "Clara", LeadStatus::Novo),
            lead("4", "Davi", LeadStatus::Ganho),
        ])
    }

    #[test]
    fn columns_partition_leads_exhaustively_and_disjointly() {
        let list = sample_list();
        let total: usize = LeadStatus::ALL
            .iter()
            .map(|status| list.column_len(*status))
            .sum();
        assert_eq!(total, list.len());

        for lead in list.leads() {
            let homes = LeadStatus::ALL
                .iter()
                .filter(|status| list.column(**status).iter().any(|l| l.id == lead.id))
                .count();
            assert_eq!(homes, 1, "lead {} must live in exactly one column", lead.id);
        }
    }

    #[test]
    fn column_preserves_list_order() {
        let list = sample_list();
        let novos = list.column(LeadStatus::Novo);
        assert_eq!(novos.len(), 2);
        assert_eq!(novos[0].name, "Ana");
        assert_eq!(novos[1].name, "Clara");
    }

    #[test]
    fn set_status_rewrites_matching_lead_immediately() {
        let mut list = sample_list();
        assert!(list.set_status(&LeadId::from("3"), LeadStatus::Perdido));
        assert_eq!(
            list.get(&LeadId::from("3")).map(|lead| lead.status),
            Some(LeadStatus::Perdido)
        );
        assert_eq!(list.column_len(LeadStatus::Novo), 1);
        assert_eq!(list.column_len(LeadStatus::Perdido), 1);
    }

    #[test]
    fn set_status_for_unknown_id_is_a_noop() {
        let mut list = sample_list();
        let before = list.clone();
        assert!(!list.set_status(&LeadId::from("missing"), LeadStatus::Ganho));
        assert_eq!(list, before);
    }

    #[test]
    fn replace_all_discards_previous_snapshot() {
        let mut list = sample_list();
        list.replace_all(vec![lead("9", "Eva", LeadStatus::EmAtendimento)]);
        assert_eq!(list.len(), 1);
        assert!(list.get(&LeadId::from("1")).is_none());
    }

    #[test]
    fn card_at_indexes_within_a_column() {
        let list = sample_list();
        assert_eq!(
            list.card_at(LeadStatus::Novo, 1).map(|lead| lead.name.as_str()),
            Some("Clara")
        );
        assert!(list.card_at(LeadStatus::Novo, 2).is_none());
        assert!(list.card_at(LeadStatus::EmAtendimento, 0).is_none());
    }
}
