// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ids::*;

/// Pipeline stages, in funnel order. The wire strings and display labels are
/// fixed by the backend contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    Novo,
    EmAtendimento,
    Proposta,
    Ganho,
    Perdido,
}

impl LeadStatus {
    pub const ALL: [Self; 5] = [
        Self::Novo,
        Self::EmAtendimento,
        Self::Proposta,
        Self::Ganho,
        Self::Perdido,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Novo => "novo",
            Self::EmAtendimento => "em_atendimento",
            Self::Proposta => "proposta",
            Self::Ganho => "ganho",
            Self::Perdido => "perdido",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "novo" => Some(Self::Novo),
            "em_atendimento" => Some(Self::EmAtendimento),
            "proposta" => Some(Self::Proposta),
            "ganho" => Some(Self::Ganho),
            "perdido" => Some(Self::Perdido),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Novo => "Novo Lead",
            Self::EmAtendimento => "Em Atendimento",
            Self::Proposta => "Proposta",
            Self::Ganho => "Ganho",
            Self::Perdido => "Perdido",
        }
    }

    pub fn position(self) -> usize {
        Self::ALL
            .iter()
            .position(|status| *status == self)
            .unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.position() + len - 1) % len]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Nota,
}

impl InteractionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nota => "nota",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Nota => "note",
        }
    }
}

/// A timestamped note on a lead's history. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: InteractionId,
    #[serde(rename = "tipo")]
    pub kind: InteractionKind,
    #[serde(rename = "conteudo")]
    pub content: String,
    #[serde(rename = "criado_em", with = "time::serde::rfc3339::option", default)]
    pub created_at: Option<OffsetDateTime>,
}

/// A sales prospect, as returned by the backend. Field names follow the wire
/// contract; the list endpoint may omit everything but id, name, email, and
/// status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "email_primario")]
    pub email: String,
    #[serde(rename = "celular_primario", default)]
    pub phone: String,
    pub status: LeadStatus,
    #[serde(rename = "origem", default)]
    pub origin: Option<String>,
    #[serde(rename = "criado_em", with = "time::serde::rfc3339::option", default)]
    pub created_at: Option<OffsetDateTime>,
    #[serde(rename = "interacoes", default)]
    pub interactions: Vec<Interaction>,
}

#[cfg(test)]
mod tests {
    use super::{InteractionKind, Lead, LeadStatus};

    #[test]
    fn status_wire_strings_round_trip() {
        for status in LeadStatus::ALL {
            assert_eq!(LeadStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(LeadStatus::EmAtendimento.as_str(), "em_atendimento");
        assert_eq!(LeadStatus::parse("qualificado"), None);
    }

    #[test]
    fn status_serde_matches_wire_strings() {
        let encoded = serde_json::to_string(&LeadStatus::EmAtendimento).expect("encode status");
        assert_eq!(encoded, "\"em_atendimento\"");

        let decoded: LeadStatus = serde_json::from_str("\"perdido\"").expect("decode status");
        assert_eq!(decoded, LeadStatus::Perdido);
    }

    #[test]
    fn status_labels_match_column_titles() {
        assert_eq!(LeadStatus::Novo.label(), "Novo Lead");
        assert_eq!(LeadStatus::EmAtendimento.label(), "Em Atendimento");
        assert_eq!(LeadStatus::Ganho.label(), "Ganho");
    }

    #[test]
    fn status_next_and_prev_wrap_around_the_funnel() {
        assert_eq!(LeadStatus::Perdido.next(), LeadStatus::Novo);
        assert_eq!(LeadStatus::Novo.prev(), LeadStatus::Perdido);
        assert_eq!(LeadStatus::Novo.next(), LeadStatus::EmAtendimento);
    }

    #[test]
    fn lead_decodes_from_minimal_list_payload() {
        let lead: Lead = serde_json::from_str(
            r#"{"id":"1","nome":"Ana","email_primario":"a@x.com","status":"novo"}"#,
        )
        .expect("decode minimal lead");
        assert_eq!(lead.name, "Ana");
        assert_eq!(lead.status, LeadStatus::Novo);
        assert!(lead.phone.is_empty());
        assert!(lead.interactions.is_empty());
    }

    #[test]
    fn lead_decodes_detail_payload_with_interactions() {
        let lead: Lead = serde_json::from_str(
            r#"{
                "id": "5f7c",
                "nome": "Maria Silva",
                "email_primario": "maria@email.com",
                "celular_primario": "11999999999",
                "status": "proposta",
                "origem": "Landing Page Principal",
                "criado_em": "2026-08-01T12:30:00Z",
                "interacoes": [
                    {"id": "i1", "tipo": "nota", "conteudo": "Ligou pedindo proposta",
                     "criado_em": "2026-08-02T09:00:00Z"}
                ]
            }"#,
        )
        .expect("decode detail lead");
        assert_eq!(lead.status, LeadStatus::Proposta);
        assert_eq!(lead.interactions.len(), 1);
        assert_eq!(lead.interactions[0].kind, InteractionKind::Nota);
        assert_eq!(lead.interactions[0].content, "Ligou pedindo proposta");
        assert!(lead.created_at.is_some());
    }
}
