// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use funil_app::{Interaction, InteractionId, InteractionKind, Lead, LeadId, LeadStatus};
use time::{Date, Duration, Month, OffsetDateTime, Time};

const FIRST_NAMES: [&str; 16] = [
    "Ana", "Bruno", "Carla", "Diego", "Elisa", "Fabio", "Gabriela", "Heitor", "Isabela", "Joao",
    "Karina", "Lucas", "Mariana", "Nicolas", "Otavia", "Paulo",
];
const LAST_NAMES: [&str; 14] = [
    "Silva", "Santos", "Oliveira", "Souza", "Lima", "Pereira", "Costa", "Ferreira", "Almeida",
    "Gomes", "Ribeiro", "Martins", "Rocha", "Barbosa",
];
const EMAIL_DOMAINS: [&str; 5] = [
    "example.com",
    "mail.example.org",
    "corp.example.net",
    "inbox.example.io",
    "contato.example.br",
];
const ORIGINS: [&str; 5] = [
    "Site",
    "Indicação",
    "Campanha Instagram",
    "Feira Imobiliária",
    "Cadastro Manual",
];
const NOTE_TEXTS: [&str; 8] = [
    "Primeiro contato por telefone",
    "Pediu detalhes da proposta por email",
    "Agendou visita para a próxima semana",
    "Solicitou desconto no plano anual",
    "Ficou de retornar após consultar sócio",
    "Confirmou interesse no plano completo",
    "Reclamou do prazo de entrega",
    "Assinou o contrato enviado",
];

const REFERENCE_YEAR: i32 = 2026;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Deterministic lead generator for demo mode and tests. The same seed always
/// produces the same pipeline, so assertions on generated data stay stable.
#[derive(Debug, Clone)]
pub struct LeadFaker {
    rng: DeterministicRng,
    next_id: u64,
}

impl LeadFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: 1,
        }
    }

    pub fn lead(&mut self) -> Lead {
        let status = LeadStatus::ALL[self.rng.int_n(LeadStatus::ALL.len())];
        self.lead_with_status(status)
    }

    pub fn lead_with_status(&mut self, status: LeadStatus) -> Lead {
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let domain = self.pick(&EMAIL_DOMAINS);
        let id = self.next_id;
        self.next_id += 1;

        let created_at = self.datetime_between(
            reference_now() - Duration::days(90),
            reference_now(),
        );

        let mut lead = Lead {
            id: LeadId::from(format!("{id}").as_str()),
            name: format!("{first} {last}"),
            email: format!(
                "{}.{}{id}@{domain}",
                first.to_ascii_lowercase(),
                last.to_ascii_lowercase()
            ),
            phone: format!(
                "(11) 9{:04}-{:04}",
                self.rng.int_n(10_000),
                self.rng.int_n(10_000)
            ),
            status,
            origin: Some(self.pick(&ORIGINS).to_owned()),
            created_at: Some(created_at),
            interactions: Vec::new(),
        };

        // Leads further along the pipeline accumulate more history.
        let note_count = status.position() + self.rng.int_n(2);
        for offset in 0..note_count {
            lead.interactions
                .push(self.interaction(id, offset, created_at));
        }
        lead
    }

    /// A small pipeline with at least one lead per column.
    pub fn pipeline(&mut self, extra: usize) -> Vec<Lead> {
        let mut leads: Vec<Lead> = LeadStatus::ALL
            .iter()
            .map(|status| self.lead_with_status(*status))
            .collect();
        for _ in 0..extra {
            leads.push(self.lead());
        }
        leads
    }

    fn interaction(&mut self, lead_id: u64, offset: usize, after: OffsetDateTime) -> Interaction {
        Interaction {
            id: InteractionId::from(format!("{lead_id}-{offset}").as_str()),
            kind: InteractionKind::Nota,
            content: self.pick(&NOTE_TEXTS).to_owned(),
            created_at: Some(after + Duration::days(1 + offset as i64)),
        }
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn datetime_between(&mut self, start: OffsetDateTime, end: OffsetDateTime) -> OffsetDateTime {
        let start_ts = start.unix_timestamp();
        let end_ts = end.unix_timestamp();
        if end_ts <= start_ts {
            return start;
        }
        let span = (end_ts - start_ts) as u64;
        let offset = self.rng.next_u64() % (span + 1);
        OffsetDateTime::from_unix_timestamp(start_ts + offset as i64).expect("valid unix timestamp")
    }
}

fn reference_now() -> OffsetDateTime {
    let date = Date::from_calendar_date(REFERENCE_YEAR, Month::January, 1)
        .expect("valid calendar date");
    let midnight = Time::from_hms(0, 0, 0).expect("valid midnight");
    date.with_time(midnight).assume_utc()
}
