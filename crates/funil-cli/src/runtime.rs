// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use funil_api::Client;
use funil_app::{
    Interaction, InteractionFormInput, InteractionId, InteractionKind, Lead, LeadFormInput,
    LeadId, LeadStatus, MANUAL_ORIGIN,
};
use funil_testkit::LeadFaker;
use funil_tui::{AppRuntime, InternalEvent, StatusPatchEvent};
use std::sync::mpsc::Sender;
use std::thread;
use time::OffsetDateTime;

/// Runtime backed by the CRM HTTP API. Every call is a blocking request;
/// status PATCHes run on their own thread so the optimistic move stays
/// responsive.
pub struct ApiRuntime {
    client: Client,
}

impl ApiRuntime {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl AppRuntime for ApiRuntime {
    fn load_leads(&mut self) -> Result<Vec<Lead>> {
        self.client.list_leads()
    }

    fn load_lead(&mut self, id: &LeadId) -> Result<Lead> {
        self.client.get_lead(id)
    }

    fn update_status(&mut self, id: &LeadId, status: LeadStatus) -> Result<()> {
        self.client.update_status(id, status)
    }

    fn submit_interaction(&mut self, id: &LeadId, input: &InteractionFormInput) -> Result<()> {
        input.validate()?;
        self.client.create_interaction(id, input)
    }

    fn submit_lead(&mut self, input: &LeadFormInput) -> Result<Lead> {
        input.validate()?;
        self.client.create_lead(input)
    }

    fn spawn_update_status(
        &mut self,
        request_id: u64,
        id: &LeadId,
        status: LeadStatus,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = self.client.clone();
        let id = id.clone();
        thread::spawn(move || {
            let event = match client.update_status(&id, status) {
                Ok(()) => InternalEvent::StatusPatch(StatusPatchEvent::Completed { request_id }),
                Err(error) => InternalEvent::StatusPatch(StatusPatchEvent::Failed {
                    request_id,
                    error: error.to_string(),
                }),
            };
            let _ = tx.send(event);
        });
        Ok(())
    }
}

/// In-memory runtime for `--demo`: a seeded pipeline with no backend at all.
pub struct DemoRuntime {
    leads: Vec<Lead>,
    next_id: u64,
}

impl DemoRuntime {
    pub fn seeded(seed: u64) -> Self {
        let mut faker = LeadFaker::new(seed);
        Self {
            leads: faker.pipeline(7),
            next_id: 1000,
        }
    }

    fn lead_mut(&mut self, id: &LeadId) -> Result<&mut Lead> {
        match self.leads.iter_mut().find(|lead| &lead.id == id) {
            Some(lead) => Ok(lead),
            None => bail!("lead {id} not found"),
        }
    }
}

impl AppRuntime for DemoRuntime {
    fn load_leads(&mut self) -> Result<Vec<Lead>> {
        Ok(self.leads.clone())
    }

    fn load_lead(&mut self, id: &LeadId) -> Result<Lead> {
        match self.leads.iter().find(|lead| &lead.id == id) {
            Some(lead) => Ok(lead.clone()),
            None => bail!("lead {id} not found"),
        }
    }

    fn update_status(&mut self, id: &LeadId, status: LeadStatus) -> Result<()> {
        self.lead_mut(id)?.status = status;
        Ok(())
    }

    fn submit_interaction(&mut self, id: &LeadId, input: &InteractionFormInput) -> Result<()> {
        input.validate()?;
        self.next_id += 1;
        let interaction = Interaction {
            id: InteractionId::from(format!("demo-{}", self.next_id).as_str()),
            kind: InteractionKind::Nota,
            content: input.note.clone(),
            created_at: Some(OffsetDateTime::now_utc()),
        };
        let lead = self.lead_mut(id)?;
        lead.status = input.status;
        lead.interactions.push(interaction);
        Ok(())
    }

    fn submit_lead(&mut self, input: &LeadFormInput) -> Result<Lead> {
        input.validate()?;
        self.next_id += 1;
        let lead = Lead {
            id: LeadId::from(format!("demo-{}", self.next_id).as_str()),
            name: input.name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            status: LeadStatus::Novo,
            origin: Some(MANUAL_ORIGIN.to_owned()),
            created_at: Some(OffsetDateTime::now_utc()),
            interactions: Vec::new(),
        };
        self.leads.push(lead.clone());
        Ok(lead)
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiRuntime, DemoRuntime};
    use anyhow::{Result, anyhow};
    use funil_api::Client;
    use funil_app::{InteractionFormInput, LeadFormInput, LeadStatus};
    use funil_tui::{AppRuntime, InternalEvent, StatusPatchEvent};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;
    use tiny_http::{Header, Method, Response, Server};

    #[test]
    fn demo_runtime_covers_every_pipeline_stage() -> Result<()> {
        let mut runtime = DemoRuntime::seeded(42);
        let leads = runtime.load_leads()?;
        for status in LeadStatus::ALL {
            assert!(leads.iter().any(|lead| lead.status == status));
        }
        Ok(())
    }

    #[test]
    fn demo_runtime_round_trips_a_status_update() -> Result<()> {
        let mut runtime = DemoRuntime::seeded(1);
        let id = runtime.load_leads()?[0].id.clone();

        runtime.update_status(&id, LeadStatus::Ganho)?;
        assert_eq!(runtime.load_lead(&id)?.status, LeadStatus::Ganho);
        Ok(())
    }

    #[test]
    fn demo_runtime_appends_interactions_and_applies_the_new_stage() -> Result<()> {
        let mut runtime = DemoRuntime::seeded(2);
        let lead = runtime.load_leads()?[0].clone();
        let history_len = lead.interactions.len();

        runtime.submit_interaction(
            &lead.id,
            &InteractionFormInput {
                note: "Retornou a ligação".to_owned(),
                status: LeadStatus::Proposta,
            },
        )?;

        let fresh = runtime.load_lead(&lead.id)?;
        assert_eq!(fresh.status, LeadStatus::Proposta);
        assert_eq!(fresh.interactions.len(), history_len + 1);
        Ok(())
    }

    #[test]
    fn demo_runtime_creates_manual_leads() -> Result<()> {
        let mut runtime = DemoRuntime::seeded(3);
        let before = runtime.load_leads()?.len();

        let created = runtime.submit_lead(&LeadFormInput {
            name: "Bob".to_owned(),
            email: "b@x.com".to_owned(),
            phone: "1199".to_owned(),
        })?;
        assert_eq!(created.status, LeadStatus::Novo);
        assert_eq!(created.origin.as_deref(), Some("Cadastro Manual"));
        assert_eq!(runtime.load_leads()?.len(), before + 1);
        Ok(())
    }

    #[test]
    fn demo_runtime_rejects_unknown_ids() {
        let mut runtime = DemoRuntime::seeded(4);
        let missing = funil_app::LeadId::from("nope");
        assert!(runtime.load_lead(&missing).is_err());
        assert!(runtime.update_status(&missing, LeadStatus::Ganho).is_err());
    }

    #[test]
    fn api_runtime_spawned_patch_reports_completion_over_the_channel() -> Result<()> {
        let server =
            Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
        let addr = format!("http://{}", server.server_addr());

        let handle = thread::spawn(move || {
            let request = server.recv().expect("request expected");
            assert_eq!(request.method(), &Method::Patch);
            assert_eq!(request.url(), "/leads/7/status");
            request
                .respond(
                    Response::from_string("{}").with_status_code(200).with_header(
                        Header::from_bytes("Content-Type", "application/json")
                            .expect("valid header"),
                    ),
                )
                .expect("response should succeed");
        });

        let client = Client::new(&addr, Duration::from_secs(1))?;
        let mut runtime = ApiRuntime::new(client);
        let (tx, rx) = mpsc::channel();
        runtime.spawn_update_status(9, &funil_app::LeadId::from("7"), LeadStatus::Ganho, tx)?;

        let event = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("patch outcome expected");
        assert_eq!(
            event,
            InternalEvent::StatusPatch(StatusPatchEvent::Completed { request_id: 9 })
        );

        handle.join().expect("server thread should join");
        Ok(())
    }

    #[test]
    fn api_runtime_spawned_patch_reports_failure_over_the_channel() -> Result<()> {
        // Nothing listens on this port; the patch fails with a connect error.
        let client = Client::new("http://127.0.0.1:1", Duration::from_millis(50))?;
        let mut runtime = ApiRuntime::new(client);
        let (tx, rx) = mpsc::channel();
        runtime.spawn_update_status(3, &funil_app::LeadId::from("7"), LeadStatus::Ganho, tx)?;

        let event = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("patch outcome expected");
        match event {
            InternalEvent::StatusPatch(StatusPatchEvent::Failed { request_id, error }) => {
                assert_eq!(request_id, 3);
                assert!(error.contains("cannot reach"));
            }
            other => panic!("expected a failed patch, got {other:?}"),
        }
        Ok(())
    }
}
