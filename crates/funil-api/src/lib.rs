// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use funil_app::{InteractionFormInput, Lead, LeadFormInput, LeadId, LeadStatus, MANUAL_ORIGIN};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Request timeout shared by every call; there are no retries, so a slow
/// backend surfaces as a single failed request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Thin client for the CRM backend. All persistence, validation, and business
/// rules live on the server; every failure collapses to an error the caller
/// must catch and report.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }
        Url::parse(&base_url)
            .with_context(|| format!("api.base_url {base_url:?} is not a valid URL"))?;

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET /leads/ -- the whole collection, replacing any prior snapshot.
    pub fn list_leads(&self) -> Result<Vec<Lead>> {
        let response = self
            .http
            .get(format!("{}/leads/", self.base_url))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let response = check_status(response)?;
        response.json().context("decode lead list")
    }

    /// GET /leads/{id} -- one lead with its interaction history.
    pub fn get_lead(&self, id: &LeadId) -> Result<Lead> {
        let response = self
            .http
            .get(format!("{}/leads/{id}", self.base_url))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let response = check_status(response)?;
        response.json().context("decode lead detail")
    }

    /// PATCH /leads/{id}/status. The response body (updated lead or empty)
    /// is discarded; the caller already applied the change locally.
    pub fn update_status(&self, id: &LeadId, status: LeadStatus) -> Result<()> {
        let response = self
            .http
            .patch(format!("{}/leads/{id}/status", self.base_url))
            .json(&StatusUpdateRequest { status })
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        check_status(response)?;
        Ok(())
    }

    /// POST /leads/{id}/interacoes -- a note bundled with the (possibly
    /// changed) selected status.
    pub fn create_interaction(&self, id: &LeadId, input: &InteractionFormInput) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/leads/{id}/interacoes", self.base_url))
            .json(&InteractionRequest::new(input))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        check_status(response)?;
        Ok(())
    }

    /// POST /webhook/leads/ -- the intake endpoint shared with external
    /// sources; manual registrations carry the fixed manual origin tag.
    pub fn create_lead(&self, input: &LeadFormInput) -> Result<Lead> {
        let response = self
            .http
            .post(format!("{}/webhook/leads/", self.base_url))
            .json(&LeadIntakeRequest::new(input))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let response = check_status(response)?;
        response.json().context("decode created lead")
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(clean_error_response(status, &body))
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach {} -- check that the CRM API is running ({})",
        base_url,
        error
    )
}

/// FastAPI error bodies carry a human-readable `detail` field on validation
/// rejections; surface it verbatim so forms can show the server's message.
fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(detail) = parsed.detail_text()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), detail);
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Serialize)]
struct StatusUpdateRequest {
    status: LeadStatus,
}

#[derive(Debug, Serialize)]
struct InteractionRequest<'a> {
    tipo: &'static str,
    conteudo: &'a str,
    novo_status: LeadStatus,
}

impl<'a> InteractionRequest<'a> {
    fn new(input: &'a InteractionFormInput) -> Self {
        Self {
            tipo: "nota",
            conteudo: &input.note,
            novo_status: input.status,
        }
    }
}

#[derive(Debug, Serialize)]
struct LeadIntakeRequest<'a> {
    nome: &'a str,
    email_primario: &'a str,
    celular_primario: &'a str,
    origem: &'static str,
}

impl<'a> LeadIntakeRequest<'a> {
    fn new(input: &'a LeadFormInput) -> Self {
        Self {
            nome: &input.name,
            email_primario: &input.email,
            celular_primario: &input.phone,
            origem: MANUAL_ORIGIN,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    detail: Option<serde_json::Value>,
}

impl ErrorEnvelope {
    fn detail_text(&self) -> Option<String> {
        match &self.detail {
            Some(serde_json::Value::String(text)) if !text.is_empty() => Some(text.clone()),
            // Pydantic validation errors arrive as a list of objects; the
            // flat taxonomy reduces them to their messages.
            Some(serde_json::Value::Array(items)) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|msg| msg.as_str()))
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            _ => None,
        }
    }
}
