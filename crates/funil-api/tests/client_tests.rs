// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use funil_api::Client;
use funil_app::{InteractionFormInput, LeadFormInput, LeadId, LeadStatus};
use std::io::Read;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Method, Response, Server};

fn json_response(body: &str, status: u16) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body).with_status_code(status).with_header(
        Header::from_bytes("Content-Type", "application/json").expect("valid content type header"),
    )
}

#[test]
fn connection_error_contains_actionable_remediation() {
    let client = Client::new("http://127.0.0.1:1", Duration::from_millis(50))
        .expect("client should initialize");

    let error = client
        .list_leads()
        .expect_err("list should fail for unreachable endpoint");
    assert!(error.to_string().contains("CRM API"));
}

#[test]
fn list_leads_decodes_collection() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.method(), &Method::Get);
        assert_eq!(request.url(), "/leads/");
        request
            .respond(json_response(
                r#"[{"id":"1","nome":"Ana","email_primario":"a@x.com","status":"novo"}]"#,
                200,
            ))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let leads = client.list_leads()?;
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].name, "Ana");
    assert_eq!(leads[0].status, LeadStatus::Novo);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn update_status_patches_the_status_endpoint() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request expected");
        assert_eq!(request.method(), &Method::Patch);
        assert_eq!(request.url(), "/leads/abc-1/status");

        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("read request body");
        assert_eq!(body, r#"{"status":"ganho"}"#);

        request
            .respond(json_response("{}", 200))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    client.update_status(&LeadId::from("abc-1"), LeadStatus::Ganho)?;

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn create_interaction_posts_note_and_new_status() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request expected");
        assert_eq!(request.method(), &Method::Post);
        assert_eq!(request.url(), "/leads/abc-1/interacoes");

        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("read request body");
        assert!(body.contains(r#""tipo":"nota""#));
        assert!(body.contains(r#""conteudo":"Enviou contrato""#));
        assert!(body.contains(r#""novo_status":"ganho""#));

        request
            .respond(json_response(
                r#"{"id":"i9","tipo":"nota","conteudo":"Enviou contrato","criado_em":"2026-08-20T10:00:00Z"}"#,
                201,
            ))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    client.create_interaction(
        &LeadId::from("abc-1"),
        &InteractionFormInput {
            note: "Enviou contrato".to_owned(),
            status: LeadStatus::Ganho,
        },
    )?;

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn create_lead_returns_created_record() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request expected");
        assert_eq!(request.method(), &Method::Post);
        assert_eq!(request.url(), "/webhook/leads/");

        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("read request body");
        assert!(body.contains(r#""origem":"Cadastro Manual""#));

        request
            .respond(json_response(
                r#"{"id":"n1","nome":"Bob","email_primario":"b@x.com","celular_primario":"119999","status":"novo"}"#,
                201,
            ))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let created = client.create_lead(&LeadFormInput {
        name: "Bob".to_owned(),
        email: "b@x.com".to_owned(),
        phone: "119999".to_owned(),
    })?;
    assert_eq!(created.name, "Bob");
    assert_eq!(created.status, LeadStatus::Novo);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn create_lead_surfaces_server_detail_on_rejection() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(
                r#"{"detail":"email_primario already registered"}"#,
                409,
            ))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .create_lead(&LeadFormInput {
            name: "Bob".to_owned(),
            email: "b@x.com".to_owned(),
            phone: "119999".to_owned(),
        })
        .expect_err("duplicate email should fail");
    assert!(error.to_string().contains("email_primario already registered"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn get_lead_failure_is_reported_not_partially_decoded() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(r#"{"detail":"Lead not found"}"#, 404))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .get_lead(&LeadId::from("missing"))
        .expect_err("missing lead should fail");
    assert!(error.to_string().contains("Lead not found"));

    handle.join().expect("server thread should join");
    Ok(())
}
