mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use helpers::{Persistence, contact_request, create_app, create_test_config, send_json};
use lettre::transport::stub::AsyncStubTransport;
use mailform_notification::{ContactNotifier, EmailService};
use serde_json::json;

fn stub_app(stub: AsyncStubTransport) -> anyhow::Result<axum::Router> {
    let mut config = create_test_config();
    config.email.admin_addresses = vec![
        "ops@example.com".to_string(),
        "owner@example.com".to_string(),
    ];

    let service = EmailService::new_stub(&config.email, stub)?;
    let notifier = ContactNotifier::new(service, &config.email, &config.app.name)?;

    Ok(create_app(config, Persistence::Disabled, Arc::new(notifier)))
}

#[tokio::test]
async fn test_composed_email_reaches_every_admin() -> anyhow::Result<()> {
    let stub = AsyncStubTransport::new_ok();
    let app = stub_app(stub.clone())?;

    let body = json!({
        "name": "Bob",
        "email": "bob@example.org",
        "subject": "Partnership",
        "message": "Let's talk."
    });
    let (status, json) = send_json(&app, contact_request(body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Message sent successfully!");

    let messages = stub.messages().await;
    assert_eq!(messages.len(), 1);

    let (envelope, raw) = &messages[0];
    let recipients = envelope
        .to()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    assert_eq!(recipients, vec!["ops@example.com", "owner@example.com"]);

    assert!(raw.contains("From: Mailform <site@example.com>"));
    assert!(raw.contains("Reply-To: bob@example.org\r\n"));
    assert!(raw.contains("Subject: Mailform Contact Form: Partnership"));
    assert!(raw.contains("You received a new message via the Mailform contact form:"));
    assert!(raw.contains("Reply-To Email: bob@example.org"));
    assert!(raw.contains("Let's talk."));

    Ok(())
}

#[tokio::test]
async fn test_transport_failure_without_persistence() -> anyhow::Result<()> {
    let app = stub_app(AsyncStubTransport::new_error())?;

    let (status, json) = send_json(&app, contact_request(helpers::valid_body("Ann"))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Failed to send your message.");

    Ok(())
}
