//! Built-in tool executor tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use relay_domain::error::{Error, Result};
use relay_domain::ports::{MailTransport, OutgoingEmail, PublishedPost, SocialPublisher, ToolExecutor};
use relay_domain::value_objects::ToolArguments;
use relay_providers::services::{DisabledMailer, DisabledPublisher, LopdfRenderer};
use relay_providers::tools::arithmetic::format_number;
use relay_providers::tools::mail::html_body;
use relay_providers::tools::{
    AddTwoNumbers, CALCULATE_BMI, CREATE_POST, CalculateBmi, CreatePost, SendEmail, ToolServices, builtin_tools,
};
use serde_json::{Value, json};

fn args(value: Value) -> ToolArguments {
    match value {
        Value::Object(map) => map,
        _ => panic!("arguments must be an object"),
    }
}

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        self.sent.lock().expect("lock").push(email);
        Ok(())
    }
}

struct EchoPublisher;

#[async_trait]
impl SocialPublisher for EchoPublisher {
    async fn publish(&self, status: &str) -> Result<PublishedPost> {
        Ok(PublishedPost {
            id: "1".into(),
            text: status.to_string(),
        })
    }
}

#[tokio::test]
async fn test_add_two_numbers() {
    let result = AddTwoNumbers
        .execute(args(json!({"a": 2, "b": 3})))
        .await
        .expect("sum");
    assert_eq!(result.joined_text(), "Sum is 5");
    assert!(!result.is_error);
}

#[tokio::test]
async fn test_bmi() {
    let result = CalculateBmi
        .execute(args(json!({"weightKg": 64, "heightM": 2})))
        .await
        .expect("bmi");
    assert_eq!(result.joined_text(), "16");
}

#[test]
fn test_bmi_schema_rejects_zero_height() {
    let err = CalculateBmi::schema()
        .validate(CALCULATE_BMI, &args(json!({"weightKg": 70, "heightM": 0})))
        .expect_err("zero height");
    assert!(matches!(err, Error::SchemaValidation { ref field, .. } if field == "heightM"));
}

#[tokio::test]
async fn test_bmi_executor_reports_wire_field_name() {
    let err = CalculateBmi
        .execute(args(json!({"weightKg": 70, "heightM": 0})))
        .await
        .expect_err("zero height");
    assert!(matches!(err, Error::SchemaValidation { ref field, .. } if field == "heightM"));
}

#[test]
fn test_format_number() {
    assert_eq!(format_number(5.0), "5");
    assert_eq!(format_number(2.5), "2.5");
}

#[tokio::test]
async fn test_send_email_reports_delivery() {
    let mailer = Arc::new(RecordingMailer::default());
    let tool = SendEmail::new(mailer.clone());

    let result = tool
        .execute(args(json!({"to": "a@example.com", "subject": "Hi", "text": "<b>up</b>"})))
        .await
        .expect("send");

    assert_eq!(
        result.joined_text(),
        "📬 Email sent to a@example.com with subject \"Hi\""
    );
    let sent = mailer.sent.lock().expect("lock");
    assert_eq!(sent.len(), 1);
    assert!(sent[0].html.contains("&lt;b&gt;up&lt;/b&gt;"));
}

#[tokio::test]
async fn test_send_email_failure_is_text() {
    let tool = SendEmail::new(Arc::new(DisabledMailer));

    let result = tool
        .execute(args(json!({"to": "a@example.com", "subject": "Hi", "text": "x"})))
        .await
        .expect("failure is reported as content");

    assert!(result.joined_text().starts_with("❌ Failed to send email:"));
}

#[tokio::test]
async fn test_send_email_bad_address_is_text() {
    let mailer = Arc::new(RecordingMailer::default());
    let tool = SendEmail::new(mailer.clone());

    let result = tool
        .execute(args(json!({"to": "not-an-address", "subject": "Hi", "text": "x"})))
        .await
        .expect("bad address is reported as content");

    assert!(!result.is_error);
    assert!(result.joined_text().starts_with("❌ Failed to send email:"));
    assert!(mailer.sent.lock().expect("lock").is_empty());
}

#[test]
fn test_post_schema_caps_length() {
    let long = "x".repeat(281);
    let err = CreatePost::schema()
        .validate(CREATE_POST, &args(json!({"status": long})))
        .expect_err("too long");
    assert!(matches!(err, Error::SchemaValidation { ref field, .. } if field == "status"));
}

#[test]
fn test_html_body_escapes_text() {
    assert!(html_body("a & b").contains("Message: a &amp; b"));
}

#[tokio::test]
async fn test_create_post() {
    let tool = CreatePost::new(Arc::new(EchoPublisher));
    let result = tool
        .execute(args(json!({"status": "hello"})))
        .await
        .expect("post");
    assert_eq!(result.joined_text(), "Tweeted: hello");
}

#[tokio::test]
async fn test_create_post_without_publisher_fails() {
    let tool = CreatePost::new(Arc::new(DisabledPublisher));
    let err = tool
        .execute(args(json!({"status": "hello"})))
        .await
        .expect_err("not configured");
    assert!(matches!(err, Error::ToolExecution { .. }));
}

#[test]
fn test_builtin_tool_names() {
    let services = ToolServices {
        mail: Arc::new(DisabledMailer),
        social: Arc::new(DisabledPublisher),
        documents: Arc::new(LopdfRenderer::new()),
    };
    let names: Vec<&str> = builtin_tools(&services).iter().map(|t| t.name).collect();
    assert_eq!(
        names,
        vec!["addTwoNumbers", "calculate-bmi", "createPost", "sendEmail", "generatePdf", "editPDF"]
    );
}
