//! Component wiring tests

use relay_domain::value_objects::ToolArguments;
use relay_infrastructure::bootstrap::{build_model, build_registry, build_tool_services, http_client};
use relay_infrastructure::config::{AppConfig, ModelProvider};
use relay_infrastructure::RelayComponents;
use serde_json::json;

fn null_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.model.provider = ModelProvider::Null;
    config
}

#[test]
fn test_registry_holds_builtin_tools_in_order() {
    let config = null_config();
    let services = build_tool_services(&config, &http_client().expect("client")).expect("services");
    let registry = build_registry(&services).expect("registry");

    let names: Vec<String> = registry.list().iter().map(|d| d.name.clone()).collect();
    assert_eq!(
        names,
        vec!["addTwoNumbers", "calculate-bmi", "createPost", "sendEmail", "generatePdf", "editPDF"]
    );
}

#[tokio::test]
async fn test_unconfigured_mail_reports_failure_as_text() {
    let components = RelayComponents::build(null_config()).expect("components");
    let args: ToolArguments = json!({"to": "a@example.com", "subject": "s", "text": "t"})
        .as_object()
        .cloned()
        .expect("object");

    let result = components
        .registry
        .invoke("sendEmail", args)
        .await
        .expect("reported as content");

    assert!(result.joined_text().starts_with("❌ Failed to send email:"));
}

#[test]
fn test_gemini_without_key_fails() {
    let config = AppConfig::default();
    assert!(build_model(&config.model, http_client().expect("client")).is_err());
}

#[test]
fn test_model_selection() {
    let mut config = AppConfig::default();
    config.model.api_key = Some("k".into());
    let gemini = build_model(&config.model, http_client().expect("client")).expect("gemini");
    assert_eq!(gemini.model_name(), config.model.model);

    let null = build_model(&null_config().model, http_client().expect("client")).expect("null");
    assert_eq!(null.model_name(), "null");
}

#[test]
fn test_bridge_settings_follow_config() {
    let mut config = null_config();
    config.bridge.no_response_marker = "nothing".into();
    let components = RelayComponents::build(config).expect("components");
    assert_eq!(components.bridge_settings.no_response_marker, "nothing");
}
