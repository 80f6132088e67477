use super::common::ScriptedBackend;
use llm_classify::{config::ClassifierConfig, LlmClassifier};
use std::{fs, time::Duration};
use tempfile::NamedTempFile;

const SETTINGS: &str = "
model: openai/gpt-4o-mini
temperature: 0.2
timeout_secs: 15
batch_size: 2
delay_secs: 1.5
api_host: http://localhost:8080/v1
api_key_env_var: LLM_CLASSIFY_IT_CONFIG_KEY
retry:
  max_elapsed_secs: 10
logging_enabled: false
";

#[test]
fn load_settings_file() -> crate::Result<()> {
    let temp_file = NamedTempFile::new()?;
    fs::write(temp_file.path(), SETTINGS)?;

    let config = ClassifierConfig::from_yaml_file(temp_file.path())?;
    assert_eq!(config.model.as_deref(), Some("openai/gpt-4o-mini"));
    assert_eq!(config.batch_config().delay, Duration::from_millis(1500));
    assert_eq!(
        config.retry_policy().map(|retry| retry.max_elapsed_time),
        Some(Duration::from_secs(10))
    );

    let builder = LlmClassifier::openai().with_config(&config);
    assert_eq!(builder.params.model, "openai/gpt-4o-mini");
    assert_eq!(builder.params.temperature, 0.2);
    assert_eq!(builder.params.timeout, Duration::from_secs(15));
    assert_eq!(builder.config.api_config.host, "http://localhost:8080/v1");
    assert_eq!(
        builder.config.api_config.api_key_env_var,
        "LLM_CLASSIFY_IT_CONFIG_KEY"
    );
    Ok(())
}

#[test]
fn missing_file_is_an_error() {
    let err = ClassifierConfig::from_yaml_file("/nonexistent/llm_classify.yaml").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/llm_classify.yaml"));
}

#[test]
fn unknown_keys_are_rejected() -> crate::Result<()> {
    let temp_file = NamedTempFile::new()?;
    fs::write(temp_file.path(), "modle: gpt-4o\n")?;
    assert!(ClassifierConfig::from_yaml_file(temp_file.path()).is_err());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn settings_drive_the_pacing() -> crate::Result<()> {
    let config = ClassifierConfig::from_yaml_str("batch_size: 2\ndelay_secs: 3")?;
    let backend = ScriptedBackend::new(["cat", "dog", "cat"]);
    let mut classifier = LlmClassifier::new(backend.clone());
    classifier.batch = config.batch_config();
    classifier.params = config.apply_model_params(classifier.params);

    let started = tokio::time::Instant::now();
    let outcome = classifier
        .classify_vector(["a", "b", "c"], ["cat", "dog"])
        .run_detailed()
        .await?;
    assert_eq!(outcome.items, ["cat", "dog", "cat"]);
    assert_eq!(outcome.pauses, 1);
    assert_eq!(started.elapsed(), Duration::from_secs(3));
    Ok(())
}
