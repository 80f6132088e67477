use super::common::{classifier, ScriptedBackend};
use llm_classify::{
    classify::{CategorySet, ClassifyError, RowClassifier, RowResult, TopPrediction},
    requests::{CompletionError, MessageRole, ModelParams},
};
use std::collections::HashMap;

#[tokio::test]
async fn case_variant_reply_maps_to_canonical_label() -> crate::Result<()> {
    let backend = ScriptedBackend::new(["CAT"]);
    let label = classifier(&backend)
        .classify_one("siamese kitty", ["cat", "dog"])
        .run()
        .await?;
    assert_eq!(label, "cat");
    assert_eq!(backend.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn prompt_lists_labels_and_descriptions() -> crate::Result<()> {
    let backend = ScriptedBackend::new(["dog"]);
    classifier(&backend)
        .classify_one("golden retriever", ["cat", "dog", "bird"])
        .descriptions(HashMap::from([(
            "dog".to_string(),
            "domestic canines".to_string(),
        )]))
        .run()
        .await?;

    let requests = backend.requests();
    let messages = &requests[0];
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, MessageRole::System);
    assert!(messages[0].content.contains("\ncat\ndog: domestic canines\nbird\n"));
    assert!(messages[0].content.contains("Return only the label text"));
    assert_eq!(messages[1].role, MessageRole::User);
    assert_eq!(
        messages[1].content,
        "Text: golden retriever\n\nAllowed categories: cat, dog, bird"
    );
    Ok(())
}

#[tokio::test]
async fn identical_inputs_are_not_cached() -> crate::Result<()> {
    let backend = ScriptedBackend::new(["cat", "dog"]);
    let classifier = classifier(&backend);
    let first = classifier.classify_one("same", ["cat", "dog"]).run().await?;
    let second = classifier.classify_one("same", ["cat", "dog"]).run().await?;
    assert_eq!((first.as_str(), second.as_str()), ("cat", "dog"));
    assert_eq!(backend.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn single_category_fails_before_any_call() {
    let backend = ScriptedBackend::new(["cat"]);
    let err = classifier(&backend)
        .classify_one("siamese kitty", ["cat"])
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, ClassifyError::Configuration(_)));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn backend_failure_is_returned_unchanged() {
    let backend = ScriptedBackend::with_results([Err("upstream exploded".to_string())]);
    let err = classifier(&backend)
        .classify_one("parakeet", ["cat", "bird"])
        .run()
        .await
        .unwrap_err();
    match err {
        ClassifyError::Completion(CompletionError::BackendError(message)) => {
            assert_eq!(message, "upstream exploded")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn detailed_result_from_structured_and_plain_replies() -> crate::Result<()> {
    let backend = ScriptedBackend::new([r#"{"cat": 0.2, "dog": 0.7, "bird": 0.1}"#, "It's a Bird."]);
    let row = RowClassifier::new(
        backend.clone(),
        ModelParams::default(),
        CategorySet::new(["cat", "dog", "bird"])?,
    )?;

    let result = row.classify_detailed("golden retriever").await?;
    assert!(matches!(result, RowResult::Distribution(_)));
    assert_eq!(
        result.to_top_prediction(),
        TopPrediction {
            label: Some("dog".to_string()),
            score: Some(0.7)
        }
    );

    let result = row.classify_detailed("parakeet").await?;
    assert_eq!(
        result,
        RowResult::Prediction(TopPrediction {
            label: Some("bird".to_string()),
            score: None
        })
    );

    let requests = backend.requests();
    assert!(requests[0][0].content.contains("JSON object"));
    Ok(())
}
