use super::common::{classifier, ScriptedBackend};
use llm_classify::{
    classify::{BatchConfigTrait, ClassifyError},
    requests::CompletionError,
};
use std::time::Duration;

const CATEGORIES: [&str; 3] = ["cat", "dog", "bird"];

#[tokio::test]
async fn siamese_retriever_parakeet() -> crate::Result<()> {
    let backend = ScriptedBackend::new(["cat", "Golden retriever is a DOG", "I'm not sure"]);
    let labels = classifier(&backend)
        .classify_vector(["siamese kitty", "golden retriever", "parakeet"], CATEGORIES)
        .run()
        .await?;
    assert_eq!(labels, ["cat", "dog", "cat"]);
    Ok(())
}

#[tokio::test]
async fn every_label_is_on_list_even_for_garbage() -> crate::Result<()> {
    let replies = ["", "   ", "¯\\_(ツ)_/¯", "doghouse", "BIRD", "{\"json\": true}"];
    let backend = ScriptedBackend::new(replies);
    let texts: Vec<String> = (0..replies.len()).map(|i| format!("text {i}")).collect();
    let labels = classifier(&backend)
        .classify_vector(texts, CATEGORIES)
        .run()
        .await?;
    assert_eq!(labels.len(), replies.len());
    assert!(labels.iter().all(|label| CATEGORIES.contains(&label.as_str())));
    assert_eq!(labels, ["cat", "cat", "cat", "cat", "bird", "cat"]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn batches_of_two_pause_twice_for_five_texts() -> crate::Result<()> {
    let backend = ScriptedBackend::new(["bird", "dog", "cat", "dog", "bird"]);
    let started = tokio::time::Instant::now();
    let outcome = classifier(&backend)
        .classify_vector(["a", "b", "c", "d", "e"], CATEGORIES)
        .batch_size(2)
        .delay(Duration::from_secs(2))
        .run_detailed()
        .await?;
    assert_eq!(outcome.items, ["bird", "dog", "cat", "dog", "bird"]);
    assert_eq!(outcome.batches, 3);
    assert_eq!(outcome.pauses, 2);
    assert_eq!(started.elapsed(), Duration::from_secs(4));

    let requests = backend.requests();
    let texts: Vec<&str> = requests
        .iter()
        .map(|messages| messages[1].content.lines().next().unwrap_or_default())
        .collect();
    assert_eq!(texts, ["Text: a", "Text: b", "Text: c", "Text: d", "Text: e"]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn defaults_from_the_classifier_apply() -> crate::Result<()> {
    let backend = ScriptedBackend::new(["cat", "cat", "cat"]);
    let classifier = classifier(&backend)
        .batch_size(3)
        .delay(Duration::from_secs(30));
    let started = tokio::time::Instant::now();
    let outcome = classifier
        .classify_vector(["a", "b", "c"], CATEGORIES)
        .run_detailed()
        .await?;
    assert_eq!(outcome.batches, 1);
    assert_eq!(outcome.pauses, 0);
    assert_eq!(started.elapsed(), Duration::ZERO);
    Ok(())
}

#[tokio::test]
async fn empty_text_takes_the_same_path() -> crate::Result<()> {
    let backend = ScriptedBackend::new(["dog", "nothing here"]);
    let labels = classifier(&backend)
        .classify_vector(["", "x"], ["cat", "dog"])
        .run()
        .await?;
    assert_eq!(labels, ["dog", "cat"]);
    assert_eq!(backend.calls(), 2);
    assert!(backend.requests()[0][1].content.starts_with("Text: \n"));
    Ok(())
}

#[tokio::test]
async fn first_failure_aborts_the_run() {
    let backend = ScriptedBackend::with_results([
        Ok("cat".to_string()),
        Err("429 Too Many Requests".to_string()),
        Ok("dog".to_string()),
    ]);
    let err = classifier(&backend)
        .classify_vector(["a", "b", "c"], CATEGORIES)
        .batch_size(2)
        .run()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClassifyError::Completion(CompletionError::BackendError(_))
    ));
    assert_eq!(backend.calls(), 2);
}

#[tokio::test]
async fn empty_input_makes_no_calls() -> crate::Result<()> {
    let backend = ScriptedBackend::new(Vec::<String>::new());
    let labels = classifier(&backend)
        .classify_vector(Vec::<String>::new(), CATEGORIES)
        .run()
        .await?;
    assert!(labels.is_empty());
    assert_eq!(backend.calls(), 0);
    Ok(())
}
