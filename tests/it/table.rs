use super::common::{classifier, ScriptedBackend};
use llm_classify::{
    classify::{ClassifyError, ClassifyWarning},
    table::Table,
};
use serde_json::{json, Value};

fn pets() -> Table {
    Table::with_rows(
        ["text", "id"],
        vec![
            vec![json!("golden retriever"), json!(1)],
            vec![json!("parakeet"), json!(2)],
        ],
    )
    .unwrap()
}

fn animal_categories() -> Table {
    Table::with_rows(
        ["category", "description"],
        vec![
            vec![json!("cat"), json!("felines")],
            vec![json!("dog"), json!("canines")],
            vec![json!("bird"), Value::Null],
        ],
    )
    .unwrap()
}

#[tokio::test]
async fn wide_output_with_relocated_id() -> crate::Result<()> {
    let backend = ScriptedBackend::new(["DOG", "a bird, surely"]);
    let res = classifier(&backend)
        .classify_table(pets(), "text", animal_categories())
        .id_column("id")
        .show_progress(false)
        .run()
        .await?;

    assert!(res.warnings.is_empty());
    assert_eq!(
        res.table.columns(),
        ["id", "text", "predicted_label", "predicted_score"]
    );
    assert_eq!(
        res.table.rows()[0],
        vec![json!(1), json!("golden retriever"), json!("dog"), Value::Null]
    );
    assert_eq!(res.table.cell(1, "predicted_label"), Some(&json!("bird")));

    // Descriptions from the default column reach the prompt.
    assert!(backend.requests()[0][0].content.contains("cat: felines"));
    Ok(())
}

#[tokio::test]
async fn scored_wide_output_uses_arg_max() -> crate::Result<()> {
    let backend = ScriptedBackend::new([r#"{"cat":0.2,"dog":0.7,"bird":0.1}"#]);
    let data = Table::with_rows(["text"], vec![vec![json!("golden retriever")]])?;
    let res = classifier(&backend)
        .classify_table(data, "text", animal_categories())
        .scored(true)
        .show_progress(false)
        .run()
        .await?;
    assert_eq!(res.table.cell(0, "predicted_label"), Some(&json!("dog")));
    assert_eq!(res.table.cell(0, "predicted_score"), Some(&json!(0.7)));
    Ok(())
}

#[tokio::test]
async fn long_output_with_fallback_row() -> crate::Result<()> {
    let backend = ScriptedBackend::new([r#"{"cat":0.2,"dog":0.7,"bird":0.1}"#, "Parakeet? Bird."]);
    let res = classifier(&backend)
        .classify_table(pets(), "text", animal_categories())
        .return_probabilities(true)
        .show_progress(false)
        .run()
        .await?;

    assert_eq!(res.table.columns(), ["text", "id", "category", "probability"]);
    assert_eq!(res.table.n_rows(), 4);
    let pairs: Vec<(Value, Value)> = res.table.rows()[..3]
        .iter()
        .map(|row| (row[2].clone(), row[3].clone()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (json!("cat"), json!(0.2)),
            (json!("dog"), json!(0.7)),
            (json!("bird"), json!(0.1)),
        ]
    );
    assert!(res.table.rows()[..3]
        .iter()
        .all(|row| row[0] == json!("golden retriever") && row[1] == json!(1)));
    assert_eq!(
        res.table.rows()[3],
        vec![json!("parakeet"), json!(2), json!("bird"), Value::Null]
    );
    assert_eq!(
        res.warnings,
        vec![ClassifyWarning::DistributionFallback { rows: 1 }]
    );
    Ok(())
}

#[tokio::test]
async fn partial_distribution_leaves_missing_categories_null() -> crate::Result<()> {
    let backend = ScriptedBackend::new([r#"{"dog": 0.9, "hamster": 0.1}"#]);
    let data = Table::with_rows(["text"], vec![vec![json!("retriever")]])?;
    let res = classifier(&backend)
        .classify_table(data, "text", animal_categories())
        .return_probabilities(true)
        .show_progress(false)
        .run()
        .await?;
    assert_eq!(
        res.table.column("probability").unwrap(),
        vec![&Value::Null, &json!(0.9), &Value::Null]
    );
    Ok(())
}

#[tokio::test]
async fn distribution_keys_match_categories_ignoring_case() -> crate::Result<()> {
    let reply = r#"{"Cat":0.2,"Dog":0.7,"Bird":0.1}"#;
    let backend = ScriptedBackend::new([reply, reply]);
    let data = Table::with_rows(["text"], vec![vec![json!("golden retriever")]])?;

    let long = classifier(&backend)
        .classify_table(data.clone(), "text", animal_categories())
        .return_probabilities(true)
        .show_progress(false)
        .run()
        .await?;
    assert!(long.warnings.is_empty());
    assert_eq!(
        long.table.column("probability").unwrap(),
        vec![&json!(0.2), &json!(0.7), &json!(0.1)]
    );

    // Wide scored output agrees with the long rows.
    let wide = classifier(&backend)
        .classify_table(data, "text", animal_categories())
        .scored(true)
        .show_progress(false)
        .run()
        .await?;
    assert_eq!(wide.table.cell(0, "predicted_label"), Some(&json!("dog")));
    assert_eq!(wide.table.cell(0, "predicted_score"), Some(&json!(0.7)));
    Ok(())
}

#[tokio::test]
async fn exact_key_wins_over_case_variant() -> crate::Result<()> {
    let backend = ScriptedBackend::new([r#"{"DOG":0.1,"dog":0.8,"cat":0.1}"#]);
    let data = Table::with_rows(["text"], vec![vec![json!("retriever")]])?;
    let res = classifier(&backend)
        .classify_table(data, "text", animal_categories())
        .return_probabilities(true)
        .show_progress(false)
        .run()
        .await?;
    assert_eq!(
        res.table.column("probability").unwrap(),
        vec![&json!(0.1), &json!(0.8), &Value::Null]
    );
    Ok(())
}

#[tokio::test]
async fn distribution_without_known_keys_falls_back() -> crate::Result<()> {
    let backend = ScriptedBackend::new([r#"{"hamster":0.6,"ferret":0.4}"#]);
    let data = Table::with_rows(["text"], vec![vec![json!("small pet")]])?;
    let res = classifier(&backend)
        .classify_table(data, "text", animal_categories())
        .return_probabilities(true)
        .show_progress(false)
        .run()
        .await?;
    assert_eq!(res.table.n_rows(), 1);
    assert_eq!(res.table.cell(0, "category"), Some(&json!("cat")));
    assert_eq!(
        res.warnings,
        vec![ClassifyWarning::DistributionFallback { rows: 1 }]
    );
    Ok(())
}

#[tokio::test]
async fn configuration_errors_happen_before_any_call() {
    let backend = ScriptedBackend::new(["cat"]);
    let classifier = classifier(&backend);

    let err = classifier
        .classify_table(pets(), "body", animal_categories())
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, ClassifyError::Configuration(_)));

    let err = classifier
        .classify_table(pets(), "text", animal_categories())
        .category_column("label")
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, ClassifyError::Configuration(_)));

    let one_category = Table::with_rows(["category"], vec![vec![json!("cat")]]).unwrap();
    let err = classifier
        .classify_table(pets(), "text", one_category)
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, ClassifyError::Configuration(_)));

    let err = classifier
        .classify_table(pets(), "text", animal_categories())
        .id_column("uuid")
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, ClassifyError::Configuration(_)));

    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn missing_description_column_and_duplicates_warn() -> crate::Result<()> {
    let backend = ScriptedBackend::new(["cat"]);
    let categories = Table::with_rows(
        ["label"],
        vec![vec![json!("cat")], vec![json!("dog")], vec![json!("cat")]],
    )?;
    let data = Table::with_rows(["text"], vec![vec![Value::Null]])?;
    let res = classifier(&backend)
        .classify_table(data, "text", categories)
        .category_column("label")
        .description_column("notes")
        .show_progress(false)
        .run()
        .await?;

    assert_eq!(
        res.warnings,
        vec![
            ClassifyWarning::MissingDescriptionColumn {
                column: "notes".to_string()
            },
            ClassifyWarning::DuplicateCategories {
                labels: vec!["cat".to_string()]
            },
        ]
    );
    assert_eq!(res.table.cell(0, "predicted_label"), Some(&json!("cat")));
    // A null text is classified as an empty string.
    assert!(backend.requests()[0][1]
        .content
        .starts_with("Text: \n\nAllowed categories: cat, dog"));
    Ok(())
}
