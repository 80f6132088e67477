use super::categories::CategorySet;

const LABEL_RULES: &str = "Rules:
- Return only the label text, exactly as written above. No extra words, no punctuation.
- If you are uncertain, choose the closest label by meaning.
- Never invent new labels.";

const DISTRIBUTION_RULES: &str = "Rules:
- Return only a JSON object mapping every label above to a probability between 0 and 1.
- Use the labels exactly as written above as the keys. The probabilities should sum to 1.
- Never invent new labels. Do not wrap the JSON in prose.";

fn label_lines(categories: &CategorySet) -> String {
    categories
        .categories()
        .iter()
        .map(|category| match &category.description {
            Some(description) => format!("{}: {}", category.label, description),
            None => category.label.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// System message for the label-only request.
pub(crate) fn label_system_message(categories: &CategorySet) -> String {
    format!(
        "You are a text classifier. Classify the text into exactly one of these labels:\n{}\n\n{LABEL_RULES}",
        label_lines(categories)
    )
}

/// System message asking for a probability for every label.
pub(crate) fn distribution_system_message(categories: &CategorySet) -> String {
    format!(
        "You are a text classifier. Estimate how likely the text belongs to each of these labels:\n{}\n\n{DISTRIBUTION_RULES}",
        label_lines(categories)
    )
}

pub(crate) fn user_message(text: &str, categories: &CategorySet) -> String {
    format!(
        "Text: {text}\n\nAllowed categories: {}",
        categories.labels().collect::<Vec<_>>().join(", ")
    )
}
