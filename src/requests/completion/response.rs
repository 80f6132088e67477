pub struct CompletionResponse {
    /// A unique identifier for the chat completion, when the provider sends one.
    pub id: Option<String>,
    /// The model that actually served the request, when the provider reports it.
    pub model: Option<String>,
    /// The generated completion, with fragments already concatenated.
    pub content: String,
    pub finish_reason: Option<String>,
    /// Opaque confidence passed through from the provider. Most providers never send one.
    pub score: Option<f64>,
    pub duration: std::time::Duration,
}

impl CompletionResponse {
    /// A response carrying only text content, as produced by non-HTTP backends.
    pub fn from_content<S: Into<String>>(content: S) -> Self {
        Self {
            id: None,
            model: None,
            content: content.into(),
            finish_reason: None,
            score: None,
            duration: std::time::Duration::ZERO,
        }
    }
}

impl std::fmt::Display for CompletionResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "CompletionResponse:")?;
        writeln!(f, "    content: {:?}", self.content)?;
        writeln!(f, "    finish_reason: {:?}", self.finish_reason)?;
        writeln!(f, "    model: {:?}", self.model)?;
        write!(f, "    duration: {:?}", self.duration)
    }
}
