use llm_classify::{
    llms::ChatBackend,
    requests::{CompletionError, CompletionRequest, CompletionResponse, PromptMessage},
    LlmClassifier,
};
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

/// Answers every request with the next canned reply, in order.
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<Vec<PromptMessage>>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new<I, S>(replies: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_results(replies.into_iter().map(|reply| Ok(reply.into())))
    }

    /// `Err` entries make the matching call fail with a backend error.
    pub fn with_results<I>(results: I) -> Arc<Self>
    where
        I: IntoIterator<Item = Result<String, String>>,
    {
        Arc::new(Self {
            replies: Mutex::new(results.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Vec<PromptMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ChatBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn completion_request(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push(request.messages.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(CompletionResponse::from_content(reply)),
            Some(Err(message)) => Err(CompletionError::BackendError(message)),
            None => Err(CompletionError::BackendError(
                "no scripted reply left".to_string(),
            )),
        }
    }
}

pub fn classifier(backend: &Arc<ScriptedBackend>) -> LlmClassifier {
    LlmClassifier::new(backend.clone())
}
