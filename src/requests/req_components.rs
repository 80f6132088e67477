use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.0;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Generation parameters sent with every chat-completion call.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelParams {
    /// Provider identifier for the model, e.g. `gpt-4o-mini` or `openai/gpt-4o-mini`.
    pub model: String,
    /// Controls the randomness of the model's output.
    ///
    /// Accepts values between 0.0 and 2.0. Classification wants a deterministic answer, so
    /// this defaults to `0.0`.
    pub temperature: f32,
    /// Upper bound for a single HTTP round-trip. A request that exceeds it fails the run.
    pub timeout: Duration,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ModelParams {
    pub fn new() -> Self {
        Default::default()
    }
}

impl std::fmt::Display for ModelParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "ModelParams:")?;
        writeln!(f, "    model: {}", self.model)?;
        writeln!(f, "    temperature: {}", self.temperature)?;
        write!(f, "    timeout: {:?}", self.timeout)
    }
}

pub trait ModelParamsTrait {
    fn model_params_mut(&mut self) -> &mut ModelParams;

    /// Provider identifier for the model. Passed through to the API untouched.
    fn model<S: Into<String>>(mut self, model: S) -> Self
    where
        Self: Sized,
    {
        self.model_params_mut().model = model.into();
        self
    }

    /// What sampling temperature to use, between 0 and 2.
    ///
    /// Values outside of that range are ignored and the default of `0.0` is used.
    fn temperature(mut self, temperature: f32) -> Self
    where
        Self: Sized,
    {
        match temperature {
            value if (0.0..=2.0).contains(&value) => self.model_params_mut().temperature = value,
            value => {
                crate::warn!(
                    "temperature {value} is outside of 0.0..=2.0, using {DEFAULT_TEMPERATURE}"
                );
                self.model_params_mut().temperature = DEFAULT_TEMPERATURE
            }
        };
        self
    }

    fn request_timeout(mut self, timeout: Duration) -> Self
    where
        Self: Sized,
    {
        self.model_params_mut().timeout = timeout;
        self
    }
}

impl ModelParamsTrait for ModelParams {
    fn model_params_mut(&mut self) -> &mut ModelParams {
        self
    }
}
