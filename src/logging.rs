use std::{
    fs::create_dir_all,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};
use tracing_subscriber::layer::SubscriberExt;

static LOGGER_INSTALLED: AtomicBool = AtomicBool::new(false);

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: tracing::Level,
    pub logging_enabled: bool,
    pub logger_name: String,
    /// Directory for the rolling log files. Defaults to `llm_classify_logs` in the working
    /// directory.
    pub log_dir: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            logging_enabled: true,
            logger_name: "llm_classify".to_string(),
            log_dir: None,
        }
    }
}

impl LoggingConfig {
    /// Installs the process-wide subscriber once. Later backends reuse whatever is installed,
    /// including a subscriber set up by the host application.
    pub(crate) fn load_logger(&mut self) -> crate::Result<()> {
        if !self.logging_enabled || LOGGER_INSTALLED.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        if let Err(e) = self.create_logger() {
            LOGGER_INSTALLED.store(false, Ordering::SeqCst);
            return Err(e);
        }
        Ok(())
    }

    fn create_logger(&mut self) -> crate::Result<()> {
        let log_dir = match &self.log_dir {
            Some(log_dir) => log_dir.to_owned(),
            None => std::env::current_dir()?.join("llm_classify_logs"),
        };

        if !Path::new(&log_dir).exists() {
            create_dir_all(&log_dir)?;
        }

        let file_appender = tracing_appender::rolling::RollingFileAppender::builder()
            .rotation(tracing_appender::rolling::Rotation::HOURLY)
            .max_log_files(6)
            .filename_prefix(&self.logger_name)
            .filename_suffix("log")
            .build(log_dir)?;

        let filter = tracing_subscriber::EnvFilter::builder()
            .with_default_directive(self.level.into())
            .parse_lossy("");

        let file_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_ansi(false) // Disable ANSI codes for file output
            .with_writer(file_appender);

        let terminal_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_ansi(true) // Enable ANSI codes for terminal output
            .with_writer(std::io::stdout);

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(terminal_layer);

        if tracing::subscriber::set_global_default(subscriber).is_err() {
            crate::debug!("A global tracing subscriber is already installed");
        }
        Ok(())
    }
}

pub trait LoggingConfigTrait {
    fn logging_config_mut(&mut self) -> &mut LoggingConfig;

    /// If set to false, no subscriber is installed and nothing is written to disk.
    fn logging_enabled(mut self, enabled: bool) -> Self
    where
        Self: Sized,
    {
        self.logging_config_mut().logging_enabled = enabled;
        self
    }

    fn logger_name<S: Into<String>>(mut self, logger_name: S) -> Self
    where
        Self: Sized,
    {
        self.logging_config_mut().logger_name = logger_name.into();
        self
    }

    fn log_dir<P: Into<PathBuf>>(mut self, log_dir: P) -> Self
    where
        Self: Sized,
    {
        self.logging_config_mut().log_dir = Some(log_dir.into());
        self
    }

    /// Sets the log level to TRACE.
    ///
    /// Serialized requests and responses are logged at this level.
    fn log_level_trace(mut self) -> Self
    where
        Self: Sized,
    {
        self.logging_config_mut().level = tracing::Level::TRACE;
        self
    }

    /// Sets the log level to DEBUG.
    ///
    /// Every prompt, raw reply and the normalization rule that matched it.
    fn log_level_debug(mut self) -> Self
    where
        Self: Sized,
    {
        self.logging_config_mut().level = tracing::Level::DEBUG;
        self
    }

    /// Sets the log level to INFO.
    ///
    /// Run summaries and, when verbose, per-item progress.
    fn log_level_info(mut self) -> Self
    where
        Self: Sized,
    {
        self.logging_config_mut().level = tracing::Level::INFO;
        self
    }

    /// Sets the log level to WARN.
    ///
    /// Duplicate categories, missing description columns, distribution fallbacks.
    fn log_level_warn(mut self) -> Self
    where
        Self: Sized,
    {
        self.logging_config_mut().level = tracing::Level::WARN;
        self
    }

    /// Sets the log level to ERROR.
    fn log_level_error(mut self) -> Self
    where
        Self: Sized,
    {
        self.logging_config_mut().level = tracing::Level::ERROR;
        self
    }
}

impl LoggingConfigTrait for LoggingConfig {
    fn logging_config_mut(&mut self) -> &mut LoggingConfig {
        self
    }
}
