//! Process-wide client state
//!
//! [`ClientContext`] owns the logger, the session, the pipeline and the
//! notification dispatcher. Components receive `Arc` handles from it instead
//! of reaching for globals.

use crate::core::{ClientError, LogLevel, Logger, LoggerConfig, Result};
use crate::errors::{Locale, MessageCatalog};
use crate::http::{
    HttpPipeline, MemoryNavigator, Navigator, PipelineConfig, ReqwestTransport, SessionStore,
    Transport,
};
use crate::notify::{NotificationCenter, NotificationDispatcher};
use crate::storage::{MemoryStorage, Storage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const ENV_API_BASE_URL: &str = "RFTIP_API_BASE_URL";
pub const ENV_API_TIMEOUT_MS: &str = "RFTIP_API_TIMEOUT_MS";
pub const ENV_SLOW_RESPONSE_MS: &str = "RFTIP_SLOW_RESPONSE_MS";
pub const ENV_LOG_LEVEL: &str = "RFTIP_LOG_LEVEL";
pub const ENV_LOG_CONSOLE: &str = "RFTIP_LOG_CONSOLE";
pub const ENV_LOG_PERSIST: &str = "RFTIP_LOG_PERSIST";
pub const ENV_LOG_MAX_ENTRIES: &str = "RFTIP_LOG_MAX_ENTRIES";
pub const ENV_LOCALE: &str = "RFTIP_LOCALE";

/// Everything needed to build a [`ClientContext`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub logger: LoggerConfig,
    pub pipeline: PipelineConfig,
    pub locale: Locale,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `RFTIP_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_BASE_URL) {
            config.pipeline.base_url = url;
        }
        if let Some(ms) = lookup(ENV_API_TIMEOUT_MS) {
            config.pipeline.timeout_ms = parse_var(ENV_API_TIMEOUT_MS, &ms)?;
        }
        if let Some(ms) = lookup(ENV_SLOW_RESPONSE_MS) {
            config.pipeline.slow_response_ms = parse_var(ENV_SLOW_RESPONSE_MS, &ms)?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            config.logger.min_level = parse_var::<LogLevel>(ENV_LOG_LEVEL, &level)?;
        }
        if let Some(flag) = lookup(ENV_LOG_CONSOLE) {
            config.logger.enable_console = parse_flag(ENV_LOG_CONSOLE, &flag)?;
        }
        if let Some(flag) = lookup(ENV_LOG_PERSIST) {
            config.logger.enable_persistence = parse_flag(ENV_LOG_PERSIST, &flag)?;
        }
        if let Some(max) = lookup(ENV_LOG_MAX_ENTRIES) {
            config.logger.max_stored_entries = parse_var(ENV_LOG_MAX_ENTRIES, &max)?;
        }
        if let Some(locale) = lookup(ENV_LOCALE) {
            config.locale = parse_var(ENV_LOCALE, &locale)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_logger(mut self, logger: LoggerConfig) -> Self {
        self.logger = logger;
        self
    }

    #[must_use]
    pub fn with_pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.pipeline = pipeline;
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.logger.validate()?;
        self.pipeline.validate()
    }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ClientError::config(name, format!("invalid value {:?}: {}", raw, e)))
}

fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ClientError::config(name, format!("invalid flag {:?}", raw))),
    }
}

/// The wired client
///
/// ```no_run
/// use rftip_client::context::ClientContext;
///
/// # async fn run() -> rftip_client::Result<()> {
/// let client = ClientContext::builder().build()?;
/// let zones = client
///     .dispatcher()
///     .wrap(client.pipeline().get_json::<serde_json::Value>("/zones"), Default::default())
///     .await;
/// # let _ = zones;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ClientContext {
    config: ClientConfig,
    logger: Arc<Logger>,
    session: Arc<SessionStore>,
    pipeline: Arc<HttpPipeline>,
    dispatcher: Arc<NotificationDispatcher>,
    navigator: Arc<dyn Navigator>,
}

impl ClientContext {
    pub fn builder() -> ClientContextBuilder {
        ClientContextBuilder::new()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn pipeline(&self) -> &Arc<HttpPipeline> {
        &self.pipeline
    }

    pub fn dispatcher(&self) -> &Arc<NotificationDispatcher> {
        &self.dispatcher
    }

    pub fn notifications(&self) -> &NotificationCenter {
        self.dispatcher.center()
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    pub fn catalog(&self) -> MessageCatalog {
        MessageCatalog::new(self.config.locale)
    }
}

impl std::fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientContext")
            .field("config", &self.config)
            .field("session_id", &self.logger.session_id())
            .field("authenticated", &self.session.is_authenticated())
            .finish()
    }
}

/// Builder for [`ClientContext`]
///
/// Unset seams default to in-memory storage, the reqwest transport and an
/// in-memory navigator at `/`.
#[derive(Default)]
pub struct ClientContextBuilder {
    config: ClientConfig,
    storage: Option<Arc<dyn Storage>>,
    transport: Option<Arc<dyn Transport>>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl ClientContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn logger_config(mut self, logger: LoggerConfig) -> Self {
        self.config.logger = logger;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn pipeline_config(mut self, pipeline: PipelineConfig) -> Self {
        self.config.pipeline = pipeline;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn locale(mut self, locale: Locale) -> Self {
        self.config.locale = locale;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.pipeline = self.config.pipeline.with_timeout(timeout);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn build(self) -> Result<ClientContext> {
        let config = self.config;
        config.validate()?;

        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStorage::new()) as Arc<dyn Storage>);
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?) as Arc<dyn Transport>,
        };
        let navigator = self
            .navigator
            .unwrap_or_else(|| Arc::new(MemoryNavigator::default()) as Arc<dyn Navigator>);

        let logger = Arc::new(
            Logger::builder()
                .config(config.logger.clone())
                .storage(storage.clone())
                .build()?,
        );
        let session = Arc::new(SessionStore::new(storage).with_logger(logger.clone()));
        let catalog = MessageCatalog::new(config.locale);

        let pipeline = Arc::new(HttpPipeline::new(
            config.pipeline.clone(),
            transport,
            logger.clone(),
            session.clone(),
            navigator.clone(),
            catalog,
        ));
        let dispatcher = Arc::new(
            NotificationDispatcher::new(
                NotificationCenter::new(),
                logger.clone(),
                session.clone(),
                navigator.clone(),
                catalog,
            )
            .with_login_path(config.pipeline.login_path.clone()),
        );

        logger.info(format!("Client initialized (session {})", logger.session_id()));

        Ok(ClientContext {
            config,
            logger,
            session,
            pipeline,
            dispatcher,
            navigator,
        })
    }
}
