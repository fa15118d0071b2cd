//! Main logger implementation
//!
//! The logger keeps a bounded, ordered history of entries in memory, mirrors
//! it to a [`Storage`] backend after every write, and forwards each entry to
//! the registered appenders (the console sink by default). A log call never
//! returns an error: persistence and appender failures are reported on
//! stderr and counted in [`LoggerMetrics`].

use super::{
    appender::Appender,
    config::LoggerConfig,
    error::{ClientError, Result},
    log_context::LogContext,
    log_entry::{ErrorSnapshot, LogEntry},
    log_level::LogLevel,
    metrics::LoggerMetrics,
};
use crate::appenders::ConsoleAppender;
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use parking_lot::{Mutex, RwLock};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Context `type` tag of entries written by [`Logger::api_request`]
pub const API_REQUEST_TYPE: &str = "api_request";
/// Context `type` tag of entries written by [`Logger::api_response`]
pub const API_RESPONSE_TYPE: &str = "api_response";
/// Context `type` tag of entries written by [`Logger::user_action`]
pub const USER_ACTION_TYPE: &str = "user_action";

/// Serialized bundle produced by [`Logger::export`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogExport {
    pub session_id: String,
    pub export_time: DateTime<Utc>,
    pub logs: Vec<LogEntry>,
}

impl LogExport {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Summary returned by [`Logger::stats`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogStats {
    pub total: usize,
    pub by_level: BTreeMap<LogLevel, usize>,
    pub session_id: String,
    pub session_duration: Duration,
}

pub struct Logger {
    config: RwLock<LoggerConfig>,
    entries: Mutex<VecDeque<LogEntry>>,
    appenders: RwLock<Vec<Box<dyn Appender>>>,
    storage: Option<Arc<dyn Storage>>,
    session_id: String,
    session_start: DateTime<Utc>,
    metrics: LoggerMetrics,
}

impl Logger {
    /// Logger without persistence backend or appenders
    #[must_use]
    pub fn new(config: LoggerConfig) -> Self {
        Self {
            config: RwLock::new(config),
            entries: Mutex::new(VecDeque::new()),
            appenders: RwLock::new(Vec::new()),
            storage: None,
            session_id: generate_session_id(Utc::now()),
            session_start: Utc::now(),
            metrics: LoggerMetrics::new(),
        }
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn config(&self) -> LoggerConfig {
        self.config.read().clone()
    }

    pub fn min_level(&self) -> LogLevel {
        self.config.read().min_level
    }

    pub fn set_min_level(&self, level: LogLevel) {
        self.config.write().min_level = level;
    }

    pub fn add_appender(&self, appender: Box<dyn Appender>) {
        self.appenders.write().push(appender);
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Load persisted history, keeping only the most recent entries at or
    /// above the configured minimum level
    fn load_persisted(&self) {
        let (enabled, key, max, min_level) = {
            let config = self.config.read();
            (
                config.enable_persistence,
                config.persistence_key.clone(),
                config.max_stored_entries,
                config.min_level,
            )
        };
        let Some(storage) = self.storage.as_ref().filter(|_| enabled) else {
            return;
        };

        let stored = match storage.get(&key) {
            Ok(Some(stored)) => stored,
            Ok(None) => return,
            Err(e) => {
                eprintln!("[LOGGER ERROR] Failed to load logs from storage: {}", e);
                return;
            }
        };

        match serde_json::from_str::<Vec<LogEntry>>(&stored) {
            Ok(loaded) => {
                let loaded: Vec<LogEntry> = loaded
                    .into_iter()
                    .filter(|e| e.level >= min_level)
                    .collect();
                let mut entries = self.entries.lock();
                let skip = loaded.len().saturating_sub(max);
                entries.extend(loaded.into_iter().skip(skip));
            }
            Err(e) => {
                eprintln!("[LOGGER ERROR] Failed to parse persisted logs: {}", e);
            }
        }
    }

    /// Core write path: filter, append, persist, emit
    fn record(&self, level: LogLevel, message: String, context: Option<LogContext>, error: Option<ErrorSnapshot>) {
        let config = self.config.read().clone();
        if level < config.min_level {
            self.metrics.record_filtered();
            return;
        }

        let mut entry = LogEntry::new(level, message).with_session(self.session_id.clone());
        if let Some(context) = context {
            entry = entry.with_context(context);
        }
        if let Some(error) = error {
            entry = entry.with_error(error);
        }

        {
            // The history lock is held across the storage write so persisted
            // snapshots land in the same order as the appends.
            let mut entries = self.entries.lock();
            entries.push_back(entry.clone());
            self.metrics.record_logged();

            let overflow = entries.len().saturating_sub(config.max_stored_entries);
            if overflow > 0 {
                entries.drain(..overflow);
                self.metrics.record_evicted(overflow as u64);
            }

            if config.enable_persistence {
                self.persist(&entries, &config.persistence_key);
            }
        }

        if config.enable_console {
            self.emit(&entry);
        }
    }

    fn persist(&self, entries: &VecDeque<LogEntry>, key: &str) {
        let Some(storage) = self.storage.as_ref() else {
            return;
        };

        let result = serde_json::to_string(entries)
            .map_err(ClientError::from)
            .and_then(|json| storage.set(key, &json).map_err(ClientError::from));

        if let Err(e) = result {
            let failures = self.metrics.record_persistence_failure();
            // Report the first failure and every hundredth after it
            if failures % 100 == 0 {
                eprintln!(
                    "[LOGGER ERROR] Failed to save logs to storage '{}': {}",
                    storage.name(),
                    e
                );
            }
        }
    }

    /// Forward an entry to every appender, isolating failures and panics
    fn emit(&self, entry: &LogEntry) {
        let mut appenders = self.appenders.write();

        for appender in appenders.iter_mut() {
            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(entry)
            }));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    self.metrics.record_appender_failure();
                    eprintln!("[LOGGER ERROR] Appender '{}' failed: {}", appender.name(), e);
                }
                Err(panic_info) => {
                    self.metrics.record_appender_failure();
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LOGGER CRITICAL] Appender '{}' panicked: {}. \
                         Other appenders continue to function.",
                        appender.name(),
                        panic_msg
                    );
                }
            }
        }
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.record(level, message.into(), None, None);
    }

    /// Log with structured context fields
    pub fn log_with_context(&self, level: LogLevel, message: impl Into<String>, context: LogContext) {
        self.record(level, message.into(), Some(context), None);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn critical(&self, message: impl Into<String>) {
        self.log(LogLevel::Critical, message);
    }

    pub fn debug_with_context(&self, message: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Debug, message, context);
    }

    pub fn info_with_context(&self, message: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Info, message, context);
    }

    pub fn warn_with_context(&self, message: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Warning, message, context);
    }

    pub fn error_with_context(&self, message: impl Into<String>, context: LogContext) {
        self.log_with_context(LogLevel::Error, message, context);
    }

    /// ERROR entry carrying a snapshot of the failure that caused it
    pub fn error_with_cause<E>(&self, message: impl Into<String>, cause: &E, context: Option<LogContext>)
    where
        E: std::error::Error + ?Sized,
    {
        self.log_failure(LogLevel::Error, message.into(), cause, context);
    }

    /// CRITICAL entry carrying a snapshot of the failure that caused it
    pub fn critical_with_cause<E>(&self, message: impl Into<String>, cause: &E, context: Option<LogContext>)
    where
        E: std::error::Error + ?Sized,
    {
        self.log_failure(LogLevel::Critical, message.into(), cause, context);
    }

    fn log_failure<E>(&self, level: LogLevel, message: String, cause: &E, context: Option<LogContext>)
    where
        E: std::error::Error + ?Sized,
    {
        if level < self.min_level() {
            self.metrics.record_filtered();
            return;
        }
        let with_stack = self.config.read().capture_stack_trace;
        let snapshot = ErrorSnapshot::capture(cause, with_stack);
        self.record(level, message, context, Some(snapshot));
    }

    /// INFO entry for an outgoing API call, tagged `api_request`
    pub fn api_request(&self, method: &str, url: &str, context: LogContext) {
        let mut fields = LogContext::typed(API_REQUEST_TYPE)
            .with_field("method", method)
            .with_field("url", url);
        fields.merge(context);
        self.info_with_context(format!("API {} {}", method, url), fields);
    }

    /// Completion entry for an API call, tagged `api_response`
    ///
    /// Failed calls (status 0 for "no response", or 4xx/5xx) log at WARNING.
    pub fn api_response(&self, method: &str, url: &str, status: u16, duration: Duration, context: LogContext) {
        let level = if status == 0 || status >= 400 {
            LogLevel::Warning
        } else {
            LogLevel::Info
        };
        let mut fields = LogContext::typed(API_RESPONSE_TYPE)
            .with_field("method", method)
            .with_field("url", url)
            .with_field("status", status)
            .with_field("durationMs", duration.as_millis() as u64);
        fields.merge(context);
        self.log_with_context(level, format!("API {} {} - {}", method, url, status), fields);
    }

    /// INFO entry for a user-initiated action, tagged `user_action`
    pub fn user_action(&self, action: &str, context: LogContext) {
        let mut fields = LogContext::typed(USER_ACTION_TYPE).with_field("action", action);
        fields.merge(context);
        self.info_with_context(format!("User action: {}", action), fields);
    }

    /// Snapshot of the full history in insertion order
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn entries_by_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.level == level)
            .cloned()
            .collect()
    }

    pub fn entries_by_context_type(&self, context_type: &str) -> Vec<LogEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.context_type() == Some(context_type))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Empty the history and the persisted copy
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        entries.clear();

        let config = self.config.read();
        if !config.enable_persistence {
            return;
        }
        if let Some(storage) = self.storage.as_ref() {
            if let Err(e) = storage.remove(&config.persistence_key) {
                self.metrics.record_persistence_failure();
                eprintln!("[LOGGER ERROR] Failed to clear persisted logs: {}", e);
            }
        }
    }

    pub fn export_bundle(&self) -> LogExport {
        LogExport {
            session_id: self.session_id.clone(),
            export_time: Utc::now(),
            logs: self.entries(),
        }
    }

    /// Pretty-printed JSON `{sessionId, exportTime, logs}`
    pub fn export(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export_bundle())?)
    }

    /// The export bundle, gzip-compressed
    pub fn export_gzip(&self) -> Result<Vec<u8>> {
        let json = self.export()?;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(json.as_bytes())
            .map_err(|e| ClientError::io_operation("compressing log export", "gzip write failed", e))?;
        encoder
            .finish()
            .map_err(|e| ClientError::io_operation("compressing log export", "gzip finish failed", e))
    }

    /// File name for a download of the export, e.g. `rftip_logs_2024-01-15T10-30-00-123Z.json`
    pub fn export_file_name(&self) -> String {
        let stamp = Utc::now()
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string()
            .replace([':', '.'], "-");
        format!("rftip_logs_{}.json", stamp)
    }

    /// Write the export bundle into `dir`, returning the created file
    pub fn write_export(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.export_file_name());
        let json = self.export()?;
        std::fs::write(&path, json).map_err(|e| {
            ClientError::io_operation("writing log export", path.display().to_string(), e)
        })?;
        Ok(path)
    }

    pub fn stats(&self) -> LogStats {
        let entries = self.entries.lock();
        let mut by_level = BTreeMap::new();
        for entry in entries.iter() {
            *by_level.entry(entry.level).or_insert(0) += 1;
        }

        let session_duration = (Utc::now() - self.session_start)
            .to_std()
            .unwrap_or_default();

        LogStats {
            total: entries.len(),
            by_level,
            session_id: self.session_id.clone(),
            session_duration,
        }
    }

    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.write();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("session_id", &self.session_id)
            .field("min_level", &self.min_level())
            .field("entries", &self.len())
            .finish()
    }
}

/// `session_<unix millis>_<9 random chars>`
fn generate_session_id(now: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();
    format!("session_{}_{}", now.timestamp_millis(), suffix)
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rftip_client::prelude::*;
/// use rftip_client::storage::MemoryStorage;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Debug)
///     .console(false)
///     .storage(Arc::new(MemoryStorage::new()))
///     .build()
///     .unwrap();
///
/// logger.debug("ready");
/// assert_eq!(logger.entries().len(), 1);
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    appenders: Vec<Box<dyn Appender>>,
    storage: Option<Arc<dyn Storage>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            appenders: Vec::new(),
            storage: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.config.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn console(mut self, enabled: bool) -> Self {
        self.config.enable_console = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_stored_entries(mut self, max: usize) -> Self {
        self.config.max_stored_entries = max;
        self
    }

    /// Add an appender; when none is given and console output is enabled,
    /// a [`ConsoleAppender`] is installed
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    /// Persistence backend; without one the logger keeps history in memory only
    #[must_use = "builder methods return a new value"]
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Validate the configuration, build the logger and load persisted history
    pub fn build(self) -> Result<Logger> {
        self.config.validate()?;

        let mut appenders = self.appenders;
        if appenders.is_empty() && self.config.enable_console {
            appenders.push(Box::new(ConsoleAppender::new()));
        }

        let now = Utc::now();
        let logger = Logger {
            config: RwLock::new(self.config),
            entries: Mutex::new(VecDeque::new()),
            appenders: RwLock::new(appenders),
            storage: self.storage,
            session_id: generate_session_id(now),
            session_start: now,
            metrics: LoggerMetrics::new(),
        };
        logger.load_persisted();
        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageError};
    use flate2::read::GzDecoder;
    use std::io::Read;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn quiet_logger(storage: Arc<dyn Storage>, max: usize) -> Logger {
        Logger::builder()
            .min_level(LogLevel::Debug)
            .console(false)
            .max_stored_entries(max)
            .storage(storage)
            .build()
            .unwrap()
    }

    struct FailingStorage;

    impl Storage for FailingStorage {
        fn get(&self, _key: &str) -> std::result::Result<Option<String>, StorageError> {
            Ok(None)
        }
        fn set(&self, key: &str, _value: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                required: 1,
                available: 0,
            })
        }
        fn remove(&self, _key: &str) -> std::result::Result<(), StorageError> {
            Ok(())
        }
        fn name(&self) -> &str {
            "failing"
        }
    }

    struct CountingAppender(Arc<AtomicUsize>);

    impl Appender for CountingAppender {
        fn append(&mut self, _entry: &LogEntry) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        fn name(&self) -> &str {
            "counting"
        }
    }

    #[test]
    fn test_min_level_filters_before_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let logger = quiet_logger(storage.clone(), 10);
        logger.set_min_level(LogLevel::Warning);

        logger.info("hidden");
        logger.warn("visible");

        let entries = logger.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "visible");
        assert_eq!(logger.metrics().filtered_count(), 1);

        let persisted = storage.get("app_logs").unwrap().unwrap();
        assert!(!persisted.contains("hidden"));
    }

    #[test]
    fn test_capacity_keeps_most_recent() {
        let storage = Arc::new(MemoryStorage::new());
        let logger = quiet_logger(storage.clone(), 3);

        for i in 0..5 {
            logger.info(format!("entry {}", i));
        }

        let messages: Vec<_> = logger.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["entry 2", "entry 3", "entry 4"]);
        assert_eq!(logger.metrics().evicted_count(), 2);

        let persisted: Vec<LogEntry> =
            serde_json::from_str(&storage.get("app_logs").unwrap().unwrap()).unwrap();
        assert_eq!(persisted.len(), 3);
        assert_eq!(persisted[0].message, "entry 2");
    }

    #[test]
    fn test_persisted_history_is_loaded() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        {
            let first = quiet_logger(storage.clone(), 10);
            first.info("from previous session");
        }

        let second = quiet_logger(storage, 10);
        let entries = second.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "from previous session");
        assert_ne!(entries[0].session_id.as_deref(), Some(second.session_id()));
    }

    #[test]
    fn test_reload_drops_entries_below_min_level() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        {
            let verbose = quiet_logger(storage.clone(), 10);
            verbose.debug("debug from previous session");
            verbose.warn("warning from previous session");
        }

        let strict = Logger::builder()
            .min_level(LogLevel::Warning)
            .console(false)
            .max_stored_entries(10)
            .storage(storage.clone())
            .build()
            .unwrap();
        let entries = strict.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Warning);

        strict.warn("fresh warning");
        let persisted: Vec<LogEntry> =
            serde_json::from_str(&storage.get("app_logs").unwrap().unwrap()).unwrap();
        assert_eq!(persisted.len(), 2);
        assert!(persisted.iter().all(|e| e.level >= LogLevel::Warning));
    }

    #[test]
    fn test_persistence_failure_never_escalates() {
        let logger = quiet_logger(Arc::new(FailingStorage), 10);

        logger.info("still recorded");
        logger.error("also recorded");

        assert_eq!(logger.len(), 2);
        assert_eq!(logger.metrics().persistence_failures(), 2);
    }

    #[test]
    fn test_appender_receives_only_when_console_enabled() {
        let count = Arc::new(AtomicUsize::new(0));
        let logger = Logger::builder()
            .console(true)
            .appender(CountingAppender(count.clone()))
            .build()
            .unwrap();

        logger.info("one");
        logger.debug("filtered");
        assert_eq!(count.load(Ordering::SeqCst), 1);

        let silent = Logger::builder()
            .console(false)
            .appender(CountingAppender(count.clone()))
            .build()
            .unwrap();
        silent.info("two");
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_error_with_cause_snapshot() {
        let logger = quiet_logger(Arc::new(MemoryStorage::new()), 10);
        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "socket timeout");

        logger.error_with_cause("Upload failed", &io_err, None);

        let entry = &logger.entries_by_level(LogLevel::Error)[0];
        let snapshot = entry.error.as_ref().unwrap();
        assert_eq!(snapshot.message, "socket timeout");
    }

    #[test]
    fn test_cause_without_stack_trace() {
        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "socket timeout");
        let cause = ClientError::io_operation("uploading", "write failed", io_err);

        let traced = Logger::new(LoggerConfig::default().with_console(false));
        traced.error_with_cause("Upload failed", &cause, None);
        let snapshot = traced.entries()[0].error.clone().unwrap();
        assert!(snapshot.stack.as_deref().unwrap().contains("socket timeout"));

        let untraced = Logger::new(
            LoggerConfig::default()
                .with_console(false)
                .with_stack_trace(false),
        );
        untraced.critical_with_cause("Upload failed", &cause, None);

        let entry = &untraced.entries_by_level(LogLevel::Critical)[0];
        let snapshot = entry.error.as_ref().unwrap();
        assert_eq!(snapshot.name, "ClientError");
        assert_eq!(snapshot.message, cause.to_string());
        assert!(snapshot.stack.is_none());
    }

    #[test]
    fn test_api_helpers_tag_context_type() {
        let logger = quiet_logger(Arc::new(MemoryStorage::new()), 10);

        logger.api_request("GET", "/tracks", LogContext::new().with_field("requestId", "req_1"));
        logger.api_response("GET", "/tracks", 200, Duration::from_millis(12), LogContext::new());
        logger.api_response("GET", "/tracks", 404, Duration::from_millis(3), LogContext::new());
        logger.user_action("open track", LogContext::new());

        assert_eq!(logger.entries_by_context_type(API_REQUEST_TYPE).len(), 1);
        let responses = logger.entries_by_context_type(API_RESPONSE_TYPE);
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].level, LogLevel::Info);
        assert_eq!(responses[1].level, LogLevel::Warning);
        assert_eq!(logger.entries_by_context_type(USER_ACTION_TYPE).len(), 1);

        let request = &logger.entries_by_context_type(API_REQUEST_TYPE)[0];
        assert_eq!(request.request_id.as_deref(), Some("req_1"));
        assert_eq!(request.message, "API GET /tracks");
    }

    #[test]
    fn test_entries_are_snapshots() {
        let logger = quiet_logger(Arc::new(MemoryStorage::new()), 10);
        logger.info("first");

        let snapshot = logger.entries();
        logger.info("second");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(logger.len(), 2);
    }

    #[test]
    fn test_clear_removes_persisted_copy() {
        let storage = Arc::new(MemoryStorage::new());
        let logger = quiet_logger(storage.clone(), 10);
        logger.info("x");

        logger.clear();

        assert!(logger.is_empty());
        assert_eq!(storage.get("app_logs").unwrap(), None);
    }

    #[test]
    fn test_export_and_stats() {
        let logger = quiet_logger(Arc::new(MemoryStorage::new()), 10);
        logger.info("a");
        logger.warn("b");
        logger.warn("c");

        let bundle = LogExport::from_json(&logger.export().unwrap()).unwrap();
        assert_eq!(bundle.session_id, logger.session_id());
        assert_eq!(bundle.logs.len(), 3);

        let stats = logger.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_level.get(&LogLevel::Warning), Some(&2));
        assert_eq!(stats.by_level.get(&LogLevel::Error), None);
        assert!(stats.session_id.starts_with("session_"));
    }

    #[test]
    fn test_export_gzip_decompresses_to_bundle() {
        let logger = quiet_logger(Arc::new(MemoryStorage::new()), 10);
        logger.info("compressed");

        let bytes = logger.export_gzip().unwrap();
        let mut json = String::new();
        GzDecoder::new(bytes.as_slice()).read_to_string(&mut json).unwrap();

        let bundle = LogExport::from_json(&json).unwrap();
        assert_eq!(bundle.logs[0].message, "compressed");
    }

    #[test]
    fn test_export_file_name_has_no_colons() {
        let logger = Logger::default();
        let name = logger.export_file_name();
        assert!(name.starts_with("rftip_logs_"));
        assert!(name.ends_with(".json"));
        assert!(!name.trim_end_matches(".json").contains([':', '.']));
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let result = Logger::builder().max_stored_entries(0).build();
        assert!(matches!(result, Err(ClientError::InvalidConfiguration { .. })));
    }
}
