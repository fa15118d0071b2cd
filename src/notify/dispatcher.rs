//! Turns outcomes into notifications
//!
//! Errors routed through [`NotificationDispatcher::wrap`] or
//! [`NotificationDispatcher::wrap_with_loading`] are always surfaced unless
//! the caller asked for silence.

use super::center::NotificationCenter;
use super::notification::{
    NotificationKind, ERROR_DURATION_MS, NETWORK_ERROR_DURATION_MS,
};
use crate::core::{LogContext, Logger};
use crate::errors::{AppError, ErrorClassifier, ErrorKind, Failure, MessageCatalog};
use crate::http::{redirect_to_login, CredentialStore, Navigator, Redirect, DEFAULT_LOGIN_PATH};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// What [`NotificationDispatcher::dispatch_error`] did
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// An error notification was shown
    Notified { notification: u64, error: AppError },
    /// Auth failure: credentials cleared, user sent to the login view
    LoggedOut {
        notification: u64,
        error: AppError,
        redirect: Option<Redirect>,
    },
}

impl DispatchOutcome {
    pub fn error(&self) -> &AppError {
        match self {
            DispatchOutcome::Notified { error, .. } | DispatchOutcome::LoggedOut { error, .. } => error,
        }
    }

    pub fn notification(&self) -> u64 {
        match self {
            DispatchOutcome::Notified { notification, .. }
            | DispatchOutcome::LoggedOut { notification, .. } => *notification,
        }
    }
}

/// Options for [`NotificationDispatcher::wrap`]
///
/// ```
/// use rftip_client::notify::WrapOptions;
///
/// let options = WrapOptions::new()
///     .success("Zone saved")
///     .loading("Saving zone...");
/// assert!(options.show_success);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WrapOptions {
    pub success_message: Option<String>,
    /// The success message is only shown when this is set
    pub show_success: bool,
    /// Replaces the classified message in the error notification
    pub error_message: Option<String>,
    /// Swallow failures without a notification
    pub silent: bool,
    pub loading_message: Option<String>,
    pub context: Option<LogContext>,
}

impl WrapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn success(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self.show_success = true;
        self
    }

    #[must_use]
    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    #[must_use]
    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    #[must_use]
    pub fn loading(mut self, message: impl Into<String>) -> Self {
        self.loading_message = Some(message.into());
        self
    }

    #[must_use]
    pub fn context(mut self, context: LogContext) -> Self {
        self.context = Some(context);
        self
    }
}

/// Removes the loading placeholder however the wrapped future ends
struct Placeholder<'a> {
    center: &'a NotificationCenter,
    id: u64,
}

impl Drop for Placeholder<'_> {
    fn drop(&mut self) {
        self.center.remove(self.id);
    }
}

pub struct NotificationDispatcher {
    center: NotificationCenter,
    classifier: ErrorClassifier,
    logger: Arc<Logger>,
    credentials: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    login_path: String,
    dispatched: AtomicU64,
}

impl NotificationDispatcher {
    pub fn new(
        center: NotificationCenter,
        logger: Arc<Logger>,
        credentials: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        catalog: MessageCatalog,
    ) -> Self {
        Self {
            center,
            classifier: ErrorClassifier::new(logger.clone(), catalog),
            logger,
            credentials,
            navigator,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            dispatched: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    pub fn center(&self) -> &NotificationCenter {
        &self.center
    }

    pub fn catalog(&self) -> &MessageCatalog {
        self.classifier.catalog()
    }

    /// Number of errors dispatched so far
    pub fn dispatch_count(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    pub fn notify(&self, kind: NotificationKind, message: impl Into<String>, duration_ms: Option<u64>) -> u64 {
        self.center.push(kind, message, duration_ms)
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.center.success(message, None)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.center.info(message, None)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.center.warning(message, None)
    }

    /// Classify if needed, log the decision and surface the error
    pub fn dispatch_error(&self, failure: impl Into<Failure>, context: Option<LogContext>) -> DispatchOutcome {
        self.dispatch(failure.into(), context, None)
    }

    fn dispatch(
        &self,
        failure: Failure,
        context: Option<LogContext>,
        message_override: Option<&str>,
    ) -> DispatchOutcome {
        self.dispatched.fetch_add(1, Ordering::Relaxed);

        let error = self.classifier.resolve(failure, context.clone());
        let mut display = error.display(self.catalog());
        if let Some(message) = message_override {
            display.message = message.to_string();
        }

        let mut fields = LogContext::new()
            .with_field("errorType", error.kind.as_str())
            .with_field("errorCode", error.code.to_string());
        if let Some(context) = context {
            fields.add_field("context", context.to_json_value());
        }
        self.logger.warn_with_context(
            format!("User notification: {} - {}", display.title, display.message),
            fields,
        );

        if error.is_auth_error() {
            self.credentials.clear();
            let notification = self.center.error(display.message, Some(ERROR_DURATION_MS));
            let redirect = redirect_to_login(self.navigator.as_ref(), &self.login_path);
            return DispatchOutcome::LoggedOut {
                notification,
                error,
                redirect,
            };
        }

        let duration = if error.kind == ErrorKind::Network {
            NETWORK_ERROR_DURATION_MS
        } else {
            ERROR_DURATION_MS
        };
        let notification = self.center.error(display.full_message(), Some(duration));
        DispatchOutcome::Notified {
            notification,
            error,
        }
    }

    /// Run `operation`; `None` on failure, after dispatching unless silent
    pub async fn wrap<T, E, F>(&self, operation: F, options: WrapOptions) -> Option<T>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<Failure>,
    {
        let result = operation.await;
        self.finish(result, options)
    }

    /// Like [`wrap`](Self::wrap), with a sticky loading notification while
    /// the operation runs
    pub async fn wrap_with_loading<T, E, F>(&self, operation: F, options: WrapOptions) -> Option<T>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<Failure>,
    {
        let message = options
            .loading_message
            .clone()
            .unwrap_or_else(|| self.catalog().loading().to_string());
        let placeholder = Placeholder {
            center: &self.center,
            id: self.center.info(message, Some(0)),
        };

        let result = operation.await;
        drop(placeholder);
        self.finish(result, options)
    }

    fn finish<T, E: Into<Failure>>(&self, result: Result<T, E>, options: WrapOptions) -> Option<T> {
        match result {
            Ok(value) => {
                if options.show_success {
                    if let Some(message) = options.success_message {
                        self.center.success(message, None);
                    }
                }
                Some(value)
            }
            Err(failure) => {
                if options.silent {
                    self.logger.debug("Operation failed silently");
                } else {
                    self.dispatch(
                        failure.into(),
                        options.context,
                        options.error_message.as_deref(),
                    );
                }
                None
            }
        }
    }
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("center", &self.center)
            .field("login_path", &self.login_path)
            .field("dispatched", &self.dispatch_count())
            .finish()
    }
}
