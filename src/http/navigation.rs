//! Navigation seam used for the forced-logout redirect

use parking_lot::Mutex;

/// Default path of the login view
pub const DEFAULT_LOGIN_PATH: &str = "/login";
/// Query parameter carrying the return target
pub const REDIRECT_PARAM: &str = "redirect";

const LOCATION_BASE: &str = "http://localhost/";

/// A navigation target with optional query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Redirect {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Path plus percent-encoded query, e.g. `/login?redirect=%2Ftracks`
    pub fn location(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let mut url = match reqwest::Url::parse(LOCATION_BASE).and_then(|base| base.join(&self.path)) {
            Ok(url) => url,
            Err(_) => return self.path.clone(),
        };
        url.query_pairs_mut().extend_pairs(&self.query);
        match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        }
    }
}

/// Where the application currently is, and how to move it
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    fn redirect_to(&self, redirect: Redirect);
}

/// In-process navigator that records every redirect
#[derive(Debug)]
pub struct MemoryNavigator {
    current: Mutex<String>,
    history: Mutex<Vec<Redirect>>,
}

impl MemoryNavigator {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            current: Mutex::new(path.into()),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn set_path(&self, path: impl Into<String>) {
        *self.current.lock() = path.into();
    }

    pub fn redirects(&self) -> Vec<Redirect> {
        self.history.lock().clone()
    }

    pub fn last_redirect(&self) -> Option<Redirect> {
        self.history.lock().last().cloned()
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.current.lock().clone()
    }

    fn redirect_to(&self, redirect: Redirect) {
        *self.current.lock() = redirect.path.clone();
        self.history.lock().push(redirect);
    }
}

/// Send the user to the login view, carrying the current path as return target
///
/// Nothing happens when already on the login view. The return target is
/// omitted for the root path. Returns the redirect that was issued.
pub fn redirect_to_login(navigator: &dyn Navigator, login_path: &str) -> Option<Redirect> {
    let current = navigator.current_path();
    let current_path = current.split('?').next().unwrap_or(current.as_str());
    if current_path == login_path {
        return None;
    }

    let mut redirect = Redirect::new(login_path);
    if current_path != "/" {
        redirect = redirect.with_query(REDIRECT_PARAM, current.as_str());
    }
    navigator.redirect_to(redirect.clone());
    Some(redirect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_encoding() {
        let redirect = Redirect::new("/login").with_query(REDIRECT_PARAM, "/tracks/42");
        assert_eq!(redirect.location(), "/login?redirect=%2Ftracks%2F42");
        assert_eq!(Redirect::new("/login").location(), "/login");
    }

    #[test]
    fn test_redirect_carries_current_path() {
        let navigator = MemoryNavigator::new("/zones/7");
        let redirect = redirect_to_login(&navigator, DEFAULT_LOGIN_PATH).unwrap();

        assert_eq!(redirect.query_value(REDIRECT_PARAM), Some("/zones/7"));
        assert_eq!(navigator.current_path(), "/login");
        assert_eq!(navigator.redirects().len(), 1);
    }

    #[test]
    fn test_no_redirect_on_login_view() {
        let navigator = MemoryNavigator::new("/login?redirect=%2Ffiles");
        assert!(redirect_to_login(&navigator, DEFAULT_LOGIN_PATH).is_none());
        assert!(navigator.last_redirect().is_none());
    }

    #[test]
    fn test_root_path_has_no_return_target() {
        let navigator = MemoryNavigator::default();
        let redirect = redirect_to_login(&navigator, DEFAULT_LOGIN_PATH).unwrap();
        assert!(redirect.query.is_empty());
    }
}
