//! HTTP pipeline and its external collaborators

pub mod credentials;
pub mod navigation;
pub mod pipeline;
pub mod transport;
pub mod types;

pub use credentials::{CredentialStore, SessionStore, User, UserUpdate, TOKEN_KEY, USER_KEY};
pub use navigation::{
    redirect_to_login, MemoryNavigator, Navigator, Redirect, DEFAULT_LOGIN_PATH, REDIRECT_PARAM,
};
pub use pipeline::{HttpPipeline, PipelineConfig};
pub use transport::{ReqwestTransport, ScriptedTransport, Transport};
pub use types::{
    HttpRequest, HttpResponse, Method, RawFailure, RequestBody, RequestMetadata, ResponseFormat,
    TransportOutcome, REQUEST_ID_HEADER,
};
