//! Localized message tables
//!
//! Every table is an exhaustive match over a closed enum. Message resolution
//! for a classified error falls back in this order: the [`ServerCode`] table,
//! the server's own message, then [`MessageCatalog::generic_failure`].

use super::kind::ErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language of user-facing text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-CN")]
    ZhCn,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::ZhCn => "zh-CN",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            "zh" | "zh-cn" | "zh-hans" => Ok(Locale::ZhCn),
            _ => Err(format!("Unsupported locale: {}", s)),
        }
    }
}

/// Error tokens the backend is known to send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerCode {
    AuthenticationFailed,
    TokenExpired,
    InvalidToken,
    PermissionDenied,
    ValidationError,
    NotFound,
    UserNotFound,
    FileNotFound,
    Conflict,
    DuplicateUser,
    InternalServerError,
    DatabaseError,
    NetworkError,
    FileProcessingFailed,
    InvalidFileType,
    FileSizeLimitExceeded,
    RateLimitExceeded,
}

impl ServerCode {
    pub const ALL: [ServerCode; 17] = [
        ServerCode::AuthenticationFailed,
        ServerCode::TokenExpired,
        ServerCode::InvalidToken,
        ServerCode::PermissionDenied,
        ServerCode::ValidationError,
        ServerCode::NotFound,
        ServerCode::UserNotFound,
        ServerCode::FileNotFound,
        ServerCode::Conflict,
        ServerCode::DuplicateUser,
        ServerCode::InternalServerError,
        ServerCode::DatabaseError,
        ServerCode::NetworkError,
        ServerCode::FileProcessingFailed,
        ServerCode::InvalidFileType,
        ServerCode::FileSizeLimitExceeded,
        ServerCode::RateLimitExceeded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServerCode::AuthenticationFailed => "AUTHENTICATION_FAILED",
            ServerCode::TokenExpired => "TOKEN_EXPIRED",
            ServerCode::InvalidToken => "INVALID_TOKEN",
            ServerCode::PermissionDenied => "PERMISSION_DENIED",
            ServerCode::ValidationError => "VALIDATION_ERROR",
            ServerCode::NotFound => "NOT_FOUND",
            ServerCode::UserNotFound => "USER_NOT_FOUND",
            ServerCode::FileNotFound => "FILE_NOT_FOUND",
            ServerCode::Conflict => "CONFLICT",
            ServerCode::DuplicateUser => "DUPLICATE_USER",
            ServerCode::InternalServerError => "INTERNAL_SERVER_ERROR",
            ServerCode::DatabaseError => "DATABASE_ERROR",
            ServerCode::NetworkError => "NETWORK_ERROR",
            ServerCode::FileProcessingFailed => "FILE_PROCESSING_FAILED",
            ServerCode::InvalidFileType => "INVALID_FILE_TYPE",
            ServerCode::FileSizeLimitExceeded => "FILE_SIZE_LIMIT_EXCEEDED",
            ServerCode::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
        }
    }

    /// Exact, case-sensitive lookup
    pub fn parse(token: &str) -> Option<Self> {
        ServerCode::ALL.into_iter().find(|code| code.as_str() == token)
    }

    /// Code whose message stands in for a kind when the server sent none
    pub fn default_for(kind: ErrorKind) -> Option<Self> {
        match kind {
            ErrorKind::Network => Some(ServerCode::NetworkError),
            ErrorKind::Server => Some(ServerCode::InternalServerError),
            ErrorKind::Validation => Some(ServerCode::ValidationError),
            ErrorKind::Authentication => Some(ServerCode::TokenExpired),
            ErrorKind::Authorization => Some(ServerCode::PermissionDenied),
            ErrorKind::NotFound => Some(ServerCode::NotFound),
            ErrorKind::Conflict => Some(ServerCode::Conflict),
            ErrorKind::RateLimit => Some(ServerCode::RateLimitExceeded),
            ErrorKind::Unknown => None,
        }
    }
}

impl fmt::Display for ServerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lookup tables for one locale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageCatalog {
    locale: Locale,
}

impl MessageCatalog {
    pub const fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn server_message(&self, code: ServerCode) -> &'static str {
        use ServerCode::*;
        match self.locale {
            Locale::En => match code {
                AuthenticationFailed => "Sign-in failed, please check your username and password",
                TokenExpired => "Your session has expired, please sign in again",
                InvalidToken => "Your sign-in is no longer valid, please sign in again",
                PermissionDenied => "You do not have permission to perform this action",
                ValidationError => "The submitted data is invalid, please check it and try again",
                NotFound => "The requested resource does not exist",
                UserNotFound => "User does not exist",
                FileNotFound => "File does not exist",
                Conflict => "Data conflict, please refresh and try again",
                DuplicateUser => "Username already exists",
                InternalServerError => "Server error, please try again later",
                DatabaseError => "Database error, please try again later",
                NetworkError => "Network connection failed, please check your network settings",
                FileProcessingFailed => "File processing failed",
                InvalidFileType => "Unsupported file type",
                FileSizeLimitExceeded => "File size exceeds the limit",
                RateLimitExceeded => "Too many requests, please try again later",
            },
            Locale::ZhCn => match code {
                AuthenticationFailed => "登录失败，请检查用户名和密码",
                TokenExpired => "登录已过期，请重新登录",
                InvalidToken => "登录信息无效，请重新登录",
                PermissionDenied => "您没有权限执行此操作",
                ValidationError => "输入数据有误，请检查后重试",
                NotFound => "请求的资源不存在",
                UserNotFound => "用户不存在",
                FileNotFound => "文件不存在",
                Conflict => "数据冲突，请刷新后重试",
                DuplicateUser => "用户名已存在",
                InternalServerError => "服务器错误，请稍后重试",
                DatabaseError => "数据库错误，请稍后重试",
                NetworkError => "网络连接失败，请检查网络设置",
                FileProcessingFailed => "文件处理失败",
                InvalidFileType => "不支持的文件类型",
                FileSizeLimitExceeded => "文件大小超出限制",
                RateLimitExceeded => "请求过于频繁，请稍后再试",
            },
        }
    }

    /// Default message for a kind, used when the response carried no message
    pub fn kind_message(&self, kind: ErrorKind) -> &'static str {
        match ServerCode::default_for(kind) {
            Some(code) => self.server_message(code),
            None => self.generic_failure(),
        }
    }

    pub fn network_failure(&self) -> &'static str {
        self.server_message(ServerCode::NetworkError)
    }

    pub fn generic_failure(&self) -> &'static str {
        match self.locale {
            Locale::En => "Operation failed, please try again later",
            Locale::ZhCn => "操作失败，请稍后重试",
        }
    }

    pub fn unknown_error(&self) -> &'static str {
        match self.locale {
            Locale::En => "An unknown error occurred",
            Locale::ZhCn => "发生未知错误",
        }
    }

    pub fn invalid_response(&self) -> &'static str {
        match self.locale {
            Locale::En => "The server returned a response that could not be read",
            Locale::ZhCn => "服务器返回的数据无法解析",
        }
    }

    pub fn request_failed(&self, status: u16) -> String {
        match self.locale {
            Locale::En => format!("Request failed ({})", status),
            Locale::ZhCn => format!("请求失败 ({})", status),
        }
    }

    pub fn rate_limited(&self, retry_after: &str) -> String {
        match self.locale {
            Locale::En => format!("Too many requests, please retry in {} seconds", retry_after),
            Locale::ZhCn => format!("请求过于频繁，请 {} 秒后重试", retry_after),
        }
    }

    pub fn suggested_action(&self, kind: ErrorKind) -> &'static str {
        use ErrorKind::*;
        match self.locale {
            Locale::En => match kind {
                Network => "Please check your network connection",
                Server => "Please try again later, and contact support if the problem persists",
                Validation => "Please check your input",
                Authentication => "Please sign in again",
                Authorization => "You do not have permission to perform this action",
                NotFound => "Please confirm that the resource exists",
                Conflict => "Please refresh the page and try again",
                RateLimit | Unknown => "Please try again later",
            },
            Locale::ZhCn => match kind {
                Network => "请检查您的网络连接",
                Server => "请稍后重试，如果问题持续存在请联系技术支持",
                Validation => "请检查您的输入信息",
                Authentication => "请重新登录",
                Authorization => "您没有权限执行此操作",
                NotFound => "请确认资源是否存在",
                Conflict => "请刷新页面后重试",
                RateLimit => "请稍后再试",
                Unknown => "请稍后重试",
            },
        }
    }

    pub fn display_title(&self, kind: ErrorKind) -> &'static str {
        use ErrorKind::*;
        match self.locale {
            Locale::En => match kind {
                Network => "Network error",
                Server => "Server error",
                Validation => "Input error",
                Authentication => "Authentication failed",
                Authorization => "Permission denied",
                NotFound => "Not found",
                Conflict => "Data conflict",
                RateLimit => "Too many requests",
                Unknown => "Error",
            },
            Locale::ZhCn => match kind {
                Network => "网络错误",
                Server => "服务器错误",
                Validation => "输入错误",
                Authentication => "认证失败",
                Authorization => "权限不足",
                NotFound => "未找到",
                Conflict => "数据冲突",
                RateLimit => "请求过于频繁",
                Unknown => "错误",
            },
        }
    }

    /// Placeholder shown while a wrapped operation runs
    pub fn loading(&self) -> &'static str {
        match self.locale {
            Locale::En => "Processing...",
            Locale::ZhCn => "处理中...",
        }
    }
}
