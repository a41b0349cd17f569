use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::SET_COOKIE, request::Parts, HeaderName},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use time::Duration;

use crate::cookies;

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Info,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Error => "error",
            Level::Info => "info",
        }
    }
}

/// Every status message the site can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Registered,
    LoggedIn,
    LoginRequired,
    LoggedOut,
    ProfileUpdated,
    DuplicateAccount,
    InvalidCredentials,
    MissingUsername,
    InvalidEmail,
    PasswordTooShort,
    FieldTooLong,
    ControlCharacters,
}

impl Notice {
    const ALL: [Notice; 12] = [
        Notice::Registered,
        Notice::LoggedIn,
        Notice::LoginRequired,
        Notice::LoggedOut,
        Notice::ProfileUpdated,
        Notice::DuplicateAccount,
        Notice::InvalidCredentials,
        Notice::MissingUsername,
        Notice::InvalidEmail,
        Notice::PasswordTooShort,
        Notice::FieldTooLong,
        Notice::ControlCharacters,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Notice::Registered => "registered",
            Notice::LoggedIn => "logged_in",
            Notice::LoginRequired => "login_required",
            Notice::LoggedOut => "logged_out",
            Notice::ProfileUpdated => "profile_updated",
            Notice::DuplicateAccount => "duplicate_account",
            Notice::InvalidCredentials => "invalid_credentials",
            Notice::MissingUsername => "missing_username",
            Notice::InvalidEmail => "invalid_email",
            Notice::PasswordTooShort => "password_too_short",
            Notice::FieldTooLong => "field_too_long",
            Notice::ControlCharacters => "control_characters",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.code() == code)
    }

    pub fn level(self) -> Level {
        match self {
            Notice::Registered | Notice::LoggedIn | Notice::ProfileUpdated => Level::Success,
            Notice::LoggedOut => Level::Info,
            _ => Level::Error,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::Registered => "Registration successful! You can now log in.",
            Notice::LoggedIn => "You have logged in successfully!",
            Notice::LoginRequired => "Please log in first.",
            Notice::LoggedOut => "You have been logged out.",
            Notice::ProfileUpdated => "Profile updated successfully!",
            Notice::DuplicateAccount => "A user with this username or email already exists.",
            Notice::InvalidCredentials => "Invalid username or password.",
            Notice::MissingUsername => "Username is required.",
            Notice::InvalidEmail => "Please enter a valid email address.",
            Notice::PasswordTooShort => "Password must be at least 8 characters long.",
            Notice::FieldTooLong => {
                "Too long: username up to 32, email and full name up to 128, bio up to 500 characters."
            }
            Notice::ControlCharacters => "Fields may not contain control characters.",
        }
    }
}

/// `Set-Cookie` value carrying `notice` to the next page. `secure` follows
/// the session cookie setting.
pub fn set_cookie(notice: Notice, secure: bool) -> String {
    cookies::set(FLASH_COOKIE, notice.code().to_string(), Duration::minutes(1), secure)
}

/// Redirect that shows `notice` on the target page.
pub fn redirect_with(notice: Notice, to: &str, secure: bool) -> Response {
    (
        AppendHeaders([(SET_COOKIE, set_cookie(notice, secure))]),
        Redirect::to(to),
    )
        .into_response()
}

/// Pending flash message of the current request, if any.
pub struct Flash(pub Option<Notice>);

impl Flash {
    pub fn notice(&self) -> Option<Notice> {
        self.0
    }

    /// Headers that consume the message so it is shown once.
    pub fn consume(&self) -> AppendHeaders<Vec<(HeaderName, String)>> {
        let mut headers = Vec::new();
        if self.0.is_some() {
            headers.push((SET_COOKIE, cookies::removal(FLASH_COOKIE)));
        }
        AppendHeaders(headers)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let notice = cookies::read(&parts.headers, FLASH_COOKIE)
            .as_deref()
            .and_then(Notice::from_code);
        Ok(Flash(notice))
    }
}
