use axum::http::StatusCode;
use lazy_static::lazy_static;
use regex::Regex;
use sqlx::SqlitePool;

use crate::{
    auth::{
        dto::{LoginForm, ProfileForm, RegisterForm},
        password::{hash_password, verify_password},
        repo_types::{StoreError, User},
    },
    flash::Notice,
};

const MIN_PASSWORD_LEN: usize = 8;

// Byte limits. Every field ends up in the signed session cookie, which must
// stay under the ~4 KB browsers accept.
pub(crate) const MAX_USERNAME_LEN: usize = 32;
pub(crate) const MAX_EMAIL_LEN: usize = 128;
pub(crate) const MAX_FULL_NAME_LEN: usize = 128;
pub(crate) const MAX_BIO_LEN: usize = 500;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("username is required")]
    MissingUsername,
    #[error("invalid email")]
    InvalidEmail,
    #[error("password too short")]
    PasswordTooShort,
    #[error("field too long")]
    FieldTooLong,
    #[error("field contains control characters")]
    ControlCharacters,
    #[error("username or email already taken")]
    DuplicateKey,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateKey => AuthError::DuplicateKey,
            StoreError::NotFound => AuthError::NotFound,
            StoreError::Database(e) => AuthError::Internal(e.into()),
        }
    }
}

impl AuthError {
    /// Message shown on the re-rendered form.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            AuthError::MissingUsername => Some(Notice::MissingUsername),
            AuthError::InvalidEmail => Some(Notice::InvalidEmail),
            AuthError::PasswordTooShort => Some(Notice::PasswordTooShort),
            AuthError::FieldTooLong => Some(Notice::FieldTooLong),
            AuthError::ControlCharacters => Some(Notice::ControlCharacters),
            AuthError::DuplicateKey => Some(Notice::DuplicateAccount),
            AuthError::InvalidCredentials => Some(Notice::InvalidCredentials),
            AuthError::NotFound | AuthError::Internal(_) => None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingUsername
            | AuthError::InvalidEmail
            | AuthError::PasswordTooShort
            | AuthError::FieldTooLong
            | AuthError::ControlCharacters => StatusCode::UNPROCESSABLE_ENTITY,
            AuthError::DuplicateKey => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::NotFound | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Trimmed text, or `None` when blank.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Length and character checks shared by every stored text field. Newlines
/// and tabs are allowed only where `multiline` is set.
fn check_field(value: &str, max_len: usize, multiline: bool) -> Result<(), AuthError> {
    if value.len() > max_len {
        return Err(AuthError::FieldTooLong);
    }
    let allowed = |c: char| multiline && matches!(c, '\n' | '\r' | '\t');
    if value.chars().any(|c| c.is_control() && !allowed(c)) {
        return Err(AuthError::ControlCharacters);
    }
    Ok(())
}

/// Validate the form, hash the password and insert the user.
pub async fn register(db: &SqlitePool, form: RegisterForm) -> Result<User, AuthError> {
    let username = form.username.trim();
    let email = form.email.trim().to_lowercase();

    if username.is_empty() {
        return Err(AuthError::MissingUsername);
    }
    check_field(username, MAX_USERNAME_LEN, false)?;
    check_field(&email, MAX_EMAIL_LEN, false)?;
    if !is_valid_email(&email) {
        return Err(AuthError::InvalidEmail);
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::PasswordTooShort);
    }
    let full_name = non_blank(form.full_name);
    if let Some(name) = &full_name {
        check_field(name, MAX_FULL_NAME_LEN, false)?;
    }

    let hash = hash_password(&form.password)?;
    let user = User::create(db, username, &email, &hash, full_name.as_deref()).await?;
    Ok(user)
}

/// Unknown username and wrong password both yield `InvalidCredentials`.
pub async fn authenticate(db: &SqlitePool, form: &LoginForm) -> Result<User, AuthError> {
    let Some(user) = User::find_by_username(db, form.username.trim()).await? else {
        return Err(AuthError::InvalidCredentials);
    };
    if !verify_password(&form.password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials);
    }
    Ok(user)
}

pub async fn update_profile(db: &SqlitePool, user_id: i64, form: ProfileForm) -> Result<User, AuthError> {
    let full_name = non_blank(form.full_name);
    let bio = non_blank(form.bio);
    if let Some(name) = &full_name {
        check_field(name, MAX_FULL_NAME_LEN, false)?;
    }
    if let Some(bio) = &bio {
        check_field(bio, MAX_BIO_LEN, true)?;
    }
    let user = User::update_profile(db, user_id, full_name.as_deref(), bio.as_deref()).await?;
    Ok(user)
}
