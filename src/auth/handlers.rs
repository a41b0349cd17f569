use axum::{
    extract::{FromRef, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginForm, RegisterForm, SessionUser},
        services::{self, AuthError},
        session::{self, MaybeUser, SessionKeys},
    },
    flash::{self, Flash, Notice},
    pages::{self, RegisterPrefill},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

#[instrument(skip_all)]
pub async fn register_page(flash: Flash) -> Response {
    (flash.consume(), pages::register_form(flash.notice(), &RegisterPrefill::default())).into_response()
}

#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, (StatusCode, String)> {
    let prefill = RegisterPrefill {
        username: form.username.clone(),
        email: form.email.clone(),
        full_name: form.full_name.clone().unwrap_or_default(),
    };

    match services::register(&state.db, form).await {
        Ok(user) => {
            info!(user_id = user.id, username = %user.username, "user registered");
            let secure = state.config.session.secure_cookie;
            Ok(flash::redirect_with(Notice::Registered, "/login", secure))
        }
        Err(AuthError::Internal(e)) => {
            error!(error = %e, "register failed");
            Err(internal(e))
        }
        Err(e) => {
            warn!(username = %prefill.username, reason = %e, "registration rejected");
            Ok((e.status(), pages::register_form(e.notice(), &prefill)).into_response())
        }
    }
}

#[instrument(skip_all)]
pub async fn login_page(flash: Flash) -> Response {
    (flash.consume(), pages::login_form(flash.notice(), "")).into_response()
}

#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, (StatusCode, String)> {
    let user = match services::authenticate(&state.db, &form).await {
        Ok(u) => u,
        Err(AuthError::Internal(e)) => {
            error!(error = %e, "authenticate failed");
            return Err(internal(e));
        }
        Err(e) => {
            warn!(username = %form.username, "login rejected");
            return Ok((e.status(), pages::login_form(e.notice(), form.username.trim())).into_response());
        }
    };

    let user = SessionUser::from(user);
    let keys = SessionKeys::from_ref(&state);
    let cookie = keys.set_cookie(&user).map_err(|e| {
        error!(error = %e, "session sign failed");
        internal(e)
    })?;

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok((
        AppendHeaders([
            (SET_COOKIE, cookie),
            (SET_COOKIE, flash::set_cookie(Notice::LoggedIn, keys.secure)),
        ]),
        Redirect::to("/profile"),
    )
        .into_response())
}

#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, MaybeUser(user): MaybeUser) -> Response {
    if let Some(u) = user {
        info!(user_id = u.id, username = %u.username, "user logged out");
    }
    (
        AppendHeaders([
            (SET_COOKIE, session::clear_cookie()),
            (SET_COOKIE, flash::set_cookie(Notice::LoggedOut, state.config.session.secure_cookie)),
        ]),
        Redirect::to("/"),
    )
        .into_response()
}

pub(crate) fn internal(_e: impl std::fmt::Display) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
}
