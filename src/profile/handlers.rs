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
        dto::{ProfileForm, SessionUser},
        handlers::internal,
        services::{self, AuthError},
        session::{self, CurrentUser, SessionKeys},
    },
    flash::{self, Flash, Notice},
    pages,
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile))
        .route("/update_profile", get(update_profile_page).post(update_profile))
}

#[instrument(skip_all)]
pub async fn profile(CurrentUser(user): CurrentUser, flash: Flash) -> Response {
    (flash.consume(), pages::profile(&user, flash.notice())).into_response()
}

#[instrument(skip_all)]
pub async fn update_profile_page(CurrentUser(user): CurrentUser, flash: Flash) -> Response {
    (flash.consume(), pages::update_profile_form(&user, flash.notice())).into_response()
}

#[instrument(skip_all)]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<ProfileForm>,
) -> Result<Response, (StatusCode, String)> {
    let keys = SessionKeys::from_ref(&state);
    let updated = match services::update_profile(&state.db, user.id, form).await {
        Ok(u) => SessionUser::from(u),
        Err(AuthError::NotFound) => {
            warn!(user_id = user.id, "session refers to a missing user; clearing it");
            return Ok((
                AppendHeaders([
                    (SET_COOKIE, session::clear_cookie()),
                    (SET_COOKIE, flash::set_cookie(Notice::LoginRequired, keys.secure)),
                ]),
                Redirect::to("/login"),
            )
                .into_response());
        }
        Err(AuthError::Internal(e)) => {
            error!(error = %e, user_id = user.id, "update_profile failed");
            return Err(internal(e));
        }
        Err(e) => {
            warn!(user_id = user.id, reason = %e, "profile update rejected");
            return Ok((e.status(), pages::update_profile_form(&user, e.notice())).into_response());
        }
    };

    let cookie = keys.set_cookie(&updated).map_err(|e| {
        error!(error = %e, "session sign failed");
        internal(e)
    })?;

    info!(user_id = updated.id, "profile updated");
    Ok((
        AppendHeaders([
            (SET_COOKIE, cookie),
            (SET_COOKIE, flash::set_cookie(Notice::ProfileUpdated, keys.secure)),
        ]),
        Redirect::to("/profile"),
    )
        .into_response())
}
