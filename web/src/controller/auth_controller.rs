use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::user::UpdateProfileParams;
use crate::{AppState, Error};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::user as UserApi;
use domain::user::{Credentials, Registration};
use log::*;
use serde_json::json;
use service::config::ApiVersion;

/// POST create a new account and sign it in
#[utoipa::path(
    post,
    path = "/auth/register",
    params(ApiVersion),
    request_body = domain::user::Registration,
    responses(
        (status = 201, description = "Successfully registered and issued a token"),
        (status = 400, description = "Missing fields, unknown role or duplicate email"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn register(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Json(registration): Json<Registration>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Register new account for: {:?}", registration.email);

    let (user, jwt) =
        UserApi::register(app_state.db_conn_ref(), app_state.config(), registration).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "token": jwt.token,
            "userId": user.id,
            "role": user.role,
            "name": user.name,
            "email": user.email,
        })),
    ))
}

/// POST log into the platform with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    params(ApiVersion),
    request_body = domain::user::Credentials,
    responses(
        (status = 200, description = "Successfully logged in and issued a token"),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "No account with that email"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn login(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Login for: {:?}", credentials.email);

    let (user, jwt) =
        UserApi::login(app_state.db_conn_ref(), app_state.config(), credentials).await?;

    Ok(Json(json!({
        "token": jwt.token,
        "userId": user.id,
        "role": user.role,
        "name": user.name,
        "email": user.email,
    })))
}

/// GET the authenticated user's own profile
#[utoipa::path(
    get,
    path = "/auth/profile",
    params(ApiVersion),
    responses(
        (status = 200, description = "Successfully retrieved own profile"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account no longer exists"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn profile(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(claims): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Profile for user: {}", claims.id);

    let user = UserApi::find_by_id(app_state.db_conn_ref(), claims.id).await?;

    Ok(Json(json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "role": user.role,
    })))
}

/// PUT update the authenticated user's own profile
#[utoipa::path(
    put,
    path = "/auth/profile",
    params(ApiVersion),
    request_body = UpdateProfileParams,
    responses(
        (status = 200, description = "Successfully updated own profile"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account no longer exists"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(claims): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<UpdateProfileParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update profile for user: {}", claims.id);

    UserApi::update_profile(app_state.db_conn_ref(), claims.id, params).await?;

    Ok(Json(json!({"message": "Profile updated"})))
}
