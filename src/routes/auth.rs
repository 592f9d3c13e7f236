/// Registration and login routes
///
/// The gateway: orchestrates validators, the credential hasher, the user
/// store and the token service, and returns typed errors for the boundary to
/// map. bcrypt work runs on the blocking pool so request workers are never
/// stalled by it.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, issue_access_token, verify_password};
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError, ErrorContext};
use crate::store::UserStore;
use crate::validators::{is_valid_email, is_valid_name, is_valid_password, normalize_email};

/// Registration request. Wire field names are fixed by the public API.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub nome: String,
    pub email: String,
    pub senha: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub jwt: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /registrar
///
/// # Errors
/// - 400: invalid nome/email/senha
/// - 409: email already in use (pre-check, or the unique index when two
///   registrations race)
pub async fn register(
    form: web::Json<RegisterRequest>,
    store: web::Data<dyn UserStore>,
    auth_config: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("register");

    let name = is_valid_name(&form.nome)?;
    let email = is_valid_email(&form.email)?;
    is_valid_password(&form.senha)?;

    if store.find_by_email(&email).await?.is_some() {
        return Err(AuthError::DuplicateEmail.into());
    }

    let senha = form.senha.clone();
    let password_hash = web::block(move || hash_password(&senha))
        .await
        .map_err(|e| AppError::Internal(format!("hashing task failed: {}", e)))??;

    // A concurrent registration may have won since the pre-check; the store
    // reports that as DuplicateEmail and it propagates as a 409.
    let user = store.create(&name, &email, &password_hash).await?;

    let token = issue_access_token(&user.email, auth_config.get_ref())?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = user.id,
        "user registered"
    );

    Ok(HttpResponse::Ok().json(RegisterResponse { jwt: token }))
}

/// POST /login
///
/// # Errors
/// - 401: unknown email or wrong password, one identical response for both
pub async fn login(
    form: web::Json<LoginRequest>,
    store: web::Data<dyn UserStore>,
    auth_config: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("login");

    // Normalize only. A malformed email is just an unknown account and must
    // fail exactly like a wrong password.
    let email = normalize_email(&form.email);

    let user = store
        .find_by_email(&email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let senha = form.senha.clone();
    let password_hash = user.password_hash.clone();
    let password_valid = web::block(move || verify_password(&senha, &password_hash))
        .await
        .map_err(|e| AppError::Internal(format!("verification task failed: {}", e)))?;

    if !password_valid {
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = issue_access_token(&user.email, auth_config.get_ref())?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = user.id,
        "user logged in"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}
