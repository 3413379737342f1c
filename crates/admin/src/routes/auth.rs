//! Admin authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use sugar_plum_core::{AdminRole, AdminUserId, Email};

use crate::db::admin_users::AdminUserRepository;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::auth::AdminAuthService;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Admin account data returned to the client.
#[derive(Debug, Serialize)]
pub struct AdminView {
    pub id: AdminUserId,
    pub email: Email,
    pub role: AdminRole,
}

/// Log an admin in.
#[instrument(skip(state, session, body), fields(email = %body.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AdminView>> {
    let auth = AdminAuthService::new(state.pool());
    let admin = auth.login(&body.email, &body.password).await?;

    let current = CurrentAdmin::from(&admin);
    set_current_admin(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("failed to persist session: {e}")))?;
    tracing::info!(admin_id = %admin.id, "admin logged in");

    Ok(Json(AdminView {
        id: admin.id,
        email: admin.email,
        role: admin.role,
    }))
}

/// End the current session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;

    Ok(StatusCode::NO_CONTENT)
}

/// The current admin account, freshly loaded (role changes apply without a
/// new login).
#[instrument(skip(state, admin))]
pub async fn me(State(state): State<AppState>, admin: RequireAdmin) -> Result<Json<AdminView>> {
    let account = AdminUserRepository::new(state.pool())
        .get_by_id(admin.0.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_string()))?;

    Ok(Json(AdminView {
        id: account.id,
        email: account.email,
        role: account.role,
    }))
}
