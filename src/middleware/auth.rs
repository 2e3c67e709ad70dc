//! Authentication middleware
//!
//! Validates the bearer token on every protected route and injects the
//! session context into the request extensions, replacing the original's
//! ad-hoc local-storage `user`/`token` parsing in each view.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::models::user::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{extract_token_from_header, verify_token};

/// Session context constructed once per request from the verified token
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub branch_name: String,
    pub role: UserRole,
}

impl SessionUser {
    /// Sales executives operate within their own branch only
    pub fn is_branch_scoped(&self) -> bool {
        self.role == UserRole::SalesExecutive
    }
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, &state.jwt_config())?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Jwt("Invalid user id in token".to_string()))?;
    let branch_id = Uuid::parse_str(&claims.branch_id)
        .map_err(|_| AppError::Jwt("Invalid branch id in token".to_string()))?;
    let role = UserRole::parse(&claims.role)
        .ok_or_else(|| AppError::Jwt(format!("Unknown role '{}'", claims.role)))?;

    let session_user = SessionUser {
        id: user_id,
        branch_id,
        branch_name: claims.branch_name,
        role,
    };

    request.extensions_mut().insert(session_user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sales_executive_is_branch_scoped() {
        let user = SessionUser {
            id: Uuid::new_v4(),
            branch_id: Uuid::new_v4(),
            branch_name: "Solapur HO".to_string(),
            role: UserRole::SalesExecutive,
        };
        assert!(user.is_branch_scoped());

        let admin = SessionUser {
            role: UserRole::Admin,
            ..user
        };
        assert!(!admin.is_branch_scoped());
    }
}
