use sqlx::PgPool;

use crate::dto::auth_dto::{BranchRef, LoginRequest, LoginResponse, SessionUserResponse};
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthController {
    repository: UserRepository,
}

impl AuthController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    /// Verify credentials and issue a session token carrying the user's
    /// branch context.
    pub async fn login(
        &self,
        request: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(AppError::BadRequest(
                "Email and password are required".to_string(),
            ));
        }

        let user = self
            .repository
            .find_by_email(request.email.trim())
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        let valid = bcrypt::verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(e.to_string()))?;
        if !valid {
            return Err(AppError::Unauthorized("Invalid email or password".to_string()));
        }

        let token = generate_token(
            user.id,
            user.branch_id,
            &user.branch_name,
            user.role.as_str(),
            jwt_config,
        )?;

        log::info!("🔐 User {} signed in", user.email);

        Ok(LoginResponse {
            success: true,
            token,
            user: SessionUserResponse {
                id: user.id.to_string(),
                full_name: user.full_name,
                role: user.role.as_str().to_string(),
                branch: BranchRef {
                    id: user.branch_id.to_string(),
                    name: user.branch_name,
                },
            },
        })
    }
}
