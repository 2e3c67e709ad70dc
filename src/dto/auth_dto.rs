use serde::{Deserialize, Serialize};

// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// Login response: token plus the session context the client previously
// reconstructed from local storage on every mount
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: SessionUserResponse,
}

#[derive(Debug, Serialize)]
pub struct SessionUserResponse {
    pub id: String,
    pub full_name: String,
    pub role: String,
    pub branch: BranchRef,
}

#[derive(Debug, Serialize)]
pub struct BranchRef {
    pub id: String,
    pub name: String,
}
