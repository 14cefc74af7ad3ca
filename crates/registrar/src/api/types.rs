//! API Types and Data Transfer Objects
//!
//! All request/response types and the API error mapping for the registrar API

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::persistence::{HealthProbe, Member};
use crate::registry::RegistryError;

/// Request to register a new member
#[derive(Debug, Deserialize)]
pub struct RegisterMemberRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub reg_number: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

/// Response for a successful registration
#[derive(Debug, Serialize)]
pub struct RegisterMemberResponse {
    pub success: bool,
    pub membership_code: String,
    pub message: String,
}

/// Request to verify a member credential
#[derive(Debug, Deserialize)]
pub struct VerifyMemberRequest {
    /// Email or phone
    pub identifier: String,
    pub membership_code: String,
}

/// Response for a successful verification
#[derive(Debug, Serialize)]
pub struct VerifyMemberResponse {
    pub success: bool,
    pub member: MemberDetails,
}

/// Member record as exposed by the API
#[derive(Debug, Serialize)]
pub struct MemberDetails {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub membership_code: String,
    pub department: Option<String>,
    pub reg_number: Option<String>,
    pub year: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Member> for MemberDetails {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            name: member.name,
            email: member.email,
            phone: member.phone,
            membership_code: member.membership_code,
            department: member.department,
            reg_number: member.reg_number,
            year: member.year,
            created_at: member.created_at,
        }
    }
}

/// Request for the credentialed full-field update
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    pub identifier: String,
    pub membership_code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub reg_number: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

/// Request for the single-column update
///
/// The record is located by `id` when supplied, otherwise by `email`/`phone`.
#[derive(Debug, Deserialize)]
pub struct UpdateColumnRequest {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub membership_code: String,
    pub column: String,
    pub value: String,
}

/// Generic success acknowledgement
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub success: bool,
    pub message: String,
}

/// Member count response
#[derive(Debug, Serialize)]
pub struct MemberCountResponse {
    pub success: bool,
    pub count: i64,
}

/// Full member listing response
#[derive(Debug, Serialize)]
pub struct ListMembersResponse {
    pub success: bool,
    pub members: Vec<MemberDetails>,
    pub count: usize,
}

/// Response for the explicit migration endpoint
#[derive(Debug, Serialize)]
pub struct MigrateResponse {
    pub success: bool,
    pub message: String,
    pub tables: Vec<String>,
}

/// Database health diagnostic report
#[derive(Debug, Serialize)]
pub struct DbHealthResponse {
    pub success: bool,
    pub tables: Vec<String>,
    pub member_count: i64,
    pub recent_probes: Vec<HealthProbe>,
}

/// Service liveness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// API error responses
#[derive(Debug)]
pub enum ApiError {
    Registry(RegistryError),
    BadRequest(String),
    InternalError(String),
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        use axum::Json;

        let (status, message, existing_code) = match self {
            ApiError::Registry(err) => match err {
                RegistryError::DuplicateContact { existing_code } => (
                    StatusCode::BAD_REQUEST,
                    "Email or phone number already registered".to_string(),
                    Some(existing_code),
                ),
                RegistryError::NotFound => (StatusCode::NOT_FOUND, err.to_string(), None),
                RegistryError::Storage(e) => {
                    error!("Storage error while serving request: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                        None,
                    )
                }
                other => (StatusCode::BAD_REQUEST, other.to_string(), None),
            },
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
        };

        let mut body = serde_json::json!({
            "success": false,
            "error": message,
            "timestamp": chrono::Utc::now()
        });
        if let Some(code) = existing_code {
            body["existing_code"] = serde_json::Value::String(code);
        }

        (status, Json(body)).into_response()
    }
}
