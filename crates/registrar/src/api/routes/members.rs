//! Member registration and update routes

use crate::api::types::*;
use crate::api::ApiState;
use crate::registry::{MemberLocator, MemberUpdate};
use axum::{extract::State, Json};
use tracing::info;

/// Register a new member and return the allocated membership code
pub async fn register_member(
    State(state): State<ApiState>,
    Json(request): Json<RegisterMemberRequest>,
) -> Result<Json<RegisterMemberResponse>, ApiError> {
    info!("Registering member: {}", request.name);

    let new_member = crate::persistence::NewMember {
        name: request.name,
        email: request.email,
        phone: request.phone,
        department: request.department,
        reg_number: request.reg_number,
        year: request.year,
    };

    let membership_code = state.registry.register(&new_member).await?;

    Ok(Json(RegisterMemberResponse {
        success: true,
        membership_code,
        message: "Registration successful".to_string(),
    }))
}

/// Verify an identifier/code credential and return the full member record
pub async fn verify_member(
    State(state): State<ApiState>,
    Json(request): Json<VerifyMemberRequest>,
) -> Result<Json<VerifyMemberResponse>, ApiError> {
    if request.identifier.is_empty() || request.membership_code.is_empty() {
        return Err(ApiError::BadRequest(
            "Identifier and membership code are required".to_string(),
        ));
    }

    let member = state
        .registry
        .verify(&request.identifier, &request.membership_code)
        .await?;

    Ok(Json(VerifyMemberResponse {
        success: true,
        member: member.into(),
    }))
}

/// Apply a credentialed partial update to the caller's own record
pub async fn update_member(
    State(state): State<ApiState>,
    Json(request): Json<UpdateMemberRequest>,
) -> Result<Json<UpdateResponse>, ApiError> {
    if request.identifier.is_empty() || request.membership_code.is_empty() {
        return Err(ApiError::BadRequest(
            "Identifier and membership code are required".to_string(),
        ));
    }

    let update = MemberUpdate {
        name: request.name,
        email: request.email,
        phone: request.phone,
        department: request.department,
        reg_number: request.reg_number,
        year: request.year,
    };

    state
        .registry
        .update_member(&request.identifier, &request.membership_code, &update)
        .await?;

    Ok(Json(UpdateResponse {
        success: true,
        message: "Member details updated successfully".to_string(),
    }))
}

/// Apply a single whitelisted column update to a record
pub async fn update_member_column(
    State(state): State<ApiState>,
    Json(request): Json<UpdateColumnRequest>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let locator = match request.id {
        Some(id) => MemberLocator::Id(id),
        None => {
            if request.email.is_none() && request.phone.is_none() {
                return Err(ApiError::BadRequest(
                    "Either id or email/phone is required to locate the member".to_string(),
                ));
            }
            MemberLocator::Contact {
                email: request.email,
                phone: request.phone,
            }
        }
    };

    state
        .registry
        .update_column(
            &locator,
            &request.membership_code,
            &request.column,
            &request.value,
        )
        .await?;

    Ok(Json(UpdateResponse {
        success: true,
        message: format!("Column {} updated successfully", request.column),
    }))
}

/// Count all registered members
pub async fn member_count(
    State(state): State<ApiState>,
) -> Result<Json<MemberCountResponse>, ApiError> {
    let count = state.registry.count_members().await?;
    Ok(Json(MemberCountResponse {
        success: true,
        count,
    }))
}

/// List all registered members ordered by name
pub async fn list_members(
    State(state): State<ApiState>,
) -> Result<Json<ListMembersResponse>, ApiError> {
    let members: Vec<MemberDetails> = state
        .registry
        .list_members()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let count = members.len();

    Ok(Json(ListMembersResponse {
        success: true,
        members,
        count,
    }))
}
