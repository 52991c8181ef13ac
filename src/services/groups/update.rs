use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{GroupService, check_members, group_not_found, load_own_group};
use crate::errors::GamsError;
use crate::grading::membership::normalize_members;
use crate::models::groups::requests::UpdateGroupRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_student, error_response};
use crate::utils::validate::validate_group_fields;

pub async fn update_group(
    service: &GroupService,
    request: &HttpRequest,
    group_id: i64,
    group_data: UpdateGroupRequest,
) -> ActixResult<HttpResponse> {
    let student = match current_student(request) {
        Ok(student) => student,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    if let Err(msg) = validate_group_fields(&group_data.group_name, &group_data.members) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let group = match load_own_group(&storage, group_id, &student.student_id).await {
        Ok(group) => group,
        Err(resp) => return Ok(resp),
    };

    let activity = match storage.get_activity_by_id(group.activity_id).await {
        Ok(Some(activity)) => activity,
        Ok(None) => return Ok(group_not_found()),
        Err(e) => return Ok(error_response(&e, "Failed to load activity")),
    };

    // 成员整体替换，创建者始终保留
    let members = normalize_members(&group_data.members, &student.student_id);
    if let Err(resp) = check_members(
        &storage,
        &activity,
        &student.student_id,
        &members,
        Some(&group),
    )
    .await
    {
        return Ok(resp);
    }

    let group_data = UpdateGroupRequest {
        group_name: group_data.group_name.trim().to_string(),
        members,
        ..group_data
    };

    match storage.update_group(group_id, group_data).await {
        Ok(Some(updated)) => {
            info!(
                "Group {} updated by {} ({} members)",
                group_id,
                student.student_id,
                updated.members.len()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Group updated successfully")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GroupNotFound,
            "Group not found",
        ))),
        Err(GamsError::Conflict(msg)) => {
            info!("Group membership conflict on write: {}", msg);
            Ok(HttpResponse::Conflict()
                .json(ApiResponse::error_empty(ErrorCode::GroupMemberConflict, msg)))
        }
        Err(e) => Ok(error_response(&e, "Group update failed")),
    }
}
