use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{GroupService, check_members, load_student_activity};
use crate::errors::GamsError;
use crate::grading::membership::normalize_members;
use crate::models::groups::requests::CreateGroupRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_student, error_response};
use crate::utils::validate::validate_group_fields;

pub async fn create_group(
    service: &GroupService,
    request: &HttpRequest,
    group_data: CreateGroupRequest,
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

    let activity = match load_student_activity(&storage, group_data.activity_id, &student).await
    {
        Ok(activity) => activity,
        Err(resp) => return Ok(resp),
    };

    // 创建者自动加入
    let members = normalize_members(&group_data.members, &student.student_id);
    if let Err(resp) = check_members(&storage, &activity, &student.student_id, &members, None).await
    {
        return Ok(resp);
    }

    let group_data = CreateGroupRequest {
        group_name: group_data.group_name.trim().to_string(),
        members,
        ..group_data
    };

    match storage.create_group(&student.student_id, group_data).await {
        Ok(group) => {
            info!(
                "Group {} ({}) created by {} in activity {} with {} members",
                group.id,
                group.group_name,
                student.student_id,
                group.activity_id,
                group.members.len()
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(group, "Group created successfully")))
        }
        Err(GamsError::Conflict(msg)) => {
            info!("Group membership conflict on write: {}", msg);
            Ok(HttpResponse::Conflict()
                .json(ApiResponse::error_empty(ErrorCode::GroupMemberConflict, msg)))
        }
        Err(e) => Ok(error_response(&e, "Group creation failed")),
    }
}
