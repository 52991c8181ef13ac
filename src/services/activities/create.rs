use std::collections::HashSet;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::ActivityService;
use crate::models::activities::requests::CreateActivityRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_teacher, error_response};
use crate::storage::Storage;
use crate::utils::validate::validate_create_activity;

pub async fn create_activity(
    service: &ActivityService,
    request: &HttpRequest,
    activity_data: CreateActivityRequest,
) -> ActixResult<HttpResponse> {
    let teacher = match current_teacher(request) {
        Ok(teacher) => teacher,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    if let Err(msg) = validate_create_activity(&activity_data) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    // 评分人必须是在职教师
    if let Err(resp) = check_grader_ids(&storage, &activity_data.grader_ids).await {
        return Ok(resp);
    }

    match storage
        .create_activity(teacher.teacher_id, activity_data)
        .await
    {
        Ok(detail) => {
            info!(
                "Activity {} ({}) created by teacher {} with {} graders",
                detail.activity.id,
                detail.activity.title,
                teacher.teacher_id,
                detail.graders.len()
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(detail, "Activity created successfully")))
        }
        Err(e) => {
            error!("Activity creation failed: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ActivityCreationFailed,
                    "Activity creation failed",
                )),
            )
        }
    }
}

/// 校验评分人 ID 是否都对应在职教师
async fn check_grader_ids(
    storage: &Arc<dyn Storage>,
    grader_ids: &[i64],
) -> Result<(), HttpResponse> {
    if grader_ids.is_empty() {
        return Ok(());
    }

    let active: HashSet<i64> = match storage.list_active_teachers().await {
        Ok(teachers) => teachers.into_iter().map(|t| t.teacher_id).collect(),
        Err(e) => return Err(error_response(&e, "Failed to load teachers")),
    };

    let mut unknown: Vec<i64> = grader_ids
        .iter()
        .copied()
        .filter(|id| !active.contains(id))
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }

    unknown.sort_unstable();
    unknown.dedup();
    let ids = unknown
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::ValidationFailed,
        format!("Unknown or inactive grader ids: {ids}"),
    )))
}
