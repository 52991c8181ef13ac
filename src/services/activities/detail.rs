use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ActivityService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_teacher, error_response, load_activity_for_grader};

pub async fn get_activity(
    service: &ActivityService,
    request: &HttpRequest,
    activity_id: i64,
) -> ActixResult<HttpResponse> {
    let teacher = match current_teacher(request) {
        Ok(teacher) => teacher,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    if let Err(resp) = load_activity_for_grader(&storage, activity_id, teacher.teacher_id).await {
        return Ok(resp);
    }

    match storage.get_activity_detail(activity_id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Activity retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ActivityNotFound,
            "Activity not found",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to get activity")),
    }
}
