use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ActivityService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_teacher, error_response};

pub async fn delete_activity(
    service: &ActivityService,
    request: &HttpRequest,
    activity_id: i64,
) -> ActixResult<HttpResponse> {
    let teacher = match current_teacher(request) {
        Ok(teacher) => teacher,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    // 不区分“不存在”与“不是创建者”
    let not_found = || {
        HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ActivityNotFound,
            "Activity not found or not authorized",
        ))
    };

    match storage.get_activity_by_id(activity_id).await {
        Ok(Some(activity)) if activity.created_by_teacher_id == teacher.teacher_id => {}
        Ok(_) => return Ok(not_found()),
        Err(e) => return Ok(error_response(&e, "Failed to load activity")),
    }

    match storage.delete_activity(activity_id).await {
        Ok(true) => {
            info!(
                "Activity {} deleted by teacher {}",
                activity_id, teacher.teacher_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Activity deleted successfully")))
        }
        Ok(false) => Ok(not_found()),
        Err(e) => Ok(error_response(&e, "Activity deletion failed")),
    }
}
