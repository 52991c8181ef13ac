use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ActivityService;
use crate::models::ApiResponse;
use crate::services::{current_teacher, error_response, load_activity_for_grader};

pub async fn list_activity_groups(
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

    match storage.list_activity_groups(activity_id).await {
        Ok(groups) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            groups,
            "Groups retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to list groups")),
    }
}
