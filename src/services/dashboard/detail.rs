use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{DashboardService, load_view};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_student, error_response};

pub async fn get_activity_dashboard(
    service: &DashboardService,
    request: &HttpRequest,
    activity_id: i64,
) -> ActixResult<HttpResponse> {
    let student = match current_student(request) {
        Ok(student) => student,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let activity = match storage.get_activity_by_id(activity_id).await {
        Ok(Some(activity)) => activity,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ActivityNotFound,
                "Activity not found",
            )));
        }
        Err(e) => return Ok(error_response(&e, "Failed to load activity")),
    };

    let group = match storage
        .find_student_group(activity_id, &student.student_id)
        .await
    {
        Ok(Some(group)) => group,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::GroupNotFound,
                "You are not in a group for this activity",
            )));
        }
        Err(e) => return Ok(error_response(&e, "Failed to load group")),
    };

    match load_view(&storage, &activity, &group).await {
        Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            view,
            "Dashboard retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to build dashboard")),
    }
}
