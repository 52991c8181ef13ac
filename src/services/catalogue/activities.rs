use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CatalogueService;
use crate::models::ApiResponse;
use crate::services::{current_student, error_response};

pub async fn list_student_activities(
    service: &CatalogueService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let student = match current_student(request) {
        Ok(student) => student,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    match storage
        .list_activities_for_student(&student.student_id, student.year_level)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            items,
            "Activities retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to list activities")),
    }
}
