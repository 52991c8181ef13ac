use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CatalogueService;
use crate::models::ApiResponse;
use crate::models::groups::requests::AvailableStudentsQuery;
use crate::services::groups::load_student_activity;
use crate::services::{current_student, error_response};

pub async fn list_available_students(
    service: &CatalogueService,
    request: &HttpRequest,
    query: AvailableStudentsQuery,
) -> ActixResult<HttpResponse> {
    let student = match current_student(request) {
        Ok(student) => student,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let activity = match load_student_activity(&storage, query.activity_id, &student).await {
        Ok(activity) => activity,
        Err(resp) => return Ok(resp),
    };

    match storage
        .list_available_students(
            activity.id,
            &student.student_id,
            &activity.target_year_levels,
        )
        .await
    {
        Ok(students) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            students,
            "Students retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to list students")),
    }
}
