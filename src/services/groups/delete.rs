use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{GroupService, group_not_found, load_own_group};
use crate::models::ApiResponse;
use crate::services::{current_student, error_response};

pub async fn delete_group(
    service: &GroupService,
    request: &HttpRequest,
    group_id: i64,
) -> ActixResult<HttpResponse> {
    let student = match current_student(request) {
        Ok(student) => student,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    if let Err(resp) = load_own_group(&storage, group_id, &student.student_id).await {
        return Ok(resp);
    }

    match storage.delete_group(group_id).await {
        Ok(true) => {
            info!("Group {} deleted by {}", group_id, student.student_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Group deleted successfully")))
        }
        Ok(false) => Ok(group_not_found()),
        Err(e) => Ok(error_response(&e, "Group deletion failed")),
    }
}
