use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ActivityService;
use crate::models::ApiResponse;
use crate::models::activities::requests::{ActivityListQuery, ActivityQueryParams};
use crate::services::{current_teacher, error_response};

pub async fn list_activities(
    service: &ActivityService,
    request: &HttpRequest,
    query: ActivityQueryParams,
) -> ActixResult<HttpResponse> {
    let teacher = match current_teacher(request) {
        Ok(teacher) => teacher,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let list_query = ActivityListQuery {
        page: query.pagination.page,
        size: query.pagination.size,
        teacher_id: teacher.teacher_id,
        search: query
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    };

    match storage.list_teacher_activities(list_query).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            resp,
            "Activities retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to list activities")),
    }
}
