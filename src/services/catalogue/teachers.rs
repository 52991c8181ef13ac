use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CatalogueService;
use crate::models::ApiResponse;
use crate::services::error_response;

pub async fn list_teachers(
    service: &CatalogueService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_active_teachers().await {
        Ok(teachers) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            teachers,
            "Teachers retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to list teachers")),
    }
}
