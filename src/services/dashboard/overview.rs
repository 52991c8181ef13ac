use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{DashboardService, load_view};
use crate::errors::Result;
use crate::grading::dashboard::{DashboardOverview, build_overview};
use crate::models::ApiResponse;
use crate::services::{current_student, error_response};
use crate::storage::Storage;

pub async fn get_overview(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let student = match current_student(request) {
        Ok(student) => student,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    match load_overview(&storage, &student.student_id).await {
        Ok(overview) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            overview,
            "Dashboard retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to build dashboard")),
    }
}

async fn load_overview(storage: &Arc<dyn Storage>, student_id: &str) -> Result<DashboardOverview> {
    let groups = storage.list_student_groups(student_id).await?;

    let mut views = Vec::with_capacity(groups.len());
    for group in &groups {
        // 跳过并发删除的活动
        if let Some(activity) = storage.get_activity_by_id(group.activity_id).await? {
            views.push(load_view(storage, &activity, group).await?);
        }
    }
    Ok(build_overview(views))
}
