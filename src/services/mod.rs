pub mod activities;
pub mod catalogue;
pub mod dashboard;
pub mod grading;
pub mod groups;
pub mod health;

pub use activities::ActivityService;
pub use catalogue::CatalogueService;
pub use dashboard::DashboardService;
pub use grading::GradingService;
pub use groups::GroupService;
pub use health::HealthService;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use tracing::{error, info};

use crate::errors::GamsError;
use crate::middlewares::RequireJWT;
use crate::models::activities::entities::Activity;
use crate::models::profiles::entities::{StudentProfile, TeacherProfile};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 从 app_data 中取出存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage not found in app data");
            actix_web::error::ErrorInternalServerError("Storage not found in app data")
        })
}

/// 将存储层错误转换为统一响应
///
/// 服务端故障只返回 `context`，详细信息写入日志。
pub(crate) fn error_response(err: &GamsError, context: &str) -> HttpResponse {
    let code = ErrorCode::for_error(err);
    if err.is_server_fault() {
        error!("{}: {}", context, err);
        HttpResponse::build(err.status_code()).json(ApiResponse::error_empty(code, context))
    } else {
        info!("{}: {}", context, err);
        HttpResponse::build(err.status_code())
            .json(ApiResponse::error_empty(code, err.message()))
    }
}

pub(crate) fn current_teacher(request: &HttpRequest) -> Result<TeacherProfile, HttpResponse> {
    RequireJWT::extract_teacher(request).ok_or_else(|| {
        HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ProfileNotFound,
            "Teacher profile not found",
        ))
    })
}

pub(crate) fn current_student(request: &HttpRequest) -> Result<StudentProfile, HttpResponse> {
    RequireJWT::extract_student(request).ok_or_else(|| {
        HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ProfileNotFound,
            "Student profile not found",
        ))
    })
}

/// 读取活动并确认教师是其评分人（创建者或指定评分人）
pub(crate) async fn load_activity_for_grader(
    storage: &Arc<dyn Storage>,
    activity_id: i64,
    teacher_id: i64,
) -> Result<Activity, HttpResponse> {
    let activity = match storage.get_activity_by_id(activity_id).await {
        Ok(Some(activity)) => activity,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ActivityNotFound,
                "Activity not found",
            )));
        }
        Err(e) => return Err(error_response(&e, "Failed to load activity")),
    };

    match storage.is_activity_grader(activity_id, teacher_id).await {
        Ok(true) => Ok(activity),
        Ok(false) => {
            info!(
                "Teacher {} is not a grader of activity {}",
                teacher_id, activity_id
            );
            Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::GraderNotAssigned,
                "You are not a grader of this activity",
            )))
        }
        Err(e) => Err(error_response(&e, "Failed to check grader assignment")),
    }
}

#[cfg(test)]
mod flow_tests;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_error_response_status() {
        let resp = error_response(&GamsError::conflict("taken"), "Failed");
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = error_response(&GamsError::database_operation("boom"), "Failed");
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_storage_missing_from_app_data() {
        let req = actix_web::test::TestRequest::default().to_http_request();
        assert!(storage_from_request(&req).is_err());
    }
}
