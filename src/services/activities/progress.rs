use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::ActivityService;
use crate::errors::Result;
use crate::grading::progress::{ProgressInput, ProgressReport, build_progress};
use crate::models::ApiResponse;
use crate::models::grades::entities::GradeFilter;
use crate::services::{current_teacher, error_response, load_activity_for_grader};
use crate::storage::Storage;

pub async fn get_progress(
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

    match load_progress(&storage, activity_id).await {
        Ok(report) => {
            debug!(
                "Progress for activity {}: {}/{} graders submitted",
                activity_id, report.summary.submitted_count, report.summary.total_graders
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                report,
                "Progress retrieved successfully",
            )))
        }
        Err(e) => Ok(error_response(&e, "Failed to build progress report")),
    }
}

/// 进度视图展示全部评分，不经过提交状态过滤
async fn load_progress(storage: &Arc<dyn Storage>, activity_id: i64) -> Result<ProgressReport> {
    let criteria = storage.list_criteria(activity_id).await?;
    let groups = storage.list_activity_groups(activity_id).await?;
    let graders = storage.list_activity_graders(activity_id).await?;
    let entries = storage
        .get_grade_entries(activity_id, GradeFilter::default())
        .await?;
    let comments = storage
        .get_comments(activity_id, GradeFilter::default())
        .await?;
    let statuses = storage.get_submission_statuses(activity_id).await?;
    let scale = storage.get_grade_scale().await?;

    Ok(build_progress(&ProgressInput {
        activity_id,
        criteria: &criteria,
        groups: &groups,
        graders: &graders,
        entries: &entries,
        comments: &comments,
        statuses: &statuses,
        scale: &scale,
    }))
}
