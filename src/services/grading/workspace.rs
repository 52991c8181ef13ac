use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradingService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::activities::entities::Activity;
use crate::models::grades::entities::GradeFilter;
use crate::models::grades::responses::GradingWorkspace;
use crate::services::{current_teacher, error_response, load_activity_for_grader};
use crate::storage::Storage;

pub async fn get_workspace(
    service: &GradingService,
    request: &HttpRequest,
    activity_id: i64,
) -> ActixResult<HttpResponse> {
    let teacher = match current_teacher(request) {
        Ok(teacher) => teacher,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let activity =
        match load_activity_for_grader(&storage, activity_id, teacher.teacher_id).await {
            Ok(activity) => activity,
            Err(resp) => return Ok(resp),
        };

    match load_workspace(service, &storage, activity, teacher.teacher_id).await {
        Ok(workspace) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            workspace,
            "Grading workspace retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to load grading workspace")),
    }
}

/// 评分人只看到自己的评分与评语
async fn load_workspace(
    service: &GradingService,
    storage: &Arc<dyn Storage>,
    activity: Activity,
    teacher_id: i64,
) -> Result<GradingWorkspace> {
    let filter = GradeFilter::by_grader(teacher_id);
    let criteria = storage.list_criteria(activity.id).await?;
    let groups = storage.list_activity_groups(activity.id).await?;
    let grades = storage.get_grade_entries(activity.id, filter).await?;
    let comments = storage.get_comments(activity.id, filter).await?;
    let submission = storage
        .get_submission_status(activity.id, teacher_id)
        .await?
        .unwrap_or_default();
    let locked = service.is_locked(&submission);

    Ok(GradingWorkspace {
        activity,
        criteria,
        groups,
        grades,
        comments,
        submission,
        locked,
    })
}
