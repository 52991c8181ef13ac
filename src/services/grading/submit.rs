use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{SubsecRound, Utc};
use tracing::{debug, info};

use super::GradingService;
use crate::grading::Transition;
use crate::models::ApiResponse;
use crate::models::grades::responses::SubmitGradesResponse;
use crate::services::{current_teacher, error_response, load_activity_for_grader};

pub async fn submit_grades(
    service: &GradingService,
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

    let mut status = match storage
        .get_submission_status(activity_id, teacher.teacher_id)
        .await
    {
        Ok(status) => status.unwrap_or_default(),
        Err(e) => return Ok(error_response(&e, "Failed to load submission status")),
    };

    // 存储精度为秒
    let transition = status.submit(Utc::now().trunc_subsecs(0));
    match transition {
        Transition::Submitted => {
            if let Err(e) = storage
                .set_submission_status(activity_id, teacher.teacher_id, &status)
                .await
            {
                return Ok(error_response(&e, "Failed to submit grades"));
            }
            info!(
                "Teacher {} submitted grades for activity {}",
                teacher.teacher_id, activity_id
            );
        }
        Transition::AlreadySubmitted => {
            debug!(
                "Teacher {} re-submitted activity {}, keeping original timestamp",
                teacher.teacher_id, activity_id
            );
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SubmitGradesResponse {
            status: status.status,
            submitted_at: status.submitted_at,
            already_submitted: transition == Transition::AlreadySubmitted,
        },
        "Grades submitted",
    )))
}
