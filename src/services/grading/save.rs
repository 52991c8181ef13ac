use std::collections::HashSet;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::GradingService;
use crate::errors::Result;
use crate::models::grades::requests::SaveGradesRequest;
use crate::models::grades::responses::SaveGradesResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_teacher, error_response, load_activity_for_grader};
use crate::storage::Storage;
use crate::utils::validate::normalize_grade_letter;

/// 校验通过后的写入内容
#[derive(Debug, PartialEq)]
struct SavePlan {
    cells: Vec<(i64, i64, String)>, // (group_id, criteria_id, score)
    comment: Option<(i64, String)>,
}

pub async fn save_grades(
    service: &GradingService,
    request: &HttpRequest,
    activity_id: i64,
    grades_data: SaveGradesRequest,
) -> ActixResult<HttpResponse> {
    let teacher = match current_teacher(request) {
        Ok(teacher) => teacher,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    if let Err(resp) = load_activity_for_grader(&storage, activity_id, teacher.teacher_id).await {
        return Ok(resp);
    }

    if service.lock_after_submit() {
        match storage
            .get_submission_status(activity_id, teacher.teacher_id)
            .await
        {
            Ok(Some(status)) if service.is_locked(&status) => {
                warn!(
                    "Teacher {} tried to modify submitted grades of activity {}",
                    teacher.teacher_id, activity_id
                );
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::GradesLocked,
                    "Grades have already been submitted and can no longer be changed",
                )));
            }
            Ok(_) => {}
            Err(e) => return Ok(error_response(&e, "Failed to load submission status")),
        }
    }

    let (group_ids, criteria_ids) = match activity_keys(&storage, activity_id).await {
        Ok(keys) => keys,
        Err(e) => return Ok(error_response(&e, "Failed to load activity structure")),
    };

    let plan = match plan_save(&grades_data, &group_ids, &criteria_ids) {
        Ok(plan) => plan,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
        }
    };

    match apply_plan(&storage, activity_id, teacher.teacher_id, &plan).await {
        Ok(()) => {
            info!(
                "Teacher {} saved {} grades for activity {}",
                teacher.teacher_id,
                plan.cells.len(),
                activity_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SaveGradesResponse {
                    saved_grades: plan.cells.len() as i64,
                    comment_saved: plan.comment.is_some(),
                },
                "Grades saved",
            )))
        }
        Err(e) => Ok(error_response(&e, "Failed to save grades")),
    }
}

async fn activity_keys(
    storage: &Arc<dyn Storage>,
    activity_id: i64,
) -> Result<(HashSet<i64>, HashSet<i64>)> {
    let groups = storage.list_activity_groups(activity_id).await?;
    let criteria = storage.list_criteria(activity_id).await?;
    Ok((
        groups.into_iter().map(|g| g.id).collect(),
        criteria.into_iter().map(|c| c.id).collect(),
    ))
}

/// 每个评分格独立 upsert，后写覆盖先写
async fn apply_plan(
    storage: &Arc<dyn Storage>,
    activity_id: i64,
    teacher_id: i64,
    plan: &SavePlan,
) -> Result<()> {
    for (group_id, criteria_id, score) in &plan.cells {
        storage
            .upsert_grade_entry(activity_id, *group_id, teacher_id, *criteria_id, score)
            .await?;
    }
    if let Some((group_id, comment)) = &plan.comment {
        storage
            .upsert_comment(activity_id, *group_id, teacher_id, comment)
            .await?;
    }
    Ok(())
}

fn plan_save(
    req: &SaveGradesRequest,
    group_ids: &HashSet<i64>,
    criteria_ids: &HashSet<i64>,
) -> std::result::Result<SavePlan, String> {
    if req.grades.is_empty() && req.comment.is_none() {
        return Err("No grades provided".to_string());
    }

    let mut cells = Vec::with_capacity(req.grades.len());
    for grade in &req.grades {
        if !group_ids.contains(&grade.group_id) {
            return Err(format!(
                "Group {} does not belong to this activity",
                grade.group_id
            ));
        }
        if !criteria_ids.contains(&grade.criteria_id) {
            return Err(format!(
                "Criterion {} does not belong to this activity",
                grade.criteria_id
            ));
        }
        let score = normalize_grade_letter(&grade.score)?;
        cells.push((grade.group_id, grade.criteria_id, score));
    }

    let comment = match &req.comment {
        Some(text) => {
            let target = req
                .comment_target()
                .ok_or_else(|| "A group is required for the comment".to_string())?;
            if !group_ids.contains(&target) {
                return Err(format!("Group {target} does not belong to this activity"));
            }
            Some((target, text.trim().to_string()))
        }
        None => None,
    };

    Ok(SavePlan { cells, comment })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grades::requests::GradeInput;

    fn keys(ids: &[i64]) -> HashSet<i64> {
        ids.iter().copied().collect()
    }

    fn grade(group_id: i64, criteria_id: i64, score: &str) -> GradeInput {
        GradeInput {
            group_id,
            criteria_id,
            score: score.to_string(),
        }
    }

    #[test]
    fn test_plan_normalizes_letters_and_targets_first_group() {
        let req = SaveGradesRequest {
            grades: vec![grade(10, 1, " a "), grade(10, 2, "")],
            group_id: None,
            comment: Some(" Good work ".to_string()),
        };

        let plan = plan_save(&req, &keys(&[10, 11]), &keys(&[1, 2])).unwrap();

        assert_eq!(
            plan.cells,
            vec![(10, 1, "A".to_string()), (10, 2, String::new())]
        );
        assert_eq!(plan.comment, Some((10, "Good work".to_string())));
    }

    #[test]
    fn test_plan_rejects_foreign_ids() {
        let req = SaveGradesRequest {
            grades: vec![grade(99, 1, "B")],
            group_id: None,
            comment: None,
        };
        assert!(plan_save(&req, &keys(&[10]), &keys(&[1])).is_err());

        let req = SaveGradesRequest {
            grades: vec![grade(10, 7, "B")],
            group_id: None,
            comment: None,
        };
        assert!(plan_save(&req, &keys(&[10]), &keys(&[1])).is_err());
    }

    #[test]
    fn test_plan_rejects_unknown_letter() {
        let req = SaveGradesRequest {
            grades: vec![grade(10, 1, "E")],
            group_id: None,
            comment: None,
        };
        assert_eq!(
            plan_save(&req, &keys(&[10]), &keys(&[1])).unwrap_err(),
            "Invalid letter grade: E"
        );
    }

    #[test]
    fn test_plan_comment_only() {
        let req = SaveGradesRequest {
            grades: vec![],
            group_id: Some(11),
            comment: Some("Late start".to_string()),
        };
        let plan = plan_save(&req, &keys(&[10, 11]), &keys(&[1])).unwrap();
        assert!(plan.cells.is_empty());
        assert_eq!(plan.comment, Some((11, "Late start".to_string())));

        let empty = SaveGradesRequest {
            grades: vec![],
            group_id: None,
            comment: None,
        };
        assert!(plan_save(&empty, &keys(&[10]), &keys(&[1])).is_err());
    }
}
