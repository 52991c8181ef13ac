use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GroupService;
use crate::errors::Result;
use crate::grading::aggregate_group;
use crate::models::ApiResponse;
use crate::models::grades::entities::GradeFilter;
use crate::models::groups::responses::StudentGroupItem;
use crate::models::profiles::entities::StudentProfile;
use crate::services::{current_student, error_response};
use crate::storage::Storage;

pub async fn list_my_groups(
    service: &GroupService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let student = match current_student(request) {
        Ok(student) => student,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    match load_group_items(&storage, &student).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            items,
            "Groups retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, "Failed to list groups")),
    }
}

/// 成绩只统计已提交评分人的评分
async fn load_group_items(
    storage: &Arc<dyn Storage>,
    student: &StudentProfile,
) -> Result<Vec<StudentGroupItem>> {
    let groups = storage.list_student_groups(&student.student_id).await?;

    let mut items = Vec::with_capacity(groups.len());
    for group in groups {
        let Some(activity) = storage.get_activity_by_id(group.activity_id).await? else {
            continue;
        };
        let criteria = storage.list_criteria(activity.id).await?;
        let entries = storage
            .get_grade_entries(activity.id, GradeFilter::visible_for_group(group.id))
            .await?;
        let score = aggregate_group(&criteria, &entries, group.id);

        items.push(StudentGroupItem {
            is_creator: group.created_by_student_id == student.student_id,
            activity_title: activity.title,
            overall_score: score.overall_score,
            final_grade: score.final_grade,
            group,
        });
    }
    Ok(items)
}
