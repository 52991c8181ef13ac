pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use crate::grading::membership::validate_membership;
use crate::models::activities::entities::Activity;
use crate::models::groups::entities::Group;
use crate::models::groups::requests::{CreateGroupRequest, UpdateGroupRequest};
use crate::models::profiles::entities::StudentProfile;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

use super::error_response;

pub struct GroupService {
    storage: Option<Arc<dyn Storage>>,
}

impl GroupService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 创建小组
    pub async fn create_group(
        &self,
        request: &HttpRequest,
        group_data: CreateGroupRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_group(self, request, group_data).await
    }

    // 更新小组（仅创建者）
    pub async fn update_group(
        &self,
        request: &HttpRequest,
        group_id: i64,
        group_data: UpdateGroupRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_group(self, request, group_id, group_data).await
    }

    // 删除小组（仅创建者）
    pub async fn delete_group(
        &self,
        request: &HttpRequest,
        group_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_group(self, request, group_id).await
    }

    // 列出我的小组
    pub async fn list_my_groups(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_my_groups(self, request).await
    }
}

/// 读取学生可参与的活动；活动不存在或不面向该学生年级时视为不存在
pub(crate) async fn load_student_activity(
    storage: &Arc<dyn Storage>,
    activity_id: i64,
    student: &StudentProfile,
) -> Result<Activity, HttpResponse> {
    match storage.get_activity_by_id(activity_id).await {
        Ok(Some(activity)) if activity.targets_year_level(student.year_level) => Ok(activity),
        Ok(_) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ActivityNotFound,
            "Activity not found",
        ))),
        Err(e) => Err(error_response(&e, "Failed to load activity")),
    }
}

/// 读取调用者创建的小组；不区分“不存在”与“不是创建者”
async fn load_own_group(
    storage: &Arc<dyn Storage>,
    group_id: i64,
    student_id: &str,
) -> Result<Group, HttpResponse> {
    match storage.get_group_by_id(group_id).await {
        Ok(Some(group)) if group.created_by_student_id == student_id => Ok(group),
        Ok(_) => Err(group_not_found()),
        Err(e) => Err(error_response(&e, "Failed to load group")),
    }
}

fn group_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::GroupNotFound,
        "Group not found or not authorized",
    ))
}

/// 校验规范化后的成员列表
///
/// 先检查活动内的唯一性（409，列出冲突成员），再检查成员是否为同年级在读学生（400）。
async fn check_members(
    storage: &Arc<dyn Storage>,
    activity: &Activity,
    actor: &str,
    members: &[String],
    current_group: Option<&Group>,
) -> Result<(), HttpResponse> {
    let existing = storage
        .find_grouped_students(activity.id, members)
        .await
        .map_err(|e| error_response(&e, "Failed to check group membership"))?;

    if let Err(violation) =
        validate_membership(actor, members, &existing, current_group.map(|g| g.id))
    {
        info!(
            "Group membership rejected for activity {}: {}",
            activity.id, violation
        );
        return Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::GroupMemberConflict,
            violation.to_string(),
        )));
    }

    let available = storage
        .list_available_students(activity.id, actor, &activity.target_year_levels)
        .await
        .map_err(|e| error_response(&e, "Failed to load students"))?;
    let mut eligible: HashSet<&str> = available.iter().map(|s| s.student_id.as_str()).collect();
    if let Some(group) = current_group {
        eligible.extend(group.members.iter().map(|m| m.student_id.as_str()));
    }

    let ineligible: Vec<&str> = members
        .iter()
        .map(String::as_str)
        .filter(|m| *m != actor && !eligible.contains(m))
        .collect();
    if !ineligible.is_empty() {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            format!("Unknown or ineligible students: {}", ineligible.join(", ")),
        )));
    }

    Ok(())
}
