use std::collections::HashMap;
use std::sync::Arc;

use crate::grading::{GradeScale, GraderStatus};
use crate::models::{
    PaginatedResponse,
    activities::{
        entities::{Activity, Criterion},
        requests::{ActivityListQuery, CreateActivityRequest},
        responses::{ActivityDetail, ActivityListItem, StudentActivityItem},
    },
    grades::entities::{GradeEntry, GradeFilter, GraderComment},
    groups::{
        entities::{Group, GroupedStudent},
        requests::{CreateGroupRequest, UpdateGroupRequest},
    },
    profiles::{
        entities::Profile,
        responses::{StudentSummary, TeacherSummary},
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户资料方法
    // 通过用户ID获取资料（按角色区分）
    async fn get_profile_by_user_id(&self, user_id: i64) -> Result<Option<Profile>>;
    // 列出在职教师（评分人选择）
    async fn list_active_teachers(&self) -> Result<Vec<TeacherSummary>>;
    // 获取等级绩点表
    async fn get_grade_scale(&self) -> Result<GradeScale>;

    /// 活动管理方法
    // 创建活动（活动、评分标准、评分人、提交状态在同一事务中写入）
    async fn create_activity(
        &self,
        creator_teacher_id: i64,
        req: CreateActivityRequest,
    ) -> Result<ActivityDetail>;
    // 通过ID获取活动
    async fn get_activity_by_id(&self, activity_id: i64) -> Result<Option<Activity>>;
    // 获取活动详情（含评分标准与评分人）
    async fn get_activity_detail(&self, activity_id: i64) -> Result<Option<ActivityDetail>>;
    // 列出教师创建或参与评分的活动
    async fn list_teacher_activities(
        &self,
        query: ActivityListQuery,
    ) -> Result<PaginatedResponse<ActivityListItem>>;
    // 列出面向某年级的活动
    async fn list_activities_for_student(
        &self,
        student_id: &str,
        year_level: i32,
    ) -> Result<Vec<StudentActivityItem>>;
    // 删除活动及其全部关联数据
    async fn delete_activity(&self, activity_id: i64) -> Result<bool>;
    // 教师是否为活动评分人（创建者或指定评分人）
    async fn is_activity_grader(&self, activity_id: i64, teacher_id: i64) -> Result<bool>;
    // 列出活动评分人，创建者在前
    async fn list_activity_graders(&self, activity_id: i64) -> Result<Vec<TeacherSummary>>;
    // 列出活动评分标准
    async fn list_criteria(&self, activity_id: i64) -> Result<Vec<Criterion>>;

    /// 小组管理方法
    // 列出活动的全部小组（含成员）
    async fn list_activity_groups(&self, activity_id: i64) -> Result<Vec<Group>>;
    // 通过ID获取小组
    async fn get_group_by_id(&self, group_id: i64) -> Result<Option<Group>>;
    // 获取学生在某活动中的小组
    async fn find_student_group(&self, activity_id: i64, student_id: &str)
    -> Result<Option<Group>>;
    // 查询这些学生在某活动中已有的分组
    async fn find_grouped_students(
        &self,
        activity_id: i64,
        student_ids: &[String],
    ) -> Result<Vec<GroupedStudent>>;
    // 创建小组（成员列表需已规范化）
    async fn create_group(
        &self,
        creator_student_id: &str,
        req: CreateGroupRequest,
    ) -> Result<Group>;
    // 更新小组并整体替换成员
    async fn update_group(&self, group_id: i64, req: UpdateGroupRequest)
    -> Result<Option<Group>>;
    // 原子地替换小组成员
    async fn replace_group_membership(&self, group_id: i64, student_ids: &[String])
    -> Result<()>;
    // 删除小组及其评分、评语、成员
    async fn delete_group(&self, group_id: i64) -> Result<bool>;
    // 列出学生所在的小组
    async fn list_student_groups(&self, student_id: &str) -> Result<Vec<Group>>;
    // 列出可邀请的同学
    async fn list_available_students(
        &self,
        activity_id: i64,
        exclude_student_id: &str,
        year_levels: &[i32],
    ) -> Result<Vec<StudentSummary>>;

    /// 评分方法
    // 查询评分，submitted_only 时只返回已提交评分人的数据
    async fn get_grade_entries(
        &self,
        activity_id: i64,
        filter: GradeFilter,
    ) -> Result<Vec<GradeEntry>>;
    // 写入或覆盖单个评分格
    async fn upsert_grade_entry(
        &self,
        activity_id: i64,
        group_id: i64,
        teacher_id: i64,
        criteria_id: i64,
        score: &str,
    ) -> Result<()>;
    // 写入或覆盖评语
    async fn upsert_comment(
        &self,
        activity_id: i64,
        group_id: i64,
        teacher_id: i64,
        comment: &str,
    ) -> Result<()>;
    // 查询评语
    async fn get_comments(
        &self,
        activity_id: i64,
        filter: GradeFilter,
    ) -> Result<Vec<GraderComment>>;

    /// 提交状态方法
    // 获取活动全部评分人的提交状态
    async fn get_submission_statuses(&self, activity_id: i64)
    -> Result<HashMap<i64, GraderStatus>>;
    // 获取单个评分人的提交状态
    async fn get_submission_status(
        &self,
        activity_id: i64,
        teacher_id: i64,
    ) -> Result<Option<GraderStatus>>;
    // 写入提交状态
    async fn set_submission_status(
        &self,
        activity_id: i64,
        teacher_id: i64,
        status: &GraderStatus,
    ) -> Result<()>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
