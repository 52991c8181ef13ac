//! 评分活动存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{
    activities, activity_graders, criteria, grader_comments, grader_submission_status, grades,
    group_members, groups, teachers,
};
use crate::errors::{GamsError, Result};
use crate::grading::SubmissionState;
use crate::models::{
    PaginatedResponse, PaginationInfo,
    activities::{
        entities::{Activity, Criterion, DEFAULT_TARGET_YEAR_LEVELS, encode_year_levels},
        requests::{ActivityListQuery, CreateActivityRequest},
        responses::{ActivityDetail, ActivityListItem, StudentActivityItem},
    },
    profiles::responses::TeacherSummary,
};
use crate::utils::escape_like_pattern;
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 去重并排除创建者后的额外评分人
fn extra_graders(creator_teacher_id: i64, grader_ids: &[i64]) -> Vec<i64> {
    let mut ids: Vec<i64> = Vec::with_capacity(grader_ids.len());
    for &id in grader_ids {
        if id != creator_teacher_id && !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// 查询教师姓名
async fn teacher_names<C: ConnectionTrait>(
    conn: &C,
    teacher_ids: Vec<i64>,
) -> Result<HashMap<i64, String>> {
    if teacher_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = Teachers::find()
        .filter(teachers::Column::TeacherId.is_in(teacher_ids))
        .all(conn)
        .await
        .map_err(|e| GamsError::database_operation(format!("查询教师信息失败: {e}")))?;

    Ok(rows.into_iter().map(|t| (t.teacher_id, t.full_name)).collect())
}

impl SeaOrmStorage {
    /// 创建活动
    ///
    /// 活动、评分标准、额外评分人以及所有评分人的 draft 状态在同一事务中写入。
    pub async fn create_activity_impl(
        &self,
        creator_teacher_id: i64,
        req: CreateActivityRequest,
    ) -> Result<ActivityDetail> {
        let now = chrono::Utc::now().timestamp();
        let target_year_levels = match req.target_year_levels {
            Some(ref levels) if !levels.is_empty() => levels.clone(),
            _ => DEFAULT_TARGET_YEAR_LEVELS.to_vec(),
        };
        let graders = extra_graders(creator_teacher_id, &req.grader_ids);

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GamsError::database_operation(format!("开启事务失败: {e}")))?;

        let activity = ActivityActiveModel {
            created_by_teacher_id: Set(creator_teacher_id),
            title: Set(req.title.trim().to_string()),
            description: Set(req.description.clone()),
            start_date: Set(req.start_date.timestamp()),
            end_date: Set(req.end_date.timestamp()),
            target_year_levels: Set(encode_year_levels(&target_year_levels)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| GamsError::database_operation(format!("创建活动失败: {e}")))?;

        let criteria_models: Vec<CriterionActiveModel> = req
            .criteria
            .iter()
            .map(|c| CriterionActiveModel {
                activity_id: Set(activity.id),
                name: Set(c.name.trim().to_string()),
                max_score: Set(c.max_score.unwrap_or(0.0)),
                weight: Set(c.weight.unwrap_or(1.0)),
                ..Default::default()
            })
            .collect();
        if !criteria_models.is_empty() {
            Criteria::insert_many(criteria_models)
                .exec(&txn)
                .await
                .map_err(|e| GamsError::database_operation(format!("创建评分标准失败: {e}")))?;
        }

        let grader_models: Vec<ActivityGraderActiveModel> = graders
            .iter()
            .map(|&teacher_id| ActivityGraderActiveModel {
                activity_id: Set(activity.id),
                teacher_id: Set(teacher_id),
                ..Default::default()
            })
            .collect();
        if !grader_models.is_empty() {
            ActivityGraders::insert_many(grader_models)
                .exec(&txn)
                .await
                .map_err(|e| GamsError::database_operation(format!("添加评分人失败: {e}")))?;
        }

        // 创建者与额外评分人均从 draft 开始
        let status_models: Vec<SubmissionStatusActiveModel> = std::iter::once(creator_teacher_id)
            .chain(graders.iter().copied())
            .map(|teacher_id| SubmissionStatusActiveModel {
                activity_id: Set(activity.id),
                teacher_id: Set(teacher_id),
                status: Set(SubmissionState::Draft.to_string()),
                submitted_at: Set(None),
                ..Default::default()
            })
            .collect();
        GraderSubmissionStatus::insert_many(status_models)
            .exec(&txn)
            .await
            .map_err(|e| GamsError::database_operation(format!("初始化评分状态失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| GamsError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_activity_detail_impl(activity.id)
            .await?
            .ok_or_else(|| GamsError::not_found("Activity not found after creation"))
    }

    /// 通过ID获取活动
    pub async fn get_activity_by_id_impl(&self, activity_id: i64) -> Result<Option<Activity>> {
        let result = Activities::find_by_id(activity_id)
            .one(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询活动失败: {e}")))?;

        Ok(result.map(|m| m.into_activity()))
    }

    /// 获取活动详情
    pub async fn get_activity_detail_impl(
        &self,
        activity_id: i64,
    ) -> Result<Option<ActivityDetail>> {
        let Some(activity) = self.get_activity_by_id_impl(activity_id).await? else {
            return Ok(None);
        };

        let criteria = self.list_criteria_impl(activity_id).await?;
        let graders = self.list_activity_graders_impl(activity_id).await?;
        let creator_name = graders
            .iter()
            .find(|g| g.teacher_id == activity.created_by_teacher_id)
            .map(|g| g.full_name.clone())
            .unwrap_or_default();

        Ok(Some(ActivityDetail {
            activity,
            creator_name,
            criteria,
            graders,
        }))
    }

    /// 分页列出教师创建或参与评分的活动
    pub async fn list_teacher_activities_impl(
        &self,
        query: ActivityListQuery,
    ) -> Result<PaginatedResponse<ActivityListItem>> {
        let page = query.page.max(1) as u64;
        let size = query.size.clamp(1, 100) as u64;

        // 作为额外评分人参与的活动
        let graded_ids: Vec<i64> = ActivityGraders::find()
            .filter(activity_graders::Column::TeacherId.eq(query.teacher_id))
            .all(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询评分人关联失败: {e}")))?
            .into_iter()
            .map(|g| g.activity_id)
            .collect();

        let mut visible =
            Condition::any().add(activities::Column::CreatedByTeacherId.eq(query.teacher_id));
        if !graded_ids.is_empty() {
            visible = visible.add(activities::Column::Id.is_in(graded_ids));
        }

        let mut select = Activities::find().filter(visible);

        // 搜索条件（按标题搜索）
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            let pattern = LikeExpr::new(format!("%{escaped}%")).escape('\\');
            select = select.filter(activities::Column::Title.like(pattern));
        }

        select = select
            .order_by_desc(activities::Column::CreatedAt)
            .order_by_desc(activities::Column::Id);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| GamsError::database_operation(format!("查询活动总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| GamsError::database_operation(format!("查询活动页数失败: {e}")))?;

        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询活动列表失败: {e}")))?;

        let activity_ids: Vec<i64> = rows.iter().map(|a| a.id).collect();
        let (criteria_counts, group_counts) = self.count_activity_children(&activity_ids).await?;
        let names = teacher_names(
            &self.db,
            rows.iter().map(|a| a.created_by_teacher_id).collect(),
        )
        .await?;

        let items = rows
            .into_iter()
            .map(|m| {
                let activity = m.into_activity();
                ActivityListItem {
                    creator_name: names
                        .get(&activity.created_by_teacher_id)
                        .cloned()
                        .unwrap_or_default(),
                    criteria_count: criteria_counts.get(&activity.id).copied().unwrap_or(0),
                    group_count: group_counts.get(&activity.id).copied().unwrap_or(0),
                    is_creator: activity.created_by_teacher_id == query.teacher_id,
                    activity,
                }
            })
            .collect();

        Ok(PaginatedResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 列出面向学生年级的活动，未分组的活动排在前面
    pub async fn list_activities_for_student_impl(
        &self,
        student_id: &str,
        year_level: i32,
    ) -> Result<Vec<StudentActivityItem>> {
        let rows = Activities::find()
            .order_by_desc(activities::Column::CreatedAt)
            .order_by_desc(activities::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询活动列表失败: {e}")))?;

        let activities: Vec<Activity> = rows
            .into_iter()
            .map(|m| m.into_activity())
            .filter(|a| a.targets_year_level(year_level))
            .collect();

        if activities.is_empty() {
            return Ok(vec![]);
        }

        // 学生所在小组：活动ID → 小组ID
        let member_group_ids: Vec<i64> = GroupMembers::find()
            .filter(group_members::Column::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询小组成员失败: {e}")))?
            .into_iter()
            .map(|m| m.group_id)
            .collect();

        let my_groups: HashMap<i64, i64> = if member_group_ids.is_empty() {
            HashMap::new()
        } else {
            Groups::find()
                .filter(groups::Column::Id.is_in(member_group_ids))
                .all(&self.db)
                .await
                .map_err(|e| GamsError::database_operation(format!("查询小组失败: {e}")))?
                .into_iter()
                .map(|g| (g.activity_id, g.id))
                .collect()
        };

        let activity_ids: Vec<i64> = activities.iter().map(|a| a.id).collect();
        let (criteria_counts, group_counts) = self.count_activity_children(&activity_ids).await?;
        let names = teacher_names(
            &self.db,
            activities.iter().map(|a| a.created_by_teacher_id).collect(),
        )
        .await?;

        let mut items: Vec<StudentActivityItem> = activities
            .into_iter()
            .map(|activity| StudentActivityItem {
                creator_name: names
                    .get(&activity.created_by_teacher_id)
                    .cloned()
                    .unwrap_or_default(),
                criteria_count: criteria_counts.get(&activity.id).copied().unwrap_or(0),
                group_count: group_counts.get(&activity.id).copied().unwrap_or(0),
                my_group_id: my_groups.get(&activity.id).copied(),
                activity,
            })
            .collect();

        // 稳定排序，保留创建时间倒序
        items.sort_by_key(|item| item.my_group_id.is_some());

        Ok(items)
    }

    /// 删除活动及其全部关联数据
    pub async fn delete_activity_impl(&self, activity_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GamsError::database_operation(format!("开启事务失败: {e}")))?;

        let group_ids: Vec<i64> = Groups::find()
            .filter(groups::Column::ActivityId.eq(activity_id))
            .all(&txn)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询活动小组失败: {e}")))?
            .into_iter()
            .map(|g| g.id)
            .collect();

        Grades::delete_many()
            .filter(grades::Column::ActivityId.eq(activity_id))
            .exec(&txn)
            .await
            .map_err(|e| GamsError::database_operation(format!("删除评分失败: {e}")))?;

        GraderComments::delete_many()
            .filter(grader_comments::Column::ActivityId.eq(activity_id))
            .exec(&txn)
            .await
            .map_err(|e| GamsError::database_operation(format!("删除评语失败: {e}")))?;

        if !group_ids.is_empty() {
            GroupMembers::delete_many()
                .filter(group_members::Column::GroupId.is_in(group_ids))
                .exec(&txn)
                .await
                .map_err(|e| GamsError::database_operation(format!("删除小组成员失败: {e}")))?;
        }

        Groups::delete_many()
            .filter(groups::Column::ActivityId.eq(activity_id))
            .exec(&txn)
            .await
            .map_err(|e| GamsError::database_operation(format!("删除小组失败: {e}")))?;

        Criteria::delete_many()
            .filter(criteria::Column::ActivityId.eq(activity_id))
            .exec(&txn)
            .await
            .map_err(|e| GamsError::database_operation(format!("删除评分标准失败: {e}")))?;

        ActivityGraders::delete_many()
            .filter(activity_graders::Column::ActivityId.eq(activity_id))
            .exec(&txn)
            .await
            .map_err(|e| GamsError::database_operation(format!("删除评分人失败: {e}")))?;

        GraderSubmissionStatus::delete_many()
            .filter(grader_submission_status::Column::ActivityId.eq(activity_id))
            .exec(&txn)
            .await
            .map_err(|e| GamsError::database_operation(format!("删除评分状态失败: {e}")))?;

        let result = Activities::delete_by_id(activity_id)
            .exec(&txn)
            .await
            .map_err(|e| GamsError::database_operation(format!("删除活动失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| GamsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 教师是否为活动评分人
    pub async fn is_activity_grader_impl(&self, activity_id: i64, teacher_id: i64) -> Result<bool> {
        let Some(activity) = Activities::find_by_id(activity_id)
            .one(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询活动失败: {e}")))?
        else {
            return Ok(false);
        };

        if activity.created_by_teacher_id == teacher_id {
            return Ok(true);
        }

        let count = ActivityGraders::find()
            .filter(
                Condition::all()
                    .add(activity_graders::Column::ActivityId.eq(activity_id))
                    .add(activity_graders::Column::TeacherId.eq(teacher_id)),
            )
            .count(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询评分人失败: {e}")))?;

        Ok(count > 0)
    }

    /// 列出活动评分人，创建者在前，其余按指派顺序
    pub async fn list_activity_graders_impl(
        &self,
        activity_id: i64,
    ) -> Result<Vec<TeacherSummary>> {
        let Some(activity) = Activities::find_by_id(activity_id)
            .one(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询活动失败: {e}")))?
        else {
            return Ok(vec![]);
        };

        let mut ordered_ids = vec![activity.created_by_teacher_id];
        let assigned = ActivityGraders::find()
            .filter(activity_graders::Column::ActivityId.eq(activity_id))
            .order_by_asc(activity_graders::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询评分人失败: {e}")))?;
        for grader in assigned {
            if !ordered_ids.contains(&grader.teacher_id) {
                ordered_ids.push(grader.teacher_id);
            }
        }

        let mut teachers: HashMap<i64, TeacherSummary> = Teachers::find()
            .filter(teachers::Column::TeacherId.is_in(ordered_ids.clone()))
            .all(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询教师信息失败: {e}")))?
            .into_iter()
            .map(|t| (t.teacher_id, t.into_summary()))
            .collect();

        Ok(ordered_ids
            .into_iter()
            .filter_map(|id| teachers.remove(&id))
            .collect())
    }

    /// 列出活动评分标准
    pub async fn list_criteria_impl(&self, activity_id: i64) -> Result<Vec<Criterion>> {
        let rows = Criteria::find()
            .filter(criteria::Column::ActivityId.eq(activity_id))
            .order_by_asc(criteria::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询评分标准失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_criterion()).collect())
    }

    /// 统计各活动的评分标准数与小组数
    async fn count_activity_children(
        &self,
        activity_ids: &[i64],
    ) -> Result<(HashMap<i64, i64>, HashMap<i64, i64>)> {
        let mut criteria_counts: HashMap<i64, i64> = HashMap::new();
        let mut group_counts: HashMap<i64, i64> = HashMap::new();
        if activity_ids.is_empty() {
            return Ok((criteria_counts, group_counts));
        }

        let criteria_rows = Criteria::find()
            .filter(criteria::Column::ActivityId.is_in(activity_ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("统计评分标准失败: {e}")))?;
        for c in criteria_rows {
            *criteria_counts.entry(c.activity_id).or_insert(0) += 1;
        }

        let group_rows = Groups::find()
            .filter(groups::Column::ActivityId.is_in(activity_ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("统计小组失败: {e}")))?;
        for g in group_rows {
            *group_counts.entry(g.activity_id).or_insert(0) += 1;
        }

        Ok((criteria_counts, group_counts))
    }
}

#[cfg(test)]
mod tests {
    use super::extra_graders;

    #[test]
    fn test_extra_graders_dedup_and_skip_creator() {
        assert_eq!(extra_graders(1, &[2, 1, 3, 2]), vec![2, 3]);
        assert!(extra_graders(1, &[1]).is_empty());
    }
}
