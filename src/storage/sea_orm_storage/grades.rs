//! 评分与评语存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{grader_comments, grades, teachers};
use crate::errors::{GamsError, Result};
use crate::grading::submission::submitted_graders;
use crate::models::grades::entities::{GradeEntry, GradeFilter, GraderComment};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 可见评分人列表：`submitted_only` 时为已提交的评分人，否则不限制
    ///
    /// 返回 `Some(vec![])` 表示没有任何可见数据。
    async fn visible_graders(
        &self,
        activity_id: i64,
        filter: GradeFilter,
    ) -> Result<Option<Vec<i64>>> {
        if !filter.submitted_only {
            return Ok(None);
        }
        let statuses = self.get_submission_statuses_impl(activity_id).await?;
        Ok(Some(submitted_graders(&statuses)))
    }

    /// 查询评分
    pub async fn get_grade_entries_impl(
        &self,
        activity_id: i64,
        filter: GradeFilter,
    ) -> Result<Vec<GradeEntry>> {
        let mut condition = Condition::all().add(grades::Column::ActivityId.eq(activity_id));

        if let Some(group_id) = filter.group_id {
            condition = condition.add(grades::Column::GroupId.eq(group_id));
        }
        if let Some(teacher_id) = filter.teacher_id {
            condition = condition.add(grades::Column::TeacherId.eq(teacher_id));
        }
        if let Some(visible) = self.visible_graders(activity_id, filter).await? {
            if visible.is_empty() {
                return Ok(vec![]);
            }
            condition = condition.add(grades::Column::TeacherId.is_in(visible));
        }

        let rows = Grades::find()
            .filter(condition)
            .order_by_asc(grades::Column::GroupId)
            .order_by_asc(grades::Column::TeacherId)
            .order_by_asc(grades::Column::CriteriaId)
            .all(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询评分失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_entry()).collect())
    }

    /// 写入或覆盖单个评分格
    pub async fn upsert_grade_entry_impl(
        &self,
        activity_id: i64,
        group_id: i64,
        teacher_id: i64,
        criteria_id: i64,
        score: &str,
    ) -> Result<()> {
        let model = GradeActiveModel {
            activity_id: Set(activity_id),
            group_id: Set(group_id),
            teacher_id: Set(teacher_id),
            criteria_id: Set(criteria_id),
            score: Set(score.to_string()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        Grades::insert(model)
            .on_conflict(
                OnConflict::columns([
                    grades::Column::ActivityId,
                    grades::Column::GroupId,
                    grades::Column::TeacherId,
                    grades::Column::CriteriaId,
                ])
                .update_columns([grades::Column::Score, grades::Column::UpdatedAt])
                .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("保存评分失败: {e}")))?;

        Ok(())
    }

    /// 写入或覆盖评语
    pub async fn upsert_comment_impl(
        &self,
        activity_id: i64,
        group_id: i64,
        teacher_id: i64,
        comment: &str,
    ) -> Result<()> {
        let model = GraderCommentActiveModel {
            activity_id: Set(activity_id),
            group_id: Set(group_id),
            teacher_id: Set(teacher_id),
            comment: Set(comment.to_string()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        GraderComments::insert(model)
            .on_conflict(
                OnConflict::columns([
                    grader_comments::Column::ActivityId,
                    grader_comments::Column::GroupId,
                    grader_comments::Column::TeacherId,
                ])
                .update_columns([
                    grader_comments::Column::Comment,
                    grader_comments::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("保存评语失败: {e}")))?;

        Ok(())
    }

    /// 查询评语，附带评分人姓名
    pub async fn get_comments_impl(
        &self,
        activity_id: i64,
        filter: GradeFilter,
    ) -> Result<Vec<GraderComment>> {
        let mut condition =
            Condition::all().add(grader_comments::Column::ActivityId.eq(activity_id));

        if let Some(group_id) = filter.group_id {
            condition = condition.add(grader_comments::Column::GroupId.eq(group_id));
        }
        if let Some(teacher_id) = filter.teacher_id {
            condition = condition.add(grader_comments::Column::TeacherId.eq(teacher_id));
        }
        if let Some(visible) = self.visible_graders(activity_id, filter).await? {
            if visible.is_empty() {
                return Ok(vec![]);
            }
            condition = condition.add(grader_comments::Column::TeacherId.is_in(visible));
        }

        let rows = GraderComments::find()
            .filter(condition)
            .order_by_asc(grader_comments::Column::GroupId)
            .order_by_asc(grader_comments::Column::TeacherId)
            .all(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询评语失败: {e}")))?;

        if rows.is_empty() {
            return Ok(vec![]);
        }

        let teacher_ids: Vec<i64> = rows.iter().map(|r| r.teacher_id).collect();
        let names: HashMap<i64, String> = Teachers::find()
            .filter(teachers::Column::TeacherId.is_in(teacher_ids))
            .all(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询教师信息失败: {e}")))?
            .into_iter()
            .map(|t| (t.teacher_id, t.full_name))
            .collect();

        Ok(rows
            .into_iter()
            .map(|r| GraderComment {
                teacher_name: names.get(&r.teacher_id).cloned().unwrap_or_default(),
                group_id: r.group_id,
                teacher_id: r.teacher_id,
                comment: r.comment,
            })
            .collect())
    }
}
