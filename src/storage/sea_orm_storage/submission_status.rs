//! 评分人提交状态存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::grader_submission_status::Column;
use crate::entity::prelude::*;
use crate::errors::{GamsError, Result};
use crate::grading::GraderStatus;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 获取活动全部评分人的提交状态
    pub async fn get_submission_statuses_impl(
        &self,
        activity_id: i64,
    ) -> Result<HashMap<i64, GraderStatus>> {
        let rows = GraderSubmissionStatus::find()
            .filter(Column::ActivityId.eq(activity_id))
            .all(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询评分状态失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|m| (m.teacher_id, m.into_status()))
            .collect())
    }

    /// 获取单个评分人的提交状态
    pub async fn get_submission_status_impl(
        &self,
        activity_id: i64,
        teacher_id: i64,
    ) -> Result<Option<GraderStatus>> {
        let row = GraderSubmissionStatus::find()
            .filter(
                Condition::all()
                    .add(Column::ActivityId.eq(activity_id))
                    .add(Column::TeacherId.eq(teacher_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询评分状态失败: {e}")))?;

        Ok(row.map(|m| m.into_status()))
    }

    /// 写入提交状态，不存在时创建
    pub async fn set_submission_status_impl(
        &self,
        activity_id: i64,
        teacher_id: i64,
        status: &GraderStatus,
    ) -> Result<()> {
        let model = SubmissionStatusActiveModel {
            activity_id: Set(activity_id),
            teacher_id: Set(teacher_id),
            status: Set(status.status.to_string()),
            submitted_at: Set(status.submitted_at.map(|t| t.timestamp())),
            ..Default::default()
        };

        GraderSubmissionStatus::insert(model)
            .on_conflict(
                OnConflict::columns([Column::ActivityId, Column::TeacherId])
                    .update_columns([Column::Status, Column::SubmittedAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("更新评分状态失败: {e}")))?;

        Ok(())
    }
}
