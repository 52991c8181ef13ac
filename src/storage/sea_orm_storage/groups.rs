//! 学生小组存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{grader_comments, grades, group_members, groups, students};
use crate::errors::{GamsError, Result};
use crate::grading::membership::validate_membership;
use crate::models::{
    groups::{
        entities::{Group, GroupMember, GroupedStudent},
        requests::{CreateGroupRequest, UpdateGroupRequest},
    },
    profiles::{entities::AccountStatus, responses::StudentSummary},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

/// 按小组加载成员，保持加入顺序
async fn load_members<C: ConnectionTrait>(
    conn: &C,
    group_ids: Vec<i64>,
) -> Result<HashMap<i64, Vec<GroupMember>>> {
    let mut result: HashMap<i64, Vec<GroupMember>> = HashMap::new();
    if group_ids.is_empty() {
        return Ok(result);
    }

    let rows = GroupMembers::find()
        .filter(group_members::Column::GroupId.is_in(group_ids))
        .order_by_asc(group_members::Column::Id)
        .all(conn)
        .await
        .map_err(|e| GamsError::database_operation(format!("查询小组成员失败: {e}")))?;

    let student_ids: Vec<String> = rows.iter().map(|r| r.student_id.clone()).collect();
    let students: HashMap<String, GroupMember> = if student_ids.is_empty() {
        HashMap::new()
    } else {
        Students::find()
            .filter(students::Column::StudentId.is_in(student_ids))
            .all(conn)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询学生信息失败: {e}")))?
            .into_iter()
            .map(|s| (s.student_id.clone(), s.into_member()))
            .collect()
    };

    for row in rows {
        if let Some(member) = students.get(&row.student_id) {
            result.entry(row.group_id).or_default().push(member.clone());
        }
    }

    Ok(result)
}

/// 整体替换小组成员
async fn replace_members<C: ConnectionTrait>(
    conn: &C,
    group_id: i64,
    student_ids: &[String],
) -> Result<()> {
    GroupMembers::delete_many()
        .filter(group_members::Column::GroupId.eq(group_id))
        .exec(conn)
        .await
        .map_err(|e| GamsError::database_operation(format!("清除小组成员失败: {e}")))?;

    let models: Vec<GroupMemberActiveModel> = student_ids
        .iter()
        .map(|id| GroupMemberActiveModel {
            group_id: Set(group_id),
            student_id: Set(id.clone()),
            ..Default::default()
        })
        .collect();

    if !models.is_empty() {
        GroupMembers::insert_many(models)
            .exec(conn)
            .await
            .map_err(|e| GamsError::database_operation(format!("写入小组成员失败: {e}")))?;
    }

    Ok(())
}

/// 查询这些学生在某活动中已有的分组
async fn find_grouped<C: ConnectionTrait>(
    conn: &C,
    activity_id: i64,
    student_ids: &[String],
) -> Result<Vec<GroupedStudent>> {
    if student_ids.is_empty() {
        return Ok(vec![]);
    }

    let group_ids: Vec<i64> = Groups::find()
        .filter(groups::Column::ActivityId.eq(activity_id))
        .all(conn)
        .await
        .map_err(|e| GamsError::database_operation(format!("查询活动小组失败: {e}")))?
        .into_iter()
        .map(|g| g.id)
        .collect();

    if group_ids.is_empty() {
        return Ok(vec![]);
    }

    let rows = GroupMembers::find()
        .filter(
            Condition::all()
                .add(group_members::Column::GroupId.is_in(group_ids))
                .add(group_members::Column::StudentId.is_in(student_ids.to_vec())),
        )
        .all(conn)
        .await
        .map_err(|e| GamsError::database_operation(format!("查询小组成员失败: {e}")))?;

    if rows.is_empty() {
        return Ok(vec![]);
    }

    let names: HashMap<String, String> = Students::find()
        .filter(
            students::Column::StudentId
                .is_in(rows.iter().map(|r| r.student_id.clone()).collect::<Vec<_>>()),
        )
        .all(conn)
        .await
        .map_err(|e| GamsError::database_operation(format!("查询学生信息失败: {e}")))?
        .into_iter()
        .map(|s| (s.student_id, s.full_name))
        .collect();

    Ok(rows
        .into_iter()
        .map(|r| GroupedStudent {
            full_name: names
                .get(&r.student_id)
                .cloned()
                .unwrap_or_else(|| r.student_id.clone()),
            student_id: r.student_id,
            group_id: r.group_id,
        })
        .collect())
}

impl SeaOrmStorage {
    async fn groups_with_members(&self, rows: Vec<GroupModel>) -> Result<Vec<Group>> {
        let mut members = load_members(&self.db, rows.iter().map(|g| g.id).collect()).await?;
        Ok(rows
            .into_iter()
            .map(|g| {
                let m = members.remove(&g.id).unwrap_or_default();
                g.into_group(m)
            })
            .collect())
    }

    /// 列出活动的全部小组
    pub async fn list_activity_groups_impl(&self, activity_id: i64) -> Result<Vec<Group>> {
        let rows = Groups::find()
            .filter(groups::Column::ActivityId.eq(activity_id))
            .order_by_asc(groups::Column::CreatedAt)
            .order_by_asc(groups::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询小组列表失败: {e}")))?;

        self.groups_with_members(rows).await
    }

    /// 通过ID获取小组
    pub async fn get_group_by_id_impl(&self, group_id: i64) -> Result<Option<Group>> {
        let row = Groups::find_by_id(group_id)
            .one(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询小组失败: {e}")))?;

        match row {
            Some(row) => Ok(self.groups_with_members(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 获取学生在某活动中的小组
    pub async fn find_student_group_impl(
        &self,
        activity_id: i64,
        student_id: &str,
    ) -> Result<Option<Group>> {
        let group_ids: Vec<i64> = GroupMembers::find()
            .filter(group_members::Column::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询小组成员失败: {e}")))?
            .into_iter()
            .map(|m| m.group_id)
            .collect();

        if group_ids.is_empty() {
            return Ok(None);
        }

        let row = Groups::find()
            .filter(
                Condition::all()
                    .add(groups::Column::Id.is_in(group_ids))
                    .add(groups::Column::ActivityId.eq(activity_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询学生小组失败: {e}")))?;

        match row {
            Some(row) => Ok(self.groups_with_members(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// 查询这些学生在某活动中已有的分组
    pub async fn find_grouped_students_impl(
        &self,
        activity_id: i64,
        student_ids: &[String],
    ) -> Result<Vec<GroupedStudent>> {
        find_grouped(&self.db, activity_id, student_ids).await
    }

    /// 创建小组及其成员
    pub async fn create_group_impl(
        &self,
        creator_student_id: &str,
        req: CreateGroupRequest,
    ) -> Result<Group> {
        let now = chrono::Utc::now().timestamp();

        let _guard = self.membership_lock.lock().await;
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GamsError::database_operation(format!("开启事务失败: {e}")))?;

        // 服务层校验之后可能有并发写入，在事务内复查
        let grouped = find_grouped(&txn, req.activity_id, &req.members).await?;
        validate_membership(creator_student_id, &req.members, &grouped, None)?;

        let group = GroupActiveModel {
            activity_id: Set(req.activity_id),
            group_name: Set(req.group_name.trim().to_string()),
            description: Set(req.description.clone()),
            created_by_student_id: Set(creator_student_id.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| GamsError::database_operation(format!("创建小组失败: {e}")))?;

        replace_members(&txn, group.id, &req.members).await?;

        txn.commit()
            .await
            .map_err(|e| GamsError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_group_by_id_impl(group.id)
            .await?
            .ok_or_else(|| GamsError::not_found("Group not found after creation"))
    }

    /// 更新小组信息并替换成员
    pub async fn update_group_impl(
        &self,
        group_id: i64,
        req: UpdateGroupRequest,
    ) -> Result<Option<Group>> {
        let _guard = self.membership_lock.lock().await;
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GamsError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = Groups::find_by_id(group_id)
            .one(&txn)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询小组失败: {e}")))?
        else {
            return Ok(None);
        };

        let grouped = find_grouped(&txn, existing.activity_id, &req.members).await?;
        validate_membership(
            &existing.created_by_student_id,
            &req.members,
            &grouped,
            Some(group_id),
        )?;

        GroupActiveModel {
            id: Set(group_id),
            group_name: Set(req.group_name.trim().to_string()),
            description: Set(req.description.clone()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| GamsError::database_operation(format!("更新小组失败: {e}")))?;

        replace_members(&txn, group_id, &req.members).await?;

        txn.commit()
            .await
            .map_err(|e| GamsError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_group_by_id_impl(group_id).await
    }

    /// 原子地替换小组成员
    pub async fn replace_group_membership_impl(
        &self,
        group_id: i64,
        student_ids: &[String],
    ) -> Result<()> {
        let _guard = self.membership_lock.lock().await;
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GamsError::database_operation(format!("开启事务失败: {e}")))?;

        replace_members(&txn, group_id, student_ids).await?;

        txn.commit()
            .await
            .map_err(|e| GamsError::database_operation(format!("提交事务失败: {e}")))
    }

    /// 删除小组及其评分、评语、成员
    pub async fn delete_group_impl(&self, group_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GamsError::database_operation(format!("开启事务失败: {e}")))?;

        Grades::delete_many()
            .filter(grades::Column::GroupId.eq(group_id))
            .exec(&txn)
            .await
            .map_err(|e| GamsError::database_operation(format!("删除小组评分失败: {e}")))?;

        GraderComments::delete_many()
            .filter(grader_comments::Column::GroupId.eq(group_id))
            .exec(&txn)
            .await
            .map_err(|e| GamsError::database_operation(format!("删除小组评语失败: {e}")))?;

        GroupMembers::delete_many()
            .filter(group_members::Column::GroupId.eq(group_id))
            .exec(&txn)
            .await
            .map_err(|e| GamsError::database_operation(format!("删除小组成员失败: {e}")))?;

        let result = Groups::delete_by_id(group_id)
            .exec(&txn)
            .await
            .map_err(|e| GamsError::database_operation(format!("删除小组失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| GamsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 列出学生所在的全部小组，最新的在前
    pub async fn list_student_groups_impl(&self, student_id: &str) -> Result<Vec<Group>> {
        let group_ids: Vec<i64> = GroupMembers::find()
            .filter(group_members::Column::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询小组成员失败: {e}")))?
            .into_iter()
            .map(|m| m.group_id)
            .collect();

        if group_ids.is_empty() {
            return Ok(vec![]);
        }

        let rows = Groups::find()
            .filter(groups::Column::Id.is_in(group_ids))
            .order_by_desc(groups::Column::CreatedAt)
            .order_by_desc(groups::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询学生小组失败: {e}")))?;

        self.groups_with_members(rows).await
    }

    /// 列出可邀请的同学：在读、年级匹配、尚未在该活动中分组
    pub async fn list_available_students_impl(
        &self,
        activity_id: i64,
        exclude_student_id: &str,
        year_levels: &[i32],
    ) -> Result<Vec<StudentSummary>> {
        if year_levels.is_empty() {
            return Ok(vec![]);
        }

        let group_ids: Vec<i64> = Groups::find()
            .filter(groups::Column::ActivityId.eq(activity_id))
            .all(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询活动小组失败: {e}")))?
            .into_iter()
            .map(|g| g.id)
            .collect();

        let grouped: Vec<String> = if group_ids.is_empty() {
            vec![]
        } else {
            GroupMembers::find()
                .filter(group_members::Column::GroupId.is_in(group_ids))
                .all(&self.db)
                .await
                .map_err(|e| GamsError::database_operation(format!("查询小组成员失败: {e}")))?
                .into_iter()
                .map(|m| m.student_id)
                .collect()
        };

        let mut condition = Condition::all()
            .add(students::Column::Status.eq(AccountStatus::Active.to_string()))
            .add(students::Column::StudentId.ne(exclude_student_id))
            .add(students::Column::YearLevel.is_in(year_levels.to_vec()));
        if !grouped.is_empty() {
            condition = condition.add(students::Column::StudentId.is_not_in(grouped));
        }

        let rows = Students::find()
            .filter(condition)
            .order_by_asc(students::Column::FullName)
            .all(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询可选同学失败: {e}")))?;

        Ok(rows.into_iter().map(|s| s.into_summary()).collect())
    }
}
