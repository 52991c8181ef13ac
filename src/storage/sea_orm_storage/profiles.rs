//! 用户资料存储操作

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{grading_scale, students, teachers};
use crate::errors::{GamsError, Result};
use crate::grading::GradeScale;
use crate::models::profiles::{
    entities::{AccountStatus, Profile, Role},
    responses::TeacherSummary,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 通过用户ID获取资料，按 users.role 选择资料表
    pub async fn get_profile_by_user_id_impl(&self, user_id: i64) -> Result<Option<Profile>> {
        let user = Users::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询用户失败: {e}")))?;

        let Some(user) = user else {
            return Ok(None);
        };

        let role = user
            .role
            .parse::<Role>()
            .map_err(|e| GamsError::authentication(format!("用户角色无效: {e}")))?;
        let account_disabled = user.status != AccountStatus::Active.to_string();

        let mut profile = match role {
            Role::Student => {
                let student = Students::find()
                    .filter(students::Column::UserId.eq(user_id))
                    .one(&self.db)
                    .await
                    .map_err(|e| {
                        GamsError::database_operation(format!("查询学生资料失败: {e}"))
                    })?;
                match student {
                    Some(s) => Profile::Student(s.into_profile()),
                    None => return Ok(None),
                }
            }
            Role::Teacher => {
                let teacher = Teachers::find()
                    .filter(teachers::Column::UserId.eq(user_id))
                    .one(&self.db)
                    .await
                    .map_err(|e| {
                        GamsError::database_operation(format!("查询教师资料失败: {e}"))
                    })?;
                match teacher {
                    Some(t) => Profile::Teacher(t.into_profile()),
                    None => return Ok(None),
                }
            }
            Role::Admin => Profile::Admin(user.into_admin_profile()),
        };

        // 登录账号被停用时，资料状态一并视为停用
        if account_disabled {
            match &mut profile {
                Profile::Student(p) => p.status = AccountStatus::Inactive,
                Profile::Teacher(p) => p.status = AccountStatus::Inactive,
                Profile::Admin(p) => p.status = AccountStatus::Inactive,
            }
        }

        Ok(Some(profile))
    }

    /// 列出在职教师
    pub async fn list_active_teachers_impl(&self) -> Result<Vec<TeacherSummary>> {
        let teachers = Teachers::find()
            .filter(teachers::Column::Status.eq(AccountStatus::Active.to_string()))
            .order_by_asc(teachers::Column::FullName)
            .all(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询教师列表失败: {e}")))?;

        Ok(teachers.into_iter().map(|t| t.into_summary()).collect())
    }

    /// 获取等级绩点表，表为空时使用标准等级表
    pub async fn get_grade_scale_impl(&self) -> Result<GradeScale> {
        let rows = GradingScale::find()
            .order_by_desc(grading_scale::Column::Gpa)
            .all(&self.db)
            .await
            .map_err(|e| GamsError::database_operation(format!("查询等级表失败: {e}")))?;

        if rows.is_empty() {
            return Ok(GradeScale::standard());
        }

        Ok(GradeScale::from_entries(
            rows.into_iter().map(|r| r.into_entry()).collect(),
        ))
    }
}
