//! 学生实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: String,
    #[sea_orm(unique)]
    pub user_id: i64,
    pub full_name: String,
    pub nickname: Option<String>,
    pub year_level: i32,
    pub status: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::group_members::Entity")]
    GroupMembers,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::group_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GroupMembers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    fn account_status(&self) -> crate::models::profiles::entities::AccountStatus {
        use crate::models::profiles::entities::AccountStatus;
        self.status
            .parse::<AccountStatus>()
            .unwrap_or(AccountStatus::Inactive)
    }

    pub fn into_profile(self) -> crate::models::profiles::entities::StudentProfile {
        use crate::models::profiles::entities::StudentProfile;

        StudentProfile {
            status: self.account_status(),
            user_id: self.user_id,
            student_id: self.student_id,
            full_name: self.full_name,
            nickname: self.nickname,
            year_level: self.year_level,
        }
    }

    pub fn into_summary(self) -> crate::models::profiles::responses::StudentSummary {
        use crate::models::profiles::responses::StudentSummary;

        StudentSummary {
            student_id: self.student_id,
            full_name: self.full_name,
            nickname: self.nickname,
            year_level: self.year_level,
        }
    }

    pub fn into_member(self) -> crate::models::groups::entities::GroupMember {
        use crate::models::groups::entities::GroupMember;

        GroupMember {
            student_id: self.student_id,
            full_name: self.full_name,
            nickname: self.nickname,
        }
    }
}
