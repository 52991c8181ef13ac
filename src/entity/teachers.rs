//! 教师实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub teacher_id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    pub full_name: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
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
    #[sea_orm(has_many = "super::activities::Entity")]
    Activities,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::activities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_profile(self) -> crate::models::profiles::entities::TeacherProfile {
        use crate::models::profiles::entities::{AccountStatus, TeacherProfile};

        TeacherProfile {
            status: self
                .status
                .parse::<AccountStatus>()
                .unwrap_or(AccountStatus::Inactive),
            user_id: self.user_id,
            teacher_id: self.teacher_id,
            full_name: self.full_name,
            nickname: self.nickname,
            email: self.email,
        }
    }

    pub fn into_summary(self) -> crate::models::profiles::responses::TeacherSummary {
        use crate::models::profiles::responses::TeacherSummary;

        TeacherSummary {
            teacher_id: self.teacher_id,
            full_name: self.full_name,
            nickname: self.nickname,
            email: self.email,
        }
    }
}
