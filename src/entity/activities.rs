//! 评分活动实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub created_by_teacher_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub start_date: i64,
    pub end_date: i64,
    #[sea_orm(column_type = "Text")]
    pub target_year_levels: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teachers::Entity",
        from = "Column::CreatedByTeacherId",
        to = "super::teachers::Column::TeacherId"
    )]
    Creator,
    #[sea_orm(has_many = "super::criteria::Entity")]
    Criteria,
    #[sea_orm(has_many = "super::groups::Entity")]
    Groups,
    #[sea_orm(has_many = "super::activity_graders::Entity")]
    Graders,
}

impl Related<super::teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::criteria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Criteria.def()
    }
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl Related<super::activity_graders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Graders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_activity(self) -> crate::models::activities::entities::Activity {
        use crate::models::activities::entities::{Activity, decode_year_levels};
        use chrono::{DateTime, Utc};

        Activity {
            id: self.id,
            created_by_teacher_id: self.created_by_teacher_id,
            title: self.title,
            description: self.description,
            start_date: DateTime::<Utc>::from_timestamp(self.start_date, 0).unwrap_or_default(),
            end_date: DateTime::<Utc>::from_timestamp(self.end_date, 0).unwrap_or_default(),
            target_year_levels: decode_year_levels(&self.target_year_levels),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
