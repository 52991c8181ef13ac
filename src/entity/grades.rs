//! 评分实体：(活动, 小组, 评分人, 评分标准) 唯一

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub activity_id: i64,
    pub group_id: i64,
    pub teacher_id: i64,
    pub criteria_id: i64,
    pub score: String,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id"
    )]
    Group,
    #[sea_orm(
        belongs_to = "super::criteria::Entity",
        from = "Column::CriteriaId",
        to = "super::criteria::Column::Id"
    )]
    Criterion,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::criteria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Criterion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_entry(self) -> crate::models::grades::entities::GradeEntry {
        crate::models::grades::entities::GradeEntry {
            group_id: self.group_id,
            teacher_id: self.teacher_id,
            criteria_id: self.criteria_id,
            score: self.score,
        }
    }
}
