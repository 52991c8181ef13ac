//! 等级绩点表实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grading_scale")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub grade: String,
    pub gpa: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_entry(self) -> crate::grading::scale::ScaleEntry {
        crate::grading::scale::ScaleEntry {
            grade: self.grade,
            gpa: self.gpa,
        }
    }
}
