use serde::Serialize;
use ts_rs::TS;

use super::entities::Group;
use crate::grading::scale::LetterGrade;

// 学生端小组列表项（成绩仅统计已提交的评分）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct StudentGroupItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub group: Group,
    pub activity_title: String,
    pub is_creator: bool,
    pub overall_score: Option<f64>,
    pub final_grade: Option<LetterGrade>,
}
