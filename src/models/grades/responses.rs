use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use super::entities::{GradeEntry, GraderComment};
use crate::grading::submission::{GraderStatus, SubmissionState};
use crate::models::activities::entities::{Activity, Criterion};
use crate::models::groups::entities::Group;

// 评分工作台：当前评分人自己的评分与评语
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradingWorkspace {
    pub activity: Activity,
    pub criteria: Vec<Criterion>,
    pub groups: Vec<Group>,
    pub grades: Vec<GradeEntry>,
    pub comments: Vec<GraderComment>,
    pub submission: GraderStatus,
    pub locked: bool,
}

// 保存评分结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct SaveGradesResponse {
    pub saved_grades: i64,
    pub comment_saved: bool,
}

// 提交评分结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct SubmitGradesResponse {
    pub status: SubmissionState,
    pub submitted_at: Option<DateTime<Utc>>,
    pub already_submitted: bool,
}
