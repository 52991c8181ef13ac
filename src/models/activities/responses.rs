use serde::Serialize;
use ts_rs::TS;

use super::entities::{Activity, Criterion};
use crate::models::profiles::responses::TeacherSummary;

// 教师端活动列表项
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct ActivityListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub activity: Activity,
    pub creator_name: String,
    pub criteria_count: i64,
    pub group_count: i64,
    pub is_creator: bool,
}

// 活动详情（含评分标准与评分人）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct ActivityDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub activity: Activity,
    pub creator_name: String,
    pub criteria: Vec<Criterion>,
    pub graders: Vec<TeacherSummary>,
}

// 学生端可参与活动
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct StudentActivityItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub activity: Activity,
    pub creator_name: String,
    pub criteria_count: i64,
    pub group_count: i64,
    pub my_group_id: Option<i64>,
}
