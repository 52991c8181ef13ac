use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;

// 活动查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct ActivityQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

// 评分标准输入
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct CriterionInput {
    pub name: String,
    pub max_score: Option<f64>, // 缺省为 0
    pub weight: Option<f64>,    // 缺省为 1.0
}

// 创建活动请求
//
// 创建者自动成为评分人，grader_ids 中的教师为额外评分人
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct CreateActivityRequest {
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub criteria: Vec<CriterionInput>,
    #[serde(default)]
    pub grader_ids: Vec<i64>,
    pub target_year_levels: Option<Vec<i32>>,
}

// 活动列表查询参数（用于存储层）
#[derive(Debug, Clone)]
pub struct ActivityListQuery {
    pub page: i64,
    pub size: i64,
    pub teacher_id: i64,
    pub search: Option<String>,
}
