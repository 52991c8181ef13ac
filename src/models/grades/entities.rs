use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 单个评分格：(活动, 小组, 评分人, 评分标准) → 字母等级
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeEntry {
    pub group_id: i64,
    pub teacher_id: i64,
    pub criteria_id: i64,
    pub score: String, // 可能为空或不在等级表中
}

// 评分人对小组的评语
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GraderComment {
    pub group_id: i64,
    pub teacher_id: i64,
    pub teacher_name: String,
    pub comment: String,
}

/// 评分/评语查询条件
#[derive(Debug, Clone, Copy, Default)]
pub struct GradeFilter {
    pub group_id: Option<i64>,
    pub teacher_id: Option<i64>,
    /// 仅返回已提交评分人的数据
    pub submitted_only: bool,
}

impl GradeFilter {
    #[cfg(test)]
    pub fn visible() -> Self {
        Self {
            submitted_only: true,
            ..Default::default()
        }
    }

    pub fn visible_for_group(group_id: i64) -> Self {
        Self {
            group_id: Some(group_id),
            submitted_only: true,
            ..Default::default()
        }
    }

    pub fn by_grader(teacher_id: i64) -> Self {
        Self {
            teacher_id: Some(teacher_id),
            ..Default::default()
        }
    }
}
