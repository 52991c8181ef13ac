//! 学生端成绩视图
//!
//! 输入的评分与评语必须已经按提交状态过滤，这里只负责组装。

use serde::Serialize;
use ts_rs::TS;

use super::aggregate::{CriterionScore, aggregate_group};
use super::scale::LetterGrade;
use crate::models::activities::entities::{Activity, Criterion};
use crate::models::grades::entities::{GradeEntry, GraderComment};
use crate::models::groups::entities::{Group, GroupMember};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub enum DashboardStatus {
    Graded,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct VisibleComment {
    pub teacher_name: String,
    pub comment: String,
}

/// 某学生在某活动中的成绩
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DashboardView {
    pub activity_id: i64,
    pub activity_title: String,
    pub group_id: i64,
    pub group_name: String,
    pub members: Vec<GroupMember>,
    pub status: DashboardStatus,
    pub criteria_scores: Vec<CriterionScore>,
    pub overall_score: Option<f64>,
    pub final_grade: Option<LetterGrade>,
    pub comments: Vec<VisibleComment>,
}

/// 学生全部活动的成绩概览
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DashboardOverview {
    pub total_activities: i64,
    pub graded_count: i64,
    pub pending_count: i64,
    pub items: Vec<DashboardView>,
}

pub fn build_dashboard(
    activity: &Activity,
    group: &Group,
    criteria: &[Criterion],
    visible_entries: &[GradeEntry],
    visible_comments: &[GraderComment],
) -> DashboardView {
    let score = aggregate_group(criteria, visible_entries, group.id);

    let comments = visible_comments
        .iter()
        .filter(|c| c.group_id == group.id && !c.comment.trim().is_empty())
        .map(|c| VisibleComment {
            teacher_name: c.teacher_name.clone(),
            comment: c.comment.clone(),
        })
        .collect();

    DashboardView {
        activity_id: activity.id,
        activity_title: activity.title.clone(),
        group_id: group.id,
        group_name: group.group_name.clone(),
        members: group.members.clone(),
        status: if score.overall_score.is_some() {
            DashboardStatus::Graded
        } else {
            DashboardStatus::Pending
        },
        criteria_scores: score.criteria_scores,
        overall_score: score.overall_score,
        final_grade: score.final_grade,
        comments,
    }
}

pub fn build_overview(items: Vec<DashboardView>) -> DashboardOverview {
    let graded_count = items
        .iter()
        .filter(|v| v.status == DashboardStatus::Graded)
        .count() as i64;
    DashboardOverview {
        total_activities: items.len() as i64,
        graded_count,
        pending_count: items.len() as i64 - graded_count,
        items,
    }
}
