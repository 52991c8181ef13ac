//! 评分进度报告（教师端诊断视图）
//!
//! 与学生端不同，这里展示所有评分人的原始评分，不受提交状态限制；
//! 小组平均绩点同样基于全部评分计算，等级取等级表中最接近的一行。

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use super::aggregate::{aggregate_group, round2};
use super::scale::{GradeScale, ScaleEntry};
use super::submission::{GraderStatus, SubmissionState, status_of};
use crate::models::activities::entities::Criterion;
use crate::models::grades::entities::{GradeEntry, GraderComment};
use crate::models::groups::entities::{Group, GroupMember};
use crate::models::profiles::responses::TeacherSummary;

/// 评分人进度
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/progress.ts")]
pub struct GraderProgress {
    pub teacher_id: i64,
    pub full_name: String,
    pub status: SubmissionState,
    pub submitted_at: Option<DateTime<Utc>>,
    pub graded_group_count: i64,
    pub total_group_count: i64,
    pub completion: f64,
}

/// 某评分人对某评分标准给出的原始等级
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/progress.ts")]
pub struct CriterionCell {
    pub criteria_id: i64,
    pub score: Option<String>,
}

/// 某评分人对某小组的评分行
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/progress.ts")]
pub struct GraderGrades {
    pub teacher_id: i64,
    pub teacher_name: String,
    pub status: SubmissionState,
    pub scores: Vec<CriterionCell>,
    pub comment: Option<String>,
}

/// 小组进度
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/progress.ts")]
pub struct GroupProgress {
    pub group_id: i64,
    pub group_name: String,
    pub members: Vec<GroupMember>,
    pub grader_grades: Vec<GraderGrades>,
    pub average_gpa: Option<f64>,
    pub average_grade: Option<String>,
}

/// 汇总计数
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/progress.ts")]
pub struct ProgressSummary {
    pub total_groups: i64,
    pub total_graders: i64,
    pub submitted_count: i64,
    pub draft_count: i64,
}

/// 活动评分进度报告
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/progress.ts")]
pub struct ProgressReport {
    pub activity_id: i64,
    pub criteria: Vec<Criterion>,
    pub graders: Vec<GraderProgress>,
    pub groups: Vec<GroupProgress>,
    pub summary: ProgressSummary,
    pub grading_scale: Vec<ScaleEntry>,
}

/// 构建报告所需的数据，由调用方一次性从存储层取出
pub struct ProgressInput<'a> {
    pub activity_id: i64,
    pub criteria: &'a [Criterion],
    pub groups: &'a [Group],
    pub graders: &'a [TeacherSummary],
    pub entries: &'a [GradeEntry],
    pub comments: &'a [GraderComment],
    pub statuses: &'a HashMap<i64, GraderStatus>,
    pub scale: &'a GradeScale,
}

fn has_score(entry: &GradeEntry) -> bool {
    !entry.score.trim().is_empty()
}

/// 评分人已评小组数：至少有一个非空评分格的小组
fn graded_group_count(entries: &[GradeEntry], groups: &[Group], teacher_id: i64) -> i64 {
    groups
        .iter()
        .filter(|g| {
            entries
                .iter()
                .any(|e| e.teacher_id == teacher_id && e.group_id == g.id && has_score(e))
        })
        .count() as i64
}

fn grader_row(
    input: &ProgressInput<'_>,
    grader: &TeacherSummary,
    group_id: i64,
) -> GraderGrades {
    let scores = input
        .criteria
        .iter()
        .map(|c| CriterionCell {
            criteria_id: c.id,
            score: input
                .entries
                .iter()
                .find(|e| {
                    e.group_id == group_id
                        && e.teacher_id == grader.teacher_id
                        && e.criteria_id == c.id
                })
                .filter(|e| has_score(e))
                .map(|e| e.score.clone()),
        })
        .collect();

    let comment = input
        .comments
        .iter()
        .find(|c| c.group_id == group_id && c.teacher_id == grader.teacher_id)
        .map(|c| c.comment.clone())
        .filter(|c| !c.trim().is_empty());

    GraderGrades {
        teacher_id: grader.teacher_id,
        teacher_name: grader.full_name.clone(),
        status: status_of(input.statuses, grader.teacher_id).status,
        scores,
        comment,
    }
}

pub fn build_progress(input: &ProgressInput<'_>) -> ProgressReport {
    let total_groups = input.groups.len() as i64;

    let graders: Vec<GraderProgress> = input
        .graders
        .iter()
        .map(|g| {
            let status = status_of(input.statuses, g.teacher_id);
            let graded = graded_group_count(input.entries, input.groups, g.teacher_id);
            let completion = if total_groups > 0 {
                round2(graded as f64 / total_groups as f64)
            } else {
                0.0
            };
            GraderProgress {
                teacher_id: g.teacher_id,
                full_name: g.full_name.clone(),
                status: status.status,
                submitted_at: status.submitted_at,
                graded_group_count: graded,
                total_group_count: total_groups,
                completion,
            }
        })
        .collect();

    let groups = input
        .groups
        .iter()
        .map(|group| {
            let score = aggregate_group(input.criteria, input.entries, group.id);
            let average_grade = score
                .overall_score
                .and_then(|gpa| input.scale.nearest(gpa))
                .map(|e| e.grade.clone());
            GroupProgress {
                group_id: group.id,
                group_name: group.group_name.clone(),
                members: group.members.clone(),
                grader_grades: input
                    .graders
                    .iter()
                    .map(|g| grader_row(input, g, group.id))
                    .collect(),
                average_gpa: score.overall_score,
                average_grade,
            }
        })
        .collect();

    let submitted_count = graders
        .iter()
        .filter(|g| g.status == SubmissionState::Submitted)
        .count() as i64;

    ProgressReport {
        activity_id: input.activity_id,
        criteria: input.criteria.to_vec(),
        summary: ProgressSummary {
            total_groups,
            total_graders: graders.len() as i64,
            submitted_count,
            draft_count: graders.len() as i64 - submitted_count,
        },
        graders,
        groups,
        grading_scale: input.scale.entries().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn criterion(id: i64, weight: f64) -> Criterion {
        Criterion {
            id,
            activity_id: 1,
            name: format!("c{id}"),
            max_score: 0.0,
            weight,
        }
    }

    fn group(id: i64) -> Group {
        let now = Utc.timestamp_opt(0, 0).unwrap();
        Group {
            id,
            activity_id: 1,
            group_name: format!("group-{id}"),
            description: None,
            created_by_student_id: "S1".to_string(),
            members: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn teacher(id: i64) -> TeacherSummary {
        TeacherSummary {
            teacher_id: id,
            full_name: format!("Teacher {id}"),
            nickname: None,
            email: None,
        }
    }

    fn entry(group_id: i64, teacher_id: i64, criteria_id: i64, score: &str) -> GradeEntry {
        GradeEntry {
            group_id,
            teacher_id,
            criteria_id,
            score: score.to_string(),
        }
    }

    fn submitted() -> GraderStatus {
        let mut s = GraderStatus::draft();
        s.submit(Utc.timestamp_opt(1_000, 0).unwrap());
        s
    }

    #[test]
    fn test_progress_shows_draft_grades() {
        let criteria = vec![criterion(1, 1.0)];
        let groups = vec![group(10), group(11)];
        let graders = vec![teacher(100), teacher(101)];
        let entries = vec![
            entry(10, 100, 1, "A"),
            entry(11, 100, 1, ""),
            entry(10, 101, 1, "C"),
        ];
        let comments = vec![GraderComment {
            group_id: 10,
            teacher_id: 101,
            teacher_name: "Teacher 101".to_string(),
            comment: "Solid work".to_string(),
        }];
        let mut statuses = HashMap::new();
        statuses.insert(100, submitted());
        statuses.insert(101, GraderStatus::draft());
        let scale = GradeScale::standard();

        let report = build_progress(&ProgressInput {
            activity_id: 1,
            criteria: &criteria,
            groups: &groups,
            graders: &graders,
            entries: &entries,
            comments: &comments,
            statuses: &statuses,
            scale: &scale,
        });

        // 评分人 100 只有小组 10 有非空评分
        assert_eq!(report.graders[0].graded_group_count, 1);
        assert_eq!(report.graders[0].total_group_count, 2);
        assert_eq!(report.graders[0].completion, 0.5);
        assert_eq!(report.graders[0].status, SubmissionState::Submitted);
        assert_eq!(report.graders[1].status, SubmissionState::Draft);

        // draft 评分人的评分也会出现在进度视图中
        let g10 = &report.groups[0];
        assert_eq!(g10.grader_grades[1].scores[0].score.as_deref(), Some("C"));
        assert_eq!(g10.grader_grades[1].comment.as_deref(), Some("Solid work"));
        assert_eq!(g10.average_gpa, Some(3.0));
        assert_eq!(g10.average_grade.as_deref(), Some("B"));

        // 空评分显示为 None，小组无有效评分时无平均值
        let g11 = &report.groups[1];
        assert_eq!(g11.grader_grades[0].scores[0].score, None);
        assert_eq!(g11.average_gpa, None);
        assert_eq!(g11.average_grade, None);

        assert_eq!(report.summary.total_groups, 2);
        assert_eq!(report.summary.total_graders, 2);
        assert_eq!(report.summary.submitted_count, 1);
        assert_eq!(report.summary.draft_count, 1);
        assert_eq!(report.grading_scale.len(), 8);
    }

    #[test]
    fn test_progress_average_is_weighted() {
        let criteria = vec![criterion(1, 1.0), criterion(2, 3.0)];
        let groups = vec![group(10)];
        let graders = vec![teacher(100)];
        let entries = vec![entry(10, 100, 1, "A"), entry(10, 100, 2, "C")];
        let statuses = HashMap::new();
        let scale = GradeScale::standard();

        let report = build_progress(&ProgressInput {
            activity_id: 1,
            criteria: &criteria,
            groups: &groups,
            graders: &graders,
            entries: &entries,
            comments: &[],
            statuses: &statuses,
            scale: &scale,
        });

        // (4 * 1 + 2 * 3) / 4 = 2.5
        assert_eq!(report.groups[0].average_gpa, Some(2.5));
        assert_eq!(report.groups[0].average_grade.as_deref(), Some("C+"));
        // 没有状态记录的评分人按 draft 统计
        assert_eq!(report.summary.draft_count, 1);
    }

    #[test]
    fn test_progress_without_groups() {
        let graders = vec![teacher(100)];
        let statuses = HashMap::new();
        let scale = GradeScale::standard();

        let report = build_progress(&ProgressInput {
            activity_id: 1,
            criteria: &[],
            groups: &[],
            graders: &graders,
            entries: &[],
            comments: &[],
            statuses: &statuses,
            scale: &scale,
        });

        assert_eq!(report.graders[0].completion, 0.0);
        assert!(report.groups.is_empty());
    }
}
