//! 评分人提交状态
//!
//! 每个 (活动, 评分人) 一条状态：draft → submitted，单向且不可撤回。
//! 只有 submitted 的评分人，其评分和评语才对学生及汇总结果可见。

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub enum SubmissionState {
    #[default]
    Draft,
    Submitted,
}

impl SubmissionState {
    pub const DRAFT: &'static str = "draft";
    pub const SUBMITTED: &'static str = "submitted";

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionState::Draft => Self::DRAFT,
            SubmissionState::Submitted => Self::SUBMITTED,
        }
    }
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SubmissionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::DRAFT => Ok(SubmissionState::Draft),
            Self::SUBMITTED => Ok(SubmissionState::Submitted),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

/// 单个评分人的提交状态
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GraderStatus {
    pub status: SubmissionState,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// `submit` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Submitted,
    AlreadySubmitted,
}

impl GraderStatus {
    pub fn draft() -> Self {
        Self::default()
    }

    pub fn is_submitted(&self) -> bool {
        self.status == SubmissionState::Submitted
    }

    /// draft → submitted，并记录提交时间
    ///
    /// 已提交时为空操作，保留原提交时间。
    pub fn submit(&mut self, now: DateTime<Utc>) -> Transition {
        if self.is_submitted() {
            return Transition::AlreadySubmitted;
        }
        self.status = SubmissionState::Submitted;
        self.submitted_at = Some(now);
        Transition::Submitted
    }
}

/// 已提交的评分人 ID（升序），没有状态记录的评分人视为 draft
pub fn submitted_graders(statuses: &HashMap<i64, GraderStatus>) -> Vec<i64> {
    let mut ids: Vec<i64> = statuses
        .iter()
        .filter(|(_, s)| s.is_submitted())
        .map(|(id, _)| *id)
        .collect();
    ids.sort_unstable();
    ids
}

/// 查询某评分人的状态，缺失时返回 draft
pub fn status_of(statuses: &HashMap<i64, GraderStatus>, teacher_id: i64) -> GraderStatus {
    statuses.get(&teacher_id).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_initial_state_is_draft() {
        let status = GraderStatus::draft();
        assert_eq!(status.status, SubmissionState::Draft);
        assert!(status.submitted_at.is_none());
        assert!(!status.is_submitted());
    }

    #[test]
    fn test_submit_stamps_time() {
        let mut status = GraderStatus::draft();
        assert_eq!(status.submit(at(1_700_000_000)), Transition::Submitted);
        assert!(status.is_submitted());
        assert_eq!(status.submitted_at, Some(at(1_700_000_000)));
    }

    #[test]
    fn test_resubmit_is_noop() {
        let mut status = GraderStatus::draft();
        status.submit(at(100));
        assert_eq!(status.submit(at(200)), Transition::AlreadySubmitted);
        assert!(status.is_submitted());
        assert_eq!(status.submitted_at, Some(at(100)));
    }

    #[test]
    fn test_visibility_gate() {
        let mut statuses = HashMap::new();
        statuses.insert(1, GraderStatus::draft());
        let mut submitted = GraderStatus::draft();
        submitted.submit(at(10));
        statuses.insert(2, submitted);

        assert_eq!(submitted_graders(&statuses), vec![2]);
        assert_eq!(status_of(&statuses, 3), GraderStatus::draft());
    }

    #[test]
    fn test_state_parse() {
        assert_eq!("draft".parse::<SubmissionState>(), Ok(SubmissionState::Draft));
        assert_eq!(
            "submitted".parse::<SubmissionState>(),
            Ok(SubmissionState::Submitted)
        );
        assert!("final".parse::<SubmissionState>().is_err());
        assert_eq!(SubmissionState::Submitted.to_string(), "submitted");
    }
}
