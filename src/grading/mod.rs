//! 评分引擎
//!
//! 纯函数实现，不访问存储：
//! - `scale`: 字母等级与绩点互转、等级表
//! - `aggregate`: 两级加权汇总
//! - `submission`: 评分人提交状态机与可见性判断
//! - `progress`: 教师端进度报告
//! - `membership`: 小组成员唯一性校验
//! - `dashboard`: 学生端成绩视图

pub mod aggregate;
pub mod dashboard;
pub mod membership;
pub mod progress;
pub mod scale;
pub mod submission;

pub use aggregate::{CriterionScore, GroupScore, aggregate_group};
pub use scale::{GradeScale, LetterGrade, grade_of, score_of};
pub use submission::{GraderStatus, SubmissionState, Transition};
