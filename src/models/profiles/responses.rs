use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 教师摘要（评分人选择、活动评分人列表）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct TeacherSummary {
    pub teacher_id: i64,
    pub full_name: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
}

// 学生摘要（可选组员列表）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct StudentSummary {
    pub student_id: String,
    pub full_name: String,
    pub nickname: Option<String>,
    pub year_level: i32,
}
