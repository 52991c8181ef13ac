use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 小组成员
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct GroupMember {
    pub student_id: String,
    pub full_name: String,
    pub nickname: Option<String>,
}

// 学生小组
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct Group {
    pub id: i64,
    pub activity_id: i64,
    pub group_name: String,
    pub description: Option<String>,
    pub created_by_student_id: String,
    pub members: Vec<GroupMember>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    pub fn has_member(&self, student_id: &str) -> bool {
        self.members.iter().any(|m| m.student_id == student_id)
    }
}

/// 已在某活动中分组的学生（成员校验用）
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedStudent {
    pub student_id: String,
    pub full_name: String,
    pub group_id: i64,
}
