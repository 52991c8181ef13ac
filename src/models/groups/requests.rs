use serde::Deserialize;
use ts_rs::TS;

// 创建小组请求，创建者自动加入成员列表
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct CreateGroupRequest {
    pub activity_id: i64,
    pub group_name: String,
    pub description: Option<String>,
    pub members: Vec<String>,
}

// 更新小组请求，成员列表整体替换
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct UpdateGroupRequest {
    pub group_name: String,
    pub description: Option<String>,
    pub members: Vec<String>,
}

// 可选组员查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct AvailableStudentsQuery {
    pub activity_id: i64,
}
