use serde::Deserialize;
use ts_rs::TS;

// 单个评分输入
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeInput {
    pub group_id: i64,
    pub criteria_id: i64,
    pub score: String,
}

// 批量保存评分请求
//
// comment 写入 group_id 指定的小组，未指定时写入第一条评分所属的小组
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct SaveGradesRequest {
    #[serde(default)]
    pub grades: Vec<GradeInput>,
    pub group_id: Option<i64>,
    pub comment: Option<String>,
}

impl SaveGradesRequest {
    /// 评语写入的目标小组
    pub fn comment_target(&self) -> Option<i64> {
        self.group_id
            .or_else(|| self.grades.first().map(|g| g.group_id))
    }
}
