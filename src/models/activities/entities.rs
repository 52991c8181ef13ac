use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 默认面向的年级
pub const DEFAULT_TARGET_YEAR_LEVELS: [i32; 4] = [1, 2, 3, 4];

// 评分活动
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct Activity {
    pub id: i64,
    pub created_by_teacher_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub target_year_levels: Vec<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Activity {
    pub fn targets_year_level(&self, year_level: i32) -> bool {
        self.target_year_levels.contains(&year_level)
    }
}

// 评分标准
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct Criterion {
    pub id: i64,
    pub activity_id: i64,
    pub name: String,
    pub max_score: f64, // 仅展示用，不参与绩点计算
    pub weight: f64,
}

/// 数据库中以逗号分隔存储年级列表
pub fn encode_year_levels(levels: &[i32]) -> String {
    levels
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn decode_year_levels(raw: &str) -> Vec<i32> {
    raw.split(',')
        .filter_map(|s| s.trim().parse::<i32>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_levels_codec() {
        assert_eq!(encode_year_levels(&[1, 3, 4]), "1,3,4");
        assert_eq!(decode_year_levels("1, 3,4"), vec![1, 3, 4]);
        assert_eq!(decode_year_levels(""), Vec::<i32>::new());
        assert_eq!(decode_year_levels("2,x,3"), vec![2, 3]);
    }
}
