//! 字母等级与绩点互转
//!
//! `score_of` 把字母等级换算为绩点（无法识别的输入视为未评分），
//! `grade_of` 按阈值把绩点换算回字母等级。两者都是纯函数。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 字母等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub enum LetterGrade {
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "F")]
    F,
}

impl LetterGrade {
    /// 按绩点从高到低排列
    pub const ALL: [LetterGrade; 8] = [
        LetterGrade::A,
        LetterGrade::BPlus,
        LetterGrade::B,
        LetterGrade::CPlus,
        LetterGrade::C,
        LetterGrade::DPlus,
        LetterGrade::D,
        LetterGrade::F,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::A => "A",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::DPlus => "D+",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }

    /// 固定等级表中的绩点
    pub fn points(&self) -> f64 {
        match self {
            LetterGrade::A => 4.00,
            LetterGrade::BPlus => 3.50,
            LetterGrade::B => 3.00,
            LetterGrade::CPlus => 2.50,
            LetterGrade::C => 2.00,
            LetterGrade::DPlus => 1.50,
            LetterGrade::D => 1.00,
            LetterGrade::F => 0.00,
        }
    }
}

impl std::fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LetterGrade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        LetterGrade::ALL
            .into_iter()
            .find(|g| g.as_str() == normalized)
            .ok_or_else(|| format!("Unknown letter grade: '{s}'"))
    }
}

/// 字母等级 → 绩点
///
/// 大小写不敏感并忽略首尾空白；空串或未知等级返回 `None`（未评分，不是 0 分）。
pub fn score_of(letter: &str) -> Option<f64> {
    letter.parse::<LetterGrade>().ok().map(|g| g.points())
}

/// 绩点 → 字母等级（阈值规则，边界值归入较高等级）
///
/// NaN 视为 F。
pub fn grade_of(gpa: f64) -> LetterGrade {
    if gpa >= 3.75 {
        LetterGrade::A
    } else if gpa >= 3.25 {
        LetterGrade::BPlus
    } else if gpa >= 2.75 {
        LetterGrade::B
    } else if gpa >= 2.25 {
        LetterGrade::CPlus
    } else if gpa >= 1.75 {
        LetterGrade::C
    } else if gpa >= 1.25 {
        LetterGrade::DPlus
    } else if gpa >= 0.50 {
        LetterGrade::D
    } else {
        LetterGrade::F
    }
}

/// 等级表中的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct ScaleEntry {
    pub grade: String,
    pub gpa: f64,
}

/// 等级表，始终按绩点降序保存
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradeScale {
    entries: Vec<ScaleEntry>,
}

impl GradeScale {
    /// 内置的固定等级表
    pub fn standard() -> Self {
        Self {
            entries: LetterGrade::ALL
                .into_iter()
                .map(|g| ScaleEntry {
                    grade: g.as_str().to_string(),
                    gpa: g.points(),
                })
                .collect(),
        }
    }

    /// 由数据库读取的行构建，按绩点降序排序（稳定排序，保留同分行的原始顺序）
    pub fn from_entries(mut entries: Vec<ScaleEntry>) -> Self {
        entries.sort_by(|a, b| b.gpa.total_cmp(&a.gpa));
        Self { entries }
    }

    pub fn entries(&self) -> &[ScaleEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 最接近给定绩点的等级（诊断用，与 `grade_of` 的阈值规则不同）
    ///
    /// 差值相同时取降序遍历中先出现的一行。
    pub fn nearest(&self, gpa: f64) -> Option<&ScaleEntry> {
        let mut iter = self.entries.iter();
        let mut best = iter.next()?;
        let mut best_diff = (gpa - best.gpa).abs();
        for entry in iter {
            let diff = (gpa - entry.gpa).abs();
            if diff < best_diff {
                best = entry;
                best_diff = diff;
            }
        }
        Some(best)
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_of_table() {
        assert_eq!(score_of("A"), Some(4.0));
        assert_eq!(score_of("B+"), Some(3.5));
        assert_eq!(score_of("B"), Some(3.0));
        assert_eq!(score_of("C+"), Some(2.5));
        assert_eq!(score_of("C"), Some(2.0));
        assert_eq!(score_of("D+"), Some(1.5));
        assert_eq!(score_of("D"), Some(1.0));
        assert_eq!(score_of("F"), Some(0.0));
    }

    #[test]
    fn test_score_of_normalizes_input() {
        assert_eq!(score_of(" b+ "), Some(3.5));
        assert_eq!(score_of("a"), Some(4.0));
        assert_eq!(score_of("\tc\n"), Some(2.0));
    }

    #[test]
    fn test_score_of_unscored() {
        assert_eq!(score_of(""), None);
        assert_eq!(score_of("   "), None);
        assert_eq!(score_of("garbage"), None);
        assert_eq!(score_of("A+"), None);
        assert_eq!(score_of("E"), None);
    }

    #[test]
    fn test_grade_of_boundaries() {
        assert_eq!(grade_of(4.0), LetterGrade::A);
        assert_eq!(grade_of(3.75), LetterGrade::A);
        assert_eq!(grade_of(3.74999), LetterGrade::BPlus);
        assert_eq!(grade_of(3.25), LetterGrade::BPlus);
        assert_eq!(grade_of(2.75), LetterGrade::B);
        assert_eq!(grade_of(2.67), LetterGrade::CPlus);
        assert_eq!(grade_of(2.25), LetterGrade::CPlus);
        assert_eq!(grade_of(1.75), LetterGrade::C);
        assert_eq!(grade_of(1.25), LetterGrade::DPlus);
        assert_eq!(grade_of(0.5), LetterGrade::D);
        assert_eq!(grade_of(0.49999), LetterGrade::F);
        assert_eq!(grade_of(0.0), LetterGrade::F);
    }

    #[test]
    fn test_grade_of_is_total() {
        assert_eq!(grade_of(f64::NAN), LetterGrade::F);
        assert_eq!(grade_of(-1.0), LetterGrade::F);
        assert_eq!(grade_of(f64::INFINITY), LetterGrade::A);
        assert_eq!(grade_of(f64::NEG_INFINITY), LetterGrade::F);
    }

    #[test]
    fn test_letter_grade_serde() {
        assert_eq!(serde_json::to_string(&LetterGrade::BPlus).unwrap(), "\"B+\"");
        let parsed: LetterGrade = serde_json::from_str("\"D+\"").unwrap();
        assert_eq!(parsed, LetterGrade::DPlus);
    }

    #[test]
    fn test_standard_scale_is_descending() {
        let scale = GradeScale::standard();
        let gpas: Vec<f64> = scale.entries().iter().map(|e| e.gpa).collect();
        assert_eq!(gpas, vec![4.0, 3.5, 3.0, 2.5, 2.0, 1.5, 1.0, 0.0]);
    }

    #[test]
    fn test_from_entries_sorts() {
        let scale = GradeScale::from_entries(vec![
            ScaleEntry {
                grade: "F".into(),
                gpa: 0.0,
            },
            ScaleEntry {
                grade: "A".into(),
                gpa: 4.0,
            },
            ScaleEntry {
                grade: "C".into(),
                gpa: 2.0,
            },
        ]);
        let grades: Vec<&str> = scale.entries().iter().map(|e| e.grade.as_str()).collect();
        assert_eq!(grades, vec!["A", "C", "F"]);
    }

    #[test]
    fn test_nearest_picks_closest() {
        let scale = GradeScale::standard();
        assert_eq!(scale.nearest(3.9).map(|e| e.grade.as_str()), Some("A"));
        assert_eq!(scale.nearest(2.6).map(|e| e.grade.as_str()), Some("C+"));
        assert_eq!(scale.nearest(0.2).map(|e| e.grade.as_str()), Some("F"));
    }

    #[test]
    fn test_nearest_ties_go_to_first_in_descending_order() {
        let scale = GradeScale::standard();
        // 3.25 与 B+ (3.5) 和 B (3.0) 等距
        assert_eq!(scale.nearest(3.25).map(|e| e.grade.as_str()), Some("B+"));
        assert_eq!(scale.nearest(0.5).map(|e| e.grade.as_str()), Some("D"));
    }

    #[test]
    fn test_nearest_follows_stored_scale() {
        // 最近值规则只看等级表中的行，阈值规则始终使用固定阈值
        let scale = GradeScale::from_entries(vec![
            ScaleEntry {
                grade: "Pass".into(),
                gpa: 3.0,
            },
            ScaleEntry {
                grade: "Fail".into(),
                gpa: 0.0,
            },
        ]);
        assert_eq!(scale.nearest(2.0).map(|e| e.grade.as_str()), Some("Pass"));
        assert_eq!(scale.nearest(1.5).map(|e| e.grade.as_str()), Some("Pass"));
        assert_eq!(scale.nearest(1.4).map(|e| e.grade.as_str()), Some("Fail"));
        assert_eq!(grade_of(2.0), LetterGrade::C);
    }

    #[test]
    fn test_nearest_on_empty_scale() {
        let scale = GradeScale::from_entries(vec![]);
        assert!(scale.is_empty());
        assert!(scale.nearest(2.0).is_none());
    }
}
