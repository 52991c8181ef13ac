//! 加权汇总
//!
//! 两级平均：同一评分标准下先对各评分人的绩点取算术平均，
//! 再按评分标准权重对各标准平均值取加权平均。未评分的格子直接跳过，
//! 没有任何有效评分的标准同时从分子和分母中剔除。

use serde::Serialize;
use ts_rs::TS;

use super::scale::{LetterGrade, grade_of, score_of};
use crate::models::activities::entities::Criterion;
use crate::models::grades::entities::GradeEntry;

/// 单个评分标准的汇总结果
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct CriterionScore {
    pub criteria_id: i64,
    pub name: String,
    pub weight: f64,
    pub average_score: Option<f64>,
    pub grade: Option<LetterGrade>,
    pub graded_count: i64,
}

/// 小组的汇总结果
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GroupScore {
    pub criteria_scores: Vec<CriterionScore>,
    pub overall_score: Option<f64>,
    pub final_grade: Option<LetterGrade>,
}

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 参与计算的权重，非正数或 NaN 按 1.0 处理
pub fn effective_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        1.0
    }
}

/// 算术平均，空集合返回 `None`
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// 汇总一个小组的成绩
///
/// `entries` 中不属于 `group_id` 或不属于 `criteria` 的评分会被忽略，
/// 调用方负责事先按提交状态过滤。
pub fn aggregate_group(criteria: &[Criterion], entries: &[GradeEntry], group_id: i64) -> GroupScore {
    let mut criteria_scores = Vec::with_capacity(criteria.len());
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    for criterion in criteria {
        let points: Vec<f64> = entries
            .iter()
            .filter(|e| e.group_id == group_id && e.criteria_id == criterion.id)
            .filter_map(|e| score_of(&e.score))
            .collect();

        let average = mean(&points);
        if let Some(avg) = average {
            let weight = effective_weight(criterion.weight);
            weighted_sum += avg * weight;
            weight_total += weight;
        }

        criteria_scores.push(CriterionScore {
            criteria_id: criterion.id,
            name: criterion.name.clone(),
            weight: criterion.weight,
            average_score: average.map(round2),
            // 等级按未舍入的平均值计算
            grade: average.map(grade_of),
            graded_count: points.len() as i64,
        });
    }

    let overall_score = if weight_total > 0.0 {
        Some(round2(weighted_sum / weight_total))
    } else {
        None
    };

    GroupScore {
        criteria_scores,
        overall_score,
        final_grade: overall_score.map(grade_of),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criterion(id: i64, weight: f64) -> Criterion {
        Criterion {
            id,
            activity_id: 1,
            name: format!("criterion-{id}"),
            max_score: 10.0,
            weight,
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

    #[test]
    fn test_weighted_overall() {
        let criteria = vec![criterion(1, 1.0), criterion(2, 2.0)];
        let entries = vec![entry(10, 100, 1, "A"), entry(10, 100, 2, "C")];

        let result = aggregate_group(&criteria, &entries, 10);

        assert_eq!(result.criteria_scores[0].average_score, Some(4.0));
        assert_eq!(result.criteria_scores[1].average_score, Some(2.0));
        assert_eq!(result.overall_score, Some(2.67));
        assert_eq!(result.final_grade, Some(LetterGrade::CPlus));
    }

    #[test]
    fn test_criterion_without_valid_scores_is_excluded() {
        let criteria = vec![criterion(1, 1.0), criterion(2, 5.0)];
        let entries = vec![
            entry(10, 100, 1, "A"),
            entry(10, 100, 2, ""),
            entry(10, 101, 2, "garbage"),
        ];

        let result = aggregate_group(&criteria, &entries, 10);

        assert_eq!(result.overall_score, Some(4.0));
        assert_eq!(result.final_grade, Some(LetterGrade::A));
        assert_eq!(result.criteria_scores[1].average_score, None);
        assert_eq!(result.criteria_scores[1].grade, None);
        assert_eq!(result.criteria_scores[1].graded_count, 0);
    }

    #[test]
    fn test_average_across_graders() {
        let criteria = vec![criterion(1, 1.0)];
        let entries = vec![
            entry(10, 100, 1, "A"),
            entry(10, 101, 1, "B"),
            entry(10, 102, 1, "B+"),
        ];

        let result = aggregate_group(&criteria, &entries, 10);

        assert_eq!(result.criteria_scores[0].average_score, Some(3.5));
        assert_eq!(result.criteria_scores[0].graded_count, 3);
        assert_eq!(result.criteria_scores[0].grade, Some(LetterGrade::BPlus));
    }

    #[test]
    fn test_unscored_does_not_count_as_zero() {
        let criteria = vec![criterion(1, 1.0)];
        let entries = vec![entry(10, 100, 1, "A"), entry(10, 101, 1, "  ")];

        let result = aggregate_group(&criteria, &entries, 10);

        assert_eq!(result.overall_score, Some(4.0));
    }

    #[test]
    fn test_no_grades_produces_no_final_grade() {
        let criteria = vec![criterion(1, 1.0), criterion(2, 1.0)];

        let result = aggregate_group(&criteria, &[], 10);

        assert_eq!(result.overall_score, None);
        assert_eq!(result.final_grade, None);
        assert_eq!(result.criteria_scores.len(), 2);
    }

    #[test]
    fn test_other_groups_are_ignored() {
        let criteria = vec![criterion(1, 1.0)];
        let entries = vec![entry(10, 100, 1, "F"), entry(11, 100, 1, "A")];

        let result = aggregate_group(&criteria, &entries, 11);

        assert_eq!(result.overall_score, Some(4.0));
    }

    #[test]
    fn test_full_precision_until_final_rounding() {
        // 标准 1 平均 (4 + 3.5 + 3.5) / 3 = 3.6667，标准 2 平均 3.0
        // 全精度加权：(3.6667 + 3.0) / 2 = 3.3333 → 3.33
        let criteria = vec![criterion(1, 1.0), criterion(2, 1.0)];
        let entries = vec![
            entry(10, 100, 1, "A"),
            entry(10, 101, 1, "B+"),
            entry(10, 102, 1, "B+"),
            entry(10, 100, 2, "B"),
        ];

        let result = aggregate_group(&criteria, &entries, 10);

        assert_eq!(result.criteria_scores[0].average_score, Some(3.67));
        assert_eq!(result.overall_score, Some(3.33));
        assert_eq!(result.final_grade, Some(LetterGrade::BPlus));
    }

    #[test]
    fn test_criterion_grade_uses_unrounded_average() {
        // 99 个 A 与 101 个 B+：平均 3.7475，显示为 3.75，但等级仍为 B+
        let criteria = vec![criterion(1, 1.0)];
        let entries: Vec<GradeEntry> = (0..200)
            .map(|teacher| entry(10, teacher, 1, if teacher < 99 { "A" } else { "B+" }))
            .collect();

        let score = aggregate_group(&criteria, &entries, 10);

        assert_eq!(score.criteria_scores[0].average_score, Some(3.75));
        assert_eq!(score.criteria_scores[0].grade, Some(LetterGrade::BPlus));
        assert_eq!(score.overall_score, Some(3.75));
        assert_eq!(score.final_grade, Some(LetterGrade::A));
    }

    #[test]
    fn test_invalid_weight_falls_back_to_one() {
        let criteria = vec![criterion(1, 0.0), criterion(2, 1.0)];
        let entries = vec![entry(10, 100, 1, "A"), entry(10, 100, 2, "C")];

        let result = aggregate_group(&criteria, &entries, 10);

        assert_eq!(result.overall_score, Some(3.0));
    }

    #[test]
    fn test_effective_weight() {
        assert_eq!(effective_weight(2.5), 2.5);
        assert_eq!(effective_weight(0.0), 1.0);
        assert_eq!(effective_weight(-3.0), 1.0);
        assert_eq!(effective_weight(f64::NAN), 1.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(2.666666), 2.67);
        assert_eq!(round2(3.0), 3.0);
        assert_eq!(round2(3.333333), 3.33);
    }
}
