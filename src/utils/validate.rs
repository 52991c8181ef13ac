use crate::grading::LetterGrade;
use crate::models::activities::requests::CreateActivityRequest;

const MAX_TITLE_LENGTH: usize = 200;
const MAX_GROUP_NAME_LENGTH: usize = 100;

pub fn validate_create_activity(req: &CreateActivityRequest) -> Result<(), String> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err("Activity title is required".to_string());
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(format!(
            "Activity title must not exceed {MAX_TITLE_LENGTH} characters"
        ));
    }
    if req.end_date < req.start_date {
        return Err("End date must not be earlier than start date".to_string());
    }

    for (index, criterion) in req.criteria.iter().enumerate() {
        if criterion.name.trim().is_empty() {
            return Err(format!("Criterion #{} name is required", index + 1));
        }
        // 权重是乘数而非百分比，只要求为正数
        if let Some(weight) = criterion.weight
            && !(weight.is_finite() && weight > 0.0)
        {
            return Err(format!(
                "Criterion '{}' weight must be a positive number",
                criterion.name.trim()
            ));
        }
        if let Some(max_score) = criterion.max_score
            && !(max_score.is_finite() && max_score >= 0.0)
        {
            return Err(format!(
                "Criterion '{}' max score must not be negative",
                criterion.name.trim()
            ));
        }
    }

    if let Some(ref levels) = req.target_year_levels
        && let Some(level) = levels.iter().find(|l| **l <= 0)
    {
        return Err(format!("Invalid target year level: {level}"));
    }

    Ok(())
}

/// 校验小组名称与成员列表（创建与更新共用）
pub fn validate_group_fields(group_name: &str, members: &[String]) -> Result<(), String> {
    let name = group_name.trim();
    if name.is_empty() {
        return Err("Group name is required".to_string());
    }
    if name.chars().count() > MAX_GROUP_NAME_LENGTH {
        return Err(format!(
            "Group name must not exceed {MAX_GROUP_NAME_LENGTH} characters"
        ));
    }
    if members.iter().all(|m| m.trim().is_empty()) {
        return Err("At least one group member is required".to_string());
    }
    Ok(())
}

/// 规范化评分输入：空白表示清除评分，其余必须是等级表中的字母
pub fn normalize_grade_letter(score: &str) -> Result<String, String> {
    let trimmed = score.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    trimmed
        .parse::<LetterGrade>()
        .map(|g| g.as_str().to_string())
        .map_err(|_| format!("Invalid letter grade: {trimmed}"))
}
