//! 小组成员校验
//!
//! 同一活动中每个学生最多属于一个小组。创建者总是自动加入成员列表。

use crate::errors::GamsError;
use crate::models::groups::entities::GroupedStudent;

/// 违反成员唯一性的情况
#[derive(Debug, Clone, PartialEq)]
pub enum MembershipViolation {
    /// 创建者本人已在该活动的其它小组中
    ActorAlreadyGrouped { full_name: String, group_id: i64 },
    /// 部分成员已在该活动的其它小组中
    MembersAlreadyGrouped { full_names: Vec<String> },
}

impl std::fmt::Display for MembershipViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MembershipViolation::ActorAlreadyGrouped { full_name, .. } => write!(
                f,
                "You are already in a group for this activity ({full_name})"
            ),
            MembershipViolation::MembersAlreadyGrouped { full_names } => write!(
                f,
                "The following students are already in another group: {}",
                full_names.join(", ")
            ),
        }
    }
}

impl From<MembershipViolation> for GamsError {
    fn from(violation: MembershipViolation) -> Self {
        GamsError::conflict(violation.to_string())
    }
}

/// 去重并保持原顺序，创建者不在列表中时追加到末尾；空白 ID 被丢弃
pub fn normalize_members(proposed: &[String], actor: &str) -> Vec<String> {
    let mut members: Vec<String> = Vec::with_capacity(proposed.len() + 1);
    for id in proposed {
        let id = id.trim();
        if !id.is_empty() && !members.iter().any(|m| m == id) {
            members.push(id.to_string());
        }
    }
    if !members.iter().any(|m| m == actor) {
        members.push(actor.to_string());
    }
    members
}

/// 校验成员列表
///
/// `existing` 为这些学生在该活动中已有的分组记录；`current_group`
/// 为正在更新的小组，其中的成员不视为冲突。
pub fn validate_membership(
    actor: &str,
    members: &[String],
    existing: &[GroupedStudent],
    current_group: Option<i64>,
) -> Result<(), MembershipViolation> {
    let in_other_group = |s: &&GroupedStudent| Some(s.group_id) != current_group;

    if let Some(own) = existing
        .iter()
        .filter(in_other_group)
        .find(|s| s.student_id == actor)
    {
        return Err(MembershipViolation::ActorAlreadyGrouped {
            full_name: own.full_name.clone(),
            group_id: own.group_id,
        });
    }

    let mut full_names: Vec<String> = Vec::new();
    for member in members.iter().filter(|m| m.as_str() != actor) {
        if let Some(s) = existing
            .iter()
            .filter(in_other_group)
            .find(|s| &s.student_id == member)
            && !full_names.contains(&s.full_name)
        {
            full_names.push(s.full_name.clone());
        }
    }

    if full_names.is_empty() {
        Ok(())
    } else {
        Err(MembershipViolation::MembersAlreadyGrouped { full_names })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn grouped(student_id: &str, full_name: &str, group_id: i64) -> GroupedStudent {
        GroupedStudent {
            student_id: student_id.to_string(),
            full_name: full_name.to_string(),
            group_id,
        }
    }

    #[test]
    fn test_normalize_appends_actor() {
        assert_eq!(
            normalize_members(&ids(&["S2", "S3"]), "S1"),
            ids(&["S2", "S3", "S1"])
        );
    }

    #[test]
    fn test_normalize_dedups_in_order() {
        assert_eq!(
            normalize_members(&ids(&["S3", "S1", "S3", " ", "S2"]), "S1"),
            ids(&["S3", "S1", "S2"])
        );
    }

    #[test]
    fn test_normalize_empty_list() {
        assert_eq!(normalize_members(&[], "S1"), ids(&["S1"]));
    }

    #[test]
    fn test_member_conflict_names_students() {
        let existing = vec![grouped("S2", "Bob Jones", 5), grouped("S3", "Cara Lee", 6)];
        let members = ids(&["S2", "S3", "S4", "S1"]);

        let err = validate_membership("S1", &members, &existing, None).unwrap_err();

        assert_eq!(
            err,
            MembershipViolation::MembersAlreadyGrouped {
                full_names: vec!["Bob Jones".to_string(), "Cara Lee".to_string()]
            }
        );
        let message = GamsError::from(err).message().to_string();
        assert!(message.contains("Bob Jones"));
        assert!(message.contains("Cara Lee"));
    }

    #[test]
    fn test_actor_already_grouped() {
        let existing = vec![grouped("S1", "Alice Smith", 5)];

        let err = validate_membership("S1", &ids(&["S1"]), &existing, None).unwrap_err();

        assert!(matches!(
            err,
            MembershipViolation::ActorAlreadyGrouped { group_id: 5, .. }
        ));
        assert!(err.to_string().contains("Alice Smith"));
        assert_eq!(GamsError::from(err).code(), "E006");
    }

    #[test]
    fn test_update_ignores_current_group() {
        let existing = vec![grouped("S1", "Alice Smith", 5), grouped("S2", "Bob Jones", 5)];

        let result = validate_membership("S1", &ids(&["S2", "S1"]), &existing, Some(5));

        assert!(result.is_ok());
    }

    #[test]
    fn test_update_rejects_member_of_other_group() {
        let existing = vec![grouped("S1", "Alice Smith", 5), grouped("S3", "Cara Lee", 9)];

        let err =
            validate_membership("S1", &ids(&["S3", "S1"]), &existing, Some(5)).unwrap_err();

        assert_eq!(
            err,
            MembershipViolation::MembersAlreadyGrouped {
                full_names: vec!["Cara Lee".to_string()]
            }
        );
    }

    #[test]
    fn test_no_conflicts() {
        assert!(validate_membership("S1", &ids(&["S2", "S1"]), &[], None).is_ok());
    }
}
