use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub enum Role {
    Student, // 学生
    Teacher, // 教师
    Admin,   // 管理员
}

impl Role {
    pub const STUDENT: &'static str = "student";
    pub const TEACHER: &'static str = "teacher";
    pub const ADMIN: &'static str = "admin";

    pub fn student_roles() -> &'static [&'static Role] {
        &[&Self::Student]
    }
    pub fn teacher_roles() -> &'static [&'static Role] {
        &[&Self::Teacher]
    }
    pub fn all_roles() -> &'static [&'static Role] {
        &[&Self::Student, &Self::Teacher, &Self::Admin]
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Student => write!(f, "{}", Role::STUDENT),
            Role::Teacher => write!(f, "{}", Role::TEACHER),
            Role::Admin => write!(f, "{}", Role::ADMIN),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Role::STUDENT => Ok(Role::Student),
            Role::TEACHER => Ok(Role::Teacher),
            Role::ADMIN => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

// 账号状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub enum AccountStatus {
    Active,    // 在读 / 在职
    Inactive,  // 停用
    Graduated, // 已毕业（仅学生）
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::Active => write!(f, "active"),
            AccountStatus::Inactive => write!(f, "inactive"),
            AccountStatus::Graduated => write!(f, "graduated"),
        }
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "inactive" => Ok(AccountStatus::Inactive),
            "graduated" => Ok(AccountStatus::Graduated),
            _ => Err(format!("Invalid account status: {s}")),
        }
    }
}

// 学生资料
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct StudentProfile {
    pub user_id: i64,
    pub student_id: String,
    pub full_name: String,
    pub nickname: Option<String>,
    pub year_level: i32,
    pub status: AccountStatus,
}

// 教师资料
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct TeacherProfile {
    pub user_id: i64,
    pub teacher_id: i64,
    pub full_name: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub status: AccountStatus,
}

// 管理员资料
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct AdminProfile {
    pub user_id: i64,
    pub username: String,
    pub status: AccountStatus,
}

/// 当前登录用户的资料，按角色区分，每种角色只携带自己的字段
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(tag = "role", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub enum Profile {
    Student(StudentProfile),
    Teacher(TeacherProfile),
    Admin(AdminProfile),
}

impl Profile {
    pub fn role(&self) -> Role {
        match self {
            Profile::Student(_) => Role::Student,
            Profile::Teacher(_) => Role::Teacher,
            Profile::Admin(_) => Role::Admin,
        }
    }

    pub fn user_id(&self) -> i64 {
        match self {
            Profile::Student(p) => p.user_id,
            Profile::Teacher(p) => p.user_id,
            Profile::Admin(p) => p.user_id,
        }
    }

    pub fn status(&self) -> AccountStatus {
        match self {
            Profile::Student(p) => p.status,
            Profile::Teacher(p) => p.status,
            Profile::Admin(p) => p.status,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status() == AccountStatus::Active
    }

    pub fn as_student(&self) -> Option<&StudentProfile> {
        match self {
            Profile::Student(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_teacher(&self) -> Option<&TeacherProfile> {
        match self {
            Profile::Teacher(p) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> Profile {
        Profile::Student(StudentProfile {
            user_id: 7,
            student_id: "S001".to_string(),
            full_name: "Alice Smith".to_string(),
            nickname: None,
            year_level: 2,
            status: AccountStatus::Active,
        })
    }

    #[test]
    fn test_profile_is_tagged_by_role() {
        let json = serde_json::to_value(student()).unwrap();
        assert_eq!(json["role"], "student");
        assert_eq!(json["student_id"], "S001");
        assert!(json.get("teacher_id").is_none());

        let back: Profile = serde_json::from_value(json).unwrap();
        assert_eq!(back, student());
    }

    #[test]
    fn test_profile_accessors() {
        let profile = student();
        assert_eq!(profile.role(), Role::Student);
        assert_eq!(profile.user_id(), 7);
        assert!(profile.is_active());
        assert!(profile.as_teacher().is_none());
        assert_eq!(profile.as_student().map(|s| s.year_level), Some(2));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("teacher".parse::<Role>(), Ok(Role::Teacher));
        assert!("user".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
    }
}
