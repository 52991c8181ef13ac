use super::SeaOrmStorage;
use crate::config::DatabaseConfig;
use crate::entity::prelude::*;
use crate::errors::GamsError;
use crate::grading::{GraderStatus, LetterGrade, SubmissionState};
use crate::models::activities::requests::{
    ActivityListQuery, CreateActivityRequest, CriterionInput,
};
use crate::models::grades::entities::GradeFilter;
use crate::models::groups::requests::{CreateGroupRequest, UpdateGroupRequest};
use crate::models::profiles::entities::{AccountStatus, Profile};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};

pub(crate) async fn storage() -> SeaOrmStorage {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    };
    SeaOrmStorage::connect(&config.url, &config).await.unwrap()
}

pub(crate) async fn seed_user(
    s: &SeaOrmStorage,
    username: &str,
    role: &str,
    status: &str,
) -> i64 {
    let now = Utc::now().timestamp();
    UserActiveModel {
        username: Set(username.to_string()),
        role: Set(role.to_string()),
        status: Set(status.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&s.db)
    .await
    .unwrap()
    .id
}

pub(crate) async fn seed_teacher(s: &SeaOrmStorage, username: &str, full_name: &str) -> i64 {
    let user_id = seed_user(s, username, "teacher", "active").await;
    TeacherActiveModel {
        user_id: Set(user_id),
        full_name: Set(full_name.to_string()),
        nickname: Set(None),
        email: Set(Some(format!("{username}@school.test"))),
        status: Set("active".to_string()),
        created_at: Set(Utc::now().timestamp()),
        ..Default::default()
    }
    .insert(&s.db)
    .await
    .unwrap()
    .teacher_id
}

pub(crate) async fn seed_student(
    s: &SeaOrmStorage,
    student_id: &str,
    full_name: &str,
    year_level: i32,
) -> i64 {
    let user_id = seed_user(s, student_id, "student", "active").await;
    StudentActiveModel {
        student_id: Set(student_id.to_string()),
        user_id: Set(user_id),
        full_name: Set(full_name.to_string()),
        nickname: Set(None),
        year_level: Set(year_level),
        status: Set("active".to_string()),
        created_at: Set(Utc::now().timestamp()),
    }
    .insert(&s.db)
    .await
    .unwrap();
    user_id
}

pub(crate) fn activity_request(
    title: &str,
    grader_ids: Vec<i64>,
) -> CreateActivityRequest {
    CreateActivityRequest {
        title: title.to_string(),
        description: None,
        start_date: Utc::now(),
        end_date: Utc::now(),
        criteria: vec![
            CriterionInput {
                name: "Design".to_string(),
                max_score: Some(10.0),
                weight: Some(2.0),
            },
            CriterionInput {
                name: "Delivery".to_string(),
                max_score: None,
                weight: None,
            },
        ],
        grader_ids,
        target_year_levels: None,
    }
}

pub(crate) fn group_request(
    activity_id: i64,
    name: &str,
    members: &[&str],
) -> CreateGroupRequest {
    CreateGroupRequest {
        activity_id,
        group_name: name.to_string(),
        description: None,
        members: members.iter().map(|m| m.to_string()).collect(),
    }
}

fn submitted() -> GraderStatus {
    let mut status = GraderStatus::draft();
    status.submit(Utc::now());
    status
}

#[tokio::test]
async fn test_grading_scale_is_seeded() {
    let s = storage().await;

    let scale = s.get_grade_scale_impl().await.unwrap();

    assert_eq!(scale.entries().len(), 8);
    assert_eq!(scale.entries()[0].grade, "A");
    assert_eq!(scale.entries()[0].gpa, 4.0);
    assert_eq!(scale.entries()[7].grade, "F");
}

#[tokio::test]
async fn test_profile_by_role() {
    let s = storage().await;
    let student_user = seed_student(&s, "S001", "Alice Smith", 2).await;
    let teacher_id = seed_teacher(&s, "grey", "Dr. Grey").await;
    let disabled_user = seed_user(&s, "ghost", "student", "inactive").await;
    StudentActiveModel {
        student_id: Set("S999".to_string()),
        user_id: Set(disabled_user),
        full_name: Set("Ghost".to_string()),
        nickname: Set(None),
        year_level: Set(1),
        status: Set("active".to_string()),
        created_at: Set(0),
    }
    .insert(&s.db)
    .await
    .unwrap();

    let profile = s.get_profile_by_user_id_impl(student_user).await.unwrap();
    match profile {
        Some(Profile::Student(p)) => {
            assert_eq!(p.student_id, "S001");
            assert_eq!(p.year_level, 2);
            assert_eq!(p.status, AccountStatus::Active);
        }
        other => panic!("unexpected profile: {other:?}"),
    }

    let teachers = s.list_active_teachers_impl().await.unwrap();
    assert_eq!(teachers.len(), 1);
    assert_eq!(teachers[0].teacher_id, teacher_id);

    // 登录账号停用时资料视为停用
    let disabled = s
        .get_profile_by_user_id_impl(disabled_user)
        .await
        .unwrap()
        .unwrap();
    assert!(!disabled.is_active());

    assert!(s.get_profile_by_user_id_impl(9999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_activity_initializes_graders() {
    let s = storage().await;
    let creator = seed_teacher(&s, "grey", "Dr. Grey").await;
    let other = seed_teacher(&s, "white", "Dr. White").await;
    let outsider = seed_teacher(&s, "black", "Dr. Black").await;

    let detail = s
        .create_activity_impl(creator, activity_request("Capstone", vec![other, creator, other]))
        .await
        .unwrap();

    assert_eq!(detail.creator_name, "Dr. Grey");
    assert_eq!(detail.activity.target_year_levels, vec![1, 2, 3, 4]);
    assert_eq!(detail.criteria.len(), 2);
    assert_eq!(detail.criteria[0].weight, 2.0);
    assert_eq!(detail.criteria[1].weight, 1.0);
    assert_eq!(detail.criteria[1].max_score, 0.0);

    let grader_ids: Vec<i64> = detail.graders.iter().map(|g| g.teacher_id).collect();
    assert_eq!(grader_ids, vec![creator, other]);

    let statuses = s
        .get_submission_statuses_impl(detail.activity.id)
        .await
        .unwrap();
    assert_eq!(statuses.len(), 2);
    assert!(
        statuses
            .values()
            .all(|st| st.status == SubmissionState::Draft && st.submitted_at.is_none())
    );

    assert!(s.is_activity_grader_impl(detail.activity.id, creator).await.unwrap());
    assert!(s.is_activity_grader_impl(detail.activity.id, other).await.unwrap());
    assert!(!s.is_activity_grader_impl(detail.activity.id, outsider).await.unwrap());
    assert!(!s.is_activity_grader_impl(9999, creator).await.unwrap());
}

#[tokio::test]
async fn test_list_teacher_activities() {
    let s = storage().await;
    let grey = seed_teacher(&s, "grey", "Dr. Grey").await;
    let white = seed_teacher(&s, "white", "Dr. White").await;

    s.create_activity_impl(grey, activity_request("Capstone", vec![]))
        .await
        .unwrap();
    s.create_activity_impl(white, activity_request("Robotics 100%", vec![grey]))
        .await
        .unwrap();
    s.create_activity_impl(white, activity_request("Private", vec![]))
        .await
        .unwrap();

    let page = s
        .list_teacher_activities_impl(ActivityListQuery {
            page: 1,
            size: 10,
            teacher_id: grey,
            search: None,
        })
        .await
        .unwrap();
    assert_eq!(page.pagination.total, 2);
    assert!(page.items.iter().all(|i| i.criteria_count == 2));
    let own = page.items.iter().find(|i| i.is_creator).unwrap();
    assert_eq!(own.activity.title, "Capstone");
    let assigned = page.items.iter().find(|i| !i.is_creator).unwrap();
    assert_eq!(assigned.creator_name, "Dr. White");

    // % 按字面匹配
    let searched = s
        .list_teacher_activities_impl(ActivityListQuery {
            page: 1,
            size: 10,
            teacher_id: grey,
            search: Some("100%".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(searched.items.len(), 1);
    assert_eq!(searched.items[0].activity.title, "Robotics 100%");
}

#[tokio::test]
async fn test_upsert_grade_overwrites_cell() {
    let s = storage().await;
    let teacher = seed_teacher(&s, "grey", "Dr. Grey").await;
    seed_student(&s, "S001", "Alice Smith", 1).await;
    let detail = s
        .create_activity_impl(teacher, activity_request("Capstone", vec![]))
        .await
        .unwrap();
    let activity_id = detail.activity.id;
    let criterion = detail.criteria[0].id;
    let group = s
        .create_group_impl("S001", group_request(activity_id, "Team", &["S001"]))
        .await
        .unwrap();

    s.upsert_grade_entry_impl(activity_id, group.id, teacher, criterion, "B")
        .await
        .unwrap();
    s.upsert_grade_entry_impl(activity_id, group.id, teacher, criterion, "A")
        .await
        .unwrap();
    s.upsert_comment_impl(activity_id, group.id, teacher, "first")
        .await
        .unwrap();
    s.upsert_comment_impl(activity_id, group.id, teacher, "second")
        .await
        .unwrap();

    let entries = s
        .get_grade_entries_impl(activity_id, GradeFilter::by_grader(teacher))
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].score, LetterGrade::A.as_str());

    let comments = s
        .get_comments_impl(activity_id, GradeFilter::by_grader(teacher))
        .await
        .unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].comment, "second");
    assert_eq!(comments[0].teacher_name, "Dr. Grey");
}

#[tokio::test]
async fn test_only_submitted_grades_are_visible() {
    let s = storage().await;
    let grey = seed_teacher(&s, "grey", "Dr. Grey").await;
    let white = seed_teacher(&s, "white", "Dr. White").await;
    seed_student(&s, "S001", "Alice Smith", 1).await;
    let detail = s
        .create_activity_impl(grey, activity_request("Capstone", vec![white]))
        .await
        .unwrap();
    let activity_id = detail.activity.id;
    let criterion = detail.criteria[0].id;
    let group = s
        .create_group_impl("S001", group_request(activity_id, "Team", &["S001"]))
        .await
        .unwrap();

    for teacher in [grey, white] {
        s.upsert_grade_entry_impl(activity_id, group.id, teacher, criterion, "B")
            .await
            .unwrap();
        s.upsert_comment_impl(activity_id, group.id, teacher, "ok")
            .await
            .unwrap();
    }

    // 没有评分人提交时学生端看不到任何数据
    let none = s
        .get_grade_entries_impl(activity_id, GradeFilter::visible())
        .await
        .unwrap();
    assert!(none.is_empty());

    s.set_submission_status_impl(activity_id, white, &submitted())
        .await
        .unwrap();

    let visible = s
        .get_grade_entries_impl(activity_id, GradeFilter::visible_for_group(group.id))
        .await
        .unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].teacher_id, white);

    let comments = s
        .get_comments_impl(activity_id, GradeFilter::visible())
        .await
        .unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].teacher_name, "Dr. White");

    // 教师端不受提交状态限制
    let all = s
        .get_grade_entries_impl(activity_id, GradeFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let status = s
        .get_submission_status_impl(activity_id, white)
        .await
        .unwrap()
        .unwrap();
    assert!(status.is_submitted());
    assert!(status.submitted_at.is_some());
}

#[tokio::test]
async fn test_group_membership_replacement() {
    let s = storage().await;
    let teacher = seed_teacher(&s, "grey", "Dr. Grey").await;
    seed_student(&s, "S001", "Alice Smith", 1).await;
    seed_student(&s, "S002", "Bob Jones", 1).await;
    seed_student(&s, "S003", "Cara Lee", 1).await;
    let activity_id = s
        .create_activity_impl(teacher, activity_request("Capstone", vec![]))
        .await
        .unwrap()
        .activity
        .id;

    let group = s
        .create_group_impl("S001", group_request(activity_id, "Team", &["S002", "S001"]))
        .await
        .unwrap();
    assert_eq!(group.members.len(), 2);
    assert_eq!(group.members[0].full_name, "Bob Jones");

    let grouped = s
        .find_grouped_students_impl(activity_id, &["S002".to_string(), "S003".to_string()])
        .await
        .unwrap();
    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped[0].full_name, "Bob Jones");
    assert_eq!(grouped[0].group_id, group.id);

    s.replace_group_membership_impl(group.id, &["S003".to_string(), "S001".to_string()])
        .await
        .unwrap();
    let reloaded = s.get_group_by_id_impl(group.id).await.unwrap().unwrap();
    let ids: Vec<&str> = reloaded
        .members
        .iter()
        .map(|m| m.student_id.as_str())
        .collect();
    assert_eq!(ids, vec!["S003", "S001"]);

    let updated = s
        .update_group_impl(
            group.id,
            UpdateGroupRequest {
                group_name: "Renamed".to_string(),
                description: Some("desc".to_string()),
                members: vec!["S001".to_string()],
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.group_name, "Renamed");
    assert_eq!(updated.members.len(), 1);

    let mine = s.find_student_group_impl(activity_id, "S001").await.unwrap();
    assert_eq!(mine.map(|g| g.id), Some(group.id));
    assert!(
        s.find_student_group_impl(activity_id, "S002")
            .await
            .unwrap()
            .is_none()
    );

    let missing = s
        .update_group_impl(
            9999,
            UpdateGroupRequest {
                group_name: "x".to_string(),
                description: None,
                members: vec![],
            },
        )
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_group_writes_recheck_membership() {
    let s = storage().await;
    let teacher = seed_teacher(&s, "grey", "Dr. Grey").await;
    seed_student(&s, "S001", "Alice Smith", 1).await;
    seed_student(&s, "S002", "Bob Jones", 1).await;
    seed_student(&s, "S003", "Cara Lee", 1).await;
    let activity_id = s
        .create_activity_impl(teacher, activity_request("Capstone", vec![]))
        .await
        .unwrap()
        .activity
        .id;

    s.create_group_impl("S001", group_request(activity_id, "Alpha", &["S001"]))
        .await
        .unwrap();

    // 绕过服务层校验直接写入，同样被拒绝
    let err = s
        .create_group_impl("S002", group_request(activity_id, "Beta", &["S001", "S002"]))
        .await
        .unwrap_err();
    assert!(matches!(err, GamsError::Conflict(_)));
    assert!(err.message().contains("Alice Smith"));

    let beta = s
        .create_group_impl("S002", group_request(activity_id, "Beta", &["S002"]))
        .await
        .unwrap();
    let err = s
        .update_group_impl(
            beta.id,
            UpdateGroupRequest {
                group_name: "Beta".to_string(),
                description: None,
                members: vec!["S002".to_string(), "S001".to_string()],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, GamsError::Conflict(_)));

    // 保留本组现有成员不算冲突
    let updated = s
        .update_group_impl(
            beta.id,
            UpdateGroupRequest {
                group_name: "Beta".to_string(),
                description: None,
                members: vec!["S002".to_string(), "S003".to_string()],
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.members.len(), 2);

    let alice = s
        .find_grouped_students_impl(activity_id, &["S001".to_string()])
        .await
        .unwrap();
    assert_eq!(alice.len(), 1);
}

#[tokio::test]
async fn test_student_catalogue_and_available_students() {
    let s = storage().await;
    let teacher = seed_teacher(&s, "grey", "Dr. Grey").await;
    seed_student(&s, "S001", "Alice Smith", 2).await;
    seed_student(&s, "S002", "Bob Jones", 2).await;
    seed_student(&s, "S003", "Cara Lee", 2).await;
    seed_student(&s, "S004", "Dan Wu", 3).await;

    let mut req = activity_request("Year two only", vec![]);
    req.target_year_levels = Some(vec![2]);
    let first = s.create_activity_impl(teacher, req).await.unwrap().activity;
    let second = s
        .create_activity_impl(teacher, activity_request("Everyone", vec![]))
        .await
        .unwrap()
        .activity;

    s.create_group_impl("S001", group_request(first.id, "Team", &["S002", "S001"]))
        .await
        .unwrap();

    let items = s.list_activities_for_student_impl("S001", 2).await.unwrap();
    assert_eq!(items.len(), 2);
    // 未分组的活动在前
    assert_eq!(items[0].activity.id, second.id);
    assert_eq!(items[0].my_group_id, None);
    assert!(items[1].my_group_id.is_some());
    assert_eq!(items[1].group_count, 1);

    let year_three = s.list_activities_for_student_impl("S004", 3).await.unwrap();
    assert_eq!(year_three.len(), 1);
    assert_eq!(year_three[0].activity.id, second.id);

    let available = s
        .list_available_students_impl(first.id, "S003", &first.target_year_levels)
        .await
        .unwrap();
    assert!(available.is_empty());

    let available = s
        .list_available_students_impl(second.id, "S001", &second.target_year_levels)
        .await
        .unwrap();
    let ids: Vec<&str> = available.iter().map(|st| st.student_id.as_str()).collect();
    assert_eq!(ids, vec!["S002", "S003", "S004"]);

    let groups = s.list_student_groups_impl("S002").await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].activity_id, first.id);
}

#[tokio::test]
async fn test_delete_group_removes_grades() {
    let s = storage().await;
    let teacher = seed_teacher(&s, "grey", "Dr. Grey").await;
    seed_student(&s, "S001", "Alice Smith", 1).await;
    let detail = s
        .create_activity_impl(teacher, activity_request("Capstone", vec![]))
        .await
        .unwrap();
    let activity_id = detail.activity.id;
    let group = s
        .create_group_impl("S001", group_request(activity_id, "Team", &["S001"]))
        .await
        .unwrap();
    s.upsert_grade_entry_impl(activity_id, group.id, teacher, detail.criteria[0].id, "A")
        .await
        .unwrap();

    assert!(s.delete_group_impl(group.id).await.unwrap());

    assert!(s.get_group_by_id_impl(group.id).await.unwrap().is_none());
    assert!(
        s.get_grade_entries_impl(activity_id, GradeFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        s.find_student_group_impl(activity_id, "S001")
            .await
            .unwrap()
            .is_none()
    );
    assert!(!s.delete_group_impl(group.id).await.unwrap());
}

#[tokio::test]
async fn test_delete_activity_cascades() {
    let s = storage().await;
    let teacher = seed_teacher(&s, "grey", "Dr. Grey").await;
    let other = seed_teacher(&s, "white", "Dr. White").await;
    seed_student(&s, "S001", "Alice Smith", 1).await;
    let detail = s
        .create_activity_impl(teacher, activity_request("Capstone", vec![other]))
        .await
        .unwrap();
    let activity_id = detail.activity.id;
    let group = s
        .create_group_impl("S001", group_request(activity_id, "Team", &["S001"]))
        .await
        .unwrap();
    s.upsert_grade_entry_impl(activity_id, group.id, teacher, detail.criteria[0].id, "A")
        .await
        .unwrap();
    s.upsert_comment_impl(activity_id, group.id, teacher, "great")
        .await
        .unwrap();

    assert!(s.delete_activity_impl(activity_id).await.unwrap());

    assert!(s.get_activity_by_id_impl(activity_id).await.unwrap().is_none());
    assert!(s.get_group_by_id_impl(group.id).await.unwrap().is_none());
    assert!(s.list_criteria_impl(activity_id).await.unwrap().is_empty());
    assert!(s.list_activity_graders_impl(activity_id).await.unwrap().is_empty());
    assert!(
        s.get_submission_statuses_impl(activity_id)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        s.get_comments_impl(activity_id, GradeFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
    assert!(s.list_student_groups_impl("S001").await.unwrap().is_empty());
    assert!(!s.delete_activity_impl(activity_id).await.unwrap());
}
