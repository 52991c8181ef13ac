use std::sync::Arc;

use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
use serde_json::Value;

use super::{ActivityService, DashboardService, GradingService, GroupService};
use crate::models::grades::requests::{GradeInput, SaveGradesRequest};
use crate::models::profiles::entities::{AccountStatus, Profile, StudentProfile, TeacherProfile};
use crate::storage::Storage;
use crate::storage::sea_orm_storage::tests::{
    activity_request, group_request, seed_student, seed_teacher, storage,
};

struct Fixture {
    storage: Arc<dyn Storage>,
    creator: i64,
    grader: i64,
    outsider: i64,
}

async fn fixture() -> Fixture {
    let s = storage().await;
    let creator = seed_teacher(&s, "grey", "Dr. Grey").await;
    let grader = seed_teacher(&s, "white", "Dr. White").await;
    let outsider = seed_teacher(&s, "black", "Dr. Black").await;
    seed_student(&s, "S1", "Alice", 4).await;
    seed_student(&s, "S2", "Bob", 4).await;
    seed_student(&s, "S3", "Carol", 4).await;
    Fixture {
        storage: Arc::new(s),
        creator,
        grader,
        outsider,
    }
}

fn as_profile(storage: &Arc<dyn Storage>, profile: Profile) -> HttpRequest {
    let req = TestRequest::default()
        .app_data(web::Data::new(storage.clone()))
        .to_http_request();
    req.extensions_mut().insert(profile);
    req
}

fn teacher(storage: &Arc<dyn Storage>, teacher_id: i64) -> HttpRequest {
    as_profile(
        storage,
        Profile::Teacher(TeacherProfile {
            user_id: 0,
            teacher_id,
            full_name: format!("Teacher {teacher_id}"),
            nickname: None,
            email: None,
            status: AccountStatus::Active,
        }),
    )
}

fn student(storage: &Arc<dyn Storage>, student_id: &str) -> HttpRequest {
    as_profile(
        storage,
        Profile::Student(StudentProfile {
            user_id: 0,
            student_id: student_id.to_string(),
            full_name: student_id.to_string(),
            nickname: None,
            year_level: 4,
            status: AccountStatus::Active,
        }),
    )
}

async fn body(resp: HttpResponse) -> Value {
    let bytes = to_bytes(resp.into_body()).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn grades(group_id: i64, criteria: &[i64], score: &str) -> SaveGradesRequest {
    SaveGradesRequest {
        grades: criteria
            .iter()
            .map(|c| GradeInput {
                group_id,
                criteria_id: *c,
                score: score.to_string(),
            })
            .collect(),
        group_id: None,
        comment: Some("Solid teamwork".to_string()),
    }
}

/// 创建活动与一个小组，返回 (activity_id, group_id, criteria_ids)
async fn activity_with_group(fx: &Fixture) -> (i64, i64, Vec<i64>) {
    let resp = ActivityService::new_lazy()
        .create_activity(
            &teacher(&fx.storage, fx.creator),
            activity_request("Capstone", vec![fx.grader]),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let detail = body(resp).await;
    let activity_id = detail["data"]["id"].as_i64().unwrap();
    let criteria: Vec<i64> = detail["data"]["criteria"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();

    let resp = GroupService::new_lazy()
        .create_group(
            &student(&fx.storage, "S1"),
            group_request(activity_id, "Team Rocket", &["S2"]),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let group_id = body(resp).await["data"]["id"].as_i64().unwrap();

    (activity_id, group_id, criteria)
}

#[actix_web::test]
async fn test_grades_hidden_until_grader_submits() {
    let fx = fixture().await;
    let (activity_id, group_id, criteria) = activity_with_group(&fx).await;
    let grading = GradingService::with_lock(false);

    let resp = grading
        .save_grades(
            &teacher(&fx.storage, fx.creator),
            activity_id,
            grades(group_id, &criteria, "A"),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let dashboard = DashboardService::new_lazy();
    let view = body(
        dashboard
            .get_activity_dashboard(&student(&fx.storage, "S2"), activity_id)
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(view["data"]["status"], "pending");
    assert!(view["data"]["overall_score"].is_null());
    assert_eq!(view["data"]["comments"].as_array().unwrap().len(), 0);

    // 进度视图不受提交状态限制
    let progress = body(
        ActivityService::new_lazy()
            .get_progress(&teacher(&fx.storage, fx.grader), activity_id)
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(progress["data"]["groups"][0]["average_gpa"], 4.0);
    assert_eq!(progress["data"]["summary"]["draft_count"], 2);

    let resp = grading
        .submit_grades(&teacher(&fx.storage, fx.creator), activity_id)
        .await
        .unwrap();
    assert_eq!(body(resp).await["data"]["already_submitted"], false);

    let view = body(
        dashboard
            .get_activity_dashboard(&student(&fx.storage, "S2"), activity_id)
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(view["data"]["status"], "graded");
    assert_eq!(view["data"]["overall_score"], 4.0);
    assert_eq!(view["data"]["final_grade"], "A");
    assert_eq!(view["data"]["comments"][0]["comment"], "Solid teamwork");

    let overview = body(
        dashboard
            .get_overview(&student(&fx.storage, "S1"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(overview["data"]["graded_count"], 1);
}

#[actix_web::test]
async fn test_resubmit_is_noop() {
    let fx = fixture().await;
    let (activity_id, _, _) = activity_with_group(&fx).await;
    let grading = GradingService::with_lock(false);
    let req = teacher(&fx.storage, fx.grader);

    let first = body(grading.submit_grades(&req, activity_id).await.unwrap()).await;
    let second = body(grading.submit_grades(&req, activity_id).await.unwrap()).await;

    assert_eq!(second["data"]["status"], "submitted");
    assert_eq!(second["data"]["already_submitted"], true);
    assert_eq!(
        first["data"]["submitted_at"],
        second["data"]["submitted_at"]
    );
}

#[actix_web::test]
async fn test_only_graders_can_grade() {
    let fx = fixture().await;
    let (activity_id, group_id, criteria) = activity_with_group(&fx).await;

    let resp = GradingService::with_lock(false)
        .save_grades(
            &teacher(&fx.storage, fx.outsider),
            activity_id,
            grades(group_id, &criteria, "B"),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_locked_grades_reject_edits() {
    let fx = fixture().await;
    let (activity_id, group_id, criteria) = activity_with_group(&fx).await;
    let grading = GradingService::with_lock(true);
    let req = teacher(&fx.storage, fx.creator);

    grading.submit_grades(&req, activity_id).await.unwrap();
    let resp = grading
        .save_grades(&req, activity_id, grades(group_id, &criteria, "C"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_duplicate_membership_names_conflicting_students() {
    let fx = fixture().await;
    let (activity_id, _, _) = activity_with_group(&fx).await;

    let resp = GroupService::new_lazy()
        .create_group(
            &student(&fx.storage, "S3"),
            group_request(activity_id, "Team Aqua", &["S2"]),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let message = body(resp).await["message"].as_str().unwrap().to_string();
    assert!(message.contains("Bob"));
}

#[actix_web::test]
async fn test_concurrent_groups_cannot_share_member() {
    let fx = fixture().await;
    let resp = ActivityService::new_lazy()
        .create_activity(
            &teacher(&fx.storage, fx.creator),
            activity_request("Capstone", vec![]),
        )
        .await
        .unwrap();
    let activity_id = body(resp).await["data"]["id"].as_i64().unwrap();

    let groups = GroupService::new_lazy();
    let alice = student(&fx.storage, "S1");
    let bob = student(&fx.storage, "S2");
    let (first, second) = futures_util::join!(
        groups.create_group(&alice, group_request(activity_id, "Alpha", &["S3"])),
        groups.create_group(&bob, group_request(activity_id, "Beta", &["S3"])),
    );

    let mut statuses = vec![first.unwrap().status(), second.unwrap().status()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);

    let carol = fx
        .storage
        .find_grouped_students(activity_id, &["S3".to_string()])
        .await
        .unwrap();
    assert_eq!(carol.len(), 1);
}

#[actix_web::test]
async fn test_only_group_creator_can_delete() {
    let fx = fixture().await;
    let (_, group_id, _) = activity_with_group(&fx).await;
    let groups = GroupService::new_lazy();

    let resp = groups
        .delete_group(&student(&fx.storage, "S2"), group_id)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = groups
        .delete_group(&student(&fx.storage, "S1"), group_id)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_only_creator_can_delete_activity() {
    let fx = fixture().await;
    let (activity_id, _, _) = activity_with_group(&fx).await;
    let activities = ActivityService::new_lazy();

    let resp = activities
        .delete_activity(&teacher(&fx.storage, fx.grader), activity_id)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = activities
        .delete_activity(&teacher(&fx.storage, fx.creator), activity_id)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
