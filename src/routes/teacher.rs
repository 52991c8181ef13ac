use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::activities::requests::{ActivityQueryParams, CreateActivityRequest};
use crate::models::grades::requests::SaveGradesRequest;
use crate::models::profiles::entities::Role;
use crate::services::{ActivityService, CatalogueService, GradingService};
use crate::utils::SafeActivityIdI64;

// 懒加载的全局服务实例
static ACTIVITY_SERVICE: Lazy<ActivityService> = Lazy::new(ActivityService::new_lazy);
static GRADING_SERVICE: Lazy<GradingService> = Lazy::new(GradingService::new_lazy);
static CATALOGUE_SERVICE: Lazy<CatalogueService> = Lazy::new(CatalogueService::new_lazy);

// HTTP处理程序
pub async fn list_teachers(req: HttpRequest) -> ActixResult<HttpResponse> {
    CATALOGUE_SERVICE.list_teachers(&req).await
}

pub async fn create_activity(
    req: HttpRequest,
    activity_data: web::Json<CreateActivityRequest>,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE
        .create_activity(&req, activity_data.into_inner())
        .await
}

pub async fn list_activities(
    req: HttpRequest,
    query: web::Query<ActivityQueryParams>,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE
        .list_activities(&req, query.into_inner())
        .await
}

pub async fn get_activity(
    req: HttpRequest,
    activity_id: SafeActivityIdI64,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE.get_activity(&req, activity_id.0).await
}

pub async fn delete_activity(
    req: HttpRequest,
    activity_id: SafeActivityIdI64,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE.delete_activity(&req, activity_id.0).await
}

pub async fn list_activity_groups(
    req: HttpRequest,
    activity_id: SafeActivityIdI64,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE
        .list_activity_groups(&req, activity_id.0)
        .await
}

pub async fn get_progress(
    req: HttpRequest,
    activity_id: SafeActivityIdI64,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE.get_progress(&req, activity_id.0).await
}

pub async fn get_grading_workspace(
    req: HttpRequest,
    activity_id: SafeActivityIdI64,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE.get_workspace(&req, activity_id.0).await
}

pub async fn save_grades(
    req: HttpRequest,
    activity_id: SafeActivityIdI64,
    grades_data: web::Json<SaveGradesRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .save_grades(&req, activity_id.0, grades_data.into_inner())
        .await
}

pub async fn submit_grades(
    req: HttpRequest,
    activity_id: SafeActivityIdI64,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE.submit_grades(&req, activity_id.0).await
}

// 配置路由
pub fn configure_teacher_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/teacher")
            // 后注册的中间件先执行：先校验 JWT，再校验角色
            .wrap(middlewares::RequireRole::new_any(Role::teacher_roles()))
            .wrap(middlewares::RequireJWT)
            // 评分人选择
            .service(web::resource("/teachers").route(web::get().to(list_teachers)))
            .service(
                web::resource("/activities")
                    .route(web::get().to(list_activities))
                    .route(web::post().to(create_activity)),
            )
            .service(
                web::resource("/activities/{activity_id}")
                    .route(web::get().to(get_activity))
                    // 仅创建者可删除
                    .route(web::delete().to(delete_activity)),
            )
            .service(
                web::resource("/activities/{activity_id}/groups")
                    .route(web::get().to(list_activity_groups)),
            )
            .service(
                web::resource("/activities/{activity_id}/progress")
                    .route(web::get().to(get_progress)),
            )
            .service(
                web::resource("/activities/{activity_id}/grading")
                    .route(web::get().to(get_grading_workspace)),
            )
            .service(
                web::resource("/activities/{activity_id}/grades")
                    .route(web::post().to(save_grades)),
            )
            .service(
                web::resource("/activities/{activity_id}/submit")
                    .route(web::post().to(submit_grades)),
            ),
    );
}
