use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::groups::requests::{
    AvailableStudentsQuery, CreateGroupRequest, UpdateGroupRequest,
};
use crate::models::profiles::entities::Role;
use crate::services::{CatalogueService, DashboardService, GroupService};
use crate::utils::{SafeActivityIdI64, SafeGroupIdI64};

// 懒加载的全局服务实例
static GROUP_SERVICE: Lazy<GroupService> = Lazy::new(GroupService::new_lazy);
static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);
static CATALOGUE_SERVICE: Lazy<CatalogueService> = Lazy::new(CatalogueService::new_lazy);

// HTTP处理程序
pub async fn list_activities(req: HttpRequest) -> ActixResult<HttpResponse> {
    CATALOGUE_SERVICE.list_student_activities(&req).await
}

pub async fn list_available_students(
    req: HttpRequest,
    query: web::Query<AvailableStudentsQuery>,
) -> ActixResult<HttpResponse> {
    CATALOGUE_SERVICE
        .list_available_students(&req, query.into_inner())
        .await
}

pub async fn create_group(
    req: HttpRequest,
    group_data: web::Json<CreateGroupRequest>,
) -> ActixResult<HttpResponse> {
    GROUP_SERVICE
        .create_group(&req, group_data.into_inner())
        .await
}

pub async fn list_my_groups(req: HttpRequest) -> ActixResult<HttpResponse> {
    GROUP_SERVICE.list_my_groups(&req).await
}

pub async fn update_group(
    req: HttpRequest,
    group_id: SafeGroupIdI64,
    group_data: web::Json<UpdateGroupRequest>,
) -> ActixResult<HttpResponse> {
    GROUP_SERVICE
        .update_group(&req, group_id.0, group_data.into_inner())
        .await
}

pub async fn delete_group(req: HttpRequest, group_id: SafeGroupIdI64) -> ActixResult<HttpResponse> {
    GROUP_SERVICE.delete_group(&req, group_id.0).await
}

pub async fn get_dashboard_overview(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.get_overview(&req).await
}

pub async fn get_activity_dashboard(
    req: HttpRequest,
    activity_id: SafeActivityIdI64,
) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE
        .get_activity_dashboard(&req, activity_id.0)
        .await
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/student")
            // 后注册的中间件先执行：先校验 JWT，再校验角色
            .wrap(middlewares::RequireRole::new_any(Role::student_roles()))
            .wrap(middlewares::RequireJWT)
            .service(web::resource("/activities").route(web::get().to(list_activities)))
            // 可邀请的同学
            .service(web::resource("/students").route(web::get().to(list_available_students)))
            .service(
                web::resource("/groups")
                    .route(web::get().to(list_my_groups))
                    .route(web::post().to(create_group)),
            )
            .service(
                web::resource("/groups/{group_id}")
                    // 仅小组创建者可修改或删除
                    .route(web::put().to(update_group))
                    .route(web::delete().to(delete_group)),
            )
            .service(web::resource("/dashboard").route(web::get().to(get_dashboard_overview)))
            .service(
                web::resource("/dashboard/{activity_id}")
                    .route(web::get().to(get_activity_dashboard)),
            ),
    );
}
