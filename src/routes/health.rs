use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::HealthService;

static HEALTH_SERVICE: Lazy<HealthService> = Lazy::new(HealthService::new_lazy);

pub async fn health_check(req: HttpRequest) -> ActixResult<HttpResponse> {
    HEALTH_SERVICE.check(&req).await
}

// 配置路由（无需认证）
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/v1/health").route(web::get().to(health_check)));
}
