/*!
 * JWT 认证中间件
 *
 * 校验外部签发的 Access Token，并按 token 中的用户 ID 解析调用者资料。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App, HttpServer};
 * use crate::middlewares::require_jwt::RequireJWT;
 *
 * HttpServer::new(|| {
 *     App::new()
 *         .service(
 *             web::scope("/api")
 *                 .wrap(RequireJWT)  // 应用JWT验证中间件
 *                 .route("/protected", web::get().to(protected_handler))
 *         )
 * })
 * ```
 *
 * 在处理程序中提取调用者资料：
 * ```rust,ignore
 * async fn protected_handler(req: HttpRequest) -> Result<HttpResponse> {
 *     if let Some(teacher) = RequireJWT::extract_teacher(&req) {
 *         return Ok(HttpResponse::Ok().json(teacher.full_name));
 *     }
 *     Ok(HttpResponse::Forbidden().finish())
 * }
 * ```
 *
 * ## 认证流程
 *
 * 1. 客户端在请求头中包含 `Authorization: Bearer <JWT_TOKEN>`
 * 2. 中间件校验签名、过期时间和 token 类型
 * 3. 先查缓存，未命中时从存储层按角色读取资料并写入缓存
 * 4. 资料缺失或账号非在读/在职状态时返回 401
 */

use crate::cache::{self, ObjectCache};
use crate::models::ErrorCode;
use crate::models::profiles::entities::{Profile, Role, StudentProfile, TeacherProfile};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

/// 认证失败原因
enum AuthFailure {
    Unauthorized(String),
    Internal(String),
}

fn profile_cache_key(token: &str) -> String {
    format!("profile:{token}")
}

// 辅助函数：提取并验证 JWT access token，解析调用者资料
async fn extract_and_resolve_profile(req: &ServiceRequest) -> Result<Profile, AuthFailure> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| {
            AuthFailure::Unauthorized("Missing or invalid Authorization header".to_string())
        })?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        AuthFailure::Unauthorized("Invalid JWT token".to_string())
    })?;

    let cache = req
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| AuthFailure::Internal("Cache not found in app data".to_string()))?;

    let key = profile_cache_key(token);
    if let Some(profile) = cache::get_json::<Profile>(cache.as_ref(), &key).await {
        return Ok(profile);
    }
    debug!("Profile not found in cache, loading from storage");

    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| AuthFailure::Internal("Storage not found in app data".to_string()))?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| AuthFailure::Unauthorized("Invalid user ID in JWT".to_string()))?;

    let profile = storage
        .get_profile_by_user_id(user_id)
        .await
        .map_err(|e| {
            error!("Failed to load profile for user {}: {}", user_id, e);
            AuthFailure::Internal("Failed to retrieve user profile".to_string())
        })?
        .ok_or_else(|| AuthFailure::Unauthorized("User profile not found".to_string()))?;

    // token 中的角色必须与资料一致
    if claims.role.parse::<Role>().ok() != Some(profile.role()) {
        return Err(AuthFailure::Unauthorized(
            "Token role does not match user".to_string(),
        ));
    }

    if !profile.is_active() {
        return Err(AuthFailure::Unauthorized("User is not active".to_string()));
    }

    cache::insert_json(cache.as_ref(), key, &profile).await;

    Ok(profile)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_and_resolve_profile(&req).await {
                Ok(profile) => {
                    debug!(
                        "JWT authentication successful for user {} ({})",
                        profile.user_id(),
                        profile.role()
                    );
                    req.extensions_mut().insert(profile);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(AuthFailure::Unauthorized(err)) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
                Err(AuthFailure::Internal(err)) => {
                    error!("Authentication error for request to {}: {}", req.path(), err);
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorCode::InternalServerError,
                            "Internal server error",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取调用者资料
impl RequireJWT {
    /// 从请求扩展中提取调用者资料
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_profile(req: &actix_web::HttpRequest) -> Option<Profile> {
        req.extensions().get::<Profile>().cloned()
    }

    /// 从请求扩展中提取用户ID
    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<Profile>().map(Profile::user_id)
    }

    /// 从请求扩展中提取用户角色
    pub fn extract_role(req: &actix_web::HttpRequest) -> Option<Role> {
        req.extensions().get::<Profile>().map(Profile::role)
    }

    /// 提取学生资料，调用者不是学生时返回 None
    pub fn extract_student(req: &actix_web::HttpRequest) -> Option<StudentProfile> {
        req.extensions()
            .get::<Profile>()
            .and_then(|p| p.as_student().cloned())
    }

    /// 提取教师资料，调用者不是教师时返回 None
    pub fn extract_teacher(req: &actix_web::HttpRequest) -> Option<TeacherProfile> {
        req.extensions()
            .get::<Profile>()
            .and_then(|p| p.as_teacher().cloned())
    }
}
