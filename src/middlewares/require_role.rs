/*!
 * 基于角色的访问控制中间件
 *
 * 此中间件必须在 RequireJWT 中间件之后使用，用于验证用户是否具有特定角色权限。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App, HttpServer};
 * use crate::middlewares::require_jwt::RequireJWT;
 * use crate::middlewares::require_role::RequireRole;
 * use crate::models::profiles::entities::Role;
 *
 * HttpServer::new(|| {
 *     App::new()
 *         .service(
 *             web::scope("/api")
 *                 .wrap(RequireJWT)  // 先验证JWT
 *                 .service(
 *                     web::scope("/teacher")
 *                         .wrap(RequireRole::new(&Role::Teacher)))  // 再验证角色
 *                         .route("/activities", web::get().to(list_activities))
 *                 )
 *         )
 * })
 * ```
 *
 * 或者验证多个角色：
 *
 * ```rust,ignore
 * .wrap(RequireRole::new_any(Role::all_roles()))  // 任一角色即可
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::{
    middlewares::RequireJWT,
    models::{ErrorCode, profiles::entities::Role},
};

use super::create_error_response;

/// 角色白名单；每个用户只有一个角色，命中任一即放行
#[derive(Clone)]
pub struct RequireRole {
    allowed_roles: Rc<[Role]>,
}

impl RequireRole {
    /// 只允许指定角色
    pub fn new(role: &Role) -> Self {
        Self {
            allowed_roles: Rc::from([*role]),
        }
    }

    /// 允许列表中的任一角色
    pub fn new_any(roles: &[&Role]) -> Self {
        Self {
            allowed_roles: roles.iter().map(|r| **r).collect(),
        }
    }

    fn permits(allowed_roles: &[Role], role: Role) -> bool {
        allowed_roles.contains(&role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed_roles: self.allowed_roles.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed_roles: Rc<[Role]>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let allowed_roles = self.allowed_roles.clone();

        Box::pin(async move {
            // 资料由 RequireJWT 写入请求扩展
            let Some(profile) = RequireJWT::extract_profile(req.request()) else {
                info!(
                    "Role check failed for {}: no profile in request, RequireJWT must run first",
                    req.path()
                );
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            if RequireRole::permits(&allowed_roles, profile.role()) {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            info!(
                "Access denied for user {} ({}) on {}, allowed roles: {:?}",
                profile.user_id(),
                profile.role(),
                req.path(),
                allowed_roles
            );
            Ok(req.into_response(
                create_error_response(
                    StatusCode::FORBIDDEN,
                    ErrorCode::Forbidden,
                    &format!(
                        "Access denied: {} role cannot access this resource",
                        profile.role()
                    ),
                )
                .map_into_right_body(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permits_listed_roles_only() {
        let teacher_only = RequireRole::new(&Role::Teacher);
        assert!(RequireRole::permits(&teacher_only.allowed_roles, Role::Teacher));
        assert!(!RequireRole::permits(&teacher_only.allowed_roles, Role::Student));

        let anyone = RequireRole::new_any(Role::all_roles());
        assert!(RequireRole::permits(&anyone.allowed_roles, Role::Admin));
        assert!(RequireRole::permits(&anyone.allowed_roles, Role::Student));
    }
}
