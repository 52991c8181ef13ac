//! 路径参数提取器
//!
//! 在进入业务逻辑之前校验路径中的 ID，非法值直接返回统一格式的 400 响应。

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};

use crate::models::{ApiResponse, ErrorCode};

fn parse_positive_id(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(name).unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                format!("Invalid {name}: {raw}"),
            ));
            Err(InternalError::from_response(format!("invalid {name}"), response).into())
        }
    }
}

macro_rules! define_safe_id {
    ($($name:ident => $param:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(parse_positive_id(req, $param).map($name))
                }
            }
        )*
    };
}

define_safe_id! {
    SafeActivityIdI64 => "activity_id",
    SafeGroupIdI64 => "group_id",
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_parse_positive_id() {
        let req = TestRequest::default()
            .param("activity_id", "42")
            .to_http_request();
        assert_eq!(parse_positive_id(&req, "activity_id").unwrap(), 42);
    }

    #[test]
    fn test_reject_invalid_id() {
        for raw in ["0", "-3", "abc"] {
            let req = TestRequest::default()
                .param("group_id", raw)
                .to_http_request();
            assert!(parse_positive_id(&req, "group_id").is_err());
        }
    }
}
