use crate::error::AppError;
use actix_web::http::Method;
use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::rc::Rc;

/// 需要管理员令牌的路由范围
const ADMIN_SCOPE: &str = "/api/v1/admin";

fn is_admin_path(path: &str) -> bool {
    path.strip_prefix(ADMIN_SCOPE)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// 从 Authorization 头中取出 Bearer token
fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

/// 定长比较，避免按前缀逐字节提前返回
fn token_matches(expected: &str, provided: &str) -> bool {
    if expected.is_empty() || expected.len() != provided.len() {
        return false;
    }
    expected
        .bytes()
        .zip(provided.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// 管理接口鉴权中间件
pub struct AdminAuthMiddleware {
    api_token: Rc<str>,
}

impl AdminAuthMiddleware {
    pub fn new(api_token: &str) -> Self {
        Self {
            api_token: Rc::from(api_token),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddlewareService {
            service,
            api_token: self.api_token.clone(),
        }))
    }
}

pub struct AdminAuthMiddlewareService<S> {
    service: S,
    api_token: Rc<str>,
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // 放行所有 CORS 预检请求与公开路径
        if req.method() == Method::OPTIONS || !is_admin_path(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let authorized = bearer_token(&req).map(|token| token_matches(&self.api_token, token));

        match authorized {
            Some(true) => {
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Some(false) => {
                let error = AppError::AuthError("Invalid admin token".to_string());
                Box::pin(async move { Err(error.into()) })
            }
            None => {
                let error = AppError::AuthError("Missing admin token".to_string());
                Box::pin(async move { Err(error.into()) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_paths() {
        assert!(is_admin_path("/api/v1/admin"));
        assert!(is_admin_path("/api/v1/admin/prizes"));
        assert!(is_admin_path("/api/v1/admin/codes/ABC/verify"));
        assert!(!is_admin_path("/api/v1/draw"));
        assert!(!is_admin_path("/api/v1/administrator"));
        assert!(!is_admin_path("/swagger-ui/"));
    }

    #[test]
    fn test_token_matches() {
        assert!(token_matches("secret", "secret"));
        assert!(!token_matches("secret", "secreT"));
        assert!(!token_matches("secret", "secret2"));
        // 未配置令牌时全部拒绝
        assert!(!token_matches("", ""));
    }
}
