//! 认证中间件

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use taproom_auth_core::{Claims, TokenService, require_role};
use taproom_errors::{AppError, AppResult};
use tracing::{debug, warn};

use super::state::AuthSettings;

/// JWT 认证中间件
///
/// 验证 Bearer token 并将 claims 注入到请求扩展中
pub async fn auth_middleware(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let Some(token) = token else {
        warn!("Missing or invalid authorization header");
        return Err(AppError::unauthorized("Missing bearer token"));
    };

    let claims = tokens.validate_access_token(token).inspect_err(|e| {
        warn!(error = %e, "Token validation failed");
    })?;
    debug!(subject = %claims.sub, "Token validated");

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// 检查查询啤酒列表所需的角色
pub fn authorize_list_beers(auth: Option<&AuthSettings>, claims: Option<&Claims>) -> AppResult<()> {
    let Some(role) = auth.and_then(|a| a.list_beers_role.as_deref()) else {
        return Ok(());
    };

    let claims = claims.ok_or_else(|| AppError::unauthorized("Missing bearer token"))?;
    require_role!(claims, role);
    Ok(())
}
