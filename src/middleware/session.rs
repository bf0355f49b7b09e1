use crate::core::AppError;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    Error,
};
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;
use uuid::Uuid;

/// Header carrying the admin token
pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

/// Paths reachable without a token
const PUBLIC_PATHS: [&str; 3] = ["/", "/health", "/ready"];

/// Who may use the admin API, decided once at startup.
///
/// With no hash configured the gate is open.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    admin_token_hash: Option<String>,
}

impl SessionContext {
    /// Fails when the hash is not a valid PHC string
    pub fn new(admin_token_hash: Option<String>) -> crate::core::Result<Self> {
        if let Some(hash) = &admin_token_hash {
            PasswordHash::new(hash).map_err(|e| {
                AppError::Configuration(format!("ADMIN_TOKEN_HASH is not a valid hash: {}", e))
            })?;
        }
        Ok(Self { admin_token_hash })
    }

    pub fn open() -> Self {
        Self::default()
    }

    pub fn is_protected(&self) -> bool {
        self.admin_token_hash.is_some()
    }

    pub fn authorize(&self, token: Option<&str>) -> crate::core::Result<()> {
        let Some(hash) = &self.admin_token_hash else {
            return Ok(());
        };
        let token = token.ok_or_else(|| {
            AppError::unauthorized(format!("Missing {} header", ADMIN_TOKEN_HEADER))
        })?;

        if verify_admin_token(token, hash)? {
            Ok(())
        } else {
            Err(AppError::unauthorized("Invalid admin token"))
        }
    }
}

/// Admin token gate
pub struct SessionGate {
    context: Arc<SessionContext>,
}

impl SessionGate {
    pub fn new(context: Arc<SessionContext>) -> Self {
        Self { context }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionGateMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGateMiddleware {
            service: Rc::new(service),
            context: self.context.clone(),
        }))
    }
}

pub struct SessionGateMiddleware<S> {
    service: Rc<S>,
    context: Arc<SessionContext>,
}

impl<S, B> Service<ServiceRequest> for SessionGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let context = self.context.clone();

        Box::pin(async move {
            if !context.is_protected()
                || req.method() == Method::OPTIONS
                || PUBLIC_PATHS.contains(&req.path())
            {
                return svc.call(req).await;
            }

            let token = req
                .headers()
                .get(ADMIN_TOKEN_HEADER)
                .and_then(|h| h.to_str().ok());

            if let Err(e) = context.authorize(token) {
                tracing::warn!(path = %req.path(), "Rejected request: {}", e);
                return Err(Error::from(e));
            }

            svc.call(req).await
        })
    }
}

/// Hashes an admin token with Argon2 for `ADMIN_TOKEN_HASH`
pub fn hash_admin_token(token: &str) -> crate::core::Result<String> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| AppError::internal(format!("Failed to build salt: {}", e)))?;

    Argon2::default()
        .hash_password(token.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Failed to hash admin token: {}", e)))
}

/// Verifies an admin token against its Argon2 hash
pub fn verify_admin_token(token: &str, hash: &str) -> crate::core::Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(token.as_bytes(), &parsed)
        .is_ok())
}
