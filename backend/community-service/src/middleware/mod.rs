/// HTTP middleware utilities for community-service
///
/// Bearer-token authentication and the capability predicates gating mutating
/// operations. The middleware only decodes what the auth collaborator issued;
/// credential validation and issuance live outside this service.
pub mod permissions;

use crate::error::AppError;
use crate::models::{AuthUser, Role};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;
use uuid::Uuid;

/// Token claims issued by the identity service.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub exp: usize,
}

/// Actix middleware that decodes a Bearer token when one is present and
/// stores the resulting `AuthUser` in request extensions. A request without
/// an Authorization header passes through unauthenticated; rejection happens
/// at the extractor, per route. A present-but-invalid token always fails.
pub struct JwtAuth {
    key: Arc<DecodingKey>,
}

impl JwtAuth {
    pub fn new(secret: &str) -> Self {
        Self {
            key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthService {
            service: Rc::new(service),
            key: self.key.clone(),
        }))
    }
}

pub struct JwtAuthService<S> {
    service: Rc<S>,
    key: Arc<DecodingKey>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let key = self.key.clone();

        Box::pin(async move {
            let header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .map(str::to_owned);

            if let Some(header) = header {
                let token = header.strip_prefix("Bearer ").ok_or_else(|| {
                    Error::from(AppError::Unauthenticated(
                        "invalid Authorization scheme".to_string(),
                    ))
                })?;

                let claims = decode::<Claims>(token, &key, &Validation::default())
                    .map_err(|_| {
                        Error::from(AppError::Unauthenticated(
                            "invalid or expired token".to_string(),
                        ))
                    })?
                    .claims;

                let id = Uuid::parse_str(&claims.sub).map_err(|_| {
                    Error::from(AppError::Unauthenticated("invalid user ID".to_string()))
                })?;

                req.extensions_mut().insert(AuthUser {
                    id,
                    role: claims.role,
                });
            }

            service.call(req).await
        })
    }
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .copied()
                .ok_or_else(|| {
                    Error::from(AppError::Unauthenticated(
                        "authentication required".to_string(),
                    ))
                }),
        )
    }
}

/// Optional viewer for public read endpoints: `Some` when a valid token was
/// presented, `None` otherwise. Never rejects the request.
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Option<AuthUser>);

impl MaybeUser {
    pub fn viewer_id(&self) -> Option<Uuid> {
        self.0.map(|u| u.id)
    }
}

impl FromRequest for MaybeUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(MaybeUser(req.extensions().get::<AuthUser>().copied())))
    }
}
