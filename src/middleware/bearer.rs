/// Bearer token middleware
///
/// Validates the `Authorization: Bearer` token on protected routes and
/// injects the verified claims into request extensions for the handler.
/// Requests that fail here never reach the handler.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    Error, HttpMessage, ResponseError,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::validate_access_token;
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError};

pub struct BearerAuth {
    auth_config: AuthSettings,
}

impl BearerAuth {
    pub fn new(auth_config: AuthSettings) -> Self {
        Self { auth_config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(BearerAuthService {
            service: Rc::new(service),
            auth_config: self.auth_config.clone(),
        }))
    }
}

pub struct BearerAuthService<S> {
    service: Rc<S>,
    auth_config: AuthSettings,
}

impl<S, B> Service<ServiceRequest> for BearerAuthService<S>
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
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::to_owned);

        match token {
            None => {
                let response = AppError::from(AuthError::MissingToken).error_response();
                Box::pin(async move {
                    Err(InternalError::from_response("missing token", response).into())
                })
            }
            Some(token) => match validate_access_token(&token, &self.auth_config) {
                Ok(claims) => {
                    tracing::debug!(subject = %claims.sub, "bearer token accepted");
                    req.extensions_mut().insert(claims);

                    let service = self.service.clone();
                    Box::pin(async move { service.call(req).await })
                }
                Err(e) => {
                    let response = e.error_response();
                    Box::pin(async move {
                        Err(InternalError::from_response("invalid token", response).into())
                    })
                }
            },
        }
    }
}
