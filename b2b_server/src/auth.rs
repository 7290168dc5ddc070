//! Token authentication.
//!
//! Clients authenticate with the token returned by `/user/login`, sent as `Authorization: Token <key>`.
//! [`TokenAuthMiddlewareFactory`] resolves the token against the [`AuthApi`] registered in the app data and stores the
//! [`AuthenticatedUser`] in the request extensions. Requests without the header pass through anonymously, so public
//! routes can share a scope with private ones. A header carrying an unknown token is rejected outright.
//!
//! Handlers that need a user take an [`AuthenticatedUser`] argument. Extraction fails with "Log in required" for
//! anonymous requests.
use std::{
    future::{ready, Future, Ready},
    marker::PhantomData,
    ops::Deref,
    pin::Pin,
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web,
    Error,
    FromRequest,
    HttpMessage,
    HttpRequest,
};
use b2b_engine::{db_types::User, traits::AuthManagement, AuthApi};
use log::*;

use crate::errors::ServerError;

const TOKEN_SCHEME: &str = "Token";

/// The user that the request's API token belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub User);

impl Deref for AuthenticatedUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned().ok_or_else(|| {
            trace!("🔑️ Anonymous request to {}", req.path());
            ServerError::LoginRequired
        });
        ready(user)
    }
}

/// Extracts the key from an `Authorization: Token <key>` header value.
pub fn parse_token_header(value: &str) -> Option<&str> {
    let (scheme, key) = value.trim().split_once(' ')?;
    let key = key.trim();
    (scheme.eq_ignore_ascii_case(TOKEN_SCHEME) && !key.is_empty()).then_some(key)
}

pub struct TokenAuthMiddlewareFactory<B> {
    _backend: PhantomData<fn() -> B>,
}

impl<B> TokenAuthMiddlewareFactory<B> {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self { _backend: PhantomData }
    }
}

impl<S, Bd, B> Transform<S, ServiceRequest> for TokenAuthMiddlewareFactory<B>
where
    S: Service<ServiceRequest, Response = ServiceResponse<Bd>, Error = Error> + 'static,
    S::Future: 'static,
    Bd: 'static,
    B: AuthManagement + 'static,
{
    type Response = ServiceResponse<Bd>;
    type Error = Error;
    type Transform = TokenAuthMiddlewareService<S, B>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TokenAuthMiddlewareService { service: Rc::new(service), _backend: PhantomData }))
    }
}

pub struct TokenAuthMiddlewareService<S, B> {
    service: Rc<S>,
    _backend: PhantomData<fn() -> B>,
}

impl<S, Bd, B> Service<ServiceRequest> for TokenAuthMiddlewareService<S, B>
where
    S: Service<ServiceRequest, Response = ServiceResponse<Bd>, Error = Error> + 'static,
    S::Future: 'static,
    Bd: 'static,
    B: AuthManagement + 'static,
{
    type Response = ServiceResponse<Bd>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let header = match req.headers().get(AUTHORIZATION) {
                Some(value) => Some(value.to_str().map_err(|_| ServerError::InvalidToken)?.to_string()),
                None => None,
            };
            if let Some(header) = header {
                let token = parse_token_header(&header).ok_or_else(|| {
                    debug!("🔑️ Malformed Authorization header");
                    ServerError::InvalidToken
                })?;
                let api = req.app_data::<web::Data<AuthApi<B>>>().cloned().ok_or_else(|| {
                    error!("🔑️ No AuthApi has been registered with the server");
                    ServerError::InitializeError("Authentication is not configured".into())
                })?;
                let user = api.authenticate(token).await.map_err(ServerError::from)?;
                trace!("🔑️ Request authenticated as user #{}", user.id);
                req.extensions_mut().insert(AuthenticatedUser(user));
            }
            service.call(req).await
        })
    }
}
