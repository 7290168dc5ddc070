//! Access control list middleware for the B2B server.
//! This middleware can be placed on any route or service that sits behind the token middleware.
//!
//! It checks the [`AuthenticatedUser`] placed in the request extensions against the account types allowed on the
//! route. Anonymous requests are refused with "Log in required", and users of the wrong type with "exclusively for
//! stores". Both are 403 Forbidden responses.

use std::{
    future::{ready, Future, Ready},
    pin::Pin,
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
    HttpMessage,
};
use b2b_engine::db_types::UserType;
use log::*;

use crate::{auth::AuthenticatedUser, errors::ServerError};

pub struct AclMiddlewareFactory {
    allowed: Vec<UserType>,
}

impl AclMiddlewareFactory {
    pub fn new(allowed: &[UserType]) -> Self {
        AclMiddlewareFactory { allowed: allowed.to_vec() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AclMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AclMiddlewareService { allowed: self.allowed.clone(), service: Rc::new(service) }))
    }
}

pub struct AclMiddlewareService<S> {
    allowed: Vec<UserType>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let allowed = self.allowed.clone();
        Box::pin(async move {
            let user_type = req.extensions().get::<AuthenticatedUser>().map(|u| u.user_type);
            match user_type {
                None => Err(ServerError::LoginRequired.into()),
                Some(t) if allowed.contains(&t) => service.call(req).await,
                Some(t) => {
                    debug!("💻️ A {t} account tried to access {}", req.path());
                    Err(ServerError::ShopsOnly.into())
                },
            }
        })
    }
}
