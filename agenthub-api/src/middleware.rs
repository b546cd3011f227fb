use crate::AppState;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error,
};
use futures_util::future::{ready, LocalBoxFuture, Ready};

/// Makes sure the tables exist before each request reaches a handler.
///
/// Failures are logged and the request proceeds; the data operation it
/// performs then fails on its own.
pub struct EnsureTables;

impl<S, B> Transform<S, ServiceRequest> for EnsureTables
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = EnsureTablesService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(EnsureTablesService { service }))
    }
}

pub struct EnsureTablesService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for EnsureTablesService<S>
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
        if let Some(state) = req.app_data::<web::Data<AppState>>() {
            if let Err(e) = state.database.initialize_tables() {
                tracing::error!(
                    error = %e,
                    path = %req.path(),
                    "Database initialization failed"
                );
            }
        }

        Box::pin(self.service.call(req))
    }
}
