//! Optional Prometheus metrics middleware wrapper.

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::BoxBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use futures_util::future::LocalBoxFuture;
use std::sync::Arc;
use tracing::warn;

const METRICS_NAMESPACE: &str = "voice_orders";
const METRICS_ENDPOINT: &str = "/metrics";

/// Build the Prometheus middleware, logging and skipping it on failure.
pub fn initialize_metrics<F, E>(build: F) -> Option<PrometheusMetrics>
where
    F: FnOnce() -> Result<PrometheusMetrics, E>,
    E: std::fmt::Display,
{
    match build() {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(%error, "Prometheus metrics disabled");
            None
        }
    }
}

/// Default registry exposing `/metrics`.
pub fn default_metrics() -> Option<PrometheusMetrics> {
    initialize_metrics(|| {
        PrometheusMetricsBuilder::new(METRICS_NAMESPACE)
            .endpoint(METRICS_ENDPOINT)
            .build()
    })
}

/// Either the Prometheus middleware or a pass-through, boxed to one type.
#[derive(Clone)]
pub(crate) enum MetricsLayer {
    Enabled(Arc<PrometheusMetrics>),
    Disabled,
}

impl MetricsLayer {
    #[must_use]
    pub(crate) fn from_option(metrics: Option<PrometheusMetrics>) -> Self {
        match metrics {
            Some(metrics) => Self::Enabled(Arc::new(metrics)),
            None => Self::Disabled,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        match self.clone() {
            MetricsLayer::Enabled(metrics) => {
                let fut = Compat::new((*metrics).clone()).new_transform(service);
                Box::pin(async move {
                    let svc = fut.await?;
                    Ok(boxed::service(svc))
                })
            }
            MetricsLayer::Disabled => Box::pin(async move {
                let svc = service.map(|res: ServiceResponse<B>| res.map_into_boxed_body());
                Ok(boxed::service(svc))
            }),
        }
    }
}
