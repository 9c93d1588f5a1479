//! Read-only routes over the query facade. No write endpoints exist.

mod stats;
mod status;

use std::future::Future;

use actix_web::dev::{Service, ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpResponse, Responder, get, web::ServiceConfig};
use tracing::debug;

pub fn routes(cfg: &mut ServiceConfig) {
    cfg.service(index_route)
        .service(status::status_route)
        .service(stats::packet_stats_route);
}

/// Request/response logging, mounted via `wrap_fn`. Emits one debug
/// line on arrival and one with the status code after the handler.
pub fn log_request<S, B>(
    req: ServiceRequest,
    srv: &S,
) -> impl Future<Output = Result<ServiceResponse<B>, Error>> + use<S, B>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
{
    let method = req.method().clone();
    let path = req.path().to_owned();
    debug!(%method, %path, "request received");

    let fut = srv.call(req);
    async move {
        let res = fut.await?;
        debug!(%method, %path, status = %res.status(), "response sent");
        Ok(res)
    }
}

/// Landing route naming the two query endpoints.
#[get("/")]
pub async fn index_route() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("watchpost monitor\n\n/status\n/packet-stats\n")
}
