use actix_web::{Responder, get, web};
use watchpost::QueryFacade;

/// Current packet counters.
#[get("/packet-stats")]
pub async fn packet_stats_route(facade: web::Data<QueryFacade>) -> impl Responder {
    web::Json(facade.packet_stats())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test, web};
    use watchpost::{QueryFacade, ServiceRegistry, StatusStore, TelemetryStore};

    #[actix_web::test]
    async fn packet_stats_route_returns_counters() {
        let telemetry = Arc::new(TelemetryStore::new());
        telemetry.record_frame(true);
        telemetry.record_frame(false);
        telemetry.record_frame(false);

        let facade = QueryFacade::new(
            Arc::new(StatusStore::for_registry(&ServiceRegistry::default())),
            telemetry,
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(facade))
                .configure(super::super::routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/packet-stats").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total_packets"], 3);
        assert_eq!(body["http_requests"], 1);
    }
}
