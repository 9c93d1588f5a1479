use actix_web::{Responder, get, web};
use watchpost::QueryFacade;

/// Last-known health per registered endpoint URL.
#[get("/status")]
pub async fn status_route(facade: web::Data<QueryFacade>) -> impl Responder {
    web::Json(facade.statuses())
}
