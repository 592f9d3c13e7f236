/// Protected dollar quote route
///
/// The bearer middleware has already validated the token by the time this
/// runs; the handler only delegates to the exchange rate client.

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::auth::Claims;
use crate::error::{AppError, ErrorContext};
use crate::exchange::ExchangeRateClient;

#[derive(Serialize)]
pub struct QuoteResponse {
    #[serde(rename = "Dolar agora")]
    pub dolar_agora: String,
}

/// GET /consultar
///
/// # Errors
/// - 401: missing/invalid/expired token (rejected by the middleware)
/// - 500: upstream fetch failure
pub async fn consultar(
    claims: web::ReqData<Claims>,
    exchange: web::Data<ExchangeRateClient>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("consultar");

    let rate = exchange.dollar_now().await?;

    tracing::info!(
        request_id = %context.request_id,
        subject = %claims.sub,
        "dollar quote served"
    );

    Ok(HttpResponse::Ok().json(QuoteResponse { dolar_agora: rate }))
}
