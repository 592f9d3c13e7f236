use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::configuration::AuthSettings;
use crate::exchange::ExchangeRateClient;
use crate::middleware::{BearerAuth, RequestLogger};
use crate::routes::{consultar, health_check, login, register};
use crate::store::UserStore;

pub fn run(
    listener: TcpListener,
    store: Arc<dyn UserStore>,
    exchange: ExchangeRateClient,
    auth_config: AuthSettings,
) -> Result<Server, std::io::Error> {
    let store = web::Data::from(store);
    let exchange = web::Data::new(exchange);
    let auth_data = web::Data::new(auth_config.clone());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestLogger)
            // Shared state: the store, the quote client and the read-only
            // signing settings. Nothing here mutates after startup.
            .app_data(store.clone())
            .app_data(exchange.clone())
            .app_data(auth_data.clone())
            // Public routes
            .route("/health_check", web::get().to(health_check))
            .route("/registrar", web::post().to(register))
            .route("/login", web::post().to(login))
            // Protected routes
            .service(
                web::resource("/consultar")
                    .wrap(BearerAuth::new(auth_config.clone()))
                    .route(web::get().to(consultar)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
