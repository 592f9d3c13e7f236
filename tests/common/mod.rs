use async_trait::async_trait;
use std::net::TcpListener;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use cambio_api::configuration::AuthSettings;
use cambio_api::error::{AppError, AuthError};
use cambio_api::exchange::ExchangeRateClient;
use cambio_api::startup::run;
use cambio_api::store::{User, UserStore};

pub struct TestApp {
    pub address: String,
}

/// In-memory user store for the integration suite.
///
/// The check-and-insert in `create` happens under a single lock, mirroring
/// the unique-index guarantee the Postgres store gets from the database.
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();

        if users.iter().any(|u| u.email == email) {
            return Err(AppError::Auth(AuthError::DuplicateEmail));
        }

        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: chrono::Utc::now(),
        };
        users.push(user.clone());

        Ok(user)
    }
}

pub fn test_auth_settings() -> AuthSettings {
    AuthSettings {
        secret: "integration-test-secret-0123456789abcdef".to_string(),
        algorithm: "HS256".to_string(),
        token_expiry_minutes: 30,
    }
}

/// Spawn the application on a random port against an in-memory store.
///
/// `quote_page_url` is where the exchange client will look for the dollar
/// rate; tests that never hit /consultar can pass any address.
pub async fn spawn_app(quote_page_url: &str) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
    let exchange = ExchangeRateClient::new(quote_page_url.to_string(), reqwest::Client::new());

    let server =
        run(listener, store, exchange, test_auth_settings()).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
    }
}
