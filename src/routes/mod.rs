mod auth;
mod health_check;
mod quote;

pub use auth::{login, register};
pub use health_check::health_check;
pub use quote::consultar;
