/// Middleware module
///
/// Bearer token authentication and request logging.

mod bearer;
mod request_log;

pub use bearer::BearerAuth;
pub use request_log::RequestLogger;
