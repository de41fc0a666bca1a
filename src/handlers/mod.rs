pub mod application_handler;
pub mod health_handler;
pub mod marathon_handler;
pub mod session_handler;
