pub mod application_service;
pub mod marathon_service;
pub mod search;
