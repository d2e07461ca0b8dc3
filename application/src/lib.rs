pub mod quiz_service;
pub mod timer;
