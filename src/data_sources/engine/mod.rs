pub mod engine_config;
pub mod engine_ws_api;
pub mod incoming_message;
pub mod outgoing_message;
pub mod submission_error;
