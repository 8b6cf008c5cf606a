pub mod code;
pub mod handler_error;
pub mod in_flight;
pub mod job_handler;
pub mod strategies;
pub mod trades;
