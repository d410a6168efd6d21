//! HTTP boundary for the anemia risk predictor.

pub mod forms;
pub mod pages;
pub mod server;

pub use server::{build_router, start_server, AppState};
