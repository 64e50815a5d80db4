mod handlers;
mod models;
mod page;
mod state;

pub use handlers::{router, run_server, serve};
