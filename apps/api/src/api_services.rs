mod bootstrap;
mod database;
mod email;
mod state_builder;

pub use bootstrap::bootstrap_admin;
pub use database::{connect, connect_and_migrate};
pub use state_builder::build_app_state;
