pub mod config;
pub mod error;
pub mod handlers;
pub mod procedures;
pub mod schema;
pub mod services;

pub use config::Config;
pub use error::AppError;
pub use services::TerminalService;

pub struct AppState {
    pub terminal: TerminalService,
}
