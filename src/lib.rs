mod api;
mod clock;
mod config;
mod context;
mod error;
mod frontend;
mod models;
mod portal;
mod service;
mod session_store;
mod state;
mod storage;

#[cfg(test)]
pub mod test_utils;

pub use api::{Backend, HttpBackend};
pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use error::app_error::AppError;
pub use frontend::{ConsoleFrontend, Frontend};
pub use models::input::InputEvent;
pub use models::messages::role_label;
pub use models::sort::{SortColumn, SortDirection, SortState};
pub use models::user::{ActiveUser, CurrentUser, User, UserForm};
pub use portal::Portal;
pub use service::activity::{ActivityTracker, InactivityOutcome};
pub use service::admin::AdminUserManager;
pub use service::auth::AuthController;
pub use service::directory::{DirectoryPoller, PollOutcome};
pub use service::workspace::Workspace;
pub use session_store::SessionStore;
pub use state::{ActiveUsersPanel, AppState, AuthTab, ModalMessage, ModalMode, UserModal, View};
pub use storage::{FileStore, KeyValueStore, MemoryStore};

use tracing_subscriber::EnvFilter;

pub fn init_tracing(log_level: &str, json_format: bool) {
    // RUST_LOG takes precedence over the configured level, e.g.
    //   RUST_LOG=portal_client::service=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    if json_format {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
