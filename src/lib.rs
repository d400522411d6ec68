pub mod api;
pub mod browse;
pub mod cli;
pub mod config;
pub mod error;
pub mod router;
pub mod session;
pub mod storage;
pub mod types;

pub use api::{ApiClient, Page, QueryParams, TokenStore};
pub use browse::PublicEventsBrowser;
pub use config::ApiConfig;
pub use error::{ClientError, ClientResult};
pub use session::AuthSession;
