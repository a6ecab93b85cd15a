pub mod auth;
pub mod drive_client;

pub use auth::{first_token_source, token_source, AuthorizedUserAuth, ServiceAccountAuth, TokenSource};
pub use drive_client::GoogleDriveClient;
