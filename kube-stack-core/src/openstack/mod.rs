use reqwest::StatusCode;
use thiserror::Error;

pub mod compute;
pub mod identity;
pub mod network;
pub mod session;

pub use session::Session;

#[derive(Debug, Error)]
pub enum OpenStackError {
    #[error("Request to {} failed: {}", .0, .1)]
    Transport(String, reqwest::Error),
    #[error("Couldn't decode the response from {}: {}", .0, .1)]
    Decode(String, reqwest::Error),
    #[error("{} responded with {}: {}", .0, .1, .2)]
    UnexpectedStatus(String, StatusCode, String),
    #[error("Authentication against {} failed: {}", .0, .1)]
    Unauthorized(String, String),
    #[error("Keystone response didn't contain a token!")]
    MissingToken,
    #[error("No '{service}' endpoint with '{interface}' interface{} in the service catalog!", region_suffix(.region))]
    MissingEndpoint {
        service: String,
        interface: String,
        region: Option<String>,
    },
    #[error("{} '{}' was not found!", .0, .1)]
    NotFound(&'static str, String),
}

fn region_suffix(region: &Option<String>) -> String {
    region
        .as_ref()
        .map(|region| format!(" in region '{region}'"))
        .unwrap_or_default()
}
