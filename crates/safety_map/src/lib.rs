use std::{error::Error, fmt};

use tokio::sync::{mpsc, oneshot};

pub mod client;
pub mod fixtures;
pub mod provider;
pub mod search;
pub mod settings;
pub mod shell;
pub mod view;

#[derive(Debug)]
pub enum RequestError {
    NotFound,
    InvalidView(view::ViewError),
    ShellUnavailable,
    Other(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::InvalidView(why) => write!(f, "invalid map view: {}", why),
            Self::ShellUnavailable => write!(f, "search shell is not running"),
            Self::Other(why) => write!(f, "{}", why),
        }
    }
}

impl Error for RequestError {}

impl From<provider::ProviderError> for RequestError {
    fn from(value: provider::ProviderError) -> Self {
        match value {
            provider::ProviderError::NotFound => Self::NotFound,
            provider::ProviderError::Other(why) => Self::Other(why),
        }
    }
}

impl From<view::ViewError> for RequestError {
    fn from(value: view::ViewError) -> Self {
        Self::InvalidView(value)
    }
}

impl From<mpsc::error::SendError<shell::ShellCommand>> for RequestError {
    fn from(_: mpsc::error::SendError<shell::ShellCommand>) -> Self {
        Self::ShellUnavailable
    }
}

impl From<oneshot::error::RecvError> for RequestError {
    fn from(_: oneshot::error::RecvError) -> Self {
        Self::ShellUnavailable
    }
}

pub type RequestResult<O> = Result<O, RequestError>;
