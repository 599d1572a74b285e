use thiserror::Error;

/// Error surface for the session listener.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("session listener task join failure: {0}")]
    Join(#[from] tokio::task::JoinError),
}
