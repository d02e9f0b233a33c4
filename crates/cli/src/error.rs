//! Error types for dsuctl CLI

use cemuhook_udp_client::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Server did not respond: {0}")]
    NoResponse(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoResponse(_) => 2,
            Self::InvalidConfiguration(_) => 3,
            Self::Client(error) => client_exit_code(error),
        }
    }
}

fn client_exit_code(error: &ClientError) -> i32 {
    match error {
        ClientError::Timeout(_) => 2,
        ClientError::InvalidConfig(_) | ClientError::InvalidHost { .. } | ClientError::Yaml(_) => 3,
        _ => 1,
    }
}

/// Process exit code for an error returned by a command.
pub fn exit_code(error: &anyhow::Error) -> i32 {
    if let Some(cli) = error.downcast_ref::<CliError>() {
        return cli.exit_code();
    }
    error.downcast_ref::<ClientError>().map_or(1, client_exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn exit_codes_by_kind() {
        assert_eq!(CliError::NoResponse("x".to_string()).exit_code(), 2);
        assert_eq!(CliError::InvalidConfiguration("x".to_string()).exit_code(), 3);
        assert_eq!(
            CliError::Client(ClientError::Timeout(Duration::from_secs(1))).exit_code(),
            2
        );

        let io = anyhow::Error::new(std::io::Error::other("boom"));
        assert_eq!(exit_code(&io), 1);

        let unreadable = anyhow::Error::new(std::io::Error::other("missing"))
            .context("Failed to read configuration file client.yaml");
        assert_eq!(exit_code(&unreadable), 1);

        let client = anyhow::Error::new(ClientError::InvalidConfig("port".to_string()));
        assert_eq!(exit_code(&client), 3);
    }
}
