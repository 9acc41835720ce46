use thiserror::Error;

use tn_network::NetworkError;

#[derive(Debug, Error)]
pub enum GaError {
    #[error("route generation exhausted after {attempts} attempts")]
    RouteGenerationExhausted { attempts: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl From<tn_core::CoreError> for GaError {
    fn from(e: tn_core::CoreError) -> Self {
        match e {
            tn_core::CoreError::Config(msg) => GaError::Config(msg),
        }
    }
}

pub type GaResult<T> = Result<T, GaError>;
