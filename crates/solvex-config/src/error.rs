use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),

    #[error("{name} has an invalid value: {value}")]
    InvalidValue { name: &'static str, value: String },
}
