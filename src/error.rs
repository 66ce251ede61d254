use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq)]
pub enum EffectError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("{0} is not implemented yet")]
    NotImplemented(&'static str),
}

pub type Result<T> = std::result::Result<T, EffectError>;

pub(crate) fn invalid(msg: impl Into<String>) -> EffectError {
    EffectError::InvalidArgument(msg.into())
}

pub(crate) fn check_sample_rate(sample_rate: u32) -> Result<()> {
    if sample_rate == 0 {
        return Err(invalid("sample rate must be greater than zero"));
    }
    Ok(())
}

pub(crate) fn check_samples(samples: &[f64]) -> Result<()> {
    if samples.is_empty() {
        return Err(invalid("audio buffer must hold at least one sample"));
    }
    Ok(())
}

pub(crate) fn check_seconds(name: &str, seconds: f64) -> Result<()> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(invalid(format!(
            "{name} must be a finite, non-negative number of seconds (got {seconds})"
        )));
    }
    Ok(())
}
