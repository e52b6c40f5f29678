use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Frequency must be between 1 and 1000 Hz (got {value}).")]
    FrequencyOutOfRange { value: u32 },
    #[error("Topic must not be empty.")]
    TopicEmpty,
    #[error("Exponential distribution requires parA > 0 (got {value}).")]
    ExponentialMeanNotPositive { value: f64 },
    #[error("Invalid exponential rate derived from parA {par_a}: {source}")]
    InvalidExponential {
        par_a: f64,
        #[source]
        source: rand_distr::ExpError,
    },
    #[error("Normal distribution requires parB (standard deviation).")]
    NormalSigmaMissing,
    #[error("Invalid normal parameters (mu {mu}, sigma {sigma}): {source}")]
    InvalidNormal {
        mu: f64,
        sigma: f64,
        #[source]
        source: rand_distr::NormalError,
    },
}
