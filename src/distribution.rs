use rand::Rng;
use rand_distr::{Distribution as _, Exp, Normal};

use crate::args::DistributionFamily;
use crate::error::ValidationError;

/// Message size distribution, selected by family tag and dispatched by match.
///
/// Immutable once constructed; each call to [`SizeDistribution::sample`]
/// draws one independent value from the underlying law.
#[derive(Debug, Clone, Copy)]
pub enum SizeDistribution {
    Exponential(Exp<f64>),
    Normal(Normal<f64>),
}

impl SizeDistribution {
    /// Builds a distribution from the configured family and parameters.
    ///
    /// For `exponential`, `par_a` is the mean message size and must be > 0;
    /// the rate is `1 / par_a`. For `normal`, `par_a` is the mean and
    /// `par_b` the standard deviation; `par_b` is required.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the parameters do not describe a
    /// valid distribution.
    pub fn from_params(
        family: DistributionFamily,
        par_a: f64,
        par_b: Option<f64>,
    ) -> Result<Self, ValidationError> {
        match family {
            DistributionFamily::Exponential => {
                if !par_a.is_finite() || par_a <= 0.0 {
                    return Err(ValidationError::ExponentialMeanNotPositive { value: par_a });
                }
                let dist = Exp::new(1.0 / par_a)
                    .map_err(|source| ValidationError::InvalidExponential { par_a, source })?;
                Ok(Self::Exponential(dist))
            }
            DistributionFamily::Normal => {
                let sigma = par_b.ok_or(ValidationError::NormalSigmaMissing)?;
                let dist = Normal::new(par_a, sigma).map_err(|source| {
                    ValidationError::InvalidNormal {
                        mu: par_a,
                        sigma,
                        source,
                    }
                })?;
                Ok(Self::Normal(dist))
            }
        }
    }

    pub fn family(&self) -> &'static str {
        match self {
            Self::Exponential(_) => "exponential",
            Self::Normal(_) => "normal",
        }
    }

    /// Draws one message size in bytes.
    ///
    /// Raw samples are truncated toward zero; negative normal samples clamp
    /// to zero, so the result is always a valid buffer length.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let raw = match self {
            Self::Exponential(dist) => dist.sample(rng),
            Self::Normal(dist) => dist.sample(rng),
        };
        if raw < 0.0 { 0 } else { raw as usize }
    }
}
