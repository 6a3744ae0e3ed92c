use thiserror::Error;

/// Errors raised while resolving a model configuration.
///
/// Every variant is detected at construction time, before any numerical
/// work starts; the per-step loop itself never fails. An invalid
/// configuration is a caller error, so there is no recovery path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown envelope form \"{got}\"; choose from [tanh, polynomial, hill]")]
    UnknownEnvelope { got: String },

    #[error("envelope form \"{form}\" requires polynomial_k")]
    MissingPolynomialK { form: String },

    #[error("unknown ODE degree {got}; choose from [1, 2]")]
    UnknownDegree { got: u32 },

    #[error("unknown coupling form {got}; choose from [0, 1, 2]")]
    UnknownCoupling { got: u32 },

    #[error("unknown solver \"{got}\"; choose from [euler, midpoint, heun, rk4]")]
    UnknownSolver { got: String },

    #[error("coupling form 2 requires psi in the parameter bundle")]
    MissingPsi,

    #[error("dimension mismatch for {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("step width must be positive and finite, got {got}")]
    InvalidStep { got: f64 },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
