use crate::envelope::Envelope;
use crate::error::ConfigError;
use crate::traits::VectorField;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Degree of the weighted interaction term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Degree {
    /// W·x
    Linear,
    /// (W·x) ⊙ x
    Quadratic,
}

impl Degree {
    pub fn new(degree: u32) -> Result<Self, ConfigError> {
        match degree {
            1 => Ok(Degree::Linear),
            2 => Ok(Degree::Quadratic),
            _ => Err(ConfigError::UnknownDegree { got: degree }),
        }
    }
}

/// Algebraic placement of the perturbation input relative to the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Coupling {
    /// eps ⊙ φ(Σ(x) + u) − alpha ⊙ x: perturbation enters inside the nonlinearity.
    Inside,
    /// eps ⊙ (φ(Σ(x)) + u) − alpha ⊙ x: perturbation added after the nonlinearity.
    Outside,
    /// eps ⊙ φ(Σ(x)) + psi ⊙ u − alpha ⊙ x: independent per-variable coupling.
    Independent,
}

impl Coupling {
    pub fn new(form: u32) -> Result<Self, ConfigError> {
        match form {
            0 => Ok(Coupling::Inside),
            1 => Ok(Coupling::Outside),
            2 => Ok(Coupling::Independent),
            _ => Err(ConfigError::UnknownCoupling { got: form }),
        }
    }
}

/// Decay/gain coefficient, either shared by all variables or per-variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Coeff {
    Uniform(f64),
    PerNode(DVector<f64>),
}

impl Coeff {
    fn check_dim(&self, what: &'static str, n: usize) -> Result<(), ConfigError> {
        match self {
            Coeff::Uniform(_) => Ok(()),
            Coeff::PerNode(v) if v.len() == n => Ok(()),
            Coeff::PerNode(v) => Err(ConfigError::DimensionMismatch {
                what,
                expected: n,
                got: v.len(),
            }),
        }
    }

    /// Elementwise product with broadcasting: a uniform coefficient scales
    /// everything, a per-node one scales row i in every column.
    fn scale(&self, m: &DMatrix<f64>) -> DMatrix<f64> {
        match self {
            Coeff::Uniform(c) => m * *c,
            Coeff::PerNode(v) => scale_rows(v, m),
        }
    }
}

/// Multiplies row i of m by v[i] in every column.
fn scale_rows(v: &DVector<f64>, m: &DMatrix<f64>) -> DMatrix<f64> {
    let mut out = m.clone();
    for mut col in out.column_iter_mut() {
        col.component_mul_assign(v);
    }
    out
}

/// Parameter bundle for one model configuration.
///
/// Immutable for the duration of integration; a single bundle is reused
/// across many runs (one per perturbation condition).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// N×N interaction matrix.
    pub w: DMatrix<f64>,
    /// Decay rate.
    pub alpha: Coeff,
    /// Envelope gain.
    pub eps: Coeff,
    /// Per-variable perturbation coupling, only read by coupling form 2.
    pub psi: Option<DVector<f64>>,
}

impl Params {
    /// Number of biological variables N.
    pub fn dimension(&self) -> usize {
        self.w.nrows()
    }
}

/// The assembled derivative function `dx/dt = f(x, u)`.
///
/// All configuration choices are resolved to enum variants before the
/// first evaluation; `eval` itself is pure and never fails.
#[derive(Debug, Clone)]
pub struct Dynamics {
    envelope: Envelope,
    degree: Degree,
    coupling: Coupling,
    params: Params,
}

impl Dynamics {
    /// Validates the bundle against the selected forms and captures it.
    /// psi must be present when and only when form 2 asks for it.
    pub fn new(
        envelope: Envelope,
        degree: Degree,
        coupling: Coupling,
        params: Params,
    ) -> Result<Self, ConfigError> {
        let n = params.w.nrows();
        if params.w.ncols() != n {
            return Err(ConfigError::DimensionMismatch {
                what: "interaction matrix W columns",
                expected: n,
                got: params.w.ncols(),
            });
        }
        params.alpha.check_dim("alpha", n)?;
        params.eps.check_dim("eps", n)?;
        if let Some(psi) = &params.psi {
            if psi.len() != n {
                return Err(ConfigError::DimensionMismatch {
                    what: "psi",
                    expected: n,
                    got: psi.len(),
                });
            }
        } else if coupling == Coupling::Independent {
            return Err(ConfigError::MissingPsi);
        }
        Ok(Self {
            envelope,
            degree,
            coupling,
            params,
        })
    }

    pub fn envelope(&self) -> Envelope {
        self.envelope
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Weighted interaction term Σ(x).
    fn interaction(&self, x: &DMatrix<f64>) -> DMatrix<f64> {
        let wx = &self.params.w * x;
        match self.degree {
            Degree::Linear => wx,
            Degree::Quadratic => wx.component_mul(x),
        }
    }
}

impl VectorField for Dynamics {
    fn dimension(&self) -> usize {
        self.params.dimension()
    }

    fn eval(&self, x: &DMatrix<f64>, u: &DMatrix<f64>) -> DMatrix<f64> {
        let decay = self.params.alpha.scale(x);
        match self.coupling {
            Coupling::Inside => {
                let sigma = self.interaction(x) + u;
                self.params.eps.scale(&self.envelope.apply(&sigma)) - decay
            }
            Coupling::Outside => {
                let phi = self.envelope.apply(&self.interaction(x));
                self.params.eps.scale(&(phi + u)) - decay
            }
            Coupling::Independent => {
                let phi = self.envelope.apply(&self.interaction(x));
                let psi = self
                    .params
                    .psi
                    .as_ref()
                    .expect("psi presence is checked at construction");
                self.params.eps.scale(&phi) + scale_rows(psi, u) - decay
            }
        }
    }
}
