use crate::dynamics::{Coupling, Degree, Dynamics, Params};
use crate::envelope::Envelope;
use crate::error::ConfigError;
use crate::solvers::{Solver, Trajectory};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Flat construction-time option set consumed by the core.
///
/// Callers map raw arguments or files onto this struct; every field is
/// validated independently and the first invalid value aborts assembly
/// before any state vector is touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOptions {
    /// Envelope nonlinearity: "tanh", "polynomial" or "hill".
    pub envelope_form: String,
    /// Hill exponent, required by the polynomial/hill envelope.
    pub polynomial_k: Option<u32>,
    /// Interaction degree: 1 (linear) or 2 (self-multiplicative).
    pub ode_degree: u32,
    /// Perturbation coupling form: 0, 1 or 2.
    pub coupling: u32,
    /// Fixed-step integrator: "euler", "midpoint", "heun" or "rk4".
    pub solver: String,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            envelope_form: "tanh".to_string(),
            polynomial_k: None,
            ode_degree: 1,
            coupling: 0,
            solver: "heun".to_string(),
        }
    }
}

/// A fully resolved model: derivative function plus solver, ready to run.
#[derive(Debug, Clone)]
pub struct PerturbationModel {
    dynamics: Dynamics,
    solver: Solver,
}

impl PerturbationModel {
    /// Resolves every option, fails fast on the first invalid one, then
    /// assembles the derivative function around the parameter bundle.
    pub fn new(options: &ModelOptions, params: Params) -> Result<Self, ConfigError> {
        let envelope = Envelope::new(&options.envelope_form, options.polynomial_k)?;
        let degree = Degree::new(options.ode_degree)?;
        let coupling = Coupling::new(options.coupling)?;
        let solver = Solver::new(&options.solver)?;
        let dynamics = Dynamics::new(envelope, degree, coupling, params)?;
        Ok(Self { dynamics, solver })
    }

    pub fn dynamics(&self) -> &Dynamics {
        &self.dynamics
    }

    pub fn solver(&self) -> Solver {
        self.solver
    }

    /// Runs one trajectory from `x0` under the fixed perturbation `u`.
    pub fn simulate(
        &self,
        x0: &DMatrix<f64>,
        u: &DMatrix<f64>,
        dt: f64,
        n_steps: usize,
    ) -> Result<Trajectory, ConfigError> {
        self.solver.integrate(&self.dynamics, x0, u, dt, n_steps)
    }
}
