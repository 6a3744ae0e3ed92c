use crate::error::ConfigError;
use crate::traits::{Stepper, VectorField};
use log::debug;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Forward Euler. One field evaluation per step, first-order accurate.
#[derive(Debug, Clone, Copy)]
pub struct Euler;

impl Stepper for Euler {
    fn step(
        &self,
        field: &impl VectorField,
        x: &DMatrix<f64>,
        u: &DMatrix<f64>,
        dt: f64,
    ) -> DMatrix<f64> {
        // x_{i+1} = x_i + dt * f(x_i)
        let k1 = field.eval(x, u);
        x + dt * k1
    }
}

/// Explicit midpoint. Two field evaluations per step, second-order accurate.
#[derive(Debug, Clone, Copy)]
pub struct Midpoint;

impl Stepper for Midpoint {
    fn step(
        &self,
        field: &impl VectorField,
        x: &DMatrix<f64>,
        u: &DMatrix<f64>,
        dt: f64,
    ) -> DMatrix<f64> {
        // k1 = f(x_i)
        let k1 = field.eval(x, u);
        // k2 = f(x_i + dt/2 * k1), evaluated at the half-step point
        let k2 = field.eval(&(x + 0.5 * dt * k1), u);
        // x_{i+1} = x_i + dt * k2
        x + dt * k2
    }
}

/// Heun's method (trapezoidal predictor-corrector). Two field evaluations
/// per step, second-order accurate; unlike Midpoint the second evaluation
/// is taken at the full Euler predictor and the two slopes are averaged.
#[derive(Debug, Clone, Copy)]
pub struct Heun;

impl Stepper for Heun {
    fn step(
        &self,
        field: &impl VectorField,
        x: &DMatrix<f64>,
        u: &DMatrix<f64>,
        dt: f64,
    ) -> DMatrix<f64> {
        // k1 = f(x_i)
        let k1 = field.eval(x, u);
        // predictor x* = x_i + dt * k1
        let predictor = x + dt * &k1;
        // k2 = f(x*)
        let k2 = field.eval(&predictor, u);
        // x_{i+1} = x_i + dt/2 * (k1 + k2)
        x + 0.5 * dt * (k1 + k2)
    }
}

/// Classic fourth-order Runge-Kutta. Four field evaluations per step.
#[derive(Debug, Clone, Copy)]
pub struct Rk4;

impl Stepper for Rk4 {
    fn step(
        &self,
        field: &impl VectorField,
        x: &DMatrix<f64>,
        u: &DMatrix<f64>,
        dt: f64,
    ) -> DMatrix<f64> {
        // k1 = f(x_i)
        let k1 = field.eval(x, u);
        // k2 = f(x_i + dt/2 * k1)
        let k2 = field.eval(&(x + 0.5 * dt * &k1), u);
        // k3 = f(x_i + dt/2 * k2)
        let k3 = field.eval(&(x + 0.5 * dt * &k2), u);
        // k4 = f(x_i + dt * k3)
        let k4 = field.eval(&(x + dt * &k3), u);
        // x_{i+1} = x_i + dt * (k1/6 + k2/3 + k3/3 + k4/6)
        x + dt / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4)
    }
}

/// Time-ordered record of one integration run.
///
/// `state(0)` is the initial state; `state(i)` is the state after i steps
/// of width `dt`. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    dt: f64,
    states: Vec<DMatrix<f64>>,
}

impl Trajectory {
    /// Number of recorded states (step count + 1).
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// State after i integration steps.
    pub fn state(&self, i: usize) -> &DMatrix<f64> {
        &self.states[i]
    }

    /// Final state of the run.
    pub fn last(&self) -> &DMatrix<f64> {
        self.states
            .last()
            .expect("a trajectory holds at least its initial state")
    }

    pub fn states(&self) -> &[DMatrix<f64>] {
        &self.states
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Time stamps aligned with the recorded states.
    pub fn times(&self) -> Vec<f64> {
        (0..self.states.len()).map(|i| i as f64 * self.dt).collect()
    }
}

/// Fixed-step solver selection. Resolved once per run, before stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Solver {
    Euler,
    Midpoint,
    Heun,
    Rk4,
}

impl Solver {
    /// Resolves a solver by name.
    pub fn new(name: &str) -> Result<Self, ConfigError> {
        match name {
            "euler" => Ok(Solver::Euler),
            "midpoint" => Ok(Solver::Midpoint),
            "heun" => Ok(Solver::Heun),
            "rk4" => Ok(Solver::Rk4),
            _ => Err(ConfigError::UnknownSolver {
                got: name.to_string(),
            }),
        }
    }

    /// Advances `x0` through `n_steps` steps of width `dt` under the fixed
    /// perturbation `u`, recording the full trajectory.
    pub fn integrate(
        &self,
        field: &impl VectorField,
        x0: &DMatrix<f64>,
        u: &DMatrix<f64>,
        dt: f64,
        n_steps: usize,
    ) -> Result<Trajectory, ConfigError> {
        match self {
            Solver::Euler => integrate(&Euler, field, x0, u, dt, n_steps),
            Solver::Midpoint => integrate(&Midpoint, field, x0, u, dt, n_steps),
            Solver::Heun => integrate(&Heun, field, x0, u, dt, n_steps),
            Solver::Rk4 => integrate(&Rk4, field, x0, u, dt, n_steps),
        }
    }
}

/// Shared step loop: every integrator advances through this driver so that
/// input validation and trajectory accumulation are written once.
pub fn integrate<S: Stepper>(
    stepper: &S,
    field: &impl VectorField,
    x0: &DMatrix<f64>,
    u: &DMatrix<f64>,
    dt: f64,
    n_steps: usize,
) -> Result<Trajectory, ConfigError> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(ConfigError::InvalidStep { got: dt });
    }
    let n = field.dimension();
    if x0.nrows() != n {
        return Err(ConfigError::DimensionMismatch {
            what: "initial state rows",
            expected: n,
            got: x0.nrows(),
        });
    }
    if u.nrows() != x0.nrows() {
        return Err(ConfigError::DimensionMismatch {
            what: "perturbation rows",
            expected: x0.nrows(),
            got: u.nrows(),
        });
    }
    if u.ncols() != x0.ncols() {
        return Err(ConfigError::DimensionMismatch {
            what: "perturbation columns",
            expected: x0.ncols(),
            got: u.ncols(),
        });
    }

    debug!(
        "integrating {} variables x {} conditions over {} steps of dt = {}",
        n,
        x0.ncols(),
        n_steps,
        dt
    );

    let mut x = x0.clone_owned();
    let mut states = Vec::with_capacity(n_steps + 1);
    states.push(x.clone());
    for _ in 0..n_steps {
        x = stepper.step(field, &x, u, dt);
        states.push(x.clone());
    }
    Ok(Trajectory { dt, states })
}
