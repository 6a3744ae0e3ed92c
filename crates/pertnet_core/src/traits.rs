use nalgebra::DMatrix;

/// Represents the right-hand side of a perturbation-response ODE.
pub trait VectorField {
    /// Returns the number of biological variables (rows of the state).
    fn dimension(&self) -> usize;

    /// Evaluates the derivative dx/dt.
    /// x: current state, one column per condition
    /// u: perturbation input, fixed for the duration of a run
    ///
    /// Must be pure: the integrators call it several times per step with
    /// perturbed intermediate states and rely on call-order independence.
    fn eval(&self, x: &DMatrix<f64>, u: &DMatrix<f64>) -> DMatrix<f64>;
}

/// A trait for integrators that advance a state by one fixed-width step.
pub trait Stepper {
    /// Produces the state after one step of size dt.
    /// The perturbation u is held fixed across all stages of the step.
    fn step(
        &self,
        field: &impl VectorField,
        x: &DMatrix<f64>,
        u: &DMatrix<f64>,
        dt: f64,
    ) -> DMatrix<f64>;
}
