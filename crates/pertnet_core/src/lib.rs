//! The `pertnet_core` crate provides the numerical engine for modeling the
//! response of a biological network to external perturbations.
//!
//! Key components:
//! - **Traits**: `VectorField` (derivative evaluation), `Stepper` (fixed-step integrators).
//! - **Envelope**: saturating elementwise nonlinearities (tanh, Hill).
//! - **Dynamics**: interaction term, coupling form and parameter bundle assembled into `dx/dt = f(x, u)`.
//! - **Solvers**: Euler, Midpoint, Heun and RK4 steppers with full trajectory recording.
//! - **Config**: the flat option set consumed by callers, resolved fail-fast into typed selectors.

pub mod config;
pub mod dynamics;
pub mod envelope;
pub mod error;
pub mod solvers;
pub mod traits;
