use crate::error::ConfigError;
use nalgebra::DMatrix;
use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Saturating nonlinearity applied elementwise inside the dynamics.
///
/// Selected once at construction; the same envelope is applied at every
/// step and every Runge-Kutta stage of a run. Holds no mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Envelope {
    /// Hyperbolic tangent.
    Tanh,
    /// Hill-type rational saturation with integer exponent k.
    Hill { k: u32 },
}

impl Envelope {
    /// Resolves an envelope form by name. `k` is required by the
    /// polynomial/Hill forms and ignored by tanh.
    pub fn new(form: &str, k: Option<u32>) -> Result<Self, ConfigError> {
        match form {
            "tanh" => Ok(Envelope::Tanh),
            "polynomial" | "hill" => match k {
                Some(k) => Ok(Envelope::Hill { k }),
                None => Err(ConfigError::MissingPolynomialK {
                    form: form.to_string(),
                }),
            },
            _ => Err(ConfigError::UnknownEnvelope {
                got: form.to_string(),
            }),
        }
    }

    /// Evaluates the envelope at a single scalar.
    pub fn eval<T: Float>(&self, x: T) -> T {
        match *self {
            Envelope::Tanh => x.tanh(),
            Envelope::Hill { k } => {
                let p = k as i32;
                if k % 2 == 1 {
                    // x^k / (1 + |x|^k), odd-symmetric, saturates to ±1.
                    x.powi(p) / (T::one() + x.abs().powi(p))
                } else {
                    // An even power forgets the sign of x; restore it so the
                    // response stays odd-symmetric around zero.
                    x.signum() * x.powi(p) / (T::one() + x.powi(p))
                }
            }
        }
    }

    /// Applies the envelope entrywise.
    pub fn apply(&self, m: &DMatrix<f64>) -> DMatrix<f64> {
        m.map(|v| self.eval(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn tanh_form_matches_std_tanh() {
        let env = Envelope::new("tanh", None).unwrap();
        for x in [-3.0, -0.5, 0.0, 0.5, 3.0] {
            assert_relative_eq!(env.eval(x), f64::tanh(x));
        }
    }

    #[test]
    fn odd_hill_is_odd_symmetric() {
        let env = Envelope::new("hill", Some(3)).unwrap();
        for x in [0.0, 0.1, 0.9, 2.0, 17.5] {
            assert_relative_eq!(env.eval(-x), -env.eval(x));
        }
    }

    #[test]
    fn even_hill_keeps_the_sign_of_its_input() {
        let env = Envelope::new("polynomial", Some(2)).unwrap();
        assert!(env.eval(-2.0) < 0.0);
        assert!(env.eval(2.0) > 0.0);
        for x in [0.25, 1.0, 4.0] {
            assert_relative_eq!(env.eval(-x), -env.eval(x));
        }
    }

    #[test]
    fn hill_magnitude_is_bounded_by_one() {
        for k in [1, 2, 3, 4] {
            let env = Envelope::Hill { k };
            for x in [-40.0, -2.5, -0.3, 0.3, 2.5, 40.0] {
                assert!(env.eval(x).abs() < 1.0, "k={} x={}", k, x);
            }
            // Approaches 1 from below for large inputs.
            assert!(env.eval(1e3) > 1.0 - 1.1e-3);
            assert!(env.eval(1e3) < 1.0);
        }
    }

    #[test]
    fn hill_exponent_one_matches_closed_form() {
        let env = Envelope::Hill { k: 1 };
        assert_relative_eq!(env.eval(1.0), 0.5);
        assert_relative_eq!(env.eval(3.0), 0.75);
        assert_relative_eq!(env.eval(-1.0), -0.5);
    }

    #[test]
    fn unknown_form_is_rejected() {
        let err = Envelope::new("quadratic", None).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownEnvelope {
                got: "quadratic".to_string()
            }
        );
    }

    #[test]
    fn hill_without_exponent_is_rejected() {
        let err = Envelope::new("polynomial", None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPolynomialK { .. }));
    }

    #[test]
    fn apply_maps_every_entry() {
        let env = Envelope::Tanh;
        let m = nalgebra::DMatrix::from_row_slice(2, 2, &[-1.0, 0.0, 0.5, 2.0]);
        let out = env.apply(&m);
        for i in 0..2 {
            for j in 0..2 {
                assert_relative_eq!(out[(i, j)], f64::tanh(m[(i, j)]));
            }
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn hill_is_odd_symmetric_for_any_exponent(x in -50.0_f64..50.0, k in 1_u32..6) {
            let env = Envelope::Hill { k };
            prop_assert!((env.eval(-x) + env.eval(x)).abs() < 1e-12);
        }

        #[test]
        fn hill_magnitude_stays_below_one(x in -1e3_f64..1e3, k in 1_u32..6) {
            let env = Envelope::Hill { k };
            prop_assert!(env.eval(x).abs() < 1.0);
        }

        #[test]
        fn tanh_is_odd_symmetric(x in -50.0_f64..50.0) {
            let env = Envelope::Tanh;
            prop_assert!((env.eval(-x) + env.eval(x)).abs() < 1e-12);
        }
    }
}
