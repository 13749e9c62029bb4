//! Time integrators: classical RK4 and the Dormand-Prince 4(5) pair.

use crate::error::SimResult;
use crate::model::TransientModel;

/// Trait for single-step time integrators.
pub trait Integrator {
    /// Advance state by one time step using the transient model.
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State>;
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
///
/// Fixed step, no error estimate; the caller's grid must resolve the fastest
/// time scale of the system.
#[derive(Clone, Debug)]
pub struct RK4;

impl Integrator for RK4 {
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let k1 = model.rhs(t, x)?;

        let x2 = model.add(x, &model.scale(&k1, 0.5 * dt));
        let k2 = model.rhs(t + 0.5 * dt, &x2)?;

        let x3 = model.add(x, &model.scale(&k2, 0.5 * dt));
        let k3 = model.rhs(t + 0.5 * dt, &x3)?;

        let x4 = model.add(x, &model.scale(&k3, dt));
        let k4 = model.rhs(t + dt, &x4)?;

        // Combine: x_new = x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
        let k_sum = model.add(
            &model.add(&k1, &model.scale(&k2, 2.0)),
            &model.add(&model.scale(&k3, 2.0), &k4),
        );

        Ok(model.add(x, &model.scale(&k_sum, dt / 6.0)))
    }
}

// Dormand-Prince coefficients
const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// 4th-order weights (embedded, for the error estimate)
const B1: f64 = 5179.0 / 57600.0;
const B3: f64 = 7571.0 / 16695.0;
const B4: f64 = 393.0 / 640.0;
const B5: f64 = -92097.0 / 339200.0;
const B6: f64 = 187.0 / 2100.0;
const B7: f64 = 1.0 / 40.0;

// 5th-order weights (advancing solution, local extrapolation)
const BH1: f64 = 35.0 / 384.0;
const BH3: f64 = 500.0 / 1113.0;
const BH4: f64 = 125.0 / 192.0;
const BH5: f64 = -2187.0 / 6784.0;
const BH6: f64 = 11.0 / 84.0;

// Error weights: y5 - y4
const E1: f64 = BH1 - B1;
const E3: f64 = BH3 - B3;
const E4: f64 = BH4 - B4;
const E5: f64 = BH5 - B5;
const E6: f64 = BH6 - B6;
const E7: f64 = -B7;

/// Dormand-Prince embedded 4(5) pair.
///
/// Each step returns the 5th-order solution together with the scaled norm of
/// the 4th/5th-order difference; a norm <= 1 means the step meets the
/// requested tolerances.
#[derive(Clone, Debug)]
pub struct DormandPrince45;

impl DormandPrince45 {
    pub fn step_with_error<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        h: f64,
        rtol: f64,
        atol: f64,
    ) -> SimResult<(M::State, f64)> {
        let k1 = model.rhs(t, x)?;

        let y2 = model.add(x, &model.scale(&k1, h * A21));
        let k2 = model.rhs(t + h / 5.0, &y2)?;

        let mut acc = model.scale(&k1, A31);
        acc = model.add(&acc, &model.scale(&k2, A32));
        let y3 = model.add(x, &model.scale(&acc, h));
        let k3 = model.rhs(t + 3.0 * h / 10.0, &y3)?;

        let mut acc = model.scale(&k1, A41);
        acc = model.add(&acc, &model.scale(&k2, A42));
        acc = model.add(&acc, &model.scale(&k3, A43));
        let y4 = model.add(x, &model.scale(&acc, h));
        let k4 = model.rhs(t + 4.0 * h / 5.0, &y4)?;

        let mut acc = model.scale(&k1, A51);
        acc = model.add(&acc, &model.scale(&k2, A52));
        acc = model.add(&acc, &model.scale(&k3, A53));
        acc = model.add(&acc, &model.scale(&k4, A54));
        let y5 = model.add(x, &model.scale(&acc, h));
        let k5 = model.rhs(t + 8.0 * h / 9.0, &y5)?;

        let mut acc = model.scale(&k1, A61);
        acc = model.add(&acc, &model.scale(&k2, A62));
        acc = model.add(&acc, &model.scale(&k3, A63));
        acc = model.add(&acc, &model.scale(&k4, A64));
        acc = model.add(&acc, &model.scale(&k5, A65));
        let y6 = model.add(x, &model.scale(&acc, h));
        let k6 = model.rhs(t + h, &y6)?;

        // 5th-order solution
        let mut acc = model.scale(&k1, BH1);
        acc = model.add(&acc, &model.scale(&k3, BH3));
        acc = model.add(&acc, &model.scale(&k4, BH4));
        acc = model.add(&acc, &model.scale(&k5, BH5));
        acc = model.add(&acc, &model.scale(&k6, BH6));
        let y_new = model.add(x, &model.scale(&acc, h));

        // Stage 7 for the error estimate
        let k7 = model.rhs(t + h, &y_new)?;

        let mut acc = model.scale(&k1, E1);
        acc = model.add(&acc, &model.scale(&k3, E3));
        acc = model.add(&acc, &model.scale(&k4, E4));
        acc = model.add(&acc, &model.scale(&k5, E5));
        acc = model.add(&acc, &model.scale(&k6, E6));
        acc = model.add(&acc, &model.scale(&k7, E7));
        let err = model.scale(&acc, h);

        let err_norm = model.error_norm(&err, x, &y_new, rtol, atol);
        Ok((y_new, err_norm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimResult;
    use crate::model::TransientModel;

    /// dx/dt = -x, exact solution x(t) = x0 * exp(-t).
    struct Decay;

    impl TransientModel for Decay {
        type State = [f64; 1];

        fn rhs(&self, _t: f64, x: &Self::State) -> SimResult<Self::State> {
            Ok([-x[0]])
        }

        fn add(&self, a: &Self::State, b: &Self::State) -> Self::State {
            [a[0] + b[0]]
        }

        fn scale(&self, a: &Self::State, s: f64) -> Self::State {
            [s * a[0]]
        }

        fn error_norm(
            &self,
            err: &Self::State,
            y0: &Self::State,
            y1: &Self::State,
            rtol: f64,
            atol: f64,
        ) -> f64 {
            let sc = atol + rtol * y0[0].abs().max(y1[0].abs());
            (err[0] / sc).abs()
        }
    }

    #[test]
    fn rk4_matches_exponential_decay() {
        let model = Decay;
        let mut x = [1.0];
        let dt = 0.01;
        for i in 0..100 {
            x = RK4.step(&model, i as f64 * dt, &x, dt).unwrap();
        }
        let exact = (-1.0_f64).exp();
        assert!((x[0] - exact).abs() < 1e-8, "x={} exact={}", x[0], exact);
    }

    #[test]
    fn dp45_step_is_accurate_and_reports_small_error() {
        let model = Decay;
        let (y, err) = DormandPrince45
            .step_with_error(&model, 0.0, &[1.0], 0.1, 1e-6, 1e-9)
            .unwrap();
        let exact = (-0.1_f64).exp();
        assert!((y[0] - exact).abs() < 1e-9);
        assert!(err < 1.0, "step should be acceptable, err={err}");
    }

    #[test]
    fn dp45_flags_too_large_steps() {
        let model = Decay;
        let (_, err) = DormandPrince45
            .step_with_error(&model, 0.0, &[1.0], 2.5, 1e-12, 1e-14)
            .unwrap();
        assert!(err > 1.0, "a 2.5s step at 1e-12 rtol must be rejected, err={err}");
    }
}
