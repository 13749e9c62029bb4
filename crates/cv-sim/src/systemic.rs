//! TransientModel implementation for the nonlinear systemic circulation.

use crate::error::SimResult;
use crate::model::TransientModel;
use cv_model::{State3, SystemicModel};

impl TransientModel for SystemicModel {
    type State = State3;

    fn rhs(&self, t: f64, x: &State3) -> SimResult<State3> {
        Ok(SystemicModel::rhs(self, t, x)?)
    }

    fn add(&self, a: &State3, b: &State3) -> State3 {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    fn scale(&self, a: &State3, s: f64) -> State3 {
        [s * a[0], s * a[1], s * a[2]]
    }

    fn error_norm(&self, err: &State3, y0: &State3, y1: &State3, rtol: f64, atol: f64) -> f64 {
        let mut sum = 0.0;
        for i in 0..3 {
            let sc = atol + rtol * y0[i].abs().max(y1[i].abs());
            let e = err[i] / sc;
            sum += e * e;
        }
        (sum / 3.0).sqrt()
    }
}
