use nalgebra as na;
use na::Complex;

use crate::error::{check_shape, ControlError};

pub fn eigenvalues(mat_a: &na::DMatrix<f64>) -> Vec<Complex<f64>> {
    if mat_a.nrows() == 0 {
        return Vec::new();
    }
    mat_a.complex_eigenvalues().iter().cloned().collect()
}

/// Eigenpairs of a real square matrix. Each eigenvector has unit norm and
/// spans the (numerical) null space of `A - lambda I`.
pub fn eigenvectors(
    mat_a: &na::DMatrix<f64>,
) -> Result<Vec<(Complex<f64>, na::DVector<Complex<f64>>)>, ControlError> {
    let n = mat_a.nrows();
    check_shape("state matrix A", mat_a.shape(), (n, n))?;

    let mat_ac = mat_a.map(|v| Complex::new(v, 0.0));
    let mut pairs = Vec::with_capacity(n);
    for lambda in eigenvalues(mat_a) {
        let shifted = &mat_ac - na::DMatrix::<Complex<f64>>::identity(n, n) * lambda;
        let svd = shifted.svd(false, true);
        let v_t = svd
            .v_t
            .ok_or(ControlError::Singular("eigenvector decomposition"))?;
        let (idx, _) = svd
            .singular_values
            .iter()
            .enumerate()
            .fold((0, f64::INFINITY), |best, (i, &s)| {
                if s < best.1 {
                    (i, s)
                } else {
                    best
                }
            });
        let vector: na::DVector<Complex<f64>> = v_t.row(idx).transpose().map(|c| c.conj());
        let norm = vector.norm();
        pairs.push((lambda, vector.unscale(norm)));
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn eigenpairs_satisfy_definition() {
        let mat_a = na::dmatrix![-2.0, 0.0; 3.0, 1.0];
        let mat_ac = mat_a.map(|v| Complex::new(v, 0.0));
        for (lambda, v) in eigenvectors(&mat_a).unwrap() {
            let residual = &mat_ac * &v - v.clone() * lambda;
            assert!(residual.norm() < 1e-9);
            assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn rotation_has_complex_pair() {
        let mat_a = na::dmatrix![1.0, 3.0; -3.0, 1.0];
        let mut values = eigenvalues(&mat_a);
        values.sort_by(|a, b| a.im.total_cmp(&b.im));
        assert_relative_eq!(values[0].re, 1.0, epsilon = 1e-10);
        assert_relative_eq!(values[0].im, -3.0, epsilon = 1e-10);
        assert_relative_eq!(values[1].im, 3.0, epsilon = 1e-10);
    }
}
