//! # Stiffness Tensors
//!
//! Fixed-size matrix types used throughout the engine, plus the few helpers
//! the calculations need on top of nalgebra: symmetry checks, 2-norm
//! condition numbers, display rounding, ABD block assembly and row-major
//! JSON serialization.
//!
//! Plane-stress tensors use the reduced (x, y, xy) ordering:
//!
//! ```text
//! { σx  }   [ Q11 Q12 Q16 ] { εx  }
//! { σy  } = [ Q12 Q22 Q26 ] { εy  }
//! { τxy }   [ Q16 Q26 Q66 ] { γxy }
//! ```

use nalgebra::{Matrix3, Matrix6, SMatrix};

/// 3×3 plane-stress stiffness (Q0, Qx, A, B, D)
pub type Tensor3 = Matrix3<f64>;

/// 6×6 laminate stiffness `[[A, B], [B, D]]`
pub type Tensor6 = Matrix6<f64>;

/// Assemble the 6×6 ABD block matrix.
pub fn assemble_abd(a: &Tensor3, b: &Tensor3, d: &Tensor3) -> Tensor6 {
    let mut abd = Tensor6::zeros();
    abd.fixed_view_mut::<3, 3>(0, 0).copy_from(a);
    abd.fixed_view_mut::<3, 3>(0, 3).copy_from(b);
    abd.fixed_view_mut::<3, 3>(3, 0).copy_from(b);
    abd.fixed_view_mut::<3, 3>(3, 3).copy_from(d);
    abd
}

/// Check symmetry relative to the largest entry of the matrix.
pub fn is_symmetric<const N: usize>(m: &SMatrix<f64, N, N>, rel_tol: f64) -> bool {
    let scale = m.amax().max(f64::MIN_POSITIVE);
    (0..N).all(|i| (0..i).all(|j| (m[(i, j)] - m[(j, i)]).abs() <= rel_tol * scale))
}

/// 2-norm condition number (ratio of extreme singular values).
///
/// Returns `f64::INFINITY` for a matrix with a zero singular value and NaN
/// when the matrix holds non-finite entries.
pub fn condition_number(m: &Tensor3) -> f64 {
    if m.iter().any(|v| !v.is_finite()) {
        return f64::NAN;
    }
    let sv = m.singular_values();
    let (max, min) = (sv.max(), sv.min());
    if min == 0.0 {
        f64::INFINITY
    } else {
        max / min
    }
}

/// Round every entry to `decimals` places (for reports).
pub fn rounded<const N: usize>(m: &SMatrix<f64, N, N>, decimals: u32) -> SMatrix<f64, N, N> {
    let factor = 10f64.powi(decimals as i32);
    // -0.0 prints as "-0.0"; adding 0.0 folds it back to +0.0
    m.map(|v| (v * factor).round() / factor + 0.0)
}

/// Serde adapter that writes square matrices as nested row arrays.
///
/// Use with `#[serde(with = "crate::tensor::rows")]`.
pub mod rows {
    use nalgebra::SMatrix;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer, const N: usize>(m: &SMatrix<f64, N, N>, serializer: S) -> Result<S::Ok, S::Error> {
        let rows: Vec<Vec<f64>> = m.row_iter().map(|r| r.iter().copied().collect()).collect();
        rows.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(deserializer: D) -> Result<SMatrix<f64, N, N>, D::Error> {
        let rows = Vec::<Vec<f64>>::deserialize(deserializer)?;
        if rows.len() != N || rows.iter().any(|r| r.len() != N) {
            return Err(D::Error::custom(format!("expected a {}x{} matrix", N, N)));
        }
        Ok(SMatrix::from_fn(|i, j| rows[i][j]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_abd_blocks() {
        let a = Tensor3::from_element(1.0);
        let b = Tensor3::from_element(2.0);
        let d = Tensor3::from_element(3.0);
        let abd = assemble_abd(&a, &b, &d);

        assert_eq!(abd[(0, 0)], 1.0);
        assert_eq!(abd[(2, 5)], 2.0);
        assert_eq!(abd[(5, 2)], 2.0);
        assert_eq!(abd[(4, 4)], 3.0);
    }

    #[test]
    fn test_is_symmetric() {
        let m = Tensor3::new(10.0, 2.0, 0.0, 2.0, 5.0, 1.0, 0.0, 1.0, 3.0);
        assert!(is_symmetric(&m, 1e-12));

        let skew = Tensor3::new(10.0, 2.0, 0.0, 2.5, 5.0, 1.0, 0.0, 1.0, 3.0);
        assert!(!is_symmetric(&skew, 1e-12));
    }

    #[test]
    fn test_condition_number() {
        let m = Tensor3::from_diagonal(&nalgebra::Vector3::new(100.0, 10.0, 1.0));
        assert!((condition_number(&m) - 100.0).abs() < 1e-9);
        assert!(condition_number(&Tensor3::zeros()).is_infinite());
    }

    #[test]
    fn test_rounded_clears_negative_zero() {
        let m = Tensor3::from_element(-1e-9);
        let r = rounded(&m, 1);
        assert_eq!(format!("{:.1}", r[(0, 0)]), "0.0");
    }

    #[test]
    fn test_rows_serialization() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Holder {
            #[serde(with = "rows")]
            m: Tensor3,
        }

        let holder = Holder {
            m: Tensor3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0),
        };
        let json = serde_json::to_string(&holder).unwrap();
        assert_eq!(json, r#"{"m":[[1.0,2.0,3.0],[4.0,5.0,6.0],[7.0,8.0,9.0]]}"#);

        let back: Holder = serde_json::from_str(&json).unwrap();
        assert_eq!(back.m, holder.m);
    }
}
