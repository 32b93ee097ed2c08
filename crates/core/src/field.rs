//! Per-pixel display values for one rendered view.
//!
//! A `Field` stores `width * height` f64 values in [0, 1] in row-major order,
//! row 0 at the top of the canvas.

use crate::error::WaveError;

/// A 2D grid of display values clamped to [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Field {
    /// Creates a zero-filled field of the given dimensions.
    ///
    /// Returns `WaveError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, WaveError> {
        Self::filled(width, height, 0.0)
    }

    /// Creates a field filled with `value`, clamped to [0, 1].
    pub fn filled(width: usize, height: usize, value: f64) -> Result<Self, WaveError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![value.clamp(0.0, 1.0); len],
        })
    }

    /// Creates a field from a pre-built data vector, validating that
    /// `data.len() == width * height`.
    ///
    /// Values are **not** clamped; the caller is responsible for ensuring
    /// they lie in [0, 1].
    pub fn from_data(width: usize, height: usize, data: Vec<f64>) -> Result<Self, WaveError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(WaveError::DimensionMismatch {
                lhs_w: width,
                lhs_h: height,
                rhs_w: data.len(),
                rhs_h: 1,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Field width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the underlying row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }
}

fn checked_len(width: usize, height: usize) -> Result<usize, WaveError> {
    if width == 0 || height == 0 {
        return Err(WaveError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(WaveError::InvalidDimensions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_zero_filled_field() {
        let field = Field::new(4, 3).unwrap();
        assert_eq!(field.width(), 4);
        assert_eq!(field.height(), 3);
        assert_eq!(field.data().len(), 12);
        assert!(field.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn new_with_zero_dimension_returns_error() {
        assert!(matches!(Field::new(0, 5), Err(WaveError::InvalidDimensions)));
        assert!(matches!(Field::new(5, 0), Err(WaveError::InvalidDimensions)));
    }

    #[test]
    fn new_with_overflow_dimensions_returns_error() {
        assert!(Field::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn filled_clamps_value() {
        let high = Field::filled(2, 2, 1.5).unwrap();
        assert!(high.data().iter().all(|&v| v == 1.0));
        let low = Field::filled(2, 2, -0.3).unwrap();
        assert!(low.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn from_data_rejects_wrong_length() {
        assert!(Field::from_data(2, 2, vec![0.1, 0.2, 0.3]).is_err());
        assert!(Field::from_data(0, 5, vec![]).is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn dimension() -> impl Strategy<Value = usize> {
            1_usize..=64
        }

        proptest! {
            #[test]
            fn filled_clamps_any_value(
                w in dimension(),
                h in dimension(),
                v in prop::num::f64::ANY.prop_filter("must not be NaN", |v| !v.is_nan()),
            ) {
                let field = Field::filled(w, h, v).unwrap();
                prop_assert_eq!(field.data().len(), w * h);
                prop_assert!(field.data().iter().all(|&x| x == v.clamp(0.0, 1.0)));
            }

            #[test]
            fn from_data_accepts_exactly_width_times_height(
                w in dimension(),
                h in dimension(),
                extra in 0_usize..3,
            ) {
                let result = Field::from_data(w, h, vec![0.5; w * h + extra]);
                prop_assert_eq!(result.is_ok(), extra == 0);
            }
        }
    }
}
