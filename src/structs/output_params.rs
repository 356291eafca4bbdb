//! # Output Params Module
//!
//! Clamp bounds applied to every element an operator writes.

use crate::enums::error::NdBinaryError;
use crate::traits::type_unions::Float;

/// # OutputParams
///
/// Lower and upper bound of the operator output.
///
/// Validated once at operator creation. Both bounds must be non-NaN and `min`
/// must be strictly below `max`. Infinite bounds are accepted and disable
/// clamping on that side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputParams<T: Float> {
    pub min: T,
    pub max: T,
}

impl<T: Float> OutputParams<T> {
    /// Constructs validated clamp bounds.
    pub fn new(min: T, max: T) -> Result<Self, NdBinaryError> {
        if min.is_nan() {
            return Err(NdBinaryError::InvalidParameter {
                message: "NaN output lower bound: lower bound must be non-NaN".into(),
            });
        }
        if max.is_nan() {
            return Err(NdBinaryError::InvalidParameter {
                message: "NaN output upper bound: upper bound must be non-NaN".into(),
            });
        }
        if min >= max {
            return Err(NdBinaryError::InvalidParameter {
                message: format!(
                    "[{:?}, {:?}] output range: lower bound must be below upper bound",
                    min, max
                ),
            });
        }
        Ok(Self { min, max })
    }

    /// Bounds that leave every finite and infinite value untouched.
    pub fn unbounded() -> Self {
        Self {
            min: T::neg_infinity(),
            max: T::infinity(),
        }
    }

    #[inline(always)]
    pub fn clamp(&self, v: T) -> T {
        v.max(self.min).min(self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_nan_bounds() {
        assert!(matches!(
            OutputParams::new(f32::NAN, 1.0),
            Err(NdBinaryError::InvalidParameter { .. })
        ));
        assert!(matches!(
            OutputParams::new(0.0f32, f32::NAN),
            Err(NdBinaryError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_range() {
        assert!(OutputParams::new(1.0f32, 1.0).is_err());
        assert!(OutputParams::new(2.0f32, -2.0).is_err());
    }

    #[test]
    fn test_clamp() {
        let p = OutputParams::new(-1.0f32, 6.0).unwrap();
        assert_eq!(p.clamp(-3.0), -1.0);
        assert_eq!(p.clamp(2.5), 2.5);
        assert_eq!(p.clamp(7.0), 6.0);

        let u = OutputParams::<f32>::unbounded();
        assert_eq!(u.clamp(f32::MAX), f32::MAX);
    }
}
