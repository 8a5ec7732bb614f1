//! # DIFAL Commands

use margem_core::{difal, DifalInputs, DifalResult};
use tracing::debug;

use crate::error::ApiError;

/// Solves one DIFAL request.
pub fn solve_difal(inputs: &DifalInputs) -> Result<Option<DifalResult>, ApiError> {
    debug!(
        interstate_rate = inputs.interstate_rate,
        destination_rate = inputs.destination_rate,
        "solve_difal command"
    );
    Ok(difal::compute(inputs)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_base_reduction_out_of_range_is_error() {
        let err = solve_difal(&DifalInputs {
            product_value: 1000.0,
            interstate_rate: 12.0,
            destination_rate: 18.0,
            base_reduction_percent: 100.0,
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
