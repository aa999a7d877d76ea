//! Get rules on triangles.

use crate::quadrature::simplex_rule_definitions::SIMPLEX_RULE_DEFINITIONS;
use crate::quadrature::types::{NumericalQuadratureDefinition, QuadratureError};

/// Return the triangle rule of a given order.
///
/// Orders 0, 1, 2 and 3 use 3, 6, 7 and 16 points. If the rule does not exist an error is returned.
pub fn simplex_rule(
    order: usize,
) -> Result<&'static NumericalQuadratureDefinition, QuadratureError> {
    SIMPLEX_RULE_DEFINITIONS
        .get(&order)
        .ok_or(QuadratureError::RuleNotFound(order))
}

/// Return the orders for which triangle rules are available, in increasing order.
pub fn available_rules() -> Vec<usize> {
    let mut orders = SIMPLEX_RULE_DEFINITIONS.keys().copied().collect::<Vec<_>>();
    orders.sort_unstable();
    orders
}
