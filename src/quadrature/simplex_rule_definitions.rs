//! Symmetric quadrature rules on the triangle.
//!
//! Rules are given in barycentric coordinates with weights summing to one.
#![allow(clippy::excessive_precision)]

use crate::quadrature::types::NumericalQuadratureDefinition;
use std::collections::HashMap;

/// Expand the orbit of a symmetric point into all its distinct permutations.
fn orbit(l: [f64; 3], weight: f64, points: &mut Vec<f64>, weights: &mut Vec<f64>) {
    let [a, b, c] = l;
    let perms: Vec<[f64; 3]> = if a == b && b == c {
        vec![[a, a, a]]
    } else if b == c {
        vec![[a, b, b], [b, a, b], [b, b, a]]
    } else {
        vec![
            [a, b, c],
            [a, c, b],
            [b, a, c],
            [b, c, a],
            [c, a, b],
            [c, b, a],
        ]
    };
    for p in perms {
        points.extend_from_slice(&p);
        weights.push(weight);
    }
}

fn rule(order: usize, degree: usize, orbits: &[([f64; 3], f64)]) -> NumericalQuadratureDefinition {
    let mut points = vec![];
    let mut weights = vec![];
    for (l, w) in orbits {
        orbit(*l, *w, &mut points, &mut weights);
    }
    NumericalQuadratureDefinition {
        order,
        degree,
        npoints: weights.len(),
        weights,
        points,
    }
}

lazy_static! {
    /// Triangle rules indexed by order.
    pub static ref SIMPLEX_RULE_DEFINITIONS: HashMap<usize, NumericalQuadratureDefinition> = {
        let mut m = HashMap::new();
        // 3 points, degree 2
        m.insert(
            0,
            rule(
                0,
                2,
                &[([2.0 / 3.0, 1.0 / 6.0, 1.0 / 6.0], 1.0 / 3.0)],
            ),
        );
        // 6 points, degree 4
        m.insert(
            1,
            rule(
                1,
                4,
                &[
                    (
                        [0.108103018168070, 0.445948490915965, 0.445948490915965],
                        0.223381589678011,
                    ),
                    (
                        [0.816847572980459, 0.091576213509771, 0.091576213509771],
                        0.109951743655322,
                    ),
                ],
            ),
        );
        // 7 points, degree 5
        m.insert(
            2,
            rule(
                2,
                5,
                &[
                    ([1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0], 0.225),
                    (
                        [0.0597158717897698, 0.47014206410511505, 0.47014206410511505],
                        0.13239415278850616,
                    ),
                    (
                        [0.7974269853530873, 0.10128650732345633, 0.10128650732345633],
                        0.12593918054482717,
                    ),
                ],
            ),
        );
        // 16 points, degree 8
        m.insert(
            3,
            rule(
                3,
                8,
                &[
                    ([1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0], 0.144315607677787),
                    (
                        [0.081414823414554, 0.459292588292723, 0.459292588292723],
                        0.095091634267285,
                    ),
                    (
                        [0.658861384496480, 0.170569307751760, 0.170569307751760],
                        0.103217370534718,
                    ),
                    (
                        [0.898905543365938, 0.050547228317031, 0.050547228317031],
                        0.032458497623198,
                    ),
                    (
                        [0.008394777409958, 0.263112829634638, 0.728492392955404],
                        0.027230314174435,
                    ),
                ],
            ),
        );
        m
    };
}
