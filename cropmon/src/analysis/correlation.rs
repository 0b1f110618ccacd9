/// Correlation between weather variables and yield category.
///
/// Yield categories are encoded ordinally (Poor 0, Moderate 1, Good 2) so
/// that a Pearson coefficient against the raw variables is meaningful. The
/// matrix is always computed whole; there is no partially-defined result.
///
/// Undefined cases are returned as `CorrelationError`, never as NaN or
/// zero-filled cells:
///   fewer than 2 observations  →  `TooFewObservations`
///   any constant column        →  `ZeroVariance`
///   a coefficient not finite   →  `NonFiniteCoefficient`

use serde::Serialize;

use crate::logging::{self, Component};
use crate::model::{ClassifiedObservation, CorrelationError, Variable};

const N: usize = Variable::ALL.len();

/// Symmetric 4×4 Pearson correlation matrix with unit diagonal, indexed in
/// `Variable::ALL` order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    variables: [Variable; N],
    values: [[f64; N]; N],
}

impl CorrelationMatrix {
    pub fn get(&self, a: Variable, b: Variable) -> f64 {
        self.values[a.index()][b.index()]
    }

    /// Correlations of `variable` with every column, in column order.
    pub fn row(&self, variable: Variable) -> &[f64; N] {
        &self.values[variable.index()]
    }

    pub fn variables(&self) -> &[Variable; N] {
        &self.variables
    }

    pub fn values(&self) -> &[[f64; N]; N] {
        &self.values
    }
}

/// Builds the column table: one column per variable, one row per observation.
fn columns(observations: &[ClassifiedObservation]) -> [Vec<f64>; N] {
    Variable::ALL.map(|variable| observations.iter().map(|o| o.value(variable)).collect())
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Divides a column by its largest magnitude so every value lies in
/// [-1, 1]. Pearson is scale-invariant, and the sums below stay finite for
/// any finite input.
fn normalized(values: &[f64]) -> Vec<f64> {
    let scale = values.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if scale == 0.0 {
        return values.to_vec();
    }
    values.iter().map(|v| v / scale).collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Pearson coefficient of two equal-length, normalized, non-constant
/// columns. `None` if the result is not a finite number.
fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let mean_x = mean(x);
    let mean_y = mean(y);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (&a, &b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let r = sxy / (sxx * syy).sqrt();
    // Rounding can push |r| a hair past 1.
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Computes the correlation matrix over temperature, humidity,
/// precipitation and the encoded yield category.
pub fn correlate(
    observations: &[ClassifiedObservation],
) -> Result<CorrelationMatrix, CorrelationError> {
    let result = correlate_columns(observations);

    if let Err(ref err) = result {
        logging::warn(Component::Correlation, None, &err.to_string());
    }

    result
}

fn correlate_columns(
    observations: &[ClassifiedObservation],
) -> Result<CorrelationMatrix, CorrelationError> {
    if observations.len() < 2 {
        return Err(CorrelationError::TooFewObservations {
            observations: observations.len(),
        });
    }

    let columns = columns(observations);

    let constant: Vec<Variable> = Variable::ALL
        .into_iter()
        .filter(|v| is_constant(&columns[v.index()]))
        .collect();
    if !constant.is_empty() {
        return Err(CorrelationError::ZeroVariance { variables: constant });
    }

    let scaled = columns.each_ref().map(|column| normalized(column));

    let mut values = [[0.0; N]; N];
    for i in 0..N {
        values[i][i] = 1.0;
        for j in (i + 1)..N {
            let r = pearson(&scaled[i], &scaled[j]).ok_or(CorrelationError::NonFiniteCoefficient {
                a: Variable::ALL[i],
                b: Variable::ALL[j],
            })?;
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        variables: Variable::ALL,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::DEFAULT_BANDS;
    use crate::classify::classify_observation;
    use crate::model::Observation;

    fn classified(t: f64, h: f64, p: f64) -> ClassifiedObservation {
        classify_observation(&DEFAULT_BANDS, &Observation::new("A", t, h, p))
            .expect("complete observation should classify")
    }

    fn sample() -> Vec<ClassifiedObservation> {
        vec![
            classified(22.0, 60.0, 10.0),  // Good
            classified(35.0, 90.0, 20.0),  // Poor
            classified(16.0, 45.0, 7.5),   // Moderate
            classified(28.0, 70.0, 12.0),  // Good
            classified(5.0, 20.0, 0.0),    // Poor
        ]
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_diagonal_is_one() {
        let matrix = correlate(&sample()).expect("sample has variance in every column");
        for v in Variable::ALL {
            assert_eq!(matrix.get(v, v), 1.0);
        }
    }

    #[test]
    fn test_matrix_is_symmetric_and_bounded() {
        let matrix = correlate(&sample()).unwrap();
        for a in Variable::ALL {
            for b in Variable::ALL {
                let r = matrix.get(a, b);
                assert_eq!(r, matrix.get(b, a));
                assert!((-1.0..=1.0).contains(&r), "{} vs {} = {}", a, b, r);
            }
        }
    }

    #[test]
    fn test_perfectly_linear_columns() {
        // humidity = 2 * temperature + 10, precipitation = 40 - temperature
        let observations = vec![
            classified(20.0, 50.0, 20.0),
            classified(25.0, 60.0, 15.0),
            classified(30.0, 70.0, 10.0),
            classified(10.0, 30.0, 30.0),
        ];
        let matrix = correlate(&observations).unwrap();

        assert_close(matrix.get(Variable::TemperatureC, Variable::HumidityPct), 1.0);
        assert_close(matrix.get(Variable::TemperatureC, Variable::PrecipitationMm), -1.0);
    }

    #[test]
    fn test_known_coefficient_against_category() {
        // temperature [22, 35, 16] vs encoded [2, 0, 1]
        let observations = vec![
            classified(22.0, 60.0, 10.0),
            classified(35.0, 90.0, 20.0),
            classified(16.0, 45.0, 7.5),
        ];
        let matrix = correlate(&observations).unwrap();

        // mean t = 24.333.., mean c = 1
        // sxy = (-2.333*1) + (10.667*-1) + (-8.333*0) = -13
        // sxx = 5.444 + 113.778 + 69.444 = 188.667, syy = 2
        let expected = -13.0 / (188.666_666_666_666_66_f64 * 2.0).sqrt();
        assert_close(matrix.get(Variable::TemperatureC, Variable::EncodedCategory), expected);
    }

    #[test]
    fn test_extreme_finite_values_do_not_overflow() {
        // Raw sums of squares over +/-1e200 exceed f64::MAX.
        let observations = vec![
            classified(1e200, 1e200, 10.0),
            classified(-1e200, -1e200, 10.0),
            classified(22.0, 61.0, 10.0),
            classified(17.0, 45.0, 7.5),
        ];
        let matrix = correlate(&observations).expect("finite input should give a matrix");

        for a in Variable::ALL {
            for b in Variable::ALL {
                let r = matrix.get(a, b);
                assert!(r.is_finite(), "{} vs {} = {}", a, b, r);
                assert!((-1.0..=1.0).contains(&r), "{} vs {} = {}", a, b, r);
            }
        }
        assert_close(matrix.get(Variable::TemperatureC, Variable::HumidityPct), 1.0);
    }

    #[test]
    fn test_normalized_column_stays_in_unit_range() {
        let scaled = normalized(&[f64::MAX, -f64::MAX, 1.0]);
        assert_eq!(scaled[0], 1.0);
        assert_eq!(scaled[1], -1.0);
        assert!(scaled[2].abs() <= 1.0);
    }

    #[test]
    fn test_single_observation_is_insufficient() {
        let result = correlate(&[classified(22.0, 60.0, 10.0)]);
        assert_eq!(result, Err(CorrelationError::TooFewObservations { observations: 1 }));
    }

    #[test]
    fn test_empty_input_is_insufficient() {
        assert_eq!(
            correlate(&[]),
            Err(CorrelationError::TooFewObservations { observations: 0 })
        );
    }

    #[test]
    fn test_constant_category_is_zero_variance() {
        // All Poor: the encoded column never varies.
        let observations = vec![
            classified(35.0, 90.0, 20.0),
            classified(5.0, 20.0, 0.0),
            classified(-3.0, 95.0, 50.0),
        ];
        assert_eq!(
            correlate(&observations),
            Err(CorrelationError::ZeroVariance {
                variables: vec![Variable::EncodedCategory],
            })
        );
    }

    #[test]
    fn test_every_constant_column_is_reported() {
        let observations = vec![
            classified(22.0, 60.0, 10.0),
            classified(22.0, 60.0, 10.0),
        ];
        assert_eq!(
            correlate(&observations),
            Err(CorrelationError::ZeroVariance {
                variables: Variable::ALL.to_vec(),
            })
        );
    }
}
