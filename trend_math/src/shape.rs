//! Shape of a series: local peaks and troughs

use serde::{Deserialize, Serialize};

/// Whether a turning point is a local maximum or minimum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurningKind {
    Peak,
    Trough,
}

/// A local extremum in a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurningPoint {
    /// Index of the extremum. For a plateau this is its last index.
    pub index: usize,
    pub kind: TurningKind,
}

/// Find interior local maxima and minima.
///
/// Runs of equal values are collapsed, so a flat top counts once. The first
/// and last values are never turning points.
pub fn turning_points(values: &[f64]) -> Vec<TurningPoint> {
    let mut points = Vec::new();
    // direction of the last non-flat move: 1 up, -1 down, 0 none yet
    let mut direction = 0i8;

    for i in 1..values.len() {
        let step = values[i] - values[i - 1];
        let current = if step > 0.0 {
            1
        } else if step < 0.0 {
            -1
        } else {
            0
        };

        if current == 0 {
            continue;
        }

        if direction != 0 && current != direction {
            points.push(TurningPoint {
                index: i - 1,
                kind: if direction > 0 {
                    TurningKind::Peak
                } else {
                    TurningKind::Trough
                },
            });
        }
        direction = current;
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotone_series_has_no_turns() {
        assert!(turning_points(&[1.0, 2.0, 3.0, 4.0]).is_empty());
        assert!(turning_points(&[4.0, 4.0, 4.0]).is_empty());
        assert!(turning_points(&[]).is_empty());
    }

    #[test]
    fn test_peak_and_trough() {
        let points = turning_points(&[1.0, 3.0, 2.0, 0.5, 4.0]);
        assert_eq!(
            points,
            vec![
                TurningPoint { index: 1, kind: TurningKind::Peak },
                TurningPoint { index: 3, kind: TurningKind::Trough },
            ]
        );
    }

    #[test]
    fn test_plateau_counts_once() {
        let points = turning_points(&[1.0, 3.0, 3.0, 3.0, 2.0]);
        assert_eq!(points, vec![TurningPoint { index: 3, kind: TurningKind::Peak }]);
    }
}
