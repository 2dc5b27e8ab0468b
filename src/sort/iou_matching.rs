use ndarray::Array2;

use super::detection::Detection;
use super::track::Track;

/// Cost matrix between predicted track boxes (rows) and current-frame
/// detections (columns), using 1 − IoU as the distance.
pub fn iou_cost(tracks: &[Track], detections: &[Detection]) -> Array2<f64> {
    Array2::from_shape_fn((tracks.len(), detections.len()), |(row, col)| {
        1.0 - tracks[row].bbox().iou(&detections[col].bbox)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn det(x1: f64, y1: f64, x2: f64, y2: f64) -> Detection {
        Detection::new(x1, y1, x2, y2, 0.9, "person").unwrap()
    }

    #[test]
    fn cost_is_one_minus_iou() {
        let track = Track::new(&det(0.0, 0.0, 10.0, 10.0), 1, 1, 1, 30, None);
        let detections = vec![det(0.0, 0.0, 10.0, 10.0), det(100.0, 100.0, 110.0, 110.0)];

        let cost = iou_cost(&[track], &detections);
        assert_eq!(cost.dim(), (1, 2));
        assert_abs_diff_eq!(cost[[0, 0]], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cost[[0, 1]], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_inputs_give_empty_matrix() {
        let cost = iou_cost(&[], &[det(0.0, 0.0, 1.0, 1.0)]);
        assert_eq!(cost.dim(), (0, 1));
    }
}
