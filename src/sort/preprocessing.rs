use std::cmp::Ordering;

use super::detection::Detection;

/// Greedy non-maximum suppression over detection boxes.
///
/// Detections are visited in descending confidence order; any remaining
/// detection overlapping a kept one with IoU above `max_overlap` is dropped.
/// Returns the kept indices, highest confidence first. Detector-side helper;
/// the tracker itself takes whatever it is given.
pub fn non_max_suppression(detections: &[Detection], max_overlap: f64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..detections.len()).collect();
    order.sort_by(|&a, &b| {
        detections[b]
            .confidence
            .partial_cmp(&detections[a].confidence)
            .unwrap_or(Ordering::Equal)
    });

    let mut suppressed = vec![false; detections.len()];
    let mut keep = Vec::new();
    for &i in &order {
        if suppressed[i] {
            continue;
        }
        keep.push(i);
        for &j in &order {
            if j != i
                && !suppressed[j]
                && detections[i].bbox.iou(&detections[j].bbox) > max_overlap
            {
                suppressed[j] = true;
            }
        }
    }
    keep
}
