use super::bbox::Bbox;
use super::error::TrackingError;

/// A single detector output for one frame: box, confidence and class label.
/// Ephemeral; consumed by one `Tracker::update` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub bbox: Bbox,
    pub confidence: f64,
    pub label: String,
}

impl Detection {
    /// Validate and build a detection from raw detector output.
    ///
    /// Swapped corners (x2 < x1 or y2 < y1) are normalized, never an error.
    /// A non-finite coordinate or confidence is rejected with
    /// [`TrackingError::InvalidDetection`]. Confidence is clamped into [0, 1].
    pub fn new(
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        confidence: f64,
        label: impl Into<String>,
    ) -> Result<Self, TrackingError> {
        let bbox = Bbox::new(x1, y1, x2, y2);
        if !bbox.is_finite() {
            return Err(TrackingError::InvalidDetection(format!(
                "non-finite coordinates ({}, {}, {}, {})",
                x1, y1, x2, y2
            )));
        }
        if !confidence.is_finite() {
            return Err(TrackingError::InvalidDetection(format!(
                "non-finite confidence {}",
                confidence
            )));
        }
        Ok(Detection {
            bbox,
            confidence: confidence.clamp(0.0, 1.0),
            label: label.into(),
        })
    }

    pub fn to_xyah(&self) -> [f64; 4] {
        self.bbox.to_xyah()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_detection() {
        let d = Detection::new(0.0, 0.0, 10.0, 10.0, 0.9, "person").unwrap();
        assert_eq!(d.bbox, Bbox::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(d.confidence, 0.9);
        assert_eq!(d.label, "person");
    }

    #[test]
    fn normalizes_swapped_corners() {
        let d = Detection::new(10.0, 10.0, 0.0, 0.0, 0.5, "car").unwrap();
        assert_eq!(d.bbox, Bbox::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn rejects_non_finite_coordinate() {
        let err = Detection::new(f64::NAN, 0.0, 10.0, 10.0, 0.9, "person").unwrap_err();
        assert!(matches!(err, TrackingError::InvalidDetection(_)));

        let err = Detection::new(0.0, 0.0, f64::INFINITY, 10.0, 0.9, "person").unwrap_err();
        assert!(matches!(err, TrackingError::InvalidDetection(_)));
    }

    #[test]
    fn rejects_non_finite_confidence() {
        let err = Detection::new(0.0, 0.0, 10.0, 10.0, f64::NAN, "person").unwrap_err();
        assert!(matches!(err, TrackingError::InvalidDetection(_)));
    }

    #[test]
    fn clamps_confidence_into_unit_range() {
        let d = Detection::new(0.0, 0.0, 10.0, 10.0, 1.5, "person").unwrap();
        assert_eq!(d.confidence, 1.0);
        let d = Detection::new(0.0, 0.0, 10.0, 10.0, -0.2, "person").unwrap();
        assert_eq!(d.confidence, 0.0);
    }
}
