use ndarray::{Array1, Array2};

use super::bbox::Bbox;
use super::detection::Detection;
use super::error::TrackingError;
use super::kalman_filter::KalmanFilter;

/// Lifecycle status of a track.
///
/// Tracks are born `Tentative`, promoted to `Confirmed` after enough
/// consecutive matches and become `Deleted` once they coast past their miss
/// budget. `Deleted` is terminal; the tracker drops such tracks immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Tentative,
    Confirmed,
    Deleted,
}

/// A single tracked object with persistent identity.
#[derive(Debug, Clone)]
pub struct Track {
    pub track_id: u64,
    pub state: TrackState,
    /// Class label; sticky once assigned, refreshed from matched detections.
    pub label: String,
    /// Total frames with a matched detection.
    pub hits: u32,
    /// Consecutive frames with a matched detection; resets on a miss.
    pub hit_streak: u32,
    /// Frames since creation.
    pub age: u32,
    /// Consecutive frames without a matched detection; 0 exactly when the
    /// track was matched in the current frame.
    pub time_since_update: u32,
    bbox: Bbox,
    filter_state: Option<(Array1<f64>, Array2<f64>)>,
    min_hits: u32,
    max_age_tentative: u32,
    max_age_confirmed: u32,
}

impl Track {
    /// Initiate a track from an unmatched detection. With `min_hits <= 1` the
    /// track is born already confirmed.
    pub fn new(
        detection: &Detection,
        track_id: u64,
        min_hits: u32,
        max_age_tentative: u32,
        max_age_confirmed: u32,
        kf: Option<&KalmanFilter>,
    ) -> Self {
        let state = if min_hits <= 1 {
            TrackState::Confirmed
        } else {
            TrackState::Tentative
        };
        Track {
            track_id,
            state,
            label: detection.label.clone(),
            hits: 1,
            hit_streak: 1,
            age: 1,
            time_since_update: 0,
            bbox: detection.bbox,
            filter_state: kf.map(|kf| kf.initiate(detection.to_xyah())),
            min_hits,
            max_age_tentative,
            max_age_confirmed,
        }
    }

    /// Current box estimate: the filtered/predicted box when a motion model
    /// is attached, otherwise the last assigned detection box.
    pub fn bbox(&self) -> Bbox {
        self.bbox
    }

    /// Advance the estimate one frame (coast). With a motion model this is a
    /// constant-velocity extrapolation, otherwise a no-op on the box.
    pub fn predict(&mut self, kf: Option<&KalmanFilter>) {
        let predicted = match (kf, self.filter_state.as_ref()) {
            (Some(kf), Some((mean, covariance))) => Some(kf.predict(mean, covariance)),
            _ => None,
        };
        if let Some((mean, covariance)) = predicted {
            self.bbox = Bbox::from_xyah([mean[0], mean[1], mean[2], mean[3]]);
            self.filter_state = Some((mean, covariance));
        }
        self.age += 1;
        self.time_since_update += 1;
    }

    /// Fold a matched detection into the estimate and advance the lifecycle.
    pub fn update(
        &mut self,
        kf: Option<&KalmanFilter>,
        detection: &Detection,
    ) -> Result<(), TrackingError> {
        let filtered = match (kf, self.filter_state.as_ref()) {
            (Some(kf), Some((mean, covariance))) => {
                Some(kf.update(mean, covariance, detection.to_xyah())?)
            }
            _ => None,
        };
        match filtered {
            Some((mean, covariance)) => {
                self.bbox = Bbox::from_xyah([mean[0], mean[1], mean[2], mean[3]]);
                self.filter_state = Some((mean, covariance));
            }
            None => {
                self.bbox = detection.bbox;
            }
        }

        self.label = detection.label.clone();
        self.hits += 1;
        self.hit_streak += 1;
        self.time_since_update = 0;

        if self.state == TrackState::Tentative && self.hit_streak >= self.min_hits {
            self.state = TrackState::Confirmed;
        }
        Ok(())
    }

    /// Register a frame with no matching detection. Deletes the track once it
    /// has coasted past the miss budget for its current state.
    pub fn mark_missed(&mut self) {
        self.hit_streak = 0;
        let max_age = match self.state {
            TrackState::Tentative => self.max_age_tentative,
            TrackState::Confirmed => self.max_age_confirmed,
            TrackState::Deleted => return,
        };
        if self.time_since_update > max_age {
            self.state = TrackState::Deleted;
        }
    }

    pub fn is_tentative(&self) -> bool {
        self.state == TrackState::Tentative
    }

    pub fn is_confirmed(&self) -> bool {
        self.state == TrackState::Confirmed
    }

    pub fn is_deleted(&self) -> bool {
        self.state == TrackState::Deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(x1: f64, y1: f64, x2: f64, y2: f64) -> Detection {
        Detection::new(x1, y1, x2, y2, 0.9, "person").unwrap()
    }

    #[test]
    fn confirmed_after_min_hits_consecutive_matches() {
        let mut track = Track::new(&det(0.0, 0.0, 10.0, 10.0), 1, 3, 1, 30, None);
        assert!(track.is_tentative());

        track.predict(None);
        track.update(None, &det(0.0, 0.0, 10.0, 10.0)).unwrap();
        assert!(track.is_tentative());

        track.predict(None);
        track.update(None, &det(0.0, 0.0, 10.0, 10.0)).unwrap();
        assert!(track.is_confirmed());
        assert_eq!(track.hit_streak, 3);
    }

    #[test]
    fn born_confirmed_when_min_hits_is_one() {
        let track = Track::new(&det(0.0, 0.0, 10.0, 10.0), 1, 1, 1, 30, None);
        assert!(track.is_confirmed());
    }

    #[test]
    fn miss_resets_streak() {
        let mut track = Track::new(&det(0.0, 0.0, 10.0, 10.0), 1, 3, 5, 30, None);
        track.predict(None);
        track.update(None, &det(0.0, 0.0, 10.0, 10.0)).unwrap();
        assert_eq!(track.hit_streak, 2);

        track.predict(None);
        track.mark_missed();
        assert_eq!(track.hit_streak, 0);
        assert!(track.is_tentative());
    }

    #[test]
    fn tentative_deleted_past_miss_budget() {
        let mut track = Track::new(&det(0.0, 0.0, 10.0, 10.0), 1, 3, 1, 30, None);
        track.predict(None);
        track.mark_missed();
        assert!(!track.is_deleted()); // time_since_update == 1, budget 1

        track.predict(None);
        track.mark_missed();
        assert!(track.is_deleted()); // time_since_update == 2 > 1
    }

    #[test]
    fn confirmed_deleted_after_budget_plus_one_misses() {
        let mut track = Track::new(&det(0.0, 0.0, 10.0, 10.0), 1, 1, 1, 2, None);
        assert!(track.is_confirmed());

        for _ in 0..2 {
            track.predict(None);
            track.mark_missed();
            assert!(!track.is_deleted());
        }
        track.predict(None);
        track.mark_missed();
        assert!(track.is_deleted());
    }

    #[test]
    fn update_resets_time_since_update_and_refreshes_label() {
        let mut track = Track::new(&det(0.0, 0.0, 10.0, 10.0), 1, 1, 1, 30, None);
        track.predict(None);
        assert_eq!(track.time_since_update, 1);

        let d = Detection::new(1.0, 1.0, 11.0, 11.0, 0.8, "bicycle").unwrap();
        track.update(None, &d).unwrap();
        assert_eq!(track.time_since_update, 0);
        assert_eq!(track.label, "bicycle");
        assert_eq!(track.bbox(), d.bbox);
    }

    #[test]
    fn motion_model_coasts_box_forward() {
        let kf = KalmanFilter::new();
        let mut track = Track::new(&det(0.0, 0.0, 10.0, 10.0), 1, 1, 1, 30, Some(&kf));
        // feed a constant +5/frame motion in x
        for step in 1..=4 {
            track.predict(Some(&kf));
            let off = 5.0 * step as f64;
            track
                .update(Some(&kf), &det(off, 0.0, off + 10.0, 10.0))
                .unwrap();
        }
        let before = track.bbox().center_x();
        track.predict(Some(&kf));
        // coasting continues along the estimated velocity
        assert!(track.bbox().center_x() > before);
    }
}
