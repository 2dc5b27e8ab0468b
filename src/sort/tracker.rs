use super::bbox::Bbox;
use super::detection::Detection;
use super::error::TrackingError;
use super::iou_matching::iou_cost;
use super::kalman_filter::KalmanFilter;
use super::linear_assignment::{min_cost_matching, AssignmentSolver, HungarianSolver};
use super::track::Track;

/// Options applied at construction; validated before a tracker is created.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Minimum IoU for a track/detection pair to be considered at all.
    pub iou_threshold: f64,
    /// Consecutive matched frames required to promote Tentative → Confirmed.
    pub min_hits: u32,
    /// Consecutive missed frames a confirmed track may coast before deletion.
    pub max_age_confirmed: u32,
    /// Miss budget for tentative tracks, much stricter than the confirmed one.
    pub max_age_tentative: u32,
    /// Detections below this confidence are discarded before association.
    /// Zero leaves filtering to the detector.
    pub confidence_floor: f64,
    /// Constant-velocity motion model; with `false`, prediction is a no-op
    /// and matched tracks snap to the detection box.
    pub motion_model: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            iou_threshold: 0.3,
            min_hits: 3,
            max_age_confirmed: 30,
            max_age_tentative: 1,
            confidence_floor: 0.0,
            motion_model: true,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), TrackingError> {
        if !self.iou_threshold.is_finite() || !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(TrackingError::Configuration(format!(
                "iou_threshold must be within [0, 1], got {}",
                self.iou_threshold
            )));
        }
        if !self.confidence_floor.is_finite() || !(0.0..=1.0).contains(&self.confidence_floor) {
            return Err(TrackingError::Configuration(format!(
                "confidence_floor must be within [0, 1], got {}",
                self.confidence_floor
            )));
        }
        if self.min_hits == 0 {
            return Err(TrackingError::Configuration(
                "min_hits must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Read-only per-frame output row. Owned by the caller; holds no reference
/// into tracker state.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSnapshot {
    pub track_id: u64,
    pub bbox: Bbox,
    pub label: String,
}

/// Multi-object tracker: predict → associate → update → lifecycle.
///
/// `update` is the sole entry point and must be called once per frame, in
/// frame order. The tracker owns all track state; callers only ever see
/// [`TrackSnapshot`] values.
pub struct Tracker {
    config: TrackerConfig,
    kf: Option<KalmanFilter>,
    solver: Box<dyn AssignmentSolver>,
    tracks: Vec<Track>,
    next_id: u64,
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("config", &self.config)
            .field("kf", &self.kf)
            .field("solver", &"<dyn AssignmentSolver>")
            .field("tracks", &self.tracks)
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl Tracker {
    pub fn new(config: TrackerConfig) -> Result<Self, TrackingError> {
        Self::with_solver(config, Box::new(HungarianSolver))
    }

    /// Build a tracker with a caller-supplied assignment solver.
    pub fn with_solver(
        config: TrackerConfig,
        solver: Box<dyn AssignmentSolver>,
    ) -> Result<Self, TrackingError> {
        config.validate()?;
        let kf = config.motion_model.then(KalmanFilter::new);
        Ok(Tracker {
            config,
            kf,
            solver,
            tracks: Vec::new(),
            next_id: 1,
        })
    }

    /// Ingest one frame of detections and return snapshots of all currently
    /// confirmed tracks (coasting ones included), ordered by ascending id.
    pub fn update(
        &mut self,
        detections: Vec<Detection>,
    ) -> Result<Vec<TrackSnapshot>, TrackingError> {
        let received = detections.len();
        let detections: Vec<Detection> = detections
            .into_iter()
            .filter(|d| d.confidence >= self.config.confidence_floor)
            .collect();
        if detections.len() < received {
            log::debug!(
                "dropped {} detections below confidence floor {}",
                received - detections.len(),
                self.config.confidence_floor
            );
        }

        for track in &mut self.tracks {
            track.predict(self.kf.as_ref());
        }

        let cost = iou_cost(&self.tracks, &detections);
        let result =
            min_cost_matching(self.solver.as_ref(), &cost, 1.0 - self.config.iou_threshold);

        for &(track_idx, detection_idx) in &result.matches {
            self.tracks[track_idx].update(self.kf.as_ref(), &detections[detection_idx])?;
        }
        for &track_idx in &result.unmatched_tracks {
            self.tracks[track_idx].mark_missed();
        }
        for &detection_idx in &result.unmatched_detections {
            self.initiate_track(&detections[detection_idx]);
        }

        self.tracks.retain(|t| !t.is_deleted());

        log::debug!(
            "frame: {} matches, {} live tracks, {} confirmed",
            result.matches.len(),
            self.tracks.len(),
            self.tracks.iter().filter(|t| t.is_confirmed()).count()
        );

        Ok(self
            .tracks
            .iter()
            .filter(|t| t.is_confirmed())
            .map(|t| TrackSnapshot {
                track_id: t.track_id,
                bbox: t.bbox(),
                label: t.label.clone(),
            })
            .collect())
    }

    /// Live tracks, tentative ones included.
    pub fn num_tracks(&self) -> usize {
        self.tracks.len()
    }

    fn initiate_track(&mut self, detection: &Detection) {
        let track = Track::new(
            detection,
            self.next_id,
            self.config.min_hits,
            self.config.max_age_tentative,
            self.config.max_age_confirmed,
            self.kf.as_ref(),
        );
        log::debug!("initiated track {} ({})", track.track_id, track.label);
        self.tracks.push(track);
        self.next_id += 1;
    }
}
