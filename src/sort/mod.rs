pub mod bbox;
pub mod detection;
pub mod error;
pub mod iou_matching;
pub mod kalman_filter;
pub mod linear_assignment;
pub mod preprocessing;
pub mod track;
pub mod tracker;
