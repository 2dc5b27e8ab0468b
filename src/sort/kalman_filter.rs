use ndarray::{s, Array1, Array2};
use rulinalg::matrix::Matrix;
use rulinalg::vector::Vector;

use super::error::TrackingError;

/// Constant-velocity Kalman filter over box state.
///
/// State is 8-dimensional: (cx, cy, aspect, height) plus their velocities.
/// Observations are the first four components. Process and observation noise
/// scale with the box height, weighted by the two `std_weight_*` factors.
#[derive(Debug, Clone)]
pub struct KalmanFilter {
    motion_mat: Array2<f64>,
    update_mat: Array2<f64>,
    std_weight_position: f64,
    std_weight_velocity: f64,
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl KalmanFilter {
    pub fn new() -> Self {
        let ndim = 4;
        let dt = 1.0;

        let mut motion_mat: Array2<f64> = Array2::eye(2 * ndim);
        for i in 0..ndim {
            motion_mat[[i, ndim + i]] = dt;
        }
        let update_mat = Array2::eye(2 * ndim).slice(s![..ndim, ..]).to_owned();

        KalmanFilter {
            motion_mat,
            update_mat,
            std_weight_position: 1.0 / 20.0,
            std_weight_velocity: 1.0 / 160.0,
        }
    }

    /// Start a new track state from an unmatched measurement. Velocities are
    /// initialized to zero with generous uncertainty.
    pub fn initiate(&self, measurement: [f64; 4]) -> (Array1<f64>, Array2<f64>) {
        let mut mean = Array1::zeros(8);
        for (i, v) in measurement.iter().enumerate() {
            mean[i] = *v;
        }

        let h = measurement[3];
        let std = [
            2.0 * self.std_weight_position * h,
            2.0 * self.std_weight_position * h,
            1e-2,
            2.0 * self.std_weight_position * h,
            10.0 * self.std_weight_velocity * h,
            10.0 * self.std_weight_velocity * h,
            1e-5,
            10.0 * self.std_weight_velocity * h,
        ];
        let mut covariance = Array2::zeros((8, 8));
        for (i, s) in std.iter().enumerate() {
            covariance[[i, i]] = s * s;
        }
        (mean, covariance)
    }

    /// Advance the state one frame: mean through the motion matrix, covariance
    /// through F P Fᵀ + Q.
    pub fn predict(&self, mean: &Array1<f64>, covariance: &Array2<f64>) -> (Array1<f64>, Array2<f64>) {
        let h = mean[3];
        let std = [
            self.std_weight_position * h,
            self.std_weight_position * h,
            1e-2,
            self.std_weight_position * h,
            self.std_weight_velocity * h,
            self.std_weight_velocity * h,
            1e-5,
            self.std_weight_velocity * h,
        ];
        let mut motion_cov = Array2::zeros((8, 8));
        for (i, s) in std.iter().enumerate() {
            motion_cov[[i, i]] = s * s;
        }

        let mean = self.motion_mat.dot(mean);
        let covariance = self.motion_mat.dot(covariance).dot(&self.motion_mat.t()) + motion_cov;
        (mean, covariance)
    }

    /// Project the state into measurement space: (H x, H P Hᵀ + R).
    fn project(&self, mean: &Array1<f64>, covariance: &Array2<f64>) -> (Array1<f64>, Array2<f64>) {
        let h = mean[3];
        let std = [
            self.std_weight_position * h,
            self.std_weight_position * h,
            1e-1,
            self.std_weight_position * h,
        ];
        let mut innovation_cov = Array2::zeros((4, 4));
        for (i, s) in std.iter().enumerate() {
            innovation_cov[[i, i]] = s * s;
        }

        let mean = self.update_mat.dot(mean);
        let covariance = self.update_mat.dot(covariance).dot(&self.update_mat.t()) + innovation_cov;
        (mean, covariance)
    }

    /// Correct the predicted state with a matched measurement.
    ///
    /// The gain K = P Hᵀ S⁻¹ is obtained by solving S x = (P Hᵀ)ᵢ per state
    /// row; a singular innovation covariance surfaces as
    /// [`TrackingError::Numerical`].
    pub fn update(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
        measurement: [f64; 4],
    ) -> Result<(Array1<f64>, Array2<f64>), TrackingError> {
        let (projected_mean, projected_cov) = self.project(mean, covariance);

        let pht = covariance.dot(&self.update_mat.t());
        let s_data: Vec<f64> = projected_cov.iter().cloned().collect();

        let mut kalman_gain = Array2::zeros((8, 4));
        for i in 0..8 {
            let rhs = Vector::new(pht.row(i).to_vec());
            let solved = Matrix::new(4, 4, s_data.clone())
                .solve(rhs)
                .map_err(|e| TrackingError::Numerical(e.to_string()))?;
            for (j, v) in solved.data().iter().enumerate() {
                kalman_gain[[i, j]] = *v;
            }
        }

        let mut innovation = Array1::zeros(4);
        for (i, z) in measurement.iter().enumerate() {
            innovation[i] = z - projected_mean[i];
        }

        let new_mean = mean + &kalman_gain.dot(&innovation);
        let new_covariance = covariance - &kalman_gain.dot(&projected_cov).dot(&kalman_gain.t());
        Ok((new_mean, new_covariance))
    }
}
