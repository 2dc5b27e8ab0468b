use ndarray::Array2;
use pathfinding::prelude::{kuhn_munkres_min, Matrix};

/// Cost assigned to pairs that must never match.
pub const INFTY_COST: f64 = 1e5;

/// Fixed-point scale applied before handing costs to the integer solver.
const COST_SCALE: f64 = 1e6;

/// Minimum-cost bipartite assignment over a rows × columns cost matrix.
///
/// Decoupled behind a trait so tests can substitute a trivial solver for
/// small fixed matrices.
pub trait AssignmentSolver {
    /// Return (row, column) pairs of the chosen assignment. Pairs may still
    /// be discarded afterwards by the gate in [`min_cost_matching`].
    fn solve(&self, cost_matrix: &Array2<f64>) -> Vec<(usize, usize)>;
}

/// Optimal solver backed by the Kuhn-Munkres (Hungarian) algorithm.
///
/// The matrix is padded to square with `INFTY_COST` entries and scaled to
/// integer weights; assignments landing on padding are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct HungarianSolver;

impl AssignmentSolver for HungarianSolver {
    fn solve(&self, cost_matrix: &Array2<f64>) -> Vec<(usize, usize)> {
        let (rows, cols) = cost_matrix.dim();
        if rows == 0 || cols == 0 {
            return Vec::new();
        }

        let size = rows.max(cols);
        let pad = (INFTY_COST * COST_SCALE) as i64;
        let mut weights = Matrix::new(size, size, pad);
        for row in 0..rows {
            for col in 0..cols {
                weights[(row, col)] = (cost_matrix[[row, col]].min(INFTY_COST) * COST_SCALE) as i64;
            }
        }

        let (_total, assignment) = kuhn_munkres_min(&weights);
        assignment
            .into_iter()
            .enumerate()
            .filter(|&(row, col)| row < rows && col < cols)
            .collect()
    }
}

/// Outcome of one association round, in matrix indices (rows are tracks,
/// columns are detections).
#[derive(Debug, Clone, Default)]
pub struct AssignmentResult {
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

/// Solve the assignment and apply the gate: pairs whose true cost exceeds
/// `max_cost` are treated as unmatched regardless of the optimal assignment.
pub fn min_cost_matching(
    solver: &dyn AssignmentSolver,
    cost_matrix: &Array2<f64>,
    max_cost: f64,
) -> AssignmentResult {
    let (n_tracks, n_detections) = cost_matrix.dim();
    if n_tracks == 0 || n_detections == 0 {
        return AssignmentResult {
            matches: Vec::new(),
            unmatched_tracks: (0..n_tracks).collect(),
            unmatched_detections: (0..n_detections).collect(),
        };
    }

    // Cap gated pairs so the solver routes assignments around them.
    let capped = cost_matrix.mapv(|c| if c > max_cost { INFTY_COST } else { c });
    let assignment = solver.solve(&capped);

    let mut matches = Vec::new();
    let mut matched_tracks = vec![false; n_tracks];
    let mut matched_detections = vec![false; n_detections];
    for (row, col) in assignment {
        if row >= n_tracks || col >= n_detections {
            continue;
        }
        if cost_matrix[[row, col]] > max_cost {
            continue;
        }
        matched_tracks[row] = true;
        matched_detections[col] = true;
        matches.push((row, col));
    }

    let unmatched_tracks: Vec<usize> = (0..n_tracks).filter(|&i| !matched_tracks[i]).collect();
    let unmatched_detections: Vec<usize> =
        (0..n_detections).filter(|&i| !matched_detections[i]).collect();

    log::trace!(
        "association: {} matched, {} tracks unmatched, {} detections unmatched",
        matches.len(),
        unmatched_tracks.len(),
        unmatched_detections.len()
    );

    AssignmentResult {
        matches,
        unmatched_tracks,
        unmatched_detections,
    }
}
