//! Maximum-weight bipartite assignment (Hungarian algorithm).
//!
//! Backs [`MatchStrategy::Optimal`](crate::MatchStrategy::Optimal).

/// For each row of `scores`, the column it is assigned to, if any.
///
/// Only pairs scoring strictly above `threshold` take part; the assignment
/// maximizes the total score of those pairs. `scores` must be rectangular.
pub fn max_weight_assignment(scores: &[Vec<f64>], threshold: f64) -> Vec<Option<usize>> {
    let rows = scores.len();
    let cols = scores.first().map_or(0, Vec::len);
    if rows == 0 || cols == 0 {
        return vec![None; rows];
    }

    // Square cost matrix; pairs at or below the threshold cost the same as
    // leaving both sides unassigned.
    let n = rows.max(cols);
    let cost = |i: usize, j: usize| -> f64 {
        match scores.get(i).and_then(|r| r.get(j)) {
            Some(&s) if s > threshold => -s,
            _ => 0.0,
        }
    };

    // 1-indexed potentials; p[j] is the row matched to column j, 0 if none.
    let mut u = vec![0.0_f64; n + 1];
    let mut v = vec![0.0_f64; n + 1];
    let mut p = vec![0_usize; n + 1];
    let mut way = vec![0_usize; n + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0;
        let mut minv = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0;

            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let cur = cost(i0 - 1, j - 1) - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            for j in 0..=n {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut assigned = vec![None; rows];
    for j in 1..=n {
        let i = p[j];
        if i == 0 || i > rows || j > cols {
            continue;
        }
        if scores[i - 1][j - 1] > threshold {
            assigned[i - 1] = Some(j - 1);
        }
    }
    assigned
}
