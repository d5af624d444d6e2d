use pathfinding::kuhn_munkres::kuhn_munkres;
use pathfinding::matrix::Matrix;

const F32_I64_MULT: f32 = 1_000_000.0;

/// Distances between observations (rows) and entities (columns). `None` marks pairs that can't be
/// matched: no embedding on either side, or the distance isn't below the limit.
///
pub(crate) type DistanceMatrix = Vec<Vec<Option<f32>>>;

/// Observations in order take the nearest entity not taken yet. Equal distances resolve to the
/// entity met first.
///
/// Returns the matched entity column for every observation row.
///
pub(crate) fn greedy(distances: &DistanceMatrix, entities: usize) -> Vec<Option<usize>> {
    let mut taken = vec![false; entities];
    let mut res = Vec::with_capacity(distances.len());
    for row in distances {
        let winner = row
            .iter()
            .enumerate()
            .filter(|(col, _)| !taken[*col])
            .filter_map(|(col, dist)| dist.map(|d| (col, d)))
            .min_by(|(_, l), (_, r)| l.total_cmp(r))
            .map(|(col, _)| col);

        if let Some(col) = winner {
            taken[col] = true;
        }
        res.push(winner);
    }
    res
}

/// Minimal total distance assignment.
///
/// Every observation owns an extra column that stands for "new entity" and weighs `limit`, so an
/// admissible pair is always preferred to creating an entity. Distances are scaled by `limit`,
/// which keeps the integer weights bounded for any limit. A forbidden pair weighs more than all
/// the observations opening new entities together, so it's never a part of the solution.
///
pub(crate) fn optimal(
    distances: &DistanceMatrix,
    entities: usize,
    limit: f32,
) -> Vec<Option<usize>> {
    let observations = distances.len();
    if observations == 0 || entities == 0 {
        return vec![None; observations];
    }

    let scale = F32_I64_MULT / limit;
    let new_entity_weight = -(F32_I64_MULT as i64);
    let forbidden_weight = new_entity_weight * (observations as i64 + 1) - 1;
    let mut weights = Matrix::new(observations, entities + observations, new_entity_weight);
    for (row, dists) in distances.iter().enumerate() {
        for (col, dist) in dists.iter().enumerate() {
            weights[(row, col)] = match dist {
                Some(d) => -((d * scale) as i64),
                None => forbidden_weight,
            };
        }
    }

    let (_, solution) = kuhn_munkres(&weights);

    solution
        .into_iter()
        .enumerate()
        .map(|(row, col)| {
            if col < entities && distances[row][col].is_some() {
                Some(col)
            } else {
                None
            }
        })
        .collect()
}
