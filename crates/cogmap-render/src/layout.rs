//! Spring layout (Fruchterman-Reingold)
//!
//! Nodes repel each other with force k²/d and adjacent nodes attract with
//! force d²/k. Displacements are capped by a temperature that cools
//! linearly to zero. The result is centered and scaled into [-1, 1].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Smallest distance used in force computations
const MIN_DISTANCE: f32 = 0.01;

/// Spring layout parameters
#[derive(Debug, Clone, Copy)]
pub struct LayoutParams {
    /// Optimal distance between nodes
    pub k: f32,
    pub iterations: usize,
    /// Seed for the random initial positions
    pub seed: u64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            k: 0.5,
            iterations: 50,
            seed: 42,
        }
    }
}

/// Compute positions for `n` nodes connected by `edges` (index pairs)
///
/// Edge direction is ignored. Positions are returned in node order.
pub fn spring_layout(n: usize, edges: &[(usize, usize)], params: &LayoutParams) -> Vec<(f32, f32)> {
    match n {
        0 => return Vec::new(),
        1 => return vec![(0.0, 0.0)],
        _ => {}
    }

    let mut adjacent = vec![vec![false; n]; n];
    for &(a, b) in edges {
        if a < n && b < n && a != b {
            adjacent[a][b] = true;
            adjacent[b][a] = true;
        }
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut pos: Vec<(f32, f32)> = (0..n).map(|_| (rng.gen(), rng.gen())).collect();

    let k = params.k.max(MIN_DISTANCE);
    let mut temperature = 0.1_f32;
    let cooling = temperature / (params.iterations as f32 + 1.0);

    for _ in 0..params.iterations {
        let mut displacement = vec![(0.0_f32, 0.0_f32); n];

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i].0 - pos[j].0;
                let dy = pos[i].1 - pos[j].1;
                let distance = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);

                let mut force = k * k / (distance * distance);
                if adjacent[i][j] {
                    force -= distance / k;
                }
                displacement[i].0 += dx * force;
                displacement[i].1 += dy * force;
            }
        }

        for (p, (dx, dy)) in pos.iter_mut().zip(displacement) {
            let length = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
            p.0 += dx * temperature / length;
            p.1 += dy * temperature / length;
        }

        temperature -= cooling;
    }

    rescale(pos)
}

/// Center positions on the origin and scale the largest coordinate to 1
fn rescale(mut pos: Vec<(f32, f32)>) -> Vec<(f32, f32)> {
    let n = pos.len() as f32;
    let (cx, cy) = pos
        .iter()
        .fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
    let (cx, cy) = (cx / n, cy / n);

    let mut extent = 0.0_f32;
    for p in pos.iter_mut() {
        p.0 -= cx;
        p.1 -= cy;
        extent = extent.max(p.0.abs()).max(p.1.abs());
    }

    if extent > 0.0 {
        for p in pos.iter_mut() {
            p.0 /= extent;
            p.1 /= extent;
        }
    }
    pos
}
