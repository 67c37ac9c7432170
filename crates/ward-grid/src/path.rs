//! Grid pathfinding: A* with a Manhattan heuristic.
//!
//! The grid is unweighted (every step costs 1), so A* here is just BFS with
//! a better frontier order — the two produce identical paths.  A* is kept
//! because room- and staff-matching issue many point-to-point queries per
//! tick and the heuristic prunes most of the grid on realistic layouts.
//!
//! # Determinism
//!
//! Two rules make output reproducible and testable:
//!
//! - neighbors are expanded in the fixed order up, down, left, right
//!   (see [`CellPos::neighbors4`]);
//! - equal-cost frontier entries pop FIFO, via a monotone sequence number
//!   as the secondary heap key.
//!
//! Together these reproduce BFS tie-breaking exactly: among equal-length
//! paths, the one whose first divergent step comes earliest in the
//! visitation order wins.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ward_core::CellPos;

use crate::error::{GridError, GridResult};
use crate::floor::{CellKind, FloorPlan};

/// Shortest path from `start` to `goal`, inclusive of both endpoints.
///
/// Traversal rules: `Wall` never enters the frontier; `Spawn` and both room
/// kinds enter only when they *are* `goal`.  `start` itself is exempt — an
/// agent may leave any non-wall cell it is standing on.
///
/// Returns `GridError::NoPath` if `goal` cannot be reached (including a
/// wall goal).  `start == goal` yields the single-cell path `[start]`.
pub fn find_path(plan: &FloorPlan, start: CellPos, goal: CellPos) -> GridResult<Vec<CellPos>> {
    let no_path = || GridError::NoPath { from: start, to: goal };

    if !plan.in_bounds(start) || !plan.in_bounds(goal) {
        return Err(no_path());
    }
    if plan.cell(start) == CellKind::Wall || plan.cell(goal) == CellKind::Wall {
        return Err(no_path());
    }
    if start == goal {
        return Ok(vec![start]);
    }

    let cols = plan.cols;
    let n = plan.cell_count();

    // dist[v] = best known path length (in steps) to reach v.
    let mut dist = vec![u32::MAX; n];
    // prev[v] = predecessor cell index; usize::MAX for unreached cells.
    let mut prev = vec![usize::MAX; n];

    dist[start.index(cols)] = 0;

    // Min-heap on (f = g + h, seq).  `seq` makes equal-f pops FIFO.
    let mut heap: BinaryHeap<Reverse<(u32, u64, CellPos)>> = BinaryHeap::new();
    let mut seq: u64 = 0;
    heap.push(Reverse((start.manhattan(goal), seq, start)));

    while let Some(Reverse((_f, _s, pos))) = heap.pop() {
        if pos == goal {
            return Ok(reconstruct(prev, start, goal, cols));
        }

        let g = dist[pos.index(cols)];

        for next in pos.neighbors4(plan.rows, plan.cols) {
            let kind = plan.cell(next);
            if kind == CellKind::Wall {
                continue;
            }
            if kind.is_destination_only() && next != goal {
                continue;
            }

            let idx = next.index(cols);
            let new_g = g + 1;
            if new_g < dist[idx] {
                dist[idx] = new_g;
                prev[idx] = pos.index(cols);
                seq += 1;
                heap.push(Reverse((new_g + next.manhattan(goal), seq, next)));
            }
        }
    }

    Err(no_path())
}

/// Trace `prev` back from `goal` to `start` and reverse into path order.
fn reconstruct(prev: Vec<usize>, start: CellPos, goal: CellPos, cols: u16) -> Vec<CellPos> {
    let mut path = vec![goal];
    let mut cur = goal.index(cols);
    while cur != start.index(cols) {
        cur = prev[cur];
        debug_assert_ne!(cur, usize::MAX, "reconstruct reached an unvisited cell");
        path.push(CellPos::new(
            (cur / cols as usize) as u16,
            (cur % cols as usize) as u16,
        ));
    }
    path.reverse();
    path
}

/// Path length in steps (cells minus one), or `GridError::NoPath`.
///
/// Used by the scheduler's nearest-by-path-length matching, which ranks
/// candidate rooms and staff by corridor travel cost, not Euclidean
/// distance.
pub fn path_len(plan: &FloorPlan, start: CellPos, goal: CellPos) -> GridResult<u32> {
    Ok(find_path(plan, start, goal)?.len() as u32 - 1)
}
