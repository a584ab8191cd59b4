//! Dependency ordering
//!
//! Checks run in registration order, except that a check always runs after
//! the checks it needs. This is Kahn's algorithm where the ready check with
//! the lowest registration index goes first.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

/// Order nodes so that every node follows its dependencies
///
/// `nodes` maps a registration index to the registration indices it depends
/// on. Dependencies that are not themselves keys of `nodes` are ignored.
///
/// # Errors
///
/// Returns the indices forming a cycle, each needing the next, with the
/// first index repeated at the end.
pub fn stable_topological_order(
    nodes: &BTreeMap<usize, Vec<usize>>,
) -> Result<Vec<usize>, Vec<usize>> {
    let mut indegree: BTreeMap<usize, usize> = nodes.keys().map(|&n| (n, 0)).collect();
    let mut dependents: BTreeMap<usize, Vec<usize>> = BTreeMap::new();

    for (&node, deps) in nodes {
        let unique: BTreeSet<usize> =
            deps.iter().copied().filter(|d| nodes.contains_key(d) && *d != node).collect();
        for dep in unique {
            *indegree.entry(node).or_default() += 1;
            dependents.entry(dep).or_default().push(node);
        }
        if deps.contains(&node) {
            return Err(vec![node, node]);
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> =
        indegree.iter().filter(|(_, d)| **d == 0).map(|(&n, _)| Reverse(n)).collect();
    let mut order = Vec::with_capacity(nodes.len());

    while let Some(Reverse(node)) = ready.pop() {
        order.push(node);
        for &dependent in dependents.get(&node).map_or(&[][..], Vec::as_slice) {
            if let Some(d) = indegree.get_mut(&dependent) {
                *d -= 1;
                if *d == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }
    }

    if order.len() == nodes.len() {
        return Ok(order);
    }

    let placed: BTreeSet<usize> = order.into_iter().collect();
    let remaining: BTreeSet<usize> =
        nodes.keys().copied().filter(|n| !placed.contains(n)).collect();
    Err(find_cycle(nodes, &remaining))
}

/// Walk dependencies inside `remaining` until a node repeats
///
/// Every node left over by Kahn's algorithm has a dependency that was also
/// left over, so the walk always closes a loop.
fn find_cycle(nodes: &BTreeMap<usize, Vec<usize>>, remaining: &BTreeSet<usize>) -> Vec<usize> {
    let Some(&start) = remaining.iter().next() else {
        return Vec::new();
    };

    let mut path = vec![start];
    let mut current = start;
    loop {
        let next = nodes
            .get(&current)
            .and_then(|deps| deps.iter().copied().find(|d| remaining.contains(d)));
        let Some(next) = next else {
            return path;
        };
        if let Some(pos) = path.iter().position(|&n| n == next) {
            let mut cycle = path.split_off(pos);
            cycle.push(next);
            return cycle;
        }
        path.push(next);
        current = next;
    }
}
