//McSplit
//Copyright (C) 2022-2023 A. Dubray
//
//This program is free software: you can redistribute it and/or modify
//it under the terms of the GNU Affero General Public License as published by
//the Free Software Foundation, either version 3 of the License, or
//(at your option) any later version.
//
//This program is distributed in the hope that it will be useful,
//but WITHOUT ANY WARRANTY; without even the implied warranty of
//MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//GNU Affero General Public License for more details.
//
//You should have received a copy of the GNU Affero General Public License
//along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Exact solver for the maximum common induced subgraph problem over k
//! graphs: the largest set of vertex tuples, one vertex per graph, whose
//! induced subgraphs are pairwise isomorphic under the tuple mapping. The
//! search is a parallel branch-and-bound over multidomains, with optional
//! connectedness, direction, label matching and a big-first goal strategy.
//!
//! [solve] is the entry point; graphs are built by the loaders in
//! [parsers] or directly through [Graph].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

mod common;
pub mod core;
mod errors;
mod heuristics;
pub mod parsers;
mod preprocess;
mod solvers;

pub use crate::common::{Config, GraphFormat, Heuristic, Solution, VertexTuple, MAX_GRAPHS};
pub use crate::core::graph::Graph;
pub use crate::errors::Error;

use crate::solvers::{mcs, Statistics, Timeout};

use peak_alloc::PeakAlloc;
#[global_allocator]
pub static PEAK_ALLOC: PeakAlloc = PeakAlloc;

/// Searches the largest common induced subgraph of `graphs`. The returned
/// tuples reference the vertices of the input graphs; the degree-descending
/// renumbering used internally is undone before returning. When the timeout
/// fires, the best matching found so far is returned with the timed-out flag
/// set.
pub fn solve(graphs: &[Graph], config: &Config) -> Result<Solution, Error> {
    if graphs.len() < 2 || graphs.len() > MAX_GRAPHS {
        return Err(Error::GraphCount(graphs.len()));
    }
    if config.threads == 0 {
        return Err(Error::NoThreads);
    }

    let abort = Arc::new(AtomicBool::new(false));
    let timeout = Timeout::start(config.timeout, Arc::clone(&abort));

    let orders: Vec<Vec<usize>> = graphs
        .iter()
        .map(preprocess::degree_descending_order)
        .collect();
    let sorted: Vec<Graph> = graphs
        .iter()
        .zip(orders.iter())
        .map(|(graph, order)| graph.induced_subgraph(order))
        .collect();

    let (mut assignment, nodes) = if config.statistics {
        run_search::<true>(&sorted, config, &abort)
    } else {
        run_search::<false>(&sorted, config, &abort)
    };

    timeout.stop();
    let timed_out = abort.load(Ordering::Relaxed);

    // back to the vertex numbering of the input graphs
    for tuple in assignment.iter_mut() {
        for (graph, order) in orders.iter().enumerate() {
            tuple.map(graph, order[tuple.vertex(graph)]);
        }
    }
    Ok(Solution::new(assignment, nodes, timed_out))
}

fn run_search<const S: bool>(
    graphs: &[Graph],
    config: &Config,
    abort: &AtomicBool,
) -> (Vec<VertexTuple>, u64) {
    let mut statistics = Statistics::<S>::default();
    let (assignment, nodes) = mcs(graphs, config, abort, &mut statistics);
    statistics.search_nodes(nodes);
    statistics.peak_memory(PEAK_ALLOC.peak_usage_as_mb());
    statistics.print();
    (assignment, nodes)
}
