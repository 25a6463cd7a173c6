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

use clap::ValueEnum;

use crate::core::graph::Graph;

/// Maximum number of graphs that can take part in a single search.
pub const MAX_GRAPHS: usize = 10;

/// Maximum depth at which the parallel search advertises stealable sub-trees.
pub const SPLIT_LEVELS: usize = 4;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Heuristic {
    /// Minimise the largest slice of the domain
    MinMax,
    /// Minimise the smallest slice of the domain
    MinMin,
    /// Minimise the sum of the slice lengths
    MinSum,
    /// Minimise the product of the slice lengths
    MinProduct,
}

impl std::fmt::Display for Heuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Heuristic::MinMax => write!(f, "min-max"),
            Heuristic::MinMin => write!(f, "min-min"),
            Heuristic::MinSum => write!(f, "min-sum"),
            Heuristic::MinProduct => write!(f, "min-product"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum GraphFormat {
    /// 16-bit little-endian benchmark format
    Binary,
    /// DIMACS text format (p/e/n lines)
    Dimacs,
    /// LAD adjacency-list format
    Lad,
    /// IOI text format (n m header, labels, edge list)
    Ioi,
}

impl std::fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphFormat::Binary => write!(f, "binary"),
            GraphFormat::Dimacs => write!(f, "dimacs"),
            GraphFormat::Lad => write!(f, "lad"),
            GraphFormat::Ioi => write!(f, "ioi"),
        }
    }
}

/// Read-only configuration of a search. Built once by the caller and passed
/// down to every component.
#[derive(Debug, Clone)]
pub struct Config {
    /// Restrict the result to connected common subgraphs
    pub connected: bool,
    /// Interpret adjacency as directed (high 16 bits hold the reverse edge)
    pub directed: bool,
    /// Match edge labels across graphs
    pub edge_labelled: bool,
    /// Match vertex labels across graphs (loaders keep labels only when set)
    pub vertex_labelled: bool,
    /// Search for a subgraph of size n₀ first, then n₀ − 1, and so on
    pub big_first: bool,
    /// Functional used to pick the domain to branch on
    pub heuristic: Heuristic,
    /// Total number of threads taking part in the search (main thread included)
    pub threads: usize,
    /// Abort the search after this many seconds, 0 to run to completion
    pub timeout: u64,
    /// Print one trace line per search node
    pub verbose: bool,
    /// Suppress progress output
    pub quiet: bool,
    /// Collect and print statistics at the end of the search
    pub statistics: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connected: false,
            directed: false,
            edge_labelled: false,
            vertex_labelled: false,
            big_first: false,
            heuristic: Heuristic::MinMax,
            threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            timeout: 0,
            verbose: false,
            quiet: false,
            statistics: false,
        }
    }
}

/// One member of a matching: a tuple of vertex indices, one per input graph.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexTuple {
    vertices: [usize; MAX_GRAPHS],
    k: usize,
}

impl VertexTuple {
    pub(crate) fn new(vertices: [usize; MAX_GRAPHS], k: usize) -> Self {
        Self { vertices, k }
    }

    /// The vertex chosen in graph `graph`
    pub fn vertex(&self, graph: usize) -> usize {
        debug_assert!(graph < self.k);
        self.vertices[graph]
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.vertices[..self.k]
    }

    pub(crate) fn map(&mut self, graph: usize, vertex: usize) {
        self.vertices[graph] = vertex;
    }
}

impl std::fmt::Display for VertexTuple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, v) in self.as_slice().iter().enumerate() {
            if i == 0 {
                write!(f, "{}", v)?;
            } else {
                write!(f, "->{}", v)?;
            }
        }
        Ok(())
    }
}

/// The result of a search: the best matching found, the number of explored
/// search nodes summed over all threads, and whether the search was aborted
/// by the timeout before proving optimality.
pub struct Solution {
    assignment: Vec<VertexTuple>,
    nodes: u64,
    timed_out: bool,
}

impl Solution {
    pub(crate) fn new(assignment: Vec<VertexTuple>, nodes: u64, timed_out: bool) -> Self {
        Self {
            assignment,
            nodes,
            timed_out,
        }
    }

    /// Number of vertex tuples in the matching
    pub fn size(&self) -> usize {
        self.assignment.len()
    }

    pub fn assignment(&self) -> &[VertexTuple] {
        &self.assignment
    }

    pub fn node_count(&self) -> u64 {
        self.nodes
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Checks the matching against the input graphs: every tuple must agree on
    /// the vertex labels, and every pair of tuples must agree on the adjacency
    /// words in all graphs.
    pub fn is_valid_for(&self, graphs: &[Graph]) -> bool {
        for (i, a) in self.assignment.iter().enumerate() {
            for g in 1..graphs.len() {
                if graphs[0].label(a.vertex(0)) != graphs[g].label(a.vertex(g)) {
                    return false;
                }
                for b in self.assignment.iter().skip(i + 1) {
                    if graphs[0].adjacency(a.vertex(0), b.vertex(0))
                        != graphs[g].adjacency(a.vertex(g), b.vertex(g))
                    {
                        return false;
                    }
                }
            }
        }
        true
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut sorted: Vec<&VertexTuple> = self.assignment.iter().collect();
        sorted.sort_by_key(|t| t.vertex(0));
        for (i, tuple) in sorted.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "({})", tuple)?;
        }
        Ok(())
    }
}
