//McSplit
//Copyright (C) 2022 A. Dubray
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

//! This module implements the input graphs of the solver as a dense adjacency
//! matrix of 32-bit edge words. The low 16 bits of a word hold the forward
//! edge label (0 meaning no edge) and, for directed graphs, the high 16 bits
//! hold the backward edge label. Each vertex additionally carries a 32-bit
//! label word whose most significant bit marks a self-loop, so that a looped
//! vertex can only ever be matched to another looped vertex.
//!
//! Graphs are built once by a loader (or by hand in tests) and are never
//! modified during the search.

/// Bit set in the label word of a vertex that has a self-loop.
pub const LOOP_BIT: u32 = 1 << 31;

/// Mask of the forward-edge half of an adjacency word.
pub const FORWARD_MASK: u32 = 0xFFFF;

#[derive(Debug, Clone)]
pub struct Graph {
    n: usize,
    adjmat: Vec<Vec<u32>>,
    labels: Vec<u32>,
}

impl Graph {
    /// Creates a graph with `n` vertices, no edges and all labels zero
    pub fn new(n: usize) -> Self {
        Self {
            n,
            adjmat: vec![vec![0; n]; n],
            labels: vec![0; n],
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// The full adjacency word between `v` and `w`
    pub fn adjacency(&self, v: usize, w: usize) -> u32 {
        self.adjmat[v][w]
    }

    /// The adjacency row of `v`, indexed by target vertex
    pub fn adjacency_row(&self, v: usize) -> &[u32] {
        &self.adjmat[v]
    }

    pub fn label(&self, v: usize) -> u32 {
        self.labels[v]
    }

    /// Merges `bits` into the label word of `v`
    pub fn or_label(&mut self, v: usize, bits: u32) {
        self.labels[v] |= bits;
    }

    /// Adds an edge between `v` and `w` with label `val`. A directed edge
    /// stores `val` forward and `val << 16` backward; an undirected edge
    /// stores `val` both ways. An edge from a vertex to itself is recorded as
    /// a loop in the label word instead of the adjacency matrix.
    pub fn add_edge(&mut self, v: usize, w: usize, directed: bool, val: u32) {
        if v == w {
            self.labels[v] |= LOOP_BIT;
        } else if directed {
            self.adjmat[v][w] |= val;
            self.adjmat[w][v] |= val << 16;
        } else {
            self.adjmat[v][w] = val;
            self.adjmat[w][v] = val;
        }
    }

    /// Builds the graph induced by `order`: vertex `i` of the new graph is
    /// vertex `order[i]` of this one
    pub fn induced_subgraph(&self, order: &[usize]) -> Graph {
        let mut g = Graph::new(order.len());
        for (i, &oi) in order.iter().enumerate() {
            for (j, &oj) in order.iter().enumerate() {
                g.adjmat[i][j] = self.adjmat[oi][oj];
            }
            g.labels[i] = self.labels[oi];
        }
        g
    }

    /// Degree of every vertex, counting forward and backward edges separately
    /// so that a directed edge contributes to both of its endpoints
    pub fn degrees(&self) -> Vec<usize> {
        let mut degree = vec![0; self.n];
        for v in 0..self.n {
            for w in 0..self.n {
                if self.adjmat[v][w] & FORWARD_MASK != 0 {
                    degree[v] += 1;
                }
                if self.adjmat[v][w] & !FORWARD_MASK != 0 {
                    degree[v] += 1;
                }
            }
        }
        degree
    }
}
