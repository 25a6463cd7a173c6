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

//! Vertex-order preprocessing. The search branches on the smallest vertex
//! value first, so renumbering every graph in descending order of degree
//! makes the search anchor dense vertices early and fail high ones fast.
//! The permutation is undone on the returned tuples, so callers only ever
//! see original vertex indices.

use crate::core::graph::Graph;

/// The vertices of `graph` sorted by descending degree, ties broken on the
/// original index
pub(crate) fn degree_descending_order(graph: &Graph) -> Vec<usize> {
    let degrees = graph.degrees();
    let mut order: Vec<usize> = (0..graph.n()).collect();
    order.sort_by(|&a, &b| degrees[b].cmp(&degrees[a]));
    order
}
