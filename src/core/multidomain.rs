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

//! This module implements the branching state of the search: a multidomain
//! groups, for every input graph, a contiguous slice of that graph's vertex
//! buffer. All the vertices inside the k slices of one multidomain share the
//! same label and the same adjacency profile with respect to the current
//! matching, so any vertex of slice 0 may be matched with any combination of
//! vertices from the other slices.
//!
//! The slices are ranges into the per-graph vertex buffers (`VertexBuffers`).
//! Refining a domain reorders vertices inside a slice and never moves a
//! vertex across slice boundaries; removing a vertex swaps it just past the
//! end of its slice, where the tuple-enumeration cursor can still reach it.

use crate::common::MAX_GRAPHS;

/// One vertex buffer per input graph. Each buffer holds a permutation of a
/// subset of that graph's vertices, and multidomains slice into it.
pub type VertexBuffers = Vec<Vec<usize>>;

#[derive(Debug, Clone)]
pub struct Multidomain {
    /// Start offset of the slice in each vertex buffer
    pub starts: [usize; MAX_GRAPHS],
    /// Length of the slice in each vertex buffer
    pub lens: [usize; MAX_GRAPHS],
    /// True iff some vertex of the current matching has an edge into the slices
    pub is_adjacent: bool,
}

impl Multidomain {
    pub fn new(starts: [usize; MAX_GRAPHS], lens: [usize; MAX_GRAPHS], is_adjacent: bool) -> Self {
        Self {
            starts,
            lens,
            is_adjacent,
        }
    }
}

/// Reorders `buf[start..start + len]` so that the vertices with an edge in
/// `adjrow` form a prefix, and returns the length of that prefix.
pub fn partition(buf: &mut [usize], start: usize, len: usize, adjrow: &[u32]) -> usize {
    let mut i = 0;
    for j in 0..len {
        if adjrow[buf[start + j]] != 0 {
            buf.swap(start + i, start + j);
            i += 1;
        }
    }
    i
}

/// Smallest vertex value in `buf[start..start + len]`. The slice must not be
/// empty.
pub fn min_value(buf: &[usize], start: usize, len: usize) -> usize {
    buf[start..start + len].iter().copied().min().unwrap()
}

/// Position (relative to `start`) of the smallest value in
/// `buf[start..start + len]` strictly greater than `after`, or `None` when
/// every value has been enumerated already.
pub fn index_of_next_smallest(
    buf: &[usize],
    start: usize,
    len: usize,
    after: Option<usize>,
) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (i, &v) in buf[start..start + len].iter().enumerate() {
        if after.map_or(true, |w| v > w) && best.map_or(true, |(_, b)| v < b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

/// Removes `v` from the slice of graph `graph`: swaps it with the last
/// element and shrinks the slice, leaving `v` parked just past the end.
pub fn remove_vertex(buf: &mut [usize], md: &mut Multidomain, graph: usize, v: usize) {
    let start = md.starts[graph];
    let mut i = 0;
    while buf[start + i] != v {
        i += 1;
    }
    buf.swap(start + i, start + md.lens[graph] - 1);
    md.lens[graph] -= 1;
}

#[cfg(test)]
mod test_multidomain {
    use super::*;

    #[test]
    fn partition_splits_on_adjacency() {
        let mut buf = vec![4, 1, 3, 0, 2];
        // 1 and 2 have an edge, the rest do not
        let adjrow = vec![0, 1, 5, 0, 0];
        let prefix = partition(&mut buf, 1, 4, &adjrow);
        assert_eq!(2, prefix);
        assert_eq!(4, buf[0]);
        let mut edge_side = buf[1..3].to_vec();
        edge_side.sort();
        assert_eq!(vec![1, 2], edge_side);
        let mut rest = buf[3..5].to_vec();
        rest.sort();
        assert_eq!(vec![0, 3], rest);
    }

    #[test]
    fn next_smallest_walks_in_ascending_order() {
        let buf = vec![7, 2, 9, 4];
        let mut seen = vec![];
        let mut cursor = None;
        while let Some(i) = index_of_next_smallest(&buf, 0, 4, cursor) {
            cursor = Some(buf[i]);
            seen.push(buf[i]);
        }
        assert_eq!(vec![2, 4, 7, 9], seen);
    }

    #[test]
    fn next_smallest_respects_slice_bounds() {
        let buf = vec![7, 2, 9, 4];
        assert_eq!(Some(1), index_of_next_smallest(&buf, 1, 2, None));
        assert_eq!(None, index_of_next_smallest(&buf, 1, 2, Some(9)));
    }

    #[test]
    fn remove_vertex_parks_it_past_the_slice() {
        let mut buf = vec![5, 3, 8, 6];
        let mut md = Multidomain::new([0; MAX_GRAPHS], [0; MAX_GRAPHS], false);
        md.lens[0] = 4;
        remove_vertex(&mut buf, &mut md, 0, 3);
        assert_eq!(3, md.lens[0]);
        assert_eq!(3, buf[3]);
        assert!(!buf[..3].contains(&3));
    }

    #[test]
    fn min_value_over_a_slice() {
        let buf = vec![5, 3, 8, 6];
        assert_eq!(3, min_value(&buf, 0, 4));
        assert_eq!(6, min_value(&buf, 2, 2));
    }
}
