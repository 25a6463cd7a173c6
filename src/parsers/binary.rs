//McSplit
//Copyright (C) 2022 A. Dubray, L. Dierckx
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

//! This module provides a parser for the 16-bit binary benchmark format: a
//! stream of little-endian words holding the vertex count, one label word
//! per vertex, and one adjacency list per vertex (edge count, then target
//! and edge-label word pairs). Raw labels are compressed so that roughly a
//! third of the vertices share each label value: with m = ⌊n·33/100⌋, the
//! word keeps its top k bits where 2^k is the largest power of two below m
//! (at most 16).

use std::fs;
use std::path::Path;

use crate::common::Config;
use crate::core::graph::Graph;
use crate::errors::Error;

use super::check_vertex;

struct Words<'a> {
    bytes: &'a [u8],
    offset: usize,
    path: &'a Path,
}

impl Words<'_> {
    fn next(&mut self) -> Result<u32, Error> {
        if self.offset + 2 > self.bytes.len() {
            return Err(Error::malformed(self.path, "unexpected end of file"));
        }
        let word = u16::from_le_bytes([self.bytes[self.offset], self.bytes[self.offset + 1]]);
        self.offset += 2;
        Ok(word as u32)
    }
}

fn label_shift(n: usize) -> u32 {
    let m = n * 33 / 100;
    let mut p = 1;
    let mut k1 = 0;
    let mut k2 = 0;
    while p < m && k1 < 16 {
        p *= 2;
        k1 = k2;
        k2 += 1;
    }
    16 - k1
}

pub fn graph_from_binary(path: &Path, config: &Config) -> Result<Graph, Error> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    let mut words = Words {
        bytes: &bytes,
        offset: 0,
        path,
    };

    let n = words.next()? as usize;
    let mut graph = Graph::new(n);
    let shift = label_shift(n);

    for v in 0..n {
        let label = words.next()? >> shift;
        if config.vertex_labelled {
            graph.or_label(v, label);
        }
    }
    for v in 0..n {
        let count = words.next()? as usize;
        for _ in 0..count {
            let target = words.next()? as usize;
            let label = (words.next()? >> shift) + 1;
            check_vertex(target, n, path)?;
            let value = if config.edge_labelled { label } else { 1 };
            graph.add_edge(v, target, config.directed, value);
        }
    }
    Ok(graph)
}

#[cfg(test)]
mod test_binary {
    use super::*;
    use std::io::Write;

    fn write_words(words: &[u16]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for word in words {
            file.write_all(&word.to_le_bytes()).unwrap();
        }
        file
    }

    #[test]
    fn parses_a_small_graph() {
        // 2 vertices, zero labels, an edge 0 -> 1 and its mirror
        let file = write_words(&[2, 0, 0, 1, 1, 0, 1, 0, 0]);
        let graph = graph_from_binary(file.path(), &Config::default()).unwrap();
        assert_eq!(2, graph.n());
        assert_eq!(1, graph.adjacency(0, 1));
        assert_eq!(1, graph.adjacency(1, 0));
    }

    #[test]
    fn small_graphs_compress_labels_away() {
        // below m = 1 every label word shifts down to zero
        assert_eq!(16, label_shift(2));
        assert_eq!(0, 0xFFFFu32 >> label_shift(2));
    }

    #[test]
    fn truncated_file_is_rejected() {
        let file = write_words(&[2, 0]);
        assert!(graph_from_binary(file.path(), &Config::default()).is_err());
    }
}
