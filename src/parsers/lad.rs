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

//! This module provides a parser for graphs in LAD format: the number of
//! vertices followed by one adjacency list per vertex, each being an edge
//! count and that many 0-indexed targets. The format carries no labels.

use std::fs;
use std::path::Path;

use crate::common::Config;
use crate::core::graph::Graph;
use crate::errors::Error;

use super::{check_vertex, next_token};

pub fn graph_from_lad(path: &Path, config: &Config) -> Result<Graph, Error> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let mut tokens = content.split_whitespace();

    let n: usize = next_token(&mut tokens, path, "the number of vertices")?;
    let mut graph = Graph::new(n);
    for v in 0..n {
        let count: usize = next_token(&mut tokens, path, "an edge count")?;
        for _ in 0..count {
            let w: usize = next_token(&mut tokens, path, "an edge target")?;
            check_vertex(w, n, path)?;
            graph.add_edge(v, w, config.directed, 1);
        }
    }
    Ok(graph)
}

#[cfg(test)]
mod test_lad {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_adjacency_lists() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "3\n2 1 2\n1 2\n0\n").unwrap();
        let graph = graph_from_lad(file.path(), &Config::default()).unwrap();
        assert_eq!(3, graph.n());
        assert_eq!(1, graph.adjacency(0, 1));
        assert_eq!(1, graph.adjacency(0, 2));
        assert_eq!(1, graph.adjacency(1, 2));
        assert_eq!(1, graph.adjacency(2, 1));
    }

    #[test]
    fn truncated_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "3\n2 1\n").unwrap();
        assert!(graph_from_lad(file.path(), &Config::default()).is_err());
    }
}
