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

//! This module provides a parser for the IOI text format: a header with the
//! vertex and edge counts, one label per vertex, then one 0-indexed vertex
//! pair per edge.

use std::fs;
use std::path::Path;

use crate::common::Config;
use crate::core::graph::Graph;
use crate::errors::Error;

use super::{check_vertex, next_token};

pub fn graph_from_ioi(path: &Path, config: &Config) -> Result<Graph, Error> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let mut tokens = content.split_whitespace();

    let n: usize = next_token(&mut tokens, path, "the number of vertices")?;
    let m: usize = next_token(&mut tokens, path, "the number of edges")?;
    let mut graph = Graph::new(n);
    for v in 0..n {
        let label: u32 = next_token(&mut tokens, path, "a vertex label")?;
        if config.vertex_labelled {
            graph.or_label(v, label);
        }
    }
    for _ in 0..m {
        let v: usize = next_token(&mut tokens, path, "an edge endpoint")?;
        let w: usize = next_token(&mut tokens, path, "an edge endpoint")?;
        check_vertex(v, n, path)?;
        check_vertex(w, n, path)?;
        graph.add_edge(v, w, config.directed, 1);
    }
    Ok(graph)
}
