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

//! This module provides a parser for graphs in DIMACS format. An example of
//! valid file is given next
//!
//! c This line is a comment
//! p edge 4 3
//! e 1 2
//! e 2 3
//! e 3 4
//! n 1 7
//!
//! Vertices are 1-indexed in the file. A line starting with n assigns a
//! label to a vertex; labels are dropped unless the search is
//! vertex-labelled. An edge from a vertex to itself marks a loop on that
//! vertex.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::common::Config;
use crate::core::graph::Graph;
use crate::errors::Error;

use super::{check_vertex, next_token};

pub fn graph_from_dimacs(path: &Path, config: &Config) -> Result<Graph, Error> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let reader = BufReader::new(file);

    let mut graph = Graph::new(0);
    let mut expected_edges = 0;
    let mut edges_read = 0;
    for line in reader.lines() {
        let line = line.map_err(|e| Error::io(path, e))?;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("p") => {
                if tokens.next() != Some("edge") {
                    return Err(Error::malformed(path, "expected a 'p edge' header"));
                }
                let n: usize = next_token(&mut tokens, path, "the number of vertices")?;
                expected_edges = next_token(&mut tokens, path, "the number of edges")?;
                graph = Graph::new(n);
            }
            Some("e") => {
                let v: usize = next_token(&mut tokens, path, "an edge endpoint")?;
                let w: usize = next_token(&mut tokens, path, "an edge endpoint")?;
                if v == 0 || w == 0 {
                    return Err(Error::malformed(path, "vertices are 1-indexed"));
                }
                check_vertex(v - 1, graph.n(), path)?;
                check_vertex(w - 1, graph.n(), path)?;
                graph.add_edge(v - 1, w - 1, config.directed, 1);
                edges_read += 1;
            }
            Some("n") => {
                let v: usize = next_token(&mut tokens, path, "a labelled vertex")?;
                let label: u32 = next_token(&mut tokens, path, "a vertex label")?;
                if v == 0 {
                    return Err(Error::malformed(path, "vertices are 1-indexed"));
                }
                check_vertex(v - 1, graph.n(), path)?;
                if config.vertex_labelled {
                    graph.or_label(v - 1, label);
                }
            }
            _ => {}
        }
    }
    if expected_edges > 0 && edges_read != expected_edges {
        return Err(Error::malformed(
            path,
            format!("expected {} edges, read {}", expected_edges, edges_read),
        ));
    }
    Ok(graph)
}
