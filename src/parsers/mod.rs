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

pub mod binary;
pub mod dimacs;
pub mod ioi;
pub mod lad;

use std::path::Path;
use std::str::FromStr;

use crate::common::{Config, GraphFormat};
use crate::core::graph::Graph;
use crate::errors::Error;

use binary::graph_from_binary;
use dimacs::graph_from_dimacs;
use ioi::graph_from_ioi;
use lad::graph_from_lad;

/// Loads a graph file in the given format. Vertex labels are kept only when
/// the configuration asks for them, and edges are stored directed or
/// undirected accordingly.
pub fn read_graph(path: &Path, format: GraphFormat, config: &Config) -> Result<Graph, Error> {
    match format {
        GraphFormat::Binary => graph_from_binary(path, config),
        GraphFormat::Dimacs => graph_from_dimacs(path, config),
        GraphFormat::Ioi => graph_from_ioi(path, config),
        GraphFormat::Lad => graph_from_lad(path, config),
    }
}

pub(crate) fn next_token<T: FromStr>(
    tokens: &mut std::str::SplitWhitespace,
    path: &Path,
    what: &str,
) -> Result<T, Error> {
    tokens
        .next()
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| Error::malformed(path, format!("could not read {}", what)))
}

pub(crate) fn check_vertex(vertex: usize, n: usize, path: &Path) -> Result<(), Error> {
    if vertex >= n {
        Err(Error::malformed(
            path,
            format!("vertex {} out of range (the graph has {} vertices)", vertex, n),
        ))
    } else {
        Ok(())
    }
}
