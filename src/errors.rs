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

use std::path::PathBuf;

use thiserror::Error;

use crate::common::MAX_GRAPHS;

/// Everything that can go wrong before or while running a search. A timeout
/// is not an error: the search returns its best matching with the timed-out
/// flag set instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("expected between 2 and {MAX_GRAPHS} input graphs, got {0}")]
    GraphCount(usize),
    #[error("the search needs at least one thread")]
    NoThreads,
    #[error("could not read graph file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed graph file {path:?}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

impl Error {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn malformed(path: &std::path::Path, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
