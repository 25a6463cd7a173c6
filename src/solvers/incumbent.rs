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

use std::sync::atomic::{AtomicUsize, Ordering};

/// Size of the best matching found so far, shared by every thread of the
/// search. Only the size lives here: the matching itself is kept per thread
/// and the largest one is collected when the workers are joined. The value
/// never decreases, so a stale read can only make the bound pruning less
/// aggressive, never wrong.
#[derive(Default)]
pub struct AtomicIncumbent {
    value: AtomicUsize,
}

impl AtomicIncumbent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> usize {
        self.value.load(Ordering::SeqCst)
    }

    /// Raises the incumbent to `v` if it is an improvement. Returns true iff
    /// this call changed the value.
    pub fn update(&self, v: usize) -> bool {
        loop {
            let current = self.value.load(Ordering::SeqCst);
            if v <= current {
                return false;
            }
            if self
                .value
                .compare_exchange(current, v, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return true;
            }
        }
    }
}
