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

//! Sequential variant of the branch-and-bound search, used once the
//! recursion is below the donation depth. It explores exactly the same tree
//! as the donating variant: pick a domain, anchor the smallest vertex v of
//! the pivot slice, enumerate every candidate tuple around v by a cascading
//! next-smallest cursor walk over the remaining graphs, and finally descend
//! once more with v excluded from the matching altogether.

use crate::common::{VertexTuple, MAX_GRAPHS};
use crate::core::multidomain::{Multidomain, VertexBuffers};

use super::{next_candidate, trace, tuple_from, Solver, WorkerState};

impl Solver<'_> {
    pub(crate) fn solve_nopar(
        &self,
        depth: usize,
        state: &mut WorkerState,
        current: &mut Vec<VertexTuple>,
        domains: &mut Vec<Multidomain>,
        vv: &mut VertexBuffers,
    ) {
        self.record_incumbent(state, current);
        if self.config.verbose {
            trace(current, depth);
        }
        state.nodes += 1;

        if self.prune(current.len(), domains) {
            return;
        }
        let domain_index = match self.select_domain(domains, vv, current.len()) {
            Some(index) => index,
            None => return,
        };

        let order = self.branching_order(&domains[domain_index]);
        let mut partial = [None; MAX_GRAPHS];
        self.pick_pivot(domains, domain_index, &order, vv, &mut partial);

        let mut i = 1;
        while i > 0 {
            let graph = order[i];
            if next_candidate(vv, &domains[domain_index], graph, &mut partial[graph]) {
                i += 1;
                if i == self.k {
                    let tuple = tuple_from(&partial, self.k);
                    current.push(tuple);
                    let mut refined = self.filter_domains(domains, vv, &tuple);
                    if self.aborted() {
                        return;
                    }
                    self.solve_nopar(depth + 1, state, current, &mut refined, vv);
                    i -= 1;
                    current.pop();
                }
            } else {
                partial[order[i]] = None;
                i -= 1;
            }
        }

        if domains[domain_index].lens[order[0]] == 0 {
            domains.swap_remove(domain_index);
        } else {
            for &graph in order[1..self.k].iter() {
                domains[domain_index].lens[graph] += 1;
            }
        }

        // pair the pivot with nothing and keep going
        self.solve_nopar(depth + 1, state, current, domains, vv);
    }
}
