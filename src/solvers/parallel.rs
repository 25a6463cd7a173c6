//McSplit
//Copyright (C) 2022-2024 A. Dubray, L. Dierckx
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

//! Work-donating variant of the branch-and-bound search, used near the root
//! of the tree. The node is set up exactly like the sequential variant, but
//! the tuple-enumeration loop is shared: every iteration of the outermost
//! cursor (plus one final synthetic iteration for the "pivot matches
//! nothing" branch) is claimed from a node-local atomic counter, so the
//! donor and any helpers that join the node each run a disjoint subset of
//! the iterations. Helpers replay the loop on their own deep copies of the
//! matching, the domains and the vertex buffers; the tree explored is the
//! same as the sequential one regardless of how many threads take part.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::common::{VertexTuple, MAX_GRAPHS, SPLIT_LEVELS};
use crate::core::multidomain::{Multidomain, VertexBuffers};

use super::{next_candidate, trace, tuple_from, HelpMe, Position, Solver, TaskFn, WorkerState};

impl<'a> Solver<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn solve(
        &self,
        depth: usize,
        position: Position,
        help_me: &HelpMe<Self>,
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

        // one iteration per outermost candidate, plus the synthetic one for
        // the "pivot matches nothing" branch
        let i_end = domains[domain_index].lens[order[1]] + 2;
        let shared_i = Arc::new(AtomicUsize::new(0));

        if depth <= SPLIT_LEVELS {
            let helper: Arc<TaskFn<Self>> = {
                let current = current.clone();
                let domains = domains.clone();
                let vv = vv.clone();
                let shared_i = Arc::clone(&shared_i);
                Arc::new(
                    move |solver: &Self, help_me: &HelpMe<Self>, state: &mut WorkerState| {
                        let mut which_i = shared_i.fetch_add(1, Ordering::SeqCst);
                        if which_i >= i_end {
                            // nothing left, don't pay for the copies
                            return;
                        }
                        let mut current = current.clone();
                        let mut domains = domains.clone();
                        let mut vv = vv.clone();
                        let mut partial = partial;
                        solver.node_loop(
                            depth,
                            position,
                            help_me,
                            state,
                            &mut current,
                            &mut domains,
                            &mut vv,
                            &mut partial,
                            domain_index,
                            order,
                            &shared_i,
                            i_end,
                            &mut which_i,
                        );
                    },
                )
            };

            // claim the first iteration before advertising the task
            let mut which_i = shared_i.fetch_add(1, Ordering::SeqCst);
            help_me.get_help_with(
                position,
                helper,
                |state| {
                    self.node_loop(
                        depth,
                        position,
                        help_me,
                        state,
                        current,
                        domains,
                        vv,
                        &mut partial,
                        domain_index,
                        order,
                        &shared_i,
                        i_end,
                        &mut which_i,
                    );
                },
                state,
            );
        } else {
            let mut which_i = shared_i.fetch_add(1, Ordering::SeqCst);
            self.node_loop(
                depth,
                position,
                help_me,
                state,
                current,
                domains,
                vv,
                &mut partial,
                domain_index,
                order,
                &shared_i,
                i_end,
                &mut which_i,
            );
        }
    }

    /// The shared tuple-enumeration loop of one node. `which_i` is the
    /// iteration currently owned by this thread; whenever the outermost
    /// cursor advances past an owned iteration a new one is drawn from
    /// `shared_i`. Runs on the donor's own state and on helpers' copies
    /// alike.
    #[allow(clippy::too_many_arguments)]
    fn node_loop(
        &self,
        depth: usize,
        position: Position,
        help_me: &HelpMe<Self>,
        state: &mut WorkerState,
        current: &mut Vec<VertexTuple>,
        domains: &mut Vec<Multidomain>,
        vv: &mut VertexBuffers,
        partial: &mut [Option<usize>; MAX_GRAPHS],
        domain_index: usize,
        order: [usize; MAX_GRAPHS],
        shared_i: &AtomicUsize,
        i_end: usize,
        which_i: &mut usize,
    ) {
        let mut w0_index = 0;
        let mut i = 1;
        while i > 0 {
            let graph = order[i];
            if next_candidate(vv, &domains[domain_index], graph, &mut partial[graph]) {
                let outermost = i == 1;
                let owned = !outermost || *which_i == w0_index;
                if owned {
                    i += 1;
                    if i == self.k {
                        let tuple = tuple_from(partial, self.k);
                        current.push(tuple);
                        let mut refined = self.filter_domains(domains, vv, &tuple);
                        if depth > SPLIT_LEVELS {
                            if self.aborted() {
                                return;
                            }
                            self.solve_nopar(depth + 1, state, current, &mut refined, vv);
                        } else {
                            let child = position.child(depth, self.next_position());
                            if self.aborted() {
                                return;
                            }
                            self.solve(
                                depth + 1,
                                child,
                                help_me,
                                state,
                                current,
                                &mut refined,
                                vv,
                            );
                        }
                        i -= 1;
                        current.pop();
                    }
                    if outermost {
                        *which_i = shared_i.fetch_add(1, Ordering::SeqCst);
                    }
                }
                if outermost {
                    w0_index += 1;
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

        // pair the pivot with nothing; the synthetic final iteration keeps
        // this branch on exactly one thread
        if *which_i == w0_index {
            if depth > SPLIT_LEVELS {
                self.solve_nopar(depth + 1, state, current, domains, vv);
            } else {
                let child = position.child(depth, self.next_position());
                self.solve(depth + 1, child, help_me, state, current, domains, vv);
            }
        }
    }
}
