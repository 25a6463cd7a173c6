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

//! This module provides the solver for the maximum common induced subgraph
//! problem over k graphs. It is responsible for orchestrating the different
//! parts and gluing them together: it builds the initial multidomains from
//! the label intersection of the input graphs, runs the branch-and-bound
//! search (fanning shallow sub-trees out to worker threads), and collects the
//! per-thread incumbents into the final matching.
//!
//! The search exists in two mirror variants that explore the same tree: a
//! sequential one used below the donation depth, and a work-donating one used
//! near the root. Both prune with the same bound, the sum over all domains of
//! the smallest slice length, against the globally shared incumbent size.

mod helpme;
mod incumbent;
mod parallel;
mod sequential;
mod statistics;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::Duration;

use rustc_hash::FxHashSet;

use crate::common::{Config, VertexTuple, MAX_GRAPHS};
use crate::core::graph::Graph;
use crate::core::multidomain::{
    index_of_next_smallest, min_value, partition, remove_vertex, Multidomain, VertexBuffers,
};
use crate::heuristics::DomainSelection;

pub(crate) use helpme::{HelpMe, Position, TaskFn};
pub(crate) use incumbent::AtomicIncumbent;
pub(crate) use statistics::Statistics;

/// State owned by one thread of the search: its node counter, the best
/// matching it has seen, and the time it spent inside stolen tasks. The main
/// thread is a worker like any other; the final matching is the largest of
/// these slots.
#[derive(Default)]
pub struct WorkerState {
    pub nodes: u64,
    pub best: Vec<VertexTuple>,
    pub work_time: Duration,
}

/// One search over the input graphs for a fixed target size. The solver is
/// shared immutably by every thread; all mutable search state lives in the
/// per-call buffers and the per-thread [WorkerState].
pub(crate) struct Solver<'a> {
    graphs: &'a [Graph],
    config: &'a Config,
    k: usize,
    /// Matchings smaller than this are not worth reporting
    goal: usize,
    selection: Box<dyn DomainSelection>,
    incumbent: &'a AtomicIncumbent,
    abort: &'a AtomicBool,
    /// Source of fresh values for task positions
    position_counter: AtomicU64,
}

impl<'a> Solver<'a> {
    pub(crate) fn new(
        graphs: &'a [Graph],
        config: &'a Config,
        goal: usize,
        incumbent: &'a AtomicIncumbent,
        abort: &'a AtomicBool,
    ) -> Self {
        Self {
            graphs,
            config,
            k: graphs.len(),
            goal,
            selection: config.heuristic.selection(),
            incumbent,
            abort,
            position_counter: AtomicU64::new(0),
        }
    }

    pub(crate) fn aborted(&self) -> bool {
        self.abort.load(Ordering::Relaxed)
    }

    fn next_position(&self) -> u64 {
        self.position_counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Promotes `current` to the thread's best matching, and its size to the
    /// global incumbent, when it is an improvement
    fn record_incumbent(&self, state: &mut WorkerState, current: &[VertexTuple]) {
        if state.best.len() < current.len() {
            state.best = current.to_vec();
            self.incumbent.update(current.len());
        }
    }

    /// True when no matching reachable from this node can beat the incumbent
    /// or reach the goal
    fn prune(&self, matched: usize, domains: &[Multidomain]) -> bool {
        let bound = matched + calc_bound(domains, self.k);
        if bound <= self.incumbent.value() || bound < self.goal {
            return true;
        }
        self.config.big_first && self.incumbent.value() == self.goal
    }

    /// Picks the domain to branch on: the one minimising the configured
    /// functional, ties broken on the smallest vertex value in the slice of
    /// graph 0. In the connected variant only domains adjacent to the
    /// matching qualify once the matching is non-empty.
    fn select_domain(
        &self,
        domains: &[Multidomain],
        vv: &VertexBuffers,
        matched: usize,
    ) -> Option<usize> {
        let mut best = None;
        let mut best_score = u128::MAX;
        let mut best_tie_breaker = usize::MAX;
        for (index, domain) in domains.iter().enumerate() {
            if self.config.connected && matched > 0 && !domain.is_adjacent {
                continue;
            }
            let score = self.selection.score(domain, self.k);
            if score < best_score {
                best_score = score;
                best_tie_breaker = min_value(&vv[0], domain.starts[0], domain.lens[0]);
                best = Some(index);
            } else if score == best_score {
                let tie_breaker = min_value(&vv[0], domain.starts[0], domain.lens[0]);
                if tie_breaker < best_tie_breaker {
                    best_tie_breaker = tie_breaker;
                    best = Some(index);
                }
            }
        }
        best
    }

    /// The order in which the graphs are branched on at this node: stable
    /// descending slice length, so the pivot comes from the longest slice
    fn branching_order(&self, domain: &Multidomain) -> [usize; MAX_GRAPHS] {
        let mut order = [0; MAX_GRAPHS];
        for (graph, slot) in order.iter_mut().enumerate() {
            *slot = graph;
        }
        order[..self.k].sort_by(|&a, &b| domain.lens[b].cmp(&domain.lens[a]));
        order
    }

    /// Chooses the pivot vertex v: the smallest vertex of the pivot slice.
    /// Removes v from its slice (it is either in the matching or nowhere) and
    /// tentatively shrinks every other slice by one, since a candidate tuple
    /// consumes one vertex per graph.
    fn pick_pivot(
        &self,
        domains: &mut [Multidomain],
        domain_index: usize,
        order: &[usize; MAX_GRAPHS],
        vv: &mut VertexBuffers,
        partial: &mut [Option<usize>; MAX_GRAPHS],
    ) {
        let domain = &mut domains[domain_index];
        for &graph in order[1..self.k].iter() {
            domain.lens[graph] -= 1;
        }
        let pivot = order[0];
        let v = min_value(&vv[pivot], domain.starts[pivot], domain.lens[pivot]);
        remove_vertex(&mut vv[pivot], domain, pivot, v);
        partial[pivot] = Some(v);
    }

    /// Refines the domains after matching `tuple`: each slice is partitioned
    /// into the vertices with and without an edge from the newly matched
    /// vertex of its graph. The no-edge side keeps the adjacency flag of its
    /// parent; the edge side becomes adjacent and, for directed or
    /// edge-labelled graphs, is further split into runs of equal edge words
    /// across all graphs.
    fn filter_domains(
        &self,
        domains: &[Multidomain],
        vv: &mut VertexBuffers,
        tuple: &VertexTuple,
    ) -> Vec<Multidomain> {
        let k = self.k;
        let multiway = self.config.directed || self.config.edge_labelled;
        let mut refined = Vec::with_capacity(domains.len());
        for old in domains {
            let starts = old.starts;
            let mut len_edge = [0; MAX_GRAPHS];
            let mut len_noedge = [0; MAX_GRAPHS];
            for i in 0..k {
                let adjrow = self.graphs[i].adjacency_row(tuple.vertex(i));
                len_edge[i] = partition(&mut vv[i], starts[i], old.lens[i], adjrow);
                len_noedge[i] = old.lens[i] - len_edge[i];
            }

            if len_noedge[..k].iter().all(|&len| len > 0) {
                let mut noedge_starts = [0; MAX_GRAPHS];
                for i in 0..k {
                    noedge_starts[i] = starts[i] + len_edge[i];
                }
                refined.push(Multidomain::new(noedge_starts, len_noedge, old.is_adjacent));
            }

            let edge_side = len_edge[..k].iter().all(|&len| len > 0);
            if multiway && edge_side {
                for i in 0..k {
                    let adjrow = self.graphs[i].adjacency_row(tuple.vertex(i));
                    vv[i][starts[i]..starts[i] + len_edge[i]].sort_by_key(|&u| adjrow[u]);
                }
                let mut tops = [0; MAX_GRAPHS];
                for i in 0..k {
                    tops[i] = starts[i] + len_edge[i];
                }
                let mut cursors = starts;
                while (0..k).all(|i| cursors[i] < tops[i]) {
                    let mut words = [0u32; MAX_GRAPHS];
                    for i in 0..k {
                        words[i] = self.graphs[i].adjacency(tuple.vertex(i), vv[i][cursors[i]]);
                    }
                    let maximum = words[..k].iter().copied().max().unwrap();
                    if words[..k].iter().any(|&word| word != maximum) {
                        // advance the lagging cursors towards the maximum
                        for i in 0..k {
                            if words[i] != maximum {
                                cursors[i] += 1;
                            }
                        }
                    } else {
                        // a common edge word: the run lengths form a child
                        let run_starts = cursors;
                        for i in 0..k {
                            let adjrow = self.graphs[i].adjacency_row(tuple.vertex(i));
                            loop {
                                cursors[i] += 1;
                                if cursors[i] >= tops[i] || adjrow[vv[i][cursors[i]]] != words[0] {
                                    break;
                                }
                            }
                        }
                        let mut run_lens = [0; MAX_GRAPHS];
                        for i in 0..k {
                            run_lens[i] = cursors[i] - run_starts[i];
                        }
                        refined.push(Multidomain::new(run_starts, run_lens, true));
                    }
                }
            } else if edge_side {
                refined.push(Multidomain::new(starts, len_edge, true));
            }
        }
        refined
    }
}

/// Upper bound on how much the matching can still grow: each domain
/// contributes at most its smallest slice length
fn calc_bound(domains: &[Multidomain], k: usize) -> usize {
    domains
        .iter()
        .map(|domain| domain.lens[..k].iter().copied().min().unwrap())
        .sum()
}

/// Advances the tuple-enumeration cursor of `graph` to the next candidate in
/// ascending vertex order. The freshly chosen vertex is parked in the slot
/// just past the end of the slice, where deeper cursors skip it but a later
/// call can still see it; the search range therefore covers one extra slot.
fn next_candidate(
    vv: &mut VertexBuffers,
    domain: &Multidomain,
    graph: usize,
    cursor: &mut Option<usize>,
) -> bool {
    let start = domain.starts[graph];
    let len = domain.lens[graph];
    match index_of_next_smallest(&vv[graph], start, len + 1, *cursor) {
        None => false,
        Some(index) => {
            let w = vv[graph][start + index];
            vv[graph][start + index] = vv[graph][start + len];
            vv[graph][start + len] = w;
            *cursor = Some(w);
            true
        }
    }
}

fn tuple_from(partial: &[Option<usize>; MAX_GRAPHS], k: usize) -> VertexTuple {
    let mut vertices = [0; MAX_GRAPHS];
    for i in 0..k {
        vertices[i] = partial[i].unwrap();
    }
    VertexTuple::new(vertices, k)
}

/// One line per node, built in full before printing so that concurrent
/// traces do not interleave
fn trace(current: &[VertexTuple], depth: usize) {
    let mut line = String::new();
    for tuple in current {
        line.push_str(&tuple.to_string());
        line.push(' ');
    }
    line.push_str(&format!(": {}", depth));
    println!("{}", line);
}

/// Builds the root state: one multidomain per label common to every graph,
/// with the matching vertices appended to the buffers in ascending order
pub(crate) fn root_domains(graphs: &[Graph]) -> (VertexBuffers, Vec<Multidomain>) {
    let k = graphs.len();
    let mut common: FxHashSet<u32> = (0..graphs[0].n()).map(|v| graphs[0].label(v)).collect();
    for graph in graphs.iter().skip(1) {
        let labels: FxHashSet<u32> = (0..graph.n()).map(|v| graph.label(v)).collect();
        common.retain(|label| labels.contains(label));
    }
    let mut labels: Vec<u32> = common.into_iter().collect();
    labels.sort_unstable();

    let mut vv: VertexBuffers = vec![vec![]; k];
    let mut domains = Vec::with_capacity(labels.len());
    for label in labels {
        let mut starts = [0; MAX_GRAPHS];
        let mut lens = [0; MAX_GRAPHS];
        for (i, graph) in graphs.iter().enumerate() {
            starts[i] = vv[i].len();
            for v in 0..graph.n() {
                if graph.label(v) == label {
                    vv[i].push(v);
                }
            }
            lens[i] = vv[i].len() - starts[i];
        }
        domains.push(Multidomain::new(starts, lens, false));
    }
    (vv, domains)
}

/// Runs the search to completion (or abort) and returns the best matching
/// found together with the total number of explored nodes
pub(crate) fn mcs<const S: bool>(
    graphs: &[Graph],
    config: &Config,
    abort: &AtomicBool,
    statistics: &mut Statistics<S>,
) -> (Vec<VertexTuple>, u64) {
    let (vv, domains) = root_domains(graphs);
    let incumbent = AtomicIncumbent::new();
    let mut best: Vec<VertexTuple> = vec![];
    let mut nodes = 0;

    if config.big_first {
        for goal in (1..=graphs[0].n()).rev() {
            let mut goal_vv = vv.clone();
            let mut goal_domains = domains.clone();
            let (goal_best, goal_nodes) = run_goal(
                graphs,
                config,
                &incumbent,
                abort,
                goal,
                &mut goal_domains,
                &mut goal_vv,
                statistics,
            );
            nodes += goal_nodes;
            if goal_best.len() > best.len() {
                best = goal_best;
            }
            if incumbent.value() == goal || abort.load(Ordering::Relaxed) {
                break;
            }
            if !config.quiet {
                println!("Upper bound: {}", goal - 1);
            }
        }
    } else {
        let mut vv = vv;
        let mut domains = domains;
        let (run_best, run_nodes) = run_goal(
            graphs,
            config,
            &incumbent,
            abort,
            1,
            &mut domains,
            &mut vv,
            statistics,
        );
        best = run_best;
        nodes = run_nodes;
    }
    (best, nodes)
}

/// One complete search for matchings of at least `goal` tuples: spawns the
/// worker pool, runs the donating search from the root, then reduces the
/// per-thread results
#[allow(clippy::too_many_arguments)]
fn run_goal<const S: bool>(
    graphs: &[Graph],
    config: &Config,
    incumbent: &AtomicIncumbent,
    abort: &AtomicBool,
    goal: usize,
    domains: &mut Vec<Multidomain>,
    vv: &mut VertexBuffers,
    statistics: &mut Statistics<S>,
) -> (Vec<VertexTuple>, u64) {
    let solver = Solver::new(graphs, config, goal, incumbent, abort);
    let help_me = HelpMe::new();
    thread::scope(|scope| {
        let workers: Vec<_> = (1..config.threads)
            .map(|_| scope.spawn(|| help_me.worker_loop(&solver)))
            .collect();

        let mut state = WorkerState::default();
        let mut current = vec![];
        solver.solve(
            0,
            Position::default(),
            &help_me,
            &mut state,
            &mut current,
            domains,
            vv,
        );
        help_me.kill_workers();

        let mut best = std::mem::take(&mut state.best);
        let mut nodes = state.nodes;
        for worker in workers {
            let worker_state = worker.join().unwrap();
            nodes += worker_state.nodes;
            statistics.thread_work_time(worker_state.work_time);
            if worker_state.best.len() > best.len() {
                best = worker_state.best;
            }
        }
        let (donated, helped) = help_me.counters();
        statistics.tasks(donated, helped);
        (best, nodes)
    })
}

/// Drives the cooperative abort flag: sleeps until the deadline, or until
/// the search finishes first, and raises the flag only when the deadline won
pub(crate) struct Timeout {
    thread: Option<thread::JoinHandle<()>>,
    signal: Arc<(Mutex<bool>, Condvar)>,
}

impl Timeout {
    pub(crate) fn start(seconds: u64, abort: Arc<AtomicBool>) -> Self {
        let signal = Arc::new((Mutex::new(false), Condvar::new()));
        let thread = if seconds == 0 {
            None
        } else {
            let signal = Arc::clone(&signal);
            Some(thread::spawn(move || {
                let (finished, cv) = &*signal;
                let guard = finished.lock().unwrap();
                let (_guard, wait) = cv
                    .wait_timeout_while(guard, Duration::from_secs(seconds), |finished| !*finished)
                    .unwrap();
                if wait.timed_out() {
                    abort.store(true, Ordering::Relaxed);
                }
            }))
        };
        Self {
            thread,
            signal,
        }
    }

    /// Wakes the timeout thread up and joins it
    pub(crate) fn stop(self) {
        if let Some(thread) = self.thread {
            {
                let (finished, cv) = &*self.signal;
                *finished.lock().unwrap() = true;
                cv.notify_all();
            }
            thread.join().unwrap();
        }
    }
}

#[cfg(test)]
mod test_solvers {
    use super::*;

    #[test]
    fn root_domains_intersect_labels() {
        let mut g0 = Graph::new(3);
        g0.or_label(0, 1);
        g0.or_label(1, 2);
        g0.or_label(2, 1);
        let mut g1 = Graph::new(2);
        g1.or_label(0, 1);
        g1.or_label(1, 3);
        let (vv, domains) = root_domains(&[g0, g1]);
        // only label 1 is common
        assert_eq!(1, domains.len());
        assert_eq!(vec![0, 2], vv[0]);
        assert_eq!(vec![0], vv[1]);
        assert_eq!(2, domains[0].lens[0]);
        assert_eq!(1, domains[0].lens[1]);
        assert!(!domains[0].is_adjacent);
    }

    #[test]
    fn root_domains_empty_when_no_common_label() {
        let mut g0 = Graph::new(1);
        g0.or_label(0, 1);
        let g1 = Graph::new(1);
        let (_, domains) = root_domains(&[g0, g1]);
        assert!(domains.is_empty());
    }

    #[test]
    fn bound_sums_smallest_slices() {
        let mut a = Multidomain::new([0; MAX_GRAPHS], [0; MAX_GRAPHS], false);
        a.lens[0] = 3;
        a.lens[1] = 2;
        let mut b = Multidomain::new([0; MAX_GRAPHS], [0; MAX_GRAPHS], true);
        b.lens[0] = 1;
        b.lens[1] = 5;
        assert_eq!(3, calc_bound(&[a, b], 2));
    }

    #[test]
    fn candidates_enumerate_in_ascending_order() {
        let mut vv: VertexBuffers = vec![vec![4, 1, 3, 0]];
        let mut domain = Multidomain::new([0; MAX_GRAPHS], [0; MAX_GRAPHS], false);
        // one tentatively shrunk slice: 3 live vertices plus the parked slot
        domain.lens[0] = 3;
        let mut cursor = None;
        let mut seen = vec![];
        while next_candidate(&mut vv, &domain, 0, &mut cursor) {
            seen.push(cursor.unwrap());
        }
        assert_eq!(vec![0, 1, 3, 4], seen);
    }

    fn test_solver<'a>(
        graphs: &'a [Graph],
        config: &'a Config,
        incumbent: &'a AtomicIncumbent,
        abort: &'a AtomicBool,
    ) -> Solver<'a> {
        Solver::new(graphs, config, 1, incumbent, abort)
    }

    #[test]
    fn refinement_splits_on_adjacency() {
        // two identical paths 0 - 1 - 2
        let mut graph = Graph::new(3);
        graph.add_edge(0, 1, false, 1);
        graph.add_edge(1, 2, false, 1);
        let graphs = vec![graph.clone(), graph];
        let config = Config::default();
        let incumbent = AtomicIncumbent::new();
        let abort = AtomicBool::new(false);
        let solver = test_solver(&graphs, &config, &incumbent, &abort);

        let (mut vv, domains) = root_domains(&graphs);
        let tuple = VertexTuple::new([1; MAX_GRAPHS], 2);
        let refined = solver.filter_domains(&domains, &mut vv, &tuple);

        assert_eq!(2, refined.len());
        for child in &refined {
            for i in 0..2 {
                // children stay inside the parent slice
                assert!(child.starts[i] >= domains[0].starts[i]);
                assert!(child.starts[i] + child.lens[i] <= domains[0].starts[i] + domains[0].lens[i]);
                assert!(child.lens[i] > 0);
            }
        }
        // the neighbours of 1 form the adjacent child, 1 itself the other
        let adjacent: Vec<_> = refined.iter().filter(|child| child.is_adjacent).collect();
        assert_eq!(1, adjacent.len());
        assert_eq!(2, adjacent[0].lens[0]);
        let mut neighbours =
            vv[0][adjacent[0].starts[0]..adjacent[0].starts[0] + adjacent[0].lens[0]].to_vec();
        neighbours.sort();
        assert_eq!(vec![0, 2], neighbours);
    }

    #[test]
    fn multiway_refinement_groups_equal_edge_words() {
        // a star with two differently labelled edges, matched against itself
        let mut graph = Graph::new(3);
        graph.add_edge(0, 1, false, 1);
        graph.add_edge(0, 2, false, 2);
        let graphs = vec![graph.clone(), graph];
        let config = Config {
            edge_labelled: true,
            ..Config::default()
        };
        let incumbent = AtomicIncumbent::new();
        let abort = AtomicBool::new(false);
        let solver = test_solver(&graphs, &config, &incumbent, &abort);

        let mut vv: VertexBuffers = vec![vec![1, 2], vec![1, 2]];
        let mut domain = Multidomain::new([0; MAX_GRAPHS], [0; MAX_GRAPHS], false);
        domain.lens[0] = 2;
        domain.lens[1] = 2;
        let tuple = VertexTuple::new([0; MAX_GRAPHS], 2);
        let refined = solver.filter_domains(&[domain], &mut vv, &tuple);

        // one child per edge word, both adjacent to the matching
        assert_eq!(2, refined.len());
        for child in &refined {
            assert!(child.is_adjacent);
            assert_eq!(1, child.lens[0]);
            assert_eq!(1, child.lens[1]);
            let w0 = graphs[0].adjacency(0, vv[0][child.starts[0]]);
            let w1 = graphs[1].adjacency(0, vv[1][child.starts[1]]);
            assert_eq!(w0, w1);
        }
    }

    #[test]
    fn timeout_raises_abort() {
        let abort = Arc::new(AtomicBool::new(false));
        let timeout = Timeout::start(1, Arc::clone(&abort));
        while !abort.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_millis(10));
        }
        timeout.stop();
    }

    #[test]
    fn timeout_stays_silent_when_stopped_early() {
        let abort = Arc::new(AtomicBool::new(false));
        let timeout = Timeout::start(3600, Arc::clone(&abort));
        timeout.stop();
        assert!(!abort.load(Ordering::Relaxed));
    }
}
