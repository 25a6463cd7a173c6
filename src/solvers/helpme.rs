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

//! This module implements the cooperative work-donation scheduler of the
//! parallel search. When the main search enters a node at shallow depth it
//! advertises the node's iteration loop as a task, keyed by the node's
//! position in the tree, and keeps working on the loop itself. Idle workers
//! scan the task map, join the loop of any advertised task and draw
//! iteration indices from the node's shared counter, so every iteration of
//! the loop runs on exactly one thread. Once a worker returns from a task the
//! task stops being offered; the donor waits until every helper has left the
//! loop before it abandons the node.
//!
//! Tasks carry owned snapshots of the donor's state, so a helper never
//! aliases the donor's buffers. The search context is handed to the task as
//! an argument by the worker that runs it.

use std::collections::BTreeMap;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Instant;

use crate::common::SPLIT_LEVELS;

use super::WorkerState;

/// A task run by helpers: the replayed iteration loop of one search node.
pub type TaskFn<C> = dyn Fn(&C, &HelpMe<C>, &mut WorkerState) + Send + Sync;

/// Identifies a node of the search tree for the task map. Positions order
/// first by depth, then lexicographically by the path values, so workers
/// prefer stealing the shallowest advertised sub-trees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    depth: usize,
    values: [u64; SPLIT_LEVELS + 1],
}

impl Position {
    /// The position of a child node created at `depth` with the given fresh
    /// sequence value
    pub fn child(&self, depth: usize, value: u64) -> Self {
        let mut position = *self;
        position.depth = depth;
        if depth <= SPLIT_LEVELS {
            position.values[depth] = value;
        }
        position
    }
}

struct Task<C> {
    /// The helper entry point; None once the task stops being offered
    func: Option<Arc<TaskFn<C>>>,
    /// Number of helpers currently inside the task's loop
    pending: usize,
}

struct Shared<C> {
    tasks: BTreeMap<Position, Task<C>>,
    finish: bool,
    donated: u64,
    helped: u64,
}

pub struct HelpMe<C> {
    shared: Mutex<Shared<C>>,
    cv: Condvar,
}

impl<C> HelpMe<C> {
    pub fn new() -> Self {
        Self {
            shared: Mutex::new(Shared {
                tasks: BTreeMap::new(),
                finish: false,
                donated: 0,
                helped: 0,
            }),
            cv: Condvar::new(),
        }
    }

    /// Body of a worker thread: repeatedly steals an advertised task and runs
    /// it, sleeping on the condition variable when nothing is offered.
    /// Returns the worker's accumulated state once the scheduler is shut
    /// down.
    pub fn worker_loop(&self, ctx: &C) -> WorkerState {
        let mut state = WorkerState::default();
        let mut shared = self.shared.lock().unwrap();
        loop {
            if shared.finish {
                return state;
            }
            let mut stolen = None;
            for (position, task) in shared.tasks.iter_mut() {
                if let Some(func) = task.func.clone() {
                    task.pending += 1;
                    stolen = Some((*position, func));
                    break;
                }
            }
            match stolen {
                Some((position, func)) => {
                    shared.helped += 1;
                    drop(shared);

                    let begin = Instant::now();
                    (*func)(ctx, self, &mut state);
                    state.work_time += begin.elapsed();

                    shared = self.shared.lock().unwrap();
                    let task = shared.tasks.get_mut(&position).unwrap();
                    task.func = None;
                    task.pending -= 1;
                    if task.pending == 0 {
                        self.cv.notify_all();
                    }
                }
                None => {
                    shared = self.cv.wait(shared).unwrap();
                }
            }
        }
    }

    /// Advertises `helper` under `position`, runs the donor's own loop, then
    /// waits until every helper has left the task before withdrawing it.
    pub fn get_help_with(
        &self,
        position: Position,
        helper: Arc<TaskFn<C>>,
        main: impl FnOnce(&mut WorkerState),
        state: &mut WorkerState,
    ) {
        {
            let mut shared = self.shared.lock().unwrap();
            let previous = shared.tasks.insert(
                position,
                Task {
                    func: Some(helper),
                    pending: 0,
                },
            );
            assert!(
                previous.is_none(),
                "two sub-trees advertised at the same position"
            );
            shared.donated += 1;
            self.cv.notify_all();
        }

        main(state);

        let mut shared = self.shared.lock().unwrap();
        while shared.tasks[&position].pending != 0 {
            shared = self.cv.wait(shared).unwrap();
        }
        shared.tasks.remove(&position);
    }

    /// Tells every worker to return from its loop once its current task is
    /// done
    pub fn kill_workers(&self) {
        let mut shared = self.shared.lock().unwrap();
        shared.finish = true;
        self.cv.notify_all();
    }

    /// Number of tasks advertised by donors and of task executions started by
    /// workers
    pub fn counters(&self) -> (u64, u64) {
        let shared = self.shared.lock().unwrap();
        (shared.donated, shared.helped)
    }
}
