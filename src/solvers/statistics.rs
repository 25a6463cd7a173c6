use std::fmt;
use std::time::Duration;

/// Implements a bunch of statistics that are collected during the search
#[derive(Default)]
pub struct Statistics<const B: bool> {
    search_nodes: u64,
    tasks_donated: u64,
    tasks_helped: u64,
    work_times: Vec<Duration>,
    peak_memory: f32,
}

impl<const B: bool> Statistics<B> {
    pub fn search_nodes(&mut self, nodes: u64) {
        if B {
            self.search_nodes = nodes;
        }
    }

    pub fn tasks(&mut self, donated: u64, helped: u64) {
        if B {
            self.tasks_donated += donated;
            self.tasks_helped += helped;
        }
    }

    pub fn thread_work_time(&mut self, time: Duration) {
        if B {
            self.work_times.push(time);
        }
    }

    pub fn peak_memory(&mut self, peak_memory: f32) {
        if B {
            self.peak_memory = peak_memory;
        }
    }

    pub fn print(&self) {
        if B {
            println!("{}", self);
        }
    }
}

impl<const B: bool> fmt::Display for Statistics<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if B {
            let times = self
                .work_times
                .iter()
                .map(|t| t.as_millis().to_string())
                .collect::<Vec<String>>()
                .join(" ");
            write!(
                f,
                "search nodes {} | tasks donated {} | tasks helped {} | helper work times (ms) [{}] | peak memory {} Mb",
                self.search_nodes,
                self.tasks_donated,
                self.tasks_helped,
                times,
                self.peak_memory
            )
        } else {
            write!(f, "")
        }
    }
}
