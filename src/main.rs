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
use std::process::exit;
use std::time::Instant;

use clap::Parser;

use mcsplit::parsers::read_graph;
use mcsplit::{solve, Config, Graph, GraphFormat, Heuristic};

#[derive(Parser)]
#[clap(name = "mcsplit", version, author, about = "Maximum common induced subgraph over k graphs")]
struct Args {
    /// The input graph files, between 2 and 10 of them
    #[clap(num_args = 2..=10, required = true, value_parser)]
    graphs: Vec<PathBuf>,
    /// Format of the input files
    #[clap(short, long, value_enum, default_value_t = GraphFormat::Binary)]
    format: GraphFormat,
    /// Restrict the search to connected subgraphs
    #[clap(short, long, action)]
    connected: bool,
    /// Treat the graphs as directed
    #[clap(short, long, action)]
    directed: bool,
    /// Match edge labels across graphs
    #[clap(short, long, action)]
    edge_labelled: bool,
    /// Match vertex labels across graphs
    #[clap(short = 'a', long, action)]
    vertex_labelled: bool,
    /// Search for the largest target size first, then shrink it
    #[clap(short, long, action)]
    big_first: bool,
    /// Domain selection heuristic
    #[clap(long, value_enum, default_value_t = Heuristic::MinMax)]
    heuristic: Heuristic,
    /// Number of threads taking part in the search
    #[clap(short, long, default_value_t = default_threads())]
    threads: usize,
    /// Abort the search after this many seconds, 0 to run to completion
    #[clap(long, default_value_t = 0)]
    timeout: u64,
    /// Collect and print statistics at the end of the search
    #[clap(short, long, action)]
    statistics: bool,
    /// Print a trace line for every search node
    #[clap(short, long, action)]
    verbose: bool,
    /// Suppress progress output
    #[clap(short, long, action)]
    quiet: bool,
}

fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn main() {
    let args = Args::parse();
    let config = Config {
        connected: args.connected,
        directed: args.directed,
        edge_labelled: args.edge_labelled,
        vertex_labelled: args.vertex_labelled,
        big_first: args.big_first,
        heuristic: args.heuristic,
        threads: args.threads,
        timeout: args.timeout,
        verbose: args.verbose,
        quiet: args.quiet,
        statistics: args.statistics,
    };

    let mut graphs: Vec<Graph> = Vec::with_capacity(args.graphs.len());
    for path in &args.graphs {
        match read_graph(path, args.format, &config) {
            Ok(graph) => graphs.push(graph),
            Err(e) => {
                eprintln!("{}", e);
                exit(1);
            }
        }
    }

    let start = Instant::now();
    let solution = match solve(&graphs, &config) {
        Ok(solution) => solution,
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    };
    let elapsed = start.elapsed();

    println!("Solution size {}", solution.size());
    println!("{}", solution);
    println!("Nodes:                      {}", solution.node_count());
    println!("CPU time (ms):              {}", elapsed.as_millis());
    if solution.timed_out() {
        println!("TIMEOUT");
    }
    if !solution.is_valid_for(&graphs) {
        eprintln!("Error: invalid solution");
        exit(1);
    }
}
