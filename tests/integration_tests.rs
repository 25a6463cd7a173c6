use mcsplit::{solve, Config, Error, Graph, Heuristic, Solution};

use paste::paste;

fn cycle(n: usize) -> Graph {
    let mut graph = Graph::new(n);
    for v in 0..n {
        graph.add_edge(v, (v + 1) % n, false, 1);
    }
    graph
}

fn path(n: usize) -> Graph {
    let mut graph = Graph::new(n);
    for v in 0..n - 1 {
        graph.add_edge(v, v + 1, false, 1);
    }
    graph
}

fn complete(n: usize) -> Graph {
    let mut graph = Graph::new(n);
    for v in 0..n {
        for w in v + 1..n {
            graph.add_edge(v, w, false, 1);
        }
    }
    graph
}

fn two_disjoint_edges() -> Graph {
    let mut graph = Graph::new(4);
    graph.add_edge(0, 1, false, 1);
    graph.add_edge(2, 3, false, 1);
    graph
}

fn random_graph(n: usize, one_in: u64, seed: u64) -> Graph {
    let mut state = seed;
    let mut graph = Graph::new(n);
    for v in 0..n {
        for w in v + 1..n {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            if (state >> 33) % one_in == 0 {
                graph.add_edge(v, w, false, 1);
            }
        }
    }
    graph
}

fn sequential_config() -> Config {
    Config {
        threads: 1,
        quiet: true,
        ..Config::default()
    }
}

fn solve_sequential(graphs: &[Graph], tweak: impl FnOnce(&mut Config)) -> Solution {
    let mut config = sequential_config();
    tweak(&mut config);
    let solution = solve(graphs, &config).unwrap();
    assert!(solution.is_valid_for(graphs));
    solution
}

// Exhaustive reference for pairs of small graphs: every injective partial
// mapping is tried.
fn brute_force_pair(g0: &Graph, g1: &Graph, connected: bool) -> usize {
    fn is_connected(g0: &Graph, mapping: &[(usize, usize)]) -> bool {
        if mapping.is_empty() {
            return true;
        }
        let mut reached = vec![false; mapping.len()];
        let mut queue = vec![0];
        reached[0] = true;
        while let Some(i) = queue.pop() {
            for j in 0..mapping.len() {
                if !reached[j] && g0.adjacency(mapping[i].0, mapping[j].0) != 0 {
                    reached[j] = true;
                    queue.push(j);
                }
            }
        }
        reached.iter().all(|&r| r)
    }

    fn extend(
        g0: &Graph,
        g1: &Graph,
        v: usize,
        mapping: &mut Vec<(usize, usize)>,
        used: &mut Vec<bool>,
        connected: bool,
        best: &mut usize,
    ) {
        if v == g0.n() {
            if !connected || is_connected(g0, mapping) {
                *best = (*best).max(mapping.len());
            }
            return;
        }
        extend(g0, g1, v + 1, mapping, used, connected, best);
        for w in 0..g1.n() {
            if used[w] || g0.label(v) != g1.label(w) {
                continue;
            }
            if mapping
                .iter()
                .any(|&(a, b)| g0.adjacency(v, a) != g1.adjacency(w, b))
            {
                continue;
            }
            used[w] = true;
            mapping.push((v, w));
            extend(g0, g1, v + 1, mapping, used, connected, best);
            mapping.pop();
            used[w] = false;
        }
    }

    let mut best = 0;
    let mut mapping = vec![];
    let mut used = vec![false; g1.n()];
    extend(g0, g1, 0, &mut mapping, &mut used, connected, &mut best);
    best
}

macro_rules! scenario_with_heuristic {
    ($name:ident, $g0:expr, $g1:expr, $connected:expr, $size:expr, $h:ident) => {
        paste! {
            #[test]
            fn [<$name _ $h:snake>]() {
                let graphs = vec![$g0, $g1];
                let solution = solve_sequential(&graphs, |config| {
                    config.connected = $connected;
                    config.heuristic = Heuristic::$h;
                });
                assert_eq!($size, solution.size());
                assert!(!solution.timed_out());
                assert!(solution.node_count() > 0);
            }
        }
    };
}

macro_rules! scenario {
    ($($name:ident: ($g0:expr, $g1:expr, $connected:expr) => $size:expr,)*) => {
        $(
            scenario_with_heuristic! {$name, $g0, $g1, $connected, $size, MinMax}
            scenario_with_heuristic! {$name, $g0, $g1, $connected, $size, MinMin}
            scenario_with_heuristic! {$name, $g0, $g1, $connected, $size, MinSum}
            scenario_with_heuristic! {$name, $g0, $g1, $connected, $size, MinProduct}
        )*
    };
}

scenario! {
    identical_four_cycles: (cycle(4), cycle(4), false) => 4,
    complete_five_vs_four: (complete(5), complete(4), false) => 4,
    six_cycle_vs_six_path_connected: (cycle(6), path(6), true) => 5,
    disjoint_edges_vs_triangle: (two_disjoint_edges(), complete(3), false) => 2,
    disjoint_edges_vs_triangle_connected: (two_disjoint_edges(), complete(3), true) => 2,
}

#[test]
fn three_identical_triangles() {
    let mut graphs = vec![];
    for _ in 0..3 {
        let mut triangle = complete(3);
        for v in 0..3 {
            triangle.or_label(v, 4);
        }
        graphs.push(triangle);
    }
    let solution = solve_sequential(&graphs, |config| config.vertex_labelled = true);
    assert_eq!(3, solution.size());
}

#[test]
fn identity_matches_the_whole_graph() {
    let graph = random_graph(7, 2, 11);
    let solution = solve_sequential(&[graph.clone(), graph], |_| {});
    assert_eq!(7, solution.size());
}

#[test]
fn size_is_symmetric_in_the_graph_order() {
    let g0 = random_graph(6, 2, 3);
    let g1 = random_graph(7, 3, 5);
    let forward = solve_sequential(&[g0.clone(), g1.clone()], |_| {});
    let backward = solve_sequential(&[g1, g0], |_| {});
    assert_eq!(forward.size(), backward.size());
}

#[test]
fn sequential_search_is_deterministic() {
    let graphs = vec![random_graph(8, 2, 17), random_graph(8, 2, 23)];
    let first = solve_sequential(&graphs, |_| {});
    let second = solve_sequential(&graphs, |_| {});
    assert_eq!(first.size(), second.size());
    assert_eq!(first.node_count(), second.node_count());
}

#[test]
fn threads_do_not_change_the_size() {
    let graphs = vec![cycle(4), cycle(4)];
    let sequential = solve_sequential(&graphs, |_| {});
    let config = Config {
        threads: 8,
        quiet: true,
        ..Config::default()
    };
    let parallel = solve(&graphs, &config).unwrap();
    assert!(parallel.is_valid_for(&graphs));
    assert_eq!(sequential.size(), parallel.size());
    assert!(parallel.node_count() > 0);
}

#[test]
fn parallel_search_agrees_on_larger_inputs() {
    let graphs = vec![random_graph(10, 2, 41), random_graph(10, 2, 43)];
    let sequential = solve_sequential(&graphs, |_| {});
    for threads in [2, 4, 8] {
        let config = Config {
            threads,
            quiet: true,
            ..Config::default()
        };
        let parallel = solve(&graphs, &config).unwrap();
        assert!(parallel.is_valid_for(&graphs));
        assert_eq!(sequential.size(), parallel.size());
    }
}

#[test]
fn big_first_agrees_with_the_plain_search() {
    for seed in [7, 19, 31] {
        let graphs = vec![random_graph(7, 2, seed), random_graph(7, 2, seed + 1)];
        let plain = solve_sequential(&graphs, |_| {});
        let big_first = solve_sequential(&graphs, |config| config.big_first = true);
        assert_eq!(plain.size(), big_first.size());
    }
}

#[test]
fn matches_exhaustive_enumeration_on_small_pairs() {
    for seed in 0..12 {
        let g0 = random_graph(5, 2, 100 + seed);
        let g1 = random_graph(6, 2, 200 + seed);
        let expected = brute_force_pair(&g0, &g1, false);
        let solution = solve_sequential(&[g0, g1], |_| {});
        assert_eq!(expected, solution.size(), "seed {}", seed);
    }
}

#[test]
fn matches_exhaustive_enumeration_on_connected_pairs() {
    for seed in 0..12 {
        let g0 = random_graph(5, 2, 300 + seed);
        let g1 = random_graph(6, 2, 400 + seed);
        let expected = brute_force_pair(&g0, &g1, true);
        let solution = solve_sequential(&[g0.clone(), g1.clone()], |config| {
            config.connected = true;
        });
        assert_eq!(expected, solution.size(), "seed {}", seed);
    }
}

#[test]
fn directed_cycle_vs_directed_path() {
    let mut triangle = Graph::new(3);
    triangle.add_edge(0, 1, true, 1);
    triangle.add_edge(1, 2, true, 1);
    triangle.add_edge(2, 0, true, 1);
    let mut line = Graph::new(3);
    line.add_edge(0, 1, true, 1);
    line.add_edge(1, 2, true, 1);
    let solution = solve_sequential(&[triangle, line], |config| config.directed = true);
    assert_eq!(2, solution.size());
}

#[test]
fn edge_labels_restrict_the_matching() {
    let mut g0 = Graph::new(3);
    g0.add_edge(0, 1, false, 1);
    g0.add_edge(1, 2, false, 2);
    let mut g1 = Graph::new(3);
    g1.add_edge(0, 1, false, 1);
    g1.add_edge(1, 2, false, 3);
    let solution = solve_sequential(&[g0, g1], |config| config.edge_labelled = true);
    assert_eq!(2, solution.size());
}

#[test]
fn vertex_labels_restrict_the_matching() {
    let mut g0 = complete(3);
    g0.or_label(0, 1);
    g0.or_label(1, 1);
    g0.or_label(2, 2);
    let mut g1 = complete(3);
    g1.or_label(0, 1);
    g1.or_label(1, 2);
    g1.or_label(2, 2);
    let solution = solve_sequential(&[g0, g1], |config| config.vertex_labelled = true);
    assert_eq!(2, solution.size());
}

#[test]
fn loops_only_match_loops() {
    let mut g0 = Graph::new(2);
    g0.add_edge(0, 0, false, 1);
    g0.add_edge(0, 1, false, 1);
    let mut g1 = Graph::new(2);
    g1.add_edge(0, 1, false, 1);
    let solution = solve_sequential(&[g0, g1], |_| {});
    assert_eq!(1, solution.size());
}

#[test]
fn no_common_label_means_an_empty_matching() {
    let mut g0 = Graph::new(2);
    g0.or_label(0, 1);
    g0.or_label(1, 1);
    let mut g1 = Graph::new(2);
    g1.or_label(0, 2);
    g1.or_label(1, 2);
    let solution = solve_sequential(&[g0, g1], |config| config.vertex_labelled = true);
    assert_eq!(0, solution.size());
}

#[test]
fn timeout_returns_the_best_matching_so_far() {
    let graphs = vec![random_graph(40, 2, 71), random_graph(40, 2, 73)];
    let config = Config {
        threads: 2,
        timeout: 1,
        quiet: true,
        ..Config::default()
    };
    let solution = solve(&graphs, &config).unwrap();
    assert!(solution.timed_out());
    assert!(solution.size() > 0);
    assert!(solution.is_valid_for(&graphs));
}

#[test]
fn rejects_a_single_graph() {
    let result = solve(&[cycle(3)], &sequential_config());
    assert!(matches!(result, Err(Error::GraphCount(1))));
}

#[test]
fn rejects_zero_threads() {
    let config = Config {
        threads: 0,
        ..Config::default()
    };
    let result = solve(&[cycle(3), cycle(3)], &config);
    assert!(matches!(result, Err(Error::NoThreads)));
}

#[test]
fn tuples_reference_original_vertices() {
    // a star whose centre is renumbered first internally
    let mut star = Graph::new(4);
    star.add_edge(3, 0, false, 1);
    star.add_edge(3, 1, false, 1);
    star.add_edge(3, 2, false, 1);
    let solution = solve_sequential(&[star.clone(), star], |_| {});
    assert_eq!(4, solution.size());
    let mut seen: Vec<usize> = solution.assignment().iter().map(|t| t.vertex(0)).collect();
    seen.sort();
    assert_eq!(vec![0, 1, 2, 3], seen);
}
