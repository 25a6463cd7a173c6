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

//! This module provides the branching heuristics of the solver. At every
//! search node one multidomain must be chosen to branch on; the heuristics
//! score each candidate domain from its slice lengths and the solver picks
//! the domain with the lowest score, breaking ties on the smallest vertex
//! value in the slice of the first graph.

use crate::common::Heuristic;
use crate::core::multidomain::Multidomain;

/// Scores a multidomain from its slice lengths. Lower is branched on first.
pub trait DomainSelection: Send + Sync {
    fn score(&self, domain: &Multidomain, k: usize) -> u128;
}

/// Length of the largest slice
#[derive(Default)]
pub struct MinMax;

/// Length of the smallest slice
#[derive(Default)]
pub struct MinMin;

/// Sum of the slice lengths
#[derive(Default)]
pub struct MinSum;

/// Product of the slice lengths
#[derive(Default)]
pub struct MinProduct;

impl DomainSelection for MinMax {
    fn score(&self, domain: &Multidomain, k: usize) -> u128 {
        domain.lens[..k].iter().copied().max().unwrap() as u128
    }
}

impl DomainSelection for MinMin {
    fn score(&self, domain: &Multidomain, k: usize) -> u128 {
        domain.lens[..k].iter().copied().min().unwrap() as u128
    }
}

impl DomainSelection for MinSum {
    fn score(&self, domain: &Multidomain, k: usize) -> u128 {
        domain.lens[..k].iter().map(|&l| l as u128).sum()
    }
}

impl DomainSelection for MinProduct {
    fn score(&self, domain: &Multidomain, k: usize) -> u128 {
        domain.lens[..k]
            .iter()
            .fold(1u128, |acc, &l| acc.saturating_mul(l as u128))
    }
}

impl Heuristic {
    pub(crate) fn selection(&self) -> Box<dyn DomainSelection> {
        match self {
            Heuristic::MinMax => Box::<MinMax>::default(),
            Heuristic::MinMin => Box::<MinMin>::default(),
            Heuristic::MinSum => Box::<MinSum>::default(),
            Heuristic::MinProduct => Box::<MinProduct>::default(),
        }
    }
}
