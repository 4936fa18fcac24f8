use super::*;
use proptest::prelude::*;

fn cfg(max_solutions: usize) -> SubsetSumCfg {
    SubsetSumCfg {
        max_solutions,
        ..SubsetSumCfg::default()
    }
}

#[test]
fn single_finds_exact_match_first() {
    let sols = solve_single(&[5, 6, 434, 445], cfg(10));
    assert_eq!(sols[0].sum, 445);
    assert_eq!(sols[0].indices, vec![2, 1, 0]);
    let sums: Vec<usize> = sols.iter().map(|s| s.sum).collect();
    assert_eq!(sums, vec![445, 440, 439, 434, 11, 6, 5]);
}

#[test]
fn single_respects_solution_cap() {
    let sols = solve_single(&[5, 6, 434, 445], cfg(2));
    assert_eq!(sols.len(), 2);
    assert_eq!(sols[1].sum, 440);
}

#[test]
fn single_prefers_inclusion_on_ties() {
    // both items reach 3; the later row wins
    let sols = solve_single(&[3, 3, 3], cfg(10));
    assert_eq!(sols, vec![SubsetSolution { sum: 3, indices: vec![1] }]);
}

#[test]
fn single_is_noop_on_short_input() {
    assert!(solve_single(&[], cfg(10)).is_empty());
    assert!(solve_single(&[7], cfg(10)).is_empty());
}

#[test]
fn single_without_reachable_sum_is_empty() {
    assert!(solve_single(&[50, 60, 10], cfg(10)).is_empty());
    assert!(solve_single(&[1, 2, 0], cfg(10)).is_empty());
}

#[test]
fn single_rescale_is_opt_in() {
    let values = [40, 60, 100, 100];
    let plain = solve_single(&values, SubsetSumCfg { max_table_size: 50, ..cfg(10) });
    assert_eq!(plain[0].sum, 100);
    let scaled = solve_single(
        &values,
        SubsetSumCfg {
            max_table_size: 50,
            rescale: true,
            ..cfg(10)
        },
    );
    // sums are reported in original units
    assert!(!scaled.is_empty());
    for s in &scaled {
        assert_eq!(s.sum, s.indices.iter().map(|&i| values[i]).sum::<usize>());
    }
}

#[test]
fn dual_reconciles_two_pools() {
    let source = [(5, 1), (6, 2), (8, 3), (3, 4)];
    let target = [(3, 1), (17, 3), (9, 4), (16, 5)];
    let sol = solve_dual(&source, &target).unwrap();
    assert_eq!(sol.error, 0);
    assert_eq!(sol.s, vec![2]);
    assert_eq!(sol.t, vec![4, 1]);
    let eqn: crate::equation::Equation = sol.into();
    assert_eq!(eqn.e, 0.0);
    assert_eq!(eqn.t.len(), 2);
}

#[test]
fn dual_pair_may_come_from_one_pool() {
    let sol = solve_dual(&[(1, 0), (2, 1)], &[(10, 5)]).unwrap();
    assert_eq!(sol.error, 3);
    assert_eq!(sol.s, vec![0]);
    assert_eq!(sol.t, vec![1]);
}

#[test]
fn dual_degenerate_pools() {
    assert!(solve_dual(&[], &[(3, 0)]).is_none());
    assert!(solve_dual(&[(0, 0)], &[(3, 1)]).is_none());
    // after capping, neither pool has a proper sub-sum
    assert!(solve_dual(&[(2000, 0), (2000, 1)], &[(4000, 2)]).is_none());
}

proptest! {
    #[test]
    fn single_solutions_are_valid(values in proptest::collection::vec(0usize..40, 2..9)) {
        let sols = solve_single(&values, cfg(10));
        let n = values.len() - 1;
        let target = values[n];
        let mut last_gap = 0usize;
        for s in &sols {
            let mut seen = s.indices.clone();
            seen.sort_unstable();
            seen.dedup();
            prop_assert_eq!(seen.len(), s.indices.len());
            prop_assert!(s.indices.iter().all(|&i| i < n));
            prop_assert_eq!(s.sum, s.indices.iter().map(|&i| values[i]).sum::<usize>());
            prop_assert!(s.sum >= 1 && s.sum <= 2 * target);
            let gap = s.sum.abs_diff(target);
            prop_assert!(gap >= last_gap);
            last_gap = gap;
        }
    }

    #[test]
    fn single_finds_exact_subset_when_one_exists(values in proptest::collection::vec(1usize..20, 2..8)) {
        let n = values.len() - 1;
        let target = values[n];
        let exact = (1u32..(1 << n)).any(|mask| {
            (0..n).filter(|i| mask & (1 << i) != 0).map(|i| values[i]).sum::<usize>() == target
        });
        let sols = solve_single(&values, cfg(10));
        prop_assert_eq!(exact, sols.first().is_some_and(|s| s.sum == target));
    }

    #[test]
    fn dual_gap_matches_backtraced_sums(
        a in proptest::collection::vec(1usize..30, 1..6),
        b in proptest::collection::vec(1usize..30, 1..6),
    ) {
        let source: Vec<(usize, usize)> = a.iter().copied().zip(0..).collect();
        let target: Vec<(usize, usize)> = b.iter().copied().zip(100..).collect();
        if let Some(sol) = solve_dual(&source, &target) {
            prop_assert!(!sol.s.is_empty() && !sol.t.is_empty());
            let distinct = |v: &[usize]| {
                let mut v = v.to_vec();
                v.sort_unstable();
                v.dedup();
                v.len()
            };
            prop_assert_eq!(distinct(sol.s.as_slice()), sol.s.len());
            prop_assert_eq!(distinct(sol.t.as_slice()), sol.t.len());
            // equal totals leave both pools unscaled
            if a.iter().sum::<usize>() == b.iter().sum::<usize>() {
                let sum = |v: &[usize]| {
                    v.iter()
                        .map(|&id| if id < 100 { a[id] } else { b[id - 100] })
                        .sum::<usize>()
                };
                prop_assert_eq!(sum(sol.t.as_slice()) - sum(sol.s.as_slice()), sol.error);
            }
        }
    }
}
