// tests/property_scheduler.rs

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;

use bootdag::config::RunConfig;
use bootdag::dag::Scheduler;
use bootdag::engine::{Completion, ComponentOutcome};
use bootdag::types::ComponentStatus;
use bootdag_test_utils::builders::RegistryBuilder;
use bootdag_test_utils::recording::RecordingSink;

/// Dependency lists for `n` components where component `i` only depends on
/// components `0..i`, so the graph is always acyclic.
fn dag_strategy(max_components: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1..=max_components).prop_flat_map(|n| {
        proptest::collection::vec(proptest::collection::vec(any::<usize>(), 0..4), n).prop_map(
            |raw| {
                raw.into_iter()
                    .enumerate()
                    .map(|(i, picks)| {
                        let mut deps: Vec<usize> = picks
                            .into_iter()
                            .filter(|_| i > 0)
                            .map(|p| p % i.max(1))
                            .collect();
                        deps.sort_unstable();
                        deps.dedup();
                        deps
                    })
                    .collect()
            },
        )
    })
}

fn name(i: usize) -> String {
    format!("c{i}")
}

/// Everything reachable from `root` through the dependents relation.
fn downstream(deps: &[Vec<usize>], root: usize) -> HashSet<usize> {
    let mut out = HashSet::new();
    let mut stack = vec![root];
    while let Some(cur) = stack.pop() {
        for (i, ds) in deps.iter().enumerate() {
            if ds.contains(&cur) && out.insert(i) {
                stack.push(i);
            }
        }
    }
    out
}

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Succeed,
    Fail,
    TimeOut,
}

fn outcome_strategy() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        6 => Just(Outcome::Succeed),
        1 => Just(Outcome::Fail),
        1 => Just(Outcome::TimeOut),
    ]
}

proptest! {
    #[test]
    fn every_run_respects_ordering_cap_cascade_and_completion(
        deps in dag_strategy(10),
        outcomes in proptest::collection::vec(outcome_strategy(), 10),
        picks in proptest::collection::vec(any::<usize>(), 0..64),
        cap in 1usize..5,
    ) {
        let n = deps.len();
        let names: Vec<String> = (0..n).map(name).collect();
        let dep_names: Vec<Vec<String>> = deps
            .iter()
            .map(|ds| ds.iter().map(|&d| name(d)).collect())
            .collect();

        let mut builder = RegistryBuilder::new();
        for (i, id) in names.iter().enumerate() {
            let ds: Vec<&str> = dep_names[i].iter().map(String::as_str).collect();
            builder = builder.instant(id, &ds);
        }
        let (registry, _probe) = builder.build();

        let sink = RecordingSink::new();
        let config = RunConfig::default().with_parallelism_cap(cap);
        let mut scheduler = Scheduler::new(&registry, &config, Arc::new(sink.clone())).unwrap();

        let index: HashMap<String, usize> =
            names.iter().enumerate().map(|(i, id)| (id.clone(), i)).collect();
        let mut executing: Vec<String> = Vec::new();
        let mut started: HashSet<usize> = HashSet::new();
        let mut picks = picks.into_iter();

        let mut step = scheduler.start();
        let mut rounds = 0;
        loop {
            for s in &step.newly_scheduled {
                let i = index[&s.id];
                // Dependencies are all Ready when a component is dispatched.
                for d in &dep_names[i] {
                    prop_assert_eq!(scheduler.status_of(d), Some(ComponentStatus::Ready));
                }
                prop_assert!(started.insert(i), "{} dispatched twice", s.id);
                executing.push(s.id.clone());
            }
            prop_assert!(scheduler.in_flight() <= cap);
            prop_assert_eq!(scheduler.in_flight(), executing.len());

            if scheduler.is_finished() {
                break;
            }
            prop_assert!(!executing.is_empty(), "run stalled without finishing");

            rounds += 1;
            prop_assert!(rounds <= 4 * n + 4, "run did not converge");

            let at = picks.next().unwrap_or(0) % executing.len();
            let id = executing.remove(at);
            let outcome = match outcomes[index[&id]] {
                Outcome::Succeed => ComponentOutcome::Success,
                Outcome::Fail => ComponentOutcome::Failed(format!("{id} failed")),
                Outcome::TimeOut => ComponentOutcome::TimedOut,
            };
            let completion = Completion::new(id, outcome, Duration::from_millis(1));
            step = scheduler.handle_completion(completion);
        }

        // Completion: every component terminal, exactly one summary.
        for id in &names {
            let status = scheduler.status_of(id).unwrap();
            prop_assert!(status.is_terminal(), "{} ended {:?}", id, status);
        }
        prop_assert_eq!(sink.summaries().len(), 1);
        prop_assert!(scheduler.unresolvable().is_none());

        // Cascade: nothing downstream of a failed component ever started.
        for root in started.iter().copied() {
            if matches!(outcomes[root], Outcome::Succeed) {
                continue;
            }
            for dependent in downstream(&deps, root) {
                prop_assert!(
                    !started.contains(&dependent),
                    "{} started after {} failed",
                    name(dependent),
                    name(root)
                );
                prop_assert_eq!(
                    scheduler.status_of(&name(dependent)),
                    Some(ComponentStatus::Failed)
                );
            }
        }

        // Terminal finality: each component has at most two transitions and
        // nothing follows a terminal one.
        for id in &names {
            let transitions = sink.transitions_for(id);
            prop_assert!(transitions.len() <= 2);
            if let Some(pos) = transitions.iter().position(|s| s.is_terminal()) {
                prop_assert_eq!(pos, transitions.len() - 1);
            }
        }

        prop_assert!(sink.max_initializing() <= cap);
    }

    #[test]
    fn added_back_edge_is_always_reported_as_a_cycle(
        deps in dag_strategy(8),
        from_pick in any::<usize>(),
    ) {
        // Pick any edge i -> d and add d -> i; the result must be rejected.
        let edges: Vec<(usize, usize)> = deps
            .iter()
            .enumerate()
            .flat_map(|(i, ds)| ds.iter().map(move |&d| (i, d)))
            .collect();
        prop_assume!(!edges.is_empty());
        let (i, d) = edges[from_pick % edges.len()];

        let mut builder = RegistryBuilder::new();
        for (c, ds) in deps.iter().enumerate() {
            let mut names: Vec<String> = ds.iter().map(|&x| name(x)).collect();
            if c == d {
                names.push(name(i));
            }
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            builder = builder.instant(&name(c), &refs);
        }
        let (registry, _probe) = builder.build();

        let sink = RecordingSink::new();
        let err = Scheduler::new(&registry, &RunConfig::default(), Arc::new(sink.clone()))
            .unwrap_err();
        let is_cycle = matches!(err, bootdag::errors::BootError::CyclicDependency { .. });
        prop_assert!(is_cycle, "got {:?}", err);
        prop_assert!(sink.events().is_empty());
    }
}
