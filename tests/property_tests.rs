//! Property-based tests for discovery and fan-out
//!
//! These tests use proptest to check the driver's invariants over randomly generated source
//! trees, catching edge cases that hand-written fixtures might miss.

mod common;

use proptest::prelude::*;
use tbrun::{Driver, DriverConfig, LocalEngine, OrderingPolicy, SourceRoot};

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}"
}

/// Relative file stems: up to three directories deep.
fn stem() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment(), 1..4)
}

fn local_only() -> DriverConfig {
    DriverConfig::new().with_roots(vec![SourceRoot::local(".")])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: every `.vhd` file is discovered, and nothing else is.
    #[test]
    fn discovery_finds_exactly_the_vhdl_files(
        vhdl in prop::collection::btree_set(stem(), 0..12),
        other in prop::collection::btree_set(stem(), 0..6),
    ) {
        let dir = tempfile::tempdir().unwrap();
        for parts in &vhdl {
            common::write(dir.path(), &format!("v_{}.vhd", parts.join("/")), "");
        }
        for parts in &other {
            common::write(dir.path(), &format!("o_{}.vhdl.txt", parts.join("/")), "");
        }

        let files = Driver::new(local_only(), dir.path()).discover();
        prop_assert_eq!(files.len(), vhdl.len());
        prop_assert!(files.iter().all(|f| f.path.extension().is_some_and(|e| e == "vhd")));
    }

    /// Property: sorted local discovery is lexicographic and repeatable.
    #[test]
    fn sorted_discovery_is_deterministic(names in prop::collection::btree_set(stem(), 1..10)) {
        let dir = tempfile::tempdir().unwrap();
        for parts in &names {
            common::write(dir.path(), &format!("{}.vhd", parts.join("/")), "");
        }
        let driver = Driver::new(local_only().with_ordering(OrderingPolicy::Sorted), dir.path());

        let first: Vec<String> = driver.discover().iter().map(|f| f.path.to_string_lossy().into_owned()).collect();
        let second: Vec<String> = driver.discover().iter().map(|f| f.path.to_string_lossy().into_owned()).collect();
        let mut sorted = first.clone();
        sorted.sort();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first, sorted);
    }

    /// Property: every matched testbench yields exactly two tests, enabled configuration first.
    #[test]
    fn every_testbench_gets_both_configurations(
        names in prop::collection::btree_set("[a-z]{1,4}(_tbc|tbc_[a-z]{1,3}|_core)", 0..8),
    ) {
        let dir = tempfile::tempdir().unwrap();
        for name in &names {
            common::write(dir.path(), &format!("{name}.vhd"), &format!("entity {name} is\nend entity;\n"));
        }

        let mut engine = LocalEngine::from_args(["tbrun"]).unwrap();
        let prepared = Driver::new(local_only(), dir.path()).prepare(&mut engine).unwrap();
        let tests = engine.plan().tests;

        let expected = names.iter().filter(|n| n.contains("tbc")).count();
        prop_assert_eq!(prepared.testbenches.len(), expected);
        prop_assert_eq!(tests.len(), 2 * expected);
        for pair in tests.chunks(2) {
            prop_assert_eq!(&pair[0].testbench, &pair[1].testbench);
            prop_assert_eq!(pair[0].generics["g_reset_enable"].as_str(), "true");
            prop_assert_eq!(pair[1].generics["g_reset_enable"].as_str(), "false");
        }
    }
}
