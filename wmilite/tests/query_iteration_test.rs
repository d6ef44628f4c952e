// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Integration tests for batched iteration over query results

#[path = "testutils/mod.rs"]
mod testutils;

use testutils::{indexes, TestHost};
use wmilite::provider::memory::FaultPlan;
use wmilite::{BatchIterator, CancelToken, ExhaustReason, HResult, IteratorState};

const ALL_RECORDS: &str = "SELECT Index, Name FROM Test_Record";

#[test]
fn test_count_and_order_independent_of_batch_size() {
    for count in [0usize, 1, 9, 10, 11, 25] {
        let host = TestHost::with_records(count);
        let expected: Vec<u32> = (0..count as u32).collect();

        for batch_size in [1usize, 2, 3, 10, 64] {
            let session = host.session_with_batch(batch_size);
            assert_eq!(
                indexes(&session, ALL_RECORDS),
                expected,
                "count {} batch {}",
                count,
                batch_size
            );
        }
    }
}

#[test]
fn test_fetch_calls_follow_batch_size() {
    let host = TestHost::with_records(25);
    let session = host.session_with_batch(10);
    let result = session.execute_query(ALL_RECORDS).unwrap();

    let before = host.platform.stats().fetches;
    assert_eq!(result.begin().count(), 25);
    // 10 + 10 + 5, then one empty fetch ends the pass
    assert_eq!(host.platform.stats().fetches - before, 4);
}

#[test]
fn test_begin_twice_yields_identical_passes() {
    let host = TestHost::with_records(13);
    let session = host.session_with_batch(4);
    let result = session.execute_query(ALL_RECORDS).unwrap();

    let first: Vec<String> = result
        .begin()
        .filter_map(|o| o.get_property::<String>("Name"))
        .collect();
    let second: Vec<String> = result
        .begin()
        .filter_map(|o| o.get_property::<String>("Name"))
        .collect();

    assert_eq!(first.len(), 13);
    assert_eq!(first, second);
    assert_eq!(host.platform.stats().queries, 1);
}

#[test]
fn test_restart_after_partial_pass() {
    let host = TestHost::with_records(7);
    let session = host.session_with_batch(3);
    let result = session.execute_query(ALL_RECORDS).unwrap();

    let partial: Vec<_> = result.begin().take(2).collect();
    assert_eq!(partial.len(), 2);
    assert_eq!(result.begin().count(), 7);
}

#[test]
fn test_restart_requeries_when_reset_unsupported() {
    let host = TestHost::with_records(5);
    host.platform.set_faults(FaultPlan {
        reset_unsupported: true,
        ..FaultPlan::default()
    });
    let session = host.session();
    let result = session.execute_query(ALL_RECORDS).unwrap();

    assert_eq!(result.collect_objects().len(), 5);
    assert_eq!(result.collect_objects().len(), 5);
    assert_eq!(host.platform.stats().queries, 3);
}

#[test]
fn test_failed_requery_gives_exhausted_pass() {
    let host = TestHost::with_records(5);
    let session = host.session();
    let result = session.execute_query(ALL_RECORDS).unwrap();

    host.platform.set_faults(FaultPlan {
        reset_unsupported: true,
        query_error: Some(HResult::WBEM_E_ACCESS_DENIED),
        ..FaultPlan::default()
    });

    let iterator = result.begin();
    assert!(iterator == result.end());
    assert_eq!(iterator.fetch_error(), Some(HResult::WBEM_E_ACCESS_DENIED));
}

#[test]
fn test_exhausted_iterators_compare_equal() {
    let host = TestHost::with_records(3);
    let session = host.session();
    let result = session.execute_query(ALL_RECORDS).unwrap();

    let mut iterator = result.begin();
    assert!(iterator != result.end());
    assert_eq!(iterator.state(), IteratorState::Active);

    // two live iterators are never equal
    let other = session.execute_query(ALL_RECORDS).unwrap().begin();
    assert!(iterator != other);

    while iterator != result.end() {
        assert!(iterator.current().is_some());
        iterator.advance();
    }
    assert!(iterator == BatchIterator::end());
    assert_eq!(iterator.exhaust_reason(), Some(ExhaustReason::EndOfData));
}

#[test]
fn test_advance_past_end_transitions_once() {
    let host = TestHost::with_records(2);
    let session = host.session_with_batch(2);
    let result = session.execute_query(ALL_RECORDS).unwrap();
    let mut iterator = result.begin();

    assert_eq!(iterator.batch_len(), 2);
    iterator.advance();
    assert!(!iterator.is_exhausted());
    iterator.advance();
    assert!(iterator.is_exhausted());

    let fetches = host.platform.stats().fetches;
    iterator.advance();
    iterator.advance();
    assert!(iterator.is_exhausted());
    assert!(iterator.current().is_none());
    assert_eq!(host.platform.stats().fetches, fetches);
}

#[test]
fn test_empty_result_is_exhausted_on_begin() {
    let host = TestHost::with_records(0);
    let session = host.session();
    let result = session.execute_query(ALL_RECORDS).unwrap();

    let iterator = result.begin();
    assert!(iterator.is_exhausted());
    assert!(iterator == result.end());
}

#[test]
fn test_fetch_failure_ends_sequence_with_reason() {
    let host = TestHost::with_records(25);
    host.platform.set_faults(FaultPlan {
        fail_fetch_after: Some(2),
        fetch_error: Some(HResult::WBEM_E_TRANSPORT_FAILURE),
        ..FaultPlan::default()
    });
    let session = host.session_with_batch(5);
    let result = session.execute_query(ALL_RECORDS).unwrap();

    let mut iterator = result.begin();
    let mut seen = 0;
    while let Some(object) = iterator.next() {
        assert_eq!(object.get_property::<u32>("Index"), Some(seen));
        seen += 1;
    }

    assert_eq!(seen, 10);
    assert!(iterator == result.end());
    assert_eq!(
        iterator.exhaust_reason(),
        Some(ExhaustReason::FetchFailed(HResult::WBEM_E_TRANSPORT_FAILURE))
    );
}

#[test]
fn test_first_fetch_failure_is_immediate_end() {
    let host = TestHost::with_records(4);
    host.platform.set_faults(FaultPlan {
        fail_fetch_after: Some(0),
        ..FaultPlan::default()
    });
    let session = host.session();
    let result = session.execute_query(ALL_RECORDS).unwrap();

    assert_eq!(result.begin().count(), 0);
    assert_eq!(
        result.begin().fetch_error(),
        Some(HResult::WBEM_E_TRANSPORT_FAILURE)
    );
}

#[test]
fn test_cancel_token_stops_at_next_fetch() {
    let host = TestHost::with_records(30);
    let session = host.session_with_batch(10);
    let token = CancelToken::new();
    let result = session
        .execute_query(ALL_RECORDS)
        .unwrap()
        .with_cancel_token(token.clone());

    let mut iterator = result.begin();
    let mut seen = 0;
    while let Some(_object) = iterator.next() {
        seen += 1;
        if seen == 3 {
            token.cancel();
        }
    }

    // the batch already in memory is still served
    assert_eq!(seen, 10);
    assert_eq!(iterator.exhaust_reason(), Some(ExhaustReason::Cancelled));
    assert_eq!(result.begin().count(), 0);
}

#[test]
fn test_for_loop_over_result_reference() {
    let host = TestHost::with_records(4);
    let session = host.session();
    let result = session.execute_query(ALL_RECORDS).unwrap();

    let mut names = Vec::new();
    for object in &result {
        names.extend(object.get_property::<String>("Name"));
    }
    assert_eq!(names, vec!["record-0", "record-1", "record-2", "record-3"]);
}

#[test]
fn test_where_clause_is_passed_through() {
    let host = TestHost::with_records(6);
    let session = host.session();
    assert_eq!(
        indexes(&session, "SELECT Index FROM Test_Record WHERE Name = 'record-4'"),
        vec![4]
    );
}
