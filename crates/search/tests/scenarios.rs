//! Worked scenarios for aggregation, padding and ranking
//!
//! Each test reproduces one end-to-end topic outcome: responses in, ranked
//! list out.

use mathrun_core::{Hit, RankedList, TopicId};
use mathrun_search::{
    FillerPool, Padder, Ranker, ResponseDecoder, ResponseFormat, ResultAggregator,
    ResultProcessor,
};
use std::sync::Arc;

// ============================================================================
// Test Helpers
// ============================================================================

fn pairs(list: &RankedList) -> Vec<(&str, f64)> {
    list.entries
        .iter()
        .map(|e| (e.doc_id.as_str(), e.score))
        .collect()
}

fn pool(ids: &[&str]) -> Arc<FillerPool> {
    Arc::new(FillerPool::new(ids.iter().map(|s| s.to_string()).collect()))
}

// ============================================================================
// Scenarios
// ============================================================================

/// One keyword variant, flat response, no padding
#[test]
fn test_single_variant_ranked_by_score() {
    let agg = ResultAggregator::new(5.0, ResponseDecoder::for_format(ResponseFormat::Flat));
    let t1 = TopicId::from("T1");
    agg.register_result(
        &t1,
        r#"{"hits":[{"id":"docA","score":1.2},{"id":"docB","score":3.4}]}"#,
        false,
    )
    .unwrap();

    let list = ResultProcessor::new(Ranker::default())
        .process_results(&agg, &t1)
        .unwrap();
    assert_eq!(pairs(&list), vec![("docB", 3.4), ("docA", 1.2)]);
    assert_eq!(list.entries[0].rank, 1);
    assert_eq!(list.entries[1].rank, 2);
}

/// Formula variant boost wins over a higher unboosted keyword score
#[test]
fn test_formula_boost_max_merge() {
    let agg = ResultAggregator::new(5.0, ResponseDecoder::default());
    let t2 = TopicId::from("T2");
    agg.register_result(&t2, r#"{"hits":[{"id":"docX","score":2.0}]}"#, false)
        .unwrap();
    agg.register_result(&t2, r#"{"hits":[{"id":"docX","score":1.0}]}"#, true)
        .unwrap();
    assert_eq!(agg.score(&t2, "docX"), Some(6.0));

    let list = ResultProcessor::default().process_results(&agg, &t2).unwrap();
    assert_eq!(pairs(&list), vec![("docX", 6.0)]);
}

/// Padding from a fixed shuffled order
#[test]
fn test_padding_with_known_order() {
    let t3 = TopicId::from("T3");
    let padder = Padder::new(pool(&["f1", "f2", "f3"]), 5);

    let mut entries = vec![
        mathrun_core::RankedEntry::retrieved("d1", 3.0),
        mathrun_core::RankedEntry::retrieved("d2", 2.0),
        mathrun_core::RankedEntry::retrieved("d3", 1.0),
    ];
    let outcome = padder.pad_with_order(&mut entries, ["f2", "f1", "f3"]);
    assert_eq!(outcome.added, 2);
    assert!(!outcome.exhausted);

    let list = Ranker::default().rank(t3, entries, outcome.exhausted);
    assert_eq!(
        pairs(&list),
        vec![("d1", 3.0), ("d2", 2.0), ("d3", 1.0), ("f1", 0.0), ("f2", 0.0)]
    );
    assert_eq!(list.filler_count(), 2);
}

/// Padding through the processor uses the whole pool when it must
#[test]
fn test_padding_through_processor() {
    let agg = ResultAggregator::default();
    let t3 = TopicId::from("T3");
    agg.register_hits(
        &t3,
        vec![Hit::new("d1", 3.0), Hit::new("d2", 2.0), Hit::new("d3", 1.0)],
        false,
    );

    let processor =
        ResultProcessor::new(Ranker::default()).with_padder(Padder::new(pool(&["f1", "f2", "f3"]), 5));
    let list = processor.process_results(&agg, &t3).unwrap();

    assert_eq!(list.len(), 5);
    assert_eq!(&pairs(&list)[..3], &[("d1", 3.0), ("d2", 2.0), ("d3", 1.0)]);
    for entry in &list.entries[3..] {
        assert!(entry.is_filler());
        assert_eq!(entry.score, 0.0);
    }
}

/// Empty nested hits object registers nothing and does not fail
#[test]
fn test_empty_hits_object() {
    let agg = ResultAggregator::default();
    let t4 = TopicId::from("T4");
    let merged = agg.register_result(&t4, r#"{"hits":{}}"#, false).unwrap();
    assert_eq!(merged, 0);
    assert!(ResultProcessor::default().process_results(&agg, &t4).is_none());
}

/// Nested and flat responses for one topic merge into one map
#[test]
fn test_mixed_shapes_merge() {
    let agg = ResultAggregator::new(5.0, ResponseDecoder::default());
    let t = TopicId::from("T5");
    agg.register_result(
        &t,
        r#"{"hits":{"hits":[{"_id":"a","_score":1.0},{"_id":"b","_score":0.5}]}}"#,
        true,
    )
    .unwrap();
    agg.register_result(&t, r#"{"hits":[{"id":"b","score":7.0}]}"#, false)
        .unwrap();

    let list = ResultProcessor::default().process_results(&agg, &t).unwrap();
    assert_eq!(pairs(&list), vec![("b", 7.0), ("a", 6.0)]);
}
