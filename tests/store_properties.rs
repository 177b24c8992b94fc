use proptest::prelude::*;
use ragstore::{StoreError, VectorStore};

const DIM: usize = 4;

// Strategy: a vector that is sometimes all zeros
fn arb_vector() -> impl Strategy<Value = Vec<f64>> {
    prop_oneof![
        4 => prop::collection::vec(-100.0f64..100.0, DIM),
        1 => Just(vec![0.0; DIM]),
    ]
}

fn arb_vectors(max: usize) -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(arb_vector(), 0..max)
}

/// Payload is the insertion position so ordering can be checked from results
fn build(vectors: &[Vec<f64>]) -> VectorStore<usize> {
    let mut store = VectorStore::new();
    for (i, v) in vectors.iter().enumerate() {
        store.add(v.clone(), i).unwrap();
    }
    store
}

proptest! {
    #[test]
    fn prop_empty_store_returns_nothing(query in prop::collection::vec(-10.0f64..10.0, 1..8), top_k in 1usize..20) {
        let store: VectorStore<usize> = VectorStore::new();
        prop_assert!(store.search(&query, top_k).unwrap().is_empty());
    }

    #[test]
    fn prop_cardinality(vectors in arb_vectors(40), query in arb_vector(), top_k in 1usize..60) {
        let store = build(&vectors);
        let results = store.search(&query, top_k).unwrap();
        prop_assert_eq!(results.len(), top_k.min(vectors.len()));
    }

    #[test]
    fn prop_search_is_deterministic(vectors in arb_vectors(30), query in arb_vector(), top_k in 1usize..10) {
        let store = build(&vectors);
        let first = store.search(&query, top_k).unwrap();
        let second = store.search(&query, top_k).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_ranked_by_score_then_insertion(vectors in arb_vectors(30), query in arb_vector(), top_k in 1usize..40) {
        let store = build(&vectors);
        let hits = store.search_scored(&query, top_k).unwrap();

        for pair in hits.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.score > b.score || (a.score == b.score && a.payload < b.payload));
        }
    }

    #[test]
    fn prop_scores_are_finite(vectors in arb_vectors(30), query in arb_vector()) {
        let store = build(&vectors);
        let hits = store.search_scored(&query, 100).unwrap();

        for hit in &hits {
            prop_assert!(hit.score.is_finite());
            prop_assert!(hit.score >= -1.0 - 1e-9 && hit.score <= 1.0 + 1e-9);
            if vectors[*hit.payload].iter().all(|x| *x == 0.0) {
                prop_assert_eq!(hit.score, 0.0);
            }
        }
    }

    #[test]
    fn prop_self_similarity_ranks_first(
        vectors in prop::collection::vec(prop::collection::vec(-100.0f64..100.0, DIM), 0..30),
        target in prop::collection::vec(1.0f64..100.0, DIM),
        position in any::<prop::sample::Index>(),
    ) {
        let mut vectors = vectors;
        let at = position.index(vectors.len() + 1);
        vectors.insert(at, target.clone());

        let store = build(&vectors);
        let hits = store.search_scored(&target, 3).unwrap();

        prop_assert_eq!(*hits[0].payload, at);
        prop_assert!((hits[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn prop_duplicates_keep_insertion_order(
        vectors in prop::collection::vec(prop::collection::vec(-100.0f64..100.0, DIM), 1..20),
        copies in 2usize..5,
    ) {
        let duplicate = vectors[0].clone();
        let mut all = vectors.clone();
        for _ in 1..copies {
            all.push(duplicate.clone());
        }

        let store = build(&all);
        let results = store.search(&duplicate, all.len()).unwrap();
        let positions: Vec<usize> = results.into_iter().filter(|&i| all[i] == duplicate).collect();

        let mut sorted = positions.clone();
        sorted.sort();
        prop_assert_eq!(positions, sorted);
    }

    #[test]
    fn prop_dimension_enforced(vectors in prop::collection::vec(prop::collection::vec(-1.0f64..1.0, DIM), 1..10), wrong in 1usize..8) {
        prop_assume!(wrong != DIM);
        let mut store = build(&vectors);

        let add = store.add(vec![0.5; wrong], 999);
        let is_dimension_mismatch = matches!(add, Err(StoreError::DimensionMismatch { .. }));
        prop_assert!(is_dimension_mismatch);

        let search = store.search(&vec![0.5; wrong], 1);
        let is_dimension_mismatch = matches!(search, Err(StoreError::DimensionMismatch { .. }));
        prop_assert!(is_dimension_mismatch);
        prop_assert_eq!(store.len(), vectors.len());
    }
}

#[test]
fn test_scenario_tie_break() {
    let mut store = VectorStore::new();
    store.add(vec![1.0, 0.0], "doc A".to_string()).unwrap();
    store.add(vec![0.0, 1.0], "doc B".to_string()).unwrap();
    store.add(vec![1.0, 0.0], "doc C".to_string()).unwrap();

    assert_eq!(store.search(&[1.0, 0.0], 2).unwrap(), vec!["doc A", "doc C"]);
}

#[test]
fn test_scenario_empty_store() {
    let store: VectorStore = VectorStore::new();
    assert!(store.search(&[1.0, 0.0], 3).unwrap().is_empty());
}

#[test]
fn test_scenario_single_record_large_top_k() {
    let mut store = VectorStore::new();
    store.add(vec![0.2, 0.9], "only".to_string()).unwrap();

    assert_eq!(store.search(&[1.0, 0.0], 5).unwrap(), vec!["only"]);
}
