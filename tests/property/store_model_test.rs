// tests/property/store_model_test.rs

//! Model-based properties: an arbitrary interleaving of merge, bump, and
//! delete operations leaves the store in exactly the state a plain map
//! model predicts, and field reads preserve request order.

use featherq_client::{ConnId, ConnInfo, ConnInfoStore, ConsumerIdentity, FieldValue};
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Op {
    Merge { key: usize, field: String, value: i64 },
    Bump { key: usize, field: String, delta: i64 },
    Delete { key: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let field = "[a-c]";
    prop_oneof![
        (0..4usize, field, -100i64..100).prop_map(|(key, field, value)| Op::Merge {
            key,
            field,
            value
        }),
        (0..4usize, field, -10i64..10).prop_map(|(key, field, delta)| Op::Bump {
            key,
            field,
            delta
        }),
        (0..4usize).prop_map(|key| Op::Delete { key }),
    ]
}

fn conn(key: usize) -> ConnId {
    ConnId::from_address(
        &ConsumerIdentity::new("orders", "archiver"),
        "10.0.0.1",
        4150 + key as u16,
    )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 50,
        max_shrink_iters: 500,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_store_matches_map_model(ops in prop::collection::vec(op_strategy(), 1..=60)) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let store = ConnInfoStore::new();
            let mut model: HashMap<usize, HashMap<String, i64>> = HashMap::new();

            for op in &ops {
                match op.clone() {
                    Op::Merge { key, field, value } => {
                        store
                            .merge(&conn(key), ConnInfo::new().with(&field, FieldValue::Count(value)))
                            .await
                            .unwrap();
                        model.entry(key).or_default().insert(field, value);
                    }
                    Op::Bump { key, field, delta } => {
                        let name = field.clone();
                        store
                            .update_with(&conn(key), move |mut info| {
                                info.bump(&name, delta);
                                info
                            })
                            .await
                            .unwrap();
                        let entry = model.entry(key).or_default();
                        let next = entry.get(&field).copied().unwrap_or(0).saturating_add(delta);
                        entry.insert(field, next);
                    }
                    Op::Delete { key } => {
                        store.delete(&conn(key)).await.unwrap();
                        model.remove(&key);
                    }
                }
            }

            for key in 0..4usize {
                let info = store.get(&conn(key)).await.unwrap();
                let expected = model.get(&key);
                assert_eq!(
                    info.len(),
                    expected.map_or(0, HashMap::len),
                    "field count diverged for key {key}"
                );
                for (field, value) in expected.into_iter().flatten() {
                    assert_eq!(
                        info.count(field),
                        Some(*value),
                        "field '{field}' diverged for key {key}"
                    );
                }
            }

            let tracked = store.len().await.unwrap();
            assert_eq!(tracked, model.len());
        });
    }

    #[test]
    fn test_get_fields_preserves_request_order(
        present in prop::collection::hash_map("[a-e]", -100i64..100, 0..=5),
        requested in prop::collection::vec("[a-g]", 1..=8),
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let store = ConnInfoStore::new();
            let id = conn(0);
            let record: ConnInfo = present
                .iter()
                .map(|(name, value)| (name.clone(), FieldValue::Count(*value)))
                .collect();
            store.merge(&id, record).await.unwrap();

            let names: Vec<&str> = requested.iter().map(String::as_str).collect();
            let values = store.get_fields(&id, &names).await.unwrap();

            assert_eq!(values.len(), requested.len());
            for (name, value) in requested.iter().zip(values) {
                let expected = present.get(name).map(|v| FieldValue::Count(*v));
                assert_eq!(value, expected, "value under '{name}' diverged");
            }
        });
    }
}
