use shoplist_core::{SummaryCounts, SummarySnapshot};

#[test]
fn summary_counts_serialize_with_camel_case_keys() {
    let counts = SummaryCounts {
        all_items: 5,
        important_items: 2,
        bought_items: 3,
    };

    let json = serde_json::to_value(counts).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "allItems": 5, "importantItems": 2, "boughtItems": 3 })
    );

    let decoded: SummaryCounts = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, counts);
}

#[test]
fn snapshot_derives_pending_items() {
    let snapshot = SummarySnapshot::from(SummaryCounts {
        all_items: 5,
        important_items: 2,
        bought_items: 3,
    });
    assert_eq!(snapshot.pending_items(), 2);
}

#[test]
fn extreme_decoded_counts_do_not_overflow_pending_items() {
    let counts: SummaryCounts = serde_json::from_value(serde_json::json!({
        "allItems": i64::MIN,
        "importantItems": 0,
        "boughtItems": i64::MAX
    }))
    .unwrap();

    let snapshot = SummarySnapshot::from(counts);
    assert_eq!(snapshot.pending_items(), i64::MIN);

    let snapshot = SummarySnapshot::from(SummaryCounts {
        all_items: i64::MAX,
        important_items: 0,
        bought_items: -1,
    });
    assert_eq!(snapshot.pending_items(), i64::MAX);
}
