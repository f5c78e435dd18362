use shoplist_core::{
    ItemDraft, ItemPriority, ItemStore, SharingPolicy, ShoppingItem, StoreConfig, StoreError,
};
use std::time::Duration;

fn open_store() -> ItemStore {
    ItemStore::open_in_memory(SharingPolicy::default()).unwrap()
}

fn draft(category: &str, name: &str, price: i64, priority: ItemPriority) -> ItemDraft {
    ItemDraft::new(category, name, "desc", price, priority)
}

fn names(items: &[ShoppingItem]) -> Vec<&str> {
    items.iter().map(|item| item.name.as_str()).collect()
}

#[test]
fn inserted_item_reads_back_with_fresh_id() {
    let store = open_store();
    let milk = ItemDraft::new("Dairy", "Milk", "2L", 3, ItemPriority::Normal);

    let stored = store.insert(&milk).unwrap();
    assert_eq!(stored.category, milk.category);
    assert_eq!(stored.name, milk.name);
    assert_eq!(stored.description, milk.description);
    assert_eq!(stored.estimated_price, milk.estimated_price);
    assert_eq!(stored.priority, milk.priority);
    assert!(!stored.is_bought);

    assert_eq!(store.get(stored.id).unwrap(), Some(stored.clone()));
    assert_eq!(store.observe_all().current(), vec![stored]);
}

#[test]
fn observe_all_follows_four_tier_order() {
    let store = open_store();
    let d = store.insert(&draft("Food", "D", 1, ItemPriority::Normal)).unwrap();
    let c = store.insert(&draft("Food", "C", 1, ItemPriority::High)).unwrap();
    store.insert(&draft("Food", "B", 1, ItemPriority::Normal)).unwrap();
    store.insert(&draft("Food", "A", 1, ItemPriority::High)).unwrap();
    store.update(&d.with_bought(true)).unwrap();
    store.update(&c.with_bought(true)).unwrap();

    let items = store.observe_all().current();
    assert_eq!(names(&items), vec!["A", "B", "C", "D"]);
}

#[test]
fn observe_by_price_and_name_are_sorted() {
    let store = open_store();
    store.insert(&draft("Food", "pear", 7, ItemPriority::Normal)).unwrap();
    store.insert(&draft("Food", "apple", 2, ItemPriority::High)).unwrap();
    store.insert(&draft("Food", "kiwi", 5, ItemPriority::Normal)).unwrap();

    assert_eq!(
        names(&store.observe_by_price().current()),
        vec!["apple", "kiwi", "pear"]
    );
    assert_eq!(
        names(&store.observe_by_name().current()),
        vec!["apple", "kiwi", "pear"]
    );
}

#[test]
fn delete_bought_removes_exactly_bought_items() {
    let store = open_store();
    let bread = store.insert(&draft("Food", "Bread", 2, ItemPriority::High)).unwrap();
    store.insert(&draft("Food", "Butter", 3, ItemPriority::High)).unwrap();
    store.insert(&draft("Food", "Jam", 4, ItemPriority::Normal)).unwrap();
    store.update(&bread.with_bought(true)).unwrap();

    assert_eq!(store.delete_bought().unwrap(), 1);
    assert_eq!(store.count_all().unwrap(), 2);
    assert_eq!(store.count_high_priority().unwrap(), 1);
    assert!(store
        .observe_all()
        .current()
        .iter()
        .all(|item| !item.is_bought));
}

#[test]
fn delete_all_empties_store() {
    let store = open_store();
    store.insert(&draft("Food", "Bread", 2, ItemPriority::High)).unwrap();
    store.insert(&draft("Food", "Jam", 4, ItemPriority::Normal)).unwrap();

    assert_eq!(store.delete_all().unwrap(), 2);
    assert_eq!(store.count_all().unwrap(), 0);
    assert!(store.observe_all().current().is_empty());
}

#[test]
fn updated_category_round_trips() {
    let store = open_store();
    let soap = store.insert(&draft("Food", "Soap", 2, ItemPriority::Normal)).unwrap();

    store.update(&soap.with_category("Household")).unwrap();

    let expected = soap.with_category("Household");
    assert_eq!(store.observe_all().current(), vec![expected.clone()]);
    assert_eq!(store.get(soap.id).unwrap(), Some(expected));
}

#[test]
fn update_and_delete_of_missing_id_are_not_found() {
    let store = open_store();
    let ghost = ShoppingItem::from_draft(99, draft("Food", "Ghost", 1, ItemPriority::Normal));

    assert!(matches!(store.update(&ghost), Err(StoreError::NotFound(99))));
    assert!(matches!(store.delete(99), Err(StoreError::NotFound(99))));
    assert_eq!(store.count_all().unwrap(), 0);
}

#[test]
fn invalid_records_are_rejected_before_storage() {
    let store = open_store();
    let err = store
        .insert(&draft("Food", "Rice", -5, ItemPriority::Normal))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(store.count_all().unwrap(), 0);
}

#[test]
fn subscriber_is_notified_after_every_write() {
    let store = open_store();
    let mut items = store.observe_all().subscribe();
    assert!(items.current().is_empty());

    let tea = store.insert(&draft("Beverages", "Tea", 3, ItemPriority::Normal)).unwrap();
    assert!(items.has_changed());
    assert_eq!(items.current().len(), 1);

    store.update(&tea.with_bought(true)).unwrap();
    assert!(items.has_changed());
    assert!(items.current()[0].is_bought);

    store.delete(tea.id).unwrap();
    assert!(items.has_changed());
    assert!(items.current().is_empty());
}

#[test]
fn unobserved_sequences_refresh_lazily() {
    let store =
        ItemStore::open_in_memory(SharingPolicy::with_grace_window(Duration::ZERO)).unwrap();
    let by_price = store.observe_by_price();
    assert!(by_price.current().is_empty());
    let refreshes = by_price.refresh_count();

    store.insert(&draft("Food", "Rice", 2, ItemPriority::Normal)).unwrap();
    store.insert(&draft("Food", "Oil", 3, ItemPriority::Normal)).unwrap();
    assert!(by_price.is_stale());
    assert_eq!(by_price.refresh_count(), refreshes);

    assert_eq!(by_price.current().len(), 2);
    assert_eq!(by_price.refresh_count(), refreshes + 1);
}

#[test]
fn file_store_persists_between_opens() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::in_dir(dir.path());

    let store = ItemStore::open_with(&config).unwrap();
    let milk = store.insert(&draft("Dairy", "Milk", 3, ItemPriority::High)).unwrap();
    drop(store);

    let reopened = ItemStore::open_with(&config).unwrap();
    assert_eq!(reopened.get(milk.id).unwrap(), Some(milk));
    assert_eq!(reopened.count_high_priority().unwrap(), 1);
}
