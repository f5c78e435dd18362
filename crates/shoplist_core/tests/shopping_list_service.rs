use shoplist_core::{
    FormErrors, ItemDraft, ItemFilter, ItemForm, ItemPriority, ItemStore, SharingPolicy,
    ShoppingListService, StoreError, SummaryCounts, ALL_CATEGORIES,
};
use std::sync::Arc;
use tokio::runtime::Handle;

fn service() -> (ShoppingListService, Arc<ItemStore>) {
    let store = Arc::new(ItemStore::open_in_memory(SharingPolicy::default()).unwrap());
    let service = ShoppingListService::new(Arc::clone(&store), &Handle::current());
    (service, store)
}

fn milk() -> ItemDraft {
    ItemDraft::new("Dairy", "Milk", "2L", 3, ItemPriority::Normal)
}

#[tokio::test(flavor = "multi_thread")]
async fn bought_item_moves_between_status_filters() {
    let (service, _store) = service();

    let stored = service.add_item(milk()).unwrap().wait().await.unwrap();
    assert_eq!(service.get_all_items_num().await.unwrap(), 1);

    service.toggle_bought(&stored, true).wait().await.unwrap();

    let bought = service.filter(ItemFilter::from_labels("All", "All", "Bought", ""));
    let names: Vec<String> = bought.current().into_iter().map(|item| item.name).collect();
    assert_eq!(names, vec!["Milk".to_string()]);

    let pending = service.filter(ItemFilter::from_labels("All", "All", "Pending", ""));
    assert!(pending.current().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn default_filter_matches_current_items() {
    let (service, _store) = service();
    service.add_item(milk()).unwrap().wait().await.unwrap();
    service
        .add_item(ItemDraft::new("Food", "Bread", "rye", 2, ItemPriority::High))
        .unwrap()
        .wait()
        .await
        .unwrap();

    let filtered = service.filter(ItemFilter::default());
    assert_eq!(filtered.current(), service.current_items().current());
}

#[tokio::test(flavor = "multi_thread")]
async fn same_filter_reuses_view_and_new_filter_replaces_it() {
    let (service, _store) = service();
    let high = ItemFilter::from_labels("All", "High", "All", "");

    let first = service.filter(high.clone());
    let again = service.filter(high);
    assert_eq!(first.refresh_count(), again.refresh_count());
    let mut watcher = again.subscribe();
    assert_eq!(first.subscriber_count(), 1);

    let dairy = service.filter(ItemFilter::from_labels("Dairy", "All", "All", ""));
    assert_eq!(dairy.subscriber_count(), 0);

    service.add_item(milk()).unwrap().wait().await.unwrap();
    assert_eq!(dairy.current().len(), 1);
    assert!(watcher.current().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn categories_include_defaults_and_item_categories() {
    let (service, _store) = service();
    service
        .add_item(ItemDraft::new("Garden", "Seeds", "tomato", 4, ItemPriority::Normal))
        .unwrap()
        .wait()
        .await
        .unwrap();

    let categories = service.categories().current();
    assert_eq!(categories.first().map(String::as_str), Some(ALL_CATEGORIES));
    assert!(categories.iter().any(|category| category == "Dairy"));
    assert_eq!(categories.last().map(String::as_str), Some("Garden"));
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_form_never_reaches_store() {
    let (service, store) = service();

    for price_text in ["-5", "abc"] {
        let form = ItemForm {
            name: "Rice".to_string(),
            description: "basmati".to_string(),
            price_text: price_text.to_string(),
            category: Some("Food".to_string()),
            priority: ItemPriority::Normal,
        };
        let errors: FormErrors = match service.save_form(&form, None) {
            Err(errors) => errors,
            Ok(_) => panic!("form with price `{price_text}` should be rejected"),
        };
        assert!(errors.price);
    }

    assert_eq!(store.count_all().unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn save_form_adds_then_edits() {
    let (service, store) = service();
    let mut form = ItemForm {
        name: "Rice".to_string(),
        description: "basmati".to_string(),
        price_text: " 12 ".to_string(),
        category: Some("Food".to_string()),
        priority: ItemPriority::High,
    };

    service.save_form(&form, None).unwrap().wait().await.unwrap();
    let stored = service.current_items().current().remove(0);
    assert_eq!(stored.estimated_price, 12);

    form.category = Some("Pantry".to_string());
    form.price_text = "15".to_string();
    service
        .save_form(&form, Some(&stored))
        .unwrap()
        .wait()
        .await
        .unwrap();

    let edited = store.get(stored.id).unwrap().unwrap();
    assert_eq!(edited.category, "Pantry");
    assert_eq!(edited.estimated_price, 15);
    assert_eq!(store.count_all().unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn summary_counts_reflect_store_and_list() {
    let (service, _store) = service();
    let eggs = service
        .add_item(ItemDraft::new("Food", "Eggs", "dozen", 4, ItemPriority::High))
        .unwrap()
        .wait()
        .await
        .unwrap();
    service.add_item(milk()).unwrap().wait().await.unwrap();
    service.toggle_bought(&eggs, true).wait().await.unwrap();

    assert_eq!(service.get_important_items_num().await.unwrap(), 1);
    assert_eq!(
        service.summary_counts().await.unwrap(),
        SummaryCounts {
            all_items: 2,
            important_items: 1,
            bought_items: 1,
        }
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_missing_item_reports_not_found() {
    let (service, _store) = service();
    let stored = service.add_item(milk()).unwrap().wait().await.unwrap();
    service.delete_item(&stored).wait().await.unwrap();

    let result = service.delete_item(&stored).wait().await;
    assert!(matches!(result, Err(StoreError::NotFound(id)) if id == stored.id));
    assert!(service.current_items().current().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn commands_apply_in_submission_order() {
    let (service, store) = service();

    let pending: Vec<_> = (0..10)
        .map(|index| {
            service
                .add_item(ItemDraft::new(
                    "Food",
                    format!("item-{index}"),
                    "desc",
                    index,
                    ItemPriority::Normal,
                ))
                .unwrap()
        })
        .collect();
    let cleared = service.delete_all_items();

    for command in pending {
        command.wait().await.unwrap();
    }
    assert_eq!(cleared.wait().await.unwrap(), 10);
    assert_eq!(store.count_all().unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_bought_and_update_category() {
    let (service, store) = service();
    let bread = service
        .add_item(ItemDraft::new("Food", "Bread", "rye", 2, ItemPriority::Normal))
        .unwrap()
        .wait()
        .await
        .unwrap();
    let soap = service
        .add_item(ItemDraft::new("Food", "Soap", "bar", 1, ItemPriority::Normal))
        .unwrap()
        .wait()
        .await
        .unwrap();

    service.toggle_bought(&bread, true).wait().await.unwrap();
    service.update_item(&soap, "Household").wait().await.unwrap();
    assert_eq!(service.delete_bought_items().wait().await.unwrap(), 1);

    let remaining = service.current_items().current();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].category, "Household");
    assert_eq!(store.count_all().unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn add_item_rejects_invalid_draft_synchronously() {
    let (service, store) = service();
    let blank = ItemDraft::new("Food", "   ", "desc", 1, ItemPriority::Normal);

    assert!(service.add_item(blank).is_err());
    assert_eq!(service.get_all_items_num().await.unwrap(), 0);
    assert_eq!(store.count_all().unwrap(), 0);
}
