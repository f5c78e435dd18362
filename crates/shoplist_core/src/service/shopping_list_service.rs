//! Shopping list coordinator.
//!
//! # Responsibility
//! - Expose UI-facing live views derived from the item store.
//! - Translate user intents into store commands without blocking callers.
//! - Validate form input before any write is attempted.
//!
//! # Invariants
//! - Commands run one at a time, in submission order, off the caller's
//!   thread.
//! - Invalid drafts and forms never reach the store.
//! - Failed commands are logged and leave every live view unchanged.
//! - At most one filtered view is held; a new filter replaces it.

use crate::filter::ItemFilter;
use crate::live::LiveView;
use crate::model::category::{default_categories, merge_categories, ALL_CATEGORIES};
use crate::model::form::{FormErrors, ItemForm};
use crate::model::item::{ItemDraft, ItemValidationError, ShoppingItem};
use crate::model::summary::SummaryCounts;
use crate::store::item_store::{ItemStore, StoreError, StoreResult};
use log::{debug, error, warn};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};

type Job = Box<dyn FnOnce(&ItemStore) + Send>;

/// Handle to a submitted command.
///
/// Dropping it does not cancel the command; `wait` is optional.
#[must_use = "await `wait()` to observe the command outcome, or drop to fire and forget"]
pub struct PendingCommand<T> {
    command: &'static str,
    reply: oneshot::Receiver<StoreResult<T>>,
}

impl<T> PendingCommand<T> {
    /// Waits for the command to finish and returns its outcome.
    pub async fn wait(self) -> StoreResult<T> {
        let command = self.command;
        self.reply
            .await
            .map_err(|_| StoreError::TaskAborted(command))?
    }
}

struct FilteredView {
    filter: ItemFilter,
    view: LiveView<Vec<ShoppingItem>>,
}

/// View-model for the shopping list and summary screens.
pub struct ShoppingListService {
    store: Arc<ItemStore>,
    jobs: mpsc::UnboundedSender<Job>,
    items: LiveView<Vec<ShoppingItem>>,
    categories: LiveView<Vec<String>>,
    filtered: Mutex<Option<FilteredView>>,
}

impl ShoppingListService {
    /// Creates the coordinator and starts its command worker on `runtime`.
    pub fn new(store: Arc<ItemStore>, runtime: &Handle) -> Self {
        let (jobs, queue) = mpsc::unbounded_channel();
        runtime.spawn(run_command_worker(Arc::clone(&store), queue));

        let items = store.observe_all();
        let mut initial_categories = vec![ALL_CATEGORIES.to_string()];
        initial_categories.extend(default_categories());
        let categories = items.derive("categories", initial_categories, |items| {
            merge_categories(items)
        });

        Self {
            store,
            jobs,
            items,
            categories,
            filtered: Mutex::new(None),
        }
    }

    /// Live items in four-tier bought/priority order.
    pub fn current_items(&self) -> LiveView<Vec<ShoppingItem>> {
        self.items.clone()
    }

    /// Live items in ascending price order.
    pub fn items_by_price(&self) -> LiveView<Vec<ShoppingItem>> {
        self.store.observe_by_price()
    }

    /// Live category picker entries, `"All"` first.
    pub fn categories(&self) -> LiveView<Vec<String>> {
        self.categories.clone()
    }

    /// Returns the live view of `current_items` matching `filter`.
    ///
    /// Asking for a different filter replaces the previously held view.
    pub fn filter(&self, filter: ItemFilter) -> LiveView<Vec<ShoppingItem>> {
        let mut slot = self.filtered.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(current) = slot.as_ref() {
            if current.filter == filter {
                return current.view.clone();
            }
        }

        debug!("event=filter_replace module=service status=ok");
        let predicate = filter.clone();
        let view = self
            .items
            .derive("filtered_items", Vec::new(), move |items| predicate.apply(items));
        *slot = Some(FilteredView {
            filter,
            view: view.clone(),
        });
        view
    }

    /// Queues an insert after validating the draft.
    pub fn add_item(
        &self,
        draft: ItemDraft,
    ) -> Result<PendingCommand<ShoppingItem>, ItemValidationError> {
        draft.validate()?;
        Ok(self.dispatch("add_item", move |store| store.insert(&draft)))
    }

    /// Queues a full-record update with `new_category` applied on top.
    pub fn update_item(&self, item: &ShoppingItem, new_category: &str) -> PendingCommand<()> {
        let updated = item.with_category(new_category);
        self.dispatch("update_item", move |store| store.update(&updated))
    }

    /// Queues an update of the bought flag.
    pub fn toggle_bought(&self, item: &ShoppingItem, value: bool) -> PendingCommand<()> {
        let updated = item.with_bought(value);
        self.dispatch("toggle_bought", move |store| store.update(&updated))
    }

    pub fn delete_item(&self, item: &ShoppingItem) -> PendingCommand<()> {
        let id = item.id;
        self.dispatch("delete_item", move |store| store.delete(id))
    }

    pub fn delete_all_items(&self) -> PendingCommand<usize> {
        self.dispatch("delete_all_items", |store| store.delete_all())
    }

    pub fn delete_bought_items(&self) -> PendingCommand<usize> {
        self.dispatch("delete_bought_items", |store| store.delete_bought())
    }

    pub async fn get_all_items_num(&self) -> StoreResult<i64> {
        self.dispatch("get_all_items_num", |store| store.count_all())
            .wait()
            .await
    }

    pub async fn get_important_items_num(&self) -> StoreResult<i64> {
        self.dispatch("get_important_items_num", |store| {
            store.count_high_priority()
        })
        .wait()
        .await
    }

    /// Gathers the navigation parameters of the summary screen.
    ///
    /// Total and important counts come from the store; the bought count
    /// comes from the live list as currently held, so the three numbers may
    /// be captured at slightly different instants.
    pub async fn summary_counts(&self) -> StoreResult<SummaryCounts> {
        let items = self.items.clone();
        self.dispatch("summary_counts", move |store| {
            let all_items = store.count_all()?;
            let important_items = store.count_high_priority()?;
            let bought_items = items.current().iter().filter(|item| item.is_bought).count();
            Ok(SummaryCounts {
                all_items,
                important_items,
                bought_items: i64::try_from(bought_items).unwrap_or(i64::MAX),
            })
        })
        .wait()
        .await
    }

    /// Validates the edit dialog and queues the matching write.
    ///
    /// Without `editing` a new item is added; otherwise the edited record
    /// replaces `editing` with the form's category applied.
    pub fn save_form(
        &self,
        form: &ItemForm,
        editing: Option<&ShoppingItem>,
    ) -> Result<PendingCommand<()>, FormErrors> {
        match editing {
            None => {
                let draft = form.to_draft()?;
                Ok(self.dispatch("add_item", move |store| store.insert(&draft).map(|_| ())))
            }
            Some(original) => {
                let updated = form.apply_to(original)?;
                let category = updated.category.clone();
                Ok(self.update_item(&updated, &category))
            }
        }
    }

    fn dispatch<T, F>(&self, command: &'static str, op: F) -> PendingCommand<T>
    where
        T: Send + 'static,
        F: FnOnce(&ItemStore) -> StoreResult<T> + Send + 'static,
    {
        let (reply_tx, reply) = oneshot::channel();
        let job: Job = Box::new(move |store: &ItemStore| {
            let result = op(store);
            match &result {
                Ok(_) => debug!("event=command module=service status=ok command={command}"),
                Err(StoreError::NotFound(id)) => warn!(
                    "event=command module=service status=skipped command={command} error_code=not_found item_id={id}"
                ),
                Err(err) => warn!(
                    "event=command module=service status=error command={command} error={err}"
                ),
            }
            let _ = reply_tx.send(result);
        });

        if self.jobs.send(job).is_err() {
            error!("event=command module=service status=error command={command} error_code=worker_stopped");
        }
        PendingCommand { command, reply }
    }
}

async fn run_command_worker(store: Arc<ItemStore>, mut queue: mpsc::UnboundedReceiver<Job>) {
    while let Some(job) = queue.recv().await {
        let store = Arc::clone(&store);
        if let Err(err) = tokio::task::spawn_blocking(move || job(&*store)).await {
            error!("event=command_worker module=service status=error error={err}");
        }
    }
    debug!("event=command_worker module=service status=stopped");
}
