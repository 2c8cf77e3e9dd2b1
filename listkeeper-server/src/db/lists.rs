//! List service - one named checklist and its items
//!
//! The service resolves its `ManagedList` row once and caches the id and
//! counter. Every write goes through [`in_transaction`].
//!
//! The counter cache belongs to one service instance. Another instance bound
//! to the same name (in this or another process) keeps its own cache and
//! does not see bumps made here until it is reopened.

use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::tx::in_transaction;
use super::{Store, StoreError};
use crate::models::{CheckedUpdate, Item, ItemText, ListName, ManagedList, UpdateCheck};

/// Stateful façade over one managed list
#[derive(Debug)]
pub struct ListService {
    store: Store,
    list_id: i64,
    name: String,
    counter: Mutex<i64>,
}

impl ListService {
    /// Load the list called `name`, creating it with counter 0 if absent.
    pub async fn open(store: &Store, name: &ListName) -> Result<Self, StoreError> {
        let list = load_or_create(store.pool(), name.as_str()).await?;
        info!(list = %list.name, id = list.id, counter = list.counter, "Managed list ready");

        Ok(Self {
            store: store.clone(),
            list_id: list.id,
            name: list.name,
            counter: Mutex::new(list.counter),
        })
    }

    pub fn id(&self) -> i64 {
        self.list_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Currently cached counter value.
    pub async fn counter(&self) -> i64 {
        *self.counter.lock().await
    }

    /// Snapshot of the cached list record.
    pub async fn managed_list(&self) -> ManagedList {
        ManagedList {
            id: self.list_id,
            name: self.name.clone(),
            counter: self.counter().await,
        }
    }

    /// All items of this list, oldest first. Empty when the list has none.
    pub async fn reload(&self) -> Result<Vec<Item>, StoreError> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, text, checked, managedList
            FROM Item
            WHERE managedList = ?
            ORDER BY id ASC
            "#,
        )
        .bind(self.list_id)
        .fetch_all(self.store.pool())
        .await?;

        Ok(items)
    }

    /// Insert an item and return it as persisted.
    pub async fn add_item(&self, text: &ItemText, checked: bool) -> Result<Item, StoreError> {
        let list_id = self.list_id;
        let text = text.as_str().to_owned();

        let item = in_transaction(self.store.pool(), move |conn| {
            Box::pin(async move {
                let id = sqlx::query("INSERT INTO Item (text, checked, managedList) VALUES (?, ?, ?)")
                    .bind(&text)
                    .bind(checked)
                    .bind(list_id)
                    .execute(&mut *conn)
                    .await?
                    .last_insert_rowid();

                fetch_item(&mut *conn, id)
                    .await?
                    .ok_or_else(|| StoreError::InsertionInconsistency {
                        entity: "item",
                        key: id.to_string(),
                    })
            })
        })
        .await?;

        debug!(list = %self.name, item = item.id, "Item added");
        Ok(item)
    }

    /// Look an item up by id.
    ///
    /// Items are addressed globally: an id owned by another list is returned too.
    pub async fn get_item(&self, id: i64) -> Result<Option<Item>, StoreError> {
        Ok(fetch_item(self.store.pool(), id).await?)
    }

    /// Delete an item. Deleting a missing id is a no-op.
    pub async fn delete_item(&self, id: i64) -> Result<(), StoreError> {
        let done = sqlx::query("DELETE FROM Item WHERE id = ?")
            .bind(id)
            .execute(self.store.pool())
            .await?;

        debug!(item = id, deleted = done.rows_affected(), "Item delete");
        Ok(())
    }

    /// Update an item's text and, unless `checked` is `Unchanged`, its flag.
    /// Updating a missing id is a no-op.
    pub async fn update_item(
        &self,
        id: i64,
        text: &ItemText,
        checked: CheckedUpdate,
    ) -> Result<(), StoreError> {
        let done = match checked {
            CheckedUpdate::Unchanged => {
                sqlx::query("UPDATE Item SET text = ? WHERE id = ?")
                    .bind(text.as_str())
                    .bind(id)
                    .execute(self.store.pool())
                    .await?
            }
            CheckedUpdate::Set(flag) => {
                sqlx::query("UPDATE Item SET text = ?, checked = ? WHERE id = ?")
                    .bind(text.as_str())
                    .bind(flag)
                    .bind(id)
                    .execute(self.store.pool())
                    .await?
            }
        };

        debug!(item = id, updated = done.rows_affected(), ?checked, "Item update");
        Ok(())
    }

    /// Bump the counter if `counter` matches the cached value.
    ///
    /// Callers are serialized on the cache, and the persisted write commits
    /// before the cache moves, so two callers presenting the same value
    /// cannot both bump.
    pub async fn check_counter(&self, counter: i64) -> Result<UpdateCheck, StoreError> {
        let mut cached = self.counter.lock().await;

        if *cached != counter {
            return Ok(UpdateCheck {
                counter: *cached,
                updated: false,
            });
        }

        let next = *cached + 1;
        let list_id = self.list_id;
        in_transaction(self.store.pool(), move |conn| {
            Box::pin(async move {
                sqlx::query("UPDATE ManagedList SET counter = ? WHERE id = ?")
                    .bind(next)
                    .bind(list_id)
                    .execute(&mut *conn)
                    .await?;
                Ok(())
            })
        })
        .await?;

        *cached = next;
        debug!(list = %self.name, counter = next, "Counter bumped");

        Ok(UpdateCheck {
            counter: next,
            updated: true,
        })
    }
}

async fn fetch_item<'e, E>(executor: E, id: i64) -> Result<Option<Item>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Item>("SELECT id, text, checked, managedList FROM Item WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
}

async fn find_list<'e, E>(executor: E, name: &str) -> Result<Option<ManagedList>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, ManagedList>("SELECT id, name, counter FROM ManagedList WHERE name = ?")
        .bind(name)
        .fetch_optional(executor)
        .await
}

/// Insert a list row. Returns false if the name already exists.
async fn insert_list(conn: &mut SqliteConnection, name: &str) -> Result<bool, sqlx::Error> {
    match sqlx::query("INSERT INTO ManagedList (name) VALUES (?)")
        .bind(name)
        .execute(conn)
        .await
    {
        Ok(_) => Ok(true),
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => Ok(false),
        Err(err) => Err(err),
    }
}

async fn load_or_create(pool: &SqlitePool, name: &str) -> Result<ManagedList, StoreError> {
    if let Some(list) = find_list(pool, name).await? {
        return Ok(list);
    }

    let name = name.to_owned();
    in_transaction(pool, move |conn| {
        Box::pin(async move {
            if insert_list(&mut *conn, &name).await? {
                info!(list = %name, "Created managed list");
            } else {
                // Lost the race to another opener; its row is the one to use.
                debug!(list = %name, "Managed list already created, re-reading");
            }

            find_list(&mut *conn, &name)
                .await?
                .ok_or_else(|| StoreError::InsertionInconsistency {
                    entity: "managed list",
                    key: name.clone(),
                })
        })
    })
    .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::db::StoreConfig;
    use tempfile::TempDir;

    async fn temp_store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("sqlite.db")).await.unwrap();
        (dir, store)
    }

    fn name(s: &str) -> ListName {
        ListName::new(s).unwrap()
    }

    fn text(s: &str) -> ItemText {
        ItemText::new(s).unwrap()
    }

    #[tokio::test]
    async fn fresh_store_scenario() {
        let (_dir, store) = temp_store().await;
        let list = ListService::open(&store, &name("list1")).await.unwrap();

        assert_eq!(
            list.managed_list().await,
            ManagedList {
                id: 1,
                name: "list1".into(),
                counter: 0
            }
        );

        let milk = list.add_item(&text("milk"), false).await.unwrap();
        assert_eq!((milk.id, milk.text.as_str(), milk.checked), (1, "milk", false));

        let eggs = list.add_item(&text("eggs"), true).await.unwrap();
        assert_eq!((eggs.id, eggs.text.as_str(), eggs.checked), (2, "eggs", true));
        assert_eq!(eggs.managed_list, 1);

        assert_eq!(list.reload().await.unwrap(), vec![milk, eggs]);
    }

    #[tokio::test]
    async fn reopening_same_name_shares_row() {
        let (_dir, store) = temp_store().await;
        let first = ListService::open(&store, &name("shoppingList")).await.unwrap();
        first.add_item(&text("bread"), false).await.unwrap();

        let second = ListService::open(&store, &name("shoppingList")).await.unwrap();

        assert_eq!(first.id(), second.id());
        assert_eq!(first.reload().await.unwrap(), second.reload().await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_opens_resolve_one_row() {
        let (_dir, store) = temp_store().await;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    ListService::open(&store, &ListName::new("racy").unwrap())
                        .await
                        .unwrap()
                        .id()
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.expect("task panicked"));
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_insert_is_reported_not_raised() {
        let (_dir, store) = temp_store().await;
        let mut conn = store.pool().acquire().await.unwrap();

        assert!(insert_list(&mut conn, "dup").await.unwrap());
        assert!(!insert_list(&mut conn, "dup").await.unwrap());
    }

    #[tokio::test]
    async fn add_then_get_round_trips() {
        let (_dir, store) = temp_store().await;
        let list = ListService::open(&store, &name("list")).await.unwrap();

        let added = list.add_item(&text("apples"), true).await.unwrap();
        let fetched = list.get_item(added.id).await.unwrap();

        assert_eq!(fetched, Some(added));
        assert_eq!(list.get_item(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn deleting_missing_item_is_noop() {
        let (_dir, store) = temp_store().await;
        let list = ListService::open(&store, &name("list")).await.unwrap();
        list.add_item(&text("keep"), false).await.unwrap();
        let before = list.reload().await.unwrap();

        list.delete_item(12345).await.unwrap();

        assert_eq!(list.reload().await.unwrap(), before);
    }

    #[tokio::test]
    async fn delete_removes_item() {
        let (_dir, store) = temp_store().await;
        let list = ListService::open(&store, &name("list")).await.unwrap();
        let gone = list.add_item(&text("gone"), false).await.unwrap();
        let kept = list.add_item(&text("kept"), false).await.unwrap();

        list.delete_item(gone.id).await.unwrap();

        assert_eq!(list.get_item(gone.id).await.unwrap(), None);
        assert_eq!(list.reload().await.unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn order_survives_updates() {
        let (_dir, store) = temp_store().await;
        let list = ListService::open(&store, &name("list")).await.unwrap();
        let a = list.add_item(&text("A"), false).await.unwrap();
        let b = list.add_item(&text("B"), false).await.unwrap();
        let c = list.add_item(&text("C"), false).await.unwrap();

        list.update_item(a.id, &text("A2"), CheckedUpdate::Set(true))
            .await
            .unwrap();
        list.update_item(c.id, &text("C2"), CheckedUpdate::Unchanged)
            .await
            .unwrap();

        let texts: Vec<_> = list
            .reload()
            .await
            .unwrap()
            .into_iter()
            .map(|item| (item.id, item.text))
            .collect();
        assert_eq!(
            texts,
            vec![(a.id, "A2".to_string()), (b.id, "B".to_string()), (c.id, "C2".to_string())]
        );
    }

    #[tokio::test]
    async fn tri_state_update() {
        let (_dir, store) = temp_store().await;
        let list = ListService::open(&store, &name("list")).await.unwrap();
        let item = list.add_item(&text("old text"), true).await.unwrap();

        list.update_item(item.id, &text("new text"), CheckedUpdate::Unchanged)
            .await
            .unwrap();
        let updated = list.get_item(item.id).await.unwrap().unwrap();
        assert_eq!(updated.text, "new text");
        assert!(updated.checked);

        list.update_item(item.id, &text("new text"), CheckedUpdate::Set(false))
            .await
            .unwrap();
        assert!(!list.get_item(item.id).await.unwrap().unwrap().checked);
    }

    #[tokio::test]
    async fn updating_missing_item_is_noop() {
        let (_dir, store) = temp_store().await;
        let list = ListService::open(&store, &name("list")).await.unwrap();

        list.update_item(77, &text("nothing"), CheckedUpdate::Set(true))
            .await
            .unwrap();
        assert!(list.reload().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn counter_check_sequence() {
        let (_dir, store) = temp_store().await;
        let list = ListService::open(&store, &name("list")).await.unwrap();

        assert_eq!(
            list.check_counter(0).await.unwrap(),
            UpdateCheck { counter: 1, updated: true }
        );
        assert_eq!(
            list.check_counter(0).await.unwrap(),
            UpdateCheck { counter: 1, updated: false }
        );
        assert_eq!(
            list.check_counter(1).await.unwrap(),
            UpdateCheck { counter: 2, updated: true }
        );
        assert_eq!(
            list.check_counter(10).await.unwrap(),
            UpdateCheck { counter: 2, updated: false }
        );
    }

    #[tokio::test]
    async fn concurrent_checks_bump_once() {
        let (_dir, store) = temp_store().await;
        let list = Arc::new(ListService::open(&store, &name("list")).await.unwrap());

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let list = Arc::clone(&list);
                tokio::spawn(async move { list.check_counter(0).await.unwrap() })
            })
            .collect();

        let mut bumped = 0;
        for handle in handles {
            let check = handle.await.expect("task panicked");
            assert_eq!(check.counter, 1);
            if check.updated {
                bumped += 1;
            }
        }
        assert_eq!(bumped, 1);
    }

    #[tokio::test]
    async fn state_survives_restart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sqlite.db");

        let store = Store::open(&path).await.unwrap();
        let list = ListService::open(&store, &name("list")).await.unwrap();
        let item = list.add_item(&text("persisted"), true).await.unwrap();
        list.check_counter(0).await.unwrap();
        store.close().await;

        let store = Store::open(&path).await.unwrap();
        let list = ListService::open(&store, &name("list")).await.unwrap();
        assert_eq!(list.counter().await, 1);
        assert_eq!(list.reload().await.unwrap(), vec![item]);
    }

    #[tokio::test]
    async fn lists_are_isolated_but_lookup_is_global() {
        let (_dir, store) = temp_store().await;
        let home = ListService::open(&store, &name("home")).await.unwrap();
        let work = ListService::open(&store, &name("work")).await.unwrap();
        assert_ne!(home.id(), work.id());

        let item = home.add_item(&text("laundry"), false).await.unwrap();

        assert!(work.reload().await.unwrap().is_empty());
        // No ownership check on point lookups.
        assert_eq!(work.get_item(item.id).await.unwrap(), Some(item));
    }

    #[tokio::test]
    async fn reopens_lists_with_free_form_names() {
        let (_dir, store) = temp_store().await;
        sqlx::query("INSERT INTO ManagedList (name, counter) VALUES ('Shopping List', 4)")
            .execute(store.pool())
            .await
            .unwrap();

        let list = ListService::open(&store, &name("Shopping List")).await.unwrap();
        assert_eq!(
            list.managed_list().await,
            ManagedList {
                id: 1,
                name: "Shopping List".into(),
                counter: 4
            }
        );

        let other = ListService::open(&store, &name("einkäufe")).await.unwrap();
        assert_ne!(other.id(), list.id());
        assert_eq!(other.name(), "einkäufe");
    }

    #[tokio::test]
    async fn lock_timeout_is_storage_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sqlite.db");

        let store = Store::open_with(StoreConfig {
            busy_timeout: std::time::Duration::from_millis(100),
            ..StoreConfig::new(&path)
        })
        .await
        .unwrap();
        let list = ListService::open(&store, &name("list")).await.unwrap();

        let blocker = Store::open(&path).await.unwrap();
        let mut held = blocker.pool().acquire().await.unwrap();
        sqlx::query("BEGIN EXCLUSIVE").execute(&mut *held).await.unwrap();

        let err = list.add_item(&text("blocked"), false).await.unwrap_err();
        assert!(err.is_unavailable());

        let err = list.check_counter(0).await.unwrap_err();
        assert!(err.is_unavailable());
        assert_eq!(list.counter().await, 0);

        sqlx::query("ROLLBACK").execute(&mut *held).await.unwrap();
    }
}
