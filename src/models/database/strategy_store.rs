use crate::models::strategy::{NewStrategy, Strategy, StrategyFilter, StrategyUpdate};
use anyhow::{anyhow, Result};
use chrono::Utc;
use indexmap::IndexMap;
use parking_lot::Mutex;
use sqlx::{postgres::PgPoolOptions, query, query_as, types::Json, Pool, Postgres};
use std::sync::Arc;
use uuid::Uuid;

const CREATE_TABLE: &str = r#"
    create table if not exists strategies (
        id uuid primary key,
        user_id text not null,
        doc jsonb not null,
        created_at timestamptz not null,
        updated_at timestamptz not null
    )
"#;

/// Strategy documents, either in Postgres (one JSONB document per row) or in
/// process memory.
#[derive(Debug, Clone)]
pub enum StrategyStore {
    Postgres(Pool<Postgres>),
    Memory(Arc<Mutex<IndexMap<Uuid, Strategy>>>),
}

impl StrategyStore {
    pub async fn connect(db_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(db_url)
            .await?;

        query(CREATE_TABLE).execute(&pool).await?;

        Ok(StrategyStore::Postgres(pool))
    }

    pub fn in_memory() -> Self {
        StrategyStore::Memory(Arc::new(Mutex::new(IndexMap::new())))
    }

    pub async fn create(&self, new: NewStrategy) -> Result<Strategy> {
        let strategy = Strategy::from_new(Uuid::new_v4(), new, Utc::now());

        match self {
            StrategyStore::Postgres(pool) => {
                let q = r#"
                insert into strategies (id, user_id, doc, created_at, updated_at)
                values ($1, $2, $3, $4, $5)
                "#;

                query(q)
                    .bind(strategy.id)
                    .bind(&strategy.user_id)
                    .bind(Json(&strategy))
                    .bind(strategy.created_at)
                    .bind(strategy.updated_at)
                    .execute(pool)
                    .await?;
            }
            StrategyStore::Memory(docs) => {
                docs.lock().insert(strategy.id, strategy.clone());
            }
        }

        Ok(strategy)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Strategy>> {
        match self {
            StrategyStore::Postgres(pool) => {
                let row: Option<(Json<Strategy>,)> =
                    query_as("select doc from strategies where id = $1")
                        .bind(id)
                        .fetch_optional(pool)
                        .await?;

                Ok(row.map(|(doc,)| doc.0))
            }
            StrategyStore::Memory(docs) => Ok(docs.lock().get(&id).cloned()),
        }
    }

    pub async fn list_by_user(
        &self,
        user_id: &str,
        filter: &StrategyFilter,
    ) -> Result<Vec<Strategy>> {
        let strategies = match self {
            StrategyStore::Postgres(pool) => {
                let rows: Vec<(Json<Strategy>,)> =
                    query_as("select doc from strategies where user_id = $1")
                        .bind(user_id)
                        .fetch_all(pool)
                        .await?;

                rows.into_iter().map(|(doc,)| doc.0).collect()
            }
            StrategyStore::Memory(docs) => docs
                .lock()
                .values()
                .filter(|s| s.user_id == user_id)
                .cloned()
                .collect(),
        };

        Ok(filter.apply(strategies))
    }

    pub async fn update(&self, id: Uuid, update: StrategyUpdate) -> Result<Strategy> {
        let now = Utc::now();

        match self {
            StrategyStore::Postgres(pool) => {
                let mut tx = pool.begin().await?;

                let row: Option<(Json<Strategy>,)> =
                    query_as("select doc from strategies where id = $1 for update")
                        .bind(id)
                        .fetch_optional(&mut *tx)
                        .await?;

                let mut strategy = row
                    .map(|(doc,)| doc.0)
                    .ok_or(anyhow!("Strategy {} does not exist.", id))?;
                strategy.apply(update, now)?;

                query("update strategies set doc = $1, updated_at = $2 where id = $3")
                    .bind(Json(&strategy))
                    .bind(strategy.updated_at)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;

                tx.commit().await?;

                Ok(strategy)
            }
            StrategyStore::Memory(docs) => {
                let mut docs = docs.lock();
                let strategy = docs
                    .get_mut(&id)
                    .ok_or(anyhow!("Strategy {} does not exist.", id))?;
                strategy.apply(update, now)?;

                Ok(strategy.clone())
            }
        }
    }

    /// Returns whether a record was removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        match self {
            StrategyStore::Postgres(pool) => {
                let res = query("delete from strategies where id = $1")
                    .bind(id)
                    .execute(pool)
                    .await?;

                Ok(res.rows_affected() > 0)
            }
            StrategyStore::Memory(docs) => Ok(docs.lock().shift_remove(&id).is_some()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        strategy::{DateRange, StrategyStatus},
        timeframe::{Interval, Timeframe},
    };
    use chrono::NaiveDate;

    fn new_strategy(user_id: &str, name: &str) -> NewStrategy {
        NewStrategy {
            name: name.to_string(),
            user_id: user_id.to_string(),
            initial_equity: 1_000.0,
            timeframe: Timeframe::new(Interval::Hour1),
            date_range: DateRange::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            )
            .unwrap(),
            status: StrategyStatus::Draft,
            last_run_at: None,
            run_count: 0,
        }
    }

    #[tokio::test]
    async fn memory_store_crud() {
        let store = StrategyStore::in_memory();

        let a = store.create(new_strategy("u1", "a")).await.unwrap();
        store.create(new_strategy("u1", "b")).await.unwrap();
        store.create(new_strategy("u2", "c")).await.unwrap();

        assert_eq!(store.get(a.id).await.unwrap(), Some(a.clone()));

        let mine = store
            .list_by_user("u1", &StrategyFilter::default())
            .await
            .unwrap();
        assert_eq!(mine.len(), 2);

        let updated = store
            .update(a.id, StrategyUpdate::failed("boom"))
            .await
            .unwrap();
        assert_eq!(updated.status, StrategyStatus::Failed);
        assert!(updated.updated_at >= a.updated_at);

        assert!(store.delete(a.id).await.unwrap());
        assert!(!store.delete(a.id).await.unwrap());
        assert_eq!(store.get(a.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_of_unknown_id_fails() {
        let store = StrategyStore::in_memory();
        let err = store
            .update(Uuid::new_v4(), StrategyUpdate::default())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("does not exist"));
    }
}
