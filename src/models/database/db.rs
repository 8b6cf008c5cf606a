use crate::models::{
    database::strategy_store::StrategyStore,
    message_payloads::{
        create_strategy_payload::CreateStrategyPayload,
        delete_strategy_payload::DeleteStrategyPayload, get_strategy_payload::GetStrategyPayload,
        list_strategies_payload::ListStrategiesPayload,
        update_strategy_payload::UpdateStrategyPayload,
    },
    strategy::Strategy,
};
use actix::{Actor, Context, Handler, ResponseFuture};
use anyhow::Result;
use tracing::{debug, info, warn};

/// Actor that owns the strategy store. All record reads and writes go through
/// its mailbox.
pub struct DB {
    store: StrategyStore,
}

impl DB {
    /// Uses Postgres when a database url is given, memory otherwise.
    pub async fn new(db_url: Option<&str>) -> Result<Self> {
        let store = match db_url {
            Some(url) => {
                let store = StrategyStore::connect(url).await?;
                info!("Strategy store connected to Postgres");
                store
            }
            None => {
                info!("No DATABASE_URL set, keeping strategies in memory");
                StrategyStore::in_memory()
            }
        };

        Ok(Self { store })
    }

    pub fn in_memory() -> Self {
        Self {
            store: StrategyStore::in_memory(),
        }
    }
}

impl Actor for DB {
    type Context = Context<Self>;
}

impl Handler<CreateStrategyPayload> for DB {
    type Result = ResponseFuture<Result<Strategy>>;

    fn handle(&mut self, msg: CreateStrategyPayload, _ctx: &mut Context<Self>) -> Self::Result {
        let store = self.store.clone();

        Box::pin(async move {
            let res = store.create(msg.strategy).await;

            match &res {
                Ok(strategy) => debug!(strategy_id = %strategy.id, "Strategy created"),
                Err(e) => warn!("Strategy failed to insert with error: {:#}", e),
            }

            res
        })
    }
}

impl Handler<GetStrategyPayload> for DB {
    type Result = ResponseFuture<Result<Option<Strategy>>>;

    fn handle(&mut self, msg: GetStrategyPayload, _ctx: &mut Context<Self>) -> Self::Result {
        let store = self.store.clone();

        Box::pin(async move { store.get(msg.id).await })
    }
}

impl Handler<ListStrategiesPayload> for DB {
    type Result = ResponseFuture<Result<Vec<Strategy>>>;

    fn handle(&mut self, msg: ListStrategiesPayload, _ctx: &mut Context<Self>) -> Self::Result {
        let store = self.store.clone();

        Box::pin(async move { store.list_by_user(&msg.user_id, &msg.filter).await })
    }
}

impl Handler<UpdateStrategyPayload> for DB {
    type Result = ResponseFuture<Result<Strategy>>;

    fn handle(&mut self, msg: UpdateStrategyPayload, _ctx: &mut Context<Self>) -> Self::Result {
        let store = self.store.clone();
        let id = msg.id;

        Box::pin(async move {
            let res = store.update(id, msg.update).await;

            match &res {
                Ok(strategy) => {
                    debug!(strategy_id = %id, status = %strategy.status, "Strategy updated")
                }
                Err(e) => warn!(strategy_id = %id, "Strategy failed to update with error: {:#}", e),
            }

            res
        })
    }
}

impl Handler<DeleteStrategyPayload> for DB {
    type Result = ResponseFuture<Result<bool>>;

    fn handle(&mut self, msg: DeleteStrategyPayload, _ctx: &mut Context<Self>) -> Self::Result {
        let store = self.store.clone();

        Box::pin(async move { store.delete(msg.id).await })
    }
}
