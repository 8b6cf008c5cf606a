use actix::Message;
use anyhow::Result;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct DeleteStrategyPayload {
    pub id: Uuid,
}

impl Message for DeleteStrategyPayload {
    type Result = Result<bool>;
}
