use crate::models::strategy::Strategy;
use actix::Message;
use anyhow::Result;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct GetStrategyPayload {
    pub id: Uuid,
}

impl Message for GetStrategyPayload {
    type Result = Result<Option<Strategy>>;
}
