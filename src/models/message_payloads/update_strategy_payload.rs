use crate::models::strategy::{Strategy, StrategyUpdate};
use actix::Message;
use anyhow::Result;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct UpdateStrategyPayload {
    pub id: Uuid,
    pub update: StrategyUpdate,
}

impl Message for UpdateStrategyPayload {
    type Result = Result<Strategy>;
}
