use crate::models::strategy::{Strategy, StrategyFilter};
use actix::Message;
use anyhow::Result;

#[derive(Debug, Clone)]
pub struct ListStrategiesPayload {
    pub user_id: String,
    pub filter: StrategyFilter,
}

impl Message for ListStrategiesPayload {
    type Result = Result<Vec<Strategy>>;
}
