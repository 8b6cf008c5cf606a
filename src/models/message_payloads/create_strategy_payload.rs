use crate::models::strategy::{NewStrategy, Strategy};
use actix::Message;
use anyhow::Result;

#[derive(Debug, Clone)]
pub struct CreateStrategyPayload {
    pub strategy: NewStrategy,
}

impl Message for CreateStrategyPayload {
    type Result = Result<Strategy>;
}
