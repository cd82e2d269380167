//! One-shot notices kept in the session until the next page render.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::ApiError;

const FLASH_KEY: &str = "_messages";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub text: String,
}

pub async fn push(
    session: &Session,
    level: FlashLevel,
    text: impl Into<String>,
) -> Result<(), ApiError> {
    let mut queue: Vec<FlashMessage> = session.get(FLASH_KEY).await?.unwrap_or_default();
    queue.push(FlashMessage {
        level,
        text: text.into(),
    });
    session.insert(FLASH_KEY, queue).await?;
    Ok(())
}

pub async fn success(session: &Session, text: impl Into<String>) -> Result<(), ApiError> {
    push(session, FlashLevel::Success, text).await
}

pub async fn error(session: &Session, text: impl Into<String>) -> Result<(), ApiError> {
    push(session, FlashLevel::Error, text).await
}

/// Removes and returns every pending notice.
pub async fn drain(session: &Session) -> Result<Vec<FlashMessage>, ApiError> {
    Ok(session
        .remove::<Vec<FlashMessage>>(FLASH_KEY)
        .await?
        .unwrap_or_default())
}
