//! LogConversationHandler - Command handler for recording brand conversations.

use std::sync::Arc;

use crate::domain::deal::{ConversationLog, DealActivity, DealError, NewConversation};
use crate::domain::foundation::{CommandMetadata, DealId};
use crate::ports::DealRepository;

use super::load_owned;

/// Command to append a conversation to a deal's log.
#[derive(Debug, Clone)]
pub struct LogConversationCommand {
    pub deal_id: DealId,
    pub entry: NewConversation,
}

/// Result of a recorded conversation.
#[derive(Debug, Clone)]
pub struct LogConversationResult {
    pub log: ConversationLog,
    pub activity: DealActivity,
}

/// Handler for conversation logging.
///
/// Allowed in every status; the deal row itself is never touched.
pub struct LogConversationHandler {
    repository: Arc<dyn DealRepository>,
}

impl LogConversationHandler {
    pub fn new(repository: Arc<dyn DealRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: LogConversationCommand,
        metadata: CommandMetadata,
    ) -> Result<LogConversationResult, DealError> {
        load_owned(self.repository.as_ref(), cmd.deal_id, &metadata.user_id).await?;

        let log = ConversationLog::record(cmd.deal_id, cmd.entry)?;
        let activity = DealActivity::conversation_logged(&log, &metadata.user_id);

        self.repository
            .append_conversation(&log, &activity)
            .await
            .map_err(DealError::for_deal(cmd.deal_id))?;

        tracing::info!(
            deal_id = %cmd.deal_id,
            conversation_log_id = %log.id,
            channel = %log.channel,
            disposition = %log.disposition,
            "Conversation logged"
        );

        Ok(LogConversationResult { log, activity })
    }
}
