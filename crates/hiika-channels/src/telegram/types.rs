//! Telegram Bot API deserialization types.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct TgResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgUpdate {
    pub update_id: i64,
    pub message: Option<TgMessage>,
    /// Post in a channel the bot administers.
    pub channel_post: Option<TgMessage>,
    /// The bot's own membership changed in a chat.
    pub my_chat_member: Option<TgChatMemberUpdated>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgMessage {
    pub message_id: i64,
    pub from: Option<TgUser>,
    /// Chat the message was sent on behalf of (anonymous admins, channels).
    pub sender_chat: Option<TgChat>,
    pub chat: TgChat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl TgUser {
    /// `@username`, else "First Last", else "First".
    pub fn display_name(&self) -> String {
        if let Some(ref un) = self.username {
            format!("@{un}")
        } else if let Some(ref ln) = self.last_name {
            format!("{} {ln}", self.first_name)
        } else {
            self.first_name.clone()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgChat {
    pub id: i64,
    /// Chat type: "private", "group", "supergroup", or "channel".
    #[serde(default, rename = "type")]
    pub chat_type: String,
    pub title: Option<String>,
}

impl TgChat {
    pub fn is_group(&self) -> bool {
        matches!(self.chat_type.as_str(), "group" | "supergroup")
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgChatMemberUpdated {
    pub chat: TgChat,
    pub from: TgUser,
    pub old_chat_member: TgChatMember,
    pub new_chat_member: TgChatMember,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub(crate) struct TgChatMember {
    /// "creator", "administrator", "member", "restricted", "left", or "kicked".
    pub status: String,
    pub user: TgUser,
}

impl TgChatMemberUpdated {
    /// True when the bot went from outside the chat to inside it.
    pub fn is_bot_added(&self) -> bool {
        let was_out = matches!(self.old_chat_member.status.as_str(), "left" | "kicked");
        let is_in = matches!(
            self.new_chat_member.status.as_str(),
            "member" | "administrator"
        );
        was_out && is_in
    }
}
