//! Vision document content and the scripted vision-chat assistant.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";

pub const VALID_CHAT_ROLES: &[&str] = &[ROLE_USER, ROLE_ASSISTANT];

pub const MAX_MISSION_LENGTH: usize = 2000;
pub const MAX_LIST_ENTRIES: usize = 20;
pub const MAX_LIST_ENTRY_LENGTH: usize = 200;
pub const MAX_MESSAGE_LENGTH: usize = 4000;

/// Recent chat turns the assistant accepts as context.
pub const MAX_CONTEXT_TURNS: usize = 10;

// ---------------------------------------------------------------------------
// Chat role
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            ROLE_USER => Ok(Self::User),
            ROLE_ASSISTANT => Ok(Self::Assistant),
            _ => Err(format!(
                "Invalid chat role '{s}'. Must be one of: {}",
                VALID_CHAT_ROLES.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => ROLE_USER,
            Self::Assistant => ROLE_ASSISTANT,
        }
    }
}

pub fn validate_message(message: &str) -> Result<(), String> {
    if message.trim().is_empty() {
        return Err("Message must not be empty".to_string());
    }
    if message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(format!(
            "Message must be at most {MAX_MESSAGE_LENGTH} characters"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Vision content
// ---------------------------------------------------------------------------

/// The JSON body of a vision document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisionContent {
    pub mission: String,
    pub values: Vec<String>,
    pub goals: Vec<String>,
    pub tool_stack: Vec<String>,
}

impl VisionContent {
    pub fn validate(&self) -> Result<(), String> {
        if self.mission.chars().count() > MAX_MISSION_LENGTH {
            return Err(format!(
                "mission must be at most {MAX_MISSION_LENGTH} characters"
            ));
        }
        validate_list("values", &self.values)?;
        validate_list("goals", &self.goals)?;
        validate_list("toolStack", &self.tool_stack)?;
        Ok(())
    }

    /// True when nothing has been written yet.
    pub fn is_blank(&self) -> bool {
        self.mission.trim().is_empty()
            && self.values.is_empty()
            && self.goals.is_empty()
            && self.tool_stack.is_empty()
    }

    /// Trim entries and drop blank ones.
    pub fn normalized(mut self) -> Self {
        self.mission = self.mission.trim().to_string();
        for list in [&mut self.values, &mut self.goals, &mut self.tool_stack] {
            *list = list
                .iter()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect();
        }
        self
    }
}

fn validate_list(field: &str, entries: &[String]) -> Result<(), String> {
    if entries.len() > MAX_LIST_ENTRIES {
        return Err(format!(
            "{field} may have at most {MAX_LIST_ENTRIES} entries"
        ));
    }
    if entries
        .iter()
        .any(|e| e.chars().count() > MAX_LIST_ENTRY_LENGTH)
    {
        return Err(format!(
            "{field} entries must be at most {MAX_LIST_ENTRY_LENGTH} characters"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Scripted assistant
// ---------------------------------------------------------------------------

const ONBOARDING_REPLY: &str = "I'd be happy to help you define your vision! Let's start by exploring what matters most to you. What are your core values and what kind of impact do you want to make in your field?";

const GENERIC_REPLY: &str = "That's an interesting question! Reflecting on your vision document, consider how this connects to your broader mission and goals. What specific aspect would you like to explore further?";

/// Keyword groups checked in order; the first hit picks the reply.
const KEYWORD_REPLIES: &[(&[&str], &str)] = &[
    (
        &["mission", "purpose"],
        "Your mission is the North Star that guides all your decisions. Based on what you've shared, consider how your daily actions align with this larger purpose. What small steps can you take today that move you closer to this vision?",
    ),
    (
        &["goal", "achieve"],
        "Breaking down your goals into actionable steps is key. Start with your most important goal and work backwards - what needs to happen this quarter, this month, and this week to make progress?",
    ),
    (
        &["value", "principle"],
        "Your values are the compass that keeps you on course when the seas get rough. How can you ensure your daily decisions and actions reflect these core principles?",
    ),
    (
        &["skill", "tool", "learn"],
        "Continuous learning is essential for growth. Based on your goals, identify the top 2-3 skills that would have the most impact. Focus on depth rather than breadth - mastery comes from deliberate practice.",
    ),
];

/// Pick the assistant's reply to `message`.
pub fn compose_reply(message: &str, has_vision: bool) -> &'static str {
    if !has_vision {
        return ONBOARDING_REPLY;
    }
    let lower = message.to_lowercase();
    KEYWORD_REPLIES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, reply)| *reply)
        .unwrap_or(GENERIC_REPLY)
}
