use serde::Serialize;

/// Documentation for a variable a template can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariableDef {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: &'static str,
}

impl VariableDef {
    /// Placeholder for a variable with no documentation
    pub fn unknown(name: &'static str) -> Self {
        Self {
            name,
            kind: "unknown",
            description: "",
        }
    }
}

const fn def(name: &'static str, kind: &'static str, description: &'static str) -> VariableDef {
    VariableDef {
        name,
        kind,
        description,
    }
}

pub static VARIABLES: &[VariableDef] = &[
    // Identity
    def("char", "string", "Name of the AI character being role-played"),
    def("user", "string", "Name of the human user"),
    // Character profile
    def("char_description", "string", "Physical appearance of the character"),
    def("char_personality", "string", "Personality traits and behavior"),
    def("char_profile", "string", "Extended character information/lore"),
    def("char_message_examples", "array", "Example messages showing how character speaks"),
    def("char_post_history_instructions", "string", "Instructions added after message history"),
    // User profile
    def("user_description", "string", "Description of the user/persona"),
    // Other characters
    def("other_chars", "array<string>", "List of other character names"),
    def("other_characters", "array<object>", "Detailed character objects"),
    def("characters", "array<object>", "All characters (story mode)"),
    // Messages
    def("messages", "array", "Full conversation history"),
    def("previous_messages", "array", "Earlier messages for context"),
    def("last_messages", "array", "Recent messages for action inference"),
    def("latest_messages", "array", "Most recent messages (image gen)"),
    def("messages_to_extract", "array", "Messages for memory extraction"),
    def("messages_to_summarize", "array", "Messages for summarization"),
    def("message", "object|string", "Current message being processed"),
    // Reply context
    def("reply_to", "object", "Message being replied to"),
    def("prefix", "string", "Forced start of response"),
    def("last_char", "string", "Name of last character who spoke"),
    // Context and world state
    def("scenario", "string", "Initial scenario/setting description"),
    def("summary", "string", "Summary of story so far"),
    def("context", "array<string>", "Current contextual information"),
    def("now", "string", "Current date/time"),
    def("event_text", "string", "Specific event specifications (story mode)"),
    def("narrator_profile", "string", "Profile for narrator voice (story mode)"),
    // Documents and memories
    def("documents", "array", "Documents for reference (RAG)"),
    def("document", "string|object", "Single document for memory extraction"),
    def("memories", "array", "Stored memories for the character"),
    // Functions
    def("functions", "array", "Available functions/actions"),
    def("last_function_call", "object|null", "Previously executed function"),
    // Vision and images
    def("vision", "string", "Description of what character currently sees"),
    def("source", "enum", "Image source: \"Eyes\", \"Screen\", \"Attachment\""),
    def("image_description", "string", "Generated description of an image"),
    def("image_label", "string", "Additional info provided with image"),
    def("image_filename", "string", "Filename of attached image"),
    def("last_image_prompt", "string", "Previously generated image prompt"),
    def("include_char_appearance", "boolean", "Include character appearance in prompt"),
    def("include_user_appearance", "boolean", "Include user appearance in prompt"),
    def("instructions", "string", "Custom image gen prompting instructions"),
    def("user_prompt", "string", "Custom user prompt override"),
    // Configuration
    def("chat_style", "enum", "\"Assistant\" | \"Roleplay\" | \"Storytelling\""),
    def("chat_flow", "enum", "\"Story\" | (other)"),
    def("explicitLevel", "enum", "\"Prohibited\" | \"Allowed\" | \"Encouraged\""),
    def("text_processing", "enum", "\"Roleplay\" | (other)"),
    def("explicit", "boolean", "Allows unrestricted vocabulary"),
    // System
    def("system_prompt", "string", "Complete override for system prompt"),
    def("system_intro", "string", "Intro section override"),
    def("system_prompt_addons", "array<string>", "Additional system instructions"),
    // Special messages
    def("away_duration", "string", "Human-readable duration"),
    def("effect", "string", "Action effect description"),
    // Module-specific
    def("suggested_reply", "string", "Reply fragment to review (ReviewPass)"),
    def("maybe", "boolean", "Flag to include optional phrases"),
    def("x", "integer", "Internal random counter"),
];

/// Display groups, in the order the editor shows them
pub static GROUPS: &[(&str, &[&str])] = &[
    ("Identity", &["char", "user"]),
    (
        "Character",
        &[
            "char_description",
            "char_personality",
            "char_profile",
            "char_message_examples",
            "char_post_history_instructions",
        ],
    ),
    ("User", &["user_description"]),
    (
        "Messages",
        &[
            "messages",
            "previous_messages",
            "last_messages",
            "latest_messages",
            "messages_to_extract",
            "messages_to_summarize",
            "message",
            "reply_to",
            "prefix",
            "last_char",
        ],
    ),
    (
        "Context",
        &[
            "scenario",
            "summary",
            "context",
            "now",
            "event_text",
            "narrator_profile",
            "documents",
            "document",
            "memories",
        ],
    ),
    ("Functions", &["functions", "last_function_call"]),
    (
        "Vision",
        &[
            "vision",
            "source",
            "image_description",
            "image_label",
            "image_filename",
            "last_image_prompt",
            "include_char_appearance",
            "include_user_appearance",
            "instructions",
            "user_prompt",
        ],
    ),
    (
        "Config",
        &[
            "chat_style",
            "chat_flow",
            "explicitLevel",
            "text_processing",
            "explicit",
            "system_prompt",
            "system_intro",
            "system_prompt_addons",
        ],
    ),
    (
        "Other",
        &[
            "other_chars",
            "other_characters",
            "characters",
            "away_duration",
            "effect",
            "suggested_reply",
            "maybe",
            "x",
        ],
    ),
];
