use serde::Serialize;

pub const PROMPTS_BASE: &str = "Resources/Prompts/Default/en";
pub const MODULES_BASE: &str = "Resources/Modules";

/// A family of templates sharing a directory and a variable scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: &'static str,
    /// Directory relative to the prompts base, or to the modules base for modules
    pub path: &'static str,
    pub description: &'static str,
    pub is_module: bool,
    pub variables: &'static [&'static str],
}

impl Category {
    /// Directory of this category relative to the template root
    pub fn base_path(&self) -> String {
        let root = if self.is_module {
            MODULES_BASE
        } else {
            PROMPTS_BASE
        };
        format!("{}/{}", root, self.path)
    }

    pub fn uses(&self, variable: &str) -> bool {
        self.variables.contains(&variable)
    }
}

pub static CATEGORIES: &[Category] = &[
    Category {
        name: "TextGen",
        path: "TextGen",
        description: "Main chat/roleplay generation",
        is_module: false,
        variables: &[
            "char",
            "user",
            "char_description",
            "char_personality",
            "char_profile",
            "char_message_examples",
            "char_post_history_instructions",
            "user_description",
            "other_chars",
            "other_characters",
            "messages",
            "previous_messages",
            "reply_to",
            "prefix",
            "last_char",
            "scenario",
            "summary",
            "context",
            "now",
            "documents",
            "memories",
            "functions",
            "last_function_call",
            "vision",
            "chat_style",
            "chat_flow",
            "explicitLevel",
            "text_processing",
            "system_prompt",
            "system_intro",
            "system_prompt_addons",
        ],
    },
    Category {
        name: "TextGen/Includes",
        path: "TextGen/Includes",
        description: "Shared TextGen components",
        is_module: false,
        variables: &[
            "char",
            "user",
            "char_description",
            "char_personality",
            "char_profile",
            "char_message_examples",
            "user_description",
            "other_chars",
            "other_characters",
            "scenario",
            "summary",
            "context",
            "now",
            "documents",
            "memories",
            "functions",
            "vision",
            "chat_style",
            "chat_flow",
            "explicitLevel",
            "text_processing",
            "system_prompt_addons",
        ],
    },
    Category {
        name: "ActionInference",
        path: "ActionInference",
        description: "Action/function selection",
        is_module: false,
        variables: &[
            "char",
            "user",
            "char_personality",
            "scenario",
            "now",
            "context",
            "messages",
            "previous_messages",
            "last_messages",
            "message",
            "functions",
            "last_function_call",
            "characters",
            "user_description",
            "last_char",
        ],
    },
    Category {
        name: "Summarization",
        path: "Summarization",
        description: "Memory & summary generation",
        is_module: false,
        variables: &[
            "char",
            "user",
            "char_description",
            "char_personality",
            "char_profile",
            "user_description",
            "other_characters",
            "scenario",
            "summary",
            "explicit",
            "messages_to_summarize",
            "messages_to_extract",
            "document",
            "memories",
        ],
    },
    Category {
        name: "ComputerVision",
        path: "ComputerVision",
        description: "Image description",
        is_module: false,
        variables: &[
            "char",
            "user",
            "explicitLevel",
            "source",
            "vision",
            "image_label",
            "image_filename",
            "message",
        ],
    },
    Category {
        name: "ImageGen",
        path: "ImageGen",
        description: "Image prompt generation",
        is_module: false,
        variables: &[
            "char",
            "user",
            "char_description",
            "user_description",
            "instructions",
            "user_prompt",
            "include_char_appearance",
            "include_user_appearance",
            "previous_messages",
            "latest_messages",
            "last_image_prompt",
        ],
    },
    Category {
        name: "SpecialMessages",
        path: "SpecialMessages",
        description: "Event notifications",
        is_module: false,
        variables: &[
            "char",
            "user",
            "message",
            "effect",
            "away_duration",
            "image_description",
            "source",
        ],
    },
    Category {
        name: "Includes",
        path: "Includes",
        description: "Shared template components",
        is_module: false,
        variables: &["char", "user", "messages", "chat_style"],
    },
    Category {
        name: "ChainOfThought",
        path: "ChainOfThought/en",
        description: "Pre-reply thinking/review",
        is_module: true,
        variables: &[
            "char",
            "user",
            "char_personality",
            "char_description",
            "char_profile",
            "scenario",
            "summary",
            "context",
            "now",
            "messages",
            "explicit",
            "suggested_reply",
        ],
    },
    Category {
        name: "Continuations",
        path: "Continuations/en",
        description: "Idle/continuation messages",
        is_module: true,
        variables: &["char", "user", "maybe", "x"],
    },
];
