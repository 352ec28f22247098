//! # Template Catalog
//!
//! Static description of the known template families and the variables each
//! of them can reference. The editor uses it to document variables next to
//! the template being edited; nothing here touches the filesystem.

mod categories;
mod variables;

pub use categories::{Category, CATEGORIES, MODULES_BASE, PROMPTS_BASE};
pub use variables::{VariableDef, GROUPS, VARIABLES};

use serde::Serialize;

/// Variables of one display group that a category uses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableGroup {
    pub name: &'static str,
    pub variables: Vec<VariableDef>,
}

pub fn categories() -> &'static [Category] {
    CATEGORIES
}

pub fn category(name: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.name == name)
}

pub fn variable(name: &str) -> Option<&'static VariableDef> {
    VARIABLES.iter().find(|v| v.name == name)
}

/// Category whose directory directly contains the template
pub fn category_for_path(template_path: &str) -> Option<&'static Category> {
    let (parent, _) = template_path.rsplit_once('/')?;
    CATEGORIES.iter().find(|c| c.base_path() == parent)
}

/// Variables a category uses, grouped in display order
///
/// Empty groups are skipped. Variables without a definition are reported
/// with type `unknown`.
pub fn grouped_variables(category: &Category) -> Vec<VariableGroup> {
    GROUPS
        .iter()
        .filter_map(|(group, names)| {
            let variables: Vec<VariableDef> = names
                .iter()
                .copied()
                .filter(|name| category.uses(name))
                .map(|name| variable(name).copied().unwrap_or_else(|| VariableDef::unknown(name)))
                .collect();

            (!variables.is_empty()).then_some(VariableGroup {
                name: *group,
                variables,
            })
        })
        .collect()
}

/// Case-insensitive filter over template paths by file name or category
pub fn search<'a>(templates: &'a [String], query: &str) -> Vec<&'a String> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return templates.iter().collect();
    }

    templates
        .iter()
        .filter(|path| {
            let file_name = path.rsplit('/').next().unwrap_or(path.as_str());
            let category = category_for_path(path).map(|c| c.name).unwrap_or("");
            file_name.to_lowercase().contains(&query) || category.to_lowercase().contains(&query)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_variable_is_documented_and_grouped() {
        for category in categories() {
            for name in category.variables {
                assert!(variable(name).is_some(), "{} lacks a definition", name);
                assert!(
                    GROUPS.iter().any(|(_, names)| names.contains(name)),
                    "{} is not in any group",
                    name
                );
            }
        }
    }

    #[test]
    fn test_base_paths() {
        assert_eq!(
            category("TextGen").unwrap().base_path(),
            "Resources/Prompts/Default/en/TextGen"
        );
        assert_eq!(
            category("ChainOfThought").unwrap().base_path(),
            "Resources/Modules/ChainOfThought/en"
        );
    }

    #[test]
    fn test_category_for_path_uses_direct_parent() {
        let includes = category_for_path(
            "Resources/Prompts/Default/en/TextGen/Includes/Intro.scriban",
        )
        .unwrap();
        assert_eq!(includes.name, "TextGen/Includes");

        let textgen = category_for_path(
            "Resources/Prompts/Default/en/TextGen/ChatInstructSystemMessage.scriban",
        )
        .unwrap();
        assert_eq!(textgen.name, "TextGen");

        assert!(category_for_path("Resources/Formatting/ChatML.scriban").is_none());
        assert!(category_for_path("NoDirectory.scriban").is_none());
    }

    #[test]
    fn test_grouped_variables_keep_display_order() {
        let continuations = category("Continuations").unwrap();
        let groups = grouped_variables(continuations);

        let names: Vec<_> = groups.iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["Identity", "Other"]);
        let other: Vec<_> = groups[1].variables.iter().map(|v| v.name).collect();
        assert_eq!(other, vec!["maybe", "x"]);
        assert_eq!(groups[1].variables[1].kind, "integer");
    }

    #[test]
    fn test_undocumented_variable_is_unknown() {
        let custom = Category {
            name: "Custom",
            path: "Custom",
            description: "",
            is_module: false,
            variables: &["char", "mystery"],
        };
        let groups = grouped_variables(&custom);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].variables.len(), 1);
        assert_eq!(VariableDef::unknown("mystery").kind, "unknown");
    }

    #[test]
    fn test_search_by_file_name_and_category() {
        let templates = vec![
            "Resources/Prompts/Default/en/ImageGen/ImagineSystemMessage.scriban".to_string(),
            "Resources/Prompts/Default/en/Summarization/MemoryMergeUserMessage.scriban".to_string(),
            "Resources/Modules/Continuations/en/ShortContinuationMessage.scriban".to_string(),
        ];

        assert_eq!(search(&templates, "memorymerge").len(), 1);
        assert_eq!(search(&templates, "IMAGEGEN").len(), 1);
        assert_eq!(search(&templates, "continuations").len(), 1);
        // Directory names other than the category are not matched
        assert!(search(&templates, "resources").is_empty());
        assert_eq!(search(&templates, "  ").len(), 3);
    }

    #[test]
    fn test_catalog_serializes_camel_case() {
        let json = serde_json::to_value(category("Includes").unwrap()).unwrap();
        assert_eq!(json["isModule"], false);
        assert_eq!(json["variables"][3], "chat_style");

        let json = serde_json::to_value(variable("x").unwrap()).unwrap();
        assert_eq!(json["type"], "integer");
    }
}
