use crate::config::Config;
use crate::PopupTipResult;
use schemars::{schema_for, Schema};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Writes `config` as YAML with each field preceded by its doc comment.
pub fn serialize_config(config: &Config, path: &Path) -> PopupTipResult<()> {
    fs::write(path, config_to_string(config)?)?;
    Ok(())
}

fn config_to_string(config: &Config) -> PopupTipResult<String> {
    let yaml_string = serde_yaml::to_string(config)?;
    let mut field_docs = HashMap::new();
    extract_field_documentation(&schema_for!(Config), "", &mut field_docs);

    let mut output = String::new();
    output.push_str("# PopupTip Configuration File\n");
    output.push_str("# Read once when the tip controller is created\n\n");
    output.push_str(&add_comments_to_yaml(&yaml_string, &field_docs));
    output.push('\n');
    Ok(output)
}

fn extract_field_documentation(
    schema: &Schema,
    prefix: &str,
    field_docs: &mut HashMap<String, String>,
) {
    let Some(properties) = schema
        .as_object()
        .and_then(|schema_obj| schema_obj.get("properties"))
        .and_then(|properties| properties.as_object())
    else {
        return;
    };

    for (key, prop_value) in properties {
        let field_path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        let Some(prop_obj) = prop_value.as_object() else {
            continue;
        };

        if let Some(desc_str) = prop_obj.get("description").and_then(|d| d.as_str()) {
            field_docs.insert(field_path.clone(), desc_str.to_string());
        }

        if prop_obj.contains_key("properties") {
            if let Ok(nested_schema) = Schema::try_from(prop_value.clone()) {
                extract_field_documentation(&nested_schema, &field_path, field_docs);
            }
        }
    }
}

fn add_comments_to_yaml(yaml: &str, field_docs: &HashMap<String, String>) -> String {
    let mut result = Vec::new();
    let mut field_path_stack = Vec::new();

    for line in yaml.lines() {
        // Sequence items ("- 255") carry no field name
        if let Some(colon_pos) = line.find(':').filter(|_| !line.trim_start().starts_with('-')) {
            let before_colon = &line[..colon_pos];
            let field_name = before_colon.trim();

            let indent_level = (before_colon.len() - before_colon.trim_start().len()) / 2;
            let indent = "  ".repeat(indent_level);
            field_path_stack.truncate(indent_level);
            field_path_stack.push(field_name.to_string());
            let full_field_path = field_path_stack.join(".");

            let found_doc = field_docs
                .get(&full_field_path)
                .or_else(|| field_docs.get(field_name));

            if let Some(doc) = found_doc {
                if !result.is_empty() {
                    result.push(String::new());
                }
                result.push(format!("{}# {}", indent, doc));
            }
        }

        result.push(line.to_string());
    }

    result.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_precede_fields() {
        let output = config_to_string(&Config::default()).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        let field = lines
            .iter()
            .position(|l| l.starts_with("border_width:"))
            .unwrap();
        assert_eq!(lines[field - 1], "# Width of the line border in pixels (at most 16)");
    }

    #[test]
    fn test_output_round_trips() {
        let config = Config {
            default_duration_ms: 2500,
            foreground: (1, 2, 3),
            ..Config::default()
        };
        let output = config_to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&output).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_skipped_path_not_written() {
        let config = Config {
            config_path: Some("/tmp/popuptip.yaml".into()),
            ..Config::default()
        };
        let output = config_to_string(&config).unwrap();
        assert!(!output.contains("config_path"));
    }
}
