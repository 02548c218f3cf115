use serde_json::Value;
use subscope_core::SuccessEnvelope;
use subscope_core::model::ServiceKnowledge;

use super::format::{Align, Column, key_value_rows, render_table_or_blocks, terminal_width};

const SERVICE_COLUMNS: [Column<'static>; 4] = [
    Column {
        name: "Id",
        align: Align::Left,
    },
    Column {
        name: "Name",
        align: Align::Left,
    },
    Column {
        name: "Category",
        align: Align::Left,
    },
    Column {
        name: "Cancellation",
        align: Align::Left,
    },
];

pub fn render_knowledge_list(success: &SuccessEnvelope) -> String {
    let Ok(services) =
        serde_json::from_value::<Vec<ServiceKnowledge>>(success.data["services"].clone())
    else {
        return "Knowledge data is missing from the response.".to_string();
    };

    let mut lines = vec![
        format!("{} known services:", services.len()),
        String::new(),
    ];

    let rows = services
        .iter()
        .map(|service| {
            vec![
                service.id.clone(),
                service.name.clone(),
                service.category.as_str().to_string(),
                service.cancellation_method.as_str().to_string(),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(render_table_or_blocks(
        &SERVICE_COLUMNS,
        &rows,
        terminal_width(),
        "Service",
    ));

    lines.join("\n")
}

pub fn render_knowledge_lookup(success: &SuccessEnvelope) -> String {
    let query = success.data["query"].as_str().unwrap_or("");

    if success.data["matched"] != Value::Bool(true) {
        return format!("No known service matches \"{query}\".");
    }

    let Ok(service) =
        serde_json::from_value::<ServiceKnowledge>(success.data["service"].clone())
    else {
        return "Knowledge data is missing from the response.".to_string();
    };

    let mut lines = vec![format!("\"{query}\" matches {}:", service.name), String::new()];
    lines.extend(key_value_rows(
        &[
            ("Id:", service.id.clone()),
            ("Category:", service.category.as_str().to_string()),
            ("Cancel at:", service.cancellation_url.clone()),
            (
                "Cancellation:",
                service.cancellation_method.as_str().to_string(),
            ),
        ],
        2,
    ));

    if !service.steps.is_empty() {
        lines.push(String::new());
        lines.push("How to cancel:".to_string());
        for (index, step) in service.steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    if let Some(options) = &service.downgrade_options {
        if !options.is_empty() {
            lines.push(String::new());
            lines.push("Cheaper plans:".to_string());
            for option in options {
                lines.push(format!(
                    "  {} at {} (saves {})",
                    option.name, option.price, option.savings
                ));
            }
        }
    }

    lines.join("\n")
}
