use rmcp::model::Tool;
use serde::Serialize;
use tabled::{Table, Tabled};

use crate::cli::error::CliResult;
use crate::cli::utils::{OutputFormat, apply_table_style, truncate_with_ellipsis};

#[derive(Debug, Serialize)]
pub(crate) struct ToolSummary<'a> {
    pub(crate) name: &'a str,
    pub(crate) description: &'a str,
}

#[derive(Tabled)]
pub(crate) struct ToolDisplay {
    #[tabled(rename = "Tool")]
    pub(crate) name: String,
    #[tabled(rename = "Description")]
    pub(crate) description: String,
}

impl From<&ToolSummary<'_>> for ToolDisplay {
    fn from(tool: &ToolSummary<'_>) -> Self {
        // Descriptions span several sentences; the first one is enough here
        let first = tool
            .description
            .split_once(". ")
            .map_or(tool.description, |(head, _)| head);
        Self {
            name: tool.name.to_string(),
            description: truncate_with_ellipsis(first.trim_end_matches('.'), 70),
        }
    }
}

pub fn list_tools(tools: &[Tool], format: &str) -> CliResult<String> {
    let format = OutputFormat::parse(format)?;
    let summaries: Vec<ToolSummary<'_>> = tools
        .iter()
        .map(|tool| ToolSummary {
            name: &tool.name,
            description: tool.description.as_deref().unwrap_or(""),
        })
        .collect();

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Table => {
            if summaries.is_empty() {
                return Ok("No tools registered.".to_string());
            }
            let rows: Vec<ToolDisplay> = summaries.iter().map(ToolDisplay::from).collect();
            let mut table = Table::new(rows);
            apply_table_style(&mut table);
            Ok(table.to_string())
        }
    }
}
