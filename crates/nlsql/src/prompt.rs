use sqlstore::SchemaDescription;

pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_ROW_LIMIT: u32 = 200;
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
/// Sample rows per table shown to the model.
pub const PROMPT_SAMPLE_ROWS: usize = 3;

pub const SYSTEM_ROLE: &str = "You are an expert SQL query generator.";

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizerConfig {
    /// Embed the store's tables, columns and sample rows in the prompt.
    pub include_schema_context: bool,
    /// Row cap the model is told to apply through LIMIT. `None` leaves it out.
    pub row_limit_hint: Option<u32>,
    /// Tell the model the single table to query (for ungrounded prompts).
    pub fixed_table_name: Option<String>,
    pub model: String,
    pub temperature: f32,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            include_schema_context: true,
            row_limit_hint: Some(DEFAULT_ROW_LIMIT),
            fixed_table_name: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Render the schema block:
///
/// ```text
/// Database Schema:
/// Table: sales_q1
/// Columns: region, units_sold
///
/// Sample data:
/// ('East', 10)
/// ```
pub fn format_schema_context(schema: &SchemaDescription) -> String {
    let mut out = String::from("Database Schema:\n");
    if schema.is_empty() {
        out.push_str("(no tables)\n");
        return out;
    }

    for (table, info) in schema.tables() {
        out.push_str(&format!("Table: {table}\n"));
        out.push_str(&format!("Columns: {}\n\n", info.columns.join(", ")));

        out.push_str("Sample data:\n");
        for row in info.sample_data.iter().take(PROMPT_SAMPLE_ROWS) {
            let values: Vec<String> = row.iter().map(|v| v.sql_literal()).collect();
            out.push_str(&format!("({})\n", values.join(", ")));
        }
        out.push('\n');
    }
    out
}

/// Build the user prompt. Same inputs always give the same text.
pub fn build_prompt(request: &str, schema: Option<&SchemaDescription>, config: &SynthesizerConfig) -> String {
    let context = schema.filter(|_| config.include_schema_context);

    let mut lines: Vec<String> = Vec::new();
    if context.is_some() {
        lines.push(format!(
            "{SYSTEM_ROLE} Given the following database schema and a natural language query, \
             generate a valid SQLite SQL query that answers the question."
        ));
    } else {
        lines.push(format!(
            "{SYSTEM_ROLE} Convert the following natural language request into a valid SQLite SQL query."
        ));
    }
    if let Some(table) = &config.fixed_table_name {
        lines.push(format!("The table is named '{table}'."));
    }
    if let Some(limit) = config.row_limit_hint {
        lines.push(format!(
            "Always apply a LIMIT of {limit} unless the user explicitly specifies a different limit."
        ));
    }
    lines.push(String::new());

    if let Some(schema) = context {
        lines.push(format_schema_context(schema));
    }

    lines.push(format!("Natural language query: \"{request}\""));
    lines.push(String::new());
    lines.push("Respond with ONLY the SQL query, nothing else.".to_string());

    lines.join("\n")
}
