//! Prompt templates for the two provider families.

use crate::model::SqlDialect;

/// System + user message pair for chat-completion models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
}

#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    dialect: SqlDialect,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(SqlDialect::Tsql)
    }
}

impl PromptBuilder {
    pub fn new(dialect: SqlDialect) -> Self {
        Self { dialect }
    }

    /// Single instruction-tagged prompt for hosted text-generation models.
    pub fn instruction_prompt(&self, question: &str, schema: &str) -> String {
        let d = self.dialect;
        format!(
            "[INST] <<SYS>>\n\
             You are a helpful assistant specialized in generating SQL queries. \
             Your task is to translate the user's question into {label} code that will run on {engine}. \
             Only respond with SQL code, without any additional text, explanations, or comments.\n\
             <</SYS>>\n\
             Database Schema:\n\
             {schema}\n\n\
             Question: {question}\n\
             Translate the question above into {label} code and provide only the SQL statement.\n\
             [/INST]",
            label = d.label(),
            engine = d.engine(),
            schema = schema.trim_end(),
            question = question.trim(),
        )
    }

    pub fn chat_prompt(&self, question: &str, schema: &str) -> ChatPrompt {
        ChatPrompt {
            system: self.system_message(),
            user: format!(
                "Database Schema:\n{}\n\nQuestion: {}\n\
                 Translate the question above into {} code and provide only the SQL statement. \
                 Put aliases on table fields to avoid ambiguities.",
                schema.trim_end(),
                question.trim(),
                self.dialect.label()
            ),
        }
    }

    fn system_message(&self) -> String {
        let d = self.dialect;
        let mut rules = vec![
            format!(
                "You are an expert in {}. Your task is to translate the user's question into {} code that will run on {}.",
                d.label(),
                d.label(),
                d.engine()
            ),
            "Put aliases on table fields to avoid ambiguities: every field in the select clause must have an alias.".to_string(),
            format!(
                "All date fields must be formatted as dd/mm/yyyy, for example {}.",
                d.date_format_hint()
            ),
        ];
        if d.supports_procedures() {
            rules.push(
                "To execute a stored procedure, declare a variable for each parameter with the value given by the user, then call the procedure."
                    .to_string(),
            );
        }
        rules.push(format!(
            "Only respond with {} code, without any additional text, explanations, or comments.",
            d.label()
        ));
        rules.join("\n")
    }
}

/// Instruction-tagged prompt for the default (TSQL) dialect.
pub fn build_prompt(question: &str, schema: &str) -> String {
    PromptBuilder::default().instruction_prompt(question, schema)
}
