//! Task Question Set — the fixed follow-up instructions for each view, and
//! the prompt composition that pairs them with their shared context. Data,
//! not logic: tasks are independent of each other beyond the shared prefix.

pub mod handlers;
pub mod prompts;

use serde::{Deserialize, Serialize};

use crate::dataset::models::SourceFile;

/// One canned follow-up: a short identifier and its instruction fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskQuestion {
    pub task: &'static str,
    pub instruction: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Business,
    Technical,
}

pub fn questions_for(view: ViewKind) -> &'static [TaskQuestion] {
    match view {
        ViewKind::Business => prompts::BUSINESS_TASKS,
        ViewKind::Technical => prompts::TECHNICAL_TASKS,
    }
}

/// User prompt for the initial dataset analysis.
pub fn initial_analysis_prompt(table_count: usize, digest: &str) -> String {
    prompts::INITIAL_ANALYSIS_TEMPLATE
        .replace("{table_count}", &table_count.to_string())
        .replace("{digest}", digest)
}

/// Business tasks build on the initial analysis response.
pub fn business_prompt(initial_analysis: &str, instruction: &str) -> String {
    format!("{initial_analysis}\n{instruction}")
}

/// Technical tasks build on the uploaded source files, each rendered as
/// "name contents".
pub fn technical_prompt(sources: &[SourceFile], instruction: &str) -> String {
    let mut lines: Vec<String> = sources
        .iter()
        .map(|s| format!("{} {}", s.name, s.contents))
        .collect();
    lines.push(instruction.to_string());
    lines.join("\n")
}
