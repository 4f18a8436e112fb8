// Task prompt constants for the generate flow.
// The system instruction shared by every call lives in llm_client::prompts.

use super::TaskQuestion;

/// Opening prompt for the business flow. Replace `{table_count}` and
/// `{digest}` before sending; the response becomes the shared context every
/// business task builds on.
pub const INITIAL_ANALYSIS_TEMPLATE: &str = "Here is the given dataset with {table_count} tables, \
each table has 1 header row plus up to 5 rows of data sample. \
Please do the tasks as instructed:\n{digest}";

/// Business-flow follow-up questions, asked in this order against the
/// initial analysis.
pub const BUSINESS_TASKS: &[TaskQuestion] = &[
    TaskQuestion {
        task: "Summary",
        instruction: "Give me only the first summary section",
    },
    TaskQuestion {
        task: "Use_Case",
        instruction: "Give me only the suggested use cases section",
    },
    TaskQuestion {
        task: "Data_Description",
        instruction: "Give me only the data description section",
    },
    TaskQuestion {
        task: "PII",
        instruction: "I want to know which attributes contain PII data?",
    },
    TaskQuestion {
        task: "Sensitive_Info",
        instruction: "Which attributes contain personal sensitive information?",
    },
];

/// Technical-flow questions, asked in this order against the uploaded
/// source files.
pub const TECHNICAL_TASKS: &[TaskQuestion] = &[
    TaskQuestion {
        task: "Summary",
        instruction: "Provide a summary of what the given code is doing and the transformations performed in detail",
    },
    TaskQuestion {
        task: "Lineage",
        instruction: "What is the source of the raw data and can you derive basic data lineage with arrows?",
    },
    TaskQuestion {
        task: "Relationship",
        instruction: "Can you please briefly explain how the new calculated fields are derived?",
    },
    TaskQuestion {
        task: "Code",
        instruction: "Write me a code that splits the raw dataset into two new datasets, one with non-sensitive data and the other with all the information?",
    },
    TaskQuestion {
        task: "README",
        instruction: "Generate a README.md for the given code and dataset",
    },
];
