use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};

const ANALYZE_INSTRUCTION: &str = "You are a Python programming expert who helps analyze code. \
Give a thorough analysis: find possible bugs and weaknesses, suggest improvements and explain them. \
Always wrap any code in your answer in Markdown Python blocks (```python\n...```).";

const FIX_INSTRUCTION: &str = "You are a Python expert who specializes in fixing code. \
Find and fix the bugs, if there are any, and return only the corrected code. \
If the code is already correct, return it unchanged. \
Always return the code in Markdown Python blocks (```python\n...```) without extra explanations.";

const WRITE_INSTRUCTION: &str = "You are a Python expert who writes clean, efficient and well documented code. \
Always return only code in Markdown Python blocks (```python\n...```), \
with no explanations other than comments inside the code.";

/// A single unit of work for the inference backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRequest {
    pub instruction: String,
    pub user_content: String,
    pub temperature: f64,
}

impl TaskRequest {
    /// Creates a request, rejecting temperatures outside `[0, 1]`.
    pub fn new(
        instruction: impl Into<String>,
        user_content: impl Into<String>,
        temperature: f64,
    ) -> Result<Self> {
        if !temperature.is_finite() || !(0.0..=1.0).contains(&temperature) {
            return Err(CoreError::Validation(format!(
                "temperature must be within [0, 1], got {}",
                temperature
            )));
        }

        Ok(Self {
            instruction: instruction.into(),
            user_content: user_content.into(),
            temperature,
        })
    }

    /// The full prompt sent to the model: instruction, a blank line, then the content.
    pub fn prompt(&self) -> String {
        format!("{}\n\n{}", self.instruction, self.user_content)
    }
}

/// The operations users can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Analyze,
    Fix,
    Write,
}

impl TaskKind {
    pub const ALL: [TaskKind; 3] = [TaskKind::Analyze, TaskKind::Fix, TaskKind::Write];

    /// Command name, without the leading slash.
    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::Analyze => "analyze",
            TaskKind::Fix => "fix",
            TaskKind::Write => "write",
        }
    }

    /// Sampling temperature used for this operation.
    pub fn temperature(&self) -> f64 {
        match self {
            TaskKind::Analyze => 0.7,
            TaskKind::Fix => 0.3,
            TaskKind::Write => 0.8,
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            TaskKind::Analyze => ANALYZE_INSTRUCTION,
            TaskKind::Fix => FIX_INSTRUCTION,
            TaskKind::Write => WRITE_INSTRUCTION,
        }
    }

    /// Wraps the user's argument text into the user half of the prompt.
    pub fn user_prompt(&self, content: &str) -> String {
        match self {
            TaskKind::Analyze => format!(
                "Analyze the following Python code:\n\n```python\n{}\n```",
                content
            ),
            TaskKind::Fix => format!(
                "Fix the following Python code:\n\n```python\n{}\n```",
                content
            ),
            TaskKind::Write => format!(
                "Write Python code that performs the following task: {}.",
                content
            ),
        }
    }

    /// Builds the request for `content`.
    pub fn request(&self, content: &str) -> TaskRequest {
        TaskRequest {
            instruction: self.instruction().to_string(),
            user_content: self.user_prompt(content),
            temperature: self.temperature(),
        }
    }

    /// Heading placed above the model's answer in the final reply.
    pub fn reply_label(&self) -> &'static str {
        match self {
            TaskKind::Analyze => "Analysis result:",
            TaskKind::Fix => "Fixed code:",
            TaskKind::Write => "Generated code:",
        }
    }

    /// Acknowledgment sent while the model is working. Plain text.
    pub fn progress_message(&self) -> &'static str {
        match self {
            TaskKind::Analyze => "Analyzing the code with Ollama, please wait...",
            TaskKind::Fix => "Fixing the code with Ollama, please wait...",
            TaskKind::Write => "Writing the code with Ollama, please wait...",
        }
    }

    /// Usage hint for a call without arguments. Unescaped.
    pub fn usage_message(&self) -> &'static str {
        match self {
            TaskKind::Analyze => {
                "Please provide code to analyze. Example: /analyze print('Hello')"
            }
            TaskKind::Fix => "Please provide code to fix. Example: /fix def foo(x): print(x / 0)",
            TaskKind::Write => {
                "Please describe the task to write code for. Example: /write a function that computes the factorial of a number"
            }
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TaskKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "analyze" => Ok(TaskKind::Analyze),
            "fix" => Ok(TaskKind::Fix),
            "write" => Ok(TaskKind::Write),
            other => Err(CoreError::UnknownCommand(other.to_string())),
        }
    }
}
