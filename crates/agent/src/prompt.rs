//! Prompt text for the planner, the error analyst and the interviewer.

use recordpilot_core::tool::{DESCRIPTORS, ToolDescriptor};

const PERSONA: &str = "\
You are an expert administrator of a table-oriented IT service management platform.
You know the internal table names (for example sys_user, incident, change_request,
problem, sys_script, sys_script_client, sys_scope). You are careful when creating or
updating records and you always verify table names before acting.";

const INSTRUCTIONS: &str = "\
INSTRUCTIONS:
1. Analyze the request together with the conversation history.
2. If the intent is ambiguous (for example \"create a ticket\" could be an Incident,
   a Change Request, or a Problem), DO NOT GUESS. Ask the operator to clarify and
   list the plausible options.
3. If the request is clear, identify the table and the fields.
4. Use exactly one tool, and only when you are sure which table it targets.
5. When creating a record, generate realistic placeholder values only for required
   fields the operator did not specify. Never change a value the operator supplied.";

const REPLY_CONTRACT: &str = "\
REPLY FORMAT (exactly one of the two shapes, nothing else):

CLARIFY: <your question to the operator>

or

ACTION: <tool name>
ACTION INPUT: <tool argument in the tool's grammar>";

fn render_tool(tool: &ToolDescriptor) -> String {
    format!(
        "- {name}: {description}\n  Input: {grammar}\n  Example: {example}",
        name = tool.name,
        description = tool.description,
        grammar = tool.grammar,
        example = tool.example,
    )
}

/// System message for the intent resolver.
pub fn planner_system_prompt() -> String {
    let tools: Vec<String> = DESCRIPTORS.iter().map(render_tool).collect();
    format!(
        "{PERSONA}\n\nTOOLS (arguments are separated by '|'):\n{}\n\n{INSTRUCTIONS}\n\n{REPLY_CONTRACT}",
        tools.join("\n")
    )
}

/// System message for error-log analysis.
pub fn analysis_system_prompt() -> String {
    format!(
        "{PERSONA}\n\n\
         Answer with exactly these three labelled sections, in this order:\n\
         Meaning: <what the error means in plain English>\n\
         Root Cause: <the likely root cause, e.g. syntax error, missing ACL, null pointer>\n\
         Suggested Fix: <a specific fix or troubleshooting step>"
    )
}

/// User message for error-log analysis.
pub fn analysis_request(error_text: &str) -> String {
    format!("Analyze the following error log entry:\n\"{error_text}\"")
}

const INTERVIEWER: &str = "\
You are a senior architect of a table-oriented IT service management platform and a
strict technical interviewer. You ask scenario-based questions and you grade answers
on technical accuracy about the platform.";

/// System message for interview questions and grading.
pub fn interviewer_system_prompt() -> String {
    INTERVIEWER.to_string()
}

/// User message asking for one question grounded in knowledge articles.
pub fn question_request(topic: &str, articles: &str) -> String {
    format!(
        "Topic: {topic}\n\n\
         Knowledge base articles:\n{articles}\n\n\
         Based on these articles, formulate one challenging interview question about the topic.\n\
         Output ONLY the question."
    )
}

/// User message asking for a verdict on one answer.
pub fn grading_request(topic: &str, question: &str, answer: &str) -> String {
    format!(
        "Topic: {topic}\n\
         Question: {question}\n\
         Candidate Answer: {answer}\n\n\
         Grade the answer on technical accuracy. Answer with exactly these two labelled sections:\n\
         Grade: <PASS or FAIL>\n\
         Feedback: <detailed feedback>"
    )
}
