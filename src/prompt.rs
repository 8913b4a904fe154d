//! Prompt templates for the security assistant.

/// System prompt sent ahead of every conversation.
pub const SYSTEM_PROMPT: &str = "\
You are a cybersecurity assistant specialized in penetration testing tools and analysis.
For general queries: Provide factual tools and concise CLI commands.
For tool analysis: Analyze outputs and provide structured security insights.
Maintain context of the entire conversation for both tool analysis and general queries.";

/// Prompt used to check that the model answers at all.
pub const HEALTH_PROBE: &str = "Hello, are you working?";

/// Build the five-part assessment request for a command and its output.
pub fn analysis_request(command: &str, output: &str) -> String {
    format!(
        "[Tool Analysis Request]
Tool: {command}
Output: {output}

Provide:
1. Execution Summary
2. Key Findings/Vulnerabilities
3. Implications
4. Next Steps
5. Risk Level (Low/Medium/High)
"
    )
}

/// Build an analysis request for tool output pasted in by the caller.
pub fn tool_output_request(tool_name: &str, tool_output: &str) -> String {
    format!(
        "You are a cybersecurity expert analyzing the results of a penetration testing tool.

Tool Name: {tool_name}

The user has executed the tool manually in a Kali Linux terminal. Below is the raw output from the tool:

---
{tool_output}
---

Based on the output, provide a detailed analysis including:
- A summary of what the tool did
- Any important findings or vulnerabilities
- What these findings mean in practical terms
- Suggested next steps or follow-up tools
- Risk level (Low, Medium, High) if applicable

Be precise, actionable, and technical, but also beginner-friendly if the output is simple.
"
    )
}
