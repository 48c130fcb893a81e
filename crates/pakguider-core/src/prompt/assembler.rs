//! System prompt assembler for PakGuider.
//!
//! Turns retrieved passages and the user's question into the per-turn
//! system message. The output is a pure function of its inputs, so it is
//! rebuilt on every turn and never stored in the conversation.

use pakguider_types::llm::Message;
use pakguider_types::search::PassageRecord;

/// Context text used when the search returned nothing.
pub const NO_RELEVANT_DATA: &str = "No relevant data found.";

const INSTRUCTIONS: &str = "\
You are a tourist guide for Pakistan, named PakGuider. Use the provided context from official Government of Pakistan documents to answer user queries.
If the required information is not in the context, clearly state that.
Always mention the source (file URL) in the response. Don't recommend any sort of
external link that is not in the context.
Below is the context that might help you answer the user's query:";

/// Builds the augmented system prompt.
///
/// Layout:
/// ```text
/// {instructions}
/// <context>
/// {chunk} (Source: {category})
/// ...
/// </context>
/// <question>
/// {query}
/// </question>
/// Answer:
/// ```
pub struct PromptAssembler;

impl PromptAssembler {
    /// One line per passage, joined with `\n`, or [`NO_RELEVANT_DATA`].
    ///
    /// Line breaks inside a chunk are folded into single spaces so each
    /// passage stays on its own line.
    pub fn build_context(passages: &[PassageRecord]) -> String {
        if passages.is_empty() {
            return NO_RELEVANT_DATA.to_string();
        }

        passages
            .iter()
            .map(|p| format!("{} (Source: {})", single_line(&p.chunk), p.category))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The full prompt text for one turn.
    pub fn build(passages: &[PassageRecord], query: &str) -> String {
        let context = Self::build_context(passages);
        format!(
            "{INSTRUCTIONS}\n<context>\n{context}\n</context>\n<question>\n{query}\n</question>\nAnswer:"
        )
    }

    /// The prompt wrapped as a `system` message.
    pub fn build_system_message(passages: &[PassageRecord], query: &str) -> Message {
        Message::system(Self::build(passages, query))
    }
}

fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
