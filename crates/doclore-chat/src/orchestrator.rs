//! The tool-calling chat loop.

use crate::error::{ChatError, ChatResult};
use crate::retrieval::{search_documents, search_tool_definition, RetrievalOptions, SEARCH_TOOL_NAME};
use doclore_db::Database;
use doclore_llm::{ChatMessage, ChatModel, Embedder, ToolCall};
use serde::Deserialize;
use tracing::{debug, info};

/// System prompt for the documentation assistant.
const SYSTEM_PROMPT: &str = "You are a documentation assistant. You answer questions \
about the user's ingested documents, and nothing else.\n\n\
Use the search_documents tool to look up relevant passages before answering. \
After receiving tool results you MUST produce a final text answer; never end \
on a tool call. Cite the source document titles your answer is based on. If \
the retrieved passages do not contain the answer, say so plainly instead of \
guessing.";

/// Chat loop tunables.
#[derive(Debug, Clone)]
pub struct ChatOptions {
    /// Maximum model steps before the loop gives up.
    pub max_steps: usize,
    pub retrieval: RetrievalOptions,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            max_steps: 5,
            retrieval: RetrievalOptions::default(),
        }
    }
}

impl ChatOptions {
    pub fn from_config(config: &doclore_config::RetrievalConfig) -> Self {
        Self {
            max_steps: config.max_steps,
            retrieval: RetrievalOptions::from_config(config),
        }
    }
}

/// A completed answer with loop statistics.
#[derive(Debug, Clone)]
pub struct ChatAnswer {
    pub text: String,
    /// Model steps consumed, including the final one.
    pub steps: usize,
    /// Retrieval tool executions across all steps.
    pub tool_invocations: usize,
}

#[derive(Deserialize)]
struct SearchArguments {
    query: String,
}

/// Drives one question through the bounded tool-calling loop.
///
/// Each step the model either requests the retrieval tool (its output
/// is appended and the model re-invoked) or emits the final text
/// answer. Reaching the step cap without a final answer is a typed
/// failure, not a silent truncation.
pub struct ChatSession<'a> {
    db: &'a Database,
    model: &'a dyn ChatModel,
    embedder: &'a dyn Embedder,
    options: ChatOptions,
}

impl<'a> ChatSession<'a> {
    pub fn new(
        db: &'a Database,
        model: &'a dyn ChatModel,
        embedder: &'a dyn Embedder,
        options: ChatOptions,
    ) -> Self {
        Self {
            db,
            model,
            embedder,
            options,
        }
    }

    /// Answer a question, consulting the document store as the model
    /// sees fit.
    pub async fn answer(&self, question: &str) -> ChatResult<ChatAnswer> {
        let tools = vec![search_tool_definition()];
        let mut messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(question),
        ];
        let mut tool_invocations = 0;

        for step in 1..=self.options.max_steps.max(1) {
            debug!("Chat step {}/{}", step, self.options.max_steps);
            let turn = self.model.complete(&messages, &tools).await?;

            if turn.has_tool_calls() {
                messages.push(ChatMessage::assistant(
                    turn.content.clone(),
                    turn.tool_calls.clone(),
                ));

                for call in &turn.tool_calls {
                    let output = self.execute_tool(call).await?;
                    tool_invocations += 1;
                    messages.push(ChatMessage::tool_result(call.id.clone(), output));
                }
                continue;
            }

            if let Some(text) = turn.text() {
                info!(
                    "Answer after {} step(s), {} tool invocation(s)",
                    step, tool_invocations
                );
                return Ok(ChatAnswer {
                    text: text.to_string(),
                    steps: step,
                    tool_invocations,
                });
            }

            // Neither a tool call nor text violates the contract the
            // loop depends on.
            return Err(ChatError::EmptyResponse);
        }

        Err(ChatError::StepLimitExceeded {
            steps: self.options.max_steps,
        })
    }

    async fn execute_tool(&self, call: &ToolCall) -> ChatResult<String> {
        if call.function.name != SEARCH_TOOL_NAME {
            return Err(ChatError::UnknownTool(call.function.name.clone()));
        }

        let args: SearchArguments = serde_json::from_str(&call.function.arguments)
            .map_err(|e| ChatError::BadToolArguments(e.to_string()))?;

        search_documents(self.db, self.embedder, &self.options.retrieval, &args.query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::EMPTY_STORE_MESSAGE;
    use async_trait::async_trait;
    use doclore_core::{ChunkEmbedding, Document, DocumentKind};
    use doclore_llm::mock::{MockChatModel, MockEmbedder};
    use doclore_llm::{AssistantTurn, FunctionCall, LlmResult, ToolDefinition};
    use std::sync::Mutex;

    fn tool_call_turn(id: &str, query: &str) -> AssistantTurn {
        AssistantTurn {
            content: None,
            tool_calls: vec![ToolCall {
                id: id.to_string(),
                call_type: "function".to_string(),
                function: FunctionCall {
                    name: SEARCH_TOOL_NAME.to_string(),
                    arguments: format!("{{\"query\":\"{}\"}}", query),
                },
            }],
        }
    }

    fn text_turn(text: &str) -> AssistantTurn {
        AssistantTurn {
            content: Some(text.to_string()),
            tool_calls: vec![],
        }
    }

    /// Scripted model that also records every message list it sees.
    struct RecordingChatModel {
        inner: MockChatModel,
        transcripts: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl RecordingChatModel {
        fn with_turns(turns: Vec<AssistantTurn>) -> Self {
            Self {
                inner: MockChatModel::with_turns(turns),
                transcripts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatModel for RecordingChatModel {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            tools: &[ToolDefinition],
        ) -> LlmResult<AssistantTurn> {
            self.transcripts.lock().unwrap().push(messages.to_vec());
            self.inner.complete(messages, tools).await
        }
    }

    fn seed_store(db: &Database, embedder: &MockEmbedder, query: &str, content: &str) {
        let doc = Document::new(DocumentKind::File, "Payments Guide");
        db.create_document(&doc).unwrap();
        db.create_chunk_embeddings(
            &[ChunkEmbedding::new(
                doc.id,
                0,
                content,
                embedder.vector_for(query),
            )],
            "mock-embedder",
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_tool_then_answer() {
        let db = Database::open_in_memory().unwrap();
        let embedder = MockEmbedder::new(8);
        seed_store(&db, &embedder, "refunds", "Refunds settle in 5-10 days.");

        let model = RecordingChatModel::with_turns(vec![
            tool_call_turn("call_1", "refunds"),
            text_turn("Refunds settle in 5-10 days, per the Payments Guide."),
        ]);

        let session = ChatSession::new(&db, &model, &embedder, ChatOptions::default());
        let answer = session.answer("How long do refunds take?").await.unwrap();

        assert_eq!(answer.steps, 2);
        assert_eq!(answer.tool_invocations, 1);
        assert!(answer.text.contains("Payments Guide"));

        // The second model call saw the tool result in context
        let transcripts = model.transcripts.lock().unwrap();
        assert_eq!(transcripts.len(), 2);
        let last = transcripts.last().unwrap();
        let tool_msg = last.iter().find(|m| m.role == "tool").unwrap();
        assert_eq!(tool_msg.tool_call_id.as_deref(), Some("call_1"));
        assert!(tool_msg
            .content
            .as_deref()
            .unwrap()
            .contains("Refunds settle"));
    }

    #[tokio::test]
    async fn test_direct_answer_without_tools() {
        let db = Database::open_in_memory().unwrap();
        let embedder = MockEmbedder::new(8);

        let model = MockChatModel::with_turns(vec![text_turn(
            "I can only help with questions about the ingested documents.",
        )]);

        let session = ChatSession::new(&db, &model, &embedder, ChatOptions::default());
        let answer = session.answer("Hello!").await.unwrap();

        assert_eq!(answer.steps, 1);
        assert_eq!(answer.tool_invocations, 0);
    }

    #[tokio::test]
    async fn test_step_limit_exceeded_is_typed() {
        let db = Database::open_in_memory().unwrap();
        let embedder = MockEmbedder::new(8);

        // The model never stops calling the tool
        let model = MockChatModel::with_turns(
            (0..5)
                .map(|i| tool_call_turn(&format!("call_{}", i), "loop"))
                .collect(),
        );

        let session = ChatSession::new(&db, &model, &embedder, ChatOptions::default());
        let result = session.answer("Anything?").await;

        assert!(matches!(
            result,
            Err(ChatError::StepLimitExceeded { steps: 5 })
        ));
    }

    #[tokio::test]
    async fn test_empty_turn_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        let embedder = MockEmbedder::new(8);

        let model = MockChatModel::with_turns(vec![AssistantTurn {
            content: Some("   ".to_string()),
            tool_calls: vec![],
        }]);

        let session = ChatSession::new(&db, &model, &embedder, ChatOptions::default());
        let result = session.answer("Anything?").await;

        assert!(matches!(result, Err(ChatError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_empty_store_flows_through_as_tool_output() {
        let db = Database::open_in_memory().unwrap();
        let embedder = MockEmbedder::new(8);

        let model = RecordingChatModel::with_turns(vec![
            tool_call_turn("call_1", "anything"),
            text_turn("Please add documents first."),
        ]);

        let session = ChatSession::new(&db, &model, &embedder, ChatOptions::default());
        let answer = session.answer("What do my docs say?").await.unwrap();
        assert_eq!(answer.tool_invocations, 1);

        let transcripts = model.transcripts.lock().unwrap();
        let last = transcripts.last().unwrap();
        let tool_msg = last.iter().find(|m| m.role == "tool").unwrap();
        assert_eq!(tool_msg.content.as_deref(), Some(EMPTY_STORE_MESSAGE));
    }

    #[tokio::test]
    async fn test_unknown_tool_rejected() {
        let db = Database::open_in_memory().unwrap();
        let embedder = MockEmbedder::new(8);

        let model = MockChatModel::with_turns(vec![AssistantTurn {
            content: None,
            tool_calls: vec![ToolCall {
                id: "call_x".to_string(),
                call_type: "function".to_string(),
                function: FunctionCall {
                    name: "delete_everything".to_string(),
                    arguments: "{}".to_string(),
                },
            }],
        }]);

        let session = ChatSession::new(&db, &model, &embedder, ChatOptions::default());
        let result = session.answer("Anything?").await;

        assert!(matches!(result, Err(ChatError::UnknownTool(_))));
    }
}
