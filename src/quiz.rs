//! Quiz and evaluation protocol
//!
//! Prompt construction and result parsing for summaries, quiz generation and
//! grading, plus the [`StudyAssistant`] facade that ties an uploader, a model
//! invoker and a structured extractor together.
//!
//! Every protocol call is stateless: it builds one synthetic user turn and
//! makes exactly one model call.

use std::sync::Arc;

use serde_json::Value;

use crate::error::StudyError;
use crate::extract::{BracketScanExtractor, StructuredExtractor};
use crate::providers::gemini::GeminiClient;
use crate::streaming::{self, CumulativeStream};
use crate::traits::{FileUploader, ModelInvoker};
use crate::types::{
    AnswerEvaluation, AnswerRecord, Conversation, Evaluation, FileHandle, InvokeOptions,
    QuizItem, UploadRequest,
};

/// Word ceiling used when the caller does not pick one.
pub const DEFAULT_SUMMARY_WORDS: usize = 100;
/// Quiz size used when the caller does not pick one.
pub const DEFAULT_QUIZ_QUESTIONS: usize = 2;

pub fn summary_prompt(max_words: usize) -> String {
    format!("Summarise each entire document (not individual pages) in less than {max_words} words")
}

pub fn quiz_prompt(num_questions: usize) -> String {
    format!(
        "Based on the content of these files, generate {num_questions} quiz questions. \
         Format the output as a JSON array of objects, each containing 'question' and 'answer' fields. \
         The 'answer' field should contain your model answer. \
         Include enough detail in your model answer that it can be used later to evaluate \
         a user answer given to the question for correctness."
    )
}

pub fn evaluate_answer_prompt(question: &str, reference: &str, user_answer: &str) -> String {
    format!(
        "Question: {question}\n\
         Correct Answer: {reference}\n\
         User's Answer: {user_answer}\n\n\
         Evaluate the user's answer. Consider:\n\
         1. Is the answer correct?\n\
         2. If not fully correct, what parts are right or wrong?\n\
         3. Provide a brief explanation.\n\n\
         Return your evaluation as a JSON object with the following structure:\n\
         {{\"isCorrect\": boolean, \"score\": number (0-1), \"explanation\": string}}"
    )
}

pub fn evaluate_all_prompt(records: &[AnswerRecord]) -> String {
    let mut prompt = String::from(
        "Evaluate the following quiz answers. For each answer, provide:\n\
         1. Whether it's correct (true/false)\n\
         2. A percent accuracy score (0-100%)\n\
         3. A brief explanation\n\n\
         Questions and Answers:\n",
    );
    for (i, record) in records.iter().enumerate() {
        prompt.push_str(&format!(
            "\n{}. Question: {}\n   Correct Answer: {}\n   User's Answer: {}\n",
            i + 1,
            record.question,
            record.answer,
            record.user_answer
        ));
    }
    prompt.push_str(
        "\nReturn your evaluation as a JSON array of objects, one per question, \
         in the SAME ORDER as the questions above, each containing:\n\
         {\"questionNumber\": number, \"isCorrect\": boolean, \"score\": number, \"explanation\": string}",
    );
    prompt
}

/// Study workflows on top of an uploader and a model invoker.
#[derive(Clone)]
pub struct StudyAssistant {
    uploader: Arc<dyn FileUploader>,
    invoker: Arc<dyn ModelInvoker>,
    extractor: Arc<dyn StructuredExtractor>,
}

impl std::fmt::Debug for StudyAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudyAssistant").finish_non_exhaustive()
    }
}

impl StudyAssistant {
    /// Assistant using the bracket-scan extractor.
    pub fn new(uploader: Arc<dyn FileUploader>, invoker: Arc<dyn ModelInvoker>) -> Self {
        Self {
            uploader,
            invoker,
            extractor: Arc::new(BracketScanExtractor),
        }
    }

    /// Assistant backed by one Gemini client for both uploads and calls.
    pub fn gemini(client: GeminiClient) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client)
    }

    /// Replace the structured extractor.
    pub fn with_extractor(mut self, extractor: Arc<dyn StructuredExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub async fn upload(&self, request: UploadRequest) -> Result<FileHandle, StudyError> {
        self.uploader.upload(request).await
    }

    /// One result per request, in request order.
    pub async fn upload_all(
        &self,
        requests: Vec<UploadRequest>,
    ) -> Vec<Result<FileHandle, StudyError>> {
        self.uploader.upload_all(requests).await
    }

    pub async fn chat(&self, conversation: &Conversation) -> Result<String, StudyError> {
        self.invoker
            .converse(conversation, &InvokeOptions::default())
            .await
    }

    /// Cumulative updates for a streamed reply.
    pub async fn chat_stream(
        &self,
        conversation: &Conversation,
    ) -> Result<CumulativeStream, StudyError> {
        let deltas = self
            .invoker
            .converse_stream(conversation, &InvokeOptions::default())
            .await?;
        Ok(streaming::cumulative(deltas))
    }

    /// Stream a reply, calling `on_chunk` with the cumulative text after each
    /// increment, and return the final text.
    pub async fn chat_stream_with<F>(
        &self,
        conversation: &Conversation,
        on_chunk: F,
    ) -> Result<String, StudyError>
    where
        F: FnMut(&str) -> Result<(), StudyError> + Send,
    {
        let stream = self.chat_stream(conversation).await?;
        streaming::drive(stream, on_chunk).await
    }

    /// Free-text summary; the word ceiling is left to the model.
    #[tracing::instrument(skip_all, fields(files = handles.len(), max_words = max_words))]
    pub async fn summarise_files(
        &self,
        handles: &[FileHandle],
        max_words: usize,
    ) -> Result<String, StudyError> {
        let conversation = Conversation::prompt(summary_prompt(max_words), handles);
        self.chat(&conversation).await
    }

    #[tracing::instrument(skip_all, fields(files = handles.len(), num_questions = num_questions))]
    pub async fn generate_quiz(
        &self,
        handles: &[FileHandle],
        num_questions: usize,
    ) -> Result<Vec<QuizItem>, StudyError> {
        if num_questions == 0 {
            return Err(StudyError::InvalidInput(
                "Number of questions must be at least 1".to_string(),
            ));
        }

        let conversation = Conversation::prompt(quiz_prompt(num_questions), handles);
        let raw = self.chat(&conversation).await?;
        let items = quiz_items_from(self.extractor.extract_array(&raw)?)?;
        if items.len() != num_questions {
            tracing::debug!(requested = num_questions, received = items.len(), "quiz size differs from request");
        }
        Ok(items)
    }

    /// Grade one answer. The reply is parsed as a JSON object directly.
    pub async fn evaluate_answer(
        &self,
        question: &str,
        reference_answer: &str,
        user_answer: &str,
    ) -> Result<AnswerEvaluation, StudyError> {
        let conversation = Conversation::prompt(
            evaluate_answer_prompt(question, reference_answer, user_answer),
            &[],
        );
        let raw = self
            .invoker
            .converse(&conversation, &InvokeOptions::json())
            .await?;
        Ok(serde_json::from_str(raw.trim())?)
    }

    /// Grade a batch with one model call. Result `i` belongs to record `i`.
    #[tracing::instrument(skip_all, fields(records = records.len()))]
    pub async fn evaluate_all_answers(
        &self,
        records: &[AnswerRecord],
    ) -> Result<Vec<Evaluation>, StudyError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let conversation = Conversation::prompt(evaluate_all_prompt(records), &[]);
        let raw = self
            .invoker
            .converse(&conversation, &InvokeOptions::json())
            .await?;
        let evaluations: Vec<Evaluation> =
            serde_json::from_value(self.extractor.extract_array(&raw)?)?;

        if evaluations.len() != records.len() {
            tracing::warn!(
                expected = records.len(),
                received = evaluations.len(),
                "evaluation count does not match submitted answers"
            );
        }
        Ok(evaluations)
    }
}

fn quiz_items_from(value: Value) -> Result<Vec<QuizItem>, StudyError> {
    let Value::Array(elements) = value else {
        return Err(StudyError::ParseError("expected a JSON array of quiz items".to_string()));
    };
    Ok(elements.into_iter().map(QuizItem::from).collect())
}
