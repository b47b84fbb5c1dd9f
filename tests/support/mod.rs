//! Shared test helpers: stub capabilities and fixture loading
#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use studyai::prelude::*;

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("gemini")
}

pub fn read_fixture(relative: &str) -> String {
    std::fs::read_to_string(fixtures_dir().join(relative)).expect("read fixture text")
}

/// One scripted reply of the stub invoker.
#[derive(Debug, Clone)]
pub enum Scripted {
    Text(String),
    Deltas(Vec<Result<String, StudyError>>),
    Fail(StudyError),
}

/// Model invoker that replays scripted replies and records every call.
#[derive(Default, Clone)]
pub struct StubInvoker {
    replies: Arc<Mutex<VecDeque<Scripted>>>,
    calls: Arc<Mutex<Vec<(Conversation, InvokeOptions)>>>,
}

impl StubInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replying(text: impl Into<String>) -> Self {
        let stub = Self::new();
        stub.push(Scripted::Text(text.into()));
        stub
    }

    pub fn streaming(deltas: Vec<Result<&str, StudyError>>) -> Self {
        let stub = Self::new();
        stub.push(Scripted::Deltas(
            deltas.into_iter().map(|d| d.map(str::to_string)).collect(),
        ));
        stub
    }

    pub fn push(&self, reply: Scripted) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> Vec<(Conversation, InvokeOptions)> {
        self.calls.lock().unwrap().clone()
    }

    fn next(&self, conversation: &Conversation, options: &InvokeOptions) -> Scripted {
        self.calls
            .lock()
            .unwrap()
            .push((conversation.clone(), options.clone()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted reply left")
    }
}

#[async_trait]
impl ModelInvoker for StubInvoker {
    async fn converse(
        &self,
        conversation: &Conversation,
        options: &InvokeOptions,
    ) -> Result<String, StudyError> {
        match self.next(conversation, options) {
            Scripted::Text(text) => Ok(text),
            Scripted::Deltas(deltas) => deltas.into_iter().collect(),
            Scripted::Fail(err) => Err(err),
        }
    }

    async fn converse_stream(
        &self,
        conversation: &Conversation,
        options: &InvokeOptions,
    ) -> Result<TextDeltaStream, StudyError> {
        match self.next(conversation, options) {
            Scripted::Text(text) => Ok(Box::pin(futures::stream::iter(vec![Ok(text)]))),
            Scripted::Deltas(deltas) => Ok(Box::pin(futures::stream::iter(deltas))),
            Scripted::Fail(err) => Err(err),
        }
    }
}

/// Uploader that hands out `stub://{name}` handles and records requests.
#[derive(Default, Clone)]
pub struct StubUploader {
    pub uploaded: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl FileUploader for StubUploader {
    async fn upload(&self, request: UploadRequest) -> Result<FileHandle, StudyError> {
        let name = request.source.file_name();
        let mime = request
            .mime_type
            .clone()
            .or_else(|| studyai::utils::guess_mime_from_path(&name))
            .ok_or_else(|| StudyError::MimeUnresolved(name.clone()))?;
        if let FileSource::Path(path) = &request.source {
            if !path.exists() {
                return Err(StudyError::IoError(format!("{} not found", path.display())));
            }
        }
        self.uploaded.lock().unwrap().push(name.clone());
        Ok(FileHandle::new(format!("stub://{name}"), mime))
    }
}

/// Assistant wired to stubs.
pub fn stub_assistant(invoker: StubInvoker) -> StudyAssistant {
    StudyAssistant::new(Arc::new(StubUploader::default()), Arc::new(invoker))
}
