//! Nullable transport — scripted responses, recorded requests.

use async_trait::async_trait;
use siteverify_engine::{FormPoster, ResponseBody, TransportError};
use std::sync::Mutex;

/// What the fake verification service does for one call.
#[derive(Clone, Debug)]
pub enum ScriptedReply {
    /// Answer with this body.
    Body(String),
    /// Fail before a response exists (connection refused, timeout, ...).
    SendFailure(TransportError),
    /// Produce a response whose body cannot be read.
    ReadFailure(TransportError),
}

impl ScriptedReply {
    pub fn body(body: impl Into<String>) -> Self {
        Self::Body(body.into())
    }
}

/// One request the engine sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub fields: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Value of a form field, if it was sent.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A test transport that replays scripted replies instead of calling out.
///
/// Replies are handed out in order and wrap around once exhausted, so a
/// single-reply script answers every call the same way.
pub struct NullTransport {
    replies: Vec<ScriptedReply>,
    index: Mutex<usize>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl NullTransport {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies,
            index: Mutex::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call with the same body.
    pub fn always(body: impl Into<String>) -> Self {
        Self::new(vec![ScriptedReply::body(body)])
    }

    /// Fail every call before a response exists.
    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self::new(vec![ScriptedReply::SendFailure(TransportError::Connect(
            reason.into(),
        ))])
    }

    /// Every call gets a response whose body errors on read.
    pub fn unreadable(reason: impl Into<String>) -> Self {
        Self::new(vec![ScriptedReply::ReadFailure(TransportError::Body(
            reason.into(),
        ))])
    }

    /// All requests "sent" so far (for assertions).
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    fn next_reply(&self) -> Option<ScriptedReply> {
        if self.replies.is_empty() {
            return None;
        }
        let mut idx = self.index.lock().unwrap();
        let current = *idx % self.replies.len();
        *idx += 1;
        Some(self.replies[current].clone())
    }
}

#[async_trait]
impl FormPoster for NullTransport {
    async fn post_form(
        &self,
        url: &str,
        fields: &[(&'static str, String)],
    ) -> Result<Box<dyn ResponseBody>, TransportError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });

        match self.next_reply() {
            Some(ScriptedReply::Body(body)) => Ok(Box::new(ScriptedBody(Ok(body)))),
            Some(ScriptedReply::ReadFailure(e)) => Ok(Box::new(ScriptedBody(Err(e)))),
            Some(ScriptedReply::SendFailure(e)) => Err(e),
            None => Err(TransportError::Request("no scripted reply".into())),
        }
    }
}

struct ScriptedBody(Result<String, TransportError>);

#[async_trait]
impl ResponseBody for ScriptedBody {
    async fn read_all(&mut self) -> Result<String, TransportError> {
        self.0.clone()
    }
}
