//! In-memory transport that replays a script of replies
//!
//! Replies are consumed in request order across every session the transport
//! opens. Each request is recorded so tests can check what was sent.

#![allow(dead_code)]

use async_trait::async_trait;
use instacore::resolve::transport::{HttpRequest, HttpResponse, HttpSession, Transport};
use instacore::resolve::FetchError;
use instacore::AppResult;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Respond with a status and body
    Status(u16, String),
    /// Fail as a transport-level timeout
    Timeout,
    /// Fail as a connection error
    Network,
    /// Never answer within the request timeout
    Hang,
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Reply::Status(200, body.to_string())
    }

    pub fn status(code: u16) -> Self {
        Reply::Status(code, String::new())
    }
}

#[derive(Default)]
struct Script {
    replies: VecDeque<Reply>,
    requests: Vec<HttpRequest>,
    sessions: usize,
}

#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        let transport = Self::default();
        transport.script.lock().unwrap().replies.extend(replies);
        transport
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.script.lock().unwrap().requests.clone()
    }

    pub fn request_urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    pub fn sessions_opened(&self) -> usize {
        self.script.lock().unwrap().sessions
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().replies.len()
    }
}

impl Transport for ScriptedTransport {
    fn open_session(&self) -> AppResult<Box<dyn HttpSession>> {
        self.script.lock().unwrap().sessions += 1;
        Ok(Box::new(ScriptedSession {
            script: self.script.clone(),
        }))
    }
}

struct ScriptedSession {
    script: Arc<Mutex<Script>>,
}

#[async_trait]
impl HttpSession for ScriptedSession {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let timeout = request.timeout;
        let reply = {
            let mut script = self.script.lock().unwrap();
            script.requests.push(request);
            script.replies.pop_front()
        };

        match reply {
            Some(Reply::Status(status, body)) => Ok(HttpResponse { status, body }),
            Some(Reply::Timeout) => Err(FetchError::Timeout),
            Some(Reply::Network) | None => Err(FetchError::Network("connection refused".to_string())),
            Some(Reply::Hang) => {
                tokio::time::sleep(timeout + Duration::from_secs(60)).await;
                Err(FetchError::Network("hang finished".to_string()))
            }
        }
    }
}
