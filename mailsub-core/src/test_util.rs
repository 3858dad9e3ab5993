use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{CoreResult, SubscribeError};
use crate::http_client::Transport;
use crate::request::RequestDescriptor;

/// Canned reply of a `StubTransport`.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16, String),
}

/// In-process transport that records every descriptor it is handed.
#[derive(Debug)]
pub struct StubTransport {
    reply: Reply,
    seen: Mutex<Vec<RequestDescriptor>>,
}

impl StubTransport {
    pub fn replying(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn ok(body: Value) -> Arc<Self> {
        Self::replying(Reply::Json(body))
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn take_requests(&self) -> Vec<RequestDescriptor> {
        std::mem::take(&mut *self.seen.lock().unwrap())
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, req: RequestDescriptor) -> CoreResult<Value> {
        self.seen.lock().unwrap().push(req);
        match &self.reply {
            Reply::Json(v) => Ok(v.clone()),
            Reply::Status(status, body) => Err(SubscribeError::RemoteRejection {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}
