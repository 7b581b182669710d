#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use remix_core::{EndpointConfig, HttpReply, HttpTransport, RemixError, Result};
use serde_json::Value;

pub const BASE: &str = "http://webhooks.test";

pub fn endpoints() -> EndpointConfig {
    EndpointConfig::with_base(BASE)
}

pub fn url(path: &str) -> String {
    format!("{BASE}/{path}")
}

#[derive(Clone)]
pub enum Scripted {
    Reply(HttpReply),
    Delayed(Duration, HttpReply),
    NetworkError(String),
}

type Responder = Box<dyn Fn(&Value) -> Scripted + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub url: String,
    pub body: Option<Value>,
}

/// In-process transport that answers from a script and records every call.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: HashMap<String, Responder>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, url: impl Into<String>, scripted: Scripted) -> Self {
        self.respond(url, move |_| scripted.clone())
    }

    pub fn json(self, url: impl Into<String>, status: u16, body: Value) -> Self {
        self.on(url, Scripted::Reply(HttpReply::json(status, &body)))
    }

    pub fn respond(
        mut self,
        url: impl Into<String>,
        responder: impl Fn(&Value) -> Scripted + Send + Sync + 'static,
    ) -> Self {
        self.routes.insert(url.into(), Box::new(responder));
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn urls_called(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.url).collect()
    }

    async fn answer(&self, method: &'static str, url: &str, body: Option<&Value>) -> Result<HttpReply> {
        self.calls.lock().unwrap().push(Call {
            method,
            url: url.to_string(),
            body: body.cloned(),
        });

        let scripted = match self.routes.get(url) {
            Some(responder) => responder(body.unwrap_or(&Value::Null)),
            None => Scripted::Reply(HttpReply::new(404, "no route")),
        };

        match scripted {
            Scripted::Reply(reply) => Ok(reply),
            Scripted::Delayed(delay, reply) => {
                tokio::time::sleep(delay).await;
                Ok(reply)
            }
            Scripted::NetworkError(reason) => Err(RemixError::Network { reason }),
        }
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpReply> {
        self.answer("POST", url, Some(body)).await
    }

    async fn fetch(&self, url: &str) -> Result<HttpReply> {
        self.answer("GET", url, None).await
    }
}
