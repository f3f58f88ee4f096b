//! In-memory store and mailer that record what the server asked of them.

use async_trait::async_trait;
use birdland_query::{ResultRow, Statement};
use birdland_search::{
    db::{CatalogSession, CatalogStore},
    error::QueryStage,
    services::{ContactMessage, Mailer},
    Error, Result,
};
use std::sync::{Arc, Mutex};

/// Canned store behavior for one test.
#[derive(Debug, Clone, Default)]
pub struct StoreScript {
    pub rows: Vec<ResultRow>,
    pub count: i64,
    pub connect_error: Option<String>,
    pub rows_error: Option<String>,
    pub count_error: Option<String>,
}

impl StoreScript {
    pub fn rows(rows: &[&[&str]], count: i64) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|v| Some(v.to_string())).collect())
                .collect(),
            count,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Executed {
    Rows(QueryStage, Statement),
    Count(Statement),
}

#[derive(Clone)]
pub struct FakeCatalogStore {
    script: Arc<StoreScript>,
    executed: Arc<Mutex<Vec<Executed>>>,
    sessions: Arc<Mutex<usize>>,
}

impl FakeCatalogStore {
    pub fn new(script: StoreScript) -> Self {
        Self {
            script: Arc::new(script),
            executed: Arc::default(),
            sessions: Arc::default(),
        }
    }

    pub fn executed(&self) -> Vec<Executed> {
        self.executed.lock().unwrap().clone()
    }

    pub fn sessions_opened(&self) -> usize {
        *self.sessions.lock().unwrap()
    }
}

#[async_trait]
impl CatalogStore for FakeCatalogStore {
    async fn session(&self) -> Result<Box<dyn CatalogSession>> {
        *self.sessions.lock().unwrap() += 1;
        if let Some(message) = &self.script.connect_error {
            return Err(Error::StoreConnection(message.clone()));
        }
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl CatalogSession for FakeCatalogStore {
    async fn fetch_rows(
        &mut self,
        stage: QueryStage,
        statement: &Statement,
    ) -> Result<Vec<ResultRow>> {
        self.executed
            .lock()
            .unwrap()
            .push(Executed::Rows(stage, statement.clone()));
        match &self.script.rows_error {
            Some(message) => Err(Error::QueryExecution {
                stage,
                message: message.clone(),
                statement: statement.clone(),
            }),
            None => Ok(self.script.rows.clone()),
        }
    }

    async fn fetch_count(&mut self, statement: &Statement) -> Result<i64> {
        self.executed
            .lock()
            .unwrap()
            .push(Executed::Count(statement.clone()));
        match &self.script.count_error {
            Some(message) => Err(Error::QueryExecution {
                stage: QueryStage::Count,
                message: message.clone(),
                statement: statement.clone(),
            }),
            None => Ok(self.script.count),
        }
    }
}

#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<ContactMessage>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl RecordingMailer {
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn sent(&self) -> Vec<ContactMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &ContactMessage) -> std::result::Result<(), String> {
        if let Some(failure) = self.failure.lock().unwrap().clone() {
            return Err(failure);
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
