//! In-memory fakes for the remote seams, shared by the unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::client::{IamDirectory, RoleSessionProvider};
use crate::error::RemoteError;
use crate::types::{AccessKeyRecord, Page, ScopedSession};

pub(crate) fn key(id: &str, year: i32, month: u32, day: u32) -> AccessKeyRecord {
    AccessKeyRecord::new(id, Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap())
}

fn page_index(marker: Option<&str>) -> usize {
    marker
        .and_then(|m| m.strip_prefix('p'))
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

fn serve<T: Clone>(pages: &[Vec<T>], marker: Option<&str>) -> Page<T> {
    let index = page_index(marker);
    let items = pages.get(index).cloned().unwrap_or_default();
    if index + 1 < pages.len() {
        Page::more(items, format!("p{}", index + 1))
    } else {
        Page::last(items)
    }
}

pub(crate) enum UserScript {
    Pages(Vec<Vec<String>>),
    Fail(String),
}

impl UserScript {
    pub(crate) fn pages(pages: Vec<Vec<&str>>) -> Self {
        UserScript::Pages(
            pages
                .into_iter()
                .map(|p| p.into_iter().map(str::to_string).collect())
                .collect(),
        )
    }
}

pub(crate) enum KeyScript {
    Pages(Vec<Vec<AccessKeyRecord>>),
    Fail(String),
    /// Never answers.
    Hang,
}

#[derive(Default)]
pub(crate) struct CallCounters {
    list_users: AtomicUsize,
    list_access_keys: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl CallCounters {
    pub(crate) fn list_users(&self) -> usize {
        self.list_users.load(Ordering::SeqCst)
    }

    pub(crate) fn list_access_keys(&self) -> usize {
        self.list_access_keys.load(Ordering::SeqCst)
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

/// Scripted [`IamDirectory`]. Users without a key script have no keys.
pub(crate) struct ScriptedDirectory {
    users: UserScript,
    keys: HashMap<String, KeyScript>,
    counters: Arc<CallCounters>,
    latency: Option<Duration>,
}

impl ScriptedDirectory {
    pub(crate) fn new() -> Self {
        Self {
            users: UserScript::Pages(vec![vec![]]),
            keys: HashMap::new(),
            counters: Arc::new(CallCounters::default()),
            latency: None,
        }
    }

    pub(crate) fn users(mut self, users: UserScript) -> Self {
        self.users = users;
        self
    }

    pub(crate) fn keys(mut self, user: &str, script: KeyScript) -> Self {
        self.keys.insert(user.to_string(), script);
        self
    }

    pub(crate) fn latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub(crate) fn counters(&self) -> Arc<CallCounters> {
        Arc::clone(&self.counters)
    }
}

#[async_trait]
impl IamDirectory for ScriptedDirectory {
    async fn list_users(&self, marker: Option<String>) -> Result<Page<String>, RemoteError> {
        self.counters.list_users.fetch_add(1, Ordering::SeqCst);
        match &self.users {
            UserScript::Pages(pages) => Ok(serve(pages, marker.as_deref())),
            UserScript::Fail(msg) => Err(RemoteError::new("ListUsers", msg.clone())),
        }
    }

    async fn list_access_keys(
        &self,
        user_name: &str,
        marker: Option<String>,
    ) -> Result<Page<AccessKeyRecord>, RemoteError> {
        self.counters.list_access_keys.fetch_add(1, Ordering::SeqCst);
        let now = self.counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_in_flight.fetch_max(now, Ordering::SeqCst);

        match self.latency {
            Some(latency) => tokio::time::sleep(latency).await,
            None => tokio::task::yield_now().await,
        }

        let result = match self.keys.get(user_name) {
            None => Ok(Page::last(Vec::new())),
            Some(KeyScript::Pages(pages)) => Ok(serve(pages, marker.as_deref())),
            Some(KeyScript::Fail(msg)) => Err(RemoteError::new("ListAccessKeys", msg.clone())),
            Some(KeyScript::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        };
        self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Scripted [`RoleSessionProvider`] handing out one directory per account.
#[derive(Default)]
pub(crate) struct ScriptedProvider {
    directories: Mutex<HashMap<String, ScriptedDirectory>>,
    denied: HashSet<String>,
    assumed: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn account(self, account_id: &str, directory: ScriptedDirectory) -> Self {
        self.directories
            .lock()
            .unwrap()
            .insert(account_id.to_string(), directory);
        self
    }

    pub(crate) fn deny(mut self, account_id: &str) -> Self {
        self.denied.insert(account_id.to_string());
        self
    }

    pub(crate) fn assumed(&self) -> Vec<String> {
        self.assumed.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoleSessionProvider for ScriptedProvider {
    async fn assume(
        &self,
        account_id: &str,
        role_name: &str,
    ) -> Result<ScopedSession, RemoteError> {
        self.assumed.lock().unwrap().push(account_id.to_string());
        if self.denied.contains(account_id) {
            return Err(RemoteError::new("AssumeRole", "not authorized").with_code("AccessDenied"));
        }
        let directory = self
            .directories
            .lock()
            .unwrap()
            .remove(account_id)
            .unwrap_or_else(ScriptedDirectory::new);
        Ok(ScopedSession::new(account_id, role_name, Box::new(directory)))
    }
}
