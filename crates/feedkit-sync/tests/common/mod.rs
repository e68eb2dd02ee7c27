//! Shared test fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use feedkit_core::{
    CatalogEntry, CatalogKind, ResetError, ResolveError, ResolveRequest, ResolveResponse,
    SelectionState, ShareError,
};
use feedkit_settings::{MemoryStore, SyncSettings};
use feedkit_sync::{CalculatorBackend, ShareRequest, SyncEngine};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Scriptable calculation service
pub struct MockBackend {
    multiplier: Mutex<f64>,
    failures: Mutex<VecDeque<ResolveError>>,
    gate: Mutex<Option<Arc<Notify>>>,
    calls: AtomicUsize,
    pub requests: Mutex<Vec<ResolveRequest>>,
    pub shares: Mutex<Vec<(String, ShareRequest)>>,
    pub share_failure: Mutex<Option<ShareError>>,
    pub resets: AtomicUsize,
    pub reset_failure: Mutex<Option<ResetError>>,
    pub catalog_available: Mutex<bool>,
}

impl MockBackend {
    pub fn new(multiplier: f64) -> Arc<Self> {
        Arc::new(Self {
            multiplier: Mutex::new(multiplier),
            failures: Mutex::new(VecDeque::new()),
            gate: Mutex::new(None),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            shares: Mutex::new(Vec::new()),
            share_failure: Mutex::new(None),
            resets: AtomicUsize::new(0),
            reset_failure: Mutex::new(None),
            catalog_available: Mutex::new(true),
        })
    }

    pub fn set_multiplier(&self, multiplier: f64) {
        *self.multiplier.lock() = multiplier;
    }

    pub fn fail_next(&self, error: ResolveError) {
        self.failures.lock().push_back(error);
    }

    /// Hold every calculation until the returned handle is notified
    pub fn hold(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock() = Some(gate.clone());
        gate
    }

    pub fn release(&self) {
        *self.gate.lock() = None;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CalculatorBackend for MockBackend {
    async fn calculate(&self, request: &ResolveRequest) -> Result<ResolveResponse, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if let Some(error) = self.failures.lock().pop_front() {
            return Err(error);
        }

        Ok(ResolveResponse {
            rpm: Some(18000.0),
            feed: Some(100.0),
            depth_of_cut: Some(3.0),
            stepover: Some(2.5),
            plunge: None,
            multiplier: *self.multiplier.lock(),
            warning: None,
        })
    }

    async fn catalog(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, ResolveError> {
        if !*self.catalog_available.lock() {
            return Err(ResolveError::Network {
                message: "offline".to_string(),
            });
        }
        let name = match kind {
            CatalogKind::Machines => "Shapeoko",
            CatalogKind::Spindles => "Makita",
            CatalogKind::Materials => "Oak",
            CatalogKind::Bits => "1/4 Endmill",
        };
        Ok(vec![
            CatalogEntry {
                id: "1".to_string(),
                name: name.to_string(),
            },
            CatalogEntry {
                id: "2".to_string(),
                name: format!("Other {}", name),
            },
        ])
    }

    async fn share_settings(
        &self,
        auth_token: &str,
        request: &ShareRequest,
    ) -> Result<(), ShareError> {
        if let Some(error) = self.share_failure.lock().clone() {
            return Err(error);
        }
        self.shares
            .lock()
            .push((auth_token.to_string(), request.clone()));
        Ok(())
    }

    async fn reset_preference(&self, _auth_token: &str) -> Result<(), ResetError> {
        if let Some(error) = self.reset_failure.lock().clone() {
            return Err(error);
        }
        self.resets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn abcd() -> SelectionState {
    SelectionState::new("A", "B", "D", "C").remembered(true)
}

pub fn fast_settings() -> SyncSettings {
    SyncSettings {
        poll_interval_ms: 20,
        event_history: true,
    }
}

pub fn engine(store: Arc<MemoryStore>, backend: Arc<MockBackend>) -> SyncEngine {
    SyncEngine::new(store, backend, &fast_settings())
}

/// Wait until `check` holds, polling the runtime
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    check()
}
