use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressScope {
    /// Columns of the sheet currently being translated.
    Sheet,
    /// Whole run: sheets finished and columns finished across all sheets.
    Workbook,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    pub scope: ProgressScope,
    pub label: String,
    pub completed: usize,
    pub total: usize,
    /// For sheet scope, the 1-based position of the sheet; for workbook scope, sheets finished.
    pub sheets_done: usize,
    pub sheet_count: usize,
}

impl ProgressSnapshot {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f32 / self.total as f32
        }
    }
}

/// Receives progress snapshots; the rendering surface lives behind this.
pub trait ProgressSink: Send + Sync {
    fn report(&self, snapshot: &ProgressSnapshot);
}

/// Discards everything.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _snapshot: &ProgressSnapshot) {}
}

/// Logs every snapshot at info level.
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn report(&self, snapshot: &ProgressSnapshot) {
        match snapshot.scope {
            ProgressScope::Sheet => info!(
                sheet = %snapshot.label,
                position = snapshot.sheets_done,
                sheets = snapshot.sheet_count,
                columns_done = snapshot.completed,
                columns = snapshot.total,
                "Translating sheet"
            ),
            ProgressScope::Workbook => info!(
                sheets_done = snapshot.sheets_done,
                sheets = snapshot.sheet_count,
                columns_done = snapshot.completed,
                columns = snapshot.total,
                "Overall progress"
            ),
        }
    }
}

/// Keeps every snapshot so a caller can poll or assert on them.
#[derive(Default)]
pub struct RecordingProgress {
    snapshots: Mutex<Vec<ProgressSnapshot>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<ProgressSnapshot> {
        self.snapshots
            .lock()
            .map(|s| s.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }

    pub fn latest(&self, scope: ProgressScope) -> Option<ProgressSnapshot> {
        self.snapshots()
            .into_iter()
            .rev()
            .find(|s| s.scope == scope)
    }

    pub fn clear(&self) {
        match self.snapshots.lock() {
            Ok(mut s) => s.clear(),
            Err(e) => e.into_inner().clear(),
        }
    }
}

impl ProgressSink for RecordingProgress {
    fn report(&self, snapshot: &ProgressSnapshot) {
        match self.snapshots.lock() {
            Ok(mut s) => s.push(snapshot.clone()),
            Err(e) => e.into_inner().push(snapshot.clone()),
        }
    }
}

/// Forwards to several sinks in order.
pub struct FanOut(pub Vec<Arc<dyn ProgressSink>>);

impl ProgressSink for FanOut {
    fn report(&self, snapshot: &ProgressSnapshot) {
        for sink in &self.0 {
            sink.report(snapshot);
        }
    }
}

/// A monotonic `completed / total` counter that reports each change to its sink.
pub struct ProgressCounter {
    scope: ProgressScope,
    label: String,
    total: usize,
    completed: usize,
    sheets_done: usize,
    sheet_count: usize,
    sink: Arc<dyn ProgressSink>,
}

impl ProgressCounter {
    pub fn new(
        scope: ProgressScope,
        label: impl Into<String>,
        total: usize,
        sink: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            scope,
            label: label.into(),
            total,
            completed: 0,
            sheets_done: 0,
            sheet_count: 0,
            sink,
        }
    }

    pub fn with_sheets(mut self, sheets_done: usize, sheet_count: usize) -> Self {
        self.sheets_done = sheets_done;
        self.sheet_count = sheet_count;
        self
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            scope: self.scope,
            label: self.label.clone(),
            completed: self.completed,
            total: self.total,
            sheets_done: self.sheets_done,
            sheet_count: self.sheet_count,
        }
    }

    pub fn report(&self) {
        self.sink.report(&self.snapshot());
    }

    /// Saturates at `total`.
    pub fn advance(&mut self, n: usize) -> usize {
        self.completed = self.completed.saturating_add(n).min(self.total);
        self.report();
        self.completed
    }

    /// Mark one more sheet finished and add its columns.
    pub fn finish_sheet(&mut self, columns: usize) -> usize {
        self.sheets_done += 1;
        self.advance(columns)
    }
}
