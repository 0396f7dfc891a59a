use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::backend::{csv_row_count, ConflictReport, GenerateRequest, ResetMode, ScheduleBackend};
use crate::error::{Result, ScheduleError};
use crate::matrix::{build_view, MatrixView, Snapshot};

/// Lifecycle of the loaded month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    GeneratingPreview,
    Saving,
    Resetting,
}

/// Caller-facing generator options; year and month come from the loaded selection
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateOptions {
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default)]
    pub seed: Option<u32>,
    #[serde(default)]
    pub fill_hc: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CsvExport {
    pub text: String,
    pub row_count: usize,
}

struct State {
    phase: Phase,
    snapshot: Option<Snapshot>,
    // bumped whenever the snapshot is replaced or edited
    revision: u64,
    last_generate: Option<GenerateRequest>,
    last_error: Option<String>,
    view_cache: Option<(u64, Arc<MatrixView>)>,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the fetch / generate / save / reset lifecycle of one month
///
/// Only one mutating action runs at a time. Every request takes a generation
/// ticket when it starts; a response whose ticket is no longer current is
/// dropped with `Superseded` instead of overwriting newer state.
pub struct ScheduleData {
    backend: Arc<dyn ScheduleBackend>,
    fill_hc_default: bool,
    state: Mutex<State>,
    generation: AtomicU64,
    busy: AtomicBool,
}

impl ScheduleData {
    pub fn new(backend: Arc<dyn ScheduleBackend>, fill_hc_default: bool) -> Self {
        Self {
            backend,
            fill_hc_default,
            state: Mutex::new(State {
                phase: Phase::Idle,
                snapshot: None,
                revision: 0,
                last_generate: None,
                last_error: None,
                view_cache: None,
            }),
            generation: AtomicU64::new(0),
            busy: AtomicBool::new(false),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock leaves plain data behind, keep using it
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn next_ticket(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::Acquire) == ticket
    }

    fn acquire(&self) -> Result<BusyGuard<'_>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ScheduleError::Busy);
        }
        Ok(BusyGuard(&self.busy))
    }

    fn selection(&self) -> Result<(i32, u32)> {
        let state = self.state();
        let selection = state.snapshot.as_ref().map(|s| (s.year, s.month));
        selection.ok_or(ScheduleError::NotLoaded)
    }

    fn set_phase(&self, phase: Phase) {
        self.state().phase = phase;
    }

    // Stale outcomes leave the error and phase of the newer request alone
    fn settle<T>(&self, ticket: u64, result: Result<T>) -> Result<T> {
        if !self.is_current(ticket) {
            return result;
        }
        let mut state = self.state();
        match &result {
            Ok(_) => state.last_error = None,
            Err(ScheduleError::Superseded) => {}
            Err(err) => state.last_error = Some(err.to_string()),
        }
        state.phase = if state.snapshot.is_some() { Phase::Ready } else { Phase::Idle };
        result
    }

    fn stale(&self, what: &str, ticket: u64) -> ScheduleError {
        log::warn!(
            "discarding stale {} response (ticket {}, current {})",
            what,
            ticket,
            self.generation.load(Ordering::Acquire)
        );
        ScheduleError::Superseded
    }

    async fn fetch_snapshot(&self, year: i32, month: u32) -> Result<Snapshot> {
        let backend = &self.backend;
        let (staff, assignments, fixed, off_days, holidays) = tokio::try_join!(
            backend.fetch_staff(),
            backend.fetch_assignments(year, month),
            backend.fetch_fixed(year, month),
            backend.fetch_off_days(year, month),
            backend.fetch_holidays(year, month),
        )?;
        Ok(Snapshot {
            year,
            month,
            staff,
            assignments,
            fixed,
            off_days,
            holidays,
        })
    }

    fn replace_snapshot(&self, snapshot: Snapshot) {
        let mut state = self.state();
        state.snapshot = Some(snapshot);
        state.revision += 1;
        state.last_generate = None;
    }

    /// Selects a month and fetches everything for it
    pub async fn load(&self, year: i32, month: u32) -> Result<()> {
        let ticket = self.next_ticket();
        self.set_phase(Phase::Loading);
        log::info!("loading {}-{:02}", year, month);

        let outcome = self.fetch_snapshot(year, month).await;
        if !self.is_current(ticket) {
            return Err(self.stale("load", ticket));
        }
        let result = outcome.map(|snapshot| self.replace_snapshot(snapshot));
        self.settle(ticket, result)
    }

    /// Previews a generated schedule without persisting it, returning the pinned request
    pub async fn generate(&self, opts: GenerateOptions) -> Result<GenerateRequest> {
        let _busy = self.acquire()?;
        let (year, month) = self.selection()?;

        // Pin the shuffle seed so save replays the same grid
        let seed = match (opts.shuffle, opts.seed) {
            (true, None) => Some(rand::random::<u32>()),
            (_, seed) => seed,
        };
        let request = GenerateRequest {
            year,
            month,
            shuffle: opts.shuffle,
            seed,
            save: false,
            fill_hc: opts.fill_hc.unwrap_or(self.fill_hc_default),
        };

        let ticket = self.next_ticket();
        self.set_phase(Phase::GeneratingPreview);

        let outcome = self.backend.generate(&request).await;
        if !self.is_current(ticket) {
            return Err(self.stale("generate", ticket));
        }
        let result = match outcome {
            Ok(response) if !response.ok => {
                Err(ScheduleError::InvalidResponse("generator reported failure".to_string()))
            }
            Ok(response) => {
                let mut guard = self.state();
                let state = &mut *guard;
                match state.snapshot.as_mut() {
                    Some(snapshot) => {
                        log::info!("preview has {} assignments", response.planned.len());
                        snapshot.assignments = response.planned;
                        state.revision += 1;
                        state.last_generate = Some(request.clone());
                        Ok(request)
                    }
                    None => Err(ScheduleError::NotLoaded),
                }
            }
            Err(err) => Err(err),
        };
        self.settle(ticket, result)
    }

    /// Generates a new shuffled preview with a fresh seed
    pub async fn shuffle(&self) -> Result<GenerateRequest> {
        let fill_hc = self.state().last_generate.as_ref().map(|r| r.fill_hc);
        self.generate(GenerateOptions {
            shuffle: true,
            seed: None,
            fill_hc,
        })
        .await
    }

    /// Persists the previewed schedule by replaying its pinned request
    pub async fn save(&self) -> Result<()> {
        let _busy = self.acquire()?;
        let mut request = self.state().last_generate.clone().ok_or(ScheduleError::NoPreview)?;
        request.save = true;

        let ticket = self.next_ticket();
        self.set_phase(Phase::Saving);

        let outcome = async {
            let response = self.backend.generate(&request).await?;
            if !response.ok {
                return Err(ScheduleError::InvalidResponse("generator reported failure".to_string()));
            }
            self.backend.fetch_assignments(request.year, request.month).await
        }
        .await;

        if !self.is_current(ticket) {
            return Err(self.stale("save", ticket));
        }
        let result = match outcome {
            Ok(persisted) => {
                let mut guard = self.state();
                let state = &mut *guard;
                if let Some(snapshot) = state.snapshot.as_mut() {
                    snapshot.assignments = persisted;
                }
                state.revision += 1;
                state.last_generate = None;
                log::info!("saved {}-{:02}", request.year, request.month);
                Ok(())
            }
            Err(err) => Err(err),
        };
        self.settle(ticket, result)
    }

    /// Clears the month's assignments on the backend, then reloads
    pub async fn reset_soft(&self, confirmed: bool) -> Result<()> {
        self.reset(ResetMode::Soft, confirmed).await
    }

    /// Clears every persisted record of the month, then reloads
    pub async fn reset_hard(&self, confirmed: bool) -> Result<()> {
        self.reset(ResetMode::Hard, confirmed).await
    }

    async fn reset(&self, mode: ResetMode, confirmed: bool) -> Result<()> {
        if !confirmed {
            return Err(ScheduleError::ConfirmationRequired);
        }
        let _busy = self.acquire()?;
        let (year, month) = self.selection()?;

        let ticket = self.next_ticket();
        self.set_phase(Phase::Resetting);

        let outcome = async {
            self.backend.reset(year, month, mode).await?;
            self.fetch_snapshot(year, month).await
        }
        .await;

        if !self.is_current(ticket) {
            return Err(self.stale("reset", ticket));
        }
        let result = outcome.map(|snapshot| self.replace_snapshot(snapshot));
        self.settle(ticket, result)
    }

    /// Server-side conflict check for the loaded month
    pub async fn validate(&self) -> Result<ConflictReport> {
        let (year, month) = self.selection()?;
        let result = self.backend.validate(year, month).await;
        self.record_error(&result);
        result
    }

    /// Server-generated CSV of the loaded month
    pub async fn export_csv(&self) -> Result<CsvExport> {
        let (year, month) = self.selection()?;
        let result = self.backend.export_csv(year, month).await.map(|text| CsvExport {
            row_count: csv_row_count(&text),
            text,
        });
        self.record_error(&result);
        result
    }

    fn record_error<T>(&self, result: &Result<T>) {
        if let Err(err) = result {
            self.state().last_error = Some(err.to_string());
        }
    }

    /// Derived view of the current snapshot, recomputed only when it changed
    pub fn view(&self) -> Result<Arc<MatrixView>> {
        let mut state = self.state();
        if let Some((revision, view)) = &state.view_cache {
            if *revision == state.revision {
                return Ok(Arc::clone(view));
            }
        }
        let view = Arc::new(build_view(state.snapshot.as_ref().ok_or(ScheduleError::NotLoaded)?));
        let revision = state.revision;
        state.view_cache = Some((revision, Arc::clone(&view)));
        Ok(view)
    }

    pub fn phase(&self) -> Phase {
        self.state().phase
    }

    pub fn last_error(&self) -> Option<String> {
        self.state().last_error.clone()
    }

    /// Pinned request of the preview currently on screen
    pub fn pending_preview(&self) -> Option<GenerateRequest> {
        self.state().last_generate.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}
