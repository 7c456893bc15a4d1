//! Schema reconciler.
//!
//! Drives a live table to its desired schema:
//!
//! ```text
//! Absent ──create──▶ Creating ──poll──▶ Active
//! Active ──update──▶ Updating(throughput | stream | index) ──poll──▶ Active
//! ```
//!
//! Mutations are applied strictly one at a time. Each is followed by a bounded
//! poll until the store reports the table (or the touched index) converged;
//! the next mutation is only submitted after that.

use std::thread;
use std::time::{Duration, Instant};

use tablewright_schema::DesiredSchema;
use tablewright_store::{
    GlobalIndexDescription, GlobalIndexUpdate, StoreClient, StoreError, TableDescription,
    TableUpdate, UpdateTableRequest,
};

use crate::plan::{self, Mutation};

/// Default interval between convergence polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Default budget for a single convergence wait.
pub const DEFAULT_CONVERGENCE_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Polling settings of a [`Reconciler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilerConfig {
    /// Time between two status checks.
    pub poll_interval: Duration,
    /// Total time allowed for one table or index to converge.
    pub convergence_timeout: Duration,
}

impl ReconcilerConfig {
    pub fn new(poll_interval: Duration, convergence_timeout: Duration) -> Self {
        Self {
            poll_interval,
            convergence_timeout,
        }
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_CONVERGENCE_TIMEOUT)
    }
}

/// Errors from reconciling a table.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// Describing the table failed with something other than "not found".
    #[error("failed to describe table {table}: {source}")]
    Describe {
        table: String,
        #[source]
        source: StoreError,
    },

    /// The store rejected a mutation.
    #[error("failed to {mutation} on table {table}: {source}")]
    Mutation {
        table: String,
        mutation: String,
        #[source]
        source: StoreError,
    },

    /// A table or index did not converge in time.
    #[error("timed out after {waited:?} waiting for {target} of table {table} to become {state}")]
    ConvergenceTimeout {
        table: String,
        target: String,
        state: &'static str,
        waited: Duration,
    },
}

/// Outcome of a successful reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub table_name: String,
    /// The table did not exist and was created.
    pub created: bool,
    /// Every mutation applied, in order.
    pub mutations: Vec<Mutation>,
}

impl ReconcileReport {
    /// True when the table already matched its desired schema.
    pub fn is_noop(&self) -> bool {
        self.mutations.is_empty()
    }
}

/// Applies desired schemas to a store.
///
/// No locking is performed: concurrent reconciliation of the same table by
/// several callers must be serialized by those callers.
#[derive(Debug)]
pub struct Reconciler<S> {
    store: S,
    config: ReconcilerConfig,
}

impl<S: StoreClient> Reconciler<S> {
    pub fn new(store: S, config: ReconcilerConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Converges the table named by `desired` onto `desired`.
    ///
    /// Returns once every planned mutation has been applied and has converged.
    pub fn reconcile(&self, desired: &DesiredSchema) -> Result<ReconcileReport, ReconcileError> {
        let table = desired.table_name.as_str();
        let live = self.describe(table)?;

        match &live {
            Some(live) => tracing::info!(
                table,
                status = ?live.table_status,
                "table exists, checking for schema changes"
            ),
            None => tracing::info!(table, "table does not exist, creating"),
        }

        let mutations = plan::plan(desired, live.as_ref());
        for mutation in &mutations {
            self.apply(desired, mutation)?;
        }

        if mutations.is_empty() {
            tracing::debug!(table, "table already matches desired schema");
        }

        Ok(ReconcileReport {
            table_name: desired.table_name.clone(),
            created: live.is_none(),
            mutations,
        })
    }

    fn describe(&self, table: &str) -> Result<Option<TableDescription>, ReconcileError> {
        match self.store.describe_table(table) {
            Ok(live) => Ok(Some(live)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(source) => {
                tracing::error!(table, error = %source, "describe table failed");
                Err(ReconcileError::Describe {
                    table: table.to_string(),
                    source,
                })
            }
        }
    }

    fn apply(&self, desired: &DesiredSchema, mutation: &Mutation) -> Result<(), ReconcileError> {
        let table = desired.table_name.as_str();
        tracing::info!(table, %mutation, "applying schema change");

        let update = |change: TableUpdate| UpdateTableRequest {
            table_name: desired.table_name.clone(),
            attribute_definitions: desired.attribute_definitions.clone(),
            change,
        };

        let submitted = match mutation {
            Mutation::CreateTable(request) => self.store.create_table(request.clone()),
            Mutation::UpdateThroughput(throughput) => self
                .store
                .update_table(update(TableUpdate::Throughput(*throughput))),
            Mutation::UpdateStream(stream) => {
                self.store.update_table(update(TableUpdate::Stream(*stream)))
            }
            Mutation::GlobalIndex(index_update) => self
                .store
                .update_table(update(TableUpdate::GlobalIndex(index_update.clone()))),
        };
        submitted.map_err(|source| {
            tracing::error!(table, %mutation, error = %source, "schema change rejected");
            ReconcileError::Mutation {
                table: table.to_string(),
                mutation: mutation.to_string(),
                source,
            }
        })?;

        match mutation {
            Mutation::GlobalIndex(index_update) => self.await_index(table, index_update),
            _ => self.await_table_active(table),
        }
    }

    // ========================================================================
    // Convergence waits
    // ========================================================================

    /// Polls until the table reports `ACTIVE`. "Not found" keeps polling.
    fn await_table_active(&self, table: &str) -> Result<(), ReconcileError> {
        self.poll_until(table, "table", "active", |live| {
            live.is_some_and(TableDescription::is_active)
        })
    }

    /// Polls until an index change has converged.
    ///
    /// A created or updated index must report `ACTIVE`; a missing one is still
    /// pending. A deleted index is done once it is gone.
    fn await_index(&self, table: &str, update: &GlobalIndexUpdate) -> Result<(), ReconcileError> {
        let index_name = update.index_name();
        let subject = format!("index {index_name}");

        if let GlobalIndexUpdate::Delete { .. } = update {
            return self.poll_until(table, &subject, "deleted", |live| {
                live.is_some_and(|t| t.global_index(index_name).is_none())
            });
        }

        self.poll_until(table, &subject, "active", |live| {
            live.and_then(|t| t.global_index(index_name))
                .is_some_and(GlobalIndexDescription::is_active)
        })
    }

    fn poll_until(
        &self,
        table: &str,
        subject: &str,
        state: &'static str,
        converged: impl Fn(Option<&TableDescription>) -> bool,
    ) -> Result<(), ReconcileError> {
        let started = Instant::now();
        // A timeout too large to represent never expires.
        let deadline = started.checked_add(self.config.convergence_timeout);
        let mut polls: u64 = 0;

        loop {
            let live = self.describe(table)?;
            polls += 1;
            tracing::trace!(
                table,
                subject,
                status = ?live.as_ref().map(|t| t.table_status),
                polls,
                "polled status"
            );
            if converged(live.as_ref()) {
                tracing::debug!(table, subject, state, polls, elapsed = ?started.elapsed(), "converged");
                return Ok(());
            }

            let now = Instant::now();
            let mut pause = self.config.poll_interval;
            if let Some(deadline) = deadline {
                if now >= deadline {
                    tracing::error!(table, subject, state, polls, "convergence timed out");
                    return Err(ReconcileError::ConvergenceTimeout {
                        table: table.to_string(),
                        target: subject.to_string(),
                        state,
                        waited: now - started,
                    });
                }
                pause = pause.min(deadline - now);
            }
            thread::sleep(pause);
        }
    }
}
