//! Reconciliation planning.
//!
//! [`plan`] compares a desired schema with the live table and lists the
//! mutations that converge one onto the other. It performs no I/O; the
//! [`Reconciler`](crate::Reconciler) applies the plan step by step.

use std::fmt::{self, Display};

use serde::Serialize;
use tablewright_schema::DesiredSchema;
use tablewright_store::{CreateTableRequest, GlobalIndexUpdate, TableDescription};
use tablewright_types::{ProvisionedThroughput, StreamSpecification, StreamViewType};

/// One convergence step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Mutation {
    /// Create the table with every index.
    CreateTable(CreateTableRequest),
    /// Change the table's throughput.
    UpdateThroughput(ProvisionedThroughput),
    /// Change the table's stream settings.
    UpdateStream(StreamSpecification),
    /// Create, re-provision or delete one global index.
    GlobalIndex(GlobalIndexUpdate),
}

impl Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateTable(request) => write!(f, "create table {}", request.table_name),
            Self::UpdateThroughput(throughput) => write!(f, "update throughput to {throughput}"),
            Self::UpdateStream(stream) => match effective_stream(Some(stream)) {
                Some(view_type) => write!(f, "enable stream ({view_type:?})"),
                None => write!(f, "disable stream"),
            },
            Self::GlobalIndex(GlobalIndexUpdate::Create(index)) => {
                write!(f, "create global index {}", index.index_name)
            }
            Self::GlobalIndex(GlobalIndexUpdate::Update {
                index_name,
                provisioned_throughput,
            }) => write!(
                f,
                "update global index {index_name} throughput to {provisioned_throughput}"
            ),
            Self::GlobalIndex(GlobalIndexUpdate::Delete { index_name }) => {
                write!(f, "delete global index {index_name}")
            }
        }
    }
}

/// Builds the create request for a table that does not exist yet.
pub fn create_table_request(desired: &DesiredSchema) -> CreateTableRequest {
    CreateTableRequest {
        table_name: desired.table_name.clone(),
        attribute_definitions: desired.attribute_definitions.clone(),
        key_schema: desired.key_schema.clone(),
        provisioned_throughput: desired.provisioned_throughput,
        global_secondary_indexes: desired.global_indexes.clone(),
        local_secondary_indexes: desired.local_indexes.clone(),
        stream_specification: desired.stream_specification,
    }
}

/// Lists the mutations converging `live` onto `desired`, in application order.
///
/// `None` for `live` means the table does not exist. For an existing table the
/// order is throughput, then stream, then index actions: live indexes in live
/// order (update or delete), followed by creates in desired order. Local
/// indexes and structural differences of an existing global index are never
/// planned.
pub fn plan(desired: &DesiredSchema, live: Option<&TableDescription>) -> Vec<Mutation> {
    let Some(live) = live else {
        return vec![Mutation::CreateTable(create_table_request(desired))];
    };

    let mut mutations = Vec::new();

    if desired.provisioned_throughput != live.provisioned_throughput {
        mutations.push(Mutation::UpdateThroughput(desired.provisioned_throughput));
    }

    if stream_changed(
        desired.stream_specification.as_ref(),
        live.stream_specification.as_ref(),
    ) {
        mutations.push(Mutation::UpdateStream(
            desired
                .stream_specification
                .unwrap_or_else(StreamSpecification::disabled),
        ));
    }

    mutations.extend(index_changes(desired, live).into_iter().map(Mutation::GlobalIndex));
    mutations
}

fn index_changes(desired: &DesiredSchema, live: &TableDescription) -> Vec<GlobalIndexUpdate> {
    let mut changes = Vec::new();
    let mut matched = vec![false; desired.global_indexes.len()];

    for live_index in &live.global_secondary_indexes {
        let name = live_index.index_name();
        match desired
            .global_indexes
            .iter()
            .position(|d| d.index_name == name)
        {
            Some(position) => {
                matched[position] = true;
                let wanted = desired.global_indexes[position].provisioned_throughput;
                if wanted != live_index.definition.provisioned_throughput {
                    changes.push(GlobalIndexUpdate::Update {
                        index_name: name.to_string(),
                        provisioned_throughput: wanted,
                    });
                }
            }
            None => changes.push(GlobalIndexUpdate::Delete {
                index_name: name.to_string(),
            }),
        }
    }

    changes.extend(
        desired
            .global_indexes
            .iter()
            .zip(matched)
            .filter(|(_, matched)| !matched)
            .map(|(index, _)| GlobalIndexUpdate::Create(index.clone())),
    );
    changes
}

/// True when the effective stream settings differ.
///
/// A disabled stream and an absent one are the same thing.
pub fn stream_changed(
    desired: Option<&StreamSpecification>,
    live: Option<&StreamSpecification>,
) -> bool {
    effective_stream(desired) != effective_stream(live)
}

/// The view type of an enabled stream, `None` when streaming is off.
fn effective_stream(stream: Option<&StreamSpecification>) -> Option<StreamViewType> {
    stream
        .filter(|s| s.stream_enabled)
        .map(|s| s.stream_view_type.unwrap_or_default())
}
