//! IdM Console Core Library
//!
//! Provides the headless core of the directory-service management console:
//! - Application context and session bootstrap (Context)
//! - Entity registry with feature-gated factories (Registry)
//! - Details facet lifecycle: load, edit, validate, diff, save, reconcile
//! - Adder dialog submission flow
//!
//! This library is platform-independent: widget rendering, routing and
//! dialog chrome are injected through traits, so desktop, web and test
//! shells share the same state machines.

pub mod adder;
pub mod context;
pub mod entity;
pub mod error;
pub mod facet;
pub mod messages;
pub mod metadata;
pub mod traits;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use adder::{AddAction, AddOutcome, AdderDialog};
pub use context::Context;
pub use entity::{Entity, EntityFactory, Registry};
pub use error::{CoreError, CoreResult, RpcError};
pub use facet::{
    DetailsFacet, DetailsSection, DnsZoneFacet, Facet, FacetState, PostUpdateAction, SectionSave,
    UpdateOutcome,
};
pub use messages::Messages;
pub use metadata::{EntityMetadata, MetadataStore, MethodMetadata, ParamMetadata};
pub use traits::{Field, Navigation, StaticNavigation};
pub use utils::OrderedMap;
