//! # RecordPilot Core
//!
//! Domain types, traits, and error definitions for the RecordPilot operator
//! agent. This crate has **no I/O dependencies**: it defines the model that
//! the adapter, tool, and agent crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is a trait here:
//! - [`Provider`] is the text-completion capability used for intent resolution
//! - [`RecordStore`] is one remote table-oriented record store
//! - [`StoreConnector`] turns a per-request target instance into a store
//!
//! Implementations live in their respective crates, which keeps the planner
//! testable with scripted providers and counting stores.

pub mod error;
pub mod filter;
pub mod message;
pub mod platform;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, PlatformError, ProtocolError, ProviderError, Result, ToolError};
pub use filter::Filter;
pub use message::{ConversationTurn, Message, Role, TurnRole};
pub use platform::{
    CreatedRecord, ListQuery, Record, RecordStore, StoreConnector, UpdatedRecord,
};
pub use provider::{CompletionRequest, CompletionResponse, Provider, Usage};
pub use tool::{ToolDescriptor, ToolInvocation, ToolKind};
