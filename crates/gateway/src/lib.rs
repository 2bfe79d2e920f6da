//! Core domain for the actions gateway.
//!
//! The gateway authenticates an inbound request, checks the requested action
//! and its arguments against a fixed registry, and forwards an approved
//! request to GitHub as a single `repository_dispatch` event.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! The outbound call is the [`RepositoryDispatcher`] trait, implemented by the
//! `github` crate; the HTTP surface lives in the `listener` crate.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`RequestId`, `OwnerName`, `RepositoryName`) |
//! | [`credentials`] | Accepted API key set and caller authentication |
//! | [`request`] | Decoding of the dispatch request body |
//! | [`actions`] | The action registry and per-action argument rules |
//! | [`payload`] | Outbound payload and the [`RepositoryDispatcher`] port |
//! | [`config`] | Deployment configuration and presence checks |
//! | [`service`] | The [`DispatchService`] pipeline |
//! | [`errors`] | Error taxonomy and stable error codes |

pub mod actions;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod identifiers;
pub mod payload;
pub mod request;
pub mod service;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use actions::{Action, Args, ENVIRONMENTS};
pub use config::{
    ConfigPresence, CredentialSources, GatewayConfig, UpstreamConfig, UpstreamPresence,
    UpstreamTarget,
};
pub use credentials::{CredentialSet, API_KEY_HEADER};
pub use errors::{DispatchError, ErrorCategory, GatewayError};
pub use identifiers::{OwnerName, RepositoryName, RequestId};
pub use payload::{ClientPayload, DispatchPayload, RepositoryDispatcher, DISPATCH_EVENT_TYPE};
pub use request::IncomingRequest;
pub use service::{DispatchService, Dispatched};
