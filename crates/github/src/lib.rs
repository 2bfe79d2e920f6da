//! Actions gateway GitHub infrastructure adapter.
//!
//! Implements the [`gateway::RepositoryDispatcher`] port with [`GithubClient`],
//! which sends the dispatch payload to
//! `POST {api_url}/repos/{owner}/{repo}/dispatches`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. HTTP
//! transport, headers, the call deadline, and the mapping of HTTP outcomes to
//! [`gateway::DispatchError`] live here; the [`gateway`] crate never sees
//! `reqwest` types.
//!
//! ## Outcome Mapping
//!
//! | GitHub outcome | Result |
//! |----------------|--------|
//! | `204 No Content` | `Ok(())` |
//! | any other status | `DispatchError::Rejected { status, body }` |
//! | request could not complete | `DispatchError::Transport` |
//! | deadline elapsed | `DispatchError::Timeout` |

mod client;

pub use client::{
    ClientBuildError, GithubClient, GithubClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT,
    GITHUB_MEDIA_TYPE, USER_AGENT,
};
