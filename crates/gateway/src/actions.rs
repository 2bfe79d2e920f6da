//! The fixed action registry and per-action argument rules.
//!
//! The registry is a closed enum: adding an action means adding a variant,
//! its name, its label, and its rule. Lookup by name is the only string
//! comparison; everything downstream works on [`Action`].
//!
//! | Action | Required `args` |
//! |--------|-----------------|
//! | `deploy` | `env` ∈ {dev, staging, prod}, `version`: string |
//! | `rollback` | `env` ∈ {dev, staging, prod}, `to`: string |
//! | `scan` | none |
//! | `report` | none |
//! | `ping` | none (end-to-end connectivity check) |

use serde_json::{Map, Value};

use crate::errors::GatewayError;

/// Argument object of a dispatch request.
pub type Args = Map<String, Value>;

/// Deployment environments accepted by `deploy` and `rollback`.
pub const ENVIRONMENTS: [&str; 3] = ["dev", "staging", "prod"];

/// An action a caller may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Deploy,
    Rollback,
    Scan,
    Report,
    Ping,
}

impl Action {
    /// Every registered action, in the order reported to callers.
    pub const ALL: [Action; 5] = [
        Action::Deploy,
        Action::Rollback,
        Action::Scan,
        Action::Report,
        Action::Ping,
    ];

    /// Looks up an action by its exact wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    /// Wire name, as sent in `action` and echoed in `client_payload.action`.
    pub fn name(self) -> &'static str {
        match self {
            Action::Deploy => "deploy",
            Action::Rollback => "rollback",
            Action::Scan => "scan",
            Action::Report => "report",
            Action::Ping => "ping",
        }
    }

    /// Descriptive label for the downstream workflow run, used in logs.
    ///
    /// The outbound `event_type` is the fixed [`crate::DISPATCH_EVENT_TYPE`]
    /// for every action; the workflow branches on `client_payload.action`.
    pub fn label(self) -> &'static str {
        match self {
            Action::Deploy => "deploy-release",
            Action::Rollback => "rollback-release",
            Action::Scan => "security-scan",
            Action::Report => "status-report",
            Action::Ping => "connectivity-check",
        }
    }

    /// Names of every registered action.
    pub fn allowed_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|a| a.name()).collect()
    }

    /// Resolves a requested action name against the registry.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ActionNotAllowed`] listing every registered
    /// name when `name` is not one of them.
    pub fn resolve(name: &str) -> Result<Self, GatewayError> {
        Self::from_name(name).ok_or_else(|| GatewayError::ActionNotAllowed {
            action: name.to_owned(),
            allowed: Self::allowed_names(),
        })
    }

    /// Runs this action's argument rule.
    ///
    /// Returns the human-readable reason on failure, `None` when accepted.
    pub fn check_args(self, args: &Args) -> Option<&'static str> {
        match self {
            Action::Deploy => check_env(args)
                .or_else(|| require_string(args, "version", "version must be string")),
            Action::Rollback => {
                check_env(args).or_else(|| require_string(args, "to", "to must be string"))
            }
            Action::Scan | Action::Report | Action::Ping => None,
        }
    }

    /// Runs this action's argument rule, as a [`Result`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ArgsNotValid`] carrying the rule's reason.
    pub fn validate(self, args: &Args) -> Result<(), GatewayError> {
        match self.check_args(args) {
            Some(reason) => Err(GatewayError::ArgsNotValid {
                detail: reason.to_owned(),
            }),
            None => Ok(()),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn check_env(args: &Args) -> Option<&'static str> {
    match args.get("env").and_then(Value::as_str) {
        Some(env) if ENVIRONMENTS.contains(&env) => None,
        _ => Some("env must be dev|staging|prod"),
    }
}

fn require_string(args: &Args, field: &str, reason: &'static str) -> Option<&'static str> {
    if args.get(field).is_some_and(Value::is_string) {
        None
    } else {
        Some(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Args {
        match value {
            Value::Object(map) => map,
            other => panic!("test args must be an object, got {other}"),
        }
    }

    #[test]
    fn every_name_round_trips_through_lookup() {
        for action in Action::ALL {
            assert_eq!(Action::from_name(action.name()), Some(action));
        }
    }

    #[test]
    fn lookup_is_exact() {
        assert_eq!(Action::from_name("Deploy"), None);
        assert_eq!(Action::from_name(" deploy"), None);
    }

    #[test]
    fn unknown_action_lists_exactly_the_registry() {
        let err = Action::resolve("nuke").unwrap_err();
        assert_eq!(
            err,
            GatewayError::ActionNotAllowed {
                action: "nuke".into(),
                allowed: vec!["deploy", "rollback", "scan", "report", "ping"],
            }
        );
    }

    #[test]
    fn deploy_requires_known_env() {
        let reason = Action::Deploy
            .check_args(&args(json!({ "env": "qa", "version": "1.0" })))
            .unwrap();
        assert!(reason.contains("env"));

        let reason = Action::Deploy.check_args(&args(json!({ "version": "1.0" }))).unwrap();
        assert!(reason.contains("env"));
    }

    #[test]
    fn deploy_requires_string_version() {
        assert_eq!(
            Action::Deploy.check_args(&args(json!({ "env": "prod", "version": 1 }))),
            Some("version must be string")
        );
        assert_eq!(
            Action::Deploy.check_args(&args(json!({ "env": "prod", "version": "1.0" }))),
            None
        );
    }

    #[test]
    fn rollback_requires_env_and_target() {
        assert_eq!(
            Action::Rollback.check_args(&args(json!({ "env": "staging" }))),
            Some("to must be string")
        );
        assert_eq!(
            Action::Rollback.check_args(&args(json!({ "env": "dev", "to": "v0.9" }))),
            None
        );
        assert_eq!(
            Action::Rollback.check_args(&args(json!({ "env": "PROD", "to": "v0.9" }))),
            Some("env must be dev|staging|prod")
        );
    }

    #[test]
    fn unconstrained_actions_accept_anything() {
        let anything = args(json!({ "x": [1, 2], "y": null }));
        for action in [Action::Scan, Action::Report, Action::Ping] {
            assert!(action.validate(&anything).is_ok());
            assert!(action.validate(&Args::new()).is_ok());
        }
    }

    #[test]
    fn validate_surfaces_reason_verbatim() {
        let err = Action::Deploy
            .validate(&args(json!({ "env": "qa", "version": "1.0" })))
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::ArgsNotValid {
                detail: "env must be dev|staging|prod".into()
            }
        );
    }
}
