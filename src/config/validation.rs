//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every matcher token parses and every pattern compiles
//! - Validate value ranges (status codes, bind address)
//! - Detect duplicate route names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::Method;
use thiserror::Error;

use crate::config::schema::{RouteConfig, RouterConfig};
use crate::routing::{AnchoredPattern, Matcher, RoutingError};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address `{0}`")]
    BindAddress(String),

    #[error("route at {0} has an empty name")]
    EmptyName(String),

    #[error("duplicate route name `{0}`")]
    DuplicateName(String),

    #[error("route `{route}`: invalid method `{method}`")]
    Method { route: String, method: String },

    #[error("route `{route}`: {source}")]
    Matcher {
        route: String,
        #[source]
        source: RoutingError,
    },

    #[error("route `{route}`: status {status} outside 100-599")]
    Status { route: String, status: u16 },

    #[error("route `{route}`: branch routes cannot have a body")]
    BranchBody { route: String },
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let mut names = HashSet::new();
    for (i, route) in config.routes.iter().enumerate() {
        validate_route(route, &format!("routes[{}]", i), &mut names, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_route(
    route: &RouteConfig,
    location: &str,
    names: &mut HashSet<String>,
    errors: &mut Vec<ValidationError>,
) {
    if route.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName(location.to_string()));
    } else if !names.insert(route.name.clone()) {
        errors.push(ValidationError::DuplicateName(route.name.clone()));
    }

    if let Some(methods) = &route.method {
        for method in methods.split('|').map(str::trim) {
            if method.is_empty() || Method::from_bytes(method.as_bytes()).is_err() {
                errors.push(ValidationError::Method {
                    route: route.name.clone(),
                    method: method.to_string(),
                });
            }
        }
    }

    for token in &route.path {
        let checked = Matcher::parse(token).and_then(|matcher| match matcher {
            Matcher::Pattern(p) => AnchoredPattern::new(&p.source).map(|_| ()),
            _ => Ok(()),
        });
        if let Err(source) = checked {
            errors.push(ValidationError::Matcher {
                route: route.name.clone(),
                source,
            });
        }
    }

    if !(100..=599).contains(&route.status) {
        errors.push(ValidationError::Status {
            route: route.name.clone(),
            status: route.status,
        });
    }

    if !route.children.is_empty() && !route.body.is_empty() {
        errors.push(ValidationError::BranchBody {
            route: route.name.clone(),
        });
    }

    for (i, child) in route.children.iter().enumerate() {
        validate_route(
            child,
            &format!("{}.children[{}]", location, i),
            names,
            errors,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RouterConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RouterConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.routes = vec![
            RouteConfig::leaf("a", &[":id:float"], ""),
            RouteConfig::leaf("a", &["re:(oops"], "").with_status(42),
            RouteConfig::branch("", &["x"], vec![RouteConfig::leaf("b", &[], "")])
                .with_method("GET|"),
        ];

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::BindAddress("not-an-address".into())));
        assert!(errors.contains(&ValidationError::DuplicateName("a".into())));
        assert!(errors.contains(&ValidationError::EmptyName("routes[2]".into())));
        assert!(errors.contains(&ValidationError::Status { route: "a".into(), status: 42 }));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::Method { .. })));
        assert_eq!(
            errors
                .iter()
                .filter(|e| matches!(e, ValidationError::Matcher { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_branch_body_rejected() {
        let mut config = RouterConfig::default();
        let mut branch = RouteConfig::branch("api", &["api"], vec![RouteConfig::leaf("v1", &["v1"], "")]);
        branch.body = "oops".into();
        config.routes.push(branch);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::BranchBody { route: "api".into() }]);
    }
}
