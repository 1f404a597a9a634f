//! Rank-based access control for namespace resources
//!
//! Access is granted when the requested modes are a subset of the modes the
//! resource grants to the caller's rank.

use crate::error::AccessError;
use crate::shell::CommandResolver;
use crate::types::{AccessMode, AccessStatus, Rank, Resource, ResourceKind};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Fold mode names into one bitmask. An unknown name is a configuration
/// error.
pub fn permission_bitmask<S: AsRef<str>>(names: &[S]) -> Result<AccessMode, AccessError> {
    names.iter().try_fold(AccessMode::PRIVATE, |mask, name| {
        Ok(mask | name.as_ref().parse::<AccessMode>()?)
    })
}

/// What opening a resource produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    Denied,
    /// A runnable resource and where its code lives
    Runnable(PathBuf),
    /// Runnable, but the resolver has no code for it
    NotFound,
    /// Data resources have no behaviour beyond the access check
    Data,
}

/// Access decisions for resources
pub struct AccessController;

impl AccessController {
    pub fn check_access(resource: &Resource, rank: Rank, requested: AccessMode) -> AccessStatus {
        let granted = resource.permission.granted(rank);
        let status = if granted.contains(requested) {
            AccessStatus::Granted
        } else {
            AccessStatus::Denied
        };

        debug!(
            "Access {:?} for {} on '{}': requested {}, granted {}",
            status,
            rank.label(),
            resource.name,
            requested,
            granted
        );
        status
    }

    /// `check_access` with the requested modes given by name
    pub fn check_access_named<S: AsRef<str>>(
        resource: &Resource,
        rank: Rank,
        modes: &[S],
    ) -> Result<AccessStatus, AccessError> {
        let requested = permission_bitmask(modes)?;
        Ok(Self::check_access(resource, rank, requested))
    }

    /// Check access, then resolve runnable resources to their code
    pub fn open(
        resource: &Resource,
        rank: Rank,
        requested: AccessMode,
        resolver: &dyn CommandResolver,
    ) -> OpenOutcome {
        if !Self::check_access(resource, rank, requested).is_granted() {
            warn!("Access denied: {} on '{}'", rank.label(), resource.name);
            return OpenOutcome::Denied;
        }

        match resource.kind {
            ResourceKind::Data => OpenOutcome::Data,
            ResourceKind::Runnable => match resolver.resolve(&resource.name) {
                Some(path) => OpenOutcome::Runnable(path),
                None => OpenOutcome::NotFound,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockCommandResolver;
    use crate::types::Permission;

    fn resource(user: AccessMode, admin: AccessMode, owner: AccessMode) -> Resource {
        Resource::data("notes", Permission::new(user, admin, owner).unwrap())
    }

    #[test]
    fn test_permission_bitmask_folds_names() {
        assert_eq!(permission_bitmask::<&str>(&[]).unwrap(), AccessMode::PRIVATE);
        assert_eq!(
            permission_bitmask(&["READ", "DELETE"]).unwrap(),
            AccessMode::READ | AccessMode::DELETE
        );
        assert_eq!(permission_bitmask(&["READ", "READ"]).unwrap(), AccessMode::READ);
    }

    #[test]
    fn test_permission_bitmask_rejects_unknown_name() {
        let err = permission_bitmask(&["READ", "EXECUTE"]).unwrap_err();
        assert!(matches!(err, AccessError::UnknownMode(name) if name == "EXECUTE"));
    }

    #[test]
    fn test_grant_iff_subset_for_all_combinations() {
        let permissions = [
            Permission::default(),
            Permission::new(AccessMode::PRIVATE, AccessMode::DELETE, AccessMode::ALL).unwrap(),
            Permission::new(
                AccessMode::WRITE,
                AccessMode::WRITE | AccessMode::DELETE,
                AccessMode::ALL,
            )
            .unwrap(),
            Permission::new(AccessMode::PRIVATE, AccessMode::PRIVATE, AccessMode::PRIVATE).unwrap(),
        ];

        for permission in permissions {
            let res = Resource::data("f", permission);
            for rank in Rank::ALL {
                let granted = permission.granted(rank);
                for requested in AccessMode::combinations() {
                    let expected = requested.bits() & !granted.bits() == 0;
                    let status = AccessController::check_access(&res, rank, requested);
                    assert_eq!(
                        status.is_granted(),
                        expected,
                        "rank {:?} requested {} granted {}",
                        rank,
                        requested,
                        granted
                    );
                }
            }
        }
    }

    #[test]
    fn test_combined_request_is_not_compared_by_magnitude() {
        // Admin holds DELETE (4). READ|WRITE (3) is smaller but not granted.
        let res = resource(AccessMode::PRIVATE, AccessMode::DELETE, AccessMode::ALL);
        assert_eq!(
            AccessController::check_access(&res, Rank::Admin, AccessMode::READ | AccessMode::WRITE),
            AccessStatus::Denied
        );
        assert_eq!(
            AccessController::check_access(&res, Rank::Admin, AccessMode::DELETE),
            AccessStatus::Granted
        );
    }

    #[test]
    fn test_private_request_always_granted() {
        let res = resource(AccessMode::PRIVATE, AccessMode::PRIVATE, AccessMode::PRIVATE);
        for rank in Rank::ALL {
            assert!(AccessController::check_access(&res, rank, AccessMode::PRIVATE).is_granted());
        }
    }

    #[test]
    fn test_check_access_named() {
        let res = Resource::data("f", Permission::default());
        assert_eq!(
            AccessController::check_access_named(&res, Rank::User, &["READ"]).unwrap(),
            AccessStatus::Granted
        );
        assert_eq!(
            AccessController::check_access_named(&res, Rank::User, &["READ", "WRITE"]).unwrap(),
            AccessStatus::Denied
        );
        assert!(AccessController::check_access_named(&res, Rank::User, &["RUN"]).is_err());
    }

    #[test]
    fn test_open_runnable_routes_through_resolver() {
        let mut resolver = MockCommandResolver::new();
        resolver
            .expect_resolve()
            .withf(|name| name == "hello")
            .times(1)
            .returning(|_| Some(PathBuf::from("/ns/exe/hello")));

        let res = Resource::runnable("hello", Permission::default());
        let outcome = AccessController::open(&res, Rank::User, AccessMode::READ, &resolver);
        assert_eq!(outcome, OpenOutcome::Runnable(PathBuf::from("/ns/exe/hello")));
    }

    #[test]
    fn test_open_denied_skips_resolver() {
        let mut resolver = MockCommandResolver::new();
        resolver.expect_resolve().times(0);

        let res = Resource::runnable("hello", Permission::default());
        let outcome = AccessController::open(&res, Rank::User, AccessMode::WRITE, &resolver);
        assert_eq!(outcome, OpenOutcome::Denied);
    }

    #[test]
    fn test_open_missing_and_data() {
        let mut resolver = MockCommandResolver::new();
        resolver.expect_resolve().returning(|_| None);

        let runnable = Resource::runnable("ghost", Permission::default());
        assert_eq!(
            AccessController::open(&runnable, Rank::Owner, AccessMode::READ, &resolver),
            OpenOutcome::NotFound
        );

        let data = Resource::data("notes", Permission::default());
        assert_eq!(
            AccessController::open(&data, Rank::Owner, AccessMode::ALL, &resolver),
            OpenOutcome::Data
        );
    }
}
