// security/src/gate.rs
//
// Table-driven access policy: base resource segment -> HTTP verb ->
// permitted roles. Runs after identity verification and before any
// handler logic; a miss at any level is a 403-grade decision with a
// reason tag.

use lazy_static::lazy_static;
use std::collections::HashMap;

use models::errors::AccessError;
use models::Role;

use Role::{Administrator, Doctor, Nurse};

const ALL_STAFF: &[Role] = &[Administrator, Doctor, Nurse];
const ADMIN_ONLY: &[Role] = &[Administrator];

lazy_static! {
    static ref PERMISSIONS: HashMap<&'static str, HashMap<&'static str, &'static [Role]>> = {
        let mut table: HashMap<&'static str, HashMap<&'static str, &'static [Role]>> =
            HashMap::new();
        let mut insert = |resource: &'static str, verbs: &[(&'static str, &'static [Role])]| {
            table.insert(resource, verbs.iter().cloned().collect());
        };

        insert(
            "patients",
            &[
                ("GET", ALL_STAFF),
                ("POST", ALL_STAFF),
                ("PUT", ALL_STAFF),
                ("DELETE", ADMIN_ONLY),
            ],
        );
        insert(
            "appointments",
            &[
                ("GET", ALL_STAFF),
                ("POST", &[Administrator, Nurse]),
                ("PUT", ALL_STAFF),
                ("DELETE", ADMIN_ONLY),
            ],
        );
        insert(
            "users",
            &[
                ("GET", ADMIN_ONLY),
                ("POST", ADMIN_ONLY),
                ("PUT", ADMIN_ONLY),
                ("DELETE", ADMIN_ONLY),
            ],
        );
        insert(
            "doctors",
            &[
                ("GET", ALL_STAFF),
                ("POST", ADMIN_ONLY),
                ("PUT", ADMIN_ONLY),
                ("DELETE", ADMIN_ONLY),
            ],
        );
        insert(
            "nurses",
            &[
                ("GET", ALL_STAFF),
                ("POST", ADMIN_ONLY),
                ("PUT", ADMIN_ONLY),
                ("DELETE", ADMIN_ONLY),
            ],
        );
        insert(
            "rooms",
            &[
                ("GET", ALL_STAFF),
                ("POST", ADMIN_ONLY),
                ("PUT", ADMIN_ONLY),
                ("DELETE", ADMIN_ONLY),
            ],
        );
        insert(
            "specialties",
            &[
                ("GET", ALL_STAFF),
                ("POST", ADMIN_ONLY),
                ("PUT", ADMIN_ONLY),
                ("DELETE", ADMIN_ONLY),
            ],
        );
        insert("audit", &[("GET", ADMIN_ONLY)]);
        table
    };
}

/// Authorizes `role` for `verb` on `resource` (the base path segment).
pub fn check_access(resource: &str, verb: &str, role: Role) -> Result<(), AccessError> {
    let verbs = PERMISSIONS
        .get(resource)
        .ok_or_else(|| AccessError::UnknownResource(resource.to_string()))?;
    let allowed = verbs.get(verb).ok_or_else(|| AccessError::UnknownVerb {
        resource: resource.to_string(),
        verb: verb.to_string(),
    })?;
    if allowed.contains(&role) {
        Ok(())
    } else {
        Err(AccessError::RoleNotAllowed {
            role: role.to_string(),
            verb: verb.to_string(),
            resource: resource.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_allow_nurse_to_create_patient_but_not_delete() {
        assert!(check_access("patients", "POST", Role::Nurse).is_ok());
        let err = check_access("patients", "DELETE", Role::Nurse).unwrap_err();
        assert!(matches!(err, AccessError::RoleNotAllowed { .. }));
    }

    #[test]
    fn should_restrict_audit_to_administrators() {
        assert!(check_access("audit", "GET", Role::Administrator).is_ok());
        assert!(matches!(
            check_access("audit", "GET", Role::Doctor),
            Err(AccessError::RoleNotAllowed { .. })
        ));
    }

    #[test]
    fn should_reject_unknown_resource() {
        assert!(matches!(
            check_access("invoices", "GET", Role::Administrator),
            Err(AccessError::UnknownResource(_))
        ));
    }

    #[test]
    fn should_reject_unknown_verb() {
        assert!(matches!(
            check_access("audit", "DELETE", Role::Administrator),
            Err(AccessError::UnknownVerb { .. })
        ));
    }

    #[test]
    fn should_let_doctor_update_appointments_but_not_create() {
        assert!(check_access("appointments", "PUT", Role::Doctor).is_ok());
        assert!(matches!(
            check_access("appointments", "POST", Role::Doctor),
            Err(AccessError::RoleNotAllowed { .. })
        ));
    }
}
