use garda_core::UserIdentity;

use crate::AccessConfig;

/// Break-glass authorization backstop.
///
/// Three independent allowlists are consulted and any single match grants
/// superadmin. Every positive match is logged so the override stays
/// auditable instead of silently widening access.
#[derive(Debug, Clone)]
pub struct SuperadminPolicy {
    config: AccessConfig,
}

impl SuperadminPolicy {
    /// Creates the policy from resolved configuration.
    #[must_use]
    pub fn new(config: AccessConfig) -> Self {
        Self { config }
    }

    /// Returns whether the user matches any superadmin allowlist.
    #[must_use]
    pub fn is_superadmin(&self, user: Option<&UserIdentity>) -> bool {
        let Some(user) = user else {
            return false;
        };

        if self.matches_name_keyword(user) {
            return true;
        }

        if self.config.superadmin_user_ids.contains(&user.user_id()) {
            tracing::warn!(
                user_id = %user.user_id(),
                "superadmin granted via user-id allowlist"
            );
            return true;
        }

        self.matches_employee_number(user)
    }

    fn matches_name_keyword(&self, user: &UserIdentity) -> bool {
        let name = user.display_name().to_lowercase();
        for keyword in &self.config.superadmin_name_keywords {
            if name.contains(keyword.as_str()) {
                tracing::warn!(
                    user_id = %user.user_id(),
                    keyword = %keyword,
                    "superadmin granted via display-name keyword"
                );
                return true;
            }
        }

        false
    }

    fn matches_employee_number(&self, user: &UserIdentity) -> bool {
        let Some(number) = user.employee_number() else {
            return false;
        };

        let digits: String = number.chars().filter(char::is_ascii_digit).collect();
        if !digits.is_empty() && self.config.superadmin_employee_numbers.contains(&digits) {
            tracing::warn!(
                user_id = %user.user_id(),
                employee_number = %digits,
                "superadmin granted via employee-number allowlist"
            );
            return true;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use garda_core::{UserId, UserIdentity};

    use crate::AccessConfig;

    use super::SuperadminPolicy;

    fn policy(config: AccessConfig) -> SuperadminPolicy {
        SuperadminPolicy::new(config)
    }

    fn user(id: i64, name: &str, employee_number: Option<&str>) -> UserIdentity {
        UserIdentity::new(
            UserId::new(id),
            name,
            employee_number.map(str::to_owned),
            None,
        )
    }

    #[test]
    fn no_user_is_never_superadmin() {
        assert!(!policy(AccessConfig::default()).is_superadmin(None));
    }

    #[test]
    fn seeded_name_keyword_matches_with_empty_allowlists() {
        let policy = policy(AccessConfig::default());
        assert!(policy.is_superadmin(Some(&user(500, "Racka Admin", None))));
        assert!(!policy.is_superadmin(Some(&user(500, "Ordinary Officer", None))));
    }

    #[test]
    fn seeded_user_ids_match_regardless_of_configuration() {
        let policy = policy(AccessConfig::from_values(None, None, Some(""), None, None));
        assert!(policy.is_superadmin(Some(&user(14, "Sari", None))));
        assert!(!policy.is_superadmin(Some(&user(15, "Sari", None))));
    }

    #[test]
    fn employee_number_matches_on_digits_only() {
        let policy = policy(AccessConfig::default());
        assert!(policy.is_superadmin(Some(&user(500, "Sari", Some("100-000-0001")))));
        assert!(!policy.is_superadmin(Some(&user(500, "Sari", Some("200-000-0002")))));
    }

    #[test]
    fn configured_keyword_extends_the_seed() {
        let config = AccessConfig::from_values(None, None, None, None, Some("incident"));
        let policy = policy(config);
        assert!(policy.is_superadmin(Some(&user(500, "Incident Commander", None))));
        assert!(policy.is_superadmin(Some(&user(500, "Racka Admin", None))));
    }
}
