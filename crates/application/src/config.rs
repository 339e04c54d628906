use std::collections::BTreeSet;
use std::env;

use garda_core::UserId;
use garda_domain::PermissionMask;

const SUPERUSER_IDS_ENV: &str = "GARDA_SUPERUSER_IDS";
const SUPERUSER_ACTION_MASK_ENV: &str = "GARDA_SUPERUSER_ACTION_MASK";
const SUPERADMIN_IDS_ENV: &str = "GARDA_SUPERADMIN_IDS";
const SUPERADMIN_EMPLOYEE_NUMBERS_ENV: &str = "GARDA_SUPERADMIN_EMPLOYEE_NUMBERS";
const SUPERADMIN_NAME_KEYWORDS_ENV: &str = "GARDA_SUPERADMIN_NAME_KEYWORDS";

/// Break-glass user ids present in every deployment.
const SEEDED_SUPERADMIN_IDS: [i64; 2] = [1, 14];

/// Break-glass employee number present in every deployment.
const SEEDED_SUPERADMIN_EMPLOYEE_NUMBER: &str = "1000000001";

/// Break-glass display-name keyword present in every deployment.
const SEEDED_SUPERADMIN_NAME_KEYWORD: &str = "racka";

/// Access-control configuration resolved once per process.
///
/// Constructed explicitly and passed into services so policy checks never
/// read process state themselves. Malformed entries are skipped with a
/// warning; configuration problems are never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessConfig {
    /// Users short-circuited to the superuser action mask.
    pub superuser_ids: BTreeSet<UserId>,
    /// Mask granted to superusers regardless of role mappings.
    pub superuser_action_mask: PermissionMask,
    /// Superadmin user-id allowlist, seeds included.
    pub superadmin_user_ids: BTreeSet<UserId>,
    /// Superadmin employee-number allowlist, digits only, seed included.
    pub superadmin_employee_numbers: BTreeSet<String>,
    /// Superadmin display-name keywords, lower-cased, seed included.
    pub superadmin_name_keywords: BTreeSet<String>,
}

impl AccessConfig {
    /// Loads the configuration from process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_values(
            env::var(SUPERUSER_IDS_ENV).ok().as_deref(),
            env::var(SUPERUSER_ACTION_MASK_ENV).ok().as_deref(),
            env::var(SUPERADMIN_IDS_ENV).ok().as_deref(),
            env::var(SUPERADMIN_EMPLOYEE_NUMBERS_ENV).ok().as_deref(),
            env::var(SUPERADMIN_NAME_KEYWORDS_ENV).ok().as_deref(),
        )
    }

    /// Builds the configuration from raw comma-separated values.
    #[must_use]
    pub fn from_values(
        superuser_ids: Option<&str>,
        superuser_action_mask: Option<&str>,
        superadmin_ids: Option<&str>,
        superadmin_employee_numbers: Option<&str>,
        superadmin_name_keywords: Option<&str>,
    ) -> Self {
        let mut superadmin_user_ids = parse_id_list(SUPERADMIN_IDS_ENV, superadmin_ids);
        for seed in SEEDED_SUPERADMIN_IDS {
            superadmin_user_ids.insert(UserId::new(seed));
        }

        let mut employee_numbers = parse_string_list(superadmin_employee_numbers, normalize_digits);
        employee_numbers.insert(SEEDED_SUPERADMIN_EMPLOYEE_NUMBER.to_owned());

        let mut name_keywords =
            parse_string_list(superadmin_name_keywords, |value| value.to_lowercase());
        name_keywords.insert(SEEDED_SUPERADMIN_NAME_KEYWORD.to_owned());

        Self {
            superuser_ids: parse_id_list(SUPERUSER_IDS_ENV, superuser_ids),
            superuser_action_mask: parse_action_mask(superuser_action_mask),
            superadmin_user_ids,
            superadmin_employee_numbers: employee_numbers,
            superadmin_name_keywords: name_keywords,
        }
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self::from_values(None, None, None, None, None)
    }
}

fn parse_id_list(source: &str, raw: Option<&str>) -> BTreeSet<UserId> {
    let mut values = BTreeSet::new();
    let Some(raw) = raw else {
        return values;
    };

    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        match entry.parse::<i64>() {
            Ok(id) => {
                values.insert(UserId::new(id));
            }
            Err(_) => {
                tracing::warn!(source, entry, "skipping malformed user id in allowlist");
            }
        }
    }

    values
}

fn parse_string_list(raw: Option<&str>, normalize: impl Fn(&str) -> String) -> BTreeSet<String> {
    let mut values = BTreeSet::new();
    let Some(raw) = raw else {
        return values;
    };

    for entry in raw.split(',') {
        let normalized = normalize(entry.trim());
        if !normalized.is_empty() {
            values.insert(normalized);
        }
    }

    values
}

fn parse_action_mask(raw: Option<&str>) -> PermissionMask {
    let Some(raw) = raw else {
        return PermissionMask::FULL;
    };

    match raw.trim().parse::<u32>() {
        Ok(bits) => PermissionMask::from_bits(bits),
        Err(_) => {
            tracing::warn!(
                source = SUPERUSER_ACTION_MASK_ENV,
                entry = raw,
                "skipping malformed superuser action mask, using the full mask"
            );
            PermissionMask::FULL
        }
    }
}

fn normalize_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}
