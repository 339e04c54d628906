use std::fmt::{Display, Formatter};

use garda_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Normalized key addressing a protected resource.
///
/// A resource may be addressed by its canonical key or by any registered
/// alias (navigation label, model label); all of them resolve to the same
/// permission record. Keys are trimmed and lower-cased on construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MenuKey(String);

impl MenuKey {
    /// Canonical key of the risk-register resource.
    pub const RISK_REGISTER: &'static str = "risk-register";
    /// Canonical key of the risk-approval list resource.
    pub const RISK_APPROVAL: &'static str = "risk-approval";
    /// Canonical key of the loss-event register resource.
    pub const LOSS_EVENT: &'static str = "loss-event";
    /// Canonical key of the inherent-assessment resource.
    pub const INHERENT_ASSESSMENT: &'static str = "inherent-assessment";
    /// Canonical key of the mitigation resource.
    pub const MITIGATION: &'static str = "mitigation";
    /// Canonical key of the realization resource.
    pub const REALIZATION: &'static str = "realization";

    /// Creates a normalized menu key.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let normalized = value.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(AppError::Validation(
                "menu key must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for MenuKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Addressable resource with its equivalent identifier aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuDefinition {
    /// Canonical key that permission mappings are stored under.
    pub key: MenuKey,
    /// Alternative keys resolving to the same permission record.
    pub aliases: Vec<MenuKey>,
}

impl MenuDefinition {
    /// Creates a menu definition with no aliases.
    #[must_use]
    pub fn new(key: MenuKey) -> Self {
        Self {
            key,
            aliases: Vec::new(),
        }
    }

    /// Returns the definition extended with one alias.
    #[must_use]
    pub fn with_alias(mut self, alias: MenuKey) -> Self {
        self.aliases.push(alias);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::MenuKey;

    #[test]
    fn menu_key_normalizes_case_and_whitespace() {
        let key = MenuKey::new("  Risk-Register ");
        assert!(key.is_ok());
        assert_eq!(
            key.unwrap_or(MenuKey("other".to_owned())).as_str(),
            MenuKey::RISK_REGISTER
        );
    }

    #[test]
    fn menu_key_rejects_blank_input() {
        assert!(MenuKey::new("  ").is_err());
    }
}
