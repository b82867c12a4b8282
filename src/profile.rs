// 👤 Profile Model - one person's financial record
// Raw console input is parsed here into a typed Profile, never by the caller

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// PROFILE
// ============================================================================

/// One person's financial record as persisted on disk.
///
/// Only the five input fields are stored. Score and rank are derived by the
/// ranker on every read and never written back.
///
/// The French aliases let documents written by the first version of the tool
/// load without conversion; saves always use the English keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    #[serde(alias = "nom")]
    pub name: String,

    #[serde(alias = "revenus")]
    pub income: u64,

    #[serde(alias = "actifs")]
    pub assets: u64,

    #[serde(alias = "dettes")]
    pub debts: u64,

    #[serde(alias = "investissements")]
    pub investments: u64,
}

impl Profile {
    /// Build a profile, trimming the name and rejecting an empty one
    pub fn new(
        name: &str,
        income: u64,
        assets: u64,
        debts: u64,
        investments: u64,
    ) -> Result<Self, InputError> {
        let name = validate_name(name)?;
        Ok(Profile {
            name,
            income,
            assets,
            debts,
            investments,
        })
    }

    /// Get the value of one money field
    pub fn amount(&self, field: AmountField) -> u64 {
        match field {
            AmountField::Income => self.income,
            AmountField::Assets => self.assets,
            AmountField::Debts => self.debts,
            AmountField::Investments => self.investments,
        }
    }

    /// Case-insensitive identity check used by Scan.
    /// Both sides are trimmed; legacy documents store names as typed.
    pub fn name_matches(&self, query: &str) -> bool {
        self.name.trim().to_lowercase() == query.trim().to_lowercase()
    }

    /// Schema checks serde cannot express (used when loading the store)
    pub fn validate(&self) -> Result<(), InputError> {
        if self.name.trim().is_empty() {
            return Err(InputError::EmptyName);
        }
        Ok(())
    }
}

// ============================================================================
// AMOUNT FIELDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmountField {
    Income,
    Assets,
    Debts,
    Investments,
}

impl AmountField {
    /// Prompt order used by the Create flow
    pub const ALL: [AmountField; 4] = [
        AmountField::Income,
        AmountField::Assets,
        AmountField::Debts,
        AmountField::Investments,
    ];

    pub fn name(&self) -> &str {
        match self {
            AmountField::Income => "income",
            AmountField::Assets => "assets",
            AmountField::Debts => "debts",
            AmountField::Investments => "investments",
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            AmountField::Income => "Annual income ($): ",
            AmountField::Assets => "Total assets ($): ",
            AmountField::Debts => "Total debts ($): ",
            AmountField::Investments => "Active investments ($): ",
        }
    }
}

impl fmt::Display for AmountField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// INPUT VALIDATION
// ============================================================================

/// Invalid user input for the Create operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("{field} must be a whole number, got {value:?}")]
    NotAnInteger { field: AmountField, value: String },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: AmountField, value: String },
    #[error("{field} is too large: {value}")]
    OutOfRange { field: AmountField, value: String },
}

/// Parse one money field typed at the prompt.
///
/// Surrounding whitespace and a leading `+` are accepted. Anything else that is
/// not a base-10 integer is `NotAnInteger`.
pub fn parse_amount(field: AmountField, raw: &str) -> Result<u64, InputError> {
    let trimmed = raw.trim();
    let value: i128 = trimmed.parse().map_err(|_| InputError::NotAnInteger {
        field,
        value: trimmed.to_string(),
    })?;

    if value < 0 {
        return Err(InputError::Negative {
            field,
            value: trimmed.to_string(),
        });
    }

    u64::try_from(value).map_err(|_| InputError::OutOfRange {
        field,
        value: trimmed.to_string(),
    })
}

fn validate_name(raw: &str) -> Result<String, InputError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(InputError::EmptyName);
    }
    Ok(name.to_string())
}

/// Unvalidated Create input, exactly as typed
#[derive(Debug, Clone, Default)]
pub struct ProfileDraft {
    pub name: String,
    pub income: String,
    pub assets: String,
    pub debts: String,
    pub investments: String,
}

impl ProfileDraft {
    pub fn new(name: &str, income: &str, assets: &str, debts: &str, investments: &str) -> Self {
        ProfileDraft {
            name: name.to_string(),
            income: income.to_string(),
            assets: assets.to_string(),
            debts: debts.to_string(),
            investments: investments.to_string(),
        }
    }

    fn raw(&self, field: AmountField) -> &str {
        match field {
            AmountField::Income => &self.income,
            AmountField::Assets => &self.assets,
            AmountField::Debts => &self.debts,
            AmountField::Investments => &self.investments,
        }
    }

    /// Validate every field; the first failure wins
    pub fn parse(&self) -> Result<Profile, InputError> {
        let name = validate_name(&self.name)?;
        let income = parse_amount(AmountField::Income, self.raw(AmountField::Income))?;
        let assets = parse_amount(AmountField::Assets, self.raw(AmountField::Assets))?;
        let debts = parse_amount(AmountField::Debts, self.raw(AmountField::Debts))?;
        let investments =
            parse_amount(AmountField::Investments, self.raw(AmountField::Investments))?;

        Ok(Profile {
            name,
            income,
            assets,
            debts,
            investments,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_accepts_integers() {
        assert_eq!(parse_amount(AmountField::Income, "1000"), Ok(1000));
        assert_eq!(parse_amount(AmountField::Income, "  42 "), Ok(42));
        assert_eq!(parse_amount(AmountField::Income, "+7"), Ok(7));
        assert_eq!(parse_amount(AmountField::Income, "0"), Ok(0));
    }

    #[test]
    fn test_parse_amount_rejects_non_integers() {
        for raw in ["abc", "", "12.5", "1,000", "1e3"] {
            let err = parse_amount(AmountField::Assets, raw).unwrap_err();
            assert!(
                matches!(err, InputError::NotAnInteger { field: AmountField::Assets, .. }),
                "{:?} should not parse, got {:?}",
                raw,
                err
            );
        }
    }

    #[test]
    fn test_parse_amount_rejects_negative() {
        let err = parse_amount(AmountField::Debts, "-200").unwrap_err();
        assert_eq!(
            err,
            InputError::Negative {
                field: AmountField::Debts,
                value: "-200".to_string()
            }
        );
    }

    #[test]
    fn test_parse_amount_out_of_range() {
        let err = parse_amount(AmountField::Investments, "99999999999999999999").unwrap_err();
        assert!(matches!(err, InputError::OutOfRange { .. }));
    }

    #[test]
    fn test_draft_parse_success() {
        let draft = ProfileDraft::new("  Bob ", "1000", "500", "200", "300");
        let profile = draft.parse().unwrap();

        assert_eq!(profile.name, "Bob");
        assert_eq!(profile.income, 1000);
        assert_eq!(profile.assets, 500);
        assert_eq!(profile.debts, 200);
        assert_eq!(profile.investments, 300);
    }

    #[test]
    fn test_draft_parse_reports_first_bad_field() {
        let draft = ProfileDraft::new("Bob", "abc", "500", "oops", "300");
        let err = draft.parse().unwrap_err();

        assert_eq!(
            err,
            InputError::NotAnInteger {
                field: AmountField::Income,
                value: "abc".to_string()
            }
        );
        assert_eq!(err.to_string(), "income must be a whole number, got \"abc\"");
    }

    #[test]
    fn test_draft_parse_rejects_blank_name() {
        let draft = ProfileDraft::new("   ", "1", "1", "1", "1");
        assert_eq!(draft.parse().unwrap_err(), InputError::EmptyName);
    }

    #[test]
    fn test_name_matches_case_insensitive() {
        let profile = Profile::new("Alice", 1, 1, 1, 1).unwrap();

        assert!(profile.name_matches("alice"));
        assert!(profile.name_matches("ALICE"));
        assert!(profile.name_matches(" Alice "));
        assert!(!profile.name_matches("Alicia"));
    }

    #[test]
    fn test_name_matches_untrimmed_stored_name() {
        let json = r#"{"nom": "Alice ", "revenus": 1, "actifs": 1, "dettes": 1, "investissements": 1}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();

        assert!(profile.name_matches("alice"));
        assert!(profile.name_matches("Alice "));
    }

    #[test]
    fn test_legacy_french_keys_deserialize() {
        let json = r#"{"nom": "Zoé", "revenus": 10, "actifs": 20, "dettes": 5, "investissements": 1}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();

        assert_eq!(profile, Profile::new("Zoé", 10, 20, 5, 1).unwrap());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = r#"{"name": "A", "income": 1, "assets": 1, "debts": 1, "investments": 1, "score": 3.0}"#;
        assert!(serde_json::from_str::<Profile>(json).is_err());
    }

    #[test]
    fn test_serialize_never_includes_derived_fields() {
        let profile = Profile::new("A", 1, 2, 3, 4).unwrap();
        let value = serde_json::to_value(&profile).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();

        assert_eq!(keys.len(), 5);
        assert!(value.get("score").is_none());
        assert!(value.get("rank").is_none());
    }
}
