// src/models/salary.rs

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::money::round2;

/// Allowances every onboarding form offers, in display order.
pub const STANDARD_ALLOWANCES: [(&str, &str); 4] = [
    ("house_rent", "House Rent Allowance"),
    ("vehicle", "Vehicle Allowance"),
    ("fuel", "Fuel Allowance"),
    ("other", "Other Allowance"),
];

pub const CUSTOM_KEY_PREFIX: &str = "custom_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalaryComponent {
    #[schema(example = "house_rent")]
    pub key: String,

    #[schema(example = "House Rent Allowance")]
    pub label: String,

    #[schema(value_type = String, example = "4000.00")]
    pub amount: Decimal,

    #[schema(value_type = String, example = "40.00")]
    pub percentage: Decimal,

    pub visible: bool,

    // Added by the user rather than one of the standard allowances
    #[serde(default)]
    pub custom: bool,
}

impl SalaryComponent {
    pub fn hidden(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            amount: round2(Decimal::ZERO),
            percentage: Decimal::ZERO,
            visible: false,
            custom: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalaryStructure {
    #[schema(value_type = String, example = "10000.00")]
    pub monthly_salary: Decimal,

    #[schema(value_type = String, example = "5000.00")]
    pub basic: Decimal,

    #[schema(value_type = String, example = "50")]
    pub basic_percentage: Decimal,

    #[serde(default = "standard_components")]
    pub components: Vec<SalaryComponent>,
}

fn standard_components() -> Vec<SalaryComponent> {
    STANDARD_ALLOWANCES
        .iter()
        .map(|(key, label)| SalaryComponent::hidden(key, label))
        .collect()
}

impl Default for SalaryStructure {
    fn default() -> Self {
        Self {
            monthly_salary: Decimal::ZERO,
            basic: round2(Decimal::ZERO),
            basic_percentage: Decimal::ZERO,
            components: standard_components(),
        }
    }
}

impl SalaryStructure {
    pub fn component(&self, key: &str) -> Option<&SalaryComponent> {
        self.components.iter().find(|c| c.key == key)
    }

    pub fn component_mut(&mut self, key: &str) -> Option<&mut SalaryComponent> {
        self.components.iter_mut().find(|c| c.key == key)
    }

    pub fn visible_components(&self) -> impl Iterator<Item = &SalaryComponent> {
        self.components.iter().filter(|c| c.visible)
    }

    /// Next free `custom_<n>` key.
    pub fn next_custom_key(&self) -> String {
        let taken: BTreeSet<u64> = self
            .components
            .iter()
            .filter_map(|c| c.key.strip_prefix(CUSTOM_KEY_PREFIX))
            .filter_map(|n| n.parse::<u64>().ok())
            .collect();
        // Past the largest number, fall back to the first gap
        let next = match taken.last() {
            None => 1,
            Some(last) => last
                .checked_add(1)
                .unwrap_or_else(|| (1..).find(|n| !taken.contains(n)).unwrap_or(1)),
        };
        format!("{}{}", CUSTOM_KEY_PREFIX, next)
    }
}

/// One user edit on the salary step. Applied by `salary_service::apply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SalaryEdit {
    SetMonthlySalary {
        #[schema(value_type = String)]
        amount: Decimal,
    },
    SetBasicPercentage {
        #[schema(value_type = String)]
        percentage: Decimal,
    },
    SetBasicAmount {
        #[schema(value_type = String)]
        amount: Decimal,
    },
    SetComponentPercentage {
        key: String,
        #[schema(value_type = String)]
        percentage: Decimal,
    },
    SetComponentAmount {
        key: String,
        #[schema(value_type = String)]
        amount: Decimal,
    },
    ToggleComponent {
        key: String,
        visible: bool,
    },
    AddCustomComponent {
        label: String,
    },
    RemoveCustomComponent {
        key: String,
    },
}

/// Room left in the monthly salary for one more allowance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    #[schema(value_type = String, example = "5000.00")]
    pub amount: Decimal,
    #[schema(value_type = String, example = "50.00")]
    pub percentage: Decimal,
}

// --- HTTP payloads ---

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplySalaryEditRequest {
    pub structure: SalaryStructure,
    pub edit: SalaryEdit,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRequest {
    pub structure: SalaryStructure,
    #[serde(default)]
    pub excluding_key: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSummary {
    #[schema(value_type = String)]
    pub monthly_salary: Decimal,
    #[schema(value_type = String)]
    pub total: Decimal,
    pub balanced: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_offer_hidden_standard_allowances() {
        let structure = SalaryStructure::default();
        let keys: Vec<&str> = structure.components.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["house_rent", "vehicle", "fuel", "other"]);
        assert_eq!(structure.visible_components().count(), 0);
    }

    #[test]
    fn custom_keys_increment() {
        let mut structure = SalaryStructure::default();
        assert_eq!(structure.next_custom_key(), "custom_1");
        structure.components.push(SalaryComponent {
            custom: true,
            ..SalaryComponent::hidden("custom_3", "Phone")
        });
        assert_eq!(structure.next_custom_key(), "custom_4");
    }

    #[test]
    fn custom_keys_survive_huge_suffixes() {
        let mut structure = SalaryStructure::default();
        structure.components.push(SalaryComponent {
            custom: true,
            ..SalaryComponent::hidden("custom_4294967295", "Phone")
        });
        assert_eq!(structure.next_custom_key(), "custom_4294967296");

        structure.components.push(SalaryComponent {
            custom: true,
            ..SalaryComponent::hidden("custom_18446744073709551615", "Internet")
        });
        assert_eq!(structure.next_custom_key(), "custom_1");
    }

    #[test]
    fn edits_are_tagged_by_type() {
        let edit: SalaryEdit = serde_json::from_value(json!({
            "type": "setComponentPercentage",
            "key": "house_rent",
            "percentage": "40"
        }))
        .unwrap();
        assert_eq!(
            edit,
            SalaryEdit::SetComponentPercentage { key: "house_rent".into(), percentage: Decimal::from(40) }
        );

        let edit: SalaryEdit = serde_json::from_value(json!({ "type": "setMonthlySalary", "amount": 12000 })).unwrap();
        assert_eq!(edit, SalaryEdit::SetMonthlySalary { amount: Decimal::from(12000) });
    }

    #[test]
    fn structure_without_components_gets_the_standard_ones() {
        let structure: SalaryStructure = serde_json::from_value(json!({
            "monthlySalary": "10000",
            "basic": "5000",
            "basicPercentage": "50"
        }))
        .unwrap();
        assert_eq!(structure.components.len(), STANDARD_ALLOWANCES.len());
    }
}
