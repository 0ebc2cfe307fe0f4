// src/services/salary_service.rs

// Salary allocation engine. Every operation takes the current structure by
// reference and returns the next one; nothing is mutated in place.
//
// Live invariant: each visible component satisfies
//   amount == round2(monthly_salary * percentage / 100)
// Submit-time invariant (see `validate_allocation`):
//   basic + sum(visible amounts) == monthly_salary, within 0.01

use rust_decimal::Decimal;

use crate::{
    common::{
        error::AppError,
        money::{
            amount_from_percentage, checked_sub, checked_sum, clamp_percentage, format_money, percentage_from_amount,
            round2,
        },
    },
    models::salary::{Balance, SalaryComponent, SalaryEdit, SalaryStructure, CUSTOM_KEY_PREFIX},
};

/// Largest accepted gap between the declared salary and the sum of its parts.
pub const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

// =========================================================================
//  REDUCER
// =========================================================================

pub fn apply(structure: &SalaryStructure, edit: &SalaryEdit) -> Result<SalaryStructure, AppError> {
    tracing::debug!(?edit, "Applying salary edit");

    match edit {
        SalaryEdit::SetMonthlySalary { amount } => set_monthly_salary(structure, *amount),
        SalaryEdit::SetBasicPercentage { percentage } => set_basic_percentage(structure, *percentage),
        SalaryEdit::SetBasicAmount { amount } => set_basic_amount(structure, *amount),
        SalaryEdit::SetComponentPercentage { key, percentage } => {
            set_component_percentage(structure, key, *percentage)
        }
        SalaryEdit::SetComponentAmount { key, amount } => set_component_amount(structure, key, *amount),
        SalaryEdit::ToggleComponent { key, visible } => toggle_component(structure, key, *visible),
        SalaryEdit::AddCustomComponent { label } => add_custom_component(structure, label),
        SalaryEdit::RemoveCustomComponent { key } => remove_custom_component(structure, key),
    }
}

// =========================================================================
//  TOTAL AND BASIC
// =========================================================================

/// Percentages are the independent variable here: basic and every visible
/// component keep their percentage and get a re-derived amount.
pub fn set_monthly_salary(structure: &SalaryStructure, new_total: Decimal) -> Result<SalaryStructure, AppError> {
    let mut next = structure.clone();
    next.monthly_salary = new_total;
    next.basic = amount_from_percentage(new_total, next.basic_percentage)?;

    for component in next.components.iter_mut().filter(|c| c.visible) {
        component.amount = amount_from_percentage(new_total, component.percentage)?;
    }
    Ok(next)
}

pub fn set_basic_percentage(structure: &SalaryStructure, pct: Decimal) -> Result<SalaryStructure, AppError> {
    let mut next = structure.clone();
    next.basic_percentage = clamp_percentage(pct);
    next.basic = amount_from_percentage(next.monthly_salary, next.basic_percentage)?;
    Ok(next)
}

pub fn set_basic_amount(structure: &SalaryStructure, amount: Decimal) -> Result<SalaryStructure, AppError> {
    let mut next = structure.clone();
    next.basic = round2(amount.max(Decimal::ZERO));
    next.basic_percentage = percentage_from_amount(next.monthly_salary, next.basic)?;
    Ok(next)
}

// =========================================================================
//  COMPONENTS
// =========================================================================

fn edit_component<F>(structure: &SalaryStructure, key: &str, edit: F) -> Result<SalaryStructure, AppError>
where
    F: FnOnce(&mut SalaryComponent, Decimal) -> Result<(), AppError>,
{
    let mut next = structure.clone();
    let monthly = next.monthly_salary;
    let component = next
        .component_mut(key)
        .ok_or_else(|| AppError::UnknownSalaryComponent(key.to_string()))?;
    edit(component, monthly)?;
    Ok(next)
}

pub fn set_component_percentage(
    structure: &SalaryStructure,
    key: &str,
    pct: Decimal,
) -> Result<SalaryStructure, AppError> {
    edit_component(structure, key, |component, monthly| {
        component.percentage = clamp_percentage(pct);
        component.amount = amount_from_percentage(monthly, component.percentage)?;
        Ok(())
    })
}

pub fn set_component_amount(
    structure: &SalaryStructure,
    key: &str,
    amount: Decimal,
) -> Result<SalaryStructure, AppError> {
    edit_component(structure, key, |component, monthly| {
        component.amount = round2(amount.max(Decimal::ZERO));
        component.percentage = percentage_from_amount(monthly, component.amount)?;
        Ok(())
    })
}

/// Showing a component pre-fills it with whatever room is left;
/// hiding it zeroes it so it no longer counts towards the total.
pub fn toggle_component(
    structure: &SalaryStructure,
    key: &str,
    visible: bool,
) -> Result<SalaryStructure, AppError> {
    let current = structure
        .component(key)
        .ok_or_else(|| AppError::UnknownSalaryComponent(key.to_string()))?;
    if current.visible == visible {
        return Ok(structure.clone());
    }

    let balance = calculate_balance_for_new_component(structure, Some(key))?;
    edit_component(structure, key, |component, _| {
        component.visible = visible;
        if visible {
            component.amount = balance.amount;
            component.percentage = balance.percentage;
        } else {
            component.amount = round2(Decimal::ZERO);
            component.percentage = Decimal::ZERO;
        }
        Ok(())
    })
}

pub fn add_custom_component(structure: &SalaryStructure, label: &str) -> Result<SalaryStructure, AppError> {
    let balance = calculate_balance_for_new_component(structure, None)?;
    let key = structure.next_custom_key();
    let label = match label.trim() {
        "" => format!("Custom Allowance {}", key.trim_start_matches(CUSTOM_KEY_PREFIX)),
        trimmed => trimmed.to_string(),
    };

    let mut next = structure.clone();
    next.components.push(SalaryComponent {
        key,
        label,
        amount: balance.amount,
        percentage: balance.percentage,
        visible: true,
        custom: true,
    });
    Ok(next)
}

pub fn remove_custom_component(structure: &SalaryStructure, key: &str) -> Result<SalaryStructure, AppError> {
    let component = structure
        .component(key)
        .ok_or_else(|| AppError::UnknownSalaryComponent(key.to_string()))?;
    if !component.custom {
        return Err(AppError::ComponentNotRemovable(key.to_string()));
    }

    let mut next = structure.clone();
    next.components.retain(|c| c.key != key);
    Ok(next)
}

// =========================================================================
//  DERIVED VALUES
// =========================================================================

/// Room left for one more allowance, never negative.
pub fn calculate_balance_for_new_component(
    structure: &SalaryStructure,
    excluding_key: Option<&str>,
) -> Result<Balance, AppError> {
    let monthly = structure.monthly_salary;
    if monthly <= Decimal::ZERO {
        return Ok(Balance { amount: round2(Decimal::ZERO), percentage: Decimal::ZERO });
    }

    let used = checked_sum(
        std::iter::once(structure.basic).chain(
            structure
                .visible_components()
                .filter(|c| Some(c.key.as_str()) != excluding_key)
                .map(|c| c.amount),
        ),
    )?;
    let balance = checked_sub(monthly, used)?.max(Decimal::ZERO);

    let percentage = if balance > Decimal::ZERO {
        percentage_from_amount(monthly, balance)?
    } else {
        Decimal::ZERO
    };
    Ok(Balance { amount: round2(balance), percentage })
}

/// Basic plus every visible component, standard and custom alike.
pub fn calculate_total(structure: &SalaryStructure) -> Result<Decimal, AppError> {
    checked_sum(std::iter::once(structure.basic).chain(structure.visible_components().map(|c| c.amount)))
}

/// Gate for leaving the salary step and for final submission.
pub fn validate_allocation(structure: &SalaryStructure, currency: &str) -> Result<(), AppError> {
    if structure.monthly_salary <= Decimal::ZERO {
        return Err(AppError::NonPositiveSalary);
    }

    let total = calculate_total(structure)?;
    if checked_sub(total, structure.monthly_salary)?.abs() > TOLERANCE {
        tracing::info!(
            "Salary allocation rejected: total {} vs monthly {}",
            total,
            structure.monthly_salary
        );
        return Err(AppError::SalaryMismatch {
            expected: format_money(currency, structure.monthly_salary),
            actual: format_money(currency, total),
        });
    }
    Ok(())
}
