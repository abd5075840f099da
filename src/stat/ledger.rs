use super::datatype::*;
use super::error::{EstateError, Result};
use super::month::BillingMonth;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{info, warn};
use uuid::Uuid;

/// Everything a landlord tracks: properties with their nested categories and
/// units, the tenants living in those units, and the rent they paid.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estate {
    pub landlords: Vec<Landlord>,
    pub properties: Vec<Property>,
    pub tenants: Vec<Tenant>,
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOutcome {
    pub success: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthPayments {
    pub month: BillingMonth,
    pub total: Decimal,
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentHistory {
    pub tenant_id: TenantId,
    pub months: Vec<MonthPayments>,
    pub total_paid: Decimal,
}

fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EstateError::invalid(field, "must not be blank"));
    }
    Ok(())
}

/// Largest rent or payment the store accepts. Report totals multiply rents
/// by month counts and add them up, which stays well inside `Decimal` below it.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

fn require_amount(field: &'static str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(EstateError::invalid(field, "must be greater than zero"));
    }
    if value > Decimal::from(MAX_AMOUNT) {
        return Err(EstateError::invalid(field, format!("must not exceed {MAX_AMOUNT}")));
    }
    Ok(())
}

fn validate_tenant(input: &TenantInput) -> Result<()> {
    require("tenant name", &input.name)?;
    require("tenant phone", &input.phone)?;
    require("tenant email", &input.email)
}

impl Estate {
    pub fn with_landlord(name: impl Into<String>) -> Self {
        Self {
            landlords: vec![Landlord {
                id: Uuid::new_v4(),
                name: name.into(),
            }],
            ..Default::default()
        }
    }

    // --- properties ---

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn property(&self, id: PropertyId) -> Result<&Property> {
        self.properties
            .iter()
            .find(|p| p.id == id)
            .ok_or(EstateError::PropertyNotFound(id))
    }

    fn property_mut(&mut self, id: PropertyId) -> Result<&mut Property> {
        self.properties
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(EstateError::PropertyNotFound(id))
    }

    fn category_mut(&mut self, property_id: PropertyId, category_id: CategoryId) -> Result<&mut UnitCategory> {
        self.property_mut(property_id)?
            .category_mut(category_id)
            .ok_or(EstateError::CategoryNotFound(category_id))
    }

    /// New properties belong to the first registered landlord.
    pub fn create_property(&mut self, input: PropertyInput) -> Result<Property> {
        require("property name", &input.name)?;
        require("property location", &input.location)?;
        let landlord = self.landlords.first().ok_or(EstateError::NoLandlord)?;
        let property = Property::new(landlord.id, input.name.trim(), input.location.trim());
        info!(property = %property.id, name = %property.name, "property created");
        self.properties.push(property.clone());
        Ok(property)
    }

    pub fn update_property(&mut self, id: PropertyId, input: PropertyInput) -> Result<Property> {
        require("property name", &input.name)?;
        require("property location", &input.location)?;
        let property = self.property_mut(id)?;
        property.name = input.name.trim().to_string();
        property.location = input.location.trim().to_string();
        Ok(property.clone())
    }

    /// Removes the property together with its tenants and their payments.
    pub fn delete_property(&mut self, id: PropertyId) -> Result<()> {
        let before = self.properties.len();
        self.properties.retain(|p| p.id != id);
        if self.properties.len() == before {
            return Err(EstateError::PropertyNotFound(id));
        }
        let removed: HashSet<TenantId> = self
            .tenants
            .iter()
            .filter(|t| t.property_id == id)
            .map(|t| t.id)
            .collect();
        self.tenants.retain(|t| t.property_id != id);
        self.payments.retain(|p| !removed.contains(&p.tenant_id));
        info!(property = %id, tenants = removed.len(), "property deleted");
        Ok(())
    }

    // --- unit categories ---

    pub fn create_category(&mut self, property_id: PropertyId, input: CategoryInput) -> Result<UnitCategory> {
        require("category name", &input.name)?;
        require_amount("rent", input.rent)?;
        let property = self.property_mut(property_id)?;
        let category = UnitCategory::new(input.name.trim(), input.rent);
        property.categories.push(category.clone());
        info!(property = %property_id, category = %category.id, rent = %category.rent, "category created");
        Ok(category)
    }

    pub fn update_category(
        &mut self,
        property_id: PropertyId,
        category_id: CategoryId,
        input: CategoryInput,
    ) -> Result<UnitCategory> {
        require("category name", &input.name)?;
        require_amount("rent", input.rent)?;
        let category = self.category_mut(property_id, category_id)?;
        category.name = input.name.trim().to_string();
        category.rent = input.rent;
        Ok(category.clone())
    }

    pub fn delete_category(&mut self, property_id: PropertyId, category_id: CategoryId) -> Result<()> {
        let property = self.property_mut(property_id)?;
        let category = property
            .category(category_id)
            .ok_or(EstateError::CategoryNotFound(category_id))?;
        if !category.units.is_empty() {
            warn!(category = %category_id, units = category.units.len(), "refusing to delete non-empty category");
            return Err(EstateError::CategoryNotEmpty(category_id));
        }
        property.categories.retain(|c| c.id != category_id);
        Ok(())
    }

    // --- units ---

    pub fn create_unit(
        &mut self,
        property_id: PropertyId,
        category_id: CategoryId,
        unit_number: &str,
    ) -> Result<Unit> {
        require("unit number", unit_number)?;
        let category = self.category_mut(property_id, category_id)?;
        let unit = Unit::new(unit_number.trim());
        category.units.push(unit.clone());
        Ok(unit)
    }

    pub fn create_bulk_units(
        &mut self,
        property_id: PropertyId,
        category_id: CategoryId,
        unit_numbers: &[String],
    ) -> Result<Vec<Unit>> {
        for n in unit_numbers {
            require("unit number", n)?;
        }
        let category = self.category_mut(property_id, category_id)?;
        let units: Vec<Unit> = unit_numbers.iter().map(|n| Unit::new(n.trim())).collect();
        category.units.extend(units.iter().cloned());
        info!(category = %category_id, count = units.len(), "bulk units created");
        Ok(units)
    }

    /// Occupied units cannot be renumbered.
    pub fn update_unit(
        &mut self,
        property_id: PropertyId,
        category_id: CategoryId,
        unit_id: UnitId,
        unit_number: &str,
    ) -> Result<Unit> {
        require("unit number", unit_number)?;
        let category = self.category_mut(property_id, category_id)?;
        let unit = category
            .units
            .iter_mut()
            .find(|u| u.id == unit_id)
            .ok_or(EstateError::UnitNotFound(unit_id))?;
        if unit.is_occupied() {
            warn!(unit = %unit_id, "cannot edit an occupied unit");
            return Err(EstateError::UnitOccupied(unit_id));
        }
        unit.unit_number = unit_number.trim().to_string();
        Ok(unit.clone())
    }

    pub fn delete_unit(&mut self, property_id: PropertyId, category_id: CategoryId, unit_id: UnitId) -> Result<()> {
        let category = self.category_mut(property_id, category_id)?;
        let unit = category
            .units
            .iter()
            .find(|u| u.id == unit_id)
            .ok_or(EstateError::UnitNotFound(unit_id))?;
        if unit.is_occupied() {
            warn!(unit = %unit_id, "cannot delete an occupied unit");
            return Err(EstateError::UnitOccupied(unit_id));
        }
        category.units.retain(|u| u.id != unit_id);
        Ok(())
    }

    // --- tenants ---

    pub fn tenants(&self) -> &[Tenant] {
        &self.tenants
    }

    pub fn tenant(&self, id: TenantId) -> Result<&Tenant> {
        self.tenants
            .iter()
            .find(|t| t.id == id)
            .ok_or(EstateError::TenantNotFound(id))
    }

    pub fn tenants_for_property(&self, property_id: PropertyId) -> Vec<&Tenant> {
        self.tenants
            .iter()
            .filter(|t| t.property_id == property_id)
            .collect()
    }

    pub fn assign_tenant(&mut self, property_id: PropertyId, unit_id: UnitId, input: TenantInput) -> Result<Tenant> {
        validate_tenant(&input)?;
        let unit = self
            .property_mut(property_id)?
            .unit_mut(unit_id)
            .ok_or(EstateError::UnitNotFound(unit_id))?;
        if unit.is_occupied() {
            return Err(EstateError::UnitOccupied(unit_id));
        }
        let tenant = Tenant {
            id: Uuid::new_v4(),
            name: input.name,
            phone: input.phone,
            email: input.email,
            move_in_date: input.move_in_date,
            unit_id,
            property_id,
        };
        unit.tenant_id = Some(tenant.id);
        info!(tenant = %tenant.id, unit = %unit_id, "tenant assigned");
        self.tenants.push(tenant.clone());
        Ok(tenant)
    }

    /// Each row takes the vacant unit with its number; rows whose unit is
    /// missing, occupied, or whose tenant data is incomplete count as failed.
    pub fn assign_multiple_tenants(
        &mut self,
        property_id: PropertyId,
        category_id: CategoryId,
        rows: &[TenantAssignment],
    ) -> BulkOutcome {
        let all_failed = BulkOutcome {
            success: 0,
            failed: rows.len(),
        };
        let Ok(category) = self.category_mut(property_id, category_id) else {
            warn!(property = %property_id, category = %category_id, "bulk assignment target missing");
            return all_failed;
        };
        let mut created = Vec::new();
        for row in rows {
            if validate_tenant(&row.tenant).is_err() {
                continue;
            }
            let Some(unit) = category.vacant_unit_by_number(&row.unit_number) else {
                continue;
            };
            let tenant = Tenant {
                id: Uuid::new_v4(),
                name: row.tenant.name.clone(),
                phone: row.tenant.phone.clone(),
                email: row.tenant.email.clone(),
                move_in_date: row.tenant.move_in_date,
                unit_id: unit.id,
                property_id,
            };
            unit.tenant_id = Some(tenant.id);
            created.push(tenant);
        }
        let outcome = BulkOutcome {
            success: created.len(),
            failed: rows.len() - created.len(),
        };
        self.tenants.extend(created);
        info!(success = outcome.success, failed = outcome.failed, "bulk tenant assignment");
        outcome
    }

    /// Marks the unit vacant. The tenant record itself is kept.
    pub fn unassign_tenant(&mut self, property_id: PropertyId, unit_id: UnitId, tenant_id: TenantId) -> Result<()> {
        let unit = self
            .property_mut(property_id)?
            .unit_mut(unit_id)
            .ok_or(EstateError::UnitNotFound(unit_id))?;
        if unit.tenant_id != Some(tenant_id) {
            return Err(EstateError::TenantNotInUnit {
                unit: unit_id,
                tenant: tenant_id,
            });
        }
        unit.tenant_id = None;
        info!(tenant = %tenant_id, unit = %unit_id, "tenant unassigned");
        Ok(())
    }

    /// Re-checks every stored rent and payment amount, for estates that did
    /// not come in through the validating operations.
    pub fn check_amounts(&self) -> Result<()> {
        for category in self.properties.iter().flat_map(|p| p.categories.iter()) {
            require_amount("rent", category.rent)?;
        }
        for payment in &self.payments {
            require_amount("amount", payment.amount)?;
        }
        Ok(())
    }

    // --- payments ---

    pub fn create_payment(&mut self, input: PaymentInput) -> Result<Payment> {
        require_amount("amount", input.amount)?;
        self.tenant(input.tenant_id)?;
        let payment = Payment {
            id: Uuid::new_v4(),
            tenant_id: input.tenant_id,
            amount: input.amount,
            payment_date: input.payment_date,
            month_paid_for: input.month_paid_for,
        };
        info!(tenant = %payment.tenant_id, amount = %payment.amount, month = %payment.month_paid_for, "payment recorded");
        self.payments.push(payment.clone());
        Ok(payment)
    }

    pub fn payments_for_tenant(&self, tenant_id: TenantId) -> Vec<&Payment> {
        self.payments
            .iter()
            .filter(|p| p.tenant_id == tenant_id)
            .collect()
    }

    /// Sum of a tenant's payments, optionally only those for the given months.
    pub fn paid_by(&self, tenant_id: TenantId, months: Option<&[BillingMonth]>) -> Decimal {
        self.payments
            .iter()
            .filter(|p| p.tenant_id == tenant_id)
            .filter(|p| months.is_none_or(|m| m.contains(&p.month_paid_for)))
            .map(|p| p.amount)
            .sum()
    }

    /// Payments grouped by the month they settle, newest month first.
    pub fn payment_history(&self, tenant_id: TenantId) -> Result<PaymentHistory> {
        self.tenant(tenant_id)?;
        let mut grouped: BTreeMap<BillingMonth, Vec<Payment>> = BTreeMap::new();
        for p in self.payments_for_tenant(tenant_id) {
            grouped.entry(p.month_paid_for).or_default().push(p.clone());
        }
        let months: Vec<MonthPayments> = grouped
            .into_iter()
            .rev()
            .map(|(month, mut payments)| {
                payments.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
                MonthPayments {
                    month,
                    total: payments.iter().map(|p| p.amount).sum(),
                    payments,
                }
            })
            .collect();
        let total_paid = months.iter().map(|m| m.total).sum();
        Ok(PaymentHistory {
            tenant_id,
            months,
            total_paid,
        })
    }
}
