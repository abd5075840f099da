use super::month::BillingMonth;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type LandlordId = Uuid;
pub type PropertyId = Uuid;
pub type CategoryId = Uuid;
pub type UnitId = Uuid;
pub type TenantId = Uuid;
pub type PaymentId = Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landlord {
    pub id: LandlordId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
    pub location: String,
    pub landlord_id: LandlordId,
    #[serde(default)]
    pub categories: Vec<UnitCategory>,
}

/// A kind of unit inside a property (e.g. "1 Bedroom") sharing one monthly rent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitCategory {
    pub id: CategoryId,
    pub name: String,
    pub rent: Decimal,
    #[serde(default)]
    pub units: Vec<Unit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub unit_number: String,
    pub tenant_id: Option<TenantId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub move_in_date: NaiveDate,
    pub unit_id: UnitId,
    pub property_id: PropertyId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub tenant_id: TenantId,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub month_paid_for: BillingMonth,
}

impl Property {
    pub fn new(landlord_id: LandlordId, name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            location: location.into(),
            landlord_id,
            categories: Vec::new(),
        }
    }

    pub fn all_units(&self) -> impl Iterator<Item = &Unit> {
        self.categories.iter().flat_map(|c| c.units.iter())
    }

    pub fn category(&self, id: CategoryId) -> Option<&UnitCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn category_mut(&mut self, id: CategoryId) -> Option<&mut UnitCategory> {
        self.categories.iter_mut().find(|c| c.id == id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.categories
            .iter_mut()
            .flat_map(|c| c.units.iter_mut())
            .find(|u| u.id == id)
    }
}

impl UnitCategory {
    pub fn new(name: impl Into<String>, rent: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            rent,
            units: Vec::new(),
        }
    }

    pub fn occupied_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.is_occupied())
    }

    pub fn vacant_unit_by_number(&mut self, unit_number: &str) -> Option<&mut Unit> {
        self.units
            .iter_mut()
            .find(|u| u.unit_number == unit_number && !u.is_occupied())
    }
}

impl Unit {
    pub fn new(unit_number: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            unit_number: unit_number.into(),
            tenant_id: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.tenant_id.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyInput {
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub rent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantInput {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub move_in_date: NaiveDate,
}

/// One row of a bulk tenant assignment: the target unit by number plus the tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantAssignment {
    pub unit_number: String,
    #[serde(flatten)]
    pub tenant: TenantInput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    pub tenant_id: TenantId,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub month_paid_for: BillingMonth,
}
