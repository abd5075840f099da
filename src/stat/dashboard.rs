use super::datatype::*;
use super::error::Result;
use super::ledger::Estate;
use super::month::{BillingMonth, months_between_inclusive};
use super::report::PropertyScope;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub occupancy_rate: f64,
    pub total_units: usize,
    pub occupied_units: usize,
    pub vacant_units: usize,
    pub expected_income: Decimal,
    pub actual_income: Decimal,
    pub total_arrears: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySummary {
    pub id: PropertyId,
    pub name: String,
    pub occupancy_rate: f64,
    pub total_arrears: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyStats {
    pub occupancy_rate: f64,
    pub total_units: usize,
    pub occupied_units: usize,
    pub tenant_count: usize,
    pub expected_income: Decimal,
    pub arrears: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub month: BillingMonth,
    pub expected: Decimal,
    pub actual: Decimal,
}

/// Percentage of occupied units, 0 for an empty portfolio.
pub fn occupancy_rate(occupied: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    occupied as f64 / total as f64 * 100.0
}

#[derive(Debug, Default, Clone, Copy)]
struct UnitCount {
    total: usize,
    occupied: usize,
    expected: Decimal,
}

fn count_units<'a>(categories: impl IntoIterator<Item = &'a UnitCategory>) -> UnitCount {
    let mut count = UnitCount::default();
    for category in categories {
        let occupied = category.occupied_units().count();
        count.total += category.units.len();
        count.occupied += occupied;
        count.expected += category.rent * Decimal::from(occupied);
    }
    count
}

impl Estate {
    /// Portfolio-wide figures for one month. Arrears here are the month's
    /// shortfall only: expected income minus what was paid for that month.
    pub fn dashboard_stats(&self, as_of: BillingMonth) -> DashboardStats {
        let count = count_units(self.properties.iter().flat_map(|p| p.categories.iter()));
        let actual_income = self.income_for(as_of);
        let shortfall = count.expected - actual_income;
        DashboardStats {
            occupancy_rate: occupancy_rate(count.occupied, count.total),
            total_units: count.total,
            occupied_units: count.occupied,
            vacant_units: count.total - count.occupied,
            expected_income: count.expected,
            actual_income,
            total_arrears: shortfall.max(Decimal::ZERO),
        }
    }

    pub fn property_summaries(&self, as_of: BillingMonth) -> Vec<PropertySummary> {
        self.properties
            .iter()
            .map(|p| {
                let count = count_units(&p.categories);
                PropertySummary {
                    id: p.id,
                    name: p.name.clone(),
                    occupancy_rate: occupancy_rate(count.occupied, count.total),
                    total_arrears: self.outstanding_balance(PropertyScope::One(p.id), as_of),
                }
            })
            .collect()
    }

    pub fn property_stats(&self, property_id: PropertyId, as_of: BillingMonth) -> Result<PropertyStats> {
        let property = self.property(property_id)?;
        let count = count_units(&property.categories);
        Ok(PropertyStats {
            occupancy_rate: occupancy_rate(count.occupied, count.total),
            total_units: count.total,
            occupied_units: count.occupied,
            tenant_count: self.tenants_for_property(property_id).len(),
            expected_income: count.expected,
            arrears: self.outstanding_balance(PropertyScope::One(property_id), as_of),
        })
    }

    /// Expected vs. collected rent for the `months` months ending at `as_of`,
    /// oldest first. A unit only counts toward a month once its current
    /// tenant had moved in.
    pub fn income_trend(&self, as_of: BillingMonth, months: u32) -> Vec<TrendPoint> {
        (0..months as i32)
            .rev()
            .map(|back| {
                let month = as_of.add_months(-back);
                let expected: Decimal = self
                    .occupancies(PropertyScope::All)
                    .filter(|o| BillingMonth::of(o.tenant.move_in_date) <= month)
                    .map(|o| o.category.rent)
                    .sum();
                TrendPoint {
                    month,
                    expected,
                    actual: self.income_for(month),
                }
            })
            .collect()
    }

    pub fn income_for(&self, month: BillingMonth) -> Decimal {
        self.payments
            .iter()
            .filter(|p| p.month_paid_for == month)
            .map(|p| p.amount)
            .sum()
    }

    /// Lifetime balance: every month from move-in through `as_of` billed,
    /// every payment credited. Tenants in credit do not offset others.
    fn outstanding_balance(&self, scope: PropertyScope, as_of: BillingMonth) -> Decimal {
        self.occupancies(scope)
            .map(|o| {
                let months = months_between_inclusive(BillingMonth::of(o.tenant.move_in_date), as_of);
                if months == 0 {
                    return Decimal::ZERO;
                }
                let billed = o.category.rent * Decimal::from(months);
                (billed - self.paid_by(o.tenant.id, None)).max(Decimal::ZERO)
            })
            .sum()
    }
}
