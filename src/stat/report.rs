//! Period reports over the estate: rent roll, arrears and vacancies.
//!
//! Rent is billed in whole months. A tenant owes one month of their
//! category's rent for every month of the window that is not earlier than
//! the month they moved in.

use super::datatype::*;
use super::error::Result;
use super::ledger::Estate;
use super::month::{BillingMonth, expand_month_range};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyScope {
    All,
    One(PropertyId),
}

impl PropertyScope {
    /// `"all"` or a property id, as the report endpoints receive it.
    pub fn parse(s: &str) -> std::result::Result<Self, uuid::Error> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::One)
    }

    fn includes(&self, property: &Property) -> bool {
        match self {
            Self::All => true,
            Self::One(id) => property.id == *id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub start: BillingMonth,
    pub end: BillingMonth,
}

impl ReportWindow {
    pub fn new(start: BillingMonth, end: BillingMonth) -> Self {
        Self { start, end }
    }

    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(BillingMonth::of(start), BillingMonth::of(end))
    }

    /// Window bounds as `YYYY-MM` or `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self::new(start.parse()?, end.parse()?))
    }

    pub fn months(&self) -> Vec<BillingMonth> {
        expand_month_range(self.start, self.end)
    }

    /// Months of the window a tenant who moved in on `move_in` is billed for.
    pub fn billed_months(&self, move_in: NaiveDate) -> Vec<BillingMonth> {
        let first = BillingMonth::of(move_in);
        self.months().into_iter().filter(|m| *m >= first).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentRollItem {
    pub tenant_name: String,
    pub property_name: String,
    pub unit_number: String,
    pub monthly_rent: Decimal,
    pub expected_rent: Decimal,
    pub amount_paid: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrearsItem {
    pub tenant_name: String,
    pub property_name: String,
    pub unit_number: String,
    pub total_billed: Decimal,
    pub total_paid: Decimal,
    pub arrears: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VacancyItem {
    pub property_name: String,
    pub unit_number: String,
    pub category_name: String,
    pub monthly_rent: Decimal,
}

/// An occupied unit with its resolved tenant.
pub(crate) struct Occupancy<'a> {
    pub property: &'a Property,
    pub category: &'a UnitCategory,
    pub unit: &'a Unit,
    pub tenant: &'a Tenant,
}

impl Estate {
    /// Occupied units in store order. Units pointing at a tenant the store
    /// does not know are skipped.
    pub(crate) fn occupancies(&self, scope: PropertyScope) -> impl Iterator<Item = Occupancy<'_>> {
        self.properties
            .iter()
            .filter(move |p| scope.includes(p))
            .flat_map(move |property| {
                property.categories.iter().flat_map(move |category| {
                    category.units.iter().filter_map(move |unit| {
                        let tenant_id = unit.tenant_id?;
                        let tenant = self.tenants.iter().find(|t| t.id == tenant_id)?;
                        Some(Occupancy {
                            property,
                            category,
                            unit,
                            tenant,
                        })
                    })
                })
            })
    }

    pub fn rent_roll(&self, scope: PropertyScope, window: ReportWindow) -> Vec<RentRollItem> {
        let months = window.months();
        self.occupancies(scope)
            .map(|o| {
                let billed = window.billed_months(o.tenant.move_in_date).len();
                let expected_rent = o.category.rent * Decimal::from(billed);
                let amount_paid = self.paid_by(o.tenant.id, Some(months.as_slice()));
                RentRollItem {
                    tenant_name: o.tenant.name.clone(),
                    property_name: o.property.name.clone(),
                    unit_number: o.unit.unit_number.clone(),
                    monthly_rent: o.category.rent,
                    expected_rent,
                    amount_paid,
                    balance: expected_rent - amount_paid,
                }
            })
            .collect()
    }

    /// Tenants who owe money for the window. Payments only count against
    /// the months actually billed.
    pub fn arrears_report(&self, scope: PropertyScope, window: ReportWindow) -> Vec<ArrearsItem> {
        let mut report = Vec::new();
        for o in self.occupancies(scope) {
            let billed = window.billed_months(o.tenant.move_in_date);
            if billed.is_empty() {
                continue;
            }
            let total_billed = o.category.rent * Decimal::from(billed.len());
            let total_paid = self.paid_by(o.tenant.id, Some(billed.as_slice()));
            let arrears = total_billed - total_paid;
            if arrears > Decimal::ZERO {
                report.push(ArrearsItem {
                    tenant_name: o.tenant.name.clone(),
                    property_name: o.property.name.clone(),
                    unit_number: o.unit.unit_number.clone(),
                    total_billed,
                    total_paid,
                    arrears,
                });
            }
        }
        report
    }

    pub fn vacancy_report(&self, scope: PropertyScope) -> Vec<VacancyItem> {
        let mut report = Vec::new();
        for property in self.properties.iter().filter(|p| scope.includes(p)) {
            for category in &property.categories {
                for unit in category.units.iter().filter(|u| !u.is_occupied()) {
                    report.push(VacancyItem {
                        property_name: property.name.clone(),
                        unit_number: unit.unit_number.clone(),
                        category_name: category.name.clone(),
                        monthly_rent: category.rent,
                    });
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn ym(y: i32, m: u32) -> BillingMonth {
        BillingMonth::new(y, m).unwrap()
    }

    fn kes(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn billing_starts_at_move_in_month() {
        let window = ReportWindow::new(ym(2023, 3), ym(2023, 6));
        let move_in = NaiveDate::from_ymd_opt(2023, 5, 31).unwrap();
        assert_eq!(window.billed_months(move_in), vec![ym(2023, 5), ym(2023, 6)]);
        let later = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();
        assert!(window.billed_months(later).is_empty());
    }

    #[test]
    fn window_parses_dates_to_months() {
        let window = ReportWindow::parse("2023-09-14", "2023-10").unwrap();
        assert_eq!(window, ReportWindow::new(ym(2023, 9), ym(2023, 10)));
        assert!(ReportWindow::parse("yesterday", "2023-10").is_err());
    }

    #[test]
    fn scope_parses_all_or_id() {
        assert_eq!(PropertyScope::parse("ALL").unwrap(), PropertyScope::All);
        let id = Uuid::new_v4();
        assert_eq!(PropertyScope::parse(&id.to_string()).unwrap(), PropertyScope::One(id));
        assert!(PropertyScope::parse("p1").is_err());
    }

    #[test]
    fn arrears_for_october_lists_partial_payer_and_non_payers() {
        let estate = Estate::build_demo_estate();
        let window = ReportWindow::new(ym(2023, 10), ym(2023, 10));
        let report = estate.arrears_report(PropertyScope::All, window);
        let rows: Vec<(&str, Decimal)> = report.iter().map(|r| (r.tenant_name.as_str(), r.arrears)).collect();
        assert_eq!(rows, vec![("Diana Prince", kes(20_000)), ("Ethan Hunt", kes(18_000))]);
    }

    #[test]
    fn arrears_accumulate_over_months_and_clip_to_move_in() {
        let estate = Estate::build_demo_estate();
        // Ethan moved in 2023-08 and only paid September.
        let window = ReportWindow::new(ym(2023, 1), ym(2023, 10));
        let ethan = estate
            .arrears_report(PropertyScope::All, window)
            .into_iter()
            .find(|r| r.tenant_name == "Ethan Hunt")
            .unwrap();
        assert_eq!(ethan.total_billed, kes(3 * 18_000));
        assert_eq!(ethan.total_paid, kes(18_000));
        assert_eq!(ethan.arrears, kes(36_000));
    }

    #[test]
    fn arrears_skip_tenants_not_yet_moved_in() {
        let estate = Estate::build_demo_estate();
        let window = ReportWindow::new(ym(2023, 6), ym(2023, 7));
        let report = estate.arrears_report(PropertyScope::All, window);
        assert!(report.iter().all(|r| r.tenant_name != "Ethan Hunt"));
    }

    #[test]
    fn rent_roll_reports_balance_per_tenant() {
        let estate = Estate::build_demo_estate();
        let window = ReportWindow::new(ym(2023, 10), ym(2023, 10));
        let roll = estate.rent_roll(PropertyScope::All, window);
        assert_eq!(roll.len(), 5);
        let diana = roll.iter().find(|r| r.tenant_name == "Diana Prince").unwrap();
        assert_eq!(diana.unit_number, "B2");
        assert_eq!(diana.expected_rent, kes(40_000));
        assert_eq!(diana.amount_paid, kes(20_000));
        assert_eq!(diana.balance, kes(20_000));
        let alice = roll.iter().find(|r| r.tenant_name == "Alice Smith").unwrap();
        assert_eq!(alice.balance, Decimal::ZERO);
    }

    #[test]
    fn rent_roll_over_two_months_shows_prepayment_as_credit() {
        let mut estate = Estate::build_demo_estate();
        let bob = estate.tenants.iter().find(|t| t.name == "Bob Johnson").unwrap().id;
        let on = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        for (amount, month) in [(50_000, ym(2023, 9)), (25_000, ym(2023, 11))] {
            estate.payments.push(Payment {
                id: Uuid::new_v4(),
                tenant_id: bob,
                amount: kes(amount),
                payment_date: on(2023, 9, 1),
                month_paid_for: month,
            });
        }

        let window = ReportWindow::from_dates(on(2023, 9, 1), on(2023, 10, 31));
        let roll = estate.rent_roll(PropertyScope::All, window);
        let row = |name: &str| roll.iter().find(|r| r.tenant_name == name).unwrap().clone();

        let bob = row("Bob Johnson");
        assert_eq!(bob.monthly_rent, kes(25_000));
        assert_eq!(bob.expected_rent, kes(50_000));
        // November is outside the window.
        assert_eq!(bob.amount_paid, kes(75_000));
        assert_eq!(bob.balance, kes(-25_000));

        let alice = row("Alice Smith");
        assert_eq!(alice.expected_rent, kes(50_000));
        assert_eq!(alice.balance, Decimal::ZERO);

        let ethan = row("Ethan Hunt");
        assert_eq!(ethan.expected_rent, kes(36_000));
        assert_eq!(ethan.balance, kes(18_000));
    }

    #[test]
    fn vacancy_report_filters_by_property() {
        let estate = Estate::build_demo_estate();
        let all = estate.vacancy_report(PropertyScope::All);
        let units: Vec<&str> = all.iter().map(|v| v.unit_number.as_str()).collect();
        assert_eq!(units, vec!["A2", "S1"]);

        let kicc = estate.properties[0].id;
        let one = estate.vacancy_report(PropertyScope::One(kicc));
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].category_name, "1 Bedroom");
        assert_eq!(one[0].monthly_rent, kes(25_000));

        assert!(estate.vacancy_report(PropertyScope::One(Uuid::new_v4())).is_empty());
    }
}
