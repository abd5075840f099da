use super::datatype::*;
use super::ledger::Estate;
use super::month::BillingMonth;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

struct SeedTenant {
    name: &'static str,
    phone: &'static str,
    email: &'static str,
    move_in: NaiveDate,
}

impl Estate {
    /// Two Nairobi properties with a few tenants and the October 2023 rent
    /// run, one of them a partial payment.
    pub fn build_demo_estate() -> Estate {
        let landlord = Landlord {
            id: Uuid::new_v4(),
            name: "John Doe Properties".to_string(),
        };
        let mut estate = Estate {
            landlords: vec![landlord.clone()],
            ..Default::default()
        };

        let mut kicc = Property::new(landlord.id, "KICC Apartments", "Nairobi CBD");
        let mut one_bed = UnitCategory::new("1 Bedroom", Decimal::from(25_000));
        let mut two_bed = UnitCategory::new("2 Bedroom", Decimal::from(40_000));
        let mut westlands = Property::new(landlord.id, "Westlands Heights", "Westlands, Nairobi");
        let mut studio = UnitCategory::new("Studio", Decimal::from(18_000));

        let mut seat = |property: &Property, category: &mut UnitCategory, number: &str, seed: Option<SeedTenant>| {
            let mut unit = Unit::new(number);
            if let Some(seed) = seed {
                let tenant = Tenant {
                    id: Uuid::new_v4(),
                    name: seed.name.to_string(),
                    phone: seed.phone.to_string(),
                    email: seed.email.to_string(),
                    move_in_date: seed.move_in,
                    unit_id: unit.id,
                    property_id: property.id,
                };
                unit.tenant_id = Some(tenant.id);
                estate.tenants.push(tenant);
            }
            category.units.push(unit);
        };

        seat(&kicc, &mut one_bed, "A1", Some(SeedTenant {
            name: "Alice Smith",
            phone: "0712345678",
            email: "alice@example.com",
            move_in: date(2023, 1, 15),
        }));
        seat(&kicc, &mut one_bed, "A2", None);
        seat(&kicc, &mut one_bed, "A3", Some(SeedTenant {
            name: "Bob Johnson",
            phone: "0723456789",
            email: "bob@example.com",
            move_in: date(2022, 11, 20),
        }));
        seat(&kicc, &mut two_bed, "B1", Some(SeedTenant {
            name: "Charlie Brown",
            phone: "0734567890",
            email: "charlie@example.com",
            move_in: date(2023, 5, 10),
        }));
        seat(&kicc, &mut two_bed, "B2", Some(SeedTenant {
            name: "Diana Prince",
            phone: "0745678901",
            email: "diana@example.com",
            move_in: date(2023, 2, 1),
        }));
        seat(&westlands, &mut studio, "S1", None);
        seat(&westlands, &mut studio, "S2", Some(SeedTenant {
            name: "Ethan Hunt",
            phone: "0756789012",
            email: "ethan@example.com",
            move_in: date(2023, 8, 1),
        }));

        kicc.categories = vec![one_bed, two_bed];
        westlands.categories = vec![studio];
        estate.properties = vec![kicc, westlands];

        let paid = [
            (0, 25_000, date(2023, 10, 5)),
            (1, 25_000, date(2023, 10, 3)),
            (2, 40_000, date(2023, 10, 1)),
            (3, 20_000, date(2023, 10, 6)),
            (4, 18_000, date(2023, 9, 2)),
            (0, 25_000, date(2023, 9, 4)),
        ];
        estate.payments = paid
            .iter()
            .map(|&(tenant, amount, payment_date)| Payment {
                id: Uuid::new_v4(),
                tenant_id: estate.tenants[tenant].id,
                amount: Decimal::from(amount),
                payment_date,
                month_paid_for: BillingMonth::of(payment_date),
            })
            .collect();
        estate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_estate_is_consistent() {
        let estate = Estate::build_demo_estate();
        assert_eq!(estate.properties.len(), 2);
        assert_eq!(estate.tenants.len(), 5);
        assert_eq!(estate.payments.len(), 6);
        for tenant in &estate.tenants {
            let property = estate.property(tenant.property_id).unwrap();
            let unit = property.all_units().find(|u| u.id == tenant.unit_id).unwrap();
            assert_eq!(unit.tenant_id, Some(tenant.id));
        }
    }
}
