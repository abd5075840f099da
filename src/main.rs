use anyhow::Result;
use chrono::Local;
use rentledger::stat::*;

fn main() -> Result<()> {
    let estate = match std::env::args().nth(1) {
        Some(path) => load_estate_json(&path)?,
        None => Estate::build_demo_estate(),
    };
    let as_of = match std::env::args().nth(2) {
        Some(month) => month.parse::<BillingMonth>()?,
        None => BillingMonth::of(Local::now().date_naive()),
    };

    let stats = estate.dashboard_stats(as_of);
    println!("== Dashboard {as_of} ==\n");
    println!(
        "occupancy {:>5.1}% | units {} occupied / {} vacant",
        stats.occupancy_rate, stats.occupied_units, stats.vacant_units
    );
    println!(
        "expected {:>10} | collected {:>10} | arrears {:>10}",
        stats.expected_income, stats.actual_income, stats.total_arrears
    );

    println!("\n== Properties ==\n");
    for s in estate.property_summaries(as_of) {
        println!(
            "{:<20} | occupancy {:>5.1}% | arrears {:>10}",
            s.name, s.occupancy_rate, s.total_arrears
        );
    }

    let window = ReportWindow::from_dates(as_of.add_months(-2).first_day(), as_of.last_day());
    println!("\n== Arrears {} .. {} ==\n", window.start, window.end);
    for a in estate.arrears_report(PropertyScope::All, window) {
        println!(
            "{:<16} {:<20} {:<5} | billed {:>9} | paid {:>9} | owes {:>9}",
            a.tenant_name, a.property_name, a.unit_number, a.total_billed, a.total_paid, a.arrears
        );
    }

    println!("\n== Vacant units ==\n");
    for v in estate.vacancy_report(PropertyScope::All) {
        println!(
            "{:<20} {:<5} {:<12} | rent {:>9}",
            v.property_name, v.unit_number, v.category_name, v.monthly_rent
        );
    }
    Ok(())
}
