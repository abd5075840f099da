use super::datatype::{TenantAssignment, TenantInput, UnitCategory};
use super::error::{EstateError, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

pub const MAX_UNIT_SPAN: u32 = 100;
pub const IMPORT_HEADERS: [&str; 5] = ["unitNumber", "name", "phone", "email", "moveInDate"];

/// Unit numbers `prefix{start}` through `prefix{end}`.
pub fn unit_number_range(prefix: &str, start: u32, end: u32) -> Result<Vec<String>> {
    if start > end {
        return Err(EstateError::BadRange(
            "the starting number cannot be greater than the ending number".into(),
        ));
    }
    if end - start > MAX_UNIT_SPAN {
        return Err(EstateError::BadRange(format!(
            "at most {} units can be created at a time",
            MAX_UNIT_SPAN + 1
        )));
    }
    Ok((start..=end).map(|n| format!("{}{}", prefix.trim(), n)).collect())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportValidation {
    pub valid: Vec<TenantAssignment>,
    pub errors: Vec<String>,
    /// Data rows that failed a check. File-level problems such as a bad
    /// header are reported in `errors` only.
    pub rejected_rows: usize,
}

/// Checks an uploaded tenant sheet against the vacant units of `category`.
///
/// Rows are numbered from 1 after the header. A unit may only be claimed
/// once per file.
pub fn parse_tenant_import(text: &str, category: &UnitCategory) -> Result<ImportValidation> {
    let cleaned: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    if cleaned.is_empty() {
        return Ok(ImportValidation {
            errors: vec!["file is empty or could not be read".into()],
            ..Default::default()
        });
    }
    let joined = cleaned.join("\n");
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(joined.as_bytes());

    let headers = reader.headers()?.clone();
    if !headers.iter().eq(IMPORT_HEADERS) {
        return Ok(ImportValidation {
            errors: vec!["invalid CSV headers, expected unitNumber,name,phone,email,moveInDate".into()],
            ..Default::default()
        });
    }

    let mut vacant: HashSet<&str> = category
        .units
        .iter()
        .filter(|u| !u.is_occupied())
        .map(|u| u.unit_number.as_str())
        .collect();
    let mut result = ImportValidation::default();

    for (index, record) in reader.records().enumerate() {
        let row = index + 1;
        let record = record?;
        match check_row(row, &record, &mut vacant) {
            Ok(assignment) => result.valid.push(assignment),
            Err(reason) => {
                result.errors.push(reason);
                result.rejected_rows += 1;
            }
        }
    }
    Ok(result)
}

fn check_row(
    row: usize,
    record: &csv::StringRecord,
    vacant: &mut HashSet<&str>,
) -> std::result::Result<TenantAssignment, String> {
    let fields: Vec<&str> = record.iter().collect();
    let [unit_number, name, phone, email, move_in] = fields[..] else {
        return Err(format!("row {row}: incorrect number of columns"));
    };
    if fields.iter().any(|f| f.is_empty()) {
        return Err(format!("row {row} ({unit_number}): missing one or more required fields"));
    }
    let Ok(move_in_date) = NaiveDate::parse_from_str(move_in, "%Y-%m-%d") else {
        return Err(format!("row {row} ({unit_number}): invalid move-in date `{move_in}`"));
    };
    if !vacant.remove(unit_number) {
        return Err(format!(
            "row {row}: unit \"{unit_number}\" is not vacant, does not exist in this category, or is already in this upload"
        ));
    }
    Ok(TenantAssignment {
        unit_number: unit_number.to_string(),
        tenant: TenantInput {
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            move_in_date,
        },
    })
}
