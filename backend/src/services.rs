use crate::routes::AppState;
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use chrono::Local;
use rentledger::stat::{
    ArrearsItem, BillingMonth, BulkOutcome, CategoryInput, DashboardStats, EstateError, Payment,
    PaymentHistory, PaymentInput, Property, PropertyInput, PropertyScope, PropertyStats,
    PropertySummary, RentRollItem, ReportWindow, Tenant, TenantInput, TrendPoint, Unit,
    UnitCategory, VacancyItem, parse_tenant_import, unit_number_range,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

fn reject(e: EstateError) -> (StatusCode, String) {
    let status = if e.is_not_found() {
        StatusCode::NOT_FOUND
    } else if e.is_conflict() {
        StatusCode::CONFLICT
    } else {
        match e {
            EstateError::Io(_) | EstateError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    };
    if status != StatusCode::NOT_FOUND {
        warn!(%status, error = %e, "request refused");
    }
    (status, e.to_string())
}

fn bad_request(msg: impl Into<String>) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, msg.into())
}

fn current_month() -> BillingMonth {
    let today = Local::now().date_naive();
    BillingMonth::of(today)
}

fn month_or_current(raw: Option<&str>) -> Result<BillingMonth, (StatusCode, String)> {
    match raw {
        Some(m) => m.parse().map_err(reject),
        None => Ok(current_month()),
    }
}

fn scope_from(raw: Option<&str>) -> Result<PropertyScope, (StatusCode, String)> {
    let raw = raw.unwrap_or("all");
    PropertyScope::parse(raw).map_err(|_| bad_request(format!("invalid property `{raw}`")))
}

pub async fn root() -> &'static str {
    "rentledger backend"
}

// --- properties ---

pub async fn list_properties_handler(State(state): State<AppState>) -> Json<Vec<Property>> {
    let estate = state.estate.read().await;
    Json(estate.properties().to_vec())
}

pub async fn get_property_handler(
    State(state): State<AppState>,
    Path(property_id): Path<Uuid>,
) -> ApiResult<Property> {
    let estate = state.estate.read().await;
    let property = estate.property(property_id).map_err(reject)?;
    Ok(Json(property.clone()))
}

pub async fn create_property_handler(
    State(state): State<AppState>,
    Json(req): Json<PropertyInput>,
) -> Result<(StatusCode, Json<Property>), (StatusCode, String)> {
    let mut estate = state.estate.write().await;
    let property = estate.create_property(req).map_err(reject)?;
    Ok((StatusCode::CREATED, Json(property)))
}

pub async fn update_property_handler(
    State(state): State<AppState>,
    Path(property_id): Path<Uuid>,
    Json(req): Json<PropertyInput>,
) -> ApiResult<Property> {
    let mut estate = state.estate.write().await;
    let property = estate.update_property(property_id, req).map_err(reject)?;
    Ok(Json(property))
}

pub async fn delete_property_handler(
    State(state): State<AppState>,
    Path(property_id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut estate = state.estate.write().await;
    estate.delete_property(property_id).map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

pub async fn property_stats_handler(
    State(state): State<AppState>,
    Path(property_id): Path<Uuid>,
    Query(q): Query<MonthQuery>,
) -> ApiResult<PropertyStats> {
    let as_of = month_or_current(q.month.as_deref())?;
    let estate = state.estate.read().await;
    let stats = estate.property_stats(property_id, as_of).map_err(reject)?;
    Ok(Json(stats))
}

// --- categories ---

pub async fn create_category_handler(
    State(state): State<AppState>,
    Path(property_id): Path<Uuid>,
    Json(req): Json<CategoryInput>,
) -> Result<(StatusCode, Json<UnitCategory>), (StatusCode, String)> {
    let mut estate = state.estate.write().await;
    let category = estate.create_category(property_id, req).map_err(reject)?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category_handler(
    State(state): State<AppState>,
    Path((property_id, category_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<CategoryInput>,
) -> ApiResult<UnitCategory> {
    let mut estate = state.estate.write().await;
    let category = estate
        .update_category(property_id, category_id, req)
        .map_err(reject)?;
    Ok(Json(category))
}

pub async fn delete_category_handler(
    State(state): State<AppState>,
    Path((property_id, category_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut estate = state.estate.write().await;
    estate
        .delete_category(property_id, category_id)
        .map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}

// --- units ---

#[derive(Debug, Deserialize)]
pub struct UnitReq {
    pub unit_number: String,
}

/// Either an explicit list of unit numbers or a numbered range.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BulkUnitsReq {
    Numbers { unit_numbers: Vec<String> },
    Range { prefix: String, start: u32, end: u32 },
}

pub async fn create_unit_handler(
    State(state): State<AppState>,
    Path((property_id, category_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UnitReq>,
) -> Result<(StatusCode, Json<Unit>), (StatusCode, String)> {
    let mut estate = state.estate.write().await;
    let unit = estate
        .create_unit(property_id, category_id, &req.unit_number)
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(unit)))
}

pub async fn create_bulk_units_handler(
    State(state): State<AppState>,
    Path((property_id, category_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<BulkUnitsReq>,
) -> Result<(StatusCode, Json<Vec<Unit>>), (StatusCode, String)> {
    let numbers = match req {
        BulkUnitsReq::Numbers { unit_numbers } => unit_numbers,
        BulkUnitsReq::Range { prefix, start, end } => {
            unit_number_range(&prefix, start, end).map_err(reject)?
        }
    };
    let mut estate = state.estate.write().await;
    let units = estate
        .create_bulk_units(property_id, category_id, &numbers)
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(units)))
}

pub async fn update_unit_handler(
    State(state): State<AppState>,
    Path((property_id, category_id, unit_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(req): Json<UnitReq>,
) -> ApiResult<Unit> {
    let mut estate = state.estate.write().await;
    let unit = estate
        .update_unit(property_id, category_id, unit_id, &req.unit_number)
        .map_err(reject)?;
    Ok(Json(unit))
}

pub async fn delete_unit_handler(
    State(state): State<AppState>,
    Path((property_id, category_id, unit_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut estate = state.estate.write().await;
    estate
        .delete_unit(property_id, category_id, unit_id)
        .map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}

// --- tenants ---

pub async fn list_tenants_handler(State(state): State<AppState>) -> Json<Vec<Tenant>> {
    let estate = state.estate.read().await;
    Json(estate.tenants().to_vec())
}

pub async fn list_property_tenants_handler(
    State(state): State<AppState>,
    Path(property_id): Path<Uuid>,
) -> ApiResult<Vec<Tenant>> {
    let estate = state.estate.read().await;
    estate.property(property_id).map_err(reject)?;
    let tenants = estate
        .tenants_for_property(property_id)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(tenants))
}

pub async fn assign_tenant_handler(
    State(state): State<AppState>,
    Path((property_id, unit_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<TenantInput>,
) -> Result<(StatusCode, Json<Tenant>), (StatusCode, String)> {
    let mut estate = state.estate.write().await;
    let tenant = estate
        .assign_tenant(property_id, unit_id, req)
        .map_err(reject)?;
    Ok((StatusCode::CREATED, Json(tenant)))
}

pub async fn unassign_tenant_handler(
    State(state): State<AppState>,
    Path((property_id, unit_id, tenant_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<StatusCode, (StatusCode, String)> {
    let mut estate = state.estate.write().await;
    estate
        .unassign_tenant(property_id, unit_id, tenant_id)
        .map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct ImportResp {
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Takes the CSV sheet as the raw body. Rows that fail validation are
/// reported and never reach the assignment step.
pub async fn import_tenants_handler(
    State(state): State<AppState>,
    Path((property_id, category_id)): Path<(Uuid, Uuid)>,
    body: String,
) -> ApiResult<ImportResp> {
    let mut estate = state.estate.write().await;
    let category = estate
        .property(property_id)
        .and_then(|p| {
            p.category(category_id)
                .ok_or(EstateError::CategoryNotFound(category_id))
        })
        .map_err(reject)?;
    let validation = parse_tenant_import(&body, category).map_err(reject)?;
    let outcome = if validation.valid.is_empty() {
        BulkOutcome::default()
    } else {
        estate.assign_multiple_tenants(property_id, category_id, &validation.valid)
    };
    Ok(Json(ImportResp {
        success: outcome.success,
        failed: outcome.failed + validation.rejected_rows,
        errors: validation.errors,
    }))
}

// --- payments ---

pub async fn create_payment_handler(
    State(state): State<AppState>,
    Json(req): Json<PaymentInput>,
) -> Result<(StatusCode, Json<Payment>), (StatusCode, String)> {
    let mut estate = state.estate.write().await;
    let payment = estate.create_payment(req).map_err(reject)?;
    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn list_payments_handler(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> ApiResult<Vec<Payment>> {
    let estate = state.estate.read().await;
    estate.tenant(tenant_id).map_err(reject)?;
    let payments = estate
        .payments_for_tenant(tenant_id)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(payments))
}

pub async fn payment_history_handler(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> ApiResult<PaymentHistory> {
    let estate = state.estate.read().await;
    let history = estate.payment_history(tenant_id).map_err(reject)?;
    Ok(Json(history))
}

// --- dashboard ---

pub async fn dashboard_handler(
    State(state): State<AppState>,
    Query(q): Query<MonthQuery>,
) -> ApiResult<DashboardStats> {
    let as_of = month_or_current(q.month.as_deref())?;
    let estate = state.estate.read().await;
    Ok(Json(estate.dashboard_stats(as_of)))
}

pub async fn property_summaries_handler(
    State(state): State<AppState>,
    Query(q): Query<MonthQuery>,
) -> ApiResult<Vec<PropertySummary>> {
    let as_of = month_or_current(q.month.as_deref())?;
    let estate = state.estate.read().await;
    Ok(Json(estate.property_summaries(as_of)))
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendQuery {
    pub month: Option<String>,
    pub months: Option<u32>,
}

pub async fn income_trend_handler(
    State(state): State<AppState>,
    Query(q): Query<TrendQuery>,
) -> ApiResult<Vec<TrendPoint>> {
    let as_of = month_or_current(q.month.as_deref())?;
    let months = q.months.unwrap_or(6).clamp(1, 24);
    let estate = state.estate.read().await;
    Ok(Json(estate.income_trend(as_of, months)))
}

// --- reports ---

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub property: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl ReportQuery {
    /// Missing bounds default to the current month.
    fn window(&self) -> Result<ReportWindow, (StatusCode, String)> {
        let start = month_or_current(self.start.as_deref())?;
        let end = month_or_current(self.end.as_deref())?;
        if start > end {
            return Err(bad_request(format!("report start {start} is after end {end}")));
        }
        Ok(ReportWindow::new(start, end))
    }
}

pub async fn rent_roll_handler(
    State(state): State<AppState>,
    Query(q): Query<ReportQuery>,
) -> ApiResult<Vec<RentRollItem>> {
    let scope = scope_from(q.property.as_deref())?;
    let window = q.window()?;
    let estate = state.estate.read().await;
    Ok(Json(estate.rent_roll(scope, window)))
}

pub async fn arrears_handler(
    State(state): State<AppState>,
    Query(q): Query<ReportQuery>,
) -> ApiResult<Vec<ArrearsItem>> {
    let scope = scope_from(q.property.as_deref())?;
    let window = q.window()?;
    let estate = state.estate.read().await;
    Ok(Json(estate.arrears_report(scope, window)))
}

pub async fn vacancy_handler(
    State(state): State<AppState>,
    Query(q): Query<ReportQuery>,
) -> ApiResult<Vec<VacancyItem>> {
    let scope = scope_from(q.property.as_deref())?;
    let estate = state.estate.read().await;
    Ok(Json(estate.vacancy_report(scope)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rentledger::stat::Estate;
    use rust_decimal::Decimal;

    fn demo_state() -> AppState {
        AppState::new(Estate::build_demo_estate())
    }

    async fn first_ids(state: &AppState) -> (Uuid, Uuid, Uuid) {
        let estate = state.estate.read().await;
        let p = &estate.properties[0];
        let c = &p.categories[0];
        (p.id, c.id, c.units[1].id)
    }

    fn report_query(start: &str, end: &str) -> ReportQuery {
        ReportQuery {
            property: Some("all".into()),
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }

    #[tokio::test]
    async fn arrears_endpoint_matches_october_run() {
        let state = demo_state();
        let Json(rows) = arrears_handler(State(state), Query(report_query("2023-10-01", "2023-10-31")))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].tenant_name, "Diana Prince");
        assert_eq!(rows[0].arrears, Decimal::from(20_000));
    }

    #[tokio::test]
    async fn reversed_window_is_rejected() {
        let state = demo_state();
        let err = rent_roll_handler(State(state), Query(report_query("2023-10", "2023-09")))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_property_scope_is_rejected() {
        let state = demo_state();
        let q = ReportQuery {
            property: Some("p1".into()),
            ..Default::default()
        };
        let err = vacancy_handler(State(state), Query(q)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn deleting_non_empty_category_conflicts() {
        let state = demo_state();
        let (p, c, _) = first_ids(&state).await;
        let err = delete_category_handler(State(state), Path((p, c)))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn assign_then_pay_then_report() {
        let state = demo_state();
        let (p, _, vacant) = first_ids(&state).await;
        let (status, Json(tenant)) = assign_tenant_handler(
            State(state.clone()),
            Path((p, vacant)),
            Json(TenantInput {
                name: "Faith Wanjiru".into(),
                phone: "0767890123".into(),
                email: "faith@example.com".into(),
                move_in_date: NaiveDate::from_ymd_opt(2023, 10, 12).unwrap(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let again = assign_tenant_handler(
            State(state.clone()),
            Path((p, vacant)),
            Json(TenantInput {
                name: "Late Comer".into(),
                phone: "0".into(),
                email: "late@example.com".into(),
                move_in_date: NaiveDate::from_ymd_opt(2023, 10, 12).unwrap(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(again.0, StatusCode::CONFLICT);

        create_payment_handler(
            State(state.clone()),
            Json(PaymentInput {
                tenant_id: tenant.id,
                amount: Decimal::from(25_000),
                payment_date: NaiveDate::from_ymd_opt(2023, 10, 12).unwrap(),
                month_paid_for: "2023-10".parse().unwrap(),
            }),
        )
        .await
        .unwrap();

        let Json(history) = payment_history_handler(State(state.clone()), Path(tenant.id))
            .await
            .unwrap();
        assert_eq!(history.total_paid, Decimal::from(25_000));

        let Json(vacant_units) = vacancy_handler(State(state), Query(ReportQuery::default()))
            .await
            .unwrap();
        assert_eq!(vacant_units.len(), 1);
        assert_eq!(vacant_units[0].unit_number, "S1");
    }

    #[tokio::test]
    async fn bulk_range_and_import() {
        let state = demo_state();
        let (p, c, _) = first_ids(&state).await;
        let (_, Json(units)) = create_bulk_units_handler(
            State(state.clone()),
            Path((p, c)),
            Json(BulkUnitsReq::Range {
                prefix: "C".into(),
                start: 1,
                end: 3,
            }),
        )
        .await
        .unwrap();
        assert_eq!(units.len(), 3);

        let csv = "unitNumber,name,phone,email,moveInDate\n\
                   C1,Grace,0711,grace@example.com,2023-11-01\n\
                   C1,Dup,0711,dup@example.com,2023-11-01\n\
                   A1,Taken,0711,taken@example.com,2023-11-01\n";
        let Json(resp) = import_tenants_handler(State(state.clone()), Path((p, c)), csv.to_string())
            .await
            .unwrap();
        assert_eq!(resp.success, 1);
        assert_eq!(resp.failed, 2);
        assert_eq!(resp.errors.len(), 2);

        let Json(tenants) = list_property_tenants_handler(State(state), Path(p)).await.unwrap();
        assert!(tenants.iter().any(|t| t.name == "Grace"));
    }

    #[tokio::test]
    async fn bad_import_header_fails_no_rows() {
        let state = demo_state();
        let (p, c, _) = first_ids(&state).await;
        let csv = "unit,name,phone,email,moveInDate\n\
                   A2,Grace,0711,grace@example.com,2023-11-01\n";
        let Json(resp) = import_tenants_handler(State(state), Path((p, c)), csv.to_string())
            .await
            .unwrap();
        assert_eq!(resp.success, 0);
        assert_eq!(resp.failed, 0);
        assert_eq!(resp.errors.len(), 1);
    }

    #[tokio::test]
    async fn out_of_range_month_is_a_bad_request() {
        let state = demo_state();
        let err = income_trend_handler(
            State(state),
            Query(TrendQuery {
                month: Some("200000000-01".into()),
                months: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_rent_is_a_bad_request() {
        let state = demo_state();
        let (p, _, _) = first_ids(&state).await;
        let err = create_category_handler(
            State(state),
            Path(p),
            Json(CategoryInput {
                name: "Penthouse".into(),
                rent: Decimal::MAX / Decimal::from(2),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn dashboard_uses_requested_month() {
        let state = demo_state();
        let Json(stats) = dashboard_handler(
            State(state.clone()),
            Query(MonthQuery {
                month: Some("2023-09".into()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(stats.actual_income, Decimal::from(43_000));

        let err = dashboard_handler(
            State(state),
            Query(MonthQuery {
                month: Some("September".into()),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_property_is_not_found() {
        let state = demo_state();
        let err = get_property_handler(State(state), Path(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }
}
