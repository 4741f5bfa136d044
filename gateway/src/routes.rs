use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use country_risk::{parse_document, Country, RiskCategory, RiskStats, RISK_CATEGORIES};

use crate::error::ApiError;
use crate::AppState;

const NOT_ASSESSED: &str = "Not Assessed";

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Serialize)]
pub struct CountriesResponse {
    pub success: bool,
    pub count: usize,
    pub countries: Vec<Country>,
}

#[derive(Serialize)]
pub struct CountryResponse {
    pub success: bool,
    pub country: Country,
    pub risk_assessment: Value,
}

#[derive(Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: &'static [RiskCategory],
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum CountryRiskResponse {
    Assessed {
        success: bool,
        country_code: String,
        risk_assessment: Value,
    },
    NotAssessed {
        success: bool,
        country_code: String,
        risk_scores: Map<String, Value>,
        overall_risk: &'static str,
        message: &'static str,
    },
}

#[derive(Serialize)]
pub struct UpdateRiskResponse {
    pub success: bool,
    pub message: &'static str,
    pub country_code: String,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub count: usize,
    pub results: Vec<Country>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub stats: RiskStats,
}

pub async fn list_countries(State(state): State<AppState>) -> Json<CountriesResponse> {
    let countries = state.catalog.countries().to_vec();
    Json(CountriesResponse {
        success: true,
        count: countries.len(),
        countries,
    })
}

pub async fn get_country(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<CountryResponse> {
    let country = state.catalog.resolve(&code)?;
    let risk_assessment = state
        .store
        .get(&country.alpha2)
        .await
        .unwrap_or_else(|| Value::Object(Map::new()));

    Ok(Json(CountryResponse {
        success: true,
        country: country.clone(),
        risk_assessment,
    }))
}

pub async fn list_risk_categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        success: true,
        categories: &RISK_CATEGORIES,
    })
}

pub async fn get_country_risk(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<CountryRiskResponse> {
    let country = state.catalog.resolve(&code)?;
    let country_code = country.alpha2.clone();

    let response = match state.store.get(&country_code).await {
        Some(risk_assessment) => CountryRiskResponse::Assessed {
            success: true,
            country_code,
            risk_assessment,
        },
        None => CountryRiskResponse::NotAssessed {
            success: true,
            country_code,
            risk_scores: Map::new(),
            overall_risk: NOT_ASSESSED,
            message: "No risk data available for this country",
        },
    };
    Ok(Json(response))
}

/// Replace a country's risk assessment with the request body
pub async fn update_country_risk(
    State(state): State<AppState>,
    Path(code): Path<String>,
    body: Bytes,
) -> ApiResult<UpdateRiskResponse> {
    let country_code = state.catalog.resolve(&code)?.alpha2.clone();
    let document = parse_document(&body)?;

    state.store.put(&country_code, document).await?;

    Ok(Json(UpdateRiskResponse {
        success: true,
        message: "Risk data updated successfully",
        country_code,
    }))
}

pub async fn search_countries(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<SearchResponse> {
    let (query, results) = state.catalog.search(params.q.as_deref().unwrap_or_default())?;

    Ok(Json(SearchResponse {
        success: true,
        query,
        count: results.len(),
        results: results.into_iter().cloned().collect(),
    }))
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let keys = state.store.keys().await;
    Json(StatsResponse {
        success: true,
        stats: RiskStats::compute(&state.catalog, &keys),
    })
}
