use anyhow::Context;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use shared::{
    domain::{Round, Year},
    error::ApiError,
    lenient,
    protocol::{Constructor, Driver, FastestLap, RaceSummary, ResultRow},
};
use tracing::{debug, warn};

pub const DEFAULT_ERGAST_BASE_URL: &str = "https://ergast.com/api/f1";

/// Upstream access shared by every request handler.
#[derive(Clone)]
pub struct ErgastContext {
    pub http: Client,
    pub base_url: String,
}

impl ErgastContext {
    pub fn new(base_url: impl Into<String>, accept_invalid_certs: bool) -> anyhow::Result<Self> {
        let http = Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .context("failed to build upstream http client")?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn races_url(&self, year: Year) -> String {
        format!("{}/{year}.json", self.base_url)
    }

    fn results_url(&self, year: Year, round: Round) -> String {
        format!("{}/{year}/{round}/results.json", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
pub struct ErgastResponse {
    #[serde(rename = "MRData")]
    pub mr_data: MrData,
}

#[derive(Debug, Deserialize)]
pub struct MrData {
    #[serde(rename = "RaceTable")]
    pub race_table: RaceTable,
}

#[derive(Debug, Deserialize)]
pub struct RaceTable {
    #[serde(rename = "Races", default)]
    pub races: Vec<ErgastRace>,
}

#[derive(Debug, Deserialize)]
pub struct ErgastRace {
    pub round: Round,
    #[serde(rename = "raceName")]
    pub race_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(rename = "Results", default)]
    pub results: Vec<ErgastResult>,
}

#[derive(Debug, Deserialize)]
pub struct ErgastResult {
    #[serde(rename = "Driver")]
    pub driver: Driver,
    #[serde(rename = "Constructor")]
    pub constructor: Constructor,
    #[serde(deserialize_with = "lenient::number")]
    pub grid: u32,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub position: Option<u32>,
    pub status: String,
    #[serde(deserialize_with = "lenient::number")]
    pub points: f64,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub laps: Option<u32>,
    #[serde(rename = "FastestLap", default)]
    pub fastest_lap: Option<FastestLap>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub number: Option<u32>,
}

pub fn parse_year(raw: Option<&str>) -> Result<Year, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::validation("Missing year parameter"))?;
    raw.parse()
        .map_err(|_| ApiError::validation(format!("invalid year: {raw}")))
}

pub fn parse_year_and_round(
    year: Option<&str>,
    round: Option<&str>,
) -> Result<(Year, Round), ApiError> {
    let missing = || ApiError::validation("Missing year or round parameter");
    let year = year
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(missing)?;
    let round = round
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(missing)?;
    let year = year
        .parse()
        .map_err(|_| ApiError::validation(format!("invalid year: {year}")))?;
    let round = round
        .parse()
        .map_err(|_| ApiError::validation(format!("invalid round: {round}")))?;
    Ok((year, round))
}

pub fn races_from_payload(payload: ErgastResponse) -> Vec<RaceSummary> {
    payload
        .mr_data
        .race_table
        .races
        .into_iter()
        .map(|race| RaceSummary {
            round: race.round,
            name: race.race_name,
        })
        .collect()
}

/// Flattens the first race of the table into one row per classified driver.
pub fn results_from_payload(payload: ErgastResponse) -> Vec<ResultRow> {
    let Some(race) = payload.mr_data.race_table.races.into_iter().next() else {
        return Vec::new();
    };
    let ErgastRace {
        round,
        race_name,
        date,
        results,
    } = race;
    results
        .into_iter()
        .map(|result| ResultRow {
            race_name: race_name.clone(),
            round,
            date: date.clone(),
            driver: result.driver,
            constructor: result.constructor,
            grid: result.grid,
            position: result.position,
            status: result.status,
            points: result.points,
            laps: result.laps,
            fastest_lap: result.fastest_lap,
            number: result.number,
        })
        .collect()
}

pub async fn list_races(ctx: &ErgastContext, year: Year) -> Result<Vec<RaceSummary>, ApiError> {
    let payload = fetch_upstream(
        ctx,
        &ctx.races_url(year),
        "Failed to fetch data from Ergast API",
    )
    .await?;
    let races = races_from_payload(payload);
    debug!(year = year.0, count = races.len(), "fetched races from upstream");
    Ok(races)
}

pub async fn list_results(
    ctx: &ErgastContext,
    year: Year,
    round: Round,
) -> Result<Vec<ResultRow>, ApiError> {
    let payload = fetch_upstream(
        ctx,
        &ctx.results_url(year, round),
        "Failed to fetch results from Ergast API",
    )
    .await?;
    let results = results_from_payload(payload);
    debug!(
        year = year.0,
        round = round.0,
        count = results.len(),
        "fetched results from upstream"
    );
    Ok(results)
}

async fn fetch_upstream<T: DeserializeOwned>(
    ctx: &ErgastContext,
    url: &str,
    failure_message: &str,
) -> Result<T, ApiError> {
    let response = ctx.http.get(url).send().await.map_err(|err| {
        warn!(%url, %err, "upstream request failed");
        ApiError::upstream(format!("{failure_message}: {err}"))
    })?;

    if response.status() != StatusCode::OK {
        warn!(%url, status = %response.status(), "upstream returned non-200 status");
        return Err(ApiError::upstream(failure_message));
    }

    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::internal(err.to_string()))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
