//! Remote structured-data providers for Chilean vehicle registries.
//!
//! Each provider wraps one upstream API and maps its response shape onto
//! the shared record type. API keys come exclusively from environment
//! variables; a missing key fails the attempt so the chain can move on.

use crate::error::ProviderError;
use crate::provider::VehicleProvider;
use async_trait::async_trait;
use patente_core::{PlateNumber, ReportInfo, VehicleInfo, VehicleRecord};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Sentinel for vehicle fields the upstream API left out.
const UNKNOWN_VALUE: &str = "Desconocido";

/// Sentinel report date when the API flags a report without details.
const UNKNOWN_DATE: &str = "Fecha desconocida";

/// Sentinel report location when the API flags a report without details.
const UNKNOWN_LOCATION: &str = "Ubicación desconocida";

fn http_client() -> Result<Client, ProviderError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?)
}

fn env_api_key(
    provider: &'static str,
    env_var: &'static str,
) -> Result<String, ProviderError> {
    std::env::var(env_var)
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or(ProviderError::MissingApiKey { provider, env_var })
}

fn vehicle_info(
    make: Option<String>,
    model: Option<String>,
    year: Option<i32>,
    color: Option<String>,
) -> VehicleInfo {
    VehicleInfo {
        make: make.unwrap_or_else(|| UNKNOWN_VALUE.to_string()),
        model: model.unwrap_or_else(|| UNKNOWN_VALUE.to_string()),
        year,
        color: color.unwrap_or_else(|| UNKNOWN_VALUE.to_string()),
    }
}

fn report_info(date: Option<String>, location: Option<String>) -> ReportInfo {
    ReportInfo {
        report_date: date.unwrap_or_else(|| UNKNOWN_DATE.to_string()),
        report_location: location.unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
    }
}

/// Registro Civil vehicle registry, the official source.
pub struct RegistroCivilProvider {
    client: Client,
    base_url: String,
}

impl RegistroCivilProvider {
    /// Provider against the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RegistroCivilResponse {
    #[serde(default)]
    encargo: bool,
    marca: Option<String>,
    modelo: Option<String>,
    anio: Option<i32>,
    color: Option<String>,
    #[serde(rename = "fechaEncargo")]
    fecha_encargo: Option<String>,
    #[serde(rename = "lugarEncargo")]
    lugar_encargo: Option<String>,
}

fn map_registro_civil(plate: &PlateNumber, data: RegistroCivilResponse) -> VehicleRecord {
    let info = vehicle_info(data.marca, data.modelo, data.anio, data.color);
    if data.encargo {
        VehicleRecord::reported(
            plate.clone(),
            info,
            report_info(data.fecha_encargo, data.lugar_encargo),
            100.0,
            "Registro Civil de Chile",
        )
    } else {
        VehicleRecord::clean(plate.clone(), info, 100.0, "Registro Civil de Chile")
    }
}

#[async_trait]
impl VehicleProvider for RegistroCivilProvider {
    fn name(&self) -> &str {
        "registro-civil"
    }

    fn verification_method(&self) -> &str {
        "api"
    }

    async fn check(&self, plate: &PlateNumber) -> Result<VehicleRecord, ProviderError> {
        let api_key = env_api_key("Registro Civil", "REGISTRO_CIVIL_API_KEY")?;

        let response = self
            .client
            .get(format!("{}/consulta/{}", self.base_url, plate.as_str()))
            .header("Authorization", format!("ApiKey {api_key}"))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::UpstreamStatus {
                status: response.status().as_u16(),
            });
        }

        let data: RegistroCivilResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        Ok(map_registro_civil(plate, data))
    }
}

/// Autofact commercial vehicle history API.
pub struct AutofactProvider {
    client: Client,
    base_url: String,
}

impl AutofactProvider {
    /// Provider against the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct AutofactResponse {
    #[serde(default)]
    stolen: bool,
    brand: Option<String>,
    model: Option<String>,
    year: Option<i32>,
    color: Option<String>,
    #[serde(rename = "stolenDate")]
    stolen_date: Option<String>,
    #[serde(rename = "stolenLocation")]
    stolen_location: Option<String>,
}

fn map_autofact(plate: &PlateNumber, data: AutofactResponse) -> VehicleRecord {
    let info = vehicle_info(data.brand, data.model, data.year, data.color);
    if data.stolen {
        VehicleRecord::reported(
            plate.clone(),
            info,
            report_info(data.stolen_date, data.stolen_location),
            99.0,
            "Autofact",
        )
    } else {
        VehicleRecord::clean(plate.clone(), info, 99.0, "Autofact")
    }
}

#[async_trait]
impl VehicleProvider for AutofactProvider {
    fn name(&self) -> &str {
        "autofact"
    }

    fn verification_method(&self) -> &str {
        "api"
    }

    async fn check(&self, plate: &PlateNumber) -> Result<VehicleRecord, ProviderError> {
        let api_key = env_api_key("Autofact", "AUTOFACT_API_KEY")?;

        let response = self
            .client
            .get(format!("{}/vehicles/{}", self.base_url, plate.as_str()))
            .bearer_auth(api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::UpstreamStatus {
                status: response.status().as_u16(),
            });
        }

        let data: AutofactResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        Ok(map_autofact(plate, data))
    }
}

/// Patente.cl consultation API.
pub struct PatenteClProvider {
    client: Client,
    base_url: String,
}

impl PatenteClProvider {
    /// Provider against the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct PatenteClResponse {
    #[serde(default, rename = "encargoPorRobo")]
    encargo_por_robo: bool,
    marca: Option<String>,
    modelo: Option<String>,
    #[serde(rename = "año")]
    ano: Option<i32>,
    color: Option<String>,
    #[serde(rename = "fechaEncargo")]
    fecha_encargo: Option<String>,
    #[serde(rename = "lugarEncargo")]
    lugar_encargo: Option<String>,
}

fn map_patente_cl(plate: &PlateNumber, data: PatenteClResponse) -> VehicleRecord {
    let info = vehicle_info(data.marca, data.modelo, data.ano, data.color);
    if data.encargo_por_robo {
        VehicleRecord::reported(
            plate.clone(),
            info,
            report_info(data.fecha_encargo, data.lugar_encargo),
            98.0,
            "Patente.cl",
        )
    } else {
        VehicleRecord::clean(plate.clone(), info, 98.0, "Patente.cl")
    }
}

#[async_trait]
impl VehicleProvider for PatenteClProvider {
    fn name(&self) -> &str {
        "patente-cl"
    }

    fn verification_method(&self) -> &str {
        "api"
    }

    async fn check(&self, plate: &PlateNumber) -> Result<VehicleRecord, ProviderError> {
        let api_key = env_api_key("Patente.cl", "PATENTE_CL_API_KEY")?;

        let response = self
            .client
            .post(format!("{}/consulta", self.base_url))
            .header("X-API-Key", api_key)
            .json(&serde_json::json!({ "patente": plate.as_str() }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::UpstreamStatus {
                status: response.status().as_u16(),
            });
        }

        let data: PatenteClResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        Ok(map_patente_cl(plate, data))
    }
}
