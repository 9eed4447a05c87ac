use std::process::ExitCode;

use placemap_auth::{resolve_credentials, ServiceAccountAuth, SHEETS_READONLY_SCOPE};
use placemap_core::error::ReqwestErrorExt;
use placemap_core::{AppError, AuthError, CacheError, Config, ConfigError};
use placemap_geocode::{Enricher, GeocodeCache, GeocodeError, NominatimGeocoder};
use placemap_pipeline::Pipeline;
use placemap_sheets::{SheetsClient, SheetsError, SheetsReader};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = placemap_core::init() {
        eprintln!("Failed to initialize logging: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match &e {
                AppError::Other(inner) => eprintln!("Error: {:#}", inner),
                other => eprintln!("Error: {}", other),
            }
            eprintln!("Hint: {}", hint(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AppError> {
    let (config, _validation) = Config::load_validated()
        .map_err(|e| ConfigError::Invalid(format!("{:#}", e)))?;

    let key = resolve_credentials(&config.credentials)?;
    let auth = ServiceAccountAuth::new(key);
    let token = auth.access_token(&[SHEETS_READONLY_SCOPE]).await?;
    if token.is_expired() {
        return Err(AuthError::TokenExchange("token endpoint returned an expired token".into()).into());
    }
    if !token.has_scope(SHEETS_READONLY_SCOPE) {
        tracing::warn!("Access token does not list the spreadsheets.readonly scope");
    }
    if token.expires_within(300) {
        tracing::warn!("Access token expires within five minutes");
    }

    let reader = SheetsReader::new(
        SheetsClient::new(&token.access_token),
        &config.sheet.spreadsheet_id,
        &config.sheet.sheet_name,
        &config.sheet.image_column,
    );

    let geocoder = NominatimGeocoder::from_config(&config.geocode).map_err(|e| match e {
        GeocodeError::Network(e) => AppError::Network(e.into_network_error()),
        other => AppError::Other(other.into()),
    })?;
    let cache = GeocodeCache::load(&config.geocode.cache_path)?;
    tracing::info!("Geocode cache holds {} addresses", cache.len());
    let enricher = Enricher::new(geocoder, cache, config.geocode.min_interval());

    let output = config.output.clone();
    let rendered = Pipeline::new(reader, enricher, config).run().await?;
    rendered.write(&output)?;

    Ok(())
}

/// Sheets and cache failures arrive wrapped in the pipeline's context chain.
fn hint(err: &AppError) -> String {
    if let AppError::Other(inner) = err {
        if let Some(sheets) = inner.downcast_ref::<SheetsError>() {
            return sheets.user_message();
        }
        if let Some(cache) = inner.downcast_ref::<CacheError>() {
            return cache.user_message().to_string();
        }
    }
    err.user_message().to_string()
}
