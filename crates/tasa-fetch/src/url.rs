//! Publisher endpoints.

/// BCRA "Principales variables" table.
pub const BCRA_VARIABLES_URL: &str =
    "https://www.bcra.gob.ar/PublicacionesEstadisticas/Principales_variables.asp";

/// Banco Nación financial user information page, carrying the T.N.A.
pub const BNA_ACTIVA_URL: &str = "https://www.bna.com.ar/home/informacionalusuariofinanciero";

/// INDEC prices section, carrying the latest CPI variation.
pub const INDEC_IPC_URL: &str = "https://www.indec.gob.ar/indec/web/Nivel3-Tema-3-5";

/// RIPTE publication table.
pub const RIPTE_URL: &str = "https://www.argentina.gob.ar/trabajo/seguridadsocial/ripte";

/// Consejo del Salario page, carrying the current minimum wage.
pub const SMVM_URL: &str = "https://www.argentina.gob.ar/trabajo/consejodelsalario";

/// BCRA statistics API, monetary series.
pub const BCRA_API_URL: &str = "https://api.bcra.gob.ar/estadisticas/v3.0/monetarias";

/// Builds the BCRA API URL for one variable over a date window.
///
/// # Example
///
/// ```
/// use tasa_fetch::url::bcra_api_url;
/// use chrono::NaiveDate;
///
/// let from = NaiveDate::from_ymd_opt(2025, 6, 19).unwrap();
/// let to = NaiveDate::from_ymd_opt(2025, 7, 19).unwrap();
/// assert_eq!(
///     bcra_api_url("https://api.bcra.gob.ar/estadisticas/v3.0/monetarias", 43, from, to),
///     "https://api.bcra.gob.ar/estadisticas/v3.0/monetarias/43?desde=2025-06-19&hasta=2025-07-19"
/// );
/// ```
#[must_use]
pub fn bcra_api_url(
    base: &str,
    variable: u32,
    from: chrono::NaiveDate,
    to: chrono::NaiveDate,
) -> String {
    format!(
        "{}/{variable}?desde={}&hasta={}",
        base.trim_end_matches('/'),
        from.format("%Y-%m-%d"),
        to.format("%Y-%m-%d")
    )
}
