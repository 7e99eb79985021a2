//! Builds the [`Source`] a series definition names.

use std::path::Path;

use tasa_registry::SeriesRegistry;
use tasa_store::SeriesStore;
use tasa_types::{FetchError, SeriesDef, Source, SourceDef};
use tracing::debug;

use crate::providers::{BcraApi, BcraVariables, BnaActiva, Derived, IndecIpc, Ripte, Smvm};
use crate::{ClientConfig, HttpClient};

/// Creates the source adapter for `def`.
///
/// The client inherits `config`, with TLS relaxed when the definition asks
/// for it. A definition endpoint replaces the provider default. Derived
/// sources read their upstream's file under `data_dir`.
///
/// # Errors
///
/// Returns [`FetchError::Client`] if the HTTP client cannot be built and
/// [`FetchError::Upstream`] if a derived series names an unknown upstream.
pub fn build_source(
    def: &SeriesDef,
    registry: &SeriesRegistry,
    data_dir: &Path,
    config: &ClientConfig,
) -> Result<Box<dyn Source>, FetchError> {
    debug!(series = def.id(), provider = def.source().provider(), "building source");

    let client = || {
        HttpClient::new(
            config
                .clone()
                .with_insecure_tls(config.insecure_tls || def.insecure_tls()),
        )
    };
    let endpoint = def.endpoint();

    let source = match def.source() {
        SourceDef::BcraVariables { label } => boxed(
            BcraVariables::new(client()?, label.clone(), def.granularity()),
            endpoint,
            |s, url| s.with_url(url),
        ),
        SourceDef::BnaActiva => boxed(BnaActiva::new(client()?), endpoint, |s, url| {
            s.with_url(url)
        }),
        SourceDef::IndecIpc => boxed(IndecIpc::new(client()?), endpoint, |s, url| {
            s.with_url(url)
        }),
        SourceDef::Ripte => boxed(Ripte::new(client()?), endpoint, |s, url| s.with_url(url)),
        SourceDef::Smvm => boxed(Smvm::new(client()?), endpoint, |s, url| s.with_url(url)),
        SourceDef::BcraApi {
            variable,
            lookback_days,
        } => boxed(
            BcraApi::new(client()?, *variable, *lookback_days, def.granularity()),
            endpoint,
            |s, url| s.with_url(url),
        ),
        SourceDef::Derived { upstream, months } => {
            let upstream_def = registry.get(upstream).ok_or_else(|| FetchError::Upstream {
                series: upstream.clone(),
                reason: "not defined in the registry".to_string(),
            })?;
            let store = SeriesStore::for_series(upstream_def, data_dir);
            Box::new(Derived::new(upstream_def.id(), store, *months))
        }
    };
    Ok(source)
}

fn boxed<S: Source + 'static>(
    source: S,
    endpoint: Option<&str>,
    with_url: fn(S, &str) -> S,
) -> Box<dyn Source> {
    match endpoint {
        Some(url) => Box::new(with_url(source, url)),
        None => Box::new(source),
    }
}
