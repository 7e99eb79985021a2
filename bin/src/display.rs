//! Display helpers for the tasa CLI.

use tasa_lib::prelude::*;
use tasa_lib::SourceDef;

/// Formats a stored value with the series precision.
pub(crate) fn format_value(value: f64, precision: u32) -> String {
    format!("{value:.prec$}", prec = precision as usize)
}

/// Describes where a series comes from, with its parameters.
pub(crate) fn describe_source(source: &SourceDef) -> String {
    match source {
        SourceDef::BcraVariables { label } => {
            format!("{} \"{}\"", source.provider(), label.join(" | "))
        }
        SourceDef::BcraApi {
            variable,
            lookback_days,
        } => format!("{} #{variable} (last {lookback_days} days)", source.provider()),
        SourceDef::Derived { upstream, months } => {
            format!("{} {upstream} +{months}", source.provider())
        }
        other => other.provider().to_string(),
    }
}

/// Describes the flags that change how a series is reconciled.
pub(crate) fn describe_flags(def: &SeriesDef) -> String {
    let mut flags = Vec::new();
    if !def.is_rate() && def.gap_fill() == GapFill::Carry {
        flags.push("carry");
    }
    if def.is_revisable() {
        flags.push("revisable");
    }
    if !def.allows_bootstrap() {
        flags.push("no-bootstrap");
    }
    if def.is_lenient() {
        flags.push("lenient");
    }
    if def.insecure_tls() {
        flags.push("insecure-tls");
    }
    flags.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(100.1, 6), "100.100000");
        assert_eq!(format_value(163_299.84, 2), "163299.84");
    }

    #[test]
    fn test_describe_catalog_entries() {
        let registry = SeriesRegistry::global();
        let cer = registry.get("cer").unwrap();
        assert_eq!(
            describe_source(cer.source()),
            "bcra_variables \"CER | Base 02/02/2002\""
        );
        assert_eq!(describe_flags(cer), "insecure-tls");

        let ripte1 = registry.get("ripte1").unwrap();
        assert_eq!(describe_source(ripte1.source()), "derived ripte +1");
        assert_eq!(describe_flags(ripte1), "carry");
    }
}
