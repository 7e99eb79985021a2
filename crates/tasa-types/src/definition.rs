//! Series definitions: where a series lives, how it is keyed, and how new
//! observations are folded into it.

use serde::{Deserialize, Serialize};

use crate::Granularity;

/// Extrapolation model selected for a rate series.
///
/// The rate itself comes from each observation; this only picks the formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelKind {
    /// `next = prev`.
    DirectCopy,
    /// `next = prev * (1 + r/100/365)`, once per day.
    CompoundDaily,
    /// `next = prev * (1 + r/100 * period_days/365)`, once per unit.
    CompoundPeriodic {
        /// Length of the rate period in days.
        period_days: u32,
    },
    /// `next = prev * (1 + pct/100)`, needs the immediately preceding period.
    PercentStepChain,
}

impl ModelKind {
    /// Returns the model as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DirectCopy => "direct_copy",
            Self::CompoundDaily => "compound_daily",
            Self::CompoundPeriodic { .. } => "compound_periodic",
            Self::PercentStepChain => "percent_step_chain",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CompoundPeriodic { period_days } => write!(f, "compound_periodic({period_days}d)"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// How an observation's value relates to the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Semantics {
    /// The observed value is the series value at the observed key.
    Level,
    /// The observed value is a rate; series values are generated by `model`.
    Rate {
        /// Extrapolation formula.
        model: ModelKind,
    },
}

impl std::fmt::Display for Semantics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Level => write!(f, "level"),
            Self::Rate { model } => write!(f, "rate/{model}"),
        }
    }
}

/// What a level series does with periods skipped between its latest entry
/// and a newer observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapFill {
    /// Insert only the observed period.
    #[default]
    #[serde(rename = "none")]
    Skip,
    /// Carry the previous value forward into each skipped period.
    Carry,
}

/// Publisher a series is read from, with provider-specific parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum SourceDef {
    /// BCRA "Principales variables" table; row chosen by label fragments.
    BcraVariables {
        /// Every fragment must appear in the row's first cell.
        label: Vec<String>,
    },
    /// Banco Nación lending rate (T.N.A.) and its "vigente desde" date.
    BnaActiva,
    /// INDEC consumer price index, monthly variation.
    IndecIpc,
    /// RIPTE wage index table.
    Ripte,
    /// Minimum wage (Salario Mínimo Vital y Móvil).
    Smvm,
    /// BCRA statistics JSON API.
    BcraApi {
        /// Variable identifier in the BCRA catalog.
        variable: u32,
        /// How many days back to request when the store is empty.
        #[serde(default = "default_lookback_days")]
        lookback_days: u32,
    },
    /// Carry-forward copy of another series, shifted by whole months.
    Derived {
        /// Series identifier to copy from.
        upstream: String,
        /// Months to shift the upstream's latest key by.
        months: u32,
    },
}

const fn default_lookback_days() -> u32 {
    30
}

impl SourceDef {
    /// Returns the provider identifier.
    #[must_use]
    pub const fn provider(&self) -> &'static str {
        match self {
            Self::BcraVariables { .. } => "bcra_variables",
            Self::BnaActiva => "bna_activa",
            Self::IndecIpc => "indec_ipc",
            Self::Ripte => "ripte",
            Self::Smvm => "smvm",
            Self::BcraApi { .. } => "bcra_api",
            Self::Derived { .. } => "derived",
        }
    }

    /// Returns the upstream series id for derived sources.
    #[must_use]
    pub fn upstream(&self) -> Option<&str> {
        match self {
            Self::Derived { upstream, .. } => Some(upstream),
            _ => None,
        }
    }
}

/// Definition of one persisted series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDef {
    /// Unique identifier (e.g., "cer", "activa").
    id: String,
    /// Human-readable name.
    name: String,
    /// Description of the series.
    #[serde(default)]
    description: String,
    /// File name, relative to the data directory.
    file: String,
    /// Key granularity.
    granularity: Granularity,
    /// Decimal places kept after each computation.
    precision: u32,
    /// How observations fold into the series.
    semantics: Semantics,
    /// Handling of skipped periods for level series.
    #[serde(default)]
    gap_fill: GapFill,
    /// Whether a differing value for an existing key replaces it.
    #[serde(default)]
    revisable: bool,
    /// Whether a missing file starts an empty series.
    #[serde(default = "default_true")]
    bootstrap: bool,
    /// Whether the file may carry trailing commas.
    #[serde(default)]
    lenient: bool,
    /// Whether TLS certificate checks are skipped for this publisher.
    #[serde(default)]
    insecure_tls: bool,
    /// Overrides the provider's default endpoint.
    #[serde(default)]
    endpoint: Option<String>,
    /// Where observations come from.
    source: SourceDef,
}

const fn default_true() -> bool {
    true
}

impl SeriesDef {
    /// Creates a new series definition with default flags.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        file: impl Into<String>,
        granularity: Granularity,
        precision: u32,
        semantics: Semantics,
        source: SourceDef,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            file: file.into(),
            granularity,
            precision,
            semantics,
            gap_fill: GapFill::default(),
            revisable: false,
            bootstrap: true,
            lenient: false,
            insecure_tls: false,
            endpoint: None,
            source,
        }
    }

    /// Sets the human-readable name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the gap policy.
    #[must_use]
    pub const fn with_gap_fill(mut self, gap_fill: GapFill) -> Self {
        self.gap_fill = gap_fill;
        self
    }

    /// Marks the series as revisable.
    #[must_use]
    pub const fn with_revisable(mut self, revisable: bool) -> Self {
        self.revisable = revisable;
        self
    }

    /// Sets whether a missing file bootstraps an empty series.
    #[must_use]
    pub const fn with_bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    /// Sets lenient file parsing.
    #[must_use]
    pub const fn with_lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Overrides the provider endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Returns the series identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the file name relative to the data directory.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Returns the key granularity.
    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Returns the rounding precision.
    #[must_use]
    pub const fn precision(&self) -> u32 {
        self.precision
    }

    /// Returns the series semantics.
    #[must_use]
    pub const fn semantics(&self) -> Semantics {
        self.semantics
    }

    /// Returns the gap policy.
    #[must_use]
    pub const fn gap_fill(&self) -> GapFill {
        self.gap_fill
    }

    /// Returns true if existing values may be replaced by newer reports.
    #[must_use]
    pub const fn is_revisable(&self) -> bool {
        self.revisable
    }

    /// Returns true if a missing file starts an empty series.
    #[must_use]
    pub const fn allows_bootstrap(&self) -> bool {
        self.bootstrap
    }

    /// Returns true if trailing commas are tolerated in the file.
    #[must_use]
    pub const fn is_lenient(&self) -> bool {
        self.lenient
    }

    /// Returns true if TLS verification is relaxed for the publisher.
    #[must_use]
    pub const fn insecure_tls(&self) -> bool {
        self.insecure_tls
    }

    /// Returns the endpoint override, if any.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Returns the source definition.
    #[must_use]
    pub const fn source(&self) -> &SourceDef {
        &self.source
    }

    /// Returns true if this is a rate series.
    #[must_use]
    pub const fn is_rate(&self) -> bool {
        matches!(self.semantics, Semantics::Rate { .. })
    }
}

impl std::fmt::Display for SeriesDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
