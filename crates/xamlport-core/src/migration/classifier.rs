//! Styled-vs-direct property classification
//!
//! Avalonia splits what WPF calls a dependency property into two
//! representations: `StyledProperty` (participates in styling, inherits,
//! animates) and `DirectProperty` (a plain CLR-backed property with change
//! notification). Picking between them from WPF-side evidence is a
//! heuristic, evaluated as an ordered decision list where the first
//! matching rule wins.
//!
//! Precedence, highest first — this order is part of the contract:
//!
//! 1. `read-only` — a read-only property becomes **Direct**,
//!    unconditionally, overriding every later rule.
//! 2. `commonly-styled` — membership in the configured commonly-styled
//!    name set ⇒ **Styled**.
//! 3. `complex-metadata` — side-effecting framework metadata (value
//!    inheritance, measure/arrange invalidation) ⇒ **Styled**.
//! 4. `synthesized-accessor` — a computed/synthesized accessor ⇒
//!    **Direct**.
//! 5. `default` — **Styled**.
//!
//! The name sets are inferred from observed conversions, not specified
//! anywhere normative; they are configuration data, replaceable wholesale.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Target representation of a migrated property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyRepresentation {
    Styled,
    Direct,
}

impl PropertyRepresentation {
    /// Stable label used in metadata bags and reports
    pub fn label(self) -> &'static str {
        match self {
            PropertyRepresentation::Styled => "styled",
            PropertyRepresentation::Direct => "direct",
        }
    }
}

/// Evidence about one property, gathered by the caller
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyTraits {
    /// Readable but not writable
    pub read_only: bool,
    /// Carries side-effecting framework metadata
    pub has_complex_metadata: bool,
    /// Accessor is synthesized/computed rather than field-backed
    pub synthesized_accessor: bool,
}

/// Name sets feeding rules 2 and 3
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Rule 2: names conventionally set from styles
    pub commonly_styled: BTreeSet<String>,
    /// Treated as complex metadata (rule 3): value-inheriting names
    pub inheritable: BTreeSet<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        let commonly_styled = [
            "Background",
            "Foreground",
            "BorderBrush",
            "BorderThickness",
            "Padding",
            "Margin",
            "Template",
            "CornerRadius",
            "Opacity",
            "Cursor",
        ];
        let inheritable = ["FontFamily", "FontSize", "FontWeight", "DataContext"];
        Self {
            commonly_styled: commonly_styled.iter().map(|s| s.to_string()).collect(),
            inheritable: inheritable.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Outcome plus the rule that decided it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub representation: PropertyRepresentation,
    /// Name of the deciding rule, for reports and tests
    pub deciding_rule: &'static str,
}

/// The ordered decision list (see module docs for precedence)
#[derive(Debug, Clone, Default)]
pub struct PropertyKindClassifier {
    config: ClassifierConfig,
}

impl PropertyKindClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify one property; first matching rule wins
    pub fn classify(&self, name: &str, traits: PropertyTraits) -> Classification {
        if traits.read_only {
            return Classification {
                representation: PropertyRepresentation::Direct,
                deciding_rule: "read-only",
            };
        }
        if self.config.commonly_styled.contains(name) {
            return Classification {
                representation: PropertyRepresentation::Styled,
                deciding_rule: "commonly-styled",
            };
        }
        if traits.has_complex_metadata || self.config.inheritable.contains(name) {
            return Classification {
                representation: PropertyRepresentation::Styled,
                deciding_rule: "complex-metadata",
            };
        }
        if traits.synthesized_accessor {
            return Classification {
                representation: PropertyRepresentation::Direct,
                deciding_rule: "synthesized-accessor",
            };
        }
        Classification {
            representation: PropertyRepresentation::Styled,
            deciding_rule: "default",
        }
    }
}
