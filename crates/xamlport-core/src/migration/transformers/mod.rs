//! The concrete transformer catalog
//!
//! One module per priority band; every transformer instantiates one of the
//! recurring patterns (lookup-table rename, rename + value re-encoding,
//! unsupported-construct flagging, heuristic classification, structural
//! re-tokenization, rule bridging). The tables hardcoded here are
//! illustrative; injected `MappingRepository` records always win.

pub mod bindings;
pub mod controls;
pub mod legacy;
pub mod namespaces;
pub mod properties;
pub mod resources;
pub mod styles;
pub mod templates;
pub mod type_names;

pub use bindings::BindingTransformer;
pub use controls::ControlTransformer;
pub use legacy::{default_legacy_rules, ToolTipServiceExtrasRule, ToolTipServiceRule};
pub use namespaces::{NamespaceTransformer, AVALONIA_NS};
pub use properties::PropertyRenameTransformer;
pub use resources::ResourceTransformer;
pub use styles::StyleTransformer;
pub use templates::TemplateTransformer;
pub use type_names::TypeNameTransformer;

use crate::migration::classifier::PropertyKindClassifier;
use crate::migration::transformer::{
    priority, Elementwise, Propertywise, RuleBridge, Transformer,
};

/// The default catalog, one transformer per band
pub fn default_transformers() -> Vec<Box<dyn Transformer>> {
    default_transformers_with(PropertyKindClassifier::default())
}

/// The default catalog with a caller-configured classifier
pub fn default_transformers_with(
    classifier: PropertyKindClassifier,
) -> Vec<Box<dyn Transformer>> {
    vec![
        Box::new(NamespaceTransformer::new()),
        Box::new(Elementwise(TypeNameTransformer::new())),
        Box::new(Propertywise(PropertyRenameTransformer::new())),
        Box::new(RuleBridge::new(
            "legacy-rules",
            priority::LEGACY_RULES,
            default_legacy_rules(),
        )),
        Box::new(Propertywise(BindingTransformer::new())),
        Box::new(Propertywise(ResourceTransformer::new())),
        Box::new(Elementwise(StyleTransformer::new(classifier))),
        Box::new(Elementwise(TemplateTransformer::new())),
        Box::new(Elementwise(ControlTransformer::new())),
    ]
}
