//! In-memory registry resolver
//!
//! The reference [`TypeResolver`] implementation. Types are registered as
//! serde-deserializable declarations (so a registry can be loaded from
//! JSON), then compiled into [`TypeInfo`] handles: members are flattened
//! through the base chain, and the "extra property" convention turns
//! static read-only `<Name>Property` fields of a marker type into
//! additional property records — merged with an existing accessor pair
//! when one is present, recorded as attached otherwise.

use super::{PropertyInfo, TypeInfo, TypeResolver};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

fn default_true() -> bool {
    true
}

/// An ordinary accessor-pair property declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDeclaration {
    pub name: String,
    pub property_type: String,
    #[serde(default = "default_true")]
    pub can_read: bool,
    #[serde(default = "default_true")]
    pub can_write: bool,
}

/// A field declaration, scanned for the extra-property convention
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDeclaration {
    pub name: String,
    /// Field type, possibly generic (`StyledProperty<bool>`)
    pub field_type: String,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_readonly: bool,
}

/// A registrable type declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub name: String,
    pub namespace: String,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub base_type: Option<String>,
    #[serde(default)]
    pub is_value_type: bool,
    #[serde(default)]
    pub is_enum: bool,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub properties: Vec<PropertyDeclaration>,
    #[serde(default)]
    pub fields: Vec<FieldDeclaration>,
}

impl TypeDeclaration {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            is_public: true,
            base_type: None,
            is_value_type: false,
            is_enum: false,
            interfaces: Vec::new(),
            properties: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base_type = Some(base.into());
        self
    }

    pub fn with_property(mut self, name: &str, property_type: &str) -> Self {
        self.properties.push(PropertyDeclaration {
            name: name.to_string(),
            property_type: property_type.to_string(),
            can_read: true,
            can_write: true,
        });
        self
    }

    pub fn with_read_only_property(mut self, name: &str, property_type: &str) -> Self {
        self.properties.push(PropertyDeclaration {
            name: name.to_string(),
            property_type: property_type.to_string(),
            can_read: true,
            can_write: false,
        });
        self
    }

    pub fn with_field(mut self, name: &str, field_type: &str) -> Self {
        self.fields.push(FieldDeclaration {
            name: name.to_string(),
            field_type: field_type.to_string(),
            is_static: true,
            is_readonly: true,
        });
        self
    }
}

/// Suffix the extra-property convention strips
const PROPERTY_FIELD_SUFFIX: &str = "Property";

/// In-memory [`TypeResolver`]
#[derive(Debug)]
pub struct RegistryResolver {
    /// full name → compiled handle
    types: HashMap<String, Arc<TypeInfo>>,
    /// (namespace, local name) → full name
    by_local: HashMap<(String, String), String>,
    /// xmlns URI → CLR namespaces it spans
    xmlns_definitions: HashMap<String, Vec<String>>,
    /// Field types recognized as property markers
    marker_types: BTreeSet<String>,
}

impl RegistryResolver {
    /// Compile a declaration set into a resolver
    pub fn from_declarations(declarations: Vec<TypeDeclaration>) -> Self {
        let mut resolver = Self {
            types: HashMap::new(),
            by_local: HashMap::new(),
            xmlns_definitions: HashMap::new(),
            marker_types: [
                "DependencyProperty",
                "DependencyPropertyKey",
                "AvaloniaProperty",
                "StyledProperty",
                "DirectProperty",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        };

        let by_full: HashMap<String, TypeDeclaration> = declarations
            .into_iter()
            .map(|d| (format!("{}.{}", d.namespace, d.name), d))
            .collect();

        for (full_name, declaration) in &by_full {
            let properties = resolver.flatten_members(declaration, &by_full);
            let info = Arc::new(TypeInfo {
                name: declaration.name.clone(),
                namespace: declaration.namespace.clone(),
                is_public: declaration.is_public,
                base_type: declaration.base_type.clone(),
                is_value_type: declaration.is_value_type,
                is_enum: declaration.is_enum,
                interfaces: declaration.interfaces.clone(),
                properties,
            });
            resolver.by_local.insert(
                (declaration.namespace.clone(), declaration.name.clone()),
                full_name.clone(),
            );
            resolver.types.insert(full_name.clone(), info);
        }

        resolver
    }

    /// Declare that `uri` spans the given CLR namespaces
    pub fn define_xmlns(&mut self, uri: impl Into<String>, namespaces: Vec<String>) {
        self.xmlns_definitions.insert(uri.into(), namespaces);
    }

    /// Replace the marker-type set the extra-property convention matches
    pub fn set_marker_types(&mut self, markers: impl IntoIterator<Item = String>) {
        self.marker_types = markers.into_iter().collect();
    }

    /// Own members plus inherited ones, convention fields applied per
    /// declaring type
    fn flatten_members(
        &self,
        declaration: &TypeDeclaration,
        by_full: &HashMap<String, TypeDeclaration>,
    ) -> Vec<PropertyInfo> {
        let mut members: Vec<PropertyInfo> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut current = Some(declaration);
        let mut visited_bases: HashSet<String> = HashSet::new();

        while let Some(decl) = current {
            for member in self.own_members(decl) {
                // Derived declarations shadow base ones
                if seen.insert(member.name.clone()) {
                    members.push(member);
                }
            }
            current = decl.base_type.as_ref().and_then(|base| {
                // Cycle guard: malformed registries must not hang us
                if visited_bases.insert(base.clone()) {
                    by_full.get(base)
                } else {
                    None
                }
            });
        }

        members
    }

    /// One declaring type's members with the extra-property convention
    fn own_members(&self, declaration: &TypeDeclaration) -> Vec<PropertyInfo> {
        let mut members: Vec<PropertyInfo> = declaration
            .properties
            .iter()
            .map(|p| PropertyInfo {
                name: p.name.clone(),
                property_type: p.property_type.clone(),
                is_attached: false,
                can_read: p.can_read,
                can_write: p.can_write,
            })
            .collect();

        for field in &declaration.fields {
            if !field.is_static || !field.is_readonly {
                continue;
            }
            let Some(stripped) = field.name.strip_suffix(PROPERTY_FIELD_SUFFIX) else {
                continue;
            };
            if stripped.is_empty() || !self.is_marker_type(&field.field_type) {
                continue;
            }
            match members.iter().find(|m| m.name == stripped) {
                // An accessor pair already covers this name: one merged
                // record, accessor metadata wins.
                Some(_) => {}
                None => members.push(PropertyInfo {
                    name: stripped.to_string(),
                    property_type: generic_argument(&field.field_type)
                        .unwrap_or("Object")
                        .to_string(),
                    is_attached: true,
                    can_read: true,
                    can_write: true,
                }),
            }
        }

        members
    }

    fn is_marker_type(&self, field_type: &str) -> bool {
        let base = field_type.split('<').next().unwrap_or(field_type);
        self.marker_types.contains(base)
    }

    /// CLR namespaces an element namespace may refer to
    fn candidate_namespaces<'a>(&'a self, namespace: &'a str) -> Vec<&'a str> {
        if let Some(spanned) = self.xmlns_definitions.get(namespace) {
            return spanned.iter().map(|s| s.as_str()).collect();
        }
        if let Some(clr) = clr_namespace_of(namespace) {
            return vec![clr];
        }
        vec![namespace]
    }
}

/// CLR namespace named by a `clr-namespace:`/`using:` declaration
pub fn clr_namespace_of(namespace: &str) -> Option<&str> {
    if let Some(rest) = namespace.strip_prefix("clr-namespace:") {
        return Some(rest.split(';').next().unwrap_or(rest));
    }
    namespace.strip_prefix("using:")
}

impl TypeResolver for RegistryResolver {
    fn resolve(&self, namespace: &str, local_name: &str) -> Option<Arc<TypeInfo>> {
        for candidate in self.candidate_namespaces(namespace) {
            let key = (candidate.to_string(), local_name.to_string());
            if let Some(full_name) = self.by_local.get(&key) {
                return self.types.get(full_name).cloned();
            }
        }
        None
    }

    fn resolve_full_name(&self, full_name: &str) -> Option<Arc<TypeInfo>> {
        self.types.get(full_name).cloned()
    }
}

/// First generic argument of a type name (`StyledProperty<bool>` → `bool`)
fn generic_argument(type_name: &str) -> Option<&str> {
    let start = type_name.find('<')?;
    let end = type_name.rfind('>')?;
    if end > start + 1 {
        Some(type_name[start + 1..end].trim())
    } else {
        None
    }
}

/// The WPF presentation xmlns URI
pub const WPF_PRESENTATION_NS: &str = "http://schemas.microsoft.com/winfx/2006/xaml/presentation";
/// The XAML language xmlns URI
pub const XAML_LANGUAGE_NS: &str = "http://schemas.microsoft.com/winfx/2006/xaml";

/// A baseline registry of the WPF framework types the test suite and the
/// illustrative mapping tables lean on
pub fn wpf_baseline() -> RegistryResolver {
    let wpf = "System.Windows";
    let controls = "System.Windows.Controls";
    let primitives = "System.Windows.Controls.Primitives";
    let media = "System.Windows.Media";

    let declarations = vec![
        TypeDeclaration::new(wpf, "UIElement")
            .with_property("Visibility", "Visibility")
            .with_property("IsEnabled", "Boolean")
            .with_property("Opacity", "Double")
            .with_property("Focusable", "Boolean")
            .with_field("VisibilityProperty", "DependencyProperty")
            .with_field("OpacityProperty", "DependencyProperty"),
        TypeDeclaration::new(wpf, "FrameworkElement")
            .with_base("System.Windows.UIElement")
            .with_property("Width", "Double")
            .with_property("Height", "Double")
            .with_property("Margin", "Thickness")
            .with_property("HorizontalAlignment", "HorizontalAlignment")
            .with_property("VerticalAlignment", "VerticalAlignment")
            .with_property("Name", "String")
            .with_property("DataContext", "Object")
            .with_property("Style", "Style")
            .with_property("ToolTip", "Object")
            .with_property("Cursor", "Cursor")
            .with_property("Tag", "Object")
            .with_read_only_property("ActualWidth", "Double")
            .with_read_only_property("ActualHeight", "Double")
            .with_property("Resources", "ResourceDictionary"),
        TypeDeclaration::new(controls, "Control")
            .with_base("System.Windows.FrameworkElement")
            .with_property("Background", "Brush")
            .with_property("Foreground", "Brush")
            .with_property("BorderBrush", "Brush")
            .with_property("BorderThickness", "Thickness")
            .with_property("FontFamily", "FontFamily")
            .with_property("FontSize", "Double")
            .with_property("FontWeight", "FontWeight")
            .with_property("Padding", "Thickness")
            .with_property("Template", "ControlTemplate")
            .with_property("IsTabStop", "Boolean"),
        TypeDeclaration::new(controls, "ContentControl")
            .with_base("System.Windows.Controls.Control")
            .with_property("Content", "Object"),
        TypeDeclaration::new(controls, "Button")
            .with_base("System.Windows.Controls.ContentControl")
            .with_property("IsDefault", "Boolean")
            .with_property("IsCancel", "Boolean"),
        TypeDeclaration::new(primitives, "ToggleButton")
            .with_base("System.Windows.Controls.ContentControl")
            .with_property("IsChecked", "Boolean")
            .with_property("IsThreeState", "Boolean"),
        TypeDeclaration::new(controls, "CheckBox")
            .with_base("System.Windows.Controls.Primitives.ToggleButton"),
        TypeDeclaration::new(controls, "RadioButton")
            .with_base("System.Windows.Controls.Primitives.ToggleButton")
            .with_property("GroupName", "String"),
        TypeDeclaration::new(controls, "Label")
            .with_base("System.Windows.Controls.ContentControl")
            .with_property("Target", "UIElement"),
        TypeDeclaration::new(controls, "TextBlock")
            .with_base("System.Windows.FrameworkElement")
            .with_property("Text", "String")
            .with_property("TextWrapping", "TextWrapping")
            .with_property("TextTrimming", "TextTrimming")
            .with_property("FontSize", "Double")
            .with_property("Foreground", "Brush"),
        TypeDeclaration::new(controls, "TextBox")
            .with_base("System.Windows.Controls.Control")
            .with_property("Text", "String")
            .with_property("MaxLength", "Int32")
            .with_property("IsReadOnly", "Boolean")
            .with_property("AcceptsReturn", "Boolean"),
        TypeDeclaration::new(controls, "ItemsControl")
            .with_base("System.Windows.Controls.Control")
            .with_property("ItemsSource", "IEnumerable")
            .with_property("ItemTemplate", "DataTemplate"),
        TypeDeclaration::new(controls, "ListBox")
            .with_base("System.Windows.Controls.ItemsControl")
            .with_property("SelectedItem", "Object")
            .with_property("SelectionMode", "SelectionMode"),
        TypeDeclaration::new(controls, "ListView")
            .with_base("System.Windows.Controls.ListBox")
            .with_property("View", "ViewBase"),
        TypeDeclaration::new(controls, "ComboBox")
            .with_base("System.Windows.Controls.ItemsControl")
            .with_property("SelectedItem", "Object")
            .with_property("IsEditable", "Boolean"),
        TypeDeclaration::new(controls, "StackPanel")
            .with_base("System.Windows.FrameworkElement")
            .with_property("Orientation", "Orientation"),
        TypeDeclaration::new(controls, "Grid")
            .with_base("System.Windows.FrameworkElement")
            .with_property("ShowGridLines", "Boolean")
            .with_field("RowProperty", "DependencyProperty")
            .with_field("ColumnProperty", "DependencyProperty")
            .with_field("RowSpanProperty", "DependencyProperty")
            .with_field("ColumnSpanProperty", "DependencyProperty"),
        TypeDeclaration::new(controls, "Border")
            .with_base("System.Windows.FrameworkElement")
            .with_property("Child", "UIElement")
            .with_property("CornerRadius", "CornerRadius")
            .with_property("Background", "Brush")
            .with_property("BorderBrush", "Brush")
            .with_property("BorderThickness", "Thickness"),
        TypeDeclaration::new(controls, "ScrollViewer")
            .with_base("System.Windows.Controls.ContentControl")
            .with_property("HorizontalScrollBarVisibility", "ScrollBarVisibility")
            .with_property("VerticalScrollBarVisibility", "ScrollBarVisibility"),
        TypeDeclaration::new(controls, "ToolTipService")
            .with_field("ToolTipProperty", "DependencyProperty"),
        TypeDeclaration::new(wpf, "Window")
            .with_base("System.Windows.Controls.ContentControl")
            .with_property("Title", "String")
            .with_property("AllowsTransparency", "Boolean")
            .with_property("WindowStyle", "WindowStyle")
            .with_property("SizeToContent", "SizeToContent"),
        TypeDeclaration::new(controls, "UserControl")
            .with_base("System.Windows.Controls.ContentControl"),
        TypeDeclaration::new(wpf, "Style")
            .with_property("TargetType", "Type")
            .with_property("BasedOn", "Style")
            .with_read_only_property("Setters", "SetterBaseCollection")
            .with_read_only_property("Triggers", "TriggerCollection"),
        TypeDeclaration::new(wpf, "Setter")
            .with_property("Property", "DependencyProperty")
            .with_property("Value", "Object")
            .with_property("TargetName", "String"),
        TypeDeclaration::new(wpf, "ControlTemplate")
            .with_property("TargetType", "Type")
            .with_read_only_property("Triggers", "TriggerCollection"),
        TypeDeclaration::new(wpf, "DataTemplate").with_property("DataType", "Object"),
        TypeDeclaration::new(media, "SolidColorBrush").with_property("Color", "Color"),
    ];

    let mut resolver = RegistryResolver::from_declarations(declarations);
    resolver.define_xmlns(
        WPF_PRESENTATION_NS,
        vec![
            wpf.to_string(),
            controls.to_string(),
            primitives.to_string(),
            media.to_string(),
        ],
    );
    resolver
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_through_xmlns_definition() {
        let resolver = wpf_baseline();
        let button = resolver
            .resolve(WPF_PRESENTATION_NS, "Button")
            .expect("Button resolves through the presentation xmlns");
        assert_eq!(button.full_name(), "System.Windows.Controls.Button");
    }

    #[test]
    fn test_resolve_clr_namespace_declaration() {
        let resolver = wpf_baseline();
        let brush = resolver
            .resolve("clr-namespace:System.Windows.Media;assembly=PresentationCore", "SolidColorBrush")
            .expect("clr-namespace declarations resolve");
        assert_eq!(brush.name, "SolidColorBrush");
        assert!(resolver.resolve("clr-namespace:No.Such.Namespace", "Button").is_none());
    }

    #[test]
    fn test_base_chain_flattening() {
        let resolver = wpf_baseline();
        let button = resolver.resolve_full_name("System.Windows.Controls.Button").unwrap();
        // Own member
        assert!(button.property("IsDefault").is_some());
        // Inherited through ContentControl, Control, FrameworkElement, UIElement
        assert!(button.property("Content").is_some());
        assert!(button.property("Background").is_some());
        assert!(button.property("Margin").is_some());
        assert!(button.property("Visibility").is_some());
    }

    #[test]
    fn test_extra_property_convention_attached() {
        let resolver = wpf_baseline();
        let grid = resolver.resolve_full_name("System.Windows.Controls.Grid").unwrap();
        let row = grid.property("Row").expect("RowProperty field yields Row");
        assert!(row.is_attached);
        // No field named `Property` alone, no accessor collision
        assert!(grid.property("RowProperty").is_none());
    }

    #[test]
    fn test_extra_property_convention_merges_with_accessor() {
        let resolver = wpf_baseline();
        let ui = resolver.resolve_full_name("System.Windows.UIElement").unwrap();
        // Visibility has both an accessor pair and a VisibilityProperty
        // field; exactly one merged record survives.
        let records: Vec<_> = ui.properties.iter().filter(|p| p.name == "Visibility").collect();
        assert_eq!(records.len(), 1);
        assert!(!records[0].is_attached);
        assert!(records[0].can_write);
    }

    #[test]
    fn test_declarations_load_from_json() {
        let json = r#"[{
            "name": "Gauge",
            "namespace": "Acme.Controls",
            "properties": [{"name": "Value", "property_type": "Double"}],
            "fields": [{"name": "MaximumProperty", "field_type": "StyledProperty<double>",
                        "is_static": true, "is_readonly": true}]
        }]"#;
        let declarations: Vec<TypeDeclaration> = serde_json::from_str(json).unwrap();
        let resolver = RegistryResolver::from_declarations(declarations);
        let gauge = resolver.resolve("Acme.Controls", "Gauge").unwrap();
        assert!(gauge.property("Value").is_some());
        let max = gauge.property("Maximum").unwrap();
        assert!(max.is_attached);
        assert_eq!(max.property_type, "double");
    }

    #[test]
    fn test_read_only_survives_flattening() {
        let resolver = wpf_baseline();
        let text = resolver.resolve_full_name("System.Windows.Controls.TextBox").unwrap();
        assert!(text.property("ActualWidth").unwrap().is_read_only());
    }
}
