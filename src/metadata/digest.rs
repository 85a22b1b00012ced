//! EDMX/CSDL digestion.
//!
//! ## Pipeline
//!
//! ```text
//! XML text
//!     ↓
//! xml::parse_document → owned element tree, namespaces resolved
//!     ↓
//! strip_namespaces (vendor extensions)
//!     ↓
//! SchemaDocument::read → Legacy | Modern raw shapes, version checked once
//!     ↓
//! ModelBuilder → DataModel (names resolved, navigation targets verified)
//! ```

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, warn};

use super::error::DigestionError;
use super::model::*;
use super::xml::{XmlElement, parse_document};
use crate::base::ODataVersion;
use crate::base::constants::{DATASERVICES_METADATA_NS, EDMX_NS_LEGACY, EDMX_NS_MODERN};

/// Digestion options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestOptions {
    /// Namespace URIs whose elements and attributes are removed before
    /// digestion (vendor annotations such as SAP's).
    pub strip_namespaces: Vec<String>,
}

/// Turns EDMX documents into [`DataModel`]s.
#[derive(Debug, Clone, Default)]
pub struct Digester {
    options: DigestOptions,
}

/// Digest a document with default options.
pub fn digest(xml: &str) -> Result<DataModel, DigestionError> {
    Digester::new().digest(xml)
}

impl Digester {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DigestOptions) -> Self {
        Self { options }
    }

    pub fn digest(&self, xml: &str) -> Result<DataModel, DigestionError> {
        let mut root = parse_document(xml)?;
        root.strip_namespaces(&self.options.strip_namespaces);

        let document = SchemaDocument::read(&root)?;
        let model = document.build()?;

        info!(
            version = model.version.as_str(),
            entity_types = model.entity_types.len(),
            complex_types = model.complex_types.len(),
            container = %model.container.name,
            collisions = model.name_collisions.len(),
            "digested metadata"
        );
        Ok(model)
    }
}

// ============================================================================
// RAW SHAPES
// ============================================================================

/// A metadata document, dispatched on its EDMX version.
#[derive(Debug, Clone)]
pub enum SchemaDocument {
    /// `Version="1.0"`: associations, `Relationship`/`ToRole` navigation.
    Legacy(LegacyDocument),
    /// `Version="4.0"`/`"4.01"`: typed navigation, singletons, actions.
    Modern(ModernDocument),
}

#[derive(Debug, Clone)]
pub struct LegacyDocument {
    pub schemas: Vec<RawSchema<LegacyNavigation>>,
    /// Associations keyed by fully qualified name.
    pub associations: FxHashMap<String, RawAssociation>,
}

#[derive(Debug, Clone)]
pub struct ModernDocument {
    pub schemas: Vec<RawSchema<ModernNavigation>>,
    /// Functions and actions keyed by fully qualified name; the first
    /// overload wins.
    pub operations: FxHashMap<String, RawOperation>,
}

#[derive(Debug, Clone)]
pub struct RawSchema<N> {
    pub namespace: String,
    pub alias: Option<String>,
    pub entity_types: Vec<RawEntityType<N>>,
    pub complex_types: Vec<RawComplexType>,
    pub containers: Vec<RawContainer>,
}

#[derive(Debug, Clone)]
pub struct RawEntityType<N> {
    pub name: String,
    pub keys: Vec<String>,
    pub properties: Vec<RawProperty>,
    pub navigation: Vec<N>,
    pub base_type: Option<String>,
    pub is_abstract: bool,
}

#[derive(Debug, Clone)]
pub struct RawComplexType {
    pub name: String,
    pub properties: Vec<RawProperty>,
    pub base_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RawProperty {
    pub name: String,
    pub type_name: String,
    pub nullable: bool,
}

#[derive(Debug, Clone)]
pub struct LegacyNavigation {
    pub name: String,
    pub relationship: String,
    pub to_role: String,
}

#[derive(Debug, Clone)]
pub struct ModernNavigation {
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone)]
pub struct RawAssociation {
    /// (role, end type, multiplicity)
    pub ends: Vec<(String, String, String)>,
}

#[derive(Debug, Clone)]
pub struct RawOperation {
    pub return_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RawContainer {
    pub name: String,
    pub is_default: bool,
    pub entity_sets: Vec<RawEntitySet>,
    pub singletons: Vec<RawEntitySet>,
    pub function_imports: Vec<RawImport>,
    pub action_imports: Vec<RawImport>,
    pub association_sets: Vec<RawAssociationSet>,
}

#[derive(Debug, Clone)]
pub struct RawEntitySet {
    pub name: String,
    pub entity_type: String,
    /// `NavigationPropertyBinding` path → target
    pub bindings: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct RawImport {
    pub name: String,
    /// Legacy `ReturnType` attribute.
    pub return_type: Option<String>,
    /// Modern `Function`/`Action` attribute.
    pub operation: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RawAssociationSet {
    pub association: String,
    /// Role → entity set
    pub ends: Vec<(String, String)>,
}

// ============================================================================
// READING
// ============================================================================

impl SchemaDocument {
    /// Check the envelope and read the raw shapes for its version.
    pub fn read(root: &XmlElement) -> Result<Self, DigestionError> {
        let known_ns = matches!(
            root.namespace.as_deref(),
            Some(EDMX_NS_LEGACY) | Some(EDMX_NS_MODERN)
        );
        if root.name != "Edmx" || !known_ns {
            let found = match &root.namespace {
                Some(ns) => format!("{{{ns}}}{}", root.name),
                None => root.name.clone(),
            };
            return Err(DigestionError::NotEdmx(found));
        }

        let version = root.required_attr("Version")?;
        let legacy = match version {
            "1.0" => true,
            "4.0" | "4.01" => false,
            other => return Err(DigestionError::UnsupportedVersion(other.to_string())),
        };

        let data_services = root
            .child("DataServices")
            .ok_or_else(|| DigestionError::missing_element("DataServices"))?;
        let schemas = data_services.children_named("Schema");

        if legacy {
            let mut document = LegacyDocument {
                schemas: Vec::new(),
                associations: FxHashMap::default(),
            };
            for schema in schemas {
                let raw = read_schema(schema, read_legacy_navigation)?;
                for association in schema.children_named("Association") {
                    let name = association.required_attr("Name")?;
                    let ends = association
                        .children_named("End")
                        .map(|end| -> Result<_, DigestionError> {
                            Ok((
                                end.required_attr("Role")?.to_string(),
                                end.required_attr("Type")?.to_string(),
                                end.attr("Multiplicity").unwrap_or("1").to_string(),
                            ))
                        })
                        .collect::<Result<Vec<_>, DigestionError>>()?;
                    let entry = RawAssociation { ends };
                    document
                        .associations
                        .insert(format!("{}.{name}", raw.namespace), entry.clone());
                    if let Some(alias) = &raw.alias {
                        document.associations.insert(format!("{alias}.{name}"), entry);
                    }
                }
                document.schemas.push(raw);
            }
            Ok(SchemaDocument::Legacy(document))
        } else {
            let mut document = ModernDocument {
                schemas: Vec::new(),
                operations: FxHashMap::default(),
            };
            for schema in schemas {
                let raw = read_schema(schema, read_modern_navigation)?;
                let operations = schema
                    .children
                    .iter()
                    .filter(|c| c.name == "Function" || c.name == "Action");
                for operation in operations {
                    let name = operation.required_attr("Name")?;
                    let return_type = operation
                        .child("ReturnType")
                        .and_then(|r| r.attr("Type"))
                        .map(str::to_string);
                    document
                        .operations
                        .entry(format!("{}.{name}", raw.namespace))
                        .or_insert(RawOperation { return_type });
                }
                document.schemas.push(raw);
            }
            Ok(SchemaDocument::Modern(document))
        }
    }

    pub fn version(&self) -> ODataVersion {
        match self {
            SchemaDocument::Legacy(_) => ODataVersion::V2,
            SchemaDocument::Modern(_) => ODataVersion::V4,
        }
    }

    /// Resolve names and assemble the model.
    pub fn build(&self) -> Result<DataModel, DigestionError> {
        match self {
            SchemaDocument::Legacy(document) => {
                let builder = ModelBuilder::new(self.version(), &document.schemas);
                builder.build(
                    &document.schemas,
                    |b, owner, nav, container| b.legacy_navigation(document, owner, nav, container),
                    |b, import| b.legacy_import_type(import),
                )
            }
            SchemaDocument::Modern(document) => {
                let builder = ModelBuilder::new(self.version(), &document.schemas);
                builder.build(
                    &document.schemas,
                    |b, owner, nav, container| b.modern_navigation(owner, nav, container),
                    |b, import| b.modern_import_type(document, import),
                )
            }
        }
    }
}

fn read_schema<N>(
    schema: &XmlElement,
    read_navigation: fn(&XmlElement) -> Result<N, DigestionError>,
) -> Result<RawSchema<N>, DigestionError> {
    let namespace = schema.required_attr("Namespace")?.to_string();
    let alias = schema.attr("Alias").map(str::to_string);

    let entity_types = schema
        .children_named("EntityType")
        .map(|ty| -> Result<_, DigestionError> {
            Ok(RawEntityType {
                name: ty.required_attr("Name")?.to_string(),
                keys: ty
                    .child("Key")
                    .map(|key| {
                        key.children_named("PropertyRef")
                            .filter_map(|r| r.attr("Name"))
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
                properties: read_properties(ty)?,
                navigation: ty
                    .children_named("NavigationProperty")
                    .map(read_navigation)
                    .collect::<Result<_, _>>()?,
                base_type: ty.attr("BaseType").map(str::to_string),
                is_abstract: ty.attr("Abstract") == Some("true"),
            })
        })
        .collect::<Result<Vec<_>, DigestionError>>()?;

    let complex_types = schema
        .children_named("ComplexType")
        .map(|ty| -> Result<_, DigestionError> {
            Ok(RawComplexType {
                name: ty.required_attr("Name")?.to_string(),
                properties: read_properties(ty)?,
                base_type: ty.attr("BaseType").map(str::to_string),
            })
        })
        .collect::<Result<Vec<_>, DigestionError>>()?;

    let containers = schema
        .children_named("EntityContainer")
        .map(read_container)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RawSchema {
        namespace,
        alias,
        entity_types,
        complex_types,
        containers,
    })
}

fn read_properties(ty: &XmlElement) -> Result<Vec<RawProperty>, DigestionError> {
    ty.children_named("Property")
        .map(|p| -> Result<_, DigestionError> {
            Ok(RawProperty {
                name: p.required_attr("Name")?.to_string(),
                type_name: p.required_attr("Type")?.to_string(),
                nullable: p.attr("Nullable") != Some("false"),
            })
        })
        .collect()
}

fn read_legacy_navigation(nav: &XmlElement) -> Result<LegacyNavigation, DigestionError> {
    Ok(LegacyNavigation {
        name: nav.required_attr("Name")?.to_string(),
        relationship: nav.required_attr("Relationship")?.to_string(),
        to_role: nav.required_attr("ToRole")?.to_string(),
    })
}

fn read_modern_navigation(nav: &XmlElement) -> Result<ModernNavigation, DigestionError> {
    Ok(ModernNavigation {
        name: nav.required_attr("Name")?.to_string(),
        type_name: nav.required_attr("Type")?.to_string(),
    })
}

fn read_container(container: &XmlElement) -> Result<RawContainer, DigestionError> {
    let read_set = |set: &XmlElement, type_attr: &str| -> Result<_, DigestionError> {
        Ok(RawEntitySet {
            name: set.required_attr("Name")?.to_string(),
            entity_type: set.required_attr(type_attr)?.to_string(),
            bindings: set
                .children_named("NavigationPropertyBinding")
                .filter_map(|b| Some((b.attr("Path")?.to_string(), b.attr("Target")?.to_string())))
                .collect(),
        })
    };
    let read_import = |import: &XmlElement, operation_attr: &str| -> Result<_, DigestionError> {
        Ok(RawImport {
            name: import.required_attr("Name")?.to_string(),
            return_type: import.attr("ReturnType").map(str::to_string),
            operation: import.attr(operation_attr).map(str::to_string),
        })
    };

    Ok(RawContainer {
        name: container.required_attr("Name")?.to_string(),
        is_default: container.attr_ns(DATASERVICES_METADATA_NS, "IsDefaultEntityContainer")
            == Some("true"),
        entity_sets: container
            .children_named("EntitySet")
            .map(|s| read_set(s, "EntityType"))
            .collect::<Result<_, DigestionError>>()?,
        singletons: container
            .children_named("Singleton")
            .map(|s| read_set(s, "Type"))
            .collect::<Result<_, DigestionError>>()?,
        function_imports: container
            .children_named("FunctionImport")
            .map(|i| read_import(i, "Function"))
            .collect::<Result<_, DigestionError>>()?,
        action_imports: container
            .children_named("ActionImport")
            .map(|i| read_import(i, "Action"))
            .collect::<Result<_, DigestionError>>()?,
        association_sets: container
            .children_named("AssociationSet")
            .map(|set| -> Result<_, DigestionError> {
                Ok(RawAssociationSet {
                    association: set.required_attr("Association")?.to_string(),
                    ends: set
                        .children_named("End")
                        .filter_map(|e| Some((e.attr("Role")?.to_string(), e.attr("EntitySet")?.to_string())))
                        .collect(),
                })
            })
            .collect::<Result<_, DigestionError>>()?,
    })
}

// ============================================================================
// BUILDING
// ============================================================================

/// Strip a `Collection(...)` wrapper.
fn unwrap_collection(type_name: &str) -> (&str, bool) {
    match type_name
        .strip_prefix("Collection(")
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(inner) => (inner.trim(), true),
        None => (type_name.trim(), false),
    }
}

struct ModelBuilder {
    version: ODataVersion,
    namespaces: Vec<Namespace>,
    /// Alias → namespace
    aliases: FxHashMap<String, String>,
    entity_fqns: FxHashSet<String>,
}

impl ModelBuilder {
    fn new<N>(version: ODataVersion, schemas: &[RawSchema<N>]) -> Self {
        let namespaces = schemas
            .iter()
            .map(|s| Namespace {
                name: s.namespace.clone(),
                alias: s.alias.clone(),
            })
            .collect();
        let aliases = schemas
            .iter()
            .filter_map(|s| Some((s.alias.clone()?, s.namespace.clone())))
            .collect();
        let entity_fqns = schemas
            .iter()
            .flat_map(|s| {
                s.entity_types
                    .iter()
                    .map(move |t| format!("{}.{}", s.namespace, t.name))
            })
            .collect();
        Self {
            version,
            namespaces,
            aliases,
            entity_fqns,
        }
    }

    /// Resolve an alias-qualified name to its namespace-qualified form.
    fn qualify(&self, name: &str) -> String {
        match name.rsplit_once('.') {
            Some((prefix, simple)) => match self.aliases.get(prefix) {
                Some(namespace) => format!("{namespace}.{simple}"),
                None => name.to_string(),
            },
            None => name.to_string(),
        }
    }

    fn type_ref(&self, type_name: &str) -> TypeRef {
        let (inner, collection) = unwrap_collection(type_name);
        TypeRef {
            name: self.qualify(inner),
            collection,
        }
    }

    fn require_entity(&self, type_name: &str) -> Result<String, DigestionError> {
        let fqn = self.qualify(type_name);
        if self.entity_fqns.contains(&fqn) {
            Ok(fqn)
        } else {
            Err(DigestionError::UnresolvedType(type_name.to_string()))
        }
    }

    fn properties(&self, raw: &[RawProperty]) -> Vec<PropertyModel> {
        raw.iter()
            .map(|p| {
                let ty = self.type_ref(&p.type_name);
                PropertyModel {
                    name: p.name.clone(),
                    type_name: ty.name,
                    collection: ty.collection,
                    nullable: p.nullable,
                }
            })
            .collect()
    }

    fn build<N>(
        self,
        schemas: &[RawSchema<N>],
        navigation: impl Fn(&Self, &str, &N, Option<&RawContainer>) -> Result<NavigationPropertyModel, DigestionError>,
        import_type: impl Fn(&Self, &RawImport) -> Option<TypeRef>,
    ) -> Result<DataModel, DigestionError> {
        let service_namespace = schemas
            .iter()
            .find(|s| !s.namespace.is_empty() && !s.entity_types.is_empty())
            .or_else(|| schemas.first())
            .map(|s| s.namespace.clone());

        let raw_container = select_container(schemas);

        let mut entity_types = IndexMap::new();
        for schema in schemas {
            for raw in &schema.entity_types {
                let fqn = format!("{}.{}", schema.namespace, raw.name);
                let navigation_properties = raw
                    .navigation
                    .iter()
                    .map(|nav| navigation(&self, &fqn, nav, raw_container))
                    .collect::<Result<Vec<_>, _>>()?;
                entity_types.insert(
                    fqn.clone(),
                    EntityType {
                        name: raw.name.clone(),
                        fqn,
                        namespace: schema.namespace.clone(),
                        keys: raw.keys.clone(),
                        properties: self.properties(&raw.properties),
                        navigation_properties,
                        base_type: raw.base_type.as_deref().map(|b| self.qualify(b)),
                        is_abstract: raw.is_abstract,
                    },
                );
            }
        }

        let mut complex_types = IndexMap::new();
        for schema in schemas {
            for raw in &schema.complex_types {
                let fqn = format!("{}.{}", schema.namespace, raw.name);
                complex_types.insert(
                    fqn.clone(),
                    ComplexType {
                        name: raw.name.clone(),
                        fqn,
                        namespace: schema.namespace.clone(),
                        properties: self.properties(&raw.properties),
                        base_type: raw.base_type.as_deref().map(|b| self.qualify(b)),
                    },
                );
            }
        }

        let container = match raw_container {
            Some(raw) => self.container(raw, &import_type)?,
            None => {
                debug!("metadata declares no entity container");
                EntityContainer::default()
            }
        };

        let name_collisions = collisions(&entity_types, &complex_types);
        for collision in &name_collisions {
            warn!(
                name = %collision.name,
                namespaces = ?collision.namespaces,
                "type name declared in several namespaces"
            );
        }

        Ok(DataModel {
            version: self.version,
            namespaces: self.namespaces,
            service_namespace,
            entity_types,
            complex_types,
            container,
            name_collisions,
        })
    }

    fn container(
        &self,
        raw: &RawContainer,
        import_type: &impl Fn(&Self, &RawImport) -> Option<TypeRef>,
    ) -> Result<EntityContainer, DigestionError> {
        let mut container = EntityContainer {
            name: raw.name.clone(),
            ..EntityContainer::default()
        };
        for set in &raw.entity_sets {
            container.entity_sets.insert(
                set.name.clone(),
                EntitySet {
                    name: set.name.clone(),
                    entity_type: self.require_entity(&set.entity_type)?,
                    navigation_bindings: set.bindings.iter().cloned().collect(),
                },
            );
        }
        for singleton in &raw.singletons {
            container.singletons.insert(
                singleton.name.clone(),
                Singleton {
                    name: singleton.name.clone(),
                    entity_type: self.require_entity(&singleton.entity_type)?,
                    navigation_bindings: singleton.bindings.iter().cloned().collect(),
                },
            );
        }
        for import in &raw.function_imports {
            container.function_imports.insert(
                import.name.clone(),
                OperationImport {
                    name: import.name.clone(),
                    operation: import.operation.as_deref().map(|o| self.qualify(o)),
                    return_type: import_type(self, import),
                },
            );
        }
        for import in &raw.action_imports {
            container.action_imports.insert(
                import.name.clone(),
                OperationImport {
                    name: import.name.clone(),
                    operation: import.operation.as_deref().map(|o| self.qualify(o)),
                    return_type: import_type(self, import),
                },
            );
        }
        Ok(container)
    }

    fn legacy_navigation(
        &self,
        document: &LegacyDocument,
        owner: &str,
        nav: &LegacyNavigation,
        container: Option<&RawContainer>,
    ) -> Result<NavigationPropertyModel, DigestionError> {
        let association = document
            .associations
            .get(&nav.relationship)
            .ok_or_else(|| DigestionError::UnresolvedType(nav.relationship.clone()))?;
        let unresolved = || DigestionError::UnresolvedNavigation {
            owner: owner.to_string(),
            property: nav.name.clone(),
            target: nav.to_role.clone(),
        };
        let (_, end_type, multiplicity) = association
            .ends
            .iter()
            .find(|(role, _, _)| *role == nav.to_role)
            .ok_or_else(unresolved)?;

        let target = self.qualify(end_type);
        if !self.entity_fqns.contains(&target) {
            return Err(DigestionError::UnresolvedNavigation {
                owner: owner.to_string(),
                property: nav.name.clone(),
                target,
            });
        }

        let relationship = self.qualify(&nav.relationship);
        let binding = container.and_then(|c| {
            c.association_sets
                .iter()
                .filter(|set| self.qualify(&set.association) == relationship)
                .find_map(|set| {
                    set.ends
                        .iter()
                        .find(|(role, _)| *role == nav.to_role)
                        .map(|(_, entity_set)| entity_set.clone())
                })
        });

        Ok(NavigationPropertyModel {
            name: nav.name.clone(),
            target,
            collection: multiplicity == "*",
            binding,
        })
    }

    fn modern_navigation(
        &self,
        owner: &str,
        nav: &ModernNavigation,
        container: Option<&RawContainer>,
    ) -> Result<NavigationPropertyModel, DigestionError> {
        let ty = self.type_ref(&nav.type_name);
        if !self.entity_fqns.contains(&ty.name) {
            return Err(DigestionError::UnresolvedNavigation {
                owner: owner.to_string(),
                property: nav.name.clone(),
                target: ty.name,
            });
        }

        // A binding on any set of the owning type applies.
        let binding = container.and_then(|c| {
            c.entity_sets
                .iter()
                .chain(&c.singletons)
                .filter(|set| self.qualify(&set.entity_type) == owner)
                .find_map(|set| {
                    set.bindings
                        .iter()
                        .find(|(path, _)| *path == nav.name)
                        .map(|(_, target)| target.clone())
                })
        });

        Ok(NavigationPropertyModel {
            name: nav.name.clone(),
            target: ty.name,
            collection: ty.collection,
            binding,
        })
    }

    fn legacy_import_type(&self, import: &RawImport) -> Option<TypeRef> {
        import.return_type.as_deref().map(|t| self.type_ref(t))
    }

    fn modern_import_type(&self, document: &ModernDocument, import: &RawImport) -> Option<TypeRef> {
        let operation = self.qualify(import.operation.as_deref()?);
        document
            .operations
            .get(&operation)
            .and_then(|op| op.return_type.as_deref())
            .map(|t| self.type_ref(t))
    }
}

/// The default container (legacy `m:IsDefaultEntityContainer`), else the
/// first one declared.
fn select_container<N>(schemas: &[RawSchema<N>]) -> Option<&RawContainer> {
    let mut containers = schemas.iter().flat_map(|s| &s.containers);
    let first = containers.clone().next();
    containers.find(|c| c.is_default).or(first)
}

fn collisions(
    entity_types: &IndexMap<String, EntityType>,
    complex_types: &IndexMap<String, ComplexType>,
) -> Vec<NameCollision> {
    let mut by_name: IndexMap<&str, Vec<String>> = IndexMap::new();
    let declared = entity_types
        .values()
        .map(|t| (t.name.as_str(), &t.namespace))
        .chain(complex_types.values().map(|t| (t.name.as_str(), &t.namespace)));
    for (name, namespace) in declared {
        let namespaces = by_name.entry(name).or_default();
        if !namespaces.contains(namespace) {
            namespaces.push(namespace.clone());
        }
    }
    by_name
        .into_iter()
        .filter(|(_, namespaces)| namespaces.len() > 1)
        .map(|(name, namespaces)| NameCollision {
            name: name.to_string(),
            namespaces,
        })
        .collect()
}
