//! The digested entity-relationship model.
//!
//! A [`DataModel`] is built once per metadata document and never mutated
//! afterwards. All maps are keyed by fully qualified name (or, inside the
//! container, by exposed name) and keep declaration order.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::base::ODataVersion;

/// A schema namespace with its optional alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyModel {
    pub name: String,
    /// Element type, alias-resolved (`Edm.String`, `Demo.Address`).
    pub type_name: String,
    /// Declared as `Collection(...)`.
    pub collection: bool,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationPropertyModel {
    pub name: String,
    /// Fully qualified name of the target entity type.
    pub target: String,
    pub collection: bool,
    /// Entity set the navigation lands in, when the container binds it.
    pub binding: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityType {
    pub name: String,
    pub fqn: String,
    pub namespace: String,
    pub keys: Vec<String>,
    pub properties: Vec<PropertyModel>,
    pub navigation_properties: Vec<NavigationPropertyModel>,
    pub base_type: Option<String>,
    pub is_abstract: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexType {
    pub name: String,
    pub fqn: String,
    pub namespace: String,
    pub properties: Vec<PropertyModel>,
    pub base_type: Option<String>,
}

/// A type reference such as a function import's return type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    pub collection: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySet {
    pub name: String,
    pub entity_type: String,
    /// Navigation property path → target entity set.
    pub navigation_bindings: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Singleton {
    pub name: String,
    pub entity_type: String,
    pub navigation_bindings: IndexMap<String, String>,
}

/// A function or action import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationImport {
    pub name: String,
    /// Fully qualified name of the imported function or action, when the
    /// document names one.
    pub operation: Option<String>,
    pub return_type: Option<TypeRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityContainer {
    pub name: String,
    pub entity_sets: IndexMap<String, EntitySet>,
    pub singletons: IndexMap<String, Singleton>,
    pub function_imports: IndexMap<String, OperationImport>,
    pub action_imports: IndexMap<String, OperationImport>,
}

/// A simple type name declared in more than one namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCollision {
    pub name: String,
    pub namespaces: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataModel {
    pub version: ODataVersion,
    pub namespaces: Vec<Namespace>,
    pub service_namespace: Option<String>,
    pub entity_types: IndexMap<String, EntityType>,
    pub complex_types: IndexMap<String, ComplexType>,
    pub container: EntityContainer,
    pub name_collisions: Vec<NameCollision>,
}

/// A container member addressable as the first resource path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerMember<'m> {
    EntitySet(&'m EntitySet),
    Singleton(&'m Singleton),
    FunctionImport(&'m OperationImport),
    ActionImport(&'m OperationImport),
}

impl<'m> ContainerMember<'m> {
    pub fn name(&self) -> &'m str {
        match *self {
            ContainerMember::EntitySet(s) => &s.name,
            ContainerMember::Singleton(s) => &s.name,
            ContainerMember::FunctionImport(f) | ContainerMember::ActionImport(f) => &f.name,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            ContainerMember::EntitySet(_) => "entity set",
            ContainerMember::Singleton(_) => "singleton",
            ContainerMember::FunctionImport(_) => "function import",
            ContainerMember::ActionImport(_) => "action import",
        }
    }

    /// The type the member yields, with its collection flag.
    pub fn result_type(&self) -> Option<TypeRef> {
        match self {
            ContainerMember::EntitySet(s) => Some(TypeRef {
                name: s.entity_type.clone(),
                collection: true,
            }),
            ContainerMember::Singleton(s) => Some(TypeRef {
                name: s.entity_type.clone(),
                collection: false,
            }),
            ContainerMember::FunctionImport(f) | ContainerMember::ActionImport(f) => {
                f.return_type.clone()
            }
        }
    }
}

/// An entity or complex type; both carry structural properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuredType<'m> {
    Entity(&'m EntityType),
    Complex(&'m ComplexType),
}

impl<'m> StructuredType<'m> {
    pub fn fqn(&self) -> &'m str {
        match *self {
            StructuredType::Entity(t) => &t.fqn,
            StructuredType::Complex(t) => &t.fqn,
        }
    }

    fn base_type(&self) -> Option<&'m str> {
        match *self {
            StructuredType::Entity(t) => t.base_type.as_deref(),
            StructuredType::Complex(t) => t.base_type.as_deref(),
        }
    }

    fn own_properties(&self) -> &'m [PropertyModel] {
        match *self {
            StructuredType::Entity(t) => &t.properties,
            StructuredType::Complex(t) => &t.properties,
        }
    }

    fn own_navigation(&self) -> &'m [NavigationPropertyModel] {
        match *self {
            StructuredType::Entity(t) => &t.navigation_properties,
            StructuredType::Complex(_) => &[],
        }
    }
}

impl DataModel {
    pub fn entity_type(&self, fqn: &str) -> Option<&EntityType> {
        self.entity_types.get(fqn)
    }

    pub fn complex_type(&self, fqn: &str) -> Option<&ComplexType> {
        self.complex_types.get(fqn)
    }

    pub fn structured_type(&self, fqn: &str) -> Option<StructuredType<'_>> {
        self.entity_type(fqn)
            .map(StructuredType::Entity)
            .or_else(|| self.complex_type(fqn).map(StructuredType::Complex))
    }

    /// Container member by exposed name.
    pub fn container_member(&self, name: &str) -> Option<ContainerMember<'_>> {
        let c = &self.container;
        c.entity_sets
            .get(name)
            .map(ContainerMember::EntitySet)
            .or_else(|| c.singletons.get(name).map(ContainerMember::Singleton))
            .or_else(|| c.function_imports.get(name).map(ContainerMember::FunctionImport))
            .or_else(|| c.action_imports.get(name).map(ContainerMember::ActionImport))
    }

    /// All container members: entity sets, singletons, function imports,
    /// action imports, each group in declaration order.
    pub fn container_members(&self) -> impl Iterator<Item = ContainerMember<'_>> {
        let c = &self.container;
        c.entity_sets
            .values()
            .map(ContainerMember::EntitySet)
            .chain(c.singletons.values().map(ContainerMember::Singleton))
            .chain(c.function_imports.values().map(ContainerMember::FunctionImport))
            .chain(c.action_imports.values().map(ContainerMember::ActionImport))
    }

    /// The type followed by its base types, most derived first.
    fn type_chain(&self, fqn: &str) -> Vec<StructuredType<'_>> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        let mut next = self.structured_type(fqn);
        while let Some(ty) = next {
            if !seen.insert(ty.fqn()) {
                break;
            }
            chain.push(ty);
            next = ty.base_type().and_then(|base| self.structured_type(base));
        }
        chain
    }

    /// Structural properties including inherited ones, base type first.
    pub fn properties(&self, type_fqn: &str) -> Vec<&PropertyModel> {
        self.type_chain(type_fqn)
            .iter()
            .rev()
            .flat_map(|ty| ty.own_properties())
            .collect()
    }

    /// Navigation properties including inherited ones, base type first.
    pub fn navigation_properties(&self, type_fqn: &str) -> Vec<&NavigationPropertyModel> {
        self.type_chain(type_fqn)
            .iter()
            .rev()
            .flat_map(|ty| ty.own_navigation())
            .collect()
    }

    pub fn find_property(&self, type_fqn: &str, name: &str) -> Option<&PropertyModel> {
        self.type_chain(type_fqn)
            .into_iter()
            .find_map(|ty| ty.own_properties().iter().find(|p| p.name == name))
    }

    pub fn find_navigation(&self, type_fqn: &str, name: &str) -> Option<&NavigationPropertyModel> {
        self.type_chain(type_fqn)
            .into_iter()
            .find_map(|ty| ty.own_navigation().iter().find(|n| n.name == name))
    }

    /// Key property names, taken from the first type in the chain that
    /// declares a key.
    pub fn keys(&self, entity_fqn: &str) -> Vec<&str> {
        self.type_chain(entity_fqn)
            .into_iter()
            .find_map(|ty| match ty {
                StructuredType::Entity(t) if !t.keys.is_empty() => {
                    Some(t.keys.iter().map(String::as_str).collect())
                }
                _ => None,
            })
            .unwrap_or_default()
    }
}
