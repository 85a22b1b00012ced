//! Name resolution against a [`DataModel`].
//!
//! Shared by the analyzer (which reports what fails to resolve), completion
//! (which needs the type reached at the cursor) and hover.

use crate::metadata::{ContainerMember, DataModel, NavigationPropertyModel, PropertyModel};
use crate::parser::{Ident, ResourcePath, SegmentKind};

/// What a single resource path segment resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentResolution<'m> {
    Member(ContainerMember<'m>),
    Navigation(&'m NavigationPropertyModel),
    Property(&'m PropertyModel),
    /// `$count`, `$value`, `$ref`, `$metadata`, `$batch`
    System,
    /// Not checked: type tracking ended earlier.
    Untracked,
    Unresolved,
}

/// Per-segment outcome plus the structured type reached at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath<'m> {
    pub segments: Vec<SegmentResolution<'m>>,
    /// Fully qualified entity or complex type the path yields, if tracked.
    pub resource_type: Option<&'m str>,
}

impl ResolvedPath<'_> {
    /// The leftmost segment failed to resolve.
    pub fn root_unresolved(&self) -> bool {
        matches!(self.segments.first(), Some(SegmentResolution::Unresolved))
    }
}

/// The structured type a type name denotes in the model, if any.
fn structured<'m>(model: &'m DataModel, type_name: &str) -> Option<&'m str> {
    model.structured_type(type_name).map(|ty| ty.fqn())
}

/// Resolve a resource path from its leftmost segment.
///
/// The first identifier must be a container member; an unresolved root
/// leaves every later segment untracked. A structural property, a
/// namespace-qualified segment (cast or bound operation) or a system segment
/// ends type tracking.
pub fn resolve_resource_path<'m>(path: &ResourcePath, model: &'m DataModel) -> ResolvedPath<'m> {
    let mut segments = Vec::with_capacity(path.segments.len());
    let mut current: Option<&'m str> = None;

    for (i, segment) in path.segments.iter().enumerate() {
        let resolution = if segment.kind != SegmentKind::Identifier {
            current = None;
            SegmentResolution::System
        } else if i == 0 {
            match model.container_member(&segment.name.name) {
                Some(member) => {
                    current = member
                        .result_type()
                        .and_then(|ty| structured(model, &ty.name));
                    SegmentResolution::Member(member)
                }
                None => SegmentResolution::Unresolved,
            }
        } else {
            match current {
                None => SegmentResolution::Untracked,
                Some(_) if segment.is_qualified() => {
                    current = None;
                    SegmentResolution::Untracked
                }
                Some(owner) => {
                    if let Some(nav) = model.find_navigation(owner, &segment.name.name) {
                        current = Some(structured(model, &nav.target).unwrap_or(&nav.target));
                        SegmentResolution::Navigation(nav)
                    } else if let Some(property) = model.find_property(owner, &segment.name.name) {
                        current = None;
                        SegmentResolution::Property(property)
                    } else {
                        current = None;
                        SegmentResolution::Unresolved
                    }
                }
            }
        };

        let stop = i == 0 && resolution == SegmentResolution::Unresolved;
        segments.push(resolution);
        if stop {
            segments.resize(path.segments.len(), SegmentResolution::Untracked);
            break;
        }
    }

    ResolvedPath {
        segments,
        resource_type: current,
    }
}

/// What a member of a property path resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberResolution<'m> {
    Navigation(&'m NavigationPropertyModel),
    Property(&'m PropertyModel),
    Unresolved {
        /// Type the name was looked up on.
        owner: &'m str,
    },
}

/// Resolve `A/B/C` starting at `type_fqn`; navigation properties and
/// complex-typed properties descend, primitive properties end the walk.
pub fn resolve_property_path<'m>(
    model: &'m DataModel,
    type_fqn: &'m str,
    segments: &[Ident],
) -> Vec<MemberResolution<'m>> {
    let mut out = Vec::with_capacity(segments.len());
    let mut current = Some(type_fqn);

    for ident in segments {
        let Some(owner) = current else {
            break;
        };
        if let Some(nav) = model.find_navigation(owner, &ident.name) {
            current = structured(model, &nav.target);
            out.push(MemberResolution::Navigation(nav));
        } else if let Some(property) = model.find_property(owner, &ident.name) {
            current = structured(model, &property.type_name);
            out.push(MemberResolution::Property(property));
        } else {
            current = None;
            out.push(MemberResolution::Unresolved { owner });
        }
    }

    out
}

/// The type a property path prefix such as `Customer/` lands on, used by
/// completion to scope candidates.
pub fn type_at_path<'m>(model: &'m DataModel, type_fqn: &'m str, names: &[&str]) -> Option<&'m str> {
    names.iter().try_fold(type_fqn, |owner, name| {
        if let Some(nav) = model.find_navigation(owner, name) {
            structured(model, &nav.target)
        } else {
            model
                .find_property(owner, name)
                .and_then(|p| structured(model, &p.type_name))
        }
    })
}
