//! Hover information implementation.
//!
//! Hover needs a successful parse: it finds the innermost named node under
//! the cursor and describes it, consulting the model for resource path
//! segments and property names.

use serde::{Deserialize, Serialize};

use crate::base::{Span, constants::SYSTEM_SEGMENTS};
use crate::metadata::{ContainerMember, DataModel, NavigationPropertyModel, PropertyModel};
use crate::parser::{
    Expr, OptionKind, OptionValue, ParseOptions, ParsedQuery, PropertyPath, QueryOption,
    SelectItem, functions, parse_with,
};
use crate::semantic::resolve::{
    MemberResolution, SegmentResolution, resolve_property_path, resolve_resource_path,
};

/// Result of a hover request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverResult {
    /// The hover content (markdown).
    pub contents: String,
    /// The hovered node.
    pub span: Span,
}

impl HoverResult {
    fn new(contents: impl Into<String>, span: Span) -> Self {
        Self {
            contents: contents.into(),
            span,
        }
    }
}

/// Get hover information at a byte offset.
pub fn hover(text: &str, offset: usize, model: Option<&DataModel>) -> Option<HoverResult> {
    hover_with(text, offset, model, &ParseOptions::default())
}

/// [`hover`] with explicit parse options.
pub fn hover_with(
    text: &str,
    offset: usize,
    model: Option<&DataModel>,
    options: &ParseOptions,
) -> Option<HoverResult> {
    let query = parse_with(text, options).ok()?;
    query_hover(&query, offset, model)
}

/// Hover over an already parsed request.
pub fn query_hover(query: &ParsedQuery, offset: usize, model: Option<&DataModel>) -> Option<HoverResult> {
    let mut resource_type = None;

    if let Some(path) = &query.resource_path {
        let resolved = model.map(|m| resolve_resource_path(path, m));
        for (i, segment) in path.segments.iter().enumerate() {
            if !segment.name.span.contains(offset) {
                continue;
            }
            let resolution = resolved.as_ref().and_then(|r| r.segments.get(i).copied());
            let contents = match resolution {
                Some(SegmentResolution::Member(member)) => member_markdown(member, model),
                Some(SegmentResolution::Navigation(nav)) => navigation_markdown(nav),
                Some(SegmentResolution::Property(property)) => property_markdown(property),
                _ if SYSTEM_SEGMENTS.contains(&segment.name.name.as_str()) => {
                    format!("**{}**\n\nSystem resource path segment", segment.name.name)
                }
                _ => return None,
            };
            return Some(HoverResult::new(contents, segment.name.span));
        }
        resource_type = resolved.and_then(|r| r.resource_type);
    }

    let hover = HoverFinder { model, offset };
    query
        .query_options
        .iter()
        .filter(|option| option.span.contains(offset))
        .find_map(|option| hover.option(option, resource_type))
}

struct HoverFinder<'a> {
    model: Option<&'a DataModel>,
    offset: usize,
}

impl<'a> HoverFinder<'a> {
    fn option(&self, option: &QueryOption, owner: Option<&'a str>) -> Option<HoverResult> {
        if option.name.span.contains(self.offset) {
            let contents = match option.kind {
                OptionKind::System(system) => {
                    format!("**{}**\n\n{}", system.name(), system.documentation())
                }
                OptionKind::Custom => format!("**{}**\n\nCustom query option", option.name.name),
            };
            return Some(HoverResult::new(contents, option.name.span));
        }

        match &option.value {
            OptionValue::Select(items) => items.iter().find_map(|item| match item {
                SelectItem::Path(path) => self.path(path, owner?),
                SelectItem::Star(_) => None,
            }),
            OptionValue::Expand(items) => items
                .iter()
                .filter(|item| item.span.contains(self.offset))
                .find_map(|item| {
                    if let Some(hit) = self.path(&item.path, owner?) {
                        return Some(hit);
                    }
                    let target = self.expand_target(&item.path, owner?);
                    item.options
                        .iter()
                        .filter(|nested| nested.span.contains(self.offset))
                        .find_map(|nested| self.option(nested, target))
                }),
            OptionValue::Filter(expr) => self.expr(expr, owner),
            OptionValue::OrderBy(items) => items.iter().find_map(|item| self.expr(&item.expr, owner)),
            _ => None,
        }
    }

    fn expand_target(&self, path: &PropertyPath, owner: &'a str) -> Option<&'a str> {
        let model = self.model?;
        path.segments.iter().try_fold(owner, |owner, ident| {
            model
                .find_navigation(owner, &ident.name)
                .map(|nav| nav.target.as_str())
        })
    }

    fn expr(&self, expr: &Expr, owner: Option<&'a str>) -> Option<HoverResult> {
        if !expr.span().contains(self.offset) {
            return None;
        }
        match expr {
            Expr::Binary(binary) => self
                .expr(&binary.lhs, owner)
                .or_else(|| self.expr(&binary.rhs, owner)),
            Expr::Unary(unary) => self.expr(&unary.operand, owner),
            Expr::Property(path) => self.path(path, owner?),
            Expr::Call(call) => {
                if call.name.span.contains(self.offset) {
                    let function = functions::lookup(&call.name.name)?;
                    let contents = format!("```\n{}\n```\n\n{}", function.label(), function.documentation);
                    return Some(HoverResult::new(contents, call.name.span));
                }
                call.args.iter().find_map(|arg| self.expr(arg, owner))
            }
            Expr::Literal(_) => None,
        }
    }

    fn path(&self, path: &PropertyPath, owner: &'a str) -> Option<HoverResult> {
        let model = self.model?;
        let (index, ident) = path
            .segments
            .iter()
            .enumerate()
            .find(|(_, ident)| ident.span.contains(self.offset))?;
        let resolutions = resolve_property_path(model, owner, &path.segments);
        let contents = match resolutions.get(index)? {
            MemberResolution::Navigation(nav) => navigation_markdown(nav),
            MemberResolution::Property(property) => property_markdown(property),
            MemberResolution::Unresolved { .. } => return None,
        };
        Some(HoverResult::new(contents, ident.span))
    }
}

fn member_markdown(member: ContainerMember<'_>, model: Option<&DataModel>) -> String {
    let mut out = format!("**{}** ({})", member.name(), member.kind_label());
    if let Some(ty) = member.result_type() {
        if ty.collection {
            out.push_str(&format!("\n\nType: `Collection({})`", ty.name));
        } else {
            out.push_str(&format!("\n\nType: `{}`", ty.name));
        }
        let keys = model.map(|m| m.keys(&ty.name)).unwrap_or_default();
        if !keys.is_empty() {
            out.push_str(&format!("\n\nKey: `{}`", keys.join("`, `")));
        }
    }
    out
}

fn property_markdown(property: &PropertyModel) -> String {
    let ty = if property.collection {
        format!("Collection({})", property.type_name)
    } else {
        property.type_name.clone()
    };
    let nullable = if property.nullable { "nullable" } else { "not nullable" };
    format!("**{}**: `{ty}`\n\nProperty, {nullable}", property.name)
}

fn navigation_markdown(nav: &NavigationPropertyModel) -> String {
    let cardinality = if nav.collection { "many" } else { "one" };
    let mut out = format!(
        "**{}** → `{}`\n\nNavigation property (to {cardinality})",
        nav.name, nav.target
    );
    if let Some(binding) = &nav.binding {
        out.push_str(&format!("\n\nBound to entity set `{binding}`"));
    }
    out
}
