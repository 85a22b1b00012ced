//! Semantic analysis: cross-references a parsed request with a model.
//!
//! Every finding is a warning: an unknown name makes the request suspicious,
//! not unusable.

use tracing::trace;

use super::diagnostics::{Diagnostic, DiagnosticCollector};
use super::resolve::{
    MemberResolution, SegmentResolution, resolve_property_path, resolve_resource_path,
};
use crate::metadata::DataModel;
use crate::parser::{
    ExpandItem, Expr, OptionValue, ParsedQuery, PropertyPath, QueryOption, SelectItem,
};

/// Check a parsed request against a model.
///
/// Without a model there is nothing to check against and the result is
/// empty. `profile` names the active connection profile in messages.
pub fn analyze(query: &ParsedQuery, model: Option<&DataModel>, profile: Option<&str>) -> Vec<Diagnostic> {
    let Some(model) = model else {
        return Vec::new();
    };
    let mut checker = SemanticChecker::new(model, profile);
    checker.check_query(query);
    checker.finish()
}

/// Performs semantic checks on one request.
pub struct SemanticChecker<'a> {
    model: &'a DataModel,
    profile: Option<&'a str>,
    collector: DiagnosticCollector,
}

impl<'a> SemanticChecker<'a> {
    pub fn new(model: &'a DataModel, profile: Option<&'a str>) -> Self {
        Self {
            model,
            profile,
            collector: DiagnosticCollector::new(),
        }
    }

    pub fn finish(mut self) -> Vec<Diagnostic> {
        self.collector.take()
    }

    pub fn check_query(&mut self, query: &ParsedQuery) {
        let Some(path) = &query.resource_path else {
            return;
        };

        let resolved = resolve_resource_path(path, self.model);
        if resolved.root_unresolved() {
            // Only the leftmost segment anchors navigation; nothing after it
            // can be checked.
            if let Some(first) = path.first() {
                self.collector
                    .unresolved_resource(first.span, &first.name.name, self.profile);
            }
            return;
        }

        let mut owner = None;
        for (segment, resolution) in path.segments.iter().zip(&resolved.segments) {
            match resolution {
                SegmentResolution::Unresolved => {
                    if let Some(owner) = owner {
                        self.collector
                            .unknown_navigation(segment.span, &segment.name.name, owner);
                    }
                }
                SegmentResolution::Member(member) => {
                    owner = member
                        .result_type()
                        .and_then(|ty| self.model.structured_type(&ty.name))
                        .map(|ty| ty.fqn());
                }
                SegmentResolution::Navigation(nav) => owner = Some(nav.target.as_str()),
                _ => owner = None,
            }
        }

        let Some(resource_type) = resolved.resource_type else {
            trace!("resource type not tracked; skipping option checks");
            return;
        };
        for option in &query.query_options {
            self.check_option(option, resource_type);
        }
    }

    fn check_option(&mut self, option: &QueryOption, type_fqn: &'a str) {
        match &option.value {
            OptionValue::Select(items) => {
                for item in items {
                    if let SelectItem::Path(path) = item {
                        self.check_property_path(path, type_fqn);
                    }
                }
            }
            OptionValue::Expand(items) => {
                for item in items {
                    self.check_expand_item(item, type_fqn);
                }
            }
            OptionValue::Filter(expr) => self.check_expr(expr, type_fqn),
            OptionValue::OrderBy(items) => {
                for item in items {
                    self.check_expr(&item.expr, type_fqn);
                }
            }
            _ => {}
        }
    }

    fn check_property_path(&mut self, path: &PropertyPath, type_fqn: &'a str) {
        let resolutions = resolve_property_path(self.model, type_fqn, &path.segments);
        for (ident, resolution) in path.segments.iter().zip(resolutions) {
            if let MemberResolution::Unresolved { owner } = resolution {
                self.collector.unknown_property(ident.span, &ident.name, owner);
            }
        }
    }

    /// Expanded members must all be navigation properties.
    fn check_expand_item(&mut self, item: &ExpandItem, type_fqn: &'a str) {
        let mut owner = type_fqn;
        for ident in &item.path.segments {
            match self.model.find_navigation(owner, &ident.name) {
                Some(nav) => owner = nav.target.as_str(),
                None => {
                    self.collector.unknown_navigation(ident.span, &ident.name, owner);
                    return;
                }
            }
        }
        for nested in &item.options {
            self.check_option(nested, owner);
        }
    }

    fn check_expr(&mut self, expr: &Expr, type_fqn: &'a str) {
        let mut paths = PathCollector::default();
        paths.visit_expr(expr);
        for path in paths.paths {
            self.check_property_path(path, type_fqn);
        }
    }
}

/// Gathers the property paths an expression mentions.
#[derive(Default)]
struct PathCollector<'q> {
    paths: Vec<&'q PropertyPath>,
}

impl<'q> PathCollector<'q> {
    fn visit_expr(&mut self, expr: &'q Expr) {
        match expr {
            Expr::Property(path) => self.paths.push(path),
            Expr::Binary(binary) => {
                self.visit_expr(&binary.lhs);
                self.visit_expr(&binary.rhs);
            }
            Expr::Unary(unary) => self.visit_expr(&unary.operand),
            Expr::Call(call) => {
                for arg in &call.args {
                    self.visit_expr(arg);
                }
            }
            Expr::Literal(_) => {}
        }
    }
}
