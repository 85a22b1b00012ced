//! Typed syntax tree for OData request URLs
//!
//! A closed set of node types, every one of them carrying a [`Span`].
//! Traversal is explicit: either `match` on the node enums directly or
//! implement [`Visitor`] and override the hooks you need.

use smol_str::SmolStr;

use super::keywords::SystemQueryOption;
use crate::base::Span;

/// An identifier with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: SmolStr,
    pub span: Span,
}

/// Root of a parsed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub service_root: ServiceRoot,
    pub resource_path: Option<ResourcePath>,
    pub query_options: Vec<QueryOption>,
}

impl ParsedQuery {
    /// The system query option of the given kind, if present.
    pub fn system_option(&self, option: SystemQueryOption) -> Option<&QueryOption> {
        self.query_options
            .iter()
            .find(|o| o.kind == OptionKind::System(option))
    }
}

/// The base URL prefix of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRoot {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    pub segments: Vec<PathSegment>,
    pub span: Span,
}

impl ResourcePath {
    /// The leftmost segment, which anchors resolution.
    pub fn first(&self) -> Option<&PathSegment> {
        self.segments.first()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Identifier,
    Count,
    Value,
    Ref,
    Metadata,
    Batch,
}

impl SegmentKind {
    pub fn from_system_segment(name: &str) -> Option<Self> {
        match name {
            "$count" => Some(SegmentKind::Count),
            "$value" => Some(SegmentKind::Value),
            "$ref" => Some(SegmentKind::Ref),
            "$metadata" => Some(SegmentKind::Metadata),
            "$batch" => Some(SegmentKind::Batch),
            _ => None,
        }
    }
}

/// One `/`-separated piece of the resource path, e.g. `Orders(10248)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    pub name: Ident,
    pub kind: SegmentKind,
    /// Key predicate or function arguments in parentheses.
    pub arguments: Option<KeyPredicate>,
    pub span: Span,
}

impl PathSegment {
    /// Namespace-qualified segments are casts or bound operations.
    pub fn is_qualified(&self) -> bool {
        self.name.name.contains('.')
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPredicate {
    pub values: Vec<KeyValue>,
    pub span: Span,
}

/// `10248`, or `OrderID=10248` in a compound key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub name: Option<Ident>,
    pub value: Literal,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    System(SystemQueryOption),
    Custom,
}

/// A `name=value` pair after `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOption {
    pub name: Ident,
    pub kind: OptionKind,
    pub raw_value: String,
    pub value_span: Span,
    pub value: OptionValue,
    pub span: Span,
}

impl QueryOption {
    pub fn system(&self) -> Option<SystemQueryOption> {
        match self.kind {
            OptionKind::System(option) => Some(option),
            OptionKind::Custom => None,
        }
    }
}

/// Structured form of an option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Select(Vec<SelectItem>),
    Expand(Vec<ExpandItem>),
    Filter(Expr),
    OrderBy(Vec<OrderByItem>),
    Top(u64),
    Skip(u64),
    Count(bool),
    InlineCount(InlineCount),
    Search(String),
    Format(String),
    SkipToken(String),
    Custom(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectItem {
    Star(Span),
    Path(PropertyPath),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandItem {
    pub path: PropertyPath,
    /// Nested options, e.g. `Items($select=Name;$top=5)`.
    pub options: Vec<QueryOption>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByItem {
    pub expr: Expr,
    pub direction: SortDirection,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineCount {
    AllPages,
    None,
}

/// `Name`, `Customer/City`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    pub segments: Vec<Ident>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Literal(Literal),
    Property(PropertyPath),
    Call(FunctionCall),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Binary(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Literal(l) => l.span,
            Expr::Property(p) => p.span,
            Expr::Call(c) => c.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "eq" => BinaryOp::Eq,
            "ne" => BinaryOp::Ne,
            "gt" => BinaryOp::Gt,
            "ge" => BinaryOp::Ge,
            "lt" => BinaryOp::Lt,
            "le" => BinaryOp::Le,
            "and" => BinaryOp::And,
            "or" => BinaryOp::Or,
            "add" => BinaryOp::Add,
            "sub" => BinaryOp::Sub,
            "mul" => BinaryOp::Mul,
            "div" => BinaryOp::Div,
            "mod" => BinaryOp::Mod,
            _ => return None,
        })
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            BinaryOp::Eq => "eq",
            BinaryOp::Ne => "ne",
            BinaryOp::Gt => "gt",
            BinaryOp::Ge => "ge",
            BinaryOp::Lt => "lt",
            BinaryOp::Le => "le",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::Mod => "mod",
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Gt | BinaryOp::Ge | BinaryOp::Lt | BinaryOp::Le
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    String,
    Integer,
    Decimal,
    Boolean,
    Null,
    Date,
    DateTimeOffset,
    Guid,
    /// Prefixed literal such as `datetime'...'` or `guid'...'`.
    Typed,
    /// Parameter alias such as `@p1`.
    Alias,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: SmolStr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub name: Ident,
    pub args: Vec<Expr>,
    pub span: Span,
}

// ============================================================================
// VISITOR
// ============================================================================

/// Visitor over the closed set of node kinds.
///
/// Every hook defaults to walking its children, so implementors only
/// override the nodes they care about.
pub trait Visitor {
    fn visit_service_root(&mut self, _root: &ServiceRoot) {}

    fn visit_segment(&mut self, _segment: &PathSegment) {}

    fn visit_query_option(&mut self, option: &QueryOption) {
        walk_query_option(self, option);
    }

    fn visit_property_path(&mut self, _path: &PropertyPath) {}

    fn visit_function_call(&mut self, call: &FunctionCall) {
        for arg in &call.args {
            self.visit_expr(arg);
        }
    }

    fn visit_literal(&mut self, _literal: &Literal) {}

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }
}

pub fn walk_query<V: Visitor + ?Sized>(visitor: &mut V, query: &ParsedQuery) {
    visitor.visit_service_root(&query.service_root);
    if let Some(path) = &query.resource_path {
        for segment in &path.segments {
            visitor.visit_segment(segment);
        }
    }
    for option in &query.query_options {
        visitor.visit_query_option(option);
    }
}

pub fn walk_query_option<V: Visitor + ?Sized>(visitor: &mut V, option: &QueryOption) {
    match &option.value {
        OptionValue::Select(items) => {
            for item in items {
                if let SelectItem::Path(path) = item {
                    visitor.visit_property_path(path);
                }
            }
        }
        OptionValue::Expand(items) => {
            for item in items {
                visitor.visit_property_path(&item.path);
                for nested in &item.options {
                    visitor.visit_query_option(nested);
                }
            }
        }
        OptionValue::Filter(expr) => visitor.visit_expr(expr),
        OptionValue::OrderBy(items) => {
            for item in items {
                visitor.visit_expr(&item.expr);
            }
        }
        OptionValue::Top(_)
        | OptionValue::Skip(_)
        | OptionValue::Count(_)
        | OptionValue::InlineCount(_)
        | OptionValue::Search(_)
        | OptionValue::Format(_)
        | OptionValue::SkipToken(_)
        | OptionValue::Custom(_) => {}
    }
}

pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, expr: &Expr) {
    match expr {
        Expr::Binary(binary) => {
            visitor.visit_expr(&binary.lhs);
            visitor.visit_expr(&binary.rhs);
        }
        Expr::Unary(unary) => visitor.visit_expr(&unary.operand),
        Expr::Literal(literal) => visitor.visit_literal(literal),
        Expr::Property(path) => visitor.visit_property_path(path),
        Expr::Call(call) => visitor.visit_function_call(call),
    }
}
