//! Completion suggestions implementation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::text_utils::{
    OptionSite, clamp_offset, option_at_cursor, path_before_cursor, query_start,
    word_before_cursor,
};
use crate::base::ODataVersion;
use crate::base::constants::FORMAT_VALUES;
use crate::metadata::{ContainerMember, DataModel};
use crate::parser::{ParseOptions, SystemQueryOption, functions, parse_with};
use crate::semantic::resolve::{resolve_resource_path, type_at_path};

/// Kind of completion item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionKind {
    QueryOption,
    EntitySet,
    Singleton,
    Operation,
    Property,
    NavigationProperty,
    Function,
    Value,
}

impl CompletionKind {
    /// Convert to LSP completion item kind number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            CompletionKind::QueryOption => 14,        // Keyword
            CompletionKind::EntitySet => 7,           // Class
            CompletionKind::Singleton => 6,           // Variable
            CompletionKind::Operation => 2,           // Method
            CompletionKind::Property => 10,           // Property
            CompletionKind::NavigationProperty => 18, // Reference
            CompletionKind::Function => 3,            // Function
            CompletionKind::Value => 12,              // Value
        }
    }
}

/// A completion suggestion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionItem {
    /// The text to insert.
    pub label: Arc<str>,
    /// The kind of completion.
    pub kind: CompletionKind,
    /// Detail text (shown after label).
    pub detail: Option<Arc<str>>,
    /// Documentation (shown in popup).
    pub documentation: Option<Arc<str>>,
    /// Text to insert (if different from label).
    pub insert_text: Option<Arc<str>>,
    /// Sort priority (lower = higher priority).
    pub sort_priority: u32,
}

impl CompletionItem {
    /// Create a new completion item.
    pub fn new(label: impl Into<Arc<str>>, kind: CompletionKind) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            documentation: None,
            insert_text: None,
            sort_priority: 100,
        }
    }

    /// Set the detail text.
    pub fn with_detail(mut self, detail: impl Into<Arc<str>>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Set the documentation.
    pub fn with_documentation(mut self, doc: impl Into<Arc<str>>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    /// Set the insert text.
    pub fn with_insert_text(mut self, text: impl Into<Arc<str>>) -> Self {
        self.insert_text = Some(text.into());
        self
    }

    /// Set the sort priority.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.sort_priority = priority;
        self
    }

    fn from_member(member: ContainerMember<'_>) -> Self {
        let kind = match member {
            ContainerMember::EntitySet(_) => CompletionKind::EntitySet,
            ContainerMember::Singleton(_) => CompletionKind::Singleton,
            ContainerMember::FunctionImport(_) | ContainerMember::ActionImport(_) => {
                CompletionKind::Operation
            }
        };
        let detail = match member.result_type() {
            Some(ty) if ty.collection => format!("{}: Collection({})", member.kind_label(), ty.name),
            Some(ty) => format!("{}: {}", member.kind_label(), ty.name),
            None => member.kind_label().to_string(),
        };
        Self::new(member.name(), kind)
            .with_detail(detail)
            .with_priority(10)
    }

    fn from_function(function: &functions::FunctionSignature) -> Self {
        Self::new(function.name, CompletionKind::Function)
            .with_detail(function.label())
            .with_documentation(function.documentation)
            .with_insert_text(format!("{}(", function.name))
            .with_priority(50)
    }
}

/// Where the cursor sits, decided from the raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CompletionContext {
    /// Typing a `$` word such as `$sel`.
    AfterDollar,
    /// Before the `?`.
    ResourcePath,
    /// Inside the value of a system query option.
    OptionValue(OptionSite),
    Other,
}

fn determine_context(text: &str, offset: usize) -> CompletionContext {
    let word = word_before_cursor(text, offset);
    if word.starts_with('$') && word[1..].chars().all(|c| c.is_ascii_alphabetic()) {
        return CompletionContext::AfterDollar;
    }
    if !text[..offset].contains('?') {
        return CompletionContext::ResourcePath;
    }
    match option_at_cursor(text, offset) {
        Some(site) => CompletionContext::OptionValue(site),
        None => CompletionContext::Other,
    }
}

/// Get completion suggestions at a byte offset.
///
/// Candidates are not filtered by the partially typed word; the editor does
/// that. Without a model only model-independent candidates are offered.
pub fn completions(text: &str, offset: usize, model: Option<&DataModel>) -> Vec<CompletionItem> {
    completions_with(text, offset, model, &ParseOptions::default())
}

/// [`completions`] with explicit parse options for locating the resource
/// path.
pub fn completions_with(
    text: &str,
    offset: usize,
    model: Option<&DataModel>,
    options: &ParseOptions,
) -> Vec<CompletionItem> {
    let offset = clamp_offset(text, offset);
    let context = determine_context(text, offset);
    trace!(?context, offset, "completion context");
    let version = model.map(|m| m.version);

    match context {
        CompletionContext::AfterDollar => SystemQueryOption::ALL
            .iter()
            .filter(|option| option.availability().allows_lenient(version))
            .map(|option| {
                CompletionItem::new(option.name(), CompletionKind::QueryOption)
                    .with_documentation(option.documentation())
                    .with_insert_text(format!("{}=", option.name()))
                    .with_priority(10)
            })
            .collect(),

        CompletionContext::ResourcePath => match model {
            Some(model) => model
                .container_members()
                .map(CompletionItem::from_member)
                .collect(),
            None => function_items(None),
        },

        CompletionContext::OptionValue(site) => option_value_items(text, offset, &site, model, options),

        CompletionContext::Other => Vec::new(),
    }
}

fn function_items(version: Option<ODataVersion>) -> Vec<CompletionItem> {
    functions::available(version)
        .map(CompletionItem::from_function)
        .collect()
}

fn value_items(values: &[&str]) -> Vec<CompletionItem> {
    values
        .iter()
        .map(|value| CompletionItem::new(*value, CompletionKind::Value).with_priority(10))
        .collect()
}

fn option_value_items(
    text: &str,
    offset: usize,
    site: &OptionSite,
    model: Option<&DataModel>,
    options: &ParseOptions,
) -> Vec<CompletionItem> {
    let (navigation_only, with_functions) = match site.option {
        SystemQueryOption::Format => return value_items(FORMAT_VALUES),
        SystemQueryOption::InlineCount => return value_items(&["allpages", "none"]),
        SystemQueryOption::Count => return value_items(&["true", "false"]),
        SystemQueryOption::Select => (false, false),
        SystemQueryOption::Expand => (true, false),
        SystemQueryOption::Filter | SystemQueryOption::OrderBy => (false, true),
        _ => return Vec::new(),
    };

    let mut items = Vec::new();
    if let Some(model) = model {
        let typed = path_before_cursor(text, offset);
        let scope: Vec<&str> = match typed.rfind('/') {
            Some(slash) => typed[..slash].split('/').collect(),
            None => Vec::new(),
        };
        if let Some(owner) = scope_type(text, site, model, options)
            .and_then(|owner| type_at_path(model, owner, &scope))
        {
            items.extend(member_items(model, owner, navigation_only));
        }
    }
    if with_functions {
        items.extend(function_items(model.map(|m| m.version)));
    }
    items
}

/// Type the option applies to: the resource path's type, narrowed through
/// any enclosing `$expand` items.
fn scope_type<'m>(
    text: &str,
    site: &OptionSite,
    model: &'m DataModel,
    options: &ParseOptions,
) -> Option<&'m str> {
    let path_text = &text[..query_start(text).unwrap_or(text.len())];
    let query = parse_with(path_text, options).ok()?;
    let resolved = resolve_resource_path(query.resource_path.as_ref()?, model);
    let mut owner = resolved.resource_type?;

    for item in &site.expand_scope {
        let names: Vec<&str> = item.split('/').map(str::trim).collect();
        owner = type_at_path(model, owner, &names)?;
    }
    Some(owner)
}

/// Properties then navigation properties of `owner`, in declaration order.
fn member_items(model: &DataModel, owner: &str, navigation_only: bool) -> Vec<CompletionItem> {
    let properties = model
        .properties(owner)
        .into_iter()
        .filter(|_| !navigation_only)
        .map(|p| {
            let ty = if p.collection {
                format!("Collection({})", p.type_name)
            } else {
                p.type_name.clone()
            };
            CompletionItem::new(p.name.as_str(), CompletionKind::Property)
                .with_detail(ty)
                .with_priority(10)
        });
    let navigation = model.navigation_properties(owner).into_iter().map(|n| {
        let target = if n.collection {
            format!("Collection({})", n.target)
        } else {
            n.target.clone()
        };
        CompletionItem::new(n.name.as_str(), CompletionKind::NavigationProperty)
            .with_detail(target)
            .with_priority(20)
    });
    properties.chain(navigation).collect()
}
