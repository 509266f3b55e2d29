//! Typed access to JavaScript and TypeScript sources.
//!
//! Sources are parsed once with tree-sitter; rewrite rules then query the
//! tree through a few typed helpers (default-export object lookup, property
//! matchers, nested-object visitor) and express their changes as byte-range
//! [`TextEdits`], so everything the rules do not touch is kept verbatim.

pub mod edit;
pub mod object;
pub mod parser;

pub use edit::TextEdits;
pub use object::{
    default_export_object, has_directive, import_statements, string_value, visit_objects,
    ObjectLiteral, Property, PropertyMatcher,
};
pub use parser::{detect_variant, named_children, node_text, parse_source, JsVariant, SourceTree};
