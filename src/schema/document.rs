// Thu Oct 15 2026 - Alex

use indexmap::IndexMap;
use serde::Deserialize;

/// A JSON file of record definitions.
///
/// ```json
/// { "records": [
///     { "name": "node", "members": [
///         { "name": "value", "type": "int" },
///         { "name": "next", "type": { "pointer": null } },
///         { "name": "tag", "type": "char*", "offset": 16 }
///     ] }
/// ] }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    #[serde(default)]
    pub records: Vec<RecordSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordSpec {
    pub name: String,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub members: Vec<MemberSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeSpec,
    #[serde(default)]
    pub offset: Option<u64>,
}

/// A type name (`"u32"`, `"unsigned int"`, `"cstring"`, `"node"`, `"node*"`,
/// `"char*"` for a string pointer, `"void*"`) or a composite.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    Named(String),
    Composite(CompositeSpec),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeSpec {
    /// `null` points at the enclosing record.
    Pointer(Option<Box<TypeSpec>>),
    Array {
        element: Box<TypeSpec>,
        count: usize,
    },
    Enum {
        #[serde(default = "default_enum_width")]
        width: usize,
        #[serde(default)]
        lenient: Option<bool>,
        variants: IndexMap<String, i64>,
    },
}

fn default_enum_width() -> usize {
    4
}
