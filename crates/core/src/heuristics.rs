//! Lookup-table heuristics for type inference.
//!
//! Both tables used to exist as inline string matching scattered across call
//! sites; they are centralized here with documented defaults.

use serde::{Deserialize, Serialize};

/// File-extension → language table for generated code artifacts.
const LANGUAGE_TABLE: &[(&str, &str)] = &[
    ("rs", "rust"),
    ("py", "python"),
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("java", "java"),
    ("kt", "kotlin"),
    ("go", "go"),
    ("rb", "ruby"),
    ("cs", "csharp"),
    ("cpp", "cpp"),
    ("cc", "cpp"),
    ("c", "c"),
    ("h", "c"),
    ("sql", "sql"),
    ("sh", "shell"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("json", "json"),
    ("html", "html"),
    ("css", "css"),
];

/// Detect a code language from a file name or bare extension.
///
/// Default case: `"plaintext"` for anything not in the table.
pub fn detect_language(file_name_or_ext: &str) -> &'static str {
    let ext = file_name_or_ext.rsplit('.').next().unwrap_or(file_name_or_ext);
    let ext = ext.to_lowercase();
    LANGUAGE_TABLE
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, lang)| *lang)
        .unwrap_or("plaintext")
}

/// Relationship cardinality between two entities in a data model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToMany,
}

impl Cardinality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneToOne => "one-to-one",
            Self::OneToMany => "one-to-many",
            Self::ManyToMany => "many-to-many",
        }
    }
}

/// Free-text relationship label → cardinality table.
const CARDINALITY_TABLE: &[(&str, Cardinality)] = &[
    ("1:1", Cardinality::OneToOne),
    ("one-to-one", Cardinality::OneToOne),
    ("one to one", Cardinality::OneToOne),
    ("1:n", Cardinality::OneToMany),
    ("1:m", Cardinality::OneToMany),
    ("one-to-many", Cardinality::OneToMany),
    ("one to many", Cardinality::OneToMany),
    ("has many", Cardinality::OneToMany),
    ("n:m", Cardinality::ManyToMany),
    ("m:n", Cardinality::ManyToMany),
    ("many-to-many", Cardinality::ManyToMany),
    ("many to many", Cardinality::ManyToMany),
];

/// Infer relationship cardinality from a free-text label.
///
/// Default case: `OneToMany`, the most common relationship in the source
/// data models.
pub fn cardinality_from_label(label: &str) -> Cardinality {
    let normalized = label.trim().to_lowercase();
    CARDINALITY_TABLE
        .iter()
        .find(|(key, _)| normalized.contains(key))
        .map(|(_, c)| *c)
        .unwrap_or(Cardinality::OneToMany)
}
