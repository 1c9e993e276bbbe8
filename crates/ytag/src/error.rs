use thiserror::Error;

/// The full error taxonomy for tag evaluation, file loading, and configuration.
///
/// Mirrors the shape of `json-expression`'s `JsError`: one variant per
/// observable failure mode, each carrying exactly the data its message
/// needs.
#[derive(Error, Debug)]
pub enum YtagError {
    /// A tag received the wrong node kind, or a required argument was absent.
    #[error("{tag}: {message}")]
    Shape { tag: String, message: String },

    /// `!Var` on an unbound name.
    #[error("variable {0} not found")]
    VarNotFound(String),

    /// An unknown key was passed to a mapping-form tag.
    #[error("unknown key '{0}'")]
    UnknownKey(String),

    /// A required slot of a mapping-form tag was missing.
    #[error("required key '{0}' not found")]
    RequiredKeyNotFound(String),

    /// The operand of a mapping-form tag was not itself a mapping.
    #[error("expected a mapping node")]
    ExpectedMapping,

    /// A JSONPath lookup failed in a way `!Exists` does not suppress.
    #[error("lookup failed: {0}")]
    Lookup(String),

    /// A JSONPath expression failed to parse.
    #[error("invalid JSONPath expression: {0}")]
    PathParse(#[from] ytag_path::ParseError),

    /// Arithmetic/comparison attempted on a non-numeric or inconvertible operand.
    #[error("type error: {0}")]
    Type(String),

    /// `!Error`, raised with a format-rendered message.
    #[error("{0}")]
    UserRaised(String),

    /// File read, glob expansion, or parse failure inside `!Include*`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A glob pattern failed to compile.
    #[error("invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// A YAML document failed to scan/parse.
    #[error("YAML parse error: {0}")]
    YamlParse(String),

    /// An alias node was encountered during evaluation, or `!Index`
    /// produced a duplicate key under `duplicates: error`.
    #[error("structural error: {0}")]
    Structural(String),

    /// A handler was registered under a tag name that was already taken.
    #[error("tag '{0}' is already registered")]
    AlreadyRegistered(String),

    /// The format rewriter's mini-template failed to render.
    #[error("format error: {0}")]
    Format(String),

    /// Variable-file or CLI configuration failed to load.
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, YtagError>;
