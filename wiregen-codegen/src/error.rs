use std::{fmt, path::PathBuf};

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for code generation (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Why a name could not be claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionReason {
    /// Another declaration or import already holds the name.
    AlreadyDeclared,
    /// The name is a keyword of the target language.
    ReservedKeyword,
}

impl fmt::Display for CollisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionReason::AlreadyDeclared => write!(f, "already declared"),
            CollisionReason::ReservedKeyword => write!(f, "a reserved keyword"),
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to render template: {message}")]
    #[diagnostic(
        code(wiregen::template),
        help("templates may only reference fields of their data and must call functions with their documented arguments")
    )]
    Template { message: String },

    #[error("generated code is not valid Rust: {message}")]
    #[diagnostic(code(wiregen::fragment_syntax))]
    FragmentSyntax {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("cannot declare `{name}`: it is {reason}")]
    #[diagnostic(
        code(wiregen::name_collision),
        help("two declarations in one compilation unit resolve to the same identifier")
    )]
    NameCollision {
        name: String,
        reason: CollisionReason,
    },

    #[error("cannot import `{path}` as `{alias}`: {conflict}")]
    #[diagnostic(code(wiregen::duplicate_import))]
    DuplicateImport {
        path: String,
        alias: String,
        conflict: String,
    },

    #[error("unsupported top-level item: {kind}")]
    #[diagnostic(
        code(wiregen::unsupported_item),
        help("fragments may declare imports, constants, statics, types, functions, modules, macros and impl blocks")
    )]
    UnsupportedItem {
        #[source_code]
        src: NamedSource<String>,
        #[label("not supported here")]
        span: Option<SourceSpan>,
        kind: String,
    },

    #[error("failed to generate {what}{}", display_location(.location))]
    #[diagnostic(code(wiregen::declaration))]
    Declaration {
        what: String,
        location: Option<String>,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to parse {filename}")]
    #[diagnostic(code(wiregen::config))]
    Config {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        filename: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write generated code")]
    Write {
        #[source]
        source: std::io::Error,
    },
}

fn display_location(location: &Option<String>) -> String {
    match location {
        Some(location) => format!(" (declared at {})", location),
        None => String::new(),
    }
}

impl Error {
    /// Create a template error
    pub fn template(message: impl Into<String>) -> Box<Self> {
        Box::new(Error::Template {
            message: message.into(),
        })
    }

    /// Create a fragment syntax error pointing into the rendered text
    pub fn fragment_syntax(
        message: impl Into<String>,
        fragment: &str,
        span: Option<SourceSpan>,
    ) -> Box<Self> {
        Box::new(Error::FragmentSyntax {
            src: NamedSource::new("fragment.rs", fragment.to_string()),
            span,
            message: message.into(),
        })
    }

    /// Create a name collision error
    pub fn name_collision(name: impl Into<String>, reason: CollisionReason) -> Box<Self> {
        Box::new(Error::NameCollision {
            name: name.into(),
            reason,
        })
    }

    /// Create a duplicate import error
    pub fn duplicate_import(
        path: impl Into<String>,
        alias: impl Into<String>,
        conflict: impl Into<String>,
    ) -> Box<Self> {
        Box::new(Error::DuplicateImport {
            path: path.into(),
            alias: alias.into(),
            conflict: conflict.into(),
        })
    }

    /// Create an unsupported item error
    pub fn unsupported_item(
        kind: impl Into<String>,
        fragment: &str,
        span: Option<SourceSpan>,
    ) -> Box<Self> {
        Box::new(Error::UnsupportedItem {
            src: NamedSource::new("fragment.rs", fragment.to_string()),
            span,
            kind: kind.into(),
        })
    }

    /// Wrap an error with the IDL entity being generated
    pub fn declaration(
        what: impl Into<String>,
        location: Option<String>,
        source: Box<Error>,
    ) -> Box<Self> {
        Box::new(Error::Declaration {
            what: what.into(),
            location,
            source,
        })
    }

    /// Create a config parse error from a toml error with source context
    pub fn config(source: toml::de::Error, src: &str, filename: &str) -> Box<Self> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Config {
            src: NamedSource::new(filename, src.to_string()),
            span,
            filename: filename.to_string(),
            source,
        })
    }

    /// The innermost error, looking through declaration context.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Declaration { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub fn is_template(&self) -> bool {
        matches!(self.root_cause(), Error::Template { .. })
    }

    pub fn is_fragment_syntax(&self) -> bool {
        matches!(self.root_cause(), Error::FragmentSyntax { .. })
    }

    pub fn is_name_collision(&self) -> bool {
        matches!(self.root_cause(), Error::NameCollision { .. })
    }

    pub fn is_duplicate_import(&self) -> bool {
        matches!(self.root_cause(), Error::DuplicateImport { .. })
    }
}
