//! Entry Point Shapes
//!
//! Classifies native entry points by how they return data to the caller.

use std::fmt;

/// Calling shape of a native entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryShape {
    /// `int f(args...)`, status only
    Status,
    /// `int f(args...)`, returns a value rather than a status
    Code,
    /// `long long f(args...)`
    Count,
    /// `void f(args...)`
    Void,
    /// `int f(args..., char **buf, size_t *size, resize_fn)`
    Growable,
    /// `int f(args..., char *buf, size_t capacity)`
    Fixed,
    /// `int f(args..., void **handle)`
    Handle,
    /// `int f(args..., long long *id)`
    Id,
    /// `const char *f(args...)`, library-owned string
    Text,
    /// Mixed out-parameters (several buffers, buffer plus id)
    Composite,
}

impl EntryShape {
    /// All shapes, in declaration order
    pub const ALL: [EntryShape; 10] = [
        EntryShape::Status,
        EntryShape::Code,
        EntryShape::Count,
        EntryShape::Void,
        EntryShape::Growable,
        EntryShape::Fixed,
        EntryShape::Handle,
        EntryShape::Id,
        EntryShape::Text,
        EntryShape::Composite,
    ];

    /// Whether the caller allocates an output buffer for this shape
    pub fn uses_buffer(&self) -> bool {
        matches!(
            self,
            EntryShape::Growable | EntryShape::Fixed | EntryShape::Composite
        )
    }

    /// Whether the native callee receives the resize callback
    pub fn uses_resize(&self) -> bool {
        matches!(self, EntryShape::Growable | EntryShape::Composite)
    }

    /// Parse from a string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "status" => Some(EntryShape::Status),
            "code" | "int" => Some(EntryShape::Code),
            "count" | "long" => Some(EntryShape::Count),
            "void" => Some(EntryShape::Void),
            "growable" | "resize" => Some(EntryShape::Growable),
            "fixed" | "page" => Some(EntryShape::Fixed),
            "handle" => Some(EntryShape::Handle),
            "id" => Some(EntryShape::Id),
            "text" | "const char*" => Some(EntryShape::Text),
            "composite" => Some(EntryShape::Composite),
            _ => None,
        }
    }
}

impl fmt::Display for EntryShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntryShape::Status => "status",
            EntryShape::Code => "code",
            EntryShape::Count => "count",
            EntryShape::Void => "void",
            EntryShape::Growable => "growable",
            EntryShape::Fixed => "fixed",
            EntryShape::Handle => "handle",
            EntryShape::Id => "id",
            EntryShape::Text => "text",
            EntryShape::Composite => "composite",
        };
        f.pad(name)
    }
}
