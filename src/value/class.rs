//! # Classes
//!
//! Minimal nominal type model used by objects and faults. A class knows its
//! parent, the interfaces it implements and the names of its methods, which is
//! everything the membership predicates (`InstanceOf`, `Implements`,
//! `SubclassOf`, `Method`, `Callable`) need.
//!
//! Class names are compared case-insensitively and a leading `\` is ignored, so
//! `Exception`, `exception` and `\Exception` all name the same class.

use std::sync::Arc;

use once_cell::sync::Lazy;

/// Whether a class can be instantiated or only implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
}

/// A named class or interface with its ancestry.
#[derive(Debug)]
pub struct Class {
    name: String,
    kind: ClassKind,
    parent: Option<Arc<Class>>,
    interfaces: Vec<Arc<Class>>,
    methods: Vec<String>,
}

/// Builder returned by [`Class::define`] and [`Class::interface`].
#[derive(Debug)]
pub struct ClassBuilder {
    class: Class,
}

impl Class {
    /// Starts the definition of a concrete class.
    ///
    /// ```rust
    /// use assay::value::Class;
    /// let some = Class::define("SomeClass").method("f").build();
    /// assert!(some.is_a("someclass"));
    /// assert!(some.has_method("F"));
    /// ```
    pub fn define(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name.into(), ClassKind::Class)
    }

    /// Starts the definition of an interface.
    pub fn interface(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name.into(), ClassKind::Interface)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn parent(&self) -> Option<&Arc<Class>> {
        self.parent.as_ref()
    }

    /// True if this class, one of its ancestors, or one of the interfaces they
    /// implement is called `name`.
    pub fn is_a(&self, name: &str) -> bool {
        if names_match(&self.name, name) {
            return true;
        }
        if self.interfaces.iter().any(|iface| iface.is_a(name)) {
            return true;
        }
        self.parent.as_ref().is_some_and(|parent| parent.is_a(name))
    }

    /// Like [`Class::is_a`] but excludes the class itself.
    pub fn is_subclass_of(&self, name: &str) -> bool {
        !names_match(&self.name, name) && self.is_a(name)
    }

    /// True if `name` is an interface somewhere in this class's ancestry.
    pub fn implements_interface(&self, name: &str) -> bool {
        self.ancestry()
            .into_iter()
            .any(|class| class.kind == ClassKind::Interface && names_match(&class.name, name))
    }

    /// Method lookup follows the parent chain; method names are case-insensitive.
    pub fn has_method(&self, method: &str) -> bool {
        self.methods.iter().any(|m| m.eq_ignore_ascii_case(method))
            || self.parent.as_ref().is_some_and(|parent| parent.has_method(method))
    }

    fn ancestry(&self) -> Vec<&Class> {
        let mut out = vec![self];
        for iface in &self.interfaces {
            out.extend(iface.ancestry());
        }
        if let Some(parent) = &self.parent {
            out.extend(parent.ancestry());
        }
        out
    }
}

impl ClassBuilder {
    fn new(name: String, kind: ClassKind) -> Self {
        Self {
            class: Class {
                name,
                kind,
                parent: None,
                interfaces: Vec::new(),
                methods: Vec::new(),
            },
        }
    }

    pub fn extends(mut self, parent: &Arc<Class>) -> Self {
        self.class.parent = Some(Arc::clone(parent));
        self
    }

    pub fn implements(mut self, iface: &Arc<Class>) -> Self {
        self.class.interfaces.push(Arc::clone(iface));
        self
    }

    pub fn method(mut self, name: impl Into<String>) -> Self {
        self.class.methods.push(name.into());
        self
    }

    pub fn build(self) -> Arc<Class> {
        Arc::new(self.class)
    }
}

/// Compares two class names the way the membership predicates do.
pub fn names_match(a: &str, b: &str) -> bool {
    a.trim_start_matches('\\')
        .eq_ignore_ascii_case(b.trim_start_matches('\\'))
}

// ============================================================================
// BUILT-IN CLASSES
// ============================================================================

pub static THROWABLE: Lazy<Arc<Class>> = Lazy::new(|| {
    Class::interface("Throwable")
        .method("getMessage")
        .method("getLine")
        .build()
});

pub static EXCEPTION: Lazy<Arc<Class>> = Lazy::new(|| {
    Class::define("Exception")
        .implements(&THROWABLE)
        .method("getMessage")
        .method("getLine")
        .build()
});

pub static ERROR: Lazy<Arc<Class>> = Lazy::new(|| {
    Class::define("Error")
        .implements(&THROWABLE)
        .method("getMessage")
        .method("getLine")
        .build()
});

pub static TYPE_ERROR: Lazy<Arc<Class>> =
    Lazy::new(|| Class::define("TypeError").extends(&ERROR).build());

pub static ARGUMENT_COUNT_ERROR: Lazy<Arc<Class>> =
    Lazy::new(|| Class::define("ArgumentCountError").extends(&TYPE_ERROR).build());

pub static VALUE_ERROR: Lazy<Arc<Class>> =
    Lazy::new(|| Class::define("ValueError").extends(&ERROR).build());

pub static DIVISION_BY_ZERO_ERROR: Lazy<Arc<Class>> =
    Lazy::new(|| Class::define("DivisionByZeroError").extends(&ERROR).build());

pub static LOGIC_EXCEPTION: Lazy<Arc<Class>> =
    Lazy::new(|| Class::define("LogicException").extends(&EXCEPTION).build());

pub static INVALID_ARGUMENT_EXCEPTION: Lazy<Arc<Class>> = Lazy::new(|| {
    Class::define("InvalidArgumentException")
        .extends(&LOGIC_EXCEPTION)
        .build()
});

pub static RUNTIME_EXCEPTION: Lazy<Arc<Class>> =
    Lazy::new(|| Class::define("RuntimeException").extends(&EXCEPTION).build());

/// Looks up a built-in class by name.
pub fn builtin(name: &str) -> Option<Arc<Class>> {
    let all: [&Lazy<Arc<Class>>; 10] = [
        &THROWABLE,
        &EXCEPTION,
        &ERROR,
        &TYPE_ERROR,
        &ARGUMENT_COUNT_ERROR,
        &VALUE_ERROR,
        &DIVISION_BY_ZERO_ERROR,
        &LOGIC_EXCEPTION,
        &INVALID_ARGUMENT_EXCEPTION,
        &RUNTIME_EXCEPTION,
    ];
    all.into_iter()
        .find(|class| names_match(class.name(), name))
        .map(|class| Arc::clone(class))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_hierarchy() {
        assert!(ARGUMENT_COUNT_ERROR.is_a("Error"));
        assert!(ARGUMENT_COUNT_ERROR.is_a("Throwable"));
        assert!(!ARGUMENT_COUNT_ERROR.is_a("Exception"));
        assert!(INVALID_ARGUMENT_EXCEPTION.is_subclass_of("\\Exception"));
        assert!(!EXCEPTION.is_subclass_of("Exception"));
    }

    #[test]
    fn test_interface_membership() {
        let iface = Class::interface("SomeInterface").method("f").build();
        let some = Class::define("SomeClass").implements(&iface).method("f").build();
        let extended = Class::define("ExtendedClass").extends(&some).method("fg").build();

        assert!(extended.implements_interface("SomeInterface"));
        assert!(!extended.implements_interface("SomeClass"));
        assert!(extended.has_method("f"));
        assert!(extended.has_method("FG"));
        assert!(!extended.has_method("ff"));
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(builtin("\\runtimeexception").unwrap().name(), "RuntimeException");
        assert!(builtin("NoSuchClass").is_none());
    }
}
