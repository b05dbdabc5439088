//! Host type information consumed by code synthesis.

/// A class found in the host program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub name: String,
    /// Namespace to import in the generated source.
    pub namespace: Option<String>,
    /// Module the type lives in, passed to the compiler as a reference.
    pub module: Option<String>,
}

impl TypeDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }
}

/// Capability check against the host type system.
pub trait TypeResolver {
    /// Finds a public class by simple or fully qualified name.
    fn find_type(&self, class_name: &str) -> Option<TypeDescriptor>;

    /// True if `member_path` (`Text`, or one level deep such as `button1.Text`)
    /// is an accessible member of `descriptor`.
    fn member_exists(&self, member_path: &str, descriptor: &TypeDescriptor) -> bool;
}

/// Resolver that knows every class and every member.
///
/// Used when generating source without type information.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllTypes;

impl TypeResolver for AcceptAllTypes {
    fn find_type(&self, class_name: &str) -> Option<TypeDescriptor> {
        Some(TypeDescriptor::new(class_name))
    }

    fn member_exists(&self, _member_path: &str, _descriptor: &TypeDescriptor) -> bool {
        true
    }
}
