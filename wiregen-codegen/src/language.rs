//! Language-specific abstractions.

use wiregen_ir::TypeSpec;

/// Trait for mapping type descriptors to language-specific type syntax.
///
/// Implement this trait for each target language to provide type mappings.
pub trait TypeMapper {
    /// The target language name
    fn language(&self) -> &'static str;

    /// Map a type to the syntax used when a value is always present
    fn map_type(&self, spec: &TypeSpec) -> String;

    /// Wrap a type in the language's nilable form (e.g., `Option<T>`, `*T`)
    fn map_optional(&self, inner: &str) -> String;

    /// Whether values of this type can already be absent without wrapping
    fn is_nilable(&self, _spec: &TypeSpec) -> bool {
        false
    }

    /// Reference a type, wrapping it when it is optional and not nilable.
    fn type_reference(&self, spec: &TypeSpec, required: bool) -> String {
        let inner = self.map_type(spec);
        if required || self.is_nilable(spec) {
            inner
        } else {
            self.map_optional(&inner)
        }
    }
}
