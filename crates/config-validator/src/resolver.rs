//! Descriptor class resolution.
//!
//! Matching is exact string equality on the class name and the first
//! match wins. Duplicate class names in one set are a data-quality problem
//! on the server side and are not handled specially.

use plugin_config_core::{ClassName, Descriptor, UnknownClassError};

/// Returns the descriptor whose class name equals `class_name`.
///
/// # Errors
///
/// Returns [`UnknownClassError`] listing every class name in `descriptors`,
/// in input order, when nothing matches.
///
/// # Examples
///
/// ```
/// use plugin_config_core::{ClassName, Descriptor};
/// use plugin_config_validator::resolve;
///
/// let descriptors = vec![Descriptor::new("A", "A", vec![]), Descriptor::new("B", "B", vec![])];
///
/// let found = resolve(&ClassName::new("B"), &descriptors).unwrap();
/// assert_eq!(found.class_name.as_str(), "B");
///
/// let err = resolve(&ClassName::new("C"), &descriptors).unwrap_err();
/// assert_eq!(err.available_list(), "A, B");
/// ```
pub fn resolve<'a>(
    class_name: &ClassName,
    descriptors: &'a [Descriptor],
) -> Result<&'a Descriptor, UnknownClassError> {
    descriptors
        .iter()
        .find(|descriptor| descriptor.class_name == *class_name)
        .ok_or_else(|| UnknownClassError::new(class_name.clone(), class_names(descriptors)))
}

/// Returns every class name in `descriptors`, in input order.
#[must_use]
pub fn class_names(descriptors: &[Descriptor]) -> Vec<ClassName> {
    descriptors
        .iter()
        .map(|descriptor| descriptor.class_name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugin_config_core::ConfigField;

    fn set() -> Vec<Descriptor> {
        vec![
            Descriptor::new("A", "First", vec![]),
            Descriptor::new("B", "Second", vec![ConfigField::plain("x", true)]),
        ]
    }

    #[test]
    fn test_resolve_exact_match() {
        let descriptors = set();
        let found = resolve(&ClassName::new("B"), &descriptors).unwrap();
        assert_eq!(found.label, "Second");
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let descriptors = set();
        assert!(resolve(&ClassName::new("a"), &descriptors).is_err());
    }

    #[test]
    fn test_resolve_unknown_lists_all() {
        let descriptors = set();
        let err = resolve(&ClassName::new("C"), &descriptors).unwrap_err();
        assert_eq!(err.requested, ClassName::new("C"));
        assert_eq!(err.available, [ClassName::new("A"), ClassName::new("B")]);
        assert_eq!(
            err.to_string(),
            "Unknown plugin class 'C'; valid classes are: A, B"
        );
    }

    #[test]
    fn test_resolve_empty_set() {
        let err = resolve(&ClassName::new("C"), &[]).unwrap_err();
        assert!(err.available.is_empty());
    }

    #[test]
    fn test_resolve_first_duplicate_wins() {
        let descriptors = vec![
            Descriptor::new("A", "first", vec![]),
            Descriptor::new("A", "second", vec![]),
        ];
        let found = resolve(&ClassName::new("A"), &descriptors).unwrap();
        assert_eq!(found.label, "first");
    }
}
