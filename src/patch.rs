//! Partial state updates.
//!
//! A patch names a subset of a state's top-level fields. Applying it
//! overwrites exactly those fields and carries every other field over
//! unchanged. The merge is shallow: a nested value named in the patch
//! replaces its previous counterpart wholesale.

/// State types that can be partially updated with [`ReactiveStore::patch_state`].
///
/// Implementations must leave `self` a complete, well-formed value. The store
/// performs no validation of its own, so a patch that corrupts the shape of
/// the state corrupts every later read.
///
/// Most record structs get an implementation from [`impl_patch!`]; dynamic
/// records (JSON objects, maps) are covered by the [`record`](crate::record)
/// module.
///
/// [`ReactiveStore::patch_state`]: crate::ReactiveStore::patch_state
pub trait Patchable: Clone {
    /// The partial form of the state.
    type Patch;

    /// Overwrite the fields named in `patch`.
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Return a copy of `self` with `patch` applied.
    fn patched(&self, patch: Self::Patch) -> Self {
        let mut merged = self.clone();
        merged.apply_patch(patch);
        merged
    }
}

/// Generate a patch struct and the [`Patchable`] implementation for a record
/// struct.
///
/// The generated struct has one `Option` field per listed field and derives
/// `Default`, so unnamed fields can be filled with `..Default::default()`.
/// Only `Some` fields are written on apply.
///
/// # Example
///
/// ```
/// use rxstore::{impl_patch, Patchable};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Profile {
///     name: String,
///     age: u32,
/// }
///
/// impl_patch! {
///     Profile => #[derive(Debug)] pub struct ProfilePatch {
///         name: String,
///         age: u32,
///     }
/// }
///
/// let profile = Profile { name: "ada".into(), age: 36 };
/// let older = profile.patched(ProfilePatch { age: Some(37), ..Default::default() });
/// assert_eq!(older, Profile { name: "ada".into(), age: 37 });
/// ```
#[macro_export]
macro_rules! impl_patch {
    (
        $state:ty =>
        $(#[$meta:meta])*
        $vis:vis struct $patch:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Default)]
        $vis struct $patch {
            $(
                $(#[$field_meta])*
                pub $field: ::core::option::Option<$ty>,
            )*
        }

        impl $crate::Patchable for $state {
            type Patch = $patch;

            fn apply_patch(&mut self, patch: Self::Patch) {
                $(
                    if let ::core::option::Option::Some(value) = patch.$field {
                        self.$field = value;
                    }
                )*
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Settings {
        theme: String,
        volume: u8,
        tags: Vec<String>,
    }

    impl_patch! {
        Settings => #[derive(Clone, Debug)] struct SettingsPatch {
            theme: String,
            volume: u8,
            tags: Vec<String>,
        }
    }

    fn settings() -> Settings {
        Settings {
            theme: "dark".to_string(),
            volume: 3,
            tags: vec!["a".to_string(), "b".to_string()],
        }
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut state = settings();
        state.apply_patch(SettingsPatch::default());
        assert_eq!(state, settings());
    }

    #[test]
    fn only_named_fields_are_written() {
        let state = settings().patched(SettingsPatch {
            volume: Some(9),
            ..Default::default()
        });
        assert_eq!(state.volume, 9);
        assert_eq!(state.theme, "dark");
        assert_eq!(state.tags, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn nested_values_are_replaced_not_merged() {
        let state = settings().patched(SettingsPatch {
            tags: Some(vec!["c".to_string()]),
            ..Default::default()
        });
        assert_eq!(state.tags, vec!["c".to_string()]);
    }

    #[test]
    fn patched_leaves_original_untouched() {
        let original = settings();
        let _ = original.patched(SettingsPatch {
            theme: Some("light".to_string()),
            ..Default::default()
        });
        assert_eq!(original, settings());
    }
}
