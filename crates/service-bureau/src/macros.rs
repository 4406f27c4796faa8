/// Generate named service accessors on a consumer type
///
/// The type must hold a [`ServiceCache`](crate::ServiceCache) in the named
/// field. For every `getter / setter: Type;` line the macro generates
///
/// - `getter(&self, args) -> Result<Arc<Type>>`: memoized lookup of the
///   service registered under `"getter"`
/// - `setter(&self, value) -> Result<()>`: replaces the cached value
///
/// plus `accessor_set()`, which composes the type's accessors from the global
/// registry on first use, and an implementation of [`Services`](crate::Services).
/// Keys registered after `accessor_set()` was first called are not part of
/// the set and their getters fail with `Error::UndefinedAccessor`.
#[macro_export]
macro_rules! service_accessors {
    (
        impl $consumer:ty [$field:ident] {
            $( $getter:ident / $setter:ident : $service:ty ; )*
        }
    ) => {
        impl $consumer {
            /// Accessors of this type, snapshotted from the global registry on first use
            pub fn accessor_set() -> &'static $crate::AccessorSet {
                static ACCESSORS: ::std::sync::LazyLock<$crate::AccessorSet> =
                    ::std::sync::LazyLock::new($crate::AccessorSet::compose);
                &ACCESSORS
            }

            $(
                pub fn $getter(
                    &self,
                    args: &$crate::ServiceArgs,
                ) -> $crate::Result<::std::sync::Arc<$service>> {
                    self.$field.get_as::<$service>(stringify!($getter), args)
                }

                pub fn $setter(
                    &self,
                    value: impl ::std::convert::Into<::std::sync::Arc<$service>>,
                ) -> $crate::Result<()> {
                    self.$field.set(
                        stringify!($getter),
                        $crate::ServiceInstance::from_arc(value.into()),
                    )
                }
            )*
        }

        impl $crate::Services for $consumer {
            fn service_cache(&self) -> &$crate::ServiceCache {
                &self.$field
            }
        }
    };
}
