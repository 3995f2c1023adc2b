use crate::info::{TypeInfo, TypePath};

/// Static accessor to a type's [`TypeInfo`].
///
/// Implementations build the info once and publish it through
/// [`NonGenericTypeInfoCell`] or [`GenericTypeInfoCell`].
///
/// [`NonGenericTypeInfoCell`]: crate::impls::NonGenericTypeInfoCell
/// [`GenericTypeInfoCell`]: crate::impls::GenericTypeInfoCell
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Typed`",
    note = "consider annotating `{Self}` with `#[derive(Reflect)]`"
)]
pub trait Typed: TypePath {
    fn type_info() -> &'static TypeInfo;
}

/// Object-safe access to [`Typed`] through a value.
pub trait DynamicTyped {
    fn reflect_type_info(&self) -> &'static TypeInfo;
}

impl<T: Typed> DynamicTyped for T {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        T::type_info()
    }
}
