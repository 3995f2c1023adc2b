// -----------------------------------------------------------------------------
// TypePath

/// A stable, compiler-independent name for a type.
///
/// - [`type_path`]: unique full path, e.g. `my_app::dto::Customer`.
/// - [`type_name`]: path without modules, e.g. `Customer` (may collide).
/// - [`type_ident`]: the bare identifier without generics.
/// - [`module_path`]: the module part of the path, if any.
///
/// Paths never start with `::`. The runtime type resolver matches type
/// hints against these strings.
///
/// ```
/// use vc_reflect::info::TypePath;
///
/// assert_eq!(<Vec<i32>>::type_path(), "alloc::vec::Vec<i32>");
/// assert_eq!(<Vec<i32>>::type_name(), "Vec<i32>");
/// ```
///
/// [`type_path`]: TypePath::type_path
/// [`type_name`]: TypePath::type_name
/// [`type_ident`]: TypePath::type_ident
/// [`module_path`]: TypePath::module_path
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `TypePath`",
    note = "consider annotating `{Self}` with `#[derive(Reflect)]`"
)]
pub trait TypePath: 'static {
    fn type_path() -> &'static str;

    fn type_name() -> &'static str;

    fn type_ident() -> &'static str;

    #[inline]
    fn module_path() -> Option<&'static str> {
        None
    }
}

/// Object-safe access to [`TypePath`] through a value.
pub trait DynamicTypePath {
    fn reflect_type_path(&self) -> &'static str;

    fn reflect_type_name(&self) -> &'static str;

    fn reflect_module_path(&self) -> Option<&'static str>;
}

impl<T: TypePath> DynamicTypePath for T {
    #[inline]
    fn reflect_type_path(&self) -> &'static str {
        T::type_path()
    }

    #[inline]
    fn reflect_type_name(&self) -> &'static str {
        T::type_name()
    }

    #[inline]
    fn reflect_module_path(&self) -> Option<&'static str> {
        T::module_path()
    }
}
