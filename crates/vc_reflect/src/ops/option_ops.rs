use alloc::boxed::Box;

use crate::Reflect;

/// Access to `Option<T>`.
pub trait Nullable: Reflect {
    fn value(&self) -> Option<&dyn Reflect>;

    fn value_mut(&mut self) -> Option<&mut dyn Reflect>;

    fn set_none(&mut self);

    /// Stores `Some(value)`; a value of the wrong type is handed back.
    fn set_some(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    #[inline]
    fn is_none(&self) -> bool {
        self.value().is_none()
    }
}
