use alloc::boxed::Box;

use crate::Reflect;

/// Access to ordered sequences and sets.
///
/// ```
/// use vc_reflect::{Reflect, ops::List};
///
/// let mut vec: Vec<i32> = vec![1];
/// let list: &mut dyn List = &mut vec;
/// assert!(list.push(2_i32.into_boxed_reflect()).is_ok());
/// assert!(list.push(2_u8.into_boxed_reflect()).is_err());
///
/// let items: Vec<i32> = list.iter().filter_map(|v| v.downcast_ref().copied()).collect();
/// assert_eq!(items, [1, 2]);
/// ```
pub trait List: Reflect {
    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_>;

    /// Appends an item; a value of the wrong type is handed back.
    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    fn clear(&mut self);
}
