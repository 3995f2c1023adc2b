use alloc::boxed::Box;

use crate::Reflect;

/// Access to key/value collections.
///
/// ```
/// use std::collections::BTreeMap;
/// use vc_reflect::{Reflect, ops::Map};
///
/// let mut map: BTreeMap<String, i32> = BTreeMap::new();
/// let key = String::from("One").into_boxed_reflect();
/// assert!(Map::insert(&mut map, key, 1_i32.into_boxed_reflect()).is_ok());
///
/// let found = Map::get(&map, &String::from("One")).unwrap();
/// assert_eq!(found.downcast_ref::<i32>(), Some(&1));
/// ```
pub trait Map: Reflect {
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_>;

    /// Looks up by a key of the map's key type; other key types find nothing.
    fn get(&self, key: &dyn Reflect) -> Option<&dyn Reflect>;

    /// Inserts or replaces an entry; mistyped pairs are handed back.
    fn insert(
        &mut self,
        key: Box<dyn Reflect>,
        value: Box<dyn Reflect>,
    ) -> Result<(), (Box<dyn Reflect>, Box<dyn Reflect>)>;

    fn clear(&mut self);
}
