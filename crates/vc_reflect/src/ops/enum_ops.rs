use crate::Reflect;

/// Access to field-less enums and bit-flag sets through their discriminant.
///
/// For flag sets the discriminant is the raw bit pattern, so
/// [`set_discriminant`](Enum::set_discriminant) accepts any combination.
///
/// ```
/// use vc_reflect::{derive::Reflect, ops::Enum};
///
/// #[derive(Reflect, Clone, Copy, PartialEq, Debug)]
/// enum Color { Red = 1, Green = 2 }
///
/// let mut c = Color::Red;
/// assert_eq!(c.discriminant(), 1);
/// assert!(c.set_discriminant(2));
/// assert!(!c.set_discriminant(3));
/// assert_eq!(c, Color::Green);
/// ```
pub trait Enum: Reflect {
    fn discriminant(&self) -> i64;

    /// Switches to the member with this discriminant.
    ///
    /// Returns `false`, leaving `self` unchanged, when none matches.
    fn set_discriminant(&mut self, discriminant: i64) -> bool;
}
