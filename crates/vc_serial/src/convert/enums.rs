//! Enum and flag set conversion.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};

use vc_reflect::Reflect;
use vc_reflect::info::{EnumInfo, EnumRepr};

use crate::config::Config;
use crate::value::{Number, Value};

/// Lowers an enum value.
///
/// - Flag sets are written as their integer value.
/// - `treat_enum_as_integer` and `#[reflect(as_int)]` write the
///   discriminant.
/// - `#[reflect(as_char)]` writes the discriminant as a character.
/// - Otherwise the member's wire name is used; a discriminant that names
///   no member is written as a number.
pub fn enum_to_value(info: &EnumInfo, discriminant: i64, config: &Config) -> Value {
    let number = || {
        if info.is_unsigned() {
            Value::Number(Number::U64(discriminant as u64))
        } else {
            Value::Number(Number::I64(discriminant))
        }
    };

    if info.is_flags() || config.treat_enum_as_integer {
        return number();
    }
    match info.repr() {
        EnumRepr::Integer => number(),
        EnumRepr::Char => u32::try_from(discriminant)
            .ok()
            .and_then(char::from_u32)
            .map(|c| Value::String(c.to_string()))
            .unwrap_or_else(number),
        EnumRepr::Name => match info.variant_with_discriminant(discriminant) {
            Some(variant) => Value::String(variant.wire_name().into()),
            None => number(),
        },
    }
}

/// Builds an enum value from a number, a member name or, for flag sets,
/// names joined by `,` or `|`.
///
/// ```
/// use vc_reflect::{derive::Reflect, info::Typed};
/// use vc_serial::{Value, convert::enums::coerce_enum};
///
/// #[derive(Reflect, Clone, Copy, PartialEq, Debug)]
/// enum Level { Low = 1, High = 9 }
///
/// let info = Level::type_info().as_enum().unwrap();
/// let high = coerce_enum(&Value::from("high"), info).unwrap();
/// assert_eq!(high.downcast_ref::<Level>(), Some(&Level::High));
/// let low = coerce_enum(&Value::from(1), info).unwrap();
/// assert_eq!(low.downcast_ref::<Level>(), Some(&Level::Low));
/// ```
pub fn coerce_enum(value: &Value, info: &EnumInfo) -> Result<Box<dyn Reflect>, String> {
    let discriminant = match value {
        Value::Number(n) => number_discriminant(*n, info)?,
        Value::String(text) => text_discriminant(text.trim(), info)?,
        other => return Err(format!("expected a member of `{}`, found {}", info.ty().name(), other.kind_name())),
    };
    info.from_discriminant(discriminant)
        .ok_or_else(|| format!("{discriminant} is not a member of `{}`", info.ty().name()))
}

fn number_discriminant(n: Number, info: &EnumInfo) -> Result<i64, String> {
    n.to_i128()
        .and_then(|v| match i64::try_from(v) {
            Ok(v) => Some(v),
            // unsigned 64-bit flag sets travel wrapped
            Err(_) if info.is_unsigned() => u64::try_from(v).ok().map(|v| v as i64),
            Err(_) => None,
        })
        .ok_or_else(|| format!("{n} is not a discriminant of `{}`", info.ty().name()))
}

fn text_discriminant(text: &str, info: &EnumInfo) -> Result<i64, String> {
    if let Some(n) = Number::parse(text)
        && n.to_i128().is_some()
    {
        return number_discriminant(n, info);
    }

    if info.repr() == EnumRepr::Char {
        let mut chars = text.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(i64::from(u32::from(c)));
        }
    }

    if info.is_flags() {
        let mut bits = 0_i64;
        for name in text.split([',', '|']).map(str::trim).filter(|n| !n.is_empty()) {
            let variant = info
                .variant_with_name_ignore_case(name)
                .ok_or_else(|| format!("`{name}` is not a flag of `{}`", info.ty().name()))?;
            bits |= variant.discriminant();
        }
        return Ok(bits);
    }

    info.variant_with_name_ignore_case(text)
        .map(|variant| variant.discriminant())
        .ok_or_else(|| format!("`{text}` is not a member of `{}`", info.ty().name()))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use vc_reflect::derive::Reflect;
    use vc_reflect::impl_reflect_flags;
    use vc_reflect::info::Typed;

    use super::{coerce_enum, enum_to_value};
    use crate::config::Config;
    use crate::value::{Number, Value};

    #[derive(Reflect, Clone, Copy, PartialEq, Debug)]
    enum Named {
        One = 1,
        #[reflect(rename = "second")]
        Two = 2,
    }

    #[derive(Reflect, Clone, Copy, PartialEq, Debug)]
    #[reflect(as_char)]
    enum Grade {
        A = 65,
        B = 66,
    }

    bitflags::bitflags! {
        #[derive(Clone, Copy, PartialEq, Debug)]
        struct Access: u8 {
            const READ = 1;
            const WRITE = 2;
        }
    }

    impl_reflect_flags!(Access);

    #[test]
    fn named_and_flags() {
        let config = Config::default();
        let named = Named::type_info().as_enum().unwrap();
        assert_eq!(enum_to_value(named, 1, &config), Value::from("One"));
        assert_eq!(enum_to_value(named, 2, &config), Value::from("second"));

        let flags = Access::type_info().as_enum().unwrap();
        assert_eq!(enum_to_value(flags, 1, &config), Value::Number(Number::U64(1)));
        assert_eq!(enum_to_value(flags, 3, &config), Value::Number(Number::U64(3)));

        let as_int = Config { treat_enum_as_integer: true, ..Config::default() };
        assert_eq!(enum_to_value(named, 2, &as_int), Value::Number(Number::I64(2)));
    }

    #[test]
    fn parsing_members() {
        let config = Config::default();
        let named = Named::type_info().as_enum().unwrap();
        let two = coerce_enum(&Value::from("Two"), named).unwrap();
        assert_eq!(two.downcast_ref::<Named>(), Some(&Named::Two));
        let two = coerce_enum(&Value::from("SECOND"), named).unwrap();
        assert_eq!(two.downcast_ref::<Named>(), Some(&Named::Two));
        assert!(coerce_enum(&Value::from("Three"), named).is_err());
        assert!(coerce_enum(&Value::from(7), named).is_err());

        let flags = Access::type_info().as_enum().unwrap();
        let both = coerce_enum(&Value::from("read | Write"), flags).unwrap();
        assert_eq!(both.downcast_ref::<Access>(), Some(&(Access::READ | Access::WRITE)));
        let both = coerce_enum(&Value::from("3"), flags).unwrap();
        assert_eq!(both.downcast_ref::<Access>(), Some(&(Access::READ | Access::WRITE)));

        let grades = Grade::type_info().as_enum().unwrap();
        assert_eq!(enum_to_value(grades, 66, &config), Value::from("B"));
        let a = coerce_enum(&Value::from("A"), grades).unwrap();
        assert_eq!(a.downcast_ref::<Grade>(), Some(&Grade::A));
    }
}
