use alloc::format;
use alloc::string::String;

use super::{Config, DateHandler, PropertyConvention, TextCase, TimeSpanHandler};
use crate::{Error, Result};

/// Applies `"key:value,flag,noflag:0"` to `config`.
pub(super) fn apply(config: &mut Config, text: &str) -> Result<()> {
    for entry in text.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (key, value) = match entry.split_once(':') {
            Some((key, value)) => (key.trim(), Some(value.trim())),
            None => (entry, None),
        };
        let key = key.to_ascii_lowercase();
        apply_entry(config, &key, value)?;
    }
    Ok(())
}

fn apply_entry(config: &mut Config, key: &str, value: Option<&str>) -> Result<()> {
    match key {
        "cotisd" | "ttpptv" => config.try_parse_primitive_values = flag(key, value)?,
        "edv" => config.exclude_default_values = flag(key, value)?,
        "inv" => config.include_null_values = flag(key, value)?,
        "invid" => config.include_null_values_in_dictionaries = flag(key, value)?,
        "ide" => config.include_default_enums = flag(key, value)?,
        "eti" => config.exclude_type_info = flag(key, value)?,
        "iti" => config.include_type_info = flag(key, value)?,
        "i" | "pp" | "indent" => config.indent = flag(key, value)?,
        "eccn" => {
            if flag(key, value)? {
                config.text_case = TextCase::CamelCase;
            }
        }
        "elun" => {
            if flag(key, value)? {
                config.text_case = TextCase::SnakeCase;
            }
        }
        "pi" => config.prefer_interfaces = flag(key, value)?,
        "tode" | "toe" => config.throw_on_error = flag(key, value)?,
        "teai" => config.treat_enum_as_integer = flag(key, value)?,
        "sdtc" => config.skip_date_time_conversion = flag(key, value)?,
        "auu" | "au" => config.assume_utc = flag(key, value)?,
        "auo" => config.append_utc_offset = flag(key, value)?,
        "ipf" => config.try_parse_into_best_fit = flag(key, value)?,
        "ppd" => config.parse_primitive_dates = flag(key, value)?,
        "ehc" => config.escape_html_chars = flag(key, value)?,
        "eu" => config.escape_unicode = flag(key, value)?,
        "md" => {
            let text = required(key, value)?;
            config.max_depth = text
                .parse()
                .map_err(|_| Error::config(format!("`md` expects a number, found `{text}`")))?;
        }
        "dh" => {
            config.date_handler = match lower(required(key, value)?).as_str() {
                "timestampoffset" | "to" => DateHandler::TimestampOffset,
                "dcjsc" | "dcjscompatible" => DateHandler::DcjsCompatible,
                "iso8601" => DateHandler::Iso8601,
                "iso8601do" | "iso8601dateonly" => DateHandler::Iso8601DateOnly,
                "iso8601dt" | "iso8601datetime" => DateHandler::Iso8601DateTime,
                "rfc1123" => DateHandler::Rfc1123,
                "ut" | "unixtime" => DateHandler::UnixTime,
                "utm" | "unixtimems" => DateHandler::UnixTimeMs,
                other => return Err(unknown_value(key, other)),
            };
        }
        "tsh" => {
            config.time_span_handler = match lower(required(key, value)?).as_str() {
                "df" | "durationformat" => TimeSpanHandler::DurationFormat,
                "sf" | "standardformat" => TimeSpanHandler::StandardFormat,
                other => return Err(unknown_value(key, other)),
            };
        }
        "pc" => {
            config.property_convention = match lower(required(key, value)?).as_str() {
                "s" | "strict" => PropertyConvention::Strict,
                "l" | "lenient" => PropertyConvention::Lenient,
                other => return Err(unknown_value(key, other)),
            };
        }
        "tc" => {
            config.text_case = match lower(required(key, value)?).as_str() {
                "d" | "default" => TextCase::Default,
                "pc" | "pascalcase" => TextCase::PascalCase,
                "cc" | "camelcase" => TextCase::CamelCase,
                "sc" | "snakecase" => TextCase::SnakeCase,
                other => return Err(unknown_value(key, other)),
            };
        }
        other => return Err(Error::config(format!("unknown setting `{other}`"))),
    }
    Ok(())
}

fn flag(key: &str, value: Option<&str>) -> Result<bool> {
    match value.map(lower).as_deref() {
        None | Some("1" | "true" | "t" | "y" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "f" | "n" | "no" | "off") => Ok(false),
        Some(other) => Err(unknown_value(key, other)),
    }
}

fn required<'a>(key: &str, value: Option<&'a str>) -> Result<&'a str> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::config(format!("`{key}` requires a value")))
}

#[inline]
fn lower(text: &str) -> String {
    text.to_ascii_lowercase()
}

#[cold]
fn unknown_value(key: &str, value: &str) -> Error {
    Error::config(format!("invalid value `{value}` for `{key}`"))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::super::{Config, DateHandler, PropertyConvention, TextCase, TimeSpanHandler};

    #[test]
    fn flags_and_values() {
        let config = Config::parse("EDV, inv:1, ide:false, dh:iso8601, tsh:sf, pc:l, tc:sc").unwrap();
        assert!(config.exclude_default_values);
        assert!(config.include_null_values);
        assert!(!config.include_default_enums);
        assert_eq!(config.date_handler, DateHandler::Iso8601);
        assert_eq!(config.time_span_handler, TimeSpanHandler::StandardFormat);
        assert_eq!(config.property_convention, PropertyConvention::Lenient);
        assert_eq!(config.text_case, TextCase::SnakeCase);
    }

    #[test]
    fn aliases_map_to_the_same_setting() {
        assert!(Config::parse("cotisd").unwrap().try_parse_primitive_values);
        assert!(Config::parse("ttpptv").unwrap().try_parse_primitive_values);
        assert!(Config::parse("pp").unwrap().indent);
        assert_eq!(Config::parse("elun").unwrap().text_case, TextCase::SnakeCase);
        assert_eq!(Config::parse("dh:utm").unwrap().date_handler, DateHandler::UnixTimeMs);
    }

    #[test]
    fn rejects_unknown_input() {
        assert!(Config::parse("nope").is_err());
        assert!(Config::parse("md:deep").is_err());
        assert!(Config::parse("dh").is_err());
        assert!(Config::parse("inv:maybe").is_err());

        let mut config = Config::default();
        assert!(config.apply_shorthand("inv,bogus").is_err());
        assert!(!config.include_null_values);
    }
}
