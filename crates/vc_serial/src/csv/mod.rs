//! Tabular text: a header row followed by one row per item.
//!
//! Values are lowered with nulls included and type hints excluded, so
//! every row of a list of structs has the same columns. Struct rows use
//! the declared member order, a [`TypeConfig`](crate::config::TypeConfig)
//! header list, or, for projections, a narrower struct. Untyped map rows
//! use their keys in order of first appearance. Nested lists and maps are
//! written as JSV text in a single field.

// -----------------------------------------------------------------------------
// Modules

mod reader;

// -----------------------------------------------------------------------------
// Exports

pub use reader::{parse_fields, parse_lines};

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use vc_reflect::Reflect;
use vc_reflect::info::TypeInfo;
use vc_utils::collections::OrderedMap;

use crate::config::{Config, CsvConfig, TypeConfigTable, type_config_table};
use crate::convert::date::{DateToken, format_date};
use crate::convert::escape::write_csv_field;
use crate::format::jsv;
use crate::ser::{Serializer, is_included, wire_name};
use crate::value::Value;
use crate::{Format, Result, de};

// -----------------------------------------------------------------------------
// Columns

struct Column {
    /// Member key in the lowered row.
    key: String,
    header: String,
}

/// Strips `Option` layers.
fn unwrap_option(mut info: &'static TypeInfo) -> &'static TypeInfo {
    while let TypeInfo::Option(option) = info {
        info = option.item_info();
    }
    info
}

/// The item type of a list type.
fn item_info(info: &'static TypeInfo) -> Option<&'static TypeInfo> {
    match unwrap_option(info) {
        TypeInfo::List(list) => Some(unwrap_option(list.item_info())),
        _ => None,
    }
}

/// Columns declared for a struct type: its custom headers, or every
/// member in declaration order when `all_members` is set.
fn declared_columns(info: &'static TypeInfo, types: &TypeConfigTable, config: &Config, all_members: bool) -> Vec<Column> {
    let TypeInfo::Struct(s) = info else {
        return Vec::new();
    };
    let type_config = types.get(info.type_id()).map(AsRef::as_ref);
    if let Some(tc) = type_config.filter(|tc| !tc.csv_headers.is_empty()) {
        return tc
            .csv_headers
            .iter()
            .filter_map(|(declared, header)| {
                let field = s.field(declared)?;
                Some(Column {
                    key: wire_name(field, type_config, config).into_owned(),
                    header: header.clone(),
                })
            })
            .collect();
    }
    if !all_members {
        return Vec::new();
    }
    s.fields()
        .iter()
        .filter(|field| is_included(field, s, info, type_config, config))
        .map(|field| {
            let key = wire_name(field, type_config, config).into_owned();
            Column { header: key.clone(), key }
        })
        .collect()
}

/// Keys of the rows in order of first appearance.
fn row_columns<'a>(rows: impl Iterator<Item = &'a Value>) -> Vec<Column> {
    let mut keys: OrderedMap<String, ()> = OrderedMap::new();
    for row in rows {
        if let Value::Map(map) = row {
            for key in map.keys() {
                if !keys.contains_key(key) {
                    keys.insert(key.clone(), ());
                }
            }
        }
    }
    keys.keys()
        .map(|key| Column {
            key: key.clone(),
            header: key.clone(),
        })
        .collect()
}

fn cell<'v>(row: &'v Value, key: &str) -> Option<&'v Value> {
    let map = row.as_map()?;
    map.get(key)
        .or_else(|| map.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)).map(|(_, v)| v))
}

// -----------------------------------------------------------------------------
// Writer

struct Writer<'a> {
    config: &'a Config,
    out: String,
}

impl Writer<'_> {
    fn csv(&self) -> &CsvConfig {
        &self.config.csv
    }

    fn field(&mut self, value: Option<&Value>) {
        let text = match value {
            None | Some(Value::Null) => return,
            Some(Value::String(text)) => text.clone(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Date(date)) => match format_date(*date, self.config, Format::Csv) {
                DateToken::Text(text) | DateToken::Escaped(text) => text,
                DateToken::Number(n) => n.to_string(),
            },
            Some(nested @ (Value::List(_) | Value::Map(_))) => jsv::to_string(nested, self.config),
        };
        write_csv_field(&mut self.out, &text, &self.config.csv);
    }

    fn end_row(&mut self) {
        let separator = self.config.csv.row_separator.clone();
        self.out.push_str(&separator);
    }

    fn separator(&mut self, index: usize) {
        if index > 0 {
            let separator = self.csv().item_separator.clone();
            self.out.push_str(&separator);
        }
    }

    fn headers(&mut self, columns: &[Column]) {
        if self.config.csv.omit_headers {
            return;
        }
        for (index, column) in columns.iter().enumerate() {
            self.separator(index);
            write_csv_field(&mut self.out, &column.header, &self.config.csv);
        }
        self.end_row();
    }

    fn record(&mut self, row: &Value, columns: &[Column]) {
        for (index, column) in columns.iter().enumerate() {
            self.separator(index);
            self.field(cell(row, &column.key));
        }
        self.end_row();
    }

    fn table(&mut self, rows: &[Value], columns: Vec<Column>) {
        let columns = if columns.is_empty() { row_columns(rows.iter()) } else { columns };
        if columns.is_empty() {
            return;
        }
        self.headers(&columns);
        for row in rows {
            self.record(row, &columns);
        }
    }
}

/// Writes a lowered value with the row type `item`, projected onto
/// `projection` when given.
fn write_lowered(
    value: &Value,
    item: Option<&'static TypeInfo>,
    projection: Option<&'static TypeInfo>,
    config: &Config,
) -> String {
    let types = type_config_table();
    let mut writer = Writer {
        config,
        out: String::new(),
    };
    let columns = match (projection, item) {
        (Some(narrow), _) => declared_columns(narrow, &types, config, true),
        (None, Some(item)) => declared_columns(item, &types, config, true),
        (None, None) => Vec::new(),
    };
    match value {
        Value::List(rows) if rows.iter().any(|row| matches!(row, Value::Map(_))) || !columns.is_empty() => {
            writer.table(rows, columns);
        }
        Value::List(rows) => {
            for row in rows {
                match row {
                    Value::List(fields) => {
                        for (index, field) in fields.iter().enumerate() {
                            writer.separator(index);
                            writer.field(Some(field));
                        }
                    }
                    scalar => writer.field(Some(scalar)),
                }
                writer.end_row();
            }
        }
        Value::Map(_) => writer.table(core::slice::from_ref(value), columns),
        Value::Null => {}
        scalar => writer.field(Some(scalar)),
    }
    writer.out
}

fn lowering_config(config: &Config) -> Config {
    Config {
        include_null_values: true,
        exclude_type_info: true,
        ..config.clone()
    }
}

/// Writes `value` as CSV.
///
/// ```
/// use vc_reflect::derive::Reflect;
/// use vc_serial::{config::Config, csv::to_csv};
///
/// #[derive(Reflect, Clone, Default)]
/// struct Row { id: i32, name: String }
///
/// let rows = vec![Row { id: 1, name: "a,b".into() }, Row { id: 2, name: "c".into() }];
/// assert_eq!(to_csv(&rows, &Config::default()).unwrap(), "id,name\r\n1,\"a,b\"\r\n2,c\r\n");
/// ```
pub fn to_csv(value: &dyn Reflect, config: &Config) -> Result<String> {
    let lowering = lowering_config(config);
    let lowered = Serializer::for_format(&lowering, Format::Csv).to_value(value)?;
    let info = value.reflect_type_info();
    let item = item_info(info).or_else(|| Some(unwrap_option(info)).filter(|i| matches!(i, TypeInfo::Struct(_))));
    Ok(write_lowered(&lowered, item, None, config))
}

/// Writes `value` with the columns of the struct `Narrow`, in its member
/// order.
pub fn to_csv_as(value: &dyn Reflect, narrow: &'static TypeInfo, config: &Config) -> Result<String> {
    let lowering = lowering_config(config);
    let lowered = Serializer::for_format(&lowering, Format::Csv).to_value(value)?;
    Ok(write_lowered(&lowered, None, Some(unwrap_option(narrow)), config))
}

// -----------------------------------------------------------------------------
// Reader

fn field_value(field: Option<String>) -> Value {
    field.map_or(Value::Null, Value::String)
}

/// Rows as maps keyed by the header row, or by the declared columns of
/// `item` when headers are omitted.
fn records(lines: &[String], item: &'static TypeInfo, config: &Config) -> Vec<Value> {
    let csv = &config.csv;
    let types = type_config_table();
    let declared = declared_columns(item, &types, config, csv.omit_headers);

    let (keys, body): (Vec<String>, &[String]) = if csv.omit_headers {
        (declared.into_iter().map(|column| column.key).collect(), lines)
    } else {
        let Some((header, body)) = lines.split_first() else {
            return Vec::new();
        };
        let keys = parse_fields(header, csv)
            .into_iter()
            .map(|name| {
                let name = name.unwrap_or_default();
                declared
                    .iter()
                    .find(|column| column.header == name)
                    .map_or(name, |column| column.key.clone())
            })
            .collect();
        (keys, body)
    };

    body.iter()
        .map(|line| {
            let map = keys
                .iter()
                .cloned()
                .zip(parse_fields(line, csv).into_iter().map(field_value))
                .collect::<OrderedMap<_, _>>();
            Value::Map(map)
        })
        .collect()
}

/// Reads CSV text into the untyped shape expected by `info`.
pub fn parse_as(text: &str, info: &'static TypeInfo, config: &Config) -> Value {
    let csv = &config.csv;
    let target = unwrap_option(info);
    let lines = parse_lines(text, csv);
    match target {
        TypeInfo::List(list) => {
            let item = unwrap_option(list.item_info());
            match item {
                TypeInfo::List(_) => Value::List(
                    lines
                        .iter()
                        .map(|line| Value::List(parse_fields(line, csv).into_iter().map(field_value).collect()))
                        .collect(),
                ),
                TypeInfo::Struct(_) | TypeInfo::Map(_) | TypeInfo::Object(_) | TypeInfo::Opaque(_) => {
                    Value::List(records(&lines, item, config))
                }
                _ => Value::List(
                    lines
                        .iter()
                        .map(|line| field_value(parse_fields(line, csv).into_iter().next().flatten()))
                        .collect(),
                ),
            }
        }
        TypeInfo::Struct(_) | TypeInfo::Map(_) | TypeInfo::Object(_) => {
            records(&lines, target, config).into_iter().next().unwrap_or(Value::Null)
        }
        _ => lines
            .first()
            .and_then(|line| parse_fields(line, csv).into_iter().next().flatten())
            .map_or(Value::Null, Value::String),
    }
}

/// Reads a value of type `info` from CSV text.
pub fn from_csv(text: &str, info: &'static TypeInfo, config: &Config) -> Result<Box<dyn Reflect>> {
    de::from_value(&parse_as(text, info, config), info, config)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;
    use vc_reflect::derive::Reflect;
    use vc_reflect::info::Typed;
    use vc_reflect::ops::Bytes;

    use super::{from_csv, to_csv, to_csv_as};
    use crate::config::tests::lock_global;
    use crate::config::{Config, CsvConfig, configure_type};

    #[derive(Reflect, Clone, Default, PartialEq, Debug)]
    #[reflect(type_path = "app::northwind::Category")]
    struct Category {
        #[reflect(rename = "Id")]
        id: i32,
        #[reflect(rename = "CategoryName")]
        category_name: String,
        #[reflect(rename = "Description")]
        description: String,
        #[reflect(rename = "Picture")]
        picture: Option<Bytes>,
    }

    #[derive(Reflect, Clone, Default, PartialEq, Debug)]
    struct Summary {
        #[reflect(rename = "Description")]
        description: String,
        #[reflect(rename = "Id")]
        id: i32,
    }

    #[derive(Reflect, Clone, Default, PartialEq, Debug)]
    struct Row {
        id: i32,
        name: String,
        tags: Vec<i32>,
    }

    fn read<T: Typed + vc_reflect::Reflect>(text: &str, config: &Config) -> T {
        from_csv(text, T::type_info(), config).unwrap().take::<T>().unwrap()
    }

    fn category() -> Category {
        Category {
            id: 1,
            category_name: "between \"quotes\" here".into(),
            description: "with, comma".into(),
            picture: None,
        }
    }

    #[test]
    fn pipe_separated_rows() {
        let _guard = lock_global();
        let config = Config {
            csv: CsvConfig { item_separator: "|".into(), ..CsvConfig::default() },
            ..Config::default()
        };
        let text = to_csv(&vec![category()], &config).unwrap();
        assert_eq!(text, "Id|CategoryName|Description|Picture\r\n1|\"between \"\"quotes\"\" here\"|with, comma|\r\n");
        assert_eq!(read::<Vec<Category>>(&text, &config), [category()]);
    }

    #[test]
    fn projections_follow_the_narrow_type() {
        let _guard = lock_global();
        let config = Config::default();
        let text = to_csv_as(&vec![category()], Summary::type_info(), &config).unwrap();
        assert_eq!(text, "Description,Id\r\n\"with, comma\",1\r\n");
        assert_eq!(read::<Vec<Summary>>(&text, &config), [Summary { description: "with, comma".into(), id: 1 }]);
    }

    #[test]
    fn custom_headers() {
        let _guard = lock_global();
        configure_type::<Row>(|tc| {
            tc.csv_header("name", "Full Name").csv_header("id", "#");
        });
        let config = Config::default();
        let rows = vec![Row { id: 3, name: "x".into(), tags: vec![1, 2] }];
        let text = to_csv(&rows, &config).unwrap();
        assert_eq!(text, "Full Name,#\r\nx,3\r\n");
        assert_eq!(read::<Vec<Row>>(&text, &config), [Row { id: 3, name: "x".into(), tags: vec![] }]);
    }

    #[test]
    fn nested_values_and_untyped_targets() {
        let _guard = lock_global();
        let config = Config::default();
        let rows = vec![Row { id: 1, name: "n".into(), tags: vec![4, 5] }];
        let text = to_csv(&rows, &config).unwrap();
        assert_eq!(text, "id,name,tags\r\n1,n,\"[4,5]\"\r\n");
        assert_eq!(read::<Vec<Row>>(&text, &config), rows);
        assert_eq!(read::<Vec<Row>>("id,name,tags\n1,n,[4,5]\n", &config), rows);

        let maps: Vec<BTreeMap<String, String>> = read(&text, &config);
        assert_eq!(maps[0].get("tags").map(String::as_str), Some("[4,5]"));

        let grid: Vec<Vec<String>> = read("a,b\r\nc,\"d,e\"\r\n", &config);
        assert_eq!(grid, [vec!["a".to_string(), "b".into()], vec!["c".into(), "d,e".into()]]);
        assert_eq!(to_csv(&grid, &config).unwrap(), "a,b\r\nc,\"d,e\"\r\n");

        let single: Row = read("id,name\r\n9,z\r\n", &config);
        assert_eq!((single.id, single.name.as_str()), (9, "z"));
        assert_eq!(to_csv(&single, &config).unwrap(), "id,name,tags\r\n9,z,[]\r\n");
    }

    #[test]
    fn omitted_headers() {
        let _guard = lock_global();
        let config = Config {
            csv: CsvConfig { omit_headers: true, ..CsvConfig::default() },
            ..Config::default()
        };
        let rows = vec![Row { id: 1, name: "a".into(), tags: vec![] }];
        let text = to_csv(&rows, &config).unwrap();
        assert_eq!(text, "1,a,[]\r\n");
        assert_eq!(read::<Vec<Row>>(&text, &config), rows);
    }

    #[derive(Reflect, Clone, Default, PartialEq, Debug)]
    struct Pair {
        a: i32,
        b: i32,
    }

    #[test]
    fn declared_order_survives_default_exclusion() {
        let _guard = lock_global();
        let config = Config { exclude_default_values: true, ..Config::default() };
        let rows = vec![Pair { a: 0, b: 1 }, Pair { a: 2, b: 3 }];
        let text = to_csv(&rows, &config).unwrap();
        assert_eq!(text, "a,b\r\n,1\r\n2,3\r\n");
        assert_eq!(read::<Vec<Pair>>(&text, &config), rows);

        let maps = vec![
            BTreeMap::from([("b".to_string(), 1)]),
            BTreeMap::from([("a".to_string(), 2), ("b".to_string(), 3)]),
        ];
        assert_eq!(to_csv(&maps, &config).unwrap(), "b,a\r\n1,\r\n3,2\r\n");
    }

    proptest! {
        #[test]
        fn quoting_is_idempotent(names in proptest::collection::vec("[a-z,\"\r\n ]{1,12}", 1..5)) {
            let _guard = lock_global();
            let config = Config::default();
            let rows: Vec<Row> = names
                .iter()
                .enumerate()
                .map(|(id, name)| Row { id: id as i32, name: name.clone(), tags: vec![] })
                .collect();
            let text = to_csv(&rows, &config).unwrap();
            prop_assert_eq!(read::<Vec<Row>>(&text, &config), rows);
        }
    }
}
