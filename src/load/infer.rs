use arrow::datatypes::DataType;

/// Cell texts that load as missing values.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_na(s: &str) -> bool {
    NA_VALUES.contains(&s)
}

fn looks_numeric(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_digit())
}

pub fn parses_as_int(s: &str) -> bool {
    let s = s.trim();
    looks_numeric(s) && s.parse::<i64>().is_ok()
}

pub fn parses_as_float(s: &str) -> bool {
    let s = s.trim();
    looks_numeric(s) && s.parse::<f64>().is_ok()
}

/// Narrowest type holding every present value: Int64, then Float64, else Utf8.
/// A column with no present values is `Null`.
pub fn infer_column_type(values: &[Option<String>]) -> DataType {
    let mut present = values.iter().flatten().peekable();
    if present.peek().is_none() {
        return DataType::Null;
    }

    let mut ty = DataType::Int64;
    for v in present {
        if ty == DataType::Int64 && parses_as_int(v) {
            continue;
        }
        if parses_as_float(v) {
            ty = DataType::Float64;
            continue;
        }
        return DataType::Utf8;
    }
    ty
}
