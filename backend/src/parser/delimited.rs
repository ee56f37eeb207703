//! CSV reader with encoding and delimiter auto-detection.

use serde_json::{Map, Value};

use super::{SheetFormat, SheetRows, SourceInfo};
use crate::error::{SourceError, SourceResult};

/// Delimiters tried by [`detect_delimiter`], in order of preference on ties.
const CANDIDATE_DELIMITERS: [char; 4] = [';', ',', '\t', '|'];

/// Detect the encoding of raw bytes using chardet.
///
/// Always returns a label that [`decode_content`] understands.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let (charset, _confidence, _language) = chardet::detect(bytes);

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other if encoding_rs::Encoding::for_label(other.as_bytes()).is_some() => other.to_string(),
        _ => "utf-8".to_string(),
    }
}

/// Decode bytes to a string using the given encoding label.
///
/// Invalid UTF-8 is decoded lossily rather than rejected. A leading
/// byte-order mark is dropped so it does not end up in the first header.
pub fn decode_content(bytes: &[u8], encoding: &str) -> SourceResult<String> {
    let text = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => String::from_utf8_lossy(bytes).into_owned(),
        },
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        label => {
            let enc = encoding_rs::Encoding::for_label(label.as_bytes())
                .ok_or_else(|| SourceError::Encoding(encoding.to_string()))?;
            enc.decode(bytes).0.into_owned()
        }
    };

    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

/// Detect the delimiter by counting occurrences in the header line.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best = CANDIDATE_DELIMITERS[0];
    let mut best_count = 0;
    for &sep in &CANDIDATE_DELIMITERS {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best = sep;
        }
    }
    best
}

/// Read CSV bytes: detect encoding, decode, detect the delimiter unless
/// one is given, then parse.
///
/// # Example
/// ```ignore
/// use sheetload::parser::read_csv_bytes;
///
/// let sheet = read_csv_bytes(b"sku_code;buffer_stock\nSKU-1;4", None).unwrap();
/// assert_eq!(sheet.source.delimiter, Some(';'));
/// assert_eq!(sheet.rows[0]["buffer_stock"], "4");
/// ```
pub fn read_csv_bytes(bytes: &[u8], delimiter: Option<char>) -> SourceResult<SheetRows> {
    if bytes.is_empty() {
        return Err(SourceError::Empty);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));

    read_csv_str(&content, delimiter, encoding)
}

/// Parse decoded CSV text with an explicit delimiter.
///
/// Quoted cells are unwrapped and headers are trimmed. Cells are kept
/// verbatim. Blank lines are skipped, short rows are padded with empty
/// cells and cells past the last header are dropped.
pub fn read_csv_str(content: &str, delimiter: char, encoding: String) -> SourceResult<SheetRows> {
    if !delimiter.is_ascii() {
        return Err(SourceError::Delimiter(delimiter));
    }
    if content.trim().is_empty() {
        return Err(SourceError::Empty);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(String::is_empty) {
        return Err(SourceError::NoHeaders);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let mut row = Map::new();
        for (i, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let cell = record.get(i).unwrap_or("");
            row.insert(header.clone(), Value::String(cell.to_string()));
        }
        rows.push(row);
    }

    Ok(SheetRows {
        headers,
        rows,
        source: SourceInfo {
            format: SheetFormat::Csv,
            encoding: Some(encoding),
            delimiter: Some(delimiter),
            sheet: None,
        },
    })
}
