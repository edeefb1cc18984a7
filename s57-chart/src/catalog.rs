//! Exchange-set catalog entries (`CATD`).

use crate::error::{ChartError, Result};
use crate::geometry::BoundingBox;
use crate::vector::describe;
use s57_iso8211::{GenericItem, SubfieldGroup};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// How the referenced file is encoded (`IMPL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Implementation {
    /// `ASC`, an ISO 8211 file with ASCII subfields.
    Ascii,
    /// `BIN`, an ISO 8211 file with binary subfields.
    Binary,
    /// `TXT`, plain text such as a README.
    Text,
}

impl Implementation {
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim() {
            "ASC" => Some(Self::Ascii),
            "BIN" => Some(Self::Binary),
            "TXT" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Ascii => "ASC",
            Self::Binary => "BIN",
            Self::Text => "TXT",
        }
    }
}

impl fmt::Display for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub id: u32,
    /// Path of the file relative to the package root, as recorded.
    pub file: String,
    pub long_file: String,
    pub volume: String,
    pub implementation: Implementation,
    /// Coverage, present only when all four bounds are numeric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
    pub checksum: String,
    pub comment: String,
}

impl CatalogEntry {
    /// Build from an item keyed by `CATD`.
    pub fn from_item(item: &GenericItem) -> Result<Self> {
        let catd = item
            .group("CATD")
            .ok_or_else(|| ChartError::NotACatalogEntry(describe(item)))?;

        let id = record_number(catd).ok_or_else(|| ChartError::MissingRequiredField {
            record: describe(item),
            field: "RCID",
        })?;
        let file = catd
            .text("FILE")
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .ok_or_else(|| ChartError::MissingRequiredField {
                record: describe(item),
                field: "FILE",
            })?
            .to_string();

        let raw_impl = text(catd, "IMPL");
        let implementation =
            Implementation::parse(&raw_impl).ok_or_else(|| ChartError::InvalidValue {
                field: "IMPL",
                value: raw_impl.clone(),
            })?;

        let bound = |tag| catd.text(tag).and_then(|t| t.trim().parse::<f64>().ok());
        let bbox = match (bound("SLAT"), bound("NLAT"), bound("WLON"), bound("ELON")) {
            (Some(s), Some(n), Some(w), Some(e)) => Some(BoundingBox::new(s, n, w, e)),
            _ => None,
        };

        Ok(Self {
            id,
            file,
            long_file: text(catd, "LFIL"),
            volume: text(catd, "VOLM"),
            implementation,
            bbox,
            checksum: text(catd, "CRCS"),
            comment: text(catd, "COMT"),
        })
    }

    /// File name without any directory part. Catalogs may use either slash.
    pub fn file_name(&self) -> &str {
        self.file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.file)
    }

    /// Relative path components of `file`. Leading separators and `.`
    /// components are dropped.
    pub fn path_components(&self) -> impl Iterator<Item = &str> {
        self.file
            .split(['/', '\\'])
            .filter(|c| !c.is_empty() && *c != ".")
    }

    /// `file` as a path below the package root. Parent-directory and drive
    /// components are rejected with [`ChartError::InvalidValue`].
    pub fn relative_path(&self) -> Result<PathBuf> {
        let mut path = PathBuf::new();
        for part in self.path_components() {
            if part == ".." || part.contains(':') {
                return Err(ChartError::InvalidValue {
                    field: "FILE",
                    value: self.file.clone(),
                });
            }
            path.push(part);
        }
        Ok(path)
    }

    pub fn has_suffix(&self, suffix: &str) -> bool {
        self.file_name()
            .to_ascii_lowercase()
            .ends_with(&suffix.to_ascii_lowercase())
    }
}

/// `RCID` as text (ASCII implementation) or a binary number.
fn record_number(group: &SubfieldGroup) -> Option<u32> {
    let value = group.get("RCID")?;
    match value.as_text() {
        Some(text) => text.trim().parse().ok(),
        None => value.as_i64().and_then(|n| u32::try_from(n).ok()),
    }
}

fn text(group: &SubfieldGroup, tag: &str) -> String {
    group.text(tag).map(str::trim).unwrap_or_default().to_string()
}
