//! Feature records (`FRID`).

use crate::attribute::{attributes_from_groups, AttributeMap, SCAMIN};
use crate::codes::{GeometricPrimitive, Masking, Orientation, Relationship, UpdateInstruction, Usage};
use crate::error::{ChartError, Result};
use crate::ids::{record_name, FeatureId, VectorId};
use crate::lookup::LookupTables;
use crate::vector::describe;
use s57_iso8211::{GenericItem, SubfieldGroup};
use serde::Serialize;

/// Pointer to a related feature (`FFPT`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturePointer {
    pub target: FeatureId,
    pub relationship: Relationship,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<FeatureId>,
}

impl FeaturePointer {
    fn from_group(group: &SubfieldGroup) -> Option<Self> {
        Some(Self {
            target: FeatureId::from_lnam(group.bytes("LNAM")?)?,
            relationship: Relationship::from_code(code(group, "RIND")),
            comment: group.text("COMT").unwrap_or_default().to_string(),
            resolved: None,
        })
    }
}

/// Pointer to a spatial vector making up the feature's geometry (`FSPT`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpatialPointer {
    pub target: VectorId,
    pub orientation: Orientation,
    pub usage: Usage,
    pub masking: Masking,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<VectorId>,
}

impl SpatialPointer {
    fn from_group(group: &SubfieldGroup) -> Option<Self> {
        Some(Self {
            target: VectorId::from_name(group.bytes("NAME")?)?,
            orientation: Orientation::from_code(code(group, "ORNT")),
            usage: Usage::from_code(code(group, "USAG")),
            masking: Masking::from_code(code(group, "MASK")),
            resolved: None,
        })
    }
}

fn code(group: &SubfieldGroup, tag: &str) -> u8 {
    group.get_as(tag).ok().flatten().unwrap_or(255)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    pub rcnm: u8,
    pub rcid: u32,
    pub primitive: GeometricPrimitive,
    pub group: u8,
    /// `OBJL`, the object class code.
    pub object_class: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_class_name: Option<String>,
    pub version: u16,
    pub update: UpdateInstruction,
    /// `FOID` was present. Without it the feature's id is 0.
    pub has_object_identifier: bool,
    pub agency: u16,
    pub id_number: u32,
    pub id_subdivision: u16,
    pub attributes: AttributeMap,
    pub national_attributes: AttributeMap,
    pub feature_pointers: Vec<FeaturePointer>,
    pub spatial_pointers: Vec<SpatialPointer>,
    /// `SCAMIN` as a number, 0 when absent or not numeric.
    pub min_display_scale: f64,
}

impl Feature {
    pub fn id(&self) -> FeatureId {
        FeatureId::new(self.agency, self.id_number, self.id_subdivision)
    }

    /// Build from an item keyed by `FRID`.
    pub fn from_item(item: &GenericItem, lookups: &LookupTables) -> Result<Self> {
        let frid = item
            .group("FRID")
            .ok_or_else(|| ChartError::MissingRequiredField {
                record: describe(item),
                field: "FRID",
            })?;
        let object_class = frid.require("FRID", "OBJL")?;

        let foid = item.group("FOID");
        let (agency, id_number, id_subdivision) = match foid {
            Some(g) => (
                g.get_as("AGEN")?.unwrap_or(0),
                g.get_as("FIDN")?.unwrap_or(0),
                g.get_as("FIDS")?.unwrap_or(0),
            ),
            None => (0, 0, 0),
        };

        let attributes = attributes_from_groups(item.groups("ATTF"), lookups);
        let min_display_scale = attributes
            .get(&SCAMIN)
            .and_then(|a| a.as_f64())
            .unwrap_or(0.0);

        Ok(Self {
            rcnm: record_name(frid, "FRID")?,
            rcid: frid.require("FRID", "RCID")?,
            primitive: GeometricPrimitive::from_code(frid.get_as("PRIM")?.unwrap_or(255)),
            group: frid.get_as("GRUP")?.unwrap_or(0),
            object_class,
            object_class_name: lookups.object_class_name(object_class).map(str::to_string),
            version: frid.get_as("RVER")?.unwrap_or(0),
            update: UpdateInstruction::from_code(frid.get_as("RUIN")?.unwrap_or(255)),
            has_object_identifier: foid.is_some(),
            agency,
            id_number,
            id_subdivision,
            attributes,
            national_attributes: attributes_from_groups(item.groups("NATF"), lookups),
            feature_pointers: item
                .groups("FFPT")
                .iter()
                .filter_map(FeaturePointer::from_group)
                .collect(),
            spatial_pointers: item
                .groups("FSPT")
                .iter()
                .filter_map(SpatialPointer::from_group)
                .collect(),
            min_display_scale,
        })
    }

    /// Attribute value by code, from `ATTF` then `NATF`.
    pub fn attribute(&self, code: u16) -> Option<&str> {
        self.attributes
            .get(&code)
            .or_else(|| self.national_attributes.get(&code))
            .map(|a| a.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util;
    use s57_iso8211::{RecordKey, SubfieldValue};

    fn frid(objl: Option<u16>) -> SubfieldGroup {
        let group = SubfieldGroup::new()
            .with("RCNM", SubfieldValue::UInt8(100))
            .with("RCID", SubfieldValue::UInt32(5))
            .with("PRIM", SubfieldValue::UInt8(3))
            .with("GRUP", SubfieldValue::UInt8(1));
        match objl {
            Some(objl) => group.with("OBJL", SubfieldValue::UInt16(objl)),
            None => group,
        }
    }

    fn foid() -> SubfieldGroup {
        SubfieldGroup::new()
            .with("AGEN", SubfieldValue::UInt16(550))
            .with("FIDN", SubfieldValue::UInt32(1234))
            .with("FIDS", SubfieldValue::UInt16(1))
    }

    fn item(fields: Vec<(&str, Vec<SubfieldGroup>)>) -> GenericItem {
        test_util::item("FRID", RecordKey::new(100, 5), fields)
    }

    #[test]
    fn test_feature_with_pointers() {
        let lnam = FeatureId::new(550, 99, 1).0.to_le_bytes().to_vec();
        let mut name = vec![130u8];
        name.extend(12u32.to_le_bytes());
        let item = item(vec![
            ("FRID", vec![frid(Some(42))]),
            ("FOID", vec![foid()]),
            (
                "ATTF",
                vec![SubfieldGroup::new()
                    .with("ATTL", SubfieldValue::UInt16(SCAMIN))
                    .with("ATVL", SubfieldValue::Text("45000".into()))],
            ),
            (
                "FFPT",
                vec![SubfieldGroup::new()
                    .with("LNAM", SubfieldValue::Bytes(lnam))
                    .with("RIND", SubfieldValue::UInt8(2))
                    .with("COMT", SubfieldValue::Text("slave".into()))],
            ),
            (
                "FSPT",
                vec![SubfieldGroup::new()
                    .with("NAME", SubfieldValue::Bytes(name))
                    .with("ORNT", SubfieldValue::UInt8(2))
                    .with("USAG", SubfieldValue::UInt8(2))
                    .with("MASK", SubfieldValue::UInt8(255))],
            ),
        ]);

        let feature = Feature::from_item(&item, &LookupTables::none()).unwrap();
        assert_eq!(feature.id(), FeatureId::new(550, 1234, 1));
        assert!(feature.has_object_identifier);
        assert_eq!(feature.primitive, GeometricPrimitive::Area);
        assert_eq!(feature.min_display_scale, 45000.0);
        assert_eq!(feature.attribute(SCAMIN), Some("45000"));
        assert_eq!(feature.feature_pointers[0].target, FeatureId::new(550, 99, 1));
        assert_eq!(feature.feature_pointers[0].relationship, Relationship::Slave);
        assert_eq!(feature.spatial_pointers[0].target, VectorId::new(130, 12));
        assert_eq!(feature.spatial_pointers[0].usage, Usage::Interior);
        assert_eq!(feature.spatial_pointers[0].masking, Masking::Null);
    }

    #[test]
    fn test_missing_object_identifier_defaults_to_zero() {
        let item = item(vec![("FRID", vec![frid(Some(42))])]);
        let feature = Feature::from_item(&item, &LookupTables::none()).unwrap();
        assert_eq!(feature.id(), FeatureId(0));
        assert!(!feature.has_object_identifier);
        assert_eq!(feature.min_display_scale, 0.0);
    }

    #[test]
    fn test_missing_object_class_is_error() {
        let item = item(vec![("FRID", vec![frid(None)]), ("FOID", vec![foid()])]);
        assert!(Feature::from_item(&item, &LookupTables::none()).is_err());

        let item = test_util::item("FRID", RecordKey::new(100, 5), vec![("FOID", vec![foid()])]);
        assert!(matches!(
            Feature::from_item(&item, &LookupTables::none()),
            Err(ChartError::MissingRequiredField { field: "FRID", .. })
        ));
    }
}
