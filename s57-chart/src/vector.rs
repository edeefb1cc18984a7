//! Spatial vector records (`VRID`).
//!
//! A vector carries its own coordinates (`SG2D`, or `SG3D` for soundings)
//! and up to two pointers to neighbouring vectors (`VRPT`). The pointers are
//! positional: the first is the predecessor, the second the successor, as
//! used by [`crate::resolver::expanded_coordinates`].

use crate::attribute::{attributes_from_groups, AttributeMap};
use crate::codes::{Masking, Orientation, Topology, UpdateInstruction, Usage};
use crate::dataset::DatasetParameters;
use crate::error::{ChartError, Result};
use crate::geometry::Coordinate;
use crate::ids::{record_name, VectorId};
use crate::lookup::LookupTables;
use s57_iso8211::{GenericItem, SubfieldGroup};
use serde::Serialize;
use smallvec::SmallVec;

/// Maximum number of `VRPT` pointers kept per vector.
pub const MAX_VECTOR_POINTERS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorPointer {
    pub target: VectorId,
    pub orientation: Orientation,
    pub usage: Usage,
    pub topology: Topology,
    pub masking: Masking,
    /// Set once the target has been found in the chart and its own pointers
    /// resolved without running into a cycle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<VectorId>,
}

impl VectorPointer {
    pub fn unresolved(target: VectorId) -> Self {
        Self {
            target,
            orientation: Orientation::Null,
            usage: Usage::Null,
            topology: Topology::Null,
            masking: Masking::Null,
            resolved: None,
        }
    }

    /// Pointer from a `VRPT` group, `None` when `NAME` is missing or
    /// not five bytes long.
    fn from_group(group: &SubfieldGroup) -> Option<Self> {
        let target = VectorId::from_name(group.bytes("NAME")?)?;
        let code = |tag| group.get_as::<u8>(tag).ok().flatten().unwrap_or(255);
        Some(Self {
            target,
            orientation: Orientation::from_code(code("ORNT")),
            usage: Usage::from_code(code("USAG")),
            topology: Topology::from_code(code("TOPI")),
            masking: Masking::from_code(code("MASK")),
            resolved: None,
        })
    }

    pub fn is_reversed(&self) -> bool {
        self.orientation == Orientation::Reverse
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpatialVector {
    pub rcnm: u8,
    pub rcid: u32,
    pub version: u16,
    pub update: UpdateInstruction,
    /// Coordinates came from `SG3D` and carry depths.
    pub is_sounding: bool,
    pub coordinates: Vec<Coordinate>,
    pub attributes: AttributeMap,
    pub pointers: SmallVec<[VectorPointer; MAX_VECTOR_POINTERS]>,
}

impl SpatialVector {
    pub fn id(&self) -> VectorId {
        VectorId::new(self.rcnm, self.rcid)
    }

    /// Build from an item keyed by `VRID`. Coordinates are divided by the
    /// dataset's `COMF` and depths by `SOMF`.
    pub fn from_item(
        item: &GenericItem,
        parameters: Option<&DatasetParameters>,
        lookups: &LookupTables,
    ) -> Result<Self> {
        let vrid = item
            .group("VRID")
            .ok_or_else(|| ChartError::MissingRequiredField {
                record: describe(item),
                field: "VRID",
            })?;
        let rcnm = record_name(vrid, "VRID")?;
        let rcid = vrid.require("VRID", "RCID")?;

        let (xy_scale, z_scale) = parameters
            .map(|p| (p.coordinate_scale(), p.sounding_scale()))
            .unwrap_or((1.0, 1.0));

        let sg3d = item.groups("SG3D");
        let is_sounding = !sg3d.is_empty();
        let coordinates = if is_sounding {
            sg3d.iter()
                .filter_map(|g| {
                    let (x, y) = planar(g)?;
                    let z: i32 = g.get_as("VE3D").ok().flatten()?;
                    Some(Coordinate::with_depth(
                        f64::from(x) / xy_scale,
                        f64::from(y) / xy_scale,
                        f64::from(z) / z_scale,
                    ))
                })
                .collect()
        } else {
            item.groups("SG2D")
                .iter()
                .filter_map(planar)
                .map(|(x, y)| Coordinate::new(f64::from(x) / xy_scale, f64::from(y) / xy_scale))
                .collect()
        };

        let vrpt = item.groups("VRPT");
        if vrpt.len() > MAX_VECTOR_POINTERS {
            tracing::debug!(
                rcid,
                pointers = vrpt.len(),
                "vector has more than two pointers, extra ignored"
            );
        }
        let pointers = vrpt
            .iter()
            .take(MAX_VECTOR_POINTERS)
            .filter_map(VectorPointer::from_group)
            .collect();

        Ok(Self {
            rcnm,
            rcid,
            version: vrid.get_as("RVER")?.unwrap_or(0),
            update: UpdateInstruction::from_code(vrid.get_as("RUIN")?.unwrap_or(255)),
            is_sounding,
            coordinates,
            attributes: attributes_from_groups(item.groups("ATTV"), lookups),
            pointers,
        })
    }

    pub fn predecessor(&self) -> Option<&VectorPointer> {
        self.pointers.first()
    }

    pub fn successor(&self) -> Option<&VectorPointer> {
        self.pointers.get(1)
    }
}

/// `(XCOO, YCOO)` of a coordinate group.
fn planar(group: &SubfieldGroup) -> Option<(i32, i32)> {
    let x = group.get_as("XCOO").ok().flatten()?;
    let y = group.get_as("YCOO").ok().flatten()?;
    Some((x, y))
}

pub(crate) fn describe(item: &GenericItem) -> String {
    match (&item.unique_id, item.record_id) {
        (Some(key), _) => key.to_string(),
        (None, Some(id)) => format!("#{id}"),
        (None, None) => "<unnamed>".to_string(),
    }
}
