//! Shared fixtures for s57-chart integration tests.
//!
//! Builds synthetic cells and catalogs with the ISO 8211 encoder.

// Not every test crate uses every helper.
#![allow(dead_code)]

use s57_chart::FeatureId;
use s57_iso8211::{
    DataRecordBuilder, DescriptiveRecordBuilder, FieldDefinition, FieldWriter, TextEncoding,
};
use std::path::Path;

pub const EDGE: u8 = 130;
pub const ISOLATED_NODE: u8 = 110;

// =============================================================================
// Cells
// =============================================================================

fn cell_ddr() -> Vec<u8> {
    let mut ddr = DescriptiveRecordBuilder::new();
    ddr.field(FieldDefinition::file_control(
        "cell",
        &[
            ("0001", "DSID"),
            ("DSID", "DSSI"),
            ("0001", "DSPM"),
            ("0001", "VRID"),
            ("VRID", "ATTV"),
            ("VRID", "VRPT"),
            ("VRID", "SG2D"),
            ("VRID", "SG3D"),
            ("0001", "FRID"),
            ("FRID", "FOID"),
            ("FRID", "ATTF"),
            ("FRID", "NATF"),
            ("FRID", "FFPT"),
            ("FRID", "FSPT"),
        ],
    ))
    .field(FieldDefinition::new("0001", "ISO 8211 Record Identifier", "", "(b12)"))
    .field(FieldDefinition::new("DSID", "Data set identification field", "RCNM!RCID!DSNM", "(b11,b14,A)"))
    .field(FieldDefinition::new("DSSI", "Data set structure information field", "DSTR!AALL!NALL", "(3b11)"))
    .field(FieldDefinition::new(
        "DSPM",
        "Data set parameter field",
        "RCNM!RCID!HDAT!VDAT!SDAT!CSCL!DUNI!HUNI!PUNI!COUN!COMF!SOMF!COMT",
        "(b11,b14,3b11,b14,4b11,2b14,A)",
    ))
    .field(FieldDefinition::new("VRID", "Vector record identifier field", "RCNM!RCID!RVER!RUIN", "(b11,b14,b12,b11)"))
    .field(FieldDefinition::new("ATTV", "Vector record attribute field", "*ATTL!ATVL", "(b12,A)"))
    .field(FieldDefinition::new("VRPT", "Vector record pointer field", "*NAME!ORNT!USAG!TOPI!MASK", "(B(40),4b11)"))
    .field(FieldDefinition::new("SG2D", "2-D coordinate field", "*YCOO!XCOO", "(2b24)"))
    .field(FieldDefinition::new("SG3D", "3-D coordinate (sounding array) field", "*YCOO!XCOO!VE3D", "(3b24)"))
    .field(FieldDefinition::new(
        "FRID",
        "Feature record identifier field",
        "RCNM!RCID!PRIM!GRUP!OBJL!RVER!RUIN",
        "(b11,b14,2b11,2b12,b11)",
    ))
    .field(FieldDefinition::new("FOID", "Feature object identifier field", "AGEN!FIDN!FIDS", "(b12,b14,b12)"))
    .field(FieldDefinition::new("ATTF", "Feature record attribute field", "*ATTL!ATVL", "(b12,A)"))
    .field(FieldDefinition::new("NATF", "Feature record national attribute field", "*ATTL!ATVL", "(b12,A)"))
    .field(FieldDefinition::new("FFPT", "Feature record to feature object pointer field", "*LNAM!RIND!COMT", "(B(64),b11,A)"))
    .field(FieldDefinition::new("FSPT", "Feature record to spatial record pointer field", "*NAME!ORNT!USAG!MASK", "(B(40),3b11)"));
    ddr.build()
}

fn name(rcnm: u8, rcid: u32) -> Vec<u8> {
    let mut bytes = vec![rcnm];
    bytes.extend(rcid.to_le_bytes());
    bytes
}

/// A pointer from a vector to another vector.
#[derive(Debug, Clone, Copy)]
pub struct Link {
    pub rcnm: u8,
    pub rcid: u32,
    pub reverse: bool,
}

impl Link {
    pub fn forward(rcnm: u8, rcid: u32) -> Self {
        Self { rcnm, rcid, reverse: false }
    }

    pub fn reverse(rcnm: u8, rcid: u32) -> Self {
        Self { rcnm, rcid, reverse: true }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeatureSpec {
    pub rcid: u32,
    /// 1 point, 2 line, 3 area.
    pub prim: u8,
    pub objl: u16,
    pub foid: Option<(u16, u32, u16)>,
    pub attributes: Vec<(u16, String)>,
    pub national: Vec<(u16, String)>,
    /// `(rcnm, rcid, ornt, usag)` of each spatial pointer.
    pub spatial: Vec<(u8, u32, u8, u8)>,
    pub related: Vec<(FeatureId, u8)>,
}

impl FeatureSpec {
    pub fn new(rcid: u32, prim: u8, objl: u16, fidn: u32) -> Self {
        Self {
            rcid,
            prim,
            objl,
            foid: Some((550, fidn, 1)),
            ..Default::default()
        }
    }

    pub fn id(&self) -> FeatureId {
        let (agen, fidn, fids) = self.foid.unwrap_or_default();
        FeatureId::new(agen, fidn, fids)
    }

    pub fn spatial(mut self, rcnm: u8, rcid: u32, ornt: u8, usag: u8) -> Self {
        self.spatial.push((rcnm, rcid, ornt, usag));
        self
    }

    pub fn attribute(mut self, code: u16, value: &str) -> Self {
        self.attributes.push((code, value.to_string()));
        self
    }

    pub fn national(mut self, code: u16, value: &str) -> Self {
        self.national.push((code, value.to_string()));
        self
    }
}

/// Writes a cell record by record.
pub struct CellBuilder {
    bytes: Vec<u8>,
    next_record: u16,
    national_encoding: TextEncoding,
}

impl Default for CellBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CellBuilder {
    pub fn new() -> Self {
        Self {
            bytes: cell_ddr(),
            next_record: 1,
            national_encoding: TextEncoding::SingleByte,
        }
    }

    fn record(&mut self) -> DataRecordBuilder {
        let mut id = FieldWriter::new();
        id.u16(self.next_record);
        self.next_record += 1;
        let mut record = DataRecordBuilder::new();
        record.field("0001", &id);
        record
    }

    /// `DSID` with `DSSI`. A national level of 2 switches `NATF` text of
    /// later features to UCS-2.
    pub fn dataset(&mut self, name: &str, aall: u8, nall: u8) -> &mut Self {
        let mut record = self.record();
        let mut dsid = FieldWriter::new();
        dsid.u8(10).u32(1).text(name);
        let mut dssi = FieldWriter::new();
        dssi.u8(1).u8(aall).u8(nall);
        record.field("DSID", &dsid).field("DSSI", &dssi);
        self.bytes.extend(record.build());
        if nall == 2 {
            self.national_encoding = TextEncoding::DoubleByte;
        }
        self
    }

    pub fn parameters(&mut self, comf: u32, somf: u32, cscl: u32) -> &mut Self {
        let mut record = self.record();
        let mut dspm = FieldWriter::new();
        dspm.u8(20)
            .u32(1)
            .u8(2)
            .u8(17)
            .u8(23)
            .u32(cscl)
            .u8(1)
            .u8(1)
            .u8(1)
            .u8(1)
            .u32(comf)
            .u32(somf)
            .text("");
        record.field("DSPM", &dspm);
        self.bytes.extend(record.build());
        self
    }

    /// Vector with planar coordinates `(x, y)` in raw units.
    pub fn vector(&mut self, rcnm: u8, rcid: u32, coords: &[(i32, i32)], links: &[Link]) -> &mut Self {
        let mut record = self.record();
        let mut vrid = FieldWriter::new();
        vrid.u8(rcnm).u32(rcid).u16(1).u8(1);
        record.field("VRID", &vrid);
        if !links.is_empty() {
            let mut vrpt = FieldWriter::new();
            for link in links {
                vrpt.bytes(&name(link.rcnm, link.rcid))
                    .u8(if link.reverse { 2 } else { 1 })
                    .u8(255)
                    .u8(1)
                    .u8(255);
            }
            record.field("VRPT", &vrpt);
        }
        if !coords.is_empty() {
            let mut sg2d = FieldWriter::new();
            for &(x, y) in coords {
                sg2d.i32(y).i32(x);
            }
            record.field("SG2D", &sg2d);
        }
        self.bytes.extend(record.build());
        self
    }

    /// Sounding vector with `(x, y, depth)` in raw units.
    pub fn sounding(&mut self, rcid: u32, soundings: &[(i32, i32, i32)]) -> &mut Self {
        let mut record = self.record();
        let mut vrid = FieldWriter::new();
        vrid.u8(ISOLATED_NODE).u32(rcid).u16(1).u8(1);
        let mut sg3d = FieldWriter::new();
        for &(x, y, z) in soundings {
            sg3d.i32(y).i32(x).i32(z);
        }
        record.field("VRID", &vrid).field("SG3D", &sg3d);
        self.bytes.extend(record.build());
        self
    }

    pub fn feature(&mut self, spec: &FeatureSpec) -> &mut Self {
        let mut record = self.record();
        let mut frid = FieldWriter::new();
        frid.u8(100)
            .u32(spec.rcid)
            .u8(spec.prim)
            .u8(2)
            .u16(spec.objl)
            .u16(1)
            .u8(1);
        record.field("FRID", &frid);

        if let Some((agen, fidn, fids)) = spec.foid {
            let mut foid = FieldWriter::new();
            foid.u16(agen).u32(fidn).u16(fids);
            record.field("FOID", &foid);
        }
        if !spec.attributes.is_empty() {
            let mut attf = FieldWriter::new();
            for (code, value) in &spec.attributes {
                attf.u16(*code).text(value);
            }
            record.field("ATTF", &attf);
        }
        if !spec.national.is_empty() {
            let mut natf = FieldWriter::with_encoding(self.national_encoding);
            for (code, value) in &spec.national {
                natf.u16(*code).text(value);
            }
            record.field("NATF", &natf);
        }
        if !spec.related.is_empty() {
            let mut ffpt = FieldWriter::new();
            for (target, rind) in &spec.related {
                ffpt.bytes(&target.0.to_le_bytes()).u8(*rind).text("");
            }
            record.field("FFPT", &ffpt);
        }
        if !spec.spatial.is_empty() {
            let mut fspt = FieldWriter::new();
            for &(rcnm, rcid, ornt, usag) in &spec.spatial {
                fspt.bytes(&name(rcnm, rcid)).u8(ornt).u8(usag).u8(255);
            }
            record.field("FSPT", &fspt);
        }
        self.bytes.extend(record.build());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    pub fn write_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, &self.bytes).unwrap();
    }
}

// =============================================================================
// Catalogs
// =============================================================================

pub struct CatalogRow<'a> {
    pub id: u32,
    pub file: &'a str,
    pub implementation: &'a str,
    /// `(south, north, west, east)`.
    pub bbox: Option<(f64, f64, f64, f64)>,
}

pub fn catalog_bytes(rows: &[CatalogRow<'_>]) -> Vec<u8> {
    let mut ddr = DescriptiveRecordBuilder::new();
    ddr.field(FieldDefinition::file_control("catalog", &[("0001", "CATD")]))
        .field(FieldDefinition::new("0001", "ISO 8211 Record Identifier", "", "(I(5))"))
        .field(FieldDefinition::new(
            "CATD",
            "Catalogue directory field",
            "RCNM!RCID!FILE!LFIL!VOLM!IMPL!SLAT!WLON!NLAT!ELON!CRCS!COMT",
            "(A(2),I(10),3A,A(3),4R,2A)",
        ));
    let mut bytes = ddr.build();

    for (n, row) in rows.iter().enumerate() {
        let mut id = FieldWriter::new();
        id.fixed_text(&format!("{:5}", n + 1), 5);
        let bounds: Vec<String> = match row.bbox {
            Some((s, n, w, e)) => [s, w, n, e].iter().map(|v| v.to_string()).collect(),
            None => vec![String::new(); 4],
        };
        let mut catd = FieldWriter::new();
        catd.fixed_text("CD", 2)
            .fixed_text(&format!("{:10}", row.id), 10)
            .text(row.file)
            .text("")
            .text("V01X01")
            .fixed_text(row.implementation, 3);
        for bound in &bounds {
            catd.text(bound);
        }
        catd.text("").text("");
        let mut record = DataRecordBuilder::new();
        record.field("0001", &id).field("CATD", &catd);
        bytes.extend(record.build());
    }
    bytes
}

/// A simple cell: one area feature over an edge loop and one point feature
/// on an isolated node, around `(lon, lat)` in degrees.
pub fn simple_cell(fidn_base: u32, lon: f64, lat: f64, cscl: u32) -> CellBuilder {
    let x = (lon * 10_000_000.0) as i32;
    let y = (lat * 10_000_000.0) as i32;
    let d = 1_000_000;
    let mut cell = CellBuilder::new();
    cell.dataset("cell", 1, 1)
        .parameters(10_000_000, 10, cscl)
        .vector(ISOLATED_NODE, 1, &[(x, y)], &[])
        .vector(EDGE, 2, &[(x - d, y - d), (x + d, y - d), (x + d, y + d), (x - d, y + d)], &[])
        .feature(&FeatureSpec::new(1, 3, 42, fidn_base).spatial(EDGE, 2, 1, 1))
        .feature(&FeatureSpec::new(2, 1, 17, fidn_base + 1).spatial(ISOLATED_NODE, 1, 255, 255));
    cell
}
