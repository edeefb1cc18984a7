//! Fixture files for CLI tests: small cells and catalogs written with the
//! ISO 8211 encoder.

#![allow(dead_code)]

use s57_iso8211::{DataRecordBuilder, DescriptiveRecordBuilder, FieldDefinition, FieldWriter};
use std::path::Path;

const EDGE: u8 = 130;
const ISOLATED_NODE: u8 = 110;

fn cell_ddr() -> Vec<u8> {
    let mut ddr = DescriptiveRecordBuilder::new();
    ddr.field(FieldDefinition::file_control(
        "cell",
        &[
            ("0001", "DSID"),
            ("DSID", "DSSI"),
            ("0001", "DSPM"),
            ("0001", "VRID"),
            ("VRID", "SG2D"),
            ("0001", "FRID"),
            ("FRID", "FOID"),
            ("FRID", "FSPT"),
        ],
    ))
    .field(FieldDefinition::new("0001", "ISO 8211 Record Identifier", "", "(b12)"))
    .field(FieldDefinition::new("DSID", "Data set identification field", "RCNM!RCID!DSNM", "(b11,b14,A)"))
    .field(FieldDefinition::new("DSSI", "Data set structure information field", "DSTR!AALL!NALL", "(3b11)"))
    .field(FieldDefinition::new(
        "DSPM",
        "Data set parameter field",
        "RCNM!RCID!CSCL!COMF!SOMF",
        "(b11,b14,3b14)",
    ))
    .field(FieldDefinition::new("VRID", "Vector record identifier field", "RCNM!RCID!RVER!RUIN", "(b11,b14,b12,b11)"))
    .field(FieldDefinition::new("SG2D", "2-D coordinate field", "*YCOO!XCOO", "(2b24)"))
    .field(FieldDefinition::new(
        "FRID",
        "Feature record identifier field",
        "RCNM!RCID!PRIM!GRUP!OBJL!RVER!RUIN",
        "(b11,b14,2b11,2b12,b11)",
    ))
    .field(FieldDefinition::new("FOID", "Feature object identifier field", "AGEN!FIDN!FIDS", "(b12,b14,b12)"))
    .field(FieldDefinition::new("FSPT", "Feature record to spatial record pointer field", "*NAME!ORNT!USAG!MASK", "(B(40),3b11)"));
    ddr.build()
}

fn record(n: &mut u16) -> DataRecordBuilder {
    let mut id = FieldWriter::new();
    id.u16(*n);
    *n += 1;
    let mut record = DataRecordBuilder::new();
    record.field("0001", &id);
    record
}

fn feature(n: &mut u16, rcid: u32, prim: u8, objl: u16, fidn: u32, target: (u8, u32)) -> Vec<u8> {
    let mut frid = FieldWriter::new();
    frid.u8(100).u32(rcid).u8(prim).u8(2).u16(objl).u16(1).u8(1);
    let mut foid = FieldWriter::new();
    foid.u16(550).u32(fidn).u16(1);
    let mut fspt = FieldWriter::new();
    fspt.u8(target.0).u32(target.1).u8(1).u8(1).u8(255);
    let mut r = record(n);
    r.field("FRID", &frid).field("FOID", &foid).field("FSPT", &fspt);
    r.build()
}

/// A cell holding an area (class 42) around `(lon, lat)` and a buoy
/// (class 17) at its center.
pub fn cell_bytes(fidn_base: u32, lon: f64, lat: f64, cscl: u32) -> Vec<u8> {
    let x = (lon * 10_000_000.0) as i32;
    let y = (lat * 10_000_000.0) as i32;
    let d = 1_000_000;
    let mut n = 1;
    let mut bytes = cell_ddr();

    let mut dsid = FieldWriter::new();
    dsid.u8(10).u32(1).text("cell");
    let mut dssi = FieldWriter::new();
    dssi.u8(1).u8(1).u8(1);
    let mut r = record(&mut n);
    r.field("DSID", &dsid).field("DSSI", &dssi);
    bytes.extend(r.build());

    let mut dspm = FieldWriter::new();
    dspm.u8(20).u32(1).u32(cscl).u32(10_000_000).u32(10);
    let mut r = record(&mut n);
    r.field("DSPM", &dspm);
    bytes.extend(r.build());

    for (rcnm, rcid, coords) in [
        (ISOLATED_NODE, 1u32, vec![(x, y)]),
        (EDGE, 2, vec![(x - d, y - d), (x + d, y - d), (x + d, y + d), (x - d, y + d)]),
    ] {
        let mut vrid = FieldWriter::new();
        vrid.u8(rcnm).u32(rcid).u16(1).u8(1);
        let mut sg2d = FieldWriter::new();
        for (cx, cy) in coords {
            sg2d.i32(cy).i32(cx);
        }
        let mut r = record(&mut n);
        r.field("VRID", &vrid).field("SG2D", &sg2d);
        bytes.extend(r.build());
    }

    bytes.extend(feature(&mut n, 1, 3, 42, fidn_base, (EDGE, 2)));
    bytes.extend(feature(&mut n, 2, 1, 17, fidn_base + 1, (ISOLATED_NODE, 1)));
    bytes
}

pub fn write_cell(path: &Path, fidn_base: u32, lon: f64, lat: f64, cscl: u32) {
    std::fs::write(path, cell_bytes(fidn_base, lon, lat, cscl)).unwrap();
}

/// Catalog rows: `(id, file, (south, north, west, east))`.
pub fn catalog_bytes(rows: &[(u32, &str, Option<(f64, f64, f64, f64)>)]) -> Vec<u8> {
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

    for (n, (id, file, bbox)) in rows.iter().enumerate() {
        let mut rid = FieldWriter::new();
        rid.fixed_text(&format!("{:5}", n + 1), 5);
        let bounds: Vec<String> = match bbox {
            Some((s, n, w, e)) => [s, w, n, e].iter().map(|v| v.to_string()).collect(),
            None => vec![String::new(); 4],
        };
        let implementation = if bbox.is_some() { "BIN" } else { "ASC" };
        let mut catd = FieldWriter::new();
        catd.fixed_text("CD", 2)
            .fixed_text(&format!("{id:10}"), 10)
            .text(file)
            .text("")
            .text("V01X01")
            .fixed_text(implementation, 3);
        for bound in &bounds {
            catd.text(bound);
        }
        catd.text("").text("");
        let mut r = DataRecordBuilder::new();
        r.field("0001", &rid).field("CATD", &catd);
        bytes.extend(r.build());
    }
    bytes
}

/// A package directory with an overview cell over the western
/// Mediterranean and a harbour cell near Barcelona.
pub fn write_package(root: &Path) {
    std::fs::create_dir_all(root.join("ENC_ROOT")).unwrap();
    std::fs::write(
        root.join("CATALOG.031"),
        catalog_bytes(&[
            (1, "ENC_ROOT\\OV000001.000", Some((35.0, 45.0, -6.0, 10.0))),
            (2, "ENC_ROOT\\HB000002.000", Some((41.0, 41.6, 1.8, 2.6))),
            (3, "README.TXT", None),
        ]),
    )
    .unwrap();
    write_cell(&root.join("ENC_ROOT/OV000001.000"), 100, -2.0, 38.0, 700_000);
    write_cell(&root.join("ENC_ROOT/HB000002.000"), 200, 2.2, 41.3, 12_000);
}
