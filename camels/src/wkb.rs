//! GeoPackage geometry blob decoding.
//!
//! A GeoPackage stores each geometry as a small binary header followed by a
//! Well-Known Binary (WKB) body:
//!
//! ```text
//! "GP" | version: u8 | flags: u8 | srs_id: i32 | envelope: 0/4/6/8 × f64 | WKB
//! ```
//!
//! Flag bit 0 is the header byte order (1 = little endian), bits 1-3 select the
//! envelope layout and bit 4 marks an empty geometry. The WKB body carries its
//! own byte order per geometry. ISO (`1000`/`2000`/`3000` offsets) and EWKB
//! (high-bit flags) dimension markers are both understood; Z is kept and M is
//! discarded since GeoJSON positions have no measure.

use geojson::{Geometry, Value as GeoJsonValue};

use crate::error::{CamelsError, Result};

const MAGIC: &[u8; 2] = b"GP";
const HEADER_SIZE: usize = 8;

const FLAG_LITTLE_ENDIAN: u8 = 0b0000_0001;
const FLAG_EMPTY: u8 = 0b0001_0000;

const EWKB_Z: u32 = 0x8000_0000;
const EWKB_M: u32 = 0x4000_0000;
const EWKB_SRID: u32 = 0x2000_0000;

/// A decoded GeoPackage geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPackageGeometry {
    /// Spatial reference system id from the blob header.
    pub srs_id: i32,
    /// The geometry, or `None` if the blob is flagged empty.
    pub value: Option<GeoJsonValue>,
}

/// Decode a GeoPackage geometry blob.
///
/// # Errors
///
/// Returns [`CamelsError::InvalidGeometry`] if the magic bytes are wrong, the
/// envelope code is unknown, the WKB is truncated or uses an unsupported
/// geometry type.
pub fn decode_gpkg_blob(blob: &[u8]) -> Result<GeoPackageGeometry> {
    if blob.len() < HEADER_SIZE || &blob[0..2] != MAGIC {
        return Err(invalid("missing GeoPackage header"));
    }

    let flags = blob[3];
    let little_endian = flags & FLAG_LITTLE_ENDIAN != 0;
    let srs_bytes = [blob[4], blob[5], blob[6], blob[7]];
    let srs_id = if little_endian {
        i32::from_le_bytes(srs_bytes)
    } else {
        i32::from_be_bytes(srs_bytes)
    };

    let envelope_len = match (flags >> 1) & 0b111 {
        0 => 0,
        1 => 32,
        2 | 3 => 48,
        4 => 64,
        code => return Err(invalid(format!("unknown envelope code {code}"))),
    };

    if flags & FLAG_EMPTY != 0 {
        return Ok(GeoPackageGeometry {
            srs_id,
            value: None,
        });
    }

    let start = HEADER_SIZE + envelope_len;
    if blob.len() <= start {
        return Err(invalid("geometry blob ends before WKB body"));
    }

    let mut reader = WkbReader::new(&blob[start..]);
    let value = reader.read_geometry()?;

    Ok(GeoPackageGeometry {
        srs_id,
        value: Some(value),
    })
}

/// Encode a geometry as a little-endian GeoPackage blob without envelope.
///
/// Positions with three or more ordinates are written as XYZ, otherwise XY.
/// This is the inverse of [`decode_gpkg_blob`] for geometries without M values.
pub fn encode_gpkg_blob(value: &GeoJsonValue, srs_id: i32) -> Vec<u8> {
    let mut out = Vec::with_capacity(64);
    out.extend_from_slice(MAGIC);
    out.push(0); // version 1
    out.push(FLAG_LITTLE_ENDIAN);
    out.extend_from_slice(&srs_id.to_le_bytes());
    write_geometry(&mut out, value);
    out
}

fn invalid(message: impl Into<String>) -> CamelsError {
    CamelsError::InvalidGeometry {
        message: message.into(),
    }
}

#[derive(Debug, Clone, Copy)]
struct Dims {
    z: bool,
    m: bool,
}

impl Dims {
    fn ordinates(&self) -> usize {
        2 + self.z as usize + self.m as usize
    }
}

struct WkbReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> WkbReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| invalid("truncated WKB"))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self, le: bool) -> Result<u32> {
        let b = self.take(4)?;
        let bytes = [b[0], b[1], b[2], b[3]];
        Ok(if le {
            u32::from_le_bytes(bytes)
        } else {
            u32::from_be_bytes(bytes)
        })
    }

    fn read_f64(&mut self, le: bool) -> Result<f64> {
        let b = self.take(8)?;
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(b);
        Ok(if le {
            f64::from_le_bytes(bytes)
        } else {
            f64::from_be_bytes(bytes)
        })
    }

    fn read_geometry(&mut self) -> Result<GeoJsonValue> {
        let le = match self.read_u8()? {
            0 => false,
            1 => true,
            other => return Err(invalid(format!("invalid WKB byte order {other}"))),
        };

        let raw_type = self.read_u32(le)?;
        if raw_type & EWKB_SRID != 0 {
            self.read_u32(le)?;
        }

        let iso_type = raw_type & 0x0FFF_FFFF;
        let dimension = iso_type / 1000;
        let dims = Dims {
            z: raw_type & EWKB_Z != 0 || dimension == 1 || dimension == 3,
            m: raw_type & EWKB_M != 0 || dimension == 2 || dimension == 3,
        };

        match iso_type % 1000 {
            1 => Ok(GeoJsonValue::Point(self.read_position(le, dims)?)),
            2 => Ok(GeoJsonValue::LineString(self.read_positions(le, dims)?)),
            3 => Ok(GeoJsonValue::Polygon(self.read_rings(le, dims)?)),
            4 => {
                let points = self.read_parts(le, |value| match value {
                    GeoJsonValue::Point(position) => Ok(position),
                    _ => Err(invalid("MultiPoint member is not a Point")),
                })?;
                Ok(GeoJsonValue::MultiPoint(points))
            }
            5 => {
                let lines = self.read_parts(le, |value| match value {
                    GeoJsonValue::LineString(line) => Ok(line),
                    _ => Err(invalid("MultiLineString member is not a LineString")),
                })?;
                Ok(GeoJsonValue::MultiLineString(lines))
            }
            6 => {
                let polygons = self.read_parts(le, |value| match value {
                    GeoJsonValue::Polygon(rings) => Ok(rings),
                    _ => Err(invalid("MultiPolygon member is not a Polygon")),
                })?;
                Ok(GeoJsonValue::MultiPolygon(polygons))
            }
            7 => {
                let geometries = self.read_parts(le, |value| Ok(Geometry::new(value)))?;
                Ok(GeoJsonValue::GeometryCollection(geometries))
            }
            other => Err(invalid(format!("unsupported WKB geometry type {other}"))),
        }
    }

    fn read_position(&mut self, le: bool, dims: Dims) -> Result<Vec<f64>> {
        let mut ordinates = Vec::with_capacity(3);
        for i in 0..dims.ordinates() {
            let v = self.read_f64(le)?;
            // Third ordinate is M when the geometry has no Z
            let is_m = (dims.z && i == 3) || (!dims.z && i == 2);
            if !is_m {
                ordinates.push(v);
            }
        }
        Ok(ordinates)
    }

    fn read_positions(&mut self, le: bool, dims: Dims) -> Result<Vec<Vec<f64>>> {
        let count = self.read_u32(le)?;
        (0..count).map(|_| self.read_position(le, dims)).collect()
    }

    fn read_rings(&mut self, le: bool, dims: Dims) -> Result<Vec<Vec<Vec<f64>>>> {
        let count = self.read_u32(le)?;
        (0..count).map(|_| self.read_positions(le, dims)).collect()
    }

    /// Read the members of a multi-geometry, each a complete WKB geometry.
    fn read_parts<T>(
        &mut self,
        le: bool,
        mut convert: impl FnMut(GeoJsonValue) -> Result<T>,
    ) -> Result<Vec<T>> {
        let count = self.read_u32(le)?;
        (0..count)
            .map(|_| {
                let value = self.read_geometry()?;
                convert(value)
            })
            .collect()
    }
}

fn has_z(value: &GeoJsonValue) -> bool {
    match value {
        GeoJsonValue::Point(p) => p.len() >= 3,
        GeoJsonValue::MultiPoint(ps) | GeoJsonValue::LineString(ps) => {
            ps.first().is_some_and(|p| p.len() >= 3)
        }
        GeoJsonValue::MultiLineString(ls) | GeoJsonValue::Polygon(ls) => ls
            .iter()
            .flatten()
            .next()
            .is_some_and(|p| p.len() >= 3),
        GeoJsonValue::MultiPolygon(polys) => polys
            .iter()
            .flatten()
            .flatten()
            .next()
            .is_some_and(|p| p.len() >= 3),
        GeoJsonValue::GeometryCollection(_) => false,
    }
}

fn write_header(out: &mut Vec<u8>, base_type: u32, z: bool) {
    out.push(1);
    let wkb_type = if z { base_type + 1000 } else { base_type };
    out.extend_from_slice(&wkb_type.to_le_bytes());
}

fn write_position(out: &mut Vec<u8>, position: &[f64], z: bool) {
    let n = if z { 3 } else { 2 };
    for i in 0..n {
        let v = position.get(i).copied().unwrap_or(0.0);
        out.extend_from_slice(&v.to_le_bytes());
    }
}

fn write_positions(out: &mut Vec<u8>, positions: &[Vec<f64>], z: bool) {
    out.extend_from_slice(&(positions.len() as u32).to_le_bytes());
    for position in positions {
        write_position(out, position, z);
    }
}

fn write_rings(out: &mut Vec<u8>, rings: &[Vec<Vec<f64>>], z: bool) {
    out.extend_from_slice(&(rings.len() as u32).to_le_bytes());
    for ring in rings {
        write_positions(out, ring, z);
    }
}

fn write_geometry(out: &mut Vec<u8>, value: &GeoJsonValue) {
    let z = has_z(value);
    match value {
        GeoJsonValue::Point(p) => {
            write_header(out, 1, z);
            write_position(out, p, z);
        }
        GeoJsonValue::LineString(ps) => {
            write_header(out, 2, z);
            write_positions(out, ps, z);
        }
        GeoJsonValue::Polygon(rings) => {
            write_header(out, 3, z);
            write_rings(out, rings, z);
        }
        GeoJsonValue::MultiPoint(ps) => {
            write_header(out, 4, z);
            out.extend_from_slice(&(ps.len() as u32).to_le_bytes());
            for p in ps {
                write_header(out, 1, z);
                write_position(out, p, z);
            }
        }
        GeoJsonValue::MultiLineString(lines) => {
            write_header(out, 5, z);
            out.extend_from_slice(&(lines.len() as u32).to_le_bytes());
            for line in lines {
                write_header(out, 2, z);
                write_positions(out, line, z);
            }
        }
        GeoJsonValue::MultiPolygon(polygons) => {
            write_header(out, 6, z);
            out.extend_from_slice(&(polygons.len() as u32).to_le_bytes());
            for rings in polygons {
                write_header(out, 3, z);
                write_rings(out, rings, z);
            }
        }
        GeoJsonValue::GeometryCollection(geometries) => {
            write_header(out, 7, false);
            out.extend_from_slice(&(geometries.len() as u32).to_le_bytes());
            for geometry in geometries {
                write_geometry(out, &geometry.value);
            }
        }
    }
}
