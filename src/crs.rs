use std::fmt;

use anyhow::{anyhow, bail, Context, Result};
use proj4rs::proj::Proj as Proj4;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// URN written into the `crs` member of every output collection.
pub const CRS84_URN: &str = "urn:ogc:def:crs:OGC:1.3:CRS84";

/// Coordinate reference system of a feature collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Crs {
    /// WGS84 longitude/latitude (EPSG:4326, OGC CRS84).
    #[default]
    Wgs84,
    /// Any other EPSG code.
    Epsg(u32),
}

/// The GeoJSON (2008) `crs` member, e.g. `{"type":"name","properties":{"name":"..."}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "properties")]
pub enum CrsMember {
    #[serde(rename = "name")]
    Name { name: String },
    #[serde(rename = "EPSG", alias = "epsg")]
    Epsg { code: u32 },
    #[serde(rename = "link")]
    Link { href: String },
}

impl CrsMember {
    /// Named CRS84 member used in output.
    pub fn crs84() -> Self {
        CrsMember::Name { name: CRS84_URN.to_string() }
    }
}

impl Crs {
    /// Build a CRS from an EPSG code, folding 4326 into `Wgs84`.
    pub fn from_epsg(code: u32) -> Self {
        if code == 4326 { Crs::Wgs84 } else { Crs::Epsg(code) }
    }

    /// Parse a CRS name such as `urn:ogc:def:crs:EPSG::3435`, `EPSG:4326` or `CRS84`.
    pub fn from_name(name: &str) -> Result<Self> {
        let upper = name.trim().to_ascii_uppercase();
        let parts: Vec<&str> = upper.split(':').collect();

        let (authority, code) = match parts.as_slice() {
            ["URN", "OGC", "DEF", "CRS", authority, .., code] => (*authority, *code),
            [authority, code] => (*authority, *code),
            [code] => ("", *code),
            _ => bail!("Unrecognized CRS name: {name}"),
        };

        match authority {
            "OGC" | "" if code == "CRS84" => Ok(Crs::Wgs84),
            "EPSG" => code.parse::<u32>()
                .map(Crs::from_epsg)
                .with_context(|| format!("Invalid EPSG code in CRS name: {name}")),
            _ => bail!("Unsupported CRS authority in: {name}"),
        }
    }

    /// Interpret a raw `crs` member from a GeoJSON document. `null` means WGS84.
    pub fn from_member(value: &Value) -> Result<Self> {
        if value.is_null() { return Ok(Crs::Wgs84) }

        let member: CrsMember = serde_json::from_value(value.clone())
            .with_context(|| format!("Malformed crs member: {value}"))?;

        match member {
            CrsMember::Name { name } => Crs::from_name(&name),
            CrsMember::Epsg { code } => Ok(Crs::from_epsg(code)),
            CrsMember::Link { href } => bail!("Linked CRS definitions are not supported: {href}"),
        }
    }

    /// EPSG code of this CRS.
    #[inline]
    pub fn epsg(&self) -> u32 {
        match self {
            Crs::Wgs84 => 4326,
            Crs::Epsg(code) => *code,
        }
    }

    #[inline] pub fn is_wgs84(&self) -> bool { matches!(self, Crs::Wgs84) }

    /// Projection for the CRS, looked up in the EPSG registry bundled with proj4rs.
    pub fn projection(&self) -> Result<Proj4> {
        let code = self.epsg();
        let short = u16::try_from(code)
            .map_err(|_| anyhow!("No projection definition for EPSG:{code}"))?;
        Proj4::from_epsg_code(short)
            .with_context(|| format!("No projection definition for EPSG:{code}"))
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_ogc_and_epsg_urns() {
        assert_eq!(Crs::from_name("urn:ogc:def:crs:OGC:1.3:CRS84").unwrap(), Crs::Wgs84);
        assert_eq!(Crs::from_name("urn:ogc:def:crs:OGC::CRS84").unwrap(), Crs::Wgs84);
        assert_eq!(Crs::from_name("urn:ogc:def:crs:EPSG::3435").unwrap(), Crs::Epsg(3435));
        assert_eq!(Crs::from_name("urn:ogc:def:crs:EPSG:6.6:4326").unwrap(), Crs::Wgs84);
        assert_eq!(Crs::from_name("EPSG:4269").unwrap(), Crs::Epsg(4269));
        assert_eq!(Crs::from_name("epsg:4326").unwrap(), Crs::Wgs84);
        assert_eq!(Crs::from_name("CRS84").unwrap(), Crs::Wgs84);
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(Crs::from_name("urn:ogc:def:crs:ESRI::102671").is_err());
        assert!(Crs::from_name("EPSG:abc").is_err());
        assert!(Crs::from_name("a:b:c").is_err());
    }

    #[test]
    fn parses_crs_members() {
        let named = json!({"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::3435"}});
        assert_eq!(Crs::from_member(&named).unwrap(), Crs::Epsg(3435));

        let epsg = json!({"type": "EPSG", "properties": {"code": 4326}});
        assert_eq!(Crs::from_member(&epsg).unwrap(), Crs::Wgs84);

        assert_eq!(Crs::from_member(&Value::Null).unwrap(), Crs::Wgs84);

        let link = json!({"type": "link", "properties": {"href": "http://example.com/crs"}});
        assert!(Crs::from_member(&link).is_err());
    }

    #[test]
    fn crs84_member_serializes_as_named_crs() {
        let value = serde_json::to_value(CrsMember::crs84()).unwrap();
        assert_eq!(value, json!({"type": "name", "properties": {"name": CRS84_URN}}));
    }

    #[test]
    fn projections_come_from_the_epsg_registry() {
        assert!(Crs::Wgs84.projection().unwrap().is_latlong());
        assert!(Crs::Epsg(4269).projection().unwrap().is_latlong());
        assert!(!Crs::Epsg(3435).projection().unwrap().is_latlong());
        assert!(!Crs::Epsg(3528).projection().unwrap().is_latlong());
        assert!(!Crs::Epsg(32616).projection().unwrap().is_latlong());
    }

    #[test]
    fn unknown_codes_have_no_projection() {
        assert!(Crs::Epsg(1234).projection().is_err());
        assert!(Crs::Epsg(102671).projection().is_err());
    }

    #[test]
    fn display_uses_epsg_form() {
        assert_eq!(Crs::Wgs84.to_string(), "EPSG:4326");
        assert_eq!(Crs::Epsg(3435).to_string(), "EPSG:3435");
    }
}
