//! Zone definition parsing and point lookup
//!
//! The definition resource is free-form UTF-8 text. A record starts with a
//! name token (word characters or CJK ideographs) followed by `:` or `：`,
//! and owns every `(x, y)` / `（x, y）` pair up to the next name token:
//!
//! ```text
//! A平台: (120, 40), (180, 40),
//!        (180, 95), (120, 95)
//! B点：（20, 300）（70, 300）（70, 350）
//! ```

use super::{Zone, ZoneError};
use crate::geometry::{Point, Polygon};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{info, warn};

static NAME_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\w\p{Han}]+)\s*[:：]").expect("zone name pattern is valid")
});

static COORDINATE_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[（(]\s*(\d+)\s*,\s*(\d+)\s*[)）]").expect("coordinate pattern is valid")
});

/// Minimum number of vertices for a usable polygon.
const MIN_VERTICES: usize = 3;

/// Ordered, immutable set of zones.
///
/// Lookup scans in load order and returns the first zone whose polygon
/// contains the point.
#[derive(Debug, Clone, Default)]
pub struct ZoneCatalog {
    zones: Vec<Zone>,
}

impl ZoneCatalog {
    /// Build directly from zones. Later duplicates replace earlier polygons.
    pub fn from_zones(zones: impl IntoIterator<Item = Zone>) -> Self {
        let mut catalog = Self::default();
        for zone in zones {
            catalog.insert(zone);
        }
        catalog
    }

    /// Read and parse a definition file. An empty result is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ZoneError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ZoneError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let catalog = Self::parse(&path.display().to_string(), &content)?;
        info!(
            "Loaded {} zones from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parse definition text. `source_name` is only used in diagnostics.
    pub fn parse(source_name: &str, content: &str) -> Result<Self, ZoneError> {
        let headers: Vec<(usize, usize, &str)> = NAME_TOKEN
            .captures_iter(content)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.get(1)?;
                Some((whole.start(), whole.end(), name.as_str()))
            })
            .collect();

        let mut catalog = Self::default();

        for (i, &(_, body_start, name)) in headers.iter().enumerate() {
            let body_end = headers
                .get(i + 1)
                .map_or(content.len(), |&(next_start, _, _)| next_start);
            let body = &content[body_start..body_end];

            let vertices = parse_vertices(name, body)?;
            if vertices.is_empty() {
                continue;
            }
            if vertices.len() < MIN_VERTICES {
                warn!(
                    "Zone '{}' in {} has only {} vertices, skipping",
                    name,
                    source_name,
                    vertices.len()
                );
                continue;
            }

            catalog.insert(Zone::new(name, Polygon::new(vertices)));
        }

        if catalog.is_empty() {
            return Err(ZoneError::Empty {
                source_name: source_name.to_string(),
            });
        }

        Ok(catalog)
    }

    fn insert(&mut self, zone: Zone) {
        match self.zones.iter_mut().find(|z| z.name == zone.name) {
            Some(existing) => {
                warn!("Zone '{}' defined twice, keeping the later polygon", zone.name);
                existing.polygon = zone.polygon;
            }
            None => self.zones.push(zone),
        }
    }

    /// First zone, in load order, containing the point.
    pub fn zone_at(&self, point: Point) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.contains(point))
    }

    /// Name of the first zone containing the point.
    pub fn name_at(&self, point: Point) -> Option<&str> {
        self.zone_at(point).map(|zone| zone.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Zone> {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

fn parse_vertices(zone: &str, body: &str) -> Result<Vec<Point>, ZoneError> {
    COORDINATE_PAIR
        .captures_iter(body)
        .map(|caps| {
            let x = parse_coordinate(zone, &caps[1])?;
            let y = parse_coordinate(zone, &caps[2])?;
            Ok(Point::new(x, y))
        })
        .collect()
}

/// Full-width digits (`０`..`９`) count the same as ASCII ones.
fn parse_coordinate(zone: &str, literal: &str) -> Result<i32, ZoneError> {
    let ascii: String = literal.chars().map(to_ascii_digit).collect();
    ascii.parse::<i32>().map_err(|_| ZoneError::Coordinate {
        zone: zone.to_string(),
        literal: literal.to_string(),
    })
}

fn to_ascii_digit(c: char) -> char {
    match c {
        '０'..='９' => char::from_u32(u32::from(c) - u32::from('０') + u32::from('0')).unwrap_or(c),
        _ => c,
    }
}

impl<'a> IntoIterator for &'a ZoneCatalog {
    type Item = &'a Zone;
    type IntoIter = std::slice::Iter<'a, Zone>;

    fn into_iter(self) -> Self::IntoIter {
        self.zones.iter()
    }
}
