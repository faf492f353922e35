//! Sensor reading types

use std::fmt;
use std::str::FromStr;

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// One sensor sample as delivered by the source endpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temperature: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    pub humidity: f64,
}

impl Reading {
    pub fn new(temperature: f64, pressure: Option<f64>, humidity: f64) -> Self {
        Self {
            temperature,
            pressure,
            humidity,
        }
    }

    /// Value of the given field, `None` when the reading does not carry it
    pub fn value(&self, field: ReadingField) -> Option<f64> {
        match field {
            ReadingField::Temperature => Some(self.temperature),
            ReadingField::Pressure => self.pressure,
            ReadingField::Humidity => Some(self.humidity),
        }
    }
}

/// A sortable, chartable attribute of a [`Reading`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingField {
    Temperature,
    Pressure,
    Humidity,
}

impl ReadingField {
    /// All fields in column order
    pub const ALL: [ReadingField; 3] = [
        ReadingField::Temperature,
        ReadingField::Pressure,
        ReadingField::Humidity,
    ];

    /// Field with the given wire name
    pub fn from_name(name: &str) -> Option<Self> {
        ReadingField::ALL.into_iter().find(|field| field.name() == name)
    }

    /// Attribute name as it appears on the wire
    pub fn name(self) -> &'static str {
        match self {
            ReadingField::Temperature => "temperature",
            ReadingField::Pressure => "pressure",
            ReadingField::Humidity => "humidity",
        }
    }

    /// Human readable label with unit
    pub fn label(self) -> &'static str {
        match self {
            ReadingField::Temperature => "Temperature (°C)",
            ReadingField::Pressure => "Pressure (hPa)",
            ReadingField::Humidity => "Humidity (%)",
        }
    }

    /// Short title used for chart headings and placeholders
    pub fn title(self) -> &'static str {
        match self {
            ReadingField::Temperature => "Temperature",
            ReadingField::Pressure => "Pressure",
            ReadingField::Humidity => "Humidity",
        }
    }

    /// Line colour for the field's chart
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            ReadingField::Temperature => (255, 99, 132),
            ReadingField::Pressure => (54, 162, 235),
            ReadingField::Humidity => (75, 192, 192),
        }
    }
}

impl fmt::Display for ReadingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReadingField {
    type Err = crate::PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReadingField::from_name(s).ok_or_else(|| crate::PanelError::Dashboard(format!("Unknown reading field '{}'", s)))
    }
}

/// Direction of an applied sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ascending"),
            SortDirection::Descending => write!(f, "descending"),
        }
    }
}

/// The last sort applied to the reading list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub field: ReadingField,
    pub direction: SortDirection,
}

/// A fetched reading list together with its attribute names.
///
/// `columns` lists every reading attribute that appears as a key on at least
/// one record, in the order the keys were first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub readings: Vec<Reading>,
    pub columns: Vec<ReadingField>,
}

impl From<Vec<Reading>> for Snapshot {
    /// Without key order, fall back to the fields that carry a value
    fn from(readings: Vec<Reading>) -> Self {
        let columns = ReadingField::ALL
            .into_iter()
            .filter(|&field| readings.iter().any(|r| r.value(field).is_some()))
            .collect();
        Self { readings, columns }
    }
}

/// One decoded record plus its reading keys in document order
struct KeyedReading {
    reading: Reading,
    keys: Vec<ReadingField>,
}

impl<'de> Deserialize<'de> for KeyedReading {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(KeyedReadingVisitor)
    }
}

struct KeyedReadingVisitor;

impl<'de> Visitor<'de> for KeyedReadingVisitor {
    type Value = KeyedReading;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sensor reading object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut temperature = None;
        let mut pressure = None;
        let mut humidity = None;
        let mut keys = Vec::with_capacity(3);

        while let Some(key) = map.next_key::<String>()? {
            let Some(field) = ReadingField::from_name(&key) else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };
            if keys.contains(&field) {
                return Err(de::Error::custom(format!("duplicate field `{}`", field)));
            }
            keys.push(field);
            match field {
                ReadingField::Temperature => temperature = Some(map.next_value::<f64>()?),
                ReadingField::Pressure => pressure = map.next_value::<Option<f64>>()?,
                ReadingField::Humidity => humidity = Some(map.next_value::<f64>()?),
            }
        }

        let temperature = temperature.ok_or_else(|| de::Error::missing_field("temperature"))?;
        let humidity = humidity.ok_or_else(|| de::Error::missing_field("humidity"))?;
        Ok(KeyedReading {
            reading: Reading::new(temperature, pressure, humidity),
            keys,
        })
    }
}

/// Parse a source response body, keeping record order and first-seen key order
pub fn parse_snapshot(body: &str) -> crate::Result<Snapshot> {
    let records: Vec<KeyedReading> = serde_json::from_str(body)?;
    let mut snapshot = Snapshot {
        readings: Vec::with_capacity(records.len()),
        columns: Vec::new(),
    };
    for record in records {
        for field in record.keys {
            if !snapshot.columns.contains(&field) {
                snapshot.columns.push(field);
            }
        }
        snapshot.readings.push(record.reading);
    }
    Ok(snapshot)
}

/// Parse a source response body into an ordered list of readings
pub fn parse_readings(body: &str) -> crate::Result<Vec<Reading>> {
    Ok(parse_snapshot(body)?.readings)
}
