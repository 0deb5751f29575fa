//! GBFS payload parsing and projection into rows.
//!
//! Parsing is tolerant of absent fields: strings default to empty, numbers to
//! zero, and the three station-status flags to `true`. Integer columns accept
//! floats and truncate them. A payload without a top-level `data` object (or
//! without a `stations` array inside it) yields no rows, whatever shape the
//! top level has. Malformed JSON and wrongly-typed fields are still errors.

use super::value::{Row, Value};
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use serde_json::Value as Json;
use std::fmt;

/// One entry of `station_status.json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StationStatus {
    #[serde(default)]
    pub station_id: String,
    #[serde(default, deserialize_with = "int32")]
    pub num_bikes_available: i32,
    #[serde(default, deserialize_with = "int32")]
    pub num_docks_available: i32,
    #[serde(default, deserialize_with = "int64")]
    pub last_reported: i64,
    #[serde(default = "default_true", deserialize_with = "flag")]
    pub is_installed: bool,
    #[serde(default = "default_true", deserialize_with = "flag")]
    pub is_renting: bool,
    #[serde(default = "default_true", deserialize_with = "flag")]
    pub is_returning: bool,
}

impl StationStatus {
    pub fn into_row(self) -> Row {
        Row::new(vec![
            Value::Varchar(self.station_id),
            Value::Integer(self.num_bikes_available),
            Value::Integer(self.num_docks_available),
            Value::BigInt(self.last_reported),
            Value::Boolean(self.is_installed),
            Value::Boolean(self.is_renting),
            Value::Boolean(self.is_returning),
        ])
    }
}

/// One entry of `station_information.json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StationInformation {
    #[serde(default)]
    pub station_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default, deserialize_with = "int32")]
    pub capacity: i32,
}

impl StationInformation {
    pub fn into_row(self) -> Row {
        Row::new(vec![
            Value::Varchar(self.station_id),
            Value::Varchar(self.name),
            Value::Double(self.lat),
            Value::Double(self.lon),
            Value::Varchar(self.address),
            Value::Integer(self.capacity),
        ])
    }
}

/// The `data` object of `system_information.json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SystemInformation {
    #[serde(default)]
    pub system_id: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub timezone: String,
}

impl SystemInformation {
    pub fn into_row(self) -> Row {
        Row::new(vec![
            Value::Varchar(self.system_id),
            Value::Varchar(self.language),
            Value::Varchar(self.name),
            Value::Varchar(self.timezone),
        ])
    }
}

fn default_true() -> bool {
    true
}

/// GBFS v1 publishes flags as `0`/`1`, v2 as booleans. Only `1` counts as set
/// for integers; `null` keeps the default.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    struct FlagVisitor;

    impl<'de> Visitor<'de> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a boolean or an integer flag")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            Ok(v == 1)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            Ok(v == 1)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<bool, E> {
            Ok(v == 1.0)
        }

        fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
            Ok(default_true())
        }

        fn visit_none<E: de::Error>(self) -> Result<bool, E> {
            Ok(default_true())
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}

/// Integer field that also takes a float (truncated toward zero). `null`
/// reads as zero.
fn int64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    struct IntVisitor;

    impl<'de> Visitor<'de> for IntVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::custom(format!("integer {v} out of range")))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            if v.is_finite() && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                Ok(v.trunc() as i64)
            } else {
                Err(E::custom(format!("number {v} out of range")))
            }
        }

        fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
            Ok(0)
        }

        fn visit_none<E: de::Error>(self) -> Result<i64, E> {
            Ok(0)
        }
    }

    deserializer.deserialize_any(IntVisitor)
}

fn int32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let v = int64(deserializer)?;
    i32::try_from(v).map_err(|_| de::Error::custom(format!("integer {v} out of range for i32")))
}

/// `data.stations` when both are present with the right shape.
fn stations(payload: &[u8]) -> Result<Option<Json>, serde_json::Error> {
    let mut root: Json = serde_json::from_slice(payload)?;
    Ok(root
        .get_mut("data")
        .and_then(|data| data.get_mut("stations"))
        .filter(|stations| stations.is_array())
        .map(Json::take))
}

fn parse_stations<S: de::DeserializeOwned>(payload: &[u8]) -> Result<Vec<S>, serde_json::Error> {
    match stations(payload)? {
        Some(list) => serde_json::from_value(list),
        None => Ok(Vec::new()),
    }
}

pub fn parse_station_status(payload: &[u8]) -> Result<Vec<StationStatus>, serde_json::Error> {
    parse_stations(payload)
}

pub fn parse_station_information(
    payload: &[u8],
) -> Result<Vec<StationInformation>, serde_json::Error> {
    parse_stations(payload)
}

/// `None` when the payload has no `data` object.
pub fn parse_system_information(
    payload: &[u8],
) -> Result<Option<SystemInformation>, serde_json::Error> {
    let mut root: Json = serde_json::from_slice(payload)?;
    match root.get_mut("data").filter(|data| data.is_object()) {
        Some(data) => serde_json::from_value(data.take()).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str = r#"{
        "last_updated": 1700000000,
        "ttl": 10,
        "data": {
            "stations": [
                {
                    "station_id": "1",
                    "num_bikes_available": 5,
                    "num_docks_available": 10,
                    "last_reported": 1699999990,
                    "is_installed": 1,
                    "is_renting": 0,
                    "is_returning": 1
                },
                {
                    "station_id": "2",
                    "num_bikes_available": 0,
                    "num_docks_available": 20,
                    "last_reported": 1699999000,
                    "is_installed": true,
                    "is_renting": false,
                    "is_returning": true
                }
            ]
        }
    }"#;

    #[test]
    fn parses_integer_and_boolean_flags() {
        let stations = parse_station_status(STATUS.as_bytes()).unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].station_id, "1");
        assert_eq!(stations[0].num_bikes_available, 5);
        assert!(stations[0].is_installed);
        assert!(!stations[0].is_renting);
        assert!(!stations[1].is_renting);
        assert!(stations[1].is_returning);
    }

    #[test]
    fn missing_flags_default_to_true() {
        let payload = br#"{"data":{"stations":[{"station_id":"7"}]}}"#;
        let stations = parse_station_status(payload).unwrap();
        let s = &stations[0];
        assert!(s.is_installed);
        assert!(s.is_renting);
        assert!(s.is_returning);
        assert_eq!(s.num_bikes_available, 0);
        assert_eq!(s.num_docks_available, 0);
        assert_eq!(s.last_reported, 0);
    }

    #[test]
    fn integer_flag_other_than_one_is_false() {
        let payload = br#"{"data":{"stations":[{"is_installed":2,"is_renting":null}]}}"#;
        let stations = parse_station_status(payload).unwrap();
        assert!(!stations[0].is_installed);
        assert!(stations[0].is_renting);
    }

    #[test]
    fn missing_data_yields_no_rows() {
        assert!(parse_station_status(br#"{"ttl": 10}"#).unwrap().is_empty());
        assert!(parse_station_information(br#"{"data": {}}"#).unwrap().is_empty());
        assert!(parse_station_status(br#"{"data": null}"#).unwrap().is_empty());
        assert!(parse_system_information(br#"{"version":"1.0"}"#)
            .unwrap()
            .is_none());
    }

    #[test]
    fn non_object_containers_yield_no_rows() {
        assert!(parse_station_status(br#"{"data": []}"#).unwrap().is_empty());
        assert!(parse_station_status(b"null").unwrap().is_empty());
        assert!(parse_station_status(b"[]").unwrap().is_empty());
        assert!(parse_station_information(br#"{"data": {"stations": {}}}"#)
            .unwrap()
            .is_empty());
        assert!(parse_station_information(br#"{"data": "none"}"#)
            .unwrap()
            .is_empty());
        assert!(parse_system_information(br#"{"data": []}"#).unwrap().is_none());
        assert!(parse_system_information(b"null").unwrap().is_none());
    }

    #[test]
    fn float_numbers_are_truncated_into_integer_columns() {
        let payload = br#"{"data":{"stations":[{"station_id":"4","capacity":15.0,"lat":19.4,"lon":-99.1}]}}"#;
        let stations = parse_station_information(payload).unwrap();
        assert_eq!(stations[0].capacity, 15);

        let payload = br#"{"data":{"stations":[
            {"num_bikes_available":3.9,"last_reported":1700000000.0,"is_installed":1.0,"is_renting":0.0,"is_returning":null}
        ]}}"#;
        let s = &parse_station_status(payload).unwrap()[0];
        assert_eq!(s.num_bikes_available, 3);
        assert_eq!(s.last_reported, 1_700_000_000);
        assert!(s.is_installed);
        assert!(!s.is_renting);
        assert!(s.is_returning);
    }

    #[test]
    fn out_of_range_integer_is_an_error() {
        let payload = br#"{"data":{"stations":[{"capacity":4294967296}]}}"#;
        assert!(parse_station_information(payload).is_err());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_station_status(b"{not json").is_err());
        assert!(parse_system_information(b"").is_err());
    }

    #[test]
    fn wrongly_typed_field_is_an_error() {
        let payload = br#"{"data":{"stations":[{"num_bikes_available":"five"}]}}"#;
        assert!(parse_station_status(payload).is_err());
    }

    #[test]
    fn station_information_defaults_missing_fields() {
        let payload = br#"{"data":{"stations":[
            {"station_id":"10","name":"Reforma","lat":19.43,"lon":-99.16,"address":"Av. Reforma","capacity":24},
            {"station_id":"11"}
        ]}}"#;
        let stations = parse_station_information(payload).unwrap();
        assert_eq!(stations[0].name, "Reforma");
        assert_eq!(stations[0].capacity, 24);
        assert_eq!(stations[1].name, "");
        assert_eq!(stations[1].lat, 0.0);
        assert_eq!(stations[1].capacity, 0);
    }

    #[test]
    fn system_information_projects_one_row() {
        let payload = br#"{"data":{"system_id":"ecobici","language":"es","name":"ECOBICI","timezone":"America/Mexico_City","operator":"x"}}"#;
        let info = parse_system_information(payload).unwrap().unwrap();
        let row = info.into_row();
        assert_eq!(row.len(), 4);
        assert_eq!(row.get(0).and_then(Value::as_str), Some("ecobici"));
        assert_eq!(row.get(3).and_then(Value::as_str), Some("America/Mexico_City"));
    }

    #[test]
    fn station_status_row_follows_schema_order() {
        let stations = parse_station_status(STATUS.as_bytes()).unwrap();
        let row = stations[0].clone().into_row();
        assert_eq!(
            row.cells(),
            &[
                Value::Varchar("1".into()),
                Value::Integer(5),
                Value::Integer(10),
                Value::BigInt(1699999990),
                Value::Boolean(true),
                Value::Boolean(false),
                Value::Boolean(true),
            ]
        );
    }
}
