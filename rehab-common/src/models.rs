//! Domain models: exercises, their weekly schedule, and logged sessions
//!
//! Create/update payloads live next to the entity they build so that the
//! same validation runs for the HTTP layer and for direct library callers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::{Error, Result};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 120;
pub const PAIN_MAX: u8 = 10;
pub const ROM_MAX_DEG: u16 = 180;

/// Which leg an exercise targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Both,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Both => "both",
        }
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            "both" => Ok(Side::Both),
            other => Err(Error::InvalidInput(format!("Unknown side: {}", other))),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Strength,
    Mobility,
    Balance,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Strength => "strength",
            Category::Mobility => "mobility",
            Category::Balance => "balance",
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "strength" => Ok(Category::Strength),
            "mobility" => Ok(Category::Mobility),
            "balance" => Ok(Category::Balance),
            other => Err(Error::InvalidInput(format!("Unknown category: {}", other))),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of weekdays an exercise is expected on, 0=Sunday..6=Saturday
///
/// Serialized as an ascending JSON array. Duplicates collapse; indices
/// outside 0..=6 are rejected during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<u8>")]
pub struct Schedule(BTreeSet<u8>);

impl Schedule {
    pub fn new<I: IntoIterator<Item = u8>>(days: I) -> Result<Self> {
        let days: BTreeSet<u8> = days.into_iter().collect();
        if let Some(bad) = days.iter().find(|d| **d > 6) {
            return Err(Error::InvalidInput(format!(
                "Weekday index {} out of range 0..=6",
                bad
            )));
        }
        Ok(Self(days))
    }

    /// Whether the 0=Sunday weekday index is scheduled
    pub fn contains(&self, sunday0: u8) -> bool {
        self.0.contains(&sunday0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    /// Decode the stored JSON column
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| Error::corrupt("schedule_dow", text, e))
    }

    pub fn to_json(&self) -> String {
        // A list of small integers always serializes
        serde_json::to_string(&self.iter().collect::<Vec<u8>>()).unwrap_or_else(|_| "[]".into())
    }
}

impl TryFrom<Vec<i64>> for Schedule {
    type Error = Error;

    fn try_from(days: Vec<i64>) -> Result<Self> {
        let days = days
            .into_iter()
            .map(|d| {
                u8::try_from(d)
                    .map_err(|_| Error::InvalidInput(format!("Weekday index {} out of range 0..=6", d)))
            })
            .collect::<Result<Vec<u8>>>()?;
        Schedule::new(days)
    }
}

impl From<Schedule> for Vec<u8> {
    fn from(schedule: Schedule) -> Self {
        schedule.0.into_iter().collect()
    }
}

/// A rehab exercise definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub side: Side,
    pub category: Category,
    pub target_sets: Option<u32>,
    pub target_reps: Option<u32>,
    pub target_hold_sec: Option<u32>,
    pub schedule_dow: Schedule,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating an exercise
#[derive(Debug, Clone, Deserialize)]
pub struct NewExercise {
    pub name: String,
    pub side: Side,
    pub category: Category,
    #[serde(default)]
    pub target_sets: Option<u32>,
    #[serde(default)]
    pub target_reps: Option<u32>,
    #[serde(default)]
    pub target_hold_sec: Option<u32>,
    #[serde(default)]
    pub schedule_dow: Schedule,
}

impl NewExercise {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }
}

/// Partial update for an exercise; absent or null fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExerciseUpdate {
    pub name: Option<String>,
    pub side: Option<Side>,
    pub category: Option<Category>,
    pub target_sets: Option<u32>,
    pub target_reps: Option<u32>,
    pub target_hold_sec: Option<u32>,
    pub schedule_dow: Option<Schedule>,
}

impl ExerciseUpdate {
    pub fn validate(&self) -> Result<()> {
        match &self.name {
            Some(name) => validate_name(name),
            None => Ok(()),
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
        return Err(Error::InvalidInput(format!(
            "name must be {}..={} characters (got {})",
            NAME_MIN_CHARS, NAME_MAX_CHARS, len
        )));
    }
    Ok(())
}

/// One logged performance of an exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub exercise_id: Uuid,
    pub date: NaiveDate,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub hold_sec: Option<u32>,
    pub pain_0_10: Option<u8>,
    pub rom_deg: Option<u16>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for logging a session
#[derive(Debug, Clone, Deserialize)]
pub struct NewSession {
    pub exercise_id: Uuid,
    pub date: NaiveDate,
    #[serde(default)]
    pub sets: Option<u32>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub hold_sec: Option<u32>,
    #[serde(default)]
    pub pain_0_10: Option<u8>,
    #[serde(default)]
    pub rom_deg: Option<u16>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewSession {
    pub fn validate(&self) -> Result<()> {
        validate_measurements(self.pain_0_10, self.rom_deg)
    }
}

/// Partial update for a session; absent or null fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionUpdate {
    pub exercise_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub hold_sec: Option<u32>,
    pub pain_0_10: Option<u8>,
    pub rom_deg: Option<u16>,
    pub notes: Option<String>,
}

impl SessionUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_measurements(self.pain_0_10, self.rom_deg)
    }
}

fn validate_measurements(pain: Option<u8>, rom: Option<u16>) -> Result<()> {
    if let Some(pain) = pain.filter(|p| *p > PAIN_MAX) {
        return Err(Error::InvalidInput(format!(
            "pain_0_10 must be 0..={} (got {})",
            PAIN_MAX, pain
        )));
    }
    if let Some(rom) = rom.filter(|r| *r > ROM_MAX_DEG) {
        return Err(Error::InvalidInput(format!(
            "rom_deg must be 0..={} (got {})",
            ROM_MAX_DEG, rom
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_collapses_duplicates_and_sorts() {
        let schedule: Schedule = serde_json::from_str("[5, 1, 3, 1]").unwrap();
        assert_eq!(schedule.len(), 3);
        assert_eq!(serde_json::to_string(&schedule).unwrap(), "[1,3,5]");
    }

    #[test]
    fn test_schedule_rejects_out_of_range() {
        assert!(serde_json::from_str::<Schedule>("[7]").is_err());
        assert!(serde_json::from_str::<Schedule>("[-1]").is_err());
        assert!(Schedule::new([0, 6]).is_ok());
    }

    #[test]
    fn test_schedule_json_column_round_trip() {
        let schedule = Schedule::new([0, 6, 2]).unwrap();
        assert_eq!(schedule.to_json(), "[0,2,6]");
        assert_eq!(Schedule::from_json("[0,2,6]").unwrap(), schedule);
        assert!(matches!(Schedule::from_json("nope"), Err(Error::CorruptValue { .. })));
    }

    #[test]
    fn test_new_exercise_name_length() {
        let mut payload: NewExercise = serde_json::from_str(
            r#"{"name": "A", "side": "left", "category": "strength"}"#,
        )
        .unwrap();
        assert!(payload.validate().is_err());

        payload.name = "Quad Set".to_string();
        assert!(payload.validate().is_ok());
        assert!(payload.schedule_dow.is_empty());

        payload.name = "x".repeat(NAME_MAX_CHARS + 1);
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_unknown_side_rejected_by_serde() {
        let result = serde_json::from_str::<NewExercise>(
            r#"{"name": "Heel Slides", "side": "middle", "category": "mobility"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_session_measurement_bounds() {
        let mut payload: NewSession = serde_json::from_str(&format!(
            r#"{{"exercise_id": "{}", "date": "2024-05-06", "pain_0_10": 11}}"#,
            Uuid::new_v4()
        ))
        .unwrap();
        assert!(payload.validate().is_err());

        payload.pain_0_10 = Some(10);
        payload.rom_deg = Some(181);
        assert!(payload.validate().is_err());

        payload.rom_deg = Some(180);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_update_payloads_validate_only_supplied_fields() {
        let update: ExerciseUpdate = serde_json::from_str(r#"{"target_reps": 12}"#).unwrap();
        assert!(update.validate().is_ok());
        assert!(update.name.is_none());

        let update: ExerciseUpdate = serde_json::from_str(r#"{"name": "Q"}"#).unwrap();
        assert!(update.validate().is_err());

        let update: SessionUpdate = serde_json::from_str(r#"{"notes": null, "rom_deg": 200}"#).unwrap();
        assert!(update.notes.is_none());
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_side_and_category_parse() {
        assert_eq!("both".parse::<Side>().unwrap(), Side::Both);
        assert_eq!("balance".parse::<Category>().unwrap(), Category::Balance);
        assert!("sideways".parse::<Side>().is_err());
        assert_eq!(Category::Mobility.to_string(), "mobility");
    }
}
