use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::action::ActionSpec;
use crate::error::ValidationError;
use crate::event::EventKind;
use crate::types::{TenantId, TriggerId};

/// Which matching mechanism activates a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// Fires on any inbound event for the tenant.
    Webhook,
    /// Fires when the schedule evaluator says it is due.
    Schedule,
    /// Fires on a specific domain event.
    Event,
    /// Fires when the predicate matches the event payload.
    Condition,
}

/// Comparison operator for condition predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOp {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    Contains,
}

/// A single-field predicate gating a condition trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Dotted path into the event payload (e.g. `"client.budget"`).
    pub field: String,
    /// Comparison operator.
    pub op: ConditionOp,
    /// Right-hand operand.
    pub value: serde_json::Value,
}

/// How often a schedule trigger fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

/// A time of day, serialized as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScheduleTime {
    hour: u32,
    minute: u32,
}

impl ScheduleTime {
    /// Create a time of day, rejecting out-of-range components.
    pub fn new(hour: u32, minute: u32) -> Result<Self, ValidationError> {
        if hour > 23 || minute > 59 {
            return Err(ValidationError::InvalidTime(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self { hour, minute })
    }

    /// Hour component (0-23).
    #[must_use]
    pub fn hour(self) -> u32 {
        self.hour
    }

    /// Minute component (0-59).
    #[must_use]
    pub fn minute(self) -> u32 {
        self.minute
    }
}

impl fmt::Display for ScheduleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ScheduleTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidTime(s.to_owned());
        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for ScheduleTime {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ScheduleTime> for String {
    fn from(t: ScheduleTime) -> Self {
        t.to_string()
    }
}

/// When a schedule trigger should fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Daily, weekly or monthly cadence.
    pub frequency: Frequency,

    /// Time of day the window opens.
    pub at: ScheduleTime,

    /// Required for weekly schedules.
    #[serde(default)]
    pub day_of_week: Option<Weekday>,

    /// Required for monthly schedules (1-31; clamped to shorter months).
    #[serde(default)]
    pub day_of_month: Option<u32>,
}

impl Schedule {
    /// Check that the frequency-specific day field is present and in range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.frequency {
            Frequency::Daily => Ok(()),
            Frequency::Weekly => {
                if self.day_of_week.is_none() {
                    return Err(ValidationError::InvalidSchedule(
                        "weekly schedules require day_of_week".into(),
                    ));
                }
                Ok(())
            }
            Frequency::Monthly => match self.day_of_month {
                Some(day) if (1..=31).contains(&day) => Ok(()),
                Some(day) => Err(ValidationError::InvalidSchedule(format!(
                    "day_of_month {day} out of range 1-31"
                ))),
                None => Err(ValidationError::InvalidSchedule(
                    "monthly schedules require day_of_month".into(),
                )),
            },
        }
    }
}

/// A tenant-owned automation rule pairing a matching mechanism with an
/// ordered list of actions.
///
/// Every read and write of a trigger is scoped by `tenant`; cross-tenant
/// access is impossible by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trigger {
    /// Unique trigger identifier.
    pub id: TriggerId,

    /// Tenant that owns this trigger.
    pub tenant: TenantId,

    /// Display name.
    pub name: String,

    /// Display-only description.
    #[serde(default)]
    pub description: Option<String>,

    /// Which matching mechanism activates this trigger.
    pub kind: TriggerKind,

    /// Authoritative for `kind = event`.
    #[serde(default)]
    pub event: Option<EventKind>,

    /// Authoritative for `kind = condition`.
    #[serde(default)]
    pub condition: Option<Condition>,

    /// Authoritative for `kind = schedule`.
    #[serde(default)]
    pub schedule: Option<Schedule>,

    /// Ordered, non-empty action list.
    pub actions: Vec<ActionSpec>,

    /// Inactive triggers are never selected by the ingress.
    pub is_active: bool,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Trigger {
    /// Create an active trigger with a fresh UUID-v4 id, stamped now.
    #[must_use]
    pub fn new(
        tenant: impl Into<TenantId>,
        name: impl Into<String>,
        kind: TriggerKind,
        actions: Vec<ActionSpec>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TriggerId::new(Uuid::new_v4().to_string()),
            tenant: tenant.into(),
            name: name.into(),
            description: None,
            kind,
            event: None,
            condition: None,
            schedule: None,
            actions,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the display description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the event kind an `event` trigger listens for.
    #[must_use]
    pub fn with_event(mut self, event: EventKind) -> Self {
        self.event = Some(event);
        self
    }

    /// Set the predicate of a `condition` trigger.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Set the schedule of a `schedule` trigger.
    #[must_use]
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Deactivate the trigger.
    #[must_use]
    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Enforce the kind-specific required sub-object and the non-empty
    /// action list. Called at the trigger-definition boundary.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.actions.is_empty() {
            return Err(ValidationError::EmptyActions);
        }
        match self.kind {
            TriggerKind::Webhook => Ok(()),
            TriggerKind::Event => {
                if self.event.is_none() {
                    return Err(ValidationError::MissingEventKind);
                }
                Ok(())
            }
            TriggerKind::Condition => {
                if self.condition.is_none() {
                    return Err(ValidationError::MissingCondition);
                }
                Ok(())
            }
            TriggerKind::Schedule => match &self.schedule {
                Some(schedule) => schedule.validate(),
                None => Err(ValidationError::MissingSchedule),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_action() -> Vec<ActionSpec> {
        vec![ActionSpec::Notification {
            recipient: "owner".into(),
            message: "ping".into(),
            notification_type: "info".into(),
        }]
    }

    #[test]
    fn schedule_time_parse() {
        let t: ScheduleTime = "09:30".parse().unwrap();
        assert_eq!(t.hour(), 9);
        assert_eq!(t.minute(), 30);
        assert_eq!(t.to_string(), "09:30");
    }

    #[test]
    fn schedule_time_rejects_garbage() {
        assert!("24:00".parse::<ScheduleTime>().is_err());
        assert!("09:60".parse::<ScheduleTime>().is_err());
        assert!("0930".parse::<ScheduleTime>().is_err());
        assert!("nine".parse::<ScheduleTime>().is_err());
    }

    #[test]
    fn schedule_time_serde_string_form() {
        let t = ScheduleTime::new(7, 5).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"07:05\"");
        let back: ScheduleTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn weekly_schedule_requires_day_of_week() {
        let schedule = Schedule {
            frequency: Frequency::Weekly,
            at: ScheduleTime::new(9, 0).unwrap(),
            day_of_week: None,
            day_of_month: None,
        };
        assert!(schedule.validate().is_err());
    }

    #[test]
    fn monthly_schedule_day_out_of_range() {
        let schedule = Schedule {
            frequency: Frequency::Monthly,
            at: ScheduleTime::new(9, 0).unwrap(),
            day_of_week: None,
            day_of_month: Some(32),
        };
        assert!(schedule.validate().is_err());
    }

    #[test]
    fn event_trigger_requires_event_kind() {
        let trigger = Trigger::new("t-1", "on client", TriggerKind::Event, one_action());
        assert_eq!(trigger.validate(), Err(ValidationError::MissingEventKind));

        let trigger = trigger.with_event(EventKind::ClientCreated);
        assert!(trigger.validate().is_ok());
    }

    #[test]
    fn condition_trigger_requires_condition() {
        let trigger = Trigger::new("t-1", "big deals", TriggerKind::Condition, one_action());
        assert_eq!(trigger.validate(), Err(ValidationError::MissingCondition));
    }

    #[test]
    fn empty_actions_rejected() {
        let trigger = Trigger::new("t-1", "noop", TriggerKind::Webhook, vec![]);
        assert_eq!(trigger.validate(), Err(ValidationError::EmptyActions));
    }

    #[test]
    fn trigger_serde_roundtrip() {
        let trigger = Trigger::new("t-1", "daily digest", TriggerKind::Schedule, one_action())
            .with_schedule(Schedule {
                frequency: Frequency::Daily,
                at: ScheduleTime::new(9, 0).unwrap(),
                day_of_week: None,
                day_of_month: None,
            });
        let json = serde_json::to_string(&trigger).unwrap();
        let back: Trigger = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, trigger.id);
        assert_eq!(back.schedule, trigger.schedule);
    }
}
