// models/src/appointment.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// Combines the clinic-local date and time into the UTC instant used by
/// the future-only scheduling check.
pub fn combine(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    date.and_time(time).and_utc()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAppointment {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub status: Option<AppointmentStatus>,
    pub blood_pressure: Option<String>,
    pub temperature: Option<f32>,
    pub studies: Option<String>,
    pub notes: Option<String>,
}

impl UpdateAppointment {
    /// The future-only check applies only when the slot itself moves.
    pub fn reschedules(&self) -> bool {
        self.date.is_some() || self.time.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub status: AppointmentStatus,
    pub blood_pressure: Option<String>,
    pub temperature: Option<f32>,
    pub studies: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn from_new(new: NewAppointment) -> Self {
        let now = Utc::now();
        Appointment {
            id: Uuid::new_v4(),
            date: new.date,
            time: new.time,
            patient_id: new.patient_id,
            doctor_id: new.doctor_id,
            status: AppointmentStatus::Pending,
            blood_pressure: None,
            temperature: None,
            studies: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn scheduled_at(&self) -> DateTime<Utc> {
        combine(self.date, self.time)
    }

    pub fn apply(&mut self, update: UpdateAppointment) {
        if let Some(v) = update.date {
            self.date = v;
        }
        if let Some(v) = update.time {
            self.time = v;
        }
        if let Some(v) = update.status {
            self.status = v;
        }
        if update.blood_pressure.is_some() {
            self.blood_pressure = update.blood_pressure;
        }
        if update.temperature.is_some() {
            self.temperature = update.temperature;
        }
        if update.studies.is_some() {
            self.studies = update.studies;
        }
        if update.notes.is_some() {
            self.notes = update.notes;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_combine_date_and_time() {
        let date = NaiveDate::from_ymd_opt(2030, 5, 20).unwrap();
        let time = NaiveTime::from_hms_opt(14, 30, 0).unwrap();
        let at = combine(date, time);
        assert_eq!(at.to_rfc3339(), "2030-05-20T14:30:00+00:00");
    }

    #[test]
    fn should_detect_reschedule_payload() {
        let mut update = UpdateAppointment::default();
        assert!(!update.reschedules());
        update.time = NaiveTime::from_hms_opt(9, 0, 0);
        assert!(update.reschedules());
    }
}
