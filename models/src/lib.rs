// models/src/lib.rs

pub mod errors;
pub mod role;
pub mod user;
pub mod patient;
pub mod doctor;
pub mod nurse;
pub mod appointment;
pub mod room;
pub mod specialty;
pub mod audit;

pub use crate::errors::{ClinicError, ClinicResult, ValidationError};
pub use crate::role::Role;
pub use crate::user::{NewUser, UpdateUser, User};
pub use crate::patient::{NewPatient, Patient, PatientStatus, UpdatePatient};
pub use crate::doctor::{Availability, Doctor, NewDoctor, UpdateDoctor};
pub use crate::nurse::{NewNurse, Nurse, UpdateNurse};
pub use crate::appointment::{
    combine, Appointment, AppointmentStatus, NewAppointment, UpdateAppointment,
};
pub use crate::room::{NewRoom, Room, UpdateRoom};
pub use crate::specialty::{NewSpecialty, Specialty, UpdateSpecialty};
pub use crate::audit::{Actor, AuditAction, AuditEntity, AuditEntry};
