// storage/src/lib.rs
//
// Sled-backed entity store for the clinic. One tree per collection,
// documents encoded as JSON. Uniqueness rules (national ids, doctor
// slots, pending appointments) are enforced with compare_and_swap on
// dedicated index trees so concurrent writers cannot both pass the
// check-then-act sequence.

mod store;
mod users;
mod patients;
mod doctors;
mod appointments;
mod catalog;
pub mod validation;

pub use crate::store::ClinicStore;
