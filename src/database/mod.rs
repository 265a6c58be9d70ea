pub mod manager;
pub mod models;
pub mod phase_store;
pub mod population;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use phase_store::{load_cohort, PhaseStore};
pub use population::PopulationRepository;
pub use repository::{BlessureRepository, PatientRepository};
