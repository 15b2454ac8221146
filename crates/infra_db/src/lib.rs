//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the payer accumulation pipeline, using SQLx.
//!
//! The only table this crate touches is `accumulation_treatment_mapping`,
//! which links a submitted treatment to the accumulation unique id echoed
//! back by the payer in 277CA TRN segments.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, PgTreatmentMappingRepository};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/accumulation")).await?;
//! let repo = PgTreatmentMappingRepository::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;

pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool, TREATMENT_MAPPING_SCHEMA};
pub use error::DatabaseError;
pub use repositories::PgTreatmentMappingRepository;
