#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod catalog;

mod apparatus;
mod deload;
mod error;
mod exercise;
mod frontend;
mod plan;
mod program;
mod service;
mod settings;
mod warmups;
mod weight;
mod workout;

pub use apparatus::{Apparatus, MachineRange};
pub use deload::{Deload, deload_by_date};
pub use error::{LookupError, ReadError, StorageError, WriteError};
pub use exercise::Exercise;
pub use frontend::Frontend;
pub use plan::{
    Activity, Completion, Completions, Context, HiitPlan, Lifecycle, LinearPlan, NRepMaxPlan,
    Outcome, PercentOfPlan, Plan, PlanState, PlannedSet, Progression, RestTime, SetKind, Sets,
};
pub use program::{Program, Tag};
pub use service::{ProgramService, Service};
pub use settings::{
    DerivedWeightSetting, FixedWeightSetting, HiitSetting, IntensitySetting, Settings,
    SettingsKind, VariableRepsSetting, VariableWeightSetting,
};
pub use warmups::{WarmupSet, Warmups};
pub use weight::{Weight, WeightInfo, format_weight};
pub use workout::Workout;

/// Persistence of programs, keyed by program name.
pub trait ProgramRepository {
    fn read_program(&self, name: &str) -> Result<Program, ReadError>;
    fn write_program(&mut self, program: &Program) -> Result<(), WriteError>;
}
