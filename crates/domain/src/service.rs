use chrono::NaiveDateTime;
use log::{debug, error, info, warn};

use crate::{Program, ProgramRepository, ReadError, WriteError};

pub trait ProgramService {
    /// The built-in program combined with the saved state of the program of the same name.
    fn load_program(&self, builtin: Program, now: NaiveDateTime) -> Result<Program, ReadError>;
    fn save_program(&mut self, program: &Program) -> Result<(), WriteError>;
}

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal $(, $benign: pat)?) => {{
        let result = $func;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::Unavailable) $(| $benign)? => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: ProgramRepository> ProgramService for Service<R> {
    fn load_program(&self, builtin: Program, now: NaiveDateTime) -> Result<Program, ReadError> {
        let mut program = builtin;
        match log_on_error!(
            self.repository.read_program(&program.name),
            ReadError,
            "read",
            "program",
            ReadError::NotFound(_)
        ) {
            Ok(saved) => program.sync(&saved),
            Err(ReadError::NotFound(_)) => info!("using built-in {}", program.name),
            Err(err) => return Err(err),
        }

        program.refresh(now);
        for problem in program.errors() {
            warn!("{}: {problem}", program.name);
        }

        Ok(program)
    }

    fn save_program(&mut self, program: &Program) -> Result<(), WriteError> {
        log_on_error!(
            self.repository.write_program(program),
            WriteError,
            "write",
            "program"
        )
    }
}
