use crate::error::CadenceError;

pub type CadenceResult<T> = Result<T, CadenceError>;
