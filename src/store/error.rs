use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Username '{0}' already exists")]
    DuplicateUsername(String),
}
