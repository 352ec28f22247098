pub mod diff;
pub mod templates;
pub mod versions;

pub use diff::{diff, DiffArgs};
pub use templates::{list, show, vars, ListArgs, ShowArgs, VarsArgs};
pub use versions::{
    activate, apply, backup, create, delete, versions, ActivateArgs, ApplyArgs, CreateArgs,
    DeleteArgs, VersionsArgs,
};
