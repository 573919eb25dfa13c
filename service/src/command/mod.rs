//! [`Command`] definition.

pub mod authorize_admin_session;
pub mod create_admin_session;
pub mod create_project;
pub mod delete_project;
pub mod delete_projects;
pub mod import_projects;
pub mod update_project;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_admin_session::AuthorizeAdminSession,
    create_admin_session::CreateAdminSession, create_project::CreateProject,
    delete_project::DeleteProject, delete_projects::DeleteProjects,
    import_projects::ImportProjects, update_project::UpdateProject,
};
