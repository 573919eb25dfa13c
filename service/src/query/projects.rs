//! [`Query`] collection related to multiple [`Project`]s.

use common::operations::By;

use crate::{domain::Project, read::project::Filter};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a list of [`Project`]s passing the [`Filter`], newest first.
pub type List = DatabaseQuery<By<Vec<Project>, Filter>>;
